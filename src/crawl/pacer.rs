// src/crawl/pacer.rs
// =============================================================================
// Per-host politeness delay.
//
// Each host gets its own "next allowed fetch" timestamp. A caller reserves
// the next slot under the lock, releases the lock, then sleeps until its
// slot. Concurrent fetches to the same host are therefore spaced at least
// `delay` apart, while different hosts do not wait on each other.
// =============================================================================

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

#[derive(Debug)]
pub struct HostPacer {
    delay: Option<Duration>,
    next_slot: Mutex<HashMap<String, Instant>>,
}

impl HostPacer {
    pub fn new(delay: Option<Duration>) -> Self {
        Self {
            delay,
            next_slot: Mutex::new(HashMap::new()),
        }
    }

    /// Waits until a fetch of `url` is allowed.
    pub async fn wait(&self, url: &str) {
        let Some(delay) = self.delay.filter(|d| !d.is_zero()) else {
            return;
        };

        let host = host_key(url);
        let slot = {
            let mut slots = self.next_slot.lock().await;
            let now = Instant::now();
            let slot = match slots.get(&host) {
                Some(next) if *next > now => *next,
                _ => now,
            };
            slots.insert(host, slot + delay);
            slot
        };

        tokio::time::sleep_until(slot).await;
    }
}

fn host_key(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}
