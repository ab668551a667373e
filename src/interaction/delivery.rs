//! Drops webhook redeliveries of a message the bot already handled.

use std::collections::{HashSet, VecDeque};

use parking_lot::Mutex;

/// Bounded memory of recently dispatched message ids.
///
/// The oldest id is forgotten once `capacity` is exceeded. A capacity of zero
/// remembers nothing, so every delivery is dispatched.
#[derive(Debug)]
pub struct DeliveryLog {
    capacity: usize,
    seen: Mutex<Seen>,
}

#[derive(Debug, Default)]
struct Seen {
    order: VecDeque<String>,
    ids: HashSet<String>,
}

impl DeliveryLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            seen: Mutex::new(Seen::default()),
        }
    }

    /// Record `id`; returns `false` if it was already recorded.
    pub fn first_seen(&self, id: &str) -> bool {
        if self.capacity == 0 {
            return true;
        }

        let mut seen = self.seen.lock();

        if !seen.ids.insert(id.to_string()) {
            return false;
        }

        seen.order.push_back(id.to_string());
        while seen.order.len() > self.capacity {
            if let Some(oldest) = seen.order.pop_front() {
                seen.ids.remove(&oldest);
            }
        }

        true
    }
}
