//! Announcements from collaborators that cannot reach the session.
//!
//! While a traversal runs, the session is mutably borrowed by the walk, so a
//! listener or a step executor cannot call [`Session::announce`] directly.
//! They queue text on an [`Announcer`] instead. The session drains the queue
//! right after every pre-notification and right before every
//! post-notification, so a queued announcement is delivered between the pre-
//! and post-notification of the node that was current when it was queued.
//!
//! [`Session::announce`]: crate::Session::announce

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// Shared handle for pushing free text to a runner's listeners.
///
/// Cheap to clone and `Send + Sync`; every clone feeds the same queue.
#[derive(Debug, Clone, Default)]
pub struct Announcer {
    pending: Arc<Mutex<VecDeque<String>>>,
}

impl Announcer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `announcement` for delivery at the runner's next flush point.
    pub fn announce(&self, announcement: impl Into<String>) {
        self.pending.lock().push_back(announcement.into());
    }

    /// Returns the number of announcements waiting for delivery.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Takes the oldest queued announcement.
    pub(crate) fn pop(&self) -> Option<String> {
        self.pending.lock().pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_announcements_are_delivered_in_order() {
        let announcer = Announcer::new();
        announcer.announce("first");
        announcer.announce(String::from("second"));

        assert_eq!(announcer.pending(), 2);
        assert_eq!(announcer.pop().as_deref(), Some("first"));
        assert_eq!(announcer.pop().as_deref(), Some("second"));
        assert_eq!(announcer.pop(), None);
    }

    #[test]
    fn test_clones_share_one_queue() {
        let announcer = Announcer::new();
        let worker = announcer.clone();

        thread::spawn(move || worker.announce("from a step executor"))
            .join()
            .unwrap();

        assert_eq!(announcer.pop().as_deref(), Some("from a step executor"));
    }
}
