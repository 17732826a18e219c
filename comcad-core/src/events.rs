//! Typed notifications from the canvas to its consumers.
//!
//! Delivery is synchronous and single-threaded: `publish` calls every handler
//! in subscription order before returning.

use std::fmt;

use serde::Serialize;

use crate::geometry::Point;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type Handler<T> = Box<dyn FnMut(&T)>;

/// Publish/subscribe channel for one event type.
pub struct Notifier<T> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<T>)>,
}

impl<T> Default for Notifier<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
        }
    }
}

impl<T> fmt::Debug for Notifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifier")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl<T> Notifier<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&T) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(sub, _)| *sub != id);
        let removed = self.handlers.len() != before;
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Deliver `event` to every subscriber; returns how many were called.
    pub fn publish(&mut self, event: &T) -> usize {
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
        self.handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}

/// Pointer position after snapping, published on every pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointerSample {
    pub raw: Point,
    /// The snapped point when snapped, otherwise `raw`.
    pub effective: Point,
    pub snapped: bool,
}

impl PointerSample {
    pub fn new(raw: Point, snap_result: Option<Point>) -> Self {
        Self {
            raw,
            effective: snap_result.unwrap_or(raw),
            snapped: snap_result.is_some(),
        }
    }

    /// Text for a coordinate readout, e.g. `X: 25.00  Y: 0.00  (snap)`.
    pub fn status_text(&self) -> String {
        let mut text = format!("X: {:.2}  Y: {:.2}", self.effective.x, self.effective.y);
        if self.snapped {
            text.push_str("  (snap)");
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_publish_reaches_subscribers_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = Notifier::<u32>::new();

        let first = Rc::clone(&log);
        notifier.subscribe(move |v| first.borrow_mut().push(("a", *v)));
        let second = Rc::clone(&log);
        notifier.subscribe(move |v| second.borrow_mut().push(("b", *v)));

        assert_eq!(notifier.publish(&7), 2);
        assert_eq!(*log.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let count = Rc::new(RefCell::new(0));
        let mut notifier = Notifier::<()>::new();
        let counter = Rc::clone(&count);
        let id = notifier.subscribe(move |_| *counter.borrow_mut() += 1);

        notifier.publish(&());
        assert!(notifier.unsubscribe(id));
        assert!(!notifier.unsubscribe(id));
        assert_eq!(notifier.publish(&()), 0);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(notifier.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_ids_are_unique() {
        let mut notifier = Notifier::<()>::new();
        let a = notifier.subscribe(|_| {});
        notifier.unsubscribe(a);
        let b = notifier.subscribe(|_| {});
        assert_ne!(a, b);
    }

    #[test]
    fn test_pointer_sample_status_text() {
        let raw = Point::new(24.0, 1.0);
        let snapped = PointerSample::new(raw, Some(Point::new(25.0, 0.0)));
        assert_eq!(snapped.status_text(), "X: 25.00  Y: 0.00  (snap)");

        let free = PointerSample::new(raw, None);
        assert_eq!(free.effective, raw);
        assert_eq!(free.status_text(), "X: 24.00  Y: 1.00");
    }
}
