//! Change notification for store subscribers
//!
//! The rendering layer re-reads store state whenever a change event
//! fires, instead of reaching into a global. Subscribers are plain
//! callbacks; they receive the event kind only and pull whatever state
//! they need from the store afterwards.

/// What part of the store changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    NodesChanged,
    ConnectorsChanged,
    SelectionChanged,
    GridChanged,
    MaterialsChanged,
    NotificationPushed,
    HistoryRestored,
}

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(SceneEvent)>;

/// Registered change listeners
#[derive(Default)]
pub struct Subscribers {
    entries: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl Fn(SceneEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(existing, _)| *existing != id);
        self.entries.len() != before
    }

    pub fn emit(&self, event: SceneEvent) {
        for (_, callback) in &self.entries {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_emit() {
        let mut subs = Subscribers::new();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        subs.subscribe(move |_| seen.set(seen.get() + 1));
        subs.emit(SceneEvent::NodesChanged);
        subs.emit(SceneEvent::SelectionChanged);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut subs = Subscribers::new();
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let id = subs.subscribe(move |_| seen.set(seen.get() + 1));
        assert!(subs.unsubscribe(id));
        assert!(!subs.unsubscribe(id));
        subs.emit(SceneEvent::NodesChanged);
        assert_eq!(count.get(), 0);
    }
}
