//! Chat event fan-out to registered observers.

use parking_lot::RwLock;
use tmi_proto::ChatMessage;

/// A registered observer callback.
pub type Observer = Box<dyn Fn(&ChatMessage) + Send + Sync>;

/// Handle identifying a registered observer for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Default)]
struct Registry {
    next_id: u64,
    observers: Vec<(ObserverId, Observer)>,
}

/// Explicit observer registry.
///
/// `emit` runs every observer synchronously, in registration order, on the
/// caller's task (the read loop). A slow observer therefore delays the read
/// loop directly; there is no isolation between observers. Observers must
/// not subscribe or unsubscribe from within a callback.
#[derive(Default)]
pub struct Dispatcher {
    registry: RwLock<Registry>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; returns a handle for [`Dispatcher::unsubscribe`].
    pub fn subscribe(&self, observer: impl Fn(&ChatMessage) + Send + Sync + 'static) -> ObserverId {
        let mut registry = self.registry.write();
        let id = ObserverId(registry.next_id);
        registry.next_id += 1;
        registry.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns `false` if the handle was already removed.
    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut registry = self.registry.write();
        let before = registry.observers.len();
        registry.observers.retain(|(observer_id, _)| *observer_id != id);
        registry.observers.len() != before
    }

    /// Invoke every registered observer with the message, in registration
    /// order.
    pub fn emit(&self, message: &ChatMessage) {
        let registry = self.registry.read();
        for (_, observer) in &registry.observers {
            observer(message);
        }
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.registry.read().observers.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn message() -> ChatMessage {
        ChatMessage {
            sender: "alice".to_string(),
            channel: "mychan".to_string(),
            text: "hello there".to_string(),
        }
    }

    #[test]
    fn test_emit_with_no_observers_is_a_noop() {
        let dispatcher = Dispatcher::new();
        dispatcher.emit(&message());
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_observers_run_in_registration_order() {
        let dispatcher = Dispatcher::new();
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            dispatcher.subscribe(move |_| order.lock().push(tag));
        }

        dispatcher.emit(&message());
        assert_eq!(*order.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_observer() {
        let dispatcher = Dispatcher::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let keep = {
            let seen = Arc::clone(&seen);
            dispatcher.subscribe(move |_| seen.lock().push("keep"))
        };
        let drop_id = {
            let seen = Arc::clone(&seen);
            dispatcher.subscribe(move |_| seen.lock().push("drop"))
        };

        assert!(dispatcher.unsubscribe(drop_id));
        assert!(!dispatcher.unsubscribe(drop_id));

        dispatcher.emit(&message());
        assert_eq!(*seen.lock(), vec!["keep"]);

        assert!(dispatcher.unsubscribe(keep));
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn test_observer_receives_the_message_fields() {
        let dispatcher = Dispatcher::new();
        let received = Arc::new(parking_lot::Mutex::new(None));

        {
            let received = Arc::clone(&received);
            dispatcher.subscribe(move |msg| *received.lock() = Some(msg.clone()));
        }

        dispatcher.emit(&message());
        let received = received.lock().clone().expect("observer should run");
        assert_eq!(received.sender, "alice");
        assert_eq!(received.channel, "mychan");
        assert_eq!(received.text, "hello there");
    }
}
