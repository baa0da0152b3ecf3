//! Publish/subscribe container for the current state snapshot.

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<S> = Box<dyn FnMut(&S)>;

/// Holds one state value and notifies listeners whenever it is replaced.
pub struct Store<S> {
    state: S,
    listeners: Vec<(ListenerId, Listener<S>)>,
    next_id: u64,
}

impl<S> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&S) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the listener was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Replace the state and notify listeners in subscription order.
    pub fn set_state(&mut self, state: S) {
        self.state = state;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.state);
        }
    }

    /// Derive the next state from the current one. `None` leaves it unchanged.
    pub fn update<F>(&mut self, f: F) -> bool
    where
        F: FnOnce(&S) -> Option<S>,
    {
        match f(&self.state) {
            Some(next) => {
                self.set_state(next);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_notified_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = Store::new(0);

        let a = seen.clone();
        store.subscribe(move |s: &i32| a.borrow_mut().push(("a", *s)));
        let b = seen.clone();
        store.subscribe(move |s: &i32| b.borrow_mut().push(("b", *s)));

        store.set_state(1);
        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1)]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let count = Rc::new(RefCell::new(0));
        let mut store = Store::new("x".to_string());
        let c = count.clone();
        let id = store.subscribe(move |_| *c.borrow_mut() += 1);

        store.set_state("y".into());
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_state("z".into());

        assert_eq!(*count.borrow(), 1);
        assert_eq!(store.state(), "z");
    }

    #[test]
    fn update_none_keeps_state_silent() {
        let count = Rc::new(RefCell::new(0));
        let mut store = Store::new(5);
        let c = count.clone();
        store.subscribe(move |_| *c.borrow_mut() += 1);

        assert!(!store.update(|_| None));
        assert!(store.update(|s| Some(s + 1)));
        assert_eq!(*store.state(), 6);
        assert_eq!(*count.borrow(), 1);
    }
}
