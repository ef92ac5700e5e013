//! A push-based observable cell.
//!
//! Subscribers run synchronously after every update, in subscription order.

use std::cell::RefCell;
use std::rc::Rc;

type Subscriber<T> = Box<dyn FnMut(&T)>;

/// Handle returned by [`ObservableCell::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

struct Inner<T> {
    value: T,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_id: u64,
}

/// Shared value that notifies its subscribers on each update
pub struct ObservableCell<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for ObservableCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> ObservableCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                subscribers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Read through a closure without cloning.
    pub fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.inner.borrow().value)
    }

    /// Mutate the value, then notify every subscriber.
    ///
    /// Subscribers must not update the same cell; that would re-enter the
    /// borrow and panic.
    pub fn update(&self, write: impl FnOnce(&mut T)) {
        let mut inner = self.inner.borrow_mut();
        let Inner {
            value, subscribers, ..
        } = &mut *inner;
        write(&mut *value);
        for (_, subscriber) in subscribers.iter_mut() {
            subscriber(&*value);
        }
    }

    /// Register `subscriber` and run it once against the current value.
    pub fn subscribe(&self, subscriber: impl FnMut(&T) + 'static) -> SubscriptionId {
        let mut subscriber: Subscriber<T> = Box::new(subscriber);
        let mut inner = self.inner.borrow_mut();
        subscriber(&inner.value);

        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, subscriber));
        id
    }

    /// Remove a subscriber; returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sid, _)| *sid != id);
        inner.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl<T: Clone> ObservableCell<T> {
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }
}
