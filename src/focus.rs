//! Focus coordination between the four fields.
//!
//! Fields never reach into each other. A field that wants its neighbour
//! focused emits a [`FocusRequested`] event; the form hands it to a
//! [`FocusTransport`], which delivers it to whatever the presentation layer
//! registered for that field.
//!
//! Two transports exist:
//!
//! - [`FocusBus`]: publish/subscribe with RAII [`Subscription`] guards.
//! - [`DirectFocus`]: one callback per field, wired explicitly.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use card_field::focus::{FieldId, FocusBus, FocusRequested};
//!
//! let bus = FocusBus::new();
//! let hits = Rc::new(RefCell::new(Vec::new()));
//!
//! let sink = Rc::clone(&hits);
//! let sub = bus.subscribe(FieldId::Cvc, move |ev| sink.borrow_mut().push(ev.0));
//!
//! assert_eq!(bus.publish(FocusRequested(FieldId::Cvc)), 1);
//! drop(sub);
//! assert_eq!(bus.publish(FocusRequested(FieldId::Cvc)), 0);
//! assert_eq!(*hits.borrow(), vec![FieldId::Cvc]);
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

/// The four inputs of a card form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum FieldId {
    /// Card number.
    Number,
    /// Expiry date.
    Expiry,
    /// Security code.
    Cvc,
    /// Postal code.
    Zip,
}

impl FieldId {
    /// All fields, in tab order.
    pub const ALL: [FieldId; 4] = [Self::Number, Self::Expiry, Self::Cvc, Self::Zip];

    /// The field auto-advance moves to.
    #[inline]
    pub const fn next(&self) -> Option<FieldId> {
        match self {
            Self::Number => Some(Self::Expiry),
            Self::Expiry => Some(Self::Cvc),
            Self::Cvc => Some(Self::Zip),
            Self::Zip => None,
        }
    }

    /// The field a setback moves to.
    #[inline]
    pub const fn previous(&self) -> Option<FieldId> {
        match self {
            Self::Number => None,
            Self::Expiry => Some(Self::Number),
            Self::Cvc => Some(Self::Expiry),
            Self::Zip => Some(Self::Cvc),
        }
    }

    /// The DOM id of the input.
    #[inline]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Number => "card-number",
            Self::Expiry => "card-expiry",
            Self::Cvc => "cvc",
            Self::Zip => "zip",
        }
    }

    /// Looks a field up by DOM id or short name.
    pub fn from_id(s: &str) -> Option<Self> {
        match s.trim() {
            "card-number" | "number" => Some(Self::Number),
            "card-expiry" | "expiry" => Some(Self::Expiry),
            "cvc" => Some(Self::Cvc),
            "zip" => Some(Self::Zip),
            _ => None,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Request to move focus to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FocusRequested(pub FieldId);

/// Callback invoked with a focus request.
pub type FocusHandler = Box<dyn Fn(FocusRequested)>;

/// Delivers focus requests to mounted fields.
pub trait FocusTransport {
    /// Registers the handler for `field`, replacing any previous one.
    fn attach(&mut self, field: FieldId, handler: FocusHandler);

    /// Removes the handler for `field`.
    fn detach(&mut self, field: FieldId);

    /// Delivers `event`. Returns false if nothing handled it.
    fn request_focus(&self, event: FocusRequested) -> bool;
}

type SharedHandler = Rc<dyn Fn(FocusRequested)>;

struct Subscriber {
    id: u64,
    field: FieldId,
    handler: SharedHandler,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

/// Publish/subscribe focus transport.
///
/// Handlers may subscribe or unsubscribe from inside a callback: delivery
/// works on a snapshot taken before the first handler runs.
#[derive(Default)]
pub struct FocusBus {
    inner: Rc<RefCell<BusInner>>,
    mounted: HashMap<FieldId, Subscription>,
}

impl FocusBus {
    /// Creates an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes `handler` to requests for `field` until the returned guard
    /// is dropped.
    #[must_use = "dropping the Subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, field: FieldId, handler: F) -> Subscription
    where
        F: Fn(FocusRequested) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            field,
            handler: Rc::new(handler),
        });

        Subscription {
            id,
            bus: Rc::downgrade(&self.inner),
        }
    }

    /// Delivers `event` to every subscriber of its field and returns how
    /// many ran.
    pub fn publish(&self, event: FocusRequested) -> usize {
        let handlers: Vec<SharedHandler> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.field == event.0)
            .map(|s| Rc::clone(&s.handler))
            .collect();

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl FocusTransport for FocusBus {
    fn attach(&mut self, field: FieldId, handler: FocusHandler) {
        let sub = self.subscribe(field, handler);
        // Replacing drops the previous guard, which unsubscribes it
        self.mounted.insert(field, sub);
    }

    fn detach(&mut self, field: FieldId) {
        self.mounted.remove(&field);
    }

    fn request_focus(&self, event: FocusRequested) -> bool {
        let delivered = self.publish(event);
        if delivered == 0 {
            trace!(field = %event.0, "focus request dropped, no subscriber");
        }
        delivered > 0
    }
}

impl fmt::Debug for FocusBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FocusBus")
            .field("subscribers", &self.subscriber_count())
            .field("mounted", &self.mounted.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Keeps a [`FocusBus`] subscription alive; unsubscribes on drop.
pub struct Subscription {
    id: u64,
    bus: Weak<RefCell<BusInner>>,
}

impl Subscription {
    /// True while the bus still exists and holds this subscription.
    pub fn is_active(&self) -> bool {
        self.bus
            .upgrade()
            .map(|bus| bus.borrow().subscribers.iter().any(|s| s.id == self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            // `publish` releases its borrow before running handlers.
            match bus.try_borrow_mut() {
                Ok(mut inner) => inner.subscribers.retain(|s| s.id != self.id),
                Err(_) => trace!(id = self.id, "bus busy, subscriber left registered"),
            }
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Focus transport with one explicit callback per field.
#[derive(Default)]
pub struct DirectFocus {
    handlers: HashMap<FieldId, FocusHandler>,
}

impl DirectFocus {
    /// Creates a transport with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FocusTransport::attach`].
    pub fn with<F>(mut self, field: FieldId, handler: F) -> Self
    where
        F: Fn(FocusRequested) + 'static,
    {
        self.handlers.insert(field, Box::new(handler));
        self
    }
}

impl FocusTransport for DirectFocus {
    fn attach(&mut self, field: FieldId, handler: FocusHandler) {
        self.handlers.insert(field, handler);
    }

    fn detach(&mut self, field: FieldId) {
        self.handlers.remove(&field);
    }

    fn request_focus(&self, event: FocusRequested) -> bool {
        match self.handlers.get(&event.0) {
            Some(handler) => {
                handler(event);
                true
            }
            None => {
                trace!(field = %event.0, "focus request dropped, no callback");
                false
            }
        }
    }
}

impl fmt::Debug for DirectFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectFocus")
            .field("fields", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_chains() {
        assert_eq!(FieldId::Number.next(), Some(FieldId::Expiry));
        assert_eq!(FieldId::Cvc.next(), Some(FieldId::Zip));
        assert_eq!(FieldId::Zip.next(), None);
        assert_eq!(FieldId::Zip.previous(), Some(FieldId::Cvc));
        assert_eq!(FieldId::Expiry.previous(), Some(FieldId::Number));
        assert_eq!(FieldId::Number.previous(), None);
    }

    #[test]
    fn test_ids_round_trip() {
        for field in FieldId::ALL {
            assert_eq!(FieldId::from_id(field.id()), Some(field));
        }
        assert_eq!(FieldId::from_id("number"), Some(FieldId::Number));
        assert_eq!(FieldId::from_id("cardnumber"), None);
    }

    #[test]
    fn test_bus_routes_by_field() {
        let bus = FocusBus::new();
        let cvc = Rc::new(Cell::new(0));
        let zip = Rc::new(Cell::new(0));

        let c = Rc::clone(&cvc);
        let _s1 = bus.subscribe(FieldId::Cvc, move |_| c.set(c.get() + 1));
        let z = Rc::clone(&zip);
        let _s2 = bus.subscribe(FieldId::Zip, move |_| z.set(z.get() + 1));

        bus.publish(FocusRequested(FieldId::Cvc));
        bus.publish(FocusRequested(FieldId::Cvc));
        assert_eq!(cvc.get(), 2);
        assert_eq!(zip.get(), 0);
    }

    #[test]
    fn test_subscription_drop_unsubscribes() {
        let bus = FocusBus::new();
        let sub = bus.subscribe(FieldId::Number, |_| {});
        assert!(sub.is_active());
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_drop_while_bus_borrowed() {
        let bus = FocusBus::new();
        let sub = bus.subscribe(FieldId::Number, |_| {});
        {
            let _held = bus.inner.borrow();
            drop(sub);
        }
        // The guard could not unregister, but dropping it must not panic
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[test]
    fn test_subscription_outlives_bus() {
        let bus = FocusBus::new();
        let sub = bus.subscribe(FieldId::Number, |_| {});
        drop(bus);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn test_bus_transport_attach_detach() {
        let mut bus = FocusBus::new();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        bus.attach(FieldId::Expiry, Box::new(move |_| h.set(h.get() + 1)));
        assert!(bus.request_focus(FocusRequested(FieldId::Expiry)));

        // Re-attaching replaces rather than duplicates
        let h = Rc::clone(&hits);
        bus.attach(FieldId::Expiry, Box::new(move |_| h.set(h.get() + 10)));
        assert_eq!(bus.subscriber_count(), 1);
        assert!(bus.request_focus(FocusRequested(FieldId::Expiry)));
        assert_eq!(hits.get(), 11);

        bus.detach(FieldId::Expiry);
        assert!(!bus.request_focus(FocusRequested(FieldId::Expiry)));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_direct_focus() {
        let hits = Rc::new(RefCell::new(Vec::new()));
        let h = Rc::clone(&hits);
        let mut direct = DirectFocus::new().with(FieldId::Cvc, move |ev| h.borrow_mut().push(ev.0));

        assert!(direct.request_focus(FocusRequested(FieldId::Cvc)));
        assert!(!direct.request_focus(FocusRequested(FieldId::Zip)));
        direct.detach(FieldId::Cvc);
        assert!(!direct.request_focus(FocusRequested(FieldId::Cvc)));
        assert_eq!(*hits.borrow(), vec![FieldId::Cvc]);
    }
}
