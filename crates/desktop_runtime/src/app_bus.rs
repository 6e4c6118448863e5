//! In-process event bus carrying the critical and window channels between shell and app windows.
//!
//! Subscribers of one channel run in subscription order. Messages dispatched from inside a
//! handler are queued and delivered once the current delivery finishes, so handlers never
//! observe a half-delivered message. Subscriber lists are snapshotted per message: subscribing or
//! unsubscribing from a handler takes effect with the next message.

use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

use desktop_app_contract::{
    BusMessage, Channel, CriticalWindowEvent, EventDecodeError, WindowEvent,
};
use serde_json::Value;

/// Anything that accepts bus messages.
pub trait EventSink {
    /// Hands `message` to the sink.
    fn emit(&self, message: BusMessage);
}

impl<T: EventSink + ?Sized> EventSink for Rc<T> {
    fn emit(&self, message: BusMessage) {
        (**self).emit(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Handle returned by the `subscribe_*` methods.
pub struct SubscriptionId(u64);

type CriticalHandler = Rc<dyn Fn(&CriticalWindowEvent)>;
type WindowHandler = Rc<dyn Fn(&WindowEvent)>;

#[derive(Default)]
/// Single-threaded two-channel bus.
pub struct EventBus {
    next_subscription: Cell<u64>,
    critical: RefCell<Vec<(SubscriptionId, CriticalHandler)>>,
    window: RefCell<Vec<(SubscriptionId, WindowHandler)>>,
    pending: RefCell<VecDeque<BusMessage>>,
    delivering: Cell<bool>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("critical_subscribers", &self.critical.borrow().len())
            .field("window_subscribers", &self.window.borrow().len())
            .field("pending", &self.pending.borrow().len())
            .finish()
    }
}

impl EventBus {
    /// Creates a bus without subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> SubscriptionId {
        let id = self.next_subscription.get();
        self.next_subscription.set(id + 1);
        SubscriptionId(id)
    }

    /// Subscribes `handler` to [`Channel::Critical`].
    pub fn subscribe_critical(
        &self,
        handler: impl Fn(&CriticalWindowEvent) + 'static,
    ) -> SubscriptionId {
        let id = self.next_id();
        self.critical.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Subscribes `handler` to [`Channel::Window`].
    pub fn subscribe_window(&self, handler: impl Fn(&WindowEvent) + 'static) -> SubscriptionId {
        let id = self.next_id();
        self.window.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Removes a subscription from whichever channel holds it; returns `false` if unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut critical = self.critical.borrow_mut();
        let before = critical.len();
        critical.retain(|(sub, _)| *sub != id);
        if critical.len() != before {
            return true;
        }
        drop(critical);

        let mut window = self.window.borrow_mut();
        let before = window.len();
        window.retain(|(sub, _)| *sub != id);
        window.len() != before
    }

    /// Number of handlers subscribed to `channel`.
    pub fn subscriber_count(&self, channel: Channel) -> usize {
        match channel {
            Channel::Critical => self.critical.borrow().len(),
            Channel::Window => self.window.borrow().len(),
        }
    }

    /// Delivers `message` to its channel's subscribers, or queues it if a delivery is running.
    pub fn dispatch(&self, message: BusMessage) {
        self.pending.borrow_mut().push_back(message);
        if self.delivering.replace(true) {
            return;
        }
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(message) = next else {
                break;
            };
            self.deliver(&message);
        }
        self.delivering.set(false);
    }

    /// Decodes a `(channel, payload)` pair from a window and dispatches it.
    ///
    /// # Errors
    ///
    /// Returns the decode error when the channel is unknown or the payload does not fit it.
    pub fn dispatch_raw(&self, channel: &str, payload: Value) -> Result<(), EventDecodeError> {
        let message = BusMessage::decode(channel, payload).map_err(|err| {
            tracing::warn!(channel, error = %err, "dropping undecodable bus message");
            err
        })?;
        self.dispatch(message);
        Ok(())
    }

    fn deliver(&self, message: &BusMessage) {
        match message {
            BusMessage::Critical(event) => {
                let handlers: Vec<CriticalHandler> = self
                    .critical
                    .borrow()
                    .iter()
                    .map(|(_, handler)| handler.clone())
                    .collect();
                for handler in handlers {
                    handler(event);
                }
            }
            BusMessage::Window(event) => {
                let handlers: Vec<WindowHandler> = self
                    .window
                    .borrow()
                    .iter()
                    .map(|(_, handler)| handler.clone())
                    .collect();
                for handler in handlers {
                    handler(event);
                }
            }
        }
    }
}

impl EventSink for EventBus {
    fn emit(&self, message: BusMessage) {
        self.dispatch(message);
    }
}
