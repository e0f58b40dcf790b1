//! Named-event publish/subscribe bus.
//!
//! [`EventBus`] is an explicitly constructed listener registry keyed by
//! event name. Each name maps to an ordered list of callbacks, each either
//! persistent ([`EventBus::on`]) or one-shot ([`EventBus::once`]). Clones
//! share the same registry, so the bus is created once at startup and
//! handed to everything that publishes or subscribes.
//!
//! Callbacks are synchronous and run on the emitting thread, outside the
//! registry lock. They may register listeners or emit further events.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::ws::messages::InboundMessage;
use crate::ws::socket::SocketRef;

/// Data delivered to listeners alongside an event.
#[derive(Debug, Clone)]
pub enum BusPayload {
    /// Plain JSON data, typically the answer to a data request.
    Data(serde_json::Value),
    /// A client message republished with its originating socket.
    Passthrough(Passthrough),
}

/// Passthrough payload: the full inbound message and a back-reference to
/// the socket it arrived on.
#[derive(Debug, Clone)]
pub struct Passthrough {
    /// The parsed client message.
    pub message: InboundMessage,
    /// The socket the message arrived on.
    pub socket: SocketRef,
}

/// Identifies a single registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Arc<dyn Fn(Option<&BusPayload>) + Send + Sync>;

struct Listener {
    id: ListenerId,
    once: bool,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    listeners: Mutex<HashMap<String, Vec<Listener>>>,
    next_id: AtomicU64,
}

/// Process-wide event bus handle.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Registry>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.registry.listeners.lock().len();
        f.debug_struct("EventBus")
            .field("event_names", &names)
            .finish()
    }
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a persistent listener for `name`.
    pub fn on<F>(&self, name: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(Option<&BusPayload>) + Send + Sync + 'static,
    {
        self.register(name.into(), false, Arc::new(callback))
    }

    /// Registers a listener that fires on the next emit of `name` only.
    pub fn once<F>(&self, name: impl Into<String>, callback: F) -> ListenerId
    where
        F: Fn(Option<&BusPayload>) + Send + Sync + 'static,
    {
        self.register(name.into(), true, Arc::new(callback))
    }

    fn register(&self, name: String, once: bool, callback: Callback) -> ListenerId {
        let id = ListenerId(self.registry.next_id.fetch_add(1, Ordering::Relaxed));
        self.registry
            .listeners
            .lock()
            .entry(name)
            .or_default()
            .push(Listener { id, once, callback });
        id
    }

    /// Removes every listener registered for `name`.
    ///
    /// Returns the number of listeners removed.
    pub fn off(&self, name: &str) -> usize {
        self.registry
            .listeners
            .lock()
            .remove(name)
            .map_or(0, |list| list.len())
    }

    /// Removes a single listener. Returns `true` if it was still registered.
    pub fn remove(&self, name: &str, id: ListenerId) -> bool {
        let mut map = self.registry.listeners.lock();
        let Some(list) = map.get_mut(name) else {
            return false;
        };
        let before = list.len();
        list.retain(|l| l.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            map.remove(name);
        }
        removed
    }

    /// Emits `name`, invoking its listeners in registration order.
    ///
    /// Every persistent listener fires, but only the oldest one-shot
    /// listener does; later one-shot listeners wait for later emits. The
    /// chosen one-shot listener is deregistered before any callback runs,
    /// so it fires at most once even under re-entrant or concurrent emits.
    /// Returns the number of listeners invoked.
    pub fn emit(&self, name: &str, payload: Option<BusPayload>) -> usize {
        let callbacks: Vec<Callback> = {
            let mut map = self.registry.listeners.lock();
            let Some(list) = map.get_mut(name) else {
                tracing::trace!(event = name, "emit with no listeners");
                return 0;
            };
            let oldest_once = list.iter().find(|l| l.once).map(|l| l.id);
            let callbacks: Vec<Callback> = list
                .iter()
                .filter(|l| !l.once || Some(l.id) == oldest_once)
                .map(|l| Arc::clone(&l.callback))
                .collect();
            if let Some(id) = oldest_once {
                list.retain(|l| l.id != id);
            }
            if list.is_empty() {
                map.remove(name);
            }
            callbacks
        };

        tracing::trace!(event = name, listeners = callbacks.len(), "emit");
        for callback in &callbacks {
            callback(payload.as_ref());
        }
        callbacks.len()
    }

    /// Returns the number of listeners currently registered for `name`.
    #[must_use]
    pub fn listeners(&self, name: &str) -> usize {
        self.registry
            .listeners
            .lock()
            .get(name)
            .map_or(0, Vec::len)
    }

    /// Returns `true` if at least one listener is registered for `name`.
    #[must_use]
    pub fn has_listeners(&self, name: &str) -> bool {
        self.listeners(name) > 0
    }

    /// Builds a gate that runs `callback` once every name in `names` (and
    /// any later [`RequiredEvents::add`]ed name) has been emitted.
    ///
    /// With no names the callback runs immediately.
    pub fn required<F>(&self, names: &[&str], callback: F) -> RequiredEvents
    where
        F: FnOnce() + Send + 'static,
    {
        let gate = RequiredEvents {
            bus: self.clone(),
            state: Arc::new(Mutex::new(GateState {
                pending: HashMap::new(),
                callback: Some(Box::new(callback)),
                fired: false,
            })),
        };
        for name in names {
            gate.add(name);
        }
        gate.fire_if_ready();
        gate
    }
}

struct GateState {
    pending: HashMap<String, ListenerId>,
    callback: Option<Box<dyn FnOnce() + Send>>,
    fired: bool,
}

/// Handle to a pending [`EventBus::required`] gate.
#[derive(Clone)]
pub struct RequiredEvents {
    bus: EventBus,
    state: Arc<Mutex<GateState>>,
}

impl fmt::Debug for RequiredEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("RequiredEvents")
            .field("pending", &state.pending.keys().collect::<Vec<_>>())
            .field("fired", &state.fired)
            .finish()
    }
}

impl RequiredEvents {
    /// Adds `name` to the set of events that must fire.
    ///
    /// Ignored once the gate has fired or been cancelled.
    pub fn add(&self, name: &str) {
        // Registering under the gate lock keeps an emit racing this call
        // from seeing an empty pending set.
        let mut state = self.state.lock();
        if state.callback.is_none() || state.pending.contains_key(name) {
            return;
        }

        let gate = Arc::clone(&self.state);
        let owned = name.to_string();
        let id = self.bus.once(name, move |_| {
            let ready = {
                let mut state = gate.lock();
                state.pending.remove(&owned);
                take_if_ready(&mut state)
            };
            if let Some(callback) = ready {
                callback();
            }
        });
        state.pending.insert(name.to_string(), id);
    }

    /// Abandons the gate: the callback will never run and the gate's
    /// listeners are removed from the bus. Other listeners on the same
    /// names are left alone.
    pub fn cancel(&self) {
        let pending: Vec<(String, ListenerId)> = {
            let mut state = self.state.lock();
            state.callback = None;
            state.pending.drain().collect()
        };
        for (name, id) in pending {
            self.bus.remove(&name, id);
        }
    }

    /// Returns the names still outstanding.
    #[must_use]
    pub fn pending(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().pending.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns `true` once the callback has run.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.lock().fired
    }

    fn fire_if_ready(&self) {
        let ready = take_if_ready(&mut self.state.lock());
        if let Some(callback) = ready {
            callback();
        }
    }
}

fn take_if_ready(state: &mut GateState) -> Option<Box<dyn FnOnce() + Send>> {
    if !state.pending.is_empty() {
        return None;
    }
    let callback = state.callback.take()?;
    state.fired = true;
    Some(callback)
}
