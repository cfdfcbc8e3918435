//! Typed scene lifecycle events
//!
//! Provides event hubs that plugins register handlers against. Handlers are
//! called sequentially, on the dispatching thread, in registration order.
//!
//! # Architecture
//!
//! - **Registration**: Plugins register handlers during `attach()`.
//! - **Persistence**: Registrations persist for the life of the hub; the
//!   host tears hubs down together with their scene.
//! - **Dispatch**: Synchronous, run-to-completion, no suspension points.
//!
//! Each hub is typed to one event payload, so subscribing a handler with the
//! wrong signature fails at compile time instead of leaving a dead
//! string-keyed binding behind.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::component::{ChangeKind, Component};
use crate::entity::Entity;
use crate::scene::Scene;

/// Unique handler id, usable for later removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

/// Payload for component-added and component-removed events
#[derive(Clone)]
pub struct ComponentEvent {
    /// Name of the scene the change happened in
    pub scene: String,
    /// The entity the component was attached to / detached from
    pub entity: Arc<Entity>,
    /// The component in question (still alive on removal)
    pub component: Arc<Component>,
    /// How the change originated
    pub change: ChangeKind,
}

/// Payload for the scene-added lifecycle event
#[derive(Clone)]
pub struct SceneAddedEvent {
    /// Name the scene was registered under
    pub name: String,
    /// Handle to subscribe against
    pub scene: Arc<Scene>,
}

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// A typed event hub: handler registration plus synchronous dispatch
///
/// Generic core shared by the concrete hubs below. Handlers are stored with
/// a monotonically increasing id; dispatch snapshots the handler list so a
/// handler may register or unregister without deadlocking the hub.
struct EventHub<E> {
    handlers: RwLock<Vec<(HandlerId, Handler<E>)>>,
    next_handler_id: AtomicU64,
}

impl<E> EventHub<E> {
    fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            next_handler_id: AtomicU64::new(1),
        }
    }

    fn register(&self, handler: Handler<E>) -> HandlerId {
        let id = HandlerId(self.next_handler_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().unwrap().push((id, handler));
        id
    }

    fn unregister(&self, id: HandlerId) -> bool {
        let mut handlers = self.handlers.write().unwrap();
        if let Some(pos) = handlers.iter().position(|(hid, _)| *hid == id) {
            handlers.remove(pos);
            return true;
        }
        false
    }

    fn handler_count(&self) -> usize {
        self.handlers.read().unwrap().len()
    }

    fn emit(&self, event: &E) {
        // Snapshot under the read lock, call outside it
        let snapshot: Vec<Handler<E>> = self
            .handlers
            .read()
            .unwrap()
            .iter()
            .map(|(_, h)| Arc::clone(h))
            .collect();

        for handler in snapshot {
            handler(event);
        }
    }
}

/// Event hub for component lifecycle changes within one scene
///
/// One instance per scene, covering both the added and the removed event.
pub struct ComponentEventHub {
    added: EventHub<ComponentEvent>,
    removed: EventHub<ComponentEvent>,
}

impl ComponentEventHub {
    pub(crate) fn new() -> Self {
        Self {
            added: EventHub::new(),
            removed: EventHub::new(),
        }
    }

    /// Register a handler for component-added events
    pub fn on_component_added<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&ComponentEvent) + Send + Sync + 'static,
    {
        self.added.register(Arc::new(handler))
    }

    /// Register a handler for component-removed events
    pub fn on_component_removed<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&ComponentEvent) + Send + Sync + 'static,
    {
        self.removed.register(Arc::new(handler))
    }

    /// Remove a previously registered component-added handler
    pub fn remove_added_handler(&self, id: HandlerId) -> bool {
        self.added.unregister(id)
    }

    /// Remove a previously registered component-removed handler
    pub fn remove_removed_handler(&self, id: HandlerId) -> bool {
        self.removed.unregister(id)
    }

    /// Number of registered component-added handlers
    pub fn added_handler_count(&self) -> usize {
        self.added.handler_count()
    }

    /// Number of registered component-removed handlers
    pub fn removed_handler_count(&self) -> usize {
        self.removed.handler_count()
    }

    pub(crate) fn emit_added(&self, event: &ComponentEvent) {
        self.added.emit(event);
    }

    pub(crate) fn emit_removed(&self, event: &ComponentEvent) {
        self.removed.emit(event);
    }
}

/// Event hub for the registry-level scene-added lifecycle event
pub struct SceneAddedHub {
    inner: EventHub<SceneAddedEvent>,
}

impl SceneAddedHub {
    pub(crate) fn new() -> Self {
        Self {
            inner: EventHub::new(),
        }
    }

    /// Register a handler called whenever a scene is added to the registry
    pub fn on_scene_added<F>(&self, handler: F) -> HandlerId
    where
        F: Fn(&SceneAddedEvent) + Send + Sync + 'static,
    {
        self.inner.register(Arc::new(handler))
    }

    /// Remove a previously registered handler
    pub fn remove_handler(&self, id: HandlerId) -> bool {
        self.inner.unregister(id)
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.inner.handler_count()
    }

    pub(crate) fn emit(&self, event: &SceneAddedEvent) {
        self.inner.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_handler_registration_and_counts() {
        let hub = ComponentEventHub::new();

        let id1 = hub.on_component_added(|_| {});
        let id2 = hub.on_component_added(|_| {});
        hub.on_component_removed(|_| {});

        assert_ne!(id1, id2);
        assert_eq!(hub.added_handler_count(), 2);
        assert_eq!(hub.removed_handler_count(), 1);
    }

    #[test]
    fn test_handler_unregistration() {
        let hub = ComponentEventHub::new();

        let id = hub.on_component_added(|_| {});
        assert_eq!(hub.added_handler_count(), 1);

        assert!(hub.remove_added_handler(id));
        assert_eq!(hub.added_handler_count(), 0);

        // Second unregister should fail
        assert!(!hub.remove_added_handler(id));
    }

    #[test]
    fn test_dispatch_reaches_all_handlers_in_order() {
        let hub = SceneAddedHub::new();
        let calls = Arc::new(RwLock::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let calls = Arc::clone(&calls);
            hub.on_scene_added(move |ev| {
                calls.write().unwrap().push(format!("{}:{}", tag, ev.name));
            });
        }

        let scene = Scene::new("world");
        hub.emit(&SceneAddedEvent {
            name: "world".to_string(),
            scene,
        });

        let calls = calls.read().unwrap();
        assert_eq!(
            calls.as_slice(),
            ["first:world", "second:world", "third:world"]
        );
    }

    #[test]
    fn test_added_and_removed_hubs_are_independent() {
        let hub = ComponentEventHub::new();
        let added_calls = Arc::new(AtomicUsize::new(0));
        let removed_calls = Arc::new(AtomicUsize::new(0));

        {
            let added_calls = Arc::clone(&added_calls);
            hub.on_component_added(move |_| {
                added_calls.fetch_add(1, Ordering::Relaxed);
            });
        }
        {
            let removed_calls = Arc::clone(&removed_calls);
            hub.on_component_removed(move |_| {
                removed_calls.fetch_add(1, Ordering::Relaxed);
            });
        }

        let entity = crate::entity::Entity::new(crate::entity::EntityId(1));
        let event = ComponentEvent {
            scene: "world".to_string(),
            entity,
            component: Component::new("EC_OgreMesh"),
            change: ChangeKind::Default,
        };

        hub.emit_added(&event);
        hub.emit_added(&event);
        hub.emit_removed(&event);

        assert_eq!(added_calls.load(Ordering::Relaxed), 2);
        assert_eq!(removed_calls.load(Ordering::Relaxed), 1);
    }
}
