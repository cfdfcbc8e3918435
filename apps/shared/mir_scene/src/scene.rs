//! Scene: entity ownership and component lifecycle
//!
//! A scene owns its entities and is the only place components get attached
//! or detached. Every attach/detach emits a typed event through the scene's
//! [`ComponentEventHub`] so observer plugins stay in sync without polling.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, trace};

use crate::component::{ChangeKind, Component, ComponentId};
use crate::entity::{Entity, EntityId};
use crate::error::{Result, SceneError};
use crate::events::{ComponentEvent, ComponentEventHub};

/// A named scene holding entities
pub struct Scene {
    name: String,
    entities: RwLock<HashMap<EntityId, Arc<Entity>>>,
    next_entity_id: AtomicU64,
    events: ComponentEventHub,
}

impl Scene {
    pub(crate) fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            entities: RwLock::new(HashMap::new()),
            next_entity_id: AtomicU64::new(1),
            events: ComponentEventHub::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scene's component lifecycle event hub
    pub fn events(&self) -> &ComponentEventHub {
        &self.events
    }

    /// Create a new empty entity
    pub fn create_entity(&self) -> Arc<Entity> {
        let id = EntityId(self.next_entity_id.fetch_add(1, Ordering::Relaxed));
        let entity = Entity::new(id);
        self.entities.write().unwrap().insert(id, Arc::clone(&entity));
        trace!(scene = %self.name, "entity {} created", id);
        entity
    }

    /// Look up an entity by id
    pub fn entity(&self, id: EntityId) -> Option<Arc<Entity>> {
        self.entities.read().unwrap().get(&id).cloned()
    }

    /// Number of entities currently in the scene
    pub fn entity_count(&self) -> usize {
        self.entities.read().unwrap().len()
    }

    /// Destroy an entity, detaching all of its components first
    ///
    /// Each detached component emits a component-removed event, so observers
    /// see entity destruction as a sequence of ordinary removals.
    pub fn remove_entity(&self, id: EntityId, change: ChangeKind) -> Result<()> {
        let entity = self
            .entities
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(SceneError::EntityNotFound(id.0))?;

        for component in entity.components() {
            self.remove_component(&entity, component.id(), change)?;
        }

        self.entities.write().unwrap().remove(&id);
        debug!(scene = %self.name, "entity {} removed", id);
        Ok(())
    }

    /// Attach a component to an entity and emit component-added
    pub fn add_component(
        &self,
        entity: &Arc<Entity>,
        component: Arc<Component>,
        change: ChangeKind,
    ) -> Result<()> {
        if !self.entities.read().unwrap().contains_key(&entity.id()) {
            return Err(SceneError::EntityNotFound(entity.id().0));
        }

        entity.attach(Arc::clone(&component));
        debug!(
            scene = %self.name,
            "component {} ({}) added to entity {}",
            component.id(),
            component.type_name(),
            entity.id()
        );

        self.events.emit_added(&ComponentEvent {
            scene: self.name.clone(),
            entity: Arc::clone(entity),
            component,
            change,
        });
        Ok(())
    }

    /// Detach a component from an entity and emit component-removed
    ///
    /// The event carries the detached component, still alive, so handlers
    /// can inspect it one last time.
    pub fn remove_component(
        &self,
        entity: &Arc<Entity>,
        component_id: ComponentId,
        change: ChangeKind,
    ) -> Result<()> {
        let component = entity
            .detach(component_id)
            .ok_or(SceneError::ComponentNotAttached {
                entity: entity.id().0,
                component: component_id.0,
            })?;

        debug!(
            scene = %self.name,
            "component {} ({}) removed from entity {}",
            component.id(),
            component.type_name(),
            entity.id()
        );

        self.events.emit_removed(&ComponentEvent {
            scene: self.name.clone(),
            entity: Arc::clone(entity),
            component,
            change,
        });
        Ok(())
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entity_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_component_emits_added_event() {
        let scene = Scene::new("world");
        let seen = Arc::new(RwLock::new(Vec::new()));

        {
            let seen = Arc::clone(&seen);
            scene.events().on_component_added(move |ev| {
                seen.write()
                    .unwrap()
                    .push((ev.entity.id(), ev.component.type_name().to_string()));
            });
        }

        let entity = scene.create_entity();
        let comp = Component::new("EC_OgreMesh");
        scene
            .add_component(&entity, comp, ChangeKind::Default)
            .unwrap();

        let seen = seen.read().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0], (entity.id(), "EC_OgreMesh".to_string()));
    }

    #[test]
    fn test_remove_component_emits_removed_event() {
        let scene = Scene::new("world");
        let removed = Arc::new(RwLock::new(Vec::new()));

        {
            let removed = Arc::clone(&removed);
            scene.events().on_component_removed(move |ev| {
                removed.write().unwrap().push(ev.component.id());
            });
        }

        let entity = scene.create_entity();
        let comp = Component::new("EC_OgreMesh");
        let comp_id = comp.id();
        scene
            .add_component(&entity, comp, ChangeKind::Default)
            .unwrap();
        scene
            .remove_component(&entity, comp_id, ChangeKind::Default)
            .unwrap();

        assert_eq!(removed.read().unwrap().as_slice(), [comp_id]);
        assert!(entity.components().is_empty());
    }

    #[test]
    fn test_remove_unattached_component_fails() {
        let scene = Scene::new("world");
        let entity = scene.create_entity();

        let err = scene
            .remove_component(&entity, ComponentId(12345), ChangeKind::Default)
            .unwrap_err();
        assert!(matches!(err, SceneError::ComponentNotAttached { .. }));
    }

    #[test]
    fn test_remove_entity_detaches_all_components() {
        let scene = Scene::new("world");
        let removed = Arc::new(RwLock::new(Vec::new()));

        {
            let removed = Arc::clone(&removed);
            scene.events().on_component_removed(move |ev| {
                removed.write().unwrap().push(ev.component.id());
            });
        }

        let entity = scene.create_entity();
        let mesh = Component::new("EC_OgreMesh");
        let placeable = Component::new("EC_OgrePlaceable");
        scene
            .add_component(&entity, Arc::clone(&mesh), ChangeKind::Default)
            .unwrap();
        scene
            .add_component(&entity, Arc::clone(&placeable), ChangeKind::Default)
            .unwrap();

        scene.remove_entity(entity.id(), ChangeKind::Default).unwrap();

        assert_eq!(scene.entity_count(), 0);
        assert_eq!(removed.read().unwrap().as_slice(), [mesh.id(), placeable.id()]);
    }

    #[test]
    fn test_add_component_to_foreign_entity_fails() {
        let scene_a = Scene::new("a");
        let scene_b = Scene::new("b");

        let foreign = scene_b.create_entity();
        let err = scene_a
            .add_component(&foreign, Component::new("EC_OgreMesh"), ChangeKind::Default)
            .unwrap_err();
        assert!(matches!(err, SceneError::EntityNotFound(_)));
    }
}
