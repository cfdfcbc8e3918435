//! Scene entities and their dynamic property bag
//!
//! Besides the host-managed component list, every entity carries a bag of
//! dynamically-named properties that scripting code reads attribute-style.
//! A property value is a tagged variant: either a live component reference
//! or the invalid marker. Setting the invalid marker removes the property,
//! matching the host contract that an invalid value clears a dynamic
//! property rather than storing it.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::component::{Component, ComponentId};

/// Unique entity id within a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value stored under a dynamic property name
#[derive(Clone)]
pub enum PropertyValue {
    /// A live reference to a component attached to this entity
    Component(Arc<Component>),
    /// The clearing sentinel; assigning it removes the property
    Invalid,
}

impl PropertyValue {
    /// Whether this value holds a live reference
    pub fn is_valid(&self) -> bool {
        matches!(self, PropertyValue::Component(_))
    }

    /// The referenced component, if any
    pub fn as_component(&self) -> Option<&Arc<Component>> {
        match self {
            PropertyValue::Component(comp) => Some(comp),
            PropertyValue::Invalid => None,
        }
    }
}

impl std::fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyValue::Component(comp) => {
                write!(f, "Component({} #{})", comp.type_name(), comp.id())
            }
            PropertyValue::Invalid => write!(f, "Invalid"),
        }
    }
}

/// A scene object with a component list and a dynamic property bag
///
/// Entities are created and destroyed only by their owning [`Scene`]. The
/// component list is the host's source of truth for attachment; the property
/// bag is a convenience view maintained by observer plugins and scripts.
///
/// [`Scene`]: crate::scene::Scene
pub struct Entity {
    id: EntityId,
    components: RwLock<Vec<Arc<Component>>>,
    properties: RwLock<HashMap<String, PropertyValue>>,
}

impl Entity {
    pub(crate) fn new(id: EntityId) -> Arc<Self> {
        Arc::new(Self {
            id,
            components: RwLock::new(Vec::new()),
            properties: RwLock::new(HashMap::new()),
        })
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// All components currently attached, in attachment order
    pub fn components(&self) -> Vec<Arc<Component>> {
        self.components.read().unwrap().clone()
    }

    /// First attached component of the given native type
    ///
    /// First-attached wins, matching the host's single-component lookup.
    pub fn component_by_type(&self, type_name: &str) -> Option<Arc<Component>> {
        self.components
            .read()
            .unwrap()
            .iter()
            .find(|c| c.type_name() == type_name)
            .cloned()
    }

    pub(crate) fn attach(&self, component: Arc<Component>) {
        self.components.write().unwrap().push(component);
    }

    pub(crate) fn detach(&self, component_id: ComponentId) -> Option<Arc<Component>> {
        let mut components = self.components.write().unwrap();
        let pos = components.iter().position(|c| c.id() == component_id)?;
        Some(components.remove(pos))
    }

    /// Names of all dynamic properties currently present
    pub fn dynamic_property_names(&self) -> HashSet<String> {
        self.properties.read().unwrap().keys().cloned().collect()
    }

    /// Whether a dynamic property is currently present
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.read().unwrap().contains_key(name)
    }

    /// Read a dynamic property
    pub fn property(&self, name: &str) -> Option<PropertyValue> {
        self.properties.read().unwrap().get(name).cloned()
    }

    /// Set a dynamic property
    ///
    /// Assigning [`PropertyValue::Invalid`] removes the property; any stale
    /// entry under that name is dropped.
    pub fn set_property(&self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        let mut properties = self.properties.write().unwrap();
        match value {
            PropertyValue::Invalid => {
                properties.remove(&name);
            }
            value => {
                properties.insert(name, value);
            }
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("components", &self.components.read().unwrap().len())
            .field("properties", &self.dynamic_property_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_set_and_read() {
        let entity = Entity::new(EntityId(1));
        let comp = Component::new("EC_OgreMesh");

        entity.set_property("mesh", PropertyValue::Component(Arc::clone(&comp)));

        assert!(entity.has_property("mesh"));
        let stored = entity.property("mesh").unwrap();
        assert_eq!(stored.as_component().unwrap().id(), comp.id());
    }

    #[test]
    fn test_invalid_value_removes_property() {
        let entity = Entity::new(EntityId(1));
        let comp = Component::new("EC_OgreMesh");

        entity.set_property("mesh", PropertyValue::Component(comp));
        assert!(entity.has_property("mesh"));

        entity.set_property("mesh", PropertyValue::Invalid);
        assert!(!entity.has_property("mesh"));
        assert!(entity.property("mesh").is_none());
    }

    #[test]
    fn test_invalid_on_absent_property_is_harmless() {
        let entity = Entity::new(EntityId(1));

        entity.set_property("mesh", PropertyValue::Invalid);
        assert!(!entity.has_property("mesh"));
        assert!(entity.dynamic_property_names().is_empty());
    }

    #[test]
    fn test_component_by_type_first_attached_wins() {
        let entity = Entity::new(EntityId(1));
        let first = Component::new("EC_OgreMesh");
        let second = Component::new("EC_OgreMesh");

        entity.attach(Arc::clone(&first));
        entity.attach(Arc::clone(&second));

        assert_eq!(
            entity.component_by_type("EC_OgreMesh").unwrap().id(),
            first.id()
        );
    }

    #[test]
    fn test_detach_unknown_component_returns_none() {
        let entity = Entity::new(EntityId(1));
        assert!(entity.detach(ComponentId(999)).is_none());
    }
}
