//! Components attachable to scene entities
//!
//! A component carries a native type identifier (e.g. `EC_OgreMesh`), an
//! optional instance name, and live attribute data stored as JSON. Plugins
//! hold components through `Arc`, so a reference handed out in an event sees
//! the component's current attribute state, not a snapshot.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Counter for process-wide unique component instance ids
static NEXT_COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identity of a component instance
///
/// Two components of the same native type are distinct instances; identity
/// comparisons (e.g. "is this the component currently mirrored under this
/// property name?") go through this id, never through the type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentId(pub u64);

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a scene change originated
///
/// Carried by component lifecycle events. Observers that only mirror state
/// receive it for logging; replication-aware hosts branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Use the component's default change handling
    #[default]
    Default,
    /// Change should be replicated to other participants
    Replicate,
    /// Change is local to this process only
    LocalOnly,
    /// Change originated from a disconnect/teardown
    Disconnected,
}

/// A component attached to exactly one entity at a time
///
/// The host owns the component; plugins only hold transient `Arc` references
/// passed into their event handlers. Attribute data is JSON so that script
/// runtimes of any language can read it without a per-type binding.
pub struct Component {
    id: ComponentId,
    type_name: String,
    name: String,
    attributes: RwLock<serde_json::Map<String, serde_json::Value>>,
}

impl Component {
    /// Create a new unnamed component of the given native type
    pub fn new(type_name: impl Into<String>) -> Arc<Self> {
        Self::named(type_name, "")
    }

    /// Create a new component with an instance name
    pub fn named(type_name: impl Into<String>, name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            id: ComponentId(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed)),
            type_name: type_name.into(),
            name: name.into(),
            attributes: RwLock::new(serde_json::Map::new()),
        })
    }

    /// Unique instance id
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Native type identifier (e.g. "EC_OgreMesh")
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Instance name (may be empty)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read an attribute value
    pub fn attribute(&self, key: &str) -> Option<serde_json::Value> {
        self.attributes.read().unwrap().get(key).cloned()
    }

    /// Set an attribute value
    pub fn set_attribute(&self, key: impl Into<String>, value: serde_json::Value) {
        self.attributes.write().unwrap().insert(key.into(), value);
    }

    /// Snapshot of all attributes
    pub fn attributes(&self) -> serde_json::Map<String, serde_json::Value> {
        self.attributes.read().unwrap().clone()
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("type_name", &self.type_name)
            .field("name", &self.name)
            .finish()
    }
}
