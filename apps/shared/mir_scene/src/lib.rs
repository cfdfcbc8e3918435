//! Mirador Scene Model
//!
//! Provides the host-side scene surface that plugins observe: scenes owning
//! entities, components attached to entities, and typed lifecycle events.
//! This crate is shared between the host harness and every plugin.
//!
//! # Architecture
//!
//! - **SceneRegistry**: Named scenes plus a scene-added lifecycle event
//! - **Scene**: Owns entities, attaches/detaches components, emits typed
//!   component-added/component-removed events
//! - **Entity**: A component list plus a dynamic property bag keyed by string
//! - **ScenePlugin / PluginHost**: Registration seam for observer plugins
//!
//! Event registration is fully typed: a handler subscribes to a concrete
//! event with a closure taking a concrete payload struct, so a signature
//! mismatch is a compile error rather than a silently dead string binding.

pub mod component;
pub mod entity;
pub mod error;
pub mod events;
pub mod plugin;
pub mod registry;
pub mod scene;

pub use component::{ChangeKind, Component, ComponentId};
pub use entity::{Entity, EntityId, PropertyValue};
pub use error::{Result, SceneError};
pub use events::{ComponentEvent, ComponentEventHub, HandlerId, SceneAddedEvent, SceneAddedHub};
pub use plugin::{PluginHost, ScenePlugin};
pub use registry::SceneRegistry;
pub use scene::Scene;
