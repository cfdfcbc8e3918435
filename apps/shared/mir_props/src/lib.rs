//! Component Property Mirror
//!
//! Mirrors an entity's native components onto dynamically-named properties
//! on the entity's script-facing property bag, so scripting code can reach
//! e.g. the placeable component as `ent.placeable` instead of going through
//! a lookup-by-type call.
//!
//! # Architecture
//!
//! - **ShorthandResolver**: maps native type identifiers to short property
//!   names via a fixed table, identity for everything else
//! - **PropertyMirror**: the scene plugin; on component-added it binds the
//!   resolved property name to the component (first one wins), on
//!   component-removed it applies the configured [`RemovalPolicy`]
//! - **MirrorConfig**: schema-validated JSON configuration

pub mod config;
pub mod mirror;
pub mod shorthand;

pub use config::{MirrorConfig, RemovalPolicy};
pub use mirror::PropertyMirror;
pub use shorthand::ShorthandResolver;
