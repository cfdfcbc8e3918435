//! The property mirror plugin
//!
//! Subscribes to each scene's component lifecycle and keeps the entities'
//! dynamic property bags pointing at their components under friendly names,
//! so scripts read `ent.mesh` instead of looking the component up by type.

use std::sync::Arc;

use tracing::{debug, trace};

use mir_scene::{
    ComponentEvent, PropertyValue, SceneAddedEvent, ScenePlugin, SceneRegistry,
};

use crate::config::{MirrorConfig, RemovalPolicy};
use crate::shorthand::ShorthandResolver;

/// Name the plugin registers under
pub const PLUGIN_NAME: &str = "property_mirror";

/// Mirrors components onto entity dynamic properties
///
/// Cloning is cheap; clones share the resolver. One mirror instance serves
/// every scene the registry announces.
#[derive(Clone)]
pub struct PropertyMirror {
    resolver: Arc<ShorthandResolver>,
    policy: RemovalPolicy,
}

impl PropertyMirror {
    /// Mirror with default configuration
    pub fn new() -> Self {
        Self::from_config(MirrorConfig::default())
    }

    /// Mirror configured from a validated [`MirrorConfig`]
    pub fn from_config(config: MirrorConfig) -> Self {
        Self {
            resolver: Arc::new(ShorthandResolver::with_extras(config.extra_shorthands)),
            policy: config.removal,
        }
    }

    /// The active removal policy
    pub fn policy(&self) -> RemovalPolicy {
        self.policy
    }

    /// The resolver in use
    pub fn resolver(&self) -> &ShorthandResolver {
        &self.resolver
    }

    /// Handle a component-added event
    ///
    /// First come, first served: if the resolved name is already a property
    /// on the entity, the new component is not mirrored. It stays reachable
    /// through the entity's component list, consistent with how the host's
    /// single-component lookup behaves.
    pub fn on_component_added(&self, ev: &ComponentEvent) {
        let prop = self.resolver.resolve(ev.component.type_name());

        if ev.entity.has_property(prop) {
            trace!(
                scene = %ev.scene,
                plugin = PLUGIN_NAME,
                "'{}' already bound on entity {}, keeping existing reference",
                prop,
                ev.entity.id()
            );
            return;
        }

        ev.entity
            .set_property(prop, PropertyValue::Component(Arc::clone(&ev.component)));
        debug!(
            scene = %ev.scene,
            plugin = PLUGIN_NAME,
            "bound '{}' -> component {} on entity {}",
            prop,
            ev.component.id(),
            ev.entity.id()
        );
    }

    /// Handle a component-removed event according to the removal policy
    pub fn on_component_removed(&self, ev: &ComponentEvent) {
        let prop = self.resolver.resolve(ev.component.type_name());

        match self.policy {
            RemovalPolicy::Legacy => {
                // Guard has the same polarity as the added handler: act only
                // when the name is absent. Assigning the invalid marker then
                // clears any stale value, and a present property is left
                // untouched.
                if !ev.entity.has_property(prop) {
                    ev.entity.set_property(prop, PropertyValue::Invalid);
                    trace!(
                        scene = %ev.scene,
                        plugin = PLUGIN_NAME,
                        "cleared absent '{}' on entity {}",
                        prop,
                        ev.entity.id()
                    );
                }
            }
            RemovalPolicy::ClearPresent => {
                // Clear only when the bag still points at this exact
                // instance; a never-mirrored duplicate going away must not
                // drop the first-registered reference.
                let mirrored_here = ev
                    .entity
                    .property(prop)
                    .and_then(|v| v.as_component().map(|c| c.id()))
                    .is_some_and(|id| id == ev.component.id());

                if mirrored_here {
                    ev.entity.set_property(prop, PropertyValue::Invalid);
                    debug!(
                        scene = %ev.scene,
                        plugin = PLUGIN_NAME,
                        "unbound '{}' from entity {}",
                        prop,
                        ev.entity.id()
                    );
                }
            }
        }
    }

    fn connect_to_scene(&self, ev: &SceneAddedEvent) {
        debug!(
            scene = %ev.name,
            plugin = PLUGIN_NAME,
            "subscribing to component lifecycle"
        );

        let added = self.clone();
        ev.scene
            .events()
            .on_component_added(move |ev| added.on_component_added(ev));

        let removed = self.clone();
        ev.scene
            .events()
            .on_component_removed(move |ev| removed.on_component_removed(ev));
    }
}

impl Default for PropertyMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenePlugin for PropertyMirror {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn attach(&self, registry: &Arc<SceneRegistry>) {
        let mirror = self.clone();
        registry
            .lifecycle()
            .on_scene_added(move |ev| mirror.connect_to_scene(ev));
    }
}
