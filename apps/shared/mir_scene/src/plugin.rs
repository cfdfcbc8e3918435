//! Plugin registration seam
//!
//! A scene plugin is an observer object registered by name at load. The host
//! hands it the registry once, during `attach`; everything after that runs
//! through whatever event subscriptions the plugin set up. There is no
//! detach path: plugin lifetime equals host lifetime, and teardown is the
//! host's business.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::registry::SceneRegistry;

/// An observer plugin that binds itself to scene lifecycle events
pub trait ScenePlugin: Send + Sync {
    /// Stable name the plugin is registered under
    fn name(&self) -> &str;

    /// Called once at registration with the registry to subscribe against
    fn attach(&self, registry: &Arc<SceneRegistry>);
}

/// Holds registered plugins and runs their attachment
pub struct PluginHost {
    registry: Arc<SceneRegistry>,
    plugins: RwLock<HashMap<String, Arc<dyn ScenePlugin>>>,
}

impl PluginHost {
    /// Create a plugin host bound to a registry
    pub fn new(registry: Arc<SceneRegistry>) -> Self {
        Self {
            registry,
            plugins: RwLock::new(HashMap::new()),
        }
    }

    /// Register a plugin by its name and attach it immediately
    ///
    /// Re-registering a name replaces the stored handle but does not undo
    /// the previous plugin's subscriptions; registering twice is a host
    /// configuration error, not something guarded here.
    pub fn register(&self, plugin: Arc<dyn ScenePlugin>) {
        let name = plugin.name().to_string();
        plugin.attach(&self.registry);
        info!(plugin = %name, "plugin attached");
        self.plugins.write().unwrap().insert(name, plugin);
    }

    /// Look up a registered plugin by name
    pub fn plugin(&self, name: &str) -> Option<Arc<dyn ScenePlugin>> {
        self.plugins.read().unwrap().get(name).cloned()
    }

    /// Names of all registered plugins
    pub fn list(&self) -> Vec<String> {
        self.plugins.read().unwrap().keys().cloned().collect()
    }

    /// The registry plugins were attached to
    pub fn registry(&self) -> &Arc<SceneRegistry> {
        &self.registry
    }
}
