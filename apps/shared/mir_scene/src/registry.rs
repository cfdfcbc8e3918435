//! Scene registry and the scene-added lifecycle event
//!
//! The registry is the host's directory of named scenes. Plugins that need
//! per-scene subscriptions register a scene-added handler here; the event
//! carries the scene handle, so the handler can connect to the scene's own
//! hubs without a second lookup.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::info;

use crate::error::{Result, SceneError};
use crate::events::{SceneAddedEvent, SceneAddedHub};
use crate::scene::Scene;

/// Directory of named scenes
pub struct SceneRegistry {
    scenes: RwLock<HashMap<String, Arc<Scene>>>,
    scene_added: SceneAddedHub,
}

impl SceneRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scenes: RwLock::new(HashMap::new()),
            scene_added: SceneAddedHub::new(),
        })
    }

    /// Create and register a new scene, firing the scene-added event
    pub fn create_scene(&self, name: impl Into<String>) -> Result<Arc<Scene>> {
        let name = name.into();
        let scene = Scene::new(&name);
        {
            let mut scenes = self.scenes.write().unwrap();
            if scenes.contains_key(&name) {
                return Err(SceneError::SceneExists(name));
            }
            scenes.insert(name.clone(), Arc::clone(&scene));
        }

        // Emit outside the registry lock: handlers typically subscribe to
        // the new scene and may call back into the registry.
        info!(scene = %name, "scene added");
        self.scene_added.emit(&SceneAddedEvent {
            name,
            scene: Arc::clone(&scene),
        });
        Ok(scene)
    }

    /// Look up a scene by name
    pub fn scene(&self, name: &str) -> Option<Arc<Scene>> {
        self.scenes.read().unwrap().get(name).cloned()
    }

    /// Names of all registered scenes
    pub fn scene_names(&self) -> Vec<String> {
        self.scenes.read().unwrap().keys().cloned().collect()
    }

    /// The scene-added lifecycle hub
    pub fn lifecycle(&self) -> &SceneAddedHub {
        &self.scene_added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_lookup_scene() {
        let registry = SceneRegistry::new();
        let scene = registry.create_scene("world").unwrap();

        assert_eq!(scene.name(), "world");
        assert!(registry.scene("world").is_some());
        assert!(registry.scene("other").is_none());
    }

    #[test]
    fn test_duplicate_scene_rejected() {
        let registry = SceneRegistry::new();
        registry.create_scene("world").unwrap();

        let err = registry.create_scene("world").unwrap_err();
        assert!(matches!(err, SceneError::SceneExists(_)));
    }

    #[test]
    fn test_scene_added_fires_with_handle() {
        let registry = SceneRegistry::new();
        let seen = Arc::new(RwLock::new(Vec::new()));

        {
            let seen = Arc::clone(&seen);
            registry.lifecycle().on_scene_added(move |ev| {
                seen.write()
                    .unwrap()
                    .push((ev.name.clone(), ev.scene.name().to_string()));
            });
        }

        registry.create_scene("world").unwrap();
        registry.create_scene("lobby").unwrap();

        let seen = seen.read().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], ("world".to_string(), "world".to_string()));
        assert_eq!(seen[1], ("lobby".to_string(), "lobby".to_string()));
    }
}
