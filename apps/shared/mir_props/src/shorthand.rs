//! Shorthand names for native component types
//!
//! Types not listed in the built-in table keep their native identifier as
//! the property name, e.g. `ent.EC_NetworkPosition`.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in shorthand aliases, fixed at load
static BUILTIN_SHORTHAND: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("EC_OgrePlaceable", "placeable"),
        ("EC_OgreMesh", "mesh"),
        ("EC_OgreCamera", "camera"),
        ("EC_OgreAnimationController", "animationcontroller"),
        ("EC_Highlight", "highlight"),
        ("EC_Touchable", "touchable"),
    ])
});

/// Resolves a component's native type identifier to its property name
///
/// Built once from the built-in table plus any configured extra aliases;
/// immutable afterwards. `resolve` is total: every identifier maps to
/// something, falling back to the identifier itself.
#[derive(Debug, Default)]
pub struct ShorthandResolver {
    extras: HashMap<String, String>,
}

impl ShorthandResolver {
    /// Resolver with only the built-in aliases
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolver with extra aliases layered behind the built-ins
    ///
    /// Built-in aliases take precedence; an extra entry for a built-in key
    /// is ignored so the six canonical names are stable regardless of
    /// configuration.
    pub fn with_extras(extras: HashMap<String, String>) -> Self {
        Self { extras }
    }

    /// Resolve a native type identifier to the property name to use
    pub fn resolve<'a>(&'a self, type_name: &'a str) -> &'a str {
        if let Some(alias) = BUILTIN_SHORTHAND.get(type_name) {
            return alias;
        }
        if let Some(alias) = self.extras.get(type_name) {
            return alias.as_str();
        }
        type_name
    }

    /// Whether the identifier has any alias (built-in or extra)
    pub fn has_alias(&self, type_name: &str) -> bool {
        BUILTIN_SHORTHAND.contains_key(type_name) || self.extras.contains_key(type_name)
    }
}
