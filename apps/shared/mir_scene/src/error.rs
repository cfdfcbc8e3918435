use thiserror::Error;

pub type Result<T> = std::result::Result<T, SceneError>;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Scene '{0}' already exists")]
    SceneExists(String),

    #[error("Scene '{0}' not found")]
    SceneNotFound(String),

    #[error("Entity {0} not found")]
    EntityNotFound(u64),

    #[error("Component {component} not attached to entity {entity}")]
    ComponentNotAttached { entity: u64, component: u64 },
}
