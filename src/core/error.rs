use thiserror::Error;

#[derive(Error, Debug)]
pub enum TideholdError {
    #[error("Item not found: {0:?}")]
    ItemNotFound(crate::core::types::ItemId),

    #[error("Agent not found: {0:?}")]
    AgentNotFound(crate::core::types::AgentId),

    #[error("Vessel not found: {0:?}")]
    VesselNotFound(crate::core::types::VesselId),

    #[error("Prefab not found: {0}")]
    PrefabNotFound(String),

    #[error("Invalid prefab definition: {0}")]
    InvalidPrefab(String),

    #[error("No room in destination inventory")]
    InventoryFull,

    #[error("Item is not a container: {0:?}")]
    NotAContainer(crate::core::types::ItemId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TideholdError>;
