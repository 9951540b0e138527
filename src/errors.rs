use crate::{
    components::{resolver::ResolverError, signing::SigningError},
    config::ConfigError,
    quality::QualityError,
    sensors::SceneNameError,
};

pub type Result<T> = std::result::Result<T, EobandsError>;

#[derive(thiserror::Error, Debug)]
pub enum EobandsError {
    #[error(transparent)]
    Resolver(#[from] ResolverError),
    #[error(transparent)]
    SceneName(#[from] SceneNameError),
    #[error(transparent)]
    Signing(#[from] SigningError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Quality(#[from] QualityError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Asset inventory could not be parsed: {0}")]
    InvalidInventory(#[from] serde_json::Error),
}
