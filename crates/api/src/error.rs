use introspect::KeyMaterialError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("signing key could not be loaded: {0}")]
    KeyMaterial(#[from] KeyMaterialError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
