mod explorer;

pub use explorer::{extract_source, ExplorerFetcher};

use async_trait::async_trait;
use ethers_core::types::Address;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("couldn't build address url: {0}")]
    Url(#[from] url::ParseError),
    #[error("couldn't fetch the page: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("not found")]
    NotFound,
    #[error("source element has no text content")]
    EmptyContent,
}

#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Returns the unescaped contract source published for `address`.
    async fn fetch_source(&self, address: &Address) -> Result<String, FetchError>;
}
