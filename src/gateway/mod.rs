//! Remote action gateway: the authoritative side of every optimistic write

pub mod http;

use async_trait::async_trait;

use crate::{
    error::PortalResult,
    models::{ItemId, ReadingRequest, SubmissionReceipt},
};

pub use http::HttpGateway;

/// Operations the portal core performs against the Elidune API.
///
/// Every call may fail with [`PortalError::Unauthorized`](crate::PortalError::Unauthorized),
/// which callers must tell apart from network and rejection failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    /// Add an item to the signed-in reader's wishlist
    async fn add_item(&self, id: ItemId) -> PortalResult<()>;

    /// Remove an item from the signed-in reader's wishlist
    async fn remove_item(&self, id: ItemId) -> PortalResult<()>;

    /// Submit an in-library reading request
    async fn submit_selection(&self, request: ReadingRequest) -> PortalResult<SubmissionReceipt>;

    /// Authoritative list of saved items, used to seed and heal the session
    async fn fetch_saved_items(&self) -> PortalResult<Vec<ItemId>>;
}
