//! Session-owned state shared by every view.
//!
//! The session is created once at the top of the portal and cloned into
//! whichever service or view needs it; clones share the same state. Views
//! only read from it. Writes go through the services.

pub mod counter;
pub mod credentials;
pub mod membership;
pub mod selection;

pub use counter::SharedCounter;
pub use credentials::Credentials;
pub use membership::MembershipStore;
pub use selection::PendingSelection;

use crate::{error::PortalResult, gateway::RemoteGateway, models::ItemId};

#[derive(Debug, Clone, Default)]
pub struct Session {
    credentials: Credentials,
    wishlist: MembershipStore,
    wishlist_count: SharedCounter,
    selection: PendingSelection,
}

impl Session {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ..Self::default()
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_authenticated()
    }

    pub fn wishlist(&self) -> &MembershipStore {
        &self.wishlist
    }

    /// Counter behind the wishlist badge in the navigation bar
    pub fn wishlist_count(&self) -> &SharedCounter {
        &self.wishlist_count
    }

    pub fn selection(&self) -> &PendingSelection {
        &self.selection
    }

    pub fn sign_in(&self, token: impl Into<String>) {
        self.credentials.set(token);
        tracing::info!("Session signed in");
    }

    /// Drop credentials and everything tied to the reader
    pub fn sign_out(&self) {
        self.credentials.clear();
        self.wishlist.clear();
        self.wishlist_count.set(0);
        self.selection.clear();
        tracing::info!("Session signed out");
    }

    /// Mark the session unauthenticated after the API refused the token.
    ///
    /// Local state is kept so the reader finds it again after signing back in.
    pub(crate) fn expire(&self) {
        self.credentials.clear();
        tracing::warn!("Session credentials expired");
    }

    /// Seed wishlist membership and counter from the API.
    ///
    /// Unauthenticated sessions have nothing to fetch; settled membership is
    /// dropped so the counter keeps matching the store.
    pub async fn bootstrap(&self, gateway: &dyn RemoteGateway) -> PortalResult<u64> {
        if !self.is_authenticated() {
            self.wishlist.replace_all(std::iter::empty::<ItemId>());
            let count = self.wishlist.saved_count() as u64;
            self.wishlist_count.set(count);
            return Ok(count);
        }

        let saved = gateway.fetch_saved_items().await?;
        self.wishlist.replace_all(saved);
        let count = self.wishlist.saved_count() as u64;
        self.wishlist_count.set(count);
        tracing::info!(count, "Wishlist loaded");
        Ok(count)
    }

    /// Re-read the authoritative wishlist and heal the counter if it drifted
    pub async fn reconcile(&self, gateway: &dyn RemoteGateway) -> PortalResult<u64> {
        let before = self.wishlist_count.read();
        let after = self.bootstrap(gateway).await?;
        if before != after {
            tracing::warn!(before, after, "Wishlist counter healed from server");
        }
        Ok(after)
    }
}
