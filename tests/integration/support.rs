//! Scripted gateway whose responses are released by the test

use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};

use elidune_portal::{
    config::AppConfig,
    error::{PortalError, PortalResult},
    feedback::{Anchor, Rect},
    gateway::RemoteGateway,
    models::{ItemId, ReadingRequest, SubmissionReceipt},
    services::{reading_request::CART_ANCHOR, wishlist::WISHLIST_ANCHOR},
    session::{Credentials, Session},
    PortalState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Add(ItemId),
    Remove(ItemId),
}

type Held = (Call, oneshot::Sender<PortalResult<()>>);

/// Gateway that either answers at once or holds each wishlist call until
/// the test releases it
#[derive(Default)]
pub struct ScriptedGateway {
    hold: bool,
    failing: Mutex<HashSet<ItemId>>,
    held: Mutex<VecDeque<Held>>,
    arrived: Notify,
    saved: Mutex<Vec<ItemId>>,
    requests: Mutex<Vec<ReadingRequest>>,
}

impl ScriptedGateway {
    /// Every wishlist call succeeds immediately, except for failing items
    pub fn instant() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every wishlist call waits for [`ScriptedGateway::next_call`]
    pub fn held() -> Arc<Self> {
        Arc::new(Self {
            hold: true,
            ..Self::default()
        })
    }

    pub fn fail_for(&self, id: ItemId) {
        self.failing.lock().unwrap().insert(id);
    }

    pub fn with_saved(self: Arc<Self>, items: &[ItemId]) -> Arc<Self> {
        self.saved.lock().unwrap().extend_from_slice(items);
        self
    }

    pub fn requests(&self) -> Vec<ReadingRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Wait for the next held call and take its responder
    pub async fn next_call(&self) -> (Call, oneshot::Sender<PortalResult<()>>) {
        loop {
            if let Some(held) = self.held.lock().unwrap().pop_front() {
                return held;
            }
            self.arrived.notified().await;
        }
    }

    async fn wishlist_call(&self, call: Call) -> PortalResult<()> {
        let id = match call {
            Call::Add(id) | Call::Remove(id) => id,
        };

        if !self.hold {
            if self.failing.lock().unwrap().contains(&id) {
                return Err(PortalError::Network("connection reset".to_string()));
            }
            return Ok(());
        }

        let (tx, rx) = oneshot::channel();
        self.held.lock().unwrap().push_back((call, tx));
        self.arrived.notify_one();
        rx.await
            .unwrap_or_else(|_| Err(PortalError::Network("responder dropped".to_string())))
    }
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn add_item(&self, id: ItemId) -> PortalResult<()> {
        self.wishlist_call(Call::Add(id)).await
    }

    async fn remove_item(&self, id: ItemId) -> PortalResult<()> {
        self.wishlist_call(Call::Remove(id)).await
    }

    async fn submit_selection(&self, request: ReadingRequest) -> PortalResult<SubmissionReceipt> {
        self.requests.lock().unwrap().push(request);
        Ok(SubmissionReceipt {
            message: Some("Your books will be waiting at the desk".to_string()),
        })
    }

    async fn fetch_saved_items(&self) -> PortalResult<Vec<ItemId>> {
        Ok(self.saved.lock().unwrap().clone())
    }
}

/// Signed-in portal with the badges laid out in the navigation bar
pub async fn portal(gateway: Arc<ScriptedGateway>) -> PortalState {
    let mut config = AppConfig::default();
    config.navigation.origin = "https://portal.example.org".to_string();

    let session = Session::new(Credentials::new(Some("reader-token".to_string())));
    session
        .bootstrap(gateway.as_ref())
        .await
        .expect("bootstrap against scripted gateway");

    let state = PortalState::new(config, gateway, session);
    let anchors = state.feedback.anchors();
    anchors.register(WISHLIST_ANCHOR, Arc::new(Rect::new(900.0, 10.0, 24.0, 24.0)));
    anchors.register(CART_ANCHOR, Arc::new(Rect::new(940.0, 10.0, 24.0, 24.0)));
    state
}

pub fn card(column: u32) -> Arc<dyn Anchor> {
    Arc::new(Rect::new(40.0 + 220.0 * column as f64, 400.0, 180.0, 260.0))
}
