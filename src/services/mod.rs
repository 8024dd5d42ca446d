//! Services turning view gestures into session writes and API calls

pub mod reading_request;
pub mod wishlist;

use std::sync::Arc;

use crate::{feedback::Feedback, gateway::RemoteGateway, session::Session};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub wishlist: wishlist::WishlistService,
    pub reading_requests: reading_request::ReadingRequestService,
}

impl Services {
    /// Create all services over the same gateway, session and feedback layer
    pub fn new(gateway: Arc<dyn RemoteGateway>, session: Session, feedback: Feedback) -> Self {
        Self {
            wishlist: wishlist::WishlistService::new(gateway.clone(), session.clone(), feedback.clone()),
            reading_requests: reading_request::ReadingRequestService::new(gateway, session, feedback),
        }
    }
}
