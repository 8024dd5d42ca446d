//! Elidune Portal core
//!
//! Client-side state shared by the views of the Elidune library portal:
//! optimistic wishlist writes with rollback, the shared badge counters,
//! the timed toast, confirmation particles, and the navigation guard
//! protecting an unsaved reading request selection.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod feedback;
pub mod gateway;
pub mod models;
pub mod navigation;
pub mod services;
pub mod session;

pub use crate::config::AppConfig;
pub use crate::error::{PortalError, PortalResult};

use crate::{
    feedback::Feedback, gateway::RemoteGateway, navigation::NavigationGuard, session::Session,
};

/// Portal state handed down to every view
#[derive(Clone)]
pub struct PortalState {
    pub config: Arc<AppConfig>,
    pub session: Session,
    pub feedback: Feedback,
    pub services: Arc<services::Services>,
}

impl PortalState {
    pub fn new(config: AppConfig, gateway: Arc<dyn RemoteGateway>, session: Session) -> Self {
        let feedback = Feedback::new(&config.feedback);
        let services = services::Services::new(gateway, session.clone(), feedback.clone());

        Self {
            config: Arc::new(config),
            session,
            feedback,
            services: Arc::new(services),
        }
    }

    /// Guard for a view holding the pending selection, currently at `current`
    pub fn navigation_guard(&self, current: &str) -> PortalResult<NavigationGuard> {
        NavigationGuard::new(
            self.session.selection().clone(),
            &self.config.navigation.origin,
            current,
        )
    }
}
