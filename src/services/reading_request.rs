//! In-library reading request: the pending selection and its submission

use chrono::NaiveDate;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use validator::Validate;

use crate::{
    error::{PortalError, PortalResult},
    feedback::{Anchor, Feedback},
    gateway::RemoteGateway,
    models::{ItemId, NotificationKind, ReadingRequest, SubmissionReceipt},
    session::Session,
};

/// Anchor name of the cart icon particles fly to
pub const CART_ANCHOR: &str = "cart";

const PARTICLE_PAYLOAD: &str = "book";

#[derive(Debug)]
pub enum SubmitOutcome {
    /// Accepted; the submitted items left the selection
    Submitted(SubmissionReceipt),
    /// The API refused or could not be reached; the selection is untouched
    Failed(PortalError),
    /// The reader must sign in; the selection is untouched
    RedirectToLogin,
}

#[derive(Clone)]
pub struct ReadingRequestService {
    gateway: Arc<dyn RemoteGateway>,
    session: Session,
    feedback: Feedback,
    submitting: Arc<AtomicBool>,
}

impl ReadingRequestService {
    pub fn new(gateway: Arc<dyn RemoteGateway>, session: Session, feedback: Feedback) -> Self {
        Self {
            gateway,
            session,
            feedback,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Add a book to the pending selection.
    ///
    /// The cart badge updates at once; a particle flies from `source` to the
    /// cart when the book was not already selected.
    pub fn select(&self, item: ItemId, source: Option<&dyn Anchor>) -> bool {
        let inserted = self.session.selection().insert(item);
        if inserted {
            tracing::debug!(%item, count = self.session.selection().len(), "Book selected");
            if let Some(source) = source {
                self.feedback
                    .launch_particle(source, CART_ANCHOR, PARTICLE_PAYLOAD, None);
            }
        }
        inserted
    }

    pub fn deselect(&self, item: ItemId) -> bool {
        let removed = self.session.selection().remove(item);
        if removed {
            tracing::debug!(%item, count = self.session.selection().len(), "Book deselected");
        }
        removed
    }

    /// Drop the whole selection
    pub fn reset(&self) -> usize {
        let dropped = self.session.selection().clear();
        tracing::debug!(dropped, "Selection reset");
        dropped
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    /// Validate and send the selection.
    ///
    /// # Errors
    /// - [`PortalError::Validation`] when the form is invalid (for example an
    ///   empty selection); nothing is sent.
    /// - [`PortalError::SubmissionInFlight`] while a previous submit is pending.
    pub async fn submit(
        &self,
        visit_date: NaiveDate,
        note: Option<String>,
    ) -> PortalResult<SubmitOutcome> {
        let request = ReadingRequest {
            items: self.session.selection().items(),
            visit_date,
            note: note.filter(|n| !n.trim().is_empty()),
        };
        request.validate()?;

        if !self.session.is_authenticated() {
            return Ok(SubmitOutcome::RedirectToLogin);
        }

        let slot = SubmitSlot::acquire(&self.submitting)?;
        let submitted = request.items.clone();
        let result = self.gateway.submit_selection(request).await;
        drop(slot);

        match result {
            Ok(receipt) => {
                for item in &submitted {
                    self.session.selection().remove(*item);
                }
                tracing::info!(items = submitted.len(), "Reading request submitted");
                self.feedback.notify(
                    NotificationKind::Success,
                    "Reading request sent",
                    receipt.message.clone(),
                    None,
                );
                Ok(SubmitOutcome::Submitted(receipt))
            }
            Err(PortalError::Unauthorized) => {
                self.session.expire();
                Ok(SubmitOutcome::RedirectToLogin)
            }
            Err(error) => {
                tracing::warn!(%error, "Reading request failed");
                self.feedback.notify(
                    NotificationKind::Error,
                    "Could not send your reading request",
                    Some(error.user_message()),
                    None,
                );
                Ok(SubmitOutcome::Failed(error))
            }
        }
    }
}

/// Single-flight submit slot, released on drop even if the submit is cancelled
struct SubmitSlot<'a>(&'a AtomicBool);

impl<'a> SubmitSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> PortalResult<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            return Err(PortalError::SubmissionInFlight);
        }
        Ok(Self(flag))
    }
}

impl Drop for SubmitSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
