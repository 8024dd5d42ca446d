//! Wishlist toggling with optimistic writes.
//!
//! A toggle writes the new membership and adjusts the wishlist counter
//! before the API is called, then either keeps the write or undoes exactly
//! what it applied. Only one request per item may be in flight.

use std::sync::Arc;

use crate::{
    error::{PortalError, PortalResult},
    feedback::{Anchor, Feedback, LandingCallback, ParticleId},
    gateway::RemoteGateway,
    models::{ItemId, Membership, NotificationKind},
    session::Session,
};

/// Anchor name of the wishlist badge particles fly to
pub const WISHLIST_ANCHOR: &str = "wishlist";

const PARTICLE_PAYLOAD: &str = "heart";

/// Result of a settled toggle
#[derive(Debug)]
pub enum ToggleOutcome {
    /// The API confirmed the change
    Committed {
        item: ItemId,
        membership: Membership,
        particle: Option<ParticleId>,
    },
    /// The API refused or could not be reached; local state was restored
    RolledBack {
        item: ItemId,
        membership: Membership,
        error: PortalError,
    },
    /// The reader must sign in; nothing is left changed
    RedirectToLogin,
}

type LandingHook = Arc<dyn Fn(ParticleId) + Send + Sync>;

#[derive(Clone)]
pub struct WishlistService {
    gateway: Arc<dyn RemoteGateway>,
    session: Session,
    feedback: Feedback,
    on_landing: Option<LandingHook>,
}

impl WishlistService {
    pub fn new(gateway: Arc<dyn RemoteGateway>, session: Session, feedback: Feedback) -> Self {
        Self {
            gateway,
            session,
            feedback,
            on_landing: None,
        }
    }

    /// Run `hook` whenever a confirmation particle reaches the badge
    pub fn on_particle_landed(mut self, hook: impl Fn(ParticleId) + Send + Sync + 'static) -> Self {
        self.on_landing = Some(Arc::new(hook));
        self
    }

    /// Toggle using the membership currently held by the session
    pub async fn toggle_item(
        &self,
        item: ItemId,
        source: Option<Arc<dyn Anchor>>,
    ) -> PortalResult<ToggleOutcome> {
        let current = self.session.wishlist().membership(item);
        self.toggle(item, current, source).await
    }

    /// Flip `item` from its last-known membership `current`.
    ///
    /// `source` is where the gesture happened; on a confirmed add a particle
    /// flies from it to the [`WISHLIST_ANCHOR`]. When `current` is stale and
    /// the store already holds the target, the request is still sent but the
    /// counter does not move.
    ///
    /// # Errors
    /// - [`PortalError::Busy`] when a toggle for `item` is still in flight;
    ///   no request is issued.
    pub async fn toggle(
        &self,
        item: ItemId,
        current: Membership,
        source: Option<Arc<dyn Anchor>>,
    ) -> PortalResult<ToggleOutcome> {
        if !self.session.is_authenticated() {
            tracing::debug!(%item, "Toggle without credentials, redirecting");
            return Ok(ToggleOutcome::RedirectToLogin);
        }

        let target = current.toggled();
        let pending = PendingToggle::begin(&self.session, item, target)?;
        tracing::debug!(
            %item,
            ?target,
            count = self.session.wishlist_count().read(),
            "Optimistic wishlist write"
        );

        let result = match target {
            Membership::Saved => self.gateway.add_item(item).await,
            Membership::NotSaved => self.gateway.remove_item(item).await,
        };

        match result {
            Ok(()) => {
                pending.commit();
                tracing::info!(
                    %item,
                    ?target,
                    count = self.session.wishlist_count().read(),
                    "Wishlist change confirmed"
                );

                let particle = match (target, source) {
                    (Membership::Saved, Some(source)) => self.launch_particle(source.as_ref()),
                    _ => None,
                };
                Ok(ToggleOutcome::Committed {
                    item,
                    membership: target,
                    particle,
                })
            }
            Err(error) => {
                let previous = pending.rollback();

                if error.is_unauthorized() {
                    self.session.expire();
                    return Ok(ToggleOutcome::RedirectToLogin);
                }

                tracing::warn!(%item, ?target, %error, "Wishlist change rolled back");
                let headline = match target {
                    Membership::Saved => "Could not add to your wishlist",
                    Membership::NotSaved => "Could not remove from your wishlist",
                };
                self.feedback.notify(
                    NotificationKind::Error,
                    headline,
                    Some(error.user_message()),
                    None,
                );
                Ok(ToggleOutcome::RolledBack {
                    item,
                    membership: previous,
                    error,
                })
            }
        }
    }

    fn launch_particle(&self, source: &dyn Anchor) -> Option<ParticleId> {
        let on_complete = self
            .on_landing
            .clone()
            .map(|hook| -> LandingCallback { Box::new(move |id: ParticleId| hook(id)) });
        self.feedback
            .launch_particle(source, WISHLIST_ANCHOR, PARTICLE_PAYLOAD, on_complete)
    }
}

/// Optimistic write waiting for its response.
///
/// Unless committed, dropping it restores exactly what [`PendingToggle::begin`]
/// applied and releases the item, including when the toggle future is
/// cancelled while the request is in flight.
struct PendingToggle<'a> {
    session: &'a Session,
    item: ItemId,
    previous: Membership,
    target: Membership,
    counter_moved: bool,
    settled: bool,
}

impl<'a> PendingToggle<'a> {
    fn begin(session: &'a Session, item: ItemId, target: Membership) -> PortalResult<Self> {
        let previous = session.wishlist().begin(item, target)?;
        let counter = session.wishlist_count();
        // A caller holding a stale membership may ask for the state already stored
        let counter_moved = previous != target
            && match target {
                Membership::Saved => {
                    counter.increment();
                    true
                }
                Membership::NotSaved => counter.decrement(),
            };

        Ok(Self {
            session,
            item,
            previous,
            target,
            counter_moved,
            settled: false,
        })
    }

    fn commit(mut self) {
        self.session.wishlist().settle(self.item, self.target);
        self.settled = true;
    }

    /// Undo the write, returning the restored membership
    fn rollback(mut self) -> Membership {
        self.restore();
        self.previous
    }

    fn restore(&mut self) {
        self.settled = true;
        self.session.wishlist().settle(self.item, self.previous);
        if !self.counter_moved {
            return;
        }
        let counter = self.session.wishlist_count();
        match self.target {
            Membership::Saved => {
                counter.decrement();
            }
            Membership::NotSaved => {
                counter.increment();
            }
        }
    }
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(
                item = %self.item,
                target = ?self.target,
                "Wishlist toggle cancelled, rolling back"
            );
            self.restore();
        }
    }
}
