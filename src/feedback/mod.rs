//! Timed feedback layer: the toast and the confirmation particles.
//!
//! [`Feedback`] is a cloneable handle owning one virtual clock shared by the
//! toast machine and the particle animator. The host advances the clock
//! (see [`clock::spawn_clock`]); callbacks produced by an advance run after
//! the internal lock is released, so they may call back into the handle.

pub mod anchors;
pub mod clock;
pub mod particles;
pub mod timer;
pub mod toast;

pub use anchors::{Anchor, AnchorRegistry, LayoutAnchor, Point, Rect};
pub use particles::{LandingCallback, ParticleAnimator, ParticleFrame, ParticleId};
pub use toast::{CloseCallback, ToastMachine, ToastPhase, ToastView};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    config::{FeedbackConfig, ToastConfig},
    models::{Notification, NotificationKind},
};

struct FeedbackInner {
    now_ms: u64,
    toast: ToastMachine,
    particles: ParticleAnimator,
}

#[derive(Clone)]
pub struct Feedback {
    inner: Arc<Mutex<FeedbackInner>>,
    anchors: AnchorRegistry,
    toast_timings: ToastConfig,
}

impl Feedback {
    pub fn new(config: &FeedbackConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FeedbackInner {
                now_ms: 0,
                toast: ToastMachine::new(config.toast.clone()),
                particles: ParticleAnimator::new(config.particles.clone()),
            })),
            anchors: AnchorRegistry::new(),
            toast_timings: config.toast.clone(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedbackInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registry of named particle destinations
    pub fn anchors(&self) -> &AnchorRegistry {
        &self.anchors
    }

    pub fn now_ms(&self) -> u64 {
        self.lock().now_ms
    }

    /// Show a notification; `auto_dismiss_ms` defaults per kind from config
    pub fn notify(
        &self,
        kind: NotificationKind,
        headline: impl Into<String>,
        detail: Option<String>,
        auto_dismiss_ms: Option<u64>,
    ) {
        let auto_dismiss_ms =
            auto_dismiss_ms.unwrap_or_else(|| self.toast_timings.auto_dismiss_for(kind));
        let notification = Notification {
            kind,
            headline: headline.into(),
            detail,
            auto_dismiss_ms,
        };
        self.notify_with(notification, None);
    }

    /// Show a notification and run `on_close` once it is fully hidden
    pub fn notify_with(&self, notification: Notification, on_close: Option<CloseCallback>) {
        tracing::debug!(
            kind = %notification.kind,
            headline = %notification.headline,
            "Notification requested"
        );
        self.lock().toast.show(notification, on_close);
    }

    /// Manual dismissal of the visible notification
    pub fn dismiss(&self) -> bool {
        self.lock().toast.dismiss()
    }

    /// Launch a particle from `source` to the registered `destination`.
    ///
    /// Returns `None` when the destination is unknown or either anchor is
    /// not mounted; the action itself is unaffected.
    pub fn launch_particle(
        &self,
        source: &dyn Anchor,
        destination: &str,
        payload: impl Into<String>,
        on_complete: Option<LandingCallback>,
    ) -> Option<ParticleId> {
        let Some(target) = self.anchors.get(destination) else {
            tracing::debug!(destination, "No anchor registered, particle skipped");
            return None;
        };
        // Anchors may call back into this handle, so measure before locking
        let (Some(from), Some(to)) = (source.measure(), target.measure()) else {
            tracing::debug!(destination, "Anchor not mounted, particle skipped");
            return None;
        };
        self.lock().particles.launch(&from, &to, payload, on_complete)
    }

    pub fn advance_by(&self, delta_ms: u64) {
        let now_ms = self.now_ms().saturating_add(delta_ms);
        self.advance_to(now_ms);
    }

    /// Move the clock to `now_ms` and run whatever came due.
    ///
    /// The clock never goes backwards.
    pub fn advance_to(&self, now_ms: u64) {
        let (closed, landed) = {
            let mut inner = self.lock();
            if now_ms <= inner.now_ms {
                return;
            }
            inner.now_ms = now_ms;
            let closed = inner.toast.advance_to(now_ms);
            let landed = inner.particles.advance_to(now_ms);
            (closed, landed)
        };

        for callback in closed {
            callback();
        }
        for landing in landed {
            if let Some(callback) = landing.callback {
                callback(landing.id);
            }
        }
    }

    pub fn toast(&self) -> ToastView {
        self.lock().toast.view()
    }

    pub fn particles(&self) -> Vec<ParticleFrame> {
        self.lock().particles.frames()
    }

    pub fn active_particles(&self) -> usize {
        self.lock().particles.active_count()
    }

    /// Nothing on screen and nothing in flight
    pub fn is_idle(&self) -> bool {
        let inner = self.lock();
        !inner.toast.is_visible() && inner.particles.active_count() == 0
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new(&FeedbackConfig::default())
    }
}
