//! Timed notification state machine.
//!
//! One notification is visible at a time and walks through
//! `Hidden -> Tick -> Center -> Expanded -> Closing -> Hidden`. Every
//! transition is looked up in [`transition`]; anything not in the table is
//! ignored. Timers scheduled for a lifecycle are tracked by token and all
//! cancelled when the lifecycle is superseded or dismissed.

use serde::Serialize;

use super::timer::{TimerQueue, TimerToken};
use crate::{config::ToastConfig, models::Notification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastPhase {
    /// Nothing rendered
    Hidden,
    /// Compact acknowledgement glyph at its origin
    Tick,
    /// Glyph travelling to the top-center anchor
    Center,
    /// Full message pill with headline, detail and dismiss button
    Expanded,
    /// Fading out
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToastTimer {
    Center,
    Expand,
    AutoDismiss,
    FadeOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Trigger {
    Show,
    Elapsed(ToastTimer),
    Dismiss,
}

/// Valid transitions of the toast lifecycle
pub(crate) fn transition(from: ToastPhase, trigger: Trigger) -> Option<ToastPhase> {
    use ToastPhase::*;

    match (from, trigger) {
        (_, Trigger::Show) => Some(Tick),
        (Tick, Trigger::Elapsed(ToastTimer::Center)) => Some(Center),
        (Center, Trigger::Elapsed(ToastTimer::Expand)) => Some(Expanded),
        (Expanded, Trigger::Elapsed(ToastTimer::AutoDismiss)) => Some(Closing),
        (Tick | Center | Expanded, Trigger::Dismiss) => Some(Closing),
        (Closing, Trigger::Elapsed(ToastTimer::FadeOut)) => Some(Hidden),
        _ => None,
    }
}

/// Completion callback, run once the toast is fully hidden
pub type CloseCallback = Box<dyn FnOnce() + Send>;

/// Snapshot handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToastView {
    pub phase: ToastPhase,
    pub notification: Option<Notification>,
    /// Remaining share of the auto-dismiss delay, from 1.0 down to 0.0
    pub progress: Option<f64>,
}

pub struct ToastMachine {
    timings: ToastConfig,
    phase: ToastPhase,
    current: Option<Notification>,
    on_close: Option<CloseCallback>,
    expanded_at_ms: Option<u64>,
    timers: TimerQueue<ToastTimer>,
    scheduled: Vec<TimerToken>,
}

impl ToastMachine {
    pub fn new(timings: ToastConfig) -> Self {
        Self {
            timings,
            phase: ToastPhase::Hidden,
            current: None,
            on_close: None,
            expanded_at_ms: None,
            timers: TimerQueue::new(),
            scheduled: Vec::new(),
        }
    }

    pub fn phase(&self) -> ToastPhase {
        self.phase
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.phase != ToastPhase::Hidden
    }

    /// Number of timers still scheduled for the current lifecycle
    pub fn pending_timers(&self) -> usize {
        self.scheduled.len()
    }

    /// Show a notification, pre-empting whatever is on screen.
    ///
    /// A pre-empted notification is abandoned: its timers are cancelled and
    /// its close callback is dropped without running.
    pub fn show(&mut self, notification: Notification, on_close: Option<CloseCallback>) {
        if let Some(previous) = self.current.as_ref().filter(|_| self.is_visible()) {
            tracing::debug!(
                headline = %previous.headline,
                phase = ?self.phase,
                "Toast superseded"
            );
        }
        self.on_close = on_close;
        self.current = Some(notification);
        self.apply(Trigger::Show);
    }

    /// Manual dismissal. Returns false when there is nothing to dismiss.
    pub fn dismiss(&mut self) -> bool {
        self.apply(Trigger::Dismiss)
    }

    /// Run every timer due at or before `now_ms`.
    ///
    /// Returns the close callbacks of lifecycles that reached `Hidden`; the
    /// caller runs them once it no longer holds any lock on the machine.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<CloseCallback> {
        let mut closed = Vec::new();

        while let Some(fired) = self.timers.pop_due(now_ms) {
            self.scheduled.retain(|t| *t != fired.token);
            if self.apply(Trigger::Elapsed(fired.event)) && self.phase == ToastPhase::Hidden {
                if let Some(callback) = self.on_close.take() {
                    closed.push(callback);
                }
            }
        }
        self.timers.settle(now_ms);

        closed
    }

    pub fn view(&self) -> ToastView {
        ToastView {
            phase: self.phase,
            notification: self.current.clone(),
            progress: self.progress(),
        }
    }

    /// Linear depletion of the auto-dismiss indicator
    pub fn progress(&self) -> Option<f64> {
        let auto_dismiss_ms = self.current.as_ref()?.auto_dismiss_ms;
        if auto_dismiss_ms == 0 {
            return None;
        }

        match self.phase {
            ToastPhase::Expanded => {
                let started = self.expanded_at_ms?;
                let elapsed = self.timers.now_ms().saturating_sub(started);
                Some((1.0 - elapsed as f64 / auto_dismiss_ms as f64).clamp(0.0, 1.0))
            }
            ToastPhase::Closing => Some(0.0),
            _ => None,
        }
    }

    fn apply(&mut self, trigger: Trigger) -> bool {
        let Some(next) = transition(self.phase, trigger) else {
            tracing::trace!(phase = ?self.phase, ?trigger, "Toast trigger ignored");
            return false;
        };

        tracing::debug!(from = ?self.phase, to = ?next, ?trigger, "Toast transition");
        self.phase = next;
        self.enter(next);
        true
    }

    fn enter(&mut self, phase: ToastPhase) {
        match phase {
            ToastPhase::Tick => {
                self.cancel_all();
                self.expanded_at_ms = None;
                self.schedule(self.timings.center_delay_ms, ToastTimer::Center);
                self.schedule(self.timings.expand_delay_ms, ToastTimer::Expand);
            }
            ToastPhase::Center => {}
            ToastPhase::Expanded => {
                self.expanded_at_ms = Some(self.timers.now_ms());
                let auto_dismiss_ms = self.current.as_ref().map_or(0, |n| n.auto_dismiss_ms);
                if auto_dismiss_ms > 0 {
                    self.schedule(auto_dismiss_ms, ToastTimer::AutoDismiss);
                }
            }
            ToastPhase::Closing => {
                self.cancel_all();
                self.schedule(self.timings.fade_out_ms, ToastTimer::FadeOut);
            }
            ToastPhase::Hidden => {
                self.cancel_all();
                self.current = None;
                self.expanded_at_ms = None;
            }
        }
    }

    fn schedule(&mut self, delay_ms: u64, timer: ToastTimer) {
        let token = self.timers.schedule(delay_ms, timer);
        self.scheduled.push(token);
    }

    fn cancel_all(&mut self) {
        for token in self.scheduled.drain(..) {
            self.timers.cancel(token);
        }
    }
}
