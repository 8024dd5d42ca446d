//! Real-time driver for the feedback clock

use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};

use super::Feedback;

/// Advance `feedback` with wall-clock time, once per `frame`.
///
/// Abort the returned handle to stop the clock.
pub fn spawn_clock(feedback: Feedback, frame: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let origin = Instant::now();
        let base_ms = feedback.now_ms();
        let mut interval = time::interval(frame);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let elapsed_ms = origin.elapsed().as_millis() as u64;
            feedback.advance_to(base_ms + elapsed_ms);
        }
    })
}

/// Wait until no notification is visible and no particle is in flight
pub async fn wait_idle(feedback: &Feedback, poll: Duration) {
    while !feedback.is_idle() {
        time::sleep(poll).await;
    }
}
