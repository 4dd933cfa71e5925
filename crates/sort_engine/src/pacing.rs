//! Pacing and cooperative pause/cancel shared by every algorithm.

use std::{sync::Arc, time::Duration};

use shared::domain::{RunState, Speed};
use thiserror::Error;
use tokio::sync::watch;

/// Re-check interval while a run is paused.
pub const PAUSE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Returned from a checkpoint once the run has been cancelled; algorithms
/// propagate it with `?` to unwind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("run cancelled")]
pub struct Cancelled;

pub fn delay_for(speed: Speed) -> Duration {
    speed.delay()
}

/// Lifecycle flag of a single run. Every run gets a fresh one, so a cancelled
/// run can never observe the state of its successor.
#[derive(Debug)]
pub struct RunControl {
    state: watch::Sender<RunState>,
}

impl RunControl {
    /// Starts in `Running`.
    pub fn new() -> Self {
        let (state, _) = watch::channel(RunState::Running);
        Self { state }
    }

    pub fn state(&self) -> RunState {
        *self.state.borrow()
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == RunState::Cancelled
    }

    pub fn pause(&self) -> bool {
        self.transition(|state| (state == RunState::Running).then_some(RunState::Paused))
    }

    pub fn resume(&self) -> bool {
        self.transition(|state| (state == RunState::Paused).then_some(RunState::Running))
    }

    pub fn cancel(&self) -> bool {
        self.transition(|state| state.is_active().then_some(RunState::Cancelled))
    }

    pub fn complete(&self) -> bool {
        self.transition(|state| state.is_active().then_some(RunState::Completed))
    }

    fn transition(&self, next: impl FnOnce(RunState) -> Option<RunState>) -> bool {
        self.state.send_if_modified(|state| match next(*state) {
            Some(next) => {
                *state = next;
                true
            }
            None => false,
        })
    }
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub struct Pacer {
    control: Arc<RunControl>,
    speed: watch::Receiver<Speed>,
    poll_interval: Duration,
}

impl Pacer {
    pub fn new(
        control: Arc<RunControl>,
        speed: watch::Receiver<Speed>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            control,
            speed,
            poll_interval,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.control.is_cancelled()
    }

    pub fn checkpoint(&self) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            Err(Cancelled)
        } else {
            Ok(())
        }
    }

    /// Delay for the speed selected right now; speed changes apply to the
    /// next suspension.
    pub fn current_delay(&self) -> Duration {
        delay_for(*self.speed.borrow())
    }

    /// Suspension point after every visible step: sleeps for the current
    /// delay, then holds while paused.
    pub async fn await_step(&self) -> Result<(), Cancelled> {
        self.checkpoint()?;
        tokio::time::sleep(self.current_delay()).await;
        loop {
            match self.control.state() {
                RunState::Paused => tokio::time::sleep(self.poll_interval).await,
                RunState::Cancelled => return Err(Cancelled),
                _ => return Ok(()),
            }
        }
    }
}
