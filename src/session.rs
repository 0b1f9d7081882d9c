use serde::Deserialize;

use crate::runtime::TICK_RATE_MS;

/// Seconds of "get ready" time before every drawing interval
pub const PREPARATION_SECS: u32 = 3;

/// Heartbeats that make up one whole state-machine second
pub const TICKS_PER_SECOND: u32 = (1000 / TICK_RATE_MS) as u32;

/// Session payload handed over by the backend: the ordered image paths to
/// cycle through and the drawing seconds granted per image
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct SessionPlan {
    pub images: Vec<String>,
    pub duration: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Preparation,
    Drawing,
}

/// The phase state machine for one practice run.
///
/// Owns the position in the image sequence and the countdown of the active
/// phase. Time moves only through `tick`, one call per whole second; `skip`
/// forces the same transition the countdown would reach naturally. Once the
/// last drawing interval expires the machine latches finished and ignores
/// all further calls.
#[derive(Debug)]
pub struct Session {
    plan: SessionPlan,
    current: usize,
    phase: Phase,
    time_left: u32,
    paused: bool,
    finished: bool,
}

impl Session {
    /// Returns None when the plan carries no images; a session cannot run
    /// over an empty sequence
    pub fn new(plan: SessionPlan) -> Option<Self> {
        if plan.images.is_empty() {
            return None;
        }

        Some(Self {
            plan,
            current: 0,
            phase: Phase::Preparation,
            time_left: PREPARATION_SECS,
            paused: false,
            finished: false,
        })
    }

    /// Advance the countdown by one second; expiry runs the phase transition
    /// instead of dropping below zero
    pub fn tick(&mut self) {
        if self.paused || self.finished {
            return;
        }

        if self.time_left <= 1 {
            self.advance();
        } else {
            self.time_left -= 1;
        }
    }

    /// Jump to the next phase regardless of time left; also works while
    /// paused (the countdown stays frozen until resume)
    pub fn skip(&mut self) {
        if self.finished {
            return;
        }
        self.advance();
    }

    pub fn toggle_pause(&mut self) {
        if !self.finished {
            self.paused = !self.paused;
        }
    }

    fn advance(&mut self) {
        match self.phase {
            Phase::Preparation => {
                self.phase = Phase::Drawing;
                self.time_left = self.plan.duration;
            }
            Phase::Drawing => {
                if self.current + 1 < self.plan.images.len() {
                    self.current += 1;
                    self.phase = Phase::Preparation;
                    self.time_left = PREPARATION_SECS;
                } else {
                    self.finished = true;
                }
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn image_count(&self) -> usize {
        self.plan.images.len()
    }

    pub fn current_image(&self) -> &str {
        &self.plan.images[self.current]
    }

    pub fn duration(&self) -> u32 {
        self.plan.duration
    }

    /// Fraction of the drawing interval still remaining
    pub fn progress_ratio(&self) -> f64 {
        if self.plan.duration == 0 {
            return 0.0;
        }
        (self.time_left as f64 / self.plan.duration as f64).clamp(0.0, 1.0)
    }

    /// The large countdown digit: shown through all of preparation, and only
    /// for the last five seconds of drawing
    pub fn countdown(&self) -> Option<u32> {
        match self.phase {
            Phase::Preparation => Some(self.time_left),
            Phase::Drawing if (1..=5).contains(&self.time_left) => Some(self.time_left),
            Phase::Drawing => None,
        }
    }
}

/// Adapts the runtime heartbeat to the one-second cadence of the state
/// machine. Sub-second progress resets whenever phase, index, or pause state
/// changes, so every phase gets a full first second.
#[derive(Debug)]
pub struct SessionClock {
    session: Session,
    subticks: u32,
}

impl SessionClock {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            subticks: 0,
        }
    }

    /// Feed one heartbeat; true when a whole second elapsed and the machine
    /// moved
    pub fn on_heartbeat(&mut self) -> bool {
        if self.session.is_paused() || self.session.is_finished() {
            return false;
        }

        self.subticks += 1;
        if self.subticks < TICKS_PER_SECOND {
            return false;
        }

        self.subticks = 0;
        self.session.tick();
        true
    }

    pub fn skip(&mut self) {
        self.subticks = 0;
        self.session.skip();
    }

    pub fn toggle_pause(&mut self) {
        self.subticks = 0;
        self.session.toggle_pause();
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
