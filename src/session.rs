//! The command surface: rotate requests in, frame ticks out.
//!
//! A [`RadarSession`] owns the registry, the animation scheduler and the
//! frame queue. Every mutation goes through `&mut self`, so a rotate command
//! is applied in full between two frames and no tick sees it half done.

use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::animation::{AnimationScheduler, AnimationState, FrameQueue};
use crate::display::DisplayAdapter;
use crate::error::RadarError;
use crate::radar::{CartesianPoint, Direction, PointSetRegistry, SetId};

/// Parse a rotation amount typed by a user.
///
/// The whole trimmed text must be a finite decimal number; trailing junk,
/// `NaN` and infinities are rejected.
pub fn parse_degrees(text: &str) -> Result<f64, RadarError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RadarError::invalid_rotation(text)),
    }
}

/// Result of an accepted rotate command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotateOutcome {
    pub degrees: f64,
    pub direction: Direction,
    pub cumulative_degrees: f64,
}

/// Snapshot for status lines and the `status` control command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStatus {
    pub cumulative_degrees: f64,
    pub blue: AnimationState,
    pub red: AnimationState,
    pub pending_frames: usize,
}

pub struct RadarSession {
    registry: PointSetRegistry,
    animator: AnimationScheduler,
    frames: FrameQueue,
}

impl RadarSession {
    pub fn new(registry: PointSetRegistry, duration: Duration) -> Self {
        let initial = SetId::ALL.map(|set| registry.current_positions(set));
        Self {
            animator: AnimationScheduler::new(duration, initial),
            registry,
            frames: FrameQueue::new(),
        }
    }

    pub fn registry(&self) -> &PointSetRegistry {
        &self.registry
    }

    pub fn animator(&self) -> &AnimationScheduler {
        &self.animator
    }

    /// Paint every set at its resting position.
    pub fn paint_initial<D>(&mut self, display: &mut D)
    where
        D: DisplayAdapter + ?Sized,
    {
        for set in SetId::ALL {
            let positions = self.registry.current_positions(set);
            self.animator.place(set, positions, display);
        }
    }

    /// Handle a rotate request whose amount is still raw text.
    pub fn rotate(
        &mut self,
        degrees_text: &str,
        direction: Direction,
        now: Instant,
    ) -> Result<RotateOutcome, RadarError> {
        let degrees = parse_degrees(degrees_text)?;
        self.rotate_by(degrees, direction, now)
    }

    /// Accumulate the rotation, then restart both set animations towards the
    /// new resting positions.
    pub fn rotate_by(
        &mut self,
        degrees: f64,
        direction: Direction,
        now: Instant,
    ) -> Result<RotateOutcome, RadarError> {
        let cumulative_degrees = self.registry.rotate_by(degrees, direction)?;

        for set in SetId::ALL {
            let targets = self.registry.current_positions(set);
            let task = self.animator.start(set, targets, now);
            self.frames.request(task);
        }

        info!(
            "Rotate {} {}: cumulative rotation now {:.2}°",
            degrees, direction, cumulative_degrees
        );

        Ok(RotateOutcome {
            degrees,
            direction,
            cumulative_degrees,
        })
    }

    /// Run one host frame: tick every registered task and re-register the
    /// ones that want another frame. Returns how many remain registered.
    pub fn frame<D>(&mut self, now: Instant, display: &mut D) -> usize
    where
        D: DisplayAdapter + ?Sized,
    {
        for task in self.frames.drain() {
            let status = self.animator.tick(task, now, display);
            if status.wants_next_frame() {
                self.frames.request(task);
            } else {
                debug!("Frame task {:?} done: {:?}", task, status);
            }
        }
        self.frames.len()
    }

    pub fn is_animating(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Positions currently on screen for `set`.
    pub fn displayed(&self, set: SetId) -> &[CartesianPoint] {
        self.animator.displayed(set)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            cumulative_degrees: self.registry.cumulative_degrees(),
            blue: self.animator.state(SetId::Blue),
            red: self.animator.state(SetId::Red),
            pending_frames: self.frames.len(),
        }
    }
}
