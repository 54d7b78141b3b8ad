//! Time-based tweening of point sets between rotate commands.
//!
//! Each point set runs at most one [`AnimationJob`]. Starting a new job
//! bumps the set's generation, and any [`FrameTask`] still carrying the old
//! generation stops on its next tick without painting. Start positions come
//! from the scheduler's own cache of what was last painted, so a job that
//! replaces a running one picks up from wherever the markers are on screen.

mod frame;

pub use frame::{FrameQueue, FrameStatus, FrameTask};

use std::time::{Duration, Instant};
use tracing::{debug, trace};

use crate::display::DisplayAdapter;
use crate::radar::{CartesianPoint, SetId};

/// Default tween length.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Running,
}

impl AnimationState {
    pub fn name(self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Running => "running",
        }
    }
}

/// One tween from `start_positions` to `target_positions`.
#[derive(Debug, Clone)]
pub struct AnimationJob {
    pub start_positions: Vec<CartesianPoint>,
    pub target_positions: Vec<CartesianPoint>,
    pub started_at: Instant,
    pub duration: Duration,
    pub generation: u64,
}

impl AnimationJob {
    /// Fraction of the tween elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Interpolated positions at `progress`, written into `out`.
    pub fn sample_into(&self, progress: f64, out: &mut Vec<CartesianPoint>) {
        out.clear();
        out.extend(
            self.start_positions
                .iter()
                .zip(&self.target_positions)
                .map(|(start, target)| start.lerp(*target, progress)),
        );
    }
}

#[derive(Debug)]
struct Lane {
    /// Last painted positions; the authoritative "where is it now".
    displayed: Vec<CartesianPoint>,
    job: Option<AnimationJob>,
}

/// Per-set tween state machines.
#[derive(Debug)]
pub struct AnimationScheduler {
    duration: Duration,
    next_generation: u64,
    lanes: [Lane; 2],
}

impl AnimationScheduler {
    /// `initial` holds the positions already on screen, indexed by
    /// [`SetId::index`].
    pub fn new(duration: Duration, initial: [Vec<CartesianPoint>; 2]) -> Self {
        let [blue, red] = initial;
        Self {
            duration,
            next_generation: 1,
            lanes: [
                Lane {
                    displayed: blue,
                    job: None,
                },
                Lane {
                    displayed: red,
                    job: None,
                },
            ],
        }
    }

    pub fn displayed(&self, set: SetId) -> &[CartesianPoint] {
        &self.lanes[set.index()].displayed
    }

    pub fn job(&self, set: SetId) -> Option<&AnimationJob> {
        self.lanes[set.index()].job.as_ref()
    }

    pub fn state(&self, set: SetId) -> AnimationState {
        if self.lanes[set.index()].job.is_some() {
            AnimationState::Running
        } else {
            AnimationState::Idle
        }
    }

    pub fn is_idle(&self) -> bool {
        self.lanes.iter().all(|lane| lane.job.is_none())
    }

    /// Begin tweening `set` towards `targets`, replacing any running job.
    ///
    /// The returned task must be registered with the frame queue; it is the
    /// only handle that can advance this job.
    pub fn start(&mut self, set: SetId, targets: Vec<CartesianPoint>, now: Instant) -> FrameTask {
        let generation = self.next_generation;
        self.next_generation += 1;

        let lane = &mut self.lanes[set.index()];
        debug_assert_eq!(lane.displayed.len(), targets.len());

        if let Some(prev) = lane.job.as_ref() {
            debug!(
                "Replacing {} animation {} with {}",
                set, prev.generation, generation
            );
        }

        lane.job = Some(AnimationJob {
            start_positions: lane.displayed.clone(),
            target_positions: targets,
            started_at: now,
            duration: self.duration,
            generation,
        });

        FrameTask { set, generation }
    }

    /// Advance the job behind `task` to `now` and paint the result.
    pub fn tick<D>(&mut self, task: FrameTask, now: Instant, display: &mut D) -> FrameStatus
    where
        D: DisplayAdapter + ?Sized,
    {
        let Lane { displayed, job } = &mut self.lanes[task.set.index()];

        let live = match job.as_ref() {
            Some(live) if live.generation == task.generation => live,
            _ => {
                trace!("Dropped stale {} frame task {}", task.set, task.generation);
                return FrameStatus::Superseded;
            }
        };

        let progress = live.progress(now);
        live.sample_into(progress, displayed);
        display.paint(task.set, displayed);

        if progress >= 1.0 {
            debug!("{} animation {} finished", task.set, task.generation);
            *job = None;
            FrameStatus::Finished
        } else {
            FrameStatus::Continue
        }
    }

    /// Overwrite the painted cache without animating, e.g. on startup.
    pub fn place<D>(&mut self, set: SetId, positions: Vec<CartesianPoint>, display: &mut D)
    where
        D: DisplayAdapter + ?Sized,
    {
        let lane = &mut self.lanes[set.index()];
        lane.job = None;
        lane.displayed = positions;
        display.paint(set, &lane.displayed);
    }
}
