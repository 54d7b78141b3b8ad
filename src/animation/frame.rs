//! Host frame scheduling.
//!
//! A [`FrameTask`] is the token an animation carries between frames. The
//! render loop drains the [`FrameQueue`] once per frame and hands every task
//! back to the scheduler, which decides whether it is still live.

use crate::radar::SetId;

/// One pending "run before the next repaint" registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTask {
    pub set: SetId,
    pub generation: u64,
}

/// What a frame tick did with its task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Painted an intermediate frame; wants another.
    Continue,
    /// Painted the final frame; the job is retired.
    Finished,
    /// A newer command replaced this job. Nothing was painted.
    Superseded,
}

impl FrameStatus {
    pub fn wants_next_frame(self) -> bool {
        matches!(self, FrameStatus::Continue)
    }
}

/// Registrations for the next frame.
#[derive(Debug, Default)]
pub struct FrameQueue {
    pending: Vec<FrameTask>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `task` for the next frame. A task already waiting is not
    /// registered twice.
    pub fn request(&mut self, task: FrameTask) {
        if !self.pending.contains(&task) {
            self.pending.push(task);
        }
    }

    /// Take every registration for this frame, leaving the queue empty for
    /// re-registrations made while the frame runs.
    pub fn drain(&mut self) -> Vec<FrameTask> {
        std::mem::take(&mut self.pending)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_requests_register_once() {
        let mut queue = FrameQueue::new();
        let task = FrameTask {
            set: SetId::Blue,
            generation: 3,
        };
        queue.request(task);
        queue.request(task);
        queue.request(FrameTask {
            set: SetId::Red,
            generation: 4,
        });
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert_eq!(drained.len(), 2);
        assert!(queue.is_empty());
    }
}
