//! The "schedule next tick / cancel scheduled tick" primitive a host provides.

/// Identifies one requested frame. Handles are never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait FrameScheduler {
    /// Ask for one callback on the next frame.
    fn request_frame(&mut self) -> FrameHandle;
    /// Withdraw a request. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Single-slot queue polled by a host loop.
///
/// The engine requests at most one frame at a time, so the queue only ever
/// holds the latest request.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: Option<FrameHandle>,
    cancelled: u64,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the due frame, if any.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// How many requests were withdrawn before delivery.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_unique() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        assert_ne!(a, b);
        assert_eq!(queue.take_due(), Some(b));
        assert_eq!(queue.take_due(), None);
    }

    #[test]
    fn cancel_ignores_stale_handles() {
        let mut queue = FrameQueue::new();
        let a = queue.request_frame();
        let b = queue.request_frame();
        queue.cancel_frame(a);
        assert_eq!(queue.pending(), Some(b));
        queue.cancel_frame(b);
        queue.cancel_frame(b);
        assert!(queue.is_idle());
        assert_eq!(queue.cancelled(), 1);
    }
}
