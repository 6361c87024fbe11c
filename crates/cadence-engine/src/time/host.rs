/// Opaque handle for one pending timing-callback registration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameRequest(u64);

impl FrameRequest {
    #[inline]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }
}

/// Host-side registration point for periodic timing callbacks.
///
/// A host delivers at most one callback per request, once per display refresh,
/// with a monotonically non-decreasing timestamp in milliseconds. The driver asks
/// for the next callback after every frame and cancels its pending request on stop.
///
/// Delivery itself is not part of this trait: the host calls
/// [`FrameDriver::tick`](super::FrameDriver::tick) from its own loop.
pub trait TimingSource {
    /// Registers interest in the next timing callback.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraws a registration. Unknown or already-delivered requests are ignored.
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// Timing source for embedders that run their own loop (and for tests).
///
/// It records what the driver asked for; the caller decides when to deliver a tick.
#[derive(Debug, Default)]
pub struct ManualTimingSource {
    next_id: u64,
    pending: Option<FrameRequest>,
    requests: u64,
    cancellations: u64,
}

impl ManualTimingSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outstanding registration, if any.
    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Marks the outstanding registration as delivered and returns it.
    ///
    /// Call this right before handing a timestamp to the driver.
    pub fn take_pending(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    /// Total number of registrations received.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Total number of registrations withdrawn.
    pub fn cancellations(&self) -> u64 {
        self.cancellations
    }
}

impl TimingSource for ManualTimingSource {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id = self.next_id.wrapping_add(1);
        let req = FrameRequest(self.next_id);
        self.pending = Some(req);
        self.requests += 1;
        req
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
        self.cancellations += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_marks_pending_with_fresh_handle() {
        let mut host = ManualTimingSource::new();
        let a = host.request_frame();
        let b = host.request_frame();
        assert_ne!(a, b);
        assert_eq!(host.pending(), Some(b));
        assert_eq!(host.requests(), 2);
    }

    #[test]
    fn cancel_clears_matching_request_only() {
        let mut host = ManualTimingSource::new();
        let stale = host.request_frame();
        let live = host.request_frame();

        host.cancel_frame(stale);
        assert_eq!(host.pending(), Some(live));

        host.cancel_frame(live);
        assert!(!host.is_pending());
        assert_eq!(host.cancellations(), 2);
    }

    #[test]
    fn take_pending_delivers_once() {
        let mut host = ManualTimingSource::new();
        let req = host.request_frame();
        assert_eq!(host.take_pending(), Some(req));
        assert_eq!(host.take_pending(), None);
    }
}
