use crate::time::{FrameRequest, TimingSource};

/// Timing source backed by window redraw requests.
///
/// A registered frame is turned into `Window::request_redraw` by the runtime, and the
/// following `RedrawRequested` event is delivered as the timing callback. Cancelling
/// before the event arrives makes the runtime ignore that redraw.
#[derive(Debug, Default)]
pub struct WindowTimingSource {
    next_id: u64,
    pending: Option<FrameRequest>,
}

impl WindowTimingSource {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub(crate) fn take_pending(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }
}

impl TimingSource for WindowTimingSource {
    fn request_frame(&mut self) -> FrameRequest {
        self.next_id = self.next_id.wrapping_add(1);
        let req = FrameRequest::from_raw(self.next_id);
        self.pending = Some(req);
        req
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redraw_is_delivered_only_when_registered() {
        let mut timing = WindowTimingSource::default();
        assert!(timing.take_pending().is_none());

        let req = timing.request_frame();
        assert!(timing.is_pending());
        assert_eq!(timing.take_pending(), Some(req));
        assert!(!timing.is_pending());
    }

    #[test]
    fn cancelled_frame_is_not_delivered() {
        let mut timing = WindowTimingSource::default();
        let req = timing.request_frame();
        timing.cancel_frame(req);
        assert!(timing.take_pending().is_none());
    }
}
