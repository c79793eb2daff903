//! Threaded capture with a single-slot latest-frame handoff
//!
//! The worker thread overwrites the slot with every capture; the control
//! loop reads whatever is most recent. Neither side queues or blocks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{FrameSource, VideoFrame};

/// Consumer side of the handoff
#[derive(Clone)]
pub struct LatestFrame {
    receiver: watch::Receiver<Option<Arc<VideoFrame>>>,
}

impl LatestFrame {
    /// Most recent frame, or `None` if the last capture failed or the
    /// worker has gone away
    pub fn latest(&self) -> Option<Arc<VideoFrame>> {
        if self.receiver.has_changed().is_err() {
            return None;
        }
        self.receiver.borrow().clone()
    }
}

impl FrameSource for LatestFrame {
    fn capture_frame(&mut self) -> Option<VideoFrame> {
        self.latest().map(|frame| (*frame).clone())
    }
}

/// Capture worker running a `FrameSource` on its own thread
pub struct CaptureService {
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl CaptureService {
    /// Spawn the worker, capturing at most `fps` frames per second
    pub fn spawn<S>(mut source: S, fps: u32) -> (Self, LatestFrame)
    where
        S: FrameSource + Send + 'static,
    {
        let (tx, rx) = watch::channel::<Option<Arc<VideoFrame>>>(None);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let interval = Duration::from_micros(1_000_000 / fps.max(1) as u64);

        let handle = std::thread::spawn(move || {
            info!("Capture worker started");
            while !shutdown_clone.load(Ordering::SeqCst) {
                let frame = source.capture_frame();
                if frame.is_none() {
                    warn!("Frame capture failed");
                }
                tx.send_replace(frame.map(Arc::new));

                if tx.is_closed() {
                    debug!("Latest-frame receiver dropped");
                    break;
                }
                std::thread::sleep(interval);
            }
            info!("Capture worker stopped");
        });

        (
            Self {
                shutdown,
                handle: Some(handle),
            },
            LatestFrame { receiver: rx },
        )
    }

    /// Ask the worker to stop and wait for it
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Capture worker panicked");
            }
        }
    }
}

impl Drop for CaptureService {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        next: u32,
    }

    impl FrameSource for Counting {
        fn capture_frame(&mut self) -> Option<VideoFrame> {
            self.next += 1;
            let mut frame = VideoFrame::filled(2, 2, [0, 0, 0]);
            frame.sequence = self.next;
            Some(frame)
        }
    }

    struct Broken;

    impl FrameSource for Broken {
        fn capture_frame(&mut self) -> Option<VideoFrame> {
            None
        }
    }

    fn wait_for<F: Fn() -> bool>(cond: F) -> bool {
        for _ in 0..200 {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_latest_frame_overwrites() {
        let (mut service, latest) = CaptureService::spawn(Counting { next: 0 }, 1000);

        assert!(wait_for(|| latest.latest().map(|f| f.sequence >= 3).unwrap_or(false)));

        // Reading does not consume: two reads see a frame at least as recent
        let a = latest.latest().unwrap().sequence;
        let b = latest.latest().unwrap().sequence;
        assert!(b >= a);

        service.stop();
    }

    #[test]
    fn test_failed_capture_reads_as_none() {
        let (mut service, mut latest) = CaptureService::spawn(Broken, 1000);
        std::thread::sleep(Duration::from_millis(20));
        assert!(latest.capture_frame().is_none());
        service.stop();
    }

    #[test]
    fn test_stopped_worker_reads_as_none() {
        let (mut service, latest) = CaptureService::spawn(Counting { next: 0 }, 1000);
        assert!(wait_for(|| latest.latest().is_some()));
        service.stop();
        assert!(latest.latest().is_none());
    }
}
