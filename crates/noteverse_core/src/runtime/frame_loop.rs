//! Fixed-rate frame loop with explicit stop.
//!
//! # Invariants
//! - Frames run sequentially on the calling thread; a tick never overlaps
//!   the previous one.
//! - Deadlines advance by a fixed interval; a slow frame is followed by the
//!   next frame immediately instead of accumulating drift.
//! - Once a `StopHandle` is triggered the loop ends after the current tick.

use log::info;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Timing data passed to the frame handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTick {
    /// Zero-based frame counter.
    pub frame: u64,
    /// Time since the loop started.
    pub elapsed: Duration,
    /// Time since the previous tick started.
    pub delta: Duration,
}

/// Cloneable, thread-safe request to end a running loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct FrameLoop {
    interval: Duration,
    stop: StopHandle,
}

impl FrameLoop {
    /// Creates a loop ticking `frames_per_second` times per second.
    ///
    /// A rate of zero is treated as one frame per second.
    pub fn new(frames_per_second: u32) -> Self {
        let rate = frames_per_second.max(1);
        Self {
            interval: Duration::from_secs(1) / rate,
            stop: StopHandle::default(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Runs `handler` once per interval until stopped or it breaks.
    ///
    /// Returns the number of frames executed.
    pub fn run<F>(&self, mut handler: F) -> u64
    where
        F: FnMut(FrameTick) -> ControlFlow<()>,
    {
        let started_at = Instant::now();
        let mut previous = started_at;
        let mut deadline = started_at;
        let mut frame = 0_u64;
        info!(
            "event=frame_loop module=runtime status=start interval_us={}",
            self.interval.as_micros()
        );

        while !self.stop.is_stopped() {
            let now = Instant::now();
            let tick = FrameTick {
                frame,
                elapsed: now - started_at,
                delta: now - previous,
            };
            previous = now;
            frame += 1;

            if handler(tick).is_break() {
                break;
            }

            deadline += self.interval;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                deadline = now;
            }
        }

        info!(
            "event=frame_loop module=runtime status=stop frames={} duration_ms={}",
            frame,
            started_at.elapsed().as_millis()
        );
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::FrameLoop;
    use std::ops::ControlFlow;
    use std::time::Duration;

    #[test]
    fn interval_matches_rate() {
        assert_eq!(FrameLoop::new(50).interval(), Duration::from_millis(20));
        assert_eq!(FrameLoop::new(0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn handler_break_ends_loop_with_sequential_frames() {
        let frame_loop = FrameLoop::new(1000);
        let mut seen = Vec::new();
        let frames = frame_loop.run(|tick| {
            seen.push(tick.frame);
            if tick.frame == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(frames, 5);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn stop_handle_ends_loop_from_inside_a_tick() {
        let frame_loop = FrameLoop::new(1000);
        let stop = frame_loop.stop_handle();
        let frames = frame_loop.run(|tick| {
            if tick.frame == 2 {
                stop.stop();
            }
            ControlFlow::Continue(())
        });
        assert_eq!(frames, 3);
    }

    #[test]
    fn stopped_loop_runs_no_frames() {
        let frame_loop = FrameLoop::new(60);
        frame_loop.stop_handle().stop();
        assert_eq!(frame_loop.run(|_| ControlFlow::Continue(())), 0);
    }
}
