use crate::metrics::{Histogram, Metrics};

const FRAME_MS: &str = "frame_ms";
const FPS_WINDOW_MS: f64 = 1000.0;

/// Per-frame performance sampler.
///
/// Mirrors the usual `begin()` / `end()` bracket around a frame's work:
/// `frame_ms` records the CPU time spent between the two calls, and `fps`
/// is recomputed once per second from the number of completed samples.
#[derive(Debug, Default, Clone)]
pub struct FrameStats {
    metrics: Metrics,
    begin_ms: Option<f64>,
    window_start_ms: Option<f64>,
    window_frames: u32,
    fps: Option<f64>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StatsSnapshot {
    pub frames: u64,
    pub fps: Option<f64>,
    pub frame_ms: Histogram,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, now_ms: f64) {
        self.begin_ms = Some(now_ms);
        if self.window_start_ms.is_none() {
            self.window_start_ms = Some(now_ms);
        }
    }

    /// Closes the sample opened by `begin`. An `end` without `begin` is ignored.
    pub fn end(&mut self, now_ms: f64) {
        let Some(begin) = self.begin_ms.take() else {
            return;
        };

        self.metrics
            .record_histogram(FRAME_MS, (now_ms - begin).max(0.0));
        self.metrics.inc_counter("frames", 1);
        self.window_frames += 1;

        if let Some(start) = self.window_start_ms {
            let elapsed = now_ms - start;
            if elapsed >= FPS_WINDOW_MS {
                self.fps = Some(self.window_frames as f64 * 1000.0 / elapsed);
                self.window_start_ms = Some(now_ms);
                self.window_frames = 0;
            }
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames: self.metrics.counter("frames"),
            fps: self.fps,
            frame_ms: self.metrics.histogram(FRAME_MS).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FrameStats;

    #[test]
    fn begin_end_records_frame_time() {
        let mut stats = FrameStats::new();
        stats.begin(100.0);
        stats.end(104.0);
        stats.begin(116.0);
        stats.end(118.0);

        let snap = stats.snapshot();
        assert_eq!(snap.frames, 2);
        assert_eq!(snap.frame_ms.max, 4.0);
        assert_eq!(snap.frame_ms.min, 2.0);
        assert_eq!(snap.fps, None);
    }

    #[test]
    fn end_without_begin_is_ignored() {
        let mut stats = FrameStats::new();
        stats.end(10.0);
        assert_eq!(stats.snapshot().frames, 0);
    }

    #[test]
    fn fps_updates_after_one_second() {
        let mut stats = FrameStats::new();
        let mut t = 0.0;
        for _ in 0..61 {
            stats.begin(t);
            stats.end(t + 1.0);
            t += 1000.0 / 60.0;
        }
        let fps = stats.snapshot().fps.expect("fps after a full window");
        assert!((fps - 60.0).abs() < 1.5, "fps = {fps}");
    }
}
