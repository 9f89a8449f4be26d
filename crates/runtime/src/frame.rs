use foundation::time::Time;

/// Frame metadata handed to the render loop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta since the previous frame (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame.
    pub time: Time,
}

/// Turns the timestamps passed to `requestAnimationFrame` callbacks into frames.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    next_index: u64,
    last: Option<Time>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, now_ms: f64) -> Frame {
        let now = Time::from_millis(now_ms);
        // Timestamps can repeat or go backwards across tab suspension.
        let dt_s = self.last.map(|last| (now.0 - last.0).max(0.0)).unwrap_or(0.0);
        self.last = Some(now);

        let frame = Frame {
            index: self.next_index,
            dt_s,
            time: now,
        };
        self.next_index += 1;
        frame
    }

    pub fn frames_elapsed(&self) -> u64 {
        self.next_index
    }
}

#[cfg(test)]
mod tests {
    use super::FrameClock;
    use foundation::time::Time;

    #[test]
    fn frame_time_comes_from_the_timestamp() {
        let mut clock = FrameClock::new();
        let frame = clock.tick(2500.0);
        assert_eq!(frame.time, Time(2.5));
    }

    #[test]
    fn clock_measures_delta_between_ticks() {
        let mut clock = FrameClock::new();
        let first = clock.tick(1000.0);
        assert_eq!(first.index, 0);
        assert_eq!(first.dt_s, 0.0);

        let second = clock.tick(1016.0);
        assert_eq!(second.index, 1);
        assert!((second.dt_s - 0.016).abs() < 1e-9);
        assert_eq!(clock.frames_elapsed(), 2);
    }

    #[test]
    fn clock_never_reports_negative_delta() {
        let mut clock = FrameClock::new();
        clock.tick(500.0);
        let f = clock.tick(400.0);
        assert_eq!(f.dt_s, 0.0);
    }
}
