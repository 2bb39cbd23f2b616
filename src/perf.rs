use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

pub const FRAME_TIME_SAMPLES: usize = 60;

/// Rolling window of the most recent frame times.
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    frame_time: VecDeque<Duration>,
    frame_timestamp: VecDeque<Instant>,
    frame_time_sum: Duration,
}

impl PerformanceTracker {
    pub fn frame_time(&self) -> &VecDeque<Duration> {
        &self.frame_time
    }

    pub fn last_frame_time(&self) -> Option<&Duration> {
        self.frame_time.back()
    }

    pub fn avg_frame_time(&self) -> Option<Duration> {
        if self.frame_time.is_empty() {
            None
        } else {
            Some(self.frame_time_sum / self.frame_time.len() as u32)
        }
    }

    pub fn add_sample(&mut self, frame_time: Duration, frame_timestamp: Instant) {
        self.frame_time.push_back(frame_time);
        self.frame_time_sum += frame_time;
        while self.frame_time.len() > FRAME_TIME_SAMPLES {
            if let Some(oldest) = self.frame_time.pop_front() {
                self.frame_time_sum -= oldest;
            }
        }

        self.frame_timestamp.push_back(frame_timestamp);
        while self.frame_timestamp.len() > FRAME_TIME_SAMPLES {
            self.frame_timestamp.pop_front();
        }
    }

    pub fn fps(&self) -> Option<f32> {
        self.frame_timestamp
            .front()
            .zip(self.frame_timestamp.back())
            .filter(|(first, last)| first != last)
            .map(|(first, last)| {
                let intervals = self.frame_timestamp.len() - 1;
                let duration = *last - *first;
                let avg_duration = duration.as_nanos() as f32 / intervals as f32;
                let one_second = Duration::from_secs(1).as_nanos() as f32;
                one_second / avg_duration
            })
    }
}

#[cfg(test)]
mod test {
    use std::time::{Duration, Instant};

    use super::{PerformanceTracker, FRAME_TIME_SAMPLES};

    #[test]
    fn test_empty_tracker() {
        let tracker = PerformanceTracker::default();
        assert!(tracker.last_frame_time().is_none());
        assert!(tracker.avg_frame_time().is_none());
        assert!(tracker.fps().is_none());
    }

    #[test]
    fn test_fps_from_timestamps() {
        let mut tracker = PerformanceTracker::default();
        let start = Instant::now();
        for frame in 0..5 {
            let timestamp = start + Duration::from_millis(20 * frame);
            tracker.add_sample(Duration::from_millis(10), timestamp);
        }
        let fps = tracker.fps().unwrap();
        assert!((fps - 50.0).abs() < 0.01, "{}", fps);
        assert_eq!(tracker.avg_frame_time(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_window_drops_oldest_samples() {
        let mut tracker = PerformanceTracker::default();
        let start = Instant::now();
        tracker.add_sample(Duration::from_millis(100), start);
        for frame in 1..=FRAME_TIME_SAMPLES as u64 {
            tracker.add_sample(
                Duration::from_millis(4),
                start + Duration::from_millis(frame),
            );
        }
        assert_eq!(tracker.frame_time().len(), FRAME_TIME_SAMPLES);
        assert_eq!(tracker.avg_frame_time(), Some(Duration::from_millis(4)));
        assert_eq!(tracker.last_frame_time(), Some(&Duration::from_millis(4)));
    }
}
