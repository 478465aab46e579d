// ActiSense — Sliding Window Buffer
//
// Accumulates accepted samples and yields fixed-size windows on a fixed
// cadence. After a window is taken the buffer slides forward by `step`
// samples, keeping the trailing `window_size - step` for temporal
// continuity between consecutive classifications.

use std::collections::VecDeque;

use crate::events::Sample;

pub struct SlidingWindow {
    samples: VecDeque<Sample>,
    window_size: usize,
    step: usize,
}

impl SlidingWindow {
    /// `step` must satisfy `0 < step <= window_size`; `step == window_size`
    /// degenerates to non-overlapping windows.
    pub fn new(window_size: usize, step: usize) -> Self {
        assert!(window_size > 0, "window_size must be positive");
        assert!(
            step > 0 && step <= window_size,
            "step must be in 1..=window_size"
        );
        Self {
            samples: VecDeque::with_capacity(window_size + step),
            window_size,
            step,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
    }

    /// Yield the oldest `window_size` samples once enough have accumulated,
    /// then drop exactly `step` from the front.
    pub fn try_take_window(&mut self) -> Option<Vec<Sample>> {
        if self.samples.len() < self.window_size {
            return None;
        }
        let window: Vec<Sample> = self.samples.iter().take(self.window_size).copied().collect();
        self.samples.drain(..self.step);
        Some(window)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
#[cfg(test)]
mod tests {
    use super::*;

    fn sample(v: f64) -> Sample {
        Sample::new([v; crate::config::CHANNEL_COUNT])
    }

    #[test]
    fn building_buffer_yields_nothing() {
        let mut window = SlidingWindow::new(4, 2);
        for i in 0..3 {
            window.push(sample(i as f64));
            assert!(window.try_take_window().is_none());
        }
    }

    #[test]
    fn window_is_yielded_in_arrival_order_and_slides_by_step() {
        let mut window = SlidingWindow::new(4, 2);
        for i in 0..4 {
            window.push(sample(i as f64));
        }

        let first = window.try_take_window().unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(first[0], sample(0.0));
        assert_eq!(first[3], sample(3.0));
        // Slid by step, not by window_size.
        assert_eq!(window.len(), 2);

        window.push(sample(4.0));
        window.push(sample(5.0));
        let second = window.try_take_window().unwrap();
        // 50% overlap with the first window.
        assert_eq!(&second[..2], &first[2..]);
        assert_eq!(second[2], sample(4.0));
    }

    #[test]
    fn yields_expected_window_count_for_stream_length() {
        // floor((n - window_size) / step) + 1 windows for n >= window_size.
        let (window_size, step, n) = (120, 60, 400);
        let mut window = SlidingWindow::new(window_size, step);
        let mut count = 0;
        for i in 0..n {
            window.push(sample(i as f64));
            if window.try_take_window().is_some() {
                count += 1;
            }
        }
        assert_eq!(count, (n - window_size) / step + 1);
    }

    #[test]
    fn step_equal_to_window_size_yields_disjoint_windows() {
        let mut window = SlidingWindow::new(3, 3);
        for i in 0..6 {
            window.push(sample(i as f64));
        }
        let first = window.try_take_window().unwrap();
        let second = window.try_take_window().unwrap();
        assert_eq!(first[2], sample(2.0));
        assert_eq!(second[0], sample(3.0));
        assert!(window.is_empty());
        assert!(window.try_take_window().is_none());
    }

    #[test]
    #[should_panic(expected = "step must be in 1..=window_size")]
    fn step_larger_than_window_size_is_a_config_error() {
        let _ = SlidingWindow::new(4, 5);
    }
}
