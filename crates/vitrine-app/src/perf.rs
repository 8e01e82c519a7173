// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Tiny rolling frame time tracker.

use std::collections::VecDeque;

#[derive(Clone, Debug)]
pub struct PerfStats {
    frame_ms: VecDeque<f32>,
    max_samples: usize,
}

impl Default for PerfStats {
    fn default() -> Self {
        Self {
            frame_ms: VecDeque::with_capacity(240),
            max_samples: 240,
        }
    }
}

impl PerfStats {
    pub fn push(&mut self, frame: f32) {
        if self.frame_ms.len() == self.max_samples {
            self.frame_ms.pop_front();
        }
        self.frame_ms.push_back(frame);
    }

    /// Average FPS over the window.
    #[allow(clippy::cast_precision_loss)]
    pub fn fps(&self) -> f32 {
        let total: f32 = self.frame_ms.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        self.frame_ms.len() as f32 * 1000.0 / total
    }

    /// True once the window has filled (a new average is worth logging).
    pub fn is_full(&self) -> bool {
        self.frame_ms.len() == self.max_samples
    }

    pub fn clear(&mut self) {
        self.frame_ms.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn averages_over_window() {
        let mut perf = PerfStats::default();
        assert_eq!(perf.fps(), 0.0);
        perf.push(10.0);
        perf.push(30.0);
        assert_relative_eq!(perf.fps(), 50.0);
    }

    #[test]
    fn window_is_bounded() {
        let mut perf = PerfStats::default();
        for _ in 0..1000 {
            perf.push(100.0);
        }
        assert!(perf.is_full());
        perf.push(1.0);
        assert!(perf.fps() > 10.0);
        perf.clear();
        assert!(!perf.is_full());
    }
}
