// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Tween requests handed to the animator

use crate::adapters::VisualHandle;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Visual property a tween drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenChannel {
    /// Uniform scale
    Scale,
    /// Emissive intensity
    Intensity,
}

/// Easing curve, named the way config files spell them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Decelerating quadratic
    QuadOut,
    /// Decelerating cubic
    CubicOut,
    /// Slight overshoot before settling
    #[default]
    BackOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` to eased progress
    ///
    /// Input is clamped. `BackOut` overshoots 1.0 in the middle of the curve.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::BackOut => {
                const C1: f64 = 1.70158;
                const C3: f64 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u.powi(3) + C1 * u.powi(2)
            }
        }
    }
}

/// A bounded-duration interpolation of one visual property
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    /// Visual being animated
    pub visual: VisualHandle,
    /// Property being animated
    pub channel: TweenChannel,
    /// Start value
    pub from: f64,
    /// End value
    pub to: f64,
    /// Length of the animation
    pub duration: Duration,
    /// Curve
    pub easing: Easing,
}

impl Tween {
    /// Value at `elapsed` into the animation
    pub fn sample(&self, elapsed: Duration) -> f64 {
        let t = if self.duration.is_zero() {
            1.0
        } else {
            elapsed.as_secs_f64() / self.duration.as_secs_f64()
        };
        self.from + (self.to - self.from) * self.easing.apply(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::QuadOut, Easing::CubicOut, Easing::BackOut] {
            assert_relative_eq!(easing.apply(0.0), 0.0, epsilon = 1e-12);
            assert_relative_eq!(easing.apply(1.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(3.0), 1.0);
    }

    #[test]
    fn test_back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::BackOut.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_tween_sample() {
        let tween = Tween {
            visual: VisualHandle::new(1),
            channel: TweenChannel::Scale,
            from: 0.0,
            to: 2.0,
            duration: Duration::from_millis(100),
            easing: Easing::Linear,
        };
        assert_relative_eq!(tween.sample(Duration::from_millis(50)), 1.0);
        assert_relative_eq!(tween.sample(Duration::from_millis(500)), 2.0);
    }

    #[test]
    fn test_zero_duration_tween_jumps_to_end() {
        let tween = Tween {
            visual: VisualHandle::new(1),
            channel: TweenChannel::Intensity,
            from: 1.0,
            to: 0.0,
            duration: Duration::ZERO,
            easing: Easing::QuadOut,
        };
        assert_eq!(tween.sample(Duration::ZERO), 0.0);
    }
}
