//! Rejection-sampled disc offsets.
use mint::Vector2;
use rand::RngCore;

use crate::sampling::{rand01, DiscSampling, UniformDiscSampling};

/// Draws points in the bounding square and keeps the first one inside the disc.
///
/// Each draw is accepted with probability pi/4, so `max_attempts` is only hit for
/// pathological generators; the analytic sampler takes over in that case.
#[derive(Debug, Clone, Copy)]
pub struct RejectionDiscSampling {
    /// Maximum square draws before falling back to [`UniformDiscSampling`].
    pub max_attempts: usize,
}

impl Default for RejectionDiscSampling {
    fn default() -> Self {
        Self { max_attempts: 64 }
    }
}

impl RejectionDiscSampling {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }
}

impl DiscSampling for RejectionDiscSampling {
    fn sample(&self, radius: f32, rng: &mut dyn RngCore) -> Vector2<f32> {
        if !radius.is_finite() || radius <= 0.0 {
            return Vector2 { x: 0.0, y: 0.0 };
        }

        let r2 = radius * radius;
        for _ in 0..self.max_attempts {
            let x = (rand01(rng) * 2.0 - 1.0) * radius;
            let y = (rand01(rng) * 2.0 - 1.0) * radius;
            if x * x + y * y < r2 {
                return Vector2 { x, y };
            }
        }

        UniformDiscSampling.sample(radius, rng)
    }
}
