//! Analytic area-uniform disc sampling.
use std::f32::consts::TAU;

use mint::Vector2;
use rand::RngCore;

use crate::sampling::{next_down, rand01, DiscSampling};

/// Draws offsets with `r = R * sqrt(u)`, which is uniform over the disc area.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDiscSampling;

impl UniformDiscSampling {
    pub fn new() -> Self {
        Self
    }
}

impl DiscSampling for UniformDiscSampling {
    fn sample(&self, radius: f32, rng: &mut dyn RngCore) -> Vector2<f32> {
        if !radius.is_finite() || radius <= 0.0 {
            return Vector2 { x: 0.0, y: 0.0 };
        }

        let r = (radius * rand01(rng).sqrt()).min(next_down(radius));
        let theta = rand01(rng) * TAU;
        Vector2 {
            x: r * theta.cos(),
            y: r * theta.sin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn samples_stay_inside_disc() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = UniformDiscSampling::new();
        for _ in 0..2_000 {
            let p = Vec2::from(s.sample(25.0, &mut rng));
            assert!(p.length_squared() < 25.0 * 25.0 + 1e-3);
        }
    }

    #[test]
    fn inner_half_radius_receives_a_quarter_of_samples() {
        let mut rng = StdRng::seed_from_u64(99);
        let s = UniformDiscSampling::new();
        let n = 20_000;
        let inner = (0..n)
            .map(|_| Vec2::from(s.sample(10.0, &mut rng)))
            .filter(|p| p.length() < 5.0)
            .count();
        let ratio = inner as f32 / n as f32;
        assert!((ratio - 0.25).abs() < 0.02, "inner ratio was {ratio}");
    }

    #[test]
    fn non_positive_radius_returns_origin() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = UniformDiscSampling::new();
        let p = s.sample(0.0, &mut rng);
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }
}
