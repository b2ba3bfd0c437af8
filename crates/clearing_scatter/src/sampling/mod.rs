//! Candidate offset sampling inside a clearing's base disc.
//!
//! This module defines the [`DiscSampling`] seam used by the placement runner to
//! propose random offsets, plus the small random helpers shared across the crate.
//! Both strategies are uniform over the disc area, not over the radius.
use mint::Vector2;
use rand::RngCore;

pub mod rejection_disc;
pub mod uniform_disc;

pub use rejection_disc::RejectionDiscSampling;
pub use uniform_disc::UniformDiscSampling;

/// Trait for drawing a random offset inside a disc centred on the origin.
pub trait DiscSampling: Send + Sync {
    fn sample(&self, radius: f32, rng: &mut dyn RngCore) -> Vector2<f32>;
}

/// Generate a random float in the range [0, 1].
///
/// Draws near `u32::MAX` round up to exactly `1.0` in `f32`; callers needing a
/// half-open range clamp with [`next_down`].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a random float in the half-open range `[min, max)`.
///
/// Returns `min` when the range is empty or inverted.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    let v = min + rand01(rng) * (max - min);
    v.clamp(min, next_down(max))
}

/// Compute the next smaller representable float value.
///
/// Returns a value that is strictly less than the input, useful for
/// keeping draws strictly inside a half-open range.
#[inline]
pub(crate) fn next_down(val: f32) -> f32 {
    if val.is_nan() {
        return f32::NAN;
    }

    if val == f32::NEG_INFINITY {
        return f32::NEG_INFINITY;
    }

    if val == f32::INFINITY {
        return f32::MAX;
    }

    if val == 0.0 {
        return -f32::MIN_POSITIVE;
    }

    let bits = val.to_bits();
    if val > 0.0 {
        f32::from_bits(bits.saturating_sub(1))
    } else {
        f32::from_bits(bits.saturating_add(1))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) struct FixedRng {
        pub(crate) value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_values_in_range() {
        let test_values = vec![0, 1, 100, 1000, u32::MAX / 2, u32::MAX - 1, u32::MAX];

        for value in test_values {
            let mut rng = FixedRng { value };
            let result = rand01(&mut rng);
            assert!(
                (0.0..=1.0).contains(&result),
                "rand01({}) = {} is out of range [0,1]",
                value,
                result
            );
        }
    }

    #[test]
    fn rand01_is_closed_at_one() {
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand01(&mut rng), 1.0);
    }

    #[test]
    fn rand_range_stays_below_max() {
        let mut rng = FixedRng { value: u32::MAX };
        let v = rand_range(&mut rng, 10.0, 20.0);
        assert!(v < 20.0);
        assert!(v >= 10.0);

        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand_range(&mut rng, -5.0, 5.0), -5.0);
    }

    #[test]
    fn rand_range_returns_min_for_empty_range() {
        let mut rng = FixedRng { value: 12345 };
        assert_eq!(rand_range(&mut rng, 3.0, 3.0), 3.0);
        assert_eq!(rand_range(&mut rng, 3.0, 1.0), 3.0);
    }

    #[test]
    fn next_down_handles_edge_cases() {
        assert!(next_down(1.0) < 1.0);
        assert!(next_down(0.5) < 0.5);

        let down_min_pos = next_down(f32::MIN_POSITIVE);
        assert!(down_min_pos >= 0.0);
        assert!(down_min_pos < f32::MIN_POSITIVE);

        assert_eq!(next_down(0.0), -f32::MIN_POSITIVE);
        assert!(next_down(-1.0) < -1.0);

        assert_eq!(next_down(f32::INFINITY), f32::MAX);
        assert_eq!(next_down(f32::NEG_INFINITY), f32::NEG_INFINITY);
        assert!(next_down(f32::NAN).is_nan());
    }
}
