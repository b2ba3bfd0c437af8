#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub const SAMPLE_SIZE: usize = 30;
pub const WARM_UP: Duration = Duration::from_millis(500);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(3);

/// Criterion tuned for short, allocation-light placement kernels.
pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

/// Throughput in candidates, instances or samples; never zero.
pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// `count` clearing-local points spread over the square `[-half_extent, half_extent]²`.
pub fn square_points(seed: u64, count: usize, half_extent: f32) -> Vec<Vec2> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut unit = move || (rng.next_u32() as f32) / (u32::MAX as f32) * 2.0 - 1.0;
    (0..count)
        .map(|_| Vec2::new(unit() * half_extent, unit() * half_extent))
        .collect()
}
