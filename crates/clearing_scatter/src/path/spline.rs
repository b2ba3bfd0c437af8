//! Uniform Catmull-Rom sampling through an ordered point list.
use glam::Vec3;

/// One sampled point of a centre spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSample {
    pub position: Vec3,
    /// Index of the segment (starting knot) this sample belongs to.
    pub segment: usize,
    /// Interpolation parameter in `[0, 1]` within the segment.
    pub t: f32,
}

/// Sampled centre spline plus the sample index of every input point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledSpline {
    pub samples: Vec<SplineSample>,
    pub knots: Vec<usize>,
}

/// Evaluates one uniform Catmull-Rom segment between `p1` and `p2`.
#[inline]
pub fn catmull_rom(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (p2 - p0) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
}

/// Number of samples taken for a segment of the given length.
#[inline]
pub fn samples_for_segment(length: f32, resolution: f32) -> usize {
    ((length / resolution).ceil() as usize).max(1)
}

/// Samples a Catmull-Rom spline through `points`, roughly every `resolution` units.
///
/// Each segment starts with its knot, so every input point appears unchanged in the
/// output. Open paths end with the last point; closed paths include the segment back
/// to the first point without repeating it. Open ends use mirrored phantom points.
pub fn sample_catmull_rom(points: &[Vec3], resolution: f32, closed: bool) -> SampledSpline {
    let n = points.len();
    if n == 0 {
        return SampledSpline::default();
    }
    if n == 1 {
        return SampledSpline {
            samples: vec![SplineSample {
                position: points[0],
                segment: 0,
                t: 0.0,
            }],
            knots: vec![0],
        };
    }

    let segments = if closed { n } else { n - 1 };
    let mut out = SampledSpline {
        samples: Vec::new(),
        knots: Vec::with_capacity(n),
    };

    for seg in 0..segments {
        let p1 = points[seg];
        let p2 = points[(seg + 1) % n];
        let p0 = if seg == 0 && !closed {
            2.0 * p1 - p2
        } else {
            points[(seg + n - 1) % n]
        };
        let p3 = if seg + 2 >= n && !closed {
            2.0 * p2 - p1
        } else {
            points[(seg + 2) % n]
        };

        out.knots.push(out.samples.len());
        let steps = samples_for_segment(p1.distance(p2), resolution);
        for s in 0..steps {
            let t = s as f32 / steps as f32;
            let position = if s == 0 {
                p1
            } else {
                catmull_rom(p0, p1, p2, p3, t)
            };
            out.samples.push(SplineSample {
                position,
                segment: seg,
                t,
            });
        }
    }

    if !closed {
        out.knots.push(out.samples.len());
        out.samples.push(SplineSample {
            position: points[n - 1],
            segment: n - 2,
            t: 1.0,
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 5.0),
            Vec3::new(20.0, 1.0, -3.0),
            Vec3::new(27.5, 0.5, 8.0),
        ]
    }

    #[test]
    fn catmull_rom_hits_knots_at_segment_ends() {
        let (p0, p1, p2, p3) = (
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(2.0, 0.0, 1.0),
        );
        assert!(catmull_rom(p0, p1, p2, p3, 0.0).distance(p1) < 1e-6);
        assert!(catmull_rom(p0, p1, p2, p3, 1.0).distance(p2) < 1e-5);
    }

    #[test]
    fn open_spline_reproduces_every_point() {
        let pts = zigzag();
        let spline = sample_catmull_rom(&pts, 0.5, false);
        assert_eq!(spline.knots.len(), pts.len());
        for (i, &k) in spline.knots.iter().enumerate() {
            assert!(spline.samples[k].position.distance(pts[i]) < 1e-5);
        }
        assert_eq!(*spline.knots.last().unwrap(), spline.samples.len() - 1);
    }

    #[test]
    fn closed_spline_does_not_repeat_first_point() {
        let pts = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 10.0),
            Vec3::new(0.0, 0.0, 10.0),
        ];
        let spline = sample_catmull_rom(&pts, 1.0, true);
        assert_eq!(spline.samples.len(), 40);
        assert_eq!(spline.knots, vec![0, 10, 20, 30]);
        let last = spline.samples.last().unwrap();
        assert_eq!(last.segment, 3);
        assert!(last.t < 1.0);
        assert!(last.position.distance(pts[0]) > 0.5);
    }

    #[test]
    fn sampling_is_deterministic() {
        let pts = zigzag();
        assert_eq!(
            sample_catmull_rom(&pts, 0.75, false),
            sample_catmull_rom(&pts, 0.75, false)
        );
    }

    #[test]
    fn coarse_resolution_still_samples_each_segment() {
        let pts = zigzag();
        let spline = sample_catmull_rom(&pts, 1000.0, false);
        assert_eq!(spline.samples.len(), pts.len());
    }
}
