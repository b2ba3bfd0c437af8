//! Derived polylines for an object path: centre spline, width edges and surround.
//!
//! A [`SplineCache`] is rebuilt from scratch whenever its path changes; it never
//! patches itself incrementally. Edge and surround lists, when present, always have
//! exactly as many entries as the centre list.
use glam::Vec3;

use crate::path::spline::sample_catmull_rom;
use crate::path::{PathPoint, PathSettings};

/// Side of a path, looking along its direction of travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// The line joining a surround sample to an edge sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurroundConnection {
    pub surround: Vec3,
    pub edge: Vec3,
    /// True when the surround connects to the opposite edge (blend taper).
    pub crossed: bool,
}

/// A position along the centre spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStation {
    pub position: Vec3,
    pub width: f32,
    pub forward: Vec3,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplineCache {
    centre: Vec<Vec3>,
    widths: Vec<f32>,
    left: Vec<Vec3>,
    right: Vec<Vec3>,
    left_surround: Vec<Vec3>,
    right_surround: Vec<Vec3>,
    knots: Vec<usize>,
    /// Distance from the first sample to each sample along the centre line.
    cumulative: Vec<f32>,
    /// Total length including the closing segment of a circuit.
    length: f32,
    closed: bool,
    resolution: f32,
    blend_start_samples: usize,
    blend_end_samples: usize,
}

impl SplineCache {
    /// Builds the cache for `points` under `settings`.
    ///
    /// Surround polylines are only built when `include_surround` is set and the
    /// settings carry a surround.
    pub fn build(points: &[PathPoint], settings: &PathSettings, include_surround: bool) -> Self {
        let positions: Vec<Vec3> = points.iter().map(|p| p.position).collect();
        let spline = sample_catmull_rom(&positions, settings.resolution, settings.closed_circuit);
        let n = points.len();

        let centre: Vec<Vec3> = spline.samples.iter().map(|s| s.position).collect();
        let widths: Vec<f32> = spline
            .samples
            .iter()
            .map(|s| {
                let a = points[s.segment].width;
                let b = points[(s.segment + 1) % n.max(1)].width;
                a + (b - a) * s.t
            })
            .collect();

        let mut cumulative = Vec::with_capacity(centre.len());
        let mut acc = 0.0f32;
        for (i, p) in centre.iter().enumerate() {
            if i > 0 {
                acc += p.distance(centre[i - 1]);
            }
            cumulative.push(acc);
        }
        let length = if settings.closed_circuit && centre.len() > 1 {
            acc + centre[centre.len() - 1].distance(centre[0])
        } else {
            acc
        };

        let mut cache = Self {
            centre,
            widths,
            left: Vec::new(),
            right: Vec::new(),
            left_surround: Vec::new(),
            right_surround: Vec::new(),
            knots: spline.knots,
            cumulative,
            length,
            closed: settings.closed_circuit,
            resolution: settings.resolution,
            blend_start_samples: 0,
            blend_end_samples: 0,
        };

        if settings.use_width {
            cache.build_edges(settings, include_surround);
        }
        cache
    }

    fn build_edges(&mut self, settings: &PathSettings, include_surround: bool) {
        let count = self.centre.len();
        let sides: Vec<Vec3> = (0..count).map(|i| self.side_vector(i)).collect();

        self.left = (0..count)
            .map(|i| self.centre[i] + sides[i] * (self.widths[i] * 0.5))
            .collect();
        self.right = (0..count)
            .map(|i| self.centre[i] - sides[i] * (self.widths[i] * 0.5))
            .collect();

        let Some(surround) = settings.surround.filter(|_| include_surround) else {
            return;
        };

        self.left_surround = (0..count)
            .map(|i| self.centre[i] + sides[i] * (self.widths[i] * 0.5 + surround.distance))
            .collect();
        self.right_surround = (0..count)
            .map(|i| self.centre[i] - sides[i] * (self.widths[i] * 0.5 + surround.distance))
            .collect();

        let blend = blend_sample_count(surround.edge_blend_width, self.resolution);
        self.blend_start_samples = if surround.blend_start { blend } else { 0 };
        self.blend_end_samples = if surround.blend_end { blend } else { 0 };
    }

    /// Unit vector pointing to the left of travel at sample `i`.
    fn side_vector(&self, i: usize) -> Vec3 {
        self.forwards_at(i, self.resolution)
            .cross(Vec3::Y)
            .normalize_or(Vec3::NEG_X)
    }

    pub fn len(&self) -> usize {
        self.centre.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centre.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn centre(&self) -> &[Vec3] {
        &self.centre
    }

    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    /// Left edge samples; empty when width is disabled.
    pub fn left(&self) -> &[Vec3] {
        &self.left
    }

    /// Right edge samples; empty when width is disabled.
    pub fn right(&self) -> &[Vec3] {
        &self.right
    }

    pub fn left_surround(&self) -> &[Vec3] {
        &self.left_surround
    }

    pub fn right_surround(&self) -> &[Vec3] {
        &self.right_surround
    }

    pub fn has_surround(&self) -> bool {
        !self.left_surround.is_empty()
    }

    /// Sample index of every path point.
    pub fn knot_sample_indices(&self) -> &[usize] {
        &self.knots
    }

    /// Total centre-line length, including the closing segment of a circuit.
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Index pairs of consecutive samples; circuits include the last-to-first segment.
    pub fn segments(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.centre.len();
        let open = n.saturating_sub(1);
        let closing = (self.closed && n > 1).then(|| (n - 1, 0));
        (0..open).map(|i| (i, i + 1)).chain(closing)
    }

    /// Unit tangent at sample `i`, estimated from the samples `lookahead` units behind
    /// and ahead. Circuits wrap around; open paths clamp at their ends.
    pub fn forwards_at(&self, i: usize, lookahead: f32) -> Vec3 {
        let n = self.centre.len();
        if n < 2 || i >= n {
            return Vec3::Z;
        }

        let steps = ((lookahead / self.resolution).round() as usize).max(1);
        let (behind, ahead) = if self.closed {
            let s = steps % n;
            ((i + n - s) % n, (i + s) % n)
        } else {
            (i.saturating_sub(steps), (i + steps).min(n - 1))
        };

        (self.centre[ahead] - self.centre[behind]).normalize_or(Vec3::Z)
    }

    /// Whether the surround at sample `i` connects to the opposite edge.
    pub fn is_crossed(&self, i: usize) -> bool {
        let n = self.centre.len();
        i < self.blend_start_samples || i >= n.saturating_sub(self.blend_end_samples)
    }

    /// Line joining the surround on `side` to its edge at sample `i`.
    ///
    /// Within the blend range at a blended end, the left surround joins the right
    /// edge and the right surround joins the left edge.
    pub fn surround_connection(&self, i: usize, side: Side) -> Option<SurroundConnection> {
        if !self.has_surround() || i >= self.centre.len() {
            return None;
        }

        let crossed = self.is_crossed(i);
        let (surround, own, opposite) = match side {
            Side::Left => (self.left_surround[i], self.left[i], self.right[i]),
            Side::Right => (self.right_surround[i], self.right[i], self.left[i]),
        };

        Some(SurroundConnection {
            surround,
            edge: if crossed { opposite } else { own },
            crossed,
        })
    }

    /// Position, width and direction at `distance` along the centre line.
    ///
    /// Distances are clamped to the path (wrapped for circuits).
    pub fn station_at_distance(&self, distance: f32) -> Option<PathStation> {
        let n = self.centre.len();
        if n == 0 {
            return None;
        }
        if n == 1 || self.length <= 0.0 {
            return Some(PathStation {
                position: self.centre[0],
                width: self.widths[0],
                forward: Vec3::Z,
            });
        }

        let d = if self.closed {
            distance.rem_euclid(self.length)
        } else {
            distance.clamp(0.0, self.length)
        };

        // Index of the last sample at or before `d`.
        let i = self
            .cumulative
            .partition_point(|&c| c <= d)
            .saturating_sub(1);
        let j = if i + 1 < n {
            i + 1
        } else if self.closed {
            0
        } else {
            i
        };

        let seg_start = self.cumulative[i];
        let seg_end = if j == 0 && self.closed {
            self.length
        } else {
            self.cumulative[j]
        };
        let span = seg_end - seg_start;
        let t = if span > 0.0 {
            ((d - seg_start) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let forward = if i == j {
            self.forwards_at(i, self.resolution)
        } else {
            (self.centre[j] - self.centre[i]).normalize_or(Vec3::Z)
        };

        Some(PathStation {
            position: self.centre[i].lerp(self.centre[j], t),
            width: self.widths[i] + (self.widths[j] - self.widths[i]) * t,
            forward,
        })
    }
}

/// Number of samples tapered at a blended end: `ceil(edge_blend_width / resolution)`.
#[inline]
pub fn blend_sample_count(edge_blend_width: f32, resolution: f32) -> usize {
    if edge_blend_width <= 0.0 || resolution <= 0.0 {
        return 0;
    }
    (edge_blend_width / resolution).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{PathPoint, PathSettings, SurroundSettings};

    fn straight(len: f32, width: f32) -> Vec<PathPoint> {
        vec![
            PathPoint::new(Vec3::ZERO).with_width(width),
            PathPoint::new(Vec3::new(0.0, 0.0, len * 0.5)).with_width(width),
            PathPoint::new(Vec3::new(0.0, 0.0, len)).with_width(width),
        ]
    }

    #[test]
    fn edges_are_offset_by_half_width() {
        let settings = PathSettings::new(1.0).with_width(true);
        let cache = SplineCache::build(&straight(20.0, 4.0), &settings, false);
        assert_eq!(cache.left().len(), cache.len());
        assert_eq!(cache.right().len(), cache.len());
        for i in 0..cache.len() {
            // Travelling along +Z, left is -X.
            assert!((cache.left()[i].x + 2.0).abs() < 1e-4);
            assert!((cache.right()[i].x - 2.0).abs() < 1e-4);
        }
        assert!(!cache.has_surround());
    }

    #[test]
    fn widths_interpolate_between_points() {
        let pts = vec![
            PathPoint::new(Vec3::ZERO).with_width(2.0),
            PathPoint::new(Vec3::new(0.0, 0.0, 10.0)).with_width(6.0),
        ];
        let settings = PathSettings::new(1.0).with_width(true);
        let cache = SplineCache::build(&pts, &settings, false);
        assert_eq!(cache.widths()[0], 2.0);
        assert!((cache.widths()[5] - 4.0).abs() < 1e-5);
        assert_eq!(*cache.widths().last().unwrap(), 6.0);
    }

    #[test]
    fn edges_absent_without_width() {
        let settings = PathSettings::new(1.0);
        let cache = SplineCache::build(&straight(10.0, 3.0), &settings, true);
        assert!(cache.left().is_empty());
        assert!(cache.right().is_empty());
    }

    #[test]
    fn blend_end_crosses_exactly_the_trailing_samples() {
        let (w, r) = (2.5, 1.0);
        let settings = PathSettings::new(r)
            .with_width(true)
            .with_surround(SurroundSettings::new(3.0).with_blend(false, true, w));
        let cache = SplineCache::build(&straight(20.0, 4.0), &settings, true);
        let n = cache.len();
        let k = blend_sample_count(w, r);
        assert_eq!(k, 3);

        for from_end in 1..=k {
            let i = n - from_end;
            let c = cache.surround_connection(i, Side::Left).unwrap();
            assert!(c.crossed);
            assert_eq!(c.edge, cache.right()[i]);
            assert_eq!(c.surround, cache.left_surround()[i]);
            let c = cache.surround_connection(i, Side::Right).unwrap();
            assert_eq!(c.edge, cache.left()[i]);
        }

        let i = n - (k + 1);
        let c = cache.surround_connection(i, Side::Left).unwrap();
        assert!(!c.crossed);
        assert_eq!(c.edge, cache.left()[i]);

        assert!(!cache.surround_connection(0, Side::Left).unwrap().crossed);
    }

    #[test]
    fn blend_start_crosses_the_leading_samples() {
        let settings = PathSettings::new(0.5)
            .with_width(true)
            .with_surround(SurroundSettings::new(1.0).with_blend(true, false, 1.2));
        let cache = SplineCache::build(&straight(10.0, 2.0), &settings, true);
        let k = blend_sample_count(1.2, 0.5);
        assert_eq!(k, 3);
        let crossed: Vec<bool> = (0..cache.len()).map(|i| cache.is_crossed(i)).collect();
        assert!(crossed[..k].iter().all(|&c| c));
        assert!(crossed[k..].iter().all(|&c| !c));
    }

    #[test]
    fn surround_lies_beyond_the_edges() {
        let settings = PathSettings::new(1.0)
            .with_width(true)
            .with_surround(SurroundSettings::new(3.0));
        let cache = SplineCache::build(&straight(10.0, 4.0), &settings, true);
        assert_eq!(cache.left_surround().len(), cache.len());
        assert!((cache.left_surround()[4].x + 5.0).abs() < 1e-4);
        assert!((cache.right_surround()[4].x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn forwards_follows_the_path() {
        let settings = PathSettings::new(1.0);
        let cache = SplineCache::build(&straight(10.0, 1.0), &settings, false);
        let f = cache.forwards_at(3, 2.0);
        assert!((f - Vec3::Z).length() < 1e-4);
        let end = cache.forwards_at(cache.len() - 1, 1.0);
        assert!((end - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn closed_segments_include_the_closing_edge_once() {
        let pts = vec![
            PathPoint::new(Vec3::ZERO),
            PathPoint::new(Vec3::new(4.0, 0.0, 0.0)),
            PathPoint::new(Vec3::new(4.0, 0.0, 4.0)),
        ];
        let settings = PathSettings::new(1.0).closed(true);
        let cache = SplineCache::build(&pts, &settings, false);
        let segs: Vec<_> = cache.segments().collect();
        assert_eq!(segs.len(), cache.len());
        assert_eq!(*segs.last().unwrap(), (cache.len() - 1, 0));
        assert_eq!(segs.iter().filter(|(_, b)| *b == 0).count(), 1);
    }

    #[test]
    fn station_at_distance_walks_the_centre_line() {
        let settings = PathSettings::new(1.0).with_width(true);
        let cache = SplineCache::build(&straight(10.0, 2.0), &settings, false);
        assert!((cache.length() - 10.0).abs() < 1e-3);

        let s = cache.station_at_distance(2.5).unwrap();
        assert!((s.position - Vec3::new(0.0, 0.0, 2.5)).length() < 1e-3);
        assert!((s.forward - Vec3::Z).length() < 1e-4);
        assert!((s.width - 2.0).abs() < 1e-5);

        let end = cache.station_at_distance(50.0).unwrap();
        assert!((end.position - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-3);
    }

    #[test]
    fn blend_sample_count_rounds_up() {
        assert_eq!(blend_sample_count(3.0, 1.0), 3);
        assert_eq!(blend_sample_count(3.1, 1.0), 4);
        assert_eq!(blend_sample_count(0.0, 1.0), 0);
    }
}
