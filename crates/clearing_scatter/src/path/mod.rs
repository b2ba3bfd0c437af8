//! Object paths: ordered point sequences defining a spline with optional width and
//! surround, used for roads, rivers and other linear features.
//!
//! An [`ObjectPath`] owns its points and a derived [`SplineCache`]. Every mutating
//! method marks the cache dirty; [`ObjectPath::refresh_positions`] rebuilds it.
use std::borrow::Cow;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub mod cache;
pub mod spline;

pub use cache::{blend_sample_count, PathStation, Side, SplineCache, SurroundConnection};

pub type PathId = String;

/// Minimum length of a path segment; shorter segments are rejected as degenerate.
pub const MIN_SEGMENT_LENGTH: f32 = 1e-4;

/// Rotation of an object placed at a path point.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathPointRotation {
    /// Fixed yaw in degrees.
    Fixed(f32),
    /// Yaw drawn uniformly from `[min, max)` degrees.
    Random { min: f32, max: f32 },
}

impl Default for PathPointRotation {
    fn default() -> Self {
        PathPointRotation::Fixed(0.0)
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub position: Vec3,
    pub rotation: PathPointRotation,
    /// Path width at this point; only used when the path has width enabled.
    pub width: f32,
}

impl PathPoint {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: PathPointRotation::default(),
            width: 0.0,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn with_rotation(mut self, rotation: PathPointRotation) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Extra polylines outside the edges used to blend a path into its surroundings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurroundSettings {
    /// Distance from each edge to its surround line.
    pub distance: f32,
    pub blend_start: bool,
    pub blend_end: bool,
    /// Length over which a blended end tapers.
    pub edge_blend_width: f32,
}

impl SurroundSettings {
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            blend_start: false,
            blend_end: false,
            edge_blend_width: 0.0,
        }
    }

    pub fn with_blend(mut self, start: bool, end: bool, edge_blend_width: f32) -> Self {
        self.blend_start = start;
        self.blend_end = end;
        self.edge_blend_width = edge_blend_width;
        self
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSettings {
    /// Approximate distance between centre spline samples.
    pub resolution: f32,
    pub use_width: bool,
    pub closed_circuit: bool,
    pub surround: Option<SurroundSettings>,
}

impl PathSettings {
    pub fn new(resolution: f32) -> Self {
        Self {
            resolution,
            use_width: false,
            closed_circuit: false,
            surround: None,
        }
    }

    pub fn with_width(mut self, use_width: bool) -> Self {
        self.use_width = use_width;
        self
    }

    pub fn closed(mut self, closed_circuit: bool) -> Self {
        self.closed_circuit = closed_circuit;
        self
    }

    pub fn with_surround(mut self, surround: SurroundSettings) -> Self {
        self.surround = Some(surround);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolution <= 0.0 || !self.resolution.is_finite() {
            return Err(Error::DegenerateGeometry(
                "path resolution must be > 0".into(),
            ));
        }
        if let Some(s) = &self.surround {
            if !self.use_width {
                return Err(Error::InvalidConfig(
                    "path surround requires width to be enabled".into(),
                ));
            }
            if s.distance < 0.0 || s.edge_blend_width < 0.0 {
                return Err(Error::InvalidConfig(
                    "path surround distance and blend width must be >= 0".into(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for PathSettings {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(feature = "serde")]
fn dirty_on_load() -> bool {
    true
}

/// An ordered sequence of path points with a lazily rebuilt spline cache.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct ObjectPath {
    pub id: PathId,
    points: Vec<PathPoint>,
    settings: PathSettings,
    #[cfg_attr(feature = "serde", serde(skip))]
    cache: SplineCache,
    #[cfg_attr(feature = "serde", serde(skip, default = "dirty_on_load"))]
    dirty: bool,
}

impl ObjectPath {
    /// Creates a path, rejecting degenerate geometry.
    pub fn try_new(
        id: impl Into<PathId>,
        points: Vec<PathPoint>,
        settings: PathSettings,
    ) -> Result<Self> {
        let id = id.into();
        settings.validate()?;
        validate_points(&id, &points, settings.closed_circuit)?;
        Ok(Self {
            id,
            points,
            settings,
            cache: SplineCache::default(),
            dirty: true,
        })
    }

    /// Re-checks settings and point geometry, e.g. after deserialization.
    pub fn validate(&self) -> Result<()> {
        self.settings.validate()?;
        validate_points(&self.id, &self.points, self.settings.closed_circuit)
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn settings(&self) -> &PathSettings {
        &self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The cached polylines, or `None` while the cache is stale.
    pub fn cache(&self) -> Option<&SplineCache> {
        (!self.dirty).then_some(&self.cache)
    }

    /// Marks the spline cache stale.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Rebuilds the spline cache if it is stale, forced, or missing a requested surround.
    pub fn refresh_positions(&mut self, include_surround: bool, force_full: bool) {
        let missing_surround =
            include_surround && self.settings.surround.is_some() && !self.cache.has_surround();
        if !(self.dirty || force_full || missing_surround) {
            return;
        }

        self.cache = SplineCache::build(&self.points, &self.settings, include_surround);
        self.dirty = false;
        debug!(
            "Path '{}' cache rebuilt: {} samples, length {:.2}.",
            self.id,
            self.cache.len(),
            self.cache.length()
        );
    }

    /// Returns the current cache, or a freshly built one if it is stale.
    pub fn cache_or_build(&self, include_surround: bool) -> Cow<'_, SplineCache> {
        match self.cache() {
            Some(cache)
                if !include_surround
                    || self.settings.surround.is_none()
                    || cache.has_surround() =>
            {
                Cow::Borrowed(cache)
            }
            _ => Cow::Owned(SplineCache::build(
                &self.points,
                &self.settings,
                include_surround,
            )),
        }
    }

    pub fn set_settings(&mut self, settings: PathSettings) -> Result<()> {
        settings.validate()?;
        validate_points(&self.id, &self.points, settings.closed_circuit)?;
        self.settings = settings;
        self.dirty = true;
        Ok(())
    }

    pub fn set_point_position(&mut self, index: usize, position: Vec3) -> Result<()> {
        let mut points = self.points.clone();
        let point = points
            .get_mut(index)
            .ok_or_else(|| Error::InvalidConfig(format!("path point {index} out of range")))?;
        point.position = position;
        validate_points(&self.id, &points, self.settings.closed_circuit)?;
        self.points = points;
        self.dirty = true;
        Ok(())
    }

    pub fn set_point_width(&mut self, index: usize, width: f32) -> Result<()> {
        let point = self
            .points
            .get_mut(index)
            .ok_or_else(|| Error::InvalidConfig(format!("path point {index} out of range")))?;
        point.width = width;
        self.dirty = true;
        Ok(())
    }

    pub fn insert_point(&mut self, index: usize, point: PathPoint) -> Result<()> {
        if index > self.points.len() {
            return Err(Error::InvalidConfig(format!(
                "path point {index} out of range"
            )));
        }
        let mut points = self.points.clone();
        points.insert(index, point);
        validate_points(&self.id, &points, self.settings.closed_circuit)?;
        self.points = points;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_point(&mut self, index: usize) -> Result<PathPoint> {
        if index >= self.points.len() {
            return Err(Error::InvalidConfig(format!(
                "path point {index} out of range"
            )));
        }
        let mut points = self.points.clone();
        let removed = points.remove(index);
        validate_points(&self.id, &points, self.settings.closed_circuit)?;
        self.points = points;
        self.dirty = true;
        Ok(removed)
    }
}

fn validate_points(id: &str, points: &[PathPoint], closed: bool) -> Result<()> {
    let min = if closed { 3 } else { 2 };
    if points.len() < min {
        return Err(Error::DegenerateGeometry(format!(
            "path '{id}' needs at least {min} points, got {}",
            points.len()
        )));
    }

    let n = points.len();
    let segments = if closed { n } else { n - 1 };
    for i in 0..segments {
        let a = points[i].position;
        let b = points[(i + 1) % n].position;
        if a.distance_squared(b) < MIN_SEGMENT_LENGTH * MIN_SEGMENT_LENGTH {
            return Err(Error::DegenerateGeometry(format!(
                "path '{id}' segment {i} has zero length"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<PathPoint> {
        vec![
            PathPoint::new(Vec3::new(0.0, 0.0, 0.0)).with_width(3.0),
            PathPoint::new(Vec3::new(8.0, 0.0, 6.0)).with_width(3.0),
            PathPoint::new(Vec3::new(16.0, 2.0, 2.0)).with_width(5.0),
            PathPoint::new(Vec3::new(30.0, 0.0, 10.0)).with_width(4.0),
        ]
    }

    #[test]
    fn spline_round_trip_reproduces_points() {
        let mut path =
            ObjectPath::try_new("river", points(), PathSettings::new(0.25).with_width(true))
                .unwrap();
        path.refresh_positions(false, false);
        let cache = path.cache().unwrap();
        for (p, &k) in path.points().iter().zip(cache.knot_sample_indices()) {
            assert!(cache.centre()[k].distance(p.position) < 1e-4);
        }
        // Every original point appears among the sampled centre points.
        for p in path.points() {
            assert!(cache
                .centre()
                .iter()
                .any(|c| c.distance(p.position) < 1e-4));
        }
    }

    #[test]
    fn zero_length_segment_is_rejected() {
        let mut pts = points();
        pts[2].position = pts[1].position;
        let err = ObjectPath::try_new("p", pts, PathSettings::default()).unwrap_err();
        assert!(matches!(err, Error::DegenerateGeometry(_)));
    }

    #[test]
    fn closing_segment_of_a_circuit_is_validated() {
        let mut pts = points();
        pts[3].position = pts[0].position;
        assert!(ObjectPath::try_new("open", pts.clone(), PathSettings::default()).is_ok());
        assert!(ObjectPath::try_new("loop", pts, PathSettings::default().closed(true)).is_err());
    }

    #[test]
    fn too_few_points_is_rejected() {
        let pts = vec![PathPoint::new(Vec3::ZERO)];
        assert!(ObjectPath::try_new("p", pts, PathSettings::default()).is_err());
    }

    #[test]
    fn surround_without_width_is_rejected() {
        let settings = PathSettings::new(1.0).with_surround(SurroundSettings::new(2.0));
        let err = ObjectPath::try_new("p", points(), settings).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn clearing_validation_rechecks_owned_paths() {
        use crate::scatter::clearing::Clearing;
        use crate::scatter::member::Member;

        // Built field by field, as a deserialized path would be.
        let collapsed = ObjectPath {
            id: "ford".into(),
            points: vec![PathPoint::new(Vec3::ONE), PathPoint::new(Vec3::ONE)],
            settings: PathSettings::new(0.5),
            cache: SplineCache::default(),
            dirty: true,
        };
        assert!(matches!(
            collapsed.validate(),
            Err(Error::DegenerateGeometry(_))
        ));

        let clearing = Clearing::try_new(Vec3::ZERO, 10.0)
            .unwrap()
            .with_path(collapsed)
            .with_member(Member::new("rock"));
        assert!(matches!(
            clearing.validate(),
            Err(Error::DegenerateGeometry(_))
        ));

        let healthy = ObjectPath::try_new("river", points(), PathSettings::new(0.5)).unwrap();
        assert!(healthy.validate().is_ok());
    }

    #[test]
    fn mutations_invalidate_the_cache() {
        let mut path = ObjectPath::try_new("p", points(), PathSettings::default()).unwrap();
        assert!(path.cache().is_none());
        path.refresh_positions(false, false);
        assert!(path.cache().is_some());

        path.set_point_width(0, 9.0).unwrap();
        assert!(path.is_dirty());
        path.refresh_positions(false, false);

        path.set_point_position(1, Vec3::new(8.0, 1.0, 7.0)).unwrap();
        assert!(path.cache().is_none());
        path.refresh_positions(false, false);

        path.insert_point(4, PathPoint::new(Vec3::new(40.0, 0.0, 10.0)))
            .unwrap();
        assert!(path.is_dirty());
        path.refresh_positions(false, false);
        assert_eq!(path.cache().unwrap().knot_sample_indices().len(), 5);
    }

    #[test]
    fn rejected_mutation_keeps_previous_points() {
        let mut path = ObjectPath::try_new("p", points(), PathSettings::default()).unwrap();
        path.refresh_positions(false, false);
        let before = path.points().to_vec();
        assert!(path.set_point_position(1, Vec3::ZERO).is_err());
        assert_eq!(path.points(), before.as_slice());
        assert!(!path.is_dirty());
    }

    #[test]
    fn refresh_builds_missing_surround() {
        let settings = PathSettings::new(1.0)
            .with_width(true)
            .with_surround(SurroundSettings::new(2.0));
        let mut path = ObjectPath::try_new("p", points(), settings).unwrap();
        path.refresh_positions(false, false);
        assert!(!path.cache().unwrap().has_surround());
        path.refresh_positions(true, false);
        assert!(path.cache().unwrap().has_surround());
    }

    #[test]
    fn cache_or_build_borrows_a_fresh_cache() {
        let mut path = ObjectPath::try_new("p", points(), PathSettings::default()).unwrap();
        assert!(matches!(
            path.cache_or_build(false),
            Cow::Owned(_)
        ));
        path.refresh_positions(false, false);
        assert!(matches!(
            path.cache_or_build(false),
            Cow::Borrowed(_)
        ));
    }
}
