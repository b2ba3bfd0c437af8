//! Members: placement rules producing instances of one prototype within a clearing.
use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::PathId;
use crate::scatter::rotation::RotationRule;
use crate::zone::{ZoneId, ZoneMode};

/// Opaque identifier of the prototype a member instantiates.
pub type PrototypeId = String;

/// How a member proposes candidate positions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MemberPlacement {
    /// Area-uniform random offsets within the clearing disc.
    #[default]
    Random,
    /// A single instance at the clearing origin.
    Centre,
    /// Stations along one of the clearing's object paths.
    AlongPath(PathPlacement),
}

/// Layout of a member along an object path.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PathPlacement {
    pub path: PathId,
    /// Distance between stations along the centre line. `None` places one station at
    /// every path point and uses the point's rotation.
    pub spacing: Option<f32>,
    /// Add the path's direction of travel to the instance yaw.
    pub align_to_path: bool,
    /// Shift each station randomly across the path width.
    pub lateral_jitter: bool,
}

impl PathPlacement {
    /// One station per path point.
    pub fn at_points(path: impl Into<PathId>) -> Self {
        Self {
            path: path.into(),
            spacing: None,
            align_to_path: false,
            lateral_jitter: false,
        }
    }

    /// Stations every `spacing` units along the path.
    pub fn every(path: impl Into<PathId>, spacing: f32) -> Self {
        Self {
            path: path.into(),
            spacing: Some(spacing),
            align_to_path: true,
            lateral_jitter: false,
        }
    }

    pub fn with_alignment(mut self, align_to_path: bool) -> Self {
        self.align_to_path = align_to_path;
        self
    }

    pub fn with_lateral_jitter(mut self, lateral_jitter: bool) -> Self {
        self.lateral_jitter = lateral_jitter;
        self
    }
}

/// A placement rule for one prototype.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Member {
    pub prototype: PrototypeId,
    /// Target instances per square kilometre of the clearing's bounding square.
    pub density: f32,
    /// Absolute maximum number of instances.
    pub max_per_group: u32,
    pub placement: MemberPlacement,
    /// Offset range; X and Z are drawn uniformly, Y uses `min_offset.y` unless
    /// `randomise_offset_y` is set.
    pub min_offset: Vec3,
    pub max_offset: Vec3,
    pub randomise_offset_y: bool,
    /// Model-space offset applied after rotation, scaled by the instance scale.
    pub model_offset: Vec3,
    pub min_scale: f32,
    pub max_scale: f32,
    pub rotation: RotationRule,
    /// Base yaw in degrees, or the start of the random yaw range.
    pub start_rotation_y: f32,
    pub end_rotation_y: f32,
    pub randomise_rotation_y: bool,
    /// Maximum random tilt around X and Z in degrees; zero disables tilt.
    pub max_tilt: f32,
    /// Exclusion radius this member's instances demand.
    pub proximity_extent: f32,
    pub ignore_proximity_of_others: bool,
    pub proximity_ignored_by_others: bool,
    pub zone_ids: Vec<ZoneId>,
    /// Combination mode for `zone_ids`; falls back to the first zone's mode.
    pub zone_mode: Option<ZoneMode>,
}

impl Member {
    pub fn new(prototype: impl Into<PrototypeId>) -> Self {
        Self {
            prototype: prototype.into(),
            density: 100.0,
            max_per_group: 100,
            placement: MemberPlacement::Random,
            min_offset: Vec3::ZERO,
            max_offset: Vec3::ZERO,
            randomise_offset_y: false,
            model_offset: Vec3::ZERO,
            min_scale: 1.0,
            max_scale: 1.0,
            rotation: RotationRule::WorldSpace,
            start_rotation_y: 0.0,
            end_rotation_y: 360.0,
            randomise_rotation_y: true,
            max_tilt: 0.0,
            proximity_extent: 1.0,
            ignore_proximity_of_others: false,
            proximity_ignored_by_others: false,
            zone_ids: Vec::new(),
            zone_mode: None,
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_max_per_group(mut self, max_per_group: u32) -> Self {
        self.max_per_group = max_per_group;
        self
    }

    pub fn placed_in_centre(mut self) -> Self {
        self.placement = MemberPlacement::Centre;
        self
    }

    pub fn along_path(mut self, placement: PathPlacement) -> Self {
        self.placement = MemberPlacement::AlongPath(placement);
        self
    }

    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.min_offset = offset;
        self.max_offset = offset;
        self
    }

    pub fn with_offset_range(mut self, min: Vec3, max: Vec3, randomise_y: bool) -> Self {
        self.min_offset = min;
        self.max_offset = max;
        self.randomise_offset_y = randomise_y;
        self
    }

    pub fn with_model_offset(mut self, model_offset: Vec3) -> Self {
        self.model_offset = model_offset;
        self
    }

    pub fn with_scale_range(mut self, min: f32, max: f32) -> Self {
        self.min_scale = min;
        self.max_scale = max;
        self
    }

    pub fn with_rotation_rule(mut self, rule: RotationRule) -> Self {
        self.rotation = rule;
        self
    }

    /// Fixed base yaw in degrees.
    pub fn with_fixed_rotation_y(mut self, yaw: f32) -> Self {
        self.start_rotation_y = yaw;
        self.end_rotation_y = yaw;
        self.randomise_rotation_y = false;
        self
    }

    /// Base yaw drawn uniformly from `[start, end)` degrees.
    pub fn with_random_rotation_y(mut self, start: f32, end: f32) -> Self {
        self.start_rotation_y = start;
        self.end_rotation_y = end;
        self.randomise_rotation_y = true;
        self
    }

    pub fn with_max_tilt(mut self, max_tilt: f32) -> Self {
        self.max_tilt = max_tilt;
        self
    }

    pub fn with_proximity_extent(mut self, extent: f32) -> Self {
        self.proximity_extent = extent;
        self
    }

    pub fn ignoring_proximity_of_others(mut self, ignore: bool) -> Self {
        self.ignore_proximity_of_others = ignore;
        self
    }

    pub fn ignored_by_others(mut self, ignored: bool) -> Self {
        self.proximity_ignored_by_others = ignored;
        self
    }

    pub fn with_zone(mut self, zone: impl Into<ZoneId>) -> Self {
        self.zone_ids.push(zone.into());
        self
    }

    pub fn with_zones<I, Z>(mut self, zones: I, mode: ZoneMode) -> Self
    where
        I: IntoIterator<Item = Z>,
        Z: Into<ZoneId>,
    {
        self.zone_ids = zones.into_iter().map(Into::into).collect();
        self.zone_mode = Some(mode);
        self
    }

    pub fn is_placed_in_centre(&self) -> bool {
        matches!(self.placement, MemberPlacement::Centre)
    }

    /// Number of instances a disc or centre member aims for in a clearing of `radius`.
    ///
    /// `round(4·r² / area_unit · density)` clamped to `[1, max_per_group]`; always 1
    /// for centre placement.
    pub fn target_count(&self, radius: f32, area_unit: f64) -> u32 {
        if self.is_placed_in_centre() {
            return 1;
        }
        let r = radius as f64;
        let raw = (4.0 * r * r / area_unit * self.density as f64).round();
        let max = self.max_per_group.max(1);
        if raw >= max as f64 {
            max
        } else {
            (raw as u32).clamp(1, max)
        }
    }

    /// Checks ranges and limits; `index` is used for error context.
    pub fn validate(&self, index: usize) -> Result<()> {
        let fail = |msg: &str| {
            Err(Error::InvalidConfig(format!(
                "member {index} ('{}'): {msg}",
                self.prototype
            )))
        };

        if self.max_per_group == 0 {
            return fail("max_per_group must be >= 1");
        }
        if self.density < 0.0 || !self.density.is_finite() {
            return fail("density must be finite and >= 0");
        }
        if self.min_scale <= 0.0 || self.max_scale < self.min_scale {
            return fail("scale range must be positive and ordered");
        }
        if self.proximity_extent < 0.0 || !self.proximity_extent.is_finite() {
            return fail("proximity extent must be finite and >= 0");
        }
        if self.max_tilt < 0.0 {
            return fail("max tilt must be >= 0");
        }
        if self.min_offset.cmpgt(self.max_offset).any() {
            return fail("offset range must be ordered");
        }
        if self.randomise_rotation_y && self.end_rotation_y < self.start_rotation_y {
            return fail("rotation range must be ordered");
        }
        if self.rotation == RotationRule::FaceZoneCentre && self.zone_ids.is_empty() {
            return fail("face-zone-centre rotation needs at least one zone");
        }
        if let MemberPlacement::AlongPath(p) = &self.placement {
            if let Some(spacing) = p.spacing {
                if spacing <= 0.0 || !spacing.is_finite() {
                    return fail("path spacing must be > 0");
                }
            }
        }
        Ok(())
    }
}
