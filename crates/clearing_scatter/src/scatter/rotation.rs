//! Rotation rules applied to placed instances.
//!
//! Yaw follows a Y-up convention: a yaw of 0 degrees faces +Z and 90 degrees faces +X.
use glam::{EulerRot, Quat, Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::scatter::clearing::Clearing;
use crate::zone::{Zone, ZoneShape};

/// Frame added to a member's base yaw.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationRule {
    /// No additional yaw.
    #[default]
    WorldSpace,
    /// The clearing's own yaw.
    GroupSpace,
    /// Face the clearing's centre.
    FaceGroupCentre,
    /// Face the centre of the member's first referenced zone.
    FaceZoneCentre,
}

/// Triangular quarter of a rectangle split along its diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    /// Below the centre (local -Z); faces +Z.
    Bottom,
    /// Left of the centre (local -X); faces +X.
    Left,
    /// Above the centre (local +Z); faces -Z.
    Top,
    /// Right of the centre (local +X); faces -X.
    Right,
}

impl Quadrant {
    /// Yaw in degrees that faces the rectangle's centre from this quadrant.
    pub fn yaw(self) -> f32 {
        match self {
            Quadrant::Bottom => 0.0,
            Quadrant::Left => 90.0,
            Quadrant::Top => 180.0,
            Quadrant::Right => -90.0,
        }
    }
}

/// Yaw in degrees that looks from `from` towards `to` on the XZ plane.
///
/// Returns `None` when the points coincide on that plane.
pub fn yaw_towards(from: Vec3, to: Vec3) -> Option<f32> {
    let dir = Vec2::new(to.x - from.x, to.z - from.z).try_normalize()?;
    Some(dir.x.atan2(dir.y).to_degrees())
}

/// Classifies `offset` (from the rectangle centre, normalized by the clearing radius)
/// into one of the four triangles cut by the rectangle's diagonals.
///
/// The diagonals are expressed against the longer axis: `z = ±(length / width)·x`
/// when `width >= length`, `x = ±(width / length)·z` otherwise. Points exactly on a
/// diagonal fall to the left/right pair in the first branch and to the top/bottom
/// pair in the second.
pub fn rectangle_quadrant(offset: Vec2, width: f32, length: f32) -> Quadrant {
    let (x, z) = (offset.x, offset.y);
    if width >= length {
        let gradient = length / width;
        let bound = gradient * x.abs();
        if z > bound {
            Quadrant::Top
        } else if z < -bound {
            Quadrant::Bottom
        } else if x >= 0.0 {
            Quadrant::Right
        } else {
            Quadrant::Left
        }
    } else {
        let gradient = width / length;
        let bound = gradient * z.abs();
        if x > bound {
            Quadrant::Right
        } else if x < -bound {
            Quadrant::Left
        } else if z >= 0.0 {
            Quadrant::Top
        } else {
            Quadrant::Bottom
        }
    }
}

/// Yaw in degrees contributed by `rule` for an instance at `point` (world space).
pub fn rule_yaw(
    rule: RotationRule,
    point: Vec3,
    clearing: &Clearing,
    first_zone: Option<&Zone>,
) -> f32 {
    match rule {
        RotationRule::WorldSpace => 0.0,
        RotationRule::GroupSpace => clearing.yaw,
        RotationRule::FaceGroupCentre => yaw_towards(point, clearing.origin).unwrap_or(0.0),
        RotationRule::FaceZoneCentre => {
            let Some(zone) = first_zone else {
                return 0.0;
            };
            face_zone_yaw(point, clearing, zone)
        }
    }
}

fn face_zone_yaw(point: Vec3, clearing: &Clearing, zone: &Zone) -> f32 {
    let radius = clearing.radius();
    match zone.shape {
        ZoneShape::Circle => {
            let centre = clearing.to_world(zone.centre_local(radius), point.y);
            yaw_towards(point, centre).unwrap_or(0.0)
        }
        ZoneShape::Rectangle => {
            let local = clearing.to_local(point) / radius;
            let quadrant = rectangle_quadrant(local - zone.centre, zone.width, zone.length);
            clearing.yaw + quadrant.yaw()
        }
    }
}

/// Builds an instance rotation from yaw and XZ tilt, all in degrees.
pub fn compose_rotation(yaw: f32, tilt_x: f32, tilt_z: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        yaw.to_radians(),
        tilt_x.to_radians(),
        tilt_z.to_radians(),
    )
}
