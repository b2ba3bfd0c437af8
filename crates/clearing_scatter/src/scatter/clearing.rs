//! The clearing: a disc-shaped placement region owning zones, members and paths.
use glam::{Quat, Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::path::{ObjectPath, PathId};
use crate::scatter::member::Member;
use crate::zone::{Zone, ZoneId};

/// A disc of a given radius centred on `origin`, hosting a scatter of instances.
///
/// Zones are authored in the clearing's local frame, which is rotated by `yaw`
/// degrees around +Y.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone)]
pub struct Clearing {
    pub origin: Vec3,
    radius: f32,
    /// Yaw of the clearing's local frame in degrees.
    pub yaw: f32,
    pub zones: Vec<Zone>,
    pub members: Vec<Member>,
    pub paths: Vec<ObjectPath>,
}

impl Clearing {
    /// Creates an empty clearing, rejecting a non-positive radius.
    pub fn try_new(origin: Vec3, radius: f32) -> Result<Self> {
        check_radius(radius)?;
        Ok(Self {
            origin,
            radius,
            yaw: 0.0,
            zones: Vec::new(),
            members: Vec::new(),
            paths: Vec::new(),
        })
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<()> {
        check_radius(radius)?;
        self.radius = radius;
        Ok(())
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zones.push(zone);
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_path(mut self, path: ObjectPath) -> Self {
        self.paths.push(path);
        self
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn zone_index(&self, id: &str) -> Option<usize> {
        self.zones.iter().position(|z| z.id == id)
    }

    pub fn path_index(&self, id: &str) -> Option<usize> {
        self.paths.iter().position(|p| p.id == id)
    }

    pub fn path_mut(&mut self, id: &str) -> Option<&mut ObjectPath> {
        self.paths.iter_mut().find(|p| p.id == id)
    }

    /// Rebuilds stale path caches.
    pub fn refresh_paths(&mut self, include_surround: bool) {
        for path in &mut self.paths {
            path.refresh_positions(include_surround, false);
        }
    }

    #[inline]
    fn frame(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    /// Converts a world position into clearing-local `(x, z)`.
    pub fn to_local(&self, world: Vec3) -> Vec2 {
        let local = self.frame().inverse() * (world - self.origin);
        Vec2::new(local.x, local.z)
    }

    /// Converts clearing-local `(x, z)` into a world position at height `y`.
    pub fn to_world(&self, local: Vec2, y: f32) -> Vec3 {
        let rotated = self.frame() * Vec3::new(local.x, 0.0, local.y);
        Vec3::new(self.origin.x + rotated.x, y, self.origin.z + rotated.z)
    }

    /// Checks the clearing and everything it owns.
    ///
    /// Zone and path references of members are resolved separately when a
    /// placement pass starts.
    pub fn validate(&self) -> Result<()> {
        check_radius(self.radius)?;
        if self.members.is_empty() {
            return Err(Error::EmptyClearing);
        }

        for (i, zone) in self.zones.iter().enumerate() {
            zone.validate()?;
            if self.zones[..i].iter().any(|z| z.id == zone.id) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate zone id '{}'",
                    zone.id
                )));
            }
        }

        for (i, path) in self.paths.iter().enumerate() {
            path.validate()?;
            if self.paths[..i].iter().any(|p| p.id == path.id) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate path id '{}'",
                    path.id
                )));
            }
        }

        for (i, member) in self.members.iter().enumerate() {
            member.validate(i)?;
        }
        Ok(())
    }

    pub fn zone_ids(&self) -> impl Iterator<Item = &ZoneId> {
        self.zones.iter().map(|z| &z.id)
    }

    pub fn path_ids(&self) -> impl Iterator<Item = &PathId> {
        self.paths.iter().map(|p| &p.id)
    }
}

fn check_radius(radius: f32) -> Result<()> {
    if radius <= 0.0 || !radius.is_finite() {
        return Err(Error::DegenerateGeometry(format!(
            "clearing radius must be > 0, got {radius}"
        )));
    }
    Ok(())
}
