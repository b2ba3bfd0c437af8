//! Zones: circular or rectangular sub-regions of a clearing used to include or exclude
//! placement positions.
//!
//! Zone geometry is authored in clearing-local, radius-normalized units: a centre of
//! `(1, 0)` sits on the clearing's rim along local +X, and a circle width of `0.5`
//! covers half the clearing radius. Containment tests live in [`containment`].
use glam::Vec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod containment;

pub use containment::{is_inside, ZoneFilter};

pub type ZoneId = String;

/// Shape of a zone.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneShape {
    Circle,
    Rectangle,
}

/// How a member combines the zones it references.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoneMode {
    /// Accept a point contained by at least one referenced zone.
    #[default]
    Or,
    /// Accept a point contained by none of the referenced zones.
    Not,
}

/// Restricts acceptance to a band along a zone's boundary.
///
/// Rectangles use the individual sides. Circles use a single radial band that is
/// enabled when any side flag is set.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeFill {
    pub left: bool,
    pub right: bool,
    pub bottom: bool,
    pub top: bool,
    /// Width of the band in world units.
    pub distance: f32,
}

impl EdgeFill {
    /// Radial band for circular zones.
    pub fn radial(distance: f32) -> Self {
        Self {
            left: true,
            right: true,
            bottom: true,
            top: true,
            distance,
        }
    }

    /// Band along the given rectangle sides.
    pub fn sides(left: bool, right: bool, bottom: bool, top: bool, distance: f32) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            distance,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.left || self.right || self.bottom || self.top
    }
}

/// A named sub-region of a clearing.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub shape: ZoneShape,
    /// Centre in `[-1, 1]` relative to the clearing radius (local x, z).
    pub centre: Vec2,
    /// Circle radius factor, or rectangle size along local X.
    pub width: f32,
    /// Rectangle size along local Z. Ignored by circles.
    pub length: f32,
    /// Combination mode used when a member does not set its own.
    pub mode: ZoneMode,
    pub edge_fill: EdgeFill,
}

impl Zone {
    /// A circular zone with the given normalized centre and radius factor.
    pub fn circle(id: impl Into<ZoneId>, centre: Vec2, width: f32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            shape: ZoneShape::Circle,
            centre,
            width,
            length: width,
            mode: ZoneMode::Or,
            edge_fill: EdgeFill::default(),
        }
    }

    /// An axis-aligned rectangular zone with the given normalized centre and size.
    pub fn rectangle(id: impl Into<ZoneId>, centre: Vec2, width: f32, length: f32) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            shape: ZoneShape::Rectangle,
            centre,
            width,
            length,
            mode: ZoneMode::Or,
            edge_fill: EdgeFill::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_mode(mut self, mode: ZoneMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_edge_fill(mut self, edge_fill: EdgeFill) -> Self {
        self.edge_fill = edge_fill;
        self
    }

    /// Centre of the zone in clearing-local world units.
    #[inline]
    pub fn centre_local(&self, clearing_radius: f32) -> Vec2 {
        self.centre * clearing_radius
    }

    /// Validates the zone's geometry.
    pub fn validate(&self) -> Result<()> {
        if self.width <= 0.0 || !self.width.is_finite() {
            return Err(Error::DegenerateGeometry(format!(
                "zone '{}' width must be > 0",
                self.id
            )));
        }
        if self.shape == ZoneShape::Rectangle && (self.length <= 0.0 || !self.length.is_finite()) {
            return Err(Error::DegenerateGeometry(format!(
                "zone '{}' length must be > 0",
                self.id
            )));
        }
        if !(-1.0..=1.0).contains(&self.centre.x) || !(-1.0..=1.0).contains(&self.centre.y) {
            return Err(Error::InvalidConfig(format!(
                "zone '{}' centre must be within [-1, 1]",
                self.id
            )));
        }
        if self.edge_fill.distance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "zone '{}' edge fill distance must be >= 0",
                self.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_default_name_to_id() {
        let z = Zone::circle("pond", Vec2::ZERO, 0.3);
        assert_eq!(z.name, "pond");
        assert_eq!(z.shape, ZoneShape::Circle);
        assert_eq!(z.mode, ZoneMode::Or);
        assert!(!z.edge_fill.is_enabled());
    }

    #[test]
    fn validate_rejects_degenerate_sizes() {
        assert!(matches!(
            Zone::circle("c", Vec2::ZERO, 0.0).validate(),
            Err(Error::DegenerateGeometry(_))
        ));
        assert!(matches!(
            Zone::rectangle("r", Vec2::ZERO, 0.5, 0.0).validate(),
            Err(Error::DegenerateGeometry(_))
        ));
        assert!(Zone::rectangle("r", Vec2::ZERO, 0.5, 0.25).validate().is_ok());
    }

    #[test]
    fn validate_rejects_centre_outside_clearing() {
        let z = Zone::circle("c", Vec2::new(1.5, 0.0), 0.2);
        assert!(matches!(z.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn centre_local_scales_by_radius() {
        let z = Zone::circle("c", Vec2::new(0.5, -0.25), 0.2);
        assert_eq!(z.centre_local(40.0), Vec2::new(20.0, -10.0));
    }
}
