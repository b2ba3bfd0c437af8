//! Point-in-zone tests and per-member zone combination.
//!
//! All comparisons are done on squared distances or half extents with strict `<`,
//! so a point exactly on a boundary is always outside.
use glam::Vec2;

use crate::error::{Error, Result};
use crate::zone::{Zone, ZoneId, ZoneMode, ZoneShape};

/// Returns true if `point` (clearing-local x, z in world units) lies inside `zone`.
///
/// When the zone has edge fill enabled, only points inside the boundary band are
/// reported as inside.
pub fn is_inside(point: Vec2, zone: &Zone, clearing_radius: f32) -> bool {
    let d = point - zone.centre_local(clearing_radius);
    match zone.shape {
        ZoneShape::Circle => inside_circle(d, zone, clearing_radius),
        ZoneShape::Rectangle => inside_rectangle(d, zone, clearing_radius),
    }
}

fn inside_circle(d: Vec2, zone: &Zone, clearing_radius: f32) -> bool {
    let outer = zone.width * clearing_radius;
    let dist2 = d.length_squared();
    if dist2 >= outer * outer {
        return false;
    }
    if !zone.edge_fill.is_enabled() {
        return true;
    }

    let inner = outer - zone.edge_fill.distance;
    if inner <= 0.0 {
        return true;
    }
    dist2 > inner * inner
}

fn inside_rectangle(d: Vec2, zone: &Zone, clearing_radius: f32) -> bool {
    let half_w = zone.width * 0.5 * clearing_radius;
    let half_l = zone.length * 0.5 * clearing_radius;
    if d.x <= -half_w || d.x >= half_w || d.y <= -half_l || d.y >= half_l {
        return false;
    }

    let fill = &zone.edge_fill;
    if !fill.is_enabled() {
        return true;
    }

    let dist = fill.distance;
    (fill.left && d.x < -half_w + dist)
        || (fill.right && d.x > half_w - dist)
        || (fill.bottom && d.y < -half_l + dist)
        || (fill.top && d.y > half_l - dist)
}

/// A member's zone references resolved to indices into the owning clearing's zone table.
///
/// Built once at the start of a placement pass so candidates never compare identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneFilter {
    indices: Vec<usize>,
    mode: ZoneMode,
}

impl ZoneFilter {
    /// A filter that accepts every point.
    pub fn accept_all() -> Self {
        Self {
            indices: Vec::new(),
            mode: ZoneMode::Or,
        }
    }

    /// Resolves `zone_ids` against `zones`.
    ///
    /// The governing mode is `mode` when given, otherwise the mode of the first
    /// referenced zone. Unknown identifiers fail with [`Error::UnknownZone`].
    pub fn resolve(
        member: usize,
        zone_ids: &[ZoneId],
        mode: Option<ZoneMode>,
        zones: &[Zone],
    ) -> Result<Self> {
        let mut indices = Vec::with_capacity(zone_ids.len());
        for id in zone_ids {
            let idx = zones
                .iter()
                .position(|z| &z.id == id)
                .ok_or_else(|| Error::UnknownZone {
                    member,
                    zone: id.clone(),
                })?;
            indices.push(idx);
        }

        let mode = mode
            .or_else(|| indices.first().map(|&i| zones[i].mode))
            .unwrap_or_default();

        Ok(Self { indices, mode })
    }

    pub fn mode(&self) -> ZoneMode {
        self.mode
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Index of the first referenced zone, if any.
    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }

    /// Returns true if `point` passes this filter.
    pub fn accepts(&self, point: Vec2, zones: &[Zone], clearing_radius: f32) -> bool {
        let Some((&first, rest)) = self.indices.split_first() else {
            return true;
        };

        match self.mode {
            ZoneMode::Or => {
                let mut inside = is_inside(point, &zones[first], clearing_radius);
                for &i in rest {
                    inside = inside || is_inside(point, &zones[i], clearing_radius);
                }
                inside
            }
            ZoneMode::Not => {
                for &i in rest {
                    if is_inside(point, &zones[i], clearing_radius) {
                        return false;
                    }
                }
                !is_inside(point, &zones[first], clearing_radius)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::EdgeFill;

    const R: f32 = 50.0;

    #[test]
    fn zone_centre_is_always_inside() {
        let zones = [
            Zone::circle("c", Vec2::new(0.3, -0.4), 0.1),
            Zone::rectangle("r", Vec2::new(-0.5, 0.2), 0.2, 0.6),
            Zone::circle("tiny", Vec2::new(1.0, 0.0), 0.001),
        ];
        for radius in [1.0, 50.0, 900.0] {
            for z in &zones {
                assert!(is_inside(z.centre_local(radius), z, radius), "{}", z.id);
            }
        }
    }

    #[test]
    fn circle_boundary_is_outside() {
        let z = Zone::circle("c", Vec2::ZERO, 0.5);
        assert!(is_inside(Vec2::new(24.9, 0.0), &z, R));
        assert!(!is_inside(Vec2::new(25.0, 0.0), &z, R));
        assert!(!is_inside(Vec2::new(0.0, -25.0), &z, R));
    }

    #[test]
    fn rectangle_uses_half_extents() {
        let z = Zone::rectangle("r", Vec2::ZERO, 0.4, 0.2);
        // Half width 10, half length 5.
        assert!(is_inside(Vec2::new(9.9, 4.9), &z, R));
        assert!(!is_inside(Vec2::new(10.0, 0.0), &z, R));
        assert!(!is_inside(Vec2::new(0.0, 5.0), &z, R));
        assert!(!is_inside(Vec2::new(-10.0, 0.0), &z, R));
    }

    #[test]
    fn circle_edge_fill_keeps_only_the_annulus() {
        let z = Zone::circle("c", Vec2::ZERO, 0.4).with_edge_fill(EdgeFill::radial(5.0));
        // Outer radius 20, band from 15 to 20.
        assert!(!is_inside(Vec2::ZERO, &z, R));
        assert!(!is_inside(Vec2::new(15.0, 0.0), &z, R));
        assert!(is_inside(Vec2::new(17.0, 0.0), &z, R));
        assert!(!is_inside(Vec2::new(20.0, 0.0), &z, R));
    }

    #[test]
    fn circle_edge_fill_wider_than_radius_keeps_whole_disc() {
        let z = Zone::circle("c", Vec2::ZERO, 0.1).with_edge_fill(EdgeFill::radial(50.0));
        assert!(is_inside(Vec2::ZERO, &z, R));
    }

    #[test]
    fn rectangle_edge_fill_ors_enabled_sides() {
        let z = Zone::rectangle("r", Vec2::ZERO, 0.4, 0.4)
            .with_edge_fill(EdgeFill::sides(true, false, false, true, 2.0));
        // Half extents 10 x 10.
        assert!(is_inside(Vec2::new(-9.0, 0.0), &z, R), "left band");
        assert!(is_inside(Vec2::new(0.0, 9.0), &z, R), "top band");
        assert!(!is_inside(Vec2::new(9.0, 0.0), &z, R), "right disabled");
        assert!(!is_inside(Vec2::new(0.0, -9.0), &z, R), "bottom disabled");
        assert!(!is_inside(Vec2::ZERO, &z, R), "interior");
    }

    #[test]
    fn empty_filter_accepts_everything() {
        let f = ZoneFilter::accept_all();
        assert!(f.accepts(Vec2::new(1e6, -1e6), &[], R));
    }

    #[test]
    fn or_mode_accepts_points_in_any_zone() {
        let zones = vec![
            Zone::circle("a", Vec2::new(-0.5, 0.0), 0.2),
            Zone::circle("b", Vec2::new(0.5, 0.0), 0.2),
        ];
        let f = ZoneFilter::resolve(0, &["a".into(), "b".into()], Some(ZoneMode::Or), &zones)
            .unwrap();
        assert!(f.accepts(Vec2::new(-25.0, 0.0), &zones, R));
        assert!(f.accepts(Vec2::new(25.0, 0.0), &zones, R));
        assert!(!f.accepts(Vec2::ZERO, &zones, R));
    }

    #[test]
    fn not_mode_requires_every_zone_to_exclude() {
        let mut zones = vec![
            Zone::circle("a", Vec2::new(-0.5, 0.0), 0.2),
            Zone::circle("b", Vec2::new(0.5, 0.0), 0.2),
            Zone::rectangle("c", Vec2::new(0.0, 0.5), 0.2, 0.2),
        ];
        let ids: Vec<ZoneId> = vec!["a".into(), "b".into(), "c".into()];
        let p = Vec2::new(0.0, -25.0);

        let f = ZoneFilter::resolve(0, &ids, Some(ZoneMode::Not), &zones).unwrap();
        assert!(f.accepts(p, &zones, R));

        // Moving any single zone onto the point must reject it.
        for i in 0..zones.len() {
            let saved = zones[i].centre;
            zones[i].centre = Vec2::new(0.0, -0.5);
            assert!(!f.accepts(p, &zones, R), "zone {i} now contains the point");
            zones[i].centre = saved;
        }
    }

    #[test]
    fn mode_defaults_to_first_referenced_zone() {
        let zones = vec![
            Zone::circle("a", Vec2::ZERO, 0.2).with_mode(ZoneMode::Not),
            Zone::circle("b", Vec2::ZERO, 0.2),
        ];
        let f = ZoneFilter::resolve(0, &["a".into(), "b".into()], None, &zones).unwrap();
        assert_eq!(f.mode(), ZoneMode::Not);

        let f = ZoneFilter::resolve(0, &["b".into(), "a".into()], None, &zones).unwrap();
        assert_eq!(f.mode(), ZoneMode::Or);
    }

    #[test]
    fn unknown_zone_fails_fast() {
        let zones = vec![Zone::circle("a", Vec2::ZERO, 0.2)];
        let err = ZoneFilter::resolve(4, &["missing".into()], None, &zones).unwrap_err();
        assert!(matches!(err, Error::UnknownZone { member: 4, ref zone } if zone == "missing"));
    }
}
