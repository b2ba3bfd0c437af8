//! Exclusion-distance checks among instances placed during one pass.
use glam::{Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    position: Vec2,
    extent: f32,
    owner: usize,
    /// False when the owning member's instances are ignored by other members.
    shared: bool,
}

/// Append-only list of placed positions and their exclusion radii.
///
/// Distances are measured on the XZ plane and compared squared: a candidate is
/// rejected when `dist² < (extent + other_extent)²`.
#[derive(Debug, Clone, Default)]
pub struct ProximityIndex {
    entries: Vec<Entry>,
}

impl ProximityIndex {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            entries: Vec::with_capacity(cap),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Records a placed instance.
    ///
    /// With `shared == false` the entry only constrains later instances of the same
    /// `owner`.
    pub fn record(&mut self, position: Vec3, extent: f32, owner: usize, shared: bool) {
        self.entries.push(Entry {
            position: planar(position),
            extent,
            owner,
            shared,
        });
    }

    /// Returns true if a candidate of `owner` at `candidate` with `extent` clears every
    /// recorded entry it is checked against.
    ///
    /// With `exclude_others` set, only entries recorded by `owner` are considered.
    pub fn is_acceptable(
        &self,
        candidate: Vec3,
        extent: f32,
        owner: usize,
        exclude_others: bool,
    ) -> bool {
        let p = planar(candidate);
        self.entries
            .iter()
            .filter(|e| e.owner == owner || (e.shared && !exclude_others))
            .all(|e| {
                let reach = extent + e.extent;
                p.distance_squared(e.position) >= reach * reach
            })
    }
}

#[inline]
fn planar(p: Vec3) -> Vec2 {
    Vec2::new(p.x, p.z)
}
