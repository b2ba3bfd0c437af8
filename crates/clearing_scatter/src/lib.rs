#![forbid(unsafe_code)]
//! clearing_scatter: Placement and containment of object instances inside disc-shaped clearings.
//!
//! Modules:
//! - zone: circle/rectangle zones, edge-fill bands and OR/NOT containment filters
//! - path: object paths, Catmull-Rom sampling, edge/surround caches
//! - sampling: area-uniform candidate offsets inside the clearing disc
//! - scatter: clearings, members, rotation rules, proximity index, placement runner, events
//!
//! For examples and docs, see README and docs.rs.
pub mod error;
pub mod path;
pub mod sampling;
pub mod scatter;
pub mod zone;

/// Convenient re-exports for common types. Import with `use clearing_scatter::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::path::cache::{PathStation, Side, SplineCache, SurroundConnection};
    pub use crate::path::{
        ObjectPath, PathId, PathPoint, PathPointRotation, PathSettings, SurroundSettings,
    };
    pub use crate::sampling::{DiscSampling, RejectionDiscSampling, UniformDiscSampling};
    pub use crate::scatter::clearing::Clearing;
    pub use crate::scatter::events::{
        EventSink, FnSink, MultiSink, PlacementEvent, PlacementEventKind, RejectReason, VecSink,
    };
    pub use crate::scatter::materializer::{FnMaterializer, InstanceMaterializer};
    pub use crate::scatter::member::{Member, MemberPlacement, PathPlacement, PrototypeId};
    pub use crate::scatter::proximity::ProximityIndex;
    pub use crate::scatter::rotation::{compose_rotation, yaw_towards, RotationRule};
    pub use crate::scatter::runner::{
        run_clearing, MemberOutcome, PassResult, PlacedInstance, PlacementConfig, PlacementPass,
        PlacementRunner,
    };
    pub use crate::scatter::seed::seed_for_clearing;
    pub use crate::zone::{is_inside, EdgeFill, Zone, ZoneFilter, ZoneId, ZoneMode, ZoneShape};
}
