//! High-level runner for placing every member of a clearing.
use std::borrow::Cow;

use glam::{Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::path::{ObjectPath, PathPointRotation, SplineCache};
use crate::sampling::{rand_range, DiscSampling, UniformDiscSampling};
use crate::scatter::clearing::Clearing;
use crate::scatter::events::{EventSink, PlacementEvent, PlacementEventKind, RejectReason};
use crate::scatter::materializer::InstanceMaterializer;
use crate::scatter::member::{Member, MemberPlacement, PathPlacement, PrototypeId};
use crate::scatter::proximity::ProximityIndex;
use crate::scatter::rotation::{compose_rotation, rule_yaw, yaw_towards};
use crate::scatter::seed::tilt_rng_for_clearing;
use crate::zone::ZoneFilter;

pub const DEFAULT_ITERATIONS_PER_INSTANCE: u32 = 256;
pub const DEFAULT_MAX_ITERATIONS: u64 = i32::MAX as u64;
/// Area unit of member densities: one square kilometre in square metres.
pub const SQUARE_KILOMETRE: f64 = 1_000_000.0;

/// An accepted candidate, ready to be materialized by the host.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedInstance {
    pub prototype: PrototypeId,
    /// Index of the producing member in its clearing.
    pub member_index: usize,
    /// Final world position, including the rotated model offset.
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    /// Anchor used for proximity checks (no model offset).
    pub proximity_position: Vec3,
    pub proximity_extent: f32,
}

/// Configuration for placement passes.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Candidate budget per targeted instance.
    pub iterations_per_instance: u32,
    /// Absolute ceiling on candidates per member.
    pub max_iterations: u64,
    /// Area, in square world units, that member densities refer to.
    pub density_area_unit: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            iterations_per_instance: DEFAULT_ITERATIONS_PER_INSTANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            density_area_unit: SQUARE_KILOMETRE,
        }
    }
}

impl PlacementConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iterations_per_instance(mut self, iterations_per_instance: u32) -> Self {
        self.iterations_per_instance = iterations_per_instance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_density_area_unit(mut self, density_area_unit: f64) -> Self {
        self.density_area_unit = density_area_unit;
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.iterations_per_instance == 0 {
            return Err(Error::InvalidConfig(
                "iterations_per_instance must be > 0".into(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidConfig("max_iterations must be > 0".into()));
        }
        if self.density_area_unit <= 0.0 || !self.density_area_unit.is_finite() {
            return Err(Error::InvalidConfig(
                "density_area_unit must be finite and > 0".into(),
            ));
        }
        Ok(())
    }

    /// Candidate budget for a member aiming at `target` instances.
    pub fn iteration_cap(&self, target: u32) -> u64 {
        iteration_cap(target, self.iterations_per_instance, self.max_iterations)
    }
}

/// `min(target * iterations_per_instance, max_iterations)` without wrapping.
pub fn iteration_cap(target: u32, iterations_per_instance: u32, max_iterations: u64) -> u64 {
    (target as u64)
        .saturating_mul(iterations_per_instance as u64)
        .min(max_iterations)
}

/// How a member's placement ended.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberOutcome {
    pub member_index: usize,
    pub prototype: PrototypeId,
    pub target: u32,
    pub placed: u32,
    /// Candidates drawn.
    pub iterations: u64,
    pub iteration_cap: u64,
}

impl MemberOutcome {
    /// True when the iteration cap ran out before the target was reached.
    pub fn is_exhausted(&self) -> bool {
        self.placed < self.target
    }
}

/// Result of running a placement pass over a clearing.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct PassResult {
    /// Accepted instances in placement order.
    pub instances: Vec<PlacedInstance>,
    /// One outcome per member, in member order.
    pub outcomes: Vec<MemberOutcome>,
}

impl PassResult {
    pub fn new() -> Self {
        Self {
            instances: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    pub fn placed_count(&self) -> usize {
        self.instances.len()
    }

    /// True when every member reached its target.
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| !o.is_exhausted())
    }

    pub fn exhausted(&self) -> impl Iterator<Item = &MemberOutcome> {
        self.outcomes.iter().filter(|o| o.is_exhausted())
    }

    pub fn instances_of(&self, member_index: usize) -> impl Iterator<Item = &PlacedInstance> {
        self.instances
            .iter()
            .filter(move |i| i.member_index == member_index)
    }
}

/// A candidate location along a path.
#[derive(Debug, Clone, Copy)]
struct Station {
    position: Vec3,
    width: f32,
    forward: Vec3,
    /// Rotation authored on the path point, for stations placed on knots.
    rotation: Option<PathPointRotation>,
}

enum Proposal<'m> {
    Centre,
    Disc,
    Path {
        layout: &'m PathPlacement,
        stations: Vec<Station>,
        filled: Vec<bool>,
        cursor: usize,
    },
}

/// One placement pass over a clearing.
///
/// Zone references and path caches are resolved once when the pass is created. The
/// pass owns the proximity index and the tilt generator, both seeded fresh for
/// every pass.
pub struct PlacementPass<'a> {
    clearing: &'a Clearing,
    config: PlacementConfig,
    filters: Vec<ZoneFilter>,
    paths: Vec<Option<(usize, Cow<'a, SplineCache>)>>,
    proximity: ProximityIndex,
    tilt_rng: StdRng,
}

impl<'a> PlacementPass<'a> {
    /// Validates `clearing` and resolves every member's zone and path references.
    pub fn new(clearing: &'a Clearing, config: PlacementConfig) -> Result<Self> {
        config.validate()?;
        clearing.validate()?;

        let mut filters = Vec::with_capacity(clearing.members.len());
        let mut paths = Vec::with_capacity(clearing.members.len());
        for (i, member) in clearing.members.iter().enumerate() {
            filters.push(ZoneFilter::resolve(
                i,
                &member.zone_ids,
                member.zone_mode,
                &clearing.zones,
            )?);

            let path = match &member.placement {
                MemberPlacement::AlongPath(layout) => {
                    let index =
                        clearing
                            .path_index(&layout.path)
                            .ok_or_else(|| Error::UnknownPath {
                                member: i,
                                path: layout.path.clone(),
                            })?;
                    Some((index, clearing.paths[index].cache_or_build(false)))
                }
                _ => None,
            };
            paths.push(path);
        }

        Ok(Self {
            clearing,
            config,
            filters,
            paths,
            proximity: ProximityIndex::new(),
            tilt_rng: tilt_rng_for_clearing(clearing.origin.x),
        })
    }

    /// Starts from instances recorded by an earlier pass.
    pub fn with_proximity(mut self, proximity: ProximityIndex) -> Self {
        self.proximity = proximity;
        self
    }

    pub fn clearing(&self) -> &Clearing {
        self.clearing
    }

    pub fn proximity(&self) -> &ProximityIndex {
        &self.proximity
    }

    pub fn into_proximity(self) -> ProximityIndex {
        self.proximity
    }

    /// Places every member in order.
    pub fn run(
        &mut self,
        rng: &mut dyn RngCore,
        sampling: &dyn DiscSampling,
        materializer: &mut dyn InstanceMaterializer,
        sink: &mut dyn EventSink,
    ) -> Result<PassResult> {
        let member_count = self.clearing.members.len();
        if sink.wants(PlacementEventKind::PassStarted) {
            sink.send(PlacementEvent::PassStarted {
                member_count,
                radius: self.clearing.radius(),
            });
        }

        let mut result = PassResult::new();
        for index in 0..member_count {
            let (outcome, instances) =
                self.place_member(index, rng, sampling, materializer, sink)?;
            result.instances.extend(instances);
            result.outcomes.push(outcome);

            if sink.wants(PlacementEventKind::Progress) {
                sink.send(PlacementEvent::Progress {
                    label: "pass".into(),
                    fraction: (index + 1) as f32 / member_count as f32,
                });
            }
        }

        info!(
            "Clearing pass finished: {} instances from {} members ({} exhausted).",
            result.placed_count(),
            member_count,
            result.exhausted().count()
        );
        if sink.wants(PlacementEventKind::PassFinished) {
            sink.send(PlacementEvent::PassFinished {
                placed: result.placed_count(),
                outcomes: result.outcomes.clone(),
            });
        }
        Ok(result)
    }

    /// Runs the candidate loop for one member until it reaches its target or its
    /// iteration cap. Exhaustion is reported in the outcome, not as an error.
    pub fn place_member(
        &mut self,
        index: usize,
        rng: &mut dyn RngCore,
        sampling: &dyn DiscSampling,
        materializer: &mut dyn InstanceMaterializer,
        sink: &mut dyn EventSink,
    ) -> Result<(MemberOutcome, Vec<PlacedInstance>)> {
        let clearing = self.clearing;
        let member = clearing.members.get(index).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "member index {index} out of range ({} members)",
                clearing.members.len()
            ))
        })?;
        let radius = clearing.radius();

        let mut proposal = match &member.placement {
            MemberPlacement::Centre => Proposal::Centre,
            MemberPlacement::Random => Proposal::Disc,
            MemberPlacement::AlongPath(layout) => {
                let Some((path_index, cache)) = &self.paths[index] else {
                    return Err(Error::UnknownPath {
                        member: index,
                        path: layout.path.clone(),
                    });
                };
                let stations = path_stations(
                    cache,
                    &clearing.paths[*path_index],
                    layout,
                    member.max_per_group,
                );
                debug!(
                    "Member {} ('{}'): {} stations along path '{}'.",
                    index,
                    member.prototype,
                    stations.len(),
                    layout.path
                );
                Proposal::Path {
                    layout,
                    filled: vec![false; stations.len()],
                    stations,
                    cursor: 0,
                }
            }
        };

        let target = match &proposal {
            Proposal::Path { stations, .. } => stations.len() as u32,
            _ => member.target_count(radius, self.config.density_area_unit),
        };
        let cap = self.config.iteration_cap(target);

        if sink.wants(PlacementEventKind::MemberStarted) {
            sink.send(PlacementEvent::MemberStarted {
                index,
                prototype: member.prototype.clone(),
                target,
                iteration_cap: cap,
            });
        }

        let filter = &self.filters[index];
        let first_zone = filter.first().map(|i| &clearing.zones[i]);
        let mut instances: Vec<PlacedInstance> = Vec::with_capacity(target.min(1024) as usize);
        let mut placed: u32 = 0;
        let mut iterations: u64 = 0;

        while placed < target && iterations < cap {
            iterations += 1;

            let (offset, station_yaw, station) = match &mut proposal {
                Proposal::Centre => (Vec3::ZERO, 0.0, None),
                Proposal::Disc => {
                    let p = Vec2::from(sampling.sample(radius, rng));
                    (Vec3::new(p.x, 0.0, p.y), 0.0, None)
                }
                Proposal::Path {
                    layout,
                    stations,
                    filled,
                    cursor,
                } => {
                    let Some(s) = next_unfilled(filled, *cursor) else {
                        break;
                    };
                    *cursor = (s + 1) % stations.len();
                    let (position, yaw) = station_candidate(&stations[s], *layout, rng);
                    (position - clearing.origin, yaw, Some(s))
                }
            };

            let anchor = clearing.origin + member_offset(member, rng) + offset;
            let scale = rand_range(rng, member.min_scale, member.max_scale);
            let base_yaw = if member.randomise_rotation_y {
                rand_range(rng, member.start_rotation_y, member.end_rotation_y)
            } else {
                member.start_rotation_y
            };
            let yaw =
                base_yaw + station_yaw + rule_yaw(member.rotation, anchor, clearing, first_zone);
            let (tilt_x, tilt_z) = if member.max_tilt > 0.0 {
                let t = member.max_tilt;
                (
                    rand_range(&mut self.tilt_rng, -t, t),
                    rand_range(&mut self.tilt_rng, -t, t),
                )
            } else {
                (0.0, 0.0)
            };
            let rotation = compose_rotation(yaw, tilt_x, tilt_z);
            let position = anchor + rotation * (member.model_offset * scale);

            let reason = if !self.proximity.is_acceptable(
                anchor,
                member.proximity_extent,
                index,
                member.ignore_proximity_of_others,
            ) {
                Some(RejectReason::Proximity)
            } else if !filter.accepts(clearing.to_local(anchor), &clearing.zones, radius) {
                Some(RejectReason::Zone)
            } else {
                None
            };
            if let Some(reason) = reason {
                if sink.wants(PlacementEventKind::CandidateRejected) {
                    sink.send(PlacementEvent::CandidateRejected {
                        member_index: index,
                        position: anchor,
                        reason,
                    });
                }
                continue;
            }

            let instance = PlacedInstance {
                prototype: member.prototype.clone(),
                member_index: index,
                position,
                rotation,
                scale,
                proximity_position: anchor,
                proximity_extent: member.proximity_extent,
            };
            materializer.materialize(&instance);
            self.proximity.record(
                anchor,
                member.proximity_extent,
                index,
                !member.proximity_ignored_by_others,
            );
            placed += 1;
            if let (Some(s), Proposal::Path { filled, .. }) = (station, &mut proposal) {
                filled[s] = true;
            }

            if sink.wants(PlacementEventKind::InstancePlaced) {
                sink.send(PlacementEvent::InstancePlaced {
                    member_index: index,
                    instance: instance.clone(),
                });
            }
            if sink.wants(PlacementEventKind::Progress) {
                sink.send(PlacementEvent::Progress {
                    label: member.prototype.clone(),
                    fraction: placed as f32 / target as f32,
                });
            }
            instances.push(instance);
        }

        let outcome = MemberOutcome {
            member_index: index,
            prototype: member.prototype.clone(),
            target,
            placed,
            iterations,
            iteration_cap: cap,
        };

        info!(
            "Member {}: '{}' | placed {}/{} in {} iterations.",
            index, member.prototype, placed, target, iterations
        );
        if outcome.is_exhausted() {
            warn!(
                "Member {} ('{}') exhausted {} iterations with {}/{} placed.",
                index, member.prototype, iterations, placed, target
            );
            if sink.wants(PlacementEventKind::Warning) {
                sink.send(PlacementEvent::Warning {
                    context: format!("member:{} prototype:{}", index, member.prototype),
                    message: format!("Iteration cap reached with {placed}/{target} placed"),
                });
            }
        }
        if sink.wants(PlacementEventKind::MemberFinished) {
            sink.send(PlacementEvent::MemberFinished {
                outcome: outcome.clone(),
            });
        }

        Ok((outcome, instances))
    }
}

/// Draws the member-level offset: X and Z in range, Y fixed unless randomised.
fn member_offset(member: &Member, rng: &mut dyn RngCore) -> Vec3 {
    let (min, max) = (member.min_offset, member.max_offset);
    let x = rand_range(rng, min.x, max.x);
    let z = rand_range(rng, min.z, max.z);
    let y = if member.randomise_offset_y {
        rand_range(rng, min.y, max.y)
    } else {
        min.y
    };
    Vec3::new(x, y, z)
}

/// World position and extra yaw for one attempt at `station`.
fn station_candidate(
    station: &Station,
    layout: &PathPlacement,
    rng: &mut dyn RngCore,
) -> (Vec3, f32) {
    let mut position = station.position;
    if layout.lateral_jitter && station.width > 0.0 {
        let side = station.forward.cross(Vec3::Y).normalize_or_zero();
        let half = station.width * 0.5;
        position += side * rand_range(rng, -half, half);
    }

    let mut yaw = match station.rotation {
        Some(PathPointRotation::Fixed(yaw)) => yaw,
        Some(PathPointRotation::Random { min, max }) => rand_range(rng, min, max),
        None => 0.0,
    };
    if layout.align_to_path {
        yaw += yaw_towards(Vec3::ZERO, station.forward).unwrap_or(0.0);
    }
    (position, yaw)
}

fn next_unfilled(filled: &[bool], cursor: usize) -> Option<usize> {
    let n = filled.len();
    (0..n).map(|k| (cursor + k) % n).find(|&i| !filled[i])
}

/// Up to `max` indices spread evenly over `0..count`, always including both ends.
fn spread_indices(count: usize, max: u32) -> Vec<usize> {
    let target = count.min(max as usize).max(1);
    if count == 0 {
        return Vec::new();
    }
    if target == 1 {
        return vec![0];
    }
    let last = (count - 1) as f64;
    let steps = (target - 1) as f64;
    (0..target)
        .map(|k| ((k as f64) * last / steps).round() as usize)
        .collect()
}

/// Stations `spacing` apart along a centre line of `length`, counted in `f64` so
/// tiny spacings stay finite.
fn spaced_station_count(length: f32, spacing: f32, closed: bool) -> f64 {
    let steps = length as f64 / spacing as f64;
    if closed {
        steps.ceil().max(1.0)
    } else {
        steps.floor() + 1.0
    }
}

/// Distances of up to `max` of `count` stations, spread evenly and keeping both ends.
fn spread_distances(count: f64, spacing: f32, max: u32) -> Vec<f32> {
    if !count.is_finite() || count < 1.0 {
        return vec![0.0];
    }
    let target = count.min(max.max(1) as f64) as usize;
    if target <= 1 {
        return vec![0.0];
    }
    let last = count - 1.0;
    let steps = (target - 1) as f64;
    (0..target)
        .map(|k| ((k as f64 * last / steps).round() * spacing as f64) as f32)
        .collect()
}

fn path_stations(
    cache: &SplineCache,
    path: &ObjectPath,
    layout: &PathPlacement,
    max_per_group: u32,
) -> Vec<Station> {
    let resolution = path.settings().resolution;
    match layout.spacing {
        None => {
            let knots = cache.knot_sample_indices();
            spread_indices(knots.len(), max_per_group)
                .into_iter()
                .filter_map(|i| {
                    let k = knots[i];
                    Some(Station {
                        position: *cache.centre().get(k)?,
                        width: cache.widths().get(k).copied().unwrap_or(0.0),
                        forward: cache.forwards_at(k, resolution),
                        rotation: path.points().get(i).map(|p| p.rotation),
                    })
                })
                .collect()
        }
        Some(spacing) => {
            let count = spaced_station_count(cache.length(), spacing, cache.is_closed());
            spread_distances(count, spacing, max_per_group)
                .into_iter()
                .filter_map(|d| {
                    let station = cache.station_at_distance(d)?;
                    Some(Station {
                        position: station.position,
                        width: station.width,
                        forward: station.forward,
                        rotation: None,
                    })
                })
                .collect()
        }
    }
}

/// Drives placement passes with a configurable disc sampler.
pub struct PlacementRunner {
    /// Configuration applied to every pass.
    pub config: PlacementConfig,
    sampling: Box<dyn DiscSampling>,
}

impl PlacementRunner {
    pub fn try_new(config: PlacementConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn new(config: PlacementConfig) -> Self {
        debug_assert!(
            config.iterations_per_instance > 0,
            "iterations_per_instance must be > 0"
        );
        debug_assert!(config.max_iterations > 0, "max_iterations must be > 0");

        Self {
            config,
            sampling: Box::new(UniformDiscSampling::new()),
        }
    }

    /// Replaces the sampler used for random members.
    pub fn with_sampling(mut self, sampling: Box<dyn DiscSampling>) -> Self {
        self.sampling = sampling;
        self
    }

    /// Places every member of `clearing`, returning the accepted instances.
    pub fn run(&mut self, clearing: &Clearing, rng: &mut impl RngCore) -> Result<PassResult> {
        self.run_with(clearing, rng, &mut (), &mut ())
    }

    pub fn run_with_events(
        &mut self,
        clearing: &Clearing,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<PassResult> {
        self.run_with(clearing, rng, &mut (), sink)
    }

    /// Places every member, handing accepted instances to `materializer`.
    pub fn run_with(
        &mut self,
        clearing: &Clearing,
        rng: &mut impl RngCore,
        materializer: &mut dyn InstanceMaterializer,
        sink: &mut dyn EventSink,
    ) -> Result<PassResult> {
        let mut pass = PlacementPass::new(clearing, self.config.clone())?;
        pass.run(rng, self.sampling.as_ref(), materializer, sink)
    }
}

/// Runs a single pass over `clearing` with the default disc sampler.
pub fn run_clearing<R: RngCore>(
    clearing: &Clearing,
    config: &PlacementConfig,
    rng: &mut R,
    materializer: Option<&mut dyn InstanceMaterializer>,
    sink: Option<&mut dyn EventSink>,
) -> Result<PassResult> {
    let mut pass = PlacementPass::new(clearing, config.clone())?;
    let sampling = UniformDiscSampling::new();
    match (materializer, sink) {
        (Some(m), Some(s)) => pass.run(rng, &sampling, m, s),
        (Some(m), None) => pass.run(rng, &sampling, m, &mut ()),
        (None, Some(s)) => pass.run(rng, &sampling, &mut (), s),
        (None, None) => pass.run(rng, &sampling, &mut (), &mut ()),
    }
}
