//! Event types and sinks for observing placement passes.
//!
//! This module defines [`PlacementEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while running a
//! [`crate::scatter::runner::PlacementRunner`] over a clearing. Progress reporting
//! is one of these events; sinks never influence control flow.
use glam::Vec3;

use crate::scatter::member::PrototypeId;
use crate::scatter::runner::{MemberOutcome, PlacedInstance};

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Proximity,
    Zone,
}

/// Describes events emitted by placement passes.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PlacementEvent {
    /// Emitted when a pass starts for a clearing.
    PassStarted {
        /// Number of members in the clearing.
        member_count: usize,
        /// Radius of the clearing.
        radius: f32,
    },

    /// Emitted when the whole pass finishes.
    PassFinished {
        /// Total instances placed across all members.
        placed: usize,
        /// Per-member outcomes in member order.
        outcomes: Vec<MemberOutcome>,
    },

    /// Emitted when a member starts placing.
    MemberStarted {
        index: usize,
        prototype: PrototypeId,
        target: u32,
        iteration_cap: u64,
    },

    /// Emitted when a member stops, either on target or on its iteration cap.
    MemberFinished { outcome: MemberOutcome },

    /// Emitted for every accepted candidate.
    InstancePlaced {
        member_index: usize,
        instance: PlacedInstance,
    },

    /// Emitted for every rejected candidate.
    CandidateRejected {
        member_index: usize,
        /// Proximity (anchor) position of the candidate.
        position: Vec3,
        reason: RejectReason,
    },

    /// Observational progress, `fraction` in `[0, 1]`.
    Progress { label: String, fraction: f32 },

    /// Non-fatal warning generated during a pass.
    Warning {
        /// Context string (e.g. member index and prototype).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PlacementEvent`], used to filter what a sink receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlacementEventKind {
    PassStarted,
    PassFinished,
    MemberStarted,
    MemberFinished,
    InstancePlaced,
    CandidateRejected,
    Progress,
    Warning,
}

impl PlacementEvent {
    pub fn kind(&self) -> PlacementEventKind {
        match self {
            PlacementEvent::PassStarted { .. } => PlacementEventKind::PassStarted,
            PlacementEvent::PassFinished { .. } => PlacementEventKind::PassFinished,
            PlacementEvent::MemberStarted { .. } => PlacementEventKind::MemberStarted,
            PlacementEvent::MemberFinished { .. } => PlacementEventKind::MemberFinished,
            PlacementEvent::InstancePlaced { .. } => PlacementEventKind::InstancePlaced,
            PlacementEvent::CandidateRejected { .. } => PlacementEventKind::CandidateRejected,
            PlacementEvent::Progress { .. } => PlacementEventKind::Progress,
            PlacementEvent::Warning { .. } => PlacementEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`PlacementEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PlacementEvent);

    /// Whether events of `kind` should be built and sent at all.
    ///
    /// Runners check this before constructing an event, so sinks that only care
    /// about a few kinds avoid the per-candidate cost of the rest.
    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = PlacementEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PlacementEvent) {}

    #[inline]
    fn wants(&self, _kind: PlacementEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PlacementEvent),
{
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PlacementEvent>,
    only: Option<Vec<PlacementEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collects only events of the given kinds.
    pub fn only(kinds: impl IntoIterator<Item = PlacementEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<PlacementEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PlacementEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn count(&self, kind: PlacementEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PlacementEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: PlacementEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PlacementEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: PlacementEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
