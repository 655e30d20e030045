//! Event types and sinks for observing cover computations.
//!
//! This module defines [`CoverEvent`] and a set of sinks and adapters to emit,
//! collect, or forward events while running
//! [`crate::cover::engine::CoverEngine::compute_with_events`].
use crate::cover::engine::CoverStats;
use crate::geo::LatLon;

/// Describes events emitted by cover computations.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum CoverEvent {
    /// Emitted when a computation starts.
    RunStarted {
        /// Number of spawn points supplied.
        spawn_points: usize,
        /// Cache key of the configured region.
        cache_key: String,
    },

    /// Emitted when a cached cover was found and used.
    CacheHit {
        cache_key: String,
        /// Number of scan points in the cached cover.
        points: usize,
    },

    /// Emitted when no usable cached cover exists.
    CacheMiss { cache_key: String },

    /// Emitted after a freshly computed cover was persisted.
    CacheWritten { cache_key: String, points: usize },

    /// Emitted after candidate sampling.
    CandidatesSampled {
        /// Candidates kept.
        candidates: usize,
        /// Proposals dropped for landing outside the scan radius.
        discarded: usize,
    },

    /// Emitted after the coverage matrix was built.
    CoverageBuilt {
        rows: usize,
        columns: usize,
        /// Nonzero entries.
        entries: usize,
    },

    /// Emitted for each greedy pick.
    CircleSelected {
        /// Position of the pick in selection order.
        order: usize,
        /// Center of the chosen circle.
        position: LatLon,
        /// Spawn points this pick covered for the first time.
        newly_covered: usize,
    },

    /// Emitted when the safety net gives a spawn point its own circle.
    RepairInserted {
        spawn_point: usize,
        position: LatLon,
    },

    /// Emitted after the cover was split across workers.
    Distributed {
        /// Non-empty worker buckets.
        workers: usize,
    },

    /// Emitted when the computation finishes.
    RunFinished { stats: CoverStats },

    /// Non-fatal warning.
    Warning {
        /// Context string (e.g. phase or cache key).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`CoverEvent`] used by [`EventSink::wants`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoverEventKind {
    RunStarted,
    CacheHit,
    CacheMiss,
    CacheWritten,
    CandidatesSampled,
    CoverageBuilt,
    CircleSelected,
    RepairInserted,
    Distributed,
    RunFinished,
    Warning,
}

impl CoverEvent {
    pub fn kind(&self) -> CoverEventKind {
        match self {
            CoverEvent::RunStarted { .. } => CoverEventKind::RunStarted,
            CoverEvent::CacheHit { .. } => CoverEventKind::CacheHit,
            CoverEvent::CacheMiss { .. } => CoverEventKind::CacheMiss,
            CoverEvent::CacheWritten { .. } => CoverEventKind::CacheWritten,
            CoverEvent::CandidatesSampled { .. } => CoverEventKind::CandidatesSampled,
            CoverEvent::CoverageBuilt { .. } => CoverEventKind::CoverageBuilt,
            CoverEvent::CircleSelected { .. } => CoverEventKind::CircleSelected,
            CoverEvent::RepairInserted { .. } => CoverEventKind::RepairInserted,
            CoverEvent::Distributed { .. } => CoverEventKind::Distributed,
            CoverEvent::RunFinished { .. } => CoverEventKind::RunFinished,
            CoverEvent::Warning { .. } => CoverEventKind::Warning,
        }
    }
}

/// A generic event sink that accepts [`CoverEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: CoverEvent);

    /// Whether events of `kind` should be built at all. Defaults to `true`.
    #[inline]
    fn wants(&self, _kind: CoverEventKind) -> bool {
        true
    }

    fn send_many<I>(&mut self, events: I)
    where
        Self: Sized,
        I: IntoIterator<Item = CoverEvent>,
    {
        for e in events {
            self.send(e);
        }
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: CoverEvent) {}

    #[inline]
    fn wants(&self, _kind: CoverEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(CoverEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(CoverEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(CoverEvent),
{
    #[inline]
    fn send(&mut self, event: CoverEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<CoverEvent>,
    only: Option<Vec<CoverEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collect only the listed kinds.
    pub fn filtered(kinds: impl IntoIterator<Item = CoverEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<CoverEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[CoverEvent] {
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
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: CoverEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: CoverEventKind) -> bool {
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
    fn send(&mut self, event: CoverEvent) {
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

    fn wants(&self, kind: CoverEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
