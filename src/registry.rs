//! Station registry - cross-station drag coordination
//!
//! Owned by the application session and passed by reference to drag
//! handling. Tracks which stations exist, which of them share panels
//! ("common" stations) and which station a drag started from.

use crate::error::{LayoutError, Result};
use crate::model::StationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Registration {
    station: StationId,
    common: bool,
    sub_station: bool,
}

/// Which stations close their drop zones and which one completes the drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragOutcome {
    pub closed: Vec<StationId>,
    pub finalizer: StationId,
}

#[derive(Debug, Default)]
pub struct StationRegistry {
    stations: Vec<Registration>,
    dragging: Option<StationId>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a top-level station; common stations accept drops from each
    /// other
    pub fn register(&mut self, station: StationId, common: bool) {
        self.insert(Registration {
            station,
            common,
            sub_station: false,
        });
    }

    /// Register a nested station; drags from it never leave it
    pub fn register_sub_station(&mut self, station: StationId) {
        self.insert(Registration {
            station,
            common: false,
            sub_station: true,
        });
    }

    fn insert(&mut self, registration: Registration) {
        match self
            .stations
            .iter_mut()
            .find(|r| r.station == registration.station)
        {
            Some(existing) => *existing = registration,
            None => self.stations.push(registration),
        }
    }

    /// Forget a station; a drag it started is abandoned
    pub fn unregister(&mut self, station: StationId) {
        self.stations.retain(|r| r.station != station);
        if self.dragging == Some(station) {
            self.dragging = None;
        }
    }

    pub fn is_registered(&self, station: StationId) -> bool {
        self.lookup(station).is_some()
    }

    pub fn dragging(&self) -> Option<StationId> {
        self.dragging
    }

    fn lookup(&self, station: StationId) -> Option<Registration> {
        self.stations.iter().copied().find(|r| r.station == station)
    }

    fn common_stations(&self) -> impl Iterator<Item = StationId> + '_ {
        self.stations
            .iter()
            .filter(|r| r.common && !r.sub_station)
            .map(|r| r.station)
    }

    /// Start a drag from `source`; returns the stations whose drop zones
    /// must be prepared, source first
    pub fn begin_drag(&mut self, source: StationId) -> Result<Vec<StationId>> {
        let registration = self
            .lookup(source)
            .ok_or(LayoutError::UnknownStation(source))?;
        self.dragging = Some(source);

        let mut prepared = vec![source];
        if registration.common && !registration.sub_station {
            prepared.extend(self.common_stations().filter(|s| *s != source));
        }
        tracing::debug!(source = source.0, prepared = prepared.len(), "Drag started");
        Ok(prepared)
    }

    /// Stations to hit-test while the drag moves; empty when idle
    pub fn search_targets(&self) -> Vec<StationId> {
        let Some(source) = self.dragging.and_then(|s| self.lookup(s)) else {
            return Vec::new();
        };
        if source.common && !source.sub_station {
            self.common_stations().collect()
        } else {
            vec![source.station]
        }
    }

    /// End the current drag
    ///
    /// `selected` is the station holding the chosen drop target, if any. It
    /// only takes over the drop when source and target are both common
    /// stations. Returns `None` when no drag is in progress.
    pub fn finalize_drag(&mut self, selected: Option<StationId>) -> Option<DragOutcome> {
        let source = self.dragging.take()?;
        let registration = self.lookup(source)?;

        let outcome = if registration.sub_station {
            DragOutcome {
                closed: vec![source],
                finalizer: source,
            }
        } else if registration.common {
            let finalizer = selected
                .and_then(|s| self.lookup(s))
                .filter(|r| r.common && !r.sub_station)
                .map(|r| r.station)
                .unwrap_or(source);
            DragOutcome {
                closed: self.common_stations().collect(),
                finalizer,
            }
        } else {
            DragOutcome {
                closed: vec![source],
                finalizer: source,
            }
        };

        tracing::debug!(
            source = source.0,
            finalizer = outcome.finalizer.0,
            "Drag finished"
        );
        Some(outcome)
    }
}
