use crate::dlog;
use crate::storage::SlotStore;
use crate::types::{Workout, WorkoutId};
use anyhow::{Context, Result};
use chrono::{DateTime, Local};

/// Name of the slot holding the workout snapshot.
pub const STORAGE_KEY: &str = "workouts";

/// The ordered list of workouts plus its persisted mirror.
///
/// Every append rewrites the whole list into the slot. Nothing is ever removed
/// from the list itself; `clear` only drops the persisted copy.
pub struct WorkoutStore<S> {
    slots: S,
    workouts: Vec<Workout>,
}

impl<S: SlotStore> WorkoutStore<S> {
    pub const fn new(slots: S) -> Self {
        Self {
            slots,
            workouts: Vec::new(),
        }
    }

    /// Replace the in-memory list with the persisted snapshot.
    ///
    /// A missing, unreadable or unparsable snapshot yields an empty list.
    pub fn load_from_persistence(&mut self) -> &[Workout] {
        self.workouts = match self.slots.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Workout>>(&raw) {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(err = %e, "ignoring unparsable workout snapshot");
                    Vec::new()
                }
            },
            Ok(None) => {
                dlog!("no workout snapshot found");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(err = %e, "workout snapshot unavailable");
                Vec::new()
            }
        };

        tracing::info!(count = self.workouts.len(), "loaded workouts");
        &self.workouts
    }

    /// Push `workout` and persist the full list.
    ///
    /// When the write fails the push is undone, so the list never holds an
    /// entry the slot does not.
    pub fn append(&mut self, workout: Workout) -> Result<&Workout> {
        self.workouts.push(workout);
        if let Err(e) = self.persist() {
            self.workouts.pop();
            return Err(e);
        }

        let last = self.workouts.len() - 1;
        let w = &self.workouts[last];
        tracing::info!(id = %w.id, kind = %w.kind(), count = self.workouts.len(), "workout saved");
        Ok(w)
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.workouts).context("Serializing workouts")?;
        self.slots.set(STORAGE_KEY, &json)
    }

    /// Drop the persisted snapshot. The in-memory list is left as is; callers
    /// are expected to reload from scratch.
    pub fn clear(&mut self) -> Result<()> {
        self.slots
            .remove(STORAGE_KEY)
            .context("Clearing workout snapshot")?;
        tracing::info!("workout snapshot cleared");
        Ok(())
    }

    /// Timestamp-derived id, bumped forward until it is unused.
    pub fn next_id(&self, now: DateTime<Local>) -> WorkoutId {
        let mut ms = now.timestamp_millis();
        loop {
            let id = WorkoutId::from_millis(ms);
            if self.find(&id).is_none() {
                return id;
            }
            ms += 1;
        }
    }

    pub fn find(&self, id: &WorkoutId) -> Option<&Workout> {
        self.workouts.iter().find(|w| &w.id == id)
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    /// The raw persisted snapshot, if any.
    pub fn snapshot(&self) -> Result<Option<String>> {
        self.slots.get(STORAGE_KEY)
    }

    pub const fn slots(&self) -> &S {
        &self.slots
    }
}
