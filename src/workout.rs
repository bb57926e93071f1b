//! Building workouts from form input.
//!
//! Validation runs in two passes: every field must be a finite number, then
//! distance, duration and cadence must be strictly positive. Elevation is only
//! ever checked for finiteness. The derived pace or speed must come out finite
//! as well, since the snapshot cannot hold infinities.

use crate::types::{Coordinates, Metrics, Workout, WorkoutId, WorkoutKind};
use chrono::{DateTime, Local, Utc};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Distance,
    Duration,
    Cadence,
    Elevation,
    Pace,
    Speed,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Distance => "Distance",
            Self::Duration => "Duration",
            Self::Cadence => "Cadence",
            Self::Elevation => "Elevation gain",
            Self::Pace => "Pace",
            Self::Speed => "Speed",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} should be a number")]
    NotANumber { field: Field },

    #[error("{field} should be a positive number")]
    NotPositive { field: Field },

    #[error("{field} is out of range")]
    OutOfRange { field: Field },
}

/// Numeric form values, already coerced from text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkoutInput {
    pub kind: WorkoutKind,
    pub distance: f64,
    pub duration: f64,
    /// Cadence for running, elevation gain for cycling.
    pub third: f64,
}

impl WorkoutInput {
    const fn third_field(&self) -> Field {
        match self.kind {
            WorkoutKind::Running => Field::Cadence,
            WorkoutKind::Cycling => Field::Elevation,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let third = self.third_field();
        let fields = [
            (Field::Distance, self.distance),
            (Field::Duration, self.duration),
            (third, self.third),
        ];

        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::NotANumber { field });
        }

        // Elevation gain may be zero or negative.
        let must_be_positive = match self.kind {
            WorkoutKind::Running => &fields[..],
            WorkoutKind::Cycling => &fields[..2],
        };
        if let Some(&(field, _)) = must_be_positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(ValidationError::NotPositive { field });
        }

        Ok(())
    }
}

/// Coerce form text to a number: blank is `0`, anything unparsable is NaN.
pub fn coerce_number(raw: &str) -> f64 {
    let s = raw.trim();
    if s.is_empty() {
        return 0.0;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

pub fn pace_min_per_km(distance_km: f64, duration_min: f64) -> f64 {
    duration_min / distance_km
}

pub fn speed_km_per_h(distance_km: f64, duration_min: f64) -> f64 {
    distance_km / (duration_min / 60.0)
}

/// e.g. `"Running on April 14"`.
pub fn describe(kind: WorkoutKind, at: &DateTime<Local>) -> String {
    format!("{} on {}", kind.label(), at.format("%B %-d"))
}

/// Validate `input` and build the matching variant with all derived fields.
pub fn build(
    input: &WorkoutInput,
    coordinates: Coordinates,
    id: WorkoutId,
    now: DateTime<Local>,
) -> Result<Workout, ValidationError> {
    input.validate()?;

    let metrics = match input.kind {
        WorkoutKind::Running => Metrics::Running {
            cadence_spm: input.third,
            pace_min_per_km: pace_min_per_km(input.distance, input.duration),
        },
        WorkoutKind::Cycling => Metrics::Cycling {
            elevation_gain_m: input.third,
            speed_km_per_h: speed_km_per_h(input.distance, input.duration),
        },
    };

    let (field, derived) = match metrics {
        Metrics::Running {
            pace_min_per_km, ..
        } => (Field::Pace, pace_min_per_km),
        Metrics::Cycling { speed_km_per_h, .. } => (Field::Speed, speed_km_per_h),
    };
    if !derived.is_finite() {
        return Err(ValidationError::OutOfRange { field });
    }

    Ok(Workout {
        id,
        created_at: now.with_timezone(&Utc),
        coordinates,
        distance_km: input.distance,
        duration_min: input.duration,
        description: describe(input.kind, &now),
        metrics,
    })
}
