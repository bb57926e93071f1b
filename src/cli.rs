use crate::types::{Coordinates, WorkoutKind};
use crate::utils::parse_coordinates;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_DB: &str = "waymark.sqlite3";

#[derive(Parser, Debug)]
#[command(
    name = "waymark",
    about = "Log running and cycling workouts pinned to map locations"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,

    /// SQLite file holding the saved workouts.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DB, global = true)]
    pub db: PathBuf,

    /// Position reported as the current location (LAT,LNG).
    ///
    /// Without it, the location request is denied and the map never loads.
    #[arg(long, value_name = "LAT,LNG", value_parser = coordinates_arg, allow_hyphen_values = true, global = true)]
    pub here: Option<Coordinates>,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Record a workout at a map position.
    Log {
        #[arg(value_enum)]
        kind: WorkoutKind,

        /// Where on the map the workout took place.
        #[arg(long, value_name = "LAT,LNG", value_parser = coordinates_arg, allow_hyphen_values = true)]
        at: Coordinates,

        /// Distance in km.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        distance: String,

        /// Duration in minutes.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        duration: String,

        /// Steps per minute (running).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        cadence: String,

        /// Elevation gain in meters (cycling).
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        elevation: String,
    },

    /// Print every saved workout.
    List,

    /// Center the map on a saved workout.
    Show {
        /// Workout id as printed by `list`.
        id: String,
    },

    /// Delete all saved workouts.
    Reset,
}

fn coordinates_arg(s: &str) -> Result<Coordinates, String> {
    parse_coordinates(s).map_err(|e| e.to_string())
}
