use crate::types::Coordinates;
use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::{EnvFilter, fmt};

#[macro_export]
macro_rules! dlog {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*);
    };
}

static COORDINATES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?\d+(?:\.\d+)?)\s*,\s*([+-]?\d+(?:\.\d+)?)\s*$")
        .expect("coordinate pattern is valid")
});

/// Initialize colorful logging.
///
/// Default level is INFO.
/// - `-v` => DEBUG
/// - `-vv` => TRACE
/// - `-q` => WARN
/// - `-qq` => ERROR
///
/// `RUST_LOG` overrides everything (e.g. `RUST_LOG=trace`).
pub fn init_logging(verbose: u8, quiet: u8) {
    let level = level_for(verbose, quiet);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,waymark={level}")));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}

fn level_for(verbose: u8, quiet: u8) -> &'static str {
    let net = i16::from(verbose) - i16::from(quiet);
    match net {
        i16::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i16::MAX => "trace",
    }
}

/// Parse `"lat,lng"`, e.g. `"38.72, -9.14"`.
pub fn parse_coordinates(s: &str) -> Result<Coordinates> {
    let Some(caps) = COORDINATES_RE.captures(s) else {
        bail!("expected LAT,LNG but got {s:?}");
    };
    let lat: f64 = caps[1].parse()?;
    let lng: f64 = caps[2].parse()?;

    if !(-90.0..=90.0).contains(&lat) {
        bail!("latitude out of range: {lat}");
    }
    if !(-180.0..=180.0).contains(&lng) {
        bail!("longitude out of range: {lng}");
    }

    Ok(Coordinates::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(level_for(0, 0), "info");
        assert_eq!(level_for(1, 0), "debug");
        assert_eq!(level_for(5, 0), "trace");
        assert_eq!(level_for(0, 1), "warn");
        assert_eq!(level_for(1, 3), "error");
    }

    #[test]
    fn coordinates_accept_spacing_and_signs() {
        assert_eq!(
            parse_coordinates("38.72, -9.14").unwrap(),
            Coordinates::new(38.72, -9.14)
        );
        assert_eq!(
            parse_coordinates(" +10,20 ").unwrap(),
            Coordinates::new(10.0, 20.0)
        );
    }

    #[test]
    fn coordinates_reject_garbage_and_range() {
        assert!(parse_coordinates("38.72").is_err());
        assert!(parse_coordinates("north,south").is_err());
        assert!(parse_coordinates("91,0").is_err());
        assert!(parse_coordinates("0,-181").is_err());
    }
}
