//! Markup for the workout list and marker popups.
//!
//! Everything here reads plain fields only, so workouts reloaded from a
//! snapshot render exactly like freshly built ones.

use crate::types::{Metrics, Workout, WorkoutKind};
use anyhow::{Context, Result};
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupOptions {
    pub max_width: u32,
    pub min_width: u32,
    pub auto_close: bool,
    pub close_on_click: bool,
    pub class_name: String,
}

pub fn popup_options(kind: WorkoutKind) -> PopupOptions {
    PopupOptions {
        max_width: 250,
        min_width: 100,
        auto_close: false,
        close_on_click: false,
        class_name: format!("{kind}-popup"),
    }
}

/// Popup markup: icon and escaped description.
pub fn popup_content(workout: &Workout) -> String {
    format!("{} {}", workout.kind().icon(), escape(workout.description.as_str()))
}

struct Detail<'a> {
    icon: &'a str,
    value: String,
    unit: &'a str,
}

fn details(workout: &Workout) -> Vec<Detail<'static>> {
    let mut out = vec![
        Detail {
            icon: workout.kind().icon(),
            value: workout.distance_km.to_string(),
            unit: "km",
        },
        Detail {
            icon: "⏱",
            value: workout.duration_min.to_string(),
            unit: "min",
        },
    ];

    match workout.metrics {
        Metrics::Running {
            cadence_spm,
            pace_min_per_km,
        } => {
            out.push(Detail {
                icon: "⚡️",
                value: format!("{pace_min_per_km:.1}"),
                unit: "min/km",
            });
            out.push(Detail {
                icon: "🦶🏼",
                value: cadence_spm.to_string(),
                unit: "spm",
            });
        }
        Metrics::Cycling {
            elevation_gain_m,
            speed_km_per_h,
        } => {
            out.push(Detail {
                icon: "⚡️",
                value: format!("{speed_km_per_h:.1}"),
                unit: "km/h",
            });
            out.push(Detail {
                icon: "⛰",
                value: elevation_gain_m.to_string(),
                unit: "m",
            });
        }
    }

    out
}

/// The `<li>` block for one workout, tagged with its id.
pub fn list_item(workout: &Workout) -> Result<String> {
    let mut w = Writer::new(Vec::new());

    let class = format!("workout workout--{}", workout.kind());
    let li = BytesStart::new("li")
        .with_attributes([("class", class.as_str()), ("data-id", workout.id.as_str())]);
    w.write_event(Event::Start(li))
        .context("Writing list item")?;

    text_element(&mut w, "h2", "workout__title", &workout.description)?;

    for d in details(workout) {
        w.write_event(Event::Start(
            BytesStart::new("div").with_attributes([("class", "workout__details")]),
        ))?;
        text_element(&mut w, "span", "workout__icon", d.icon)?;
        text_element(&mut w, "span", "workout__value", &d.value)?;
        text_element(&mut w, "span", "workout__unit", d.unit)?;
        w.write_event(Event::End(BytesEnd::new("div")))?;
    }

    w.write_event(Event::End(BytesEnd::new("li")))?;

    String::from_utf8(w.into_inner()).context("List item markup is not UTF-8")
}

fn text_element(w: &mut Writer<Vec<u8>>, tag: &str, class: &str, text: &str) -> Result<()> {
    w.write_event(Event::Start(
        BytesStart::new(tag).with_attributes([("class", class)]),
    ))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}
