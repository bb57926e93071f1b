//! Terminal stand-ins for the map, form, page and geolocation.
//!
//! Markers, list items and notices are printed; everything else is logged.

use crate::app::{
    Event, EventQueue, FormValues, Geolocation, GeolocationDenied, MapMarker, MapView, MapWidget,
    Page, WorkoutForm,
};
use crate::dlog;
use crate::render::PopupOptions;
use crate::types::{Coordinates, WorkoutKind};
use anyhow::Result;

#[derive(Debug, Default)]
pub struct TextMap;

impl MapWidget for TextMap {
    type View = TextView;

    fn create_view(&mut self, container: &str, center: Coordinates, zoom: u8) -> Result<TextView> {
        tracing::info!(container, center = %center, zoom, "map view created");
        Ok(TextView {
            center,
            zoom,
            clicks: None,
        })
    }
}

#[derive(Debug)]
pub struct TextView {
    pub center: Coordinates,
    pub zoom: u8,
    clicks: Option<EventQueue>,
}

impl TextView {
    /// Simulate a click at `at`. Ignored until a listener is registered.
    pub fn click(&self, at: Coordinates) {
        if let Some(events) = &self.clicks {
            events.push(Event::MapClicked(at));
        }
    }
}

impl MapView for TextView {
    type Marker = TextMarker;

    fn set_center(&mut self, center: Coordinates, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        println!("map centered on {center} (zoom {zoom})");
    }

    fn on_click(&mut self, events: EventQueue) {
        self.clicks = Some(events);
    }

    fn add_marker(&mut self, at: Coordinates) -> TextMarker {
        TextMarker {
            at,
            class_name: String::new(),
            content: String::new(),
        }
    }
}

#[derive(Debug)]
pub struct TextMarker {
    pub at: Coordinates,
    pub class_name: String,
    pub content: String,
}

impl MapMarker for TextMarker {
    fn bind_popup(&mut self, options: &PopupOptions) {
        self.class_name.clone_from(&options.class_name);
    }

    fn set_content(&mut self, html: &str) {
        html.clone_into(&mut self.content);
    }

    fn open(&mut self) {
        println!("📍 {}  {}", self.at, self.content);
    }
}

/// A form whose fields were filled from command-line arguments.
#[derive(Debug)]
pub struct ArgsForm {
    values: FormValues,
    visible: bool,
}

impl ArgsForm {
    pub const fn new(values: FormValues) -> Self {
        Self {
            values,
            visible: false,
        }
    }

    pub const fn empty() -> Self {
        Self::new(FormValues {
            kind: WorkoutKind::Running,
            distance: String::new(),
            duration: String::new(),
            cadence: String::new(),
            elevation: String::new(),
        })
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }
}

impl WorkoutForm for ArgsForm {
    fn values(&self) -> FormValues {
        self.values.clone()
    }

    fn clear(&mut self) {
        self.values.distance.clear();
        self.values.duration.clear();
        self.values.cadence.clear();
        self.values.elevation.clear();
    }

    fn set_visible(&mut self, visible: bool) {
        dlog!("form visible={visible}");
        self.visible = visible;
    }

    fn show_field_for(&mut self, kind: WorkoutKind) {
        dlog!("form showing third field for {kind}");
    }
}

/// Prints list items to stdout and notices to stderr.
#[derive(Debug, Default)]
pub struct StdoutPage {
    notices: Vec<String>,
    reloaded: bool,
}

impl StdoutPage {
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub const fn reloaded(&self) -> bool {
        self.reloaded
    }
}

impl Page for StdoutPage {
    fn notify(&mut self, message: &str) {
        eprintln!("{message}");
        self.notices.push(message.to_string());
    }

    fn insert_workout(&mut self, markup: &str) {
        println!("{markup}");
    }

    fn reload(&mut self) {
        tracing::info!("reloading");
        self.reloaded = true;
    }
}

/// Reports a configured position, or denies the request when there is none.
#[derive(Debug, Clone, Copy)]
pub struct FixedGeolocation(pub Option<Coordinates>);

impl Geolocation for FixedGeolocation {
    fn request_position(&mut self, events: EventQueue) {
        events.push(Event::Located(self.0.ok_or(GeolocationDenied)));
    }
}
