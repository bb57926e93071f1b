#![allow(dead_code)]

use anyhow::{Result, bail};
use chrono::{DateTime, Local, TimeZone};
use waymark::app::{
    Application, Event, EventQueue, FormValues, Geolocation, GeolocationDenied, MapMarker,
    MapView, MapWidget, Page, WorkoutForm,
};
use waymark::render::PopupOptions;
use waymark::storage::SlotStore;
use waymark::types::{Coordinates, WorkoutKind};

pub const HOME: Coordinates = Coordinates::new(38.72, -9.14);

pub fn april_14() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 4, 14, 9, 30, 0).unwrap()
}

#[derive(Debug, Default)]
pub struct FakeMap {
    pub fail: bool,
}

impl MapWidget for FakeMap {
    type View = FakeView;

    fn create_view(&mut self, container: &str, center: Coordinates, zoom: u8) -> Result<FakeView> {
        if self.fail {
            bail!("no tiles");
        }
        Ok(FakeView {
            container: container.to_string(),
            centers: vec![(center, zoom)],
            clicks: None,
        })
    }
}

#[derive(Debug)]
pub struct FakeView {
    pub container: String,
    pub centers: Vec<(Coordinates, u8)>,
    pub clicks: Option<EventQueue>,
}

impl MapView for FakeView {
    type Marker = FakeMarker;

    fn set_center(&mut self, center: Coordinates, zoom: u8) {
        self.centers.push((center, zoom));
    }

    fn on_click(&mut self, events: EventQueue) {
        self.clicks = Some(events);
    }

    fn add_marker(&mut self, at: Coordinates) -> FakeMarker {
        FakeMarker {
            at,
            popup: None,
            content: None,
            opened: 0,
        }
    }
}

#[derive(Debug)]
pub struct FakeMarker {
    pub at: Coordinates,
    pub popup: Option<PopupOptions>,
    pub content: Option<String>,
    pub opened: usize,
}

impl MapMarker for FakeMarker {
    fn bind_popup(&mut self, options: &PopupOptions) {
        self.popup = Some(options.clone());
    }

    fn set_content(&mut self, html: &str) {
        self.content = Some(html.to_string());
    }

    fn open(&mut self) {
        self.opened += 1;
    }
}

#[derive(Debug)]
pub struct FakeForm {
    pub values: FormValues,
    pub visible: bool,
    pub shown_field: Option<WorkoutKind>,
    pub cleared: usize,
}

impl FakeForm {
    pub fn new() -> Self {
        Self {
            values: FormValues {
                kind: WorkoutKind::Running,
                distance: String::new(),
                duration: String::new(),
                cadence: String::new(),
                elevation: String::new(),
            },
            visible: false,
            shown_field: None,
            cleared: 0,
        }
    }

    pub fn fill(&mut self, kind: WorkoutKind, distance: &str, duration: &str, third: &str) {
        self.values.kind = kind;
        self.values.distance = distance.to_string();
        self.values.duration = duration.to_string();
        match kind {
            WorkoutKind::Running => self.values.cadence = third.to_string(),
            WorkoutKind::Cycling => self.values.elevation = third.to_string(),
        }
    }
}

impl WorkoutForm for FakeForm {
    fn values(&self) -> FormValues {
        self.values.clone()
    }

    fn clear(&mut self) {
        self.cleared += 1;
        self.values.distance.clear();
        self.values.duration.clear();
        self.values.cadence.clear();
        self.values.elevation.clear();
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn show_field_for(&mut self, kind: WorkoutKind) {
        self.shown_field = Some(kind);
    }
}

#[derive(Debug, Default)]
pub struct FakePage {
    pub notices: Vec<String>,
    pub items: Vec<String>,
    pub reloads: usize,
}

impl Page for FakePage {
    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }

    fn insert_workout(&mut self, markup: &str) {
        self.items.push(markup.to_string());
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }
}

/// Replies immediately, like a browser with a cached position.
pub struct InstantGeolocation(pub Option<Coordinates>);

impl Geolocation for InstantGeolocation {
    fn request_position(&mut self, events: EventQueue) {
        events.push(Event::Located(self.0.ok_or(GeolocationDenied)));
    }
}

/// Holds on to the queue and replies when the test says so.
#[derive(Default)]
pub struct DeferredGeolocation {
    pub pending: Option<EventQueue>,
}

impl DeferredGeolocation {
    pub fn reply(&mut self, result: Result<Coordinates, GeolocationDenied>) {
        if let Some(events) = self.pending.take() {
            events.push(Event::Located(result));
        }
    }
}

impl Geolocation for DeferredGeolocation {
    fn request_position(&mut self, events: EventQueue) {
        self.pending = Some(events);
    }
}

pub type TestApp<S> = Application<FakeMap, FakeForm, FakePage, S>;

pub fn app<S: SlotStore>(slots: S) -> TestApp<S> {
    Application::new(FakeMap::default(), FakeForm::new(), FakePage::default(), slots)
        .with_clock(april_14)
}

/// Click the map at `at`, fill the form and submit.
pub fn submit<S: SlotStore>(
    app: &mut TestApp<S>,
    at: Coordinates,
    kind: WorkoutKind,
    distance: &str,
    duration: &str,
    third: &str,
) {
    app.handle(Event::MapClicked(at));
    app.form_mut().fill(kind, distance, duration, third);
    app.handle(Event::FormSubmitted);
}
