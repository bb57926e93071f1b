//! The interaction controller.
//!
//! `Application` owns the workout store and its collaborators (map, form, page)
//! and reacts to one `Event` at a time. Collaborators that produce events
//! (map clicks, geolocation replies) push into a shared `EventQueue`; the host
//! drains it with `run_pending`.

use crate::dlog;
use crate::render::{PopupOptions, list_item, popup_content, popup_options};
use crate::storage::SlotStore;
use crate::store::WorkoutStore;
use crate::types::{Coordinates, Workout, WorkoutId, WorkoutKind};
use crate::workout::{WorkoutInput, build, coerce_number};
use anyhow::Result;
use chrono::{DateTime, Local};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use thiserror::Error;

pub const MAP_CONTAINER: &str = "map";
pub const DEFAULT_ZOOM: u8 = 13;

const LOCATION_NOTICE: &str = "Could not get your position";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("geolocation denied")]
pub struct GeolocationDenied;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Located(Result<Coordinates, GeolocationDenied>),
    MapClicked(Coordinates),
    FormSubmitted,
    KindChanged,
    WorkoutClicked(WorkoutId),
    ResetRequested,
}

/// Single-threaded FIFO shared between the controller and its collaborators.
#[derive(Debug, Clone, Default)]
pub struct EventQueue(Rc<RefCell<VecDeque<Event>>>);

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push_back(event);
    }

    pub fn pop(&self) -> Option<Event> {
        self.0.borrow_mut().pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

pub trait MapWidget {
    type View: MapView;

    fn create_view(&mut self, container: &str, center: Coordinates, zoom: u8)
    -> Result<Self::View>;
}

pub trait MapView {
    type Marker: MapMarker;

    fn set_center(&mut self, center: Coordinates, zoom: u8);
    /// Clicks on the map must be pushed to `events` as `Event::MapClicked`.
    fn on_click(&mut self, events: EventQueue);
    fn add_marker(&mut self, at: Coordinates) -> Self::Marker;
}

pub trait MapMarker {
    fn bind_popup(&mut self, options: &PopupOptions);
    fn set_content(&mut self, html: &str);
    fn open(&mut self);
}

/// Raw field text as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub kind: WorkoutKind,
    pub distance: String,
    pub duration: String,
    pub cadence: String,
    pub elevation: String,
}

impl FormValues {
    pub fn to_input(&self) -> WorkoutInput {
        let third = match self.kind {
            WorkoutKind::Running => &self.cadence,
            WorkoutKind::Cycling => &self.elevation,
        };
        WorkoutInput {
            kind: self.kind,
            distance: coerce_number(&self.distance),
            duration: coerce_number(&self.duration),
            third: coerce_number(third),
        }
    }
}

pub trait WorkoutForm {
    fn values(&self) -> FormValues;
    fn clear(&mut self);
    fn set_visible(&mut self, visible: bool);
    /// Show the cadence row for running or the elevation row for cycling.
    fn show_field_for(&mut self, kind: WorkoutKind);
}

pub trait Page {
    /// Blocking, user-visible notice.
    fn notify(&mut self, message: &str);
    fn insert_workout(&mut self, markup: &str);
    fn reload(&mut self);
}

pub trait Geolocation {
    /// Push exactly one `Event::Located` to `events`, now or later.
    fn request_position(&mut self, events: EventQueue);
}

pub enum Phase<V> {
    AwaitingLocation,
    MapReady { view: V, form: FormState },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    Hidden,
    Visible { at: Coordinates },
}

type Clock = Box<dyn Fn() -> DateTime<Local>>;
type ViewOf<M> = <M as MapWidget>::View;
type MarkerOf<M> = <ViewOf<M> as MapView>::Marker;

pub struct Application<M: MapWidget, F, P, S> {
    map: M,
    form: F,
    page: P,
    store: WorkoutStore<S>,
    phase: Phase<ViewOf<M>>,
    markers: Vec<MarkerOf<M>>,
    events: EventQueue,
    clock: Clock,
}

impl<M, F, P, S> Application<M, F, P, S>
where
    M: MapWidget,
    F: WorkoutForm,
    P: Page,
    S: SlotStore,
{
    pub fn new(map: M, form: F, page: P, slots: S) -> Self {
        Self {
            map,
            form,
            page,
            store: WorkoutStore::new(slots),
            phase: Phase::AwaitingLocation,
            markers: Vec::new(),
            events: EventQueue::new(),
            clock: Box::new(Local::now),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Load persisted workouts, render them as list items, then ask for the
    /// current position. Markers follow once the map is ready.
    pub fn start(&mut self, geolocation: &mut impl Geolocation) {
        self.store.load_from_persistence();
        for w in self.store.workouts() {
            render_list_item(&mut self.page, w);
        }
        geolocation.request_position(self.events.clone());
        self.run_pending();
    }

    pub fn events(&self) -> EventQueue {
        self.events.clone()
    }

    pub fn run_pending(&mut self) {
        while let Some(event) = self.events.pop() {
            self.handle(event);
        }
    }

    pub fn handle(&mut self, event: Event) {
        dlog!("event={event:?}");
        match event {
            Event::Located(Ok(at)) => self.load_map(at),
            Event::Located(Err(e)) => {
                tracing::warn!(err = %e, "position unavailable");
                if matches!(self.phase, Phase::AwaitingLocation) {
                    self.page.notify(LOCATION_NOTICE);
                }
            }
            Event::MapClicked(at) => self.show_form(at),
            Event::FormSubmitted => self.submit(),
            Event::KindChanged => {
                let kind = self.form.values().kind;
                self.form.show_field_for(kind);
            }
            Event::WorkoutClicked(id) => self.move_to(&id),
            Event::ResetRequested => self.reset(),
        }
    }

    fn load_map(&mut self, at: Coordinates) {
        if !matches!(self.phase, Phase::AwaitingLocation) {
            dlog!("map already loaded; ignoring position {at}");
            return;
        }

        let mut view = match self.map.create_view(MAP_CONTAINER, at, DEFAULT_ZOOM) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(err = %e, "could not create map view");
                self.page.notify(LOCATION_NOTICE);
                return;
            }
        };
        view.on_click(self.events.clone());

        for w in self.store.workouts() {
            self.markers.push(render_marker(&mut view, w));
        }
        tracing::info!(center = %at, markers = self.markers.len(), "map ready");

        self.phase = Phase::MapReady {
            view,
            form: FormState::Hidden,
        };
    }

    fn show_form(&mut self, at: Coordinates) {
        let Phase::MapReady { form: state, .. } = &mut self.phase else {
            dlog!("map click before map is ready");
            return;
        };
        if matches!(state, FormState::Hidden) {
            self.form.set_visible(true);
        }
        *state = FormState::Visible { at };
    }

    fn submit(&mut self) {
        let Phase::MapReady {
            view,
            form: form_state,
        } = &mut self.phase
        else {
            dlog!("submit before map is ready");
            return;
        };
        let FormState::Visible { at } = *form_state else {
            dlog!("submit without a visible form");
            return;
        };

        let input = self.form.values().to_input();
        let now = (self.clock)();
        let id = self.store.next_id(now);
        let workout = match build(&input, at, id, now) {
            Ok(w) => w,
            Err(e) => {
                dlog!("rejected submission: {e}");
                self.page.notify(&e.to_string());
                return;
            }
        };

        let workout = match self.store.append(workout) {
            Ok(w) => w,
            Err(e) => {
                tracing::error!(err = %e, "could not save workout");
                self.page.notify("Could not save workout");
                return;
            }
        };

        self.markers.push(render_marker(view, workout));
        render_list_item(&mut self.page, workout);

        self.form.clear();
        self.form.set_visible(false);
        *form_state = FormState::Hidden;
    }

    fn move_to(&mut self, id: &WorkoutId) {
        let Phase::MapReady { view, .. } = &mut self.phase else {
            dlog!("workout click before map is ready");
            return;
        };
        let Some(w) = self.store.find(id) else {
            dlog!("no workout with id={id}");
            return;
        };
        view.set_center(w.coordinates, DEFAULT_ZOOM);
    }

    /// Drop the persisted snapshot and reload from scratch.
    pub fn reset(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::error!(err = %e, "could not clear workouts");
        }
        self.page.reload();
    }

    pub fn workouts(&self) -> &[Workout] {
        self.store.workouts()
    }

    pub const fn store(&self) -> &WorkoutStore<S> {
        &self.store
    }

    pub const fn phase(&self) -> &Phase<ViewOf<M>> {
        &self.phase
    }

    pub fn form_state(&self) -> Option<FormState> {
        match &self.phase {
            Phase::AwaitingLocation => None,
            Phase::MapReady { form, .. } => Some(*form),
        }
    }

    pub fn markers(&self) -> &[MarkerOf<M>] {
        &self.markers
    }

    pub const fn form(&self) -> &F {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    pub const fn page(&self) -> &P {
        &self.page
    }
}

fn render_marker<V: MapView>(view: &mut V, workout: &Workout) -> V::Marker {
    let mut marker = view.add_marker(workout.coordinates);
    marker.bind_popup(&popup_options(workout.kind()));
    marker.set_content(&popup_content(workout));
    marker.open();
    marker
}

fn render_list_item(page: &mut impl Page, workout: &Workout) {
    match list_item(workout) {
        Ok(html) => page.insert_workout(&html),
        Err(e) => tracing::error!(id = %workout.id, err = %e, "could not render workout"),
    }
}
