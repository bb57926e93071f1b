#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Result, bail};
use clap::Parser;
use waymark::app::{Application, Event, FormValues, Phase};
use waymark::storage::SqliteSlotStore;
use waymark::terminal::{ArgsForm, FixedGeolocation, StdoutPage, TextMap};
use waymark::{cli, utils};

#[macro_use]
extern crate waymark;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let slots = SqliteSlotStore::open(&cli.db)?;
    let mut geolocation = FixedGeolocation(cli.here);
    dlog!("db={} here={:?}", cli.db.display(), cli.here);

    match cli.cmd {
        cli::Cmd::Log {
            kind,
            at,
            distance,
            duration,
            cadence,
            elevation,
        } => {
            let form = ArgsForm::new(FormValues {
                kind,
                distance,
                duration,
                cadence,
                elevation,
            });
            let mut app = Application::new(TextMap, form, StdoutPage::default(), slots);
            app.start(&mut geolocation);

            let Phase::MapReady { view, .. } = app.phase() else {
                bail!("The map is not available without a position; pass --here LAT,LNG.");
            };
            view.click(at);
            let events = app.events();
            events.push(Event::KindChanged);
            events.push(Event::FormSubmitted);
            app.run_pending();

            if let Some(notice) = app.page().notices().last() {
                bail!("Workout not saved: {notice}");
            }
            if let Some(w) = app.workouts().last() {
                println!("saved {} ({})", w.id, w.description);
            }
            Ok(())
        }
        cli::Cmd::List => {
            let mut app =
                Application::new(TextMap, ArgsForm::empty(), StdoutPage::default(), slots);
            app.start(&mut geolocation);
            dlog!("listed count={}", app.workouts().len());
            Ok(())
        }
        cli::Cmd::Show { id } => {
            let mut app =
                Application::new(TextMap, ArgsForm::empty(), StdoutPage::default(), slots);
            app.start(&mut geolocation);
            if app.form_state().is_none() {
                bail!("The map is not available without a position; pass --here LAT,LNG.");
            }
            if app.store().find(&id.as_str().into()).is_none() {
                bail!("No workout with id {id}");
            }
            app.handle(Event::WorkoutClicked(id.as_str().into()));
            Ok(())
        }
        cli::Cmd::Reset => {
            let mut app =
                Application::new(TextMap, ArgsForm::empty(), StdoutPage::default(), slots);
            app.reset();
            if app.page().reloaded() {
                println!("all workouts deleted");
            }
            Ok(())
        }
    }
}
