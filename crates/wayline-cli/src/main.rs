//! wayline: CLI driver for route sketching and playback.
//!
//! Edits the persisted route point by point, manages the saved-routes
//! list, and replays a route as an animated marker traversal printed
//! one sample per frame. Stands in for the map screens of a graphical
//! frontend: every command is a thin driver over `wayline-core`.
//!
//! # Usage
//!
//! ```text
//! wayline [--store-dir DIR] [--threshold DEG] <COMMAND>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use wayline_core::{
    AnimationController, Clock, Coordinate, DEFAULT_REGION, PlaybackState, RouteStore,
    StoreConfig,
};
use wayline_io::{FsGateway, timestamp};

/// Sketch, edit, persist, and replay geographic routes.
#[derive(Parser)]
#[command(name = "wayline", version)]
struct Cli {
    /// Directory holding the persisted route store.
    #[arg(long, default_value = ".wayline")]
    store_dir: PathBuf,

    /// Proximity threshold for `tap`, degrees.
    #[arg(long, default_value_t = wayline_core::DEFAULT_INSERT_THRESHOLD)]
    threshold: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the route points and the fitted viewport.
    Show,

    /// Append a point at the end of the route.
    Append {
        /// Latitude in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Add a point with the tap-to-edit policy: near the existing
    /// line it splits the closest segment, otherwise it is appended.
    Tap {
        /// Latitude in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Replace the point at INDEX in place.
    MovePoint {
        /// Zero-based point index.
        index: usize,
        /// Latitude in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees.
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Remove the point at INDEX.
    Remove {
        /// Zero-based point index.
        index: usize,
    },

    /// Remove all points from the route.
    Clear,

    /// Capture the current route into the saved-routes list.
    Save {
        /// Optional label for the saved route.
        #[arg(long)]
        name: Option<String>,
    },

    /// List saved routes.
    List,

    /// Rename the saved route at INDEX.
    Rename {
        /// Zero-based saved-route index.
        index: usize,
        /// New label.
        name: String,
    },

    /// Delete the saved route at INDEX.
    Delete {
        /// Zero-based saved-route index.
        index: usize,
    },

    /// Replace the live route with the saved route at INDEX.
    Restore {
        /// Zero-based saved-route index.
        index: usize,
    },

    /// Replay the route as an animated marker, one sample per frame.
    Play {
        /// Total traversal duration in milliseconds.
        #[arg(long, default_value_t = 5000)]
        duration_ms: u64,

        /// Samples per second.
        #[arg(long, default_value_t = 30, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
        fps: u32,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let gateway = FsGateway::new(&cli.store_dir);
    let config = StoreConfig {
        insert_threshold: cli.threshold,
    };
    let mut store = RouteStore::open(gateway, config);

    match &cli.command {
        Command::Show => show(&store)?,
        Command::Append { lat, lon } => {
            store.append(Coordinate::new(*lat, *lon))?;
            println!("Appended point {} at ({lat}, {lon})", store.route().len() - 1);
        }
        Command::Tap { lat, lon } => {
            store.insert_near(Coordinate::new(*lat, *lon))?;
            println!("Route now has {} points", store.route().len());
        }
        Command::MovePoint { index, lat, lon } => {
            store.move_to(*index, Coordinate::new(*lat, *lon))?;
            println!("Moved point {index} to ({lat}, {lon})");
        }
        Command::Remove { index } => {
            store.remove_at(*index)?;
            println!("Removed point {index}; {} points remain", store.route().len());
        }
        Command::Clear => {
            store.clear()?;
            println!("Route cleared");
        }
        Command::Save { name } => {
            store.save_current(name.clone(), timestamp::now_label())?;
            println!("Saved route {}", store.saved_routes().len() - 1);
        }
        Command::List => list(&store),
        Command::Rename { index, name } => {
            store.rename_saved(*index, name.clone())?;
            println!("Renamed saved route {index} to {name:?}");
        }
        Command::Delete { index } => {
            store.delete_saved(*index)?;
            println!("Deleted saved route {index}");
        }
        Command::Restore { index } => {
            store.restore_saved(*index)?;
            println!(
                "Restored saved route {index} as the live route ({} points)",
                store.route().len()
            );
        }
        Command::Play { duration_ms, fps } => play(&store, *duration_ms, *fps)?,
    }

    Ok(())
}

/// Print the route points and the fitted viewport as JSON.
fn show(store: &RouteStore<FsGateway>) -> Result<(), Box<dyn Error>> {
    let route = store.route();
    if route.is_empty() {
        println!("Route is empty");
    } else {
        for (i, p) in route.points().iter().enumerate() {
            println!("{i:>4}  {:>12.6}, {:>12.6}", p.latitude, p.longitude);
        }
    }
    let region = store.region(DEFAULT_REGION);
    println!("{}", serde_json::to_string_pretty(&region)?);
    Ok(())
}

/// Print the saved-routes list.
fn list(store: &RouteStore<FsGateway>) {
    let saved = store.saved_routes();
    if saved.is_empty() {
        println!("No saved routes");
        return;
    }
    for (i, entry) in saved.iter().enumerate() {
        let name = entry.name.as_deref().unwrap_or("(unnamed)");
        println!(
            "{i:>4}  {name}  — {} points, saved {}",
            entry.coordinates.len(),
            entry.saved_at,
        );
    }
}

/// Drive the animation controller against the wall clock, printing
/// one sample per frame, then hold the arrived marker for the grace
/// period before confirming the auto-reset.
fn play(store: &RouteStore<FsGateway>, duration_ms: u64, fps: u32) -> Result<(), Box<dyn Error>> {
    let snapshot = store.snapshot();
    let mut controller = AnimationController::new(StdClock);
    let token = controller.start(&snapshot, Duration::from_millis(duration_ms))?;
    let frame = Duration::from_secs_f64(1.0 / f64::from(fps));

    while let Some(pos) = controller.tick(token) {
        println!(
            "{:6.1}%  {:>12.6}, {:>12.6}",
            controller.progress() * 100.0,
            pos.latitude,
            pos.longitude,
        );

        if controller.state() == PlaybackState::Completed {
            // Hold at the final waypoint until the grace period ends.
            while !controller.try_reset(token) {
                thread::sleep(frame);
            }
            println!("Arrived — marker reset to start");
            return Ok(());
        }

        thread::sleep(frame);
    }

    Ok(())
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
