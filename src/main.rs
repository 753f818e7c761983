//! SunSafe: safe sun exposure from the current UV index.

mod interactive;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};

use sunsafe_core::{App, Config};
use sunsafe_ui::{AppServices, Controller, Tab};
use sunsafe_uv::{FileStore, KeyValueStore, PlaceTable, Settings};

/// Sun safety tracker
#[derive(Parser)]
#[command(name = "sunsafe", about = "Safe sun exposure time from the current UV index")]
struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the directory settings and cached data are kept in
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the Home tab, using cached data when it is fresh
    Show {
        /// Also write the dial as SVG
        #[arg(long)]
        svg: Option<PathBuf>,
    },
    /// Fetch fresh UV data and show the Home tab
    Refresh,
    /// Show or change location and skin type
    Settings {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,
        /// Fitzpatrick skin type, 1-6
        #[arg(long)]
        skin: Option<String>,
        /// "City, ST" from the configured place table
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,
    },
    /// Highlight a dial position
    Select {
        /// Clock position, 1-12
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12), conflicts_with = "click")]
        hour: Option<u32>,
        /// Click position as X,Y
        #[arg(long, value_parser = parse_pair, allow_hyphen_values = true)]
        click: Option<(f64, f64)>,
        /// Dial size as W,H
        #[arg(long, value_parser = parse_pair, default_value = "100,100")]
        size: (f64, f64),
    },
    /// Line-driven session
    Interactive,
}

fn parse_pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected two numbers separated by a comma, got '{}'", s))?;
    let a = a.trim().parse().map_err(|_| format!("not a number: '{}'", a))?;
    let b = b.trim().parse().map_err(|_| format!("not a number: '{}'", b))?;
    Ok((a, b))
}

pub(crate) fn write_svg(controller: &Controller<Local>, path: &Path) -> Result<()> {
    let Some(svg) = controller.dial_svg() else {
        println!("No UV data to draw");
        return Ok(());
    };
    std::fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Dial written to {}", path.display());
    Ok(())
}

fn run(command: Command, controller: &mut Controller<Local>, wait: Duration) -> Result<()> {
    controller.start();

    match command {
        Command::Show { svg } => {
            controller.wait_idle(wait);
            println!("{}", controller.render());
            if let Some(path) = svg {
                write_svg(controller, &path)?;
            }
        }

        Command::Refresh => {
            // A cache miss at start already kicked off a fetch
            if !controller.state().is_busy() {
                controller.refresh();
            }
            controller.wait_idle(wait);
            println!("{}", controller.render());
        }

        Command::Settings {
            lat,
            lon,
            skin,
            city,
        } => {
            let current = controller.state().settings.clone();
            let accepted = if let Some(city) = city {
                let skin = skin.unwrap_or(current.skin_type);
                controller.submit_place(&city, &skin)
            } else if lat.is_some() || lon.is_some() || skin.is_some() {
                let settings = Settings::new(
                    lat.unwrap_or(current.latitude),
                    lon.unwrap_or(current.longitude),
                    skin.unwrap_or(current.skin_type),
                );
                controller.submit_settings(settings)
            } else {
                controller.select_tab(Tab::Settings);
                println!("{}", controller.render());
                return Ok(());
            };

            if !accepted {
                controller.select_tab(Tab::Settings);
                println!("{}", controller.render());
                bail!("Settings were not saved");
            }
            controller.wait_idle(wait);
            println!("{}", controller.render());
        }

        Command::Select { hour, click, size } => {
            controller.wait_idle(wait);
            let picked = match (hour, click) {
                (Some(hour), _) => controller.select_hour(hour),
                (None, Some((x, y))) => controller.click(x, y, size.0, size.1),
                (None, None) => bail!("Pass --hour or --click"),
            };
            if picked.is_none() {
                println!("No UV reading for that position");
            }
            println!("{}", controller.render());
        }

        Command::Interactive => {
            controller.wait_idle(wait);
            interactive::run(controller, wait)?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dir) = cli.storage_dir {
        config.storage_dir = dir;
    }

    sunsafe_core::init(&config.log_level)?;

    let mut app = App::with_config(config);
    app.initialize()?;
    let config = app.shared_config();

    tracing::info!("SunSafe started");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("sunsafe-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    let services = AppServices::from_config(runtime.handle().clone(), &config.api)
        .context("Invalid UV API configuration")?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&config.storage_dir));
    let mut controller = Controller::new(Arc::new(services), store, Local);

    if let Some(path) = &config.places_file {
        match PlaceTable::load(path) {
            Ok(places) => controller = controller.with_places(places),
            Err(e) => tracing::warn!("Place lookup unavailable: {}", e),
        }
    }

    // Allow the request timeout plus a little slack
    let wait = Duration::from_secs(config.api.timeout_secs + 1);
    let command = cli.command.unwrap_or(Command::Show { svg: None });
    let result = run(command, &mut controller, wait);

    // Graceful shutdown
    controller.shutdown();
    app.shutdown()?;

    result
}
