//! Line-driven session: one command per line, the screen is redrawn after each.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use sunsafe_ui::{Controller, Tab};
use sunsafe_uv::Settings;

const HELP: &str = "\
Commands:
  home                      show the Home tab
  settings                  show the Settings tab
  settings LAT LON SKIN     save new settings and refresh
  city NAME, ST             use coordinates from the place table
  refresh | retry           fetch fresh UV data
  hour N                    select dial position N (1-12)
  click X Y [W H]           select the dial segment under a click
  svg PATH                  write the dial as SVG
  help                      show this list
  quit                      leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Home,
    Settings,
    UpdateSettings {
        latitude: String,
        longitude: String,
        skin_type: String,
    },
    City(String),
    Refresh,
    Hour(u32),
    Click {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Svg(PathBuf),
    Help,
    Quit,
}

fn number<T: std::str::FromStr>(word: &str, what: &str) -> Result<T, String> {
    word.parse()
        .map_err(|_| format!("{} must be a number, got '{}'", what, word))
}

pub fn parse(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Err("empty command".to_string());
    };

    match (name.to_lowercase().as_str(), args) {
        ("home", []) => Ok(Command::Home),
        ("settings", []) => Ok(Command::Settings),
        ("settings", [lat, lon, skin]) => Ok(Command::UpdateSettings {
            latitude: lat.to_string(),
            longitude: lon.to_string(),
            skin_type: skin.to_string(),
        }),
        ("city", rest) if !rest.is_empty() => Ok(Command::City(rest.join(" "))),
        ("refresh" | "retry", []) => Ok(Command::Refresh),
        ("hour", [h]) => {
            let hour: u32 = number(h, "hour")?;
            if !(1..=12).contains(&hour) {
                return Err(format!("hour must be 1-12, got {}", hour));
            }
            Ok(Command::Hour(hour))
        }
        ("click", [x, y]) => Ok(Command::Click {
            x: number(x, "x")?,
            y: number(y, "y")?,
            width: 100.0,
            height: 100.0,
        }),
        ("click", [x, y, w, h]) => Ok(Command::Click {
            x: number(x, "x")?,
            y: number(y, "y")?,
            width: number(w, "width")?,
            height: number(h, "height")?,
        }),
        ("svg", [path]) => Ok(Command::Svg(PathBuf::from(path))),
        ("help" | "?", []) => Ok(Command::Help),
        ("quit" | "exit" | "q", []) => Ok(Command::Quit),
        _ => Err(format!("unknown command: {} (try 'help')", line.trim())),
    }
}

pub fn run(controller: &mut Controller<Local>, wait: Duration) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("{}", controller.render());
    println!("{}", HELP);

    loop {
        print!("> ");
        stdout.flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("Failed to read input")? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };
        tracing::debug!("Interactive command: {:?}", command);

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Home => controller.select_tab(Tab::Home),
            Command::Settings => controller.select_tab(Tab::Settings),
            Command::UpdateSettings {
                latitude,
                longitude,
                skin_type,
            } => {
                controller.submit_settings(Settings::new(latitude, longitude, skin_type));
            }
            Command::City(name) => {
                let skin = controller.state().settings.skin_type.clone();
                controller.submit_place(&name, &skin);
            }
            Command::Refresh => controller.refresh(),
            Command::Hour(hour) => {
                if controller.select_hour(hour).is_none() {
                    println!("No UV reading for that position");
                }
            }
            Command::Click {
                x,
                y,
                width,
                height,
            } => {
                if controller.click(x, y, width, height).is_none() {
                    println!("No UV reading for that position");
                }
            }
            Command::Svg(path) => {
                crate::write_svg(controller, &path)?;
                continue;
            }
        }

        controller.wait_idle(wait);
        println!("{}", controller.render());
    }

    Ok(())
}
