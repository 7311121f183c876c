//! tabnav desktop driver.
//!
//! Runs a navigation controller over the simulated surface and reads
//! commands from stdin, one per line. Type `help` for the list.

mod shell;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use shell::{Outcome, Shell};
use tabnav_core::{LoadOptions, NavConfig, NavigationController, SimulatedSurface};

fn main() -> Result<()> {
    // Resolve config from CLI arg or TABNAV_CONFIG, else defaults.
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TABNAV_CONFIG").ok())
        .map(PathBuf::from);
    let config = match &config_path {
        Some(path) => NavConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NavConfig::default(),
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();
    log::info!(
        "Starting tabnav (app_root={})",
        config.app_root.display()
    );

    let home_url = config.home_url.clone();
    let nav = NavigationController::with_config(SimulatedSurface::new(), config);
    let mut shell = Shell::new(nav);
    if !home_url.is_empty() {
        shell.track(&home_url, |nav| Ok(nav.load_url(&home_url, LoadOptions::default())))?;
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for message in shell.settle() {
        writeln!(stdout, "{message}")?;
    }
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match shell.run(line.trim()) {
            Ok(Outcome::Quit) => break,
            Ok(Outcome::Lines(lines)) => {
                for l in lines {
                    writeln!(stdout, "{l}")?;
                }
            },
            Err(e) => writeln!(stdout, "error: {e:#}")?,
        }
        for message in shell.settle() {
            writeln!(stdout, "{message}")?;
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    log::info!("tabnav shut down");
    Ok(())
}
