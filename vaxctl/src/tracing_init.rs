use std::fs::OpenOptions;
use std::path::PathBuf;

use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;

use crate::settings::VaxctlSettings;

/// Install the global subscriber.
///
/// Logs go to a file so the terminal UI never has its screen scribbled on:
/// `VAXCTL_LOG` if set, else `~/.vaxctl/vaxctl.log`. When the file cannot be
/// opened, INFO and above go to stderr instead.
pub fn init_tracing() {
    let log_path = std::env::var_os("VAXCTL_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            VaxctlSettings::settings_dir()
                .map(|dir| dir.join("vaxctl.log"))
                .unwrap_or_else(|_| PathBuf::from("vaxctl.log"))
        });

    let log_file = log_path
        .parent()
        .and_then(|parent| {
            if parent.as_os_str().is_empty() {
                Some(())
            } else {
                std::fs::create_dir_all(parent).ok()
            }
        })
        .and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .ok()
        });

    let layer: Box<dyn Layer<_> + Send + Sync> = match log_file {
        Some(file) => tracing_subscriber::fmt::layer()
            .with_writer(file)
            .pretty()
            .with_ansi(false)
            .with_filter(LevelFilter::from_level(Level::DEBUG))
            .boxed(),
        None => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_filter(LevelFilter::from_level(Level::INFO))
            .boxed(),
    };

    tracing_subscriber::registry().with(layer).init()
}
