mod bits;
mod config;
mod constants;
mod error;
mod event_builder;
mod frame_writer;
mod geb_frame;
mod process;
mod scan_file;
mod vfat_frame;

use std::path::PathBuf;
use log::{error, info};

use crate::config::Config;

fn main() {
    //Setup logging
    simplelog::TermLogger::init(simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto)
    .unwrap();

    info!("Starting up rusted gem...\n");

    let config_path: PathBuf = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => PathBuf::from("config.yaml")
    };

    let config = match Config::read_config_file(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!("An error occurred reading the configuration: {} Shutting down.\n", e);
            return;
        }
    };

    match process::process_run(&config) {
        Ok(_) => info!("Re-write successfully completed.\n"),
        Err(e) => error!("Processor ran into an error: {} Shutting down.\n", e)
    }
}
