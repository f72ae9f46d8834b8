use std::{
    io::{self, Write},
    process,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use runner::{config::RunnerConfig, run::run_walks};

fn main() {
    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        eprintln!("Interrupted, stopping after the current step.");
        handler_stop.store(true, Ordering::SeqCst);
    })
    .expect("error setting Ctrl-C handler");

    let config = match RunnerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}.", e);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = run_walks(&config, &stop, &mut out) {
        eprintln!("Error: Failed to write output.");
        eprintln!("Details: {}.", e);
        process::exit(1);
    }
    out.flush().ok();
}
