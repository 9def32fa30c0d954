//! Container entrypoint: create missing config files, then become the
//! command we were given (usually cron in the foreground).

use std::env;
use std::process;

use season_metrics::bootstrap;
use season_metrics::config::Paths;
use season_metrics::launcher;
use season_metrics::utils;

fn main() {
    utils::init_log(log::Level::Warn);

    let paths = Paths::from_env();
    if let Err(msg) = bootstrap::bootstrap(&paths) {
        eprintln!("[FATAL] {}", msg);
        process::exit(1);
    }

    let argv: Vec<String> = env::args().skip(1).collect();
    match launcher::launch(&argv) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("[FATAL] {}", e);
            process::exit(e.exit_code);
        }
    }
}
