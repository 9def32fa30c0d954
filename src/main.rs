use std::process;

use season_metrics;
use season_metrics::config::Config;
use season_metrics::utils;

fn main() {
    let result = Config::get().and_then(|cfg| {
        utils::init_log(utils::job_log_level(cfg.verbose));
        season_metrics::run(cfg)
    });
    if let Err(msg) = result {
        if msg == season_metrics::lock::ALREADY_RUNNING {
            println!("{}", msg);
        } else {
            eprintln!("[FATAL] {}", msg);
        }
        process::exit(1);
    }
}
