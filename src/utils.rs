use log;
use stderrlog::{self, ColorChoice, Timestamp};

pub fn init_log(level: log::Level) {
    // A second init (e.g. from tests) is harmless; keep the first logger.
    let _ = stderrlog::new()
	.color(ColorChoice::Auto)
	.timestamp(Timestamp::Second)
	.show_module_names(true)
	.verbosity(level)
	.init();
}

pub fn job_log_level(verbose: bool) -> log::Level {
    if verbose { log::Level::Debug } else { log::Level::Info }
}

/// Round to four decimals, the precision used in every published number.
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// `round4` for display. Whole numbers keep one decimal (`-1.0`, `0.0`).
pub fn fmt4(x: f64) -> String {
    format!("{:?}", round4(x))
}
