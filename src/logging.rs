//! `log` facade setup.
//!
//! In the browser, records go to the devtools console through
//! `gloo::console`. Natively no logger is installed and the macros are no-ops.

use log::LevelFilter;

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};

    pub struct ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = format!("[flashdeck] {}: {}", record.target(), record.args());
            match record.level() {
                Level::Error => gloo::console::error!(line),
                Level::Warn => gloo::console::warn!(line),
                Level::Info => gloo::console::info!(line),
                Level::Debug | Level::Trace => gloo::console::debug!(line),
            }
        }

        fn flush(&self) {}
    }

    pub static LOGGER: ConsoleLogger = ConsoleLogger;
}

/// Install the console logger (once) and set the level.
pub fn init(level: LevelFilter) {
    #[cfg(target_arch = "wasm32")]
    {
        if log::set_logger(&console::LOGGER).is_err() {
            log::debug!("logger already installed");
        }
    }
    log::set_max_level(level);
}
