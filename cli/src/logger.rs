use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Installs a stderr logger. `verbosity` counts `-v` flags: none shows
/// warnings and errors, each one more unlocks the next level.
pub fn init(verbosity: u8) -> Result<(), SetLoggerError> {
    let color = atty::is(atty::Stream::Stderr);
    log::set_boxed_logger(Box::new(StderrLogger { color }))?;
    log::set_max_level(level_filter(verbosity));
    Ok(())
}

fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

struct StderrLogger {
    color: bool,
}

impl StderrLogger {
    fn label(&self, level: Level) -> String {
        let (name, code) = match level {
            Level::Error => ("error", 31),
            Level::Warn => ("warn", 33),
            Level::Info => ("info", 32),
            Level::Debug => ("debug", 36),
            Level::Trace => ("trace", 37),
        };
        if self.color {
            format!("\x1b[1m\x1b[{code}m{name}\x1b[0m")
        } else {
            name.to_string()
        }
    }
}

impl Log for StderrLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        eprintln!("{}: {}", self.label(record.level()), record.args());
    }

    fn flush(&self) {}
}
