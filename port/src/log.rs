//! The kernel logger backend.
//!
//! The port has no console of its own; the board code hands a text sink over
//! and the logger serializes every record into it.

pub mod flags;

use core::fmt::{self, Formatter, Write};

use spin::Mutex;

struct OptionU32Display(Option<u32>);

impl fmt::Display for OptionU32Display {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(val) = self.0 {
            write!(f, "{}", val)
        } else {
            write!(f, "<NULL>")
        }
    }
}

pub struct Logger<W> {
    output: Mutex<W>,
    level: log::Level,
}

impl<W> Logger<W> {
    pub const fn new(output: W, level: log::Level) -> Logger<W> {
        Logger {
            output: Mutex::new(output),
            level,
        }
    }

    #[inline]
    pub fn level(&self) -> log::Level {
        self.level
    }

    /// Take the sink back.
    pub fn into_inner(self) -> W {
        self.output.into_inner()
    }
}

impl<W: Write + Send> log::Log for Logger<W> {
    #[inline]
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut os = self.output.lock();

        // A broken sink has nowhere to report to.
        let _ = if record.level() < log::Level::Debug {
            writeln!(os, "{}: {}", record.level(), record.args())
        } else {
            let file = record.file().unwrap_or("<NULL>");
            let line = OptionU32Display(record.line());
            writeln!(
                os,
                "{}: [{}:{}] {}",
                record.level(),
                file,
                line,
                record.args()
            )
        };
    }

    #[inline]
    fn flush(&self) {}
}

/// Install `logger` as the global logger.
///
/// Should be called once, before anything else is started up. Fails if a
/// logger is already installed.
pub fn init<W: Write + Send>(logger: &'static Logger<W>) -> Result<(), log::SetLoggerError> {
    log::set_logger(logger)?;
    log::set_max_level(logger.level.to_level_filter());
    Ok(())
}

#[cfg(test)]
mod tests {
    use ::log::{Level, Log, Record};

    use super::*;

    #[test]
    fn format_and_filter() {
        let logger = Logger::new(String::new(), Level::Debug);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("vectors installed"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .file(Some("ctx.rs"))
                .line(Some(42))
                .args(format_args!("frame built"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Debug)
                .args(format_args!("no location"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Trace)
                .args(format_args!("dropped"))
                .build(),
        );

        assert_eq!(
            logger.into_inner(),
            "INFO: vectors installed\n\
             DEBUG: [ctx.rs:42] frame built\n\
             DEBUG: [<NULL>:<NULL>] no location\n"
        );
    }

    #[test]
    fn global_install() {
        static LOGGER: Logger<String> = Logger::new(String::new(), Level::Info);
        assert!(init(&LOGGER).is_ok());
        assert!(init(&LOGGER).is_err());
        ::log::info!("hello");
        ::log::debug!("filtered");
        assert!(LOGGER.output.lock().contains("INFO: hello\n"));
        assert!(!LOGGER.output.lock().contains("filtered"));
    }
}
