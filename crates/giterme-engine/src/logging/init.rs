use std::io::Write;
use std::sync::Once;

use env_logger::fmt::Formatter;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "giterme_engine=debug,winit=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub switches: LevelSwitches,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            switches: LevelSwitches::default(),
        }
    }
}

/// Independent on/off switches for the two output streams.
///
/// Both default to on in debug builds and off in release builds.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LevelSwitches {
    /// Info, debug and trace records (stdout).
    pub info: bool,
    /// Warn and error records (stderr).
    pub error: bool,
}

impl LevelSwitches {
    pub const OFF: Self = Self {
        info: false,
        error: false,
    };

    pub const ON: Self = Self {
        info: true,
        error: true,
    };

    pub fn allows(self, level: Level) -> bool {
        match level {
            Level::Error | Level::Warn => self.error,
            Level::Info | Level::Debug | Level::Trace => self.info,
        }
    }
}

impl Default for LevelSwitches {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::ON
        } else {
            Self::OFF
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let logger = SplitLogger::build(config);
        let max_level = logger.max_level();

        if log::set_boxed_logger(Box::new(logger)).is_ok() {
            log::set_max_level(max_level);
        }

        log::debug!("logging initialized");
    });
}

/// Routes records to a stdout or stderr `env_logger` depending on level,
/// after checking the level switches.
struct SplitLogger {
    out: env_logger::Logger,
    err: env_logger::Logger,
    switches: LevelSwitches,
}

impl SplitLogger {
    fn build(config: LoggingConfig) -> Self {
        let filter = config
            .env_filter
            .or_else(|| std::env::var("RUST_LOG").ok());

        let stream = |target: env_logger::Target| {
            let mut builder = env_logger::Builder::new();

            if let Some(filter) = &filter {
                builder.parse_filters(filter);
            } else {
                builder.filter_level(LevelFilter::Info);
            }

            builder
                .write_style(config.write_style)
                .target(target)
                .format(format_record)
                .build()
        };

        Self {
            out: stream(env_logger::Target::Stdout),
            err: stream(env_logger::Target::Stderr),
            switches: config.switches,
        }
    }

    fn route(&self, level: Level) -> &env_logger::Logger {
        match level {
            Level::Error | Level::Warn => &self.err,
            Level::Info | Level::Debug | Level::Trace => &self.out,
        }
    }

    fn max_level(&self) -> LevelFilter {
        let out = if self.switches.info {
            self.out.filter()
        } else {
            LevelFilter::Off
        };
        let err = if self.switches.error {
            self.err.filter().min(LevelFilter::Warn)
        } else {
            LevelFilter::Off
        };
        out.max(err)
    }
}

impl Log for SplitLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        self.switches.allows(metadata.level()) && self.route(metadata.level()).enabled(metadata)
    }

    fn log(&self, record: &Record<'_>) {
        if self.switches.allows(record.level()) {
            self.route(record.level()).log(record);
        }
    }

    fn flush(&self) {
        self.out.flush();
        self.err.flush();
    }
}

/// `[ TAG ][ timestamp ][ file : module : line ] message`
fn format_record(buf: &mut Formatter, record: &Record<'_>) -> std::io::Result<()> {
    writeln!(
        buf,
        "[ {} ][ {} ][ {} : {} : {} ] {}",
        tag(record.level()),
        buf.timestamp_seconds(),
        record.file().map(file_name).unwrap_or("?"),
        record.module_path().unwrap_or("?"),
        record.line().unwrap_or(0),
        record.args(),
    )
}

fn tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Strips directories from a source path (either separator).
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(switches: LevelSwitches) -> LoggingConfig {
        LoggingConfig {
            env_filter: Some("trace".to_string()),
            write_style: env_logger::WriteStyle::Never,
            switches,
        }
    }

    fn meta(level: Level) -> Metadata<'static> {
        Metadata::builder().level(level).target("giterme_engine").build()
    }

    const ALL_LEVELS: [Level; 5] = [
        Level::Error,
        Level::Warn,
        Level::Info,
        Level::Debug,
        Level::Trace,
    ];

    #[test]
    fn switches_off_silence_every_level() {
        let logger = SplitLogger::build(config(LevelSwitches::OFF));
        for level in ALL_LEVELS {
            assert!(!logger.enabled(&meta(level)), "{level} should be silent");
        }
        assert_eq!(logger.max_level(), LevelFilter::Off);
    }

    #[test]
    fn switches_are_independent() {
        let errors_only = SplitLogger::build(config(LevelSwitches {
            info: false,
            error: true,
        }));
        assert!(errors_only.enabled(&meta(Level::Error)));
        assert!(errors_only.enabled(&meta(Level::Warn)));
        assert!(!errors_only.enabled(&meta(Level::Info)));
        assert_eq!(errors_only.max_level(), LevelFilter::Warn);

        let info_only = SplitLogger::build(config(LevelSwitches {
            info: true,
            error: false,
        }));
        assert!(!info_only.enabled(&meta(Level::Error)));
        assert!(info_only.enabled(&meta(Level::Info)));
        assert!(info_only.enabled(&meta(Level::Trace)));
        assert_eq!(info_only.max_level(), LevelFilter::Trace);
    }

    #[test]
    fn env_filter_still_applies_under_switches() {
        let mut cfg = config(LevelSwitches::ON);
        cfg.env_filter = Some("warn".to_string());
        let logger = SplitLogger::build(cfg);

        assert!(logger.enabled(&meta(Level::Error)));
        assert!(!logger.enabled(&meta(Level::Info)));
    }

    #[test]
    fn file_name_strips_both_separators() {
        assert_eq!(file_name("crates/giterme-engine/src/render/renderer.rs"), "renderer.rs");
        assert_eq!(file_name(r"C:\src\giterme\win_main.rs"), "win_main.rs");
        assert_eq!(file_name("main.rs"), "main.rs");
    }

    #[test]
    fn tags_match_levels() {
        assert_eq!(tag(Level::Error), "ERROR");
        assert_eq!(tag(Level::Info), "INFO");
    }
}
