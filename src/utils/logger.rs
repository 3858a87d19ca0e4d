use crate::series::SAMPLE_LOG_TARGET;
use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initialise the global logger.
///
/// `RUST_LOG` is honoured when no verbosity flag is given; otherwise the
/// flags win: `-q` maps to -1, each `-v` adds one level above `info`.
/// Live-mode sample lines stay visible under `-q`.
pub fn setup_logger(verbosity: i8) {
    builder(verbosity).init();
}

fn builder(verbosity: i8) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = level_for(verbosity) {
        builder.filter_level(level);
    }
    if verbosity < 0 {
        builder.filter_module(SAMPLE_LOG_TARGET, LevelFilter::Info);
    }
    builder.format_target(false);
    builder
}

fn level_for(verbosity: i8) -> Option<LevelFilter> {
    match verbosity {
        i8::MIN..=-1 => Some(LevelFilter::Error),
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log, Metadata};

    fn enabled(logger: &env_logger::Logger, target: &str, level: Level) -> bool {
        logger.enabled(&Metadata::builder().target(target).level(level).build())
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(-1), Some(LevelFilter::Error));
        assert_eq!(level_for(0), None);
        assert_eq!(level_for(1), Some(LevelFilter::Debug));
        assert_eq!(level_for(5), Some(LevelFilter::Trace));
    }

    #[test]
    fn test_quiet_keeps_sample_lines() {
        let logger = builder(-1).build();
        assert!(enabled(&logger, SAMPLE_LOG_TARGET, Level::Info));
        assert!(!enabled(&logger, "fd_watcher::watcher", Level::Info));
        assert!(!enabled(&logger, "fd_watcher::sampler", Level::Warn));
        assert!(enabled(&logger, "fd_watcher::watcher", Level::Error));
    }

    #[test]
    fn test_verbose_enables_debug() {
        let logger = builder(1).build();
        assert!(enabled(&logger, "fd_watcher::sampler", Level::Debug));
        assert!(!enabled(&logger, "fd_watcher::sampler", Level::Trace));
    }
}
