use std::env;

const LIBS_DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;
const LIBS_LOG_LEVEL_VAR: &str = "CR_LIBS_LOG_LEVEL";
const CRATE_TARGET: &str = "cortex_resampler";

/// Initializes logger for current environment.
///
/// In case of any error, basic logger, that does nothing, is returned. Errors
/// can possibly happen in case of file permission errors in release build.
///
/// Fails if a logger was already set up.
pub fn init() -> Result<(), log::SetLoggerError> {
    let base_logger = fern::Dispatch::new();
    let env_specific_logger = init_env_specific(base_logger);

    env_specific_logger.apply()
}

/// Log level for dependencies, as named by `CR_LIBS_LOG_LEVEL`.
fn parse_log_level(libs_log_level: &str) -> log::LevelFilter {
    match libs_log_level {
        "error" => log::LevelFilter::Error,
        "warning" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        "off" => log::LevelFilter::Off,
        _ => LIBS_DEFAULT_LOG_LEVEL,
    }
}

#[cfg(debug_assertions)]
fn init_env_specific(base_logger: fern::Dispatch) -> fern::Dispatch {
    use fern::colors::{Color, ColoredLevelConfig};

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Cyan)
        .debug(Color::BrightWhite)
        .trace(Color::White);
    let base_logger = base_logger.format(move |out, message, record| {
        out.finish(format_args!(
            "{} [{}] [{}] {}",
            chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
            record.target(),
            colors.color(record.level()),
            message
        ))
    });
    let libs_log_level = env::var(LIBS_LOG_LEVEL_VAR)
        .map(|libs_log_level| parse_log_level(&libs_log_level))
        .unwrap_or(LIBS_DEFAULT_LOG_LEVEL);

    base_logger
        .level(libs_log_level)
        .level_for(CRATE_TARGET, log::LevelFilter::Debug)
        .chain(std::io::stdout())
}

#[cfg(not(debug_assertions))]
fn init_env_specific(base_logger: fern::Dispatch) -> fern::Dispatch {
    use std::fs;

    let path = match dirs::data_local_dir() {
        Some(data_local_dir) => data_local_dir.join("cortex_resampler").join("logs"),
        None => return base_logger,
    };

    if !path.exists() {
        let result = fs::create_dir_all(&path);

        if result.is_err() {
            return base_logger;
        }
    }

    let today_format = chrono::Local::today().format("%Y-%m-%d");
    let file_name = path.join(format!("{}.log", today_format));
    let file = match fern::log_file(file_name) {
        Ok(file) => file,
        Err(_) => return base_logger,
    };

    let libs_log_level = env::var(LIBS_LOG_LEVEL_VAR)
        .map(|libs_log_level| parse_log_level(&libs_log_level))
        .unwrap_or(LIBS_DEFAULT_LOG_LEVEL);

    base_logger
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} [{}] [{}] {}",
                chrono::Local::now().format("[%Y-%m-%d %H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(libs_log_level)
        .level_for(CRATE_TARGET, log::LevelFilter::Info)
        .chain(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level_known_names() {
        assert_eq!(parse_log_level("error"), log::LevelFilter::Error);
        assert_eq!(parse_log_level("warning"), log::LevelFilter::Warn);
        assert_eq!(parse_log_level("trace"), log::LevelFilter::Trace);
        assert_eq!(parse_log_level("off"), log::LevelFilter::Off);
    }

    #[test]
    fn test_parse_log_level_falls_back_to_default() {
        assert_eq!(parse_log_level("warn"), LIBS_DEFAULT_LOG_LEVEL);
        assert_eq!(parse_log_level(""), LIBS_DEFAULT_LOG_LEVEL);
    }
}
