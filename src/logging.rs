use anyhow::{Context, Result};
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;
use std::path::Path;

/// Installs the global logger
///
/// `verbose` is the number of `-v` flags. Without an `output` path logs go to stderr, `-` selects
/// stdout, anything else is a file which is appended to.
pub fn setup(verbose: u8, output: Option<&Path>) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let to_file = matches!(output, Some(path) if path != Path::new("-"));

    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::BrightBlack);

    let dispatch = fern::Dispatch::new()
        .format(move |out, message, record| {
            if to_file {
                out.finish(format_args!(
                    "[{}][{}] {}",
                    record.target(),
                    record.level(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "[{}][{}] {}",
                    record.target(),
                    colors.color(record.level()),
                    message
                ))
            }
        })
        .level(level)
        // Disable spamming noninformative traces
        .level_for("rustls", LevelFilter::Warn)
        .level_for("hyper", LevelFilter::Warn)
        .level_for("mio", LevelFilter::Error);

    let dispatch = match output {
        None => dispatch.chain(std::io::stderr()),
        Some(path) if path == Path::new("-") => dispatch.chain(std::io::stdout()),
        Some(path) => dispatch.chain(
            fern::log_file(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?,
        ),
    };

    dispatch.apply().context("Failed to setup logging utility")
}
