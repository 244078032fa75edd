use chrono::Local;
use csv::Writer;
use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};
use std::fs::File;
use std::io;

/// Maps the level names used in task documents to a filter; `None` for an unknown name.
pub fn parse_level(name: &str) -> Option<LevelFilter> {
    match name.to_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// `log_<date>_<time>.txt` in the current directory.
pub fn log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Terminal logger plus an optional file logger.
/// Returns false if a global logger was already installed; the old one stays active.
pub fn init_logger(level: LevelFilter, file: Option<&str>) -> bool {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(filename) = file {
        match File::create(filename) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file {}: {}", filename, e),
        }
    }

    CombinedLogger::init(loggers).is_ok()
}

/// Writes a header row followed by one row per sample.
pub fn save_samples_to_csv(
    filename: &str,
    headers: &[String],
    rows: &[Vec<f64>],
) -> Result<(), csv::Error> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row.iter().map(|val| val.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_task_file(filename: &str) -> io::Result<String> {
    std::fs::read_to_string(filename)
}
