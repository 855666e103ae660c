//! Timestamped status logging
//!
//! Lines look like `20.Nov 2024, 09:05:03: Ready to receive new quipt pdf's...`
//! and go to stdout or, when configured, are appended to a log file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use chrono::{Local, NaiveDateTime};
use env_logger::{Builder, Env, Target};
use log::Level;
use crate::error::Result;

/// `day.Mon year, HH:MM:SS`
pub const TIMESTAMP_FORMAT: &str = "%d.%b %Y, %H:%M:%S";

/// Format a local time the way status lines are stamped
pub fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time as a status line stamp
pub fn timestamp() -> String {
    format_timestamp(&Local::now().naive_local())
}

/// Install the global logger
///
/// The level defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init(log_file: Option<&Path>) -> Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));

    builder.format(|buf, record| match record.level() {
        Level::Info => writeln!(buf, "{}: {}", timestamp(), record.args()),
        level => writeln!(buf, "{}: {}: {}", timestamp(), level, record.args()),
    });

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.target(Target::Stdout);
        }
    }

    builder.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_timestamp() {
        let time = NaiveDate::from_ymd_opt(2024, 11, 20)
            .unwrap()
            .and_hms_opt(9, 5, 3)
            .unwrap();
        assert_eq!(format_timestamp(&time), "20.Nov 2024, 09:05:03");

        let time = NaiveDate::from_ymd_opt(2026, 1, 7)
            .unwrap()
            .and_hms_opt(23, 59, 0)
            .unwrap();
        assert_eq!(format_timestamp(&time), "07.Jan 2026, 23:59:00");
    }
}
