//! Print job submission

use std::path::Path;
use std::process::Command;
use log::info;
use crate::collate::Tray;
use crate::config::PrinterConfig;
use crate::error::PrintSubmissionError;

/// Destination for routed pages
pub trait PrintSink: Send + Sync {
    /// Submit `path` as a print job fed from `tray`
    fn submit(&self, path: &Path, tray: Tray) -> Result<(), PrintSubmissionError>;
}

fn log_submitted(printer: &PrinterConfig, path: &Path, tray: Tray) {
    info!(
        "Sending print job to {}/{} done: {}",
        tray,
        printer.slot(tray),
        path.display()
    );
}

/// Submits jobs through `lpr -P <printer> -o <option>=<slot> <file>`
#[derive(Debug, Clone)]
pub struct LprPrintSink {
    printer: PrinterConfig,
}

impl LprPrintSink {
    pub fn new(printer: PrinterConfig) -> Self {
        Self { printer }
    }

    /// Command line that would be run for a job
    pub fn command(&self, path: &Path, tray: Tray) -> Command {
        let mut cmd = Command::new(&self.printer.command);
        cmd.arg("-P")
            .arg(&self.printer.name)
            .arg("-o")
            .arg(format!("{}={}", self.printer.tray_option, self.printer.slot(tray)))
            .arg(path);
        cmd
    }
}

impl PrintSink for LprPrintSink {
    fn submit(&self, path: &Path, tray: Tray) -> Result<(), PrintSubmissionError> {
        let status = self
            .command(path, tray)
            .status()
            .map_err(|source| PrintSubmissionError::Spawn {
                command: self.printer.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(PrintSubmissionError::ExitStatus {
                command: self.printer.command.clone(),
                path: path.to_path_buf(),
                status,
            });
        }

        log_submitted(&self.printer, path, tray);
        Ok(())
    }
}

/// Dry-run sink that only logs what would be printed
#[derive(Debug, Clone, Default)]
pub struct StubPrintSink {
    printer: PrinterConfig,
}

impl StubPrintSink {
    pub fn new(printer: PrinterConfig) -> Self {
        Self { printer }
    }
}

impl PrintSink for StubPrintSink {
    fn submit(&self, path: &Path, tray: Tray) -> Result<(), PrintSubmissionError> {
        log_submitted(&self.printer, path, tray);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printer_with(command: &str) -> PrinterConfig {
        PrinterConfig {
            command: command.to_string(),
            ..PrinterConfig::default()
        }
    }

    #[test]
    fn test_lpr_command_line() {
        let sink = LprPrintSink::new(PrinterConfig::default());
        let cmd = sink.command(Path::new("scratch/page_0002.pdf"), Tray::LaserLabels);

        assert_eq!(cmd.get_program(), "lpr");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-P",
                "Ecomm_Fulfillment___Inventory_Cage",
                "-o",
                "BRInputSlot=Tray2",
                "scratch/page_0002.pdf",
            ]
        );
    }

    #[test]
    fn test_stub_always_succeeds() {
        let sink = StubPrintSink::new(PrinterConfig::default());
        assert!(sink.submit(Path::new("page_0001.pdf"), Tray::PlainPaper).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_lpr_success_exit() {
        let sink = LprPrintSink::new(printer_with("true"));
        assert!(sink.submit(Path::new("page_0001.pdf"), Tray::PlainPaper).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_lpr_nonzero_exit() {
        let sink = LprPrintSink::new(printer_with("false"));
        let result = sink.submit(Path::new("page_0001.pdf"), Tray::PlainPaper);
        assert!(matches!(result, Err(PrintSubmissionError::ExitStatus { .. })));
    }

    #[test]
    fn test_lpr_missing_command() {
        let sink = LprPrintSink::new(printer_with("quipt-collator-no-such-command"));
        let result = sink.submit(Path::new("page_0001.pdf"), Tray::PlainPaper);
        assert!(matches!(result, Err(PrintSubmissionError::Spawn { .. })));
    }
}
