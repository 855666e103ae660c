//! Runtime configuration
//!
//! Everything the watcher and handler need is carried in [`Config`], built
//! once at startup and passed in explicitly.

use std::path::PathBuf;
use std::time::Duration;
use crate::collate::Tray;
use crate::error::{Error, Result};
use crate::print::{LprPrintSink, PrintSink, StubPrintSink};

/// Whether jobs go to the physical printer or only to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    Physical,
    Stub,
}

/// How long to wait for the virtual printer to finish writing a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Fixed delay after the create event
    pub delay: Duration,
    /// Consecutive unchanged size readings required after the delay (0 = none)
    pub stable_checks: u32,
    /// Interval between size readings
    pub poll_interval: Duration,
    /// Upper bound on the whole wait
    pub max_wait: Duration,
}

impl WaitPolicy {
    /// Plain fixed delay with no polling
    pub fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            stable_checks: 0,
            ..Self::default()
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(1),
            stable_checks: 0,
            poll_interval: Duration::from_millis(250),
            max_wait: Duration::from_secs(30),
        }
    }
}

/// Print command and tray slot naming
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterConfig {
    /// Program used to submit jobs
    pub command: String,
    /// Queue name as listed by `lpstat -a`
    pub name: String,
    /// Driver option selecting the input slot
    pub tray_option: String,
    /// Slot holding plain paper
    pub pp_slot: String,
    /// Slot holding laser labels
    pub ll_slot: String,
}

impl PrinterConfig {
    /// Slot identifier for a tray
    pub fn slot(&self, tray: Tray) -> &str {
        match tray {
            Tray::PlainPaper => &self.pp_slot,
            Tray::LaserLabels => &self.ll_slot,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            command: "lpr".to_string(),
            name: "Ecomm_Fulfillment___Inventory_Cage".to_string(),
            tray_option: "BRInputSlot".to_string(),
            pp_slot: "Tray1".to_string(),
            ll_slot: "Tray2".to_string(),
        }
    }
}

/// Complete collator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder the virtual printer saves PDFs into
    pub watch_dir: PathBuf,
    /// Folder receiving split pages, purged on every arrival
    pub scratch_dir: PathBuf,
    pub print_mode: PrintMode,
    /// Append log lines here instead of stdout
    pub log_file: Option<PathBuf>,
    pub wait: WaitPolicy,
    pub printer: PrinterConfig,
    /// Raise desktop alerts for startup and fatal conditions
    pub alerts: bool,
    /// Dismiss the viewer window the virtual printer opens
    pub close_viewer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("./quipt_virtual_printer_target"),
            scratch_dir: PathBuf::from("./split_quipt_pdf_target"),
            print_mode: PrintMode::Stub,
            log_file: None,
            wait: WaitPolicy::default(),
            printer: PrinterConfig::default(),
            alerts: true,
            close_viewer: false,
        }
    }
}

impl Config {
    /// Check the configuration for values that would misroute or lose jobs
    pub fn validate(&self) -> Result<()> {
        if self.printer.pp_slot.trim().is_empty() || self.printer.ll_slot.trim().is_empty() {
            return Err(Error::Config("tray slot identifiers must not be empty".to_string()));
        }

        if self.print_mode == PrintMode::Physical {
            if self.printer.name.trim().is_empty() {
                return Err(Error::Config("printer name must not be empty".to_string()));
            }
            if self.printer.command.trim().is_empty() {
                return Err(Error::Config("print command must not be empty".to_string()));
            }
        }

        // The scratch purge would delete incoming PDFs
        if self.watch_dir == self.scratch_dir {
            return Err(Error::Config(format!(
                "watched directory and scratch directory are the same: {}",
                self.watch_dir.display()
            )));
        }

        Ok(())
    }

    /// Print sink matching `print_mode`
    pub fn print_sink(&self) -> Box<dyn PrintSink> {
        match self.print_mode {
            PrintMode::Physical => Box::new(LprPrintSink::new(self.printer.clone())),
            PrintMode::Stub => Box::new(StubPrintSink::new(self.printer.clone())),
        }
    }
}
