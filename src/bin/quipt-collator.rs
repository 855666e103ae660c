//! Quipt Collator CLI tool
//!
//! Runs in the background, watching the virtual printer's output folder and
//! sending every received PDF to the physical printer as collated page pairs.

use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use quipt_collator::alert::{DesktopNotifier, LogNotifier, Notifier};
use quipt_collator::config::{Config, PrintMode, PrinterConfig, WaitPolicy};
use quipt_collator::ingest::IngestHandler;
use quipt_collator::logging;
use quipt_collator::watch::{prepare_watch_dir, ArrivalWatcher};

/// Quipt Collator - Split virtual-printer PDFs and print collated page pairs
#[derive(Parser)]
#[command(name = "quipt-collator")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Dry run: log the jobs that would be printed
    quipt-collator --watch-dir ./quipt_virtual_printer_target

    # Print for real, logging to a file
    quipt-collator --physical --log-to-file --log-file ./quipt.log

    # Wait until the virtual printer has stopped writing
    quipt-collator --stable-checks 3 --poll-ms 200")]
struct Cli {
    /// Folder the virtual printer saves PDFs into
    #[arg(long, default_value = "./quipt_virtual_printer_target")]
    watch_dir: PathBuf,

    /// Folder receiving split pages (purged on every arrival)
    #[arg(long, default_value = "./split_quipt_pdf_target")]
    scratch_dir: PathBuf,

    /// Send jobs to the physical printer instead of only logging them
    #[arg(long)]
    physical: bool,

    /// Append log lines to --log-file instead of stdout
    #[arg(long)]
    log_to_file: bool,

    /// Log file used with --log-to-file
    #[arg(long, default_value = "./quipt-collator.log")]
    log_file: PathBuf,

    /// Delay after a file appears before processing it, in milliseconds
    #[arg(long, default_value_t = 1000)]
    wait_ms: u64,

    /// Consecutive unchanged file size readings required after the delay
    #[arg(long, default_value_t = 0)]
    stable_checks: u32,

    /// Interval between file size readings, in milliseconds
    #[arg(long, default_value_t = 250)]
    poll_ms: u64,

    /// Give up waiting for a stable file size after this many seconds
    #[arg(long, default_value_t = 30)]
    max_wait_secs: u64,

    /// Printer queue name (see `lpstat -a`)
    #[arg(long, default_value = "Ecomm_Fulfillment___Inventory_Cage")]
    printer: String,

    /// Driver option selecting the input slot
    #[arg(long, default_value = "BRInputSlot")]
    tray_option: String,

    /// Input slot holding plain paper (packing slips)
    #[arg(long, default_value = "Tray1")]
    pp_tray: String,

    /// Input slot holding laser labels (pick lists)
    #[arg(long, default_value = "Tray2")]
    ll_tray: String,

    /// Program used to submit print jobs
    #[arg(long, default_value = "lpr")]
    print_command: String,

    /// Only log alerts instead of showing desktop dialogs
    #[arg(long)]
    no_alerts: bool,

    /// Dismiss the Preview window the virtual printer opens (macOS)
    #[arg(long)]
    close_viewer: bool,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            watch_dir: self.watch_dir,
            scratch_dir: self.scratch_dir,
            print_mode: if self.physical { PrintMode::Physical } else { PrintMode::Stub },
            log_file: self.log_to_file.then_some(self.log_file),
            wait: WaitPolicy {
                delay: Duration::from_millis(self.wait_ms),
                stable_checks: self.stable_checks,
                poll_interval: Duration::from_millis(self.poll_ms),
                max_wait: Duration::from_secs(self.max_wait_secs),
            },
            printer: PrinterConfig {
                command: self.print_command,
                name: self.printer,
                tray_option: self.tray_option,
                pp_slot: self.pp_tray,
                ll_slot: self.ll_tray,
            },
            alerts: !self.no_alerts,
            close_viewer: self.close_viewer,
        }
    }
}

#[tokio::main]
async fn main() {
    let config = Cli::parse().into_config();

    if let Err(e) = logging::init(config.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let notifier: Box<dyn Notifier> = if config.alerts {
        Box::new(DesktopNotifier)
    } else {
        Box::new(LogNotifier)
    };

    if let Err(e) = run(config, notifier.as_ref()).await {
        error!("{:#}", e);
        notifier.notify(&format!("quipt-collator stopped: {:#}", e), true);
        process::exit(1);
    }
}

async fn run(config: Config, notifier: &dyn Notifier) -> Result<()> {
    config.validate()?;

    info!("quipt-collator started");
    notifier.notify("quipt-collator started", false);

    let created = prepare_watch_dir(&config.watch_dir)
        .with_context(|| format!("Failed to prepare {}", config.watch_dir.display()))?;
    if created {
        notifier.notify(
            &format!(
                "Set the folder where the Virtual Printer is saving the PDFs to: '{}'",
                config.watch_dir.display()
            ),
            true,
        );
    }

    let watcher = ArrivalWatcher::subscribe(&config.watch_dir)
        .with_context(|| format!("Failed to watch {}", config.watch_dir.display()))?;

    let handler = Arc::new(IngestHandler::new(&config));

    watcher
        .run_until(handler, notifier, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Cannot listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
