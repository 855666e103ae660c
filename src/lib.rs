//! Quipt Collator Library
//!
//! Watches the folder a virtual printer saves PDFs into and turns each
//! arriving batch of orders into collated print jobs. This library provides
//! functionality to:
//! - Split a PDF into single-page PDFs
//! - Route packing-slip/pick-list page pairs to the plain paper and label trays
//! - Submit print jobs through `lpr`, or log them in dry-run mode
//! - Watch a directory and process arrivals one at a time
//!
//! # Example
//!
//! ```no_run
//! use quipt_collator::config::Config;
//! use quipt_collator::ingest::IngestHandler;
//! use std::path::Path;
//!
//! let config = Config::default();
//! let handler = IngestHandler::new(&config);
//! let report = handler.handle(Path::new("quipt_virtual_printer_target/orders.pdf"));
//! println!("{:?}", report.outcome);
//! ```

pub mod alert;
pub mod collate;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod pdf;
pub mod print;
pub mod scratch;
pub mod watch;

// Re-export commonly used items
pub use collate::{collate, RoutingDecision, Tray};
pub use config::Config;
pub use error::{Error, Result};
