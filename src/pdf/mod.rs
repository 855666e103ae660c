//! PDF manipulation module

pub mod split;

// Re-export commonly used items
pub use split::{page_file_name, split_pdf, PageMap};
