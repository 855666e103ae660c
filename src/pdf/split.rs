//! PDF splitting functionality using lopdf

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use lopdf::Document;
use crate::error::SplitError;

/// Ordered mapping from 1-based page number to the single-page PDF holding it
pub type PageMap = BTreeMap<u32, PathBuf>;

/// File name used for a split page, zero-padded so names sort in page order
pub fn page_file_name(page: u32) -> String {
    format!("page_{:04}.pdf", page)
}

/// Split a PDF into one single-page PDF per source page
///
/// Pages are written to `output_dir` as `page_0001.pdf`, `page_0002.pdf`, ...
/// and the returned map has exactly the keys `1..=n`. The output directory is
/// created if it does not exist. A document with no pages yields an empty map.
///
/// # Example
///
/// ```no_run
/// use quipt_collator::pdf::split_pdf;
/// use std::path::Path;
///
/// let pages = split_pdf(Path::new("incoming.pdf"), Path::new("scratch"))
///     .expect("Failed to split");
/// let pick_list = &pages[&2];
/// ```
pub fn split_pdf(source: &Path, output_dir: &Path) -> Result<PageMap, SplitError> {
    if !source.exists() {
        return Err(SplitError::FileNotFound(source.to_path_buf()));
    }

    std::fs::create_dir_all(output_dir).map_err(|source| SplitError::OutputDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let doc = Document::load(source).map_err(|e| SplitError::InvalidPdf {
        path: source.to_path_buf(),
        source: e,
    })?;

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut paths = PageMap::new();

    for &page in &page_numbers {
        let output_path = output_dir.join(page_file_name(page));

        let mut single = extract_page(&doc, page, &page_numbers);
        single.save(&output_path).map_err(|e| SplitError::WritePage {
            page,
            path: output_path.clone(),
            reason: e.to_string(),
        })?;

        paths.insert(page, output_path);
    }

    Ok(paths)
}

/// Copy of `doc` that keeps only `page`
fn extract_page(doc: &Document, page: u32, all_pages: &[u32]) -> Document {
    let mut single = doc.clone();

    let others: Vec<u32> = all_pages
        .iter()
        .copied()
        .filter(|&num| num != page)
        .collect();

    if !others.is_empty() {
        single.delete_pages(&others);
        // Content of the deleted pages is still in the object table
        single.prune_objects();
    }

    single.compress();
    single
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_file_names_sort_in_page_order() {
        let mut names: Vec<String> = [10, 2, 1, 100].iter().map(|&p| page_file_name(p)).collect();
        names.sort();
        assert_eq!(
            names,
            vec!["page_0001.pdf", "page_0002.pdf", "page_0010.pdf", "page_0100.pdf"]
        );
    }

    #[test]
    fn test_split_nonexistent_file() {
        let out = std::env::temp_dir().join("quipt-collator-split-missing");
        let result = split_pdf(Path::new("nonexistent.pdf"), &out);
        assert!(matches!(result.unwrap_err(), SplitError::FileNotFound(_)));
    }

    // Splitting real documents is covered in tests/integration.rs
}
