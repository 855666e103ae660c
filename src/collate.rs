//! Pack/pick collation across the two printer trays
//!
//! Each order arrives as a page pair: the odd page is the packing slip, the
//! even page is the pick list. The pick list goes once to the label tray and
//! once more to the plain paper tray next to its packing slip.

use std::fmt;
use std::path::PathBuf;

/// Physical media a page is printed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tray {
    /// "PP", plain paper: packing slips and the duplicate pick list
    PlainPaper,
    /// "LL", laser labels: the primary pick list
    LaserLabels,
}

impl Tray {
    /// Short operator-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Tray::PlainPaper => "PP",
            Tray::LaserLabels => "LL",
        }
    }
}

impl fmt::Display for Tray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A page bound for a tray
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision<P = PathBuf> {
    pub tray: Tray,
    pub page: P,
}

impl<P> RoutingDecision<P> {
    fn new(tray: Tray, page: P) -> Self {
        Self { tray, page }
    }
}

/// Route pages `[p1, p2, ..., p2n]` to trays
///
/// For every pair `(p2k-1, p2k)` this yields, in order:
/// `(LL, p2k)`, `(PP, p2k-1)`, `(PP, p2k)`.
///
/// An odd number of pages is a malformed batch and yields nothing.
pub fn collate<P: Clone>(pages: &[P]) -> Vec<RoutingDecision<P>> {
    if pages.len() % 2 != 0 {
        return Vec::new();
    }

    pages
        .chunks_exact(2)
        .flat_map(|pair| {
            let (packing_slip, pick_list) = (&pair[0], &pair[1]);
            [
                RoutingDecision::new(Tray::LaserLabels, pick_list.clone()),
                RoutingDecision::new(Tray::PlainPaper, packing_slip.clone()),
                RoutingDecision::new(Tray::PlainPaper, pick_list.clone()),
            ]
        })
        .collect()
}
