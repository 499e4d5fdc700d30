//! Best-effort document export.
//!
//! Serializes the canonical shapes into fixed-size pages so an embedder
//! can hand them to a PDF or print backend. Pagination buckets shapes
//! by their top anchor; a shape spanning a page boundary stays on the
//! page its anchor falls in. Output is derived purely from the store,
//! so every replica exports the same document.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use crate::consts::{EXPORT_MAX_PAGES, EXPORT_PAGE_HEIGHT, EXPORT_PAGE_WIDTH};
use crate::shape::ShapeRecord;
use crate::store::ObjectStore;

// =============================================================================
// TYPES
// =============================================================================

/// One page of the exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPage {
    /// Canvas-space top edge of this page.
    pub origin_top: f64,
    /// Shapes anchored on this page, in reading order.
    pub records: Vec<ShapeRecord>,
}

/// Fixed-layout paginated snapshot of the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub page_width: f64,
    pub page_height: f64,
    /// At least one page, even for an empty canvas.
    pub pages: Vec<DocumentPage>,
}

impl ExportedDocument {
    /// Total shapes across all pages.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.pages.iter().map(|page| page.records.len()).sum()
    }
}

// =============================================================================
// EXPORT
// =============================================================================

/// Snapshot the store into a paginated document.
#[must_use]
pub fn export_document(store: &ObjectStore) -> ExportedDocument {
    let mut buckets: Vec<Vec<ShapeRecord>> = vec![Vec::new()];
    for record in store.records() {
        let index = page_index(record.top);
        while buckets.len() <= index {
            buckets.push(Vec::new());
        }
        buckets[index].push(record.clone());
    }

    let mut pages = Vec::with_capacity(buckets.len());
    let mut origin_top = 0.0;
    for mut bucket in buckets {
        bucket.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.left.total_cmp(&b.left)));
        pages.push(DocumentPage { origin_top, records: bucket });
        origin_top += EXPORT_PAGE_HEIGHT;
    }

    ExportedDocument {
        page_width: EXPORT_PAGE_WIDTH,
        page_height: EXPORT_PAGE_HEIGHT,
        pages,
    }
}

/// Page a top anchor falls on. Non-finite and negative anchors land on
/// the first page.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn page_index(top: f64) -> usize {
    if !top.is_finite() || top < EXPORT_PAGE_HEIGHT {
        return 0;
    }
    let index = (top / EXPORT_PAGE_HEIGHT).floor() as usize;
    index.min(EXPORT_MAX_PAGES - 1)
}
