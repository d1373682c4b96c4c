//! Backreference synchronization.
//!
//! One [`Synchronizer`] lives for a whole host session. It owns the
//! per-document index cache and the set of documents with a pass in flight.
//! Both use interior mutability so a host callback running between batches
//! may call back into the synchronizer; such a reentrant call for a document
//! that is already being processed is dropped.

use super::element::{target_label, BackrefContent, BackrefElement};
use crate::config::Config;
use crate::footnote::FootnoteIndex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Counters for one synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Elements whose content was replaced.
    pub rewritten: usize,
    /// Elements skipped because they were already rewritten.
    pub already_processed: usize,
    /// Elements with no target or no matching footnote.
    pub unmatched: usize,
    /// Elements the host failed to update.
    pub failed: usize,
    /// Number of batches the elements were processed in.
    pub batches: usize,
}

/// Result of a call to [`Synchronizer::synchronize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// A pass for this document was already running; nothing was done.
    Busy,
    /// The pass ran to completion.
    Completed(SyncReport),
}

impl SyncOutcome {
    /// Returns the report of a completed pass.
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            SyncOutcome::Busy => None,
            SyncOutcome::Completed(report) => Some(report),
        }
    }
}

/// Releases a document from the in-flight set when dropped.
struct InFlight<'a> {
    set: &'a RefCell<HashSet<String>>,
    doc_id: String,
}

impl<'a> InFlight<'a> {
    fn acquire(set: &'a RefCell<HashSet<String>>, doc_id: &str) -> Option<Self> {
        if !set.borrow_mut().insert(doc_id.to_string()) {
            return None;
        }
        Some(Self {
            set,
            doc_id: doc_id.to_string(),
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.borrow_mut().remove(&self.doc_id);
    }
}

/// Session-wide cache and reentrancy guard for backreference rewriting.
#[derive(Debug, Default)]
pub struct Synchronizer {
    cache: RefCell<HashMap<String, Rc<FootnoteIndex>>>,
    in_flight: RefCell<HashSet<String>>,
}

impl Synchronizer {
    /// Creates an empty synchronizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites the backreference `elements` of one document.
    ///
    /// Same as [`Synchronizer::synchronize_with`] with a no-op yield.
    pub fn synchronize<E: BackrefElement>(
        &self,
        doc_id: &str,
        text: &str,
        elements: &mut [E],
        config: &Config,
    ) -> SyncOutcome {
        self.synchronize_with(doc_id, text, elements, config, || {})
    }

    /// Rewrites the backreference `elements` of one document, calling
    /// `yield_now` between batches.
    ///
    /// The index comes from the cache when present, so a document whose
    /// text changed keeps its old index until [`Synchronizer::invalidate`]
    /// is called. Elements without a matching footnote and elements that
    /// were already rewritten are left alone.
    ///
    /// # Example
    ///
    /// ```
    /// use footquill::config::Config;
    /// use footquill::sync::{RenderedBackref, SyncOutcome, Synchronizer};
    ///
    /// let sync = Synchronizer::new();
    /// let mut elements = vec![RenderedBackref::for_label("1"), RenderedBackref::for_label("video")];
    /// let text = "A[^1] B[^video]\n\n[^1]: one\n[^video]: clip";
    ///
    /// let outcome = sync.synchronize("note.md", text, &mut elements, &Config::default());
    /// assert_eq!(outcome.report().unwrap().rewritten, 2);
    /// assert_eq!(elements[0].text(), "[1]");
    /// assert_eq!(elements[1].text(), "[video]");
    ///
    /// let again = sync.synchronize("note.md", text, &mut elements, &Config::default());
    /// assert_eq!(again.report().unwrap().already_processed, 2);
    /// ```
    pub fn synchronize_with<E, Y>(
        &self,
        doc_id: &str,
        text: &str,
        elements: &mut [E],
        config: &Config,
        mut yield_now: Y,
    ) -> SyncOutcome
    where
        E: BackrefElement,
        Y: FnMut(),
    {
        let Some(_guard) = InFlight::acquire(&self.in_flight, doc_id) else {
            tracing::debug!(doc = doc_id, "synchronization already in flight, dropping request");
            return SyncOutcome::Busy;
        };

        let index = self.index_for(doc_id, text);
        let limit = config.index_limit();
        let batch_size = if config.should_batch(elements.len()) {
            config.batch_size.max(1)
        } else {
            elements.len().max(1)
        };

        let mut report = SyncReport::default();
        for (i, batch) in elements.chunks_mut(batch_size).enumerate() {
            if i > 0 {
                yield_now();
            }
            for element in batch.iter_mut() {
                rewrite(element, &index, limit, config, &mut report);
            }
            report.batches += 1;
        }

        tracing::debug!(
            doc = doc_id,
            labels = index.len(),
            rewritten = report.rewritten,
            skipped = report.already_processed,
            unmatched = report.unmatched,
            failed = report.failed,
            batches = report.batches,
            "synchronized backreferences"
        );
        SyncOutcome::Completed(report)
    }

    /// Returns the cached index for a document, building it on first use.
    fn index_for(&self, doc_id: &str, text: &str) -> Rc<FootnoteIndex> {
        if let Some(index) = self.cache.borrow().get(doc_id) {
            return Rc::clone(index);
        }
        let index = Rc::new(FootnoteIndex::build(text));
        self.cache
            .borrow_mut()
            .insert(doc_id.to_string(), Rc::clone(&index));
        index
    }

    /// Returns the cached index for a document.
    pub fn cached(&self, doc_id: &str) -> Option<Rc<FootnoteIndex>> {
        self.cache.borrow().get(doc_id).cloned()
    }

    /// Returns true if a pass for the document is running.
    pub fn is_in_flight(&self, doc_id: &str) -> bool {
        self.in_flight.borrow().contains(doc_id)
    }

    /// Drops the cached index for a document so the next pass rebuilds it.
    pub fn invalidate(&self, doc_id: &str) -> bool {
        self.cache.borrow_mut().remove(doc_id).is_some()
    }

    /// Drops every cached index.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Number of cached documents.
    pub fn cached_documents(&self) -> usize {
        self.cache.borrow().len()
    }
}

fn rewrite<E: BackrefElement>(
    element: &mut E,
    index: &FootnoteIndex,
    limit: Option<usize>,
    config: &Config,
    report: &mut SyncReport,
) {
    let entry = match element.navigation_target().and_then(target_label) {
        Some(label) => index.get_within(label, limit),
        None => None,
    };
    let Some(entry) = entry else {
        report.unmatched += 1;
        return;
    };
    if element.is_processed() {
        report.already_processed += 1;
        return;
    }

    match element.set_visible_content(BackrefContent::for_entry(entry, config)) {
        Ok(()) => {
            element.mark_processed();
            report.rewritten += 1;
        }
        Err(e) => {
            tracing::warn!(label = %entry.label, error = %e, "failed to rewrite backreference");
            report.failed += 1;
        }
    }
}
