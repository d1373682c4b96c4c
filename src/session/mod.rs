//! Host session glue.
//!
//! A [`Session`] is created once when the host starts and dropped (after
//! [`Session::shutdown`]) when it stops. It owns the configuration, the
//! synchronizer with its cache and guard, and the debounce timer for change
//! events. Hosts forward their events to [`Session::notify`] and call
//! [`Session::poll`] from their event loop.
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use footquill::config::Config;
//! use footquill::session::{Document, Session, Trigger};
//! use footquill::sync::RenderedBackref;
//!
//! let mut session = Session::new(Config::default());
//! let mut docs = vec![Document::new(
//!     "note.md",
//!     "Body[^1]\n\n[^1]: one",
//!     vec![RenderedBackref::for_label("1")],
//! )];
//!
//! let start = Instant::now();
//! session.notify(Trigger::DocumentOpened, start);
//! assert_eq!(session.poll(start, &mut docs), 0);
//! assert_eq!(session.poll(start + Duration::from_millis(300), &mut docs), 1);
//! assert_eq!(docs[0].backrefs()[0].text(), "[1]");
//! ```

use crate::config::Config;
use crate::editor::buffer::EditableView;
use crate::footnote::{self, FootnoteIndex};
use crate::navigator::{self, NavigationOutcome};
use crate::sync::{BackrefElement, Debouncer, RenderedBackref, SyncOutcome, Synchronizer};
use std::fmt;
use std::time::Instant;

/// Host events that schedule a synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    DocumentOpened,
    DocumentModified,
    LayoutChanged,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::DocumentOpened => write!(f, "document-opened"),
            Trigger::DocumentModified => write!(f, "document-modified"),
            Trigger::LayoutChanged => write!(f, "layout-changed"),
        }
    }
}

/// Debounce key for the all-documents synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SyncAll;

/// An open document as seen by the session.
pub trait DocumentView {
    type Element: BackrefElement;

    /// Identity used for caching, usually the document path.
    fn id(&self) -> &str;

    /// Plain-text snapshot of the document.
    fn text(&self) -> &str;

    /// The rendered backreferences, or `None` when the view has no rendered
    /// content.
    fn backrefs_mut(&mut self) -> Option<&mut [Self::Element]>;
}

/// A document with in-memory rendered backreferences.
#[derive(Debug, Clone)]
pub struct Document {
    id: String,
    text: String,
    backrefs: Option<Vec<RenderedBackref>>,
}

impl Document {
    /// Creates a document with rendered backreferences.
    pub fn new(id: impl Into<String>, text: impl Into<String>, backrefs: Vec<RenderedBackref>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            backrefs: Some(backrefs),
        }
    }

    /// Creates a document whose view has not rendered anything.
    pub fn unrendered(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            backrefs: None,
        }
    }

    /// Creates a document with one backreference per footnote definition,
    /// the way a Markdown renderer lays them out.
    pub fn rendered(id: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let backrefs = FootnoteIndex::build(&text)
            .iter()
            .filter(|entry| !entry.definition.is_empty())
            .map(|entry| RenderedBackref::for_label(&entry.label))
            .collect();
        Self::new(id, text, backrefs)
    }

    /// Replaces the text; rendered elements are kept.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The rendered backreferences (empty when unrendered).
    pub fn backrefs(&self) -> &[RenderedBackref] {
        self.backrefs.as_deref().unwrap_or_default()
    }
}

impl DocumentView for Document {
    type Element = RenderedBackref;

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn backrefs_mut(&mut self) -> Option<&mut [RenderedBackref]> {
        self.backrefs.as_deref_mut()
    }
}

/// One host session.
#[derive(Debug)]
pub struct Session {
    config: Config,
    synchronizer: Synchronizer,
    debouncer: Debouncer<SyncAll>,
}

impl Session {
    /// Starts a session.
    pub fn new(config: Config) -> Self {
        let debouncer = Debouncer::new(config.debounce());
        Self {
            config,
            synchronizer: Synchronizer::new(),
            debouncer,
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Replaces the configuration. Already rewritten elements keep their text
    /// until the host re-renders them.
    pub fn set_config(&mut self, config: Config) {
        self.debouncer.set_delay(config.debounce());
        self.config = config;
    }

    /// The session's synchronizer.
    pub fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    /// Records a host event; the synchronization runs `debounce_delay` after
    /// the last event.
    pub fn notify(&mut self, trigger: Trigger, now: Instant) {
        tracing::debug!(%trigger, "scheduling backreference synchronization");
        self.debouncer.schedule(SyncAll, now);
    }

    /// Returns true if a synchronization is scheduled.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending(&SyncAll)
    }

    /// When the scheduled synchronization is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.next_deadline()
    }

    /// Runs the scheduled synchronization if it is due. Returns the number of
    /// documents synchronized.
    pub fn poll<D: DocumentView>(&mut self, now: Instant, documents: &mut [D]) -> usize {
        self.poll_with(now, documents, || {})
    }

    /// Like [`Session::poll`], handing control to `yield_now` between the
    /// batches of a large pass.
    pub fn poll_with<D, Y>(&mut self, now: Instant, documents: &mut [D], yield_now: Y) -> usize
    where
        D: DocumentView,
        Y: FnMut(),
    {
        if self.debouncer.take_due(now).is_empty() {
            return 0;
        }
        self.sync_all_with(documents, yield_now)
    }

    /// Synchronizes every document now. Returns the number of documents whose
    /// pass completed.
    pub fn sync_all<D: DocumentView>(&self, documents: &mut [D]) -> usize {
        self.sync_all_with(documents, || {})
    }

    /// Like [`Session::sync_all`], calling `yield_now` between batches.
    pub fn sync_all_with<D, Y>(&self, documents: &mut [D], mut yield_now: Y) -> usize
    where
        D: DocumentView,
        Y: FnMut(),
    {
        if !self.config.enable_custom_labels {
            return 0;
        }

        let mut completed = 0;
        for doc in documents.iter_mut() {
            if let SyncOutcome::Completed(_) = self.sync_document_with(doc, &mut yield_now) {
                completed += 1;
            }
        }
        completed
    }

    /// Synchronizes one document. A view without rendered content counts as
    /// an empty pass.
    pub fn sync_document<D: DocumentView>(&self, doc: &mut D) -> SyncOutcome {
        self.sync_document_with(doc, || {})
    }

    /// Like [`Session::sync_document`], calling `yield_now` between batches.
    /// In performance mode a pass over more than `batch_threshold` elements
    /// yields once between each pair of batches.
    pub fn sync_document_with<D, Y>(&self, doc: &mut D, yield_now: Y) -> SyncOutcome
    where
        D: DocumentView,
        Y: FnMut(),
    {
        let id = doc.id().to_string();
        let text = doc.text().to_string();
        match doc.backrefs_mut() {
            Some(elements) => self
                .synchronizer
                .synchronize_with(&id, &text, elements, &self.config, yield_now),
            None => {
                tracing::debug!(doc = %id, "no rendered content, skipping");
                SyncOutcome::Completed(Default::default())
            }
        }
    }

    /// Runs the navigator on the focused view. Without a focused view this
    /// reports [`NavigationOutcome::Unavailable`].
    pub fn navigate<V: EditableView + ?Sized>(&self, view: Option<&mut V>) -> NavigationOutcome {
        match view {
            Some(view) => navigator::navigate(view),
            None => NavigationOutcome::Unavailable,
        }
    }

    /// Validates `text` and returns the summary shown to the user.
    pub fn validate(&self, text: &str) -> String {
        let index = FootnoteIndex::build(text);
        footnote::summarize(&footnote::validate(text, &index, &self.config))
    }

    /// Label suggestions for `text`, empty when suggestions are disabled.
    pub fn suggest(&self, text: &str) -> Vec<String> {
        if !self.config.enable_smart_suggestions {
            return Vec::new();
        }
        footnote::suggest_labels(text)
    }

    /// Drops the cached index of a document whose text changed.
    pub fn invalidate(&self, doc_id: &str) -> bool {
        self.synchronizer.invalidate(doc_id)
    }

    /// Cancels pending work and clears the cache.
    pub fn shutdown(&mut self) {
        self.debouncer.cancel_all();
        self.synchronizer.clear();
        tracing::debug!("footnote session shut down");
    }
}
