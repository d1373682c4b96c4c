//! Keeping rendered backreferences in step with the document text.
//!
//! # Modules
//!
//! - `element`: The element capability trait and an in-memory element
//! - `debounce`: Trailing debounce for change events
//! - `synchronizer`: Index cache, reentrancy guard and the rewrite pass

pub mod debounce;
pub mod element;
pub mod synchronizer;

pub use debounce::Debouncer;
pub use element::{BackrefContent, BackrefElement, RenderError, RenderedBackref};
pub use synchronizer::{SyncOutcome, SyncReport, Synchronizer};
