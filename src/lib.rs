//! footquill - footnote consistency for Markdown editors.
//!
//! Keeps inline footnote markers (`[^label]`), their definitions
//! (`[^label]: text`) and the rendered "return to reference" links in step as
//! a document is edited, and moves the cursor between a marker and its
//! definition.
//!
//! # Modules
//!
//! - `footnote`: Index builder, label formatter, validation and suggestions
//! - `sync`: Backreference synchronizer, element capability and debounce
//! - `navigator`: Marker ↔ definition jumps and footnote insertion
//! - `editor`: Editable view trait, positions and an in-memory buffer
//! - `session`: Host session tying configuration, sync and events together
//! - `config`: TOML configuration
//! - `file`: Loading and saving documents

pub mod config;
pub mod editor;
pub mod file;
pub mod footnote;
pub mod navigator;
pub mod session;
pub mod sync;
