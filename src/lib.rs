//! Valence - architecture-conformance validation engine
//!
//! Architecture: Clean Architecture - the library crate is the application layer; `main.rs` is
//! a thin CLI shell over it (§1, §10).
//! - Pure domain logic (`model`) stays separate from infrastructure (`config`, `overrides`,
//!   `plugins`, `report`).
//! - `Engine` is the single entry point a caller (CLI or otherwise) needs.

pub mod cli_files;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod executor;
pub mod merge;
pub mod model;
pub mod overrides;
pub mod plugins;
pub mod profile_resolver;
pub mod registry;
pub mod report;

pub use engine::Engine;
pub use error::{Result, ValenceError};
pub use executor::SourceFile;
pub use report::{Report, ReportFormat, ReportGenerator};
