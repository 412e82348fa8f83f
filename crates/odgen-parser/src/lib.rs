//! # odgen-parser
//!
//! Readers for the two inputs of a generation run.
//!
//! This crate provides:
//! - Scene breakdown loader for the "decupagem" CSV table
//! - Shooting plan reader: PDF text extraction plus the line classifier that
//!   rebuilds each day's chronological schedule
//!
//! ## Example
//!
//! ```rust
//! use odgen_parser::plan::scan_text;
//!
//! let text = "MEU FILME\ndiária 1:\n07h00 - 07h30 CHAMADA\n7 INT STUDIO\nfim do dia\n";
//! let plan = scan_text(text);
//! assert_eq!(plan.title.as_deref(), Some("MEU FILME"));
//! assert_eq!(plan.day(1).unwrap().len(), 2);
//! ```

pub mod breakdown;
pub mod plan;

pub use breakdown::{load_breakdown, read_breakdown};
pub use plan::{load_plan, scan_text};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Parsing error
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Missing column {column:?} in {}", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("Cannot extract text from {}: {message}", path.display())]
    Pdf { path: PathBuf, message: String },
}

/// Supported shooting plan formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanFormat {
    /// PDF document, text is extracted page by page
    Pdf,
    /// Plain text already extracted (e.g. a debug dump)
    Text,
}

/// Detect plan format from extension
pub fn detect_format(path: &Path) -> PlanFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("txt") => PlanFormat::Text,
        _ => PlanFormat::Pdf,
    }
}
