//! # odgen-cli
//!
//! Generation runs behind the `odgen` command.
//!
//! This crate provides:
//! - `Settings`: input/output locations, loaded from TOML and overridable
//!   from the command line
//! - `OdGenerator`: loads the breakdown and the shooting plan once per run,
//!   persists the project configuration and renders day sheets
//!
//! ## Example
//!
//! ```rust,no_run
//! use odgen_cli::{OdGenerator, Settings};
//! use odgen_render::OdSheetRenderer;
//!
//! let mut generator = OdGenerator::new(Settings::default(), OdSheetRenderer::new());
//! let report = generator.generate_all()?;
//! println!("{} of {} days written", report.written.len(), report.total());
//! # Ok::<(), odgen_cli::GenerateError>(())
//! ```

pub mod generator;
pub mod settings;

pub use generator::{load_project, write_config, BatchReport, GenerateError, LoadedProject, OdGenerator};
pub use settings::{Settings, SettingsError};
