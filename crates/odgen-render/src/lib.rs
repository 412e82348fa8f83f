//! # odgen-render
//!
//! Spreadsheet backend for odgen day sheets.
//!
//! This crate provides:
//! - The "Ordem do Dia" XLSX renderer (`OdSheetRenderer`)
//! - Keyword heuristics for row colors and department hints
//! - The fixed sheet template (rows, spans, sizes, boilerplate)
//! - Portuguese date banner formatting
//!
//! ## Example
//!
//! ```rust,ignore
//! use odgen_core::{DayRenderer, DaySheet};
//! use odgen_render::OdSheetRenderer;
//!
//! let renderer = OdSheetRenderer::new();
//! let sheet = DaySheet::new(1, config.day(1).unwrap(), &breakdown, &config);
//! let xlsx_bytes = renderer.render_day(&sheet)?;
//! std::fs::write("OD_Dia_1.xlsx", xlsx_bytes)?;
//! ```

pub mod excel;
pub mod heuristics;
pub mod template;

pub use excel::{general_hours, OdSheetRenderer};
pub use heuristics::{keyword_hints, keyword_palette, ActivityPalette, ContinuityHints, DepartmentHints};

use chrono::{Datelike, NaiveDate};

const WEEKDAYS: [&str; 7] = [
    "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado", "Domingo",
];

const MONTHS: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Banner text for a date, e.g. "Segunda 25 de Agosto de 2025"
pub fn date_banner(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{weekday} {} de {month} de {}", date.day(), date.year())
}
