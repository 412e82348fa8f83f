//! Scene breakdown ("decupagem") CSV loader.
//!
//! Rows are read in file order. A row with a scene number opens (or re-opens)
//! that scene; a row without one continues the last opened scene. Any row
//! with a shot description adds a [`Shot`] to the current scene.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use odgen_core::{Breakdown, Scene, Shot};

use crate::ParseError;

/// Column headers of the breakdown table
pub mod columns {
    pub const SCENE: &str = "CENA";
    pub const LOCATION: &str = "LOCAÇÃO / SET";
    pub const DESCRIPTION: &str = "DESCRIÇÃO CENA";
    pub const CAST: &str = "ELENCO";
    /// Spelled this way in the production template
    pub const CONTINUITY: &str = "OBSERVAÇÕES CONTITNUIDADE";
    pub const CONTINUITY_ALT: &str = "OBSERVAÇÕES CONTINUIDADE";
    pub const SHOTS: &str = "PLANOS";
}

/// Load the breakdown table from a UTF-8 CSV file with a header row
pub fn load_breakdown(path: &Path) -> Result<Breakdown, ParseError> {
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let breakdown = read_breakdown(file, path)?;
    tracing::info!(
        scenes = breakdown.len(),
        shots = breakdown.shot_count(),
        "Loaded breakdown from {}",
        path.display()
    );
    Ok(breakdown)
}

/// Read a breakdown table from any reader; `origin` is used in error messages
pub fn read_breakdown<R: Read>(input: R, origin: &Path) -> Result<Breakdown, ParseError> {
    let csv_error = |source| ParseError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let headers = reader.headers().map_err(csv_error)?.clone();
    let layout = ColumnLayout::from_headers(&headers).ok_or_else(|| ParseError::MissingColumn {
        path: origin.to_path_buf(),
        column: columns::SCENE.to_string(),
    })?;

    let mut breakdown = Breakdown::new();
    let mut current: Option<String> = None;

    for record in reader.records() {
        let record = record.map_err(csv_error)?;

        let scene_id = layout.field(&record, Some(layout.scene));
        if !scene_id.is_empty() {
            breakdown.insert(
                Scene::new(scene_id)
                    .location(layout.field(&record, layout.location))
                    .description(layout.field(&record, layout.description))
                    .cast(layout.field(&record, layout.cast))
                    .continuity(layout.field(&record, layout.continuity)),
            );
            current = Some(scene_id.to_string());
        }

        let Some(scene) = current.as_deref().and_then(|id| breakdown.get_mut(id)) else {
            continue;
        };
        let shot = layout.field(&record, layout.shots);
        if shot.is_empty() {
            continue;
        }
        scene.shots.push(
            Shot::new(shot)
                .cast(layout.field(&record, layout.cast))
                .continuity(layout.field(&record, layout.continuity)),
        );
    }

    Ok(breakdown)
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    scene: usize,
    location: Option<usize>,
    description: Option<usize>,
    cast: Option<usize>,
    continuity: Option<usize>,
    shots: Option<usize>,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Option<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').to_uppercase() == name)
        };
        Some(Self {
            scene: find(columns::SCENE)?,
            location: find(columns::LOCATION),
            description: find(columns::DESCRIPTION),
            cast: find(columns::CAST),
            continuity: find(columns::CONTINUITY).or_else(|| find(columns::CONTINUITY_ALT)),
            shots: find(columns::SHOTS),
        })
    }

    /// Trimmed cell value; missing cells and spreadsheet "nan" exports read as empty
    fn field<'r>(&self, record: &'r StringRecord, column: Option<usize>) -> &'r str {
        let value = column.and_then(|c| record.get(c)).map_or("", str::trim);
        if value.eq_ignore_ascii_case("nan") {
            ""
        } else {
            value
        }
    }
}
