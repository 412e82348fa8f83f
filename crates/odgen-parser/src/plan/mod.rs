//! Shooting plan ("plano de filmagem") reader.
//!
//! The plan text is scanned line by line with a small state machine: a
//! current-day cursor opened by `diária N:` markers and closed by `fim do dia`
//! (or the next marker), plus a look-back at the last appended activity so
//! that scene annotation lines can be merged onto their scene.
//!
//! Inside an open day each trimmed, non-blank line is classified as:
//!
//! | Line shape                                  | Result                        |
//! |---------------------------------------------|-------------------------------|
//! | `07h00 - 07h30 CAFÉ DA MANHÃ`                | fixed activity with times     |
//! | `12 INT QUARTO DA ANA`                       | scene reference               |
//! | `DIA ... ELENCO: ANA`                        | detail of the previous scene  |
//! | `REC: passagem com elenco`                   | REC marker                    |
//! | `... fim do dia ...`                         | closes the day                |
//! | anything else                                | skipped                       |

pub mod extract;

pub use extract::{debug_dump_path, extract_text, write_debug_dump};

use std::path::Path;
use std::sync::LazyLock;

use odgen_core::{Activity, ClockTime, DayNumber, LocationType, ShootingPlan};
use regex::Regex;

use crate::{detect_format, ParseError, PlanFormat};

static DAY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)di[aá]ria\s*(\d+)\s*[:：]").expect("Invalid day marker regex")
});

static TIMED_ACTIVITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}[hH]\d{2})(?:\s*[-–—]\s*(\d{2}[hH]\d{2})?)?\s*(.+)$")
        .expect("Invalid timed activity regex")
});

static SCENE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s+(INT|EXT|REC)\s+(.+)$").expect("Invalid scene reference regex")
});

/// Time-of-day words that, together with [`CAST_LABEL`], mark a scene annotation
const TIME_OF_DAY_WORDS: &[&str] = &["DIA", "NOITE", "MANHÃ", "TARDE"];
const CAST_LABEL: &str = "ELENCO:";
const REC_PREFIX: &str = "REC:";
const DAY_END: &str = "fim do dia";

/// Classification of one trimmed plan line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// `diária N:` opens (or returns to) day N
    DayMarker(DayNumber),
    /// Line starting with a time token
    Timed {
        start: ClockTime,
        end: Option<ClockTime>,
        label: &'a str,
    },
    /// `<number> INT|EXT|REC <text>`
    Scene {
        id: String,
        location_type: LocationType,
        description: &'a str,
    },
    /// Time-of-day plus cast annotation for the preceding scene
    SceneDetail,
    /// `REC:` take marker
    Rec,
    /// `fim do dia`
    DayEnd,
    /// Anything else
    Unclassified,
}

/// Classify a single trimmed line; rules are tried in a fixed order
pub fn classify_line(line: &str) -> LineClass<'_> {
    if let Some(day) = day_marker(line) {
        return LineClass::DayMarker(day);
    }
    if let Some(timed) = timed_activity(line) {
        return timed;
    }
    if let Some(scene) = scene_reference(line) {
        return scene;
    }

    let upper = line.to_uppercase();
    if upper.contains(CAST_LABEL) && TIME_OF_DAY_WORDS.iter().any(|w| upper.contains(w)) {
        return LineClass::SceneDetail;
    }
    if upper.starts_with(REC_PREFIX) {
        return LineClass::Rec;
    }
    if line.to_lowercase().contains(DAY_END) {
        return LineClass::DayEnd;
    }
    LineClass::Unclassified
}

fn day_marker(line: &str) -> Option<DayNumber> {
    let caps = DAY_MARKER.captures(line)?;
    caps[1].parse::<DayNumber>().ok().filter(|&day| day > 0)
}

fn timed_activity(line: &str) -> Option<LineClass<'_>> {
    let caps = TIMED_ACTIVITY.captures(line)?;
    let start = caps[1].parse().ok()?;
    let end = caps.get(2).and_then(|m| m.as_str().parse().ok());
    let label = caps
        .get(3)?
        .as_str()
        .trim_start_matches(|c: char| c == '-' || c == '–' || c == '—' || c.is_whitespace())
        .trim_end();
    Some(LineClass::Timed { start, end, label })
}

fn scene_reference(line: &str) -> Option<LineClass<'_>> {
    let caps = SCENE_REFERENCE.captures(line)?;
    let digits = caps[1].trim_start_matches('0');
    let id = if digits.is_empty() { "0" } else { digits };
    let location_type = LocationType::from_token(&caps[2])?;
    let description = caps.get(3)?.as_str().trim();
    Some(LineClass::Scene {
        id: id.to_string(),
        location_type,
        description,
    })
}

/// Line-by-line plan scanner holding the current-day cursor
#[derive(Debug, Default)]
pub struct PlanScanner {
    plan: ShootingPlan,
    current_day: Option<DayNumber>,
}

impl PlanScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Day currently receiving activities
    pub fn current_day(&self) -> Option<DayNumber> {
        self.current_day
    }

    /// Feed one raw line; `line_number` is 1-based and only used for logging
    pub fn feed(&mut self, line_number: usize, raw: &str) {
        let line = raw.trim();
        if line.is_empty() {
            return;
        }
        if self.plan.title.is_none() {
            tracing::debug!(line = line_number, "Project title: {line:?}");
            self.plan.title = Some(line.to_string());
        }

        let class = classify_line(line);
        if let LineClass::DayMarker(day) = class {
            tracing::debug!(line = line_number, day, "Day marker");
            self.plan.open_day(day);
            self.current_day = Some(day);
            return;
        }

        let Some(day) = self.current_day else {
            return;
        };

        match class {
            LineClass::DayMarker(_) => {}
            LineClass::Timed { start, end, label } => {
                tracing::debug!(line = line_number, day, %start, "Timed activity: {label}");
                let mut activity = Activity::fixed(label).starts(start).source(line);
                activity.end = end;
                self.plan.push(day, activity);
            }
            LineClass::Scene {
                id,
                location_type,
                description,
            } => {
                tracing::debug!(line = line_number, day, scene = %id, "Scene reference");
                self.plan
                    .push(day, Activity::scene(id, location_type, description).source(line));
            }
            LineClass::SceneDetail => {
                let last_scene = self
                    .plan
                    .days
                    .get_mut(&day)
                    .and_then(|activities| activities.last_mut())
                    .and_then(Activity::as_scene_mut);
                if let Some(scene) = last_scene {
                    tracing::debug!(line = line_number, day, scene = %scene.id, "Scene detail");
                    scene.detail = Some(line.to_string());
                }
            }
            LineClass::Rec => {
                tracing::debug!(line = line_number, day, "REC marker");
                self.plan.push(day, Activity::rec(line).source(line));
            }
            LineClass::DayEnd => {
                tracing::debug!(line = line_number, day, "End of day");
                self.current_day = None;
            }
            LineClass::Unclassified => {
                tracing::trace!(line = line_number, "Skipped: {line:?}");
            }
        }
    }

    pub fn finish(self) -> ShootingPlan {
        self.plan
    }
}

/// Scan already-extracted plan text
pub fn scan_text(text: &str) -> ShootingPlan {
    let mut scanner = PlanScanner::new();
    for (index, line) in text.lines().enumerate() {
        scanner.feed(index + 1, line);
    }
    let plan = scanner.finish();
    for (day, activities) in &plan.days {
        tracing::info!(day, activities = activities.len(), "Parsed day");
    }
    plan
}

/// Read and scan a shooting plan.
///
/// A missing or unreadable file is an error. A PDF whose text cannot be
/// extracted yields an empty plan so the caller can fall back to grouping
/// breakdown scenes.
pub fn load_plan(path: &Path) -> Result<ShootingPlan, ParseError> {
    let text = match extract_text(path) {
        Ok(text) => text,
        Err(err @ ParseError::Io { .. }) => return Err(err),
        Err(err) => {
            tracing::warn!("{err}; continuing without a plan");
            return Ok(ShootingPlan::new());
        }
    };

    if detect_format(path) == PlanFormat::Pdf {
        write_debug_dump(path, &text);
    }

    let plan = scan_text(&text);
    tracing::info!(
        days = plan.days.len(),
        activities = plan.activity_count(),
        "Scanned plan {}",
        path.display()
    );
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use odgen_core::ActivityKind;
    use pretty_assertions::assert_eq;

    fn t(hour: u8, minute: u8) -> ClockTime {
        ClockTime::new(hour, minute)
    }

    #[test]
    fn day_markers_are_case_insensitive() {
        assert_eq!(classify_line("diária 1:"), LineClass::DayMarker(1));
        assert_eq!(classify_line("DIÁRIA 12 :"), LineClass::DayMarker(12));
        assert_eq!(classify_line("Diária3："), LineClass::DayMarker(3));
        assert_eq!(classify_line("2ª semana - diaria 4: estúdio"), LineClass::DayMarker(4));
        assert_eq!(classify_line("diária 0:"), LineClass::Unclassified);
        assert_eq!(classify_line("diária 5"), LineClass::Unclassified);
    }

    #[test]
    fn timed_activity_with_range() {
        assert_eq!(
            classify_line("07h00 - 07h30 CHAMADA"),
            LineClass::Timed {
                start: t(7, 0),
                end: Some(t(7, 30)),
                label: "CHAMADA",
            }
        );
        assert_eq!(
            classify_line("12h00–13h00 - ALMOÇO"),
            LineClass::Timed {
                start: t(12, 0),
                end: Some(t(13, 0)),
                label: "ALMOÇO",
            }
        );
    }

    #[test]
    fn timed_activity_start_only() {
        assert_eq!(
            classify_line("17h00 - DESPRODUÇÃO"),
            LineClass::Timed {
                start: t(17, 0),
                end: None,
                label: "DESPRODUÇÃO",
            }
        );
        assert_eq!(
            classify_line("06h30 CAFÉ"),
            LineClass::Timed {
                start: t(6, 30),
                end: None,
                label: "CAFÉ",
            }
        );
    }

    #[test]
    fn scene_reference_tokens() {
        assert_eq!(
            classify_line("7 INT STUDIO scene text"),
            LineClass::Scene {
                id: "7".into(),
                location_type: LocationType::Interior,
                description: "STUDIO scene text",
            }
        );
        assert_eq!(
            classify_line("012 ext rua"),
            LineClass::Scene {
                id: "12".into(),
                location_type: LocationType::Exterior,
                description: "rua",
            }
        );
        assert!(matches!(
            classify_line("3 REC QUARTO"),
            LineClass::Scene {
                location_type: LocationType::Rec,
                ..
            }
        ));
        assert_eq!(classify_line("7 INTERIOR CASA"), LineClass::Unclassified);
    }

    #[test]
    fn other_line_kinds() {
        assert_eq!(classify_line("NOITE - ELENCO: ANA, JOÃO"), LineClass::SceneDetail);
        assert_eq!(classify_line("Manhã elenco: Ana"), LineClass::SceneDetail);
        assert_eq!(classify_line("DIA sem elenco"), LineClass::Unclassified);
        assert_eq!(classify_line("rec: passagem"), LineClass::Rec);
        assert_eq!(classify_line("--- Fim do Dia ---"), LineClass::DayEnd);
        assert_eq!(classify_line("Equipe reduzida"), LineClass::Unclassified);
    }

    #[test]
    fn scenario_single_day() {
        let plan = scan_text("diária 1:\n07h00 - 07h30 CHAMADA\n7 INT STUDIO scene text\nfim do dia");
        assert_eq!(plan.days.len(), 1);
        let day = plan.day(1).unwrap();
        assert_eq!(
            day.to_vec(),
            vec![
                Activity::fixed("CHAMADA")
                    .starts(t(7, 0))
                    .ends(t(7, 30))
                    .source("07h00 - 07h30 CHAMADA"),
                Activity::scene("7", LocationType::Interior, "STUDIO scene text")
                    .source("7 INT STUDIO scene text"),
            ]
        );
        assert_eq!(plan.title.as_deref(), Some("diária 1:"));
    }

    #[test]
    fn lines_outside_days_are_ignored() {
        let text = "CURTA METRAGEM\n\
                    07h00 - 08h00 ANTES\n\
                    1 INT CASA\n\
                    diária 2:\n\
                    08h00 - 09h00 DENTRO\n\
                    fim do dia\n\
                    2 EXT RUA\n\
                    REC: fora\n";
        let plan = scan_text(text);
        assert_eq!(plan.title.as_deref(), Some("CURTA METRAGEM"));
        assert_eq!(plan.days.keys().copied().collect::<Vec<_>>(), vec![2]);
        assert_eq!(plan.day(2).unwrap().len(), 1);
    }

    #[test]
    fn new_marker_switches_day_and_returns() {
        let text = "diária 1:\n1 INT A\ndiária 2:\n2 INT B\ndiária 1:\n3 EXT C\n";
        let plan = scan_text(text);
        let ids = |day| {
            plan.day(day)
                .unwrap()
                .iter()
                .filter_map(|a| a.as_scene().map(|s| s.id.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(1), vec!["1", "3"]);
        assert_eq!(ids(2), vec!["2"]);
    }

    #[test]
    fn detail_merges_onto_preceding_scene_only() {
        let text = "diária 1:\n\
                    07h00 - 07h30 CAFÉ\n\
                    NOITE ELENCO: ORFÃO\n\
                    4 INT QUARTO\n\
                    NOITE ELENCO: ANA\n\
                    REC: passagem\n\
                    DIA ELENCO: IGNORADO\n";
        let plan = scan_text(text);
        let day = plan.day(1).unwrap();
        assert_eq!(day.len(), 3);
        assert_eq!(
            day[1].as_scene().unwrap().detail.as_deref(),
            Some("NOITE ELENCO: ANA")
        );
        assert_eq!(
            day[2].kind,
            ActivityKind::Rec {
                text: "REC: passagem".into()
            }
        );
    }

    #[test]
    fn blank_and_padded_lines() {
        let text = "\n   \n  diária   7 :  \n\t09h00 - 10h00   - ENSAIO  \n\n";
        let plan = scan_text(text);
        let day = plan.day(7).unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(
            day[0].kind,
            ActivityKind::Fixed {
                label: "ENSAIO".into()
            }
        );
        assert_eq!(day[0].source_line, "09h00 - 10h00   - ENSAIO");
    }

    #[test]
    fn empty_day_is_kept() {
        let plan = scan_text("diária 3:\nfim do dia\n");
        assert_eq!(plan.day(3), Some(&[][..]));
    }

    #[test]
    fn no_markers_yield_empty_plan() {
        let plan = scan_text("PLANO\n07h00 - 08h00 CAFÉ\n1 INT CASA\n");
        assert!(plan.is_empty());
        assert_eq!(plan.title.as_deref(), Some("PLANO"));
    }

    #[test]
    fn load_plan_recovers_from_corrupt_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PLANO_FINAL.pdf");
        std::fs::write(&path, b"%PDF-garbage").unwrap();
        let plan = load_plan(&path).unwrap();
        assert!(plan.is_empty());
        assert!(plan.title.is_none());
    }

    #[test]
    fn load_plan_missing_file_is_fatal() {
        assert!(load_plan(Path::new("/nonexistent/PLANO_FINAL.pdf")).is_err());
    }

    #[test]
    fn load_plan_from_text_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PLANO_FINAL_debug_text.txt");
        std::fs::write(&path, "FILME\ndiária 1:\n1 INT CASA\n").unwrap();
        let plan = load_plan(&path).unwrap();
        assert_eq!(plan.day(1).unwrap().len(), 1);
        assert!(!dir.path().join("PLANO_FINAL_debug_text_debug_text.txt").exists());
    }
}
