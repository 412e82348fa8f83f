//! # odgen-core
//!
//! Core domain model for the odgen "Ordem do Dia" generator.
//!
//! This crate provides:
//! - Scene breakdown types: `Scene`, `Shot`, `Breakdown`
//! - Shooting plan types: `Activity`, `ActivityKind`, `ShootingPlan`
//! - Project configuration: `ProjectConfig`, `DayPlan` and the `ConfigSynthesizer`
//! - The `DayRenderer` trait implemented by output backends
//! - Error types shared by renderers
//!
//! ## Example
//!
//! ```rust
//! use odgen_core::{Activity, Breakdown, ConfigSynthesizer, LocationType, Scene, ShootingPlan};
//!
//! let mut breakdown = Breakdown::new();
//! breakdown.insert(Scene::new("7").location("STUDIO").cast("X/Y"));
//!
//! let mut plan = ShootingPlan::new();
//! plan.open_day(1);
//! plan.push(1, Activity::fixed("CHAMADA").starts("07h00".parse().unwrap()));
//! plan.push(1, Activity::scene("7", LocationType::Interior, "STUDIO scene text"));
//!
//! let config = ConfigSynthesizer::new().synthesize(&plan, &breakdown);
//! assert_eq!(config.project.total_days, 1);
//! assert_eq!(config.days[&1].scenes, vec!["7".to_string()]);
//! ```

pub mod synth;

pub use synth::{ConfigSynthesizer, DEFAULT_SCENES_PER_DAY, DEFAULT_TITLE, UNDEFINED};

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Scene identifier as written in the breakdown table ("7", "12A", ...)
pub type SceneId = String;

/// Shooting day number taken from a "diária N:" marker
pub type DayNumber = u32;

// ============================================================================
// Scene Breakdown
// ============================================================================

/// One planned shot ("plano") of a scene
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shot {
    /// Free-text shot description
    pub description: String,
    /// Cast listed on the shot row, '/'-delimited
    pub cast: String,
    /// Continuity notes listed on the shot row
    pub continuity: String,
}

impl Shot {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn cast(mut self, cast: impl Into<String>) -> Self {
        self.cast = cast.into();
        self
    }

    pub fn continuity(mut self, notes: impl Into<String>) -> Self {
        self.continuity = notes.into();
        self
    }
}

/// A scene from the breakdown table ("decupagem")
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene number as written in the table
    pub id: SceneId,
    /// Location / set
    pub location: String,
    /// Scene description
    pub description: String,
    /// Scene-level cast, '/'-delimited
    pub cast: String,
    /// Continuity observations
    pub continuity: String,
    /// Shots in table order
    pub shots: Vec<Shot>,
}

impl Scene {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn cast(mut self, cast: impl Into<String>) -> Self {
        self.cast = cast.into();
        self
    }

    pub fn continuity(mut self, notes: impl Into<String>) -> Self {
        self.continuity = notes.into();
        self
    }

    pub fn shot(mut self, shot: Shot) -> Self {
        self.shots.push(shot);
        self
    }

    /// Union of scene-level and per-shot cast, trimmed, deduplicated and sorted
    pub fn cast_members(&self) -> Vec<String> {
        let members: BTreeSet<String> = std::iter::once(self.cast.as_str())
            .chain(self.shots.iter().map(|s| s.cast.as_str()))
            .flat_map(|field| field.split('/'))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        members.into_iter().collect()
    }

    /// Number of sheet rows the scene occupies: one per shot, at least one
    pub fn row_span(&self) -> usize {
        self.shots.len().max(1)
    }
}

/// All scenes of a breakdown table, kept in first-appearance order
#[derive(Clone, Debug, Default)]
pub struct Breakdown {
    scenes: Vec<Scene>,
    index: HashMap<SceneId, usize>,
}

impl Breakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a scene, or return the existing one with the same id.
    ///
    /// Metadata of an already-known scene is never overwritten.
    pub fn insert(&mut self, scene: Scene) -> &mut Scene {
        let slot = match self.index.get(&scene.id) {
            Some(&slot) => slot,
            None => {
                let slot = self.scenes.len();
                self.index.insert(scene.id.clone(), slot);
                self.scenes.push(scene);
                slot
            }
        };
        &mut self.scenes[slot]
    }

    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.index.get(id).map(|&slot| &self.scenes[slot])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Scene> {
        self.index.get(id).map(|&slot| &mut self.scenes[slot])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    /// Scene ids in first-appearance order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.scenes.iter().map(|s| s.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Total number of shots across all scenes
    pub fn shot_count(&self) -> usize {
        self.scenes.iter().map(|s| s.shots.len()).sum()
    }
}

// ============================================================================
// Shooting Plan
// ============================================================================

/// Wall-clock time token in the "HHhMM" notation used by shooting plans.
///
/// Hours are not range-checked: overnight schedules write "25h30".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    pub hour: u8,
    pub minute: u8,
}

impl ClockTime {
    pub const fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}h{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = InvalidClockTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidClockTime(s.to_string());
        let (hour, minute) = s.split_once(['h', 'H']).ok_or_else(invalid)?;
        let two_digits = |part: &str| -> Result<u8, InvalidClockTime> {
            if part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit()) {
                part.parse().map_err(|_| invalid())
            } else {
                Err(invalid())
            }
        };
        Ok(Self {
            hour: two_digits(hour)?,
            minute: two_digits(minute)?,
        })
    }
}

impl TryFrom<String> for ClockTime {
    type Error = InvalidClockTime;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Error returned when a string is not an "HHhMM" token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time token: {0:?} (expected HHhMM)")]
pub struct InvalidClockTime(pub String);

/// Location-type token that follows a scene number in the plan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocationType {
    /// "INT"
    #[serde(rename = "INT")]
    Interior,
    /// "EXT"
    #[serde(rename = "EXT")]
    Exterior,
    /// "REC"
    #[serde(rename = "REC")]
    Rec,
    /// Not stated (scenes synthesized without a plan)
    #[serde(rename = "OTHER")]
    Other,
}

impl LocationType {
    /// Parse a plan token, case-insensitively
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "INT" => Some(Self::Interior),
            "EXT" => Some(Self::Exterior),
            "REC" => Some(Self::Rec),
            _ => None,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Interior => "INT",
            Self::Exterior => "EXT",
            Self::Rec => "REC",
            Self::Other => "",
        }
    }
}

/// Reference from the plan to a breakdown scene
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRef {
    /// Scene number as printed in the plan, without leading zeros
    pub id: SceneId,
    pub location_type: LocationType,
    /// Text following the location token
    pub description: String,
    /// "DIA/NOITE ... ELENCO:" annotation line merged onto this scene
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SceneRef {
    /// Numeric value of the id, when it is purely numeric
    pub fn number(&self) -> Option<u32> {
        self.id.parse().ok()
    }
}

/// What a plan line describes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActivityKind {
    /// Timed activity (call, breakfast, lunch, wrap, ...)
    Fixed { label: String },
    /// Scheduled scene
    Scene(SceneRef),
    /// "REC:" take/pass marker, keeping the whole line
    Rec { text: String },
}

/// One entry of a day's chronological schedule
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(flatten)]
    pub kind: ActivityKind,
    pub start: Option<ClockTime>,
    pub end: Option<ClockTime>,
    /// Trimmed plan line the activity was built from
    #[serde(default)]
    pub source_line: String,
}

impl Activity {
    fn with_kind(kind: ActivityKind) -> Self {
        Self {
            kind,
            start: None,
            end: None,
            source_line: String::new(),
        }
    }

    pub fn fixed(label: impl Into<String>) -> Self {
        Self::with_kind(ActivityKind::Fixed {
            label: label.into(),
        })
    }

    pub fn scene(
        id: impl Into<SceneId>,
        location_type: LocationType,
        description: impl Into<String>,
    ) -> Self {
        Self::with_kind(ActivityKind::Scene(SceneRef {
            id: id.into(),
            location_type,
            description: description.into(),
            detail: None,
        }))
    }

    pub fn rec(text: impl Into<String>) -> Self {
        Self::with_kind(ActivityKind::Rec { text: text.into() })
    }

    pub fn starts(mut self, start: ClockTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn ends(mut self, end: ClockTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn source(mut self, line: impl Into<String>) -> Self {
        self.source_line = line.into();
        self
    }

    pub fn as_scene(&self) -> Option<&SceneRef> {
        match &self.kind {
            ActivityKind::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn as_scene_mut(&mut self) -> Option<&mut SceneRef> {
        match &mut self.kind {
            ActivityKind::Scene(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self.kind, ActivityKind::Fixed { .. })
    }

    /// "{start} - {end}", "{start}" alone, or empty
    pub fn time_label(&self) -> String {
        match (self.start, self.end) {
            (Some(start), Some(end)) => format!("{start} - {end}"),
            (Some(start), None) => start.to_string(),
            _ => String::new(),
        }
    }
}

/// Result of scanning a shooting plan: title plus per-day schedules
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShootingPlan {
    /// First non-empty line of the extracted text
    pub title: Option<String>,
    /// Activities per day, each list in plan line order
    pub days: BTreeMap<DayNumber, Vec<Activity>>,
}

impl ShootingPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `day` has an activity list
    pub fn open_day(&mut self, day: DayNumber) {
        self.days.entry(day).or_default();
    }

    /// Append an activity to an already opened day
    pub fn push(&mut self, day: DayNumber, activity: Activity) {
        self.days.entry(day).or_default().push(activity);
    }

    pub fn day(&self, day: DayNumber) -> Option<&[Activity]> {
        self.days.get(&day).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn activity_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}

// ============================================================================
// Project Configuration
// ============================================================================

/// Project-level header data
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub title: String,
    pub director: String,
    pub total_days: u32,
}

/// Render data for one shooting day
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPlan {
    /// Scene ids referenced by the day, in schedule order (duplicates kept)
    pub scenes: Vec<SceneId>,
    pub main_location: String,
    /// Full chronological schedule; absent for days grouped without a plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<Activity>>,
}

impl DayPlan {
    /// Activities to render: the parsed schedule, or one scene entry per listed scene
    pub fn activities(&self) -> Cow<'_, [Activity]> {
        match &self.schedule {
            Some(schedule) => Cow::Borrowed(schedule.as_slice()),
            None => Cow::Owned(
                self.scenes
                    .iter()
                    .map(|id| Activity::scene(id.as_str(), LocationType::Other, "").source(id.as_str()))
                    .collect(),
            ),
        }
    }
}

/// The persisted per-run configuration document
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project: ProjectInfo,
    pub days: BTreeMap<DayNumber, DayPlan>,
}

impl ProjectConfig {
    pub fn day(&self, day: DayNumber) -> Option<&DayPlan> {
        self.days.get(&day)
    }

    pub fn day_numbers(&self) -> impl Iterator<Item = DayNumber> + '_ {
        self.days.keys().copied()
    }

    /// Pretty JSON (2-space indent, non-ASCII kept verbatim)
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Everything a backend needs to lay out one day
#[derive(Clone, Debug)]
pub struct DaySheet<'a> {
    pub day: DayNumber,
    pub activities: Cow<'a, [Activity]>,
    pub breakdown: &'a Breakdown,
    pub config: &'a ProjectConfig,
}

impl<'a> DaySheet<'a> {
    pub fn new(
        day: DayNumber,
        plan: &'a DayPlan,
        breakdown: &'a Breakdown,
        config: &'a ProjectConfig,
    ) -> Self {
        Self {
            day,
            activities: plan.activities(),
            breakdown,
            config,
        }
    }

    /// Breakdown entry for a scene reference, if the table has it
    pub fn scene_for(&self, scene: &SceneRef) -> Option<&'a Scene> {
        self.breakdown.get(&scene.id)
    }
}

/// Document name of a day: `OD_Dia_{day}`, used for both sheet and file
pub fn od_name(day: DayNumber) -> String {
    format!("OD_Dia_{day}")
}

/// Output rendering of a single day
pub trait DayRenderer {
    /// File extension of the produced document, without the dot
    fn extension(&self) -> &'static str;

    /// Render the day to the output format
    fn render_day(&self, sheet: &DaySheet<'_>) -> Result<Vec<u8>, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================
