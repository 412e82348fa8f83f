//! "Ordem do Dia" XLSX renderer
//!
//! Lays out one shooting day on a single landscape A4 sheet named
//! `OD_Dia_{n}`. The template is fixed; only the cell values change:
//!
//! ```text
//! row  1 | weekday + date banner (A:K)                  | OD# d/total (L:M) |
//! row  2 | title / director (A:M)                                           |
//! row  4 | general observations (A:H) | address (I:K) | weather (L:M)       |
//! row  6 | HORÁRIOS GERAIS     -> 8 slot headers, 8 start times             |
//! row 10 | CHAMADA EQUIPE      -> 8 roles, 8 call times                     |
//! row 14 | ELENCO              -> 8 column headers, 4 blank rows            |
//! row 21 | CRONOGRAMA DO DIA   -> column headers, one row-group per activity |
//! ```
//!
//! Schedule row-groups:
//! - fixed activity: time in A, label merged across B:M, colored by the palette
//! - scene: one row per shot; scene-level cells merged down the group, the
//!   shooting-board and shot columns stay per row
//! - REC marker: text merged across B:M on a pale background

use chrono::{Local, NaiveDate};
use odgen_core::{
    od_name, Activity, ActivityKind, DayRenderer, DaySheet, RenderError, SceneRef, UNDEFINED,
};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::date_banner;
use crate::heuristics::{keyword_hints, keyword_palette, ActivityPalette, ContinuityHints};
use crate::template::{self, col, fill};

const FONT: &str = "Verdana";

/// Daily call sheet renderer
#[derive(Clone, Debug)]
pub struct OdSheetRenderer {
    /// Date shown in the banner; today when unset
    pub shoot_date: Option<NaiveDate>,
    /// Fixed-activity row color
    pub palette: ActivityPalette,
    /// Wardrobe / art hints from continuity notes
    pub hints: ContinuityHints,
}

impl Default for OdSheetRenderer {
    fn default() -> Self {
        Self {
            shoot_date: None,
            palette: keyword_palette,
            hints: keyword_hints,
        }
    }
}

/// Reusable cell formats
struct SheetFormats {
    banner: Format,
    counter: Format,
    title: Format,
    observations: Format,
    address: Format,
    bordered: Format,
    section: Format,
    slot_header: Format,
    slot_value: Format,
    cast_cell: Format,
    fixed_time: Format,
    fixed_label: Format,
    scene_centered: Format,
    scene_wrapped: Format,
    rec_time: Format,
    rec_text: Format,
}

impl OdSheetRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the banner date
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.shoot_date = Some(date);
        self
    }

    /// Replace the fixed-activity color heuristic
    pub fn with_palette(mut self, palette: ActivityPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Replace the continuity hint heuristic
    pub fn with_hints(mut self, hints: ContinuityHints) -> Self {
        self.hints = hints;
        self
    }

    /// Generate workbook bytes for one day
    pub fn render_to_bytes(&self, day: &DaySheet<'_>) -> Result<Vec<u8>, RenderError> {
        if day.config.day(day.day).is_none() {
            return Err(RenderError::InvalidData(format!(
                "day {} is not in the project configuration",
                day.day
            )));
        }

        let formats = SheetFormats::new();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(od_name(day.day)).map_err(format_error)?;

        self.write_header(sheet, day, &formats)?;
        write_hours(sheet, &day.activities, &formats)?;
        write_crew(sheet, &formats)?;
        write_cast(sheet, &formats)?;
        let rows = self.write_schedule(sheet, day, &formats)?;

        for (column, &px) in template::COLUMN_WIDTHS_PX.iter().enumerate() {
            sheet
                .set_column_width(column as u16, template::width_units(px))
                .map_err(format_error)?;
        }
        sheet.set_landscape();
        sheet.set_paper_size(9);

        tracing::debug!(
            day = day.day,
            activities = day.activities.len(),
            rows,
            "Laid out day sheet"
        );

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    fn write_header(
        &self,
        sheet: &mut Worksheet,
        day: &DaySheet<'_>,
        formats: &SheetFormats,
    ) -> Result<(), RenderError> {
        let project = &day.config.project;
        let date = self.shoot_date.unwrap_or_else(|| Local::now().date_naive());
        let row = template::BANNER_ROW;

        sheet
            .merge_range(row, 0, row, 10, &date_banner(date), &formats.banner)
            .map_err(format_error)?;
        let counter = format!("OD# {}/{}", day.day, project.total_days);
        sheet
            .merge_range(row, 11, row, template::LAST_COL, &counter, &formats.counter)
            .map_err(format_error)?;
        set_height(sheet, row, template::BANNER_HEIGHT_PX)?;

        let row = template::TITLE_ROW;
        let title = format!("{}\n{}", project.title, project.director);
        sheet
            .merge_range(row, 0, row, template::LAST_COL, &title, &formats.title)
            .map_err(format_error)?;
        set_height(sheet, row, template::TITLE_HEIGHT_PX)?;

        let row = template::INFO_ROW;
        sheet
            .merge_range(row, 0, row, 7, template::OBSERVATIONS, &formats.observations)
            .map_err(format_error)?;
        sheet
            .merge_range(row, 8, row, 10, template::ADDRESS, &formats.address)
            .map_err(format_error)?;
        sheet
            .merge_range(row, 11, row, template::LAST_COL, "", &formats.bordered)
            .map_err(format_error)?;
        set_height(sheet, row, template::INFO_HEIGHT_PX)?;

        Ok(())
    }

    /// Chronological table; returns the row after the last written one
    fn write_schedule(
        &self,
        sheet: &mut Worksheet,
        day: &DaySheet<'_>,
        formats: &SheetFormats,
    ) -> Result<u32, RenderError> {
        write_section(sheet, template::SCHEDULE_TITLE_ROW, template::SCHEDULE_TITLE, formats)?;

        let header_row = template::SCHEDULE_HEADER_ROW;
        for &(label, first, last) in &template::SCHEDULE_HEADERS {
            write_span(sheet, header_row, header_row, first, last, label, &formats.slot_header)?;
        }

        let mut row = template::SCHEDULE_FIRST_ROW;
        for activity in day.activities.iter() {
            row = match &activity.kind {
                ActivityKind::Fixed { label } => {
                    self.write_fixed(sheet, row, activity, label, formats)?
                }
                ActivityKind::Scene(scene) => self.write_scene(sheet, row, day, scene, formats)?,
                ActivityKind::Rec { text } => write_rec(sheet, row, text, formats)?,
            };
        }
        Ok(row)
    }

    fn write_fixed(
        &self,
        sheet: &mut Worksheet,
        row: u32,
        activity: &Activity,
        label: &str,
        formats: &SheetFormats,
    ) -> Result<u32, RenderError> {
        let color = (self.palette)(label);
        let time_format = formats.fixed_time.clone().set_background_color(color);
        let label_format = formats.fixed_label.clone().set_background_color(color);

        write_cell(sheet, row, col::HOUR, &activity.time_label(), &time_format)?;
        sheet
            .merge_range(
                row,
                col::SCENE,
                row,
                template::LAST_COL,
                label.trim_matches(|c: char| c == '-' || c == ' '),
                &label_format,
            )
            .map_err(format_error)?;
        Ok(row + 1)
    }

    fn write_scene(
        &self,
        sheet: &mut Worksheet,
        row: u32,
        day: &DaySheet<'_>,
        scene_ref: &SceneRef,
        formats: &SheetFormats,
    ) -> Result<u32, RenderError> {
        let scene = day.scene_for(scene_ref);
        if scene.is_none() {
            tracing::warn!(day = day.day, scene = %scene_ref.id, "Scene is not in the breakdown");
        }

        let description = scene
            .map(|s| s.description.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(scene_ref.description.as_str());
        let cast = scene.map(|s| s.cast_members().join(", ")).unwrap_or_default();
        let location = scene.map_or("", |s| s.location.as_str());
        let hints = scene.map(|s| (self.hints)(&s.continuity)).unwrap_or_default();
        let mut shots: Vec<&str> = scene
            .map(|s| s.shots.iter().map(|shot| shot.description.as_str()).collect())
            .unwrap_or_default();
        if shots.is_empty() {
            shots.push(UNDEFINED);
        }

        let last = row + shots.len() as u32 - 1;
        let scene_label = format!("CENA {}", scene_ref.id);
        let centered = &formats.scene_centered;
        let wrapped = &formats.scene_wrapped;
        let group: [(u16, u16, &str, &Format); 9] = [
            (col::HOUR, col::HOUR, "", centered),
            (col::SCENE, col::SCENE, scene_label.as_str(), centered),
            (col::DESCRIPTION, col::DESCRIPTION_END, description, wrapped),
            (col::CAST, col::CAST, cast.as_str(), centered),
            (col::SET, col::SET, location, centered),
            (col::WARDROBE, col::WARDROBE, hints.wardrobe.as_str(), wrapped),
            (col::ART, col::ART, hints.art.as_str(), wrapped),
            (col::MIC, col::MIC, "", centered),
            (col::CONTINUITY, col::CONTINUITY, "", centered),
        ];
        for (first, last_col, text, format) in group {
            write_span(sheet, row, last, first, last_col, text, format)?;
        }

        for (offset, shot) in shots.iter().enumerate() {
            let shot_row = row + offset as u32;
            sheet
                .write_blank(shot_row, col::SHOOTING_BOARD, wrapped)
                .map_err(format_error)?;
            sheet
                .write_string_with_format(shot_row, col::SHOTS, *shot, wrapped)
                .map_err(format_error)?;
            set_height(sheet, shot_row, template::SHOT_ROW_HEIGHT_PX)?;
        }

        Ok(last + 1)
    }
}

impl SheetFormats {
    fn new() -> Self {
        let base = |size: f64| {
            Format::new()
                .set_font_name(FONT)
                .set_font_size(size)
                .set_border(FormatBorder::Thin)
                .set_border_color(0x000000)
        };

        let banner = base(20.0)
            .set_bold()
            .set_font_color(0xFFFFFF)
            .set_background_color(fill::DARK)
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter);
        let counter = banner.clone().set_align(FormatAlign::Right);

        let section = base(20.0)
            .set_bold()
            .set_font_color(0xFFFFFF)
            .set_background_color(fill::DARK)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        let slot_header = base(19.0)
            .set_bold()
            .set_font_color(0x000000)
            .set_background_color(fill::LIGHT)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let centered = |size: f64| {
            base(size)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
        };

        Self {
            banner,
            counter,
            title: centered(76.0).set_bold().set_text_wrap(),
            observations: base(19.0)
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::Top)
                .set_text_wrap(),
            address: centered(20.0).set_text_wrap(),
            bordered: Format::new()
                .set_border(FormatBorder::Thin)
                .set_border_color(0x000000),
            section,
            slot_header,
            slot_value: centered(19.0),
            cast_cell: centered(11.0),
            fixed_time: centered(20.0),
            fixed_label: base(20.0)
                .set_bold()
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter),
            scene_centered: centered(20.0)
                .set_background_color(fill::SCENE)
                .set_text_wrap(),
            scene_wrapped: base(20.0)
                .set_background_color(fill::SCENE)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            rec_time: centered(20.0).set_background_color(fill::REC),
            rec_text: base(20.0)
                .set_bold()
                .set_background_color(fill::REC)
                .set_align(FormatAlign::Left)
                .set_align(FormatAlign::VerticalCenter),
        }
    }
}

impl DayRenderer for OdSheetRenderer {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn render_day(&self, sheet: &DaySheet<'_>) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(sheet)
    }
}

// ============================================================================
// Bands
// ============================================================================

/// Start times for the general-hours band: the day's timed activities when
/// there are enough of them, else the house defaults
pub fn general_hours(activities: &[Activity]) -> Vec<String> {
    let parsed: Vec<String> = activities
        .iter()
        .filter(|a| a.is_fixed())
        .filter_map(|a| a.start)
        .take(template::SLOT_SPANS.len())
        .map(|t| t.to_string())
        .collect();

    if parsed.len() < template::MIN_PARSED_HOURS {
        return template::DEFAULT_HOURS.iter().map(|s| s.to_string()).collect();
    }
    let mut hours = parsed;
    hours.resize(template::SLOT_SPANS.len(), String::new());
    hours
}

fn write_hours(
    sheet: &mut Worksheet,
    activities: &[Activity],
    formats: &SheetFormats,
) -> Result<(), RenderError> {
    write_section(sheet, template::HOURS_TITLE_ROW, template::HOURS_TITLE, formats)?;
    write_slots(sheet, template::HOURS_HEADER_ROW, &template::HOURS_HEADERS, &formats.slot_header)?;
    let hours = general_hours(activities);
    write_slots(sheet, template::HOURS_VALUE_ROW, &hours, &formats.slot_value)
}

fn write_crew(sheet: &mut Worksheet, formats: &SheetFormats) -> Result<(), RenderError> {
    write_section(sheet, template::CREW_TITLE_ROW, template::CREW_TITLE, formats)?;
    write_slots(sheet, template::CREW_HEADER_ROW, &template::CREW_HEADERS, &formats.slot_header)?;
    write_slots(sheet, template::CREW_VALUE_ROW, &template::CREW_CALLS, &formats.slot_value)
}

fn write_cast(sheet: &mut Worksheet, formats: &SheetFormats) -> Result<(), RenderError> {
    write_section(sheet, template::CAST_TITLE_ROW, template::CAST_TITLE, formats)?;
    write_slots(sheet, template::CAST_HEADER_ROW, &template::CAST_HEADERS, &formats.slot_header)?;
    let blanks = [""; 8];
    for offset in 0..template::CAST_BLANK_ROWS {
        write_slots(sheet, template::CAST_FIRST_ROW + offset, &blanks, &formats.cast_cell)?;
    }
    Ok(())
}

fn write_rec(
    sheet: &mut Worksheet,
    row: u32,
    text: &str,
    formats: &SheetFormats,
) -> Result<u32, RenderError> {
    sheet
        .write_blank(row, col::HOUR, &formats.rec_time)
        .map_err(format_error)?;
    sheet
        .merge_range(row, col::SCENE, row, template::LAST_COL, text, &formats.rec_text)
        .map_err(format_error)?;
    Ok(row + 1)
}

// ============================================================================
// Cell helpers
// ============================================================================

fn write_section(
    sheet: &mut Worksheet,
    row: u32,
    title: &str,
    formats: &SheetFormats,
) -> Result<(), RenderError> {
    sheet
        .merge_range(row, 0, row, template::LAST_COL, title, &formats.section)
        .map_err(format_error)?;
    Ok(())
}

/// Write one value per slot of an 8-slot band
fn write_slots<S: AsRef<str>>(
    sheet: &mut Worksheet,
    row: u32,
    values: &[S],
    format: &Format,
) -> Result<(), RenderError> {
    for (&(first, last), value) in template::SLOT_SPANS.iter().zip(values) {
        write_span(sheet, row, row, first, last, value.as_ref(), format)?;
    }
    Ok(())
}

/// Write a value over a cell range, merging only when it covers more than one cell
fn write_span(
    sheet: &mut Worksheet,
    first_row: u32,
    last_row: u32,
    first_col: u16,
    last_col: u16,
    text: &str,
    format: &Format,
) -> Result<(), RenderError> {
    if first_row == last_row && first_col == last_col {
        write_cell(sheet, first_row, first_col, text, format)?;
    } else {
        sheet
            .merge_range(first_row, first_col, last_row, last_col, text, format)
            .map_err(format_error)?;
    }
    Ok(())
}

/// Empty text still carries the cell format
fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &str,
    format: &Format,
) -> Result<(), RenderError> {
    if text.is_empty() {
        sheet.write_blank(row, col, format).map_err(format_error)?;
    } else {
        sheet
            .write_string_with_format(row, col, text, format)
            .map_err(format_error)?;
    }
    Ok(())
}

fn set_height(sheet: &mut Worksheet, row: u32, px: f64) -> Result<(), RenderError> {
    sheet
        .set_row_height(row, template::row_points(px))
        .map_err(format_error)?;
    Ok(())
}

fn format_error(e: XlsxError) -> RenderError {
    RenderError::Format(e.to_string())
}

// ============================================================================
// Tests
// ============================================================================
