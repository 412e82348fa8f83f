//! End-to-end generation runs over on-disk fixtures.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx};
use chrono::NaiveDate;
use odgen_cli::{load_project, write_config, GenerateError, OdGenerator, Settings};
use odgen_core::{DayRenderer, DaySheet, ProjectConfig, RenderError};
use odgen_parser::ParseError;
use odgen_render::OdSheetRenderer;
use pretty_assertions::assert_eq;

const HEADER: &str = "CENA,LOCAÇÃO / SET,DESCRIÇÃO CENA,ELENCO,OBSERVAÇÕES CONTITNUIDADE,PLANOS\n";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn settings(dir: &Path, csv: &str, plan: &str) -> Settings {
    Settings {
        breakdown: write(dir, "DECUPAGEM.csv", csv),
        plan: write(dir, "PLANO_FINAL.txt", plan),
        config: dir.join("config_dias_filmagem.json"),
        output_dir: dir.join("ODs"),
        scenes_per_day: 3,
        shoot_date: None,
    }
}

fn renderer() -> OdSheetRenderer {
    OdSheetRenderer::new().date(NaiveDate::from_ymd_opt(2025, 8, 25).unwrap())
}

fn read_cell(path: &Path, sheet: &str, row: u32, col: u32) -> String {
    let bytes = std::fs::read(path).unwrap();
    let mut workbook = Xlsx::new(Cursor::new(bytes)).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Fails on one day, delegates the rest
struct FailingOn {
    day: u32,
    inner: OdSheetRenderer,
}

impl DayRenderer for FailingOn {
    fn extension(&self) -> &'static str {
        self.inner.extension()
    }

    fn render_day(&self, sheet: &DaySheet<'_>) -> Result<Vec<u8>, RenderError> {
        if sheet.day == self.day {
            return Err(RenderError::Format("simulated failure".into()));
        }
        self.inner.render_day(sheet)
    }
}

#[test]
fn scenario_a_single_day() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(
        dir.path(),
        &format!("{HEADER}7,STUDIO,Ana no estúdio,X/Y,,PG geral\n"),
        "diária 1:\n07h00 - 07h30 CHAMADA\n7 INT STUDIO scene text\nfim do dia\n",
    );
    let mut generator = OdGenerator::new(settings.clone(), renderer());

    let path = generator.generate(1).unwrap();
    assert_eq!(path, settings.output_dir.join("OD_Dia_1.xlsx"));

    assert_eq!(read_cell(&path, "OD_Dia_1", 22, 0), "07h00 - 07h30");
    assert_eq!(read_cell(&path, "OD_Dia_1", 22, 1), "CHAMADA");
    assert_eq!(read_cell(&path, "OD_Dia_1", 23, 1), "CENA 7");
    assert_eq!(read_cell(&path, "OD_Dia_1", 23, 7), "X, Y");
    assert_eq!(read_cell(&path, "OD_Dia_1", 24, 1), "");

    let json = std::fs::read_to_string(&settings.config).unwrap();
    let config = ProjectConfig::from_json(&json).unwrap();
    assert_eq!(config.project.total_days, 1);
    assert_eq!(config.days[&1].scenes, vec!["7".to_string()]);
    assert_eq!(config.days[&1].schedule.as_ref().map(Vec::len), Some(2));
}

#[test]
fn scenario_b_groups_scenes_without_markers() {
    let dir = tempfile::tempdir().unwrap();
    let csv: String = (1..=7)
        .map(|n| format!("{n},SET {n},,ANA,,PG {n}\n"))
        .fold(HEADER.to_string(), |acc, row| acc + &row);
    let settings = settings(dir.path(), &csv, "ROTEIRO SEM DIÁRIAS\n1 INT CASA\n");
    let mut generator = OdGenerator::new(settings.clone(), renderer());

    let report = generator.generate_all().unwrap();
    assert!(report.is_success());
    assert_eq!(report.total(), 3);

    let config = &generator.prepare().unwrap().config;
    assert_eq!(config.project.director, "A DEFINIR");
    assert_eq!(config.days[&3].scenes, vec!["7".to_string()]);

    let third = settings.output_dir.join("OD_Dia_3.xlsx");
    assert_eq!(read_cell(&third, "OD_Dia_3", 0, 11), "OD# 3/3");
    assert_eq!(read_cell(&third, "OD_Dia_3", 22, 1), "CENA 7");
    assert_eq!(read_cell(&third, "OD_Dia_3", 22, 6), "PG 7");
}

#[test]
fn scenario_c_failed_day_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(
        dir.path(),
        &format!("{HEADER}1,CASA,,,,PG\n2,RUA,,,,PG\n3,BAR,,,,PG\n"),
        "FILME\ndiária 1:\n1 INT CASA\ndiária 2:\n2 EXT RUA\ndiária 3:\n3 INT BAR\n",
    );
    let failing = FailingOn {
        day: 2,
        inner: renderer(),
    };
    let mut generator = OdGenerator::new(settings.clone(), failing);

    let report = generator.generate_all().unwrap();
    assert!(!report.is_success());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, 2);
    assert!(matches!(report.failed[0].1, GenerateError::Render { day: 2, .. }));

    assert!(settings.output_dir.join("OD_Dia_1.xlsx").is_file());
    assert!(!settings.output_dir.join("OD_Dia_2.xlsx").exists());
    assert!(settings.output_dir.join("OD_Dia_3.xlsx").is_file());

    // single-day mode reports the failure to the caller
    assert!(generator.generate(2).is_err());
}

#[test]
fn configuration_json_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(
        dir.path(),
        &format!("{HEADER}1,CASA,Café,ANA/JOÃO,blusa,PG\n,,,,,PP\n2,RUA,,,,\n"),
        "FILME\ndiária 1:\n07h00 CAFÉ\n1 INT CASA\nDIA ELENCO: ANA\nREC: passagem\nfim do dia\ndiária 2:\n2 EXT RUA\n",
    );

    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");
    write_config(&load_project(&settings).unwrap().config, &first).unwrap();
    write_config(&load_project(&settings).unwrap().config, &second).unwrap();

    let first = std::fs::read(first).unwrap();
    assert_eq!(first, std::fs::read(second).unwrap());
    assert!(String::from_utf8(first).unwrap().contains("\"CAFÉ\""));
}

#[test]
fn missing_breakdown_aborts_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(dir.path(), HEADER, "diária 1:\n1 INT CASA\n");
    settings.breakdown = dir.path().join("nao_existe.csv");
    let mut generator = OdGenerator::new(settings.clone(), renderer());

    let err = generator.generate_all().unwrap_err();
    assert!(matches!(err, GenerateError::Input(ParseError::Io { .. })));
    assert!(!settings.output_dir.exists());
    assert!(!settings.config.exists());
}

#[test]
fn missing_plan_aborts_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(dir.path(), &format!("{HEADER}1,CASA,,,,PG\n"), "");
    settings.plan = dir.path().join("PLANO_FINAL.pdf");
    let mut generator = OdGenerator::new(settings.clone(), renderer());

    assert!(generator.generate(1).is_err());
    assert!(!settings.output_dir.exists());
}

#[test]
fn unreadable_pdf_falls_back_to_grouping() {
    let dir = tempfile::tempdir().unwrap();
    let mut settings = settings(dir.path(), &format!("{HEADER}1,CASA,,,,PG\n2,RUA,,,,PG\n"), "");
    settings.plan = write(dir.path(), "PLANO_FINAL.pdf", "not a pdf");
    let mut generator = OdGenerator::new(settings, renderer());

    let project = generator.prepare().unwrap();
    assert_eq!(project.config.project.title, "PROJETO CASA");
    assert_eq!(project.config.days.len(), 1);
    assert!(generator.generate_all().unwrap().is_success());
}
