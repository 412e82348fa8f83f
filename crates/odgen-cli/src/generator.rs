//! Generation runs: load inputs once, then render one or all days.
//!
//! Input failures (missing or malformed CSV, missing plan) abort the run
//! before anything is rendered. A day that fails to render is reported on
//! its own; in a batch the remaining days still get written.

use std::path::{Path, PathBuf};

use odgen_core::{
    od_name, Breakdown, ConfigSynthesizer, DayNumber, DayRenderer, DaySheet, ProjectConfig,
    RenderError,
};
use odgen_parser::{load_breakdown, load_plan, ParseError};
use thiserror::Error;

use crate::settings::Settings;

/// Generation error
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Input(#[from] ParseError),

    #[error("Cannot serialize project configuration: {0}")]
    ConfigJson(#[from] serde_json::Error),

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Day {0} is not in the project configuration")]
    UnknownDay(DayNumber),

    #[error("Cannot render day {day}: {source}")]
    Render {
        day: DayNumber,
        #[source]
        source: RenderError,
    },
}

/// Inputs of a run after loading and synthesis
#[derive(Clone, Debug)]
pub struct LoadedProject {
    pub breakdown: Breakdown,
    pub config: ProjectConfig,
}

/// Load the breakdown and the plan, and synthesize the project configuration
pub fn load_project(settings: &Settings) -> Result<LoadedProject, GenerateError> {
    let breakdown = load_breakdown(&settings.breakdown)?;
    let plan = load_plan(&settings.plan)?;
    let config = ConfigSynthesizer::new()
        .scenes_per_day(settings.scenes_per_day)
        .synthesize(&plan, &breakdown);
    tracing::info!(
        days = config.days.len(),
        title = %config.project.title,
        "Synthesized project configuration"
    );
    Ok(LoadedProject { breakdown, config })
}

/// Write the configuration JSON, replacing any previous version
pub fn write_config(config: &ProjectConfig, path: &Path) -> Result<(), GenerateError> {
    let json = config.to_json()?;
    create_parent(path)?;
    std::fs::write(path, json).map_err(|source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Saved project configuration to {}", path.display());
    Ok(())
}

/// Outcome of rendering every configured day
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Days written, with their output files
    pub written: Vec<(DayNumber, PathBuf)>,
    /// Days that failed to render or save
    pub failed: Vec<(DayNumber, GenerateError)>,
}

impl BatchReport {
    /// True only when every day was written
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.written.len() + self.failed.len()
    }
}

/// Orchestrates a generation run with a given output backend
#[derive(Debug)]
pub struct OdGenerator<R> {
    settings: Settings,
    renderer: R,
    loaded: Option<LoadedProject>,
}

impl<R: DayRenderer> OdGenerator<R> {
    pub fn new(settings: Settings, renderer: R) -> Self {
        Self {
            settings,
            renderer,
            loaded: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load inputs and persist the configuration, once per run
    pub fn prepare(&mut self) -> Result<&LoadedProject, GenerateError> {
        ensure_loaded(&self.settings, &mut self.loaded)
    }

    /// Render a single day to `<output_dir>/OD_Dia_<day>.<ext>`
    pub fn generate(&mut self, day: DayNumber) -> Result<PathBuf, GenerateError> {
        let project = ensure_loaded(&self.settings, &mut self.loaded)?;
        write_day(&self.renderer, &self.settings.output_dir, project, day)
    }

    /// Render every configured day, continuing past per-day failures
    pub fn generate_all(&mut self) -> Result<BatchReport, GenerateError> {
        let project = ensure_loaded(&self.settings, &mut self.loaded)?;
        let mut report = BatchReport::default();

        for day in project.config.day_numbers() {
            match write_day(&self.renderer, &self.settings.output_dir, project, day) {
                Ok(path) => report.written.push((day, path)),
                Err(err) => {
                    tracing::error!(day, "{err}");
                    report.failed.push((day, err));
                }
            }
        }

        tracing::info!(
            written = report.written.len(),
            failed = report.failed.len(),
            "Batch finished"
        );
        Ok(report)
    }
}

fn ensure_loaded<'a>(
    settings: &Settings,
    loaded: &'a mut Option<LoadedProject>,
) -> Result<&'a LoadedProject, GenerateError> {
    let project = match loaded.take() {
        Some(project) => project,
        None => {
            let project = load_project(settings)?;
            write_config(&project.config, &settings.config)?;
            project
        }
    };
    Ok(&*loaded.insert(project))
}

fn write_day<R: DayRenderer>(
    renderer: &R,
    output_dir: &Path,
    project: &LoadedProject,
    day: DayNumber,
) -> Result<PathBuf, GenerateError> {
    let plan = project
        .config
        .day(day)
        .ok_or(GenerateError::UnknownDay(day))?;
    let sheet = DaySheet::new(day, plan, &project.breakdown, &project.config);
    let bytes = renderer
        .render_day(&sheet)
        .map_err(|source| GenerateError::Render { day, source })?;

    std::fs::create_dir_all(output_dir).map_err(|source| GenerateError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;
    let path = output_dir.join(format!("{}.{}", od_name(day), renderer.extension()));
    std::fs::write(&path, bytes).map_err(|source| GenerateError::Write {
        path: path.clone(),
        source,
    })?;

    tracing::info!(day, activities = sheet.activities.len(), "Wrote {}", path.display());
    Ok(path)
}

fn create_parent(path: &Path) -> Result<(), GenerateError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| GenerateError::Write {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
