//! Configuration synthesis
//!
//! Merges a scanned [`ShootingPlan`] with the scene [`Breakdown`] into the
//! [`ProjectConfig`] that drives rendering. When the plan yielded no days the
//! breakdown scenes are grouped into equal-sized days instead.

use crate::{Breakdown, DayPlan, ProjectConfig, ProjectInfo, ShootingPlan};
use std::collections::BTreeMap;

/// Title used when neither the plan nor the breakdown suggests one
pub const DEFAULT_TITLE: &str = "PROJETO DINÂMICO";

/// Placeholder for values left to be filled in by the production team
pub const UNDEFINED: &str = "A DEFINIR";

/// Scenes per day when grouping without a plan
pub const DEFAULT_SCENES_PER_DAY: usize = 3;

/// Builds the project configuration for one generation run
#[derive(Clone, Debug)]
pub struct ConfigSynthesizer {
    scenes_per_day: usize,
}

impl Default for ConfigSynthesizer {
    fn default() -> Self {
        Self {
            scenes_per_day: DEFAULT_SCENES_PER_DAY,
        }
    }
}

impl ConfigSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group size for the fallback schedule (values below 1 are treated as 1)
    pub fn scenes_per_day(mut self, scenes: usize) -> Self {
        self.scenes_per_day = scenes.max(1);
        self
    }

    /// Build the configuration, falling back to equal grouping for an empty plan
    pub fn synthesize(&self, plan: &ShootingPlan, breakdown: &Breakdown) -> ProjectConfig {
        if plan.is_empty() {
            tracing::info!(
                scenes = breakdown.len(),
                per_day = self.scenes_per_day,
                "Plan has no days, grouping breakdown scenes"
            );
            self.from_breakdown(plan, breakdown)
        } else {
            self.from_plan(plan, breakdown)
        }
    }

    fn from_plan(&self, plan: &ShootingPlan, breakdown: &Breakdown) -> ProjectConfig {
        let days: BTreeMap<_, _> = plan
            .days
            .iter()
            .map(|(&day, activities)| {
                let scenes = activities
                    .iter()
                    .filter_map(|a| a.as_scene())
                    .map(|s| s.id.clone())
                    .collect();
                let day_plan = DayPlan {
                    scenes,
                    main_location: UNDEFINED.to_string(),
                    schedule: Some(activities.clone()),
                };
                (day, day_plan)
            })
            .collect();

        ProjectConfig {
            project: ProjectInfo {
                title: resolve_title(plan.title.as_deref(), breakdown),
                director: String::new(),
                total_days: days.len() as u32,
            },
            days,
        }
    }

    fn from_breakdown(&self, plan: &ShootingPlan, breakdown: &Breakdown) -> ProjectConfig {
        let ids: Vec<&str> = breakdown.ids().collect();
        let days: BTreeMap<_, _> = ids
            .chunks(self.scenes_per_day)
            .enumerate()
            .map(|(i, chunk)| {
                let day_plan = DayPlan {
                    scenes: chunk.iter().map(|id| (*id).to_string()).collect(),
                    main_location: UNDEFINED.to_string(),
                    schedule: None,
                };
                (i as u32 + 1, day_plan)
            })
            .collect();

        ProjectConfig {
            project: ProjectInfo {
                title: resolve_title(plan.title.as_deref(), breakdown),
                director: UNDEFINED.to_string(),
                total_days: days.len() as u32,
            },
            days,
        }
    }
}

/// Plan title, then a placeholder named after the first scene's location, then the default
pub fn resolve_title(plan_title: Option<&str>, breakdown: &Breakdown) -> String {
    if let Some(title) = plan_title.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    breakdown
        .iter()
        .next()
        .map(|scene| scene.location.trim())
        .filter(|location| !location.is_empty())
        .map(|location| format!("PROJETO {}", location.to_uppercase()))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Activity, ClockTime, LocationType, Scene};
    use pretty_assertions::assert_eq;

    fn breakdown_of(ids: &[&str]) -> Breakdown {
        let mut breakdown = Breakdown::new();
        for id in ids {
            breakdown.insert(Scene::new(*id));
        }
        breakdown
    }

    #[test]
    fn plan_days_become_config_days() {
        let mut plan = ShootingPlan::new();
        plan.title = Some("CURTA".into());
        plan.push(
            1,
            Activity::fixed("CHAMADA")
                .starts(ClockTime::new(7, 0))
                .ends(ClockTime::new(7, 30)),
        );
        plan.push(1, Activity::scene("7", LocationType::Interior, "STUDIO"));
        plan.push(1, Activity::rec("REC: passagem"));
        plan.push(1, Activity::scene("7", LocationType::Interior, "STUDIO de novo"));
        plan.open_day(4);

        let config = ConfigSynthesizer::new().synthesize(&plan, &breakdown_of(&["7"]));

        assert_eq!(config.project.title, "CURTA");
        assert_eq!(config.project.director, "");
        assert_eq!(config.project.total_days, 2);
        let day1 = config.day(1).unwrap();
        assert_eq!(day1.scenes, vec!["7", "7"]);
        assert_eq!(day1.schedule.as_ref().unwrap().len(), 4);
        assert_eq!(day1.main_location, UNDEFINED);
        assert!(config.day(4).unwrap().scenes.is_empty());
    }

    #[test]
    fn empty_plan_groups_scenes_by_three() {
        let breakdown = breakdown_of(&["1", "2", "3", "4", "5", "6", "7"]);
        let config = ConfigSynthesizer::new().synthesize(&ShootingPlan::new(), &breakdown);

        assert_eq!(config.project.total_days, 3);
        assert_eq!(config.project.director, UNDEFINED);
        assert_eq!(config.day(1).unwrap().scenes, vec!["1", "2", "3"]);
        assert_eq!(config.day(3).unwrap().scenes, vec!["7"]);
        assert!(config.day(1).unwrap().schedule.is_none());
    }

    #[test]
    fn custom_group_size() {
        let breakdown = breakdown_of(&["a", "b", "c", "d"]);
        let config = ConfigSynthesizer::new()
            .scenes_per_day(0)
            .synthesize(&ShootingPlan::new(), &breakdown);
        assert_eq!(config.project.total_days, 4);
    }

    #[test]
    fn empty_breakdown_and_plan_yield_no_days() {
        let config = ConfigSynthesizer::new().synthesize(&ShootingPlan::new(), &Breakdown::new());
        assert_eq!(config.project.total_days, 0);
        assert!(config.days.is_empty());
        assert_eq!(config.project.title, DEFAULT_TITLE);
    }

    #[test]
    fn title_resolution_order() {
        let mut breakdown = Breakdown::new();
        breakdown.insert(Scene::new("1").location("Casa da Ana"));

        assert_eq!(resolve_title(Some("  FILME  "), &breakdown), "FILME");
        assert_eq!(resolve_title(Some("   "), &breakdown), "PROJETO CASA DA ANA");
        assert_eq!(resolve_title(None, &Breakdown::new()), DEFAULT_TITLE);
    }

    #[test]
    fn json_is_stable_across_runs() {
        let mut plan = ShootingPlan::new();
        plan.title = Some("FILME".into());
        plan.push(2, Activity::scene("3", LocationType::Exterior, "RUA"));
        plan.push(1, Activity::fixed("CAFÉ").starts(ClockTime::new(6, 30)));
        let breakdown = breakdown_of(&["3"]);

        let synth = ConfigSynthesizer::new();
        let first = synth.synthesize(&plan, &breakdown).to_json().unwrap();
        let second = synth.synthesize(&plan, &breakdown).to_json().unwrap();
        assert_eq!(first, second);
        assert!(first.contains("CAFÉ"));

        let back = ProjectConfig::from_json(&first).unwrap();
        assert_eq!(back.day_numbers().collect::<Vec<_>>(), vec![1, 2]);
    }
}
