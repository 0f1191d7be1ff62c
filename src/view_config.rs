use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::load::DatasetError;

/// How a raw stat column turns into a comparable rate. Which columns get
/// which transform is a per-view choice, never a global rule: counting stats
/// are normalized per 90 minutes, columns that are already rate-like
/// (percentages, per-shot ratios) pass through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatTransform {
    #[default]
    Per90,
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSpec {
    /// CSV column holding the raw value.
    pub column: String,
    #[serde(default)]
    pub transform: StatTransform,
    /// Human-readable name for chart axes; defaults to the column name.
    #[serde(default)]
    pub label: Option<String>,
}

impl StatSpec {
    pub fn per90(column: &str, label: &str) -> StatSpec {
        StatSpec {
            column: column.to_string(),
            transform: StatTransform::Per90,
            label: Some(label.to_string()),
        }
    }

    pub fn passthrough(column: &str, label: &str) -> StatSpec {
        StatSpec {
            column: column.to_string(),
            transform: StatTransform::Passthrough,
            label: Some(label.to_string()),
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.column)
    }
}

/// One dashboard view's worth of percentile configuration: the cohort
/// definition plus the stat columns it compares.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub name: String,
    /// Position code the cohort is filtered to (e.g. "FW", "MF", "DF").
    pub position: String,
    #[serde(default = "default_min_minutes")]
    pub min_minutes: u32,
    pub stats: Vec<StatSpec>,
}

fn default_min_minutes() -> u32 {
    300
}

impl ViewConfig {
    pub fn from_json(raw: &str) -> Result<ViewConfig, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<ViewConfig, DatasetError> {
        let source_name = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            source_name: source_name.clone(),
            source,
        })?;
        ViewConfig::from_json(&raw).map_err(|source| DatasetError::Json {
            source_name,
            source,
        })
    }

    /// Column names to request from the player stats loader.
    pub fn stat_columns(&self) -> Vec<&str> {
        self.stats.iter().map(|s| s.column.as_str()).collect()
    }
}

/// The stat sets the shipped dashboard views compare per position.
pub static BUILTIN_VIEWS: Lazy<Vec<ViewConfig>> =
    Lazy::new(|| vec![forwards_view(), midfielders_view(), defenders_view()]);

pub fn builtin_view(name: &str) -> Option<&'static ViewConfig> {
    BUILTIN_VIEWS
        .iter()
        .find(|v| v.name.eq_ignore_ascii_case(name))
}

fn forwards_view() -> ViewConfig {
    ViewConfig {
        name: "forwards".to_string(),
        position: "FW".to_string(),
        min_minutes: 300,
        stats: vec![
            StatSpec::per90("G-PK", "Goals without penalties"),
            StatSpec::per90("Ast", "Assists"),
            StatSpec::per90("xG", "Expected goals"),
            StatSpec::per90("xAG", "Expected assists"),
            StatSpec::per90("PrgR", "Progressive runs"),
            StatSpec::passthrough("SCA90", "Shot creating actions"),
            StatSpec::passthrough("CrsPA", "Crosses into penalty area"),
            StatSpec::passthrough("Succ%", "Successful take-ons"),
            StatSpec::passthrough("G/SoT", "Goals per shot on target"),
            StatSpec::passthrough("SoT%", "Shots on target %"),
            StatSpec::passthrough("Sh/90", "Shots"),
            StatSpec::passthrough("Won%", "Aerial duels won"),
        ],
    }
}

fn midfielders_view() -> ViewConfig {
    ViewConfig {
        name: "midfielders".to_string(),
        position: "MF".to_string(),
        min_minutes: 300,
        stats: vec![
            StatSpec::per90("Cmp", "Passes completed"),
            StatSpec::per90("PrgP", "Progressive passes"),
            StatSpec::per90("1/3", "Passes into final third"),
            StatSpec::per90("SCA", "Shot creating actions"),
            StatSpec::per90("Int", "Interceptions"),
            StatSpec::per90("Blocks", "Balls blocked"),
            StatSpec::per90("xAG", "Expected assisted goals"),
            StatSpec::per90("Carries 1/3", "Carries into final 1/3"),
            StatSpec::per90("Gls", "Goals"),
            StatSpec::per90("Touches", "Touches"),
            StatSpec::passthrough("Long Cmp%", "Long passes completed %"),
            StatSpec::per90("Clr", "Clearances"),
        ],
    }
}

fn defenders_view() -> ViewConfig {
    ViewConfig {
        name: "defenders".to_string(),
        position: "DF".to_string(),
        min_minutes: 300,
        stats: vec![
            StatSpec::per90("Fls", "Fouls"),
            StatSpec::per90("Int", "Interceptions"),
            StatSpec::per90("Clr", "Clearances"),
            StatSpec::per90("Err", "Errors"),
            StatSpec::per90("Blocks", "Blocked passes and shots"),
            StatSpec::per90("Def 3rd", "Tackles in defensive 1/3"),
            StatSpec::per90("Mid 3rd", "Tackles in middle 1/3"),
            StatSpec::per90("Att 3rd", "Tackles in attacking 1/3"),
            StatSpec::per90("PrgDist", "Progressive carrying distance"),
            StatSpec::per90("Ast", "Assists"),
            StatSpec::per90("CrdR", "Red cards"),
            StatSpec::per90("CrdY", "Yellow cards"),
            StatSpec::passthrough("Tkl%", "% of tackles won"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::{builtin_view, StatTransform, ViewConfig};

    #[test]
    fn builtin_views_resolve_by_name() {
        let fw = builtin_view("Forwards").expect("forwards view");
        assert_eq!(fw.position, "FW");
        assert_eq!(fw.min_minutes, 300);
        assert!(builtin_view("goalkeepers").is_none());
    }

    #[test]
    fn view_config_json_defaults() {
        let cfg = ViewConfig::from_json(
            r#"{
                "name": "wingers",
                "position": "FW",
                "stats": [
                    {"column": "Crs"},
                    {"column": "Succ%", "transform": "passthrough", "label": "Take-on success"}
                ]
            }"#,
        )
        .expect("valid config");
        assert_eq!(cfg.min_minutes, 300);
        assert_eq!(cfg.stats[0].transform, StatTransform::Per90);
        assert_eq!(cfg.stats[0].display_label(), "Crs");
        assert_eq!(cfg.stats[1].transform, StatTransform::Passthrough);
        assert_eq!(cfg.stats[1].display_label(), "Take-on success");
        assert_eq!(cfg.stat_columns(), vec!["Crs", "Succ%"]);
    }
}
