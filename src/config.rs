//! Run configuration.
//!
//! Settings come from a TOML file read once at startup. The file path is taken
//! from `--config`, else `$PPOLLS_CONFIG` (a `.env` file is honoured), else
//! `config.toml` in the working directory.
//!
//! ```toml
//! date_threshold = "2024-06-01"
//! award_policy = 2
//! poll_history_limit = 5
//! tossup_threshold = 3.0
//! ```
//!
//! The resulting `Settings` is immutable and passed by reference to whatever
//! needs it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::{AwardPolicy, EngineConfig, SideLabels};
use crate::error::AppError;

pub const ENV_CONFIG_PATH: &str = "PPOLLS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

const DEFAULT_SOURCE_URL: &str = "https://www.electoral-vote.com/evp2024/Pres/pres_polls.txt";

/// Raw file layout; validated into `Settings`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    date_threshold: String,
    award_policy: AwardPolicy,
    poll_history_limit: usize,
    tossup_threshold: f64,
    #[serde(default = "default_plot_width")]
    plot_width: u32,
    #[serde(default = "default_plot_height")]
    plot_height: u32,
    #[serde(default = "default_poll_year")]
    poll_year: i32,
    #[serde(default)]
    label_a: Option<String>,
    #[serde(default)]
    label_b: Option<String>,
    #[serde(default = "default_dir_csv")]
    dir_csv: PathBuf,
    #[serde(default = "default_dir_database")]
    dir_database: PathBuf,
    #[serde(default = "default_dir_plots")]
    dir_plots: PathBuf,
    #[serde(default = "default_dir_temp")]
    dir_temp: PathBuf,
    #[serde(default = "default_state_table_file")]
    state_table_file: PathBuf,
    #[serde(default = "default_poll_file_name")]
    poll_file_name: String,
    #[serde(default = "default_source_url")]
    source_url: String,
}

fn default_plot_width() -> u32 {
    800
}
fn default_plot_height() -> u32 {
    600
}
fn default_poll_year() -> i32 {
    2024
}
fn default_dir_csv() -> PathBuf {
    PathBuf::from("csv")
}
fn default_dir_database() -> PathBuf {
    PathBuf::from("database")
}
fn default_dir_plots() -> PathBuf {
    PathBuf::from("plots")
}
fn default_dir_temp() -> PathBuf {
    PathBuf::from("temp")
}
fn default_state_table_file() -> PathBuf {
    PathBuf::from("state_table.txt")
}
fn default_poll_file_name() -> String {
    "president_poll.txt".to_string()
}
fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

/// Validated run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// No polls ending before this date are used in reports or plots.
    pub date_threshold: NaiveDate,
    pub award_policy: AwardPolicy,
    /// Maximum number of polls averaged per state.
    pub poll_history_limit: usize,
    /// Margin below which a state is a tossup.
    pub tossup_threshold: f64,
    /// Chart size in pixels.
    pub plot_width: u32,
    pub plot_height: u32,
    /// Year applied to the month/day dates of the raw poll file.
    pub poll_year: i32,
    pub labels: SideLabels,
    pub dir_csv: PathBuf,
    pub dir_database: PathBuf,
    pub dir_plots: PathBuf,
    pub dir_temp: PathBuf,
    pub state_table_file: PathBuf,
    pub poll_file_name: String,
    pub source_url: String,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read config '{}': {e}", path.display())))?;
        let settings = Self::from_toml_str(&text)
            .map_err(|e| AppError::config(format!("Config '{}': {}", path.display(), e.message())))?;
        settings.log();
        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, AppError> {
        let raw: SettingsFile = toml::from_str(text).map_err(|e| AppError::config(format!("invalid TOML: {e}")))?;

        let date_threshold = NaiveDate::parse_from_str(raw.date_threshold.trim(), "%Y-%m-%d").map_err(|e| {
            AppError::config(format!("date_threshold '{}' is not YYYY-MM-DD: {e}", raw.date_threshold))
        })?;

        if raw.poll_history_limit == 0 {
            return Err(AppError::config("poll_history_limit must be at least 1"));
        }
        if !(raw.tossup_threshold.is_finite() && raw.tossup_threshold >= 0.0) {
            return Err(AppError::config("tossup_threshold must be a finite number >= 0"));
        }
        if raw.plot_width == 0 || raw.plot_height == 0 {
            return Err(AppError::config("plot_width and plot_height must be > 0"));
        }

        let defaults = SideLabels::default();
        let labels = SideLabels {
            a: raw.label_a.unwrap_or(defaults.a),
            b: raw.label_b.unwrap_or(defaults.b),
        };

        Ok(Self {
            date_threshold,
            award_policy: raw.award_policy,
            poll_history_limit: raw.poll_history_limit,
            tossup_threshold: raw.tossup_threshold,
            plot_width: raw.plot_width,
            plot_height: raw.plot_height,
            poll_year: raw.poll_year,
            labels,
            dir_csv: raw.dir_csv,
            dir_database: raw.dir_database,
            dir_plots: raw.dir_plots,
            dir_temp: raw.dir_temp,
            state_table_file: raw.state_table_file,
            poll_file_name: raw.poll_file_name,
            source_url: raw.source_url,
        })
    }

    /// Engine settings for one run.
    pub fn engine_config(&self, battleground_only: bool) -> EngineConfig {
        EngineConfig {
            max_poll_count: self.poll_history_limit,
            date_threshold: self.date_threshold,
            tossup_threshold: self.tossup_threshold,
            award_policy: self.award_policy,
            battleground_only,
        }
    }

    fn log(&self) {
        tracing::info!(
            date_threshold = %self.date_threshold,
            award_policy = u8::from(self.award_policy),
            poll_history_limit = self.poll_history_limit,
            tossup_threshold = self.tossup_threshold,
            plot_width = self.plot_width,
            plot_height = self.plot_height,
            "config loaded"
        );
    }
}

/// Resolve the config file path: explicit flag, then environment, then default.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }
    dotenvy::dotenv().ok();
    std::env::var(ENV_CONFIG_PATH)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
date_threshold = "2024-06-01"
award_policy = 2
poll_history_limit = 5
tossup_threshold = 3.0
"#;

    #[test]
    fn minimal_file_gets_defaults() {
        let s = Settings::from_toml_str(MINIMAL).unwrap();
        assert_eq!(s.date_threshold, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(s.award_policy, AwardPolicy::FlagOverlap);
        assert_eq!(s.poll_history_limit, 5);
        assert_eq!(s.plot_width, 800);
        assert_eq!(s.poll_year, 2024);
        assert_eq!(s.labels, SideLabels::default());
        assert_eq!(s.dir_database, PathBuf::from("database"));

        let engine = s.engine_config(true);
        assert_eq!(engine.max_poll_count, 5);
        assert!(engine.battleground_only);
    }

    #[test]
    fn overrides_are_applied() {
        let text = format!("{MINIMAL}label_a = \"Harris\"\nlabel_b = \"Trump\"\ndir_plots = \"out/plots\"\n");
        let s = Settings::from_toml_str(&text).unwrap();
        assert_eq!(s.labels.a, "Harris");
        assert_eq!(s.labels.b, "Trump");
        assert_eq!(s.dir_plots, PathBuf::from("out/plots"));
    }

    #[test]
    fn unsupported_policy_is_a_config_error() {
        let err = Settings::from_toml_str(&MINIMAL.replace("award_policy = 2", "award_policy = 4")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
        assert!(err.message().contains("award policy 4"), "{err}");
    }

    #[test]
    fn rejects_invalid_values() {
        for (from, to) in [
            ("\"2024-06-01\"", "\"06/01/2024\""),
            ("poll_history_limit = 5", "poll_history_limit = 0"),
            ("tossup_threshold = 3.0", "tossup_threshold = -1.0"),
            ("award_policy = 2", "award_policy = \"two\""),
        ] {
            assert!(Settings::from_toml_str(&MINIMAL.replace(from, to)).is_err(), "{to}");
        }
        assert!(Settings::from_toml_str(&format!("{MINIMAL}bogus = 1\n")).is_err());
    }

    #[test]
    fn explicit_path_wins() {
        let p = resolve_config_path(Some(Path::new("custom.toml")));
        assert_eq!(p, PathBuf::from("custom.toml"));
    }
}
