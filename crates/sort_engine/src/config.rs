use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::domain::{clamp_array_size, AlgorithmId, Speed, ARRAY_SIZE_DEFAULT};
use thiserror::Error;

use crate::pacing::PAUSE_POLL_INTERVAL;

pub const SETTINGS_FILE: &str = "visualizer.toml";

const MIN_EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub array_size: usize,
    pub speed: Speed,
    pub algorithm: AlgorithmId,
    /// Fixed seed for reproducible sequences; entropy when absent.
    pub seed: Option<u64>,
    pub event_buffer: usize,
    pub pause_poll_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            array_size: ARRAY_SIZE_DEFAULT,
            speed: Speed::DEFAULT,
            algorithm: AlgorithmId::default(),
            seed: None,
            event_buffer: 4096,
            pause_poll_ms: PAUSE_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl EngineSettings {
    pub fn pause_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }

    /// Pulls every field back into its supported range.
    pub fn normalized(mut self) -> Self {
        let clamped = clamp_array_size(self.array_size);
        if clamped != self.array_size {
            tracing::warn!(
                requested = self.array_size,
                using = clamped,
                "array size out of range; clamping"
            );
            self.array_size = clamped;
        }
        self.event_buffer = self.event_buffer.max(MIN_EVENT_BUFFER);
        self.pause_poll_ms = self.pause_poll_ms.max(1);
        self
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub fn parse_settings(raw: &str) -> Result<EngineSettings, toml::de::Error> {
    toml::from_str(raw)
}

pub fn load_settings_from(path: &Path) -> Result<EngineSettings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_settings(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Defaults, then `visualizer.toml` in the working directory if present, then
/// `APP__*` environment variables.
pub fn load_settings() -> EngineSettings {
    let path = Path::new(SETTINGS_FILE);
    let mut settings = if path.exists() {
        match load_settings_from(path) {
            Ok(settings) => settings,
            Err(err) => {
                tracing::warn!("{err}; using defaults");
                EngineSettings::default()
            }
        }
    } else {
        EngineSettings::default()
    };

    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings.normalized()
}

pub fn apply_env_overrides(
    settings: &mut EngineSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("APP__ARRAY_SIZE") {
        match v.trim().parse::<usize>() {
            Ok(parsed) => settings.array_size = parsed,
            Err(err) => tracing::warn!(value = %v, "ignoring APP__ARRAY_SIZE: {err}"),
        }
    }

    if let Some(v) = lookup("APP__SPEED") {
        match v.trim().parse::<i64>() {
            Ok(parsed) => settings.speed = Speed::saturating(parsed),
            Err(err) => tracing::warn!(value = %v, "ignoring APP__SPEED: {err}"),
        }
    }

    if let Some(v) = lookup("APP__ALGORITHM") {
        match v.parse::<AlgorithmId>() {
            Ok(parsed) => settings.algorithm = parsed,
            Err(err) => tracing::warn!("ignoring APP__ALGORITHM: {err}"),
        }
    }

    if let Some(v) = lookup("APP__SEED") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.seed = Some(parsed),
            Err(err) => tracing::warn!(value = %v, "ignoring APP__SEED: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_match_the_control_surface() {
        let settings = EngineSettings::default();
        assert_eq!(settings.array_size, 50);
        assert_eq!(settings.speed, Speed::DEFAULT);
        assert_eq!(settings.algorithm, AlgorithmId::BubbleSort);
        assert_eq!(settings.pause_poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn parses_partial_toml_over_defaults() {
        let settings = parse_settings(
            r#"
            array_size = 120
            speed = 80
            algorithm = "heap_sort"
            "#,
        )
        .expect("parse");
        assert_eq!(settings.array_size, 120);
        assert_eq!(settings.speed.get(), 80);
        assert_eq!(settings.algorithm, AlgorithmId::HeapSort);
        assert_eq!(settings.seed, None);
        assert_eq!(settings.event_buffer, 4096);
    }

    #[test]
    fn rejects_out_of_range_speed_in_toml() {
        assert!(parse_settings("speed = 0").is_err());
        assert!(parse_settings("speed = 101").is_err());
    }

    #[test]
    fn env_overrides_win_and_bad_values_are_ignored() {
        let mut settings = EngineSettings::default();
        apply_env_overrides(
            &mut settings,
            lookup_from(&[
                ("APP__ARRAY_SIZE", "75"),
                ("APP__SPEED", "250"),
                ("APP__ALGORITHM", "quickSort"),
                ("APP__SEED", "not-a-number"),
            ]),
        );
        assert_eq!(settings.array_size, 75);
        assert_eq!(settings.speed, Speed::MAX);
        assert_eq!(settings.algorithm, AlgorithmId::QuickSort);
        assert_eq!(settings.seed, None);
    }

    #[test]
    fn normalizes_out_of_range_fields() {
        let settings = EngineSettings {
            array_size: 5_000,
            event_buffer: 0,
            pause_poll_ms: 0,
            ..EngineSettings::default()
        }
        .normalized();
        assert_eq!(settings.array_size, 200);
        assert_eq!(settings.event_buffer, MIN_EVENT_BUFFER);
        assert_eq!(settings.pause_poll_ms, 1);
    }

    #[test]
    fn loads_settings_file_and_reports_parse_errors_with_path() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let temp_root = env::temp_dir().join(format!("sort_visualizer_settings_{suffix}"));
        fs::create_dir_all(&temp_root).expect("temp root");

        let good = temp_root.join("good.toml");
        fs::write(&good, "seed = 42\narray_size = 10\n").expect("write good");
        let settings = load_settings_from(&good).expect("load good");
        assert_eq!(settings.seed, Some(42));
        assert_eq!(settings.array_size, 10);

        let bad = temp_root.join("bad.toml");
        fs::write(&bad, "array_size = \"many\"\n").expect("write bad");
        let err = load_settings_from(&bad).expect_err("bad settings");
        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));

        let missing = load_settings_from(&temp_root.join("missing.toml")).expect_err("missing");
        assert!(matches!(missing, SettingsError::Read { .. }));

        fs::remove_dir_all(temp_root).expect("cleanup");
    }
}
