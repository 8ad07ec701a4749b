use bankroll_core::model::Chips;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

const DEFAULT_STAGES: u32 = 4;
const MAX_STAGES: u32 = 8;
const MIN_SEATS: usize = 2;
const MAX_SEATS: usize = 10;
const NAME_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root simulation configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SimulationConfig {
    pub run_id: String,
    pub table: TableConfig,
    pub seats: Vec<SeatConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SimulationConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_name("run_id", &self.run_id)?;
        self.table.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        validate_seats(&mut self.seats)?;
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        let jsonl = resolve_template(&self.run_id, &self.outputs.jsonl);
        let telemetry = match self.outputs.telemetry.as_deref() {
            Some(template) => resolve_template(&self.run_id, template),
            None => jsonl
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
                .join("telemetry.jsonl"),
        };
        ResolvedOutputs { jsonl, telemetry }
    }
}

/// Table rules shared by every hand.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TableConfig {
    pub seed: Option<u64>,
    pub hands: usize,
    pub starting_bank: Chips,
    pub min_bet: Chips,
    #[serde(default = "default_stages")]
    pub stages: u32,
}

impl TableConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.hands == 0 {
            return Err(ValidationError::invalid(
                "table.hands",
                "number of hands must be greater than zero",
            ));
        }

        if self.starting_bank == 0 {
            return Err(ValidationError::invalid(
                "table.starting_bank",
                "starting bank must be greater than zero",
            ));
        }

        if self.min_bet == 0 || self.min_bet > self.starting_bank {
            return Err(ValidationError::invalid(
                "table.min_bet",
                "minimum bet must be positive and no larger than the starting bank",
            ));
        }

        if self.stages == 0 || self.stages > MAX_STAGES {
            return Err(ValidationError::invalid(
                "table.stages",
                format!("stages must be between 1 and {MAX_STAGES}"),
            ));
        }

        Ok(())
    }
}

fn default_stages() -> u32 {
    DEFAULT_STAGES
}

/// Definition of a seated participant.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SeatConfig {
    pub name: String,
    pub kind: SeatKind,
    #[serde(default)]
    pub params: serde_yaml::Value,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeatKind {
    /// The opponent-modeling agent.
    Bankroll,
    /// Checks when free, calls everything else.
    CallingStation,
    /// Checks when free, folds to any bet.
    Nit,
    /// Moves all-in every turn.
    Shover,
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    #[serde(default)]
    pub telemetry: Option<String>,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        let mut targets = vec![("outputs.jsonl", self.jsonl.as_str())];
        if let Some(telemetry) = self.telemetry.as_deref() {
            targets.push(("outputs.telemetry", telemetry));
        }

        for (label, value) in targets {
            if value.trim().is_empty() {
                return Err(ValidationError::invalid(label, "path must not be empty"));
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::invalid(label, "resolved path is invalid"));
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub decision_details: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            decision_details: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_name(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::invalid(field, "must not be empty"));
    }

    if !value.chars().all(|c| NAME_ALLOWED.contains(c)) {
        return Err(ValidationError::invalid(
            field,
            "may only contain alphanumeric characters, '.', '_' or '-'",
        ));
    }

    Ok(())
}

fn validate_seats(seats: &mut [SeatConfig]) -> Result<(), ValidationError> {
    if seats.len() < MIN_SEATS || seats.len() > MAX_SEATS {
        return Err(ValidationError::invalid(
            "seats",
            format!(
                "between {MIN_SEATS} and {MAX_SEATS} seats required, found {}",
                seats.len()
            ),
        ));
    }

    let mut seen = HashSet::new();
    for seat in seats.iter_mut() {
        validate_name(&format!("seats[{}].name", seat.name), &seat.name)?;

        if !seen.insert(seat.name.clone()) {
            return Err(ValidationError::invalid(
                "seats",
                format!("seat name '{}' defined more than once", seat.name),
            ));
        }

        if seat.params.is_null() {
            seat.params = serde_yaml::Value::Mapping(Default::default());
        }

        if !seat.params.is_mapping() {
            return Err(ValidationError::invalid(
                format!("seats[{}].params", seat.name),
                "params must be a mapping",
            ));
        }
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub telemetry: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

impl ValidationError {
    fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "heads_up_smoke"
table:
  seed: 123
  hands: 16
  starting_bank: 1000
  min_bet: 10
seats:
  - name: "modeler"
    kind: "bankroll"
    params:
      fold_bank_fraction: 0.3
  - name: "station"
    kind: "calling_station"
outputs:
  jsonl: "bench/out/{run_id}/hands.jsonl"
logging:
  enable_structured: true
  tracing_level: "debug"
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: SimulationConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.table.stages, DEFAULT_STAGES);
        assert!(cfg.logging.enable_structured);
        assert_eq!(cfg.logging.level(), Some(Level::DEBUG));
        assert_eq!(cfg.seats[1].kind, SeatKind::CallingStation);
        assert!(cfg.seats[1].params.is_mapping());

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/heads_up_smoke/hands.jsonl")
        );
        assert_eq!(
            outputs.telemetry,
            PathBuf::from("bench/out/heads_up_smoke/telemetry.jsonl")
        );
    }

    #[test]
    fn rejects_single_seat() {
        let yaml = BASIC_YAML.replace(
            "  - name: \"station\"\n    kind: \"calling_station\"\n",
            "",
        );
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "seats"
        ));
    }

    #[test]
    fn rejects_duplicate_seats() {
        let yaml = BASIC_YAML.replace("name: \"station\"", "name: \"modeler\"");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("duplicate seats should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "seats"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("heads_up_smoke", "heads up smoke");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_min_bet_above_bank() {
        let yaml = BASIC_YAML.replace("min_bet: 10", "min_bet: 5000");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("min bet too large");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "table.min_bet"
        ));
    }

    #[test]
    fn rejects_non_mapping_params() {
        let yaml = BASIC_YAML.replace("      fold_bank_fraction: 0.3\n", "      - 0.3\n");
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("list params");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "seats[modeler].params"
        ));
    }

    #[test]
    fn explicit_telemetry_path_resolves_template() {
        let yaml = BASIC_YAML.replace(
            "  jsonl: \"bench/out/{run_id}/hands.jsonl\"\n",
            "  jsonl: \"bench/out/{run_id}/hands.jsonl\"\n  telemetry: \"logs/{run_id}/{run_id}.jsonl\"\n",
        );
        let mut cfg: SimulationConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(
            cfg.resolved_outputs().telemetry,
            PathBuf::from("logs/heads_up_smoke/heads_up_smoke.jsonl")
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = SimulationConfig::from_path("does/not/exist.yaml").expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
        assert_eq!(err.path(), Path::new("does/not/exist.yaml"));
    }
}
