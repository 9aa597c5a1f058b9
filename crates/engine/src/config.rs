use regex::Regex;
use serde::Deserialize;

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub sheets: SheetSelection,
    #[serde(default)]
    pub target_column: TargetColumn,
    #[serde(default = "default_start_row")]
    pub start_row: u32,
    #[serde(default)]
    pub stop_strategy: StopStrategy,
    #[serde(default)]
    pub stop_row: Option<u32>,
    #[serde(default)]
    pub result_strategy: ResultStrategy,
    #[serde(default)]
    pub result_column: Option<u32>,
    #[serde(default)]
    pub partition_column: Option<u32>,
}

fn default_start_row() -> u32 {
    2
}

// ---------------------------------------------------------------------------
// Sheet selection
// ---------------------------------------------------------------------------

/// Which tabs to process: explicit names, 1-based positions, or both (union).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SheetSelection {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub positions: Vec<u32>,
}

impl SheetSelection {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.positions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Target column
// ---------------------------------------------------------------------------

/// Which column holds the signed amounts.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetColumn {
    /// Explicit 1-based column index.
    Index(u32),
    /// Regex matched against header-row text, anchored at the start.
    Pattern(String),
}

impl Default for TargetColumn {
    fn default() -> Self {
        Self::Pattern("^Amount.*".into())
    }
}

impl std::fmt::Display for TargetColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index(index) => write!(f, "index {index}"),
            Self::Pattern(pattern) => write!(f, "pattern '{pattern}'"),
        }
    }
}

// ---------------------------------------------------------------------------
// Stop strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopStrategy {
    OnBlank,
    EndOfSheet,
    AtRowIndex,
}

impl Default for StopStrategy {
    fn default() -> Self {
        Self::OnBlank
    }
}

/// Stop policy with its row bound folded in, ready for the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    OnBlank,
    EndOfSheet,
    AtRow(u32),
}

// ---------------------------------------------------------------------------
// Result placement strategy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStrategy {
    InsertRight,
    AddEnd,
    ExplicitIndex,
}

impl Default for ResultStrategy {
    fn default() -> Self {
        Self::InsertRight
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| EngineError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.sheets.is_empty() {
            return Err(EngineError::ConfigValidation(
                "at least one tab must be selected (names or positions)".into(),
            ));
        }
        if self.sheets.positions.iter().any(|&pos| pos == 0) {
            return Err(EngineError::ConfigValidation(
                "tab positions are 1-based, got 0".into(),
            ));
        }
        if self.start_row == 0 {
            return Err(EngineError::ConfigValidation(
                "start_row must be >= 1, got 0".into(),
            ));
        }
        match &self.target_column {
            TargetColumn::Index(0) => {
                return Err(EngineError::ConfigValidation(
                    "target column index must be >= 1, got 0".into(),
                ));
            }
            TargetColumn::Index(_) => {}
            TargetColumn::Pattern(pattern) => {
                if let Err(e) = Regex::new(pattern) {
                    return Err(EngineError::ConfigValidation(format!(
                        "invalid column pattern '{pattern}': {e}"
                    )));
                }
            }
        }
        self.scan_stop()?;
        self.validate_result()?;
        if self.partition_column == Some(0) {
            return Err(EngineError::ConfigValidation(
                "partition_column must be >= 1, got 0".into(),
            ));
        }
        Ok(())
    }

    /// Stop policy with the row bound resolved against the strategy.
    /// A stop row must be given if and only if the strategy is `at_row_index`.
    pub fn scan_stop(&self) -> Result<ScanStop, EngineError> {
        match (self.stop_strategy, self.stop_row) {
            (StopStrategy::AtRowIndex, Some(0)) => Err(EngineError::ConfigValidation(
                "stop_row must be >= 1, got 0".into(),
            )),
            (StopStrategy::AtRowIndex, Some(row)) => Ok(ScanStop::AtRow(row)),
            (StopStrategy::AtRowIndex, None) => Err(EngineError::ConfigValidation(
                "stop_row must be set when stop_strategy is at_row_index".into(),
            )),
            (StopStrategy::OnBlank, None) => Ok(ScanStop::OnBlank),
            (StopStrategy::EndOfSheet, None) => Ok(ScanStop::EndOfSheet),
            (_, Some(_)) => Err(EngineError::ConfigValidation(
                "stop_row only applies when stop_strategy is at_row_index".into(),
            )),
        }
    }

    fn validate_result(&self) -> Result<(), EngineError> {
        match (self.result_strategy, self.result_column) {
            (ResultStrategy::ExplicitIndex, Some(0)) => Err(EngineError::ConfigValidation(
                "result_column must be >= 1, got 0".into(),
            )),
            (ResultStrategy::ExplicitIndex, Some(_)) => Ok(()),
            (ResultStrategy::ExplicitIndex, None) => Err(EngineError::ConfigValidation(
                "result_column must be set when result_strategy is explicit_index".into(),
            )),
            (_, Some(_)) => Err(EngineError::ConfigValidation(
                "result_column only applies when result_strategy is explicit_index".into(),
            )),
            (_, None) => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
