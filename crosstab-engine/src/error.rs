//! FILENAME: crosstab-engine/src/error.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Plan area a key or a missing configuration refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlanArea {
    RowDimensions,
    ColumnDimensions,
    ValueSpecs,
}

impl fmt::Display for PlanArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlanArea::RowDimensions => "row dimensions",
            PlanArea::ColumnDimensions => "column dimensions",
            PlanArea::ValueSpecs => "value specs",
        };
        f.write_str(name)
    }
}

/// Hard configuration/input errors surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PivotConfigError {
    #[error("Unknown column '{key}' referenced in {area}")]
    UnknownColumn { key: String, area: PlanArea },

    #[error("Row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
}

/// "Not ready" signal: the plan lacks one or more areas.
/// Recoverable and expected while a plan is being configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigIncomplete {
    pub missing: Vec<PlanArea>,
}

impl fmt::Display for ConfigIncomplete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.missing.iter().map(|a| a.to_string()).collect();
        write!(f, "pivot plan has no {}", names.join(", "))
    }
}
