use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::warehouse::LoadPhase;

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A regional extract could not be found or read. Fatal for the run.
    #[error("source file {path} for region {region} is missing or unreadable: {reason}")]
    MissingSourceFile {
        region: String,
        path: PathBuf,
        reason: String,
    },

    #[error("stage '{stage}' requires column '{column}' which is absent")]
    RequiredColumnAbsent { stage: &'static str, column: String },

    #[error("snapshot {0} contains no rows; load aborted before any table mutation")]
    EmptySnapshot(PathBuf),

    #[error("invalid warehouse schema: {0}")]
    InvalidSchema(String),

    #[error("could not connect to the warehouse: {0}")]
    DatabaseConnectivity(#[source] sqlx::Error),

    #[error("warehouse query failed while {phase}: {source}")]
    QueryExecution {
        phase: LoadPhase,
        #[source]
        source: sqlx::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Frame(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub fn required_column(stage: &'static str, column: impl Into<String>) -> Self {
        PipelineError::RequiredColumnAbsent {
            stage,
            column: column.into(),
        }
    }

    pub fn query(phase: LoadPhase, source: sqlx::Error) -> Self {
        PipelineError::QueryExecution { phase, source }
    }
}
