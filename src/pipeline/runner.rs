use chrono::{DateTime, Utc};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::Stage;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processor::{Canonicalizer, DomainFilter, FieldConsolidator, StructuralCleaner, Unifier};
use crate::storage::{SnapshotWriter, SourceReader};

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub attempts: u32,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub input_rows: usize,
    pub output_rows: usize,
    pub stages: Vec<StageReport>,
    pub snapshot_path: Option<PathBuf>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            input_rows: 0,
            output_rows: 0,
            stages: Vec::new(),
            snapshot_path: None,
        }
    }

    fn record(&mut self, stage: &str, attempts: u32, df: &DataFrame) {
        self.stages.push(StageReport {
            stage: stage.to_string(),
            attempts,
            rows: df.height(),
            columns: df.width(),
        });
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the transformation stages in declared order, threading each stage's
/// output into the next. A stage that still fails after its retries aborts the run.
pub struct Pipeline {
    reader: SourceReader,
    unifier: Unifier,
    stages: Vec<Box<dyn Stage>>,
    writer: SnapshotWriter,
    retries: u32,
}

impl Pipeline {
    pub fn new(reader: SourceReader, writer: SnapshotWriter, retries: u32) -> Self {
        Self {
            reader,
            unifier: Unifier::new(),
            stages: Self::default_stages(),
            writer,
            retries,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            SourceReader::new(config.sources.region_paths()),
            SnapshotWriter::new(&config.snapshot.path),
            config.pipeline.retries,
        )
    }

    /// Stages 3 to 6, in the order they must run.
    pub fn default_stages() -> Vec<Box<dyn Stage>> {
        vec![
            Box::new(StructuralCleaner::new()),
            Box::new(FieldConsolidator::new()),
            Box::new(DomainFilter::new()),
            Box::new(Canonicalizer::new()),
        ]
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    /// Reads, transforms and writes the snapshot.
    pub fn run(&self) -> Result<RunReport> {
        let mut report = RunReport::new();
        info!("Starting pipeline run {}", report.run_id);

        let (extracts, _) = self.with_retries("source_reader", || self.reader.read_all())?;
        report.input_rows = extracts.iter().map(|e| e.height()).sum();

        let (df, attempts) = self.with_retries("unifier", || self.unifier.unify(&extracts))?;
        report.record("unifier", attempts, &df);

        let df = self.transform(df, &mut report)?;

        let (_, attempts) = self.with_retries("snapshot_writer", || self.writer.write(&df))?;
        report.record("snapshot_writer", attempts, &df);

        report.output_rows = df.height();
        report.snapshot_path = Some(self.writer.path().to_path_buf());
        report.finished_at = Some(Utc::now());

        info!(
            "Pipeline run {} finished: {} input rows -> {} output rows",
            report.run_id, report.input_rows, report.output_rows
        );
        Ok(report)
    }

    /// Runs only the in-memory stages on an already unified dataset.
    pub fn transform(&self, mut df: DataFrame, report: &mut RunReport) -> Result<DataFrame> {
        for stage in &self.stages {
            let input = df;
            let (output, attempts) = self.with_retries(stage.name(), || stage.apply(input.clone()))?;
            info!("After {}, shape: {:?}", stage.name(), output.shape());
            report.record(stage.name(), attempts, &output);
            df = output;
        }
        Ok(df)
    }

    fn with_retries<T>(&self, stage: &str, mut op: impl FnMut() -> Result<T>) -> Result<(T, u32)> {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(value) => return Ok((value, attempt)),
                Err(e) if attempt <= self.retries => {
                    warn!(
                        "Stage {} failed on attempt {}/{}: {}",
                        stage,
                        attempt,
                        self.retries + 1,
                        e
                    );
                    attempt += 1;
                }
                Err(e) => {
                    error!("Stage {} failed after {} attempts: {}", stage, attempt, e);
                    return Err(e);
                }
            }
        }
    }
}
