//! Stage entry points: cleaner, analyzer, modeler
//!
//! Each stage reads its inputs from disk, writes its artifacts to the output
//! directory and returns what it computed. `run_all` chains them.

pub mod analyzer;
pub mod cleaner;
pub mod modeler;

use std::path::Path;

use anyhow::Result;

use crate::pipeline::PipelineConfig;
use crate::report::{ArtifactStatus, RunSummary};
use crate::utils::{print_saved, print_warning};

/// Outcome of all three stages in one run
#[derive(Debug)]
pub struct RunOutcome {
    pub cleaned: cleaner::CleanOutcome,
    pub analysis: analyzer::AnalysisOutcome,
    pub model: modeler::ModelOutcome,
}

impl RunOutcome {
    /// Artifacts from every stage, in the order they were written
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::new();
        summary.extend(self.cleaned.artifacts.clone());
        summary.extend(self.analysis.artifacts.clone());
        summary.extend(self.model.artifacts.clone());
        summary
    }
}

/// Clean the source, then analyze and model the cleaned tables
pub fn run_all(config: &PipelineConfig) -> Result<RunOutcome> {
    let cleaned = cleaner::run(config)?;
    let analysis = analyzer::run(config)?;
    let model = modeler::run(config)?;
    Ok(RunOutcome {
        cleaned,
        analysis,
        model,
    })
}

/// Render a chart unless charts are disabled. A rendering failure is
/// reported and recorded but does not stop the stage.
pub(crate) fn emit_chart<F>(
    config: &PipelineConfig,
    path: &Path,
    artifacts: &mut RunSummary,
    render: F,
) -> ArtifactStatus
where
    F: FnOnce(&Path) -> Result<()>,
{
    let status = if !config.charts {
        ArtifactStatus::Skipped("charts disabled".to_string())
    } else {
        match render(path) {
            Ok(()) => {
                print_saved(path);
                ArtifactStatus::Written
            }
            Err(err) => {
                print_warning(&format!("Could not render {}: {:#}", path.display(), err));
                ArtifactStatus::Failed(err.to_string())
            }
        }
    };
    artifacts.record(path.to_path_buf(), status.clone());
    status
}
