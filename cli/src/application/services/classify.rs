//! Application service: project classification use-case.

use std::path::Path;

use siteship_common::ProjectAnalysis;

use crate::application::ports::ProjectInspector;
use crate::domain::classify_snapshot;

/// Classify the directory at `path`.
///
/// Never fails. A missing or unreadable path yields an `unknown` analysis
/// carrying a warning.
pub fn classify(inspector: &impl ProjectInspector, path: &Path) -> ProjectAnalysis {
    let snapshot = inspector.snapshot(path);
    let analysis = classify_snapshot(&snapshot);
    tracing::debug!(
        path = %path.display(),
        project_type = %analysis.project_type,
        strategy = %analysis.strategy,
        files = analysis.total_files,
        "classified project"
    );
    analysis
}
