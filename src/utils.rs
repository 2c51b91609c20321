use std::path::{Path, PathBuf};

use rand::{Rng, distr::Alphanumeric};

use crate::{
    resolver::ResolutionReport,
    sync::SyncSummary,
    types::{SummaryTableRow, UnresolvedTableRow},
};

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Resolves the reference file against the working directory.
///
/// Absolute paths are returned unchanged.
pub fn resolve_reference_path(file: &Path) -> PathBuf {
    if file.is_absolute() {
        return file.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(file))
        .unwrap_or_else(|_| file.to_path_buf())
}

pub fn unresolved_table_rows(report: &ResolutionReport) -> Vec<UnresolvedTableRow> {
    report
        .unresolved
        .iter()
        .map(|(reference, reason)| UnresolvedTableRow {
            reference: reference.original().to_string(),
            reason: reason.to_string(),
        })
        .collect()
}

pub fn summary_table_row(summary: &SyncSummary) -> SummaryTableRow {
    SummaryTableRow {
        detected: summary.detected,
        resolved: summary.resolved,
        unresolved: summary.unresolved,
        new: summary.new,
        added: summary.added,
    }
}
