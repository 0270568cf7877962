use metrics_exporter_prometheus::PrometheusHandle;
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use voter_match::error::AppError;
use voter_match::matching::{DirectoryImporter, InMemoryDirectory, RangePolicy};

const SAMPLE_ISSUES: &str = include_str!("../data/sample/issues.csv");
const SAMPLE_CANDIDATES: &str = include_str!("../data/sample/candidates.csv");
const SAMPLE_POSITIONS: &str = include_str!("../data/sample/candidate_positions.csv");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Directory bundled with the binary for demos and local development.
pub(crate) fn sample_directory() -> Result<InMemoryDirectory, AppError> {
    let directory = DirectoryImporter::from_readers(
        Cursor::new(SAMPLE_ISSUES),
        Cursor::new(SAMPLE_CANDIDATES),
        Cursor::new(SAMPLE_POSITIONS),
    )?;
    Ok(directory)
}

/// Load CSV exports from `dir`, or fall back to the bundled sample directory.
pub(crate) fn load_directory(dir: Option<&Path>) -> Result<InMemoryDirectory, AppError> {
    let directory = match dir {
        Some(path) => DirectoryImporter::from_dir(path)?,
        None => sample_directory()?,
    };

    info!(
        source = dir.map(|path| path.display().to_string()).unwrap_or_else(|| "sample".to_string()),
        issues = directory.issue_count(),
        candidates = directory.candidate_count(),
        positions = directory.position_count(),
        "candidate directory loaded"
    );

    Ok(directory)
}

pub(crate) fn parse_range_policy(raw: &str) -> Result<RangePolicy, String> {
    RangePolicy::parse(raw)
        .ok_or_else(|| format!("unknown range policy '{raw}' (expected reject or clamp)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use voter_match::matching::{CandidateStore, IssueStore};

    #[test]
    fn sample_directory_imports() {
        let directory = sample_directory().expect("sample data is valid");

        assert_eq!(directory.issue_count(), 5);
        assert_eq!(
            directory
                .candidates_in_region("77493")
                .expect("candidates")
                .len(),
            3
        );
        assert!(!directory.issues(Some("TX")).expect("issues").is_empty());
    }

    #[test]
    fn parses_range_policy_flags() {
        assert_eq!(parse_range_policy("clamp"), Ok(RangePolicy::Clamp));
        assert!(parse_range_policy("skip").is_err());
    }
}
