use std::collections::{HashMap, HashSet};

use super::domain::{Candidate, CandidateId, CandidatePosition, Issue};

/// Read access to quiz issues.
pub trait IssueStore: Send + Sync {
    /// Issues in creation order. With a region, only global issues and issues scoped to it.
    fn issues(&self, region: Option<&str>) -> Result<Vec<Issue>, DirectoryError>;
}

/// Read access to candidates and their declared positions.
pub trait CandidateStore: Send + Sync {
    fn candidates_in_region(&self, region: &str) -> Result<Vec<Candidate>, DirectoryError>;
    fn positions_for(
        &self,
        candidate_ids: &[CandidateId],
    ) -> Result<Vec<CandidatePosition>, DirectoryError>;
}

/// Error enumeration for directory lookups.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Immutable snapshot of the issue and candidate tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    issues: Vec<Issue>,
    candidates: Vec<Candidate>,
    positions: Vec<CandidatePosition>,
}

impl InMemoryDirectory {
    pub fn new(
        mut issues: Vec<Issue>,
        candidates: Vec<Candidate>,
        positions: Vec<CandidatePosition>,
    ) -> Self {
        issues.sort_by_key(|issue| issue.created_at);
        Self {
            issues,
            candidates,
            positions,
        }
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn candidate_count(&self) -> usize {
        self.candidates.len()
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }
}

impl IssueStore for InMemoryDirectory {
    fn issues(&self, region: Option<&str>) -> Result<Vec<Issue>, DirectoryError> {
        Ok(self
            .issues
            .iter()
            .filter(|issue| region.map_or(true, |region| issue.applies_to(region)))
            .cloned()
            .collect())
    }
}

impl CandidateStore for InMemoryDirectory {
    fn candidates_in_region(&self, region: &str) -> Result<Vec<Candidate>, DirectoryError> {
        Ok(self
            .candidates
            .iter()
            .filter(|candidate| candidate.serves(region))
            .cloned()
            .collect())
    }

    fn positions_for(
        &self,
        candidate_ids: &[CandidateId],
    ) -> Result<Vec<CandidatePosition>, DirectoryError> {
        let wanted: HashSet<&CandidateId> = candidate_ids.iter().collect();
        Ok(self
            .positions
            .iter()
            .filter(|row| wanted.contains(&row.candidate_id))
            .cloned()
            .collect())
    }
}

/// Group flat position rows by candidate, preserving row order within each group.
pub fn group_positions(
    rows: Vec<CandidatePosition>,
) -> HashMap<CandidateId, Vec<CandidatePosition>> {
    let mut grouped: HashMap<CandidateId, Vec<CandidatePosition>> = HashMap::new();
    for row in rows {
        grouped.entry(row.candidate_id.clone()).or_default().push(row);
    }
    grouped
}
