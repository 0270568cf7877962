mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};

use super::directory::InMemoryDirectory;
use super::domain::{Candidate, CandidateId, CandidatePosition, Issue, IssueCategory, IssueId};
use super::guard::POSITION_RANGE;
use parser::{CandidateRow, IssueRow, PositionRow};

pub const ISSUES_FILE: &str = "issues.csv";
pub const CANDIDATES_FILE: &str = "candidates.csv";
pub const POSITIONS_FILE: &str = "candidate_positions.csv";

#[derive(Debug)]
pub enum DirectoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { table: &'static str, detail: String },
}

impl std::fmt::Display for DirectoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryImportError::Io(err) => write!(f, "failed to read directory export: {}", err),
            DirectoryImportError::Csv(err) => write!(f, "invalid directory CSV data: {}", err),
            DirectoryImportError::InvalidRow { table, detail } => {
                write!(f, "invalid row in {}: {}", table, detail)
            }
        }
    }
}

impl std::error::Error for DirectoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DirectoryImportError::Io(err) => Some(err),
            DirectoryImportError::Csv(err) => Some(err),
            DirectoryImportError::InvalidRow { .. } => None,
        }
    }
}

impl From<std::io::Error> for DirectoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DirectoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Builds an [`InMemoryDirectory`] from CSV exports of the issue, candidate, and
/// candidate position tables.
pub struct DirectoryImporter;

impl DirectoryImporter {
    /// Load `issues.csv`, `candidates.csv`, and `candidate_positions.csv` from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<InMemoryDirectory, DirectoryImportError> {
        let dir = dir.as_ref();
        let issues = std::fs::File::open(dir.join(ISSUES_FILE))?;
        let candidates = std::fs::File::open(dir.join(CANDIDATES_FILE))?;
        let positions = std::fs::File::open(dir.join(POSITIONS_FILE))?;
        Self::from_readers(issues, candidates, positions)
    }

    pub fn from_readers<I, C, P>(
        issues: I,
        candidates: C,
        positions: P,
    ) -> Result<InMemoryDirectory, DirectoryImportError>
    where
        I: Read,
        C: Read,
        P: Read,
    {
        let issues = parser::parse_rows::<IssueRow, _>(issues)?
            .into_iter()
            .enumerate()
            .map(|(index, row)| issue_from_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;

        let candidates: Vec<Candidate> = parser::parse_rows::<CandidateRow, _>(candidates)?
            .into_iter()
            .map(candidate_from_row)
            .collect();

        let issue_ids: HashSet<&IssueId> = issues.iter().map(|issue| &issue.id).collect();
        let candidate_ids: HashSet<&CandidateId> =
            candidates.iter().map(|candidate| &candidate.id).collect();

        let mut rows = Vec::new();
        for row in parser::parse_rows::<PositionRow, _>(positions)? {
            let position = position_from_row(row);
            check_position(&position, &issue_ids, &candidate_ids)?;
            rows.push(position);
        }

        Ok(InMemoryDirectory::new(issues, candidates, rows))
    }
}

fn issue_from_row(index: usize, row: IssueRow) -> Result<Issue, DirectoryImportError> {
    let category =
        IssueCategory::parse(&row.category).ok_or_else(|| DirectoryImportError::InvalidRow {
            table: "issues",
            detail: format!("issue {} has unknown category '{}'", row.id, row.category),
        })?;

    let created_at = match row.created_at.as_deref() {
        Some(raw) => {
            parser::parse_timestamp(raw).ok_or_else(|| DirectoryImportError::InvalidRow {
                table: "issues",
                detail: format!("issue {} has unparseable created_at '{}'", row.id, raw),
            })?
        }
        None => fallback_timestamp(index),
    };

    Ok(Issue {
        id: IssueId(row.id),
        title: row.title,
        slug: row.slug,
        description: row.description,
        category,
        locations: row.locations,
        created_at,
    })
}

/// Rows without a timestamp keep file order by sorting on their row index.
fn fallback_timestamp(index: usize) -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::seconds(index as i64)
}

fn candidate_from_row(row: CandidateRow) -> Candidate {
    Candidate {
        id: CandidateId(row.id),
        name: row.name,
        office: row.office,
        party: row.party,
        bio: row.bio,
        zip_codes: row.zip_codes,
    }
}

fn position_from_row(row: PositionRow) -> CandidatePosition {
    CandidatePosition {
        candidate_id: CandidateId(row.candidate_id),
        issue_id: IssueId(row.issue_id),
        position: row.position,
    }
}

fn check_position(
    position: &CandidatePosition,
    issue_ids: &HashSet<&IssueId>,
    candidate_ids: &HashSet<&CandidateId>,
) -> Result<(), DirectoryImportError> {
    let invalid = |detail: String| DirectoryImportError::InvalidRow {
        table: "candidate_positions",
        detail,
    };

    if !candidate_ids.contains(&position.candidate_id) {
        return Err(invalid(format!(
            "unknown candidate {}",
            position.candidate_id
        )));
    }
    if !issue_ids.contains(&position.issue_id) {
        return Err(invalid(format!("unknown issue {}", position.issue_id)));
    }
    if !POSITION_RANGE.contains(&position.position) {
        return Err(invalid(format!(
            "position {} for {} on {} outside 1-5",
            position.position, position.candidate_id, position.issue_id
        )));
    }

    Ok(())
}
