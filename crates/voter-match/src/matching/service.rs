use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::directory::{group_positions, CandidateStore, DirectoryError, IssueStore};
use super::domain::{CandidateId, Issue, IssueId, MatchResult};
use super::guard::{MatchRequest, RangePolicy, ResponseGuard, ValidationError};
use super::scoring::MatchScorer;

pub const NO_CANDIDATES_MESSAGE: &str = "No candidates found for your area";

/// Ranked matches for one quiz session. An empty list is a valid outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub success: bool,
    pub matches: Vec<MatchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MatchOutcome {
    fn ranked(matches: Vec<MatchResult>) -> Self {
        Self {
            success: true,
            matches,
            message: None,
        }
    }

    fn no_candidates() -> Self {
        Self {
            success: true,
            matches: Vec::new(),
            message: Some(NO_CANDIDATES_MESSAGE.to_string()),
        }
    }
}

/// Service composing the response guard, directory stores, and scorer.
pub struct MatchService<I, C> {
    guard: ResponseGuard,
    scorer: MatchScorer,
    issues: Arc<I>,
    candidates: Arc<C>,
}

impl<I, C> MatchService<I, C>
where
    I: IssueStore + 'static,
    C: CandidateStore + 'static,
{
    pub fn new(issues: Arc<I>, candidates: Arc<C>, policy: RangePolicy) -> Self {
        Self::with_scorer(issues, candidates, ResponseGuard::new(policy), MatchScorer::new())
    }

    pub fn with_scorer(
        issues: Arc<I>,
        candidates: Arc<C>,
        guard: ResponseGuard,
        scorer: MatchScorer,
    ) -> Self {
        Self {
            guard,
            scorer,
            issues,
            candidates,
        }
    }

    pub fn guard(&self) -> &ResponseGuard {
        &self.guard
    }

    /// Issues for the quiz, optionally narrowed to a region.
    pub fn issues(&self, region: Option<&str>) -> Result<Vec<Issue>, MatchServiceError> {
        let region = region.map(str::trim).filter(|value| !value.is_empty());
        let issues = self.issues.issues(region)?;
        debug!(?region, count = issues.len(), "listed issues");
        Ok(issues)
    }

    /// Validate a quiz session and rank the candidates serving its zip code.
    pub fn match_candidates(
        &self,
        request: MatchRequest,
    ) -> Result<MatchOutcome, MatchServiceError> {
        let request = self.guard.validate(request)?;

        let known: HashSet<IssueId> = self
            .issues
            .issues(None)?
            .into_iter()
            .map(|issue| issue.id)
            .collect();
        self.guard.ensure_known(&request, &known)?;

        let candidates = self.candidates.candidates_in_region(&request.zip_code)?;
        if candidates.is_empty() {
            info!(zip_code = %request.zip_code, "no candidates serve region");
            return Ok(MatchOutcome::no_candidates());
        }

        let candidate_ids: Vec<CandidateId> =
            candidates.iter().map(|candidate| candidate.id.clone()).collect();
        let positions = group_positions(self.candidates.positions_for(&candidate_ids)?);

        let matches = self
            .scorer
            .score(&request.responses, &candidates, &positions);

        info!(
            zip_code = %request.zip_code,
            responses = request.responses.len(),
            candidates = matches.len(),
            top_score = matches.first().map(|result| result.match_score),
            "ranked candidate matches"
        );

        Ok(MatchOutcome::ranked(matches))
    }
}

/// Error raised by the match service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
