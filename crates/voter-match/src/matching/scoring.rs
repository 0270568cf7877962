use std::collections::HashMap;

use super::domain::{
    AgreementDetail, Candidate, CandidateId, CandidatePosition, MatchResult, UserResponse,
};

/// Position assumed for a candidate who has not declared a stance on an issue.
pub const NEUTRAL_POSITION: i32 = 3;
/// Largest gap between two positions on the 1-5 scale.
pub const MAX_DIFFERENCE: i32 = 4;
/// Largest importance weight the point-allocation flow can produce.
pub const MAX_IMPORTANCE: i32 = 5;

/// Stateless scorer comparing quiz responses against candidate positions.
///
/// The normalizer is the fixed worst case `MAX_DIFFERENCE * MAX_IMPORTANCE * responses`,
/// independent of the importances actually supplied, so scores stay comparable across
/// users. Importances are used as given; range checks belong to [`super::ResponseGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScorer {
    default_position: i32,
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchScorer {
    pub const fn new() -> Self {
        Self {
            default_position: NEUTRAL_POSITION,
        }
    }

    /// Override the stance used for undeclared issues.
    pub const fn with_default_position(default_position: i32) -> Self {
        Self { default_position }
    }

    pub const fn default_position(&self) -> i32 {
        self.default_position
    }

    /// Score and rank every candidate. An empty candidate list yields an empty result.
    pub fn score(
        &self,
        responses: &[UserResponse],
        candidates: &[Candidate],
        positions_by_candidate: &HashMap<CandidateId, Vec<CandidatePosition>>,
    ) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = candidates
            .iter()
            .map(|candidate| {
                let positions = positions_by_candidate
                    .get(&candidate.id)
                    .map(Vec::as_slice)
                    .unwrap_or(&[]);
                self.score_candidate(responses, candidate, positions)
            })
            .collect();

        rank(&mut results);
        results
    }

    pub fn score_candidate(
        &self,
        responses: &[UserResponse],
        candidate: &Candidate,
        positions: &[CandidatePosition],
    ) -> MatchResult {
        let declared: HashMap<_, _> = positions
            .iter()
            .filter(|row| row.candidate_id == candidate.id)
            .map(|row| (&row.issue_id, row.position))
            .collect();

        let mut total_weighted_distance: i64 = 0;
        let mut total_weight: i64 = 0;
        let mut agreement_details = Vec::with_capacity(responses.len());

        for response in responses {
            let candidate_position = declared
                .get(&response.issue_id)
                .copied()
                .unwrap_or(self.default_position);
            let distance = (i64::from(candidate_position) - i64::from(response.position)).abs();
            let difference = i32::try_from(distance).unwrap_or(i32::MAX);

            total_weighted_distance = total_weighted_distance
                .saturating_add(distance.saturating_mul(i64::from(response.importance)));
            total_weight = total_weight.saturating_add(i64::from(response.importance));

            agreement_details.push(AgreementDetail {
                issue_id: response.issue_id.clone(),
                user_position: response.position,
                candidate_position,
                importance: response.importance,
                difference,
            });
        }

        let match_score = normalized_score(total_weighted_distance, total_weight, responses.len());

        MatchResult {
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            office: candidate.office.clone(),
            party: candidate.party.clone(),
            bio: candidate.bio.clone(),
            match_score,
            match_percentage: match_score.round() as i64,
            agreement_details,
        }
    }
}

/// Score every candidate with the neutral default for undeclared issues.
pub fn score(
    responses: &[UserResponse],
    candidates: &[Candidate],
    positions_by_candidate: &HashMap<CandidateId, Vec<CandidatePosition>>,
) -> Vec<MatchResult> {
    MatchScorer::new().score(responses, candidates, positions_by_candidate)
}

/// Sort by raw score, highest first. The sort is stable: tied candidates keep input order.
pub fn rank(results: &mut [MatchResult]) {
    results.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
}

/// Theoretical worst-case weighted distance for `response_count` answers.
pub fn max_possible_distance(response_count: usize) -> i64 {
    i64::from(MAX_DIFFERENCE) * i64::from(MAX_IMPORTANCE) * response_count as i64
}

fn normalized_score(total_weighted_distance: i64, total_weight: i64, response_count: usize) -> f64 {
    if total_weight <= 0 {
        return 0.0;
    }

    let max_possible = max_possible_distance(response_count) as f64;
    let distance_pct = (total_weighted_distance as f64 / max_possible) * 100.0;
    (100.0 - distance_pct).max(0.0)
}
