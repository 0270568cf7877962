//! Candidate matching for the VoterEd quiz.
//!
//! Quiz responses pass through the [`ResponseGuard`] before the [`MatchScorer`] compares them
//! against each candidate's declared positions. Issue and candidate data come from the
//! [`IssueStore`] and [`CandidateStore`] collaborators, usually an [`InMemoryDirectory`]
//! hydrated by the [`DirectoryImporter`].

pub mod allocation;
pub mod directory;
pub mod domain;
pub mod guard;
pub mod import;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use allocation::{
    importance_from_points, AllocationError, PointAllocation, QuizAnswer, MAX_POINTS_PER_ISSUE,
    TOTAL_POINTS,
};
pub use directory::{
    group_positions, CandidateStore, DirectoryError, InMemoryDirectory, IssueStore,
};
pub use domain::{
    AgreementDetail, Candidate, CandidateId, CandidatePosition, Issue, IssueCategory, IssueId,
    MatchResult, UserResponse,
};
pub use guard::{MatchRequest, RangePolicy, ResponseGuard, ValidatedRequest, ValidationError};
pub use import::{DirectoryImportError, DirectoryImporter};
pub use router::match_router;
pub use scoring::{score, MatchScorer, NEUTRAL_POSITION};
pub use service::{MatchOutcome, MatchService, MatchServiceError, NO_CANDIDATES_MESSAGE};
