use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::matching::directory::{CandidateStore, DirectoryError, InMemoryDirectory, IssueStore};
use crate::matching::domain::{
    Candidate, CandidateId, CandidatePosition, Issue, IssueCategory, IssueId, UserResponse,
};
use crate::matching::guard::{MatchRequest, RangePolicy};
use crate::matching::service::MatchService;

pub(super) const ZIP: &str = "77493";

pub(super) fn response(issue: &str, position: i32, importance: i32) -> UserResponse {
    UserResponse {
        issue_id: IssueId::from(issue),
        position,
        importance,
    }
}

pub(super) fn candidate(id: &str, name: &str) -> Candidate {
    Candidate {
        id: CandidateId::from(id),
        name: name.to_string(),
        office: "State Senate".to_string(),
        party: "Independent".to_string(),
        bio: format!("{name} has served on the school board."),
        zip_codes: vec![ZIP.to_string()],
    }
}

pub(super) fn position(candidate: &str, issue: &str, position: i32) -> CandidatePosition {
    CandidatePosition {
        candidate_id: CandidateId::from(candidate),
        issue_id: IssueId::from(issue),
        position,
    }
}

pub(super) fn positions_map(
    rows: Vec<CandidatePosition>,
) -> HashMap<CandidateId, Vec<CandidatePosition>> {
    crate::matching::directory::group_positions(rows)
}

pub(super) fn issue(id: &str, category: IssueCategory, locations: &[&str], day: u32) -> Issue {
    Issue {
        id: IssueId::from(id),
        title: format!("Issue {id}"),
        slug: id.to_string(),
        description: String::new(),
        category,
        locations: locations.iter().map(|code| code.to_string()).collect(),
        created_at: Utc
            .with_ymd_and_hms(2025, 1, day, 9, 0, 0)
            .single()
            .expect("valid timestamp"),
    }
}

/// Three issues, two candidates serving `ZIP`, one candidate elsewhere.
pub(super) fn directory() -> InMemoryDirectory {
    let issues = vec![
        issue("i-schools", IssueCategory::State, &["TX"], 3),
        issue("i-transit", IssueCategory::Local, &[], 1),
        issue("i-water", IssueCategory::State, &["UT"], 2),
    ];

    let mut remote = candidate("c-remote", "Remy Salt");
    remote.zip_codes = vec!["84043".to_string()];

    let candidates = vec![
        candidate("c-ada", "Ada Ruiz"),
        candidate("c-ben", "Ben Okafor"),
        remote,
    ];

    let positions = vec![
        position("c-ada", "i-schools", 5),
        position("c-ada", "i-transit", 4),
        position("c-ben", "i-schools", 1),
        position("c-remote", "i-schools", 5),
    ];

    InMemoryDirectory::new(issues, candidates, positions)
}

pub(super) fn request(responses: Vec<UserResponse>) -> MatchRequest {
    MatchRequest {
        zip_code: ZIP.to_string(),
        responses,
    }
}

pub(super) fn build_service(
    policy: RangePolicy,
) -> MatchService<InMemoryDirectory, InMemoryDirectory> {
    let directory = Arc::new(directory());
    MatchService::new(directory.clone(), directory, policy)
}

pub(super) struct OfflineDirectory;

impl IssueStore for OfflineDirectory {
    fn issues(&self, _region: Option<&str>) -> Result<Vec<Issue>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }
}

impl CandidateStore for OfflineDirectory {
    fn candidates_in_region(&self, _region: &str) -> Result<Vec<Candidate>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }

    fn positions_for(
        &self,
        _candidate_ids: &[CandidateId],
    ) -> Result<Vec<CandidatePosition>, DirectoryError> {
        Err(DirectoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
