use super::common::*;
use std::sync::Arc;

use crate::matching::domain::IssueId;
use crate::matching::guard::{MatchRequest, RangePolicy, ValidationError};
use crate::matching::service::{MatchService, MatchServiceError, NO_CANDIDATES_MESSAGE};

#[test]
fn ranks_candidates_serving_the_zip_code() {
    let service = build_service(RangePolicy::Reject);

    let outcome = service
        .match_candidates(request(vec![
            response("i-schools", 5, 5),
            response("i-transit", 4, 2),
        ]))
        .expect("match succeeds");

    assert!(outcome.success);
    assert!(outcome.message.is_none());
    let ids: Vec<&str> = outcome.matches.iter().map(|m| m.id.0.as_str()).collect();
    assert_eq!(ids, vec!["c-ada", "c-ben"]);
    assert_eq!(outcome.matches[0].match_percentage, 100);
    // c-ben: schools |1-5|*5 = 20, transit defaults to neutral |3-4|*2 = 2, max 40
    assert_eq!(outcome.matches[1].match_percentage, 45);
}

#[test]
fn region_without_candidates_returns_empty_success() {
    let service = build_service(RangePolicy::Reject);
    let request = MatchRequest {
        zip_code: "10001".to_string(),
        responses: vec![response("i-schools", 5, 5)],
    };

    let outcome = service.match_candidates(request).expect("no error");

    assert!(outcome.success);
    assert!(outcome.matches.is_empty());
    assert_eq!(outcome.message.as_deref(), Some(NO_CANDIDATES_MESSAGE));
}

#[test]
fn validation_failure_short_circuits() {
    let service = MatchService::new(
        Arc::new(OfflineDirectory),
        Arc::new(OfflineDirectory),
        RangePolicy::Reject,
    );

    let err = service
        .match_candidates(request(Vec::new()))
        .expect_err("missing input");

    assert!(matches!(
        err,
        MatchServiceError::Validation(ValidationError::MissingInput)
    ));
}

#[test]
fn unknown_issue_is_a_validation_error() {
    let service = build_service(RangePolicy::Reject);

    let err = service
        .match_candidates(request(vec![response("i-ghost", 5, 5)]))
        .expect_err("unknown issue");

    assert!(matches!(
        err,
        MatchServiceError::Validation(ValidationError::UnknownIssue(ref id)) if *id == IssueId::from("i-ghost")
    ));
}

#[test]
fn clamp_policy_scores_clamped_values() {
    let service = build_service(RangePolicy::Clamp);

    let outcome = service
        .match_candidates(request(vec![response("i-schools", 9, 7)]))
        .expect("clamped request scores");

    let detail = &outcome.matches[0].agreement_details[0];
    assert_eq!(detail.user_position, 5);
    assert_eq!(detail.importance, 5);
}

#[test]
fn directory_outage_surfaces_as_directory_error() {
    let service = MatchService::new(
        Arc::new(OfflineDirectory),
        Arc::new(OfflineDirectory),
        RangePolicy::Reject,
    );

    let err = service
        .match_candidates(request(vec![response("i-schools", 5, 5)]))
        .expect_err("directory offline");

    assert!(matches!(err, MatchServiceError::Directory(_)));
}

#[test]
fn issues_listed_in_creation_order_and_filtered_by_region() {
    let service = build_service(RangePolicy::Reject);

    let all = service.issues(None).expect("issues");
    let texas = service.issues(Some("tx")).expect("issues");
    let blank = service.issues(Some("  ")).expect("issues");

    let all_ids: Vec<&str> = all.iter().map(|issue| issue.id.0.as_str()).collect();
    assert_eq!(all_ids, vec!["i-transit", "i-water", "i-schools"]);

    let texas_ids: Vec<&str> = texas.iter().map(|issue| issue.id.0.as_str()).collect();
    assert_eq!(texas_ids, vec!["i-transit", "i-schools"]);

    assert_eq!(blank.len(), all.len());
}
