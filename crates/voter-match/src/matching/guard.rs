use std::collections::HashSet;
use std::ops::RangeInclusive;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::domain::{IssueId, UserResponse};

/// Accepted positions on the ordinal scale, strongly oppose through strongly support.
pub const POSITION_RANGE: RangeInclusive<i32> = 1..=5;
/// Accepted importance weights.
pub const IMPORTANCE_RANGE: RangeInclusive<i32> = 1..=5;

const ZIP_CODE_LENGTH: usize = 5;

/// Validation errors raised before the scorer is invoked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Missing required parameters")]
    MissingInput,
    #[error("zip code must be 5 digits (found '{0}')")]
    InvalidZipCode(String),
    #[error("issue {0} answered more than once")]
    DuplicateIssue(IssueId),
    #[error("issue {0} does not exist")]
    UnknownIssue(IssueId),
    #[error("position {value} for issue {issue_id} outside 1-5")]
    PositionOutOfRange { issue_id: IssueId, value: i32 },
    #[error("importance {value} for issue {issue_id} outside 1-5")]
    ImportanceOutOfRange { issue_id: IssueId, value: i32 },
}

/// How out-of-range positions and importances are handled at the boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    #[default]
    Reject,
    Clamp,
}

impl RangePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "reject" => Some(Self::Reject),
            "clamp" => Some(Self::Clamp),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RangePolicy::Reject => "reject",
            RangePolicy::Clamp => "clamp",
        }
    }
}

/// Inbound match request as posted by the quiz client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub zip_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub responses: Vec<UserResponse>,
}

/// Explicit `null` reads as the empty value so the guard reports missing input.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request that passed the guard: trimmed zip, unique issues, in-range values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub zip_code: String,
    pub responses: Vec<UserResponse>,
}

impl ValidatedRequest {
    pub fn issue_ids(&self) -> impl Iterator<Item = &IssueId> {
        self.responses.iter().map(|response| &response.issue_id)
    }
}

/// Boundary validation in front of the scorer.
#[derive(Debug, Clone, Default)]
pub struct ResponseGuard {
    policy: RangePolicy,
}

impl ResponseGuard {
    pub fn new(policy: RangePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    pub fn validate(&self, request: MatchRequest) -> Result<ValidatedRequest, ValidationError> {
        let zip_code = request.zip_code.trim().to_string();
        if zip_code.is_empty() || request.responses.is_empty() {
            return Err(ValidationError::MissingInput);
        }

        if !is_valid_zip_code(&zip_code) {
            return Err(ValidationError::InvalidZipCode(zip_code));
        }

        let mut seen = HashSet::with_capacity(request.responses.len());
        let mut responses = Vec::with_capacity(request.responses.len());

        for mut response in request.responses {
            if !seen.insert(response.issue_id.clone()) {
                return Err(ValidationError::DuplicateIssue(response.issue_id));
            }

            response.position = self.apply_range(
                &response.issue_id,
                response.position,
                POSITION_RANGE,
                |issue_id, value| ValidationError::PositionOutOfRange { issue_id, value },
            )?;
            response.importance = self.apply_range(
                &response.issue_id,
                response.importance,
                IMPORTANCE_RANGE,
                |issue_id, value| ValidationError::ImportanceOutOfRange { issue_id, value },
            )?;

            responses.push(response);
        }

        Ok(ValidatedRequest {
            zip_code,
            responses,
        })
    }

    /// Reject responses referencing issues missing from `known`.
    pub fn ensure_known(
        &self,
        request: &ValidatedRequest,
        known: &HashSet<IssueId>,
    ) -> Result<(), ValidationError> {
        match request.issue_ids().find(|issue_id| !known.contains(*issue_id)) {
            Some(unknown) => Err(ValidationError::UnknownIssue(unknown.clone())),
            None => Ok(()),
        }
    }

    fn apply_range(
        &self,
        issue_id: &IssueId,
        value: i32,
        range: RangeInclusive<i32>,
        error: impl FnOnce(IssueId, i32) -> ValidationError,
    ) -> Result<i32, ValidationError> {
        if range.contains(&value) {
            return Ok(value);
        }

        match self.policy {
            RangePolicy::Reject => Err(error(issue_id.clone(), value)),
            RangePolicy::Clamp => {
                let clamped = value.clamp(*range.start(), *range.end());
                warn!(%issue_id, value, clamped, "clamped out-of-range response value");
                Ok(clamped)
            }
        }
    }
}

pub fn is_valid_zip_code(value: &str) -> bool {
    value.len() == ZIP_CODE_LENGTH && value.bytes().all(|byte| byte.is_ascii_digit())
}
