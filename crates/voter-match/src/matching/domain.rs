use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for ballot issues.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(pub String);

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IssueId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier wrapper for candidates listed in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Jurisdiction level an issue belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Local,
    State,
    Federal,
}

impl IssueCategory {
    pub const fn label(self) -> &'static str {
        match self {
            IssueCategory::Local => "local",
            IssueCategory::State => "state",
            IssueCategory::Federal => "federal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Some(Self::Local),
            "state" => Some(Self::State),
            "federal" => Some(Self::Federal),
            _ => None,
        }
    }
}

/// Quiz issue reference data. An empty `locations` list marks the issue as global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: IssueCategory,
    #[serde(default)]
    pub locations: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Issue {
    pub fn is_global(&self) -> bool {
        self.locations.is_empty()
    }

    /// Whether the issue should be shown to a user in `region`.
    pub fn applies_to(&self, region: &str) -> bool {
        let region = region.trim();
        self.is_global()
            || self
                .locations
                .iter()
                .any(|location| location.eq_ignore_ascii_case(region))
    }
}

/// One quiz answer: the user's stance and how much they care about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub issue_id: IssueId,
    pub position: i32,
    pub importance: i32,
}

/// Candidate listing owned by the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub office: String,
    pub party: String,
    pub bio: String,
    /// Region codes (zip codes in the current directory) the candidate serves.
    #[serde(default)]
    pub zip_codes: Vec<String>,
}

impl Candidate {
    pub fn serves(&self, region: &str) -> bool {
        let region = region.trim();
        self.zip_codes.iter().any(|code| code == region)
    }
}

/// Declared stance of a candidate on one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePosition {
    pub candidate_id: CandidateId,
    pub issue_id: IssueId,
    pub position: i32,
}

/// Per-issue comparison between the user and a candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementDetail {
    pub issue_id: IssueId,
    pub user_position: i32,
    pub candidate_position: i32,
    pub importance: i32,
    pub difference: i32,
}

/// Scored candidate returned to the client. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub id: CandidateId,
    pub name: String,
    pub office: String,
    pub party: String,
    pub bio: String,
    pub match_score: f64,
    pub match_percentage: i64,
    pub agreement_details: Vec<AgreementDetail>,
}
