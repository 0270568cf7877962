use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{IssueId, UserResponse};

/// Points a user distributes across all quiz issues.
pub const TOTAL_POINTS: u32 = 100;
/// Cap on points assigned to a single issue.
pub const MAX_POINTS_PER_ISSUE: u32 = 20;
/// Share of the budget that must be spent before results are shown.
pub const MINIMUM_ALLOCATION_RATIO: f64 = 0.8;

/// Errors raised while building or submitting a point allocation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("issue {issue_id} has {points} points (max 20)")]
    OverIssueCap { issue_id: IssueId, points: u32 },
    #[error("You only have {remaining} points remaining to allocate.")]
    OverBudget { remaining: u32 },
    #[error("You've only used {allocated} of {total} points. Consider allocating more points to issues that matter to you.")]
    UnderAllocated { allocated: u32, total: u32 },
}

/// Bucket a 0-20 point allocation into the 1-5 importance scale.
pub fn importance_from_points(points: u32) -> i32 {
    match points {
        16.. => 5,
        12..=15 => 4,
        8..=11 => 3,
        4..=7 => 2,
        _ => 1,
    }
}

/// Quiz answer collected before importance is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub issue_id: IssueId,
    pub position: i32,
}

/// Per-issue point budget from the importance step of the quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointAllocation {
    points: BTreeMap<IssueId, u32>,
}

impl PointAllocation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start every issue with an equal share of the budget, rounded down.
    pub fn even<I>(issue_ids: I) -> Self
    where
        I: IntoIterator<Item = IssueId>,
    {
        let ids: Vec<IssueId> = issue_ids.into_iter().collect();
        if ids.is_empty() {
            return Self::default();
        }

        let share = TOTAL_POINTS / ids.len() as u32;
        Self {
            points: ids.into_iter().map(|id| (id, share)).collect(),
        }
    }

    pub fn from_points(points: BTreeMap<IssueId, u32>) -> Self {
        Self { points }
    }

    pub fn points_for(&self, issue_id: &IssueId) -> u32 {
        self.points.get(issue_id).copied().unwrap_or(0)
    }

    /// Sum of allocated points, saturating at `u32::MAX` for unbounded deserialized input.
    pub fn total(&self) -> u32 {
        let sum: u64 = self.points.values().map(|points| u64::from(*points)).sum();
        u32::try_from(sum).unwrap_or(u32::MAX)
    }

    pub fn remaining(&self) -> u32 {
        TOTAL_POINTS.saturating_sub(self.total())
    }

    /// Move an issue's points by `delta`, bounded to `0..=MAX_POINTS_PER_ISSUE`.
    /// The change is refused when it would push the total past the budget.
    pub fn adjust(&mut self, issue_id: &IssueId, delta: i32) -> Result<u32, AllocationError> {
        let current = self.points_for(issue_id);
        let proposed = (i64::from(current) + i64::from(delta))
            .clamp(0, i64::from(MAX_POINTS_PER_ISSUE)) as u32;
        let others = self.total().saturating_sub(current);

        if others.saturating_add(proposed) > TOTAL_POINTS {
            return Err(AllocationError::OverBudget {
                remaining: TOTAL_POINTS.saturating_sub(others),
            });
        }

        self.points.insert(issue_id.clone(), proposed);
        Ok(proposed)
    }

    pub fn validate(&self) -> Result<(), AllocationError> {
        if let Some((issue_id, points)) = self
            .points
            .iter()
            .find(|(_, points)| **points > MAX_POINTS_PER_ISSUE)
        {
            return Err(AllocationError::OverIssueCap {
                issue_id: issue_id.clone(),
                points: *points,
            });
        }

        let allocated = self.total();
        if allocated > TOTAL_POINTS {
            return Err(AllocationError::OverBudget { remaining: 0 });
        }

        if f64::from(allocated) < f64::from(TOTAL_POINTS) * MINIMUM_ALLOCATION_RATIO {
            return Err(AllocationError::UnderAllocated {
                allocated,
                total: TOTAL_POINTS,
            });
        }

        Ok(())
    }

    /// Attach bucketed importances to quiz answers. Unallocated issues get importance 1.
    pub fn complete(&self, answers: &[QuizAnswer]) -> Result<Vec<UserResponse>, AllocationError> {
        self.validate()?;

        Ok(answers
            .iter()
            .map(|answer| UserResponse {
                issue_id: answer.issue_id.clone(),
                position: answer.position,
                importance: importance_from_points(self.points_for(&answer.issue_id)),
            })
            .collect())
    }
}
