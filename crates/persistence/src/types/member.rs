//! Member and team records, search input and read models.

use serde::{Deserialize, Serialize};

use crate::core::{FromSqlRow, SqlRow};
use crate::error::MappingError;

/// A member as stored in the `member` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Primary key.
    pub id: i64,
    /// Display name; not unique and may be absent.
    pub username: Option<String>,
    /// Age in years, never negative.
    pub age: i32,
    /// Owning team, if any.
    pub team_id: Option<i64>,
}

/// A team. Its members are found by querying `member.team_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    /// Primary key.
    pub id: i64,
    /// Team name; not assumed unique.
    pub name: String,
}

/// Optional filters for a member search.
///
/// Every absent field contributes nothing to the WHERE clause. An
/// inverted age range matches nothing rather than failing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCondition {
    /// Exact username.
    pub username: Option<String>,
    /// Exact team name.
    pub team_name: Option<String>,
    /// Minimum age, inclusive.
    pub age_goe: Option<i32>,
    /// Maximum age, inclusive.
    pub age_loe: Option<i32>,
    /// Substring of the username.
    pub username_contains: Option<String>,
}

impl SearchCondition {
    /// A condition with no filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters on exact username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Filters on exact team name.
    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }

    /// Sets the minimum age.
    pub fn with_age_goe(mut self, age: i32) -> Self {
        self.age_goe = Some(age);
        self
    }

    /// Sets the maximum age.
    pub fn with_age_loe(mut self, age: i32) -> Self {
        self.age_loe = Some(age);
        self
    }

    /// Filters on a username substring.
    pub fn with_username_contains(mut self, needle: impl Into<String>) -> Self {
        self.username_contains = Some(needle.into());
        self
    }

    /// Returns true when no filter is set.
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.team_name.is_none()
            && self.age_goe.is_none()
            && self.age_loe.is_none()
            && self.username_contains.is_none()
    }
}

/// Flat member/team row produced by the LEFT JOIN search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MemberTeamDto {
    pub member_id: i64,
    pub username: Option<String>,
    pub age: i32,
    pub team_id: Option<i64>,
    pub team_name: Option<String>,
}

/// Aggregates over all members' ages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    /// Number of members.
    pub count: u64,
    /// Sum of ages; absent when there are no members.
    pub age_sum: Option<i64>,
    /// Mean age.
    pub age_avg: Option<f64>,
    /// Oldest member's age.
    pub age_max: Option<i32>,
    /// Youngest member's age.
    pub age_min: Option<i32>,
}

/// Average member age of one team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamAgeAverage {
    /// Team name.
    pub team_name: String,
    /// Mean age of the team's members.
    pub average_age: f64,
}

impl FromSqlRow for MemberTeamDto {
    fn from_row(row: &SqlRow) -> Result<Self, MappingError> {
        Ok(Self {
            member_id: row.get(0, "member_id")?,
            username: row.get(1, "username")?,
            age: row.get(2, "age")?,
            team_id: row.get(3, "team_id")?,
            team_name: row.get(4, "team_name")?,
        })
    }
}

impl FromSqlRow for Member {
    fn from_row(row: &SqlRow) -> Result<Self, MappingError> {
        Ok(Self {
            id: row.get(0, "member_id")?,
            username: row.get(1, "username")?,
            age: row.get(2, "age")?,
            team_id: row.get(3, "team_id")?,
        })
    }
}

impl FromSqlRow for MemberStats {
    fn from_row(row: &SqlRow) -> Result<Self, MappingError> {
        Ok(Self {
            count: row.get(0, "member_count")?,
            age_sum: row.get(1, "age_sum")?,
            age_avg: row.get(2, "age_avg")?,
            age_max: row.get(3, "age_max")?,
            age_min: row.get(4, "age_min")?,
        })
    }
}

impl FromSqlRow for TeamAgeAverage {
    fn from_row(row: &SqlRow) -> Result<Self, MappingError> {
        Ok(Self {
            team_name: row.get(0, "team_name")?,
            average_age: row.get(1, "average_age")?,
        })
    }
}
