//! Row insertion helpers for demos and tests.

use rusqlite::params;

use crate::error::StorageResult;
use crate::types::{Member, Team};

use super::SqliteBackend;

/// Teams of the demo roster.
pub const DEMO_TEAMS: [&str; 2] = ["teamA", "teamB"];

/// Members of the demo roster as `(username, age, index into DEMO_TEAMS)`.
pub const DEMO_MEMBERS: [(&str, i32, usize); 4] = [
    ("member1", 10, 0),
    ("member2", 20, 0),
    ("member3", 30, 1),
    ("member4", 40, 1),
];

impl SqliteBackend {
    /// Inserts a team.
    pub fn insert_team(&self, name: &str) -> StorageResult<Team> {
        let conn = self.get_connection()?;
        conn.execute("INSERT INTO team (name) VALUES (?1)", params![name])?;
        Ok(Team {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Inserts a member. Fails when `age` is negative or `team_id` does not exist.
    pub fn insert_member(
        &self,
        username: Option<&str>,
        age: i32,
        team_id: Option<i64>,
    ) -> StorageResult<Member> {
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO member (username, age, team_id) VALUES (?1, ?2, ?3)",
            params![username, age, team_id],
        )?;
        Ok(Member {
            id: conn.last_insert_rowid(),
            username: username.map(str::to_string),
            age,
            team_id,
        })
    }

    /// Loads the demo roster unless the database already holds teams.
    ///
    /// Returns whether anything was inserted.
    pub fn seed_demo(&self) -> StorageResult<bool> {
        {
            let conn = self.get_connection()?;
            let teams: i64 = conn.query_row("SELECT COUNT(*) FROM team", [], |row| row.get(0))?;
            if teams > 0 {
                tracing::debug!(teams, "Database already seeded");
                return Ok(false);
            }
        }

        let teams = DEMO_TEAMS
            .iter()
            .map(|name| self.insert_team(name))
            .collect::<StorageResult<Vec<_>>>()?;
        for (username, age, team) in DEMO_MEMBERS {
            self.insert_member(Some(username), age, Some(teams[team].id))?;
        }

        tracing::info!(
            teams = DEMO_TEAMS.len(),
            members = DEMO_MEMBERS.len(),
            "Seeded demo roster"
        );
        Ok(true)
    }
}
