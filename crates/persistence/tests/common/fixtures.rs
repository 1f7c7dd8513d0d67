//! The demo roster and builders around it.
//!
//! Seeded rows: teamA, teamB; member1/10/teamA, member2/20/teamA,
//! member3/30/teamB, member4/40/teamB.

use std::sync::Arc;

use roster_persistence::backends::sqlite::SqliteBackend;
use roster_persistence::repository::SqlMemberRepository;
use roster_persistence::types::MemberTeamDto;

/// An in-memory backend with the schema and nothing else.
pub fn empty_backend() -> SqliteBackend {
    let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
    backend.init_schema().expect("Failed to initialize schema");
    backend
}

/// An in-memory backend holding the demo roster.
pub fn seeded_backend() -> SqliteBackend {
    let backend = empty_backend();
    backend.seed_demo().expect("Failed to seed demo roster");
    backend
}

/// A repository over the demo roster.
pub fn seeded_repository() -> SqlMemberRepository<SqliteBackend> {
    SqlMemberRepository::new(Arc::new(seeded_backend()))
}

/// Usernames in result order, `None` for members without one.
pub fn usernames(rows: &[MemberTeamDto]) -> Vec<Option<&str>> {
    rows.iter().map(|r| r.username.as_deref()).collect()
}

/// Ages in result order.
pub fn ages(rows: &[MemberTeamDto]) -> Vec<i32> {
    rows.iter().map(|r| r.age).collect()
}
