//! Repository facade consumed by the HTTP layer.
//!
//! [`MemberRepository`] is the operation set; [`SqlMemberRepository`] builds
//! plans with [`crate::query`] and runs them through any [`SqlSession`].
//! The repository holds no state besides the session handle and keeps no
//! entity cache, so writes need no invalidation here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::core::{FromSqlRow, SqlSession, map_rows};
use crate::error::{MappingError, StorageResult};
use crate::pagination::execute_page;
use crate::query::{
    Plan, plan_bulk_relabel, plan_find_all, plan_member_stats, plan_members_at_least_average_age,
    plan_members_with_joined_team, plan_oldest_members, plan_page, plan_search,
    plan_search_sorted, plan_team_age_averages,
};
use crate::types::{
    Member, MemberStats, MemberTeamDto, Page, Pageable, SearchCondition, SortOrder,
    TeamAgeAverage,
};

/// Member queries and the bulk relabel command.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Members matching `cond`, joined with their team, ordered by id.
    async fn search(&self, cond: &SearchCondition) -> StorageResult<Vec<MemberTeamDto>>;

    /// Members matching `cond`, ordered by `sort` then id.
    async fn search_sorted(
        &self,
        cond: &SearchCondition,
        sort: &[SortOrder],
    ) -> StorageResult<Vec<MemberTeamDto>>;

    /// One page of members matching `cond`.
    async fn search_page(
        &self,
        cond: &SearchCondition,
        pageable: &Pageable,
    ) -> StorageResult<Page<MemberTeamDto>>;

    /// Every member in entity shape.
    async fn find_all(&self) -> StorageResult<Vec<Member>>;

    /// Sets `username = replacement` on every member younger than
    /// `age_threshold` and returns the number of rows changed.
    ///
    /// Callers holding member data in a cache must invalidate it after this.
    async fn bulk_relabel_below_age(
        &self,
        age_threshold: i32,
        replacement: &str,
    ) -> StorageResult<u64>;

    /// Age aggregates over all members.
    async fn member_stats(&self) -> StorageResult<MemberStats>;

    /// Average age per team, ordered by team name.
    async fn team_age_averages(&self) -> StorageResult<Vec<TeamAgeAverage>>;

    /// Members of the highest age, ordered by id. Empty when there are no members.
    async fn oldest_members(&self) -> StorageResult<Vec<Member>>;

    /// Members whose age is at least the average age, ordered by id.
    async fn members_at_least_average_age(&self) -> StorageResult<Vec<Member>>;

    /// Every member, ordered by id, carrying team fields only when the team
    /// is named `team_name`.
    async fn members_with_joined_team(&self, team_name: &str)
    -> StorageResult<Vec<MemberTeamDto>>;

    /// Checks that the store answers.
    async fn health_check(&self) -> StorageResult<()>;

    /// Name of the backing store.
    fn backend_name(&self) -> &'static str;
}

/// [`MemberRepository`] over a [`SqlSession`].
#[derive(Debug)]
pub struct SqlMemberRepository<S: ?Sized> {
    session: Arc<S>,
}

impl<S: ?Sized> Clone for SqlMemberRepository<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<S: SqlSession + ?Sized> SqlMemberRepository<S> {
    /// Wraps a shared session.
    pub fn new(session: Arc<S>) -> Self {
        Self { session }
    }

    async fn fetch<T: FromSqlRow>(&self, plan: &Plan) -> StorageResult<Vec<T>> {
        let sql = plan.to_sql();
        let rows = self.session.query(&sql).await?;
        Ok(map_rows(&rows)?)
    }
}

#[async_trait]
impl<S: SqlSession + ?Sized> MemberRepository for SqlMemberRepository<S> {
    async fn search(&self, cond: &SearchCondition) -> StorageResult<Vec<MemberTeamDto>> {
        self.fetch(&plan_search(cond)).await
    }

    async fn search_sorted(
        &self,
        cond: &SearchCondition,
        sort: &[SortOrder],
    ) -> StorageResult<Vec<MemberTeamDto>> {
        let plan = plan_search_sorted(cond, sort)?;
        self.fetch(&plan).await
    }

    async fn search_page(
        &self,
        cond: &SearchCondition,
        pageable: &Pageable,
    ) -> StorageResult<Page<MemberTeamDto>> {
        let plan = plan_page(cond, pageable)?;
        let page = execute_page(self.session.as_ref(), &plan, pageable).await?;
        debug!(
            page_index = page.page_index,
            returned = page.len(),
            total = page.total_elements,
            "Member page fetched"
        );
        Ok(page)
    }

    async fn find_all(&self) -> StorageResult<Vec<Member>> {
        self.fetch(&plan_find_all()).await
    }

    async fn bulk_relabel_below_age(
        &self,
        age_threshold: i32,
        replacement: &str,
    ) -> StorageResult<u64> {
        let sql = plan_bulk_relabel(age_threshold, replacement).to_sql();
        let updated = self.session.execute(&sql).await?;
        info!(age_threshold, updated, "Relabeled members below age threshold");
        Ok(updated)
    }

    async fn member_stats(&self) -> StorageResult<MemberStats> {
        let rows: Vec<MemberStats> = self.fetch(&plan_member_stats()).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| MappingError::EmptyResult.into())
    }

    async fn team_age_averages(&self) -> StorageResult<Vec<TeamAgeAverage>> {
        self.fetch(&plan_team_age_averages()).await
    }

    async fn oldest_members(&self) -> StorageResult<Vec<Member>> {
        self.fetch(&plan_oldest_members()).await
    }

    async fn members_at_least_average_age(&self) -> StorageResult<Vec<Member>> {
        self.fetch(&plan_members_at_least_average_age()).await
    }

    async fn members_with_joined_team(
        &self,
        team_name: &str,
    ) -> StorageResult<Vec<MemberTeamDto>> {
        self.fetch(&plan_members_with_joined_team(team_name)).await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.session.ping().await
    }

    fn backend_name(&self) -> &'static str {
        self.session.backend_name()
    }
}
