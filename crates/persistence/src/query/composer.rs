//! Member search plans.
//!
//! Every member search shares one shape:
//!
//! ```text
//! SELECT member.member_id AS member_id, member.username AS username,
//!        member.age AS age, team.team_id AS team_id, team.name AS team_name
//! FROM member LEFT JOIN team ON member.team_id = team.team_id
//! [WHERE <search predicate>]
//! ORDER BY <sort...>, member.member_id ASC
//! [LIMIT ?n OFFSET ?m]
//! ```
//!
//! The LEFT JOIN keeps members without a team. A page is planned as two
//! statements: the content query above and a count query with the same
//! FROM/WHERE and nothing else, so the pagination engine can skip the count
//! when the content already determines the total.
//!
//! The remaining plans are reports over the same tables: aggregates, a
//! grouped average, members compared against an age aggregate subquery,
//! and a member listing whose team join is narrowed in the ON clause.

use tracing::debug;

use crate::error::QueryError;
use crate::predicate::{Expr, and, contains_or_none, eq_or_none, goe_or_none, loe_or_none};
use crate::schema::{ColumnRef, MEMBER, MEMBER_TABLE, MEMBER_TEAM, TEAM};
use crate::types::{Pageable, SearchCondition, SortOrder};

use super::{Aggregate, OrderSpec, Plan, UpdatePlan};

/// Content and count statements of one page.
#[derive(Debug, Clone)]
pub struct PagePlan {
    /// Rows of the requested page.
    pub content: Plan,
    /// Total number of matching rows.
    pub count: Plan,
}

/// Sortable projection fields, with their accepted spellings.
const SORT_FIELDS: &[(&[&str], ColumnRef)] = &[
    (&["id", "memberId", "member_id"], MEMBER.id.column_ref()),
    (&["username"], MEMBER.username.column_ref()),
    (&["age"], MEMBER.age.column_ref()),
    (&["teamId", "team_id"], TEAM.id.column_ref()),
    (&["teamName", "team_name"], TEAM.name.column_ref()),
];

/// Maps a projection field name to its column.
pub fn resolve_sort_field(field: &str) -> Result<ColumnRef, QueryError> {
    SORT_FIELDS
        .iter()
        .find(|(names, _)| names.contains(&field))
        .map(|(_, column)| *column)
        .ok_or_else(|| QueryError::InvalidSort {
            field: field.to_string(),
            message: "unknown sort field; expected one of id, username, age, teamId, teamName"
                .to_string(),
        })
}

/// The WHERE predicate for `cond`; `None` when no filter is set.
pub fn search_predicate(cond: &SearchCondition) -> Option<Expr> {
    and([
        eq_or_none(MEMBER.username, cond.username.as_deref()),
        eq_or_none(TEAM.name, cond.team_name.as_deref()),
        goe_or_none(MEMBER.age, cond.age_goe),
        loe_or_none(MEMBER.age, cond.age_loe),
        contains_or_none(MEMBER.username, cond.username_contains.as_deref()),
    ])
}

fn member_team_columns() -> Plan {
    Plan::select_from(&MEMBER_TABLE)
        .column(MEMBER.id, "member_id")
        .column(MEMBER.username, "username")
        .column(MEMBER.age, "age")
        .column(TEAM.id, "team_id")
        .column(TEAM.name, "team_name")
}

fn member_team_select() -> Plan {
    member_team_columns().left_join(&MEMBER_TEAM)
}

fn member_select() -> Plan {
    MEMBER_TABLE
        .fields
        .iter()
        .fold(Plan::select_from(&MEMBER_TABLE), |plan, field| {
            plan.column(field.column, field.column.name)
        })
}

// Single-value subquery over every member's age.
fn member_age_aggregate(aggregate: Aggregate, alias: &'static str) -> Plan {
    Plan::select_from(&MEMBER_TABLE).aggregate(aggregate, MEMBER.age, alias)
}

/// Member search ordered by member id.
pub fn plan_search(cond: &SearchCondition) -> Plan {
    member_team_select()
        .filter(search_predicate(cond))
        .order_by(vec![OrderSpec::asc(MEMBER.id)])
}

/// Member search ordered by `sort`, falling back to member id.
pub fn plan_search_sorted(cond: &SearchCondition, sort: &[SortOrder]) -> Result<Plan, QueryError> {
    Ok(plan_search(cond).order_by(resolve_order(sort)?))
}

/// The count statement for `cond`.
pub fn plan_count(cond: &SearchCondition) -> Plan {
    Plan::select_from(&MEMBER_TABLE)
        .aggregate(Aggregate::Count, MEMBER.id, "total")
        .left_join(&MEMBER_TEAM)
        .filter(search_predicate(cond))
}

/// Content and count statements for one page of a member search.
pub fn plan_page(cond: &SearchCondition, pageable: &Pageable) -> Result<PagePlan, QueryError> {
    let offset = pageable.offset()?;
    let order = resolve_order(&pageable.sort)?;

    let content = member_team_select()
        .filter(search_predicate(cond))
        .order_by(order)
        .limit_offset(pageable.limit(), offset);
    let count = plan_count(cond);

    debug!(
        page_index = pageable.page_index,
        page_size = pageable.page_size,
        offset,
        "Planned member page"
    );

    Ok(PagePlan { content, count })
}

/// Every member as stored, ordered by id.
pub fn plan_find_all() -> Plan {
    member_select().order_by(vec![OrderSpec::asc(MEMBER_TABLE.primary_key)])
}

/// Members whose age equals the highest age, ordered by id.
pub fn plan_oldest_members() -> Plan {
    member_select()
        .filter(Some(
            MEMBER.age.eq_scalar(member_age_aggregate(Aggregate::Max, "max_age")),
        ))
        .order_by(vec![OrderSpec::asc(MEMBER.id)])
}

/// Members at least as old as the average member, ordered by id.
pub fn plan_members_at_least_average_age() -> Plan {
    member_select()
        .filter(Some(
            MEMBER.age.goe_scalar(member_age_aggregate(Aggregate::Avg, "avg_age")),
        ))
        .order_by(vec![OrderSpec::asc(MEMBER.id)])
}

/// Every member, ordered by id, with team columns filled in only when the
/// member's team is named `team_name`. The name is matched in the ON
/// clause, so no member is filtered out.
pub fn plan_members_with_joined_team(team_name: &str) -> Plan {
    member_team_columns()
        .left_join_on(&MEMBER_TEAM, Some(TEAM.name.eq(team_name)))
        .order_by(vec![OrderSpec::asc(MEMBER.id)])
}

/// Count, sum, average, max and min of member ages.
pub fn plan_member_stats() -> Plan {
    Plan::select_from(&MEMBER_TABLE)
        .aggregate(Aggregate::Count, MEMBER.id, "member_count")
        .aggregate(Aggregate::Sum, MEMBER.age, "age_sum")
        .aggregate(Aggregate::Avg, MEMBER.age, "age_avg")
        .aggregate(Aggregate::Max, MEMBER.age, "age_max")
        .aggregate(Aggregate::Min, MEMBER.age, "age_min")
}

/// Average member age per team name. Members without a team are excluded.
pub fn plan_team_age_averages() -> Plan {
    Plan::select_from(&MEMBER_TABLE)
        .column(TEAM.name, "team_name")
        .aggregate(Aggregate::Avg, MEMBER.age, "average_age")
        .inner_join(&MEMBER_TEAM)
        .group_by(TEAM.name)
        .order_by(vec![OrderSpec::asc(TEAM.name)])
}

/// `UPDATE member SET username = ? WHERE age < ?`.
pub fn plan_bulk_relabel(age_threshold: i32, replacement: &str) -> UpdatePlan {
    UpdatePlan::update(&MEMBER_TABLE)
        .set(MEMBER.username, replacement)
        .filter(Some(MEMBER.age.lt(age_threshold)))
}

// Appends `member_id ASC` unless an id term already makes the order total.
fn resolve_order(sort: &[SortOrder]) -> Result<Vec<OrderSpec>, QueryError> {
    let id = MEMBER.id.column_ref();
    let mut order = sort
        .iter()
        .map(|s| {
            resolve_sort_field(&s.field).map(|column| OrderSpec {
                column,
                direction: s.direction,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if !order.iter().any(|o| o.column == id) {
        order.push(OrderSpec::asc(id));
    }
    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SqlParam;

    const SELECT: &str = "SELECT member.member_id AS member_id, member.username AS username, \
        member.age AS age, team.team_id AS team_id, team.name AS team_name \
        FROM member LEFT JOIN team ON member.team_id = team.team_id";

    #[test]
    fn test_empty_condition_has_no_where() {
        let frag = plan_search(&SearchCondition::new()).to_sql();
        assert_eq!(frag.sql, format!("{SELECT} ORDER BY member.member_id ASC"));
        assert!(frag.params.is_empty());
    }

    #[test]
    fn test_full_condition() {
        let cond = SearchCondition::new()
            .with_username("member1")
            .with_team_name("teamA")
            .with_age_goe(5)
            .with_age_loe(15);
        let frag = plan_search(&cond).to_sql();
        assert_eq!(
            frag.sql,
            format!(
                "{SELECT} WHERE member.username = ?1 AND team.name = ?2 \
                 AND member.age >= ?3 AND member.age <= ?4 ORDER BY member.member_id ASC"
            )
        );
        assert_eq!(frag.params.len(), 4);
    }

    #[test]
    fn test_page_plan() {
        let cond = SearchCondition::new().with_team_name("teamB");
        let pageable = Pageable::new(1, 2).with_sort(SortOrder::desc("age"));
        let plan = plan_page(&cond, &pageable).unwrap();

        let content = plan.content.to_sql();
        assert_eq!(
            content.sql,
            format!(
                "{SELECT} WHERE team.name = ?1 ORDER BY member.age DESC, member.member_id ASC \
                 LIMIT ?2 OFFSET ?3"
            )
        );
        assert_eq!(
            content.params,
            vec![
                SqlParam::String("teamB".into()),
                SqlParam::Integer(2),
                SqlParam::Integer(2),
            ]
        );

        let count = plan.count.to_sql();
        assert_eq!(
            count.sql,
            "SELECT COUNT(member.member_id) AS total FROM member \
             LEFT JOIN team ON member.team_id = team.team_id WHERE team.name = ?1"
        );
        assert_eq!(count.params, vec![SqlParam::String("teamB".into())]);
    }

    #[test]
    fn test_tie_breaker_omitted_when_sorting_by_id() {
        let pageable = Pageable::new(0, 10)
            .with_sort(SortOrder::desc("memberId"))
            .with_sort(SortOrder::asc("age"));
        let sql = plan_page(&SearchCondition::new(), &pageable)
            .unwrap()
            .content
            .to_sql()
            .sql;
        assert!(sql.contains("ORDER BY member.member_id DESC, member.age ASC LIMIT"));
    }

    #[test]
    fn test_nullable_sort_columns() {
        let sort = [SortOrder::desc("username"), SortOrder::asc("teamName")];
        let sql = plan_search_sorted(&SearchCondition::new(), &sort)
            .unwrap()
            .to_sql()
            .sql;
        assert!(sql.ends_with(
            "ORDER BY member.username DESC NULLS FIRST, team.name ASC NULLS LAST, member.member_id ASC"
        ));
    }

    #[test]
    fn test_zero_page_size() {
        let err = plan_page(&SearchCondition::new(), &Pageable::new(0, 0)).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPage { .. }));
    }

    #[test]
    fn test_unknown_sort_field() {
        let pageable = Pageable::new(0, 10).with_sort(SortOrder::asc("salary"));
        let err = plan_page(&SearchCondition::new(), &pageable).unwrap_err();
        assert!(matches!(err, QueryError::InvalidSort { ref field, .. } if field == "salary"));
    }

    #[test]
    fn test_sort_field_aliases() {
        assert_eq!(resolve_sort_field("id").unwrap(), MEMBER.id.column_ref());
        assert_eq!(resolve_sort_field("member_id").unwrap(), MEMBER.id.column_ref());
        assert_eq!(resolve_sort_field("team_name").unwrap(), TEAM.name.column_ref());
        assert!(resolve_sort_field("TeamName").is_err());
    }

    #[test]
    fn test_find_all_projection() {
        assert_eq!(
            plan_find_all().to_sql().sql,
            "SELECT member.member_id AS member_id, member.username AS username, \
             member.age AS age, member.team_id AS team_id FROM member \
             ORDER BY member.member_id ASC"
        );
    }

    #[test]
    fn test_member_stats_projection() {
        assert_eq!(
            plan_member_stats().to_sql().sql,
            "SELECT COUNT(member.member_id) AS member_count, SUM(member.age) AS age_sum, \
             AVG(member.age) AS age_avg, MAX(member.age) AS age_max, \
             MIN(member.age) AS age_min FROM member"
        );
    }

    #[test]
    fn test_oldest_members_compares_against_max() {
        assert_eq!(
            plan_oldest_members().to_sql().sql,
            "SELECT member.member_id AS member_id, member.username AS username, \
             member.age AS age, member.team_id AS team_id FROM member \
             WHERE member.age = (SELECT MAX(member.age) AS max_age FROM member) \
             ORDER BY member.member_id ASC"
        );
    }

    #[test]
    fn test_average_age_subquery() {
        let sql = plan_members_at_least_average_age().to_sql().sql;
        assert!(
            sql.contains("WHERE member.age >= (SELECT AVG(member.age) AS avg_age FROM member)")
        );
    }

    #[test]
    fn test_joined_team_filter_is_in_on_clause() {
        let frag = plan_members_with_joined_team("teamA").to_sql();
        assert_eq!(
            frag.sql,
            "SELECT member.member_id AS member_id, member.username AS username, \
             member.age AS age, team.team_id AS team_id, team.name AS team_name \
             FROM member LEFT JOIN team ON member.team_id = team.team_id AND team.name = ?1 \
             ORDER BY member.member_id ASC"
        );
        assert_eq!(frag.params, vec![SqlParam::String("teamA".into())]);
    }

    #[test]
    fn test_username_contains() {
        let cond = SearchCondition::new().with_username_contains("ber1");
        let frag = plan_search(&cond).to_sql();
        assert!(frag.sql.contains("WHERE member.username LIKE ?1 ESCAPE '\\'"));
        assert_eq!(frag.params, vec![SqlParam::String("%ber1%".into())]);
    }

    #[test]
    fn test_bulk_relabel() {
        let frag = plan_bulk_relabel(28, "junior").to_sql();
        assert_eq!(frag.sql, "UPDATE member SET username = ?1 WHERE member.age < ?2");
    }
}
