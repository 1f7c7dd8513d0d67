//! Query plans and their SQL rendering.
//!
//! A [`Plan`] is a small, owned description of one SELECT: projection,
//! joins along schema associations (optionally narrowed by an extra ON
//! predicate), an optional WHERE predicate, grouping, ordering and an
//! optional LIMIT/OFFSET. A plan can also stand inside a predicate as a
//! scalar subquery. [`UpdatePlan`] is the equivalent
//! for a single-table UPDATE. Plans render to a [`SqlFragment`] whose
//! placeholders are numbered in the order values appear in the statement.
//!
//! The member search plans themselves are built in [`composer`].

pub mod composer;
mod fragment;

pub use composer::{
    PagePlan, plan_bulk_relabel, plan_count, plan_find_all, plan_member_stats,
    plan_members_at_least_average_age, plan_members_with_joined_team, plan_oldest_members,
    plan_page, plan_search, plan_search_sorted, plan_team_age_averages, resolve_sort_field,
    search_predicate,
};
pub use fragment::{SqlFragment, SqlParam};

use crate::predicate::Expr;
use crate::schema::{Association, ColumnRef, TableDef};
use crate::types::SortDirection;

/// Aggregate function applied to a projected column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// `COUNT(col)`.
    Count,
    /// `SUM(col)`.
    Sum,
    /// `AVG(col)`.
    Avg,
    /// `MAX(col)`.
    Max,
    /// `MIN(col)`.
    Min,
}

impl Aggregate {
    fn as_sql(&self) -> &'static str {
        match self {
            Aggregate::Count => "COUNT",
            Aggregate::Sum => "SUM",
            Aggregate::Avg => "AVG",
            Aggregate::Max => "MAX",
            Aggregate::Min => "MIN",
        }
    }
}

/// One projected column.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    /// Source column.
    pub column: ColumnRef,
    /// Aggregate wrapped around the column, if any.
    pub aggregate: Option<Aggregate>,
    /// Stable output alias.
    pub alias: &'static str,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// `INNER JOIN`.
    Inner,
    /// `LEFT JOIN`; target columns become nullable.
    Left,
}

/// A join along a schema association.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    /// Join type.
    pub kind: JoinKind,
    /// The association followed.
    pub association: &'static Association,
    /// Extra ON condition. On a LEFT JOIN it decides which target rows are
    /// joined; it never removes rows of the joining table.
    pub on: Option<Expr>,
}

/// One ORDER BY term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    /// Sorted column.
    pub column: ColumnRef,
    /// Sort direction.
    pub direction: SortDirection,
}

impl OrderSpec {
    /// Ascending order on `column`.
    pub fn asc(column: impl Into<ColumnRef>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending order on `column`.
    pub fn desc(column: impl Into<ColumnRef>) -> Self {
        Self {
            column: column.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A SELECT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    /// Projection, in output order.
    pub select: Vec<SelectItem>,
    /// Root table.
    pub from: &'static TableDef,
    /// Joins, applied in order.
    pub joins: Vec<Join>,
    /// WHERE clause; `None` omits it.
    pub predicate: Option<Expr>,
    /// GROUP BY columns.
    pub group_by: Vec<ColumnRef>,
    /// ORDER BY terms.
    pub order_by: Vec<OrderSpec>,
    /// Row limit.
    pub limit: Option<i64>,
    /// Rows skipped before the first returned row.
    pub offset: Option<i64>,
}

impl Plan {
    /// Starts an empty plan over `table`.
    pub fn select_from(table: &'static TableDef) -> Self {
        Self {
            select: Vec::new(),
            from: table,
            joins: Vec::new(),
            predicate: None,
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Projects a column under `alias`.
    pub fn column(mut self, column: impl Into<ColumnRef>, alias: &'static str) -> Self {
        self.select.push(SelectItem {
            column: column.into(),
            aggregate: None,
            alias,
        });
        self
    }

    /// Projects an aggregate under `alias`.
    pub fn aggregate(
        mut self,
        aggregate: Aggregate,
        column: impl Into<ColumnRef>,
        alias: &'static str,
    ) -> Self {
        self.select.push(SelectItem {
            column: column.into(),
            aggregate: Some(aggregate),
            alias,
        });
        self
    }

    /// Adds a LEFT JOIN along `association`.
    pub fn left_join(self, association: &'static Association) -> Self {
        self.left_join_on(association, None)
    }

    /// Adds a LEFT JOIN along `association`, joining only target rows that
    /// also satisfy `on`. `None` behaves like [`Plan::left_join`].
    pub fn left_join_on(mut self, association: &'static Association, on: Option<Expr>) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Left,
            association,
            on,
        });
        self
    }

    /// Adds an INNER JOIN along `association`.
    pub fn inner_join(mut self, association: &'static Association) -> Self {
        self.joins.push(Join {
            kind: JoinKind::Inner,
            association,
            on: None,
        });
        self
    }

    /// Sets the WHERE clause.
    pub fn filter(mut self, predicate: Option<Expr>) -> Self {
        self.predicate = predicate;
        self
    }

    /// Adds a GROUP BY column.
    pub fn group_by(mut self, column: impl Into<ColumnRef>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Replaces the ORDER BY terms.
    pub fn order_by(mut self, order: Vec<OrderSpec>) -> Self {
        self.order_by = order;
        self
    }

    /// Sets LIMIT and OFFSET.
    pub fn limit_offset(mut self, limit: i64, offset: i64) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    /// Whether `column` can read as NULL in this plan's result, either
    /// because it is declared nullable or because its table is LEFT-joined.
    pub fn is_nullable(&self, column: &ColumnRef) -> bool {
        column.nullable
            || self.joins.iter().any(|j| {
                j.kind == JoinKind::Left && j.association.target.name == column.table
            })
    }

    /// Renders the statement into a fresh fragment starting at `?1`.
    pub fn to_sql(&self) -> SqlFragment {
        let mut frag = SqlFragment::default();
        self.render(&mut frag);
        frag
    }

    /// Renders the statement into `frag`, continuing its placeholder numbering.
    pub fn render(&self, frag: &mut SqlFragment) {
        frag.push_str("SELECT ");

        let projection: Vec<String> = self
            .select
            .iter()
            .map(|item| match item.aggregate {
                Some(agg) => format!(
                    "{}({}) AS {}",
                    agg.as_sql(),
                    item.column.qualified(),
                    item.alias
                ),
                None => format!("{} AS {}", item.column.qualified(), item.alias),
            })
            .collect();
        frag.push_str(&projection.join(", "));

        frag.push_str(" FROM ");
        frag.push_str(self.from.name);

        for join in &self.joins {
            let keyword = match join.kind {
                JoinKind::Inner => "INNER JOIN",
                JoinKind::Left => "LEFT JOIN",
            };
            frag.push_str(&format!(
                " {} {} ON {} = {}",
                keyword,
                join.association.target.name,
                join.association.foreign_key.qualified(),
                join.association.target_key().qualified()
            ));
            if let Some(on) = &join.on {
                frag.push_str(" AND ");
                if on.is_compound() {
                    frag.push_str("(");
                    on.render(frag);
                    frag.push_str(")");
                } else {
                    on.render(frag);
                }
            }
        }

        if let Some(predicate) = &self.predicate {
            frag.push_str(" WHERE ");
            predicate.render(frag);
        }

        if !self.group_by.is_empty() {
            let cols: Vec<String> = self.group_by.iter().map(ColumnRef::qualified).collect();
            frag.push_str(" GROUP BY ");
            frag.push_str(&cols.join(", "));
        }

        if !self.order_by.is_empty() {
            let terms: Vec<String> = self
                .order_by
                .iter()
                .map(|o| self.render_order(o))
                .collect();
            frag.push_str(" ORDER BY ");
            frag.push_str(&terms.join(", "));
        }

        if let Some(limit) = self.limit {
            frag.push_str(" LIMIT ");
            frag.push_param(SqlParam::integer(limit));
            if let Some(offset) = self.offset {
                frag.push_str(" OFFSET ");
                frag.push_param(SqlParam::integer(offset));
            }
        }
    }

    // NULL sorts as the largest value.
    fn render_order(&self, order: &OrderSpec) -> String {
        let base = format!("{} {}", order.column.qualified(), order.direction.as_sql());
        if !self.is_nullable(&order.column) {
            return base;
        }
        match order.direction {
            SortDirection::Ascending => format!("{base} NULLS LAST"),
            SortDirection::Descending => format!("{base} NULLS FIRST"),
        }
    }
}

/// A single-table UPDATE.
#[derive(Debug, Clone)]
pub struct UpdatePlan {
    /// Updated table.
    pub table: &'static TableDef,
    /// `SET` assignments, in order.
    pub assignments: Vec<(ColumnRef, SqlParam)>,
    /// WHERE clause; `None` updates every row.
    pub predicate: Option<Expr>,
}

impl UpdatePlan {
    /// Starts an UPDATE of `table`.
    pub fn update(table: &'static TableDef) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            predicate: None,
        }
    }

    /// Adds `column = value`.
    pub fn set(mut self, column: impl Into<ColumnRef>, value: impl Into<SqlParam>) -> Self {
        self.assignments.push((column.into(), value.into()));
        self
    }

    /// Sets the WHERE clause.
    pub fn filter(mut self, predicate: Option<Expr>) -> Self {
        self.predicate = predicate;
        self
    }

    /// Renders the statement.
    pub fn to_sql(&self) -> SqlFragment {
        let mut frag = SqlFragment::new(format!("UPDATE {} SET ", self.table.name));
        for (i, (column, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                frag.push_str(", ");
            }
            frag.push_str(&format!("{} = ", column.name));
            frag.push_param(value.clone());
        }
        if let Some(predicate) = &self.predicate {
            frag.push_str(" WHERE ");
            predicate.render(&mut frag);
        }
        frag
    }
}
