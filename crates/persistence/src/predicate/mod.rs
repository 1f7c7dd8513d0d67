//! Predicate algebra over typed columns.
//!
//! Predicates are plain trees ([`Expr`]) built from the typed handles in
//! [`crate::schema`]. Optional inputs are modelled as `Option<Expr>`: the
//! `*_or_none` helpers turn a missing value into `None`, and [`and`]/[`or`]
//! drop `None` children. A search form with nothing filled in therefore
//! composes to `None`, which the query composer renders as "no WHERE clause".
//!
//! ```
//! use roster_persistence::predicate::{and, eq_or_none, goe_or_none};
//! use roster_persistence::schema::MEMBER;
//!
//! let username: Option<&str> = None;
//! let predicate = and([
//!     eq_or_none(MEMBER.username, username),
//!     goe_or_none(MEMBER.age, Some(20)),
//! ]);
//!
//! let sql = predicate.unwrap().to_fragment();
//! assert_eq!(sql.sql, "member.age >= ?1");
//! ```

use crate::query::{Plan, SqlFragment, SqlParam};
use crate::schema::{Column, ColumnRef};

/// Escape character used by [`Column::contains`] patterns.
pub const LIKE_ESCAPE: char = '\\';

/// Comparison operator against a scalar subquery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `=`.
    Eq,
    /// `>=`.
    Goe,
    /// `<=`.
    Loe,
    /// `<`.
    Lt,
}

impl Comparison {
    fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Goe => ">=",
            Comparison::Loe => "<=",
            Comparison::Lt => "<",
        }
    }
}

/// A boolean expression over columns.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `col = value`; a NULL value renders as `col IS NULL`.
    Eq(ColumnRef, SqlParam),
    /// `col >= value`.
    Goe(ColumnRef, SqlParam),
    /// `col <= value`.
    Loe(ColumnRef, SqlParam),
    /// `col < value`.
    Lt(ColumnRef, SqlParam),
    /// `col LIKE pattern`, with `\` as the escape character.
    Like(ColumnRef, String),
    /// Conjunction. Empty renders as always-true.
    And(Vec<Expr>),
    /// Disjunction. Empty renders as always-false.
    Or(Vec<Expr>),
    /// `col IS NOT NULL`.
    IsNotNull(ColumnRef),
    /// `col <op> (SELECT ...)`. The subquery must yield one row and one column.
    Scalar(ColumnRef, Comparison, Box<Plan>),
}

impl<T: Into<SqlParam>> Column<T> {
    /// `self = value`.
    pub fn eq(self, value: impl Into<T>) -> Expr {
        let value: T = value.into();
        Expr::Eq(self.column_ref(), value.into())
    }

    /// `self >= value`.
    pub fn goe(self, value: impl Into<T>) -> Expr {
        let value: T = value.into();
        Expr::Goe(self.column_ref(), value.into())
    }

    /// `self <= value`.
    pub fn loe(self, value: impl Into<T>) -> Expr {
        let value: T = value.into();
        Expr::Loe(self.column_ref(), value.into())
    }

    /// `self < value`.
    pub fn lt(self, value: impl Into<T>) -> Expr {
        let value: T = value.into();
        Expr::Lt(self.column_ref(), value.into())
    }
}

impl<T> Column<T> {
    /// `self IS NOT NULL`.
    pub fn is_not_null(self) -> Expr {
        Expr::IsNotNull(self.column_ref())
    }

    /// `self = (subquery)`.
    pub fn eq_scalar(self, subquery: Plan) -> Expr {
        self.compare_scalar(Comparison::Eq, subquery)
    }

    /// `self >= (subquery)`.
    pub fn goe_scalar(self, subquery: Plan) -> Expr {
        self.compare_scalar(Comparison::Goe, subquery)
    }

    /// `self <= (subquery)`.
    pub fn loe_scalar(self, subquery: Plan) -> Expr {
        self.compare_scalar(Comparison::Loe, subquery)
    }

    /// `self <op> (subquery)`.
    pub fn compare_scalar(self, op: Comparison, subquery: Plan) -> Expr {
        Expr::Scalar(self.column_ref(), op, Box::new(subquery))
    }
}

impl Column<String> {
    /// Substring match; wildcards in `needle` are matched literally.
    pub fn contains(self, needle: &str) -> Expr {
        Expr::Like(self.column_ref(), format!("%{}%", escape_like(needle)))
    }
}

/// Escapes `%`, `_` and the escape character itself for use in a LIKE pattern.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

/// `Some(col = v)` when a value is present.
pub fn eq_or_none<T, V>(col: Column<T>, value: Option<V>) -> Option<Expr>
where
    T: Into<SqlParam>,
    V: Into<T>,
{
    value.map(|v| col.eq(v))
}

/// `Some(col >= v)` when a value is present.
pub fn goe_or_none<T, V>(col: Column<T>, value: Option<V>) -> Option<Expr>
where
    T: Into<SqlParam>,
    V: Into<T>,
{
    value.map(|v| col.goe(v))
}

/// `Some(col <= v)` when a value is present.
pub fn loe_or_none<T, V>(col: Column<T>, value: Option<V>) -> Option<Expr>
where
    T: Into<SqlParam>,
    V: Into<T>,
{
    value.map(|v| col.loe(v))
}

/// `Some(col LIKE %needle%)` when a value is present.
pub fn contains_or_none(col: Column<String>, needle: Option<&str>) -> Option<Expr> {
    needle.map(|n| col.contains(n))
}

/// Conjunction of the present parts.
///
/// Returns `None` when nothing survives, the sole child when one does,
/// and an [`Expr::And`] otherwise.
pub fn and<I>(parts: I) -> Option<Expr>
where
    I: IntoIterator<Item = Option<Expr>>,
{
    collapse(parts, Expr::And)
}

/// Disjunction of the present parts. Same collapsing rules as [`and`].
pub fn or<I>(parts: I) -> Option<Expr>
where
    I: IntoIterator<Item = Option<Expr>>,
{
    collapse(parts, Expr::Or)
}

fn collapse<I>(parts: I, node: fn(Vec<Expr>) -> Expr) -> Option<Expr>
where
    I: IntoIterator<Item = Option<Expr>>,
{
    let mut children: Vec<Expr> = parts.into_iter().flatten().collect();
    match children.len() {
        0 => None,
        1 => children.pop(),
        _ => Some(node(children)),
    }
}

impl Expr {
    /// Renders into `frag`, appending SQL text and binding values left to right.
    pub fn render(&self, frag: &mut SqlFragment) {
        match self {
            Expr::Eq(col, SqlParam::Null) => {
                frag.push_str(&format!("{} IS NULL", col.qualified()));
            }
            Expr::Eq(col, value) => render_comparison(frag, col, "=", value),
            Expr::Goe(col, value) => render_comparison(frag, col, ">=", value),
            Expr::Loe(col, value) => render_comparison(frag, col, "<=", value),
            Expr::Lt(col, value) => render_comparison(frag, col, "<", value),
            Expr::Like(col, pattern) => {
                frag.push_str(&format!("{} LIKE ", col.qualified()));
                frag.push_param(SqlParam::string(pattern.as_str()));
                frag.push_str(&format!(" ESCAPE '{}'", LIKE_ESCAPE));
            }
            Expr::IsNotNull(col) => {
                frag.push_str(&format!("{} IS NOT NULL", col.qualified()));
            }
            Expr::Scalar(col, op, subquery) => {
                frag.push_str(&format!("{} {} (", col.qualified(), op.as_sql()));
                subquery.render(frag);
                frag.push_str(")");
            }
            Expr::And(children) => render_compound(frag, children, " AND ", "1 = 1"),
            Expr::Or(children) => render_compound(frag, children, " OR ", "1 = 0"),
        }
    }

    /// Renders into a fresh fragment starting at `?1`.
    pub fn to_fragment(&self) -> SqlFragment {
        let mut frag = SqlFragment::default();
        self.render(&mut frag);
        frag
    }

    /// Combines two expressions with AND, flattening nested conjunctions.
    pub fn and(self, other: Expr) -> Expr {
        let mut children = match self {
            Expr::And(children) => children,
            single => vec![single],
        };
        match other {
            Expr::And(more) => children.extend(more),
            single => children.push(single),
        }
        Expr::And(children)
    }

    pub(crate) fn is_compound(&self) -> bool {
        matches!(self, Expr::And(c) | Expr::Or(c) if c.len() > 1)
    }
}

fn render_comparison(frag: &mut SqlFragment, col: &ColumnRef, op: &str, value: &SqlParam) {
    frag.push_str(&format!("{} {} ", col.qualified(), op));
    frag.push_param(value.clone());
}

fn render_compound(frag: &mut SqlFragment, children: &[Expr], separator: &str, empty: &str) {
    if children.is_empty() {
        frag.push_str(empty);
        return;
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            frag.push_str(separator);
        }
        if child.is_compound() {
            frag.push_str("(");
            child.render(frag);
            frag.push_str(")");
        } else {
            child.render(frag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MEMBER, TEAM};

    #[test]
    fn test_or_none_helpers_skip_missing_values() {
        assert_eq!(eq_or_none(MEMBER.username, None::<&str>), None);
        assert_eq!(goe_or_none(MEMBER.age, None::<i32>), None);
        assert_eq!(loe_or_none(MEMBER.age, None::<i32>), None);
        assert_eq!(contains_or_none(MEMBER.username, None), None);

        assert_eq!(
            eq_or_none(MEMBER.username, Some("member1")),
            Some(Expr::Eq(
                MEMBER.username.column_ref(),
                SqlParam::String("member1".into())
            ))
        );
    }

    #[test]
    fn test_and_collapses() {
        assert_eq!(and([None, None]), None);
        assert_eq!(and(Vec::<Option<Expr>>::new()), None);

        let single = and([None, Some(MEMBER.age.goe(10)), None]).unwrap();
        assert_eq!(single, MEMBER.age.goe(10));

        let many = and([Some(MEMBER.age.goe(10)), Some(MEMBER.age.loe(20))]).unwrap();
        assert!(matches!(many, Expr::And(ref c) if c.len() == 2));
    }

    #[test]
    fn test_or_collapses() {
        assert_eq!(or([None]), None);
        let single = or([Some(TEAM.name.eq("teamA"))]).unwrap();
        assert_eq!(single, TEAM.name.eq("teamA"));
    }

    #[test]
    fn test_render_binds_left_to_right() {
        let expr = and([
            eq_or_none(MEMBER.username, Some("member1")),
            eq_or_none(TEAM.name, Some("teamA")),
            goe_or_none(MEMBER.age, Some(10)),
            loe_or_none(MEMBER.age, Some(30)),
        ])
        .unwrap();

        let frag = expr.to_fragment();
        assert_eq!(
            frag.sql,
            "member.username = ?1 AND team.name = ?2 AND member.age >= ?3 AND member.age <= ?4"
        );
        assert_eq!(
            frag.params,
            vec![
                SqlParam::String("member1".into()),
                SqlParam::String("teamA".into()),
                SqlParam::Integer(10),
                SqlParam::Integer(30),
            ]
        );
    }

    #[test]
    fn test_render_nested_compound_is_parenthesized() {
        let expr = and([
            or([Some(MEMBER.age.lt(20)), Some(MEMBER.age.goe(40))]),
            Some(MEMBER.team_id.is_not_null()),
        ])
        .unwrap();

        let frag = expr.to_fragment();
        assert_eq!(
            frag.sql,
            "(member.age < ?1 OR member.age >= ?2) AND member.team_id IS NOT NULL"
        );
    }

    #[test]
    fn test_render_empty_compounds() {
        assert_eq!(Expr::And(vec![]).to_fragment().sql, "1 = 1");
        assert_eq!(Expr::Or(vec![]).to_fragment().sql, "1 = 0");
    }

    #[test]
    fn test_eq_null_renders_is_null() {
        let expr = Expr::Eq(MEMBER.username.column_ref(), SqlParam::Null);
        let frag = expr.to_fragment();
        assert_eq!(frag.sql, "member.username IS NULL");
        assert!(frag.params.is_empty());
    }

    #[test]
    fn test_contains_escapes_wildcards() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");

        let frag = MEMBER.username.contains("a_b").to_fragment();
        assert_eq!(frag.sql, "member.username LIKE ?1 ESCAPE '\\'");
        assert_eq!(frag.params, vec![SqlParam::String("%a\\_b%".into())]);
    }

    #[test]
    fn test_scalar_subquery_is_parenthesized() {
        use crate::query::Aggregate;
        use crate::schema::MEMBER_TABLE;

        let max_age =
            Plan::select_from(&MEMBER_TABLE).aggregate(Aggregate::Max, MEMBER.age, "max_age");
        let frag = MEMBER.age.eq_scalar(max_age).to_fragment();
        assert_eq!(
            frag.sql,
            "member.age = (SELECT MAX(member.age) AS max_age FROM member)"
        );
        assert!(frag.params.is_empty());
    }

    #[test]
    fn test_scalar_subquery_continues_ordinals() {
        use crate::query::Aggregate;
        use crate::schema::MEMBER_TABLE;

        let team_max = Plan::select_from(&MEMBER_TABLE)
            .aggregate(Aggregate::Max, MEMBER.age, "max_age")
            .filter(Some(MEMBER.team_id.eq(2)));
        let expr = and([
            Some(MEMBER.username.contains("member")),
            Some(MEMBER.age.loe_scalar(team_max)),
            Some(MEMBER.age.goe(15)),
        ])
        .unwrap();

        let frag = expr.to_fragment();
        assert_eq!(
            frag.sql,
            "member.username LIKE ?1 ESCAPE '\\' AND member.age <= \
             (SELECT MAX(member.age) AS max_age FROM member WHERE member.team_id = ?2) \
             AND member.age >= ?3"
        );
        assert_eq!(
            frag.params,
            vec![
                SqlParam::String("%member%".into()),
                SqlParam::Integer(2),
                SqlParam::Integer(15),
            ]
        );
    }

    #[test]
    fn test_expr_and_flattens() {
        let expr = MEMBER.age.goe(1).and(MEMBER.age.loe(2)).and(MEMBER.age.lt(3));
        assert!(matches!(expr, Expr::And(ref c) if c.len() == 3));
    }
}
