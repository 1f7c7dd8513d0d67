//! Static schema model for the `member` and `team` tables.
//!
//! Everything here is `const`/`static` data: typed column handles used to
//! build predicates, table descriptors used to build projections, and the
//! single `Member.team` association used to build joins.
//!
//! # Example
//!
//! ```
//! use roster_persistence::schema::{MEMBER, MEMBER_TABLE, TEAM};
//!
//! assert_eq!(MEMBER.age.column_ref().qualified(), "member.age");
//! assert!(TEAM.name.column_ref().qualified().starts_with("team."));
//! assert_eq!(MEMBER_TABLE.primary_key.name, "member_id");
//! ```

mod column;

pub use column::{Column, ColumnRef};

/// Nominal SQL type of a persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    /// 64-bit signed integer.
    Integer,
    /// UTF-8 text.
    Text,
}

impl SqlType {
    /// Type name as written in DDL.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Text => "TEXT",
        }
    }
}

/// Columns of the `member` table.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct MemberColumns {
    pub id: Column<i64>,
    pub username: Column<String>,
    pub age: Column<i32>,
    pub team_id: Column<i64>,
}

/// Columns of the `team` table.
#[derive(Debug, Clone, Copy)]
#[allow(missing_docs)]
pub struct TeamColumns {
    pub id: Column<i64>,
    pub name: Column<String>,
}

/// Typed handles for `member`.
pub const MEMBER: MemberColumns = MemberColumns {
    id: Column::new("member", "member_id", false),
    username: Column::new("member", "username", true),
    age: Column::new("member", "age", false),
    team_id: Column::new("member", "team_id", true),
};

/// Typed handles for `team`.
pub const TEAM: TeamColumns = TeamColumns {
    id: Column::new("team", "team_id", false),
    name: Column::new("team", "name", false),
};

/// One mapped field of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDef {
    /// Field name on the entity (`teamId`, not `team_id`).
    pub logical_name: &'static str,
    /// Physical column.
    pub column: ColumnRef,
    /// Declared type.
    pub sql_type: SqlType,
}

/// Table descriptor for one entity.
#[derive(Debug, PartialEq)]
pub struct TableDef {
    /// Entity name.
    pub entity: &'static str,
    /// Physical table name.
    pub name: &'static str,
    /// Primary key column.
    pub primary_key: ColumnRef,
    /// Fields in declaration order; projections follow this order.
    pub fields: &'static [FieldDef],
}

/// `Member` entity.
pub static MEMBER_TABLE: TableDef = TableDef {
    entity: "Member",
    name: "member",
    primary_key: MEMBER.id.column_ref(),
    fields: &[
        FieldDef {
            logical_name: "id",
            column: MEMBER.id.column_ref(),
            sql_type: SqlType::Integer,
        },
        FieldDef {
            logical_name: "username",
            column: MEMBER.username.column_ref(),
            sql_type: SqlType::Text,
        },
        FieldDef {
            logical_name: "age",
            column: MEMBER.age.column_ref(),
            sql_type: SqlType::Integer,
        },
        FieldDef {
            logical_name: "teamId",
            column: MEMBER.team_id.column_ref(),
            sql_type: SqlType::Integer,
        },
    ],
};

/// `Team` entity. The member back-reference is resolved by query, never stored.
pub static TEAM_TABLE: TableDef = TableDef {
    entity: "Team",
    name: "team",
    primary_key: TEAM.id.column_ref(),
    fields: &[
        FieldDef {
            logical_name: "id",
            column: TEAM.id.column_ref(),
            sql_type: SqlType::Integer,
        },
        FieldDef {
            logical_name: "name",
            column: TEAM.name.column_ref(),
            sql_type: SqlType::Text,
        },
    ],
};

/// A many-to-one link from a foreign key to the target's primary key.
#[derive(Debug, PartialEq)]
pub struct Association {
    /// Name of the navigation (`Member.team`).
    pub name: &'static str,
    /// Foreign key on the owning side.
    pub foreign_key: ColumnRef,
    /// Referenced table.
    pub target: &'static TableDef,
}

impl Association {
    /// Column on the target side of the join condition.
    pub fn target_key(&self) -> ColumnRef {
        self.target.primary_key
    }
}

/// `Member.team`: `member.team_id = team.team_id`.
pub static MEMBER_TEAM: Association = Association {
    name: "team",
    foreign_key: MEMBER.team_id.column_ref(),
    target: &TEAM_TABLE,
};
