//! Typed column references.

use std::fmt;
use std::marker::PhantomData;

/// An untyped reference to a physical column.
///
/// This is what the renderer works with once the value type has been
/// checked at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Owning table.
    pub table: &'static str,
    /// Column name within the table.
    pub name: &'static str,
    /// Whether the column admits NULL.
    pub nullable: bool,
}

impl ColumnRef {
    /// Returns `table.column`.
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.table, self.name)
    }
}

/// A column whose values have the Rust type `T`.
///
/// `T` only exists at the type level; predicates built from a `Column<i32>`
/// accept only values convertible into `i32`.
pub struct Column<T> {
    column: ColumnRef,
    _value: PhantomData<fn() -> T>,
}

impl<T> Column<T> {
    /// Declares a column. Used by the `const` schema tables.
    pub const fn new(table: &'static str, name: &'static str, nullable: bool) -> Self {
        Self {
            column: ColumnRef {
                table,
                name,
                nullable,
            },
            _value: PhantomData,
        }
    }

    /// Drops the value type.
    pub const fn column_ref(&self) -> ColumnRef {
        self.column
    }

    /// Column name without the table qualifier.
    pub const fn name(&self) -> &'static str {
        self.column.name
    }

    /// Whether the column admits NULL.
    pub const fn is_nullable(&self) -> bool {
        self.column.nullable
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Column<T> {}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("table", &self.column.table)
            .field("name", &self.column.name)
            .field("nullable", &self.column.nullable)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> From<Column<T>> for ColumnRef {
    fn from(col: Column<T>) -> Self {
        col.column
    }
}
