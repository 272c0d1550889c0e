//! Fluent query builder.
//!
//! [`QueryBuilder`] only accumulates clauses. Terminal operations
//! (`select_all`, `insert`, `update`, `delete`, aggregates) hand the state to a
//! [`Compiler`](crate::compiler::Compiler) for the builder's dialect and return a
//! [`CompiledStatement`]. Terminals borrow the builder, so compiling the same
//! state twice yields identical output.
//!
//! # Example
//! ```ignore
//! use polysql::{Dialect, QueryBuilder};
//!
//! let stmt = QueryBuilder::new("users", Dialect::MySql)
//!     .eq("email", "a@b.com")
//!     .order_by_asc("id")
//!     .limit(1)
//!     .select_all(&["*"])?;
//!
//! assert_eq!(stmt.sql, "SELECT * FROM `users` WHERE email = ? ORDER BY id ASC LIMIT 1");
//! # Ok::<(), polysql::QueryError>(())
//! ```

pub mod join;
pub mod predicate;

pub use join::{Join, JoinCondition, JoinType};
pub use predicate::{Clause, Predicate, Predicates, Separator};

use crate::compiler::{Aggregate, Compiler};
use crate::dialect::Dialect;
use crate::error::{QueryError, QueryResult};
use crate::statement::CompiledStatement;
use crate::value::Operand;
use std::str::FromStr;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl FromStr for Direction {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(QueryError::validation(format!("unknown order direction '{s}'")))
        }
    }
}

/// One ORDER BY item. A `None` direction means the column text is emitted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ordering {
    pub column: String,
    pub direction: Option<Direction>,
}

/// Ordered column -> value map for INSERT and UPDATE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Values {
    entries: Vec<(String, Operand)>,
}

impl Values {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set a column value. Setting the same column again replaces the value in place.
    pub fn set(mut self, column: &str, value: impl Into<Operand>) -> Self {
        self.insert(column, value.into());
        self
    }

    /// Set a column value if `value` is Some.
    pub fn set_opt<T: Into<Operand>>(self, column: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    fn insert(&mut self, column: &str, value: Operand) {
        match self.entries.iter_mut().find(|(c, _)| c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column.to_string(), value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Operand)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<K: AsRef<str>, V: Into<Operand>> FromIterator<(K, V)> for Values {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Values::new();
        for (k, v) in iter {
            values.insert(k.as_ref(), v.into());
        }
        values
    }
}

/// Accumulated state of one statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct QueryBuilder {
    pub(crate) dialect: Dialect,
    pub(crate) table: String,
    pub(crate) distinct: bool,
    pub(crate) columns: Vec<String>,
    pub(crate) wheres: Predicates,
    pub(crate) joins: Vec<Join>,
    pub(crate) groupings: Vec<String>,
    pub(crate) havings: Predicates,
    pub(crate) orderings: Vec<Ordering>,
    pub(crate) limit: Option<u64>,
    pub(crate) offset: Option<u64>,
}

impl QueryBuilder {
    /// Create a builder for `table` compiled with `dialect`.
    pub fn new(table: &str, dialect: Dialect) -> Self {
        Self {
            dialect,
            table: table.to_string(),
            distinct: false,
            columns: vec!["*".to_string()],
            wheres: Predicates::new(),
            joins: Vec::new(),
            groupings: Vec::new(),
            havings: Predicates::new(),
            orderings: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Create a builder whose dialect is resolved from a driver identifier.
    pub fn for_driver(table: &str, driver: &str) -> Self {
        Self::new(table, Dialect::from_driver(driver))
    }

    // ==================== Accessors ====================

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn get_columns(&self) -> &[String] {
        &self.columns
    }

    pub fn wheres(&self) -> &Predicates {
        &self.wheres
    }

    pub fn havings(&self) -> &Predicates {
        &self.havings
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn groupings(&self) -> &[String] {
        &self.groupings
    }

    pub fn orderings(&self) -> &[Ordering] {
        &self.orderings
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.offset
    }

    // ==================== SELECT columns ====================

    /// Switch the dialect.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// SELECT DISTINCT.
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Set the column list used by [`QueryBuilder::select`]. An empty list means `*`.
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = column_list(cols);
        self
    }

    // ==================== WHERE ====================

    /// Add WHERE: column operator value (AND).
    ///
    /// The operator is emitted verbatim; never pass untrusted operator text.
    pub fn filter(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.wheres.filter(column, operator, value);
        self
    }

    /// Add WHERE: column operator value (OR).
    pub fn or_filter(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.wheres.or_filter(column, operator, value);
        self
    }

    /// Add WHERE: column = value
    pub fn eq(mut self, column: &str, value: impl Into<Operand>) -> Self {
        self.wheres.equals(column, value);
        self
    }

    /// Add WHERE: column != value
    pub fn ne(mut self, column: &str, value: impl Into<Operand>) -> Self {
        self.wheres.not_equals(column, value);
        self
    }

    /// Add WHERE: column > value
    pub fn gt(mut self, column: &str, value: impl Into<Operand>) -> Self {
        self.wheres.gt(column, value);
        self
    }

    /// Add WHERE: column >= value
    pub fn gte(mut self, column: &str, value: impl Into<Operand>) -> Self {
        self.wheres.gte(column, value);
        self
    }

    /// Add WHERE: column < value
    pub fn lt(mut self, column: &str, value: impl Into<Operand>) -> Self {
        self.wheres.lt(column, value);
        self
    }

    /// Add WHERE: column <= value
    pub fn lte(mut self, column: &str, value: impl Into<Operand>) -> Self {
        self.wheres.lte(column, value);
        self
    }

    /// Add WHERE: column LIKE pattern
    pub fn like(mut self, column: &str, pattern: impl Into<Operand>) -> Self {
        self.wheres.like(column, pattern);
        self
    }

    /// Add WHERE: column NOT LIKE pattern
    pub fn not_like(mut self, column: &str, pattern: impl Into<Operand>) -> Self {
        self.wheres.not_like(column, pattern);
        self
    }

    /// Add a verbatim WHERE condition.
    pub fn where_raw(mut self, sql: &str) -> Self {
        self.wheres.raw(sql);
        self
    }

    /// Add WHERE: column BETWEEN low AND high
    pub fn between(
        mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        self.wheres.between(column, low, high);
        self
    }

    pub fn or_between(
        mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        self.wheres.or_between(column, low, high);
        self
    }

    pub fn not_between(
        mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        self.wheres.not_between(column, low, high);
        self
    }

    pub fn or_not_between(
        mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        self.wheres.or_not_between(column, low, high);
        self
    }

    /// Add WHERE: column IN (values...). An empty list matches nothing.
    pub fn in_list<V: Into<Operand>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.wheres.in_list(column, values);
        self
    }

    pub fn or_in_list<V: Into<Operand>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.wheres.or_in_list(column, values);
        self
    }

    /// Add WHERE: column NOT IN (values...). An empty list matches everything.
    pub fn not_in<V: Into<Operand>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.wheres.not_in(column, values);
        self
    }

    pub fn or_not_in<V: Into<Operand>>(
        mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.wheres.or_not_in(column, values);
        self
    }

    /// Add WHERE: column IS NULL
    pub fn is_null(mut self, column: &str) -> Self {
        self.wheres.is_null(column);
        self
    }

    pub fn or_is_null(mut self, column: &str) -> Self {
        self.wheres.or_is_null(column);
        self
    }

    /// Add WHERE: column IS NOT NULL
    pub fn is_not_null(mut self, column: &str) -> Self {
        self.wheres.is_not_null(column);
        self
    }

    pub fn or_is_not_null(mut self, column: &str) -> Self {
        self.wheres.or_is_not_null(column);
        self
    }

    /// Add a parenthesized WHERE group (AND).
    ///
    /// ```ignore
    /// table("users", Dialect::Generic).eq("active", true).where_group(|g| {
    ///     g.equals("role", "admin").or_equals("role", "owner");
    /// });
    /// // ... WHERE active = ? AND (role = ? OR role = ?)
    /// ```
    pub fn where_group<F: FnOnce(&mut Predicates)>(mut self, build: F) -> Self {
        self.wheres.group(build);
        self
    }

    /// Add a parenthesized WHERE group (OR).
    pub fn or_where_group<F: FnOnce(&mut Predicates)>(mut self, build: F) -> Self {
        self.wheres.or_group(build);
        self
    }

    /// Append a prebuilt WHERE predicate.
    pub fn where_predicate(mut self, separator: Separator, predicate: Predicate) -> Self {
        self.wheres.push(separator, predicate);
        self
    }

    // ==================== JOIN ====================

    /// Add a join on a single `left operator right` condition.
    pub fn join(
        mut self,
        table: &str,
        left: &str,
        operator: &str,
        right: &str,
        join_type: JoinType,
    ) -> Self {
        let mut join = Join::new(table, join_type);
        join.on(left, operator, right);
        self.joins.push(join);
        self
    }

    pub fn inner_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join(table, left, operator, right, JoinType::Inner)
    }

    pub fn left_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join(table, left, operator, right, JoinType::Left)
    }

    pub fn right_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join(table, left, operator, right, JoinType::Right)
    }

    pub fn full_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join(table, left, operator, right, JoinType::Full)
    }

    /// Add a CROSS JOIN (no ON clause).
    pub fn cross_join(mut self, table: &str) -> Self {
        self.joins.push(Join::new(table, JoinType::Cross));
        self
    }

    /// Add a join with several ON conditions.
    ///
    /// ```ignore
    /// table("users", Dialect::Generic).join_on("orders", JoinType::Left, |j| {
    ///     j.on("users.id", "=", "orders.user_id")
    ///         .or_on("users.legacy_id", "=", "orders.user_id");
    /// });
    /// ```
    pub fn join_on<F: FnOnce(&mut Join)>(mut self, table: &str, join_type: JoinType, build: F) -> Self {
        let mut join = Join::new(table, join_type);
        build(&mut join);
        self.joins.push(join);
        self
    }

    // ==================== Grouping & Ordering ====================

    /// Append a GROUP BY column.
    pub fn group_by(mut self, column: &str) -> Self {
        self.groupings.push(column.to_string());
        self
    }

    /// Append several GROUP BY columns.
    pub fn group_by_cols(mut self, columns: &[&str]) -> Self {
        self.groupings.extend(columns.iter().map(|c| c.to_string()));
        self
    }

    /// Add HAVING: column operator value (AND).
    pub fn having(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.havings.filter(column, operator, value);
        self
    }

    /// Add HAVING: column operator value (OR).
    pub fn or_having(mut self, column: &str, operator: &str, value: impl Into<Operand>) -> Self {
        self.havings.or_filter(column, operator, value);
        self
    }

    /// Append a prebuilt HAVING predicate.
    pub fn having_predicate(mut self, separator: Separator, predicate: Predicate) -> Self {
        self.havings.push(separator, predicate);
        self
    }

    /// Append an ORDER BY item.
    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.orderings.push(Ordering {
            column: column.to_string(),
            direction: Some(direction),
        });
        self
    }

    pub fn order_by_asc(self, column: &str) -> Self {
        self.order_by(column, Direction::Asc)
    }

    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by(column, Direction::Desc)
    }

    /// Append a verbatim ORDER BY item (e.g. `FIELD(id, 3, 1, 2)`).
    pub fn order_by_raw(mut self, clause: &str) -> Self {
        self.orderings.push(Ordering {
            column: clause.to_string(),
            direction: None,
        });
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT, replacing any previous value. Negative values clamp to 0.
    pub fn limit(mut self, n: i64) -> Self {
        self.limit = Some(clamp(n));
        self
    }

    /// Set OFFSET, replacing any previous value. Negative values clamp to 0.
    pub fn offset(mut self, n: i64) -> Self {
        self.offset = Some(clamp(n));
        self
    }

    /// Pagination helper.
    ///
    /// `page` is 1-based (clamped to >= 1).
    /// `per_page` is clamped to >= 1.
    pub fn paginate(mut self, page: i64, per_page: i64) -> Self {
        let p = clamp(page).max(1);
        let size = clamp(per_page).max(1);
        self.limit = Some(size);
        self.offset = Some((p - 1).saturating_mul(size));
        self
    }

    // ==================== Terminal operations ====================

    fn compiler(&self) -> Compiler<'_> {
        Compiler::new(self)
    }

    /// Compile a SELECT of the configured column list.
    pub fn select(&self) -> QueryResult<CompiledStatement> {
        self.compiler().select()
    }

    /// Compile a SELECT of `columns` (empty means `*`).
    pub fn select_all(&self, columns: &[&str]) -> QueryResult<CompiledStatement> {
        let mut q = self.clone();
        q.columns = column_list(columns);
        q.compiler().select()
    }

    /// Compile a SELECT of the first matching row.
    pub fn select_first(&self, columns: &[&str]) -> QueryResult<CompiledStatement> {
        let mut q = self.clone();
        q.columns = column_list(columns);
        q.limit = Some(1);
        q.compiler().select()
    }

    /// Compile a SELECT of a single column of the first matching row.
    pub fn select_column(&self, column: &str) -> QueryResult<CompiledStatement> {
        if column.trim().is_empty() {
            return Err(QueryError::invalid_statement("select_column requires a column"));
        }
        let mut q = self.clone();
        q.columns = vec![column.to_string()];
        q.limit = Some(1);
        q.compiler().select()
    }

    /// Compile an INSERT of one row.
    pub fn insert(&self, values: Values) -> QueryResult<CompiledStatement> {
        self.compiler().insert(&values)
    }

    /// Compile an UPDATE of the matching rows.
    pub fn update(&self, values: Values) -> QueryResult<CompiledStatement> {
        self.compiler().update(&values)
    }

    /// Compile a DELETE of the matching rows.
    pub fn delete(&self) -> QueryResult<CompiledStatement> {
        self.compiler().delete()
    }

    /// `UPDATE ... SET column = column + ?`
    pub fn increment(&self, column: &str, by: i64) -> QueryResult<CompiledStatement> {
        self.compiler().step(column, "+", by)
    }

    /// `UPDATE ... SET column = column - ?`
    pub fn decrement(&self, column: &str, by: i64) -> QueryResult<CompiledStatement> {
        self.compiler().step(column, "-", by)
    }

    /// `SELECT COUNT(column) ...`
    pub fn count(&self, column: &str) -> QueryResult<CompiledStatement> {
        self.compiler().aggregate(Aggregate::Count, column)
    }

    /// `SELECT COUNT(DISTINCT column) ...`
    pub fn count_distinct(&self, column: &str) -> QueryResult<CompiledStatement> {
        self.compiler().aggregate(Aggregate::CountDistinct, column)
    }

    pub fn min(&self, column: &str) -> QueryResult<CompiledStatement> {
        self.compiler().aggregate(Aggregate::Min, column)
    }

    pub fn max(&self, column: &str) -> QueryResult<CompiledStatement> {
        self.compiler().aggregate(Aggregate::Max, column)
    }

    pub fn sum(&self, column: &str) -> QueryResult<CompiledStatement> {
        self.compiler().aggregate(Aggregate::Sum, column)
    }

    pub fn avg(&self, column: &str) -> QueryResult<CompiledStatement> {
        self.compiler().aggregate(Aggregate::Avg, column)
    }
}

fn clamp(n: i64) -> u64 {
    n.max(0) as u64
}

fn column_list(cols: &[&str]) -> Vec<String> {
    if cols.is_empty() {
        vec!["*".to_string()]
    } else {
        cols.iter().map(|c| c.to_string()).collect()
    }
}

#[cfg(test)]
mod tests;
