//! SELECT pagination strategies.
//!
//! The compiler renders the clauses of a SELECT once into [`SelectParts`];
//! each strategy then assembles the final text, either by appending a suffix
//! or by nesting the query. Row bounds are always inlined integers, so nesting
//! never changes the order of bound parameters.

use crate::dialect::Pagination;

/// Alias of the row-number column in nested pagination queries.
pub const ROWNUM_ALIAS: &str = "mako_rownum";

/// Largest LIMIT MySQL accepts; used to express OFFSET without LIMIT.
pub const MYSQL_MAX_LIMIT: u64 = u64::MAX;

/// Upper bound for inlined row numbers. Nesting dialects compare against a
/// BIGINT, so bounds never exceed `i64::MAX`.
pub const MAX_ROW_BOUND: u64 = i64::MAX as u64;

/// Pre-rendered SELECT clauses.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SelectParts<'a> {
    pub distinct: bool,
    /// Column list
    pub columns: &'a str,
    /// `FROM ...` through HAVING, without leading space
    pub body: &'a str,
    /// ` ORDER BY ...` or empty
    pub order: &'a str,
}

impl SelectParts<'_> {
    fn head(&self) -> &'static str {
        if self.distinct {
            "SELECT DISTINCT "
        } else {
            "SELECT "
        }
    }

    /// The query without any pagination.
    pub fn plain(&self) -> String {
        format!("{}{} {}{}", self.head(), self.columns, self.body, self.order)
    }
}

/// LIMIT/OFFSET as set on the builder. An offset of 0 counts as unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Window {
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit,
            offset: offset.filter(|&o| o > 0),
        }
    }

    fn is_unbounded(&self) -> bool {
        self.limit.is_none() && self.offset.is_none()
    }

    /// First row number (1-based) of the window.
    fn first_row(&self) -> u64 {
        self.offset
            .unwrap_or(0)
            .saturating_add(1)
            .min(MAX_ROW_BOUND)
    }

    /// Last row number (1-based) of the window, if bounded.
    fn last_row(&self) -> Option<u64> {
        self.limit.map(|limit| {
            self.offset
                .unwrap_or(0)
                .saturating_add(limit)
                .min(MAX_ROW_BOUND)
        })
    }
}

/// Assemble the final SELECT text for `strategy`.
pub(crate) fn render(strategy: Pagination, parts: &SelectParts<'_>, window: Window) -> String {
    match strategy {
        Pagination::LimitOffset => limit_offset(parts, window),
        Pagination::MySqlLimit => mysql_limit(parts, window),
        Pagination::TopOrRowNumber => top_or_row_number(parts, window),
        Pagination::RowNum => rownum(parts, window),
        Pagination::RowNumber => row_number(parts, window),
        Pagination::RowsTo => rows_to(parts, window),
        Pagination::FetchOffset => fetch_offset(parts, window),
    }
}

fn limit_offset(parts: &SelectParts<'_>, window: Window) -> String {
    let mut sql = parts.plain();
    if let Some(limit) = window.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = window.offset {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
    sql
}

fn mysql_limit(parts: &SelectParts<'_>, window: Window) -> String {
    let mut sql = parts.plain();
    match (window.limit, window.offset) {
        (Some(limit), Some(offset)) => sql.push_str(&format!(" LIMIT {limit} OFFSET {offset}")),
        (Some(limit), None) => sql.push_str(&format!(" LIMIT {limit}")),
        (None, Some(offset)) => {
            sql.push_str(&format!(" LIMIT {MYSQL_MAX_LIMIT} OFFSET {offset}"));
        }
        (None, None) => {}
    }
    sql
}

/// SQL Server: `TOP n` for a plain limit, ROW_NUMBER() nesting once an offset is set.
fn top_or_row_number(parts: &SelectParts<'_>, window: Window) -> String {
    match (window.limit, window.offset) {
        (None, None) => parts.plain(),
        (Some(limit), None) => format!(
            "{}TOP {} {} {}{}",
            parts.head(),
            limit,
            parts.columns,
            parts.body,
            parts.order
        ),
        _ => row_number_nest(parts, window),
    }
}

/// DB2: ROW_NUMBER() nesting whenever a limit or offset is set.
fn row_number(parts: &SelectParts<'_>, window: Window) -> String {
    if window.is_unbounded() {
        return parts.plain();
    }
    row_number_nest(parts, window)
}

fn row_number_nest(parts: &SelectParts<'_>, window: Window) -> String {
    let over = match parts.order.trim_start() {
        "" => "ORDER BY (SELECT 0)",
        order => order,
    };
    let range = match window.last_row() {
        Some(last) => format!("BETWEEN {} AND {}", window.first_row(), last),
        None => format!(">= {}", window.first_row()),
    };
    format!(
        "SELECT * FROM ({}{}, ROW_NUMBER() OVER ({}) AS {ROWNUM_ALIAS} {}) AS m1 WHERE {ROWNUM_ALIAS} {}",
        parts.head(),
        parts.columns,
        over,
        parts.body,
        range
    )
}

/// Oracle: `rownum` filtering around the ordered inner query. A bare offset
/// keeps the outer `mako_rownum` filter and drops the inner upper bound.
fn rownum(parts: &SelectParts<'_>, window: Window) -> String {
    let inner = parts.plain();
    match (window.limit, window.offset) {
        (None, None) => inner,
        (Some(limit), None) => {
            format!("SELECT m1.* FROM ({inner}) m1 WHERE rownum <= {limit}")
        }
        (_, Some(_)) => {
            let upper = match window.last_row() {
                Some(last) => format!(" WHERE rownum <= {last}"),
                None => String::new(),
            };
            format!(
                "SELECT * FROM (SELECT m1.*, rownum AS {ROWNUM_ALIAS} FROM ({inner}) m1{upper}) WHERE {ROWNUM_ALIAS} >= {}",
                window.first_row()
            )
        }
    }
}

/// Firebird: offset fragment ` ROWS <offset+1>` (or ` ROWS 1` for a bare
/// limit), then limit fragment ` TO <offset+limit>`, after ORDER BY.
/// `ROWS m` alone means the first m rows, so a bare offset runs `TO` the
/// largest row bound.
fn rows_to(parts: &SelectParts<'_>, window: Window) -> String {
    let mut sql = parts.plain();
    if window.is_unbounded() {
        return sql;
    }
    let last = window.last_row().unwrap_or(MAX_ROW_BOUND);
    sql.push_str(&format!(" ROWS {} TO {last}", window.first_row()));
    sql
}

/// NuoDB: ` FETCH n` and ` OFFSET m`, each independent.
fn fetch_offset(parts: &SelectParts<'_>, window: Window) -> String {
    let mut sql = parts.plain();
    if let Some(limit) = window.limit {
        sql.push_str(&format!(" FETCH {limit}"));
    }
    if let Some(offset) = window.offset {
        sql.push_str(&format!(" OFFSET {offset}"));
    }
    sql
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARTS: SelectParts<'static> = SelectParts {
        distinct: false,
        columns: "*",
        body: "FROM t WHERE a = ?",
        order: "",
    };

    const ORDERED: SelectParts<'static> = SelectParts {
        distinct: false,
        columns: "id, name",
        body: "FROM t",
        order: " ORDER BY id DESC",
    };

    fn w(limit: Option<u64>, offset: Option<u64>) -> Window {
        Window::new(limit, offset)
    }

    #[test]
    fn zero_offset_is_unset() {
        assert_eq!(w(Some(5), Some(0)), w(Some(5), None));
    }

    #[test]
    fn limit_offset_suffix() {
        assert_eq!(
            render(Pagination::LimitOffset, &PARTS, w(Some(10), Some(20))),
            "SELECT * FROM t WHERE a = ? LIMIT 10 OFFSET 20"
        );
        assert_eq!(
            render(Pagination::LimitOffset, &PARTS, w(None, Some(20))),
            "SELECT * FROM t WHERE a = ? OFFSET 20"
        );
    }

    #[test]
    fn mysql_offset_without_limit() {
        assert_eq!(
            render(Pagination::MySqlLimit, &PARTS, w(None, Some(5))),
            "SELECT * FROM t WHERE a = ? LIMIT 18446744073709551615 OFFSET 5"
        );
    }

    #[test]
    fn top_keeps_distinct_first() {
        let parts = SelectParts {
            distinct: true,
            ..ORDERED
        };
        assert_eq!(
            render(Pagination::TopOrRowNumber, &parts, w(Some(3), None)),
            "SELECT DISTINCT TOP 3 id, name FROM t ORDER BY id DESC"
        );
    }

    #[test]
    fn row_number_uses_order_in_over() {
        assert_eq!(
            render(Pagination::TopOrRowNumber, &ORDERED, w(Some(10), Some(20))),
            "SELECT * FROM (SELECT id, name, ROW_NUMBER() OVER (ORDER BY id DESC) AS mako_rownum FROM t) AS m1 WHERE mako_rownum BETWEEN 21 AND 30"
        );
    }

    #[test]
    fn row_number_bare_offset_has_no_upper_bound() {
        for strategy in [Pagination::TopOrRowNumber, Pagination::RowNumber] {
            assert_eq!(
                render(strategy, &ORDERED, w(None, Some(20))),
                "SELECT * FROM (SELECT id, name, ROW_NUMBER() OVER (ORDER BY id DESC) AS mako_rownum FROM t) AS m1 WHERE mako_rownum >= 21"
            );
        }
    }

    #[test]
    fn row_number_from_first_row() {
        assert_eq!(
            render(Pagination::RowNumber, &ORDERED, w(Some(5), None)),
            "SELECT * FROM (SELECT id, name, ROW_NUMBER() OVER (ORDER BY id DESC) AS mako_rownum FROM t) AS m1 WHERE mako_rownum BETWEEN 1 AND 5"
        );
    }

    #[test]
    fn rownum_forms() {
        assert_eq!(
            render(Pagination::RowNum, &ORDERED, w(Some(10), None)),
            "SELECT m1.* FROM (SELECT id, name FROM t ORDER BY id DESC) m1 WHERE rownum <= 10"
        );
        assert_eq!(
            render(Pagination::RowNum, &ORDERED, w(Some(10), Some(20))),
            "SELECT * FROM (SELECT m1.*, rownum AS mako_rownum FROM (SELECT id, name FROM t ORDER BY id DESC) m1 WHERE rownum <= 30) WHERE mako_rownum >= 21"
        );
        assert_eq!(
            render(Pagination::RowNum, &ORDERED, w(None, Some(20))),
            "SELECT * FROM (SELECT m1.*, rownum AS mako_rownum FROM (SELECT id, name FROM t ORDER BY id DESC) m1) WHERE mako_rownum >= 21"
        );
    }

    #[test]
    fn rows_to_forms() {
        assert_eq!(
            render(Pagination::RowsTo, &ORDERED, w(Some(10), None)),
            "SELECT id, name FROM t ORDER BY id DESC ROWS 1 TO 10"
        );
        assert_eq!(
            render(Pagination::RowsTo, &ORDERED, w(None, Some(4))),
            "SELECT id, name FROM t ORDER BY id DESC ROWS 5 TO 9223372036854775807"
        );
        assert_eq!(render(Pagination::RowsTo, &ORDERED, w(None, None)), ORDERED.plain());
    }

    #[test]
    fn bounds_cap_at_bigint_max() {
        let window = w(Some(u64::MAX), Some(10));
        assert_eq!(window.first_row(), 11);
        assert_eq!(window.last_row(), Some(MAX_ROW_BOUND));
        assert_eq!(w(None, Some(u64::MAX)).first_row(), MAX_ROW_BOUND);
        assert_eq!(
            render(Pagination::RowNumber, &PARTS, window),
            "SELECT * FROM (SELECT *, ROW_NUMBER() OVER (ORDER BY (SELECT 0)) AS mako_rownum FROM t WHERE a = ?) AS m1 WHERE mako_rownum BETWEEN 11 AND 9223372036854775807"
        );
    }
}
