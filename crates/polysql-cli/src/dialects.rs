use polysql::{Dialect, Pagination, QuoteStyle};

pub fn run() {
    print!("{}", table());
}

fn quote_label(style: QuoteStyle) -> &'static str {
    match style {
        QuoteStyle::None => "none",
        QuoteStyle::Backtick => "`x`",
        QuoteStyle::Bracket => "[x]",
        QuoteStyle::DoubleQuote => "\"x\"",
    }
}

fn pagination_label(strategy: Pagination) -> &'static str {
    match strategy {
        Pagination::LimitOffset => "LIMIT/OFFSET",
        Pagination::MySqlLimit => "LIMIT/OFFSET",
        Pagination::TopOrRowNumber => "TOP, ROW_NUMBER()",
        Pagination::RowNum => "rownum",
        Pagination::RowNumber => "ROW_NUMBER()",
        Pagination::RowsTo => "ROWS m TO n",
        Pagination::FetchOffset => "FETCH/OFFSET",
    }
}

fn table() -> String {
    let mut out = format!("{:<10} {:<8} {:<20} {}\n", "DIALECT", "QUOTE", "PAGINATION", "DRIVERS");
    for dialect in Dialect::ALL {
        let spec = dialect.spec();
        let drivers: Vec<&str> = dialect.drivers().collect();
        let drivers = if drivers.is_empty() {
            "(fallback)".to_string()
        } else {
            drivers.join(", ")
        };
        out.push_str(&format!(
            "{:<10} {:<8} {:<20} {}\n",
            dialect.name(),
            quote_label(spec.quote),
            pagination_label(spec.pagination),
            drivers
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_dialect() {
        let out = table();
        assert_eq!(out.lines().count(), Dialect::ALL.len() + 1);
        assert!(out.contains("sqlserver"));
        assert!(out.contains("sqlsrv, mssql, dblib"));
        assert!(out.lines().nth(1).is_some_and(|l| l.contains("(fallback)")));
    }
}
