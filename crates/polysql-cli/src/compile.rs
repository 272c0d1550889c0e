use anyhow::Context;
use polysql::CompiledStatement;
use std::io::Read;

use crate::cli::CompileArgs;
use crate::config::{ConfigFile, OutputFormat};
use crate::document::QueryDocument;

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    let config = ConfigFile::load_or_default(args.config.as_deref())?;
    let dialect = config.dialect(args.driver.as_deref())?;
    let format = config.format(args.format.as_deref())?;

    let raw = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read query document {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read query document from stdin")?;
            buf
        }
    };

    tracing::debug!(%dialect, ?format, "compiling query document");

    let doc = QueryDocument::parse(&raw)?;
    let stmt = doc
        .compile(dialect)
        .with_context(|| format!("failed to compile {} statement", doc.table))?;

    println!("{}", render(&stmt, format)?);
    Ok(())
}

/// Text output is the SQL followed by a `-- params:` comment line.
pub fn render(stmt: &CompiledStatement, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(stmt)?),
        OutputFormat::Text => {
            if stmt.params.is_empty() {
                return Ok(stmt.sql.clone());
            }
            let params: Vec<String> = stmt.params.iter().map(|p| p.to_string()).collect();
            Ok(format!("{}\n-- params: {}", stmt.sql, params.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polysql::{Dialect, table};

    #[test]
    fn text_output() {
        let stmt = table("users", Dialect::MySql)
            .eq("email", "a@b.com")
            .eq("id", 5)
            .select()
            .unwrap();
        assert_eq!(
            render(&stmt, OutputFormat::Text).unwrap(),
            "SELECT * FROM `users` WHERE email = ? AND id = ?\n-- params: 'a@b.com', 5"
        );

        let stmt = table("users", Dialect::MySql).select().unwrap();
        assert_eq!(render(&stmt, OutputFormat::Text).unwrap(), "SELECT * FROM `users`");
    }

    #[test]
    fn json_output() {
        let stmt = table("t", Dialect::Oracle).limit(2).select().unwrap();
        let out = render(&stmt, OutputFormat::Json).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["dialect"], "oracle");
        assert_eq!(v["kind"], "select");
        assert_eq!(v["sql"], "SELECT m1.* FROM (SELECT * FROM t) m1 WHERE rownum <= 2");
    }
}
