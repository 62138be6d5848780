//! DDL for the `books` table, derived from the declared book schema so the table
//! rejects anything the validator would.

use crate::error::AppError;
use crate::model::{FieldSpec, FieldType, Format, BOOK_FIELDS};
use sqlx::PgPool;

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_def(field: &FieldSpec) -> String {
    let typ = match field.field_type {
        FieldType::String => "TEXT",
        FieldType::Integer => "INTEGER",
    };
    let mut def = format!("{} {}", quote(field.name), typ);
    if field.rule.required {
        def.push_str(" NOT NULL");
    }
    def
}

fn check_defs(field: &FieldSpec) -> Vec<String> {
    let col = quote(field.name);
    let mut checks = Vec::new();
    if let Some(min) = field.rule.min_length {
        checks.push(format!("char_length({}) >= {}", col, min));
    }
    if let Some(Format::Isbn) = field.rule.format {
        checks.push(format!("{} ~ '^([0-9]{{10}}|[0-9]{{13}})$'", col));
    }
    if let Some(min) = field.rule.minimum {
        checks.push(format!("{} >= {}", col, min));
    }
    checks
        .into_iter()
        .enumerate()
        .map(|(i, expr)| format!("CONSTRAINT {} CHECK ({})", quote(&format!("books_{}_check{}", field.name, i)), expr))
        .collect()
}

/// `CREATE TABLE IF NOT EXISTS books (...)` with `isbn` as primary key.
pub fn books_table_ddl() -> String {
    let mut defs: Vec<String> = BOOK_FIELDS.iter().map(column_def).collect();
    defs.push(format!("PRIMARY KEY ({})", quote("isbn")));
    defs.extend(BOOK_FIELDS.iter().flat_map(check_defs));
    format!("CREATE TABLE IF NOT EXISTS books (\n  {}\n)", defs.join(",\n  "))
}

/// Idempotent: safe to run on every start.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    let sql = books_table_ddl();
    tracing::debug!(sql = %sql, "migration");
    sqlx::query(&sql).execute(pool).await?;
    tracing::info!("books table ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_mirrors_the_schema() {
        let ddl = books_table_ddl();
        assert!(ddl.starts_with("CREATE TABLE IF NOT EXISTS books"));
        assert!(ddl.contains("\"isbn\" TEXT NOT NULL"));
        assert!(ddl.contains("\"pages\" INTEGER NOT NULL"));
        assert!(ddl.contains("PRIMARY KEY (\"isbn\")"));
        assert!(ddl.contains("CHECK (\"pages\" >= 1)"));
        assert!(ddl.contains("CHECK (\"year\" >= 0)"));
        assert!(ddl.contains("CHECK (char_length(\"title\") >= 1)"));
        assert!(ddl.contains("'^([0-9]{10}|[0-9]{13})$'"));
    }
}
