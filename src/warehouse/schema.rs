use std::fmt;

use crate::error::{PipelineError, Result};

pub const IDENTITY_COLUMN: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Text => f.write_str("TEXT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: String,
    pub column_type: ColumnType,
}

/// Explicit descriptor of the warehouse table: an identity key followed by one
/// column per snapshot column, in snapshot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub schema: String,
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    pub fn from_header(schema: &str, table: &str, header: &[String]) -> Result<Self> {
        if header.is_empty() {
            return Err(PipelineError::InvalidSchema(
                "snapshot header has no columns".to_string(),
            ));
        }

        let mut columns: Vec<ColumnDef> = Vec::with_capacity(header.len());
        for name in header {
            if name.eq_ignore_ascii_case(IDENTITY_COLUMN) {
                return Err(PipelineError::InvalidSchema(format!(
                    "snapshot column '{}' collides with the identity key",
                    name
                )));
            }
            if columns.iter().any(|c| &c.name == name) {
                return Err(PipelineError::InvalidSchema(format!(
                    "duplicate snapshot column '{}'",
                    name
                )));
            }
            columns.push(ColumnDef {
                name: name.clone(),
                column_type: ColumnType::Text,
            });
        }

        Ok(Self {
            schema: schema.to_string(),
            table: table.to_string(),
            columns,
        })
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }

    pub fn exists_query() -> &'static str {
        "SELECT EXISTS (SELECT FROM information_schema.tables WHERE table_schema = $1 AND table_name = $2)"
    }

    /// Existing column names of the table, identity key included, in table order.
    pub fn columns_query() -> &'static str {
        "SELECT column_name::text FROM information_schema.columns WHERE table_schema = $1 AND table_name = $2 ORDER BY ordinal_position"
    }

    /// True when `existing` is exactly the identity key followed by the snapshot columns.
    pub fn matches_columns(&self, existing: &[String]) -> bool {
        existing.len() == self.columns.len() + 1
            && existing[0] == IDENTITY_COLUMN
            && existing[1..]
                .iter()
                .zip(&self.columns)
                .all(|(name, column)| name == &column.name)
    }

    pub fn create_statement(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_ident(&c.name), c.column_type))
            .collect();

        format!(
            "CREATE TABLE IF NOT EXISTS {} ({} SERIAL PRIMARY KEY, {})",
            self.qualified_name(),
            IDENTITY_COLUMN,
            columns.join(", ")
        )
    }

    pub fn drop_statement(&self) -> String {
        format!("DROP TABLE {}", self.qualified_name())
    }

    pub fn delete_statement(&self) -> String {
        format!("DELETE FROM {}", self.qualified_name())
    }

    pub fn insert_statement(&self) -> String {
        let columns: Vec<String> = self.columns.iter().map(|c| quote_ident(&c.name)).collect();
        let placeholders: Vec<String> = (1..=self.columns.len()).map(|i| format!("${}", i)).collect();

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.qualified_name(),
            columns.join(", "),
            placeholders.join(", ")
        )
    }
}

/// Double-quotes a PostgreSQL identifier, escaping embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
