use serde::Serialize;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Postgres, Transaction};
use std::path::Path;
use tracing::{error, info, warn};

use super::schema::TableSchema;
use super::snapshot::SnapshotRows;
use super::LoadPhase;
use crate::config::WarehouseConfig;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub table: String,
    pub created_table: bool,
    pub rows_inserted: usize,
}

/// Replaces the contents of the configured table with a snapshot file.
///
/// The table check, clear and reload share one explicit transaction. Any
/// failure rolls it back, leaving the table as it was before the run. An
/// existing table whose columns differ from the snapshot header is dropped
/// and recreated inside the same transaction.
pub struct WarehouseLoader {
    config: WarehouseConfig,
}

impl WarehouseLoader {
    pub fn new(config: WarehouseConfig) -> Self {
        WarehouseLoader { config }
    }

    pub async fn load(&self, snapshot_path: &Path) -> Result<LoadReport> {
        match self.load_inner(snapshot_path).await {
            Ok(report) => {
                info!(
                    "Loaded {} rows into {} (created: {})",
                    report.rows_inserted, report.table, report.created_table
                );
                Ok(report)
            }
            Err(e) => {
                error!("Warehouse load of {} failed: {}", snapshot_path.display(), e);
                Err(e)
            }
        }
    }

    async fn load_inner(&self, snapshot_path: &Path) -> Result<LoadReport> {
        // Read before connecting so an empty snapshot never touches the table.
        let snapshot = SnapshotRows::read(snapshot_path)?;
        let schema = TableSchema::from_header(&self.config.schema, &self.config.table, &snapshot.header)?;
        info!(
            "Read snapshot {}: {} rows, {} columns",
            snapshot_path.display(),
            snapshot.len(),
            snapshot.header.len()
        );

        info!(phase = %LoadPhase::Disconnected, "Connecting to {}", self.config.display_target());
        let mut conn = self.connect().await?;
        info!(phase = %LoadPhase::Connected, "Connected to warehouse");

        let outcome = Self::replace_contents(&mut conn, &schema, &snapshot).await;

        match conn.close().await {
            Ok(()) => info!(phase = %LoadPhase::Closed, "Disconnected from warehouse"),
            Err(e) => warn!(phase = %LoadPhase::Closed, "Error while closing warehouse connection: {}", e),
        }

        outcome
    }

    async fn connect(&self) -> Result<PgConnection> {
        let password = self
            .config
            .get_password()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let options = PgConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .database(&self.config.database)
            .username(&self.config.user)
            .password(password);

        PgConnection::connect_with(&options)
            .await
            .map_err(PipelineError::DatabaseConnectivity)
    }

    async fn replace_contents(
        conn: &mut PgConnection,
        schema: &TableSchema,
        snapshot: &SnapshotRows,
    ) -> Result<LoadReport> {
        let mut tx = conn
            .begin()
            .await
            .map_err(|e| PipelineError::query(LoadPhase::Connected, e))?;

        match Self::reload(&mut tx, schema, snapshot).await {
            Ok(report) => {
                tx.commit()
                    .await
                    .map_err(|e| PipelineError::query(LoadPhase::Loaded, e))?;
                Ok(report)
            }
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!("Rollback failed: {}", rollback_error);
                } else {
                    warn!("Rolled back; {} left unchanged", schema.qualified_name());
                }
                Err(e)
            }
        }
    }

    async fn reload(
        tx: &mut Transaction<'_, Postgres>,
        schema: &TableSchema,
        snapshot: &SnapshotRows,
    ) -> Result<LoadReport> {
        let exists = sqlx::query_scalar::<_, bool>(TableSchema::exists_query())
            .bind(&schema.schema)
            .bind(&schema.table)
            .fetch_one(&mut **tx)
            .await
            .map_err(|e| PipelineError::query(LoadPhase::TableChecked, e))?;
        info!(phase = %LoadPhase::TableChecked, "Table {} exists: {}", schema.qualified_name(), exists);

        let mut create = !exists;
        if exists {
            let existing = sqlx::query_scalar::<_, String>(TableSchema::columns_query())
                .bind(&schema.schema)
                .bind(&schema.table)
                .fetch_all(&mut **tx)
                .await
                .map_err(|e| PipelineError::query(LoadPhase::TableChecked, e))?;

            if schema.matches_columns(&existing) {
                let deleted = sqlx::query(&schema.delete_statement())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| PipelineError::query(LoadPhase::Cleared, e))?;
                info!(
                    phase = %LoadPhase::Cleared,
                    "Deleted {} existing rows from {}",
                    deleted.rows_affected(),
                    schema.qualified_name()
                );
            } else {
                warn!(
                    phase = %LoadPhase::Cleared,
                    "Columns of {} {:?} differ from the snapshot header {:?}; recreating table",
                    schema.qualified_name(),
                    existing,
                    schema.column_names()
                );
                sqlx::query(&schema.drop_statement())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| PipelineError::query(LoadPhase::Cleared, e))?;
                create = true;
            }
        }

        if create {
            sqlx::query(&schema.create_statement())
                .execute(&mut **tx)
                .await
                .map_err(|e| PipelineError::query(LoadPhase::TableCreatedIfAbsent, e))?;
            info!(
                phase = %LoadPhase::TableCreatedIfAbsent,
                "Created table {} with {} text columns",
                schema.qualified_name(),
                schema.columns.len()
            );
        }

        let insert = schema.insert_statement();
        for row in &snapshot.rows {
            let mut query = sqlx::query(&insert);
            for value in row {
                query = query.bind(value.as_deref());
            }
            query
                .execute(&mut **tx)
                .await
                .map_err(|e| PipelineError::query(LoadPhase::Loaded, e))?;
        }
        info!(phase = %LoadPhase::Loaded, "Inserted {} rows", snapshot.len());

        Ok(LoadReport {
            table: schema.qualified_name(),
            created_table: create,
            rows_inserted: snapshot.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[tokio::test]
    async fn test_empty_snapshot_aborts_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_canada.csv");
        fs::write(&path, "streetAddress,City,Price\n").unwrap();

        // No password loaded: reaching the connect step would yield a Config error.
        let loader = WarehouseLoader::new(WarehouseConfig::default());
        let result = loader.load(&path).await;

        assert!(matches!(result, Err(PipelineError::EmptySnapshot(_))));
    }

    #[tokio::test]
    async fn test_missing_credentials_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_canada.csv");
        fs::write(&path, "streetAddress,City,Price\n1 Main St,Calgary,350000\n").unwrap();

        let loader = WarehouseLoader::new(WarehouseConfig::default());
        let result = loader.load(&path).await;

        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    /// Config pointed at a disposable database, or `None` when no test host is set.
    fn live_config(table: &str) -> Option<WarehouseConfig> {
        // Requires WAREHOUSE_TEST_HOST and WAREHOUSE_PASSWORD
        let host = env::var("WAREHOUSE_TEST_HOST").ok()?;

        let mut config = WarehouseConfig::default();
        config.host = host;
        config.table = table.to_string();
        config.load_credentials().unwrap();
        Some(config)
    }

    async fn connect(config: &WarehouseConfig) -> PgConnection {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.database)
            .username(&config.user)
            .password(config.get_password().unwrap());
        PgConnection::connect_with(&options).await.unwrap()
    }

    async fn count_rows(conn: &mut PgConnection, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!(r#"SELECT COUNT(*) FROM "public"."{}""#, table))
            .fetch_one(conn)
            .await
            .unwrap()
    }

    async fn table_columns(conn: &mut PgConnection, table: &str) -> Vec<String> {
        sqlx::query_scalar::<_, String>(TableSchema::columns_query())
            .bind("public")
            .bind(table)
            .fetch_all(conn)
            .await
            .unwrap()
    }

    async fn drop_table(conn: &mut PgConnection, table: &str) {
        sqlx::query(&format!(r#"DROP TABLE IF EXISTS "public"."{}""#, table))
            .execute(conn)
            .await
            .unwrap();
    }

    #[tokio::test]
    #[ignore] // Run with --ignored flag against a disposable PostgreSQL database
    async fn test_reload_is_idempotent() {
        let table = "housing_pipeline_it";
        let Some(config) = live_config(table) else {
            return;
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_canada.csv");
        fs::write(
            &path,
            "streetAddress,City,Price\n1 Main St,Calgary,350000\n2 Oak Ave, Regina ,\n",
        )
        .unwrap();

        let loader = WarehouseLoader::new(config.clone());
        let first = loader.load(&path).await.unwrap();
        let second = loader.load(&path).await.unwrap();

        assert_eq!(first.rows_inserted, 2);
        assert_eq!(second.rows_inserted, 2);
        assert!(!second.created_table);

        let mut conn = connect(&config).await;
        assert_eq!(count_rows(&mut conn, table).await, 2);

        let nulls = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM "public"."housing_pipeline_it" WHERE "Price" IS NULL AND "City" = 'Regina'"#,
        )
        .fetch_one(&mut conn)
        .await
        .unwrap();
        assert_eq!(nulls, 1);

        drop_table(&mut conn, table).await;
        conn.close().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Run with --ignored flag against a disposable PostgreSQL database
    async fn test_changed_header_recreates_table() {
        let table = "housing_pipeline_schema_it";
        let Some(config) = live_config(table) else {
            return;
        };

        let dir = tempfile::tempdir().unwrap();
        let wide = dir.path().join("wide.csv");
        let narrow = dir.path().join("narrow.csv");
        fs::write(&wide, "streetAddress,Price,Garage\n1 Main St,350000,Yes\n").unwrap();
        fs::write(&narrow, "streetAddress,Price\n2 Oak Ave,420000\n").unwrap();

        let loader = WarehouseLoader::new(config.clone());
        loader.load(&wide).await.unwrap();

        // Dropped column
        let report = loader.load(&narrow).await.unwrap();
        assert!(report.created_table);
        let mut conn = connect(&config).await;
        assert_eq!(table_columns(&mut conn, table).await, vec!["id", "streetAddress", "Price"]);
        assert_eq!(count_rows(&mut conn, table).await, 1);

        // Added column
        let report = loader.load(&wide).await.unwrap();
        assert!(report.created_table);
        assert_eq!(
            table_columns(&mut conn, table).await,
            vec!["id", "streetAddress", "Price", "Garage"]
        );
        assert_eq!(count_rows(&mut conn, table).await, 1);

        drop_table(&mut conn, table).await;
        conn.close().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Run with --ignored flag against a disposable PostgreSQL database
    async fn test_failed_insert_rolls_back_to_prior_contents() {
        let table = "housing_pipeline_rollback_it";
        let Some(config) = live_config(table) else {
            return;
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleaned_canada.csv");
        fs::write(&path, "streetAddress,Price\n1 Main St,350000\n2 Oak Ave,420000\n").unwrap();
        WarehouseLoader::new(config.clone()).load(&path).await.unwrap();

        // New header forces drop and create; PostgreSQL rejects the NUL byte in the second row.
        let failing = SnapshotRows {
            header: vec!["streetAddress".to_string(), "Price".to_string(), "Garage".to_string()],
            rows: vec![
                vec![Some("3 Elm Rd".to_string()), Some("510000".to_string()), None],
                vec![Some("4 Bay St\0".to_string()), Some("610000".to_string()), None],
            ],
        };
        let schema = TableSchema::from_header(&config.schema, &config.table, &failing.header).unwrap();

        let mut conn = connect(&config).await;
        let result = WarehouseLoader::replace_contents(&mut conn, &schema, &failing).await;
        assert!(matches!(
            result,
            Err(PipelineError::QueryExecution { phase: LoadPhase::Loaded, .. })
        ));

        assert_eq!(table_columns(&mut conn, table).await, vec!["id", "streetAddress", "Price"]);
        assert_eq!(count_rows(&mut conn, table).await, 2);

        drop_table(&mut conn, table).await;
        conn.close().await.unwrap();
    }
}
