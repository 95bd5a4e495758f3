use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarehouseSection {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub schema: String,
    pub table: String,
    // Optional environment variable name for the password
    pub env_password: Option<String>,
}

impl Default for WarehouseSection {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            database: "formatted-zone".to_string(),
            user: "airc".to_string(),
            schema: "public".to_string(),
            table: "cleaned_data".to_string(),
            env_password: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WarehouseConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub schema: String,
    pub table: String,
    // Loaded from the environment, never from the file
    pub password: Option<String>,
    pub env_password: Option<String>,
}

impl WarehouseConfig {
    pub fn from_section(section: WarehouseSection) -> Self {
        Self {
            host: section.host,
            port: section.port,
            database: section.database,
            user: section.user,
            schema: section.schema,
            table: section.table,
            password: None,
            env_password: section.env_password,
        }
    }

    pub fn password_var(&self) -> &str {
        self.env_password.as_deref().unwrap_or("WAREHOUSE_PASSWORD")
    }

    pub fn load_credentials(&mut self) -> Result<()> {
        let password_var = self.password_var().to_string();

        self.password = env::var(&password_var)
            .with_context(|| format!("Missing environment variable: {}", password_var))?
            .into();

        Ok(())
    }

    pub fn get_password(&self) -> Result<&str> {
        self.password
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Warehouse password not loaded"))
    }

    /// Connection target without credentials, safe to log.
    pub fn display_target(&self) -> String {
        format!(
            "{}@{}:{}/{} ({}.{})",
            self.user, self.host, self.port, self.database, self.schema, self.table
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(anyhow::anyhow!("Warehouse host cannot be empty"));
        }

        if self.database.is_empty() {
            return Err(anyhow::anyhow!("Warehouse database name cannot be empty"));
        }

        let identifier = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$")?;

        if !identifier.is_match(&self.table) {
            return Err(anyhow::anyhow!(
                "Warehouse table name '{}' is not a plain identifier",
                self.table
            ));
        }

        if !identifier.is_match(&self.schema) {
            return Err(anyhow::anyhow!(
                "Warehouse schema name '{}' is not a plain identifier",
                self.schema
            ));
        }

        Ok(())
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self::from_section(WarehouseSection::default())
    }
}
