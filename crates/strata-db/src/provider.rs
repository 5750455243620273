use std::sync::Arc;

use async_trait::async_trait;
use strata_common::{Error, Result};
use strata_config::{DatabaseConfig, ProviderKind};
use tracing::info;

use crate::schema::{Condition, ModelObject, Table};
use crate::sqlite::SqliteProvider;

/// Schema and CRUD operations against one backend.
///
/// Conditions are AND-combined equality filters applied in key order.
#[async_trait]
pub trait DatabaseProvider: Send + Sync {
    /// Create `table` unless it already exists.
    async fn create_table(&self, table: &Table) -> Result<()>;

    /// Schema alteration is not supported by any built-in backend.
    async fn alter_table(&self, table: &Table) -> Result<()> {
        Err(Error::NotImplemented(format!(
            "alter table {} is not supported",
            table.name
        )))
    }

    /// Drop `table`; fails if it does not exist.
    async fn drop_table(&self, table: &Table) -> Result<()>;

    /// Rows matching `condition`, projected to `table.selection` when set.
    /// An empty condition returns every row.
    async fn select(&self, table: &Table, condition: &Condition) -> Result<Vec<ModelObject>>;

    /// Insert one row and return the record unchanged.
    async fn insert(&self, table: &Table, record: ModelObject) -> Result<ModelObject>;

    /// Set the columns of `record` on the matching rows and return `record`
    /// unchanged. An empty condition is a validation error.
    async fn update(
        &self,
        table: &Table,
        condition: &Condition,
        record: ModelObject,
    ) -> Result<ModelObject>;

    /// Delete the matching rows and return them. An empty condition deletes
    /// every row.
    async fn delete(&self, table: &Table, condition: &Condition) -> Result<Vec<ModelObject>>;
}

/// Build the provider for the configured backend kind.
pub fn open_provider(config: &DatabaseConfig) -> Result<Arc<dyn DatabaseProvider>> {
    match config.provider {
        ProviderKind::Sqlite => {
            info!("using sqlite provider for {}", config.name);
            Ok(Arc::new(SqliteProvider::open(config)?))
        }
    }
}
