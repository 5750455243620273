//! The application's migrations and seeders, registered in the order they run.

use async_trait::async_trait;
use strata_common::Result;
use strata_db::{Column, DatabaseProvider, Fields, Table};
use strata_migrate::{Migration, MigrationRegistry, Seeder, SeederRegistry};
use tracing::info;

pub fn migrations() -> Result<MigrationRegistry> {
    MigrationRegistry::new()
        .with("create_users_table", Box::new(CreateUsersTable))?
        .with("create_posts_table", Box::new(CreatePostsTable))
}

pub fn seeders() -> Result<SeederRegistry> {
    SeederRegistry::new().with("users_seeder", Box::new(UsersSeeder))
}

fn users() -> Table {
    Table::new("users")
        .column(Column::new("id", "INTEGER").primary_key().auto_increment())
        .column(Column::new("email", "TEXT").unique().not_null())
        .column(Column::new("name", "TEXT").not_null())
        .column(Column::new("created_at", "TEXT").not_null().default_value("(datetime('now'))"))
}

pub struct CreateUsersTable;

impl Migration for CreateUsersTable {
    fn table(&self) -> Table {
        users()
    }
}

pub struct CreatePostsTable;

impl Migration for CreatePostsTable {
    fn table(&self) -> Table {
        Table::new("posts")
            .column(Column::new("id", "INTEGER").primary_key().auto_increment())
            .column(Column::new("user_id", "INTEGER REFERENCES users(id) ON DELETE CASCADE").not_null())
            .column(Column::new("title", "TEXT").not_null())
            .column(Column::new("body", "TEXT").default_value("''"))
    }
}

/// Inserts the default admin account unless it already exists.
pub struct UsersSeeder;

#[async_trait]
impl Seeder for UsersSeeder {
    async fn run(&self, provider: &dyn DatabaseProvider) -> Result<()> {
        let table = users().select(&["id"]);
        let admin = Fields::new().with("email", "admin@localhost");

        if !provider.select(&table, &admin).await?.is_empty() {
            info!("admin user already present");
            return Ok(());
        }

        provider
            .insert(&table, admin.with("name", "Administrator"))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use strata_db::SqliteProvider;
    use strata_migrate::{CommandTokens, MemoryLedger, MigrationRunner, SeederRunner};

    use super::*;

    #[test]
    fn registries_are_well_formed() {
        let migrations = migrations().unwrap();
        assert_eq!(
            migrations.names().collect::<Vec<_>>(),
            vec!["create_users_table", "create_posts_table"]
        );
        for (_, migration) in migrations.iter() {
            migration.table().validate().unwrap();
        }
        assert!(seeders().unwrap().contains("users_seeder"));
    }

    #[tokio::test]
    async fn users_seeder_is_safe_to_rerun() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(SqliteProvider::open_path(&dir.path().join("app.sqlite")).unwrap());

        MigrationRunner::new(
            provider.clone(),
            Arc::new(MemoryLedger::new()),
            CommandTokens::parse("migrate").unwrap(),
        )
        .run_all(&migrations().unwrap())
        .await
        .unwrap();

        let runner = SeederRunner::new(provider.clone(), CommandTokens::parse("seed,users_seeder").unwrap());
        let seeders = seeders().unwrap();
        runner.run_all(&seeders).await;
        let report = runner.run_all(&seeders).await;
        assert!(!report.has_failures());

        let rows = provider.select(&users(), &Fields::new()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].get("name").and_then(|v| v.as_str()),
            Some("Administrator")
        );
    }
}
