use std::sync::Arc;

use async_trait::async_trait;
use strata_common::{Error, Result};
use strata_db::{DatabaseProvider, Table};
use tracing::{debug, error, info, warn};

use crate::ledger::Ledger;
use crate::mode::{MigrationAction, resolve_action};
use crate::registry::MigrationRegistry;
use crate::report::{BatchReport, MigrationOutcome};
use crate::tokens::CommandTokens;

/// A named, reversible schema or data change.
///
/// The default `up` creates [`Migration::table`] and the default `down`
/// drops it.
#[async_trait]
pub trait Migration: Send + Sync {
    fn table(&self) -> Table;

    async fn up(&self, provider: &dyn DatabaseProvider) -> Result<()> {
        provider.create_table(&self.table()).await
    }

    async fn down(&self, provider: &dyn DatabaseProvider) -> Result<()> {
        provider.drop_table(&self.table()).await
    }
}

/// Applied state of one migration, as seen by `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub name: String,
    pub applied: bool,
    /// False for ledger entries with no registered migration.
    pub registered: bool,
}

/// Runs migrations one at a time against a provider and keeps the ledger in
/// step with what succeeded.
///
/// A failing `up`/`down` is logged and recorded in the report; the run goes
/// on with the next migration and the ledger is left untouched for the
/// failed one. Ledger failures abort the run.
pub struct MigrationRunner {
    provider: Arc<dyn DatabaseProvider>,
    ledger: Arc<dyn Ledger>,
    tokens: CommandTokens,
}

impl MigrationRunner {
    pub fn new(
        provider: Arc<dyn DatabaseProvider>,
        ledger: Arc<dyn Ledger>,
        tokens: CommandTokens,
    ) -> Self {
        Self {
            provider,
            ledger,
            tokens,
        }
    }

    pub async fn run(&self, name: &str, migration: &dyn Migration) -> Result<MigrationOutcome> {
        let applied = self.ledger.load().map_err(|e| Error::aborted(name, e))?;
        let action = resolve_action(name, &self.tokens, |n| applied.iter().any(|a| a == n));

        match action {
            MigrationAction::Pass => {
                debug!("migration {name} skipped");
                Ok(MigrationOutcome::Skipped)
            }
            MigrationAction::Up => match migration.up(self.provider.as_ref()).await {
                Ok(()) => {
                    self.ledger
                        .record_applied(name)
                        .map_err(|e| Error::aborted(name, e))?;
                    info!("migration {name} successfully applied.");
                    Ok(MigrationOutcome::Applied)
                }
                Err(e) => {
                    error!("an error occurred during {name} migration running ({action}): {e}");
                    Ok(MigrationOutcome::Failed(e.to_string()))
                }
            },
            MigrationAction::Down => match migration.down(self.provider.as_ref()).await {
                Ok(()) => {
                    self.ledger
                        .record_reverted(name)
                        .map_err(|e| Error::aborted(name, e))?;
                    info!("migration {name} successfully downed.");
                    Ok(MigrationOutcome::Reverted)
                }
                Err(e) => {
                    error!("an error occurred during {name} migration running ({action}): {e}");
                    Ok(MigrationOutcome::Failed(e.to_string()))
                }
            },
        }
    }

    /// Process every registered migration in registry order.
    pub async fn run_all(
        &self,
        registry: &MigrationRegistry,
    ) -> Result<BatchReport<MigrationOutcome>> {
        self.warn_unknown_tokens(registry);

        let mut report = BatchReport::new();
        for (name, migration) in registry.iter() {
            let outcome = self.run(name, migration).await?;
            report.push(name, outcome);
        }

        info!(
            applied = report.applied().len(),
            reverted = report.reverted().len(),
            skipped = report.skipped().len(),
            failed = report.failed().len(),
            "migration run finished"
        );
        Ok(report)
    }

    /// Registered migrations with their ledger state, followed by ledger
    /// entries that match no registered migration.
    pub fn status(&self, registry: &MigrationRegistry) -> Result<Vec<MigrationStatus>> {
        let applied = self.ledger.load()?;

        let mut statuses: Vec<MigrationStatus> = registry
            .names()
            .map(|name| MigrationStatus {
                name: name.to_string(),
                applied: applied.iter().any(|a| a == name),
                registered: true,
            })
            .collect();

        statuses.extend(
            applied
                .into_iter()
                .filter(|name| !registry.contains(name))
                .map(|name| MigrationStatus {
                    name,
                    applied: true,
                    registered: false,
                }),
        );
        Ok(statuses)
    }

    fn warn_unknown_tokens(&self, registry: &MigrationRegistry) {
        for token in self.tokens.overrides() {
            match token.rsplit_once('=') {
                Some((name, "up" | "down")) if registry.contains(name) => {}
                Some((name, "up" | "down")) => warn!("unknown migration in tokens: {name}"),
                _ => warn!("ignoring malformed migration token: {token}"),
            }
        }
    }
}
