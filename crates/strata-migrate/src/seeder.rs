use std::sync::Arc;

use async_trait::async_trait;
use strata_common::Result;
use strata_db::DatabaseProvider;
use tracing::{debug, error, info, warn};

use crate::registry::SeederRegistry;
use crate::report::{BatchReport, SeederOutcome};
use crate::tokens::CommandTokens;

/// A named data-population routine. Seeders are not tracked in the ledger,
/// so running one twice runs it twice.
#[async_trait]
pub trait Seeder: Send + Sync {
    async fn run(&self, provider: &dyn DatabaseProvider) -> Result<()>;
}

/// Runs only the seeders named in the command tokens.
pub struct SeederRunner {
    provider: Arc<dyn DatabaseProvider>,
    tokens: CommandTokens,
}

impl SeederRunner {
    pub fn new(provider: Arc<dyn DatabaseProvider>, tokens: CommandTokens) -> Self {
        Self { provider, tokens }
    }

    pub async fn run(&self, name: &str, seeder: &dyn Seeder) -> SeederOutcome {
        if !self.tokens.names_seeder(name) {
            debug!("seeder {name} not requested");
            return SeederOutcome::Skipped;
        }

        match seeder.run(self.provider.as_ref()).await {
            Ok(()) => {
                info!("seeder {name} successfully applied.");
                SeederOutcome::Seeded
            }
            Err(e) => {
                error!("an error occurred during {name} seeder running: {e}");
                SeederOutcome::Failed(e.to_string())
            }
        }
    }

    pub async fn run_all(&self, registry: &SeederRegistry) -> BatchReport<SeederOutcome> {
        for token in self.tokens.overrides() {
            if !registry.contains(token) {
                warn!("unknown seeder in tokens: {token}");
            }
        }

        let mut report = BatchReport::new();
        for (name, seeder) in registry.iter() {
            let outcome = self.run(name, seeder).await;
            report.push(name, outcome);
        }

        info!(
            seeded = report.seeded().len(),
            failed = report.failed().len(),
            "seeding finished"
        );
        report
    }
}
