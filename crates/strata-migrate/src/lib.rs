pub mod ledger;
pub mod migration;
pub mod mode;
pub mod registry;
pub mod report;
pub mod seeder;
pub mod tokens;

pub use ledger::{JsonFileLedger, Ledger, MemoryLedger};
pub use migration::{Migration, MigrationRunner, MigrationStatus};
pub use mode::{MigrationAction, resolve_action};
pub use registry::{MigrationRegistry, Registry, SeederRegistry};
pub use report::{BatchReport, MigrationOutcome, SeederOutcome};
pub use seeder::{Seeder, SeederRunner};
pub use tokens::CommandTokens;
