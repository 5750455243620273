use std::fmt;

/// Result of processing one migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    Applied,
    Reverted,
    Skipped,
    Failed(String),
}

/// Result of processing one seeder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeederOutcome {
    Seeded,
    Skipped,
    Failed(String),
}

impl fmt::Display for MigrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationOutcome::Applied => f.write_str("applied"),
            MigrationOutcome::Reverted => f.write_str("reverted"),
            MigrationOutcome::Skipped => f.write_str("skipped"),
            MigrationOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

impl fmt::Display for SeederOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeederOutcome::Seeded => f.write_str("seeded"),
            SeederOutcome::Skipped => f.write_str("skipped"),
            SeederOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Per-name outcomes of one run, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<O> {
    entries: Vec<(String, O)>,
}

impl<O> Default for BatchReport<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<O> BatchReport<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, outcome: O) {
        self.entries.push((name.into(), outcome));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &O)> {
        self.entries.iter().map(|(n, o)| (n.as_str(), o))
    }

    pub fn outcome(&self, name: &str) -> Option<&O> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, o)| o)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn names_where(&self, pred: impl Fn(&O) -> bool) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, o)| pred(o))
            .map(|(n, _)| n.as_str())
            .collect()
    }
}

impl BatchReport<MigrationOutcome> {
    pub fn applied(&self) -> Vec<&str> {
        self.names_where(|o| *o == MigrationOutcome::Applied)
    }

    pub fn reverted(&self) -> Vec<&str> {
        self.names_where(|o| *o == MigrationOutcome::Reverted)
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.names_where(|o| *o == MigrationOutcome::Skipped)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, MigrationOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        !self.failed().is_empty()
    }
}

impl BatchReport<SeederOutcome> {
    pub fn seeded(&self) -> Vec<&str> {
        self.names_where(|o| *o == SeederOutcome::Seeded)
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.names_where(|o| *o == SeederOutcome::Skipped)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.names_where(|o| matches!(o, SeederOutcome::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        !self.failed().is_empty()
    }
}
