use std::fmt;

use crate::tokens::CommandTokens;

/// What the runner does with one migration in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationAction {
    Up,
    Down,
    Pass,
}

impl fmt::Display for MigrationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MigrationAction::Up => "up",
            MigrationAction::Down => "down",
            MigrationAction::Pass => "pass",
        })
    }
}

/// Resolve the action for `name`.
///
/// With only the command token, a migration goes up unless the ledger already
/// has it; down is never chosen implicitly. Otherwise the overrides decide,
/// `<name>=down` winning over `<name>=up`, and unmentioned migrations pass.
/// `ledger_has` is only consulted for a bare command.
pub fn resolve_action(
    name: &str,
    tokens: &CommandTokens,
    ledger_has: impl FnOnce(&str) -> bool,
) -> MigrationAction {
    if tokens.is_bare() {
        return if ledger_has(name) {
            MigrationAction::Pass
        } else {
            MigrationAction::Up
        };
    }

    let overrides = tokens.overrides();
    let down = format!("{name}=down");
    let up = format!("{name}=up");

    if overrides.iter().any(|t| *t == down) {
        MigrationAction::Down
    } else if overrides.iter().any(|t| *t == up) {
        MigrationAction::Up
    } else {
        MigrationAction::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &str, input: &str, applied: bool) -> MigrationAction {
        let tokens = CommandTokens::parse(input).unwrap();
        resolve_action(name, &tokens, |_| applied)
    }

    #[test]
    fn resolution_table_for_unapplied_migration() {
        assert_eq!(resolve("m1", "migrate", false), MigrationAction::Up);
        assert_eq!(resolve("m1", "migrate,m1=down", false), MigrationAction::Down);
        assert_eq!(resolve("m1", "migrate,m1=up", false), MigrationAction::Up);
        assert_eq!(resolve("m1", "migrate,m2=up", false), MigrationAction::Pass);
    }

    #[test]
    fn applied_migration_passes_on_bare_command() {
        assert_eq!(resolve("m1", "migrate", true), MigrationAction::Pass);
    }

    #[test]
    fn explicit_up_ignores_ledger() {
        assert_eq!(resolve("m1", "migrate,m1=up", true), MigrationAction::Up);
    }

    #[test]
    fn down_wins_over_up() {
        assert_eq!(
            resolve("m1", "migrate,m1=up,m1=down", false),
            MigrationAction::Down
        );
    }

    #[test]
    fn match_is_exact() {
        assert_eq!(resolve("m1", "migrate,m10=up", false), MigrationAction::Pass);
        assert_eq!(resolve("m1", "migrate,m1", false), MigrationAction::Pass);
    }

    #[test]
    fn ledger_is_not_consulted_with_overrides() {
        let tokens = CommandTokens::parse("migrate,m1=up").unwrap();
        let action = resolve_action("m1", &tokens, |_| panic!("ledger consulted"));
        assert_eq!(action, MigrationAction::Up);
    }
}
