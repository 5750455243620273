use std::fmt;

use strata_common::{Error, Result};

/// The comma-separated command argument, e.g. `migrate,create_users=down`.
///
/// Token 0 is the command. The rest are per-migration overrides
/// (`<name>=up` / `<name>=down`) or, for seeders, bare seeder names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTokens {
    tokens: Vec<String>,
}

impl CommandTokens {
    pub fn parse(input: &str) -> Result<Self> {
        let raw: Vec<&str> = input.split(',').map(str::trim).collect();
        if raw[0].is_empty() {
            return Err(Error::Tokens(format!(
                "expected a command as the first token, got {input:?}"
            )));
        }

        let tokens = raw
            .into_iter()
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        Ok(Self { tokens })
    }

    pub fn command(&self) -> &str {
        &self.tokens[0]
    }

    /// Everything after the command token.
    pub fn overrides(&self) -> &[String] {
        &self.tokens[1..]
    }

    /// Only the command was given: every migration resolves against the ledger.
    pub fn is_bare(&self) -> bool {
        self.tokens.len() == 1
    }

    pub fn names_seeder(&self, name: &str) -> bool {
        self.overrides().iter().any(|t| t == name)
    }

}

impl fmt::Display for CommandTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_and_trims() {
        let tokens = CommandTokens::parse("migrate, m1=up ,m2=down,").unwrap();
        assert_eq!(tokens.command(), "migrate");
        assert_eq!(tokens.overrides(), ["m1=up", "m2=down"]);
        assert!(!tokens.is_bare());
        assert_eq!(tokens.to_string(), "migrate,m1=up,m2=down");
    }

    #[test]
    fn bare_command() {
        let tokens = CommandTokens::parse("migrate").unwrap();
        assert!(tokens.is_bare());
        assert!(tokens.overrides().is_empty());
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(CommandTokens::parse("").is_err());
        assert!(CommandTokens::parse(" , ").is_err());
        assert!(CommandTokens::parse(",m1=up").is_err());
    }

    #[test]
    fn seeder_names_skip_the_command_token() {
        let tokens = CommandTokens::parse("seed,users_seeder").unwrap();
        assert!(tokens.names_seeder("users_seeder"));
        assert!(!tokens.names_seeder("seed"));
        assert!(!tokens.names_seeder("posts_seeder"));
    }
}
