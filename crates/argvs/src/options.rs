use serde::{Deserialize, Serialize};

/// Bare tokens that request help. Matched against the raw token.
pub const DEFAULT_HELP_TOKENS: [&str; 3] = ["help", "--help", "-help"];

/// Bare tokens that request verbose output. Matched against the raw token.
pub const DEFAULT_VERBOSE_TOKENS: [&str; 5] = ["verbose", "-verbose", "--verbose", "-v", "--v"];

/// Construction-time behavior of an [`ArgStore`](crate::ArgStore).
///
/// Deserializes from camelCase JSON; missing fields take their defaults, so
/// `{}` is the same as [`StoreOptions::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreOptions {
    /// Remove a leading `--`/`-` from keys and flags before storing and
    /// before comparing.
    pub strip_leading_dashes: bool,
    pub help_tokens: Vec<String>,
    pub verbose_tokens: Vec<String>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            strip_leading_dashes: true,
            help_tokens: DEFAULT_HELP_TOKENS.iter().map(|s| s.to_string()).collect(),
            verbose_tokens: DEFAULT_VERBOSE_TOKENS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strip_leading_dashes(mut self, strip: bool) -> Self {
        self.strip_leading_dashes = strip;
        self
    }

    /// Add a bare token that sets the help flag.
    pub fn help_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !self.help_tokens.contains(&token) {
            self.help_tokens.push(token);
        }
        self
    }

    /// Add a bare token that sets the verbose flag.
    pub fn verbose_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !self.verbose_tokens.contains(&token) {
            self.verbose_tokens.push(token);
        }
        self
    }

    pub(crate) fn is_help(&self, token: &str) -> bool {
        self.help_tokens.iter().any(|t| t == token)
    }

    pub(crate) fn is_verbose(&self, token: &str) -> bool {
        self.verbose_tokens.iter().any(|t| t == token)
    }
}
