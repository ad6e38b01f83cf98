use serde::Serialize;

/// Whether a reset actually parsed its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "status")]
pub enum ParseStatus {
    Parsed,
    /// The declared count did not match the token count (or none was given);
    /// the store was left empty.
    CountMismatch {
        expected: Option<usize>,
        actual: usize,
    },
}

/// What a reset did with its input.
///
/// Ignoring the report gives the silent behavior: mismatches and malformed
/// tokens simply leave nothing behind in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    #[serde(flatten)]
    pub status: ParseStatus,
    /// Entry count after parsing.
    pub entries: usize,
    /// Tokens dropped for containing more than one `=`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
}

impl ParseReport {
    pub(crate) fn mismatch(expected: Option<usize>, actual: usize) -> Self {
        Self {
            status: ParseStatus::CountMismatch { expected, actual },
            entries: 0,
            ignored: Vec::new(),
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.status == ParseStatus::Parsed
    }
}
