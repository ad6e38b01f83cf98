/// Remove a leading `--`, or failing that a single leading `-`.
///
/// Only one prefix is removed: `---x` becomes `-x`, and a lone `-` or `--`
/// becomes the empty string.
pub fn strip_leading_dashes(value: &str) -> &str {
    value
        .strip_prefix("--")
        .or_else(|| value.strip_prefix('-'))
        .unwrap_or(value)
}
