use crate::dashes::strip_leading_dashes;
use crate::options::StoreOptions;
use crate::report::{ParseReport, ParseStatus};
use crate::snapshot::Snapshot;
use crate::value::ArgValue;
use indexmap::IndexMap;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;

/// One parsed `key=value` token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LookupKey {
    key: String,
    unique: bool,
}

impl LookupKey {
    fn new(key: &str, unique: bool) -> Self {
        Self {
            key: key.to_string(),
            unique,
        }
    }
}

/// Parsed view of a process argument vector.
///
/// The first token is the script name. Every later token without `=` is a
/// flag; every token with exactly one `=` is an entry. Tokens with more than
/// one `=` are dropped. Duplicate keys are kept as separate entries, in
/// order, and [`get_arg`](Self::get_arg) collapses them on the way out.
#[derive(Debug, Clone, Default)]
pub struct ArgStore {
    script: Option<String>,
    entries: Vec<Entry>,
    flags: Vec<String>,
    help: bool,
    verbose: bool,
    options: StoreOptions,
    cache: RefCell<HashMap<LookupKey, Option<ArgValue>>>,
}

impl ArgStore {
    /// An empty store that will use `options` for later mutations and resets.
    pub fn new(options: StoreOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Parse `tokens` if `expected` equals their count.
    ///
    /// On a mismatch the store is left at its defaults, dash stripping
    /// included; `strip_leading_dashes` only applies to a store that parsed.
    pub fn from_argv<S: AsRef<str>>(
        tokens: &[S],
        expected: usize,
        strip_leading_dashes: bool,
    ) -> Self {
        let mut store = Self::default();
        if tokens.len() == expected {
            store.reset(tokens, Some(expected), strip_leading_dashes);
        } else {
            tracing::debug!(
                expected,
                actual = tokens.len(),
                "argument count mismatch, store left at defaults"
            );
        }
        store
    }

    /// Parse `tokens` with dash stripping, using their own length as the
    /// expected count.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        Self::from_argv(tokens, tokens.len(), true)
    }

    /// Parse the current process arguments.
    pub fn from_env() -> Self {
        let argv: Vec<String> = std::env::args_os()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        Self::from_tokens(&argv)
    }

    /// Drop all state and reparse under a new dash-stripping mode.
    ///
    /// Parsing happens only when `expected` is `Some` and equals
    /// `tokens.len()`. The help/verbose token sets are kept.
    pub fn reset<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        expected: Option<usize>,
        strip_leading_dashes: bool,
    ) -> ParseReport {
        self.options.strip_leading_dashes = strip_leading_dashes;
        self.reparse(tokens, expected)
    }

    /// Like [`reset`](Self::reset), replacing every option.
    pub fn reset_with<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        expected: Option<usize>,
        options: StoreOptions,
    ) -> ParseReport {
        self.options = options;
        self.reparse(tokens, expected)
    }

    /// Empty the store, keeping its options.
    pub fn clear(&mut self) {
        self.script = None;
        self.entries.clear();
        self.flags.clear();
        self.help = false;
        self.verbose = false;
        self.cache.get_mut().clear();
    }

    fn reparse<S: AsRef<str>>(&mut self, tokens: &[S], expected: Option<usize>) -> ParseReport {
        self.clear();

        if expected != Some(tokens.len()) {
            tracing::debug!(
                ?expected,
                actual = tokens.len(),
                "argument count mismatch, nothing parsed"
            );
            return ParseReport::mismatch(expected, tokens.len());
        }

        let ignored = self.process(tokens);
        ParseReport {
            status: ParseStatus::Parsed,
            entries: self.entries.len(),
            ignored,
        }
    }

    fn process<S: AsRef<str>>(&mut self, tokens: &[S]) -> Vec<String> {
        let mut ignored = Vec::new();
        let Some((script, rest)) = tokens.split_first() else {
            return ignored;
        };
        self.script = Some(script.as_ref().to_string());

        for token in rest {
            let token = token.as_ref();
            match token.split_once('=') {
                None => self.push_bare(token),
                Some((key, value)) if !value.contains('=') => {
                    self.add_arg(key, value);
                }
                Some(_) => {
                    tracing::debug!(token, "ignoring token with more than one '='");
                    ignored.push(token.to_string());
                }
            }
        }
        ignored
    }

    fn push_bare(&mut self, token: &str) {
        // Help/verbose are matched on the raw token, before stripping.
        if self.options.is_help(token) {
            self.help = true;
        }
        if self.options.is_verbose(token) {
            self.verbose = true;
        }
        let flag = self.normalize(token).to_string();
        self.flags.push(flag);
    }

    fn normalize<'k>(&self, key: &'k str) -> &'k str {
        if self.options.strip_leading_dashes {
            strip_leading_dashes(key)
        } else {
            key
        }
    }

    /// Append an entry. Existing entries with the same key are kept.
    pub fn add_arg(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        let key = self.normalize(key).to_string();
        self.cache.get_mut().clear();
        self.entries.push(Entry {
            key,
            value: value.into(),
        });
        self
    }

    /// Remove every entry for `key`. Returns whether anything was removed.
    pub fn remove_arg(&mut self, key: &str) -> bool {
        let key = self.normalize(key);
        let cache = self.cache.get_mut();
        for unique in [false, true] {
            cache.remove(&LookupKey::new(key, unique));
        }

        let before = self.entries.len();
        self.entries.retain(|entry| entry.key != key);
        self.entries.len() != before
    }

    /// Look up the value(s) for `key`.
    ///
    /// With `unique_values`, repeated values collapse to their first
    /// occurrence before the single/multiple decision is made, so
    /// `name=Joe name=Joe` yields `Single("Joe")`.
    pub fn get_arg(&self, key: &str, unique_values: bool) -> Option<ArgValue> {
        let lookup = LookupKey::new(self.normalize(key), unique_values);
        if let Some(hit) = self.cache.borrow().get(&lookup) {
            tracing::trace!(key = %lookup.key, unique_values, "lookup cache hit");
            return hit.clone();
        }

        let mut values: Vec<String> = Vec::new();
        for entry in self.entries.iter().filter(|entry| entry.key == lookup.key) {
            if unique_values && values.contains(&entry.value) {
                continue;
            }
            values.push(entry.value.clone());
        }

        let result = ArgValue::from_values(values);
        self.cache.borrow_mut().insert(lookup, result.clone());
        result
    }

    pub fn get(&self, key: &str) -> Option<ArgValue> {
        self.get_arg(key, false)
    }

    pub fn get_unique(&self, key: &str) -> Option<ArgValue> {
        self.get_arg(key, true)
    }

    /// Append a flag exactly as given; it is not dash-stripped.
    pub fn add_flag(&mut self, flag: impl Into<String>) -> &mut Self {
        self.flags.push(flag.into());
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        let flag = self.normalize(flag);
        self.flags.iter().any(|f| f == flag)
    }

    /// Remove every stored flag equal to `flag` or to its stripped form.
    pub fn remove_flag(&mut self, flag: &str) -> &mut Self {
        let normalized = self.normalize(flag);
        self.flags.retain(|f| f != flag && f != normalized);
        self
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn has_help(&self) -> bool {
        self.help
    }

    pub fn has_verbose(&self) -> bool {
        self.verbose
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn strips_leading_dashes(&self) -> bool {
        self.options.strip_leading_dashes
    }

    /// Values per key, keys in order of first appearance.
    pub fn grouped(&self) -> IndexMap<&str, Vec<&str>> {
        let mut grouped: IndexMap<&str, Vec<&str>> = IndexMap::new();
        for entry in &self.entries {
            grouped
                .entry(entry.key.as_str())
                .or_default()
                .push(entry.value.as_str());
        }
        grouped
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(tokens: &[&str]) -> ArgStore {
        ArgStore::from_argv(tokens, tokens.len(), true)
    }

    #[test]
    fn parses_script_and_entries() {
        let store = argv(&["foo.php", "--foo=bar", "--name=Joe", "--age=23"]);
        assert_eq!(store.script(), Some("foo.php"));
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("--foo"), Some(ArgValue::from("bar")));
        assert_eq!(store.get("--name"), Some(ArgValue::from("Joe")));
        assert_eq!(store.get("--age"), Some(ArgValue::from("23")));
    }

    #[test]
    fn dashed_and_stripped_keys_are_interchangeable() {
        let store = argv(&["foo.php", "--foo=bar", "-name=Joe"]);
        for key in ["foo", "-foo", "--foo"] {
            assert_eq!(store.get(key), Some(ArgValue::from("bar")), "key {key}");
        }
        for key in ["name", "-name", "--name"] {
            assert_eq!(store.get(key), Some(ArgValue::from("Joe")), "key {key}");
        }
        assert_eq!(store.entries()[0].key, "foo");
    }

    #[test]
    fn keep_dashes_mode_compares_verbatim() {
        let store = ArgStore::from_argv(&["foo.php", "--foo=bar", "--print", "--help"], 4, false);
        assert!(!store.strips_leading_dashes());
        assert_eq!(store.get("--foo"), Some(ArgValue::from("bar")));
        assert_eq!(store.get("foo"), None);
        assert!(store.has_flag("--print"));
        assert!(!store.has_flag("print"));
        assert!(store.has_help());
    }

    #[test]
    fn add_and_remove_argument() {
        let mut store = argv(&["foo.php", "--foo=bar", "--name=Joe", "--age=23"]);
        assert_eq!(store.get("foo"), Some(ArgValue::from("bar")));

        assert!(store.remove_arg("foo"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("foo"), None);
        assert!(!store.remove_arg("foo"));

        store.add_arg("foo", "bar");
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("--foo"), Some(ArgValue::from("bar")));
        assert_eq!(store.get("-foo"), Some(ArgValue::from("bar")));
    }

    #[test]
    fn remove_arg_drops_every_duplicate() {
        let mut store = argv(&["s", "--name=Joe", "--age=1", "--name=Jane"]);
        assert!(store.remove_arg("--name"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("name"), None);
        assert_eq!(store.get("age"), Some(ArgValue::from("1")));
    }

    #[test]
    fn duplicate_keys_return_ordered_list() {
        let store = argv(&["foo.php", "--foo=bar", "--name=Joe", "--name=Jane"]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get("--name"), Some(ArgValue::from(vec!["Joe", "Jane"])));
        assert_eq!(store.get("--foo"), Some(ArgValue::from("bar")));
    }

    #[test]
    fn unique_values_collapse_to_single() {
        let store = argv(&["foo.php", "--foo=bar", "--name=Joe", "--name=Joe"]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.get_arg("--name", true), Some(ArgValue::from("Joe")));
        assert_eq!(store.get_arg("--name", false), Some(ArgValue::from(vec!["Joe", "Joe"])));
    }

    #[test]
    fn unique_values_keep_first_occurrence_order() {
        let store = argv(&["s", "x=b", "x=a", "x=b", "x=c", "x=a"]);
        assert_eq!(store.get_unique("x"), Some(ArgValue::from(vec!["b", "a", "c"])));
    }

    #[test]
    fn repeated_lookups_are_stable() {
        let store = argv(&["s", "--a=1", "--a=2"]);
        let first = store.get("a");
        assert_eq!(store.get("a"), first);
        assert_eq!(store.get("--a"), first);
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn mutations_invalidate_cached_lookups() {
        let mut store = argv(&["s", "--a=1"]);
        assert_eq!(store.get("a"), Some(ArgValue::from("1")));
        assert_eq!(store.get_unique("a"), Some(ArgValue::from("1")));
        assert_eq!(store.get("b"), None);

        store.add_arg("--a", "2").add_arg("b", "3");
        assert_eq!(store.get("a"), Some(ArgValue::from(vec!["1", "2"])));
        assert_eq!(store.get_unique("a"), Some(ArgValue::from(vec!["1", "2"])));
        assert_eq!(store.get("b"), Some(ArgValue::from("3")));

        assert!(store.remove_arg("a"));
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get_unique("a"), None);
        assert_eq!(store.get("b"), Some(ArgValue::from("3")));
    }

    #[test]
    fn help_is_detected_in_any_position() {
        for tokens in [
            ["foo.php", "--help", "--name=Joe"],
            ["foo.php", "--name=Joe", "--help"],
        ] {
            let store = argv(&tokens);
            assert_eq!(store.script(), Some("foo.php"));
            assert_eq!(store.len(), 1);
            assert_eq!(store.get("--name"), Some(ArgValue::from("Joe")));
            assert!(store.has_help());
            assert!(!store.has_verbose());
        }

        let store = argv(&["foo.php", "--name=Joe"]);
        assert!(!store.has_help());
    }

    #[test]
    fn verbose_is_detected_from_every_spelling() {
        for spelling in ["verbose", "-verbose", "--verbose", "-v", "--v"] {
            let store = argv(&["foo.php", "--name=Joe", spelling]);
            assert!(store.has_verbose(), "spelling {spelling}");
            assert!(!store.has_help());
        }

        let store = argv(&["foo.php", "-vv", "--name=Joe"]);
        assert!(!store.has_verbose());
    }

    #[test]
    fn help_token_inside_an_entry_does_not_count() {
        let store = argv(&["foo.php", "--help=no"]);
        assert!(!store.has_help());
        assert_eq!(store.get("help"), Some(ArgValue::from("no")));
    }

    #[test]
    fn flag_membership_and_removal() {
        let mut store = argv(&["foo.php", "--verbose", "--help", "--print"]);
        assert!(store.is_empty());
        assert!(!store.has_flag("--foobar"));
        for flag in ["verbose", "help", "print"] {
            assert!(store.has_flag(flag));
            assert!(store.has_flag(&format!("-{flag}")));
            assert!(store.has_flag(&format!("--{flag}")));
        }

        store.remove_flag("verbose");
        assert!(!store.has_flag("verbose"));
        assert!(!store.has_flag("--verbose"));
        assert!(store.has_flag("help"));

        store.remove_flag("--help").remove_flag("-print");
        assert!(!store.has_flag("help"));
        assert!(!store.has_flag("print"));
        assert!(store.flags().is_empty());

        // Removing a flag does not clear the sticky state.
        assert!(store.has_help());
        assert!(store.has_verbose());
    }

    #[test]
    fn remove_flag_removes_duplicates() {
        let mut store = argv(&["s", "--dry", "dry", "-dry"]);
        assert_eq!(store.flags(), ["dry", "dry", "dry"]);
        store.remove_flag("--dry");
        assert!(store.flags().is_empty());
    }

    #[test]
    fn add_flag_stores_verbatim() {
        let mut store = argv(&["s"]);
        store.add_flag("debug").add_flag("--trace");
        assert!(store.has_flag("--debug"));
        // `--trace` is kept with its dashes, while lookups are stripped first.
        assert!(!store.has_flag("--trace"));
        assert_eq!(store.flags(), ["debug", "--trace"]);

        store.remove_flag("--trace");
        assert_eq!(store.flags(), ["debug"]);
    }

    #[test]
    fn count_mismatch_leaves_store_empty() {
        let store = ArgStore::from_argv(&["script", "--a=1"], 5, true);
        assert_eq!(store.script(), None);
        assert_eq!(store.get("a"), None);
        assert!(store.is_empty());
        assert!(store.flags().is_empty());
    }

    #[test]
    fn count_mismatch_keeps_default_mode() {
        let mut store = ArgStore::from_argv(&["s", "--a=1"], 5, false);
        assert!(store.strips_leading_dashes());
        store.add_arg("--k", "v");
        assert_eq!(store.entries()[0].key, "k");
    }

    #[test]
    fn reset_reports_mismatch_and_missing_count() {
        let mut store = ArgStore::default();
        let report = store.reset(&["script", "--a=1"], Some(5), true);
        assert!(!report.is_parsed());
        assert_eq!(
            report.status,
            ParseStatus::CountMismatch {
                expected: Some(5),
                actual: 2
            }
        );

        let report = store.reset(&["script", "--a=1"], None, true);
        assert_eq!(
            report.status,
            ParseStatus::CountMismatch {
                expected: None,
                actual: 2
            }
        );
        assert_eq!(store.script(), None);
    }

    #[test]
    fn tokens_with_several_equals_are_dropped() {
        let mut store = ArgStore::default();
        let report = store.reset(&["s", "--a=b=c", "--d=e", "==", "plain"], Some(5), true);
        assert!(report.is_parsed());
        assert_eq!(report.entries, 1);
        assert_eq!(report.ignored, ["--a=b=c", "=="]);
        assert_eq!(store.get("a"), None);
        assert!(!store.has_flag("a=b=c"));
        assert_eq!(store.flags(), ["plain"]);
    }

    #[test]
    fn empty_pieces_still_form_an_entry() {
        let store = argv(&["s", "--empty=", "=orphan"]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("empty"), Some(ArgValue::from("")));
        assert_eq!(store.get(""), Some(ArgValue::from("orphan")));
    }

    #[test]
    fn empty_token_list_parses_to_nothing() {
        let mut store = ArgStore::default();
        let tokens: [&str; 0] = [];
        let report = store.reset(&tokens, Some(0), true);
        assert!(report.is_parsed());
        assert_eq!(store.script(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn reset_replaces_all_state() {
        let mut store = argv(&["first", "--help", "--verbose", "--a=1"]);
        assert_eq!(store.get("a"), Some(ArgValue::from("1")));
        assert!(store.has_help());

        let report = store.reset(&["second", "--b=2"], Some(2), false);
        assert!(report.is_parsed());
        assert_eq!(store.script(), Some("second"));
        assert!(!store.has_help());
        assert!(!store.has_verbose());
        assert!(store.flags().is_empty());
        assert_eq!(store.get("a"), None);
        assert_eq!(store.get("--b"), Some(ArgValue::from("2")));
        assert_eq!(store.get("b"), None);
    }

    #[test]
    fn reset_with_custom_help_tokens() {
        let mut store = ArgStore::default();
        let options = StoreOptions::new().help_token("-h");
        store.reset_with(&["s", "-h"], Some(2), options);
        assert!(store.has_help());
        assert!(store.has_flag("h"));

        store.reset(&["s", "-h"], Some(2), false);
        assert!(store.has_help(), "help tokens survive a plain reset");
    }

    #[test]
    fn clear_keeps_mode() {
        let mut store = ArgStore::from_argv(&["s", "--a=1", "--x"], 3, false);
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.script(), None);
        assert!(!store.strips_leading_dashes());

        store.add_arg("--k", "v");
        assert_eq!(store.entries()[0].key, "--k");
    }

    #[test]
    fn from_tokens_uses_own_length() {
        let store = ArgStore::from_tokens(&["tool", "--x=1", "run"]);
        assert_eq!(store.script(), Some("tool"));
        assert_eq!(store.get("x"), Some(ArgValue::from("1")));
        assert!(store.has_flag("run"));
    }

    #[test]
    fn from_env_sees_the_running_binary() {
        let store = ArgStore::from_env();
        assert!(store.script().is_some());
    }

    #[test]
    fn grouped_preserves_first_seen_key_order() {
        let store = argv(&["s", "b=1", "a=2", "b=3"]);
        let grouped = store.grouped();
        let keys: Vec<&str> = grouped.keys().copied().collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(grouped["b"], ["1", "3"]);
    }
}
