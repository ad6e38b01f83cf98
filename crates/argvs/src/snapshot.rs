use crate::store::{ArgStore, Entry};
use crate::value::ArgValue;
use indexmap::IndexMap;
use serde::Serialize;

/// Serializable view of an [`ArgStore`].
///
/// `values` holds one lookup result per key, collapsed the same way
/// [`ArgStore::get_arg`] collapses them (without deduplication).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub script: Option<&'a str>,
    pub entries: &'a [Entry],
    pub values: IndexMap<&'a str, ArgValue>,
    pub flags: &'a [String],
    pub help: bool,
    pub verbose: bool,
    pub strip_leading_dashes: bool,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn of(store: &'a ArgStore) -> Self {
        let values = store
            .grouped()
            .into_iter()
            .filter_map(|(key, values)| {
                let values = values.into_iter().map(str::to_string).collect();
                ArgValue::from_values(values).map(|value| (key, value))
            })
            .collect();

        Self {
            script: store.script(),
            entries: store.entries(),
            values,
            flags: store.flags(),
            help: store.has_help(),
            verbose: store.has_verbose(),
            strip_leading_dashes: store.strips_leading_dashes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ArgStore;
    use serde_json::json;

    #[test]
    fn snapshot_serializes_camel_case() {
        let store = ArgStore::from_tokens(&["tool", "--name=Joe", "--name=Jane", "--age=3", "-v"]);
        let value = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(
            value,
            json!({
                "script": "tool",
                "entries": [
                    { "key": "name", "value": "Joe" },
                    { "key": "name", "value": "Jane" },
                    { "key": "age", "value": "3" }
                ],
                "values": { "name": ["Joe", "Jane"], "age": "3" },
                "flags": ["v"],
                "help": false,
                "verbose": true,
                "stripLeadingDashes": true
            })
        );
    }

    #[test]
    fn snapshot_keeps_key_order() {
        let store = ArgStore::from_tokens(&["tool", "z=1", "a=2"]);
        let text = serde_json::to_string(&store.snapshot()).unwrap();
        let z = text.find(r#""z":"1""#).unwrap();
        let a = text.find(r#""a":"2""#).unwrap();
        assert!(z < a);
    }
}
