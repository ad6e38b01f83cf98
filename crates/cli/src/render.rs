use argvs::{ArgStore, ParseReport, ParseStatus, Snapshot};
use serde::Serialize;

#[derive(Serialize)]
pub struct InspectOutput<'a> {
    pub report: &'a ParseReport,
    pub store: Snapshot<'a>,
}

pub fn inspect_json(store: &ArgStore, report: &ParseReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&InspectOutput {
        report,
        store: store.snapshot(),
    })
}

/// Plain-text summary of a parsed store, one newline-terminated line per
/// field.
pub fn inspect_text(store: &ArgStore, report: &ParseReport) -> String {
    let mut lines = Vec::new();

    if let ParseStatus::CountMismatch { expected, actual } = report.status {
        let expected = expected.map_or_else(|| "none".to_string(), |n| n.to_string());
        lines.push(format!(
            "nothing parsed: expected {expected} tokens, got {actual}"
        ));
        return terminate(lines);
    }

    lines.push(format!("script:  {}", store.script().unwrap_or("-")));

    if store.is_empty() {
        lines.push("entries: -".to_string());
    } else {
        lines.push("entries:".to_string());
        lines.extend(
            store
                .grouped()
                .into_iter()
                .map(|(key, values)| format!("  {key} = {}", values.join(", "))),
        );
    }

    if store.flags().is_empty() {
        lines.push("flags:   -".to_string());
    } else {
        lines.push(format!("flags:   {}", store.flags().join(" ")));
    }

    lines.push(format!("help:    {}", yes_no(store.has_help())));
    lines.push(format!("verbose: {}", yes_no(store.has_verbose())));

    if !report.ignored.is_empty() {
        lines.push(format!("ignored: {}", report.ignored.join(" ")));
    }
    terminate(lines)
}

fn terminate(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn yes_no(v: bool) -> &'static str {
    if v { "yes" } else { "no" }
}
