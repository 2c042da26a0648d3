use std::collections::BTreeMap;

use super::schema::FieldSchema;

/// Overlay values keyed by canonical field name.
pub type FieldValues = BTreeMap<&'static str, String>;

/// Split a line into trimmed `(key, value)` at its first colon.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.trim().split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Extract the schema's fields from free text.
///
/// Lines with an empty value are not counted as present. When a field
/// appears more than once the last occurrence wins. Returns `None` when no
/// field of the schema is present.
pub fn parse(text: &str, schema: &FieldSchema) -> Option<FieldValues> {
    let mut values = FieldValues::new();

    for line in text.split('\n') {
        if line.trim().is_empty() {
            continue;
        }
        let Some((key, value)) = split_field(line) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        if let Some(name) = schema.canonical(key) {
            values.insert(name, value.to_string());
        }
    }

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Render `values` as `name: value` lines in schema order.
///
/// Empty values and names outside the schema are skipped.
pub fn format(values: &FieldValues, schema: &FieldSchema) -> String {
    schema
        .names()
        .filter_map(|name| {
            let value = values.get(name)?.trim();
            (!value.is_empty()).then(|| format!("{name}: {value}"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every line of `text` that is not a field line of the schema, with
/// leading and trailing blank lines removed.
///
/// A line is a field line when its key matches the schema, whatever its
/// value, so `key:` with nothing after it is stripped here even though
/// `parse` ignores it.
pub fn other_content(text: &str, schema: &FieldSchema) -> String {
    let kept: Vec<&str> = text
        .split('\n')
        .filter(|line| {
            if line.trim().is_empty() {
                return true;
            }
            match split_field(line) {
                Some((key, _)) => !schema.recognizes(key),
                None => true,
            }
        })
        .collect();

    let start = kept.iter().position(|line| !line.trim().is_empty());
    let end = kept.iter().rposition(|line| !line.trim().is_empty());
    match (start, end) {
        (Some(start), Some(end)) => kept[start..=end].join("\n"),
        _ => String::new(),
    }
}

/// Replace the schema's overlay in `text` with `values`.
///
/// The new field block goes first, then a blank line, then the remaining
/// content. Non-field lines keep their bytes and relative order.
pub fn merge(text: &str, values: &FieldValues, schema: &FieldSchema) -> String {
    let block = format(values, schema);
    let rest = other_content(text, schema);

    match (block.is_empty(), rest.is_empty()) {
        (true, _) => rest,
        (false, true) => block,
        (false, false) => format!("{block}\n\n{rest}"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::schema::{ATTACHMENT, MERGE_REQUEST};
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> FieldValues {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_parse_merge_request_header() {
        let text = "branch: foo\ntarget: main\n\nFixes bug";
        let parsed = parse(text, &MERGE_REQUEST).unwrap();
        assert_eq!(parsed, values(&[("branch", "foo"), ("target", "main")]));
        assert_eq!(other_content(text, &MERGE_REQUEST), "Fixes bug");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        for line in ["Branch: x", "branch: x", "BRANCH: x", "  branch :  x  "] {
            let parsed = parse(line, &MERGE_REQUEST).unwrap();
            assert_eq!(parsed.get("branch").map(String::as_str), Some("x"));
        }
    }

    #[test]
    fn test_parse_none_without_fields() {
        assert_eq!(parse("", &ATTACHMENT), None);
        assert_eq!(parse("just prose\nnote: unrelated", &ATTACHMENT), None);
        assert_eq!(parse("attached_molecule:   \n", &ATTACHMENT), None);
    }

    #[test]
    fn test_parse_last_occurrence_wins() {
        let text = "attached_molecule: gt-1\nattached-molecule: gt-2";
        let parsed = parse(text, &ATTACHMENT).unwrap();
        assert_eq!(parsed["attached_molecule"], "gt-2");
    }

    #[test]
    fn test_parse_splits_on_first_colon() {
        let parsed = parse("attached_at: 2026-01-15T10:00:05Z", &ATTACHMENT).unwrap();
        assert_eq!(parsed["attached_at"], "2026-01-15T10:00:05Z");
    }

    #[test]
    fn test_format_uses_schema_order() {
        let vals = values(&[
            ("close_reason", "merged"),
            ("branch", "polecat/Nux/gt-xyz"),
            ("rig", "gastown"),
        ]);
        assert_eq!(
            format(&vals, &MERGE_REQUEST),
            "branch: polecat/Nux/gt-xyz\nrig: gastown\nclose_reason: merged"
        );
    }

    #[test]
    fn test_format_skips_empty_and_foreign_names() {
        let vals = values(&[("branch", ""), ("attached_at", "x"), ("worker", "Toast")]);
        assert_eq!(format(&vals, &MERGE_REQUEST), "worker: Toast");
        assert_eq!(format(&FieldValues::new(), &MERGE_REQUEST), "");
    }

    #[test]
    fn test_format_then_parse_is_stable() {
        let vals = values(&[
            ("attached_molecule", "gt-42"),
            ("attached_at", "2026-01-15T10:00:05Z"),
            ("attached_args", "focus on the parser: tests first"),
        ]);
        let text = format(&vals, &ATTACHMENT);
        assert_eq!(parse(&text, &ATTACHMENT), Some(vals));
    }

    #[test]
    fn test_merge_into_empty_text() {
        let vals = values(&[("attached_molecule", "gt-42")]);
        assert_eq!(merge("", &vals, &ATTACHMENT), "attached_molecule: gt-42");
        assert_eq!(merge("", &FieldValues::new(), &ATTACHMENT), "");
    }

    #[test]
    fn test_merge_replaces_fields_and_keeps_prose() {
        let text = "Some notes\nattached_molecule: gt-old\n\n  indented line\n\nurl: http://x";
        let vals = values(&[("attached_molecule", "gt-new")]);
        assert_eq!(
            merge(text, &vals, &ATTACHMENT),
            "attached_molecule: gt-new\n\nSome notes\n\n  indented line\n\nurl: http://x"
        );
    }

    #[test]
    fn test_merge_strips_empty_valued_field_lines() {
        let text = "attached_args:\nbody";
        assert_eq!(parse(text, &ATTACHMENT), None);
        assert_eq!(merge(text, &FieldValues::new(), &ATTACHMENT), "body");
    }

    #[test]
    fn test_merge_trims_outer_blank_lines_only() {
        let text = "\n\n  \nattached_at: now\n\nfirst\n\n\nsecond\n\n";
        assert_eq!(
            merge(text, &FieldValues::new(), &ATTACHMENT),
            "first\n\n\nsecond"
        );
    }

    #[test]
    fn test_merge_leaves_other_schemas_alone() {
        let text = "branch: foo\nattached_molecule: gt-1\n\nbody";
        let merged = merge(text, &FieldValues::new(), &ATTACHMENT);
        assert_eq!(merged, "branch: foo\n\nbody");
        assert_eq!(
            parse(&merged, &MERGE_REQUEST).unwrap()["branch"],
            "foo".to_string()
        );
    }

    #[test]
    fn test_merge_twice_is_idempotent() {
        let vals = values(&[("branch", "foo"), ("target", "main")]);
        let once = merge("Fixes bug\n\nbranch: old", &vals, &MERGE_REQUEST);
        let twice = merge(&once, &vals, &MERGE_REQUEST);
        assert_eq!(once, twice);
        assert_eq!(once, "branch: foo\ntarget: main\n\nFixes bug");
    }
}
