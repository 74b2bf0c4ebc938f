//! Array-transparent path resolution over JSON documents.
//!
//! CycloneDX overloads the same semantic field with single-string and
//! array-of-string variants depending on the asset sub-type, and arrays may
//! appear at any depth. [`resolve`] is therefore an all-matches projection:
//! every value reachable through the dotted path is returned, with arrays
//! fanned out along the way.
//!
//! ```
//! use cbom_tools::model::resolve;
//! use serde_json::json;
//!
//! let doc = json!({"suites": [{"algorithms": ["a", "b"]}, {"algorithms": "c"}]});
//! let refs: Vec<_> = resolve(&doc, "suites.algorithms").unwrap();
//! assert_eq!(refs, vec![&json!("a"), &json!("b"), &json!("c")]);
//! ```

use serde_json::{Map, Value};

/// Tagged view over a position in the document.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    /// A JSON object, with the value that holds it
    Record(&'a Value, &'a Map<String, Value>),
    /// A JSON array
    Array(&'a [Value]),
    /// Any other JSON value (string, number, bool, null)
    Scalar(&'a Value),
    /// No value at this position
    Absent,
}

impl<'a> Node<'a> {
    /// Classify an optional value.
    #[must_use]
    pub fn of(value: Option<&'a Value>) -> Self {
        match value {
            None => Self::Absent,
            Some(v @ Value::Object(map)) => Self::Record(v, map),
            Some(Value::Array(items)) => Self::Array(items),
            Some(other) => Self::Scalar(other),
        }
    }
}

/// Resolve `path` (dot-separated field names) against `root`.
///
/// Returns `None` only when the path does not resolve on any branch.
/// A non-array leaf is wrapped into a one-element vector, an array leaf
/// contributes its elements as they are.
#[must_use]
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<Vec<&'a Value>> {
    let segments: Vec<&str> = if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    };
    resolve_segments(Node::of(Some(root)), &segments)
}

/// Resolve a path and keep only string results.
///
/// Reference fields hold bom-refs, so anything else is noise.
#[must_use]
pub fn resolve_strings<'a>(root: &'a Value, path: &str) -> Vec<&'a str> {
    resolve(root, path)
        .unwrap_or_default()
        .into_iter()
        .filter_map(Value::as_str)
        .collect()
}

/// Loose presence test for optional fields.
///
/// `null`, `false`, `0` and `""` count as unset, everything else as set.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn resolve_segments<'a>(node: Node<'a>, segments: &[&str]) -> Option<Vec<&'a Value>> {
    let Some((head, rest)) = segments.split_first() else {
        return leaf(node);
    };

    match node {
        Node::Array(items) => flatten(
            items
                .iter()
                .map(|item| resolve_segments(Node::of(Some(item)), segments)),
        ),
        Node::Record(_, fields) if !head.is_empty() => {
            resolve_segments(Node::of(fields.get(*head)), rest)
        }
        Node::Record(..) | Node::Scalar(_) | Node::Absent => None,
    }
}

/// Terminal step: wrap a single value, pass an array through.
fn leaf(node: Node<'_>) -> Option<Vec<&Value>> {
    match node {
        Node::Record(value, _) | Node::Scalar(value) => Some(vec![value]),
        Node::Array(items) => Some(items.iter().collect()),
        Node::Absent => None,
    }
}

/// Concatenate per-branch results, dropping unresolved branches.
///
/// Yields `None` only if every branch was unresolved.
pub fn flatten<'a, I>(branches: I) -> Option<Vec<&'a Value>>
where
    I: IntoIterator<Item = Option<Vec<&'a Value>>>,
{
    let mut resolved = false;
    let mut out = Vec::new();
    for branch in branches.into_iter().flatten() {
        resolved = true;
        out.extend(branch);
    }
    resolved.then_some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_leaf_is_wrapped() {
        let doc = json!({"a": {"b": {"c": "leaf"}}});
        assert_eq!(resolve(&doc, "a.b.c"), Some(vec![&json!("leaf")]));
    }

    #[test]
    fn test_missing_segment_is_unresolved() {
        let doc = json!({"a": {"b": 1}});
        assert_eq!(resolve(&doc, "a.x"), None);
        assert_eq!(resolve(&doc, "a.b.c"), None, "cannot descend into a scalar");
    }

    #[test]
    fn test_array_leaf_returned_as_is() {
        let doc = json!({"a": [1, [2, 3]]});
        assert_eq!(
            resolve(&doc, "a"),
            Some(vec![&json!(1), &json!([2, 3])]),
            "nested arrays at the leaf are not flattened"
        );

        let empty = json!({"a": []});
        assert_eq!(resolve(&empty, "a"), Some(vec![]));
    }

    #[test]
    fn test_array_in_the_middle_fans_out() {
        let doc = json!({
            "suites": [
                {"algorithms": ["r1", "r2"]},
                {"name": "no algorithms"},
                {"algorithms": "r3"}
            ]
        });
        assert_eq!(
            resolve_strings(&doc, "suites.algorithms"),
            vec!["r1", "r2", "r3"]
        );
    }

    #[test]
    fn test_all_branches_unresolved_is_none() {
        let doc = json!({"suites": [{"x": 1}, {"y": 2}]});
        assert_eq!(resolve(&doc, "suites.algorithms"), None);
    }

    #[test]
    fn test_nested_arrays_at_several_depths() {
        let doc = json!([
            {"p": [{"q": "a"}, {"q": ["b", "c"]}]},
            {"p": {"q": "d"}}
        ]);
        assert_eq!(resolve_strings(&doc, "p.q"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_empty_path_yields_root() {
        let doc = json!({"k": "v"});
        assert_eq!(resolve(&doc, ""), Some(vec![&doc]));
    }

    #[test]
    fn test_empty_segment_never_matches() {
        let doc = json!({"": {"a": 1}});
        assert_eq!(resolve(&doc, ".a"), None);
    }

    #[test]
    fn test_resolve_strings_skips_non_strings() {
        let doc = json!({"refs": ["a", 1, null, "b"]});
        assert_eq!(resolve_strings(&doc, "refs"), vec!["a", "b"]);
    }

    #[test]
    fn test_truthiness() {
        for falsy in [json!(null), json!(false), json!(0), json!(0.0), json!("")] {
            assert!(!is_truthy(&falsy), "{falsy}");
        }
        for truthy in [json!(true), json!(-1), json!("x"), json!([]), json!({})] {
            assert!(is_truthy(&truthy), "{truthy}");
        }
    }

    #[test]
    fn test_flatten_keeps_resolved_empty_branch() {
        let v = json!("x");
        assert_eq!(flatten(vec![None, Some(vec![])]), Some(vec![]));
        assert_eq!(flatten(vec![None, None]), None);
        assert_eq!(flatten(vec![Some(vec![&v]), None]), Some(vec![&v]));
    }
}
