//! The data bag threaded through a traversal run.
//!
//! A bag is a JSON object mapping string keys to arbitrary values. It is
//! the accumulating result of a workflow: every dispatched step has its
//! outputs merged into the bag, and downstream steps read their declared
//! inputs out of it. Each strategy defines its own copy discipline - see
//! the `strategy` module.

use serde_json::Value;

/// Shared key/value state accumulated across a traversal run.
pub type DataBag = serde_json::Map<String, Value>;

/// Merge `from` into `into`, overwriting existing keys.
pub fn merge(into: &mut DataBag, from: &DataBag) {
    for (key, value) in from {
        into.insert(key.clone(), value.clone());
    }
}

/// Build a [`DataBag`] from key/value pairs.
///
/// ```rust
/// use agentflow_core::state::bag_from;
/// use serde_json::json;
///
/// let bag = bag_from([("topic", json!("rust")), ("depth", json!(2))]);
/// assert_eq!(bag["depth"], json!(2));
/// ```
pub fn bag_from<K, I>(pairs: I) -> DataBag
where
    K: Into<String>,
    I: IntoIterator<Item = (K, Value)>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_overwrites_and_extends() {
        let mut into = bag_from([("a", json!(1)), ("b", json!(2))]);
        let from = bag_from([("b", json!(20)), ("c", json!(3))]);

        merge(&mut into, &from);

        assert_eq!(into["a"], json!(1));
        assert_eq!(into["b"], json!(20));
        assert_eq!(into["c"], json!(3));
    }

    #[test]
    fn test_merge_empty_is_noop() {
        let mut into = bag_from([("a", json!(1))]);
        merge(&mut into, &DataBag::new());
        assert_eq!(into.len(), 1);
    }
}
