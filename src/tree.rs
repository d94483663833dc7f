//! Reconstruction of nested trees from parent-linked flat records.
//!
//! simPRO returns hierarchical resources (e.g. prebuild groups) as a flat
//! list in which each record carries a `ParentGroup` object naming its
//! parent's `ID`. [`to_tree`] rebuilds the nesting as a forest, attaching
//! a `children` array to every record.

use serde_json::Value;

/// Field carrying a record's identifier.
const ID_FIELD: &str = "ID";

/// Field carrying the parent reference, a nested object with its own
/// `ID`, or absent/empty for a root.
const PARENT_FIELD: &str = "ParentGroup";

/// The "no parent" sentinel identifier.
const ROOT_SENTINEL: i64 = 0;

/// Rebuilds a forest of nested records from a flat parent-linked list.
///
/// Roots are the records whose parent reference is absent, empty, or the
/// sentinel `0`. Each record gains a `children` array holding, in the
/// input's original relative order, every record whose parent reference
/// names it. Records whose parent identifier matches no present record are
/// dropped from the output entirely; excluding orphans is deliberate
/// policy, not an error.
///
/// The descent rescans the full input at every level, so with `n` records
/// and depth `d` the cost is O(n·d). That is fine for the small
/// administrative hierarchies this serves, not for large graphs. A cycle
/// in the parent references recurses without bound; the input is trusted
/// to be acyclic.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use simpro_api::to_tree;
///
/// let flat = vec![
///     json!({"ID": 202, "Name": "Granite", "ParentGroup": {}}),
///     json!({"ID": 566, "Name": "Slabs", "ParentGroup": {"ID": 202}}),
/// ];
/// let forest = to_tree(&flat);
/// assert_eq!(forest[0]["children"][0]["ID"], 566);
/// assert_eq!(forest[0]["children"][0]["children"], json!([]));
/// ```
#[must_use]
pub fn to_tree(items: &[Value]) -> Vec<Value> {
    children_of(items, ROOT_SENTINEL)
}

fn children_of(items: &[Value], parent_id: i64) -> Vec<Value> {
    items
        .iter()
        .filter(|item| parent_ref(item) == parent_id)
        .map(|item| {
            let children = item
                .get(ID_FIELD)
                .and_then(Value::as_i64)
                .map_or_else(Vec::new, |id| children_of(items, id));

            let mut node = item.clone();
            if let Value::Object(fields) = &mut node {
                fields.insert("children".to_string(), Value::Array(children));
            }
            node
        })
        .collect()
}

/// The identifier a record declares as its parent, or the root sentinel
/// when the parent reference is absent or empty.
fn parent_ref(item: &Value) -> i64 {
    item.get(PARENT_FIELD)
        .and_then(|parent| parent.get(ID_FIELD))
        .and_then(Value::as_i64)
        .unwrap_or(ROOT_SENTINEL)
}
