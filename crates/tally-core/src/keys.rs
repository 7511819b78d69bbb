//! Key namespace shared by every store operation.
//!
//! Two families of keys, both scoped to the owning user:
//!
//! - `todos:{userId}:{itemId}` — one record per item.
//! - `todos:user:{userId}:index` — the ordered list of that user's item ids,
//!   which stands in for a query layer the store does not have.

/// Key of a single item record.
#[must_use]
pub fn item_key(user_id: &str, item_id: &str) -> String {
    format!("todos:{user_id}:{item_id}")
}

/// Key of the per-user index record.
#[must_use]
pub fn index_key(user_id: &str) -> String {
    format!("todos:user:{user_id}:index")
}

/// Prefix under which all of a user's item records live.
#[must_use]
pub fn item_prefix(user_id: &str) -> String {
    format!("todos:{user_id}:")
}

/// Extract the item id from a key produced by [`item_key`], if it matches.
#[must_use]
pub fn item_id_from_key<'a>(user_id: &str, key: &'a str) -> Option<&'a str> {
    let rest = key.strip_prefix("todos:")?;
    let rest = rest.strip_prefix(user_id)?;
    let id = rest.strip_prefix(':')?;
    if id.is_empty() { None } else { Some(id) }
}
