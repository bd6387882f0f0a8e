//! Transform primitive: null-safe `map`.

use crate::value::Value;

/// Project every element; position `i` holds `f(&seq[i], i)`.
///
/// `None` is the null sequence and yields an empty vector without calling `f`.
pub fn map<T, U, S, F>(seq: Option<S>, mut f: F) -> Vec<U>
where
    S: AsRef<[T]>,
    F: FnMut(&T, usize) -> U,
{
    let Some(seq) = seq else {
        return Vec::new();
    };
    seq.as_ref()
        .iter()
        .enumerate()
        .map(|(i, item)| f(item, i))
        .collect()
}

/// `map` over a dynamic value.
///
/// `null` and `undefined` yield an empty vector. Any other non-sequence is
/// treated the same way, since it has no elements to project.
pub fn map_value<U, F>(value: &Value, f: F) -> Vec<U>
where
    F: FnMut(&Value, usize) -> U,
{
    map(value.as_seq().map(|seq| seq.to_vec()), f)
}
