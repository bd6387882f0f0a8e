//! Record handle.
//!
//! エントリは挿入順の `Vec` で保持する（走査順 = 挿入順）。
//! 既存 key への insert は位置を変えずに値だけ置き換える。

use super::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A shared, mutable mapping from string keys to values, in insertion order.
#[derive(Clone, Default)]
pub struct Record(Rc<RefCell<Vec<(String, Value)>>>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut out: Vec<(String, Value)> = Vec::new();
        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            match positions.get(&key) {
                Some(&pos) => out[pos].1 = value,
                None => {
                    positions.insert(key.clone(), out.len());
                    out.push((key, value));
                }
            }
        }
        Self(Rc::new(RefCell::new(out)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0
            .borrow()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.borrow().iter().any(|(k, _)| k == key)
    }

    /// Insert or replace. Returns the previous value for `key`, if any.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        let mut entries = self.0.borrow_mut();
        if let Some((_, slot)) = entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        entries.push((key, value));
        None
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        let mut entries = self.0.borrow_mut();
        let pos = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(pos).1)
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0.borrow().clone()
    }

    /// Replace the whole contents in one borrow. Keys must already be unique.
    pub(crate) fn fill(&self, entries: Vec<(String, Value)>) {
        *self.0.borrow_mut() = entries;
    }

    pub fn ptr_eq(&self, other: &Record) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

/// Same key set with equal values; order does not matter.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let ours = self.entries();
        ours.len() == other.len()
            && ours
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|theirs| theirs == *v))
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Record(self.clone()), f)
    }
}
