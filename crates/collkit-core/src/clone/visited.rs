//! Visited-set: 一回のトップレベル clone の間だけ使う identity 集合。
//!
//! key はコンテナの割り当てアドレス。元のコンテナも一緒に保持しておくので、
//! 生きている間にアドレスが再利用されることはない。

use crate::value::Value;
use std::collections::HashMap;

/// Containers already entered by a clone, keyed by identity.
///
/// Each entry records what a repeat encounter should resolve to: the original
/// itself (`CycleMode::LinkOriginal`) or its copy (`CycleMode::Preserve`).
#[derive(Debug, Default)]
pub struct Visited {
    entries: HashMap<usize, Entry>,
}

#[derive(Debug)]
struct Entry {
    _original: Value,
    resolved: Value,
}

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `value` (by identity) has been entered. Scalars never have.
    pub fn contains(&self, value: &Value) -> bool {
        identity(value).is_some_and(|addr| self.entries.contains_key(&addr))
    }

    pub(crate) fn resolve(&self, addr: usize) -> Option<Value> {
        self.entries.get(&addr).map(|e| e.resolved.clone())
    }

    pub(crate) fn enter(&mut self, addr: usize, original: Value, resolved: Value) {
        self.entries.insert(
            addr,
            Entry {
                _original: original,
                resolved,
            },
        );
    }
}

/// Identity of a container; `None` for everything else.
pub(crate) fn identity(value: &Value) -> Option<usize> {
    match value {
        Value::Array(seq) => Some(seq.addr()),
        Value::Record(record) => Some(record.addr()),
        _ => None,
    }
}
