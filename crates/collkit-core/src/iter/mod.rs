//! Iter - 走査プリミティブ
//!
//! - **each**: sequence / record を同じ形で走査する（visitor が `false` を返したら打ち切り）
//! - **walk**: `r_each`。明示的な `Advance` で 1 要素ずつ進む逐次走査
//! - **async_walk**: `r_each_async`。`visit().await` の完了を advance とみなす版

pub mod async_walk;
pub mod walk;

pub use self::async_walk::{AsyncVisitor, r_each_async};
pub use self::walk::{Absent, Advance, r_each};

use crate::value::{Record, Seq, Value};
use std::fmt;
use std::ops::ControlFlow;

/// What a visitor's return value means for the traversal.
///
/// `()` and `true` continue, `false` stops. `ControlFlow` is taken as-is.
pub trait IntoFlow {
    fn into_flow(self) -> ControlFlow<()>;
}

impl IntoFlow for () {
    fn into_flow(self) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl IntoFlow for bool {
    fn into_flow(self) -> ControlFlow<()> {
        if self {
            ControlFlow::Continue(())
        } else {
            ControlFlow::Break(())
        }
    }
}

impl IntoFlow for ControlFlow<()> {
    fn into_flow(self) -> ControlFlow<()> {
        self
    }
}

/// Position of a visited item inside a dynamic container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Name(_) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Index(_) => None,
            Key::Name(name) => Some(name),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(name) => f.write_str(name),
        }
    }
}

/// A container `each` can walk.
///
/// Sequences visit `(item, index)` in ascending order, records visit
/// `(value, key)` in insertion order. Shared containers (`Seq`, `Record`,
/// `Value`) are walked over a snapshot, so the visitor may mutate them.
pub trait Each {
    type Item;
    type Key;

    fn each<F, R>(&self, f: F)
    where
        F: FnMut(&Self::Item, Self::Key) -> R,
        R: IntoFlow;
}

/// Visit every item of `container`, stopping early when the visitor says so.
///
/// ```
/// use collkit_core::each;
///
/// let mut seen = Vec::new();
/// each(&vec![1, 2, 3], |n, _| {
///     seen.push(*n);
///     *n < 2
/// });
/// assert_eq!(seen, vec![1, 2]);
/// ```
pub fn each<C, F, R>(container: &C, f: F)
where
    C: Each + ?Sized,
    F: FnMut(&C::Item, C::Key) -> R,
    R: IntoFlow,
{
    container.each(f)
}

impl<T> Each for [T] {
    type Item = T;
    type Key = usize;

    fn each<F, R>(&self, mut f: F)
    where
        F: FnMut(&T, usize) -> R,
        R: IntoFlow,
    {
        for (i, item) in self.iter().enumerate() {
            if f(item, i).into_flow().is_break() {
                return;
            }
        }
    }
}

impl<T> Each for Vec<T> {
    type Item = T;
    type Key = usize;

    fn each<F, R>(&self, f: F)
    where
        F: FnMut(&T, usize) -> R,
        R: IntoFlow,
    {
        self.as_slice().each(f)
    }
}

impl<T, const N: usize> Each for [T; N] {
    type Item = T;
    type Key = usize;

    fn each<F, R>(&self, f: F)
    where
        F: FnMut(&T, usize) -> R,
        R: IntoFlow,
    {
        self.as_slice().each(f)
    }
}

/// `None` is the null container: nothing is visited.
impl<C: Each> Each for Option<C> {
    type Item = C::Item;
    type Key = C::Key;

    fn each<F, R>(&self, f: F)
    where
        F: FnMut(&C::Item, C::Key) -> R,
        R: IntoFlow,
    {
        if let Some(container) = self {
            container.each(f)
        }
    }
}

impl Each for Seq {
    type Item = Value;
    type Key = usize;

    fn each<F, R>(&self, f: F)
    where
        F: FnMut(&Value, usize) -> R,
        R: IntoFlow,
    {
        self.to_vec().each(f)
    }
}

impl Each for Record {
    type Item = Value;
    type Key = String;

    fn each<F, R>(&self, mut f: F)
    where
        F: FnMut(&Value, String) -> R,
        R: IntoFlow,
    {
        for (key, value) in self.entries() {
            if f(&value, key).into_flow().is_break() {
                return;
            }
        }
    }
}

/// Sequences and records are walked; every other value is a no-op.
impl Each for Value {
    type Item = Value;
    type Key = Key;

    fn each<F, R>(&self, mut f: F)
    where
        F: FnMut(&Value, Key) -> R,
        R: IntoFlow,
    {
        match self {
            Value::Array(seq) => seq.each(|item, i| f(item, Key::Index(i))),
            Value::Record(record) => record.each(|item, key| f(item, Key::Name(key))),
            _ => {}
        }
    }
}
