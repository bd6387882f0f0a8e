//! Sequence handle.

use super::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A shared, mutable, ordered sequence of values.
#[derive(Clone, Default)]
pub struct Seq(Rc<RefCell<Vec<Value>>>);

impl Seq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Store `value` at `index`, padding any gap with `Undefined`.
    /// Returns the previous value if the slot existed.
    pub fn set(&self, index: usize, value: impl Into<Value>) -> Option<Value> {
        let mut items = self.0.borrow_mut();
        if index < items.len() {
            return Some(std::mem::replace(&mut items[index], value.into()));
        }
        items.resize(index, Value::Undefined);
        items.push(value.into());
        None
    }

    pub fn push(&self, value: impl Into<Value>) {
        self.0.borrow_mut().push(value.into());
    }

    /// Snapshot of the current elements. Containers inside are shared, not copied.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Replace the whole contents in one borrow.
    pub(crate) fn fill(&self, items: Vec<Value>) {
        *self.0.borrow_mut() = items;
    }

    pub fn ptr_eq(&self, other: &Seq) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Allocation address, used as the identity key in visited-sets.
    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl FromIterator<Value> for Seq {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl PartialEq for Seq {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for Seq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Array(self.clone()), f)
    }
}
