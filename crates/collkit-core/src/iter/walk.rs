//! Sequential walk with an explicit advance signal.
//!
//! # 状態遷移
//! - `Running(i)`: `step(item, i, advance)` を呼び、`advance` が来るまで止まる
//! - `Done`: 要素が尽きた / absent な要素に当たった → `on_done` を一度だけ呼ぶ
//!
//! step の中で同期的に `advance()` された場合はループで次へ進む（trampoline）。
//! 長い sequence を同期的に回してもスタックは伸びない。
//! `advance()` が呼ばれなければ walk はそこで止まったまま（timeout / cancel はない）。

use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Marks slots that end a walk early.
pub trait Absent {
    fn is_absent(&self) -> bool;
}

impl<T> Absent for Option<T> {
    fn is_absent(&self) -> bool {
        self.is_none()
    }
}

/// `null` and `undefined` slots end the walk.
impl Absent for Value {
    fn is_absent(&self) -> bool {
        self.is_nullish()
    }
}

impl<T: Absent + ?Sized> Absent for &T {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

macro_rules! never_absent {
    ($($t:ty),*) => {
        $(
            impl Absent for $t {
                fn is_absent(&self) -> bool {
                    false
                }
            }
        )*
    };
}

never_absent!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, str,
    String
);

/// Moves the walk to the next element. Consumed on use, so each step can
/// advance at most once.
pub struct Advance {
    walk: Rc<dyn Resume>,
}

impl Advance {
    pub fn advance(self) {
        self.walk.resume()
    }
}

impl fmt::Debug for Advance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Advance").finish_non_exhaustive()
    }
}

trait Resume {
    fn resume(self: Rc<Self>);
}

struct Walk<T> {
    items: RefCell<Box<dyn Iterator<Item = T>>>,
    step: RefCell<Box<dyn FnMut(T, usize, Advance)>>,
    on_done: Cell<Option<Box<dyn FnOnce()>>>,
    next_index: Cell<usize>,
    stepping: Cell<bool>,
    pending: Cell<bool>,
}

impl<T: Absent + 'static> Walk<T> {
    fn run(self: Rc<Self>) {
        loop {
            let next = self.items.borrow_mut().next();
            let item = match next {
                Some(item) if !item.is_absent() => item,
                _ => {
                    self.finish();
                    return;
                }
            };
            let index = self.next_index.get();
            self.next_index.set(index + 1);

            let advance = Advance {
                walk: self.clone(),
            };
            self.stepping.set(true);
            {
                let mut step = self.step.borrow_mut();
                step(item, index, advance);
            }
            self.stepping.set(false);

            // advance がまだなら、後で呼ばれた Advance が resume() から再開する
            if !self.pending.replace(false) {
                return;
            }
        }
    }

    fn finish(&self) {
        // 終了後は step と items を手放す（捕捉された Advance との Rc 循環を切る）
        *self.step.borrow_mut() = Box::new(|_: T, _: usize, _: Advance| {});
        *self.items.borrow_mut() = Box::new(std::iter::empty());
        if let Some(on_done) = self.on_done.take() {
            on_done();
        }
    }
}

impl<T: Absent + 'static> Resume for Walk<T> {
    fn resume(self: Rc<Self>) {
        if self.stepping.get() {
            self.pending.set(true);
        } else {
            self.run();
        }
    }
}

/// Walk `items` one at a time.
///
/// `step(item, index, advance)` runs for the first element; the next element is
/// only visited once `advance.advance()` is called, synchronously or later (for
/// example from a `tokio::task::spawn_local` task). The walk ends at the end of
/// the items or at the first absent slot, and then calls `on_done` once.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use collkit_core::r_each;
///
/// let count = Rc::new(Cell::new(0));
/// let done = Rc::new(Cell::new(false));
/// let (c, d) = (count.clone(), done.clone());
///
/// r_each(
///     vec![10, 20],
///     move |_, _, next| {
///         c.set(c.get() + 1);
///         next.advance();
///     },
///     Some(move || d.set(true)),
/// );
///
/// assert_eq!(count.get(), 2);
/// assert!(done.get());
/// ```
pub fn r_each<I, F, D>(items: I, step: F, on_done: Option<D>)
where
    I: IntoIterator,
    I::IntoIter: 'static,
    I::Item: Absent + 'static,
    F: FnMut(I::Item, usize, Advance) + 'static,
    D: FnOnce() + 'static,
{
    let items: Box<dyn Iterator<Item = I::Item>> = Box::new(items.into_iter().fuse());
    let step: Box<dyn FnMut(I::Item, usize, Advance)> = Box::new(step);
    let walk = Rc::new(Walk {
        items: RefCell::new(items),
        step: RefCell::new(step),
        on_done: Cell::new(on_done.map(|d| Box::new(d) as Box<dyn FnOnce()>)),
        next_index: Cell::new(0),
        stepping: Cell::new(false),
        pending: Cell::new(false),
    });
    walk.run();
}
