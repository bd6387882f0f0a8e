//! Async flavour of the sequential walk.
//!
//! `visit().await` が完了した時点を advance とみなす。
//! 各ステップの後に一度スケジューラへ制御を返すので、他のタスクも進める。

use super::walk::Absent;
use async_trait::async_trait;

/// Visitor for `r_each_async`.
///
/// `?Send`: value graphs are `Rc`-based, so these futures stay on one thread.
#[async_trait(?Send)]
pub trait AsyncVisitor<T: 'static> {
    async fn visit(&self, item: T, index: usize);

    /// Called once after the last visited item.
    async fn on_done(&self) {}
}

/// Visit `items` one at a time, awaiting each `visit` before starting the next.
/// Stops at the end of the items or at the first absent slot.
pub async fn r_each_async<I, V>(items: I, visitor: &V)
where
    I: IntoIterator,
    I::Item: Absent + 'static,
    V: AsyncVisitor<I::Item> + ?Sized,
{
    for (index, item) in items.into_iter().enumerate() {
        if item.is_absent() {
            break;
        }
        visitor.visit(item, index).await;
        tokio::task::yield_now().await;
    }
    visitor.on_done().await;
}
