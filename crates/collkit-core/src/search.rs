//! Search primitives: linear scans from index 0.

/// Index of the first element where `pred(element, index)` holds.
pub fn find_index<T, P>(seq: &[T], mut pred: P) -> Option<usize>
where
    P: FnMut(&T, usize) -> bool,
{
    seq.iter().enumerate().position(|(i, item)| pred(item, i))
}

/// First element where `pred(element, index)` holds.
///
/// `None` means "not found"; a falsy element such as `0` or `false` is still
/// returned as `Some`.
pub fn find<T, P>(seq: &[T], pred: P) -> Option<&T>
where
    P: FnMut(&T, usize) -> bool,
{
    find_index(seq, pred).map(|i| &seq[i])
}

/// Every element where `pred(element, index)` holds, in the original order.
pub fn filter<T, P>(seq: &[T], mut pred: P) -> Vec<T>
where
    T: Clone,
    P: FnMut(&T, usize) -> bool,
{
    seq.iter()
        .enumerate()
        .filter(|(i, item)| pred(*item, *i))
        .map(|(_, item)| item.clone())
        .collect()
}
