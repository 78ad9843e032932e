/// Move every element satisfying `pred` to the front of `arr`, in a
/// single left-to-right pass.
///
/// Returns the number of elements that satisfied `pred`; afterwards
/// `arr[..n]` holds exactly those elements, in their original relative
/// order. The order of the rejected tail is not preserved.
///
/// ```
/// use hashvp::partition_by;
/// let mut v = vec![5, 1, 7, 2, 9, 3];
/// let n = partition_by(&mut v, |x| *x <= 3);
/// assert_eq!(n, 3);
/// assert_eq!(&v[..n], &[1, 2, 3]);
/// ```
pub fn partition_by<T, P>(arr: &mut [T], mut pred: P) -> usize
    where P: FnMut(&T) -> bool {

    let mut store = 0;
    for i in 0..arr.len() {
        if pred(&arr[i]) {
            arr.swap(store, i);
            store += 1;
        }
    }
    store
}

/// Split `arr` around the element at `mid`, which is treated as the
/// reference for `pred`.
///
/// The reference is parked at the end, the rest is partitioned with
/// `partition_by`, and the reference is then swapped to the boundary so
/// that it ends up as the last element of the accepted prefix. Returns
/// the length of that prefix (always at least 1).
///
/// Panics if `mid` is out of bounds.
pub fn split_at_reference<T, P>(arr: &mut [T], mid: usize, pred: P) -> usize
    where P: FnMut(&T) -> bool {

    let last = arr.len() - 1;
    arr.swap(mid, last);
    let store = partition_by(&mut arr[..last], pred);
    arr.swap(store, last);
    store + 1
}
