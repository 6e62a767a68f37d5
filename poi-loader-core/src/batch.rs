use std::num::NonZeroUsize;
use std::slice::Chunks;

/// Number of records handed to a sink per call unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(1_000) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Split `records` into contiguous batches of at most `size` elements.
///
/// Batches preserve input order and never overlap; only the last one may be
/// shorter.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use poi_loader_core::batches;
///
/// let size = NonZeroUsize::new(2).expect("non-zero");
/// let sizes: Vec<usize> = batches(&[1, 2, 3, 4, 5], size).map(<[i32]>::len).collect();
/// assert_eq!(sizes, vec![2, 2, 1]);
/// ```
pub fn batches<T>(records: &[T], size: NonZeroUsize) -> Chunks<'_, T> {
    records.chunks(size.get())
}
