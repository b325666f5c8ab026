/// Split `items` into `ceil(len / size)` chunks of at most `size` elements.
///
/// Order is preserved: the concatenation of all chunks equals the input.
/// A `size` of zero yields no chunks.
pub fn chunk_by<T: Clone>(items: &[T], size: usize) -> Vec<Vec<T>> {
    if size == 0 {
        return Vec::new();
    }

    items.chunks(size).map(<[T]>::to_vec).collect()
}
