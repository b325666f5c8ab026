/// Ascending load thresholds mapping a partition's load to a delivery queue.
pub const DEFAULT_LOAD_THRESHOLDS: [u32; 10] =
    [250, 500, 750, 1000, 1250, 1500, 1750, 2000, 2250, 2500];

/// Monotonic threshold bucketing.
///
/// Returns the index of the first threshold the load is strictly less than.
/// A load that meets or exceeds every threshold falls back to bucket 0, so
/// the largest partitions share the default queue with the smallest ones.
/// Pure and deterministic: the same load always lands on the same bucket.
pub fn bucket_for_load(load: u32, thresholds: &[u32]) -> usize {
    thresholds.iter().position(|t| load < *t).unwrap_or(0)
}
