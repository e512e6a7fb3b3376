//! Static work partitioning across the worker pool

/// Splits `urls` into exactly `workers` contiguous shards
///
/// Shards are cut from the front of the list: with `i` slots left, the next
/// shard takes `ceil(remaining / i)` URLs. Sizes therefore differ by at most
/// one and the concatenation of all shards is the input, in order.
///
/// A `workers` value of zero is treated as one.
///
/// # Example
///
/// ```
/// use sitemap_link_validator::crawler::partition;
///
/// let urls: Vec<String> = (1..=5).map(|i| format!("https://example.com/{i}")).collect();
/// let shards = partition(urls, 2);
///
/// assert_eq!(shards[0].len(), 3);
/// assert_eq!(shards[1].len(), 2);
/// ```
pub fn partition(urls: Vec<String>, workers: usize) -> Vec<Vec<String>> {
    let workers = workers.max(1);
    let mut remaining = urls.into_iter();
    let mut shards = Vec::with_capacity(workers);

    for slots in (1..=workers).rev() {
        let take = remaining.len().div_ceil(slots);
        shards.push(remaining.by_ref().take(take).collect());
    }

    shards
}

/// For each shard, the union of every other shard
///
/// Used to seed each worker's visited set, so a page owned by one worker is
/// never requested by another.
pub fn other_pages(shards: &[Vec<String>]) -> Vec<Vec<String>> {
    (0..shards.len())
        .map(|index| {
            shards
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .flat_map(|(_, shard)| shard.iter().cloned())
                .collect()
        })
        .collect()
}
