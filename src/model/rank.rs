use std::cmp::Ordering;

/// 1-based ranks, descending by `value`; ties fall back to `name` ascending, then input position.
///
/// `out[i]` is the rank of `items[i]`, so the ranks are always a permutation of `1..=items.len()`.
pub fn rank_descending<T>(
    items: &[T],
    value: impl Fn(&T) -> f64,
    name: impl Fn(&T) -> &str,
) -> Vec<usize> {
    let mut order = (0..items.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| {
        match value(&items[b]).total_cmp(&value(&items[a])) {
            Ordering::Equal => match name(&items[a]).cmp(name(&items[b])) {
                Ordering::Equal => a.cmp(&b),
                other => other,
            },
            other => other,
        }
    });

    let mut ranks = vec![0usize; items.len()];
    for (pos, idx) in order.into_iter().enumerate() {
        ranks[idx] = pos + 1;
    }
    ranks
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/rank.rs"]
mod tests;
