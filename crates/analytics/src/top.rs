//! Top-N ranking

/// Keep the `n` rows with the highest `count`
///
/// The sort is stable: rows with equal counts keep their input order.
pub fn top_n<T, F>(mut rows: Vec<T>, n: usize, count: F) -> Vec<T>
where
    F: Fn(&T) -> u64,
{
    rows.sort_by(|a, b| count(b).cmp(&count(a)));
    rows.truncate(n);
    rows
}
