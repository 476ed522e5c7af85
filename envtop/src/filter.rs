/// Indices of the items whose name contains `query`, ignoring case.
///
/// * An empty query keeps every item
/// * Indices are returned in their original order
///
/// ```text
/// ["web", "Worker", "db"], "WORK"  ->  [1]
/// ```
pub fn filter_indices<T, F>(items: &[T], query: &str, name_of: F) -> Vec<usize>
where
    F: Fn(&T) -> &str,
{
    let needle = query.to_lowercase();
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| needle.is_empty() || name_of(*item).to_lowercase().contains(&needle))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<String> {
        vec!["web".into(), "Worker".into(), "db".into(), "api-gateway".into()]
    }

    #[test]
    fn test_empty_query_matches_all() {
        assert_eq!(filter_indices(&names(), "", |s| s.as_str()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(filter_indices(&names(), "WORK", |s| s.as_str()), vec![1]);
        assert_eq!(filter_indices(&names(), "W", |s| s.as_str()), vec![0, 1, 3]);
        assert_eq!(filter_indices(&names(), "GATE", |s| s.as_str()), vec![3]);
    }

    #[test]
    fn test_no_match() {
        assert!(filter_indices(&names(), "zzz", |s| s.as_str()).is_empty());
    }
}
