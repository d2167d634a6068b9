// Utility helpers

use std::collections::HashSet;

/// Current Unix time in milliseconds, the `time` field the provider expects.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Trim ids, drop blanks and repeats, keep first-seen order.
pub fn normalize_fids(fids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    fids.into_iter()
        .map(|fid| fid.trim().to_string())
        .filter(|fid| !fid.is_empty())
        .filter(|fid| seen.insert(fid.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_fids_keeps_first_seen_order() {
        let fids = vec![" 2 ".to_string(), "1".to_string(), "".to_string(), "2".to_string()];
        assert_eq!(normalize_fids(fids), vec!["2".to_string(), "1".to_string()]);
    }

    #[test]
    fn now_millis_is_in_milliseconds() {
        // 2001-09-09 in milliseconds; seconds would be far smaller
        assert!(now_millis() > 1_000_000_000_000);
    }
}
