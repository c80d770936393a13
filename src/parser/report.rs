use serde::Serialize;

use super::names::NameSet;

/// Per-section coauthor counts and lists, deduplicated in priority order
/// Published > Working > InProgress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub published: usize,
    pub working: usize,
    pub progress: usize,
    pub total: usize,
    pub published_list: Vec<String>,
    pub working_list: Vec<String>,
    pub progress_list: Vec<String>,
    pub total_list: Vec<String>,
}

impl Report {
    /// The four display slots, keyed by their element ids.
    pub fn display_counts(&self) -> [(&'static str, usize); 4] {
        [
            ("totalCount", self.total),
            ("publishedCount", self.published),
            ("workingCount", self.working),
            ("progressCount", self.progress),
        ]
    }
}

/// Working names already published are dropped; in-progress names already
/// published or in raw Working are dropped. `total` is the union of the raw
/// sets, so nothing is counted twice and nothing is lost.
pub fn aggregate(published: NameSet, working: NameSet, in_progress: NameSet) -> Report {
    let working_list: Vec<String> = working
        .iter()
        .filter(|n| !published.contains(n))
        .map(str::to_string)
        .collect();
    let progress_list: Vec<String> = in_progress
        .iter()
        .filter(|n| !published.contains(n) && !working.contains(n))
        .map(str::to_string)
        .collect();

    let mut total = published.clone();
    total.merge(working);
    total.merge(in_progress);

    let published_list = published.into_vec();
    let total_list = total.into_vec();

    Report {
        published: published_list.len(),
        working: working_list.len(),
        progress: progress_list.len(),
        total: total_list.len(),
        published_list,
        working_list,
        progress_list,
        total_list,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(names: &[&str]) -> NameSet {
        names.iter().copied().collect()
    }

    #[test]
    fn empty_sets() {
        assert_eq!(aggregate(set(&[]), set(&[]), set(&[])), Report::default());
    }

    #[test]
    fn published_wins_over_lower_sections() {
        let r = aggregate(set(&["Alice", "Bob"]), set(&["Bob", "Charlie"]), set(&["Alice", "Dan"]));
        assert_eq!(r.published_list, vec!["Alice", "Bob"]);
        assert_eq!(r.working_list, vec!["Charlie"]);
        assert_eq!(r.progress_list, vec!["Dan"]);
        assert_eq!(r.total_list, vec!["Alice", "Bob", "Charlie", "Dan"]);
        assert_eq!((r.published, r.working, r.progress, r.total), (2, 1, 1, 4));
    }

    #[test]
    fn progress_filtered_by_raw_working() {
        // Carol only survives in Working; InProgress is filtered by the raw set.
        let r = aggregate(set(&["Bob"]), set(&["Bob", "Carol"]), set(&["Carol", "Bob", "Eve"]));
        assert_eq!(r.working_list, vec!["Carol"]);
        assert_eq!(r.progress_list, vec!["Eve"]);
        assert_eq!(r.total, 3);
    }

    #[test]
    fn total_is_union_not_sum() {
        let r = aggregate(set(&[]), set(&["Zoe"]), set(&["Zoe"]));
        assert_eq!((r.working, r.progress, r.total), (1, 0, 1));
        assert_eq!(r.total_list, vec!["Zoe"]);
    }

    #[test]
    fn serializes_camel_case() {
        let r = aggregate(set(&["Alice"]), set(&[]), set(&[]));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["publishedList"], serde_json::json!(["Alice"]));
        assert_eq!(json["total"], 1);
        assert!(json.get("totalList").is_some());
    }

    #[test]
    fn display_slots_in_order() {
        let r = aggregate(set(&["A"]), set(&["B"]), set(&[]));
        assert_eq!(
            r.display_counts(),
            [("totalCount", 2), ("publishedCount", 1), ("workingCount", 1), ("progressCount", 0)]
        );
    }
}
