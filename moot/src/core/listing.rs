//! Deterministic filter/sort engine behind every list view.
//!
//! A view is derived from a borrowed source slice and a [`Criteria`] value:
//! text search, categorical filters, a date window, then a stable sort. The
//! source is never touched and the same inputs always produce the same view.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::core::types::{Exercise, Resource, Submission};

/// Categorical filter value that disables the filter.
pub const ALL: &str = "all";

/// Width of the `last30days` window.
pub const RECENT_WINDOW_DAYS: u64 = 30;

/// Date window applied to a record's date field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    #[serde(rename = "last30days")]
    Last30Days,
}

impl DateRange {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "all" => Some(Self::All),
            "last30days" => Some(Self::Last30Days),
            _ => None,
        }
    }

    fn admits(self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Last30Days => {
                let Some(date) = date else {
                    return false;
                };
                let cutoff = today
                    .checked_sub_days(Days::new(RECENT_WINDOW_DAYS))
                    .unwrap_or(NaiveDate::MIN);
                date >= cutoff
            }
        }
    }
}

/// Filter and sort criteria for one list view.
///
/// `sort: None` keeps insertion order; this is also what an unrecognised
/// sort key string parses to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria<K> {
    pub search: String,
    pub filters: BTreeMap<String, String>,
    pub date_range: DateRange,
    pub sort: Option<K>,
}

impl<K> Default for Criteria<K> {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            date_range: DateRange::All,
            sort: None,
        }
    }
}

impl<K> Criteria<K> {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_sort(mut self, sort: Option<K>) -> Self {
        self.sort = sort;
        self
    }
}

/// A record type that can be shown in a list view.
pub trait Listable {
    type Sort: Copy;

    /// Fields searched by free text, in display order.
    fn search_fields(&self) -> Vec<&str>;

    /// Value of a categorical field, or `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<&str>;

    /// Date used by the date window, if the record has one.
    fn date(&self) -> Option<NaiveDate>;

    fn compare(&self, other: &Self, key: Self::Sort) -> Ordering;
}

/// Derived, ordered view over a source collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListView<R> {
    pub items: Vec<R>,
    /// Size of the source the view was derived from.
    pub total: usize,
}

impl<R> ListView<R> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Derive a filtered, sorted view from `source`.
pub fn apply<R: Listable + Clone>(
    source: &[R],
    criteria: &Criteria<R::Sort>,
    today: NaiveDate,
) -> ListView<R> {
    let needle = criteria.search.to_lowercase();
    let mut items: Vec<R> = source
        .iter()
        .filter(|record| matches_text(*record, &needle))
        .filter(|record| matches_filters(*record, &criteria.filters))
        .filter(|record| criteria.date_range.admits(record.date(), today))
        .cloned()
        .collect();

    if let Some(key) = criteria.sort {
        // `sort_by` is stable: equal keys keep source order.
        items.sort_by(|a, b| a.compare(b, key));
    }

    ListView {
        items,
        total: source.len(),
    }
}

fn matches_text<R: Listable>(record: &R, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

fn matches_filters<R: Listable>(record: &R, filters: &BTreeMap<String, String>) -> bool {
    filters.iter().all(|(field, wanted)| {
        wanted == ALL || record.field(field).is_some_and(|value| value == wanted)
    })
}

/// Sort keys for the exercise library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseSort {
    /// Highest rating first.
    Rating,
    /// Most attempts first.
    Popularity,
    /// Beginner to Advanced.
    Difficulty,
    /// Shortest first.
    Time,
    /// Title, A to Z.
    Name,
}

impl ExerciseSort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "rating" => Some(Self::Rating),
            "popularity" | "popular" => Some(Self::Popularity),
            "difficulty" => Some(Self::Difficulty),
            "time" => Some(Self::Time),
            "name" | "title" => Some(Self::Name),
            _ => None,
        }
    }
}

impl Listable for Exercise {
    type Sort = ExerciseSort;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str(), self.subject.as_str()]
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "subject" => Some(self.subject.as_str()),
            "difficulty" => Some(self.difficulty.as_str()),
            _ => None,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        None
    }

    fn compare(&self, other: &Self, key: ExerciseSort) -> Ordering {
        match key {
            ExerciseSort::Rating => other.rating.total_cmp(&self.rating),
            ExerciseSort::Popularity => other.attempts.cmp(&self.attempts),
            ExerciseSort::Difficulty => self.difficulty.rank().cmp(&other.difficulty.rank()),
            ExerciseSort::Time => minutes_key(&self.time).cmp(&minutes_key(&other.time)),
            ExerciseSort::Name => self.title.cmp(&other.title),
        }
    }
}

/// Sort keys for the submission history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionSort {
    /// Newest submission first.
    Recent,
    ScoreHigh,
    ScoreLow,
    /// Exercise name, A to Z.
    Exercise,
}

impl SubmissionSort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "recent" | "date" => Some(Self::Recent),
            "score-high" => Some(Self::ScoreHigh),
            "score-low" => Some(Self::ScoreLow),
            "exercise" => Some(Self::Exercise),
            _ => None,
        }
    }
}

impl Listable for Submission {
    type Sort = SubmissionSort;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.exercise_name.as_str(), self.subject.as_str(), self.id.as_str()]
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "subject" => Some(self.subject.as_str()),
            _ => None,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.submission_date)
    }

    fn compare(&self, other: &Self, key: SubmissionSort) -> Ordering {
        match key {
            SubmissionSort::Recent => other.submission_date.cmp(&self.submission_date),
            SubmissionSort::ScoreHigh => nulls_last(self.score, other.score, |a, b| b.cmp(&a)),
            SubmissionSort::ScoreLow => nulls_last(self.score, other.score, |a, b| a.cmp(&b)),
            SubmissionSort::Exercise => self.exercise_name.cmp(&other.exercise_name),
        }
    }
}

/// Sort keys for the resource history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceSort {
    /// Most recently accessed first.
    Recent,
    Name,
}

impl ResourceSort {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "recent" | "date" => Some(Self::Recent),
            "name" => Some(Self::Name),
            _ => None,
        }
    }
}

impl Listable for Resource {
    type Sort = ResourceSort;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.category.as_str()]
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "type" => Some(self.resource_type.as_str()),
            "category" => Some(self.category.as_str()),
            "status" => self.status.map(|status| status.as_str()),
            _ => None,
        }
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.accessed_date)
    }

    fn compare(&self, other: &Self, key: ResourceSort) -> Ordering {
        match key {
            ResourceSort::Recent => other.accessed_date.cmp(&self.accessed_date),
            ResourceSort::Name => self.name.cmp(&other.name),
        }
    }
}

/// Leading integer of a `"<N> mins"` label; unparseable labels sort last.
pub fn minutes_key(label: &str) -> u32 {
    static LEADING_INT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^\s*(\d+)").expect("valid regex"));
    LEADING_INT_RE
        .captures(label)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(u32::MAX)
}

fn nulls_last(
    left: Option<u32>,
    right: Option<u32>,
    cmp: impl Fn(u32, u32) -> Ordering,
) -> Ordering {
    match (left, right) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample_catalog;
    use crate::core::types::{Difficulty, ResourceStatus, ResourceType, SubmissionStatus};
    use crate::test_support::{date, exercise, resource, submission};

    fn today() -> NaiveDate {
        date(2025, 6, 15)
    }

    fn ids<R: Clone>(view: &ListView<R>, id: impl Fn(&R) -> String) -> Vec<String> {
        view.items.iter().map(id).collect()
    }

    #[test]
    fn rating_sort_is_descending() {
        let source = vec![
            exercise(1, "A", 4.8),
            exercise(2, "B", 4.5),
            exercise(3, "C", 4.9),
        ];
        let criteria = Criteria::default().with_sort(Some(ExerciseSort::Rating));

        let view = apply(&source, &criteria, today());
        let ratings: Vec<f64> = view.items.iter().map(|e| e.rating).collect();
        assert_eq!(ratings, vec![4.9, 4.8, 4.5]);
    }

    #[test]
    fn search_for_negligence_matches_one_sample_exercise() {
        let catalog = sample_catalog();
        let criteria = Criteria::default().with_search("negligence");

        let view = apply(&catalog.exercises, &criteria, today());
        assert_eq!(catalog.exercises.len(), 6);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].title, "Negligence Case - Duty of Care");
        assert_eq!(view.total, 6);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let mut a = exercise(1, "Offer and acceptance", 4.0);
        a.subject = "Contract Law".to_string();
        let mut b = exercise(2, "Something else", 4.0);
        b.description = "A CONTRACT dispute".to_string();
        let c = exercise(3, "Unrelated", 4.0);

        let view = apply(&[a, b, c], &Criteria::default().with_search("contract"), today());
        assert_eq!(ids(&view, |e| e.id.to_string()), vec!["1", "2"]);
    }

    #[test]
    fn last_30_days_excludes_older_submissions() {
        let source = vec![
            submission("old", today() - Days::new(40), Some(70)),
            submission("edge", today() - Days::new(30), Some(70)),
            submission("new", today() - Days::new(2), Some(70)),
        ];
        let criteria = Criteria::default().with_date_range(DateRange::Last30Days);

        let view = apply(&source, &criteria, today());
        assert_eq!(ids(&view, |s| s.id.clone()), vec!["edge", "new"]);
    }

    #[test]
    fn date_range_excludes_records_without_dates() {
        let source = vec![exercise(1, "A", 4.0)];
        let criteria = Criteria::default().with_date_range(DateRange::Last30Days);
        assert!(apply(&source, &criteria, today()).is_empty());
    }

    #[test]
    fn categorical_all_is_a_no_op_and_values_match_exactly() {
        let mut a = exercise(1, "A", 4.0);
        a.difficulty = Difficulty::Advanced;
        let b = exercise(2, "B", 4.0);
        let source = vec![a, b];

        let all = Criteria::default().with_filter("difficulty", ALL);
        assert_eq!(apply(&source, &all, today()).items.len(), 2);

        let advanced = Criteria::default().with_filter("difficulty", "Advanced");
        assert_eq!(
            ids(&apply(&source, &advanced, today()), |e| e.id.to_string()),
            vec!["1"]
        );

        let lowercase = Criteria::default().with_filter("difficulty", "advanced");
        assert!(apply(&source, &lowercase, today()).is_empty());
    }

    #[test]
    fn unknown_filter_field_matches_nothing() {
        let source = vec![exercise(1, "A", 4.0)];
        let criteria = Criteria::default().with_filter("colour", "red");
        assert!(apply(&source, &criteria, today()).is_empty());
    }

    #[test]
    fn resource_without_status_fails_status_filter() {
        let mut bookmarked = resource(1, "Bookmarked guide", today());
        bookmarked.status = Some(ResourceStatus::Bookmarked);
        let mut plain = resource(2, "Database", today());
        plain.resource_type = ResourceType::LegalDatabase;
        plain.status = None;

        let criteria = Criteria::default().with_filter("status", "Bookmarked");
        let view = apply(&[bookmarked, plain], &criteria, today());
        assert_eq!(ids(&view, |r| r.id.to_string()), vec!["1"]);
    }

    #[test]
    fn unknown_sort_key_keeps_insertion_order() {
        assert_eq!(ExerciseSort::parse("newest-first"), None);
        let source = vec![
            exercise(3, "C", 1.0),
            exercise(1, "A", 5.0),
            exercise(2, "B", 3.0),
        ];
        let criteria = Criteria::default().with_sort(ExerciseSort::parse("newest-first"));

        let view = apply(&source, &criteria, today());
        assert_eq!(ids(&view, |e| e.id.to_string()), vec!["3", "1", "2"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let source = vec![
            exercise(1, "A", 4.5),
            exercise(2, "B", 4.9),
            exercise(3, "C", 4.5),
            exercise(4, "D", 4.5),
        ];
        let criteria = Criteria::default().with_sort(Some(ExerciseSort::Rating));

        let view = apply(&source, &criteria, today());
        assert_eq!(ids(&view, |e| e.id.to_string()), vec!["2", "1", "3", "4"]);
    }

    #[test]
    fn filtering_is_idempotent_and_leaves_source_untouched() {
        let catalog = sample_catalog();
        let before = catalog.submissions.clone();
        let criteria = Criteria::default()
            .with_filter("status", "Analyzed")
            .with_sort(Some(SubmissionSort::ScoreHigh));

        let once = apply(&catalog.submissions, &criteria, today());
        let twice = apply(&once.items, &criteria, today());

        assert_eq!(once.items, twice.items);
        assert_eq!(catalog.submissions, before);
        assert_eq!(apply(&catalog.submissions, &criteria, today()), once);
    }

    #[test]
    fn difficulty_sort_uses_rank_not_label() {
        let mut a = exercise(1, "A", 4.0);
        a.difficulty = Difficulty::Intermediate;
        let mut b = exercise(2, "B", 4.0);
        b.difficulty = Difficulty::Advanced;
        let mut c = exercise(3, "C", 4.0);
        c.difficulty = Difficulty::Beginner;

        let criteria = Criteria::default().with_sort(Some(ExerciseSort::Difficulty));
        let view = apply(&[a, b, c], &criteria, today());
        assert_eq!(ids(&view, |e| e.id.to_string()), vec!["3", "1", "2"]);
    }

    #[test]
    fn time_sort_parses_leading_minutes() {
        let mut a = exercise(1, "A", 4.0);
        a.time = "120 mins".to_string();
        let mut b = exercise(2, "B", 4.0);
        b.time = "45 mins".to_string();
        let mut c = exercise(3, "C", 4.0);
        c.time = "about an hour".to_string();
        let mut d = exercise(4, "D", 4.0);
        d.time = "9 mins".to_string();

        let criteria = Criteria::default().with_sort(Some(ExerciseSort::Time));
        let view = apply(&[a, b, c, d], &criteria, today());
        assert_eq!(ids(&view, |e| e.id.to_string()), vec!["4", "2", "1", "3"]);
    }

    #[test]
    fn score_sorts_put_missing_scores_last() {
        let source = vec![
            submission("none", today(), None),
            submission("low", today(), Some(55)),
            submission("high", today(), Some(91)),
        ];

        let high = Criteria::default().with_sort(Some(SubmissionSort::ScoreHigh));
        assert_eq!(
            ids(&apply(&source, &high, today()), |s| s.id.clone()),
            vec!["high", "low", "none"]
        );

        let low = Criteria::default().with_sort(Some(SubmissionSort::ScoreLow));
        assert_eq!(
            ids(&apply(&source, &low, today()), |s| s.id.clone()),
            vec!["low", "high", "none"]
        );
    }

    #[test]
    fn submission_status_filter_uses_labels() {
        let mut failed = submission("f", today(), None);
        failed.status = SubmissionStatus::Failed;
        let ok = submission("a", today(), Some(80));

        let criteria = Criteria::default().with_filter("status", "Failed");
        let view = apply(&[failed, ok], &criteria, today());
        assert_eq!(ids(&view, |s| s.id.clone()), vec!["f"]);
    }

    #[test]
    fn empty_result_is_a_valid_view() {
        let source = vec![exercise(1, "A", 4.0)];
        let view = apply(&source, &Criteria::default().with_search("zzz"), today());
        assert!(view.is_empty());
        assert_eq!(view.total, 1);
    }

    #[test]
    fn minutes_key_handles_padding_and_garbage() {
        assert_eq!(minutes_key("  30 mins"), 30);
        assert_eq!(minutes_key("mins"), u32::MAX);
        assert_eq!(minutes_key(""), u32::MAX);
    }

    #[test]
    fn date_range_parse_rejects_unknown_values() {
        assert_eq!(DateRange::parse("last30days"), Some(DateRange::Last30Days));
        assert_eq!(DateRange::parse("all"), Some(DateRange::All));
        assert_eq!(DateRange::parse("last7days"), None);
    }

    #[test]
    fn popularity_sort_is_descending_and_stable_on_ties() {
        let mut a = exercise(1, "A", 4.0);
        a.attempts = 120;
        let mut b = exercise(2, "B", 4.0);
        b.attempts = 950;
        let mut c = exercise(3, "C", 4.0);
        c.attempts = 120;
        let mut d = exercise(4, "D", 4.0);
        d.attempts = 2105;
        let criteria = Criteria::default().with_sort(ExerciseSort::parse("popularity"));

        let view = apply(&[a, b, c, d], &criteria, today());
        assert_eq!(ids(&view, |e| e.id.to_string()), vec!["4", "2", "1", "3"]);
    }

    #[test]
    fn name_sort_orders_titles_alphabetically() {
        let source = vec![
            exercise(1, "Judicial Review", 4.0),
            exercise(2, "Breach of Trust", 4.0),
            exercise(3, "Easements", 4.0),
        ];
        let criteria = Criteria::default().with_sort(ExerciseSort::parse("name"));

        let view = apply(&source, &criteria, today());
        assert_eq!(
            ids(&view, |e| e.title.clone()),
            vec!["Breach of Trust", "Easements", "Judicial Review"]
        );
    }

    #[test]
    fn submission_exercise_sort_orders_by_exercise_name() {
        let mut a = submission("SUB-1", date(2025, 6, 1), Some(70));
        a.exercise_name = "Tort".to_string();
        let mut b = submission("SUB-2", date(2025, 6, 2), Some(80));
        b.exercise_name = "Contract".to_string();
        let mut c = submission("SUB-3", date(2025, 6, 3), None);
        c.exercise_name = "Land".to_string();
        let criteria = Criteria::default().with_sort(SubmissionSort::parse("exercise"));

        let view = apply(&[a, b, c], &criteria, today());
        assert_eq!(ids(&view, |s| s.id.clone()), vec!["SUB-2", "SUB-3", "SUB-1"]);
    }

    #[test]
    fn resource_name_sort_orders_alphabetically() {
        let source = vec![
            resource(1, "Westlaw", date(2025, 6, 1)),
            resource(2, "Criminal Law Guide", date(2025, 6, 2)),
            resource(3, "Mooting Skills", date(2025, 6, 3)),
        ];
        let criteria = Criteria::default().with_sort(ResourceSort::parse("name"));

        let view = apply(&source, &criteria, today());
        assert_eq!(ids(&view, |r| r.id.to_string()), vec!["2", "3", "1"]);
    }

    #[test]
    fn resource_recent_sort_puts_newest_first() {
        let source = vec![
            resource(1, "A", date(2025, 5, 1)),
            resource(2, "B", date(2025, 6, 10)),
            resource(3, "C", date(2025, 5, 20)),
            resource(4, "D", date(2025, 6, 10)),
        ];
        let criteria = Criteria::default().with_sort(ResourceSort::parse("recent"));

        let view = apply(&source, &criteria, today());
        assert_eq!(ids(&view, |r| r.id.to_string()), vec!["2", "4", "3", "1"]);
    }
}
