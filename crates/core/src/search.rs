//! Search & discovery constants, facet types and relevance scoring.
//!
//! The repository layer narrows candidates with `ILIKE`; ranking happens
//! here so it can be unit-tested without a database.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_CARDS_LIMIT: i64 = 20;
pub const DEFAULT_TALKS_LIMIT: i64 = 20;
pub const DEFAULT_THEMES_LIMIT: i64 = 10;
pub const MAX_SEARCH_LIMIT: i64 = 100;

/// Deepest page start a search will honour.
pub const MAX_SEARCH_OFFSET: i64 = 10_000;

/// Extra candidates fetched beyond `offset + limit` so scoring can reorder.
pub const SCORING_BUFFER: i64 = 10;

/// Queries shorter than this produce no suggestions.
pub const MIN_SUGGESTION_QUERY_LENGTH: usize = 2;
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Maximum edit distance for a "did you mean" suggestion.
pub const MAX_SUGGESTION_DISTANCE: usize = 2;

// ---------------------------------------------------------------------------
// Facets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Card,
    Talk,
    Theme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arcana {
    Major,
    Minor,
}

impl EntityType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "card" | "cards" => Some(EntityType::Card),
            "talk" | "talks" => Some(EntityType::Talk),
            "theme" | "themes" => Some(EntityType::Theme),
            _ => None,
        }
    }
}

impl Arcana {
    pub fn as_str(self) -> &'static str {
        match self {
            Arcana::Major => "major",
            Arcana::Minor => "minor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Wands,
    Cups,
    Swords,
    Pentacles,
}

impl Suit {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "wands" => Some(Suit::Wands),
            "cups" => Some(Suit::Cups),
            "swords" => Some(Suit::Swords),
            "pentacles" => Some(Suit::Pentacles),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Suit::Wands => "wands",
            Suit::Cups => "cups",
            Suit::Swords => "swords",
            Suit::Pentacles => "pentacles",
        }
    }
}

/// Facets applied on top of the free-text query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchFilters {
    /// Entity types to search. Empty means all.
    #[serde(default)]
    pub types: Vec<EntityType>,
    pub arcana: Option<Arcana>,
    #[serde(default)]
    pub suits: Vec<Suit>,
    pub min_duration: Option<i32>,
    pub max_duration: Option<i32>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
}

impl SearchFilters {
    pub fn includes(&self, entity: EntityType) -> bool {
        self.types.is_empty() || self.types.contains(&entity)
    }
}

// ---------------------------------------------------------------------------
// Relevance scoring
// ---------------------------------------------------------------------------

/// Score one text field against the query, scaled by `weight`.
///
/// Exact match 100, prefix 75, word prefix 50, substring 25, else 0.
pub fn relevance_score(text: Option<&str>, query: &str, weight: f64) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };
    let text = text.to_lowercase();
    let query = query.to_lowercase();
    if query.is_empty() {
        return 0.0;
    }

    let base = if text == query {
        100.0
    } else if text.starts_with(&query) {
        75.0
    } else if text.split_whitespace().any(|w| w.starts_with(&query)) {
        50.0
    } else if text.contains(&query) {
        25.0
    } else {
        0.0
    };
    base * weight
}

pub fn score_card(name: &str, keywords: &str, summary: &str, query: &str) -> f64 {
    relevance_score(Some(name), query, 2.0)
        + relevance_score(Some(keywords), query, 1.5)
        + relevance_score(Some(summary), query, 1.0)
}

pub fn score_talk(title: &str, speaker_name: &str, description: Option<&str>, query: &str) -> f64 {
    relevance_score(Some(title), query, 2.0)
        + relevance_score(Some(speaker_name), query, 1.5)
        + relevance_score(description, query, 1.0)
}

pub fn score_theme(name: &str, description: Option<&str>, query: &str) -> f64 {
    relevance_score(Some(name), query, 2.0) + relevance_score(description, query, 1.0)
}

/// Sort scored candidates best-first and cut one page.
///
/// Returns the page and whether more results exist beyond it. Ties keep
/// their original order.
pub fn rank_page<T>(mut scored: Vec<(f64, T)>, offset: i64, limit: i64) -> (Vec<T>, bool) {
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    let offset = offset.max(0) as usize;
    let limit = limit.max(0) as usize;
    let mut page: Vec<T> = scored
        .into_iter()
        .skip(offset)
        .take(limit + 1)
        .map(|(_, item)| item)
        .collect();
    let has_more = page.len() > limit;
    page.truncate(limit);
    (page, has_more)
}

pub fn clamp_limit(limit: Option<i64>, default: i64) -> i64 {
    limit.unwrap_or(default).clamp(1, MAX_SEARCH_LIMIT)
}

pub fn clamp_offset(offset: i64) -> i64 {
    offset.clamp(0, MAX_SEARCH_OFFSET)
}

/// Rows to read for one ranked page: the page end plus [`SCORING_BUFFER`].
pub fn candidate_window(offset: i64, limit: i64) -> i64 {
    clamp_offset(offset)
        .saturating_add(limit)
        .saturating_add(SCORING_BUFFER)
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

/// Levenshtein edit distance over Unicode scalar values.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Pick "did you mean" candidates for a query.
///
/// `names` are whole-name candidates (card and theme names) matched on
/// substring or first-word distance. `titles` contribute single words
/// longer than three characters.
pub fn suggest(query: &str, names: &[String], titles: &[String], limit: usize) -> Vec<String> {
    let q = query.trim().to_lowercase();
    if q.chars().count() < MIN_SUGGESTION_QUERY_LENGTH {
        return Vec::new();
    }

    let mut out: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !out.iter().any(|s| s.eq_ignore_ascii_case(&candidate)) {
            out.push(candidate);
        }
    };

    for name in names {
        let lower = name.to_lowercase();
        let first = lower.split_whitespace().next().unwrap_or("");
        if lower.contains(&q) || levenshtein(&q, first) <= MAX_SUGGESTION_DISTANCE {
            push(name.clone());
        }
    }

    for title in titles {
        let word = title
            .to_lowercase()
            .split_whitespace()
            .filter(|w| w.chars().count() > 3)
            .find(|w| w.starts_with(&q) || levenshtein(&q, w) <= MAX_SUGGESTION_DISTANCE)
            .map(str::to_string);
        if let Some(word) = word {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                push(first.to_uppercase().chain(chars).collect());
            }
        }
    }

    out.truncate(limit);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_parsing_accepts_plural_and_case() {
        assert_eq!(EntityType::parse("Cards"), Some(EntityType::Card));
        assert_eq!(EntityType::parse(" talk "), Some(EntityType::Talk));
        assert_eq!(EntityType::parse("speaker"), None);
        assert_eq!(Suit::parse("CUPS"), Some(Suit::Cups));
        assert_eq!(Suit::parse("coins"), None);
    }

    #[test]
    fn relevance_tiers() {
        assert_eq!(relevance_score(Some("The Tower"), "the tower", 1.0), 100.0);
        assert_eq!(relevance_score(Some("The Tower"), "the", 1.0), 75.0);
        assert_eq!(relevance_score(Some("The Tower"), "tow", 1.0), 50.0);
        assert_eq!(relevance_score(Some("The Tower"), "owe", 1.0), 25.0);
        assert_eq!(relevance_score(Some("The Tower"), "star", 1.0), 0.0);
        assert_eq!(relevance_score(None, "x", 2.0), 0.0);
        assert_eq!(relevance_score(Some("Star"), "star", 2.0), 200.0);
    }

    #[test]
    fn talk_title_outranks_description() {
        let title_hit = score_talk("Grit", "Angela Lee Duckworth", None, "grit");
        let desc_hit = score_talk("On passion", "Someone", Some("a talk about grit"), "grit");
        assert!(title_hit > desc_hit);
    }

    #[test]
    fn offsets_are_clamped_before_sizing_the_window() {
        assert_eq!(clamp_offset(-5), 0);
        assert_eq!(clamp_offset(40), 40);
        assert_eq!(clamp_offset(i64::MAX), MAX_SEARCH_OFFSET);
        assert_eq!(candidate_window(0, 20), 20 + SCORING_BUFFER);
        assert_eq!(
            candidate_window(i64::MAX, MAX_SEARCH_LIMIT),
            MAX_SEARCH_OFFSET + MAX_SEARCH_LIMIT + SCORING_BUFFER
        );
    }

    #[test]
    fn rank_page_orders_and_flags_more() {
        let scored = vec![(1.0, "c"), (3.0, "a"), (2.0, "b"), (0.5, "d")];
        let (page, more) = rank_page(scored.clone(), 0, 2);
        assert_eq!(page, vec!["a", "b"]);
        assert!(more);

        let (page, more) = rank_page(scored, 2, 2);
        assert_eq!(page, vec!["c", "d"]);
        assert!(!more);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(clamp_limit(None, 20), 20);
        assert_eq!(clamp_limit(Some(0), 20), 1);
        assert_eq!(clamp_limit(Some(1_000), 20), MAX_SEARCH_LIMIT);
    }

    #[test]
    fn filters_default_to_all_types() {
        let filters = SearchFilters::default();
        assert!(filters.includes(EntityType::Card));
        let only_talks = SearchFilters {
            types: vec![EntityType::Talk],
            ..Default::default()
        };
        assert!(only_talks.includes(EntityType::Talk));
        assert!(!only_talks.includes(EntityType::Theme));
    }

    #[test]
    fn levenshtein_distances() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("tower", "tower"), 0);
        assert_eq!(levenshtein("towr", "tower"), 1);
    }

    #[test]
    fn suggestions_from_names_and_titles() {
        let names = vec!["The Tower".to_string(), "The Star".to_string(), "Courage".to_string()];
        let titles = vec!["The power of vulnerability".to_string()];
        let s = suggest("couarge", &names, &titles, 5);
        assert_eq!(s, vec!["Courage".to_string()]);

        let s = suggest("vulnerabilty", &names, &titles, 5);
        assert_eq!(s, vec!["Vulnerability".to_string()]);

        assert!(suggest("x", &names, &titles, 5).is_empty());
    }
}
