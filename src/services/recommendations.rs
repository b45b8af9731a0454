use crate::models::{ContentItem, ScoredItem, UserInterestProfile};

/// Bonus when the item's category is one of the user's interests
pub const CATEGORY_MATCH_WEIGHT: f64 = 0.5;
/// Bonus per tag that contains one of the user's interests
pub const TAG_MATCH_WEIGHT: f64 = 0.2;
/// Weight of the popularity term
pub const POPULARITY_WEIGHT: f64 = 0.3;
/// Views that earn one full popularity weight
pub const POPULARITY_SCALE: f64 = 10_000.0;

/// Result size when the caller does not ask for one
pub const DEFAULT_LIMIT: usize = 5;

/// Scores a single item against a list of interest labels
///
/// The score is a weighted sum of three non-negative terms:
/// - category match: binary, exact and case-sensitive
/// - tag match: one bonus per tag that contains some interest as a substring
/// - popularity: linear in views, not normalized against the corpus
pub fn score_item(item: &ContentItem, interests: &[String]) -> f64 {
    let category = if interests.iter().any(|i| *i == item.category) {
        CATEGORY_MATCH_WEIGHT
    } else {
        0.0
    };

    let matched_tags = item
        .tags
        .iter()
        .filter(|tag| interests.iter().any(|interest| tag.contains(interest.as_str())))
        .count();

    let popularity = item.views as f64 / POPULARITY_SCALE * POPULARITY_WEIGHT;

    category + matched_tags as f64 * TAG_MATCH_WEIGHT + popularity
}

/// Ranks `corpus` for a user and returns the top `limit` items
///
/// `user_id` is carried for future personalization and does not affect the
/// ranking. A `limit` of zero is treated as one. Items with equal scores keep
/// their corpus order. The corpus itself is never modified.
pub fn generate_personalized_recommendations(
    user_id: &str,
    interests: &[String],
    corpus: &[ContentItem],
    limit: usize,
) -> Vec<ScoredItem> {
    let limit = limit.max(1);

    let mut scored: Vec<ScoredItem> = corpus
        .iter()
        .map(|item| ScoredItem {
            item: item.clone(),
            recommendation_score: score_item(item, interests),
        })
        .collect();

    // sort_by is stable, so ties stay in corpus order
    scored.sort_by(|a, b| b.recommendation_score.total_cmp(&a.recommendation_score));
    scored.truncate(limit);

    tracing::debug!(
        user_id = %user_id,
        interests = interests.len(),
        corpus = corpus.len(),
        returned = scored.len(),
        "Scored recommendations"
    );

    scored
}

/// Convenience wrapper taking a full interest profile
pub fn recommend_for_profile(
    profile: &UserInterestProfile,
    corpus: &[ContentItem],
    limit: usize,
) -> Vec<ScoredItem> {
    generate_personalized_recommendations(&profile.user_id, &profile.interests, corpus, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContentType, NewContent};

    const EPSILON: f64 = 1e-9;

    fn item(title: &str, category: &str, tags: &[&str], views: u64) -> ContentItem {
        let mut item = ContentItem::from_new(NewContent {
            title: title.to_string(),
            description: String::new(),
            content_type: ContentType::Video,
            url: "https://example.com".to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            thumbnail: None,
            duration: None,
        });
        item.views = views;
        item
    }

    fn interests(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_reference_example_ordering() {
        let corpus = vec![
            item("first", "Technology", &["ai"], 5000),
            item("second", "Music", &[], 20000),
        ];

        let result =
            generate_personalized_recommendations("user-1", &interests(&["Technology"]), &corpus, 2);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].item.title, "first");
        assert!((result[0].recommendation_score - 0.65).abs() < EPSILON);
        assert_eq!(result[1].item.title, "second");
        assert!((result[1].recommendation_score - 0.6).abs() < EPSILON);
    }

    #[test]
    fn test_empty_corpus_yields_empty_result() {
        let result = generate_personalized_recommendations(
            "user-1",
            &interests(&["Technology"]),
            &[],
            DEFAULT_LIMIT,
        );
        assert!(result.is_empty());
    }

    #[test]
    fn test_result_length_is_min_of_limit_and_corpus() {
        let corpus: Vec<ContentItem> = (0..7)
            .map(|i| item(&format!("item {}", i), "News", &[], i * 100))
            .collect();

        for limit in 1..10 {
            let result = generate_personalized_recommendations("u", &[], &corpus, limit);
            assert_eq!(result.len(), limit.min(corpus.len()));
        }
    }

    #[test]
    fn test_zero_limit_is_clamped_to_one() {
        let corpus = vec![item("a", "News", &[], 1), item("b", "News", &[], 2)];
        let result = generate_personalized_recommendations("u", &[], &corpus, 0);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].item.title, "b");
    }

    #[test]
    fn test_category_match_is_binary() {
        let plain = item("plain", "Technology", &[], 0);
        let one = score_item(&plain, &interests(&["Technology"]));
        let repeated = score_item(&plain, &interests(&["Technology", "Technology", "Music"]));

        assert!((one - CATEGORY_MATCH_WEIGHT).abs() < EPSILON);
        assert!((repeated - CATEGORY_MATCH_WEIGHT).abs() < EPSILON);
    }

    #[test]
    fn test_category_match_is_case_sensitive() {
        let plain = item("plain", "Technology", &[], 0);
        assert_eq!(score_item(&plain, &interests(&["technology"])), 0.0);
    }

    #[test]
    fn test_tag_match_counts_tags_containing_an_interest() {
        let tagged = item(
            "tagged",
            "Other",
            &["TechnologyNews", "Entertainment", "tech", "sports"],
            0,
        );
        let score = score_item(&tagged, &interests(&["Technology", "Entertainment"]));

        // "tech" does not contain "Technology": substring runs interest-in-tag only
        assert!((score - 2.0 * TAG_MATCH_WEIGHT).abs() < EPSILON);
    }

    #[test]
    fn test_tag_matching_multiple_interests_counts_once() {
        let tagged = item("tagged", "Other", &["Technology and Entertainment"], 0);
        let score = score_item(&tagged, &interests(&["Technology", "Entertainment"]));
        assert!((score - TAG_MATCH_WEIGHT).abs() < EPSILON);
    }

    #[test]
    fn test_popularity_is_unbounded() {
        let viral = item("viral", "Other", &[], 1_000_000);
        assert!((score_item(&viral, &[]) - 30.0).abs() < EPSILON);
    }

    #[test]
    fn test_score_is_monotonic_in_views() {
        let labels = interests(&["Technology"]);
        let mut previous = f64::MIN;
        for views in [0, 1, 10, 999, 10_000, 123_456] {
            let score = score_item(&item("x", "Technology", &["ai"], views), &labels);
            assert!(score >= previous);
            previous = score;
        }
    }

    #[test]
    fn test_empty_interests_rank_by_views_with_stable_ties() {
        let corpus = vec![
            item("low", "A", &["x"], 10),
            item("tie-first", "B", &[], 500),
            item("high", "C", &[], 900),
            item("tie-second", "D", &[], 500),
        ];

        let result = generate_personalized_recommendations("u", &[], &corpus, 10);
        let titles: Vec<&str> = result.iter().map(|s| s.item.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "tie-first", "tie-second", "low"]);
    }

    #[test]
    fn test_corpus_is_not_mutated() {
        let corpus = vec![item("a", "Technology", &["ai"], 3), item("b", "Music", &[], 9)];
        let snapshot = corpus.clone();

        let _ = generate_personalized_recommendations("u", &interests(&["Technology"]), &corpus, 5);

        assert_eq!(corpus, snapshot);
    }

    #[test]
    fn test_recommend_for_profile_matches_free_function() {
        let corpus = vec![item("a", "Music", &[], 3), item("b", "Technology", &[], 1)];
        let profile = UserInterestProfile::new("u", interests(&["Technology"]));

        let via_profile = recommend_for_profile(&profile, &corpus, 2);
        let direct = generate_personalized_recommendations("u", &profile.interests, &corpus, 2);
        assert_eq!(via_profile, direct);
        assert_eq!(via_profile[0].item.title, "b");
    }
}
