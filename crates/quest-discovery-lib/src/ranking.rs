//! Ranking of candidate quests by the selected measure

use crate::{Quest, Rating, SortBy};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Order candidates by the chosen measure
///
/// - `SortBy::Time`: longest estimated duration first.
/// - `SortBy::Rating`: highest rating first; unrated quests always come after
///   every rated quest, including those rated 0.
///
/// The sort is stable: quests comparing equal keep their input order, so list
/// positions do not jitter between recomputations.
pub fn rank<Q: Borrow<Quest>>(mut candidates: Vec<Q>, sort_by: SortBy) -> Vec<Q> {
    match sort_by {
        SortBy::Time => candidates.sort_by(|a, b| {
            b.borrow()
                .estimated_duration_minutes()
                .cmp(&a.borrow().estimated_duration_minutes())
        }),
        SortBy::Rating => candidates.sort_by(|a, b| {
            compare_ratings(a.borrow().average_rating(), b.borrow().average_rating())
        }),
    }
    candidates
}

/// Descending comparison with unrated quests sorted to the end
fn compare_ratings(a: Rating, b: Rating) -> Ordering {
    match (a.value(), b.value()) {
        // Ratings are finite after validation
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatLng, Owner, Stop, Theme};

    fn create_test_quest(id: &str, minutes: u32, rating: Rating) -> Quest {
        Quest::new(
            id,
            id.to_uppercase(),
            Theme::Hike,
            minutes,
            rating,
            vec![Stop {
                name: "Start".to_string(),
                location: LatLng::new(10.0, 10.0),
            }],
            Owner {
                id: "u-1".to_string(),
                username: "tester".to_string(),
            },
        )
        .unwrap()
    }

    fn ids(quests: &[Quest]) -> Vec<&str> {
        quests.iter().map(|q| q.id().as_str()).collect()
    }

    #[test]
    fn test_rank_by_time_descending() {
        let quests = vec![
            create_test_quest("a", 30, Rating::Rated(4.5)),
            create_test_quest("b", 60, Rating::NotYetRated),
            create_test_quest("c", 45, Rating::Rated(4.0)),
        ];

        let ranked = rank(quests, SortBy::Time);
        assert_eq!(ids(&ranked), ["b", "c", "a"]);
    }

    #[test]
    fn test_rank_by_time_is_stable() {
        let quests = vec![
            create_test_quest("first", 30, Rating::Rated(1.0)),
            create_test_quest("longer", 90, Rating::Rated(2.0)),
            create_test_quest("second", 30, Rating::Rated(5.0)),
        ];

        let ranked = rank(quests, SortBy::Time);
        assert_eq!(ids(&ranked), ["longer", "first", "second"]);
    }

    #[test]
    fn test_rank_by_rating_descending() {
        let quests = vec![
            create_test_quest("low", 10, Rating::Rated(2.0)),
            create_test_quest("high", 10, Rating::Rated(4.5)),
            create_test_quest("mid", 10, Rating::Rated(3.0)),
        ];

        let ranked = rank(quests, SortBy::Rating);
        assert_eq!(ids(&ranked), ["high", "mid", "low"]);
    }

    #[test]
    fn test_unrated_sorted_last_regardless_of_input_order() {
        let rated = create_test_quest("rated", 10, Rating::Rated(4.0));
        let unrated = create_test_quest("unrated", 10, Rating::NotYetRated);

        let ranked = rank(vec![unrated.clone(), rated.clone()], SortBy::Rating);
        assert_eq!(ids(&ranked), ["rated", "unrated"]);

        let ranked = rank(vec![rated, unrated], SortBy::Rating);
        assert_eq!(ids(&ranked), ["rated", "unrated"]);
    }

    #[test]
    fn test_zero_rating_beats_unrated() {
        let quests = vec![
            create_test_quest("unrated", 10, Rating::NotYetRated),
            create_test_quest("zero", 10, Rating::Rated(0.0)),
        ];

        let ranked = rank(quests, SortBy::Rating);
        assert_eq!(ids(&ranked), ["zero", "unrated"]);
    }

    #[test]
    fn test_rating_ties_keep_input_order() {
        let quests = vec![
            create_test_quest("u1", 10, Rating::NotYetRated),
            create_test_quest("r1", 10, Rating::Rated(3.0)),
            create_test_quest("u2", 10, Rating::NotYetRated),
            create_test_quest("r2", 10, Rating::Rated(3.0)),
            create_test_quest("top", 10, Rating::Rated(5.0)),
        ];

        let ranked = rank(quests, SortBy::Rating);
        assert_eq!(ids(&ranked), ["top", "r1", "r2", "u1", "u2"]);
    }

    #[test]
    fn test_rank_empty() {
        let ranked: Vec<Quest> = rank(Vec::new(), SortBy::Rating);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_shared_references() {
        let quests: Vec<std::sync::Arc<Quest>> = vec![
            std::sync::Arc::new(create_test_quest("short", 5, Rating::NotYetRated)),
            std::sync::Arc::new(create_test_quest("long", 500, Rating::NotYetRated)),
        ];

        let ranked = rank(quests, SortBy::Time);
        assert_eq!(ranked[0].id().as_str(), "long");
    }
}
