use std::cmp::Reverse;
use crate::models::display_config::{DisplayConfig, SortDirection};
use crate::models::review::Review;

/// Picks the reviews to display: filter by minimum rating, optionally order by
/// date, then keep at most `max_reviews` from the front.
///
/// Sorting is stable, so reviews with equal timestamps keep their input order.
/// When `sort_by_date` is off the input order is preserved as-is.
pub fn select(reviews: &[Review], config: &DisplayConfig) -> Vec<Review> {
    let limit = usize::try_from(config.max_reviews).unwrap_or(0);
    if limit == 0 {
        return Vec::new();
    }

    let mut selected: Vec<Review> = reviews
        .iter()
        .filter(|review| passes_rating_filter(review, config.filter_rating))
        .cloned()
        .collect();

    if config.sort_by_date {
        match config.sort_direction {
            SortDirection::Desc => selected.sort_by_key(|review| Reverse(review.timestamp())),
            SortDirection::Asc => selected.sort_by_key(Review::timestamp),
        }
    }

    selected.truncate(limit);
    selected
}

fn passes_rating_filter(review: &Review, filter_rating: u8) -> bool {
    if filter_rating == 0 {
        return true;
    }
    review
        .rating
        .map_or(false, |rating| rating >= f64::from(filter_rating))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(author: &str, rating: Option<f64>, time: Option<i64>) -> Review {
        Review {
            author_name: author.to_string(),
            rating,
            time,
            text: None,
            profile_photo_url: None,
            relative_time_description: None,
        }
    }

    fn timed(times: &[i64]) -> Vec<Review> {
        times
            .iter()
            .enumerate()
            .map(|(i, time)| review(&format!("r{}", i), Some(5.0), Some(*time)))
            .collect()
    }

    fn times(reviews: &[Review]) -> Vec<i64> {
        reviews.iter().map(Review::timestamp).collect()
    }

    #[test]
    fn sorts_newest_first_by_default() {
        let selected = select(&timed(&[100, 300, 200]), &DisplayConfig::default());
        assert_eq!(times(&selected), vec![300, 200, 100]);
    }

    #[test]
    fn sorts_oldest_first_when_ascending() {
        let config = DisplayConfig {
            sort_direction: SortDirection::Asc,
            ..DisplayConfig::default()
        };
        assert_eq!(times(&select(&timed(&[100, 300, 200]), &config)), vec![100, 200, 300]);
    }

    #[test]
    fn keeps_input_order_without_date_sort() {
        let config = DisplayConfig {
            sort_by_date: false,
            ..DisplayConfig::default()
        };
        assert_eq!(times(&select(&timed(&[100, 300, 200]), &config)), vec![100, 300, 200]);
    }

    #[test]
    fn equal_timestamps_keep_their_original_order() {
        let reviews = vec![
            review("first", Some(5.0), Some(50)),
            review("second", Some(4.0), Some(50)),
            review("newest", Some(3.0), Some(90)),
            review("third", Some(2.0), Some(50)),
        ];
        let authors: Vec<String> = select(&reviews, &DisplayConfig::default())
            .into_iter()
            .map(|review| review.author_name)
            .collect();
        assert_eq!(authors, vec!["newest", "first", "second", "third"]);
    }

    #[test]
    fn truncates_from_the_front_after_sorting() {
        let reviews = timed(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let selected = select(&reviews, &DisplayConfig::default());
        assert_eq!(selected.len(), 5);
        assert_eq!(times(&selected), vec![10, 9, 8, 7, 6]);
    }

    #[test]
    fn non_positive_limit_selects_nothing() {
        for max_reviews in [0, -3] {
            let config = DisplayConfig {
                max_reviews,
                ..DisplayConfig::default()
            };
            assert!(select(&timed(&[1, 2, 3]), &config).is_empty());
        }
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert!(select(&[], &DisplayConfig::default()).is_empty());
    }

    #[test]
    fn filter_keeps_only_reviews_at_or_above_threshold() {
        let reviews = vec![
            review("a", Some(5.0), Some(1)),
            review("b", Some(2.0), Some(2)),
            review("c", Some(4.0), Some(3)),
            review("d", None, Some(4)),
        ];
        let config = DisplayConfig {
            filter_rating: 4,
            ..DisplayConfig::default()
        };
        let selected = select(&reviews, &config);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().all(|review| review.rating.unwrap() >= 4.0));
    }

    #[test]
    fn zero_filter_keeps_unrated_reviews() {
        let reviews = vec![review("unrated", None, Some(1))];
        assert_eq!(select(&reviews, &DisplayConfig::default()).len(), 1);
    }

    #[test]
    fn missing_time_sorts_as_epoch() {
        let reviews = vec![review("undated", Some(5.0), None), review("dated", Some(5.0), Some(10))];
        let selected = select(&reviews, &DisplayConfig::default());
        assert_eq!(selected[0].author_name, "dated");
        assert_eq!(selected[1].author_name, "undated");
    }

    #[test]
    fn bounds_hold_across_configurations() {
        let reviews: Vec<Review> = (0..12)
            .map(|i| review(&format!("r{}", i), Some(f64::from(i % 5 + 1)), Some(i64::from(i * 37 % 11))))
            .collect();

        for filter_rating in 0..=5u8 {
            for max_reviews in -1..=13i64 {
                for sort_by_date in [true, false] {
                    let config = DisplayConfig {
                        filter_rating,
                        max_reviews,
                        sort_by_date,
                        ..DisplayConfig::default()
                    };
                    let selected = select(&reviews, &config);
                    assert!(selected.len() as i64 <= max_reviews.max(0));
                    if filter_rating > 0 {
                        assert!(selected
                            .iter()
                            .all(|review| review.rating.unwrap() >= f64::from(filter_rating)));
                    }
                    assert_eq!(selected, select(&reviews, &config));
                }
            }
        }
    }
}
