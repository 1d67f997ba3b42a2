use std::collections::BTreeMap;
use serde::Serialize;
use crate::models::place::Place;
use crate::models::review::Review;

/// Star ratings a review can round to.
pub const STAR_LEVELS: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct RatingSummary {
    /// `None` when the place has no rating of its own and there are no reviews.
    pub average: Option<f64>,
    /// Review count per rounded star level; every level in 1..=5 is present.
    pub distribution: BTreeMap<u8, usize>,
}

impl RatingSummary {
    pub fn count(&self, stars: u8) -> usize {
        self.distribution.get(&stars).copied().unwrap_or(0)
    }
}

/// Summarizes the whole review population, independent of any display filter.
///
/// The place's own rating wins when it has one; otherwise the average is the
/// mean over every rated review.
pub fn summarize(reviews: &[Review], place: &Place) -> RatingSummary {
    let average = place
        .rating
        .filter(|rating| *rating > 0.0)
        .or_else(|| mean_rating(reviews));

    let mut distribution: BTreeMap<u8, usize> = STAR_LEVELS.map(|stars| (stars, 0)).collect();
    for stars in reviews.iter().filter_map(Review::rounded_rating) {
        *distribution.entry(stars).or_insert(0) += 1;
    }

    RatingSummary { average, distribution }
}

fn mean_rating(reviews: &[Review]) -> Option<f64> {
    let ratings: Vec<f64> = reviews.iter().filter_map(|review| review.rating).collect();
    if ratings.is_empty() {
        return None;
    }
    Some(ratings.iter().sum::<f64>() / ratings.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(rating: Option<f64>) -> Place {
        Place {
            id: "abc123".to_string(),
            name: "Joe's Pizza".to_string(),
            formatted_address: None,
            rating,
            user_ratings_total: None,
        }
    }

    fn rated(ratings: &[f64]) -> Vec<Review> {
        ratings
            .iter()
            .map(|rating| Review {
                author_name: "guest".to_string(),
                rating: Some(*rating),
                time: Some(0),
                text: None,
                profile_photo_url: None,
                relative_time_description: None,
            })
            .collect()
    }

    #[test]
    fn averages_reviews_without_place_rating() {
        let summary = summarize(&rated(&[5.0, 5.0, 4.0, 3.0]), &place(None));
        assert_eq!(summary.average, Some(4.25));
        assert_eq!(summary.count(5), 2);
        assert_eq!(summary.count(4), 1);
        assert_eq!(summary.count(3), 1);
        assert_eq!(summary.count(2), 0);
        assert_eq!(summary.count(1), 0);
    }

    #[test]
    fn place_rating_takes_precedence() {
        let summary = summarize(&rated(&[1.0, 1.0]), &place(Some(4.6)));
        assert_eq!(summary.average, Some(4.6));
        assert_eq!(summary.count(1), 2);
    }

    #[test]
    fn empty_reviews_have_no_average() {
        let summary = summarize(&[], &place(None));
        assert_eq!(summary.average, None);
        assert_eq!(summary.distribution.len(), 5);
        assert!(summary.distribution.values().all(|count| *count == 0));
    }
}
