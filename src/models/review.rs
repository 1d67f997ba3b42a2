use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Review {
    pub author_name: String,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_time_description: Option<String>,
}

impl Review {
    /// Unix seconds, with a missing timestamp treated as the epoch.
    pub fn timestamp(&self) -> i64 {
        self.time.unwrap_or(0)
    }

    /// Star rating rounded to a whole star, if it lands within 1..=5.
    pub fn rounded_rating(&self) -> Option<u8> {
        self.rating
            .map(f64::round)
            .filter(|stars| (1.0..=5.0).contains(stars))
            .map(|stars| stars as u8)
    }
}
