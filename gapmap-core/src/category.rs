//! Business categories and social-post classifications.
//!
//! The enums offer compile-time safety for the fixed vocabularies used by the
//! store and the aggregator.
//!
//! # Examples
//! ```
//! use gapmap_core::{Category, DemandChannel, PostType};
//!
//! assert_eq!(Category::Gym.as_str(), "Gym");
//! assert_eq!(PostType::Complaint.channel(), Some(DemandChannel::Reddit));
//! ```

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Business category scored by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    /// Fitness studios and gyms.
    Gym,
    /// Coffee shops and cafes.
    Cafe,
}

impl Category {
    /// Every supported category, in canonical order.
    pub const ALL: [Self; 2] = [Self::Gym, Self::Cafe];

    /// Return the canonical name stored alongside businesses.
    ///
    /// # Examples
    /// ```
    /// use gapmap_core::Category;
    ///
    /// assert_eq!(Category::Cafe.as_str(), "Cafe");
    /// ```
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gym => "Gym",
            Self::Cafe => "Cafe",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown category '{name}'")]
pub struct ParseCategoryError {
    /// The rejected input.
    pub name: String,
}

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseCategoryError { name: s.to_owned() })
    }
}

/// Classification attached to a social post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PostType {
    /// The post mentions a venue or activity.
    Mention,
    /// The post asks for something that is missing nearby.
    Demand,
    /// The post complains about an existing offer.
    Complaint,
    /// Any other label; never counted.
    Other,
}

impl PostType {
    /// Types counted towards the Instagram channel.
    pub const INSTAGRAM: [Self; 1] = [Self::Mention];
    /// Types counted towards the Reddit channel.
    pub const REDDIT: [Self; 2] = [Self::Demand, Self::Complaint];

    /// Return the lowercase label stored in the `post_type` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::Demand => "demand",
            Self::Complaint => "complaint",
            Self::Other => "other",
        }
    }

    /// Map the type onto the demand channel it feeds, if any.
    ///
    /// # Examples
    /// ```
    /// use gapmap_core::{DemandChannel, PostType};
    ///
    /// assert_eq!(PostType::Mention.channel(), Some(DemandChannel::Instagram));
    /// assert_eq!(PostType::Demand.channel(), Some(DemandChannel::Reddit));
    /// assert_eq!(PostType::Other.channel(), None);
    /// ```
    #[must_use]
    pub const fn channel(self) -> Option<DemandChannel> {
        match self {
            Self::Mention => Some(DemandChannel::Instagram),
            Self::Demand | Self::Complaint => Some(DemandChannel::Reddit),
            Self::Other => None,
        }
    }

    /// Parse a stored label. Unrecognised labels become [`PostType::Other`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "mention" => Self::Mention,
            "demand" => Self::Demand,
            "complaint" => Self::Complaint,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Demand sub-channel a post contributes to.
///
/// The names are labels inherited from the scoring model; they do not imply
/// that posts were fetched from those services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemandChannel {
    /// Counted into `instagram_volume`.
    Instagram,
    /// Counted into `reddit_mentions`.
    Reddit,
}

impl DemandChannel {
    /// Post types feeding this channel.
    #[must_use]
    pub const fn post_types(self) -> &'static [PostType] {
        match self {
            Self::Instagram => &PostType::INSTAGRAM,
            Self::Reddit => &PostType::REDDIT,
        }
    }
}

/// Provenance of a social post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PostSource {
    /// Generated by the seeding tools.
    Simulated,
    /// Collected from anywhere else.
    External,
}

impl PostSource {
    /// Parse a stored source label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("simulated") {
            Self::Simulated
        } else {
            Self::External
        }
    }

    /// Return the label stored in the `source` column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Simulated => "simulated",
            Self::External => "external",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Gym", Category::Gym)]
    #[case("gym", Category::Gym)]
    #[case(" CAFE ", Category::Cafe)]
    fn parses_categories_case_insensitively(#[case] input: &str, #[case] expected: Category) {
        assert_eq!(Category::from_str(input), Ok(expected));
    }

    #[rstest]
    fn parsing_rejects_unknown_category() {
        let err = Category::from_str("Bakery").unwrap_err();
        assert!(err.to_string().contains("unknown category"));
    }

    #[rstest]
    fn display_matches_as_str() {
        assert_eq!(Category::Gym.to_string(), Category::Gym.as_str());
    }

    #[rstest]
    #[case(PostType::Mention, Some(DemandChannel::Instagram))]
    #[case(PostType::Demand, Some(DemandChannel::Reddit))]
    #[case(PostType::Complaint, Some(DemandChannel::Reddit))]
    #[case(PostType::Other, None)]
    fn classification_matches_channels(
        #[case] post_type: PostType,
        #[case] expected: Option<DemandChannel>,
    ) {
        assert_eq!(post_type.channel(), expected);
    }

    #[rstest]
    fn channel_types_round_trip_through_classification() {
        for channel in [DemandChannel::Instagram, DemandChannel::Reddit] {
            assert!(
                channel
                    .post_types()
                    .iter()
                    .all(|post_type| post_type.channel() == Some(channel))
            );
        }
    }

    #[rstest]
    #[case("mention", PostType::Mention)]
    #[case("Complaint", PostType::Complaint)]
    #[case("question", PostType::Other)]
    #[case("", PostType::Other)]
    fn unknown_labels_become_other(#[case] label: &str, #[case] expected: PostType) {
        assert_eq!(PostType::from_label(label), expected);
    }

    #[rstest]
    fn source_labels() {
        assert_eq!(PostSource::from_label("Simulated"), PostSource::Simulated);
        assert_eq!(PostSource::from_label("reddit"), PostSource::External);
    }
}
