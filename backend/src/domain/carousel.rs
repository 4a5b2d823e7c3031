//! Carousel and slide records embedded in a user's document.
//!
//! A carousel is an ordered slideshow owned by exactly one user. Slide order
//! is the playback order and is preserved verbatim through every operation.
//! The serde shape of these types is both the wire format and the stored
//! document format, so only the fields below are ever persisted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors raised by carousel constructors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CarouselValidationError {
    /// Carousel identifier was missing or blank.
    #[error("carousel id must not be empty")]
    EmptyId,
    /// Title was missing or blank.
    #[error("carousel title must not be empty")]
    EmptyTitle,
    /// A slide had a missing or blank URL.
    #[error("slide {index} url must not be empty")]
    EmptySlideUrl {
        /// Zero-based position of the slide.
        index: usize,
    },
    /// Transition interval was negative, NaN or infinite.
    #[error("transition interval must be a non-negative number, got {value}")]
    InvalidInterval {
        /// Rejected value.
        value: f64,
    },
}

/// Identifier of a carousel, unique within its owner's collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CarouselId(String);

impl CarouselId {
    /// Validate and construct a [`CarouselId`].
    pub fn new(id: impl Into<String>) -> Result<Self, CarouselValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CarouselValidationError::EmptyId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for CarouselId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CarouselId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CarouselId> for String {
    fn from(value: CarouselId) -> Self {
        value.0
    }
}

impl TryFrom<String> for CarouselId {
    type Error = CarouselValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Transition effect applied when a slide is shown.
///
/// `Unset` serialises as the empty string, matching an editor select box with
/// nothing chosen yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionType {
    /// No transition selected.
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Horizontal slide-in.
    Slide,
    /// Cross-fade.
    Fade,
    /// Zoom-in.
    Zoom,
}

/// Seconds a slide stays on screen before the next transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TransitionInterval(f64);

impl TransitionInterval {
    /// Validate and construct an interval; rejects negative and non-finite values.
    pub fn new(seconds: f64) -> Result<Self, CarouselValidationError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(CarouselValidationError::InvalidInterval { value: seconds });
        }
        Ok(Self(seconds))
    }

    /// Interval in seconds.
    pub fn seconds(self) -> f64 {
        self.0
    }
}

impl From<TransitionInterval> for f64 {
    fn from(value: TransitionInterval) -> Self {
        value.0
    }
}

impl TryFrom<f64> for TransitionInterval {
    type Error = CarouselValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// One media item in a carousel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub url: String,
    #[serde(default)]
    pub transition_type: TransitionType,
    #[serde(default)]
    pub transition_interval: TransitionInterval,
    /// Editor display flag; stored but never authoritative server-side.
    #[serde(default)]
    pub is_collapsed: bool,
}

/// A stored carousel.
///
/// ## Invariants
/// - `created_at` is assigned by the server on creation and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carousel {
    pub id: CarouselId,
    pub title: String,
    #[serde(default)]
    pub slides: Vec<Slide>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub active: bool,
}

/// Client-submitted data for a new carousel; the server adds `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct CarouselDraft {
    pub id: CarouselId,
    pub title: String,
    pub slides: Vec<Slide>,
    pub active: bool,
}

/// Every slide needs a non-blank URL.
fn check_slide_urls(slides: &[Slide]) -> Result<(), CarouselValidationError> {
    match slides.iter().position(|slide| slide.url.trim().is_empty()) {
        Some(index) => Err(CarouselValidationError::EmptySlideUrl { index }),
        None => Ok(()),
    }
}

impl CarouselDraft {
    /// Validate the title and slide URLs and build a draft.
    pub fn try_new(
        id: CarouselId,
        title: impl Into<String>,
        slides: Vec<Slide>,
        active: bool,
    ) -> Result<Self, CarouselValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CarouselValidationError::EmptyTitle);
        }
        check_slide_urls(&slides)?;
        Ok(Self {
            id,
            title,
            slides,
            active,
        })
    }

    /// Stamp the draft with its creation time.
    pub fn into_carousel(self, created_at: DateTime<Utc>) -> Carousel {
        Carousel {
            id: self.id,
            title: self.title,
            slides: self.slides,
            created_at,
            active: self.active,
        }
    }
}

/// Top-level fields to overwrite on an existing carousel.
///
/// Merge is shallow: a present field replaces the stored value wholesale
/// (`slides` included), an absent field keeps the stored value. Identity and
/// creation time are not patchable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarouselPatch {
    pub title: Option<String>,
    pub slides: Option<Vec<Slide>>,
    pub active: Option<bool>,
}

impl CarouselPatch {
    /// Reject a present-but-blank title and replacement slides without URLs.
    pub fn validate(&self) -> Result<(), CarouselValidationError> {
        if self
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(CarouselValidationError::EmptyTitle);
        }
        self.slides.as_deref().map_or(Ok(()), check_slide_urls)
    }

    /// Apply the patch to `carousel` in place.
    pub fn apply_to(self, carousel: &mut Carousel) {
        if let Some(title) = self.title {
            carousel.title = title;
        }
        if let Some(slides) = self.slides {
            carousel.slides = slides;
        }
        if let Some(active) = self.active {
            carousel.active = active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn slide(url: &str, transition_type: TransitionType, seconds: f64) -> Slide {
        Slide {
            url: url.to_owned(),
            transition_type,
            transition_interval: TransitionInterval::new(seconds).expect("valid interval"),
            is_collapsed: false,
        }
    }

    #[fixture]
    fn stored() -> Carousel {
        Carousel {
            id: CarouselId::new("c1").expect("id"),
            title: "Trip".to_owned(),
            slides: vec![
                slide("http://a", TransitionType::Fade, 2.0),
                slide("http://b", TransitionType::Zoom, 1.5),
            ],
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("ts"),
            active: false,
        }
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn interval_rejects_invalid_values(#[case] seconds: f64) {
        assert!(TransitionInterval::new(seconds).is_err());
    }

    #[rstest]
    fn slide_uses_camel_case_and_empty_transition() {
        let value = serde_json::to_value(Slide::default()).expect("serialise");
        assert_eq!(
            value,
            json!({
                "url": "",
                "transitionType": "",
                "transitionInterval": 0.0,
                "isCollapsed": false
            })
        );
    }

    #[rstest]
    fn slide_defaults_missing_optional_fields() {
        let slide: Slide = serde_json::from_value(json!({
            "url": "http://x",
            "transitionType": "Fade",
            "transitionInterval": 2
        }))
        .expect("deserialise");
        assert_eq!(slide.transition_type, TransitionType::Fade);
        assert_eq!(slide.transition_interval.seconds(), 2.0);
        assert!(!slide.is_collapsed);
    }

    #[rstest]
    #[case(json!({"url": "x", "transitionType": "Spin", "transitionInterval": 1}))]
    #[case(json!({"url": "x", "transitionType": "Fade", "transitionInterval": -3}))]
    fn slide_rejects_malformed_fields(#[case] payload: serde_json::Value) {
        assert!(serde_json::from_value::<Slide>(payload).is_err());
    }

    #[rstest]
    fn patch_without_slides_keeps_stored_slides(stored: Carousel) {
        let mut carousel = stored.clone();
        CarouselPatch {
            title: Some("Trip 2".to_owned()),
            ..CarouselPatch::default()
        }
        .apply_to(&mut carousel);

        assert_eq!(carousel.title, "Trip 2");
        assert_eq!(carousel.slides, stored.slides);
        assert_eq!(carousel.created_at, stored.created_at);
    }

    #[rstest]
    fn patch_replaces_slides_wholesale(stored: Carousel) {
        let mut carousel = stored;
        let replacement = vec![slide("http://z", TransitionType::Slide, 4.0)];
        CarouselPatch {
            slides: Some(replacement.clone()),
            ..CarouselPatch::default()
        }
        .apply_to(&mut carousel);
        assert_eq!(carousel.slides, replacement);
    }

    #[rstest]
    fn blank_titles_are_rejected() {
        let id = CarouselId::new("c1").expect("id");
        assert_eq!(
            CarouselDraft::try_new(id, "  ", Vec::new(), false),
            Err(CarouselValidationError::EmptyTitle)
        );
        let patch = CarouselPatch {
            title: Some(String::new()),
            ..CarouselPatch::default()
        };
        assert_eq!(patch.validate(), Err(CarouselValidationError::EmptyTitle));
    }

    #[rstest]
    fn slides_without_urls_are_rejected() {
        let id = CarouselId::new("c1").expect("id");
        let slides = vec![
            slide("http://a", TransitionType::Fade, 1.0),
            slide("   ", TransitionType::Unset, 0.0),
        ];
        assert_eq!(
            CarouselDraft::try_new(id, "Trip", slides.clone(), false),
            Err(CarouselValidationError::EmptySlideUrl { index: 1 })
        );
        let patch = CarouselPatch {
            slides: Some(slides),
            ..CarouselPatch::default()
        };
        assert_eq!(
            patch.validate(),
            Err(CarouselValidationError::EmptySlideUrl { index: 1 })
        );
    }
}
