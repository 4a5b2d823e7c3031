//! Wire records exchanged with the backend.
//!
//! Field names follow the server's camelCase JSON. Editor bookkeeping such as
//! drag indices lives in [`crate::SlideList`] and never appears here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transition effect shown when a slide appears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionType {
    /// Nothing selected yet; serialised as `""`.
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Slide in from the side.
    Slide,
    /// Cross-fade.
    Fade,
    /// Zoom in.
    Zoom,
}

impl TransitionType {
    /// Interpret a select-box value. Anything unrecognised is `Unset`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim() {
            "Slide" => Self::Slide,
            "Fade" => Self::Fade,
            "Zoom" => Self::Zoom,
            _ => Self::Unset,
        }
    }

    /// The wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Slide => "Slide",
            Self::Fade => "Fade",
            Self::Zoom => "Zoom",
        }
    }
}

/// One slide of a carousel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// Media location.
    pub url: String,
    /// Transition into this slide.
    #[serde(default)]
    pub transition_type: TransitionType,
    /// Seconds; never negative.
    #[serde(default)]
    pub transition_interval: f64,
    /// Whether the editor shows the slide folded.
    #[serde(default)]
    pub is_collapsed: bool,
}

/// A stored carousel as the server returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carousel {
    /// Identifier, unique within the owner's collection.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Slides in playback order.
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Creation time; set once by the server.
    pub created_at: DateTime<Utc>,
    /// Whether this is the owner's active carousel.
    #[serde(default)]
    pub active: bool,
}

/// The signed-in user's snapshot, without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjection {
    /// Stable user identifier.
    pub id: String,
    /// Login name.
    pub user_name: String,
    /// Owned carousels in insertion order.
    #[serde(default)]
    pub carousels: Vec<Carousel>,
    /// Carousel currently marked active, if any.
    #[serde(default)]
    pub active_carousel: Option<Carousel>,
}
