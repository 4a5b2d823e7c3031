//! Carousel draft controller.
//!
//! A draft wraps a [`SlideList`] with the carousel-level fields. Its
//! [`DraftMode`] decides whether submitting creates a new carousel or
//! updates an existing one. Network I/O happens behind
//! [`CarouselSubmitter`], so the draft can be driven by the HTTP client or
//! by a test double.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::EditorError;
use crate::model::{Carousel, UserProjection};
use crate::slides::SlideList;

const ID_SUFFIX_BOUND: u32 = 10_000;

/// Receives assembled carousels on submit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CarouselSubmitter: Send + Sync {
    /// Store a new carousel for `user_id`; returns the stored record.
    async fn create_carousel(
        &self,
        user_id: &str,
        carousel: &Carousel,
    ) -> Result<Carousel, EditorError>;

    /// Replace the stored fields of `carousel_id`; returns the merged record.
    async fn update_carousel(
        &self,
        user_id: &str,
        carousel_id: &str,
        carousel: &Carousel,
    ) -> Result<Carousel, EditorError>;
}

/// A submitter that can also fetch the refreshed user snapshot.
#[async_trait]
pub trait CarouselApi: CarouselSubmitter {
    /// Load `user_id`'s projection.
    async fn fetch_user(&self, user_id: &str) -> Result<UserProjection, EditorError>;
}

/// Whether a draft creates a carousel or edits a stored one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftMode {
    /// Not stored yet; an id is minted on submit.
    Create,
    /// Editing the stored carousel `carousel_id`.
    Edit {
        /// Identifier of the carousel being edited.
        carousel_id: String,
    },
}

/// Clears the in-flight flag when a submission finishes or is dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, EditorError> {
        if flag.swap(true, Ordering::AcqRel) {
            return Err(EditorError::SubmitInFlight);
        }
        Ok(Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// In-progress carousel edit.
pub struct CarouselDraft {
    title: String,
    slides: SlideList,
    mode: DraftMode,
    created_at: Option<DateTime<Utc>>,
    active: bool,
    clock: Arc<dyn Clock>,
    submitting: AtomicBool,
}

impl fmt::Debug for CarouselDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CarouselDraft")
            .field("title", &self.title)
            .field("slides", &self.slides)
            .field("mode", &self.mode)
            .field("created_at", &self.created_at)
            .field("active", &self.active)
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

impl Default for CarouselDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl CarouselDraft {
    /// A new carousel with an empty title and one blank slide.
    #[must_use]
    pub fn new() -> Self {
        let mut slides = SlideList::new();
        slides.add_slide();
        Self {
            title: String::new(),
            slides,
            mode: DraftMode::Create,
            created_at: None,
            active: false,
            clock: Arc::new(DefaultClock),
            submitting: AtomicBool::new(false),
        }
    }

    /// Resume editing a stored carousel exactly as it was saved.
    #[must_use]
    pub fn from_existing(carousel: &Carousel) -> Self {
        Self {
            title: carousel.title.clone(),
            slides: SlideList::from(carousel.slides.clone()),
            mode: DraftMode::Edit {
                carousel_id: carousel.id.clone(),
            },
            created_at: Some(carousel.created_at),
            active: carousel.active,
            clock: Arc::new(DefaultClock),
            submitting: AtomicBool::new(false),
        }
    }

    /// Use `clock` for creation timestamps and minted ids.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Current title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Replace the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Slides being edited.
    #[must_use]
    pub const fn slides(&self) -> &SlideList {
        &self.slides
    }

    /// Mutable access to the slide list.
    pub const fn slides_mut(&mut self) -> &mut SlideList {
        &mut self.slides
    }

    /// Create or edit.
    #[must_use]
    pub const fn mode(&self) -> &DraftMode {
        &self.mode
    }

    /// Whether the carousel is marked active.
    #[must_use]
    pub const fn active(&self) -> bool {
        self.active
    }

    /// Mark the carousel active or inactive.
    pub const fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether a [`submit`](Self::submit) call is pending.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Check the draft is complete enough to send.
    ///
    /// # Errors
    ///
    /// [`EditorError::Validation`] for a blank title or a slide without a URL.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.title.trim().is_empty() {
            return Err(EditorError::validation("carousel title is required"));
        }
        if let Some(position) = self
            .slides
            .slides()
            .iter()
            .position(|slide| slide.url.trim().is_empty())
        {
            return Err(EditorError::validation(format!(
                "slide {} needs a URL",
                position + 1
            )));
        }
        Ok(())
    }

    /// Build the record to send.
    ///
    /// New carousels get a fresh `carousel-{millis}-{n}` id and `created_at
    /// = now`. Edits keep the stored id and creation time.
    #[must_use]
    pub fn assemble(&self, now: DateTime<Utc>) -> Carousel {
        let id = match &self.mode {
            DraftMode::Create => mint_carousel_id(now),
            DraftMode::Edit { carousel_id } => carousel_id.clone(),
        };
        Carousel {
            id,
            title: self.title.clone(),
            slides: self.slides.slides().to_vec(),
            created_at: self.created_at.unwrap_or(now),
            active: self.active,
        }
    }

    /// Validate, assemble and hand the carousel to `submitter`.
    ///
    /// The draft is left unchanged whatever the outcome, so a failed
    /// submission can be corrected and retried.
    ///
    /// # Errors
    ///
    /// [`EditorError::SubmitInFlight`] while another submission is pending,
    /// [`EditorError::Validation`] for an incomplete draft, or whatever the
    /// submitter reports.
    pub async fn submit<S>(&self, user_id: &str, submitter: &S) -> Result<Carousel, EditorError>
    where
        S: CarouselSubmitter + ?Sized,
    {
        let _in_flight = InFlight::acquire(&self.submitting)?;
        self.validate()?;
        let carousel = self.assemble(self.clock.utc());

        let stored = match &self.mode {
            DraftMode::Create => {
                debug!(carousel_id = %carousel.id, "creating carousel");
                submitter.create_carousel(user_id, &carousel).await
            }
            DraftMode::Edit { carousel_id } => {
                debug!(carousel_id = %carousel_id, "updating carousel");
                submitter
                    .update_carousel(user_id, carousel_id, &carousel)
                    .await
            }
        };
        if let Err(err) = &stored {
            warn!(carousel_id = %carousel.id, error = %err, "carousel submission failed");
        }
        stored
    }

    /// Submit, then fetch the refreshed user snapshot.
    ///
    /// # Errors
    ///
    /// Any error from [`submit`](Self::submit) or from fetching the user.
    pub async fn save_and_refresh<A>(
        &self,
        api: &A,
        user_id: &str,
    ) -> Result<UserProjection, EditorError>
    where
        A: CarouselApi + ?Sized,
    {
        self.submit(user_id, api).await?;
        api.fetch_user(user_id).await
    }
}

fn mint_carousel_id(now: DateTime<Utc>) -> String {
    let suffix = rand::thread_rng().gen_range(0..ID_SUFFIX_BOUND);
    format!("carousel-{}-{suffix}", now.timestamp_millis())
}

#[cfg(test)]
#[path = "draft_tests.rs"]
mod tests;
