//! Client-side carousel editing for the carousel backend.
//!
//! The crate has no UI. It models what an editor screen needs:
//!
//! - [`SlideList`]: the ordered slide list with field edits, collapse flags
//!   and two-phase drag reordering.
//! - [`CarouselDraft`]: carousel metadata around a [`SlideList`], assembling
//!   the record to submit and choosing create or update from its mode.
//! - [`EditorSession`]: resolves a route id against carousels the caller
//!   already holds.
//! - [`ApiClient`]: a reqwest client for the backend's account and carousel
//!   routes, implementing [`CarouselSubmitter`] and [`CarouselApi`].
//!
//! # Example
//!
//! ```
//! use carousel_editor::{CarouselDraft, SlideField};
//!
//! let mut draft = CarouselDraft::new();
//! draft.set_title("Holiday");
//! let slides = draft.slides_mut();
//! slides.update_field(0, SlideField::Url("https://example.com/a.gif".to_owned()))?;
//! slides.add_slide();
//! slides.update_field(1, SlideField::Url("https://example.com/b.gif".to_owned()))?;
//! slides.reorder(1, 0)?;
//!
//! assert_eq!(draft.slides().slides()[0].url, "https://example.com/b.gif");
//! # Ok::<(), carousel_editor::EditorError>(())
//! ```

mod client;
mod draft;
mod error;
mod model;
mod resume;
mod slides;

pub use client::ApiClient;
pub use draft::{CarouselApi, CarouselDraft, CarouselSubmitter, DraftMode};
pub use error::EditorError;
pub use model::{Carousel, Slide, TransitionType, UserProjection};
pub use resume::{EditorSession, EditorState, NEW_CAROUSEL_ROUTE};
pub use slides::{SlideField, SlideList};
