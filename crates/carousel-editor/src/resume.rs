//! Opening the editor from a route.
//!
//! An existing carousel is looked up in the collection the caller already
//! holds; nothing is fetched. A miss is terminal and never falls back to a
//! blank draft.

use crate::draft::CarouselDraft;
use crate::model::Carousel;

/// Route id that opens the editor on a new carousel.
pub const NEW_CAROUSEL_ROUTE: &str = "new";

/// What the editor shows after [`EditorSession::open`].
#[derive(Debug)]
pub enum EditorState {
    /// A draft ready for editing.
    Editing(CarouselDraft),
    /// The requested carousel is not in the known collection.
    NotFound {
        /// Identifier taken from the route.
        carousel_id: String,
    },
}

/// Editor opened against a route.
#[derive(Debug)]
pub struct EditorSession {
    state: EditorState,
}

impl EditorSession {
    /// Resolve `route_id` against `known_carousels`.
    ///
    /// `None` and [`NEW_CAROUSEL_ROUTE`] start a new carousel with one blank
    /// slide. Any other id must match a known carousel.
    ///
    /// # Examples
    /// ```
    /// use carousel_editor::{EditorSession, EditorState};
    ///
    /// let session = EditorSession::open(Some("missing"), &[]);
    /// assert!(matches!(session.state(), EditorState::NotFound { .. }));
    /// ```
    #[must_use]
    pub fn open(route_id: Option<&str>, known_carousels: &[Carousel]) -> Self {
        let state = match route_id {
            None | Some(NEW_CAROUSEL_ROUTE) => EditorState::Editing(CarouselDraft::new()),
            Some(id) => known_carousels
                .iter()
                .find(|carousel| carousel.id == id)
                .map_or_else(
                    || EditorState::NotFound {
                        carousel_id: id.to_owned(),
                    },
                    |carousel| EditorState::Editing(CarouselDraft::from_existing(carousel)),
                ),
        };
        Self { state }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    /// The draft, unless the carousel was not found.
    pub fn draft_mut(&mut self) -> Option<&mut CarouselDraft> {
        match &mut self.state {
            EditorState::Editing(draft) => Some(draft),
            EditorState::NotFound { .. } => None,
        }
    }

    /// Consume the session, returning its state.
    #[must_use]
    pub fn into_state(self) -> EditorState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DraftMode;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    #[fixture]
    fn known() -> Vec<Carousel> {
        ["c1", "c2"]
            .into_iter()
            .map(|id| Carousel {
                id: id.to_owned(),
                title: format!("title {id}"),
                slides: Vec::new(),
                created_at: Utc
                    .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                    .single()
                    .expect("valid timestamp"),
                active: false,
            })
            .collect()
    }

    #[rstest]
    #[case(None)]
    #[case(Some("new"))]
    fn new_routes_open_a_seeded_create_draft(known: Vec<Carousel>, #[case] route: Option<&str>) {
        let EditorState::Editing(draft) = EditorSession::open(route, &known).into_state() else {
            panic!("expected a draft");
        };
        assert_eq!(draft.mode(), &DraftMode::Create);
        assert_eq!(draft.slides().len(), 1);
    }

    #[rstest]
    fn known_ids_resume_that_carousel(known: Vec<Carousel>) {
        let mut session = EditorSession::open(Some("c2"), &known);
        let draft = session.draft_mut().expect("draft");

        assert_eq!(draft.title(), "title c2");
        assert_eq!(
            draft.mode(),
            &DraftMode::Edit {
                carousel_id: "c2".to_owned()
            }
        );
    }

    #[rstest]
    fn unknown_ids_are_terminal(known: Vec<Carousel>) {
        let mut session = EditorSession::open(Some("c9"), &known);

        assert!(session.draft_mut().is_none());
        assert!(matches!(
            session.into_state(),
            EditorState::NotFound { carousel_id } if carousel_id == "c9"
        ));
    }
}
