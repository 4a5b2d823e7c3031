//! Ordered slide list edited by the carousel form.
//!
//! Reordering is a two-phase drag: [`SlideList::begin_drag`] records the
//! grabbed slide, each [`SlideList::move_drag`] moves it to the hovered
//! position immediately, and [`SlideList::end_drag`] only clears
//! bookkeeping. The list is fully materialised after every call, so a drag
//! that never ends leaves `is_dragging` set but the slides valid.

use crate::error::EditorError;
use crate::model::{Slide, TransitionType};

/// A single-field edit applied by [`SlideList::update_field`].
///
/// Values arrive as the raw strings a form control produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideField {
    /// Replace the media URL.
    Url(String),
    /// Select a transition; unknown values clear the selection.
    TransitionType(String),
    /// Set the interval in seconds; unparsable or negative input becomes 0.
    TransitionInterval(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DragState {
    dragging: bool,
    dragged: Option<usize>,
    over: Option<usize>,
}

/// Slides of one carousel being edited, plus drag bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlideList {
    slides: Vec<Slide>,
    drag: DragState,
}

impl From<Vec<Slide>> for SlideList {
    fn from(slides: Vec<Slide>) -> Self {
        Self {
            slides,
            drag: DragState::default(),
        }
    }
}

impl SlideList {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blank slide: empty URL, no transition, zero interval,
    /// expanded.
    pub fn add_slide(&mut self) {
        self.slides.push(Slide::default());
    }

    /// Apply one field edit to the slide at `index`.
    ///
    /// # Errors
    ///
    /// [`EditorError::IndexOutOfRange`] when `index` is past the end.
    pub fn update_field(&mut self, index: usize, field: SlideField) -> Result<(), EditorError> {
        let slide = self.slide_mut(index)?;
        match field {
            SlideField::Url(url) => slide.url = url,
            SlideField::TransitionType(raw) => {
                slide.transition_type = TransitionType::from_raw(&raw);
            }
            SlideField::TransitionInterval(raw) => {
                slide.transition_interval = coerce_interval(&raw);
            }
        }
        Ok(())
    }

    /// Flip the collapsed flag of the slide at `index`.
    ///
    /// # Errors
    ///
    /// [`EditorError::IndexOutOfRange`] when `index` is past the end.
    pub fn toggle_collapse(&mut self, index: usize) -> Result<(), EditorError> {
        let slide = self.slide_mut(index)?;
        slide.is_collapsed = !slide.is_collapsed;
        Ok(())
    }

    /// Remove and return the slide at `index`. Later slides shift down and
    /// any drag in progress is cancelled.
    ///
    /// # Errors
    ///
    /// [`EditorError::IndexOutOfRange`] when `index` is past the end.
    pub fn delete_slide(&mut self, index: usize) -> Result<Slide, EditorError> {
        self.check_index(index)?;
        self.end_drag();
        Ok(self.slides.remove(index))
    }

    /// Start dragging the slide at `source`.
    ///
    /// # Errors
    ///
    /// [`EditorError::IndexOutOfRange`] when `source` is past the end.
    pub fn begin_drag(&mut self, source: usize) -> Result<(), EditorError> {
        self.check_index(source)?;
        self.drag = DragState {
            dragging: true,
            dragged: Some(source),
            over: None,
        };
        Ok(())
    }

    /// Move the dragged slide to `target` and keep tracking it there.
    ///
    /// Does nothing when no drag is in progress or when `target` is where
    /// the dragged slide already sits.
    ///
    /// # Errors
    ///
    /// [`EditorError::IndexOutOfRange`] when `target` is past the end; the
    /// list is left untouched.
    pub fn move_drag(&mut self, target: usize) -> Result<(), EditorError> {
        let Some(dragged) = self.drag.dragged else {
            return Ok(());
        };
        self.check_index(target)?;
        if dragged == target {
            return Ok(());
        }
        self.check_index(dragged)?;

        let slide = self.slides.remove(dragged);
        self.slides.insert(target, slide);
        self.drag.dragged = Some(target);
        self.drag.over = Some(target);
        Ok(())
    }

    /// Clear all drag bookkeeping. Safe to call repeatedly.
    pub fn end_drag(&mut self) {
        self.drag = DragState::default();
    }

    /// Move the slide at `source` to `target` in one step.
    ///
    /// # Errors
    ///
    /// [`EditorError::IndexOutOfRange`] when either index is past the end.
    pub fn reorder(&mut self, source: usize, target: usize) -> Result<(), EditorError> {
        self.begin_drag(source)?;
        let moved = self.move_drag(target);
        self.end_drag();
        moved
    }

    /// Slides in order.
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Slide at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Number of slides.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the list has no slides.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Whether a drag has begun and not yet ended.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.dragging
    }

    /// Current position of the dragged slide.
    #[must_use]
    pub const fn dragged_index(&self) -> Option<usize> {
        self.drag.dragged
    }

    /// Position the dragged slide last moved to.
    #[must_use]
    pub const fn drag_over_index(&self) -> Option<usize> {
        self.drag.over
    }

    /// Whether the slide at `index` should render as the drop target.
    #[must_use]
    pub fn is_highlighted(&self, index: usize) -> bool {
        self.drag.dragging && self.drag.over == Some(index)
    }

    /// Consume the list, keeping only the slides.
    #[must_use]
    pub fn into_slides(self) -> Vec<Slide> {
        self.slides
    }

    fn check_index(&self, index: usize) -> Result<(), EditorError> {
        if index < self.slides.len() {
            Ok(())
        } else {
            Err(EditorError::IndexOutOfRange {
                index,
                len: self.slides.len(),
            })
        }
    }

    fn slide_mut(&mut self, index: usize) -> Result<&mut Slide, EditorError> {
        let len = self.slides.len();
        self.slides
            .get_mut(index)
            .ok_or(EditorError::IndexOutOfRange { index, len })
    }
}

fn coerce_interval(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
        .unwrap_or(0.0)
}

#[cfg(test)]
#[path = "slides_tests.rs"]
mod tests;
