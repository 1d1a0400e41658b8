//! The component abstraction shared by every view.

use ratatui::Frame;
use ratatui::layout::Rect;
use thiserror::Error;

/// Errors raised while rendering a component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The area handed to the component is below its minimum size.
    #[error(
        "{component} needs at least {min_width}x{min_height} cells, got {width}x{height}"
    )]
    ViewportTooSmall {
        /// Component that refused to render.
        component: &'static str,
        /// Width it was given.
        width: u16,
        /// Height it was given.
        height: u16,
        /// Minimum width it needs.
        min_width: u16,
        /// Minimum height it needs.
        min_height: u16,
    },

    /// The terminal backend failed.
    #[error("terminal backend error: {0}")]
    Backend(String),
}

/// A self-contained piece of UI that draws itself into an area.
pub trait Component {
    /// Name used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Smallest `(width, height)` the component can render into.
    fn min_size(&self) -> (u16, u16) {
        (1, 1)
    }

    /// Draws the component into `area` of `frame`.
    ///
    /// # Errors
    ///
    /// Returns an error if the component cannot be drawn, e.g. when `area`
    /// is smaller than [`Component::min_size`].
    fn render(&self, frame: &mut Frame<'_>, area: Rect) -> Result<(), RenderError>;

    /// Fails with [`RenderError::ViewportTooSmall`] when `area` is below
    /// [`Component::min_size`].
    ///
    /// # Errors
    ///
    /// See above.
    fn check_area(&self, area: Rect) -> Result<(), RenderError> {
        let (min_width, min_height) = self.min_size();
        if area.width < min_width || area.height < min_height {
            return Err(RenderError::ViewportTooSmall {
                component: self.name(),
                width: area.width,
                height: area.height,
                min_width,
                min_height,
            });
        }
        Ok(())
    }
}
