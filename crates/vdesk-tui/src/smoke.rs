//! Render smoke harness.
//!
//! Mounts a [`Component`] on an in-memory [`TestBackend`], flattens the
//! resulting buffer to text and checks that expected literal fragments are
//! present. Mount failures and missing fragments are reported as distinct
//! [`SmokeError`] variants.
//!
//! ```
//! use vdesk_tui::smoke::{self, ExpectedFragments};
//! use vdesk_tui::ui::container_list::ContainerList;
//!
//! let expected = ExpectedFragments::new(["Create Container", "Containers"]);
//! let output = smoke::assert_renders(&ContainerList::default(), &expected).unwrap();
//! assert!(!output.is_empty());
//! ```

use std::fmt;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use thiserror::Error;
use unicode_width::UnicodeWidthStr;

use crate::component::{Component, RenderError};

/// Viewport used by [`mount`]: `(width, height)` in cells.
pub const DEFAULT_VIEWPORT: (u16, u16) = (120, 32);

/// Flattened text of a rendered buffer: one line per row, trailing blanks
/// removed, rows joined with `\n`.
///
/// A wide grapheme occupies several cells; the filler cells behind it are
/// skipped so the text reads as it is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutput(String);

impl RenderedOutput {
    /// Flattens a buffer to text.
    #[must_use]
    pub fn from_buffer(buffer: &Buffer) -> Self {
        let width = usize::from(buffer.area.width.max(1));
        let text = buffer
            .content()
            .chunks(width)
            .map(|row| {
                let mut line = String::new();
                let mut skip = 0;
                for cell in row {
                    if skip > 0 {
                        skip -= 1;
                        continue;
                    }
                    let symbol = cell.symbol();
                    line.push_str(symbol);
                    skip = symbol.width().saturating_sub(1);
                }
                line.trim_end().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self(text)
    }

    /// The flattened text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `fragment` appears anywhere in the text.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.0.contains(fragment)
    }

    /// Whether the render produced no visible characters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for RenderedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered set of literal fragments a render must contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedFragments(Vec<String>);

impl ExpectedFragments {
    /// Builds the set from any list of strings, keeping order.
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fragments.into_iter().map(Into::into).collect())
    }

    /// Iterates over the fragments in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Fragments not found in `output`, in declaration order.
    #[must_use]
    pub fn missing_from(&self, output: &RenderedOutput) -> Vec<String> {
        self.iter()
            .filter(|fragment| !output.contains(fragment))
            .map(str::to_string)
            .collect()
    }
}

/// Why a smoke check failed.
#[derive(Debug, Error)]
pub enum SmokeError {
    /// The component could not be mounted or rendered.
    #[error("failed to mount {component}: {source}")]
    Mount {
        /// Component that failed.
        component: &'static str,
        /// Underlying render failure.
        #[source]
        source: RenderError,
    },

    /// The component rendered, but without some expected fragments.
    #[error("rendered output is missing {missing:?}\n--- rendered output ---\n{output}")]
    MissingFragments {
        /// Fragments that were not found.
        missing: Vec<String>,
        /// Full flattened output, for diagnosis.
        output: String,
    },
}

/// A component drawn onto its own in-memory terminal.
///
/// The terminal lives exactly as long as this value and is released when it
/// goes out of scope, whichever way the test exits.
pub struct Mounted {
    component: &'static str,
    terminal: Terminal<TestBackend>,
}

impl fmt::Debug for Mounted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mounted")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

impl Mounted {
    /// Name of the mounted component.
    #[must_use]
    pub const fn component(&self) -> &'static str {
        self.component
    }

    /// The rendered cell buffer.
    #[must_use]
    pub fn buffer(&self) -> &Buffer {
        self.terminal.backend().buffer()
    }

    /// Flattened text of the render.
    #[must_use]
    pub fn text(&self) -> RenderedOutput {
        RenderedOutput::from_buffer(self.buffer())
    }
}

impl Drop for Mounted {
    fn drop(&mut self) {
        tracing::trace!(component = self.component, "unmounting component");
    }
}

/// Mounts `component` on a [`DEFAULT_VIEWPORT`]-sized in-memory terminal.
///
/// # Errors
///
/// Returns [`SmokeError::Mount`] if the terminal cannot be created or the
/// component fails to render.
pub fn mount<C: Component + ?Sized>(component: &C) -> Result<Mounted, SmokeError> {
    let (width, height) = DEFAULT_VIEWPORT;
    mount_with_size(component, width, height)
}

/// Mounts `component` on an in-memory terminal of the given size.
///
/// # Errors
///
/// Returns [`SmokeError::Mount`] if the terminal cannot be created or the
/// component fails to render.
pub fn mount_with_size<C: Component + ?Sized>(
    component: &C,
    width: u16,
    height: u16,
) -> Result<Mounted, SmokeError> {
    let name = component.name();
    let mount_error = |source| SmokeError::Mount {
        component: name,
        source,
    };
    tracing::debug!(component = name, width, height, "mounting component");

    let mut terminal = Terminal::new(TestBackend::new(width, height))
        .map_err(|e| mount_error(RenderError::Backend(e.to_string())))?;
    let mut rendered = Ok(());
    let _ = terminal
        .draw(|frame| {
            let area = frame.area();
            rendered = component.render(frame, area);
        })
        .map_err(|e| mount_error(RenderError::Backend(e.to_string())))?;
    rendered.map_err(mount_error)?;

    Ok(Mounted {
        component: name,
        terminal,
    })
}

/// Checks `output` against `expected`.
///
/// # Errors
///
/// Returns [`SmokeError::MissingFragments`] naming every absent fragment.
pub fn check(output: &RenderedOutput, expected: &ExpectedFragments) -> Result<(), SmokeError> {
    let missing = expected.missing_from(output);
    if missing.is_empty() {
        return Ok(());
    }
    Err(SmokeError::MissingFragments {
        missing,
        output: output.to_string(),
    })
}

/// Mounts `component` with its defaults and checks the expected fragments.
///
/// Returns the rendered output on success.
///
/// # Errors
///
/// Returns [`SmokeError::Mount`] if mounting fails and
/// [`SmokeError::MissingFragments`] if any fragment is absent.
pub fn assert_renders<C: Component + ?Sized>(
    component: &C,
    expected: &ExpectedFragments,
) -> Result<RenderedOutput, SmokeError> {
    let mounted = mount(component)?;
    let output = mounted.text();
    check(&output, expected)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use ratatui::Frame;
    use ratatui::layout::Rect;
    use ratatui::widgets::Paragraph;

    use super::*;

    struct Label(&'static str);

    impl Component for Label {
        fn name(&self) -> &'static str {
            "Label"
        }

        fn render(&self, frame: &mut Frame<'_>, area: Rect) -> Result<(), RenderError> {
            frame.render_widget(Paragraph::new(self.0), area);
            Ok(())
        }
    }

    #[test]
    fn flattened_rows_are_trimmed_and_joined() {
        let mounted = mount_with_size(&Label("hello"), 10, 2).unwrap();
        assert_eq!(mounted.text().as_str(), "hello\n");
    }

    #[test]
    fn wide_characters_flatten_without_filler() {
        let output = mount_with_size(&Label("创建容器 Containers"), 30, 1)
            .unwrap()
            .text();
        assert_eq!(output.as_str(), "创建容器 Containers");
        check(&output, &ExpectedFragments::new(["创建容器", "Containers"])).unwrap();
    }

    #[test]
    fn missing_fragments_keep_declaration_order() {
        let output = mount(&Label("alpha gamma")).unwrap().text();
        let expected = ExpectedFragments::new(["delta", "alpha", "beta"]);
        assert_eq!(expected.missing_from(&output), vec!["delta", "beta"]);
    }

    #[test]
    fn check_reports_output() {
        let output = mount(&Label("alpha")).unwrap().text();
        let err = check(&output, &ExpectedFragments::new(["omega"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("omega"));
        assert!(message.contains("alpha"));
    }

    #[test]
    fn empty_render_is_empty() {
        let output = mount(&Label("")).unwrap().text();
        assert!(output.is_empty());
    }
}
