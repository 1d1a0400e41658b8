//! Render smoke tests for the `ContainerList` view.
//!
//! The view is mounted with default state on an in-memory terminal and its
//! text is checked for the form and table headings.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use vdesk_tui::component::{Component, RenderError};
use vdesk_tui::smoke::{self, ExpectedFragments, SmokeError};
use vdesk_tui::ui::container_list::{ContainerList, FORM_TITLE, TABLE_TITLE};

fn expected() -> ExpectedFragments {
    ExpectedFragments::new(["Create Container", "Containers"])
}

/// Draws fixed text, standing in for a view with different headings.
struct Static(&'static str);

impl Component for Static {
    fn name(&self) -> &'static str {
        "Static"
    }

    fn render(&self, frame: &mut Frame<'_>, area: Rect) -> Result<(), RenderError> {
        frame.render_widget(Paragraph::new(self.0), area);
        Ok(())
    }
}

#[test]
fn renders_create_form_and_table() {
    let output = smoke::assert_renders(&ContainerList::default(), &expected())
        .unwrap_or_else(|e| panic!("{e}"));
    assert!(output.contains("Create Container"));
    assert!(output.contains("Containers"));
}

#[test]
fn headings_match_exported_titles() {
    assert_eq!(ExpectedFragments::new([FORM_TITLE, TABLE_TITLE]), expected());
}

#[test]
fn repeated_mounts_are_independent() {
    for _ in 0..2 {
        let mounted = smoke::mount(&ContainerList::default()).unwrap();
        assert_eq!(mounted.component(), "ContainerList");
        smoke::check(&mounted.text(), &expected()).unwrap();
    }
}

#[test]
fn output_is_not_empty() {
    let output = smoke::assert_renders(&ContainerList::default(), &expected()).unwrap();
    assert!(!output.is_empty());
}

#[test]
fn near_miss_heading_is_reported_missing() {
    let err = smoke::assert_renders(&Static("Create Container\nContainer List"), &expected())
        .unwrap_err();
    let SmokeError::MissingFragments { missing, output } = err else {
        panic!("expected missing fragments, got {err:?}");
    };
    assert_eq!(missing, vec!["Containers".to_string()]);
    assert!(output.contains("Container List"));
}

#[test]
fn unrelated_render_misses_every_fragment() {
    let err = smoke::assert_renders(&Static("nothing here"), &expected()).unwrap_err();
    assert!(matches!(
        err,
        SmokeError::MissingFragments { ref missing, .. } if missing.len() == 2
    ));
}

#[test]
fn mount_failure_is_not_a_missing_fragment() {
    let err = smoke::mount_with_size(&ContainerList::default(), 10, 5).unwrap_err();
    assert!(matches!(err, SmokeError::Mount { component: "ContainerList", .. }));
}

#[test]
fn wide_text_is_matched_as_displayed() {
    let output = smoke::assert_renders(
        &Static("创建容器 Containers"),
        &ExpectedFragments::new(["创建容器", "Containers"]),
    )
    .unwrap_or_else(|e| panic!("{e}"));
    assert!(output.contains("创建容器 Containers"));
}
