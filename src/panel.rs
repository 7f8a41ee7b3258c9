//! Builds the table-of-contents panel from heading metadata.
//!
//! The panel is a plain value: a title row, a content state and a flat list of entries. Hosts
//! decide how to draw it; the controller keeps a [`PanelHandle`] so clicks can be routed back to
//! the entry that was drawn.

use crate::heading::HeadingDescriptor;
use crate::host::{PanelId, RenderTree, ViewId};

/// Glyph shown at the start of the title row.
pub const PANEL_ICON: &str = "📚";
/// Label shown next to the icon while the panel is expanded.
pub const PANEL_TITLE: &str = "Table of Contents";
/// Label of the synthetic first entry.
pub const TOP_LABEL: &str = "(Top)";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Whether the title label and entries are shown.
pub enum ContentState {
    /// Label and entries visible.
    Expanded,
    /// Only the icon visible.
    Collapsed,
}

impl ContentState {
    #[must_use]
    /// Maps the persisted `opened` flag onto a content state.
    pub fn from_opened(opened: bool) -> Self {
        if opened {
            Self::Expanded
        } else {
            Self::Collapsed
        }
    }

    #[must_use]
    /// Class a DOM host adds to the title label and content region.
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            Self::Expanded => None,
            Self::Collapsed => Some("toc-closed"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// What activating an entry navigates to.
pub enum EntryTarget {
    /// Start of the document, in both rendering modes.
    Top,
    /// A document heading.
    Heading(HeadingDescriptor),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One navigable row of the panel.
pub struct PanelEntry {
    /// Text shown for the entry.
    pub label: String,
    /// Indent level, 1 through 6.
    pub level: u8,
    /// Navigation target.
    pub target: EntryTarget,
}

impl PanelEntry {
    #[must_use]
    /// Leading columns for this entry's indent.
    pub fn indent_width(&self) -> usize {
        usize::from(self.level.saturating_sub(1)) * 2
    }

    #[must_use]
    /// Class a DOM host adds to the entry paragraph.
    pub fn css_class(&self) -> String {
        format!("toc-link-left-h{}", self.level)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The panel's structural skeleton and entries.
pub struct Panel {
    /// Title row glyph.
    pub icon: &'static str,
    /// Title row label.
    pub title: &'static str,
    /// Expanded or collapsed.
    pub content: ContentState,
    /// `(Top)` followed by one entry per heading, in document order.
    pub entries: Vec<PanelEntry>,
}

#[must_use]
/// Builds the panel for `headings`, collapsed unless `opened`.
pub fn build_panel(headings: &[HeadingDescriptor], opened: bool) -> Panel {
    let mut entries = Vec::with_capacity(headings.len() + 1);
    entries.push(PanelEntry {
        label: TOP_LABEL.to_string(),
        level: 1,
        target: EntryTarget::Top,
    });
    entries.extend(headings.iter().map(|heading| PanelEntry {
        label: heading.text.clone(),
        level: heading.level,
        target: EntryTarget::Heading(heading.clone()),
    }));

    Panel {
        icon: PANEL_ICON,
        title: PANEL_TITLE,
        content: ContentState::from_opened(opened),
        entries,
    }
}

#[derive(Debug)]
/// The controller's reference to the one mounted panel.
pub struct PanelHandle {
    /// Host id of the mounted panel.
    pub id: PanelId,
    /// View the panel was mounted into; entry clicks navigate this view.
    pub view: ViewId,
    /// Entry targets in display order.
    pub targets: Vec<EntryTarget>,
}

impl PanelHandle {
    /// Appends `panel` into the container of `view` and keeps what clicks need.
    pub fn mount(host: &mut impl RenderTree, view: ViewId, panel: Panel) -> Self {
        let targets = panel.entries.iter().map(|e| e.target.clone()).collect();
        let id = host.mount_panel(view, panel);
        Self { id, view, targets }
    }

    /// Removes the panel from the host.
    pub fn detach(self, host: &mut impl RenderTree) {
        host.detach_panel(self.id);
    }

    #[must_use]
    /// Target of the entry at `index`, if the panel has that many entries.
    pub fn target(&self, index: usize) -> Option<&EntryTarget> {
        self.targets.get(index)
    }
}

#[cfg(test)]
#[path = "tests/panel.rs"]
mod tests;
