//! The seams between the panel core and the application hosting it.
//!
//! The core never owns host state. Every interaction goes through one of these traits, keyed by
//! the small identifier types below, so a host can hand out views, documents and rendered
//! elements without exposing references that outlive a single event callback.

use crate::geometry::{Bounds, Placement};
use crate::heading::HeadingDescriptor;
use crate::panel::Panel;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identifies one editing view in the host.
pub struct ViewId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identifies the document backing a view.
pub struct DocumentId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identifies a panel the host has mounted.
pub struct PanelId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The two ways a view can render its document.
pub enum ViewMode {
    /// Raw markdown with the text cursor.
    Source,
    /// Rendered reading view.
    Preview,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Which rendering surface a rendered element belongs to.
pub enum Surface {
    /// The source editor.
    Source,
    /// The preview renderer.
    Preview,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A rendered element inside a view, addressed by surface and row.
pub struct ElementId {
    /// Surface the element is rendered on.
    pub surface: Surface,
    /// Rendered row of the element.
    pub row: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading element as the host currently renders it.
pub struct RenderedHeader {
    /// The header element itself.
    pub element: ElementId,
    /// The block containing the header, if it has one.
    pub block: Option<ElementId>,
    /// Displayed text (source) or heading-text attribute (preview).
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Selector for rendered header elements.
pub enum HeaderQuery {
    /// Every source-mode header decoration at this level, in render order.
    SourceLevel(u8),
    /// Preview headers at this level whose heading-text attribute equals `text`.
    PreviewHeading {
        /// Heading level.
        level: u8,
        /// Heading-text attribute to match exactly.
        text: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Snapshot of the focused view, replaced wholesale on every trigger.
pub struct ActiveViewContext {
    /// The focused view.
    pub view: ViewId,
    /// The document backing it.
    pub document: DocumentId,
}

/// Tells the core which view has focus.
pub trait Workspace {
    /// Returns the focused editing view, or `None` when focus is elsewhere.
    fn active_view(&self) -> Option<ActiveViewContext>;
}

/// Supplies already-extracted heading metadata.
pub trait MetadataProvider {
    /// Returns the cached headings of `document` in document order, if any are cached.
    fn headings(&self, document: &DocumentId) -> Option<&[HeadingDescriptor]>;
}

/// Cursor and scroll control of the source editor.
pub trait EditorApi {
    /// Current rendering mode of `view`, or `None` if the view is gone.
    fn mode(&self, view: ViewId) -> Option<ViewMode>;
    /// Moves the text cursor.
    fn set_cursor(&mut self, view: ViewId, line: usize, column: usize);
    /// Scrolls the editor to a vertical offset.
    fn scroll_to(&mut self, view: ViewId, offset: usize);
}

/// Scroll control of the preview renderer.
pub trait PreviewApi {
    /// Scrolls the preview so the block rendered from source `line` is at the top.
    fn apply_scroll(&mut self, view: ViewId, line: usize);
}

/// DOM-like access to what the host renders, including the panel subtree.
pub trait RenderTree {
    /// Finds rendered header elements in `view`.
    fn find_headers(&self, view: ViewId, query: &HeaderQuery) -> Vec<RenderedHeader>;
    /// Scrolls `element` into view without animation.
    fn scroll_into_view(&mut self, view: ViewId, element: ElementId);
    /// Sets or clears the flash state of a block. Detached blocks are ignored.
    fn set_flashing(&mut self, view: ViewId, block: ElementId, flashing: bool);
    /// Whether the view's header chrome is displayed.
    fn header_visible(&self, view: ViewId) -> bool;
    /// Bounding box of the status bar, if there is one.
    fn status_bar_bounds(&self) -> Option<Bounds>;
    /// Appends `panel` into the container of `view`.
    fn mount_panel(&mut self, view: ViewId, panel: Panel) -> PanelId;
    /// Removes a mounted panel. Unknown ids are ignored.
    fn detach_panel(&mut self, panel: PanelId);
    /// Bounding box the panel would occupy under `placement`.
    fn panel_bounds(&self, panel: PanelId, placement: &Placement) -> Option<Bounds>;
    /// Applies the final placement to a mounted panel.
    fn apply_placement(&mut self, panel: PanelId, placement: Placement);
}

/// Everything the panel core needs from its host.
pub trait Host: Workspace + MetadataProvider + EditorApi + PreviewApi + RenderTree {}

impl<T> Host for T where T: Workspace + MetadataProvider + EditorApi + PreviewApi + RenderTree {}
