//! The terminal host the panel core plugs into.
//!
//! Each opened file gets a [`DocumentView`] that renders either its raw source (edited through
//! edtui) or a preview. The views, the metadata cache and the chrome flags together implement
//! every host trait, so the controller drives this state exactly as it would drive any other
//! editor. Rows are the unit of layout: one source line is one rendered row, and one preview
//! block is one rendered row. Header decorations in both modes come from the cached parse, so
//! heading-like lines inside code blocks are never treated as headers.

use crate::config::Config;
use crate::error::Result;
use crate::geometry::{Bounds, Placement};
use crate::heading::HeadingDescriptor;
use crate::host::{
    ActiveViewContext, DocumentId, EditorApi, ElementId, HeaderQuery, MetadataProvider, PanelId,
    PreviewApi, RenderTree, RenderedHeader, Surface, ViewId, ViewMode, Workspace,
};
use crate::input;
use crate::metadata::MetadataCache;
use crate::panel::{ContentState, Panel};
use crate::preferences::PreferencePane;
use crate::ui::{self, ScreenLayout};
use edtui::{EditorState, Index2, Lines};
use ratatui::layout::{Position, Rect};
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug)]
/// A panel the controller mounted into a view.
pub struct MountedPanel {
    /// Id handed back to the controller.
    pub id: PanelId,
    /// Panel content.
    pub panel: Panel,
    /// Placement applied by the controller, once resolved.
    pub placement: Option<Placement>,
    /// First entry shown in the content region.
    pub scroll: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One rendered row of the preview.
pub struct PreviewRow {
    /// Displayed text; for headings also the heading-text attribute.
    pub text: String,
    /// Source line the row was rendered from.
    pub source_line: usize,
    /// Heading level, if the row renders a heading.
    pub level: Option<u8>,
}

/// A file opened for editing and previewing.
pub struct DocumentView {
    /// Host id of the view.
    pub id: ViewId,
    /// File backing the view.
    pub path: PathBuf,
    /// Metadata key of the document.
    pub document: DocumentId,
    /// Current rendering mode.
    pub mode: ViewMode,
    /// Source buffer and cursor.
    pub editor: EditorState,
    /// First source line shown.
    pub source_scroll: usize,
    /// First preview row shown.
    pub preview_scroll: usize,
    /// Blocks currently flash-highlighted.
    pub flashing: BTreeSet<ElementId>,
    /// The table of contents mounted into this view, if any.
    pub panel: Option<MountedPanel>,
}

impl DocumentView {
    #[must_use]
    /// Source lines as strings.
    pub fn source_lines(&self) -> Vec<String> {
        self.editor
            .lines
            .iter_row()
            .map(|line| line.iter().collect::<String>())
            .collect()
    }

    #[must_use]
    /// Full source text.
    pub fn text(&self) -> String {
        self.source_lines().join("\n")
    }

    #[must_use]
    /// Display name used in the header bar.
    pub fn title(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().to_string(),
        )
    }
}

/// What a mouse position lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    /// The panel's title row.
    PanelTitle,
    /// A panel entry, by index.
    PanelEntry(usize),
    /// Panel border or empty content space.
    Panel,
    /// A source position in the active view's body.
    Body {
        /// Source line.
        line: usize,
        /// Column within the line.
        column: usize,
    },
    /// Any other part of the window.
    Chrome,
}

/// Bridges opened documents, their metadata and the terminal layout.
pub struct AppState {
    /// Opened views, in tab order.
    pub views: Vec<DocumentView>,
    /// Index of the focused view.
    pub active: usize,
    /// Heading metadata of every opened document.
    pub metadata: MetadataCache,
    /// Whether views show their header bar.
    pub show_header: bool,
    /// Preference pane, while it holds focus.
    pub preferences: Option<PreferencePane>,
    /// Terminal area of the last layout.
    pub area: Rect,
    /// Status feedback displayed in the status bar.
    pub message: Option<String>,
    next_panel: u64,
}

impl AppState {
    /// Opens a view per document and extracts its headings.
    ///
    /// Documents whose headings cannot be extracted still open; they just have no panel.
    ///
    /// # Errors
    ///
    /// Returns an error if a document cannot be read or the markdown grammar cannot be loaded.
    pub fn open(documents: &[PathBuf], cfg: &Config) -> Result<Self> {
        let mut metadata = MetadataCache::markdown()?;
        let mut views = Vec::with_capacity(documents.len());

        for (id, path) in (1..).zip(documents) {
            let text = input::read_document(path)?;
            let document = DocumentId(path.display().to_string());
            if let Err(e) = metadata.refresh(&document, &text) {
                warn!(document = %document.0, "could not extract headings: {e}");
            }
            views.push(DocumentView {
                id: ViewId(id),
                path: path.clone(),
                document,
                mode: ViewMode::Source,
                editor: EditorState::new(Lines::from(text.as_str())),
                source_scroll: 0,
                preview_scroll: 0,
                flashing: BTreeSet::new(),
                panel: None,
            });
        }

        Ok(Self::with_views(views, metadata, cfg.show_header))
    }

    #[must_use]
    /// Assembles state from already opened views.
    pub fn with_views(views: Vec<DocumentView>, metadata: MetadataCache, show_header: bool) -> Self {
        Self {
            views,
            active: 0,
            metadata,
            show_header,
            preferences: None,
            area: Rect::default(),
            message: None,
            next_panel: 1,
        }
    }

    #[must_use]
    /// The focused view, unless the preference pane holds focus.
    pub fn active_view_ref(&self) -> Option<&DocumentView> {
        if self.preferences.is_some() {
            return None;
        }
        self.views.get(self.active)
    }

    fn active_view_mut(&mut self) -> Option<&mut DocumentView> {
        if self.preferences.is_some() {
            return None;
        }
        self.views.get_mut(self.active)
    }

    fn view(&self, id: ViewId) -> Option<&DocumentView> {
        self.views.iter().find(|v| v.id == id)
    }

    fn view_mut(&mut self, id: ViewId) -> Option<&mut DocumentView> {
        self.views.iter_mut().find(|v| v.id == id)
    }

    fn panel_owner(&self, id: PanelId) -> Option<&DocumentView> {
        self.views
            .iter()
            .find(|v| v.panel.as_ref().is_some_and(|p| p.id == id))
    }

    #[must_use]
    /// Text of the status bar.
    pub fn status_text(&self) -> String {
        if let Some(message) = &self.message {
            return format!(" {message} ");
        }
        if self.preferences.is_some() {
            return " preferences ".to_string();
        }
        match self.views.get(self.active) {
            Some(view) => match view.mode {
                ViewMode::Source => format!(
                    " source  Ln {}, Col {} ",
                    view.editor.cursor.row + 1,
                    view.editor.cursor.col + 1
                ),
                ViewMode::Preview => format!(" preview  {} ", view.title()),
            },
            None => String::new(),
        }
    }

    #[must_use]
    /// Current layout of the window chrome.
    pub fn layout(&self) -> ScreenLayout {
        ui::screen_layout(self.area, self.show_header, &self.status_text())
    }

    fn body_height(&self) -> usize {
        usize::from(self.layout().body.height.max(1))
    }

    #[must_use]
    /// Preview rows of `view`, rendered from its source and cached headings.
    pub fn preview_rows(&self, view: &DocumentView) -> Vec<PreviewRow> {
        let headings = self.metadata.headings(&view.document).unwrap_or_default();
        render_preview(&view.source_lines(), headings)
    }

    /// Re-extracts headings after the active view's text changed.
    ///
    /// Returns the document whose metadata changed.
    pub fn refresh_active_metadata(&mut self) -> Option<DocumentId> {
        let view = self.views.get(self.active)?;
        let document = view.document.clone();
        let text = view.text();
        if let Err(e) = self.metadata.refresh(&document, &text) {
            warn!(document = %document.0, "could not extract headings: {e}");
        }
        Some(document)
    }

    /// Keeps the active view's cursor on screen.
    pub fn follow_cursor(&mut self) {
        let height = self.body_height();
        if let Some(view) = self.views.get_mut(self.active) {
            let row = view.editor.cursor.row;
            if row < view.source_scroll {
                view.source_scroll = row;
            } else if row >= view.source_scroll + height {
                view.source_scroll = row + 1 - height;
            }
        }
    }

    /// Focuses the next view, wrapping around.
    pub fn next_view(&mut self) {
        if !self.views.is_empty() {
            self.active = (self.active + 1) % self.views.len();
        }
    }

    /// Focuses the previous view, wrapping around.
    pub fn prev_view(&mut self) {
        if !self.views.is_empty() {
            self.active = (self.active + self.views.len() - 1) % self.views.len();
        }
    }

    /// Switches the active view between source and preview.
    pub fn toggle_mode(&mut self) {
        if let Some(view) = self.active_view_mut() {
            view.mode = match view.mode {
                ViewMode::Source => ViewMode::Preview,
                ViewMode::Preview => ViewMode::Source,
            };
        }
    }

    /// Scrolls the active view's current surface by `delta` rows.
    pub fn scroll_active(&mut self, delta: isize) {
        let Some(view) = self.views.get(self.active) else {
            return;
        };
        let rows = match view.mode {
            ViewMode::Source => view.editor.lines.len(),
            ViewMode::Preview => self.preview_rows(view).len(),
        };
        let last = rows.saturating_sub(1);
        if let Some(view) = self.views.get_mut(self.active) {
            let offset = match view.mode {
                ViewMode::Source => &mut view.source_scroll,
                ViewMode::Preview => &mut view.preview_scroll,
            };
            *offset = offset.saturating_add_signed(delta).min(last);
        }
    }

    /// Scrolls whatever is under the mouse: the panel entries, or else the active view.
    pub fn scroll_at(&mut self, column: u16, row: u16, delta: isize) {
        let position = Position::new(column, row);
        let layout = self.layout();
        let over_panel = self.active_view_ref().and_then(|view| {
            let mounted = view.panel.as_ref()?;
            let rect = ui::panel_rect(&layout, mounted)?;
            rect.contains(position).then_some(())
        });
        if over_panel.is_some() {
            if let Some(mounted) = self.active_view_mut().and_then(|v| v.panel.as_mut()) {
                let last = mounted.panel.entries.len().saturating_sub(1);
                mounted.scroll = mounted.scroll.saturating_add_signed(delta).min(last);
            }
        } else {
            self.scroll_active(delta);
        }
    }

    #[must_use]
    /// Resolves a mouse position against the panel and the active view's body.
    pub fn hit_test(&self, column: u16, row: u16) -> Hit {
        let position = Position::new(column, row);
        let Some(view) = self.active_view_ref() else {
            return Hit::Chrome;
        };
        let layout = self.layout();

        if let Some(mounted) = &view.panel {
            if let Some(rect) = ui::panel_rect(&layout, mounted) {
                if rect.contains(position) {
                    return panel_hit(rect, mounted, row);
                }
            }
        }

        if view.mode == ViewMode::Source
            && layout.body.contains(position)
            && !layout.status_bar.contains(position)
        {
            return Hit::Body {
                line: view.source_scroll + usize::from(row - layout.body.y),
                column: usize::from(column - layout.body.x),
            };
        }

        Hit::Chrome
    }

    /// Moves the active view's cursor to a clicked source position.
    pub fn click_body(&mut self, line: usize, column: usize) {
        if let Some(view) = self.active_view_mut() {
            let (line, column) = clamp_position(view, line, column);
            view.editor.cursor = Index2::new(line, column);
        }
    }

    /// Shows or hides the header bar of every view.
    pub fn toggle_header(&mut self) {
        self.show_header = !self.show_header;
    }

    /// Opens or closes the preference pane.
    pub fn toggle_preferences(&mut self) {
        self.preferences = match self.preferences {
            Some(_) => None,
            None => Some(PreferencePane::default()),
        };
    }
}

fn panel_hit(rect: Rect, mounted: &MountedPanel, row: u16) -> Hit {
    let inner_row = row.saturating_sub(rect.y);
    if inner_row == 0 || inner_row + 1 >= rect.height {
        return Hit::Panel;
    }
    if inner_row == 1 {
        return Hit::PanelTitle;
    }
    if mounted.panel.content == ContentState::Collapsed {
        return Hit::Panel;
    }
    let index = mounted.scroll + usize::from(inner_row - 2);
    if index < mounted.panel.entries.len() {
        Hit::PanelEntry(index)
    } else {
        Hit::Panel
    }
}

fn clamp_position(view: &DocumentView, line: usize, column: usize) -> (usize, usize) {
    let lines = view.source_lines();
    let line = line.min(lines.len().saturating_sub(1));
    let width = lines.get(line).map_or(0, |l| l.chars().count());
    (line, column.min(width))
}

#[must_use]
/// Renders source lines into preview rows.
///
/// Every heading renders as one row carrying its heading text, however many source lines it spans
/// (a multi-line setext paragraph and its underline fold into that row). Everything else renders
/// verbatim.
pub fn render_preview(lines: &[String], headings: &[HeadingDescriptor]) -> Vec<PreviewRow> {
    let by_line: HashMap<usize, &HeadingDescriptor> =
        headings.iter().map(|h| (h.start_line, h)).collect();
    let mut rows = Vec::with_capacity(lines.len());
    let mut folded_until = None;

    for (index, line) in lines.iter().enumerate() {
        if folded_until.is_some_and(|end| index <= end) {
            continue;
        }
        if let Some(heading) = by_line.get(&index) {
            folded_until = Some(heading.end_line);
            rows.push(PreviewRow {
                text: heading.text.clone(),
                source_line: index,
                level: Some(heading.level),
            });
        } else {
            rows.push(PreviewRow {
                text: line.clone(),
                source_line: index,
                level: None,
            });
        }
    }
    rows
}

impl Workspace for AppState {
    fn active_view(&self) -> Option<ActiveViewContext> {
        self.active_view_ref().map(|view| ActiveViewContext {
            view: view.id,
            document: view.document.clone(),
        })
    }
}

impl MetadataProvider for AppState {
    fn headings(&self, document: &DocumentId) -> Option<&[HeadingDescriptor]> {
        self.metadata.headings(document)
    }
}

impl EditorApi for AppState {
    fn mode(&self, view: ViewId) -> Option<ViewMode> {
        self.view(view).map(|v| v.mode)
    }

    fn set_cursor(&mut self, view: ViewId, line: usize, column: usize) {
        let height = self.body_height();
        if let Some(view) = self.view_mut(view) {
            let (line, column) = clamp_position(view, line, column);
            view.editor.cursor = Index2::new(line, column);
            if line < view.source_scroll || line >= view.source_scroll + height {
                view.source_scroll = line;
            }
        }
    }

    fn scroll_to(&mut self, view: ViewId, offset: usize) {
        if let Some(view) = self.view_mut(view) {
            view.source_scroll = offset.min(view.editor.lines.len().saturating_sub(1));
        }
    }
}

impl PreviewApi for AppState {
    fn apply_scroll(&mut self, view: ViewId, line: usize) {
        let Some(rows) = self.view(view).map(|v| self.preview_rows(v)) else {
            return;
        };
        let row = rows
            .iter()
            .position(|r| r.source_line >= line)
            .unwrap_or(rows.len().saturating_sub(1));
        if let Some(view) = self.view_mut(view) {
            view.preview_scroll = row;
        }
    }
}

impl RenderTree for AppState {
    fn find_headers(&self, view: ViewId, query: &HeaderQuery) -> Vec<RenderedHeader> {
        let Some(view) = self.view(view) else {
            return Vec::new();
        };
        match query {
            HeaderQuery::SourceLevel(level) => self
                .metadata
                .headings(&view.document)
                .unwrap_or_default()
                .iter()
                .filter(|heading| heading.level == *level)
                .map(|heading| {
                    let element = ElementId {
                        surface: Surface::Source,
                        row: heading.start_line,
                    };
                    RenderedHeader {
                        element,
                        block: Some(element),
                        text: heading.text.clone(),
                    }
                })
                .collect(),
            HeaderQuery::PreviewHeading { level, text } => self
                .preview_rows(view)
                .into_iter()
                .enumerate()
                .filter(|(_, r)| r.level == Some(*level) && &r.text == text)
                .map(|(row, r)| {
                    let element = ElementId {
                        surface: Surface::Preview,
                        row,
                    };
                    RenderedHeader {
                        element,
                        block: Some(element),
                        text: r.text,
                    }
                })
                .collect(),
        }
    }

    fn scroll_into_view(&mut self, view: ViewId, element: ElementId) {
        if let Some(view) = self.view_mut(view) {
            match element.surface {
                Surface::Source => view.source_scroll = element.row,
                Surface::Preview => view.preview_scroll = element.row,
            }
        }
    }

    fn set_flashing(&mut self, view: ViewId, block: ElementId, flashing: bool) {
        let rows = self.view(view).map(|v| match block.surface {
            Surface::Source => v.editor.lines.len(),
            Surface::Preview => self.preview_rows(v).len(),
        });
        let Some(view) = self.view_mut(view) else {
            return;
        };
        if !flashing {
            view.flashing.remove(&block);
        } else if rows.is_some_and(|rows| block.row < rows) {
            view.flashing.insert(block);
        }
    }

    fn header_visible(&self, view: ViewId) -> bool {
        self.show_header && self.view(view).is_some()
    }

    fn status_bar_bounds(&self) -> Option<Bounds> {
        let status_bar = self.layout().status_bar;
        (status_bar.width > 0).then(|| ui::bounds(status_bar))
    }

    fn mount_panel(&mut self, view: ViewId, panel: Panel) -> PanelId {
        let id = PanelId(self.next_panel);
        self.next_panel += 1;
        if let Some(view) = self.view_mut(view) {
            view.panel = Some(MountedPanel {
                id,
                panel,
                placement: None,
                scroll: 0,
            });
        }
        id
    }

    fn detach_panel(&mut self, panel: PanelId) {
        for view in &mut self.views {
            if view.panel.as_ref().is_some_and(|p| p.id == panel) {
                view.panel = None;
            }
        }
    }

    fn panel_bounds(&self, panel: PanelId, placement: &Placement) -> Option<Bounds> {
        let mounted = self.panel_owner(panel)?.panel.as_ref()?;
        let rect = ui::panel_rect_with(&self.layout(), &mounted.panel, placement)?;
        Some(ui::bounds(rect))
    }

    fn apply_placement(&mut self, panel: PanelId, placement: Placement) {
        for view in &mut self.views {
            if let Some(mounted) = view.panel.as_mut().filter(|p| p.id == panel) {
                mounted.placement = Some(placement);
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
