//! A recording host and an in-memory settings store for exercising the panel core.

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Placement};
use crate::heading::HeadingDescriptor;
use crate::host::{
    ActiveViewContext, DocumentId, EditorApi, ElementId, HeaderQuery, MetadataProvider, PanelId,
    PreviewApi, RenderTree, RenderedHeader, Surface, ViewId, ViewMode, Workspace,
};
use crate::panel::Panel;
use crate::settings::{Settings, SettingsStore};
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    SetCursor(ViewId, usize, usize),
    ScrollTo(ViewId, usize),
    ApplyScroll(ViewId, usize),
    ScrollIntoView(ViewId, ElementId),
    Mount(ViewId, PanelId),
    Detach(PanelId),
    Place(PanelId, Placement),
}

pub const VIEW: ViewId = ViewId(1);

pub fn document() -> DocumentId {
    DocumentId("notes.md".to_string())
}

pub fn source_element(row: usize) -> ElementId {
    ElementId {
        surface: Surface::Source,
        row,
    }
}

pub fn preview_element(row: usize) -> ElementId {
    ElementId {
        surface: Surface::Preview,
        row,
    }
}

pub struct FakeHost {
    pub active: Option<ActiveViewContext>,
    pub headings: HashMap<DocumentId, Vec<HeadingDescriptor>>,
    pub mode: ViewMode,
    /// Source header decorations as `(level, row, text)`.
    pub source_headers: Vec<(u8, usize, String)>,
    /// Preview headers as `(level, row, heading-text)`.
    pub preview_headers: Vec<(u8, usize, String)>,
    pub attached: BTreeSet<ElementId>,
    pub flashing: BTreeSet<ElementId>,
    pub mounted: Vec<(PanelId, ViewId, Panel)>,
    pub placements: HashMap<PanelId, Placement>,
    pub header_visible: bool,
    pub status_bar: Option<Bounds>,
    pub panel_bounds: Option<Bounds>,
    pub calls: Vec<Call>,
    next_panel: u64,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            active: None,
            headings: HashMap::new(),
            mode: ViewMode::Source,
            source_headers: Vec::new(),
            preview_headers: Vec::new(),
            attached: BTreeSet::new(),
            flashing: BTreeSet::new(),
            mounted: Vec::new(),
            placements: HashMap::new(),
            header_visible: false,
            status_bar: None,
            panel_bounds: None,
            calls: Vec::new(),
            next_panel: 1,
        }
    }

    /// A host focused on one view whose document has `headings`.
    pub fn with_headings(headings: Vec<HeadingDescriptor>) -> Self {
        let mut host = Self::new();
        host.active = Some(ActiveViewContext {
            view: VIEW,
            document: document(),
        });
        host.headings.insert(document(), headings);
        host
    }

    pub fn add_source_header(&mut self, level: u8, row: usize, text: &str) {
        self.source_headers.push((level, row, text.to_string()));
        self.attached.insert(source_element(row));
    }

    pub fn add_preview_header(&mut self, level: u8, row: usize, text: &str) {
        self.preview_headers.push((level, row, text.to_string()));
        self.attached.insert(preview_element(row));
    }

    pub fn mounted_panel(&self) -> Option<&Panel> {
        match self.mounted.as_slice() {
            [(_, _, panel)] => Some(panel),
            _ => None,
        }
    }
}

impl Workspace for FakeHost {
    fn active_view(&self) -> Option<ActiveViewContext> {
        self.active.clone()
    }
}

impl MetadataProvider for FakeHost {
    fn headings(&self, document: &DocumentId) -> Option<&[HeadingDescriptor]> {
        self.headings.get(document).map(Vec::as_slice)
    }
}

impl EditorApi for FakeHost {
    fn mode(&self, _view: ViewId) -> Option<ViewMode> {
        Some(self.mode)
    }

    fn set_cursor(&mut self, view: ViewId, line: usize, column: usize) {
        self.calls.push(Call::SetCursor(view, line, column));
    }

    fn scroll_to(&mut self, view: ViewId, offset: usize) {
        self.calls.push(Call::ScrollTo(view, offset));
    }
}

impl PreviewApi for FakeHost {
    fn apply_scroll(&mut self, view: ViewId, line: usize) {
        self.calls.push(Call::ApplyScroll(view, line));
    }
}

fn rendered(surface: Surface, row: usize, text: &str) -> RenderedHeader {
    let element = ElementId { surface, row };
    RenderedHeader {
        element,
        block: Some(element),
        text: text.to_string(),
    }
}

impl RenderTree for FakeHost {
    fn find_headers(&self, _view: ViewId, query: &HeaderQuery) -> Vec<RenderedHeader> {
        match query {
            HeaderQuery::SourceLevel(level) => self
                .source_headers
                .iter()
                .filter(|(l, _, _)| l == level)
                .map(|(_, row, text)| rendered(Surface::Source, *row, text))
                .collect(),
            HeaderQuery::PreviewHeading { level, text } => self
                .preview_headers
                .iter()
                .filter(|(l, _, t)| l == level && t == text)
                .map(|(_, row, text)| rendered(Surface::Preview, *row, text))
                .collect(),
        }
    }

    fn scroll_into_view(&mut self, view: ViewId, element: ElementId) {
        self.calls.push(Call::ScrollIntoView(view, element));
    }

    fn set_flashing(&mut self, _view: ViewId, block: ElementId, flashing: bool) {
        if !flashing {
            self.flashing.remove(&block);
        } else if self.attached.contains(&block) {
            self.flashing.insert(block);
        }
    }

    fn header_visible(&self, _view: ViewId) -> bool {
        self.header_visible
    }

    fn status_bar_bounds(&self) -> Option<Bounds> {
        self.status_bar
    }

    fn mount_panel(&mut self, view: ViewId, panel: Panel) -> PanelId {
        let id = PanelId(self.next_panel);
        self.next_panel += 1;
        self.mounted.push((id, view, panel));
        self.calls.push(Call::Mount(view, id));
        id
    }

    fn detach_panel(&mut self, panel: PanelId) {
        self.mounted.retain(|(id, _, _)| *id != panel);
        self.placements.remove(&panel);
        self.calls.push(Call::Detach(panel));
    }

    fn panel_bounds(&self, _panel: PanelId, _placement: &Placement) -> Option<Bounds> {
        self.panel_bounds
    }

    fn apply_placement(&mut self, panel: PanelId, placement: Placement) {
        self.placements.insert(panel, placement);
        self.calls.push(Call::Place(panel, placement));
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub stored: Option<Value>,
    pub saves: Vec<Settings>,
    pub fail: bool,
}

impl MemoryStore {
    pub fn with(stored: Value) -> Self {
        Self {
            stored: Some(stored),
            ..Self::default()
        }
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self) -> Result<Option<Value>> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, settings: &Settings) -> Result<()> {
        if self.fail {
            return Err(Error::SettingsIo {
                path: "memory".into(),
                source: std::io::Error::other("disk full"),
            });
        }
        self.stored = Some(serde_json::to_value(settings)?);
        self.saves.push(*settings);
        Ok(())
    }
}
