use super::{render_preview, AppState, DocumentView, Hit, PreviewRow};
use crate::controller::{TocController, TriggerEvent};
use crate::geometry::{Corner, TopOffset};
use crate::host::{
    DocumentId, EditorApi, ElementId, HeaderQuery, PreviewApi, RenderTree, Surface, ViewId,
    ViewMode, Workspace,
};
use crate::metadata::MetadataCache;
use crate::navigator::HeadingNavigator;
use crate::test_support::MemoryStore;
use edtui::{EditorState, Lines};
use ratatui::layout::Rect;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const NOTES: &str = "# Intro\n\nSome text.\n\n## Setup\n\nMore.\n\nUsage\n-----\n\nEnd.";

fn document_view(id: u64, name: &str, text: &str) -> DocumentView {
    DocumentView {
        id: ViewId(id),
        path: PathBuf::from(name),
        document: DocumentId(name.to_string()),
        mode: ViewMode::Source,
        editor: EditorState::new(Lines::from(text)),
        source_scroll: 0,
        preview_scroll: 0,
        flashing: BTreeSet::new(),
        panel: None,
    }
}

fn app(documents: &[(&str, &str)]) -> AppState {
    let mut metadata = MetadataCache::markdown().unwrap();
    let mut views = Vec::new();
    for (id, (name, text)) in (1..).zip(documents) {
        metadata
            .refresh(&DocumentId((*name).to_string()), text)
            .unwrap();
        views.push(document_view(id, name, text));
    }
    let mut app = AppState::with_views(views, metadata, true);
    app.area = Rect::new(0, 0, 80, 24);
    app
}

fn controller() -> TocController<MemoryStore> {
    TocController::activate(MemoryStore::default(), HeadingNavigator::default())
}

#[test]
fn test_preview_folds_setext_underlines() {
    let app = app(&[("notes.md", NOTES)]);
    let rows = app.preview_rows(&app.views[0]);

    let headings: Vec<(usize, &str, usize, Option<u8>)> = rows
        .iter()
        .enumerate()
        .filter(|(_, r)| r.level.is_some())
        .map(|(row, r)| (row, r.text.as_str(), r.source_line, r.level))
        .collect();
    assert_eq!(
        headings,
        [
            (0, "Intro", 0, Some(1)),
            (4, "Setup", 4, Some(2)),
            (8, "Usage", 8, Some(2)),
        ]
    );
    assert_eq!(rows.len(), 11, "the underline row is folded away");
    assert_eq!(
        rows[9],
        PreviewRow {
            text: String::new(),
            source_line: 10,
            level: None,
        }
    );
}

#[test]
fn test_render_preview_without_headings_is_verbatim() {
    let lines = vec!["a".to_string(), "---".to_string()];
    let rows = render_preview(&lines, &[]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].text, "---");
}

#[test]
fn test_trigger_mounts_and_places_panel() {
    let mut app = app(&[("notes.md", NOTES)]);
    let mut toc = controller();

    assert!(toc.on_trigger(&mut app, &TriggerEvent::Click));

    let mounted = app.views[0].panel.as_ref().unwrap();
    assert_eq!(mounted.panel.entries.len(), 4);
    let placement = mounted.placement.unwrap();
    assert_eq!(placement.top, Some(TopOffset::Header));
    assert_eq!(placement.bottom, None);
}

#[test]
fn test_rebuild_replaces_the_mounted_panel() {
    let mut app = app(&[("notes.md", NOTES)]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);
    let first = app.views[0].panel.as_ref().unwrap().id;

    toc.on_trigger(&mut app, &TriggerEvent::Click);

    let second = app.views[0].panel.as_ref().unwrap().id;
    assert_ne!(first, second);
    assert_eq!(toc.panel().map(|p| p.id), Some(second));
}

#[test]
fn test_hit_test_resolves_panel_rows_and_body() {
    let mut app = app(&[("notes.md", NOTES)]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    // Top-right panel below the header: border on row 1, title on row 2, entries from row 3.
    assert_eq!(app.hit_test(70, 1), Hit::Panel);
    assert_eq!(app.hit_test(70, 2), Hit::PanelTitle);
    assert_eq!(app.hit_test(70, 3), Hit::PanelEntry(0));
    assert_eq!(app.hit_test(70, 5), Hit::PanelEntry(2));
    assert_eq!(app.hit_test(10, 5), Hit::Body { line: 4, column: 10 });
    assert_eq!(app.hit_test(10, 0), Hit::Chrome);
}

#[test]
fn test_left_corner_panel_is_hit_on_the_left() {
    let mut app = app(&[("notes.md", NOTES)]);
    let mut toc = controller();
    toc.set_position(Corner::TopLeft);
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    assert_eq!(app.hit_test(3, 3), Hit::PanelEntry(0));
    assert_eq!(app.hit_test(70, 3), Hit::Body { line: 2, column: 70 });
}

#[test]
fn test_source_navigation_moves_cursor_and_flashes() {
    let mut app = app(&[("notes.md", NOTES)]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);
    let start = Instant::now();

    toc.activate_entry(&mut app, 2, start);

    let view = &app.views[0];
    assert_eq!((view.editor.cursor.row, view.editor.cursor.col), (4, 0));
    assert_eq!(view.source_scroll, 4);
    let block = ElementId {
        surface: Surface::Source,
        row: 4,
    };
    assert!(view.flashing.contains(&block));

    toc.on_tick(&mut app, start + Duration::from_millis(1999));
    assert!(app.views[0].flashing.contains(&block));
    toc.on_tick(&mut app, start + Duration::from_millis(2000));
    assert!(app.views[0].flashing.is_empty());
}

#[test]
fn test_source_navigation_flashes_setext_heading() {
    let mut app = app(&[("notes.md", NOTES)]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    toc.activate_entry(&mut app, 3, Instant::now());

    let view = &app.views[0];
    assert_eq!(view.editor.cursor.row, 8);
    assert_eq!(view.source_scroll, 8);
    assert!(view.flashing.contains(&ElementId {
        surface: Surface::Source,
        row: 8,
    }));
}

#[test]
fn test_fenced_code_line_is_not_a_header() {
    let text = "```sh\n## Intro\n```\n\nfiller\n\n## Intro";
    let mut app = app(&[("notes.md", text)]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);
    let labels: Vec<String> = app.views[0]
        .panel
        .as_ref()
        .unwrap()
        .panel
        .entries
        .iter()
        .map(|e| e.label.clone())
        .collect();
    assert_eq!(labels, ["(Top)", "Intro"]);

    toc.activate_entry(&mut app, 1, Instant::now());

    let view = &app.views[0];
    assert_eq!(view.editor.cursor.row, 6);
    assert_eq!(view.source_scroll, 6);
    assert_eq!(
        view.flashing.iter().copied().collect::<Vec<_>>(),
        [ElementId {
            surface: Surface::Source,
            row: 6,
        }]
    );
    assert!(app
        .find_headers(ViewId(1), &HeaderQuery::SourceLevel(2))
        .iter()
        .all(|header| header.element.row == 6));
}

#[test]
fn test_multi_line_setext_heading_folds_into_one_row() {
    let app = app(&[("notes.md", "Long\ntitle\n=====\n\nbody")]);
    let rows = app.preview_rows(&app.views[0]);

    assert_eq!(
        rows,
        [
            PreviewRow {
                text: "Long title".to_string(),
                source_line: 0,
                level: Some(1),
            },
            PreviewRow {
                text: String::new(),
                source_line: 3,
                level: None,
            },
            PreviewRow {
                text: "body".to_string(),
                source_line: 4,
                level: None,
            },
        ]
    );
}

#[test]
fn test_hiding_header_replaces_panel_at_the_top() {
    let mut app = app(&[("notes.md", NOTES)]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    app.toggle_header();
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    let mounted = app.views[0].panel.as_ref().unwrap();
    assert_eq!(mounted.placement.unwrap().top, Some(TopOffset::NoHeader));
    assert_eq!(app.hit_test(70, 1), Hit::PanelTitle);
}

#[test]
fn test_preview_navigation_scrolls_and_flashes() {
    let mut app = app(&[("notes.md", NOTES)]);
    app.toggle_mode();
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    toc.activate_entry(&mut app, 3, Instant::now());

    let view = &app.views[0];
    assert_eq!(view.preview_scroll, 8);
    assert!(view.flashing.contains(&ElementId {
        surface: Surface::Preview,
        row: 8,
    }));
}

#[test]
fn test_top_entry_resets_both_scrolls() {
    let mut app = app(&[("notes.md", NOTES)]);
    app.views[0].source_scroll = 6;
    app.views[0].preview_scroll = 5;
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    toc.activate_entry(&mut app, 0, Instant::now());

    assert_eq!(app.views[0].source_scroll, 0);
    assert_eq!(app.views[0].preview_scroll, 0);
}

#[test]
fn test_apply_scroll_lands_on_first_row_at_or_after_line() {
    let mut app = app(&[("notes.md", NOTES)]);
    app.apply_scroll(ViewId(1), 9);
    assert_eq!(app.views[0].preview_scroll, 9, "source line 10 renders on row 9");
    app.apply_scroll(ViewId(1), 100);
    assert_eq!(app.views[0].preview_scroll, 10);
}

#[test]
fn test_find_headers_by_surface() {
    let app = app(&[("notes.md", NOTES)]);

    let source = app.find_headers(ViewId(1), &HeaderQuery::SourceLevel(2));
    let source: Vec<(usize, &str)> = source
        .iter()
        .map(|header| (header.element.row, header.text.as_str()))
        .collect();
    assert_eq!(source, [(4, "Setup"), (8, "Usage")]);

    let preview = app.find_headers(
        ViewId(1),
        &HeaderQuery::PreviewHeading {
            level: 2,
            text: "Usage".to_string(),
        },
    );
    assert_eq!(preview.len(), 1);
    assert_eq!(preview[0].element.row, 8);

    assert!(app
        .find_headers(ViewId(9), &HeaderQuery::SourceLevel(1))
        .is_empty());
}

#[test]
fn test_flashing_ignores_rows_past_the_end() {
    let mut app = app(&[("notes.md", NOTES)]);
    let past_end = ElementId {
        surface: Surface::Source,
        row: 500,
    };
    app.set_flashing(ViewId(1), past_end, true);
    assert!(app.views[0].flashing.is_empty());
}

#[test]
fn test_switching_views_moves_the_panel() {
    let mut app = app(&[("a.md", "# Alpha"), ("b.md", "# Beta\n\n## Gamma")]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);
    assert!(app.views[0].panel.is_some());

    app.next_view();
    toc.on_trigger(&mut app, &TriggerEvent::ActiveViewChanged);

    assert!(app.views[0].panel.is_none());
    let mounted = app.views[1].panel.as_ref().unwrap();
    assert_eq!(mounted.panel.entries[1].label, "Beta");
    assert_eq!(mounted.panel.entries.len(), 3);
}

#[test]
fn test_preferences_take_focus_from_views() {
    let mut app = app(&[("notes.md", NOTES)]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    app.toggle_preferences();
    assert!(app.active_view().is_none());
    assert!(!toc.on_trigger(&mut app, &TriggerEvent::ActiveViewChanged));
    assert!(app.views[0].panel.is_none());

    app.toggle_preferences();
    assert!(toc.on_trigger(&mut app, &TriggerEvent::ActiveViewChanged));
}

#[test]
fn test_editing_refreshes_metadata() {
    let mut app = app(&[("notes.md", "# One")]);
    let mut toc = controller();
    toc.on_trigger(&mut app, &TriggerEvent::Click);

    app.views[0].editor = EditorState::new(Lines::from("# One\n\n## Two"));
    let document = app.refresh_active_metadata().unwrap();
    toc.on_trigger(&mut app, &TriggerEvent::MetadataChanged(document));

    let mounted = app.views[0].panel.as_ref().unwrap();
    assert_eq!(mounted.panel.entries.len(), 3);
    assert_eq!(app.mode(ViewId(1)), Some(ViewMode::Source));
}
