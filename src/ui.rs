//! The UI renders the application state into something visible and clickable.
//!
//! Layout is computed once per frame by [`screen_layout`] and shared with hit testing, so what
//! the user clicks is exactly what was drawn. The panel's rectangle is derived from its
//! placement directives here, at the rendering boundary.

use crate::app_state::{AppState, DocumentView, MountedPanel};
use crate::geometry::{BottomOffset, Bounds, HorizontalHalf, Placement, TopOffset};
use crate::heading::HeadingDescriptor;
use crate::host::{ElementId, MetadataProvider, Surface, ViewMode};
use crate::panel::{ContentState, EntryTarget, Panel, PanelEntry};
use crate::preferences::{self, PreferenceValue};
use crate::settings::Settings;
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Rows taken by a view's header bar.
pub const HEADER_HEIGHT: u16 = 1;
/// Rows taken by the status bar.
pub const STATUS_BAR_HEIGHT: u16 = 1;
/// Widest the panel grows, borders included.
pub const MAX_PANEL_WIDTH: u16 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where each piece of chrome sits in the window.
pub struct ScreenLayout {
    /// The active view's container; the panel is placed inside it.
    pub container: Rect,
    /// The view's header bar, when shown.
    pub header: Option<Rect>,
    /// Text area of the view.
    pub body: Rect,
    /// Status bar, right-aligned on the last row.
    pub status_bar: Rect,
}

fn text_width(text: &str) -> u16 {
    u16::try_from(Span::raw(text).width()).unwrap_or(u16::MAX)
}

#[must_use]
/// Lays out header, body and status bar over `area`.
pub fn screen_layout(area: Rect, show_header: bool, status_text: &str) -> ScreenLayout {
    let header_height = if show_header {
        HEADER_HEIGHT.min(area.height)
    } else {
        0
    };
    let status_height = STATUS_BAR_HEIGHT.min(area.height.saturating_sub(header_height));
    let status_width = text_width(status_text).min(area.width);

    ScreenLayout {
        container: area,
        header: show_header.then(|| Rect::new(area.x, area.y, area.width, header_height)),
        body: Rect::new(
            area.x,
            area.y + header_height,
            area.width,
            area.height.saturating_sub(header_height + status_height),
        ),
        status_bar: Rect::new(
            area.right().saturating_sub(status_width),
            area.bottom().saturating_sub(status_height),
            status_width,
            status_height,
        ),
    }
}

#[must_use]
/// Converts a terminal rectangle into layout bounds.
pub fn bounds(rect: Rect) -> Bounds {
    Bounds::from_origin(
        i32::from(rect.x),
        i32::from(rect.y),
        i32::from(rect.width),
        i32::from(rect.height),
    )
}

fn entry_width(entry: &PanelEntry) -> usize {
    entry.indent_width() + Span::raw(entry.label.as_str()).width()
}

#[must_use]
/// Natural width and height of a panel, borders included.
pub fn panel_size(panel: &Panel) -> (u16, u16) {
    match panel.content {
        ContentState::Collapsed => (text_width(panel.icon) + 2, 3),
        ContentState::Expanded => {
            let title = text_width(panel.icon) + 1 + text_width(panel.title);
            let entries = panel.entries.iter().map(entry_width).max().unwrap_or(0);
            let inner = u16::try_from(entries)
                .unwrap_or(u16::MAX)
                .max(title)
                .saturating_add(1);
            let height = u16::try_from(panel.entries.len())
                .unwrap_or(u16::MAX)
                .saturating_add(3);
            (inner.saturating_add(2).min(MAX_PANEL_WIDTH), height)
        }
    }
}

#[must_use]
/// Rectangle a panel occupies under `placement`, or `None` if it does not fit at all.
pub fn panel_rect_with(layout: &ScreenLayout, panel: &Panel, placement: &Placement) -> Option<Rect> {
    let container = layout.container;
    let (width, natural) = panel_size(panel);
    let width = width.min(container.width.saturating_sub(2));

    let top = placement.top.map(|offset| match offset {
        TopOffset::NoHeader => container.y,
        TopOffset::Header => container.y + HEADER_HEIGHT,
    });
    let bottom = placement.bottom.map(|offset| match offset {
        BottomOffset::NoStatusBar => container.bottom(),
        BottomOffset::StatusBar => container.bottom().saturating_sub(STATUS_BAR_HEIGHT),
    });

    let (y, height) = match (top, bottom) {
        (Some(top), Some(bottom)) => (top, natural.min(bottom.saturating_sub(top))),
        (Some(top), None) => (top, natural.min(container.bottom().saturating_sub(top))),
        (None, Some(bottom)) => {
            let height = natural.min(bottom.saturating_sub(container.y));
            (bottom - height, height)
        }
        (None, None) => (container.y, natural.min(container.height)),
    };

    let x = match placement.horizontal {
        HorizontalHalf::Left => container.x + 1,
        HorizontalHalf::Right => container.right().saturating_sub(width + 1),
    };

    (width >= 3 && height >= 3).then(|| Rect::new(x, y, width, height))
}

#[must_use]
/// Rectangle of a mounted panel, once it has been placed.
pub fn panel_rect(layout: &ScreenLayout, mounted: &MountedPanel) -> Option<Rect> {
    panel_rect_with(layout, &mounted.panel, mounted.placement.as_ref()?)
}

fn heading_style(level: u8) -> Style {
    let color = match level {
        1 => Color::Magenta,
        2 => Color::Cyan,
        3 => Color::Green,
        4 => Color::Yellow,
        _ => Color::Blue,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn flash_style() -> Style {
    Style::default().bg(Color::Rgb(90, 80, 20))
}

/// Renders the whole window for the current state.
pub fn draw(f: &mut Frame, app: &mut AppState, settings: &Settings) {
    app.area = f.area();
    let layout = app.layout();

    if let Some(view) = app.views.get(app.active) {
        if let Some(header) = layout.header {
            draw_header(f, header, view, app.active, app.views.len());
        }
        match view.mode {
            ViewMode::Source => {
                let headings = app.metadata.headings(&view.document).unwrap_or_default();
                draw_source(f, layout.body, view, headings, app.preferences.is_none());
            }
            ViewMode::Preview => draw_preview(f, layout.body, app, view),
        }
        if let Some(mounted) = &view.panel {
            draw_panel(f, &layout, mounted);
        }
    }

    let status = Paragraph::new(app.status_text())
        .style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_widget(status, layout.status_bar);

    if let Some(pane) = &app.preferences {
        draw_preferences(f, layout.container, pane.selected, settings);
    }
}

fn draw_header(f: &mut Frame, area: Rect, view: &DocumentView, index: usize, total: usize) {
    let mode = match view.mode {
        ViewMode::Source => "editing",
        ViewMode::Preview => "reading",
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", view.title()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("[{mode}] ({}/{total})", index + 1)),
    ]);
    let header = Paragraph::new(line).style(Style::default().bg(Color::DarkGray));
    f.render_widget(header, area);
}

fn draw_source(
    f: &mut Frame,
    area: Rect,
    view: &DocumentView,
    headings: &[HeadingDescriptor],
    show_cursor: bool,
) {
    let lines = view.source_lines();
    let rows: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(view.source_scroll)
        .take(usize::from(area.height))
        .map(|(row, text)| {
            let heading = headings.iter().find(|h| h.covers(row));
            let mut style = heading.map_or_else(Style::default, |h| heading_style(h.level));
            // A flashed heading lights up over all of its lines.
            let block = ElementId {
                surface: Surface::Source,
                row: heading.map_or(row, |h| h.start_line),
            };
            if view.flashing.contains(&block) {
                style = style.patch(flash_style());
            }
            Line::styled(text.clone(), style)
        })
        .collect();
    f.render_widget(Paragraph::new(rows), area);

    let cursor = view.editor.cursor;
    if show_cursor && cursor.row >= view.source_scroll {
        let row = cursor.row - view.source_scroll;
        if let (Ok(row), Ok(col)) = (u16::try_from(row), u16::try_from(cursor.col)) {
            if row < area.height && col < area.width {
                f.set_cursor_position(Position::new(area.x + col, area.y + row));
            }
        }
    }
}

fn draw_preview(f: &mut Frame, area: Rect, app: &AppState, view: &DocumentView) {
    let rows: Vec<Line> = app
        .preview_rows(view)
        .into_iter()
        .enumerate()
        .skip(view.preview_scroll)
        .take(usize::from(area.height))
        .map(|(row, preview_row)| {
            let mut style = preview_row.level.map_or_else(Style::default, heading_style);
            let element = ElementId {
                surface: Surface::Preview,
                row,
            };
            if view.flashing.contains(&element) {
                style = style.patch(flash_style());
            }
            Line::styled(preview_row.text, style)
        })
        .collect();
    f.render_widget(Paragraph::new(rows), area);
}

fn entry_line(entry: &PanelEntry) -> Line<'_> {
    let style = match entry.target {
        EntryTarget::Top => Style::default().add_modifier(Modifier::ITALIC),
        EntryTarget::Heading(_) if entry.level == 1 => {
            Style::default().add_modifier(Modifier::BOLD)
        }
        EntryTarget::Heading(_) => Style::default(),
    };
    Line::from(vec![
        Span::raw(" ".repeat(entry.indent_width())),
        Span::styled(entry.label.as_str(), style),
    ])
}

fn draw_panel(f: &mut Frame, layout: &ScreenLayout, mounted: &MountedPanel) {
    let Some(rect) = panel_rect(layout, mounted) else {
        return;
    };
    let panel = &mounted.panel;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(rect);
    f.render_widget(Clear, rect);
    f.render_widget(block, rect);

    let mut lines = Vec::with_capacity(panel.entries.len() + 1);
    match panel.content {
        ContentState::Expanded => {
            lines.push(Line::from(vec![
                Span::raw(panel.icon),
                Span::raw(" "),
                Span::styled(panel.title, Style::default().add_modifier(Modifier::BOLD)),
            ]));
            lines.extend(panel.entries.iter().skip(mounted.scroll).map(entry_line));
        }
        ContentState::Collapsed => lines.push(Line::from(panel.icon)),
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn draw_preferences(f: &mut Frame, area: Rect, selected: usize, settings: &Settings) {
    let rect = centered(area, 64, 8);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Floating ToC settings");
    let inner = block.inner(rect);
    f.render_widget(Clear, rect);
    f.render_widget(block, rect);

    let mut lines = Vec::new();
    for (index, item) in preferences::items(settings).iter().enumerate() {
        let value = match &item.value {
            PreferenceValue::Toggle(on) => (if *on { "[x]" } else { "[ ]" }).to_string(),
            PreferenceValue::Dropdown { options, selected } => {
                format!("< {} >", options.get(*selected).copied().unwrap_or_default())
            }
        };
        let style = if index == selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!(" {:<10}{:<18}", item.name, value),
            style,
        ));
        lines.push(Line::styled(
            format!("   {}", item.description),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(" ↑/↓: Select | ←/→/Enter: Change | Esc: Close"));
    f.render_widget(Paragraph::new(lines), inner);
}
