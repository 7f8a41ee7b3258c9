//! floating-toc: a markdown editor and previewer with a floating table of contents.
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use edtui::EditorEventHandler;
use floating_toc::app_state::{AppState, Hit};
use floating_toc::controller::{TocController, TriggerEvent};
use floating_toc::host::ViewMode;
use floating_toc::navigator::HeadingNavigator;
use floating_toc::settings::JsonFileStore;
use floating_toc::{config, input, ui};
use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type Controller = TocController<JsonFileStore>;

#[derive(Parser)]
#[command(name = "floating-toc")]
#[command(about = "Markdown views with a floating table of contents", long_about = None)]
struct Args {
    /// Files or directories to open
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// File extensions to match
    #[arg(long, short = 'e', value_name = "EXT")]
    ext: Vec<String>,

    /// Where panel preferences are persisted
    #[arg(long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}

fn init_logging(log_file: &Path) -> io::Result<()> {
    let file = File::create(log_file)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    if let Some(log_file) = &args.log_file {
        init_logging(log_file)?;
    }

    let mut cfg = config::Config::load();

    // Override config with command line args
    if !args.ext.is_empty() {
        cfg.file_extensions = args.ext;
    }

    let documents = input::find_documents(args.paths, &cfg.file_extensions);
    if documents.is_empty() {
        eprintln!("No matching files found");
        return Ok(());
    }

    let app = AppState::open(&documents, &cfg).map_err(io::Error::other)?;
    let store = JsonFileStore::new(args.settings.unwrap_or_else(JsonFileStore::default_path));
    info!(documents = documents.len(), settings = %store.path().display(), "starting");
    let controller = TocController::activate(store, HeadingNavigator::new(cfg.flash_duration()));

    run_tui(app, controller, &cfg)
}

fn run_tui(mut app: AppState, mut controller: Controller, cfg: &config::Config) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &mut controller, cfg);
    controller.deactivate(&mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    controller: &mut Controller,
    cfg: &config::Config,
) -> io::Result<()> {
    let mut editor_handler = EditorEventHandler::default();

    let size = terminal.size()?;
    app.area = Rect::new(0, 0, size.width, size.height);
    controller.on_trigger(app, &TriggerEvent::ActiveViewChanged);

    loop {
        terminal.draw(|f| ui::draw(f, app, controller.settings()))?;

        if event::poll(cfg.tick())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key(key, app, controller, &mut editor_handler) == Flow::Quit {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => handle_mouse(mouse, app, controller),
                Event::Resize(width, height) => app.area = Rect::new(0, 0, width, height),
                _ => {}
            }
        }

        controller.on_tick(app, Instant::now());
    }
}

fn handle_key(
    key: KeyEvent,
    app: &mut AppState,
    controller: &mut Controller,
    editor_handler: &mut EditorEventHandler,
) -> Flow {
    app.message = None;

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('o') => {
                app.toggle_preferences();
                controller.on_trigger(app, &TriggerEvent::ActiveViewChanged);
                return Flow::Continue;
            }
            _ => {}
        }
    }

    if let Some(pane) = app.preferences.as_mut() {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => pane.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => pane.select_next(),
            KeyCode::Left | KeyCode::Char('h') => pane.change(controller, -1),
            KeyCode::Right | KeyCode::Char('l' | ' ') | KeyCode::Enter => pane.change(controller, 1),
            KeyCode::Esc => {
                app.toggle_preferences();
                controller.on_trigger(app, &TriggerEvent::ActiveViewChanged);
            }
            _ => {}
        }
        return Flow::Continue;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('n') => {
                app.next_view();
                controller.on_trigger(app, &TriggerEvent::ActiveViewChanged);
                return Flow::Continue;
            }
            KeyCode::Char('p') => {
                app.prev_view();
                controller.on_trigger(app, &TriggerEvent::ActiveViewChanged);
                return Flow::Continue;
            }
            KeyCode::Char('e') => {
                app.toggle_mode();
                return Flow::Continue;
            }
            KeyCode::Char('h') => {
                app.toggle_header();
                controller.on_trigger(app, &TriggerEvent::Click);
                return Flow::Continue;
            }
            KeyCode::Char('t') => {
                controller.toggle_open();
                controller.on_trigger(app, &TriggerEvent::Click);
                return Flow::Continue;
            }
            _ => {}
        }
    }

    let Some(view) = app.views.get_mut(app.active) else {
        return Flow::Continue;
    };
    match view.mode {
        ViewMode::Source => {
            let before = view.text();
            editor_handler.on_key_event(key, &mut view.editor);
            let changed = view.text() != before;
            app.follow_cursor();
            if changed {
                if let Some(document) = app.refresh_active_metadata() {
                    controller.on_trigger(app, &TriggerEvent::MetadataChanged(document));
                }
            }
        }
        ViewMode::Preview => {
            let page = isize::try_from(app.layout().body.height).unwrap_or(1);
            match key.code {
                KeyCode::Down | KeyCode::Char('j') => app.scroll_active(1),
                KeyCode::Up | KeyCode::Char('k') => app.scroll_active(-1),
                KeyCode::PageDown | KeyCode::Char(' ') => app.scroll_active(page),
                KeyCode::PageUp => app.scroll_active(-page),
                KeyCode::Home | KeyCode::Char('g') => app.scroll_active(isize::MIN),
                KeyCode::End | KeyCode::Char('G') => app.scroll_active(isize::MAX),
                _ => {}
            }
        }
    }
    Flow::Continue
}

fn handle_mouse(mouse: MouseEvent, app: &mut AppState, controller: &mut Controller) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            match app.hit_test(mouse.column, mouse.row) {
                Hit::PanelTitle => controller.toggle_open(),
                Hit::PanelEntry(index) => controller.activate_entry(app, index, Instant::now()),
                Hit::Body { line, column } => app.click_body(line, column),
                Hit::Panel | Hit::Chrome => {}
            }
            controller.on_trigger(app, &TriggerEvent::Click);
        }
        MouseEventKind::ScrollDown => app.scroll_at(mouse.column, mouse.row, 3),
        MouseEventKind::ScrollUp => app.scroll_at(mouse.column, mouse.row, -3),
        _ => {}
    }
}
