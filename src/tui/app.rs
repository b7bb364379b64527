use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::api::{Api, MoveTarget, Snapshot, demo::DemoApi};
use crate::cli::Cli;
use crate::io::config_io::load_config;
use crate::io::state::{UiState, read_ui_state, write_ui_state};
use crate::model::{Config, Section};
use crate::store::{EntityStore, ViewFilter};

use super::cursor::CursorState;
use super::mutation::{BatchOutcome, UndoRecord};
use super::projection::{GroupMode, Projection, project};
use super::theme::Theme;
use super::{input, render};

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    Select,
    MovePick,
}

/// Message from a background unit of work back to the control loop.
/// Background tasks never touch shared state directly; everything funnels
/// through this channel and is applied by the control loop.
#[derive(Debug)]
pub enum AppEvent {
    SyncLoaded(Snapshot),
    SyncFailed(String),
    BatchSettled(BatchOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Syncing,
}

/// Requested startup tab, resolved once the first sync lands.
#[derive(Debug, Clone)]
pub enum Focus {
    ProjectName(String),
    ProjectId(String),
    Label(String),
}

/// One row of the move-target picker.
#[derive(Debug, Clone)]
pub struct MoveChoice {
    pub label: String,
    pub target: MoveTarget,
}

/// State of the move-target picker overlay.
#[derive(Debug, Clone, Default)]
pub struct MovePicker {
    pub choices: Vec<MoveChoice>,
    pub cursor: usize,
}

/// Main application state
pub struct App<A: Api> {
    pub store: EntityStore,
    pub config: Config,
    pub theme: Theme,
    pub api: Arc<A>,
    pub handle: tokio::runtime::Handle,
    pub events_tx: mpsc::UnboundedSender<AppEvent>,
    pub events_rx: mpsc::UnboundedReceiver<AppEvent>,

    /// Filter tabs: Today, then one per project, plus any label tabs.
    pub tabs: Vec<ViewFilter>,
    pub tab_idx: usize,
    pub group_mode: GroupMode,
    pub projection: Projection,
    pub cursor: CursorState,

    pub mode: Mode,
    pub move_picker: Option<MovePicker>,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub sync_state: SyncState,
    pub undo: Option<UndoRecord>,
    /// First `d` arms deletion; the second confirms.
    pub pending_delete: bool,
    pub show_help: bool,
    pub should_quit: bool,
    /// Startup tab request (CLI flag or saved state), applied on first sync.
    pub initial_focus: Option<Focus>,
    /// Content rows available to the task list; set during render.
    pub list_height: usize,
}

impl<A: Api> App<A> {
    pub fn new(config: Config, api: Arc<A>, handle: tokio::runtime::Handle) -> Self {
        let theme = Theme::from_config(&config.ui);
        let group_mode = config
            .ui
            .default_grouping
            .as_deref()
            .and_then(GroupMode::from_name)
            .unwrap_or_default();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        App {
            store: EntityStore::new(),
            config,
            theme,
            api,
            handle,
            events_tx,
            events_rx,
            tabs: vec![ViewFilter::Today],
            tab_idx: 0,
            group_mode,
            projection: Projection::default(),
            cursor: CursorState::default(),
            mode: Mode::Navigate,
            move_picker: None,
            status_message: None,
            status_is_error: false,
            sync_state: SyncState::Idle,
            undo: None,
            pending_delete: false,
            show_help: false,
            should_quit: false,
            initial_focus: None,
            list_height: 0,
        }
    }

    /// The active view filter.
    pub fn filter(&self) -> &ViewFilter {
        static DEFAULT: ViewFilter = ViewFilter::Today;
        self.tabs.get(self.tab_idx).unwrap_or(&DEFAULT)
    }

    /// Sections relevant to the projection: the active project's sections,
    /// in ascending order. Empty outside a project tab.
    pub fn active_sections(&self) -> Vec<&Section> {
        match self.filter() {
            ViewFilter::Project(id) => self.store.catalog.sections_of(id),
            _ => Vec::new(),
        }
    }

    /// Rebuild the ordered display sequence from the current view and
    /// restore the cursor onto the task it was on ("sticky cursor").
    pub fn reproject(&mut self) {
        let prev_id = self
            .cursor
            .resolve_current(&self.projection, self.store.view())
            .map(|t| t.id.clone());
        let projection = {
            let sections = self.active_sections();
            project(
                self.store.view(),
                &sections,
                self.group_mode,
                Local::now().date_naive(),
                Local::now(),
            )
        };
        self.projection = projection;
        self.cursor
            .restore(&self.projection, self.store.view(), prev_id.as_deref());
    }

    /// Reapply the active filter and rebuild the projection.
    pub fn refilter(&mut self) {
        let filter = self.filter().clone();
        self.store
            .apply_filter(&filter, Local::now().date_naive(), Local::now());
        self.reproject();
    }

    /// Rebuild the tab list from the catalog, keeping the current tab when
    /// it still exists and honoring a pending startup focus.
    pub fn rebuild_tabs(&mut self) {
        let current = self.tabs.get(self.tab_idx).cloned();
        let label_tabs: Vec<ViewFilter> = self
            .tabs
            .iter()
            .filter(|f| matches!(f, ViewFilter::Label(_)))
            .cloned()
            .collect();

        let mut tabs = vec![ViewFilter::Today];
        tabs.extend(
            self.store
                .catalog
                .projects()
                .map(|p| ViewFilter::Project(p.id.clone())),
        );
        tabs.extend(label_tabs);

        let mut idx = match &current {
            Some(filter) => tabs.iter().position(|f| f == filter).unwrap_or(0),
            None => 0,
        };
        if let Some(focus) = self.initial_focus.take() {
            match focus {
                Focus::ProjectName(name) => {
                    if let Some(i) = tabs.iter().position(|f| {
                        matches!(f, ViewFilter::Project(id)
                            if self.store.catalog.project_name(id) == name)
                    }) {
                        idx = i;
                    } else {
                        self.set_error(format!("No project named '{name}'"));
                    }
                }
                Focus::ProjectId(id) => {
                    if let Some(i) = tabs
                        .iter()
                        .position(|f| matches!(f, ViewFilter::Project(p) if *p == id))
                    {
                        idx = i;
                    }
                }
                Focus::Label(name) => {
                    let filter = ViewFilter::Label(name);
                    idx = match tabs.iter().position(|f| *f == filter) {
                        Some(i) => i,
                        None => {
                            tabs.push(filter);
                            tabs.len() - 1
                        }
                    };
                }
            }
        }
        self.tabs = tabs;
        self.tab_idx = idx;
    }

    pub fn next_tab(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        self.tab_idx = (self.tab_idx + 1) % self.tabs.len();
        self.refilter();
    }

    pub fn prev_tab(&mut self) {
        if self.tabs.is_empty() {
            return;
        }
        self.tab_idx = (self.tab_idx + self.tabs.len() - 1) % self.tabs.len();
        self.refilter();
    }

    pub fn cycle_grouping(&mut self) {
        self.group_mode = self.group_mode.cycled();
        self.reproject();
        self.set_status(format!("Grouping: {}", self.group_mode.label()));
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    /// Kick off a full resynchronization. Concurrent syncs are allowed; the
    /// last snapshot to arrive wins.
    pub fn start_sync(&mut self) {
        self.sync_state = SyncState::Syncing;
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        self.handle.spawn(async move {
            match api.fetch_snapshot().await {
                Ok(snapshot) => {
                    let _ = tx.send(AppEvent::SyncLoaded(snapshot));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::SyncFailed(e.to_string()));
                }
            }
        });
    }

    /// Apply one background event on the control loop.
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SyncLoaded(snapshot) => {
                info!("sync loaded: {} tasks", snapshot.tasks.len());
                self.store.load_snapshot(snapshot);
                self.sync_state = SyncState::Idle;
                self.rebuild_tabs();
                self.refilter();
            }
            AppEvent::SyncFailed(err) => {
                warn!("sync failed: {err}");
                self.sync_state = SyncState::Idle;
                self.set_error(format!("Sync failed: {err}"));
            }
            AppEvent::BatchSettled(outcome) => {
                if outcome.failed > 0 {
                    self.set_error(outcome.message());
                } else {
                    self.set_status(outcome.message());
                }
                // Any failure abandons partial correctness: one full resync
                // restores consistency. Undo resyncs even on success so the
                // reverted task reappears.
                if outcome.failed > 0 || outcome.is_undo {
                    self.start_sync();
                }
            }
        }
    }

    /// Drain all pending background events without blocking.
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Build the move-picker rows: every project, then each of its sections.
    pub fn build_move_choices(&self) -> Vec<MoveChoice> {
        let mut choices = Vec::new();
        for project in self.store.catalog.projects() {
            choices.push(MoveChoice {
                label: project.name.clone(),
                target: MoveTarget {
                    project_id: project.id.clone(),
                    section_id: None,
                },
            });
            for section in self.store.catalog.sections_of(&project.id) {
                choices.push(MoveChoice {
                    label: format!("{} / {}", project.name, section.name),
                    target: MoveTarget {
                        project_id: project.id.clone(),
                        section_id: Some(section.id.clone()),
                    },
                });
            }
        }
        choices
    }
}

/// Restore saved UI state (grouping, last tab) unless the CLI overrode it.
fn restore_ui_state<A: Api>(app: &mut App<A>, cli: &Cli) {
    let Some(state) = read_ui_state() else {
        return;
    };
    if cli.group.is_none()
        && app.config.ui.default_grouping.is_none()
        && let Some(mode) = state.grouping.as_deref().and_then(GroupMode::from_name)
    {
        app.group_mode = mode;
    }
    if app.initial_focus.is_none()
        && let Some(tab) = state.tab.as_deref()
    {
        if let Some(id) = tab.strip_prefix("project:") {
            app.initial_focus = Some(Focus::ProjectId(id.to_string()));
        } else if let Some(name) = tab.strip_prefix("label:") {
            app.initial_focus = Some(Focus::Label(name.to_string()));
        }
    }
}

/// Save UI state for the next launch.
fn save_ui_state<A: Api>(app: &App<A>) {
    let tab = match app.filter() {
        ViewFilter::Today => "today".to_string(),
        ViewFilter::Project(id) => format!("project:{id}"),
        ViewFilter::Label(name) => format!("label:{name}"),
    };
    write_ui_state(&UiState {
        grouping: Some(app.group_mode.label().to_string()),
        tab: Some(tab),
    });
}

/// Run the TUI application
pub fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    let runtime = tokio::runtime::Runtime::new()?;
    let api = Arc::new(DemoApi::new());

    let mut app = App::new(config, api, runtime.handle().clone());
    if let Some(name) = &cli.project {
        app.initial_focus = Some(Focus::ProjectName(name.clone()));
    } else if let Some(name) = &cli.label {
        app.initial_focus = Some(Focus::Label(name.clone()));
    }
    if let Some(mode) = cli.group.as_deref().and_then(GroupMode::from_name) {
        app.group_mode = mode;
    }
    restore_ui_state(&mut app, cli);

    // First load kicks off before the terminal is even up.
    app.start_sync();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    save_ui_state(&app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<A: Api>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<A>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        // The control loop never blocks on I/O: input is polled with a
        // timeout and background outcomes are drained non-blockingly.
        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }
        app.drain_events();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
