pub mod api;
pub mod runtime;
pub mod session;
pub mod setup;
pub mod ui;

use crate::{
    api::{ApiClient, SessionSettings, DEFAULT_SERVER},
    runtime::{AppEvent, CrosstermEventSource, EventSource, TICK_RATE_MS},
    session::{Session, SessionClock, SessionPlan},
    setup::{Field, SetupForm},
    ui::preview::ImagePreview,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::{Duration, Instant},
};

/// timed reference-sketch practice tui for gesture drawing
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed reference-sketch practice TUI. Loads image categories from your own image backend, then runs drawing sessions that cycle through references with a short get-ready buffer, per-image countdowns, and pause/skip controls."
)]
pub struct Cli {
    /// base url of the image backend
    #[clap(short = 's', long, default_value_t = String::from(DEFAULT_SERVER))]
    server: String,

    /// prefill for seconds of drawing time per image
    #[clap(short = 'd', long, default_value_t = 60)]
    duration: u32,

    /// prefill for the number of images to request
    #[clap(short = 'c', long, default_value_t = 10)]
    count: u32,
}

#[derive(Debug)]
pub enum AppState {
    Setup(SetupForm),
    Session(SessionView),
    Summary,
}

/// Session screen state: the clock driving the phase machine plus the
/// decoded preview of the image it currently points at
#[derive(Debug)]
pub struct SessionView {
    pub clock: SessionClock,
    pub preview: Option<ImagePreview>,
    preview_for: Option<usize>,
}

impl SessionView {
    pub fn new(clock: SessionClock) -> Self {
        Self {
            clock,
            preview: None,
            preview_for: None,
        }
    }

    /// Fetch and decode the image at the current position, once per index.
    /// A failed fetch or decode leaves the preview empty; no retry.
    fn sync_preview(&mut self, api: &ApiClient) {
        let index = self.clock.session().current_index();
        if self.preview_for == Some(index) {
            return;
        }
        self.preview_for = Some(index);
        self.preview = api
            .fetch_image(self.clock.session().current_image())
            .ok()
            .and_then(|bytes| ImagePreview::from_bytes(&bytes));
    }
}

#[derive(Debug)]
enum KeyOutcome {
    Handled,
    Submit(SessionSettings),
    Quit,
}

/// Screen change decided while the current screen state is still borrowed
#[derive(Debug)]
enum Nav {
    Stay,
    Setup,
    Summary,
}

#[derive(Debug)]
pub struct App {
    pub api: ApiClient,
    pub state: AppState,
    pub duration_prefill: u32,
    pub count_prefill: u32,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        let api = ApiClient::new(&cli.server);
        let form = SetupForm::load(&api, cli.duration, cli.count);

        Self {
            api,
            state: AppState::Setup(form),
            duration_prefill: cli.duration,
            count_prefill: cli.count,
        }
    }

    /// Fresh setup screen with a new category fetch and the CLI prefills
    fn enter_setup(&mut self) {
        let form = SetupForm::load(&self.api, self.duration_prefill, self.count_prefill);
        self.state = AppState::Setup(form);
    }

    /// Move to the session screen. A missing plan, or one with no images,
    /// redirects to setup instead; no clock starts.
    fn enter_session(&mut self, plan: Option<SessionPlan>) {
        match plan.and_then(Session::new) {
            Some(session) => {
                let mut view = SessionView::new(SessionClock::new(session));
                view.sync_preview(&self.api);
                self.state = AppState::Session(view);
            }
            None => {
                if !matches!(self.state, AppState::Setup(_)) {
                    self.enter_setup();
                }
            }
        }
    }

    /// Run the armed session request and fold the outcome back into the
    /// form. Called after the caller has drawn one frame with the busy
    /// label, since the request blocks the loop.
    fn complete_submit(&mut self, settings: SessionSettings) {
        let result = self.api.start_session(&settings);
        let plan = match &mut self.state {
            AppState::Setup(form) => form.finish_submit(result),
            _ => None,
        };
        if plan.is_some() {
            self.enter_session(plan);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
        // ctrl+c to quit
        {
            return KeyOutcome::Quit;
        }

        let mut nav = Nav::Stay;
        let mut outcome = KeyOutcome::Handled;

        match &mut self.state {
            AppState::Setup(form) => match key.code {
                KeyCode::Esc => outcome = KeyOutcome::Quit,
                KeyCode::Tab | KeyCode::Down => form.focus_next(),
                KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
                KeyCode::Left if form.focus == Field::Category => form.select_prev_category(),
                KeyCode::Right if form.focus == Field::Category => form.select_next_category(),
                KeyCode::Backspace => form.backspace(),
                KeyCode::Enter => {
                    if let Some(settings) = form.begin_submit() {
                        outcome = KeyOutcome::Submit(settings);
                    }
                }
                KeyCode::Char('r') if form.categories.is_empty() => {
                    form.reload_categories(&self.api);
                }
                KeyCode::Char(c) => form.push_char(c),
                _ => {}
            },
            AppState::Session(view) => match key.code {
                KeyCode::Esc => nav = Nav::Setup,
                KeyCode::Char(' ') => view.clock.toggle_pause(),
                KeyCode::Right => {
                    view.clock.skip();
                    if view.clock.session().is_finished() {
                        nav = Nav::Summary;
                    } else {
                        view.sync_preview(&self.api);
                    }
                }
                _ => {}
            },
            AppState::Summary => match key.code {
                KeyCode::Esc => outcome = KeyOutcome::Quit,
                KeyCode::Char('n') | KeyCode::Enter => nav = Nav::Setup,
                _ => {}
            },
        }

        match nav {
            Nav::Stay => {}
            Nav::Setup => self.enter_setup(),
            Nav::Summary => self.state = AppState::Summary,
        }

        outcome
    }

    fn on_tick(&mut self) {
        let mut finished = false;
        if let AppState::Session(view) = &mut self.state {
            if view.clock.on_heartbeat() {
                if view.clock.session().is_finished() {
                    finished = true;
                } else {
                    view.sync_preview(&self.api);
                }
            }
        }
        if finished {
            self.state = AppState::Summary;
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // the initial category fetch happens before the terminal is taken over
    let mut app = App::new(cli);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::spawn();
    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &E,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(app, f))?;

        let event = events.next()?;
        let handled_at = Instant::now();

        match event {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::Submit(settings) => {
                            // one frame with the busy label before the
                            // blocking request
                            terminal.draw(|f| ui(app, f))?;
                            app.complete_submit(settings);
                        }
                        KeyOutcome::Handled => {}
                    }
                }
            }
        }

        // heartbeats that queued while a handler blocked on the network
        // belong to the state it replaced, not the one it produced
        if handled_at.elapsed() >= Duration::from_millis(TICK_RATE_MS) {
            events.drain_backlog();
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
