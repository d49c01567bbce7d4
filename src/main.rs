use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use dino_run::build_info;
use dino_run::config::{CliOverrides, Config};
use dino_run::game::{
    GameOverAction, GameSession, ObstacleCatalog, SessionPhase, TickOutcome, Viewport,
};
use dino_run::leaderboard::protocol::MAX_QUOTE_CHARS;
use dino_run::leaderboard::{HttpScoreClient, ScoreService, ScoreState};
use dino_run::logging;
use dino_run::ui::canvas::TerminalCanvas;
use dino_run::ui::prompt_screen::PromptScreen;
use dino_run::ui::run_scene;
use ratatui::backend::Backend;
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

enum Command {
    Play(CliOverrides),
    Version,
    Help,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut overrides = CliOverrides::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} needs a value", flag))
        };
        match arg.as_str() {
            "--version" | "-v" => return Ok(Command::Version),
            "--help" | "-h" => return Ok(Command::Help),
            "--server" => overrides.server_url = Some(value("--server")?),
            "--player" => overrides.player_key = Some(value("--player")?),
            "--name" => overrides.display_name = Some(value("--name")?),
            "--catalog" => overrides.catalog_path = Some(PathBuf::from(value("--catalog")?)),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(Command::Play(overrides))
}

fn print_help() {
    println!("Dino Run - terminal endless runner\n");
    println!("Usage: dino-run [options]\n");
    println!("Options:");
    println!("  --server <url>     Score server (default http://localhost:3000, env DINO_RUN_SERVER)");
    println!("  --player <key>     Player key; skips the key prompt");
    println!("  --name <name>      Display name; skips the name prompt");
    println!("  --catalog <path>   Obstacle catalog JSON file");
    println!("  --version          Show version information");
    println!("  --help             Show this help message");
}

enum Screen {
    PlayerKey,
    DisplayName,
    Running,
    Quote,
    GameOver,
}

struct App {
    config: Config,
    catalog: ObstacleCatalog,
    service: ScoreService,
    screen: Screen,
    key_prompt: PromptScreen,
    name_prompt: PromptScreen,
    quote_prompt: PromptScreen,
    session: Option<GameSession>,
    canvas: TerminalCanvas,
    clock: Instant,
    crowned: bool,
    should_quit: bool,
}

impl App {
    fn new(config: Config, catalog: ObstacleCatalog, skip_key: bool, skip_name: bool) -> Self {
        let client = HttpScoreClient::new(&config.server_url, config.request_timeout());
        let key_prompt = PromptScreen::new("Dino Run", "Player key:")
            .with_hint("Identifies your scores on the leaderboard")
            .with_initial(&config.player_key);
        let name_prompt = PromptScreen::new("Dino Run", "Display name:")
            .with_hint("Shown on the leaderboard; leave empty to use your key")
            .allow_empty()
            .with_initial(&config.display_name);
        let screen = match (skip_key, skip_name) {
            (true, true) => Screen::Running,
            (true, false) => Screen::DisplayName,
            _ => Screen::PlayerKey,
        };
        Self {
            config,
            catalog,
            service: ScoreService::new(Arc::new(client)),
            screen,
            key_prompt,
            name_prompt,
            quote_prompt: quote_prompt(),
            session: None,
            canvas: TerminalCanvas::new(0, 0, Viewport::default()),
            clock: Instant::now(),
            crowned: false,
            should_quit: false,
        }
    }

    fn now_ms(&self) -> f64 {
        self.clock.elapsed().as_secs_f64() * 1000.0
    }

    fn start_session(&mut self) -> io::Result<()> {
        let scores = match &self.session {
            Some(previous) => previous.scores().next_session(),
            None => ScoreState::new(self.key_prompt.value(), self.name_prompt.value()),
        };
        let player_key = scores.player_key.clone();
        let mut session = GameSession::new(Viewport::default(), self.catalog.clone(), scores)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?
            .with_max_frame_dt(self.config.max_frame_dt_ms);

        self.service.request_profile(&player_key);
        session.start(self.now_ms());
        self.session = Some(session);
        self.crowned = false;
        self.quote_prompt = quote_prompt();
        self.screen = Screen::Running;
        Ok(())
    }

    fn remember_player(&mut self) {
        let key = self.key_prompt.value();
        let name = self.name_prompt.value();
        if let Err(e) = self.config.remember_player(&key, &name) {
            log::warn!("could not save config: {}", e);
        }
    }

    /// Fold finished background requests into the current session.
    fn poll_scores(&mut self) {
        while let Some(event) = self.service.try_next() {
            if let Some(session) = self.session.as_mut() {
                session.apply_score_event(event);
            }
        }
    }

    fn tick(&mut self, play_field: (u16, u16)) {
        let now = self.now_ms();
        let Some(session) = self.session.as_mut() else {
            return;
        };
        self.canvas.resize(play_field.0, play_field.1);
        if let TickOutcome::GameOver { score } = session.tick(now, &mut self.canvas) {
            log::info!("game over with score {}", score);
            self.on_game_over();
        }
    }

    fn on_game_over(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.finish() {
            Some(GameOverAction::Send(submission)) => {
                self.service.request_submit(submission);
                self.screen = Screen::GameOver;
            }
            Some(GameOverAction::AskForQuote) => {
                self.crowned = true;
                self.screen = Screen::Quote;
            }
            Some(GameOverAction::Nothing) | None => self.screen = Screen::GameOver,
        }
    }

    fn submit_quote(&mut self) {
        let quote = self.quote_prompt.value();
        if let Some(submission) = self.session.as_mut().and_then(|s| s.submit_with_quote(&quote)) {
            self.service.request_submit(submission);
        }
        self.screen = Screen::GameOver;
    }

    fn handle_key(&mut self, code: KeyCode) -> io::Result<()> {
        match self.screen {
            Screen::PlayerKey => match code {
                KeyCode::Char(c) => self.key_prompt.handle_char_input(c),
                KeyCode::Backspace => self.key_prompt.handle_backspace(),
                KeyCode::Left => self.key_prompt.move_cursor_left(),
                KeyCode::Right => self.key_prompt.move_cursor_right(),
                KeyCode::Enter => {
                    self.key_prompt.validate();
                    if self.key_prompt.is_valid() {
                        self.screen = Screen::DisplayName;
                    }
                }
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
            Screen::DisplayName => match code {
                KeyCode::Char(c) => self.name_prompt.handle_char_input(c),
                KeyCode::Backspace => self.name_prompt.handle_backspace(),
                KeyCode::Left => self.name_prompt.move_cursor_left(),
                KeyCode::Right => self.name_prompt.move_cursor_right(),
                KeyCode::Enter => {
                    self.remember_player();
                    self.start_session()?;
                }
                KeyCode::Esc => self.screen = Screen::PlayerKey,
                _ => {}
            },
            Screen::Running => match code {
                KeyCode::Char(' ') | KeyCode::Up => {
                    if let Some(session) = self.session.as_mut() {
                        session.jump();
                    }
                }
                KeyCode::Esc => {
                    if let Some(session) = self.session.as_mut() {
                        session.teardown();
                    }
                    self.should_quit = true;
                }
                _ => {}
            },
            Screen::Quote => match code {
                KeyCode::Char(c) => self.quote_prompt.handle_char_input(c),
                KeyCode::Backspace => self.quote_prompt.handle_backspace(),
                KeyCode::Left => self.quote_prompt.move_cursor_left(),
                KeyCode::Right => self.quote_prompt.move_cursor_right(),
                KeyCode::Enter => self.submit_quote(),
                KeyCode::Esc => {
                    // The record still counts without a quote
                    self.quote_prompt.set_input("");
                    self.submit_quote();
                }
                _ => {}
            },
            Screen::GameOver => match code {
                KeyCode::Enter => self.start_session()?,
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let area = frame.size();
        match self.screen {
            Screen::PlayerKey => self.key_prompt.draw(frame, area),
            Screen::DisplayName => self.name_prompt.draw(frame, area),
            Screen::Quote => self.quote_prompt.draw(frame, area),
            Screen::Running | Screen::GameOver => {
                let Some(session) = &self.session else {
                    return;
                };
                if session.phase() == SessionPhase::GameOver {
                    run_scene::render_game_over(
                        frame,
                        area,
                        session.difficulty().score,
                        self.crowned,
                        session.scores(),
                    );
                } else {
                    run_scene::render_run_scene(
                        frame,
                        area,
                        &self.canvas,
                        session.difficulty(),
                        session.scores(),
                    );
                }
            }
        }
    }
}

fn quote_prompt() -> PromptScreen {
    PromptScreen::new("New leader!", "Your quote:")
        .with_hint("You beat the top score. Leave a message for the next runner.")
        .with_max_chars(MAX_QUOTE_CHARS)
        .allow_empty()
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    if matches!(app.screen, Screen::Running) {
        app.start_session()?;
    }

    while !app.should_quit {
        app.poll_scores();

        if matches!(app.screen, Screen::Running) {
            let size = terminal.size()?;
            app.tick(run_scene::play_field_size(size));
        }

        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(app.config.frame_interval())? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    app.handle_key(key_event.code)?;
                }
            }
        }
    }
    Ok(())
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let overrides = match parse_args(&args) {
        Ok(Command::Play(overrides)) => overrides,
        Ok(Command::Version) => {
            println!("{}", build_info::version_line("dino-run"));
            std::process::exit(0);
        }
        Ok(Command::Help) => {
            print_help();
            std::process::exit(0);
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'dino-run --help' for usage.");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_client_logger() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let skip_key = overrides.player_key.is_some();
    let skip_name = skip_key && overrides.display_name.is_some();
    let mut config = Config::load();
    config.apply_cli(overrides);
    log::info!(
        "dino-run {} starting, score server {}",
        build_info::BUILD_COMMIT,
        config.server_url
    );

    let catalog = match &config.catalog_path {
        Some(path) => ObstacleCatalog::load(path),
        None => ObstacleCatalog::builtin(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("cannot start: {}", e);
            eprintln!("Cannot start: {}", e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(config, catalog, skip_key, skip_name);
    if skip_name {
        app.remember_player();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        log::error!("exiting on error: {}", e);
    }
    result
}
