use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend as TerminalBackend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    io::{self, stdin},
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use sabio::{
    app::{App, Control, Settings},
    app_dirs::AppDirs,
    auth::{client::SupabaseAuth, gateway::AuthGateway, AuthService, DisabledAuth},
    backend::Backend,
    catalog::Catalog,
    config::{Config, ConfigStore, FileConfigStore},
    error::Result,
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    ui,
};

const TICK_RATE_MS: u64 = 100;

/// swipe through micro-lessons in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal feed of short lessons grouped into specializations. Navigate with the arrow keys, mouse drag or the scroll wheel, open each lesson's supplementary materials and sign in to see your learning statistics."
)]
pub struct Cli {
    /// base url of the hosted auth/database service (overrides SABIO_API_URL)
    #[clap(long)]
    api_url: Option<String>,

    /// public project key of the hosted service (overrides SABIO_ANON_KEY)
    #[clap(long)]
    anon_key: Option<String>,

    /// lesson catalog JSON to load instead of the bundled demo
    #[clap(short = 'c', long)]
    catalog: Option<PathBuf>,

    /// delay before moving on after a lesson is completed
    #[clap(long)]
    auto_advance_ms: Option<u64>,

    /// log level for the log file (RUST_LOG takes precedence)
    #[clap(long)]
    log_level: Option<String>,

    /// persist the effective settings to the config file
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Flags win over the environment, which wins over the config file
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(url) = &self.api_url {
            cfg.api_url = Some(url.clone());
        }
        if let Some(key) = &self.anon_key {
            cfg.anon_key = Some(key.clone());
        }
        if let Some(ms) = self.auto_advance_ms {
            cfg.auto_advance_ms = ms;
        }
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        cfg
    }
}

fn auth_service(cfg: &Config) -> Arc<dyn AuthService> {
    let Some((url, key)) = cfg.backend() else {
        tracing::info!("no backend configured, authentication disabled");
        return Arc::new(DisabledAuth::new());
    };

    match Backend::new(url, key) {
        Ok(backend) => {
            tracing::info!(url, "using hosted backend");
            Arc::new(SupabaseAuth::new(backend))
        }
        Err(err) => {
            tracing::warn!(%err, "could not build http client, authentication disabled");
            Arc::new(DisabledAuth::new())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let cfg = cli.apply(store.load().with_env(|key| std::env::var(key).ok()));
    if cli.save_config {
        store.save(&cfg)?;
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(err) = logging::init(&path, &cfg.log_level) {
            eprintln!("sabio: logging disabled: {err}");
        }
    }

    let catalog = match &cli.catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::demo()?,
    };

    let gateway = AuthGateway::new(auth_service(&cfg));
    let mut app = App::new(catalog, gateway, Settings::from(&cfg));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: TerminalBackend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let mut last_tick = Instant::now();

    loop {
        let size = terminal.size()?;
        app.set_viewport(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|f| ui::draw(app, f))?;

        let event = runner.step();
        let now = Instant::now();
        let is_tick = matches!(event, AppEvent::Tick);

        if app.handle_event(event, now) == Control::Quit {
            break;
        }

        // a steady stream of input must not starve the play head
        if is_tick {
            last_tick = now;
        } else if now.duration_since(last_tick) >= runner.tick_interval() {
            app.tick(now);
            last_tick = now;
        }
    }

    tracing::info!("quitting");
    Ok(())
}
