use std::{
    io::{self, stdin},
    path::PathBuf,
    sync::mpsc::Sender,
    sync::Arc,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::runtime::Runtime;
use tracing::{info, warn};

use redwings::{
    app::{Action, App},
    app_dirs::AppDirs,
    client::HttpTransport,
    config::{ClientConfig, ConfigStore, FileConfigStore},
    logging,
    pipeline::InFlight,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    ui,
};

const TICK_RATE_MS: u64 = 100;

/// terminal client for the redwings AI action-sports coach
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Fill in an athlete profile, submit a video of your run and read the coaching report produced by the redwings analysis service."
)]
pub struct Cli {
    /// analysis service origin, e.g. http://localhost:8000
    #[clap(long)]
    server_url: Option<String>,

    /// request timeout in seconds (0 waits forever)
    #[clap(long)]
    timeout_secs: Option<u64>,

    /// settings file to use instead of the per-user default
    #[clap(long)]
    config: Option<PathBuf>,

    /// write the effective settings back to the settings file
    #[clap(long)]
    save_config: bool,

    /// ping the analysis service and exit
    #[clap(long)]
    check: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Flags win over the settings file
    fn apply_overrides(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.server_url {
            config.server_url = url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        if let Err(err) = logging::init(&path) {
            eprintln!("logging disabled: {}: {}", path.display(), err);
        }
    }

    let store = cli.config_store();
    let config = cli.apply_overrides(store.load());
    let transport = HttpTransport::new(&config).context("invalid client settings")?;

    if cli.save_config {
        store
            .save(&config)
            .with_context(|| format!("could not write {}", store.path().display()))?;
        info!(path = %store.path().display(), "settings saved");
    }

    let rt = Runtime::new().context("could not start the async runtime")?;

    if cli.check {
        return match rt.block_on(transport.health()) {
            Ok(message) => {
                println!("{} is up: {}", transport.base_url(), message);
                Ok(())
            }
            Err(err) => bail!("{} is unreachable: {}", transport.base_url(), err),
        };
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    info!(server = %transport.base_url(), timeout_secs = config.timeout_secs, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(Arc::new(transport));
    let outcome = start_tui(&mut terminal, &mut app, &rt);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, rt: &Runtime) -> Result<()> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        match runner.step() {
            AppEvent::Key(key) => match app.on_key(key) {
                Action::Quit => break,
                Action::Submit(in_flight) => spawn_submission(rt, in_flight, runner.sender()),
                Action::None => {}
            },
            AppEvent::Tick => {
                if !app.on_tick() {
                    continue;
                }
            }
            AppEvent::Resize => {}
            AppEvent::Submission(completion) => app.on_completion(completion),
        }

        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}

fn spawn_submission(rt: &Runtime, in_flight: InFlight, tx: Sender<AppEvent>) {
    rt.spawn(async move {
        let completion = in_flight.run().await;
        if tx.send(AppEvent::Submission(completion)).is_err() {
            warn!("ui loop gone before the analysis finished");
        }
    });
}
