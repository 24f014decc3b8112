use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tracing::{info, warn};

use plantwatch::data::duration::parse_interval;
use plantwatch::data::StageLayout;
use plantwatch::logging::{self, LogTarget};
use plantwatch::settings::{FeedChoice, FeedFlags};
use plantwatch::types::TelemetryFeed;
use plantwatch::{
    events, ui, App, DataSource, FileSource, MockSource, Report, Settings, StreamSource,
};

#[derive(Parser, Debug)]
#[command(name = "plantwatch")]
#[command(about = "Terminal dashboard for subplant, asset and sensor-node health")]
struct Args {
    /// Path to a JSON feed file (default: feed.json)
    #[cfg_attr(feature = "http", arg(short, long, conflicts_with_all = ["connect", "mock", "endpoint"]))]
    #[cfg_attr(not(feature = "http"), arg(short, long, conflicts_with_all = ["connect", "mock"]))]
    file: Option<PathBuf>,

    /// Connect to a TCP endpoint streaming newline-delimited feeds (host:port)
    #[arg(short, long, conflicts_with_all = ["file", "mock"])]
    connect: Option<String>,

    /// Poll a telemetry HTTP API (overrides feed.endpoint from the config)
    #[cfg(feature = "http")]
    #[arg(long, conflicts_with_all = ["connect", "mock"])]
    endpoint: Option<String>,

    /// Generate random feeds instead of reading real telemetry
    #[arg(short, long)]
    mock: bool,

    /// Seed for --mock (overrides mock.seed from the config)
    #[arg(long, requires = "mock")]
    seed: Option<u64>,

    /// Refresh interval, e.g. "10s", "500ms" or "2m"
    #[arg(short, long)]
    refresh: Option<String>,

    /// Configuration file (defaults to ./plantwatch.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file while the dashboard runs
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Export the current state to a JSON file and exit
    #[arg(short, long, conflicts_with = "connect")]
    export: Option<PathBuf>,
}

impl Args {
    fn feed_flags(&self) -> FeedFlags {
        #[cfg(feature = "http")]
        let endpoint = self.endpoint.clone();
        #[cfg(not(feature = "http"))]
        let endpoint = None;

        FeedFlags {
            file: self.file.clone(),
            connect: self.connect.clone(),
            endpoint,
            mock: self.mock,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_target = match (&args.export, &args.log_file) {
        (_, Some(path)) => LogTarget::File(path.clone()),
        (Some(_), None) => LogTarget::Stderr,
        (None, None) => LogTarget::Disabled,
    };
    logging::init(&log_target)?;

    let mut settings = Settings::load(args.config.as_deref())?;
    let refresh = match &args.refresh {
        Some(value) => parse_interval(value).context("invalid --refresh")?,
        None => settings.refresh_interval(),
    };
    if let Some(seed) = args.seed {
        settings.mock.seed = seed;
    }

    let choice = settings.choose_feed(&args.feed_flags());

    if let Some(export_path) = &args.export {
        return export_to_file(choice, &settings, export_path);
    }

    match choice {
        FeedChoice::File(path) => run_tui(Box::new(FileSource::new(path)), &settings, refresh),
        FeedChoice::Mock(seed) => {
            let source = mock_source(seed, &settings);
            run_tui(Box::new(source), &settings, refresh)
        }
        FeedChoice::Tcp(addr) => run_with_tcp(&addr, &settings),
        #[cfg(feature = "http")]
        FeedChoice::Http(endpoint) => run_with_http(&endpoint, &settings, refresh),
    }
}

fn mock_source(seed: u64, settings: &Settings) -> MockSource {
    let subplants = settings.layout().subplant_names().map(str::to_string).collect();
    MockSource::new(seed, subplants, settings.mock_shape())
}

/// Run with a TCP stream data source
fn run_with_tcp(addr: &str, settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    let source = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                info!(addr, "connected to feed stream");
                Ok(Box::new(StreamSource::spawn(stream, addr)) as Box<dyn DataSource>)
            }
            Err(e) => Err(anyhow!("Failed to connect to {}: {}", addr, e)),
        }
    })?;

    // stream pushes feeds as they arrive, so poll often
    run_tui(source, settings, Duration::from_millis(100))
}

/// Run with a background poller against the telemetry HTTP API
#[cfg(feature = "http")]
fn run_with_http(endpoint: &str, settings: &Settings, refresh: Duration) -> Result<()> {
    use plantwatch::source::spawn_poller;
    use plantwatch_adapters::http::TelemetryApi;

    let rt = tokio::runtime::Runtime::new()?;
    let _guard = rt.enter();

    let api = TelemetryApi::builder()
        .endpoint(endpoint)
        .timeout(settings.feed_timeout())
        .build()?;
    info!(endpoint, interval = ?refresh, "polling telemetry API");
    let (source, handle) = spawn_poller(api, refresh);

    let result = run_tui(Box::new(source), settings, Duration::from_millis(250));

    handle.abort();
    result
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, settings: &Settings, refresh_interval: Duration) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // restore the terminal before the default hook prints
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    let mut app = App::new(source, settings.layout());
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, refresh_interval);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    let mut last_refresh = Instant::now();

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = Rect::new(0, top, area.width, 5u16.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            ui::draw(frame, app);
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, ui::CONTENT_START_ROW),
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Read a single feed, build the report and write it out.
fn export_to_file(choice: FeedChoice, settings: &Settings, export_path: &Path) -> Result<()> {
    let feed = match choice {
        FeedChoice::File(path) => {
            let mut source = FileSource::new(&path);
            source.poll().ok_or_else(|| {
                anyhow!(
                    "cannot export {}: {}",
                    path.display(),
                    source.error().unwrap_or_else(|| "no data".to_string())
                )
            })?
        }
        FeedChoice::Mock(seed) => mock_source(seed, settings)
            .poll()
            .ok_or_else(|| anyhow!("mock source produced no feed"))?,
        #[cfg(feature = "http")]
        FeedChoice::Http(endpoint) => fetch_once(&endpoint, settings)?,
        FeedChoice::Tcp(_) => return Err(anyhow!("--export cannot be combined with --connect")),
    };

    write_report(&feed, &settings.layout(), export_path)
}

#[cfg(feature = "http")]
fn fetch_once(endpoint: &str, settings: &Settings) -> Result<TelemetryFeed> {
    use plantwatch_adapters::http::TelemetryApi;

    let api = TelemetryApi::builder()
        .endpoint(endpoint)
        .timeout(settings.feed_timeout())
        .build()?;
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(api.fetch())?)
}

fn write_report(feed: &TelemetryFeed, layout: &StageLayout, export_path: &Path) -> Result<()> {
    let report = Report::build(feed, layout, Utc::now())?;
    if report.subplants.is_empty() {
        warn!("exporting an empty feed");
    }
    report.write(export_path)?;

    info!(
        path = %export_path.display(),
        assets = report.assets.len(),
        alerts = report.alerts.len(),
        "export written"
    );
    println!("Exported plant state to: {}", export_path.display());
    Ok(())
}
