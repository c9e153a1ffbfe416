use std::cell::Cell;
use std::process::ExitCode;

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use skynow_cli::config::RuntimeConfig;
use skynow_cli::model::{Theme, Units};
use skynow_cli::position::UnsupportedPositionSource;
use skynow_cli::prefs::FilePreferenceStore;
use skynow_cli::providers::HttpWeatherApi;
use skynow_cli::service::{
    DashboardView, FailureKind, RefreshEngine, RefreshOutcome, StatusTone,
};
use skynow_cli::view::DashboardModel;

#[derive(Debug, Parser)]
#[command(author, version, about = "SkyNow terminal weather dashboard (Open-Meteo, no API key)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Render the dashboard for the remembered place, or the device
    /// position, or show a hint. This is the default command.
    Show,
    /// Search a place by name and render its forecast.
    Search { place: String },
    /// Refresh from the device position (needs a positioning backend).
    Here,
    /// Switch display units and refresh the remembered place.
    Units { units: UnitsArg },
    /// Switch the color theme.
    Theme { theme: ThemeArg },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for Units {
    fn from(value: UnitsArg) -> Self {
        match value {
            UnitsArg::Metric => Units::Metric,
            UnitsArg::Imperial => Units::Imperial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

const EXIT_RUNTIME: u8 = 1;
const EXIT_USER: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Show);

    if let Commands::Search { place } = &command {
        if place.trim().is_empty() {
            eprintln!("place must not be empty");
            return ExitCode::from(EXIT_USER);
        }
    }

    let config = RuntimeConfig::from_env();
    let prefs = FilePreferenceStore::open(&config.config_dir);
    let api = match HttpWeatherApi::new() {
        Ok(api) => api,
        Err(error) => {
            eprintln!("failed to initialize http client: {error}");
            return ExitCode::from(EXIT_RUNTIME);
        }
    };
    let position = UnsupportedPositionSource;
    let view = TerminalView::new();
    let engine = RefreshEngine::new(&api, &position, &prefs, &view, Utc::now);

    let outcome = match &command {
        Commands::Show => engine.start().await,
        Commands::Search { place } => engine.refresh_by_place(place.trim()).await,
        Commands::Here => engine.refresh_from_position().await,
        Commands::Units { units } => engine.set_units((*units).into()).await,
        Commands::Theme { theme } => {
            engine.set_theme((*theme).into());
            println!("theme set to {}", Theme::from(*theme).as_str());
            return ExitCode::SUCCESS;
        }
    };

    exit_code(&command, outcome)
}

fn exit_code(command: &Commands, outcome: RefreshOutcome) -> ExitCode {
    match outcome {
        RefreshOutcome::Ready | RefreshOutcome::Superseded => ExitCode::SUCCESS,
        // `show` falls back to a search tip and a units toggle probes the
        // position silently; neither is a failure of the invocation itself.
        RefreshOutcome::Failed(FailureKind::Position)
            if matches!(command, Commands::Show | Commands::Units { .. }) =>
        {
            ExitCode::SUCCESS
        }
        RefreshOutcome::Failed(_) => ExitCode::from(EXIT_RUNTIME),
    }
}

/// Terminal renderer behind the dashboard's view boundary. Status lines and
/// panels go to stdout; the dark theme turns on ANSI styling for headings.
struct TerminalView {
    theme: Cell<Theme>,
}

impl TerminalView {
    fn new() -> Self {
        Self {
            theme: Cell::new(Theme::Light),
        }
    }

    fn heading(&self, text: &str) -> String {
        match self.theme.get() {
            Theme::Light => format!("── {text} ──"),
            Theme::Dark => format!("\x1b[1m── {text} ──\x1b[0m"),
        }
    }
}

impl DashboardView for TerminalView {
    fn set_status(&self, message: &str, tone: StatusTone) {
        match tone {
            StatusTone::Info => println!("{message}"),
            StatusTone::Warn | StatusTone::Error => eprintln!("{message}"),
        }
    }

    fn show_loading(&self) {
        // Terminal output is rendered in one pass; there are no skeleton
        // placeholders to put up.
    }

    fn clear_loading(&self) {}

    fn render(&self, model: &DashboardModel) {
        println!();
        println!("{}", self.heading(&model.current.label));
        println!(
            " {}  {}  (feels like {})",
            model.current.symbol, model.current.temperature, model.current.feels_like
        );
        println!(" Condition   {}", model.current.condition);
        println!(" Humidity    {}", model.current.humidity);
        println!(" Wind        {}", model.current.wind);
        println!(" Precip      {}", model.current.precipitation);

        if !model.hourly.is_empty() {
            println!();
            println!("{}", self.heading("Next hours"));
            for tile in &model.hourly {
                println!(
                    " {}  {}  {:>5}  {}",
                    tile.time, tile.symbol, tile.temperature, tile.rain_chance
                );
            }
        }

        if !model.daily.is_empty() {
            println!();
            println!("{}", self.heading("Daily"));
            for tile in &model.daily {
                println!(
                    " {}  {}  {} / {}  {}",
                    tile.day, tile.symbol, tile.high, tile.low, tile.rain_chance
                );
            }
        }

        println!();
    }

    fn apply_theme(&self, theme: Theme) {
        self.theme.set(theme);
    }
}
