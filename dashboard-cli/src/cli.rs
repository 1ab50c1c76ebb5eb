use anyhow::{Context, anyhow, bail};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use dashboard_core::{
    Config, Dashboard, DashboardState, Location, Pipeline, TemperatureUnit, View, catalog,
};
use inquire::{InquireError, Password, PasswordDisplayMode, Select, Text};
use rand::{SeedableRng, rngs::StdRng};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dash", version, about = "Weather dashboard for Nigerian states")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and display preferences.
    Configure,

    /// List selectable regions.
    Regions {
        /// Only regions whose name or capital contains this text.
        #[arg(long)]
        search: Option<String>,
    },

    /// Show weather for a region.
    Show {
        /// Region code, state name or capital; defaults to the configured region.
        region: Option<String>,

        #[arg(long, value_enum)]
        unit: Option<UnitArg>,

        #[arg(long, value_enum, default_value_t = Tab::Current)]
        tab: Tab,

        /// Seed for the mock metrics and forecast, for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Pick locations, switch tabs and refresh in a prompt loop.
    Interactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Tab {
    Current,
    Forecast,
    Details,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    C,
    F,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::C => TemperatureUnit::Celsius,
            UnitArg::F => TemperatureUnit::Fahrenheit,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Regions { search } => {
                let matches = catalog::search(search.as_deref().unwrap_or_default());
                if matches.is_empty() {
                    println!("No locations found");
                }
                for loc in matches {
                    println!("{:<6} {:<26} {}", loc.region_code, loc.display_name, loc.lookup_name);
                }
                Ok(())
            }
            Command::Show {
                region,
                unit,
                tab,
                seed,
            } => {
                let config = Config::load()?.with_env();
                let location = match region {
                    Some(input) => resolve_region(&input)?,
                    None => config.default_location()?,
                };
                let unit = unit.map(Into::into).unwrap_or(config.temperature_unit);
                let dashboard = build_dashboard(&config, unit)?;

                dashboard.select(location).await;
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                print_view(&dashboard, tab, &mut rng)
            }
            Command::Interactive => interactive().await,
        }
    }
}

fn resolve_region(input: &str) -> anyhow::Result<Location> {
    catalog::resolve(input).ok_or_else(|| {
        anyhow!("No single region matches '{input}'.\nHint: run `weather-dash regions --search {input}`.")
    })
}

fn build_dashboard(config: &Config, unit: TemperatureUnit) -> anyhow::Result<Dashboard> {
    let pipeline = Pipeline::from_config(config)?;
    tracing::debug!(
        policy = ?config.stale_policy(),
        http = ?config.http_policy(),
        "dashboard ready"
    );
    Ok(Dashboard::new(pipeline, config.stale_policy(), unit))
}

fn print_view(dashboard: &Dashboard, tab: Tab, rng: &mut StdRng) -> anyhow::Result<()> {
    let (text, failure) = screen(&dashboard.state(), tab, rng, Local::now().naive_local());
    print!("{text}");
    match failure {
        Some(message) => bail!("{message}"),
        None => Ok(()),
    }
}

/// Text for the selected tab plus the failure to report after it.
///
/// A failed fetch still renders the snapshot kept from before, under a
/// stale banner.
fn screen(
    state: &DashboardState,
    tab: Tab,
    rng: &mut StdRng,
    now: NaiveDateTime,
) -> (String, Option<String>) {
    let (snapshot, failure) = match state.view() {
        View::Ready(snapshot) => (snapshot, None),
        View::Failed {
            message,
            last_known: Some(stale),
        } => (stale, Some(message.to_string())),
        View::Failed {
            message,
            last_known: None,
        } => return (String::new(), Some(message.to_string())),
        View::Idle | View::Loading => return (String::new(), Some("No weather loaded yet".into())),
    };

    let mut text = String::new();
    if failure.is_some() {
        text.push_str(&render::stale_banner(snapshot));
    }
    text.push_str(&render::header(snapshot, state.last_updated()));
    text.push('\n');

    let unit = state.unit();
    let metrics = dashboard_core::metrics::compute(snapshot, rng);
    text.push_str(&match tab {
        Tab::Current => render::current(snapshot, &metrics, unit),
        Tab::Details => render::details(snapshot, &metrics, unit),
        Tab::Forecast => {
            let forecast = dashboard_core::forecast::synthesize(snapshot, now, rng);
            render::forecast(&forecast, unit)
        }
    });
    (text, failure)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key);

    let unit = Select::new("Temperature unit:", vec!["C", "F"])
        .prompt()
        .context("Failed to read temperature unit")?;
    config.temperature_unit = TemperatureUnit::try_from(unit)?;

    let region = Text::new("Default region (code, state or capital):")
        .with_default(config.default_location()?.region_code)
        .prompt()
        .context("Failed to read default region")?;
    config.default_region = Some(resolve_region(&region)?.region_code.to_string());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

const CHOOSE: &str = "Choose location";
const RECENT: &str = "Recent locations";
const REFRESH: &str = "Refresh";
const CURRENT: &str = "Current tab";
const FORECAST: &str = "Forecast tab";
const DETAILS: &str = "Details tab";
const UNIT: &str = "Toggle °C/°F";
const QUIT: &str = "Quit";

async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?.with_env();
    let dashboard = build_dashboard(&config, config.temperature_unit)?;
    let mut rng = StdRng::from_entropy();
    let mut tab = Tab::Current;

    dashboard.select(config.default_location()?).await;
    show_or_report(&dashboard, tab, &mut rng);

    loop {
        let action = match Select::new(
            "Action:",
            vec![CHOOSE, RECENT, REFRESH, CURRENT, FORECAST, DETAILS, UNIT, QUIT],
        )
        .prompt()
        {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err.into()),
        };

        match action {
            CHOOSE => {
                if let Some(location) = pick_location()? {
                    dashboard.select(location).await;
                }
            }
            RECENT => {
                let recent = dashboard.history();
                if recent.is_empty() {
                    println!("No recent locations");
                    continue;
                }
                if let Some(location) = pick_from(recent)? {
                    dashboard.select(location).await;
                }
            }
            REFRESH => {
                if dashboard.refresh().await.is_none() {
                    println!("Nothing to refresh yet");
                    continue;
                }
            }
            CURRENT => tab = Tab::Current,
            FORECAST => tab = Tab::Forecast,
            DETAILS => tab = Tab::Details,
            UNIT => {
                dashboard.toggle_unit();
            }
            _ => break,
        }

        show_or_report(&dashboard, tab, &mut rng);
    }

    Ok(())
}

fn show_or_report(dashboard: &Dashboard, tab: Tab, rng: &mut StdRng) {
    println!();
    if let Err(err) = print_view(dashboard, tab, rng) {
        eprintln!("Error: {err}");
    }
    println!();
}

fn pick_location() -> anyhow::Result<Option<Location>> {
    let term = match Text::new("Search states or cities:").prompt() {
        Ok(term) => term,
        Err(InquireError::OperationCanceled) => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let matches = catalog::search(&term);
    if matches.is_empty() {
        println!("No locations found");
        return Ok(None);
    }
    pick_from(matches)
}

fn pick_from(locations: Vec<Location>) -> anyhow::Result<Option<Location>> {
    let labels: Vec<String> = locations
        .iter()
        .map(|loc| format!("{loc} ({})", loc.region_code))
        .collect();

    match Select::new("Location:", labels).raw_prompt() {
        Ok(choice) => Ok(locations.get(choice.index).copied()),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
