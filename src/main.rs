// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Market-Client command line
//!
//! Queries the market discovery backend: markets, crowd levels, weather,
//! and the account endpoints.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use market_client::{
    config::{Config, LogFormat},
    hooks::{AsyncAction, MarketQuery},
    models::{CrowdLevel, Market, TimeOfDay},
    navigation::{HistoryNavigator, HOME_PATH},
    services::{markets::DEFAULT_MIN_RATING, FederatedProvider},
    session::AuthStatus,
    validation::{LoginRequest, RegistrationForm},
    MarketClient,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "market-client")]
#[command(author, version, about = "Find local markets and how busy they are", long_about = None)]
struct Cli {
    /// Backend base URL (overrides MARKET_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List markets; at most one filter applies, search first
    Markets {
        /// Market name to search for
        #[arg(long)]
        name: Option<String>,
        /// Specialty to search for
        #[arg(long)]
        specialty: Option<String>,
        /// Latitude for a nearby search (needs --lon)
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude for a nearby search (needs --lat)
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        /// Nearby search radius in km
        #[arg(long)]
        radius: Option<f64>,
        /// Only covered markets
        #[arg(long)]
        covered: bool,
        /// Only markets rated at least this high (bare flag: 4.0)
        #[arg(long, num_args = 0..=1)]
        min_rating: Option<Option<f64>>,
    },

    /// Show one market
    Market {
        /// Market ID
        id: i64,
    },

    /// Markets at a crowd level during a time of day
    Crowd {
        /// morning, afternoon or evening
        time_of_day: TimeOfDay,
        /// LOW, MEDIUM or HIGH
        level: CrowdLevel,
    },

    /// Market counters
    Stats,

    /// Market service health
    Health,

    /// Ask the backend to refresh a market from external sources
    Sync {
        /// Market ID
        id: i64,
    },

    /// Current weather and forecast
    Weather {
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// Log in and show the signed-in identity
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MARKET_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MARKET_PASSWORD", hide_env_values = true)]
        password: String,
        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },

    /// Print the federated login URL for a provider
    OauthUrl {
        /// google or facebook
        provider: FederatedProvider,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = &cli.api_url {
        config.api_base_url = Config::with_base_url(url)
            .context("Invalid --api-url")?
            .api_base_url;
    }

    init_logging(config.log_format);
    tracing::debug!(base_url = %config.api_base_url, "Starting market client");

    let navigator = Arc::new(HistoryNavigator::new(HOME_PATH));
    let client = MarketClient::new(&config, navigator.clone())
        .context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Markets {
            name,
            specialty,
            lat,
            lon,
            radius,
            covered,
            min_rating,
        } => {
            let query = MarketQuery {
                name,
                specialty,
                latitude: lat,
                longitude: lon,
                radius_km: radius,
                covered,
                min_rating: min_rating.map(|r| r.unwrap_or(DEFAULT_MIN_RATING)),
            };
            let hook = client.markets_hook(query);
            let state = hook.settled().await;
            if let Some(error) = state.error {
                bail!(error);
            }
            let markets = state.data.unwrap_or_default();
            for market in &markets {
                print_market_line(market);
            }
            println!("{} market(s)", markets.len());
        }

        Commands::Market { id } => {
            let hook = client.market_detail(id);
            let state = hook.settled().await;
            match (state.data, state.error) {
                (_, Some(error)) => bail!(error),
                (Some(market), None) => print_market_detail(&market),
                (None, None) => bail!("Market {id} not found"),
            }
        }

        Commands::Crowd { time_of_day, level } => {
            let markets = client.markets.by_crowd_level(time_of_day, level).await?;
            println!(
                "{} in the {}: {} market(s)",
                level.label(),
                time_of_day.as_str(),
                markets.len()
            );
            for market in &markets {
                print_market_line(market);
            }
        }

        Commands::Stats => {
            let stats = client.markets.statistics().await?;
            println!("Total markets:   {}", stats.total_markets);
            println!("Covered markets: {}", stats.covered_markets);
            for (key, value) in &stats.extra {
                println!("{key}: {value}");
            }
        }

        Commands::Health => {
            let health = client.markets.health().await?;
            println!("{}", health.status);
            if !health.is_healthy() {
                bail!("Market service reports {}", health.status);
            }
        }

        Commands::Sync { id } => {
            let action = AsyncAction::new();
            let message = action.execute(|| client.markets.sync(id)).await?;
            println!("{message}");
        }

        Commands::Weather { lat, lon } => {
            let snapshot = match (lat, lon) {
                (Some(lat), Some(lon)) => client.weather.at_location(lat, lon).await?,
                _ => {
                    let state = client.weather_hook().settled().await;
                    match (state.data, state.error) {
                        (_, Some(error)) => bail!(error),
                        (Some(snapshot), None) => snapshot,
                        (None, None) => bail!("No weather data"),
                    }
                }
            };
            let now = snapshot.current();
            println!(
                "{} {:.1}°C, humidity {}% ({})",
                now.condition, now.current_temp, now.humidity, now.time
            );
            for day in &snapshot.forecast {
                println!(
                    "  {}: {} {:.0}-{:.0}°C, {}% rain",
                    day.date, day.condition, day.min_temp, day.max_temp, day.rain_chance
                );
            }
        }

        Commands::Login { email, password } => {
            client.auth.login(&LoginRequest::new(email, password)).await?;
            match client.auth.status() {
                AuthStatus::Authenticated(user) => {
                    println!("Signed in as {} <{}>", user.name, user.email)
                }
                other => bail!("Unexpected session state: {other:?}"),
            }
        }

        Commands::Register {
            first_name,
            last_name,
            email,
            password,
            accept_terms,
        } => {
            let form = RegistrationForm {
                first_name,
                last_name,
                email,
                confirm_password: password.clone(),
                password,
                accept_terms,
            };
            client.auth.register(&form).await?;
            println!("Account created for {}", form.email);
        }

        Commands::OauthUrl { provider } => {
            client.auth.initiate_federated_login(provider);
            if let Some(url) = navigator.last_location() {
                println!("{url}");
            }
        }
    }

    Ok(())
}

fn print_market_line(market: &Market) {
    println!(
        "{:>5}  {:<32} {:<9} {}",
        market.id,
        market.name,
        market.current_crowd_level().label(),
        market.hours_summary()
    );
}

fn print_market_detail(market: &Market) {
    println!("{} (#{})", market.name, market.id);
    if let Some(address) = &market.address {
        println!("  {address}");
    }
    println!("  {}", market.hours_summary());
    println!("  Covered: {}", if market.covered() { "yes" } else { "no" });
    let level = market.current_crowd_level();
    println!("  Crowd now: {} ({})", level.label(), level.advice());
    if let Some(specialties) = &market.specialties {
        println!("  Specialties: {specialties}");
    }
    if let Some(description) = &market.description {
        println!("  {description}");
    }
    for url in market.photo_urls() {
        println!("  Photo: {url}");
    }
}

/// Initialize logging on stderr, JSON or human-readable.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("market_client=info".parse().unwrap())
        .add_directive("warn".parse().unwrap());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
