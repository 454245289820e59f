use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};

use case_stats::app::intent::{dispatch, Intent, WebhookRequest};
use case_stats::app::stats_use_case::StatsUseCase;
use case_stats::config::{Config, DEFAULT_CONFIG_PATH};
use case_stats::constants::UNAVAILABLE_MESSAGE;
use case_stats::infra::http_client::ReqwestCaseData;
use case_stats::infra::sink::StdoutSink;
use case_stats::stats::time_range::parse_date_time;
use case_stats::types::{CaseTypeSelection, Country, DateTimeParam, QueryFilters};
use case_stats::{logging, metrics};

#[derive(Parser)]
#[command(name = "case_stats")]
#[command(about = "Answer COVID-19 case statistics questions")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Serve Prometheus metrics on this address while running
    #[arg(long)]
    metrics_addr: Option<SocketAddr>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Worldwide totals
    Worldwide {
        /// Case types: confirmed, deaths, recovered or all
        #[arg(long = "type", default_value = "all")]
        case_types: Vec<String>,
    },
    /// Counts for counties, states/provinces or countries
    Location {
        /// Case types: confirmed, deaths, recovered or all
        #[arg(long = "type", default_value = "all")]
        case_types: Vec<String>,
        /// County name, e.g. "Cook County" (repeatable)
        #[arg(long)]
        county: Vec<String>,
        /// State or province name (repeatable)
        #[arg(long)]
        province: Vec<String>,
        /// Country as CODE:NAME, e.g. IT:Italy (repeatable)
        #[arg(long, value_parser = parse_country)]
        country: Vec<Country>,
        /// Change since this date (RFC 3339 or YYYY-MM-DD)
        #[arg(long, conflicts_with = "between")]
        since: Option<String>,
        /// Change between two dates
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        between: Option<Vec<String>>,
    },
    /// Dispatch a webhook request body (reads stdin when no file is given)
    Intent {
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn parse_country(value: &str) -> std::result::Result<Country, String> {
    let (code, name) = value
        .split_once(':')
        .ok_or_else(|| format!("expected CODE:NAME, got '{}'", value))?;
    Ok(Country {
        name: name.trim().to_string(),
        alpha2: code.trim().to_uppercase(),
    })
}

fn location_filters(
    case_types: Vec<String>,
    county: Vec<String>,
    province: Vec<String>,
    country: Vec<Country>,
    since: Option<String>,
    between: Option<Vec<String>>,
) -> Result<QueryFilters> {
    let date_time = match (since, between) {
        (Some(since), _) => Some(DateTimeParam::Instant(parse_date_time(&since)?)),
        (None, Some(bounds)) if bounds.len() == 2 => Some(DateTimeParam::Between {
            start: parse_date_time(&bounds[0])?,
            end: parse_date_time(&bounds[1])?,
        }),
        _ => None,
    };
    Ok(QueryFilters {
        case_types: CaseTypeSelection::from_raw(&case_types),
        counties: county,
        provinces: province,
        countries: country,
        date_time,
    })
}

fn read_request(file: Option<PathBuf>) -> Result<WebhookRequest> {
    let body = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read request file '{}'", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        }
    };
    serde_json::from_str(&body).context("Failed to decode webhook request")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    metrics::init_metrics(cli.metrics_addr);

    let config = Config::load_from(&cli.config)?;
    let data = ReqwestCaseData::new(&config.api)?;
    let use_case = StatsUseCase::new(Box::new(data), Box::new(StdoutSink));

    let intent = match cli.command {
        Commands::Worldwide { case_types } => Intent::WorldwideStats(CaseTypeSelection::from_raw(&case_types)),
        Commands::Location {
            case_types,
            county,
            province,
            country,
            since,
            between,
        } => Intent::LocationStats(location_filters(case_types, county, province, country, since, between)?),
        Commands::Intent { file } => Intent::from_request(&read_request(file)?)?,
    };

    info!(intent = intent.name(), "Handling request");
    if let Err(e) = dispatch(&intent, &use_case, chrono::Utc::now()).await {
        error!("Request failed: {}", e);
        use_case.output().add(UNAVAILABLE_MESSAGE);
        return Err(e.into());
    }
    Ok(())
}
