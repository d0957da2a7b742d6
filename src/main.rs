use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use redemption_oracle::catalog::{Catalog, Category, CategoryFilter, Program};
use redemption_oracle::config::{Config, ConfigOverrides};
use redemption_oracle::evaluation::{evaluate, Evaluation, EvaluationRequest};
use redemption_oracle::geo::{breakdown, Itinerary, ItineraryStatus, Leg};
use redemption_oracle::lookup::{
    program_from_lookup, KnowledgeBaseLookup, LookupSession, LookupState,
};
use redemption_oracle::output::csv::{evaluation_to_csv, legs_to_csv, programs_to_csv};
use redemption_oracle::output::json::render_json;
use redemption_oracle::output::table::{
    render_evaluation_table, render_legs_table, render_programs_table,
};
use redemption_oracle::server::run_server;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "redemption-oracle",
    about = "Judge points and miles redemptions against program benchmarks"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    catalog: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Programs {
        #[arg(long, default_value = "all")]
        category: String,
    },
    Evaluate {
        #[arg(long, default_value = "")]
        cash: String,
        #[arg(long, default_value = "")]
        points: String,
        #[arg(long)]
        currency: Option<String>,
        #[arg(short, long)]
        program: Option<String>,
        #[arg(long, default_value = "")]
        origin: String,
        #[arg(long = "layover")]
        layovers: Vec<String>,
        #[arg(long, default_value = "")]
        destination: String,
    },
    Distance {
        #[arg(required = true)]
        codes: Vec<String>,
    },
    Lookup {
        name: String,
        #[arg(long)]
        add: bool,
        #[arg(long, default_value = "airline")]
        category: String,
        #[arg(long = "manual-value")]
        manual_value: Option<f64>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 3001)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (currency, program) = match &cli.command {
        Commands::Evaluate {
            currency, program, ..
        } => (currency.clone(), program.clone()),
        _ => (None, None),
    };
    config.apply_overrides(ConfigOverrides {
        currency,
        program,
        catalog_path: cli.catalog.clone(),
    });

    if let Commands::Config { init, show } = &cli.command {
        return handle_config_command(*init, *show, &config, &config_path);
    }
    if let Commands::Serve { host, port } = &cli.command {
        let bind = format!("{host}:{port}");
        let addr: SocketAddr = bind
            .parse()
            .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
        return run_server(config, addr).await;
    }

    let mut catalog = config.load_catalog()?;

    match &cli.command {
        Commands::Programs { category } => {
            let filter = CategoryFilter::from_str(category)?;
            print_programs(&catalog.programs.filter(filter), cli.output)?;
        }
        Commands::Evaluate {
            cash,
            points,
            origin,
            layovers,
            destination,
            ..
        } => {
            let mut itinerary = Itinerary::new(origin.as_str(), destination.as_str());
            for code in layovers {
                itinerary = itinerary.with_layover(code.as_str());
            }
            let request = EvaluationRequest::from_text(
                cash,
                points,
                &config.defaults.currency,
                Some(config.defaults.program.as_str()),
                itinerary,
            );
            let evaluation = evaluate(&catalog, &request, &config.thresholds);
            print_evaluation(&evaluation, cli.output)?;
        }
        Commands::Distance { codes } => {
            let (legs, status) = breakdown(&catalog.airports, codes);
            print_distance(&legs, &status, cli.output)?;
        }
        Commands::Lookup {
            name,
            add,
            category,
            manual_value,
        } => {
            let category = Category::from_str(category)?;
            run_lookup(&mut catalog, &config, name, *add, category, *manual_value).await?;
        }
        Commands::Config { .. } | Commands::Serve { .. } => {}
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("redemption_oracle=debug,info"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("redemption_oracle=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn handle_config_command(
    init: bool,
    show: bool,
    config: &Config,
    config_path: &Path,
) -> Result<()> {
    if init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if show || !init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

async fn run_lookup(
    catalog: &mut Catalog,
    config: &Config,
    name: &str,
    add: bool,
    category: Category,
    manual_value: Option<f64>,
) -> Result<()> {
    let backend = KnowledgeBaseLookup::new(catalog.knowledge_base.clone(), config.lookup_delay());
    let mut session = LookupSession::new(Arc::new(backend));
    if session.begin(name) != LookupState::Pending {
        return Err(anyhow!("program name must not be empty"));
    }

    eprintln!("Looking up {name:?}...");
    let state = tokio::select! {
        state = session.settle() => state,
        _ = tokio::signal::ctrl_c() => {
            warn!("lookup interrupted");
            LookupState::Cancelled
        }
    };

    match state {
        LookupState::Found(value) => println!("{name}: estimated {value:.2} cents per point"),
        LookupState::NotFound => println!("{name}: no estimate in the knowledge base"),
        LookupState::Cancelled | LookupState::Idle | LookupState::Pending => {
            println!("{name}: lookup cancelled");
            return Ok(());
        }
    }

    if !add {
        return Ok(());
    }
    let Some(new) = program_from_lookup(name, category, state, manual_value) else {
        return Err(anyhow!(
            "no value found for {name:?}; pass --manual-value to add it anyway"
        ));
    };
    let program = catalog.programs.append(new)?.clone();
    info!("added program {} ({})", program.name, program.id);
    print_programs(&[&program], OutputFormat::Table)
}

fn print_programs(programs: &[&Program], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_programs_table(programs)),
        OutputFormat::Json => println!("{}", render_json(programs)?),
        OutputFormat::Csv => print!("{}", programs_to_csv(programs)?),
    }
    Ok(())
}

fn print_evaluation(evaluation: &Evaluation, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_evaluation_table(evaluation)),
        OutputFormat::Json => println!("{}", render_json(evaluation)?),
        OutputFormat::Csv => print!("{}", evaluation_to_csv(evaluation)?),
    }
    Ok(())
}

fn print_distance(legs: &[Leg], status: &ItineraryStatus, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_legs_table(legs, status)),
        OutputFormat::Json => println!(
            "{}",
            render_json(&serde_json::json!({ "route": status, "legs": legs }))?
        ),
        OutputFormat::Csv => print!("{}", legs_to_csv(legs)?),
    }
    Ok(())
}
