use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use sqb::condition::{SearchCondition, SearchConditionBuilder};
use sqb::config::{self, SqbConfig};
use sqb::db::Database;
use sqb::output::{json as json_out, table};
use sqb::query::build_query;
use sqb::search;

#[derive(Parser)]
#[command(name = "sqb", version, about = "Search Query Builder — paired count/search queries from filters, paging and sort")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to database file (default: [database].path in config, else ~/.sqb/sqb.db)
    #[arg(long, global = true, env = "SQB_DB")]
    db: Option<PathBuf>,
}

#[derive(Args)]
struct QueryArgs {
    /// Entity (table) name, used verbatim
    entity: String,

    /// Equality filter NAME=VALUE (repeatable, order is WHERE order)
    #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
    params: Vec<String>,

    /// Date filter NAME=YYYYMMDD (repeatable, added after --param filters)
    #[arg(long = "date", value_name = "NAME=YYYYMMDD")]
    dates: Vec<String>,

    /// Sort spec: field[:asc|desc],field[:asc|desc]...
    #[arg(long)]
    sort: Option<String>,

    /// Rows to skip
    #[arg(long)]
    offset: Option<usize>,

    /// Maximum rows to return
    #[arg(long)]
    limit: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the count and search queries for a condition
    Build(QueryArgs),

    /// Run a condition against the SQLite database
    Search(QueryArgs),

    /// Manage ~/.sqb/config.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write the default config file if it does not exist
    Init,

    /// Print the loaded configuration
    Show,

    /// Print one [settings] value
    Get {
        /// Settings key
        key: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let json_output = cli.json;
    let config = SqbConfig::load()?;

    match cli.command {
        Commands::Build(args) => {
            let condition = condition_from_args(&args, &config)?;
            let built = build_query(&args.entity, &condition);
            if json_output {
                json_out::print_json(&serde_json::json!({
                    "entity": args.entity,
                    "count_query": built.count_query,
                    "search_query": built.search_query,
                    "params": condition.query_params,
                    "filter": condition.filter,
                    "sort": condition.sort_list,
                }))?;
            } else {
                table::print_built_query(&args.entity, &condition, &built);
            }
        }

        Commands::Search(args) => {
            let condition = condition_from_args(&args, &config)?;
            let db_path = match cli.db.or_else(|| config.database.path.clone()) {
                Some(path) => path,
                None => Database::default_db_path()?,
            };
            let db = Database::open(&db_path)?;
            let page = search::search(&db, &args.entity, &condition)
                .with_context(|| format!("Search on {} failed", args.entity))?;
            if json_output {
                json_out::print_json(&page)?;
            } else {
                table::print_page(&page);
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Init => {
                let path = config::config_path()?;
                if config::init_config()? {
                    println!("Created {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }
            ConfigAction::Show => {
                if json_output {
                    json_out::print_json(&config)?;
                } else {
                    print!("{}", config.display()?);
                }
            }
            ConfigAction::Get { key } => {
                let value = config
                    .settings
                    .get(&key)
                    .with_context(|| format!("No setting named \"{key}\""))?;
                if json_output {
                    json_out::print_json(value)?;
                } else {
                    match config.get_as_string(&key) {
                        Some(s) => println!("{s}"),
                        None => println!("{value}"),
                    }
                }
            }
        },
    }

    Ok(())
}

/// Apply CLI flags on top of the config defaults.
fn condition_from_args(args: &QueryArgs, config: &SqbConfig) -> Result<SearchCondition> {
    let mut builder = SearchConditionBuilder::from_config(&config.search);
    if let Some(offset) = args.offset {
        builder = builder.offset(offset);
    }
    if let Some(limit) = args.limit {
        builder = builder.limit(limit);
    }
    if let Some(ref sort) = args.sort {
        builder = builder.sort(sort.as_str());
    }
    for raw in &args.params {
        builder = builder.put_assignment(raw)?;
    }
    for raw in &args.dates {
        builder = builder.put_date_assignment(raw)?;
    }
    Ok(builder.build())
}
