use anyhow::{anyhow, bail, Context as AnyhowContext, Result};
use catalog_picker::PickerController;
use catalog_taxonomy::{
    filter_by_search, find_by_label, find_first, find_node, render_label, CategoryId,
    CategoryNode, FlatCategory, LogTrace, Matcher, RawCategory,
};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod config;
mod file_source;
mod render;

pub use config::{AppConfig, DEFAULT_CONFIG_FILE};
pub use file_source::JsonFileSource;
pub use render::outline;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "catalog-taxonomy")]
#[command(about = "Resolve, filter and pick product categories", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for results)
    #[arg(long, global = true)]
    quiet: bool,

    /// Log every resolver and predicate decision (implies --verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Config file (default: ./taxonomy.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical name of a raw category value
    Resolve(ResolveArgs),

    /// Print the product records whose category matches a filter
    Filter(FilterArgs),

    /// Filter a category tree by a search term
    Search(SearchArgs),

    /// Render a category the way lists and badges show it
    Label(LabelArgs),

    /// Run the category picker against a tree file and print the committed id
    Pick(PickArgs),
}

#[derive(Args)]
struct ResolveArgs {
    /// JSON value; anything that is not valid JSON is taken as a plain string
    value: String,

    /// Treat a JSON array as a list of values, one name per line
    #[arg(long)]
    each: bool,
}

#[derive(Args)]
struct FilterArgs {
    /// Category filter; "" selects uncategorized products
    filter: String,

    /// JSON array of product records
    #[arg(long)]
    products: PathBuf,

    /// Match on this field instead of the whole record
    #[arg(long)]
    field: Option<String>,
}

#[derive(Args)]
struct SearchArgs {
    term: String,

    /// JSON category tree
    #[arg(long)]
    tree: PathBuf,

    /// Print an indented outline instead of JSON
    #[arg(long)]
    outline: bool,
}

#[derive(Args)]
struct LabelArgs {
    /// JSON value; anything that is not valid JSON is taken as a plain string
    value: String,

    /// Flat JSON list of `{id, name, parent_id}` used to rebuild full paths
    #[arg(long)]
    categories: Option<PathBuf>,

    /// Render the full path regardless of config
    #[arg(long)]
    full_path: bool,

    /// Render as a badge regardless of config
    #[arg(long)]
    badge: bool,

    /// Print the label as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PickArgs {
    /// JSON category tree; created categories are written back to it
    #[arg(long)]
    tree: PathBuf,

    /// Currently selected category id
    #[arg(long)]
    selected: Option<String>,

    /// Search term typed before choosing
    #[arg(long)]
    search: Option<String>,

    /// Category to commit, by id or label
    #[arg(long, conflicts_with = "create", required_unless_present = "create")]
    select: Option<String>,

    /// Create a root-level category and commit it
    #[arg(long)]
    create: Option<String>,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.trace {
        builder.filter_level(log::LevelFilter::Trace);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = AppConfig::load(cli.config.as_deref())?;
    let matcher = if cli.trace {
        Matcher::new(&LogTrace)
    } else {
        Matcher::default()
    };

    match cli.command {
        Commands::Resolve(args) => run_resolve(args, &matcher),
        Commands::Filter(args) => run_filter(args, &matcher),
        Commands::Search(args) => run_search(args).await,
        Commands::Label(args) => run_label(args, &config),
        Commands::Pick(args) => run_pick(args, config).await,
    }
}

fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn run_resolve(args: ResolveArgs, matcher: &Matcher<'_>) -> Result<()> {
    let value = parse_value(&args.value);
    if !args.each {
        return print_stdout(&matcher.resolve(&RawCategory::from_value(&value)));
    }
    let Value::Array(values) = value else {
        bail!("--each expects a JSON array");
    };
    let names: Vec<String> = values
        .iter()
        .map(|value| matcher.resolve(&RawCategory::from_value(value)))
        .collect();
    print_stdout(&names.join("\n"))
}

fn run_filter(args: FilterArgs, matcher: &Matcher<'_>) -> Result<()> {
    let records: Vec<Value> = read_json(&args.products)?;
    let extract = |record: &Value| match &args.field {
        Some(field) => RawCategory::from_value(record.get(field).unwrap_or(&Value::Null)),
        None => RawCategory::from_value(record),
    };
    let matched: Vec<&Value> = records
        .iter()
        .filter(|record| matcher.matches(&extract(record), &args.filter))
        .collect();
    log::debug!(
        "{} of {} products match {:?}",
        matched.len(),
        records.len(),
        args.filter
    );
    print_stdout(&serde_json::to_string_pretty(&matched)?)
}

async fn run_search(args: SearchArgs) -> Result<()> {
    let tree = JsonFileSource::new(&args.tree).load().await?;
    let filtered = filter_by_search(&tree, &args.term);
    if args.outline {
        print_stdout(outline(&filtered).trim_end())
    } else {
        print_stdout(&serde_json::to_string_pretty(&filtered)?)
    }
}

fn run_label(args: LabelArgs, config: &AppConfig) -> Result<()> {
    let mut options = config.display.clone();
    options.full_path |= args.full_path;
    options.show_badge |= args.badge;

    let categories: Option<Vec<FlatCategory>> =
        args.categories.as_deref().map(read_json::<Vec<FlatCategory>>).transpose()?;
    let raw = RawCategory::from_value(&parse_value(&args.value));
    let label = render_label(&raw, categories.as_deref(), &options);

    if args.json {
        print_stdout(&serde_json::to_string_pretty(&label)?)
    } else {
        print_stdout(&label.to_string())
    }
}

/// Id first (exact, then across number/text), then label
fn find_target<'a>(tree: &'a [CategoryNode], target: &str) -> Option<&'a CategoryNode> {
    let id = CategoryId::parse_lossless(target.trim());
    find_node(tree, &id)
        .or_else(|| find_first(tree, |node| node.id.loosely_eq(&id)))
        .or_else(|| find_by_label(tree, target))
}

async fn run_pick(args: PickArgs, config: AppConfig) -> Result<()> {
    let source = Arc::new(JsonFileSource::new(&args.tree));
    let (tx, mut changes) = tokio::sync::mpsc::unbounded_channel();
    let mut picker = PickerController::new(
        source,
        config.picker,
        args.selected.as_deref().map(CategoryId::parse_lossless),
        Box::new(move |id| {
            let _ = tx.send(id.clone());
        }),
    );

    let token = picker.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    picker.mount().await?;
    if let Some(message) = picker.state().load_error() {
        bail!("Failed to load category tree: {message}");
    }
    if let Some(label) = picker.state().selected_label() {
        log::info!("Current category: {label}");
    }
    picker.open().await?;
    if let Some(term) = &args.search {
        picker.search(term.as_str()).await?;
    }

    if let Some(target) = &args.select {
        let id = find_target(picker.state().tree(), target)
            .map(|node| node.id.clone())
            .ok_or_else(|| anyhow!("No category matches {target:?}"))?;
        picker.select(id).await?;
    } else if let Some(name) = &args.create {
        if !picker.state().config().create_new_enabled {
            bail!("Category creation is disabled; set picker.create_new_enabled in the config");
        }
        if args.search.is_none() {
            picker.search(name.as_str()).await?;
        }
        if !picker.state().can_offer_create() {
            bail!("Search {:?} has results; pick one of them instead", picker.state().search_term());
        }
        picker.create(name.as_str()).await?;
        if let Some(notice) = picker.state().notice() {
            bail!("Category creation failed: {notice}");
        }
    }

    let Ok(id) = changes.try_recv() else {
        bail!("Nothing was selected; branches only expand unless picker.allow_branch_selection is set");
    };
    let body = json!({
        "id": id,
        "label": picker.state().selected_label(),
        "created": args.create.is_some(),
    });
    print_stdout(&serde_json::to_string_pretty(&body)?)
}
