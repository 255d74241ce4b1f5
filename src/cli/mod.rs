use std::path::PathBuf;
use std::{env, fs, io};

use anyhow::Context;
use clap::{Args, CommandFactory, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::chart::{self, ChartOptions};
use crate::config::resolve::resolve_settings;
use crate::config::Settings;
use crate::core::module::ModuleId;
use crate::error::{ModtreeError, Result};
use crate::graph::{build_treemap, viz, TreeOptions, Treemap};
use crate::serve::{self, AppState};
use crate::source::select_source;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "modtree")]
#[command(about = "Go module dependency treemap", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[arg(long, global = true)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the materialized tree to stdout
    Show(ShowArgs),
    /// Write the treemap page to a file
    Render(RenderArgs),
    /// Serve the treemap page over HTTP
    Serve(ServeArgs),
    /// Print shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    /// Edge list file, `-` for stdin. Without it, stdin is read briefly and
    /// `go mod graph` runs when nothing arrives.
    pub input: Option<PathBuf>,
    #[arg(long)]
    pub root: Option<String>,
    /// `fan-out` or `legacy`
    #[arg(long)]
    pub weight: Option<String>,
    #[arg(long)]
    pub nested: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
    /// `tree`, `flat` or `json`
    #[arg(long, default_value = "tree")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
    #[arg(short = 'o', long)]
    pub output: PathBuf,
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub tree: TreeArgs,
    #[arg(long)]
    pub addr: Option<String>,
    #[arg(long)]
    pub no_open: bool,
    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    pub shell: clap_complete::Shell,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        output::set_colors(false);
    }
    init_logging(cli.verbose, cli.quiet, !cli.no_color);
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool, ansi: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,modtree={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .try_init();
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Show(args) => handle_show(args, cli.config),
        Commands::Render(args) => handle_render(args, cli.config),
        Commands::Serve(args) => handle_serve(args, cli.config),
        Commands::Completions(args) => {
            clap_complete::generate(args.shell, &mut Cli::command(), "modtree", &mut io::stdout());
            Ok(())
        }
    }
}

fn load_settings(config_path: Option<PathBuf>) -> Result<Settings> {
    let cwd = env::current_dir()?;
    Ok(resolve_settings(cwd, config_path)?)
}

fn tree_options(args: &TreeArgs, settings: &Settings) -> Result<TreeOptions> {
    let weight = match &args.weight {
        Some(raw) => raw.parse()?,
        None => settings.tree.weight,
    };
    let root = args
        .root
        .clone()
        .or_else(|| settings.tree.root.clone())
        .map(ModuleId::new);
    Ok(TreeOptions {
        root,
        weight,
        nested: args.nested || settings.tree.nested,
    })
}

fn load_treemap(args: &TreeArgs, settings: &Settings) -> Result<Treemap> {
    let options = tree_options(args, settings)?;
    let mut source = select_source(args.input.as_deref(), &settings.input);
    let data = source.read()?;
    let treemap = build_treemap(&data, &options)?;
    info!(
        root = %treemap.root,
        tiles = treemap.tiles.len(),
        weight = %options.weight,
        "built treemap"
    );
    Ok(treemap)
}

fn chart_options(settings: &Settings, title: Option<String>) -> ChartOptions {
    let mut options = ChartOptions::from(&settings.chart);
    if let Some(title) = title {
        options.title = title;
    }
    options
}

fn handle_show(args: ShowArgs, config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config_path)?;
    let treemap = load_treemap(&args.tree, &settings)?;
    let nested = args.tree.nested || settings.tree.nested;

    match args.format.to_ascii_lowercase().as_str() {
        "tree" => {
            let roots = if nested {
                treemap.tiles
            } else {
                viz::nest(treemap.tiles)
            };
            println!("{}", treemap.root);
            print!("{}", viz::render_tree(&roots));
            Ok(())
        }
        "flat" => {
            print!("{}", viz::render_flat(&treemap.tiles));
            Ok(())
        }
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&treemap.tiles)
                    .map_err(|err| ModtreeError::Other(anyhow::Error::new(err)))?
            );
            Ok(())
        }
        other => Err(ModtreeError::Other(anyhow::anyhow!(
            "unknown show format '{}'",
            other
        ))),
    }
}

fn handle_render(args: RenderArgs, config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config_path)?;
    let treemap = load_treemap(&args.tree, &settings)?;
    let html = chart::render_html(&treemap.tiles, &chart_options(&settings, args.title))?;
    fs::write(&args.output, html)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    output::wrote(&args.output);
    Ok(())
}

fn handle_serve(args: ServeArgs, config_path: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(config_path)?;
    let treemap = load_treemap(&args.tree, &settings)?;
    let html = chart::render_html(&treemap.tiles, &chart_options(&settings, args.title))?;
    let tree_json = serde_json::to_string(&treemap.tiles)
        .map_err(|err| ModtreeError::Other(anyhow::Error::new(err)))?;

    let addr = args.addr.unwrap_or(settings.server.addr);
    let open_browser = settings.server.open_browser && !args.no_open;
    serve::run(AppState::new(html, tree_json), &addr, open_browser)
}
