use clap::{Parser, Subcommand};
use pbt::commands::{clean, compile, config, create, deploy, docs, list, package, translate, validate};
use pbt::GlobalOpts;
use pbt_logger as logger;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pbt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Plugin build tool",
    long_about = "pbt compiles, deploys and packages a plugin described by a pbt.toml manifest."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the manifest for missing sections and options
    Validate,
    /// Compile the UI and resource files
    Compile,
    /// Deploy the plugin to the plugin directory
    Deploy(deploy::DeployArgs),
    /// Remove compiled UI and resource files
    Clean,
    /// Remove the deployed plugin from the plugin directory
    Dclean {
        /// Plugin directory to clean instead of the configured one
        #[arg(short, long, value_name = "DIR")]
        plugin_path: Option<PathBuf>,
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Package the plugin into a zip file for distribution
    #[command(alias = "zip")]
    Package(package::PackageArgs),
    /// Print the manifest
    List,
    /// Write a manifest guessed from the files in a plugin directory
    Create {
        /// Plugin directory (default: current directory)
        dir: Option<PathBuf>,
        /// Overwrite an existing manifest without asking
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Build translations with lrelease
    Translate,
    /// Build the HTML help with the documentation makefile
    Doc,
    /// Remove the built HTML help
    CleanDocs,
    /// Show or change user settings
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<config::ConfigAction>,
    },
}

/// Library diagnostics go to stderr; `PBT_LOG` overrides the `-v` level
fn init_tracing() {
    let level = logger::verbosity_filter();
    let default = format!("pbt={level},pbt_manifest={level},pbt_config={level}");
    let filter = EnvFilter::try_from_env("PBT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let opts = cli.global;

    if let Err(e) = logger::init_with_verbosity(opts.verbosity_level(), opts.quiet) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();

    let result = match cli.command {
        Commands::Validate => validate::handle_validate(&opts),
        Commands::Compile => compile::handle_compile(&opts),
        Commands::Deploy(args) => deploy::handle_deploy(args, &opts),
        Commands::Clean => clean::handle_clean(&opts),
        Commands::Dclean { plugin_path, yes } => clean::handle_dclean(plugin_path, yes, &opts),
        Commands::Package(args) => package::handle_package(args, &opts),
        Commands::List => list::handle_list(&opts),
        Commands::Create { dir, yes } => create::handle_create(dir, yes, &opts),
        Commands::Translate => translate::handle_translate(&opts),
        Commands::Doc => docs::handle_doc(false, &opts),
        Commands::CleanDocs => docs::handle_doc(true, &opts),
        Commands::Config { action } => config::handle_config(action, &opts),
    };

    if let Err(e) = result {
        logger::error(&e);
        if opts.verbose > 0 {
            logger::show_log_path();
        }
        std::process::exit(1);
    }
}
