//! ndctl - node diagnostics CLI
//!
//! Entry point for `ndctl`, handling:
//! - `debug bundle`: collect a diagnostic archive from this node or pod
//! - `version`: print version and whether bundle collection is available

use clap::{Args, Parser, Subcommand};
use nd_core::config::load_config;
use nd_core::debug_bundle::{
    self, parse_label_selector, BundleError, BundleParams, CollectContext, Credentials,
};
use nd_core::exit_codes::ExitCode;
use nd_core::logging::{init_logging, LogConfig, LogFormat, LogLevel};
use std::path::PathBuf;
use tracing::debug;

/// nodediag - collect node diagnostics for offline troubleshooting
#[derive(Parser)]
#[command(name = "ndctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Path to bundle.toml (defaults to the XDG config dir)
    #[arg(long, global = true, env = "ND_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format on stderr
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Debugging and diagnostics
    Debug(DebugArgs),

    /// Print version information
    Version,
}

#[derive(Args, Debug)]
struct DebugArgs {
    #[command(subcommand)]
    command: DebugCommands,
}

#[derive(Subcommand, Debug)]
enum DebugCommands {
    /// Collect logs, configuration and runtime state into one archive
    Bundle(BundleArgs),
}

#[derive(Args, Debug)]
struct BundleArgs {
    /// Output archive path (.zip); defaults to <unix-time>-bundle.zip in the current directory
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Collect from inside a k8s pod instead of the local node
    #[arg(long)]
    k8s: bool,

    /// Node configuration file to include
    #[arg(long)]
    node_config: Option<PathBuf>,

    /// Directory whose *.log files are tailed into the bundle
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    /// Data directory to list
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Total byte budget for log tails
    #[arg(long)]
    logs_size_limit: Option<u64>,

    /// Time budget for the whole collection (seconds)
    #[arg(long)]
    timeout: Option<u64>,

    /// k8s namespace (defaults to the pod's own)
    #[arg(long)]
    namespace: Option<String>,

    /// k8s label selector, key=value[,key=value...]
    #[arg(long, default_value = "")]
    label_selector: String,

    /// Admin API user recorded with the bundle
    #[arg(long, env = "ND_ADMIN_USER")]
    user: Option<String>,
}

// ============================================================================
// Main entry point
// ============================================================================

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(
        LogLevel::from_verbosity(cli.global.verbose, cli.global.quiet),
        cli.global.log_format,
    );
    init_logging(&log_config);

    let exit_code = match &cli.command {
        Commands::Debug(DebugArgs {
            command: DebugCommands::Bundle(args),
        }) => run_bundle(&cli.global, args),
        Commands::Version => {
            print_version();
            ExitCode::Clean
        }
    };

    std::process::exit(exit_code.as_i32());
}

// ============================================================================
// Command implementations
// ============================================================================

fn run_bundle(global: &GlobalOpts, args: &BundleArgs) -> ExitCode {
    let params = match build_params(global, args) {
        Ok(params) => params,
        Err((message, code)) => return fail(&message, code),
    };
    debug!(k8s = args.k8s, ?params, "Starting debug bundle");

    let ctx = CollectContext::with_timeout(params.timeout());
    let result = if args.k8s {
        debug_bundle::execute_k8s_bundle(&ctx, &params)
    } else {
        debug_bundle::execute_bundle(&ctx, &params)
    };

    match result {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::Clean
        }
        Err(e) => fail(&e.to_string(), ExitCode::from(&e)),
    }
}

/// Merge flags with the config file. CLI values win.
fn build_params(global: &GlobalOpts, args: &BundleArgs) -> Result<BundleParams, (String, ExitCode)> {
    let config = load_config(global.config.as_deref()).map_err(|e| {
        let code = ExitCode::from(&e);
        (e.to_string(), code)
    })?;
    let label_selector = parse_label_selector(&args.label_selector).map_err(|e: BundleError| {
        let code = ExitCode::from(&e);
        (e.to_string(), code)
    })?;

    let params = BundleParams {
        output: args.output.clone(),
        node_config: args.node_config.clone(),
        logs_dir: args.logs_dir.clone(),
        data_dir: args.data_dir.clone(),
        logs_size_limit: args.logs_size_limit.unwrap_or_default(),
        timeout_secs: args.timeout.unwrap_or_default(),
        namespace: args.namespace.clone(),
        label_selector,
        credentials: args.user.clone().map(|user| Credentials { user }),
    };

    Ok(config.apply(
        params,
        args.logs_size_limit.is_some(),
        args.timeout.is_some(),
    ))
}

fn fail(message: &str, code: ExitCode) -> ExitCode {
    debug!(exit_code = %code, "Command failed");
    eprintln!("error: {}", message);
    code
}

fn print_version() {
    println!("ndctl {}", env!("CARGO_PKG_VERSION"));
    println!(
        "debug bundle: {} ({})",
        if debug_bundle::is_supported() {
            "supported"
        } else {
            "unsupported"
        },
        std::env::consts::OS
    );
}
