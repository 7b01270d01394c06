use std::path::{Path, PathBuf};
use std::process::{exit, Command, ExitStatus};

use clap::{Parser, Subcommand, ValueEnum};
use handler_asset::LocalAssetLoader;
use handler_core::contract::manifest_fingerprint;
use handler_core::{HandlerDescriptor, HandlerProps, RuntimeRegistry};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ── CLI definition ─────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "Task runner for the custom-resource handler workspace",
    long_about = "A unified CLI for describing handlers, running benchmarks,\n\
                  and CI checks in the custom-resource handler workspace."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a handler's runtime and print its manifest as JSON
    Describe {
        /// File or directory holding the handler code
        #[arg(long)]
        path: PathBuf,
        /// Function the serverless runtime calls
        #[arg(long)]
        entrypoint: String,
        /// Compatible runtime, repeatable (e.g. --runtime nodejs20.x --runtime nodejs22.x)
        #[arg(long = "runtime", required = true)]
        runtimes: Vec<String>,
        /// Runtime catalog JSON. When unset the built-in Lambda catalog is used,
        /// which rejects retired runtimes such as node16/node18; pass a catalog
        /// with an empty "deprecated" list to resolve them
        #[arg(long, env = "HANDLER_RUNTIME_CATALOG")]
        catalog: Option<PathBuf>,
    },
    /// Run Criterion benchmarks
    Bench,
    /// Run CI checks (fmt, clippy, tests, benchmarks)
    Ci {
        /// Job to run
        #[arg(value_enum, default_value_t = CiJob::Check)]
        job: CiJob,
    },
}

#[derive(Clone, ValueEnum)]
enum CiJob {
    /// Formatting, clippy, and tests
    Check,
    /// Run benchmarks
    Bench,
    /// Run check + bench
    All,
}

// ── helpers ────────────────────────────────────────────────────────

fn step(label: &str) {
    eprintln!("\n=== {label} ===");
}

fn cargo(args: &[&str]) -> ExitStatus {
    eprintln!("+ cargo {}", args.join(" "));
    match Command::new("cargo").args(args).status() {
        Ok(status) => status,
        Err(error) => fail(&format!("failed to execute cargo: {error}")),
    }
}

fn run_cargo(args: &[&str]) {
    let status = cargo(args);
    if !status.success() {
        exit(status.code().unwrap_or(1));
    }
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    exit(1);
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── describe ───────────────────────────────────────────────────────

fn load_catalog(catalog: Option<&Path>) -> Result<RuntimeRegistry, String> {
    match catalog {
        Some(path) => {
            info!(catalog = %path.display(), "loading runtime catalog");
            RuntimeRegistry::from_path(path).map_err(|error| error.to_string())
        }
        None => Ok(RuntimeRegistry::lambda_defaults()),
    }
}

fn describe_handler(
    path: &Path,
    entrypoint: &str,
    runtimes: &[String],
    catalog: Option<&Path>,
) -> Result<String, String> {
    let registry = load_catalog(catalog)?;
    let props = HandlerProps::from_names(entrypoint, runtimes).map_err(|error| error.to_string())?;
    let descriptor = HandlerDescriptor::from_asset(path, &props, &registry, &LocalAssetLoader)
        .map_err(|error| error.to_string())?;

    let manifest = descriptor.manifest();
    let fingerprint = manifest_fingerprint(&manifest).map_err(|error| error.to_string())?;
    info!(
        runtime = %descriptor.runtime(),
        manifest_fingerprint = %fingerprint,
        "described handler"
    );

    manifest.to_json_pretty().map_err(|error| error.to_string())
}

// ── CI jobs ────────────────────────────────────────────────────────

fn ci_check() {
    step("Check formatting");
    run_cargo(&["fmt", "--all", "--", "--check"]);

    step("Clippy");
    run_cargo(&[
        "clippy",
        "--all-targets",
        "--all-features",
        "--",
        "-D",
        "warnings",
    ]);

    step("Test handler_core");
    run_cargo(&["test", "-p", "handler_core"]);

    step("Test handler_asset");
    run_cargo(&["test", "-p", "handler_asset"]);
}

fn ci_bench() {
    step("Run benchmarks");
    run_cargo(&["bench", "--package", "handler_core", "--bench", "resolution"]);
}

// ── main ───────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Describe {
            path,
            entrypoint,
            runtimes,
            catalog,
        } => {
            init_tracing();
            match describe_handler(&path, &entrypoint, &runtimes, catalog.as_deref()) {
                Ok(manifest) => println!("{manifest}"),
                Err(message) => fail(&message),
            }
        }
        Commands::Bench => ci_bench(),
        Commands::Ci { job } => {
            match job {
                CiJob::Check => ci_check(),
                CiJob::Bench => ci_bench(),
                CiJob::All => {
                    ci_check();
                    ci_bench();
                }
            }
            eprintln!("\nCI job passed.");
        }
    }
}
