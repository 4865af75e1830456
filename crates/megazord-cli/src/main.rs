//! Command-line diagnostics for megazord aggregate libraries.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use megazord_core::config::{self, MegazordConfig};
use megazord_core::loader::read_version;
use megazord_core::{
    ComponentIdentity, DylibLoader, LibraryLoader, LoadError, Megazord, MegazordRegistry,
    ProbeOutcome, RegistrySnapshot, VersionProbe,
};
use serde::Serialize;

/// Megazord - inspect aggregate native libraries and dry-run resolution.
#[derive(Parser, Debug)]
#[command(name = "megazord")]
#[command(author, version, long_about = None)]
struct Args {
    /// Action to perform.
    #[command(subcommand)]
    command: Command,

    /// Extra directory to search for libraries (repeatable).
    #[arg(short, long = "dir", global = true)]
    dirs: Vec<PathBuf>,

    /// Print machine-readable JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the full megazord and print its embedded version.
    Probe {
        /// Version to compare against.
        #[arg(long)]
        expect: Option<String>,
    },
    /// Load a library by aggregate name and print its embedded version.
    Version {
        /// Aggregate name, e.g. `megazord` for libmegazord.so.
        #[arg(required = true)]
        library: String,
    },
    /// Resolve which aggregate a component would bind against.
    Resolve {
        /// Component name.
        #[arg(required = true)]
        component: String,
        /// Version the component's native ABI was generated against.
        #[arg(required = true)]
        expected_version: String,
        /// Configured aggregate name (defaults to MEGAZORD_LIBRARY).
        #[arg(long, requires = "library_version")]
        library: Option<String>,
        /// Configured aggregate version (defaults to MEGAZORD_VERSION).
        #[arg(long, requires = "library")]
        library_version: Option<String>,
    },
}

#[derive(Serialize)]
struct VersionReport<'a> {
    library: &'a str,
    present: bool,
    version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    component: &'a str,
    expected_version: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    library: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    registry: RegistrySnapshot,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    if config::log_json() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

fn build_loader(dirs: &[PathBuf]) -> DylibLoader {
    let mut loader = DylibLoader::from_env();
    for dir in dirs {
        loader.add_search_path(dir);
    }
    tracing::debug!(search_paths = ?loader.search_paths(), "Library search paths");
    loader
}

fn run(args: Args) -> Result<ExitCode> {
    let loader = build_loader(&args.dirs);

    match args.command {
        Command::Probe { expect } => run_probe(&loader, expect.as_deref(), args.json),
        Command::Version { library } => run_version(&loader, &library, args.json),
        Command::Resolve {
            component,
            expected_version,
            library,
            library_version,
        } => {
            let configured = match (library, library_version) {
                (Some(library), Some(version)) => Some(MegazordConfig::new(library, version)),
                _ => MegazordConfig::from_env()?,
            };
            run_resolve(
                Arc::new(loader),
                &component,
                &expected_version,
                configured,
                args.json,
            )
        }
    }
}

fn run_probe(loader: &DylibLoader, expect: Option<&str>, json: bool) -> Result<ExitCode> {
    let probe = VersionProbe::new(loader);

    if let Some(expected) = expect {
        let outcome = probe.probe_full_aggregate("megazord-cli", expected);
        if json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        } else {
            match &outcome {
                ProbeOutcome::NotPresent => println!("{}: not present", probe.library()),
                ProbeOutcome::CompatibleVersion => {
                    println!("{}: compatible ({})", probe.library(), expected)
                }
                ProbeOutcome::IncompatibleVersion(found) => println!(
                    "{}: incompatible (expected {}, found {})",
                    probe.library(),
                    expected,
                    found.as_deref().unwrap_or("<none>")
                ),
            }
        }
        return Ok(match outcome {
            ProbeOutcome::CompatibleVersion => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        });
    }

    run_version(loader, probe.library(), json)
}

fn run_version(loader: &DylibLoader, library: &str, json: bool) -> Result<ExitCode> {
    let result = read_version(loader, library);
    let path = loader
        .loaded_path(library)
        .map(|path| path.display().to_string());
    let report = match result {
        Ok(version) => VersionReport {
            library,
            present: true,
            version,
            path,
            error: None,
        },
        Err(e) => VersionReport {
            library,
            present: matches!(e, LoadError::MissingSymbol { .. }),
            version: None,
            path,
            error: Some(e.to_string()),
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !report.present {
        println!("{}: not present", library);
    } else {
        match (&report.version, &report.error) {
            (Some(version), _) => println!("{}: {}", library, version),
            (None, Some(error)) => println!("{}: no version ({})", library, error),
            (None, None) => println!("{}: no version", library),
        }
    }

    Ok(if report.present && report.version.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_resolve(
    loader: Arc<dyn LibraryLoader>,
    component: &str,
    expected_version: &str,
    configured: Option<MegazordConfig>,
    json: bool,
) -> Result<ExitCode> {
    // Fresh registry: a dry run must not depend on earlier process state.
    let mz = Megazord::new(Arc::new(MegazordRegistry::new()), loader);
    if let Some(config) = configured {
        mz.configure(config.library, config.version);
    }

    let identity = ComponentIdentity::new(component, expected_version);
    let result = mz.resolve(&identity);

    let report = ResolveReport {
        component,
        expected_version,
        library: result.as_ref().ok().cloned(),
        error: result.as_ref().err().map(|e| e.to_string()),
        kind: result.as_ref().err().map(|e| e.kind()),
        registry: mz.registry().snapshot(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match &result {
            Ok(library) => println!("{}", library),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
