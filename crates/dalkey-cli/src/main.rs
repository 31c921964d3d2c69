#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod logging;

use clap::Parser;
use dalkey_resolver::{OsFileSystem, ResolveError, Resolver, ResolverConfig};
use miette::{miette, Result};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "dalkey")]
#[command(author, version, about = "Browser-profile module specifier resolver", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Resolve a module specifier against the real filesystem
    Resolve {
        /// The specifier to resolve (e.g. `./foo`, `react`, `@scope/pkg/sub`)
        specifier: String,

        /// The importing file
        #[arg(long, value_name = "PATH")]
        from: String,

        /// Comma-separated extensions probed in order (default: ts,tsx,js,jsx,mjs,cjs,json)
        #[arg(long, value_name = "EXTS", value_delimiter = ',')]
        extensions: Option<Vec<String>>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json);

    match cli.command {
        Commands::Resolve {
            specifier,
            from,
            extensions,
        } => run_resolve(&specifier, &from, extensions, cli.json),
    }
}

fn run_resolve(
    specifier: &str,
    from: &str,
    extensions: Option<Vec<String>>,
    json: bool,
) -> Result<()> {
    let importer = absolutize(from);

    let mut config = ResolverConfig::default();
    if let Some(extensions) = extensions {
        config.extensions = extensions.into_iter().map(dotted).collect();
    }

    let resolver = Resolver::with_config(Arc::new(OsFileSystem), config);

    match resolver.resolve(specifier, &importer) {
        Ok(resolved) => {
            if json {
                println!(
                    "{}",
                    json!({
                        "status": "resolved",
                        "specifier": specifier,
                        "importer": importer,
                        "resolved": resolved,
                    })
                );
            } else {
                println!("{resolved}");
            }
            Ok(())
        }
        Err(err @ ResolveError::ModuleNotFound { .. }) => {
            if json {
                println!(
                    "{}",
                    json!({
                        "status": "unresolved",
                        "specifier": specifier,
                        "importer": importer,
                        "error": err.to_string(),
                    })
                );
                std::process::exit(1);
            }
            Err(miette!("{err}"))
        }
        Err(err) => {
            if json {
                println!(
                    "{}",
                    json!({
                        "status": "error",
                        "specifier": specifier,
                        "importer": importer,
                        "error": err.to_string(),
                    })
                );
                std::process::exit(1);
            }
            Err(miette!("{err}"))
        }
    }
}

/// Ensure an extension starts with a dot.
fn dotted(ext: String) -> String {
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// Make `path` absolute relative to the working directory, posix-style.
fn absolutize(path: &str) -> String {
    if path.starts_with('/') {
        return path.to_string();
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    format!("{}/{path}", cwd.to_string_lossy())
}
