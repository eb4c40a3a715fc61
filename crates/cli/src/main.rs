//! Command-line front end for the packer: maps core error kinds to
//! user-facing messages and exit codes, and owns the file I/O around
//! the core.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use mpdpack_library::{ensure_provisioned, LibraryStore, Provision, DEFAULT_LIBRARY_URL};
use mpdpack_packer::Packer;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "mpdpack",
    version,
    about = "Pack LDraw models into self-contained MPD documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct LibraryArgs {
    /// Root directory of the parts library
    #[arg(long, env = "MPDPACK_LIBRARY", value_name = "DIR")]
    library: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Pack a model and everything it references into one document
    Pack {
        /// Model file to pack
        input: PathBuf,
        /// Output path (defaults to the packed file name next to the input)
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
        #[command(flatten)]
        library: LibraryArgs,
    },
    /// Download and extract the parts library if it is not present yet
    Provision {
        /// Archive to download when the library is missing
        #[arg(long, default_value = DEFAULT_LIBRARY_URL)]
        url: String,
        #[command(flatten)]
        library: LibraryArgs,
    },
    /// Report whether the parts library is ready to serve pack requests
    Status {
        /// Emit the status as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        library: LibraryArgs,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Command::Pack {
            input,
            output,
            library,
        } => pack(&input, output, &library.library),
        Command::Provision { url, library } => provision(&library.library, &url),
        Command::Status { json, library } => status(&library.library, json),
    }
}

fn pack(input: &Path, output: Option<PathBuf>, library: &Path) -> Result<ExitCode> {
    let store = LibraryStore::new(library);
    let packed = Packer::new(&store)
        .pack_path(input)
        .with_context(|| format!("failed to pack {}", input.display()))?;

    let target = output.unwrap_or_else(|| {
        input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&packed.file_name)
    });
    fs::write(&target, &packed.content)
        .with_context(|| format!("failed to write {}", target.display()))?;
    log::info!("wrote {} bytes to {}", packed.content.len(), target.display());
    println!("{}", target.display());
    Ok(ExitCode::SUCCESS)
}

fn provision(library: &Path, url: &str) -> Result<ExitCode> {
    match ensure_provisioned(library, url)? {
        Provision::Ready => println!("library already provisioned at {}", library.display()),
        Provision::Fetched => println!("library provisioned into {}", library.display()),
    }
    Ok(ExitCode::SUCCESS)
}

fn status(library: &Path, json: bool) -> Result<ExitCode> {
    let status = LibraryStore::new(library).status();
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!(
            "library {}: {}",
            status.root.display(),
            if status.provisioned {
                "provisioned"
            } else {
                "not provisioned"
            }
        );
        println!("  materials: {}", presence(status.materials_present));
        println!("  parts/:    {}", presence(status.parts_present));
        println!("  p/:        {}", presence(status.primitives_present));
        println!("  models/:   {}", presence(status.models_present));
    }
    Ok(if status.provisioned {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn presence(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "missing"
    }
}
