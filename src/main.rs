use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::Parser;
use log::warn;

use fio2codesys::engine::{run_conversion_with_hook, ConvertOptions};

/// Convert a FactoryIO tag export into CODESYS Modbus TCP mapping files.
#[derive(Parser, Debug)]
#[command(name = "fio2codesys", version, about)]
struct Cli {
    /// FactoryIO tag export (csv)
    input: PathBuf,

    /// Output directory (defaults to the input file's directory)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Reveal the mapping file in the system file manager after export
    #[arg(long)]
    open: bool,

    /// Print the conversion outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let options = ConvertOptions {
        out_dir: cli.out_dir.clone(),
    };
    let hook: Option<&dyn Fn(&Path)> = if cli.open {
        Some(&reveal_in_file_manager)
    } else {
        None
    };

    let outcome = run_conversion_with_hook(&cli.input, &options, hook)
        .with_context(|| format!("conversion failed for {}", cli.input.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    println!("Re-addressed tag table: {}", outcome.tag_table_path.display());
    println!("CODESYS mapping export: {}", outcome.mapping_path.display());
    println!(
        "{} tags ({} inputs, {} outputs), {} rows skipped",
        outcome.tags.len(),
        outcome.diagnostics.import.inputs,
        outcome.diagnostics.import.outputs,
        outcome.diagnostics.import.rows_dropped
    );
    for warning in &outcome.warnings {
        println!("warning[{}]: {}", warning.code, warning.message);
    }
    Ok(())
}

/// Open the exported file and then its directory in the platform file
/// manager, matching the desktop tool this CLI stands in for.
fn reveal_in_file_manager(path: &Path) {
    let targets = [Some(path), path.parent()];
    for target in targets.into_iter().flatten() {
        if let Err(err) = open_in_os(target) {
            warn!("could not open {} in file manager: {err}", target.display());
        }
    }
}

#[cfg(target_os = "windows")]
fn open_in_os(path: &Path) -> std::io::Result<()> {
    Command::new("explorer").arg(path).spawn().map(|_| ())
}

#[cfg(target_os = "macos")]
fn open_in_os(path: &Path) -> std::io::Result<()> {
    Command::new("open").arg(path).spawn().map(|_| ())
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_in_os(path: &Path) -> std::io::Result<()> {
    Command::new("xdg-open").arg(path).spawn().map(|_| ())
}
