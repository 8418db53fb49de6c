//! `erp-codegen`: generate typed resource facades from an endpoint manifest.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use erp_codegen::{Codegen, Manifest, RustFacadeGenerator};

#[derive(Parser, Debug)]
#[command(name = "erp-codegen", about = "Generate ERP resource facades from a TOML manifest")]
struct Args {
    /// Endpoint manifest (TOML).
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Output directory; created if missing, existing files overwritten.
    #[arg(long, short = 'o')]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let source = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let manifest = Manifest::from_toml(&source)?;

    let generator = RustFacadeGenerator;
    let code = generator.generate(&manifest)?;

    std::fs::create_dir_all(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    for file in &code.files {
        let path = args.output.join(&file.path);
        std::fs::write(&path, &file.content).with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), bytes = file.content.len(), "wrote");
    }

    info!(
        generator = generator.target(),
        resources = manifest.resources.len(),
        files = code.files.len(),
        "generation complete"
    );
    Ok(())
}
