//! `h2a` command-line tool.

use anyhow::{Context, Result, bail};
use clap::Parser;
use h2a::codegen::naming::aidl_package;
use h2a::codegen::{Backend, Diagnostics, Generator, GeneratorConfig, write_files};
use h2a::schema::{QualifiedName, parse_type_graph_file};
use std::path::PathBuf;

/// Converts PACKAGE(.SUBPACKAGE)*@[0-9]+.[0-9]+ to an AIDL equivalent.
#[derive(Parser, Debug)]
#[command(name = "h2a", version, about)]
struct Cli {
    /// Location to output files.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Force conversion of an older minor version.
    #[arg(short, long)]
    force: bool,

    /// Type graph document describing the package and its dependencies.
    #[arg(short, long)]
    graph: PathBuf,

    /// Translator backends to emit.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "ndk,cpp,java",
        value_parser = parse_backend
    )]
    backends: Vec<Backend>,

    /// Skip the .aidl declaration files.
    #[arg(long)]
    no_declarations: bool,

    /// Package version to convert, e.g. android.hardware.foo@1.1
    fqname: String,
}

fn parse_backend(name: &str) -> Result<Backend, String> {
    Backend::from_name(name).ok_or_else(|| format!("unknown backend '{name}'"))
}

fn run(cli: Cli) -> Result<()> {
    let target = QualifiedName::parse(&cli.fqname)
        .with_context(|| format!("Invalid fully-qualified name as argument: {}", cli.fqname))?;
    if target.is_fully_qualified() {
        bail!(
            "h2a only supports converting an entire package, try converting {} instead.",
            target.package_and_version()
        );
    }

    let graph = parse_type_graph_file(&cli.graph)
        .with_context(|| format!("failed to load {}", cli.graph.display()))?;

    let version = target.version();
    let latest = match graph.latest_minor(target.package(), version.major) {
        Some(latest) if latest >= version.minor => latest,
        _ => bail!("Could not get sources for: {target}."),
    };
    if latest != version.minor && !cli.force {
        bail!(
            "A newer minor version of {target} exists ({}@{}.{latest}). In general, prefer to \
             convert that instead. If you really mean to use an old minor version use '-f'.",
            target.package(),
            version.major
        );
    }

    let config = GeneratorConfig::new()
        .backends(cli.backends)
        .emit_declarations(!cli.no_declarations);
    let diagnostics = Diagnostics::new();
    let files = Generator::with_config(&graph, config).generate(&target, &diagnostics)?;

    write_files(&cli.output, &files)?;
    let log_path = cli.output.join("conversion.log");
    std::fs::write(
        &log_path,
        diagnostics.render_log(&target.to_string(), &aidl_package(&target)),
    )
    .with_context(|| format!("failed to write {}", log_path.display()))?;

    tracing::info!(
        "converted {} into {} files with {} notes",
        target,
        files.len(),
        diagnostics.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    run(Cli::parse())
}
