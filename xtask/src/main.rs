use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for blockcraft")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every gate: fmt, clippy, tests, bench, doc, smoke
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Run the terrain benchmark
    Bench,
    /// Build rustdoc for the workspace
    Doc,
    /// Run a short scripted simulation through the CLI
    Smoke {
        #[arg(short, long, default_value = "300")]
        frames: u64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            fmt()?;
            clippy()?;
            test()?;
            bench()?;
            doc()?;
            smoke(300)?;
        }
        Commands::Fmt => fmt()?,
        Commands::Clippy => clippy()?,
        Commands::Test => test()?,
        Commands::Bench => bench()?,
        Commands::Doc => doc()?,
        Commands::Smoke { frames } => smoke(frames)?,
    }

    Ok(())
}

fn fmt() -> Result<()> {
    cargo("fmt check", &["fmt", "--all", "--", "--check"])
}

fn clippy() -> Result<()> {
    cargo(
        "clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn test() -> Result<()> {
    cargo("tests", &["test", "--workspace"])
}

fn bench() -> Result<()> {
    cargo("bench", &["bench", "-p", "blockcraft-terrain"])
}

fn doc() -> Result<()> {
    cargo("doc", &["doc", "--workspace", "--no-deps"])
}

fn smoke(frames: u64) -> Result<()> {
    let frames = frames.to_string();
    cargo(
        "smoke simulation",
        &[
            "run", "-q", "-p", "blockcraft-cli", "--", "simulate", "--frames", &frames,
        ],
    )
}

fn cargo(label: &str, args: &[&str]) -> Result<()> {
    println!("==> Running {label}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{label} failed");
    }
    Ok(())
}
