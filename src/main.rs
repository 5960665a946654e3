use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use scout_extension::activation::{self, Outcome};
use scout_extension::classify::Eligibility;
use scout_extension::config::{AnalyzerVariant, ExtensionConfig, Scope};
use scout_extension::{logging, FileHost, PathProbe};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scout-extension")]
#[command(
    about = "Route rust-analyzer diagnostics through cargo-scout-audit for ink! projects",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Log each activation step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Activate for a workspace, updating the override command when eligible
    Activate(WorkspaceArgs),

    /// Report what activation would do, without writing settings
    Check(WorkspaceArgs),

    /// Deactivate (nothing to release)
    Deactivate,
}

#[derive(Args)]
struct WorkspaceArgs {
    /// Workspace folders (only the first is considered; defaults to the current directory)
    workspaces: Vec<PathBuf>,

    /// Config file (defaults to <workspace>/.vscode/scout.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settings file to update, overriding --scope
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Settings scope to update
    #[arg(long, value_enum)]
    scope: Option<Scope>,

    /// Editor extensions directory (defaults to ~/.vscode/extensions)
    #[arg(long)]
    extensions_dir: Option<PathBuf>,

    /// Search path for the analyzer instead of PATH
    #[arg(long)]
    search_path: Option<OsString>,

    /// Analyzer release line to invoke
    #[arg(long, value_enum)]
    variant: Option<AnalyzerVariant>,
}

impl WorkspaceArgs {
    fn workspaces(&self) -> Result<Vec<PathBuf>> {
        if !self.workspaces.is_empty() {
            return Ok(self.workspaces.clone());
        }
        let cwd = std::env::current_dir().context("Failed to determine current directory")?;
        Ok(vec![cwd])
    }

    fn resolve_config(&self, workspaces: &[PathBuf]) -> Result<ExtensionConfig> {
        let mut config =
            ExtensionConfig::discover(self.config.as_deref(), workspaces.first().map(|w| w.as_path()))?;

        if let Some(settings) = &self.settings {
            config.settings_path = Some(settings.to_string_lossy().into_owned());
        }
        if let Some(scope) = self.scope {
            config.scope = scope;
        }
        if let Some(dir) = &self.extensions_dir {
            config.extensions_dir = Some(dir.to_string_lossy().into_owned());
        }
        if let Some(variant) = self.variant {
            config.variant = variant;
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    fn probe(&self) -> PathProbe {
        match &self.search_path {
            Some(path) => PathProbe::with_search_path(path.clone()),
            None => PathProbe::new(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Activate(args) => activate(&args),
        Commands::Check(args) => check(&args),
        Commands::Deactivate => {
            activation::deactivate();
            Ok(())
        }
    }
}

fn activate(args: &WorkspaceArgs) -> Result<()> {
    let workspaces = args.workspaces()?;
    let config = args.resolve_config(&workspaces)?;
    let mut host = FileHost::from_config(&workspaces, &config).with_echo(true);

    let report = activation::activate(&mut host, &args.probe(), &config);

    let line = report.outcome.to_string();
    match &report.outcome {
        Outcome::Configured { .. } => {
            let target = host
                .settings_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!("  {} {line} in {target}", "✓".green().bold());
        }
        Outcome::ToolMissing { .. } | Outcome::WriteFailed { .. } => {
            println!("  {} {line}", "✗".red().bold())
        }
        Outcome::NoWorkspace | Outcome::NotEligible(_) => println!("  {}", line.dimmed()),
    }

    Ok(())
}

fn check(args: &WorkspaceArgs) -> Result<()> {
    let workspaces = args.workspaces()?;
    let config = args.resolve_config(&workspaces)?;
    let host = FileHost::from_config(&workspaces, &config);

    let report = activation::check(&host, &args.probe(), &config);

    match &report.eligibility {
        Eligibility::Eligible { package } => {
            println!("  {} depends on {package}", "project:".bold())
        }
        Eligibility::NotEligible(reason) => {
            println!("  {} not eligible ({reason})", "project:".bold());
            return Ok(());
        }
    }

    let yes_no = |flag: Option<bool>| match flag {
        Some(true) => "yes".green(),
        Some(false) => "no".red(),
        None => "-".dimmed(),
    };

    println!(
        "  {} {}",
        format!("{} registered:", config.config_key).bold(),
        yes_no(report.companion_registered)
    );
    println!(
        "  {} {}",
        format!("{} on PATH:", config.tool()).bold(),
        yes_no(report.tool_available)
    );

    let current = report
        .current
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_else(|| "(unset)".to_string());
    println!("  {} {current}", "current:".bold());

    if let Some(pending) = &report.pending {
        println!("  {} {pending}", "would set:".bold());
    }

    Ok(())
}
