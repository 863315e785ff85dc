//! # Gemscope CLI
//!
//! Command-line interface for the Gemscope CAD analyzer.
//!
//! ## Commands
//! - `analyze` - Measure and group the diamonds in a model file
//! - `inspect` - Show raw measurements for one named mesh
//! - `info` - Print scene statistics

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use gemscope_loader::load_file_async;
use gemscope_viewer::{HtmlPresenter, Presenter, TextPresenter, ViewerApp};

/// Gemscope CAD analyzer CLI
#[derive(Parser)]
#[command(name = "gemscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Measure and group diamonds in a model file
    Analyze {
        /// Model file to analyze
        file: PathBuf,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,

        /// Emit the summary as an HTML panel
        #[arg(long, conflicts_with = "json")]
        html: bool,
    },

    /// Show raw measurements and properties for one named mesh
    Inspect {
        /// Model file to load
        file: PathBuf,

        /// Mesh node name
        name: String,
    },

    /// Print scene statistics
    Info {
        /// Model file to load
        file: PathBuf,
    },
}

/// Execute the CLI command
pub fn execute(cli: Cli) -> Result<()> {
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(cli.command))
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Analyze { file, json, html } => {
            log::info!("Analyzing {}...", file.display());
            analyze(&file, json, html).await
        }
        Commands::Inspect { file, name } => {
            log::info!("Inspecting '{}' in {}...", name, file.display());
            inspect(&file, &name).await
        }
        Commands::Info { file } => info(&file).await,
    }
}

/// Load a file into a fresh viewer, presenting progress and failures
async fn load_into(app: &mut ViewerApp, presenter: &mut dyn Presenter, file: &Path) -> Result<()> {
    app.begin_load(presenter)?;
    match load_file_async(file, |p| app.progress(p)).await {
        Ok(model) => {
            app.complete_load(model, presenter);
            Ok(())
        }
        Err(e) => {
            app.fail_load(e.to_string(), presenter);
            bail!("failed to load {}: {}", file.display(), e);
        }
    }
}

async fn analyze(file: &Path, json: bool, html: bool) -> Result<()> {
    let mut app = ViewerApp::new();

    if html {
        let mut presenter = HtmlPresenter::new();
        load_into(&mut app, &mut presenter, file).await?;
        println!("{}", presenter.html());
        return Ok(());
    }

    let mut presenter = TextPresenter::new();
    load_into(&mut app, &mut presenter, file).await?;

    if json {
        let summary = app
            .summary()
            .context("no summary available: measurement failed")?;
        println!("{}", serde_json::to_string_pretty(summary)?);
    } else {
        print!("{}", presenter.output());
    }
    Ok(())
}

async fn inspect(file: &Path, name: &str) -> Result<()> {
    let mut app = ViewerApp::new();
    let mut presenter = TextPresenter::new();
    load_into(&mut app, &mut presenter, file).await?;

    let node = app
        .scene()
        .find_by_name(name)
        .with_context(|| format!("no node named '{}' in {}", name, file.display()))?;

    let report = app.select(node)?;
    print!("{}", report.render());
    Ok(())
}

async fn info(file: &Path) -> Result<()> {
    let mut app = ViewerApp::new();
    let mut presenter = TextPresenter::new();
    load_into(&mut app, &mut presenter, file).await?;

    let scene = app.scene();
    let meshes = scene.mesh_nodes();
    let vertices: usize = meshes.iter().filter_map(|n| n.mesh.as_ref()).map(|m| m.vertex_count()).sum();
    let triangles: usize = meshes.iter().filter_map(|n| n.mesh.as_ref()).map(|m| m.triangle_count()).sum();
    let bounds = scene.world_bounds();

    println!("Nodes: {}", scene.node_count());
    println!("Meshes: {}", meshes.len());
    println!("Vertices: {}", vertices);
    println!("Triangles: {}", triangles);
    if !bounds.is_empty() {
        let size = bounds.size();
        println!("Bounds: {:.2} x {:.2} x {:.2} mm", size.x, size.y, size.z);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::parse_from(["gemscope", "analyze", "model.json"]);
        assert!(matches!(cli.command, Commands::Analyze { .. }));
    }

    #[test]
    fn test_analyze_flags() {
        let cli = Cli::parse_from(["gemscope", "-v", "analyze", "model.json", "--json"]);
        assert!(cli.verbose);
        if let Commands::Analyze { file, json, html } = cli.command {
            assert_eq!(file, PathBuf::from("model.json"));
            assert!(json);
            assert!(!html);
        } else {
            panic!("Expected Analyze command");
        }
    }

    #[test]
    fn test_inspect_command() {
        let cli = Cli::parse_from(["gemscope", "inspect", "ring.gscene", "Diamond_Round_1"]);
        if let Commands::Inspect { file, name } = cli.command {
            assert_eq!(file, PathBuf::from("ring.gscene"));
            assert_eq!(name, "Diamond_Round_1");
        } else {
            panic!("Expected Inspect command");
        }
    }
}
