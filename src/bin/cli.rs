//! Folio CLI
//!
//! Command-line access to a Folio site without running the server:
//! - Render a page to HTML
//! - List projects and tags
//! - Read and write the stored configuration
//! - Dispatch a key press
//! - Generate a settings file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use folio::app::App;
use folio::logging;
use folio::settings::{generate_default_settings, Settings};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "folio-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect and render a Folio portfolio site")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Site root directory or URL (overrides settings)
    #[arg(long, global = true)]
    pub site: Option<String>,

    /// Keep local storage in memory
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the page for a path
    Render {
        /// Request path, e.g. /projects/Harbour?image=2
        path: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List projects
    Projects {
        /// Only projects with this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// List every project tag
    Tags,

    /// Read or write the stored configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Dispatch a key press and show the bound command
    Press {
        /// Key name, e.g. ArrowRight or h
        key: String,
    },

    /// Generate a default settings file (no site access)
    Settings {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print a value (dotted keys allowed)
    Get { key: String },

    /// Set a top-level key to a JSON value
    Set { key: String, value: String },
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let mut settings = match &cli.settings {
        Some(path) => Settings::load_with_env(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::load_default(),
    };

    if let Some(site) = &cli.site {
        settings.site.root = site.clone();
    }
    if cli.ephemeral {
        settings.storage.ephemeral = true;
    }

    logging::init_tracing(&settings.logging);
    Ok(settings)
}

async fn booted(settings: &Settings) -> anyhow::Result<App> {
    let app = App::new(settings).context("assembling application")?;
    app.boot().await.context("booting site")?;
    Ok(app)
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Unbound key or unset configuration value
const EXIT_MISSING: u8 = 1;
/// Rendered path has no page
const EXIT_NOT_FOUND: u8 = 2;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    Ok(ExitCode::from(run(&cli).await?))
}

/// Execute one command, returning the process exit status
async fn run(cli: &Cli) -> anyhow::Result<u8> {
    let json = match cli.format.as_str() {
        "json" => true,
        "text" => false,
        other => bail!("Unknown output format: {}", other),
    };

    match &cli.command {
        Commands::Settings { output } => {
            let content = generate_default_settings();
            match output {
                Some(path) => {
                    std::fs::write(path, content)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Settings written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }

        Commands::Render { path, output } => {
            let app = booted(&load_settings(cli)?).await?;
            let page = app.render(path).await?;

            match output {
                Some(file) => {
                    std::fs::write(file, &page.html)
                        .with_context(|| format!("writing {}", file.display()))?;
                    println!("{} ({}) written to {}", page.title, page.status, file.display());
                }
                None => print!("{}", page.html),
            }

            if page.is_not_found() {
                return Ok(EXIT_NOT_FOUND);
            }
        }

        Commands::Projects { tag } => {
            let app = booted(&load_settings(cli)?).await?;
            let service = app.projects();
            let projects = match tag {
                Some(tag) => service.get_projects_by_tag(tag).await,
                None => service.projects().await.as_ref().clone(),
            };

            if json {
                print_json(&projects)?;
            } else {
                println!("{:<32} {:>6}  TAGS", "NAME", "IMAGES");
                println!("{}", "-".repeat(60));
                for project in &projects {
                    println!(
                        "{:<32} {:>6}  {}",
                        project.name.as_deref().unwrap_or("(unnamed)"),
                        project.images.len(),
                        project.tags.join(", ")
                    );
                }
                println!("\n{} project(s)", projects.len());
            }
        }

        Commands::Tags => {
            let app = booted(&load_settings(cli)?).await?;
            let tags: Vec<String> = app.projects().get_project_tags().await.into_iter().collect();

            if json {
                print_json(&tags)?;
            } else {
                for tag in &tags {
                    println!("{}", tag);
                }
            }
        }

        Commands::Config { command } => {
            let settings = load_settings(cli)?;
            let app = App::new(&settings).context("assembling application")?;
            let config = app.config();

            match command {
                ConfigCommand::Get { key } => {
                    if !config.is_loaded()? {
                        app.boot().await.context("booting site")?;
                    }
                    match config.get(key)? {
                        Some(value) if json => print_json(&value)?,
                        Some(serde_json::Value::String(s)) => println!("{}", s),
                        Some(value) => println!("{}", value),
                        None => {
                            eprintln!("{} is not set", key);
                            return Ok(EXIT_MISSING);
                        }
                    }
                }
                ConfigCommand::Set { key, value } => {
                    let parsed: serde_json::Value = serde_json::from_str(value)
                        .with_context(|| format!("{} is not valid JSON", value))?;
                    config.set(key, parsed)?;
                    println!("Set {}", key);
                }
            }
        }

        Commands::Press { key } => {
            let app = booted(&load_settings(cli)?).await?;
            match app.keyboard().press(key).await? {
                Some(command) if json => print_json(&command)?,
                Some(command) => println!("{} -> {}", key, command),
                None => {
                    eprintln!("{} is not bound", key);
                    return Ok(EXIT_MISSING);
                }
            }
        }
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn cli(args: &[&str]) -> Cli {
        let site = concat!(env!("CARGO_MANIFEST_DIR"), "/site");
        let mut argv = vec!["folio-cli", "--ephemeral", "--site", site];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[tokio::test]
    async fn test_settings_skips_site_settings() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("folio.toml");
        let missing = dir.path().join("missing.toml");

        let cli = cli(&[
            "--settings",
            missing.to_str().unwrap(),
            "settings",
            "--output",
            output.to_str().unwrap(),
        ]);

        assert_eq!(run(&cli).await.unwrap(), 0);
        let written = std::fs::read_to_string(&output).unwrap();
        assert!(Settings::parse(&written).is_ok());
    }

    #[tokio::test]
    async fn test_exit_status_reports_missing() {
        assert_eq!(run(&cli(&["press", "k"])).await.unwrap(), 0);
        assert_eq!(run(&cli(&["press", "F13"])).await.unwrap(), EXIT_MISSING);
        assert_eq!(
            run(&cli(&["config", "get", "site.missing"])).await.unwrap(),
            EXIT_MISSING
        );
    }

    #[tokio::test]
    async fn test_render_unknown_path() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("page.html");
        let cli = cli(&["render", "/nowhere", "--output", output.to_str().unwrap()]);

        assert_eq!(run(&cli).await.unwrap(), EXIT_NOT_FOUND);
        assert!(std::fs::read_to_string(&output).unwrap().contains("<html"));
    }
}
