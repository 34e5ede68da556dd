use clap::{Parser, Subcommand};
use pwa_shell::config::{self, GeneratorConfig};
use pwa_shell::output;
use pwa_shell::project::Pipeline;
use pwa_shell::types::{GenerationRequest, GenerationResult};
use std::path::PathBuf;

fn version_string() -> &'static str {
    let on_tag = env!("PWA_SHELL_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("PWA_SHELL_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "pwa-shell")]
#[command(about = "Wrap any website in an installable, offline-capable web app")]
#[command(long_about = "\
Wrap any website in an installable, offline-capable web app

Each project is a static directory that frames the target site in a
full-viewport iframe and adds what browsers need to install it:

  build/
  └── my-app/                      # Slug of the display name
      ├── index.html               # Shell page (iframe + worker registration)
      ├── manifest.json            # Web app manifest
      ├── service-worker.js        # Offline cache (pwa-cache-<version>)
      └── icons/
          └── icon-512x512.png     # Cover-fit icon, or a 1x1 placeholder

Icon sources (--icon):
  https://…/logo.png   fetched at generation time
  data:image/png;…     base64 data URI
  ./logo.png           local file
  default              placeholder (same as omitting --icon)

Metadata resolution for `wrap` (first available wins):
  Title: <title> → meta name=title → og:title → host name (minus www.)
  Icon:  img.icon → img alt=logo/icon → first img → apple-touch-icon
         → link rel=icon → /favicon.ico

Run 'pwa-shell gen-config' to generate a documented pwa-shell.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Output root directory [default: from config, `build`]
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Config file [default: ./pwa-shell.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a project from an explicit URL and name
    Generate {
        /// Site to wrap
        url: String,
        /// Display name (also determines the output directory)
        name: String,
        /// Icon URL, data URI, local path, or `default`
        #[arg(long)]
        icon: Option<String>,
    },
    /// Resolve the page's title and icon, then generate
    Wrap {
        /// Site to wrap
        url: String,
        /// Display name [default: resolved page title]
        #[arg(long)]
        name: Option<String>,
        /// Icon source [default: best-ranked icon on the page]
        #[arg(long)]
        icon: Option<String>,
    },
    /// Print a page's resolved title and ranked icon candidates
    Resolve {
        /// Page to inspect
        url: String,
    },
    /// Print a stock pwa-shell.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Generate { url, name, icon } => {
            let request = GenerationRequest {
                url: url.clone(),
                name: name.clone(),
                icon: icon.clone(),
            };
            let result = pipeline(&cli)?.run(&request).await;
            report(&result, cli.json)?;
        }
        Command::Wrap { url, name, icon } => {
            let result = pipeline(&cli)?
                .wrap(url, name.as_deref(), icon.as_deref())
                .await;
            report(&result, cli.json)?;
        }
        Command::Resolve { url } => {
            let metadata = pipeline(&cli)?.resolve(url).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&metadata)?);
            } else {
                output::print_metadata(&metadata);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Config file (explicit or `./pwa-shell.toml`) with `--output` applied on top.
fn load_config(cli: &Cli) -> Result<GeneratorConfig, Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let mut config = config::load_config(cli.config.as_deref(), &cwd)?;
    if let Some(output) = &cli.output {
        config.output_root = output.display().to_string();
        config.validate()?;
    }
    Ok(config)
}

fn pipeline(cli: &Cli) -> Result<Pipeline, Box<dyn std::error::Error>> {
    Ok(Pipeline::new(&load_config(cli)?)?)
}

/// Print a generation result; a failed generation exits non-zero.
fn report(result: &GenerationResult, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        output::print_result(result);
    }
    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
