use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mdsite::Config;
use mdsite::config::CONFIG_FILE_NAME;

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Build static HTML pages from Markdown")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy static assets and render every content page
    Build {
        /// Site config file
        #[arg(short, long, default_value = CONFIG_FILE_NAME)]
        config: PathBuf,
    },
    /// Compile a single Markdown file to an HTML fragment
    Render {
        /// Input Markdown file
        input: PathBuf,

        /// Output HTML file (defaults to input name with .html extension, `-` for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Build { config } => {
            let config = Config::load(&config)?;
            let pages = mdsite::page::build_site(&config)?;
            println!(
                "Built {} pages into {}",
                pages.len(),
                config.paths.public.display()
            );
        }
        Command::Render { input, output } => {
            let markdown = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let html = mdsite::markdown_to_html(&markdown)
                .with_context(|| format!("compiling {}", input.display()))?;

            let output = output.unwrap_or_else(|| input.with_extension("html"));
            if output.as_os_str() == "-" {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{html}")?;
            } else {
                fs::write(&output, html)
                    .with_context(|| format!("writing {}", output.display()))?;
                println!("Created {}", output.display());
            }
        }
    }
    Ok(())
}
