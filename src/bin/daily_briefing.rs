use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use daily_briefing::auth::secret_store;
use daily_briefing::config::Settings;
use daily_briefing::pipeline::run_daily_analysis;
use daily_briefing::render::{render_page, text::render_text};
use daily_briefing::server::{ServeOptions, serve};

#[derive(Parser)]
#[command(name = "daily_briefing")]
#[command(about = "Daily email briefing dashboard for teachers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the dashboard with its RUN DAILY ANALYSIS button
    Serve {
        /// Address to listen on (defaults to bind_addr from the config)
        #[arg(long)]
        bind: Option<String>,

        /// Don't open the dashboard in a browser
        #[arg(long)]
        no_browser: bool,
    },

    /// Run the analysis once and write the page
    Run {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Plain text instead of HTML
        #[arg(long)]
        text: bool,

        #[arg(long, default_value_t = 100)]
        width: usize,
    },

    /// Store the OpenAI API key in the keyring
    SetApiKey,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::SetApiKey => {
            eprintln!("Paste API key (end with Ctrl-D):");
            let mut key = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut key)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(anyhow!("no API key given"));
            }
            secret_store::save_api_key(key)?;
            println!("Saved API key into keyring");
            Ok(())
        }

        Command::Serve { bind, no_browser } => {
            let settings = Settings::load().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let opts = ServeOptions {
                bind_addr: bind.unwrap_or_else(|| settings.config.bind_addr.clone()),
                open_browser: settings.config.open_browser && !no_browser,
            };
            serve(&settings, opts)
        }

        Command::Run { out, text, width } => {
            let settings = Settings::load().map_err(|e| anyhow!("Configuration error: {e}"))?;
            let outcome = run_daily_analysis(&settings)?;
            let html = render_page(outcome.page());
            let rendered = if text { render_text(&html, width)? } else { html };

            match out {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{rendered}"),
            }
            Ok(())
        }
    }
}
