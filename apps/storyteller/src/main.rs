use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use client_core::{HttpStoryBackend, StoryController};
use shared::domain::CultureTag;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, normalize_server_url};
use terminal::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(about = "Interactive client for the cultural storytelling service")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    culture: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Story(String),
    SelectCulture(String),
    ListCultures,
    Audio,
    Video,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let Some(rest) = line.trim().strip_prefix('/') else {
        return Command::Story(line.to_string());
    };

    let mut parts = rest.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    match name {
        "culture" if !arg.is_empty() => Command::SelectCulture(arg.to_string()),
        "culture" | "cultures" => Command::ListCultures,
        "audio" => Command::Audio,
        "video" => Command::Video,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

const HELP: &str = "\
Type a story idea and press Enter to weave a tale.
  /culture <tag>  choose the cultural tradition
  /cultures       list available traditions
  /audio          narrate the current story
  /video          render the current story as a video
  /help           show this help
  /quit           leave";

fn print_cultures(cultures: &[CultureTag], selected: &CultureTag) {
    for culture in cultures {
        let marker = if culture == selected { '*' } else { ' ' };
        println!(" {marker} {:<16} {}", culture.as_str(), culture.label());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    settings.apply_overrides(args.server_url, args.culture);

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let server_url = normalize_server_url(&settings.server_url)?;
    info!(%server_url, "starting storyteller client");

    let backend = HttpStoryBackend::new(server_url);
    let mut controller = StoryController::new(backend, TerminalRenderer::new(io::stdout()));

    println!("🌍 Smart Cultural Storyteller");
    controller.check_configuration().await;

    let mut cultures = controller.available_cultures().await;
    let mut culture = CultureTag::new(settings.culture);
    if !cultures.contains(&culture) {
        warn!(%culture, "configured culture is not offered by the service");
    }
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n[{}] > ", culture.label());
        io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_command(&line) {
            Command::Story(prompt) => {
                controller.generate_story(&prompt, &culture).await;
            }
            Command::SelectCulture(tag) => {
                let requested = CultureTag::new(tag);
                if cultures.contains(&requested) {
                    println!("Culture set to {}", requested.label());
                    culture = requested;
                } else {
                    println!("Unknown culture '{requested}'; try /cultures");
                }
            }
            Command::ListCultures => {
                cultures = controller.available_cultures().await;
                print_cultures(&cultures, &culture);
            }
            Command::Audio => {
                controller.generate_audio().await;
            }
            Command::Video => {
                controller.generate_video().await;
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(name) => println!("Unknown command '/{name}'; try /help"),
        }
    }

    Ok(())
}
