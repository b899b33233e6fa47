use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use flatshare_chaos::generation::ollama::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use flatshare_chaos::modules::mood::describe_mood;
use flatshare_chaos::modules::orchestrator::USER_LABEL;
use flatshare_chaos::{CannedGenerator, Generator, OllamaGenerator, Orchestrator, SessionConfig, TurnEvent};

#[derive(Parser)]
#[command(name = "flatshare")]
#[command(about = "Chat with a flat full of opinionated roommates", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML session config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print lines as they are generated
    #[arg(short, long)]
    stream: bool,

    /// Seed for speaker and target selection
    #[arg(long)]
    seed: Option<u64>,

    /// Ollama model name (falls back to MODEL_NAME)
    #[arg(long)]
    model: Option<String>,

    /// Ollama base URL (falls back to OLLAMA_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Use built-in lines instead of a model
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SessionConfig::from_file(path)?,
        None => SessionConfig::default(),
    };

    let generator: Box<dyn Generator> = if cli.offline {
        Box::new(CannedGenerator::new())
    } else {
        let model = cli
            .model
            .or_else(|| std::env::var("MODEL_NAME").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = cli
            .base_url
            .or_else(|| std::env::var("OLLAMA_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Box::new(OllamaGenerator::new(model, base_url)?)
    };

    let mut orchestrator = Orchestrator::new(config, generator);
    if let Some(seed) = cli.seed {
        orchestrator = orchestrator.with_seed(seed);
    }

    println!("Flatshare Chaos ({}). /mood, /relationships, /quit", orchestrator.generator_name());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        match message {
            "" => continue,
            "/quit" | "/exit" => break,
            "/mood" => {
                for persona in orchestrator.personas() {
                    println!("{:<14} {:>3} {}", persona.name(), persona.mood, describe_mood(persona.mood));
                }
                continue;
            }
            "/relationships" => {
                for (name, partners) in orchestrator.relationships().summary() {
                    let row: Vec<String> = partners.iter().map(|(other, score)| format!("{}={}", other, score)).collect();
                    println!("{}: {}", name, row.join(", "));
                }
                continue;
            }
            _ => {}
        }

        let cancel = CancellationToken::new();
        let interrupt = cancel.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                interrupt.cancel();
            }
        });

        if cli.stream {
            let (tx, mut rx) = mpsc::channel::<TurnEvent>(64);
            let printer = tokio::spawn(async move {
                let mut echoing = false;
                while let Some(event) = rx.recv().await {
                    match &event {
                        TurnEvent::Speaker(name) => echoing = name == USER_LABEL,
                        TurnEvent::EndOfLine if echoing => {
                            echoing = false;
                            continue;
                        }
                        _ => {}
                    }
                    if !echoing {
                        print!("{}", event.render());
                        let _ = std::io::stdout().flush();
                    }
                }
            });
            orchestrator.compose_turn_stream_with_cancel(message, tx, &cancel).await;
            printer.await?;
        } else {
            let transcript = orchestrator.compose_turn_with_cancel(message, &cancel).await;
            for line in transcript.iter().skip(1) {
                println!("{}", line);
            }
        }

        watcher.abort();
    }

    Ok(())
}
