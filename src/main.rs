use std::fs::File;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use trivia_quiz::data::Catalog;
use trivia_quiz::proxy::{self, DEFAULT_GEMINI_URL, DEFAULT_MODEL, GeminiConfig, GeminiGenerator};
use trivia_quiz::source::{GenerativeClient, Offline, OpenTriviaClient, QuestionSource, RemoteQuestions};
use trivia_quiz::Quiz;

const DEFAULT_FILTER: &str = "trivia_quiz=info";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the quiz in the terminal
    Play {
        /// Where to ask for questions before falling back to the catalog
        #[arg(short, long, value_enum, default_value_t = Source::OpenTrivia)]
        source: Source,

        /// Open Trivia DB base URL
        #[arg(long, env = "TRIVIA_API_URL", default_value = "https://opentdb.com")]
        trivia_url: String,

        /// Base URL of a running `trivia-quiz serve`
        #[arg(long, env = "TRIVIA_PROXY_URL", default_value = "http://127.0.0.1:3000")]
        proxy_url: String,

        /// JSON file to load the fallback questions from
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Write logs to this file
        #[arg(long)]
        log_file: Option<PathBuf>,
    },
    /// Serve the question generation proxy
    Serve {
        /// The address to bind to
        #[arg(short, long, env = "TRIVIA_PROXY_ADDR", default_value = "127.0.0.1:3000")]
        address: SocketAddr,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: String,

        /// Model used to write questions
        #[arg(long, env = "GEMINI_MODEL", default_value = DEFAULT_MODEL)]
        model: String,

        /// Gemini API base URL
        #[arg(long, env = "GEMINI_API_URL", default_value = DEFAULT_GEMINI_URL)]
        gemini_url: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Source {
    /// Open Trivia DB
    OpenTrivia,
    /// A language model behind the proxy
    Generative,
    /// Bundled questions only
    Offline,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let result = match args.command {
        Command::Play {
            source,
            trivia_url,
            proxy_url,
            catalog,
            log_file,
        } => play(source, trivia_url, proxy_url, catalog, log_file).await,
        Command::Serve {
            address,
            api_key,
            model,
            gemini_url,
        } => serve(address, api_key, model, gemini_url).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn play(
    source: Source,
    trivia_url: String,
    proxy_url: String,
    catalog: Option<PathBuf>,
    log_file: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    // The quiz owns the terminal, so logs only go to a file.
    if let Some(path) = log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    let catalog = match catalog {
        Some(path) => Catalog::from_json(path)?,
        None => Catalog::builtin()?,
    };
    let remote: Arc<dyn RemoteQuestions> = match source {
        Source::OpenTrivia => Arc::new(OpenTriviaClient::new(trivia_url)),
        Source::Generative => Arc::new(GenerativeClient::new(proxy_url)),
        Source::Offline => Arc::new(Offline),
    };

    Quiz::new(QuestionSource::new(remote, catalog)).run().await?;
    Ok(())
}

async fn serve(
    address: SocketAddr,
    api_key: String,
    model: String,
    gemini_url: String,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_env_filter(env_filter()).init();

    let config = GeminiConfig {
        base_url: gemini_url,
        model,
        ..GeminiConfig::new(api_key)
    };
    proxy::run(address, Arc::new(GeminiGenerator::new(config))).await?;
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
