use std::process::ExitCode;
use std::time::Instant;

use dotenvy::dotenv;
use tracing::error;
use tracing_subscriber::EnvFilter;

use big_comparator::config::{self, Config, DEFAULT_LOG_FILTER, LOG_ENV};
use big_comparator::console::{ConsolePrompter, Transcript};
use big_comparator::oracle::{MarkerOracle, OpenAiOracle};
use big_comparator::session::run_session;
use big_comparator::shutdown::{race_interrupt, Outcome};

const BANNER: &str = r"
 ____  _       ____                                 _
| __ )(_) __ _/ ___|___  _ __ ___  _ __   __ _ _ __| |_ ___  _ __
|  _ \| |/ _` | |   / _ \| '_ ` _ \| '_ \ / _` | '__| __/ _ \| '__|
| |_) | | (_| | |__| (_) | | | | | | |_) | (_| | |  | || (_) | |
|____/|_|\__, |\____\___/|_| |_| |_| .__/ \__,_|_|   \__\___/|_|
         |___/                      |_|
";

const EXIT_MISSING_CREDENTIAL: u8 = 1;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let transcript = Transcript::new(Instant::now());
    dotenv().ok();
    init_tracing();

    let model = config::model_from_lookup(|key| std::env::var(key).ok());

    println!("{BANNER}");
    transcript.print("Welcome to Big Comparator.");
    transcript.print(&format!("Model: {model}"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            transcript.print(&err.to_string());
            return ExitCode::from(EXIT_MISSING_CREDENTIAL);
        }
    };

    let oracle = MarkerOracle::new(OpenAiOracle::new(&config));
    let mut prompter = ConsolePrompter::new(transcript);

    let outcome = race_interrupt(
        run_session(&oracle, &mut prompter),
        tokio::signal::ctrl_c(),
    )
    .await;

    match &outcome {
        Outcome::Interrupted => {
            println!();
            transcript.print("Interrupted by user.");
        }
        Outcome::Finished(Ok(())) => transcript.print("Done."),
        Outcome::Finished(Err(err)) => {
            error!(error = %format!("{err:#}"), "session aborted");
            transcript.print(&format!("Error: {err:#}"));
        }
    }
    ExitCode::from(outcome.exit_code())
}
