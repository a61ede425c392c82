use clap::Parser;
use clap::error::ErrorKind;
use eyescan::{Classifiers, Diagnosis, EyescanError, Modality, Report};
use serde::Serialize;
use std::io::Write;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, Command};

#[derive(Serialize)]
#[serde(untagged)]
enum Output {
    Report(Report),
    Diagnosis(Diagnosis),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries only the JSON document
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let output = match Cli::try_parse() {
        Ok(cli) => run(cli).await,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => rejected(&e, &std::env::args().collect::<Vec<_>>()),
    };

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &output)?;
    writeln!(stdout)?;
    Ok(())
}

async fn run(cli: Cli) -> Output {
    let classifiers = cli
        .config()
        .map_err(EyescanError::from)
        .and_then(Classifiers::new);

    let classifiers = match classifiers {
        Ok(classifiers) => classifiers,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return failed(cli.command, &e);
        }
    };

    match cli.command {
        Command::Image { url } => Output::Report(classifiers.classify_image(url.as_deref()).await),
        Command::Symptoms { text } => {
            Output::Report(classifiers.classify_symptoms(text.as_deref()).await)
        }
        Command::Diagnose { url, text } => Output::Diagnosis(
            classifiers
                .diagnose(url.as_deref(), text.as_deref())
                .await,
        ),
    }
}

/// The output a command produces when it cannot run at all.
fn failed(command: Command, error: &EyescanError) -> Output {
    match command {
        Command::Image { .. } => Output::Report(Report::failure(Modality::Image, error)),
        Command::Symptoms { .. } => Output::Report(Report::failure(Modality::Text, error)),
        Command::Diagnose { .. } => Output::Diagnosis(Diagnosis::new(
            Report::failure(Modality::Image, error),
            Report::failure(Modality::Text, error),
        )),
    }
}

/// Unparseable arguments still produce the document the requested command
/// would have printed, holding the parse error.
fn rejected(error: &clap::Error, args: &[String]) -> Output {
    let rendered = error.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");
    let error = EyescanError::Input(message.to_string());
    tracing::warn!(error = %error, "rejected arguments");
    failed(Command::guess(args), &error)
}
