//! Command-line driver for the endpoint client.

use crate::config::Config;
use crate::endpoint::{AudioFile, EndpointClient};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::ExitCode;

/// Talk to speech-to-text, text-to-speech and voice chat endpoints
#[derive(Parser, Debug)]
#[command(name = "voxline", version, about)]
pub struct Cli {
    /// Config file (default: <config dir>/voxline/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Transcribe an audio file
    Transcribe {
        /// Audio file to upload
        audio: PathBuf,
    },
    /// Stream synthesized speech events for text
    Speak {
        /// Text to synthesize
        text: String,
    },
    /// Upload a voice reference sample and its transcript
    Reference {
        /// Reference audio file
        audio: PathBuf,
        /// Transcript of the reference audio
        text: String,
    },
    /// Send a chat query
    Chat {
        /// Query text
        query: String,
    },
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> ExitCode {
    match execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;
    let client = EndpointClient::from_config(&config)?;

    match cli.command {
        Commands::Transcribe { audio } => {
            let file = read_audio(&audio).await?;
            let response = client.submit_audio_for_transcription(file).await?;
            print_json(&response)
        }
        Commands::Speak { text } => {
            let mut stream = client.open_speech_stream(text)?;
            while let Some(event) = stream.next().await {
                println!("{}", event?.data);
            }
            Ok(())
        }
        Commands::Reference { audio, text } => {
            let file = read_audio(&audio).await?;
            let response = client.submit_voice_embedding_reference(file, text).await?;
            print_json(&response)
        }
        Commands::Chat { query } => {
            let response = client.submit_chat_query(query).await?;
            print_json(&response)
        }
    }
}

async fn read_audio(path: &std::path::Path) -> Result<AudioFile> {
    AudioFile::from_path(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
