use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Subcommand;

use voxora_core::auth::EnvToken;
use voxora_core::voices::ClonedVoiceStatus;
use voxora_core::{ApiClient, SettingsManager};

#[derive(Subcommand, Debug)]
pub enum VoicesCommand {
    /// List cloned voices
    List,

    /// Delete a cloned voice
    Delete {
        /// Id of the voice to delete
        id: String,
    },

    /// Upload a voice sample to clone
    Upload {
        /// Display name for the new voice
        name: String,

        /// Audio sample, e.g. an mp3 or wav recording
        file: PathBuf,
    },
}

pub async fn run(settings: &SettingsManager, command: VoicesCommand) -> Result<()> {
    let client = ApiClient::new(&settings.settings().api, Arc::new(EnvToken::default()))?;

    match command {
        VoicesCommand::List => {
            let voices = client.list_cloned_voices().await?;
            if voices.is_empty() {
                println!("No cloned voices yet.");
            }
            for voice in voices {
                let status = match voice.status {
                    ClonedVoiceStatus::Ready => "ready",
                    ClonedVoiceStatus::Processing => "processing",
                    ClonedVoiceStatus::Failed => "failed",
                };
                println!(
                    "{:<24} {:<20} {:<10} {}",
                    voice.id,
                    voice.name,
                    status,
                    voice.created_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        VoicesCommand::Delete { id } => {
            client.delete_voice(&id).await?;
            println!("Deleted {id}");
        }
        VoicesCommand::Upload { name, file } => {
            let audio = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {file:?}"))?;
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("sample.mp3")
                .to_string();
            let created = client.upload_voice(&name, audio, &file_name).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
    }

    Ok(())
}
