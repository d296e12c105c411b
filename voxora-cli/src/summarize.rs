use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Args;

use voxora_core::auth::EnvToken;
use voxora_core::request::MAX_CHARACTERS;
use voxora_core::{AppState, ApiClient, SettingsManager};

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Document to summarize (.pdf, .doc, .docx, .txt, .rtf, .odt; at most 10MB)
    pub file: PathBuf,

    /// Read the gist aloud after printing it
    #[arg(long)]
    pub speak: bool,

    /// Read the gist with a cloned voice instead of the default one
    #[arg(long, value_name = "VOICE_ID", requires = "speak")]
    pub cloned_voice: Option<String>,
}

pub async fn run(settings: &SettingsManager, args: SummarizeArgs) -> Result<()> {
    let settings = settings.settings();
    let client = ApiClient::new(&settings.api, Arc::new(EnvToken::default()))?;

    let summary = client.process_document(&args.file).await?;
    println!("{}", summary.gist);

    if !args.speak || summary.gist.trim().is_empty() {
        return Ok(());
    }

    let text: String = summary.gist.chars().take(MAX_CHARACTERS).collect();
    if text.len() < summary.gist.len() {
        tracing::info!("gist truncated to {MAX_CHARACTERS} characters for speech");
    }
    let mut state = AppState::from_settings(&settings);
    if let Some(cloned_voice) = &args.cloned_voice {
        crate::speak::switch_to_cloned_voice(&mut state, &client, cloned_voice).await?;
    }
    state.set_text(text);
    if let Some(message) = state.text_error() {
        bail!("{message}");
    }
    let selection = state.selection();

    #[cfg(feature = "playback")]
    {
        let backend = voxora_core::audio::device::DeviceBackend::new()?;
        crate::speak::speak_with(&settings, client, backend, &selection, None).await
    }
    #[cfg(not(feature = "playback"))]
    {
        let out = Some(settings.output.download_path());
        let backend = voxora_core::NullBackend::new();
        crate::speak::speak_with(&settings, client, backend, &selection, out).await
    }
}
