use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use voxora_core::auth::EnvToken;
use voxora_core::catalog::Engine;
use voxora_core::{
    AppState, ApiClient, AudioBackend, NullBackend, PlaybackController, PlaybackStatus,
    ResourceTable, Settings, SettingsManager, Speaker, SpeechSelection,
};

#[derive(Args, Debug)]
pub struct SpeakArgs {
    /// Text to speak, at most 250 characters
    #[arg(long)]
    pub text: String,

    /// Language code, e.g. en-GB
    #[arg(long)]
    pub language: Option<String>,

    /// Standard voice id, e.g. Brian
    #[arg(long)]
    pub voice: Option<String>,

    /// standard or neural
    #[arg(long, value_parser = parse_engine)]
    pub engine: Option<Engine>,

    /// Speaking rate multiplier, 0.5 to 2.0
    #[arg(long)]
    pub rate: Option<f64>,

    /// Pitch multiplier, 0.5 to 2.0
    #[arg(long)]
    pub pitch: Option<f64>,

    /// Speak with a cloned voice instead of a standard one
    #[arg(long, value_name = "VOICE_ID")]
    pub cloned_voice: Option<String>,

    /// Save the audio to this file once it has played
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Do not play; only save the audio
    #[arg(long)]
    pub no_play: bool,
}

fn parse_engine(value: &str) -> Result<Engine, String> {
    Engine::try_from(value)
}

pub async fn run(settings: &SettingsManager, args: SpeakArgs) -> Result<()> {
    let settings = settings.settings();
    let client = ApiClient::new(&settings.api, Arc::new(EnvToken::default()))?;
    let selection = selection_for(&settings, &client, &args).await?;

    let out = match (&args.out, args.no_play) {
        (Some(path), _) => Some(path.clone()),
        (None, true) => Some(settings.output.download_path()),
        (None, false) => None,
    };

    if args.no_play {
        return speak_with(&settings, client, NullBackend::new(), &selection, out).await;
    }
    speak_on_device(&settings, client, &selection, out).await
}

#[cfg(feature = "playback")]
async fn speak_on_device(
    settings: &Settings,
    client: ApiClient,
    selection: &SpeechSelection,
    out: Option<PathBuf>,
) -> Result<()> {
    let backend = voxora_core::audio::device::DeviceBackend::new()?;
    speak_with(settings, client, backend, selection, out).await
}

#[cfg(not(feature = "playback"))]
async fn speak_on_device(
    settings: &Settings,
    client: ApiClient,
    selection: &SpeechSelection,
    out: Option<PathBuf>,
) -> Result<()> {
    tracing::warn!("built without audio playback, saving only");
    let out = out.or_else(|| Some(settings.output.download_path()));
    speak_with(settings, client, NullBackend::new(), selection, out).await
}

/// Apply command line overrides on top of the saved defaults
async fn selection_for(
    settings: &Settings,
    client: &ApiClient,
    args: &SpeakArgs,
) -> Result<SpeechSelection> {
    let mut state = AppState::from_settings(settings);

    if let Some(language) = &args.language {
        state.select_language(language)?;
    }
    if let Some(voice) = &args.voice {
        state.select_voice(voice)?;
    }
    if let Some(engine) = args.engine {
        state.select_engine(engine)?;
    }
    if let Some(rate) = args.rate {
        state.set_rate(rate);
    }
    if let Some(pitch) = args.pitch {
        state.set_pitch(pitch);
    }
    if let Some(cloned_voice) = &args.cloned_voice {
        switch_to_cloned_voice(&mut state, client, cloned_voice).await?;
    }

    state.set_text(args.text.clone());
    if let Some(message) = state.text_error() {
        bail!("{message}");
    }
    Ok(state.selection())
}

/// Load the account's cloned voices and select `voice_id` among them
pub async fn switch_to_cloned_voice(
    state: &mut AppState,
    client: &ApiClient,
    voice_id: &str,
) -> Result<()> {
    let voices = client
        .list_cloned_voices()
        .await
        .context("Failed to load cloned voices")?;
    state.set_cloned_voices(voices);
    state.use_cloned_voice(true)?;
    state.select_voice(voice_id)?;
    Ok(())
}

pub async fn speak_with<B: AudioBackend>(
    settings: &Settings,
    client: ApiClient,
    backend: B,
    selection: &SpeechSelection,
    out: Option<PathBuf>,
) -> Result<()> {
    let (controller, _events) = PlaybackController::new(backend, ResourceTable::new());
    let mut speaker = Speaker::new(client, controller)
        .with_timeout(Duration::from_secs(settings.api.timeout_secs));

    speaker.speak(selection).await?;
    println!("Playing...");

    tokio::select! {
        _ = speaker.wait_for_end() => {}
        _ = tokio::signal::ctrl_c() => {
            speaker.controller_mut().stop();
        }
    }

    match speaker.controller().status().clone() {
        PlaybackStatus::Complete => {
            if let Some(path) = out {
                let controller = speaker.controller();
                let handle = controller
                    .completed_audio()
                    .context("No audio to save")?;
                controller.resources().save(handle, &path)?;
                info!(?path, "saved synthesized audio");
                println!("Saved to {}", path.display());
            }
            Ok(())
        }
        PlaybackStatus::Stopped => {
            println!("Stopped.");
            Ok(())
        }
        other => bail!("Playback ended in unexpected state: {other:?}"),
    }
}
