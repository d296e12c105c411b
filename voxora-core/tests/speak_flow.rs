use voxora_core::api::{MockBehavior, MockSpeechService};
use voxora_core::catalog::Engine;
use voxora_core::{
    AppState, NullBackend, PlaybackController, PlaybackStatus, ResourceTable, Settings,
    SpeechRequest, Speaker,
};

#[tokio::test]
async fn test_state_to_download() {
    let mut settings = Settings::default();
    settings.speech.language = "en-GB".to_string();
    settings.speech.voice = Some("Brian".to_string());
    settings.speech.engine = Some(Engine::Neural);

    let mut state = AppState::from_settings(&settings);
    state.set_text("Mind the gap");
    state.set_rate(1.25);

    let service = MockSpeechService::new(MockBehavior::Success);
    let (controller, _rx) = PlaybackController::new(NullBackend::new(), ResourceTable::new());
    let mut speaker = Speaker::new(service.clone(), controller);

    speaker.speak(&state.selection()).await.unwrap();
    assert_eq!(speaker.wait_for_end().await, &PlaybackStatus::Complete);

    let Some(SpeechRequest::Standard(request)) = service.last_request() else {
        panic!("expected a standard request");
    };
    assert_eq!(request.voice, "Brian");
    assert_eq!(request.engine, Engine::Neural);
    assert_eq!(
        request.text,
        "<speak><prosody rate=\"+25%\" pitch=\"medium\">Mind the gap</prosody></speak>"
    );

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join(&settings.output.file_name);
    let controller = speaker.controller();
    let handle = controller.completed_audio().unwrap();
    controller.resources().save(handle, &path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), voxora_core::api::MOCK_AUDIO);
}
