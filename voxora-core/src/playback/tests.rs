use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::{MockBehavior, MockSpeechService, MOCK_AUDIO};
use crate::audio::{AudioBackend, AudioClip, AudioHandle, ResourceTable, SpeechPayload};
use crate::error::SpeechError;
use crate::playback::{PlaybackController, PlaybackStatus, SpeakOutcome, Speaker};
use crate::request::{SpeechRequest, SpeechSelection};

#[derive(Debug, Clone, PartialEq)]
enum BackendCall {
    Start(String),
    Halt,
}

/// Backend that records every call and finishes only when told to
#[derive(Clone, Default)]
struct RecordingBackend {
    calls: Arc<Mutex<Vec<BackendCall>>>,
    finished: Arc<Mutex<bool>>,
    fail_start: bool,
}

impl RecordingBackend {
    fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    fn finish(&self) {
        *self.finished.lock().unwrap() = true;
    }
}

impl AudioBackend for RecordingBackend {
    fn start(&mut self, handle: &AudioHandle, _clip: &AudioClip) -> Result<(), SpeechError> {
        if self.fail_start {
            return Err(SpeechError::playback("unsupported audio format"));
        }
        *self.finished.lock().unwrap() = false;
        self.calls
            .lock()
            .unwrap()
            .push(BackendCall::Start(handle.uri().to_string()));
        Ok(())
    }

    fn halt(&mut self) {
        self.calls.lock().unwrap().push(BackendCall::Halt);
    }

    fn is_finished(&self) -> bool {
        *self.finished.lock().unwrap()
    }
}

fn selection(text: &str) -> SpeechSelection {
    SpeechSelection {
        text: text.to_string(),
        ..Default::default()
    }
}

fn speaker(
    behavior: MockBehavior,
    backend: RecordingBackend,
) -> (Speaker<MockSpeechService, RecordingBackend>, MockSpeechService) {
    let service = MockSpeechService::new(behavior);
    let (controller, _rx) = PlaybackController::new(backend, ResourceTable::new());
    (Speaker::new(service.clone(), controller), service)
}

#[tokio::test]
async fn test_end_to_end_standard_voice() {
    let backend = RecordingBackend::default();
    let (mut speaker, service) = speaker(MockBehavior::Success, backend.clone());

    let outcome = speaker.speak(&selection("Test message")).await.unwrap();
    assert!(matches!(outcome, SpeakOutcome::Started { .. }));

    let Some(SpeechRequest::Standard(request)) = service.last_request() else {
        panic!("expected a standard request");
    };
    assert_eq!(
        request.text,
        "<speak><prosody rate=\"medium\" pitch=\"medium\">Test message</prosody></speak>"
    );
    assert_eq!(request.voice, "Joanna");
    assert_eq!(request.language, "en-US");

    assert_eq!(speaker.controller().status(), &PlaybackStatus::Playing);
    assert_eq!(speaker.controller().resources().live_count(), 1);

    backend.finish();
    assert_eq!(speaker.wait_for_end().await, &PlaybackStatus::Complete);

    assert_eq!(
        speaker.controller().events().statuses(),
        vec![
            PlaybackStatus::Requesting,
            PlaybackStatus::Decoding,
            PlaybackStatus::Playing,
            PlaybackStatus::Complete,
        ]
    );

    let handle = speaker.controller().completed_audio().unwrap().clone();
    let clip = speaker.controller().resources().get(&handle).unwrap();
    assert_eq!(clip.bytes.as_ref(), MOCK_AUDIO);
}

#[tokio::test]
async fn test_speak_while_playing_stops_without_request() {
    let backend = RecordingBackend::default();
    let (mut speaker, service) = speaker(MockBehavior::Success, backend.clone());

    speaker.speak(&selection("Hello")).await.unwrap();
    assert_eq!(service.call_count(), 1);

    let outcome = speaker.speak(&selection("Hello")).await.unwrap();
    assert_eq!(outcome, SpeakOutcome::Stopped);
    assert_eq!(service.call_count(), 1);
    assert_eq!(speaker.controller().status(), &PlaybackStatus::Stopped);
    assert_eq!(backend.calls().last(), Some(&BackendCall::Halt));

    // stopped audio is released and cannot be downloaded
    assert!(speaker.controller().completed_audio().is_none());
    assert_eq!(speaker.controller().resources().live_count(), 0);

    // the next press starts a fresh request
    speaker.speak(&selection("Hello")).await.unwrap();
    assert_eq!(service.call_count(), 2);
    assert_eq!(speaker.controller().status(), &PlaybackStatus::Playing);
}

#[test]
fn test_speak_while_requesting_discards_first_session() {
    let resources = ResourceTable::new();
    let backend = RecordingBackend::default();
    let (mut controller, _rx) = PlaybackController::new(backend.clone(), resources.clone());

    let SpeakOutcome::Started { session: first, .. } =
        controller.speak(&selection("first")).unwrap()
    else {
        panic!("expected a new session");
    };
    let SpeakOutcome::Started { session: second, .. } =
        controller.speak(&selection("second")).unwrap()
    else {
        panic!("expected a new session");
    };
    assert_ne!(first, second);
    assert_eq!(controller.active_session(), Some(second));

    // the late response for the first session is ignored
    let audio = SpeechPayload::Base64("SUQzBA==".to_string());
    controller.on_response(first, Ok(audio.clone())).unwrap();
    assert_eq!(controller.status(), &PlaybackStatus::Requesting);
    assert_eq!(resources.live_count(), 0);
    assert!(backend.calls().is_empty());

    controller.on_response(second, Ok(audio)).unwrap();
    assert_eq!(controller.status(), &PlaybackStatus::Playing);
    assert_eq!(resources.live_count(), 1);
    assert_eq!(backend.calls().len(), 1);
}

#[test]
fn test_new_session_revokes_completed_audio() {
    let resources = ResourceTable::new();
    let (mut controller, _rx) = PlaybackController::new(RecordingBackend::default(), resources.clone());
    let audio = SpeechPayload::Base64("SUQzBA==".to_string());

    let SpeakOutcome::Started { session, .. } = controller.speak(&selection("one")).unwrap() else {
        panic!("expected a new session");
    };
    controller.on_response(session, Ok(audio.clone())).unwrap();
    controller.on_playback_ended(session);
    let old_handle = controller.completed_audio().unwrap().clone();
    assert_eq!(resources.live_count(), 1);

    let SpeakOutcome::Started { session, .. } = controller.speak(&selection("two")).unwrap() else {
        panic!("expected a new session");
    };
    assert!(resources.get(&old_handle).is_none());
    assert_eq!(resources.live_count(), 0);

    controller.on_response(session, Ok(audio)).unwrap();
    assert_eq!(resources.live_count(), 1);
}

#[test]
fn test_stale_end_of_audio_is_ignored() {
    let (mut controller, _rx) =
        PlaybackController::new(RecordingBackend::default(), ResourceTable::new());
    let audio = SpeechPayload::Base64("SUQzBA==".to_string());

    let SpeakOutcome::Started { session: first, .. } = controller.speak(&selection("one")).unwrap()
    else {
        panic!("expected a new session");
    };
    controller.on_response(first, Ok(audio)).unwrap();
    controller.stop();

    controller.on_playback_ended(first);
    assert_eq!(controller.status(), &PlaybackStatus::Stopped);
}

#[tokio::test]
async fn test_network_error_enters_error_state() {
    let (mut speaker, _service) = speaker(
        MockBehavior::NetworkError("HTTP error! status: 500".to_string()),
        RecordingBackend::default(),
    );

    let err = speaker.speak(&selection("Hello")).await.unwrap_err();
    assert_eq!(err, SpeechError::network("HTTP error! status: 500"));
    assert_eq!(
        speaker.controller().error_message(),
        Some("HTTP error! status: 500")
    );
    assert!(speaker.controller().can_speak());
    assert_eq!(speaker.controller().active_session(), None);
}

#[tokio::test]
async fn test_invalid_base64_is_decode_error() {
    let backend = RecordingBackend::default();
    let (mut speaker, _service) = speaker(
        MockBehavior::Base64("not base64!!".to_string()),
        backend.clone(),
    );

    let err = speaker.speak(&selection("Hello")).await.unwrap_err();
    assert!(matches!(err, SpeechError::Decode(_)));
    assert_eq!(
        speaker.controller().events().statuses()[..2],
        [PlaybackStatus::Requesting, PlaybackStatus::Decoding]
    );
    assert!(matches!(
        speaker.controller().status(),
        PlaybackStatus::Error(_)
    ));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_backend_failure_revokes_handle() {
    let (mut speaker, _service) = speaker(MockBehavior::Success, RecordingBackend::failing());

    let err = speaker.speak(&selection("Hello")).await.unwrap_err();
    assert_eq!(err, SpeechError::playback("unsupported audio format"));
    assert_eq!(speaker.controller().resources().live_count(), 0);
    assert!(matches!(
        speaker.controller().status(),
        PlaybackStatus::Error(_)
    ));
}

#[tokio::test]
async fn test_validation_error_sends_nothing() {
    let (mut speaker, service) = speaker(MockBehavior::Success, RecordingBackend::default());

    let err = speaker.speak(&selection("   ")).await.unwrap_err();
    assert_eq!(
        err,
        SpeechError::validation("Please enter some text to convert to speech")
    );

    let mut cloned = selection("Hello");
    cloned.use_cloned_voice = true;
    let err = speaker.speak(&cloned).await.unwrap_err();
    assert!(matches!(err, SpeechError::InvalidSelection(_)));

    assert_eq!(service.call_count(), 0);
}

#[tokio::test]
async fn test_cloned_binary_response_plays() {
    let (mut speaker, service) = speaker(
        MockBehavior::Binary(b"ID3\x03raw".to_vec()),
        RecordingBackend::default(),
    );
    let mut sel = selection("Hello there");
    sel.use_cloned_voice = true;
    sel.cloned_voice_id = Some("clone-7".to_string());

    speaker.speak(&sel).await.unwrap();

    assert!(service.last_request().unwrap().is_cloned());
    assert_eq!(speaker.controller().status(), &PlaybackStatus::Playing);
}

#[tokio::test(start_paused = true)]
async fn test_hung_request_times_out() {
    let (speaker, service) = speaker(MockBehavior::Hang, RecordingBackend::default());
    let mut speaker = speaker.with_timeout(Duration::from_secs(5));

    let err = speaker.speak(&selection("Hello")).await.unwrap_err();
    assert_eq!(
        err,
        SpeechError::network("Request timed out after 5 seconds")
    );
    assert_eq!(service.call_count(), 1);
    assert!(speaker.controller().can_speak());
}

#[tokio::test]
async fn test_queued_behaviors_recover_after_error() {
    let (mut speaker, _service) = speaker(
        MockBehavior::BehaviorQueue(vec![
            MockBehavior::NetworkError("Network or CORS error".to_string()),
            MockBehavior::Success,
        ]),
        RecordingBackend::default(),
    );

    assert!(speaker.speak(&selection("Hello")).await.is_err());
    speaker.speak(&selection("Hello")).await.unwrap();
    assert_eq!(speaker.controller().status(), &PlaybackStatus::Playing);
}

#[test]
fn test_reset_releases_completed_audio() {
    let resources = ResourceTable::new();
    let (mut controller, _rx) =
        PlaybackController::new(RecordingBackend::default(), resources.clone());

    let SpeakOutcome::Started { session, .. } = controller.speak(&selection("one")).unwrap() else {
        panic!("expected a new session");
    };
    controller
        .on_response(session, Ok(SpeechPayload::Base64("SUQzBA==".to_string())))
        .unwrap();
    controller.on_playback_ended(session);

    controller.reset();
    assert_eq!(controller.status(), &PlaybackStatus::Idle);
    assert_eq!(resources.live_count(), 0);
}

#[test]
fn test_reset_starts_event_history_over() {
    let (mut controller, mut rx) =
        PlaybackController::new(RecordingBackend::default(), ResourceTable::new());

    for text in ["one", "two", "three"] {
        let SpeakOutcome::Started { session, .. } = controller.speak(&selection(text)).unwrap()
        else {
            panic!("expected a new session");
        };
        controller
            .on_response(session, Ok(SpeechPayload::Base64("SUQzBA==".to_string())))
            .unwrap();
        controller.on_playback_ended(session);
        assert!(controller.events().history().len() > 1);

        controller.reset();
        assert_eq!(controller.events().statuses(), vec![PlaybackStatus::Idle]);
    }

    // subscribers still saw every transition
    let mut received = Vec::new();
    while let Ok(event) = rx.try_recv() {
        received.push(event.status);
    }
    assert_eq!(received.last(), Some(&PlaybackStatus::Idle));
    assert!(received.len() > 3);
}

#[test]
fn test_drop_releases_resources() {
    let resources = ResourceTable::new();
    {
        let (mut controller, _rx) =
            PlaybackController::new(RecordingBackend::default(), resources.clone());
        let SpeakOutcome::Started { session, .. } = controller.speak(&selection("one")).unwrap()
        else {
            panic!("expected a new session");
        };
        controller
            .on_response(session, Ok(SpeechPayload::Base64("SUQzBA==".to_string())))
            .unwrap();
        assert_eq!(resources.live_count(), 1);
    }
    assert_eq!(resources.live_count(), 0);
}
