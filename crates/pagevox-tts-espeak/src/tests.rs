//! Tests for the eSpeak backend

#[cfg(test)]
mod tests {
    use crate::{parse_voice_languages, score_language, EspeakEngine};
    use pagevox_tts::{FlushPolicy, SpeechEngine, TtsError};
    use tokio::sync::mpsc;

    const VOICE_LISTING: &str = "\
Pty Language Age/Gender VoiceName          File          Other Languages
 5  en             M  en                 (en 2)
 5  en-gb          M  english            (en 2)
 5  fr             M  french             (fr 1)
 7  de             M  german             (de 0)
";

    #[test]
    fn parses_languages_from_voice_listing() {
        let languages = parse_voice_languages(VOICE_LISTING);
        assert_eq!(languages, vec!["en", "en-gb", "fr", "de"]);
    }

    #[test]
    fn scores_full_and_primary_subtag_matches() {
        let languages = parse_voice_languages(VOICE_LISTING);
        assert_eq!(score_language(&languages, "en-gb"), 1);
        assert_eq!(score_language(&languages, "en_GB"), 1);
        assert_eq!(score_language(&languages, "fr-FR"), 0);
        assert_eq!(score_language(&languages, "zh"), -1);
    }

    #[test]
    fn empty_voice_list_is_permissive() {
        assert_eq!(score_language(&[], "anything"), 0);
    }

    #[tokio::test]
    async fn engine_starts_silent() {
        let (events_tx, _events_rx) = mpsc::channel(8);
        let engine = EspeakEngine::new(events_tx);
        assert!(!engine.is_speaking());
    }

    #[tokio::test]
    async fn speak_requires_initialization() {
        let (events_tx, _events_rx) = mpsc::channel(8);
        let mut engine = EspeakEngine::new(events_tx);
        let err = engine
            .speak("hello", FlushPolicy::ReplaceCurrent, "tag")
            .await
            .unwrap_err();
        assert!(matches!(err, TtsError::InitializationError(_)));
    }

    #[tokio::test]
    async fn stop_and_shutdown_are_safe_without_utterance() {
        let (events_tx, _events_rx) = mpsc::channel(8);
        let mut engine = EspeakEngine::new(events_tx);
        engine.stop().await.unwrap();
        engine.stop().await.unwrap();
        engine.shutdown().await.unwrap();
        assert!(!engine.is_speaking());
    }

    #[tokio::test]
    async fn missing_override_command_reports_unavailable() {
        let (events_tx, _events_rx) = mpsc::channel(8);
        let mut engine =
            EspeakEngine::new(events_tx).with_command("definitely-not-an-espeak-binary");
        let err = engine.initialize().await.unwrap_err();
        assert!(matches!(err, TtsError::EngineNotAvailable(_)));
    }

    #[tokio::test]
    async fn set_language_before_initialization_is_stored() {
        let (events_tx, _events_rx) = mpsc::channel(8);
        let mut engine = EspeakEngine::new(events_tx);
        engine.set_language("en_US").await.unwrap();
    }
}
