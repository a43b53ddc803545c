use super::*;
use crate::audio::MemoryAudioSource;
use crate::model::{ForestParams, ModelTrainer, TrainingExample};
use crate::testing::synth;

const SR: u32 = 16_000;

/// Helper to create an untrained facade with default rules
fn untrained_facade() -> ClassifierFacade {
    ClassifierFacade::untrained(
        RuleBasedClassifier::default(),
        Arc::new(FeatureExtractor::new()),
    )
}

/// Helper to train a small artifact on synthetic natural/abnormal blanks
fn trained_artifact() -> TrainedModelArtifact {
    let mut source = MemoryAudioSource::new();
    let mut examples = Vec::new();
    for i in 0..3 {
        let (samples, start, end) = synth::natural_blank(SR, 0.8 + 0.3 * i as f64);
        let name = format!("n{}", i);
        source.insert(name.clone(), AudioSignal::new(samples, SR).unwrap());
        examples.push(TrainingExample::new(name, start, end, BlankLabel::Natural).unwrap());

        let (samples, start, end) = synth::abnormal_blank(SR, 5.0 + i as f64);
        let name = format!("a{}", i);
        source.insert(name.clone(), AudioSignal::new(samples, SR).unwrap());
        examples.push(TrainingExample::new(name, start, end, BlankLabel::Abnormal).unwrap());
    }

    let trainer = ModelTrainer::new(
        Arc::new(source),
        Arc::new(FeatureExtractor::new()),
        ForestParams {
            n_estimators: 15,
            ..ForestParams::default()
        },
    );
    trainer.train(&examples).unwrap().artifact
}

#[test]
fn test_untrained_long_dead_air_is_abnormal() {
    let (samples, start, end) = synth::abnormal_blank(SR, 12.0);
    let signal = AudioSignal::new(samples, SR).unwrap();
    let interval = SilenceInterval::new(start, end).unwrap();

    let result = untrained_facade().classify(&signal, &interval).unwrap();
    assert_eq!(result.label, BlankLabel::Abnormal);
    assert_eq!(result.method, ClassificationMethod::Rule);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn test_untrained_faded_pause_is_natural() {
    let (samples, start, end) = synth::natural_blank(SR, 4.0);
    let signal = AudioSignal::new(samples, SR).unwrap();
    let interval = SilenceInterval::new(start, end).unwrap();

    let result = untrained_facade().classify(&signal, &interval).unwrap();
    assert_eq!(result.label, BlankLabel::Natural);
    assert_eq!(result.method, ClassificationMethod::Rule);
}

#[test]
fn test_trained_facade_uses_model() {
    let facade = ClassifierFacade::from_artifact(
        Some(trained_artifact()),
        RuleBasedClassifier::default(),
        Arc::new(FeatureExtractor::new()),
    );
    assert_eq!(facade.state(), ClassifierState::Trained);

    let (samples, start, end) = synth::abnormal_blank(SR, 6.0);
    let signal = AudioSignal::new(samples, SR).unwrap();
    let interval = SilenceInterval::new(start, end).unwrap();

    let result = facade.classify(&signal, &interval).unwrap();
    assert_eq!(result.method, ClassificationMethod::Model);
    assert!(
        (0.5..=1.0).contains(&result.confidence),
        "Confidence should be between 0.5 and 1.0, got {}",
        result.confidence
    );
}

#[test]
fn test_incompatible_artifact_falls_back_to_rules() {
    let mut artifact = trained_artifact();
    artifact.schema_version += 1;

    let facade = ClassifierFacade::from_artifact(
        Some(artifact),
        RuleBasedClassifier::default(),
        Arc::new(FeatureExtractor::new()),
    );
    assert_eq!(facade.state(), ClassifierState::Untrained);
}

#[test]
fn test_load_missing_artifact_is_untrained() {
    let facade = ClassifierFacade::load(
        "/nonexistent/blank_classifier.json",
        RuleBasedClassifier::default(),
        Arc::new(FeatureExtractor::new()),
    );
    assert_eq!(facade.state(), ClassifierState::Untrained);
}

#[test]
fn test_load_saved_artifact_is_trained() {
    let path = std::env::temp_dir().join(format!(
        "blank_detector_facade_{}.json",
        std::process::id()
    ));
    trained_artifact().save(&path).unwrap();

    let facade = ClassifierFacade::load(
        &path,
        RuleBasedClassifier::default(),
        Arc::new(FeatureExtractor::new()),
    );
    assert_eq!(facade.state(), ClassifierState::Trained);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_interval_beyond_signal_is_rejected() {
    let signal = AudioSignal::new(vec![0.0; SR as usize * 2], SR).unwrap();
    let interval = SilenceInterval::new(5.0, 6.0).unwrap();

    let err = untrained_facade().classify(&signal, &interval).unwrap_err();
    assert!(matches!(err, AudioError::InvalidInterval { .. }));
}

#[test]
fn test_classify_ref_errors() {
    let source = MemoryAudioSource::new()
        .with_signal("take", AudioSignal::new(vec![0.0; SR as usize * 2], SR).unwrap());
    let facade = untrained_facade();

    let missing = facade.classify_ref(&source, "other", 0.0, 1.0).unwrap_err();
    assert!(matches!(missing, AudioError::MissingAudio { .. }));

    let inverted = facade.classify_ref(&source, "take", 1.0, 0.5).unwrap_err();
    assert!(matches!(inverted, AudioError::InvalidInterval { .. }));

    let ok = facade.classify_ref(&source, "take", 0.5, 1.0).unwrap();
    assert_eq!(ok.label, BlankLabel::Natural);
}

#[test]
fn test_classify_all_and_serialization() {
    let (samples, start, end) = synth::abnormal_blank(SR, 12.0);
    let signal = AudioSignal::new(samples, SR).unwrap();
    let interval = SilenceInterval::new(start, end).unwrap();

    let classified = untrained_facade().classify_all(&signal, &[interval]).unwrap();
    assert_eq!(classified.len(), 1);
    assert!(classified[0].alert_needed());

    let value = serde_json::to_value(classified[0]).unwrap();
    assert_eq!(value["label"], "abnormal");
    assert_eq!(value["method"], "rule");
    assert_eq!(value["alert_needed"], true);
    assert!((value["duration"].as_f64().unwrap() - 12.0).abs() < 1e-6);
}

#[test]
fn test_blank_label_parsing() {
    assert_eq!("Natural".parse::<BlankLabel>().unwrap(), BlankLabel::Natural);
    assert_eq!(" abnormal ".parse::<BlankLabel>().unwrap(), BlankLabel::Abnormal);
    assert!("silence".parse::<BlankLabel>().is_err());
    assert_eq!(BlankLabel::Abnormal.to_string(), "abnormal");
}

#[test]
fn test_invalid_context_is_ignored() {
    let facade = untrained_facade().with_context_secs(f64::NAN);
    assert_eq!(facade.context_secs(), DEFAULT_CONTEXT_SECS);
}

#[test]
fn test_sub_sample_interval_is_classified() {
    let signal = AudioSignal::new(vec![0.0; SR as usize * 3], SR).unwrap();
    let interval = SilenceInterval::new(1.0, 1.00003).unwrap();

    let result = untrained_facade().classify(&signal, &interval).unwrap();
    assert_eq!(result.label, BlankLabel::Natural);
    assert_eq!(result.method, ClassificationMethod::Rule);
}

#[test]
fn test_sub_sample_interval_with_trained_model() {
    let facade = ClassifierFacade::from_artifact(
        Some(trained_artifact()),
        RuleBasedClassifier::default(),
        Arc::new(FeatureExtractor::new()),
    );
    let signal = AudioSignal::new(vec![0.0; SR as usize * 3], SR).unwrap();
    let interval = SilenceInterval::new(1.0, 1.00003).unwrap();

    let result = facade.classify(&signal, &interval).unwrap();
    assert_eq!(result.method, ClassificationMethod::Model);
    assert!((0.5..=1.0).contains(&result.confidence));
}
