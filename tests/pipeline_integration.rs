//! Integration tests for the detection pipeline
//!
//! These tests drive segmentation, feature extraction and the untrained
//! (rule-based) classifier facade end to end on synthetic recordings.

use std::sync::Arc;
use std::thread;

use blank_detector::analysis::features::FeatureExtractor;
use blank_detector::config::SegmentationConfig;
use blank_detector::testing::synth;
use blank_detector::{
    AudioError, AudioSignal, BlankDetector, BlankLabel, ClassificationMethod, ClassifierFacade,
    RuleBasedClassifier, SilenceInterval,
};

const SR: u32 = 16_000;

fn untrained_facade() -> ClassifierFacade {
    ClassifierFacade::untrained(
        RuleBasedClassifier::default(),
        Arc::new(FeatureExtractor::new()),
    )
}

/// 0.3 s blank is NATURAL no matter what surrounds it
#[test]
fn test_short_blank_inside_steady_tone_is_natural() {
    let mut samples = synth::sine(SR, 440.0, 10.0, 0.5);
    samples.extend(synth::silence(SR, 0.3));
    samples.extend(synth::sine(SR, 440.0, 2.0, 0.5));
    let signal = AudioSignal::new(samples, SR).unwrap();
    let interval = SilenceInterval::new(10.0, 10.3).unwrap();

    let result = untrained_facade().classify(&signal, &interval).unwrap();
    assert_eq!(result.label, BlankLabel::Natural);
    assert_eq!(result.method, ClassificationMethod::Rule);
}

/// 11 s blank is ABNORMAL even with fades on both sides
#[test]
fn test_long_blank_with_fades_is_abnormal() {
    let mut samples = synth::sine(SR, 440.0, 4.0, 0.5);
    samples.extend(synth::faded_sine(SR, 440.0, 1.0, 0.5, true));
    samples.extend(synth::silence(SR, 11.0));
    samples.extend(synth::faded_sine(SR, 440.0, 1.0, 0.5, false));
    samples.extend(synth::sine(SR, 440.0, 2.0, 0.5));
    let signal = AudioSignal::new(samples, SR).unwrap();
    let interval = SilenceInterval::new(5.0, 16.0).unwrap();

    let result = untrained_facade().classify(&signal, &interval).unwrap();
    assert_eq!(result.label, BlankLabel::Abnormal);
    assert_eq!(result.confidence, 1.0);
}

#[test]
fn test_detector_end_to_end() {
    let mut samples = synth::tone_gap_tone(SR, 2.0, 12.0, 2.0, 0.5);
    let (natural, _, _) = synth::natural_blank(SR, 4.0);
    samples.extend(natural);
    samples.extend(synth::tone_gap_tone(SR, 1.0, 0.5, 1.0, 0.5));
    let signal = AudioSignal::new(samples, SR).unwrap();

    let detector = BlankDetector::new(&SegmentationConfig::default(), Arc::new(untrained_facade()));
    let report = detector.report(&signal).unwrap();

    // The 0.5 s gap is below the 3 s minimum
    assert_eq!(report.silences.len(), 2);
    assert_eq!(report.silences[0].result.label, BlankLabel::Abnormal);
    assert_eq!(report.silences[1].result.label, BlankLabel::Natural);
    assert!(report.silences[0].interval.start_time() < report.silences[1].interval.start_time());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["abnormal_count"], 1);
    assert_eq!(json["silences"][0]["alert_needed"], true);
    assert_eq!(json["silences"][1]["alert_needed"], false);
}

#[test]
fn test_interval_outside_signal_fails_single_call() {
    let signal = AudioSignal::new(synth::sine(SR, 440.0, 3.0, 0.5), SR).unwrap();
    let facade = untrained_facade();

    let outside = SilenceInterval::new(4.0, 5.0).unwrap();
    assert!(matches!(
        facade.classify(&signal, &outside),
        Err(AudioError::InvalidInterval { .. })
    ));

    // The facade remains usable
    let inside = SilenceInterval::new(1.0, 1.2).unwrap();
    assert!(facade.classify(&signal, &inside).is_ok());
}

#[test]
fn test_concurrent_classification_matches_sequential() {
    let (samples, start, end) = synth::natural_blank(SR, 4.0);
    let signal = Arc::new(AudioSignal::new(samples, SR).unwrap());
    let interval = SilenceInterval::new(start, end).unwrap();
    let facade = Arc::new(untrained_facade());
    let expected = facade.classify(&signal, &interval).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let facade = Arc::clone(&facade);
            let signal = Arc::clone(&signal);
            thread::spawn(move || facade.classify(&signal, &interval).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_feature_extraction_is_deterministic_across_threads() {
    let (samples, start, end) = synth::natural_blank(SR, 2.0);
    let signal = Arc::new(AudioSignal::new(samples, SR).unwrap());
    let interval = SilenceInterval::new(start, end).unwrap();
    let extractor = Arc::new(FeatureExtractor::new());

    let window = signal.window(&interval, 1.0).unwrap();
    let expected = extractor.extract_window(&window, SR);

    let handles: Vec<_> = (0..3)
        .map(|_| {
            let extractor = Arc::clone(&extractor);
            let signal = Arc::clone(&signal);
            thread::spawn(move || {
                let window = signal.window(&interval, 1.0).unwrap();
                extractor.extract_window(&window, SR)
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
