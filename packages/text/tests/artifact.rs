//! Persistence tests for the bundled symptom model artifact

use eyescan_text::{SymptomClassifier, SymptomModel, TextPreprocessor};
use eyescan_types::{Artifact, EyescanError, rank};

fn bootstrapped() -> SymptomModel {
    SymptomModel::bootstrap(&TextPreprocessor::new()).unwrap()
}

#[test]
fn saved_model_loads_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("symptom_classifier.msgpack");

    let model = bootstrapped();
    model.save(&path).unwrap();
    let loaded = SymptomModel::load(&path, &()).unwrap();
    assert_eq!(loaded.vectorizer(), model.vectorizer());
    assert_eq!(loaded.classes(), model.classes());

    let before = rank(SymptomClassifier::new(model).score("itchy watery eyes").unwrap());
    let after = rank(SymptomClassifier::new(loaded).score("itchy watery eyes").unwrap());
    assert_eq!(before, after);
}

#[test]
fn missing_artifact_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let result = SymptomModel::load(&dir.path().join("absent.msgpack"), &());
    assert!(matches!(result, Err(EyescanError::ArtifactNotFound(_))));
}

#[test]
fn corrupt_artifact_is_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("symptom_classifier.msgpack");
    std::fs::write(&path, b"definitely not messagepack").unwrap();

    let err = SymptomModel::load(&path, &()).unwrap_err();
    assert!(matches!(err, EyescanError::Persistence { .. }));
    assert!(err.is_persistence());
}

#[test]
fn foreign_envelope_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("other.msgpack");
    let bytes = eyescan_text::artifact::encode(&path, "some-other-model", &bootstrapped()).unwrap();
    std::fs::write(&path, bytes).unwrap();

    let err = SymptomModel::load(&path, &()).unwrap_err();
    assert!(err.to_string().contains("some-other-model"));
}
