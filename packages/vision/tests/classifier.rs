//! Scoring and persistence tests for the image classifier.
//!
//! The network is built at a small input size to keep these fast.

use eyescan_types::{Artifact, ConditionLabel, EyescanError, Readiness, rank};
use eyescan_vision::{ImageClassifier, ImageModelOptions};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

const SMALL: ImageModelOptions = ImageModelOptions { input_size: 32 };

fn eye_png() -> Vec<u8> {
    let img = RgbImage::from_fn(48, 36, |x, y| {
        Rgb([(x * 5) as u8, (y * 7) as u8, ((x + y) * 3) as u8])
    });
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut bytes, ImageFormat::Png)
        .unwrap();
    bytes.into_inner()
}

#[test]
fn untrained_scores_cover_every_label_and_sum_to_one() {
    let classifier = ImageClassifier::untrained(&SMALL).unwrap();
    assert_eq!(classifier.readiness(), Readiness::Untrained);

    let scores = classifier.score(&eye_png()).unwrap();
    assert!(!scores.reliable);
    assert_eq!(scores.scores.len(), ConditionLabel::ALL.len());

    let labels: Vec<_> = scores.scores.iter().map(|(l, _)| *l).collect();
    assert_eq!(labels, ConditionLabel::ALL.to_vec());

    let total: f64 = scores.scores.iter().map(|(_, p)| p).sum();
    assert!((total - 1.0).abs() < 1e-4, "sum was {total}");
    assert!(scores.scores.iter().all(|(_, p)| (0.0..=1.0).contains(p)));
}

#[test]
fn saved_weights_reload_as_trained_with_identical_ranking() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eye_disease_cnn.safetensors");
    let bytes = eye_png();

    let original = ImageClassifier::untrained(&SMALL).unwrap();
    original.save(&path).unwrap();

    let restored = ImageClassifier::load(&path, &SMALL).unwrap();
    assert_eq!(restored.readiness(), Readiness::Trained);

    let before = rank(original.score(&bytes).unwrap());
    let after = rank(restored.score(&bytes).unwrap());
    assert_eq!(before.len(), after.len());
    for (a, b) in before.iter().zip(&after) {
        assert_eq!(a.label, b.label);
        assert!((a.confidence - b.confidence).abs() < 1e-6);
    }
}

#[test]
fn weights_for_another_geometry_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eye_disease_cnn.safetensors");
    ImageClassifier::untrained(&SMALL).unwrap().save(&path).unwrap();

    let err = ImageClassifier::load(&path, &ImageModelOptions { input_size: 64 })
        .err()
        .unwrap();
    assert!(err.is_persistence(), "unexpected error: {err}");
}

#[test]
fn missing_weights_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = ImageClassifier::load(&dir.path().join("absent.safetensors"), &SMALL)
        .err()
        .unwrap();
    assert!(matches!(err, EyescanError::ArtifactNotFound(_)));
}

#[test]
fn corrupt_weights_are_a_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("eye_disease_cnn.safetensors");
    std::fs::write(&path, b"garbage").unwrap();

    let err = ImageClassifier::load(&path, &SMALL).err().unwrap();
    assert!(err.is_persistence());
}

#[test]
fn undecodable_bytes_fail_before_inference() {
    let classifier = ImageClassifier::untrained(&SMALL).unwrap();
    assert!(matches!(
        classifier.score(b"<html>not an image</html>"),
        Err(EyescanError::Decode(_))
    ));
}

#[test]
fn input_below_minimum_is_rejected() {
    let result = ImageClassifier::untrained(&ImageModelOptions { input_size: 16 });
    assert!(matches!(result, Err(EyescanError::Config(_))));
}
