//! End-to-end pipeline scenarios over artefacts written to disk.

use std::fs;
use std::path::{Path, PathBuf};

use rstest::{fixture, rstest};
use tempfile::TempDir;
use topcat::providers::artefact::sha256_hex;
use topcat::{ClassifyFn, DefaultService, Label, ServiceConfig, StartupError};

/// Vocabulary shared by the scenario artefacts, column order fixed.
const VOCABULARY: &[&str] = &["football", "goal", "election", "market"];

fn write_vectorizer(dir: &Path) -> PathBuf {
    let vocabulary: serde_json::Map<String, serde_json::Value> = VOCABULARY
        .iter()
        .enumerate()
        .map(|(index, term)| ((*term).to_string(), serde_json::json!(index)))
        .collect();
    let artefact = serde_json::json!({
        "vocabulary": vocabulary,
        "idf": [1.0, 1.0, 1.0, 1.0],
    });
    let path = dir.join("vectorizer.json");
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fs::write(&path, artefact.to_string()).expect("write vectorizer artefact");
    path
}

/// A three-class model where `football` and `goal` overwhelmingly favour
/// `sport`, driving its probability above 0.9 for sporting text.
fn write_peaked_classifier(dir: &Path) -> PathBuf {
    let third = (1.0f64 / 3.0).ln();
    let strong = (0.4f64).ln();
    let weak = (1.0e-4f64).ln();
    let artefact = serde_json::json!({
        "classes": ["business", "politics", "sport"],
        "class_log_prior": [third, third, third],
        "feature_log_prob": [
            [weak, weak, weak, strong],
            [weak, weak, strong, weak],
            [strong, strong, weak, weak],
        ],
    });
    let path = dir.join("classifier.json");
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fs::write(&path, artefact.to_string()).expect("write classifier artefact");
    path
}

/// A ten-class model whose rows and priors are identical, so every feature
/// vector yields a near-uniform distribution.
fn write_uniform_classifier(dir: &Path) -> PathBuf {
    let classes: Vec<String> = (0..10).map(|index| format!("class_{index}")).collect();
    let prior = (0.1f64).ln();
    let row = vec![(0.25f64).ln(); VOCABULARY.len()];
    let artefact = serde_json::json!({
        "classes": classes,
        "class_log_prior": vec![prior; 10],
        "feature_log_prob": vec![row; 10],
    });
    let path = dir.join("classifier.json");
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    fs::write(&path, artefact.to_string()).expect("write classifier artefact");
    path
}

fn config(classifier: PathBuf, vectorizer: PathBuf) -> ServiceConfig {
    ServiceConfig {
        classifier_file: classifier,
        vectorizer_file: vectorizer,
        other_threshold: 0.1,
        classifier_sha256: None,
        vectorizer_sha256: None,
    }
}

#[fixture]
fn workdir() -> TempDir {
    #[expect(clippy::expect_used, reason = "test should fail loudly")]
    TempDir::new().expect("create temp dir")
}

#[rstest]
#[expect(clippy::expect_used, reason = "test should fail loudly")]
fn sporting_document_is_labelled_sport(workdir: TempDir) {
    let config = config(
        write_peaked_classifier(workdir.path()),
        write_vectorizer(workdir.path()),
    );
    let service = DefaultService::from_config(&config).expect("startup succeeds");
    let label = service
        .classify("Two late goals settled a breathless football final.")
        .expect("classification succeeds");
    assert_eq!(label, Label::Known("sport".into()));
}

#[rstest]
#[expect(clippy::expect_used, reason = "test should fail loudly")]
fn near_uniform_distribution_is_labelled_other(workdir: TempDir) {
    let config = config(
        write_uniform_classifier(workdir.path()),
        write_vectorizer(workdir.path()),
    );
    let service = DefaultService::from_config(&config).expect("startup succeeds");
    let label = service
        .classify("An unremarkable note about nothing in particular.")
        .expect("classification succeeds");
    assert_eq!(label, Label::Other);
}

#[rstest]
#[expect(clippy::expect_used, reason = "test should fail loudly")]
fn empty_document_yields_a_defined_label(workdir: TempDir) {
    let config = config(
        write_uniform_classifier(workdir.path()),
        write_vectorizer(workdir.path()),
    );
    let service = DefaultService::from_config(&config).expect("startup succeeds");
    let label = service.classify("").expect("classification succeeds");
    assert_eq!(label, Label::Other);
}

#[rstest]
#[expect(clippy::expect_used, reason = "test should fail loudly")]
fn recorded_digests_are_verified(workdir: TempDir) {
    let classifier = write_peaked_classifier(workdir.path());
    let vectorizer = write_vectorizer(workdir.path());
    let mut config = config(classifier, vectorizer.clone());
    let bytes = fs::read(&vectorizer).expect("read vectorizer artefact");
    config.vectorizer_sha256 = Some(sha256_hex(&bytes));
    assert!(DefaultService::from_config(&config).is_ok());
}

#[rstest]
#[expect(clippy::expect_used, reason = "test should fail loudly")]
fn mismatched_digest_is_fatal(workdir: TempDir) {
    let mut config = config(
        write_peaked_classifier(workdir.path()),
        write_vectorizer(workdir.path()),
    );
    config.vectorizer_sha256 = Some("00".repeat(32));
    let error = DefaultService::from_config(&config).expect_err("checksum must fail");
    assert!(matches!(error, StartupError::Vectorizer(_)));
}

#[rstest]
#[expect(clippy::expect_used, reason = "test should fail loudly")]
fn missing_artefact_is_fatal(workdir: TempDir) {
    let config = config(
        workdir.path().join("no_such_classifier.json"),
        write_vectorizer(workdir.path()),
    );
    let error = DefaultService::from_config(&config).expect_err("load must fail");
    assert!(matches!(error, StartupError::Model(_)));
}

#[rstest]
#[expect(clippy::expect_used, reason = "test should fail loudly")]
fn mismatched_artefact_dimensions_are_fatal(workdir: TempDir) {
    let classifier = write_peaked_classifier(workdir.path());
    // Narrower vocabulary than the classifier was fitted against.
    let vectorizer = workdir.path().join("vectorizer.json");
    let artefact = serde_json::json!({
        "vocabulary": {"football": 0, "goal": 1},
        "idf": [1.0, 1.0],
    });
    fs::write(&vectorizer, artefact.to_string()).expect("write vectorizer artefact");
    let config = config(classifier, vectorizer);
    let error = DefaultService::from_config(&config).expect_err("dimension check must fail");
    assert!(matches!(error, StartupError::FeatureMismatch { .. }));
}
