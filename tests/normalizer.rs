//! Normalisation properties over whole documents.

use rstest::rstest;
use topcat::{Normalizer, TextProcessor};

#[rstest]
#[case("Goals! Goals! 2 more goals!!")]
#[case("The committee discussed the budgets.")]
#[case("a line\\nbroken by an escaped newline")]
#[case("no digits no punctuation here")]
#[case("")]
fn normalisation_is_a_projection(#[case] document: &str) {
    let normalizer = Normalizer::default();
    let once = normalizer.normalize(document);
    assert_eq!(normalizer.normalize(&once), once);
}

#[rstest]
#[case("0123456789", "")]
#[case("?!.,;:'\"()[]{}", "")]
#[case("   \t\n  ", "")]
fn degenerate_documents_normalise_to_empty(#[case] document: &str, #[case] expected: &str) {
    let normalizer = Normalizer::default();
    assert_eq!(normalizer.normalize(document), expected);
}

#[test]
fn normalised_text_is_lowercase_single_spaced() {
    let normalizer = Normalizer::default();
    let normalized = normalizer.normalize("  Markets   RALLIED\tsharply  ");
    assert_eq!(normalized, "market rallied sharply");
}

#[test]
#[expect(clippy::expect_used, reason = "test should fail loudly")]
fn the_processor_seam_is_infallible() {
    let normalizer = Normalizer::default();
    let normalized = normalizer.process("Votes counted: 1,204").expect("infallible");
    assert_eq!(normalized, "vote counted");
}
