/*!
 * Tests for sentence segmentation
 */

use std::sync::Arc;

use doctrans::segmentation::{
    NoLocaleSegmenter, Segmenter, UnicodeSentenceSegmenter, fallback_split, segment_text,
};

fn texts(segments: &[doctrans::TextSegment]) -> Vec<&str> {
    segments.iter().map(|s| s.text.as_str()).collect()
}

#[test]
fn test_segment_text_withTwoSentences_shouldKeepSpaceOnFirst() {
    let segments = segment_text("Hello world. How are you?", "en");

    assert_eq!(texts(&segments), vec!["Hello world. ", "How are you?"]);
    assert_eq!(segments[0].id, 0);
    assert_eq!(segments[1].id, 1);
}

#[test]
fn test_segment_text_withEmptyString_shouldReturnOneEmptySegment() {
    let segments = segment_text("", "en");

    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].id, 0);
    assert_eq!(segments[0].text, "");
}

#[test]
fn test_fallback_withEmptyString_shouldReturnOneEmptySegment() {
    let segments = Segmenter::fallback_only().segment("", "en");
    assert_eq!(texts(&segments), vec![""]);
}

#[test]
fn test_segment_withRegionTag_shouldUseLocaleFacility() {
    let segments = segment_text("Olá. Tudo bem?", "pt-BR");
    assert_eq!(texts(&segments), vec!["Olá. ", "Tudo bem?"]);
}

#[test]
fn test_segment_withUnknownLanguage_shouldUseFallback() {
    let segments = segment_text("Hello world. How are you?", "xx");
    assert_eq!(texts(&segments), vec!["Hello world.", " How are you?"]);
}

#[test]
fn test_segment_ids_shouldBeContiguousFromZero() {
    let segments = segment_text("One. Two! Three? Four.", "en");
    let ids: Vec<usize> = segments.iter().map(|s| s.id).collect();
    assert_eq!(ids, (0..segments.len()).collect::<Vec<_>>());
}

#[test]
fn test_segments_shouldConcatenateBackToInput() {
    let input = "  Wait... what?! Are you sure?? Yes.\nNew line without stop";
    for segmenter in [
        Segmenter::default(),
        Segmenter::fallback_only(),
        Segmenter::new(Arc::new(NoLocaleSegmenter)),
    ] {
        let joined: String = segmenter.segment(input, "en").into_iter().map(|s| s.text).collect();
        assert_eq!(joined, input);
    }
}

#[test]
fn test_fallback_shouldBeDeterministic() {
    let input = "First point. Second point! Is it a third? Maybe...";
    let segmenter = Segmenter::new(Arc::new(NoLocaleSegmenter));

    let first = segmenter.segment(input, "en");
    let second = segmenter.segment(input, "en");

    assert_eq!(first, second);
    assert_eq!(
        texts(&first),
        vec!["First point.", " Second point!", " Is it a third?", " Maybe..."]
    );
}

#[test]
fn test_fallback_split_withoutTerminator_shouldReturnWholeText() {
    assert_eq!(fallback_split("no terminator here"), vec!["no terminator here"]);
}

#[test]
fn test_unicode_segmenter_shouldOnlySupportKnownLanguages() {
    use doctrans::segmentation::LocaleSegmenter;

    assert!(UnicodeSentenceSegmenter.supports("de"));
    assert!(UnicodeSentenceSegmenter.supports("fra"));
    assert!(!UnicodeSentenceSegmenter.supports("klingon"));
}
