/*!
 * Tests for script segmentation
 */

use shortcap::segmenter::{dedupe_adjacent_texts, normalize_units, split_to_sentences};

/// Test sentence splitting on terminal punctuation followed by whitespace
#[test]
fn test_split_to_sentences_withTerminalPunctuation_shouldSplitUnits() {
    let units = split_to_sentences("안녕하세요. 반갑습니다!");
    assert_eq!(units, vec!["안녕하세요.", "반갑습니다!"]);
}

/// Test that a script without terminal punctuation stays one unit
#[test]
fn test_split_to_sentences_withNoTerminalPunctuation_shouldReturnWholeScript() {
    let units = split_to_sentences("마침표 없는 한 줄짜리 대본");
    assert_eq!(units, vec!["마침표 없는 한 줄짜리 대본"]);
}

/// Test that empty and whitespace-only scripts produce no units
#[test]
fn test_split_to_sentences_withEmptyScript_shouldReturnEmpty() {
    assert!(split_to_sentences("").is_empty());
    assert!(split_to_sentences("   \n  ").is_empty());
}

/// Test that runs of terminal punctuation split only once, after the run
#[test]
fn test_split_to_sentences_withPunctuationRun_shouldSplitAfterRun() {
    let units = split_to_sentences("괜찮아요!? 네.");
    assert_eq!(units, vec!["괜찮아요!?", "네."]);
}

/// Test that a period not followed by whitespace does not split
#[test]
fn test_split_to_sentences_withEmbeddedPeriod_shouldNotSplit() {
    let units = split_to_sentences("version 3.5 shipped today");
    assert_eq!(units, vec!["version 3.5 shipped today"]);
}

/// Test splitting across mixed punctuation and newline whitespace
#[test]
fn test_split_to_sentences_withNewlineAfterPunctuation_shouldSplit() {
    let units = split_to_sentences("질문인가요?\n그렇습니다. 끝");
    assert_eq!(units, vec!["질문인가요?", "그렇습니다.", "끝"]);
}

/// Test determinism: same input always yields the same split
#[test]
fn test_split_to_sentences_withRepeatedCalls_shouldBeDeterministic() {
    let script = "하나. 둘! 셋?";
    assert_eq!(split_to_sentences(script), split_to_sentences(script));
    assert_eq!(split_to_sentences(script).len(), 3);
}

/// Test that unit normalization trims and drops empty entries
#[test]
fn test_normalize_units_withBlankEntries_shouldDropThem() {
    let input = vec![
        "  첫 번째  ".to_string(),
        "".to_string(),
        "   ".to_string(),
        "두 번째".to_string(),
    ];
    assert_eq!(normalize_units(&input), vec!["첫 번째", "두 번째"]);
}

/// Test adjacent duplicate collapsing
#[test]
fn test_dedupe_adjacent_texts_withRepeats_shouldCollapseRuns() {
    let input = vec![
        "가".to_string(),
        "가".to_string(),
        "나".to_string(),
        "가".to_string(),
    ];
    assert_eq!(dedupe_adjacent_texts(&input), vec!["가", "나", "가"]);
}
