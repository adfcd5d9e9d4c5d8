/*!
 * Tests for caption normalization and ASS subtitle emission
 */

use anyhow::Result;
use std::fs;

use shortcap::subtitle_writer::{
    format_ass_time, sanitize_caption, wrap_caption, AssWriter, Template, NBSP,
};
use shortcap::timing::TimedSegment;

use crate::common;

fn segment(start: f64, end: f64, text: &str) -> TimedSegment {
    TimedSegment {
        start,
        end,
        text: text.to_string(),
        markup: None,
        pitch: None,
    }
}

/// Test that sanitization drops emphasis punctuation but keeps the question mark
#[test]
fn test_sanitize_caption_withPunctuation_shouldKeepOnlyQuestionMark() {
    assert_eq!(sanitize_caption("정말, 위험합니다!"), "정말 위험합니다");
    assert_eq!(sanitize_caption("괜찮을까요?"), "괜찮을까요?");
    assert_eq!(sanitize_caption("Hello, world! (ok)"), "Hello world ok");
}

/// Test that newlines and whitespace runs collapse to single spaces
#[test]
fn test_sanitize_caption_withNewlinesAndRuns_shouldCollapseWhitespace() {
    let out = sanitize_caption("첫 줄\n둘째  줄\r\n셋째   줄");
    assert_eq!(out, "첫 줄 둘째 줄 셋째 줄");
    assert!(!out.contains('\n'));
}

/// Test that a fully stripped text becomes the placeholder, never empty
#[test]
fn test_sanitize_caption_withOnlySymbols_shouldReturnPlaceholder() {
    let out = sanitize_caption("!!! ... ***");
    assert_eq!(out, NBSP.to_string());
    assert!(!out.is_empty());
}

/// Test sanitization idempotency
#[test]
fn test_sanitize_caption_withRepeatedApplication_shouldBeIdempotent() {
    for input in ["정말,  위험합니다!", "Hello\nworld", "!!!", "괜찮을까요? 네"] {
        let once = sanitize_caption(input);
        assert_eq!(sanitize_caption(&once), once);
    }
}

/// Test that short captions pass through unwrapped
#[test]
fn test_wrap_caption_withShortText_shouldReturnUnchanged() {
    let out = wrap_caption("짧은 자막", 14, 16);
    assert_eq!(out, "짧은 자막");
    assert!(!out.contains("\\N"));
}

/// Test greedy two-line wrapping on word boundaries
#[test]
fn test_wrap_caption_withSpacedText_shouldWrapOnWordBoundary() {
    let out = wrap_caption("지구의 산소 농도가 줄어든다면 어떻게 될까요", 14, 16);
    let (left, right) = out.split_once("\\N").expect("expected a two-line caption");

    assert!(left.chars().count() <= 16, "left line too long: {}", left);
    assert!(!left.is_empty());
    assert!(!right.is_empty());
}

/// Test the hard midpoint fallback for unbreakable text
#[test]
fn test_wrap_caption_withUnbreakableText_shouldSplitAtMidpoint() {
    // 20 Hangul characters without a single space
    let text = "이것은매우긴자막문장으로한줄에담기어렵다";
    assert_eq!(text.chars().count(), 20);

    let out = wrap_caption(text, 14, 16);
    assert_eq!(out, "이것은매우긴자막문장\\N으로한줄에담기어렵다");
}

/// Test the midpoint fallback when the first word alone exceeds the target
#[test]
fn test_wrap_caption_withOversizedFirstWord_shouldSplitAtMidpoint() {
    let out = wrap_caption("아주아주아주아주아주아주아주긴단어 뒤", 14, 16);
    assert!(out.contains("\\N"));
    let (left, _right) = out.split_once("\\N").unwrap();
    // Midpoint split, not word accumulation
    assert_ne!(left, "아주아주아주아주아주아주아주긴단어");
}

/// Test that no wrapped line exceeds the configured width plus slack
#[test]
fn test_wrap_caption_withVariousTexts_shouldBoundLineLength() {
    let inputs = [
        "가나다 라마바 사아자 차카타 파하 가나다 라마바",
        "하나 둘 셋 넷 다섯 여섯 일곱 여덟 아홉 열",
        "단어하나로만이루어진아주긴자막입니다정말로",
    ];
    for input in inputs {
        let out = wrap_caption(input, 14, 16);
        for line in out.split("\\N") {
            assert!(
                line.chars().count() <= 16 + 8,
                "line too long for input {:?}: {:?}",
                input,
                line
            );
        }
    }
}

/// Test ASS timestamp formatting
#[test]
fn test_format_ass_time_withVariousValues_shouldFormatCentiseconds() {
    assert_eq!(format_ass_time(0.0), "0:00:00.00");
    assert_eq!(format_ass_time(1.2), "0:00:01.20");
    assert_eq!(format_ass_time(83.456), "0:01:23.46");
    assert_eq!(format_ass_time(3600.0), "1:00:00.00");
}

/// Test that fractional centiseconds carry instead of printing three digits
#[test]
fn test_format_ass_time_withRoundingCarry_shouldCarryIntoSeconds() {
    assert_eq!(format_ass_time(1.999), "0:00:02.00");
    assert_eq!(format_ass_time(3661.999), "1:01:02.00");
}

/// Test that negative times clamp to zero
#[test]
fn test_format_ass_time_withNegativeValue_shouldClampToZero() {
    assert_eq!(format_ass_time(-3.5), "0:00:00.00");
}

/// Test template registry lookup and fallback
#[test]
fn test_template_resolve_withKnownAndUnknownNames_shouldFallBack() {
    assert_eq!(Template::resolve("educational").name, "educational");
    assert_eq!(Template::resolve("center").name, "center");
    // Unknown names resolve to the default
    assert_eq!(Template::resolve("cinematic").name, "educational");

    assert!(Template::names().contains(&"educational"));
    assert!(Template::names().contains(&"center"));
}

/// Test emission: header block, style line and dialogue cues
#[test]
fn test_ass_writer_withSegments_shouldEmitHeaderAndDialogues() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("captions.ass");

    let writer = AssWriter::with_template("educational", true, 14, 2);
    let segments = vec![
        segment(0.0, 1.2, "안녕하세요."),
        segment(1.2, 2.1, "반갑습니다!"),
    ];
    writer.write(&segments, &path)?;

    let content = fs::read_to_string(&path)?;
    assert!(content.starts_with("[Script Info]"));
    assert!(content.contains("PlayResX: 1080"));
    assert!(content.contains("PlayResY: 1920"));
    assert!(content.contains("Style: Default,Pretendard-Bold,56,"));
    assert!(content.contains("[Events]"));

    let dialogues = common::read_dialogue_lines(&path)?;
    assert_eq!(dialogues.len(), 2);
    assert!(dialogues[0].contains(r"{\an2}"));
    Ok(())
}

/// Test the emit-then-parse round trip of times and text
#[test]
fn test_ass_writer_withSegments_shouldRoundTripTimesAndText() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("roundtrip.ass");

    let writer = AssWriter::with_template("educational", false, 14, 2);
    let segments = vec![
        segment(0.0, 1.25, "첫 번째 자막"),
        segment(1.25, 3.8, "두 번째 자막"),
    ];
    writer.write(&segments, &path)?;

    let dialogues = common::read_dialogue_lines(&path)?;
    let mut parsed = Vec::new();
    for line in &dialogues {
        let rest = line.strip_prefix("Dialogue: ").unwrap();
        let fields: Vec<&str> = rest.splitn(10, ',').collect();
        assert_eq!(fields.len(), 10);
        let text = fields[9].strip_prefix(r"{\an2}").unwrap();
        parsed.push((fields[1].to_string(), fields[2].to_string(), text.to_string()));
    }

    assert_eq!(parsed[0], ("0:00:00.00".into(), "0:00:01.25".into(), "첫 번째 자막".into()));
    assert_eq!(parsed[1], ("0:00:01.25".into(), "0:00:03.80".into(), "두 번째 자막".into()));
    Ok(())
}

/// Test that a question mark survives on the final cue while the strip rule runs
#[test]
fn test_ass_writer_withFinalCue_shouldKeepQuestionMark() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("final.ass");

    let writer = AssWriter::with_template("educational", true, 14, 2);
    let segments = vec![
        segment(0.0, 1.0, "생각보다 위험합니다."),
        segment(1.0, 2.0, "멈춘다면?"),
    ];
    writer.write(&segments, &path)?;

    let dialogues = common::read_dialogue_lines(&path)?;
    assert!(dialogues[1].ends_with("멈춘다면?"));
    // No cue text ever ends with a period
    assert!(!dialogues[0].ends_with('.'));
    Ok(())
}

/// Test that a pitch-colored segment gets an inline color tag
#[test]
fn test_ass_writer_withPitchedSegment_shouldEmitColorTag() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("colored.ass");

    let writer = AssWriter::with_template("center", true, 14, 2);
    let mut seg = segment(0.0, 1.0, "만약이라면?");
    seg.pitch = Some(9.0);
    let plain = segment(1.0, 2.0, "그렇습니다");

    writer.write(&[seg, plain], &path)?;

    let dialogues = common::read_dialogue_lines(&path)?;
    assert!(dialogues[0].contains(r"{\an5}{\c&H33CCFF&}"));
    assert!(!dialogues[1].contains(r"{\c&H"));
    Ok(())
}

/// Test two-line wrapping inside the emitter for long cue text
#[test]
fn test_ass_writer_withLongCueText_shouldWrapToTwoLines() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("wrapped.ass");

    let writer = AssWriter::with_template("educational", true, 14, 2);
    let segments = vec![segment(0.0, 3.0, "지구의 산소 농도가 단 오 퍼센트 줄어든다면")];
    writer.write(&segments, &path)?;

    let dialogues = common::read_dialogue_lines(&path)?;
    assert!(dialogues[0].contains("\\N"));
    Ok(())
}

/// Test single-line mode never inserts a break marker
#[test]
fn test_ass_writer_withSingleLineMode_shouldNotWrap() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("oneline.ass");

    let writer = AssWriter::with_template("educational", true, 14, 1);
    let segments = vec![segment(0.0, 3.0, "지구의 산소 농도가 단 오 퍼센트 줄어든다면")];
    writer.write(&segments, &path)?;

    let dialogues = common::read_dialogue_lines(&path)?;
    assert!(!dialogues[0].contains("\\N"));
    Ok(())
}

/// Test that missing parent directories are created on write
#[test]
fn test_ass_writer_withNestedOutputPath_shouldCreateParentDirs() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("deep").join("nested").join("out.ass");

    let writer = AssWriter::with_template("educational", true, 14, 2);
    writer.write(&[segment(0.0, 1.0, "자막")], &path)?;

    assert!(path.exists());
    Ok(())
}
