use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::SubtitleConfig;
use crate::errors::SubtitleError;
use crate::prosody;
use crate::timing::TimedSegment;

// @module: Caption normalization and ASS subtitle file emission

/// Placeholder for cues whose text sanitizes to nothing. Strict subtitle
/// parsers reject a truly empty dialogue line.
pub const NBSP: char = '\u{00A0}';

// @const: Everything that is not a Latin letter, digit, Hangul syllable,
// whitespace or question mark
static NON_CAPTION_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^A-Za-z0-9\x{AC00}-\x{D7A3}\s?]").unwrap()
});

// @const: Runs of two or more whitespace characters
static MULTI_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

// @const: Trailing sentence punctuation on the final cue
static TRAILING_SENTENCE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!…]+$").unwrap());

/// Sanitize a text unit into a display-safe caption string.
///
/// Newlines become spaces, whitespace runs collapse to one space, and every
/// character outside letters, digits, Hangul syllables, whitespace and the
/// question mark is removed. The question mark is the one punctuation mark
/// kept, it carries delivery. An empty result is replaced by a
/// non-breaking-space placeholder. Idempotent.
pub fn sanitize_caption(text: &str) -> String {
    let s = text.replace(['\n', '\r'], " ");
    let s = s.trim();
    let s = NON_CAPTION_CHARS.replace_all(s, "");
    let s = MULTI_WHITESPACE.replace_all(&s, " ");
    let s = s.trim();

    if s.is_empty() {
        NBSP.to_string()
    } else {
        s.to_string()
    }
}

/// Wrap a caption into one or two display lines.
///
/// Texts at or below `one_line_threshold` characters pass through unchanged.
/// Longer texts get a greedy word fill: words accumulate on the left line
/// while the joined length stays within `biline_target`, the remainder forms
/// the right line, joined with the literal `\N` break marker. When the greedy
/// pass cannot produce two non-empty lines (a single word longer than the
/// target, or nothing left for the right line) the text is hard-split at its
/// character midpoint instead so the cue never overflows as a single line.
pub fn wrap_caption(text: &str, one_line_threshold: usize, biline_target: usize) -> String {
    let t = sanitize_caption(text);
    if t.chars().count() <= one_line_threshold {
        return t;
    }

    let mut words: std::collections::VecDeque<&str> = t.split_whitespace().collect();
    let mut left: Vec<&str> = Vec::new();
    let mut left_len = 0usize;

    while let Some(&next) = words.front() {
        let candidate = if left.is_empty() {
            next.chars().count()
        } else {
            left_len + 1 + next.chars().count()
        };
        if candidate > biline_target {
            break;
        }
        left.push(next);
        left_len = candidate;
        words.pop_front();
    }

    let right: Vec<&str> = words.into_iter().collect();

    if left.is_empty() || right.is_empty() {
        let mid = (t.chars().count() / 2).max(1);
        let left_part: String = t.chars().take(mid).collect();
        let right_part: String = t.chars().skip(mid).collect();
        return format!("{}\\N{}", left_part, right_part);
    }

    format!("{}\\N{}", left.join(" "), right.join(" "))
}

/// Format a time in seconds as an ASS timestamp, `H:MM:SS.CC`.
///
/// Negative inputs clamp to zero. The value is rounded half-up on the total
/// centisecond count, so a fractional part that rounds to a full second
/// carries into the seconds field instead of printing a three-digit
/// centisecond value.
pub fn format_ass_time(t: f64) -> String {
    let t = t.max(0.0);
    let total_cs = (t * 100.0).round() as u64;

    let h = total_cs / 360_000;
    let m = (total_cs % 360_000) / 6_000;
    let s = (total_cs % 6_000) / 100;
    let cs = total_cs % 100;

    format!("{}:{:02}:{:02}.{:02}", h, m, s, cs)
}

/// A named, immutable visual style for subtitle rendering
#[derive(Debug)]
pub struct Template {
    /// Registry name
    pub name: &'static str,
    /// Complete V4+ style line
    pub style_line: &'static str,
    /// Screen-anchor override tag prepended to every dialogue line
    pub anchor: &'static str,
}

// Closed registry. The first entry is the fallback for unknown names.
static TEMPLATES: &[Template] = &[
    Template {
        name: "educational",
        style_line: "Style: Default,Pretendard-Bold,56,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,\
                     -1,0,0,0,100,100,0,0,1,2,2,10,10,40,1",
        anchor: r"{\an2}",
    },
    Template {
        name: "center",
        style_line: "Style: Default,Pretendard-Bold,64,&H00FFFFFF,&H000000FF,&H00000000,&H00000000,\
                     -1,0,0,0,100,100,0,0,5,2,2,10,10,40,1",
        anchor: r"{\an5}",
    },
];

impl Template {
    /// Look up a template by name, falling back to the default on a miss
    pub fn resolve(name: &str) -> &'static Template {
        TEMPLATES.iter().find(|t| t.name == name).unwrap_or_else(|| {
            warn!(
                "Unknown subtitle template '{}', falling back to '{}'",
                name, TEMPLATES[0].name
            );
            &TEMPLATES[0]
        })
    }

    /// Names of all registered templates
    pub fn names() -> Vec<&'static str> {
        TEMPLATES.iter().map(|t| t.name).collect()
    }
}

fn ass_header(style_line: &str) -> String {
    format!(
        "[Script Info]
ScriptType: v4.00+
Collisions: Normal
PlayResX: 1080
PlayResY: 1920
ScaledBorderAndShadow: yes

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
{}

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
",
        style_line
    )
}

/// Serializes styled timed segments into an ASS subtitle file
#[derive(Debug)]
pub struct AssWriter {
    template: &'static Template,
    strip_trailing_punct_last: bool,
    max_chars_per_line: usize,
    max_lines: usize,
}

impl AssWriter {
    /// Create a writer from the subtitle section of the application config
    pub fn new(config: &SubtitleConfig) -> Self {
        Self::with_template(
            &config.template,
            config.strip_trailing_punct_last,
            config.max_chars_per_line,
            config.max_lines,
        )
    }

    /// Create a writer with explicit settings
    pub fn with_template(
        template_name: &str,
        strip_trailing_punct_last: bool,
        max_chars_per_line: usize,
        max_lines: usize,
    ) -> Self {
        AssWriter {
            template: Template::resolve(template_name),
            strip_trailing_punct_last,
            max_chars_per_line,
            max_lines,
        }
    }

    /// Write segments to an ASS file at `path`, overwriting any existing file.
    ///
    /// Parent directories are created as needed. IO failures are fatal for
    /// the pipeline run, this is the one persisted artifact.
    pub fn write<P: AsRef<Path>>(
        &self,
        segments: &[TimedSegment],
        path: P,
    ) -> Result<PathBuf, SubtitleError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    SubtitleError::WriteFailed(format!(
                        "cannot create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut lines = Vec::with_capacity(segments.len() + 1);
        lines.push(ass_header(self.template.style_line));

        for (i, seg) in segments.iter().enumerate() {
            lines.push(self.dialogue_line(seg, i + 1 == segments.len()));
        }

        fs::write(path, lines.join("\n")).map_err(|e| {
            SubtitleError::WriteFailed(format!("cannot write {}: {}", path.display(), e))
        })?;

        Ok(path.to_path_buf())
    }

    /// Render one dialogue event line for a segment
    fn dialogue_line(&self, seg: &TimedSegment, is_last: bool) -> String {
        let start = format_ass_time(seg.start);
        let end = format_ass_time(seg.end);

        let mut raw = seg.text.trim().to_string();
        if self.strip_trailing_punct_last && is_last {
            // Cosmetic rule: the closing caption of a short should not end
            // on an abrupt period
            raw = TRAILING_SENTENCE_PUNCT
                .replace(&raw, "")
                .trim()
                .to_string();
        }

        let mut txt = sanitize_caption(&raw);
        if self.max_lines == 2 && txt.chars().count() > self.max_chars_per_line {
            txt = wrap_caption(&txt, self.max_chars_per_line, self.max_chars_per_line + 2);
        }

        let color_tag = seg
            .pitch
            .and_then(prosody::pitch_to_color)
            .map(|hex| format!("{{\\c&H{}&}}", hex))
            .unwrap_or_default();

        format!(
            "Dialogue: 0,{},{},Default,,0,0,0,,{}{}{}",
            start, end, self.template.anchor, color_tag, txt
        )
    }
}
