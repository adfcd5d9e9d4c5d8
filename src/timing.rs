use log::warn;

use crate::prosody;

// @module: Cue timing accumulation over ordered script units

/// Lower bound for an estimated cue duration, seconds
pub const MIN_ESTIMATED_SECS: f64 = 0.6;
/// Upper bound for an estimated cue duration, seconds
pub const MAX_ESTIMATED_SECS: f64 = 8.0;
/// Reading-speed heuristic used when a unit has no measurable audio
const READING_CHARS_PER_SEC: f64 = 7.0;

/// One time-aligned script unit.
///
/// Segments produced by [`build_segments`] are contiguous and non-overlapping:
/// each segment's `end` equals the next segment's `start`, the first segment
/// starts at 0.0, and the last `end` is the total audio duration (measured
/// where synthesis succeeded, estimated where it did not).
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSegment {
    // @field: Start time in seconds, millisecond precision
    pub start: f64,

    // @field: End time in seconds, millisecond precision
    pub end: f64,

    // @field: Spoken/display text for this cue
    pub text: String,

    // @field: Raw synthesis markup for this unit, when one was produced
    pub markup: Option<String>,

    // @field: Semitone value extracted from the markup pitch directive
    pub pitch: Option<f64>,
}

impl TimedSegment {
    /// Cue length in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Estimate a playback duration for a unit whose audio could not be measured.
///
/// Roughly 7 characters per second of speech, bounded to [0.6, 8.0] seconds
/// so a degenerate unit never produces a flash-frame or a minute-long cue.
pub fn estimate_duration(text: &str) -> f64 {
    (text.chars().count() as f64 / READING_CHARS_PER_SEC)
        .clamp(MIN_ESTIMATED_SECS, MAX_ESTIMATED_SECS)
}

fn round_ms(t: f64) -> f64 {
    (t * 1000.0).round() / 1000.0
}

/// Build contiguous timed segments from ordered units.
///
/// `durations[i]` is the measured playback length of the audio realizing
/// `units[i]`; `None` means synthesis failed for that unit and the duration
/// is estimated from its text length. `markups[i]` is the raw synthesis
/// markup for the unit (empty string for none).
///
/// Length mismatches between the arrays are reconciled rather than raised:
/// the unit list drives the segment count, shorter sibling arrays are padded
/// (empty markup, estimated duration) and longer ones ignored past the unit
/// count. The reconciliation is logged at warn level.
pub fn build_segments(
    units: &[String],
    markups: &[String],
    durations: &[Option<f64>],
) -> Vec<TimedSegment> {
    if markups.len() != units.len() {
        warn!(
            "Markup count {} does not match unit count {}, reconciling",
            markups.len(),
            units.len()
        );
    }
    if durations.len() != units.len() {
        warn!(
            "Duration count {} does not match unit count {}, reconciling",
            durations.len(),
            units.len()
        );
    }

    let mut segments = Vec::with_capacity(units.len());
    // The clock accumulates unrounded so adjacent cues share the exact same
    // boundary after rounding.
    let mut clock = 0.0_f64;

    for (i, text) in units.iter().enumerate() {
        let markup = markups
            .get(i)
            .filter(|m| !m.trim().is_empty())
            .cloned();
        let dur = durations
            .get(i)
            .copied()
            .flatten()
            .unwrap_or_else(|| estimate_duration(text));

        let start = clock;
        clock += dur;
        let pitch = markup.as_deref().and_then(prosody::extract_pitch);

        segments.push(TimedSegment {
            start: round_ms(start),
            end: round_ms(clock),
            text: text.clone(),
            markup,
            pitch,
        });
    }

    segments
}
