use once_cell::sync::Lazy;
use regex::Regex;

// @module: Prosody pitch extraction and color banding

// @const: Absolute semitone pitch directive, e.g. pitch="+9st"
static PITCH_ST_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)pitch="\s*([+-]?\d+)\s*st""#).unwrap()
});

// @const: Percentage pitch directive, e.g. pitch="+20%"
static PITCH_PCT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)pitch="\s*([+-]?\d+)\s*%[^"]*""#).unwrap()
});

/// Extract a semitone pitch value from a synthesis markup line.
///
/// Two directive forms are recognized: an absolute semitone offset
/// (`pitch="+Nst"`) and a percentage offset (`pitch="+N%"`). The percentage
/// form converts to semitones via `12 * log2(1 + percent/100)`, the
/// equal-tempered semitone count of the relative frequency ratio. Returns
/// `None` when no directive is present or the value does not parse.
pub fn extract_pitch(markup: &str) -> Option<f64> {
    if markup.is_empty() {
        return None;
    }

    if let Some(caps) = PITCH_ST_REGEX.captures(markup) {
        if let Ok(st) = caps[1].parse::<f64>() {
            return Some(st);
        }
    }

    if let Some(caps) = PITCH_PCT_REGEX.captures(markup) {
        if let Ok(pct) = caps[1].parse::<f64>() {
            let ratio = 1.0 + pct / 100.0;
            // A shift of -100% or below has no defined ratio
            if ratio > 0.0 {
                return Some(12.0 * ratio.log2());
            }
        }
    }

    None
}

/// Map a semitone value to a caption color band, as a 6-hex-digit RGB code.
///
/// High pitch maps to cool blues, low pitch to cooler purples. Values
/// strictly between -4 and +4 semitones return `None` so the template's
/// default text color applies: emphasis coloring only kicks in past a
/// perceptual threshold.
pub fn pitch_to_color(pitch_st: f64) -> Option<&'static str> {
    if pitch_st >= 8.0 {
        return Some("33CCFF");
    }
    if pitch_st >= 6.0 {
        return Some("55E0FF");
    }
    if pitch_st >= 4.0 {
        return Some("77F5FF");
    }
    if pitch_st <= -8.0 {
        return Some("7777FF");
    }
    if pitch_st <= -6.0 {
        return Some("8890FF");
    }
    if pitch_st <= -4.0 {
        return Some("99AAFF");
    }
    None
}
