// @module: Script segmentation into sentence and clause units

/// Split a script into sentence units.
///
/// A sentence boundary is a run of whitespace immediately following one of
/// the terminal marks `.`, `!` or `?`. The punctuation stays attached to the
/// preceding unit. A script with no terminal punctuation is a single unit.
/// Empty pieces are dropped. No external calls, same input same output.
pub fn split_to_sentences(script: &str) -> Vec<String> {
    let script = script.trim();
    if script.is_empty() {
        return Vec::new();
    }

    let mut units = Vec::new();
    let mut current = String::new();
    let mut chars = script.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if matches!(c, '.' | '!' | '?') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            // Consume the whole whitespace run so it lands in neither unit
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            let piece = current.trim();
            if !piece.is_empty() {
                units.push(piece.to_string());
            }
            current.clear();
        }
    }

    let piece = current.trim();
    if !piece.is_empty() {
        units.push(piece.to_string());
    }

    units
}

/// Trim a caller-supplied unit list, dropping entries that are empty after
/// trimming. Used for pre-split scripts handed to the pipeline directly.
pub fn normalize_units(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Collapse runs of identical adjacent units into one.
///
/// Clause breakers occasionally echo a line twice; a repeated cue reads as a
/// stutter on screen, so only the first of an equal run survives.
pub fn dedupe_adjacent_texts(lines: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    let mut prev: Option<&str> = None;
    for s in lines {
        if !s.is_empty() && prev != Some(s.as_str()) {
            out.push(s.clone());
        }
        prev = Some(s.as_str());
    }
    out
}
