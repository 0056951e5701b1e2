// Sanitize model output before and after field extraction.
// Strips decoder artifacts, non-target-language characters, and rejects
// text that is too short or matches known garbage patterns.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum length of a usable generated description (characters).
pub const MIN_DESCRIPTION_LENGTH: usize = 12;

/// Fraction of alphabetic characters below which text counts as garbage.
const MIN_ALPHABETIC_RATIO: f32 = 0.5;

/// Full cleanup pass for generated text: artifacts out, foreign script out,
/// punctuation runs collapsed, whitespace normalized.
pub fn clean_text(raw: &str) -> String {
    let stripped = strip_artifacts(raw);
    let latin = strip_foreign_chars(&stripped);
    let collapsed = collapse_punctuation(&latin);
    normalize_whitespace(&collapsed)
}

/// Remove model-specific artifacts: seq2seq sentinel tokens, special tokens,
/// chat-template markers, and control characters.
pub fn strip_artifacts(text: &str) -> String {
    let without_tokens = artifact_re().replace_all(text, "");
    without_tokens
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

fn artifact_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)<extra_id_\d+>|</?s>|<pad>|<unk>|<\|[^|>]*\|>|\[/?INST\]|<</?SYS>>",
        )
        .expect("valid artifact regex")
    })
}

/// Drop characters outside the documentation target language (English /
/// Latin script). Keeps ASCII, accented Latin letters, and a small set of
/// typographic punctuation; drops CJK, Cyrillic, emoji, etc.
pub fn strip_foreign_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if c.is_ascii() {
                return true;
            }
            // Latin-1 Supplement through Latin Extended-B letters
            if c.is_alphabetic() && (*c as u32) <= 0x024F {
                return true;
            }
            matches!(c, '…' | '–' | '—' | '\u{2018}' | '\u{2019}' | '\u{201C}' | '\u{201D}' | '°' | 'µ')
        })
        .collect()
}

/// Collapse excessive punctuation: runs of `!` or `?` become one character,
/// runs of more than three `.` become an ellipsis of three.
pub fn collapse_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run_char = '\0';
    let mut run_len = 0usize;

    for c in text.chars() {
        if c == run_char && matches!(c, '.' | '!' | '?') {
            run_len += 1;
            let cap = if c == '.' { 3 } else { 1 };
            if run_len <= cap {
                out.push(c);
            }
        } else {
            run_char = c;
            run_len = 1;
            out.push(c);
        }
    }

    out
}

fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = false;
    for c in text.chars() {
        if c == ' ' || c == '\t' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            prev_space = c == '\n';
            out.push(c);
        }
    }
    out.trim().to_string()
}

/// Reject generated descriptions that are too short, echo the prompt schema,
/// contain placeholder phrases, or are mostly non-alphabetic.
pub fn is_garbage(text: &str) -> bool {
    let t = text.trim();
    if t.chars().count() < MIN_DESCRIPTION_LENGTH {
        return true;
    }
    if garbage_re().is_match(t) {
        return true;
    }

    let total = t.chars().filter(|c| !c.is_whitespace()).count();
    if total == 0 {
        return true;
    }
    let alphabetic = t.chars().filter(|c| c.is_alphabetic()).count();
    (alphabetic as f32) / (total as f32) < MIN_ALPHABETIC_RATIO
}

fn garbage_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)string\s*\(\s*1\s*[-–]\s*3|<extra_id_|(enter|insert|write)\s+(a\s+|the\s+)?description|your\s+(text|description)\s+here|lorem\s+ipsum",
        )
        .expect("valid garbage regex")
    })
}
