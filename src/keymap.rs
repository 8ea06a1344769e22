//! Key code / preset token mapping for shortcut display and storage.
//!
//! Shortcuts are stored as "combo" strings: internal modifier tokens
//! (`control`, `alt`, `super`, `shift`) plus a main key token, joined by `+`.
//! The UI shows "display" strings instead (`Ctrl`, `Opt`, `Cmd`, `Shift` plus
//! the bare letter/digit). All functions here are pure and total: anything
//! outside the known tables passes through unchanged, so an exotic physical
//! key still produces a renderable token.

/// Map a physical key identifier to its display token.
///
/// `KeyA`..`KeyZ` become `A`..`Z`, `Digit0`..`Digit9` become `0`..`9`.
/// Everything else is returned as-is.
pub fn code_to_preset(code: &str) -> String {
    if let Some(letter) = code.strip_prefix("Key") {
        let mut chars = letter.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_uppercase() {
                return c.to_string();
            }
        }
    }
    if let Some(digit) = code.strip_prefix("Digit") {
        let mut chars = digit.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_digit() {
                return c.to_string();
            }
        }
    }
    code.to_string()
}

/// Inverse of [`code_to_preset`] on the 36-entry letter/digit domain.
///
/// `A`..`Z` become `KeyA`..`KeyZ`, `0`..`9` become `Digit0`..`Digit9`.
/// Everything else is returned as-is.
pub fn preset_to_code(preset: &str) -> String {
    let mut chars = preset.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() {
            return format!("Key{c}");
        }
        if c.is_ascii_digit() {
            return format!("Digit{c}");
        }
    }
    preset.to_string()
}

/// Convert a stored combo string into its human-readable display form.
///
/// Segment order is preserved: `"control+shift+N"` becomes `"Ctrl+Shift+N"`.
pub fn shortcut_to_display(combo: &str) -> String {
    combo
        .split('+')
        .map(|segment| match segment {
            "control" => "Ctrl".to_string(),
            "alt" => "Opt".to_string(),
            "super" => "Cmd".to_string(),
            "shift" => "Shift".to_string(),
            other => code_to_preset(other),
        })
        .collect::<Vec<_>>()
        .join("+")
}

/// Convert a display string back into the stored combo form.
///
/// Exact inverse of [`shortcut_to_display`] for combos built from the four
/// modifier tokens and letter/digit tokens.
pub fn display_to_shortcut(display: &str) -> String {
    display
        .split('+')
        .map(|segment| match segment {
            "Ctrl" => "control".to_string(),
            "Opt" => "alt".to_string(),
            "Cmd" => "super".to_string(),
            "Shift" => "shift".to_string(),
            other => preset_to_code_token(other),
        })
        .collect::<Vec<_>>()
        .join("+")
}

// Combos store the bare letter/digit, not the DOM-style code, so the display
// main key maps back to itself on the letter/digit domain. Anything the
// original table knows nothing about round-trips through preset_to_code.
fn preset_to_code_token(preset: &str) -> String {
    let mut chars = preset.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_uppercase() || c.is_ascii_digit() {
            return c.to_string();
        }
    }
    preset.to_string()
}

/// Map a GPUI keystroke key name to the physical key identifier the
/// normalization table operates on.
///
/// GPUI reports lowercased key names (`"n"`, `"5"`, `"escape"`) rather than
/// DOM-style codes, so letters become `KeyN`, digits become `Digit5`, and
/// anything else passes through unchanged.
pub fn keystroke_code(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => format!("Key{}", c.to_ascii_uppercase()),
        (Some(c), None) if c.is_ascii_digit() => format!("Digit{c}"),
        _ => key.to_string(),
    }
}
