//! Extension and shortcut records as exchanged with the host process.
//!
//! The host is the system of record; this process holds the list in memory
//! for the lifetime of the window and mutates it only by whole-list
//! replacement. Extension identity is the `name` field; the host never
//! sends two extensions with the same name.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// A rebindable shortcut belonging to an extension.
///
/// `shortcut` is the stored combo string: internal modifier tokens plus the
/// main key token joined by `+` (e.g. `"control+shift+N"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub name: String,
    pub description: String,
    pub shortcut: String,
}

/// A named, toggle-able extension record. Not executable code here: the
/// host owns execution, this UI only edits the records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extension {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub shortcuts: Vec<Shortcut>,
}

/// Validate and decode a `get_extensions` payload at the bridge boundary.
///
/// A malformed payload is a fatal startup condition: it surfaces as a
/// distinct "failed to load extensions" error rather than a raw parse panic.
pub fn parse_extensions(payload: &str) -> Result<Vec<Extension>, SettingsError> {
    serde_json::from_str(payload).map_err(SettingsError::InvalidHostPayload)
}

/// Encode the entire extension list for `set_extensions`.
pub fn serialize_extensions(extensions: &[Extension]) -> String {
    // Vec<Extension> cannot fail to serialize; fall back to an empty array
    // so a persist call never panics the UI thread.
    serde_json::to_string(extensions).unwrap_or_else(|_| "[]".to_string())
}

/// Build a new list with exactly the named extension's `enabled` flag
/// flipped. All other entries and the overall order are unchanged.
pub fn toggle_extension(extensions: &[Extension], name: &str) -> Vec<Extension> {
    extensions
        .iter()
        .map(|extension| {
            if extension.name == name {
                Extension {
                    enabled: !extension.enabled,
                    ..extension.clone()
                }
            } else {
                extension.clone()
            }
        })
        .collect()
}

/// Build a new list where the named shortcut under the named extension has
/// its combo replaced with `value`. Every other extension and sibling
/// shortcut is structurally unchanged, order preserved.
pub fn edit_shortcut(
    extensions: &[Extension],
    extension_name: &str,
    shortcut_name: &str,
    value: &str,
) -> Vec<Extension> {
    extensions
        .iter()
        .map(|extension| {
            if extension.name == extension_name {
                Extension {
                    shortcuts: extension
                        .shortcuts
                        .iter()
                        .map(|shortcut| {
                            if shortcut.name == shortcut_name {
                                Shortcut {
                                    shortcut: value.to_string(),
                                    ..shortcut.clone()
                                }
                            } else {
                                shortcut.clone()
                            }
                        })
                        .collect(),
                    ..extension.clone()
                }
            } else {
                extension.clone()
            }
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::test_fixtures::sample_extensions;
    use super::*;

    #[test]
    fn parses_the_host_wire_shape() {
        let payload = r#"[
            {
                "name": "Clipboard",
                "description": "Clipboard history",
                "enabled": true,
                "shortcuts": [
                    {"name": "Show", "description": "Show history", "shortcut": "super+shift+V"}
                ]
            }
        ]"#;

        let extensions = parse_extensions(payload).expect("valid payload");
        assert_eq!(extensions.len(), 1);
        assert_eq!(extensions[0].name, "Clipboard");
        assert!(extensions[0].enabled);
        assert_eq!(extensions[0].shortcuts[0].shortcut, "super+shift+V");
    }

    #[test]
    fn malformed_payload_is_a_distinct_load_error() {
        let err = parse_extensions("{not json").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidHostPayload(_)));
        assert!(err.to_string().contains("failed to load extensions"));
    }

    #[test]
    fn wrong_shape_is_rejected_at_the_boundary() {
        // An object instead of an array must not slip through.
        let err = parse_extensions(r#"{"name": "Foo"}"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidHostPayload(_)));
    }

    #[test]
    fn serialization_round_trips() {
        let extensions = sample_extensions();
        let payload = serialize_extensions(&extensions);
        assert_eq!(parse_extensions(&payload).unwrap(), extensions);
    }

    #[test]
    fn toggle_flips_only_the_named_extension() {
        let extensions = sample_extensions();
        let toggled = toggle_extension(&extensions, "Foo");

        assert!(toggled[0].enabled);
        assert_eq!(toggled[1], extensions[1]);
        assert_eq!(
            toggled.iter().map(|e| &e.name).collect::<Vec<_>>(),
            extensions.iter().map(|e| &e.name).collect::<Vec<_>>()
        );
    }

    #[test]
    fn toggle_twice_restores_the_original_list() {
        let extensions = sample_extensions();
        let round_trip = toggle_extension(&toggle_extension(&extensions, "Bar"), "Bar");
        assert_eq!(round_trip, extensions);
    }

    #[test]
    fn toggle_unknown_name_changes_nothing() {
        let extensions = sample_extensions();
        assert_eq!(toggle_extension(&extensions, "Missing"), extensions);
    }

    #[test]
    fn edit_changes_only_the_named_shortcut() {
        let extensions = sample_extensions();
        let edited = edit_shortcut(&extensions, "Bar", "Open", "super+P");

        assert_eq!(edited[0], extensions[0]);
        assert_eq!(edited[1].shortcuts[0].shortcut, "super+P");
        assert_eq!(edited[1].shortcuts[0].name, "Open");
        assert_eq!(edited[1].shortcuts[1], extensions[1].shortcuts[1]);
        assert_eq!(edited[1].name, extensions[1].name);
        assert_eq!(edited[1].enabled, extensions[1].enabled);
    }

    #[test]
    fn edit_does_not_touch_same_named_shortcut_in_other_extensions() {
        let mut extensions = sample_extensions();
        extensions[0].shortcuts.push(Shortcut {
            name: "Open".to_string(),
            description: "Open foo".to_string(),
            shortcut: "alt+O".to_string(),
        });

        let edited = edit_shortcut(&extensions, "Bar", "Open", "super+P");
        assert_eq!(edited[0].shortcuts[1].shortcut, "alt+O");
    }
}
