//! OS-level global hotkey registration and dispatch.
//!
//! The app registers a small fixed set of key combinations written in the
//! host's vendor syntax (modifier names joined by `+`, e.g.
//! `"CommandOrControl+Shift+N"`). A dedicated listener thread receives OS
//! events and forwards presses over an async channel; releases are ignored.
//! Fired hotkeys are currently only logged; this side-channel is not wired
//! into the extension store.

use global_hotkey::{
    hotkey::{Code, HotKey, Modifiers},
    Error as HotkeyError, GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::error::SettingsError;
use crate::keymap;

// HOTKEY_CHANNEL: fired hotkey combos, event-driven instead of polling.
static HOTKEY_CHANNEL: OnceLock<(async_channel::Sender<String>, async_channel::Receiver<String>)> =
    OnceLock::new();

/// Get the hotkey channel, initializing it on first access.
pub fn hotkey_channel() -> &'static (async_channel::Sender<String>, async_channel::Receiver<String>)
{
    HOTKEY_CHANNEL.get_or_init(|| async_channel::bounded(10))
}

/// Parse a vendor-syntax combination (`"CommandOrControl+Shift+N"`) into an
/// OS hotkey.
pub fn parse_hotkey(combo: &str) -> Result<HotKey, SettingsError> {
    let mut modifiers = Modifiers::empty();
    let mut key: Option<Code> = None;

    for token in combo.split('+') {
        match token {
            "CommandOrControl" | "CmdOrCtrl" => {
                if cfg!(target_os = "macos") {
                    modifiers |= Modifiers::META;
                } else {
                    modifiers |= Modifiers::CONTROL;
                }
            }
            "Command" | "Cmd" | "Super" | "Meta" => modifiers |= Modifiers::META,
            "Control" | "Ctrl" => modifiers |= Modifiers::CONTROL,
            "Alt" | "Option" | "Opt" => modifiers |= Modifiers::ALT,
            "Shift" => modifiers |= Modifiers::SHIFT,
            other => {
                if key.is_some() {
                    return Err(SettingsError::Hotkey(format!(
                        "combo '{combo}' has more than one main key"
                    )));
                }
                key = Some(key_code(other).ok_or_else(|| {
                    SettingsError::Hotkey(format!("unknown key '{other}' in combo '{combo}'"))
                })?);
            }
        }
    }

    let key = key
        .ok_or_else(|| SettingsError::Hotkey(format!("combo '{combo}' has no main key")))?;
    Ok(HotKey::new(Some(modifiers), key))
}

/// Map a vendor key token to the OS key code. Accepts both the bare
/// letter/digit form (`"N"`) and the physical identifier form (`"KeyN"`).
fn key_code(token: &str) -> Option<Code> {
    let code = match keymap::preset_to_code(token).as_str() {
        "KeyA" => Code::KeyA,
        "KeyB" => Code::KeyB,
        "KeyC" => Code::KeyC,
        "KeyD" => Code::KeyD,
        "KeyE" => Code::KeyE,
        "KeyF" => Code::KeyF,
        "KeyG" => Code::KeyG,
        "KeyH" => Code::KeyH,
        "KeyI" => Code::KeyI,
        "KeyJ" => Code::KeyJ,
        "KeyK" => Code::KeyK,
        "KeyL" => Code::KeyL,
        "KeyM" => Code::KeyM,
        "KeyN" => Code::KeyN,
        "KeyO" => Code::KeyO,
        "KeyP" => Code::KeyP,
        "KeyQ" => Code::KeyQ,
        "KeyR" => Code::KeyR,
        "KeyS" => Code::KeyS,
        "KeyT" => Code::KeyT,
        "KeyU" => Code::KeyU,
        "KeyV" => Code::KeyV,
        "KeyW" => Code::KeyW,
        "KeyX" => Code::KeyX,
        "KeyY" => Code::KeyY,
        "KeyZ" => Code::KeyZ,
        "Digit0" => Code::Digit0,
        "Digit1" => Code::Digit1,
        "Digit2" => Code::Digit2,
        "Digit3" => Code::Digit3,
        "Digit4" => Code::Digit4,
        "Digit5" => Code::Digit5,
        "Digit6" => Code::Digit6,
        "Digit7" => Code::Digit7,
        "Digit8" => Code::Digit8,
        "Digit9" => Code::Digit9,
        "Space" => Code::Space,
        "Enter" => Code::Enter,
        "Escape" => Code::Escape,
        "Tab" => Code::Tab,
        _ => return None,
    };
    Some(code)
}

/// Format a registration error with enough context to act on.
fn format_hotkey_error(e: &HotkeyError, combo: &str) -> String {
    match e {
        HotkeyError::AlreadyRegistered(hk) => format!(
            "Hotkey '{}' is already registered by another application (id: {}). \
             Try a different combination or close the conflicting app.",
            combo,
            hk.id()
        ),
        HotkeyError::FailedToRegister(msg) => format!(
            "System rejected hotkey '{}': {}. It may be reserved by the OS.",
            combo, msg
        ),
        HotkeyError::OsError(os_err) => {
            format!("OS error registering hotkey '{}': {}", combo, os_err)
        }
        other => format!("Failed to register hotkey '{}': {}", combo, other),
    }
}

/// Hand a fired combo to the hotkey channel.
///
/// Must never block the listener thread: a slow or absent consumer drops
/// the press instead of wedging dispatch, and the drop is logged.
fn dispatch_hotkey(combo: &str) {
    if hotkey_channel().0.try_send(combo.to_string()).is_err() {
        warn!(combo = %combo, "Hotkey channel full/closed, dropping press");
    }
}

/// Register the given combos and start the listener thread.
///
/// Registration failures are logged per combo; the listener runs with
/// whatever subset succeeded. Only the `Pressed` state is acted upon.
pub fn start_hotkey_listener(combos: Vec<String>) {
    std::thread::spawn(move || {
        let manager = match GlobalHotKeyManager::new() {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "Failed to create global hotkey manager");
                return;
            }
        };

        let mut registered: HashMap<u32, String> = HashMap::new();
        for combo in combos {
            let hotkey = match parse_hotkey(&combo) {
                Ok(hk) => hk,
                Err(e) => {
                    warn!(error = %e, combo = %combo, "Skipping unparseable hotkey");
                    continue;
                }
            };
            match manager.register(hotkey) {
                Ok(()) => {
                    info!(combo = %combo, id = hotkey.id(), "Registered global hotkey");
                    registered.insert(hotkey.id(), combo);
                }
                Err(e) => warn!("{}", format_hotkey_error(&e, &combo)),
            }
        }

        if registered.is_empty() {
            warn!("No global hotkeys registered; listener exiting");
            return;
        }

        let receiver = GlobalHotKeyEvent::receiver();
        loop {
            let Ok(event) = receiver.recv() else {
                break;
            };
            // Only respond to key press, not release.
            if event.state != HotKeyState::Pressed {
                continue;
            }
            if let Some(combo) = registered.get(&event.id) {
                info!(combo = %combo, id = event.id, "Global hotkey pressed");
                dispatch_hotkey(combo);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_accel() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers::META
        } else {
            Modifiers::CONTROL
        }
    }

    #[test]
    fn parses_the_default_combo() {
        let parsed = parse_hotkey("CommandOrControl+Shift+N").unwrap();
        let expected = HotKey::new(Some(expected_accel() | Modifiers::SHIFT), Code::KeyN);
        assert_eq!(parsed.id(), expected.id());
    }

    #[test]
    fn accepts_bare_and_physical_key_tokens() {
        let bare = parse_hotkey("Ctrl+N").unwrap();
        let physical = parse_hotkey("Ctrl+KeyN").unwrap();
        assert_eq!(bare.id(), physical.id());
    }

    #[test]
    fn parses_digits_and_named_keys() {
        let digit = parse_hotkey("Alt+5").unwrap();
        assert_eq!(
            digit.id(),
            HotKey::new(Some(Modifiers::ALT), Code::Digit5).id()
        );

        let space = parse_hotkey("Cmd+Space").unwrap();
        assert_eq!(
            space.id(),
            HotKey::new(Some(Modifiers::META), Code::Space).id()
        );
    }

    #[test]
    fn rejects_unknown_keys_and_missing_main_key() {
        assert!(matches!(
            parse_hotkey("Ctrl+Banana"),
            Err(SettingsError::Hotkey(_))
        ));
        assert!(matches!(
            parse_hotkey("Ctrl+Shift"),
            Err(SettingsError::Hotkey(_))
        ));
        assert!(matches!(
            parse_hotkey("Ctrl+N+P"),
            Err(SettingsError::Hotkey(_))
        ));
    }

    #[test]
    fn dispatch_never_blocks_when_nothing_consumes() {
        let (_, receiver) = hotkey_channel();
        while receiver.try_recv().is_ok() {}

        // Far more presses than the channel buffers; every call must return.
        for _ in 0..25 {
            dispatch_hotkey("CommandOrControl+Shift+N");
        }
        assert_eq!(receiver.len(), 10);

        // Overflow is dropped, not queued.
        dispatch_hotkey("CommandOrControl+Shift+N");
        assert_eq!(receiver.len(), 10);

        while receiver.try_recv().is_ok() {}
    }

    // Actually registering with the OS requires an event loop and
    // permissions; covered only under --features system-tests.
    #[cfg(feature = "system-tests")]
    #[test]
    fn registers_with_the_os() {
        let manager = GlobalHotKeyManager::new().expect("hotkey manager");
        let hotkey = parse_hotkey("CommandOrControl+Shift+N").unwrap();
        manager.register(hotkey).expect("register");
        manager.unregister(hotkey).expect("unregister");
    }
}
