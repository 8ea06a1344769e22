//! Shortcut Capture Field
//!
//! A focused input that turns raw key-down events into a human-readable
//! shortcut display and, once a non-modifier key terminates the combination,
//! emits the normalized combo string to the caller. The display is rebuilt
//! from scratch on every key-down from the modifiers held at that moment;
//! it never accumulates across separate keystrokes.

use crate::keymap;
use crate::theme::Theme;
use gpui::{
    div, prelude::*, px, rgb, rgba, App, Context, FocusHandle, Focusable, IntoElement, Render,
    Window,
};

/// Modifier keys held at the moment of a key-down event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub cmd: bool,
}

impl HeldModifiers {
    pub fn from_keystroke(modifiers: &gpui::Modifiers) -> Self {
        Self {
            ctrl: modifiers.control,
            shift: modifiers.shift,
            alt: modifiers.alt,
            cmd: modifiers.platform,
        }
    }

    /// Display labels in the fixed check order: Ctrl, Shift, Opt, Cmd.
    fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.ctrl {
            labels.push("Ctrl");
        }
        if self.shift {
            labels.push("Shift");
        }
        if self.alt {
            labels.push("Opt");
        }
        if self.cmd {
            labels.push("Cmd");
        }
        labels
    }
}

/// Result of one key-down event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    /// What the field should now show.
    pub display: String,
    /// The normalized combo, present only when a non-modifier key
    /// terminated the combination.
    pub emitted: Option<String>,
}

/// Process one key-down event.
///
/// A modifier key only updates the display (the shortcut is not yet
/// complete). Any other key terminates the combination: its mapped token is
/// appended after the held-modifier labels and the combo is emitted. With no
/// modifiers held, the combo is just the key's normalized token.
pub fn capture_key_down(key: &str, held: HeldModifiers) -> Capture {
    let mut labels: Vec<String> = held.labels().iter().map(|l| l.to_string()).collect();

    if is_modifier_key(key) {
        return Capture {
            display: labels.join("+"),
            emitted: None,
        };
    }

    labels.push(keymap::code_to_preset(&keymap::keystroke_code(key)));
    let display = labels.join("+");
    let emitted = keymap::display_to_shortcut(&display);
    Capture {
        display,
        emitted: Some(emitted),
    }
}

// Exactly the four modifiers (and their platform aliases). Anything else,
// including the Fn key, terminates the combination as a passthrough token.
fn is_modifier_key(key: &str) -> bool {
    matches!(
        key.to_lowercase().as_str(),
        "control" | "ctrl" | "shift" | "alt" | "option" | "opt" | "meta" | "command" | "cmd"
            | "super"
    )
}

/// Pre-computed colors for the capture field.
#[derive(Clone, Copy, Debug)]
pub struct ShortcutInputColors {
    pub input_bg: u32,
    pub border: u32,
    pub text: u32,
    pub placeholder: u32,
    pub focus_ring: u32,
}

impl ShortcutInputColors {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            input_bg: theme.colors.input,
            border: theme.colors.border,
            text: theme.colors.text_primary,
            placeholder: theme.colors.text_muted,
            focus_ring: theme.colors.accent,
        }
    }
}

/// Callback invoked with the normalized combo when a capture completes.
pub type OnChangeCallback = Box<dyn Fn(&str, &mut Window, &mut App) + 'static>;

/// Focused input widget wrapping [`capture_key_down`].
///
/// The caller owns the combo value: it seeds the field via `new`/`set_value`
/// and receives edits through the `on_change` callback. Calling `on_change`
/// is the field's only externally observable effect.
pub struct ShortcutInput {
    focus_handle: FocusHandle,
    colors: ShortcutInputColors,
    display: String,
    on_change: Option<OnChangeCallback>,
}

impl ShortcutInput {
    pub fn new(cx: &mut Context<Self>, theme: &Theme, value: &str) -> Self {
        Self {
            focus_handle: cx.focus_handle(),
            colors: ShortcutInputColors::from_theme(theme),
            display: keymap::shortcut_to_display(value),
            on_change: None,
        }
    }

    /// Set the emission callback.
    pub fn on_change(mut self, callback: impl Fn(&str, &mut Window, &mut App) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Reflect an externally changed combo value.
    pub fn set_value(&mut self, combo: &str, cx: &mut Context<Self>) {
        self.display = keymap::shortcut_to_display(combo);
        cx.notify();
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    fn handle_key_down(
        &mut self,
        event: &gpui::KeyDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let held = HeldModifiers::from_keystroke(&event.keystroke.modifiers);
        let capture = capture_key_down(event.keystroke.key.as_str(), held);
        self.display = capture.display;
        if let Some(combo) = capture.emitted {
            if let Some(on_change) = &self.on_change {
                on_change(&combo, window, cx);
            }
        }
        cx.notify();
    }
}

impl Focusable for ShortcutInput {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for ShortcutInput {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let colors = self.colors;
        let focused = self.focus_handle.is_focused(window);

        let handle_key_down =
            cx.listener(|this, event: &gpui::KeyDownEvent, window, cx| {
                this.handle_key_down(event, window, cx);
            });

        let focus_on_click = cx.listener(|this, _: &gpui::MouseDownEvent, window, cx| {
            window.focus(&this.focus_handle);
        });

        let content: gpui::AnyElement = if self.display.is_empty() {
            div()
                .text_color(rgb(colors.placeholder))
                .child("Shortcut")
                .into_any_element()
        } else {
            div()
                .text_color(rgb(colors.text))
                .child(self.display.clone())
                .into_any_element()
        };

        div()
            .w(px(112.))
            .h(px(28.))
            .px(px(8.))
            .flex()
            .flex_row()
            .items_center()
            .justify_end()
            .bg(rgba((colors.input_bg << 8) | 0xFF))
            .border_1()
            .border_color(if focused {
                rgb(colors.focus_ring)
            } else {
                rgba((colors.border << 8) | 0x80)
            })
            .rounded_md()
            .text_sm()
            .track_focus(&self.focus_handle)
            .on_key_down(handle_key_down)
            .on_mouse_down(gpui::MouseButton::Left, focus_on_click)
            .child(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_plus_key_emits_the_normalized_combo_once() {
        let held = HeldModifiers {
            ctrl: true,
            ..Default::default()
        };
        let capture = capture_key_down("n", held);
        assert_eq!(capture.display, "Ctrl+N");
        assert_eq!(capture.emitted.as_deref(), Some("control+N"));
    }

    #[test]
    fn modifier_only_press_updates_display_without_emitting() {
        let held = HeldModifiers {
            shift: true,
            ..Default::default()
        };
        let capture = capture_key_down("shift", held);
        assert_eq!(capture.display, "Shift");
        assert_eq!(capture.emitted, None);
    }

    #[test]
    fn all_modifiers_held_still_emit_nothing_on_a_modifier_key() {
        let held = HeldModifiers {
            ctrl: true,
            shift: true,
            alt: true,
            cmd: true,
        };
        let capture = capture_key_down("meta", held);
        assert_eq!(capture.display, "Ctrl+Shift+Opt+Cmd");
        assert_eq!(capture.emitted, None);
    }

    #[test]
    fn plain_key_with_no_modifiers_is_just_the_token() {
        let capture = capture_key_down("a", HeldModifiers::default());
        assert_eq!(capture.display, "A");
        assert_eq!(capture.emitted.as_deref(), Some("A"));
    }

    #[test]
    fn modifier_labels_follow_the_fixed_check_order() {
        let held = HeldModifiers {
            ctrl: true,
            shift: true,
            alt: true,
            cmd: true,
        };
        let capture = capture_key_down("p", held);
        assert_eq!(capture.display, "Ctrl+Shift+Opt+Cmd+P");
        assert_eq!(
            capture.emitted.as_deref(),
            Some("control+shift+alt+super+P")
        );
    }

    #[test]
    fn unmapped_keys_pass_through_as_raw_tokens() {
        let held = HeldModifiers {
            ctrl: true,
            ..Default::default()
        };
        let capture = capture_key_down("escape", held);
        assert_eq!(capture.display, "Ctrl+escape");
        assert_eq!(capture.emitted.as_deref(), Some("control+escape"));
    }

    #[test]
    fn fn_key_terminates_the_combo_as_a_passthrough_token() {
        let held = HeldModifiers {
            ctrl: true,
            ..Default::default()
        };
        let capture = capture_key_down("fn", held);
        assert_eq!(capture.display, "Ctrl+fn");
        assert_eq!(capture.emitted.as_deref(), Some("control+fn"));
    }

    #[test]
    fn digits_map_like_letters() {
        let held = HeldModifiers {
            cmd: true,
            ..Default::default()
        };
        let capture = capture_key_down("5", held);
        assert_eq!(capture.display, "Cmd+5");
        assert_eq!(capture.emitted.as_deref(), Some("super+5"));
    }
}
