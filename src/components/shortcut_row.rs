//! A single shortcut row: name and description on the left, the capture
//! field on the right. Purely compositional.

use gpui::{div, prelude::*, px, rgb, App, Entity, IntoElement, RenderOnce, SharedString, Window};

use crate::components::shortcut_input::ShortcutInput;
use crate::theme::Theme;

/// Pre-computed colors for shortcut rows.
#[derive(Clone, Copy, Debug)]
pub struct ShortcutRowColors {
    pub name: u32,
    pub description: u32,
}

impl ShortcutRowColors {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            name: theme.colors.text_primary,
            description: theme.colors.text_muted,
        }
    }
}

#[derive(IntoElement)]
pub struct ShortcutRow {
    name: SharedString,
    description: SharedString,
    colors: ShortcutRowColors,
    input: Entity<ShortcutInput>,
}

impl ShortcutRow {
    pub fn new(
        name: impl Into<SharedString>,
        description: impl Into<SharedString>,
        colors: ShortcutRowColors,
        input: Entity<ShortcutInput>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            colors,
            input,
        }
    }
}

impl RenderOnce for ShortcutRow {
    fn render(self, _window: &mut Window, _cx: &mut App) -> impl IntoElement {
        div()
            .flex()
            .flex_row()
            .items_center()
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap(px(2.))
                    .child(
                        div()
                            .text_sm()
                            .text_color(rgb(self.colors.name))
                            .child(self.name),
                    )
                    .child(
                        div()
                            .text_xs()
                            .text_color(rgb(self.colors.description))
                            .child(self.description),
                    ),
            )
            .child(div().flex_1())
            .child(self.input)
    }
}
