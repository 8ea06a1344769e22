pub mod extension_panel;
pub mod shortcut_input;
pub mod shortcut_row;

pub use extension_panel::ExtensionPanel;
pub use shortcut_input::ShortcutInput;
pub use shortcut_row::ShortcutRow;
