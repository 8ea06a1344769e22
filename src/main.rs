use std::process;
use std::sync::Arc;

use anyhow::Context as _;
use gpui::{
    px, size, App, AppContext, Application, Bounds, WindowBackgroundAppearance, WindowBounds,
    WindowOptions,
};
use tracing::{error, info};

use extension_settings_gpui::bridge::{HostBridge, ProcessBridge};
use extension_settings_gpui::components::ExtensionPanel;
use extension_settings_gpui::events::ShortcutMonitor;
use extension_settings_gpui::extensions::parse_extensions;
use extension_settings_gpui::store::ExtensionStore;
use extension_settings_gpui::theme::Theme;
use extension_settings_gpui::{config, hotkeys, logging};

fn main() {
    let _logging_guard = logging::init();
    let config = config::load_config();
    info!(host = %config.host_command, "starting extension settings");

    let bridge: Arc<dyn HostBridge> =
        match ProcessBridge::spawn(&config.host_command, &config.host_args) {
            Ok(bridge) => Arc::new(bridge),
            Err(err) => {
                error!(%err, host = %config.host_command, "failed to spawn extension host");
                eprintln!(
                    "failed to spawn extension host `{}`: {err}",
                    config.host_command
                );
                process::exit(1);
            }
        };

    bridge.init();

    let payload = match bridge.get_extensions() {
        Ok(payload) => payload,
        Err(err) => {
            error!(%err, "failed to fetch extensions from host");
            eprintln!("failed to fetch extensions from host: {err}");
            process::exit(1);
        }
    };
    let extensions = match parse_extensions(&payload) {
        Ok(extensions) => extensions,
        Err(err) => {
            error!(%err, "host returned a malformed extension list");
            eprintln!("{err}");
            process::exit(1);
        }
    };
    info!(count = extensions.len(), "loaded extensions");

    hotkeys::start_hotkey_listener(config.hotkeys.clone());

    // Dropping the monitor tears down the host subscriptions, so it has to
    // outlive the UI event loop below.
    let mut monitor = ShortcutMonitor::new(bridge.clone());
    if let Err(err) = monitor.start() {
        error!(%err, "failed to subscribe to host events");
    }

    let theme = Theme::default();
    Application::new().run(move |cx: &mut App| {
        let bounds = Bounds::centered(None, size(px(480.), px(640.)), cx);
        let window = cx.open_window(
            WindowOptions {
                window_bounds: Some(WindowBounds::Windowed(bounds)),
                titlebar: None,
                is_movable: true,
                window_background: WindowBackgroundAppearance::Blurred,
                ..Default::default()
            },
            |_, cx| {
                let store = cx.new(|_| ExtensionStore::seeded(extensions));
                cx.new(|cx| ExtensionPanel::new(cx, theme, store, bridge))
            },
        );
        if let Err(err) = window.context("failed to open settings window") {
            error!(%err, "window creation failed");
            process::exit(1);
        }
        cx.activate(true);
    });

    drop(monitor);
}
