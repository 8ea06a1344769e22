//! Host-emitted shortcut event and config subscriptions.
//!
//! An independent side-channel: the host reports fired global hotkeys on
//! `shortcut-event` and pushes shortcut configuration on `shortcut-config`.
//! Neither is wired into the extension store. Subscriptions follow a strict
//! stop-before-start discipline: installing a new listener always tears the
//! previous one down first, so a listener is never leaked by overwriting its
//! handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::bridge::{
    HostBridge, HostEvent, SubscriptionGuard, SHORTCUT_CONFIG_CHANNEL, SHORTCUT_EVENT_CHANNEL,
};
use crate::error::Result;

pub struct ShortcutMonitor {
    bridge: Arc<dyn HostBridge>,
    event_guard: Option<SubscriptionGuard>,
    config_guard: Option<SubscriptionGuard>,
    config_ready: Arc<AtomicBool>,
}

impl ShortcutMonitor {
    pub fn new(bridge: Arc<dyn HostBridge>) -> Self {
        Self {
            bridge,
            event_guard: None,
            config_guard: None,
            config_ready: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Subscribe to both channels.
    pub fn start(&mut self) -> Result<()> {
        self.listen_config()?;
        self.listen_events()?;
        Ok(())
    }

    /// Listen for fired global hotkeys. Receipt is logged; nothing else is
    /// acted on yet.
    pub fn listen_events(&mut self) -> Result<()> {
        self.stop_listen_events();

        let subscription = self.bridge.subscribe(SHORTCUT_EVENT_CHANNEL)?;
        let (receiver, guard) = subscription.split();
        self.event_guard = Some(guard);

        std::thread::spawn(move || {
            while let Ok(event) = receiver.recv_blocking() {
                if let HostEvent::Shortcut(payload) = event {
                    info!(
                        mods = payload.mods,
                        code = %payload.code,
                        id = payload.id,
                        "Global shortcut fired"
                    );
                }
            }
            debug!("shortcut-event listener exited");
        });
        Ok(())
    }

    /// Tear down the event listener. No-op if none is installed.
    pub fn stop_listen_events(&mut self) {
        if let Some(guard) = self.event_guard.take() {
            guard.stop();
        }
    }

    /// Listen for shortcut configuration pushes. The payload schema is an
    /// unspecified extension point; receiving one only marks config as
    /// ready.
    pub fn listen_config(&mut self) -> Result<()> {
        self.stop_listen_config();

        let subscription = self.bridge.subscribe(SHORTCUT_CONFIG_CHANNEL)?;
        let (receiver, guard) = subscription.split();
        self.config_guard = Some(guard);

        let config_ready = self.config_ready.clone();
        std::thread::spawn(move || {
            while let Ok(event) = receiver.recv_blocking() {
                if let HostEvent::Config(payload) = event {
                    config_ready.store(true, Ordering::SeqCst);
                    // TODO: parse the config payload once the host defines
                    // its schema; until then only the readiness flag moves.
                    debug!(payload = %payload, "Shortcut config received");
                }
            }
            debug!("shortcut-config listener exited");
        });
        Ok(())
    }

    /// Tear down the config listener. No-op if none is installed.
    pub fn stop_listen_config(&mut self) {
        if let Some(guard) = self.config_guard.take() {
            guard.stop();
        }
    }

    pub fn config_ready(&self) -> bool {
        self.config_ready.load(Ordering::SeqCst)
    }
}

impl Drop for ShortcutMonitor {
    fn drop(&mut self) {
        self.stop_listen_events();
        self.stop_listen_config();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::test_support::FakeBridge;
    use std::time::{Duration, Instant};

    fn wait_until(deadline: Duration, mut condition: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        condition()
    }

    #[test]
    fn config_event_marks_config_ready() {
        let bridge = Arc::new(FakeBridge::new("[]"));
        let mut monitor = ShortcutMonitor::new(bridge.clone());
        monitor.start().unwrap();
        assert!(!monitor.config_ready());

        bridge.emit(
            SHORTCUT_CONFIG_CHANNEL,
            HostEvent::Config(serde_json::json!({"version": 1})),
        );

        assert!(wait_until(Duration::from_secs(1), || monitor.config_ready()));
    }

    #[test]
    fn shortcut_events_do_not_touch_config_readiness() {
        let bridge = Arc::new(FakeBridge::new("[]"));
        let mut monitor = ShortcutMonitor::new(bridge.clone());
        monitor.start().unwrap();

        bridge.emit(
            SHORTCUT_EVENT_CHANNEL,
            HostEvent::Shortcut(crate::bridge::ShortcutEventPayload {
                mods: 8,
                code: "KeyN".to_string(),
                id: 1,
            }),
        );

        std::thread::sleep(Duration::from_millis(20));
        assert!(!monitor.config_ready());
    }

    #[test]
    fn resubscribing_tears_down_the_previous_listener_first() {
        let bridge = Arc::new(FakeBridge::new("[]"));
        let mut monitor = ShortcutMonitor::new(bridge.clone());

        monitor.listen_events().unwrap();
        monitor.listen_events().unwrap();

        let torn_down = bridge.torn_down.lock().unwrap().clone();
        assert_eq!(torn_down, vec![SHORTCUT_EVENT_CHANNEL.to_string()]);
    }

    #[test]
    fn stopping_without_a_listener_is_a_silent_noop() {
        let bridge = Arc::new(FakeBridge::new("[]"));
        let mut monitor = ShortcutMonitor::new(bridge);
        monitor.stop_listen_events();
        monitor.stop_listen_config();
        assert!(bridge_never_touched(&monitor));
    }

    fn bridge_never_touched(monitor: &ShortcutMonitor) -> bool {
        monitor.event_guard.is_none() && monitor.config_guard.is_none()
    }
}
