//! Host bridge boundary.
//!
//! The settings UI does not own any persisted state; it talks to the host
//! desktop process, which is the system of record for extensions and the
//! owner of global shortcut configuration. This module defines the boundary
//! as an explicit trait so the UI can be driven by a fake in tests, plus a
//! newline-delimited JSON implementation that speaks to a spawned host
//! process over stdio.
//!
//! Wire format (one JSON object per line):
//! - request:  `{"id": 3, "method": "get_extensions"}`
//! - response: `{"id": 3, "result": "<json payload>"}`
//! - one-way:  `{"method": "init"}`, `{"method": "set_extensions", "params": {"extensions": "..."}}`
//! - event:    `{"event": "shortcut-event", "payload": {"mods": 8, "code": "KeyN", "id": 42}}`
//!
//! All calls are best-effort and single-attempt; there are no retries and no
//! cancellation of in-flight requests.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::error::{Result, ResultExt, SettingsError};

/// Channel on which the host reports fired global hotkeys.
pub const SHORTCUT_EVENT_CHANNEL: &str = "shortcut-event";
/// Channel on which the host pushes shortcut configuration.
pub const SHORTCUT_CONFIG_CHANNEL: &str = "shortcut-config";

/// Payload emitted on `shortcut-event` when a registered global hotkey fires.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ShortcutEventPayload {
    /// Modifier bitmask as reported by the host.
    pub mods: u32,
    /// Physical key identifier (e.g. `KeyN`).
    pub code: String,
    /// Host-side registration id.
    pub id: u64,
}

/// An event pushed by the host on a subscribed channel.
#[derive(Clone, Debug)]
pub enum HostEvent {
    /// A registered global hotkey fired.
    Shortcut(ShortcutEventPayload),
    /// Shortcut configuration pushed by the host. The payload schema is
    /// unspecified; the raw value is carried as a placeholder extension
    /// point and must not be interpreted yet.
    Config(Value),
}

/// Tears the subscription down when dropped (or via [`SubscriptionGuard::stop`]).
pub struct SubscriptionGuard {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionGuard {
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Explicit teardown. Equivalent to dropping the guard.
    pub fn stop(mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

/// A live subscription to a host event channel.
///
/// Dropping the guard closes the receiver, so a blocked `recv` observes the
/// channel closing and can exit cleanly.
pub struct EventSubscription {
    pub receiver: async_channel::Receiver<HostEvent>,
    pub guard: SubscriptionGuard,
}

impl EventSubscription {
    /// Split into the receiver (for a listener thread) and the guard (kept
    /// by the owner enforcing stop-before-start).
    pub fn split(self) -> (async_channel::Receiver<HostEvent>, SubscriptionGuard) {
        (self.receiver, self.guard)
    }
}

/// The asynchronous boundary to the host desktop process.
pub trait HostBridge: Send + Sync {
    /// Fire-and-forget startup call; no return value is consumed.
    fn init(&self);

    /// Fetch the JSON-encoded extension list. Called exactly once at startup.
    fn get_extensions(&self) -> Result<String>;

    /// Hand the entire serialized extension list to the host.
    /// Fire-and-forget, best-effort, single attempt.
    fn set_extensions(&self, payload: String);

    /// Subscribe to a host event channel.
    fn subscribe(&self, channel: &str) -> Result<EventSubscription>;
}

type PendingMap = Arc<Mutex<HashMap<u64, mpsc::Sender<Value>>>>;
type SubscriberMap = Arc<Mutex<HashMap<String, async_channel::Sender<HostEvent>>>>;

/// JSONL bridge to a spawned host process.
pub struct ProcessBridge {
    stdin: Arc<Mutex<ChildStdin>>,
    pending: PendingMap,
    subscribers: SubscriberMap,
    next_request_id: AtomicU64,
    child: Mutex<Child>,
}

impl ProcessBridge {
    /// Spawn the host process and start the stdout reader thread.
    pub fn spawn(program: &str, args: &[String]) -> Result<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SettingsError::BridgeClosed("host stdin not piped".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SettingsError::BridgeClosed("host stdout not piped".to_string()))?;

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let subscribers: SubscriberMap = Arc::new(Mutex::new(HashMap::new()));

        let reader_pending = pending.clone();
        let reader_subscribers = subscribers.clone();
        std::thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                match line {
                    Ok(line) => dispatch_line(&line, &reader_pending, &reader_subscribers),
                    Err(e) => {
                        warn!(error = %e, "Host bridge stdout closed");
                        break;
                    }
                }
            }
            // Host went away: wake every blocked request.
            if let Ok(mut pending) = reader_pending.lock() {
                pending.clear();
            }
            info!("Host bridge reader thread exited");
        });

        info!(program = program, "Spawned host bridge process");

        Ok(Self {
            stdin: Arc::new(Mutex::new(stdin)),
            pending,
            subscribers,
            next_request_id: AtomicU64::new(1),
            child: Mutex::new(child),
        })
    }

    fn request(&self, method: &str) -> Result<Value> {
        let id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::channel();
        self.pending
            .lock()
            .map_err(|_| SettingsError::BridgeClosed("pending map poisoned".to_string()))?
            .insert(id, tx);

        write_line(&self.stdin, &json!({ "id": id, "method": method }))?;

        rx.recv().map_err(|_| {
            SettingsError::BridgeClosed(format!("host exited before answering '{method}'"))
        })
    }
}

impl HostBridge for ProcessBridge {
    fn init(&self) {
        write_line(&self.stdin, &json!({ "method": "init" })).log_err();
    }

    fn get_extensions(&self) -> Result<String> {
        match self.request("get_extensions")? {
            // The host sends the extension list as a string-valued payload.
            Value::String(payload) => Ok(payload),
            other => Ok(other.to_string()),
        }
    }

    fn set_extensions(&self, payload: String) {
        write_line(
            &self.stdin,
            &json!({ "method": "set_extensions", "params": { "extensions": payload } }),
        )
        .log_err();
    }

    fn subscribe(&self, channel: &str) -> Result<EventSubscription> {
        let (tx, rx) = async_channel::bounded(32);
        self.subscribers
            .lock()
            .map_err(|_| SettingsError::BridgeClosed("subscriber map poisoned".to_string()))?
            .insert(channel.to_string(), tx);

        write_line(
            &self.stdin,
            &json!({ "method": "listen", "params": { "channel": channel } }),
        )?;

        let subscribers = self.subscribers.clone();
        let stdin = self.stdin.clone();
        let channel_name = channel.to_string();
        let guard = SubscriptionGuard::new(move || {
            if let Ok(mut subscribers) = subscribers.lock() {
                subscribers.remove(&channel_name);
            }
            write_line(
                &stdin,
                &json!({ "method": "unlisten", "params": { "channel": channel_name } }),
            )
            .warn_on_err();
            debug!(channel = %channel_name, "Host event subscription torn down");
        });

        Ok(EventSubscription {
            receiver: rx,
            guard,
        })
    }
}

impl Drop for ProcessBridge {
    fn drop(&mut self) {
        if let Ok(mut child) = self.child.lock() {
            child.kill().warn_on_err();
            child.wait().warn_on_err();
        }
    }
}

fn write_line(stdin: &Mutex<ChildStdin>, value: &Value) -> Result<()> {
    let mut stdin = stdin
        .lock()
        .map_err(|_| SettingsError::BridgeClosed("host stdin poisoned".to_string()))?;
    stdin.write_all(value.to_string().as_bytes())?;
    stdin.write_all(b"\n")?;
    stdin.flush()?;
    Ok(())
}

/// Route one incoming JSONL line to a pending request or a subscriber.
/// Lines that fit neither shape are logged and dropped.
fn dispatch_line(line: &str, pending: &PendingMap, subscribers: &SubscriberMap) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Dropping unparseable host line");
            return;
        }
    };

    if let Some(channel) = value.get("event").and_then(Value::as_str) {
        let payload = value.get("payload").cloned().unwrap_or(Value::Null);
        let event = match channel {
            SHORTCUT_EVENT_CHANNEL => {
                match serde_json::from_value::<ShortcutEventPayload>(payload) {
                    Ok(p) => HostEvent::Shortcut(p),
                    Err(e) => {
                        warn!(error = %e, "Dropping malformed shortcut-event payload");
                        return;
                    }
                }
            }
            SHORTCUT_CONFIG_CHANNEL => HostEvent::Config(payload),
            other => {
                debug!(channel = other, "Ignoring event on unknown channel");
                return;
            }
        };

        let sender = subscribers
            .lock()
            .ok()
            .and_then(|map| map.get(channel).cloned());
        if let Some(sender) = sender {
            sender.send_blocking(event).warn_on_err();
        }
        return;
    }

    if let Some(id) = value.get("id").and_then(Value::as_u64) {
        let result = value.get("result").cloned().unwrap_or(Value::Null);
        let tx = pending.lock().ok().and_then(|mut map| map.remove(&id));
        match tx {
            Some(tx) => {
                tx.send(result).warn_on_err();
            }
            None => debug!(id = id, "Response for unknown request id"),
        }
        return;
    }

    debug!(line = line, "Ignoring host line with no event or id");
}
