//! Keyboard Bindings
//!
//! Maps key names (`ArrowLeft`, `Escape`, `h`, ...) to gallery commands.
//! Pressing a bound key emits the command on [`Keyboard::commands`]. Views use
//! [`Keyboard::access_key`] to put single-character bindings on their
//! navigation links as HTML `accesskey` hints.
//!
//! The configuration may override bindings under the `keyboard` key:
//!
//! ```json
//! { "keyboard": { "j": "next_image", "k": "previous_image" } }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::RwLock;

use crate::signal::{Signal, SignalResult};

/// Commands a key can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    PreviousImage,
    NextImage,
    Close,
    Home,
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyCommand::PreviousImage => "previous_image",
            KeyCommand::NextImage => "next_image",
            KeyCommand::Close => "close",
            KeyCommand::Home => "home",
        };
        f.write_str(name)
    }
}

/// Built-in bindings
pub fn default_bindings() -> HashMap<String, KeyCommand> {
    HashMap::from([
        ("ArrowLeft".to_string(), KeyCommand::PreviousImage),
        ("ArrowRight".to_string(), KeyCommand::NextImage),
        ("Escape".to_string(), KeyCommand::Close),
        ("h".to_string(), KeyCommand::Home),
    ])
}

/// Key binding table and command dispatch
pub struct Keyboard {
    bindings: RwLock<HashMap<String, KeyCommand>>,
    commands: Signal<KeyCommand>,
}

impl Keyboard {
    /// Create a keyboard with the default bindings
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(default_bindings()),
            commands: Signal::new("keyboard.commands"),
        }
    }

    /// Signal carrying dispatched commands
    pub fn commands(&self) -> &Signal<KeyCommand> {
        &self.commands
    }

    /// Apply overrides on top of the default bindings
    ///
    /// Earlier overrides are discarded.
    pub async fn load_bindings(&self, overrides: HashMap<String, KeyCommand>) {
        let mut bindings = default_bindings();
        let overridden = overrides.len();
        bindings.extend(overrides);

        let total = bindings.len();
        *self.bindings.write().await = bindings;

        tracing::info!(total, overridden, "Keyboard bindings loaded");
    }

    /// Command bound to `key`
    pub async fn binding(&self, key: &str) -> Option<KeyCommand> {
        self.bindings.read().await.get(key).copied()
    }

    /// Single-character key bound to `command`, for `accesskey` hints
    ///
    /// When several keys qualify the alphabetically first one is returned.
    pub async fn access_key(&self, command: KeyCommand) -> Option<char> {
        self.bindings
            .read()
            .await
            .iter()
            .filter(|(_, bound)| **bound == command)
            .filter_map(|(key, _)| {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            })
            .min()
    }

    /// Dispatch a key press
    ///
    /// Returns the command emitted, or `None` if the key is unbound.
    pub async fn press(&self, key: &str) -> SignalResult<Option<KeyCommand>> {
        let Some(command) = self.binding(key).await else {
            tracing::trace!(key = %key, "Unbound key ignored");
            return Ok(None);
        };

        tracing::debug!(key = %key, command = %command, "Key pressed");
        self.commands.emit(command).await?;
        Ok(Some(command))
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Action;
    use std::sync::{Arc, Mutex};

    #[tokio::test]
    async fn test_default_bindings() {
        let keyboard = Keyboard::new();
        assert_eq!(keyboard.binding("ArrowLeft").await, Some(KeyCommand::PreviousImage));
        assert_eq!(keyboard.binding("ArrowRight").await, Some(KeyCommand::NextImage));
        assert_eq!(keyboard.binding("q").await, None);
    }

    #[tokio::test]
    async fn test_overrides_replace_previous_overrides() {
        let keyboard = Keyboard::new();

        keyboard
            .load_bindings(HashMap::from([("j".to_string(), KeyCommand::NextImage)]))
            .await;
        assert_eq!(keyboard.binding("j").await, Some(KeyCommand::NextImage));
        assert_eq!(keyboard.binding("ArrowRight").await, Some(KeyCommand::NextImage));

        keyboard
            .load_bindings(HashMap::from([("ArrowRight".to_string(), KeyCommand::Close)]))
            .await;
        assert_eq!(keyboard.binding("j").await, None);
        assert_eq!(keyboard.binding("ArrowRight").await, Some(KeyCommand::Close));
    }

    #[tokio::test]
    async fn test_access_key() {
        let keyboard = Keyboard::new();
        assert_eq!(keyboard.access_key(KeyCommand::Home).await, Some('h'));
        // Only multi-character keys are bound by default
        assert_eq!(keyboard.access_key(KeyCommand::NextImage).await, None);

        keyboard
            .load_bindings(HashMap::from([
                ("n".to_string(), KeyCommand::NextImage),
                ("l".to_string(), KeyCommand::NextImage),
            ]))
            .await;
        assert_eq!(keyboard.access_key(KeyCommand::NextImage).await, Some('l'));
    }

    #[tokio::test]
    async fn test_press_emits_command() {
        let keyboard = Keyboard::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        keyboard
            .commands()
            .connect(Action::new("record", "tests", move |command: KeyCommand| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push(command);
                    Ok(())
                }
            }))
            .await;

        assert_eq!(keyboard.press("Escape").await.unwrap(), Some(KeyCommand::Close));
        assert_eq!(keyboard.press("F12").await.unwrap(), None);

        assert_eq!(*seen.lock().unwrap(), vec![KeyCommand::Close]);
    }

    #[test]
    fn test_command_serde_names() {
        let parsed: HashMap<String, KeyCommand> =
            serde_json::from_str(r#"{"j": "next_image", "x": "close"}"#).unwrap();
        assert_eq!(parsed["j"], KeyCommand::NextImage);
        assert_eq!(KeyCommand::PreviousImage.to_string(), "previous_image");
    }
}
