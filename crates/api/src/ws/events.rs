//! Messages pushed over the config feed.
//!
//! ```text
//! {"type":"config.snapshot","gates":[{"key":"contacto","enabled":true,...}, ...]}
//! {"type":"config.updated","gates":[{"key":"inscripciones","enabled":false,...}]}
//! ```

use axum::extract::ws::Message;
use ong_core::site_config::{GateKey, GateSettings};
use serde::Serialize;

/// Sent once right after a client connects.
pub const CONFIG_SNAPSHOT: &str = "config.snapshot";

/// Sent to everyone after an admin writes a gate.
pub const CONFIG_UPDATED: &str = "config.updated";

/// A gate as served to the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateView {
    pub key: GateKey,
    #[serde(flatten)]
    pub settings: GateSettings,
}

#[derive(Debug, Serialize)]
pub struct ConfigEvent<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub gates: &'a [GateView],
}

impl ConfigEvent<'_> {
    /// Encode as a text frame.
    pub fn to_message(&self) -> Result<Message, serde_json::Error> {
        let text = serde_json::to_string(self)?;
        Ok(Message::Text(text.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_serializes_with_flattened_settings() {
        let gates = [GateView {
            key: GateKey::Contacto,
            settings: GateSettings::defaults(GateKey::Contacto),
        }];
        let event = ConfigEvent {
            kind: CONFIG_UPDATED,
            gates: &gates,
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "config.updated");
        assert_eq!(value["gates"][0]["key"], "contacto");
        assert_eq!(value["gates"][0]["enabled"], true);
        assert_eq!(
            value["gates"][0]["closed_title"],
            "Contacto temporalmente cerrado"
        );
    }
}
