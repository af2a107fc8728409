//! Open/closed switches for the public contact form and registrations.
//!
//! Each gate is a singleton keyed by [`GateKey`]. A missing row reads as the
//! key's defaults (enabled, with a stock closed-state message).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sanitize::{clean_line, clean_text};

/// Maximum closed-state title length.
pub const CLOSED_TITLE_MAX: usize = 120;

/// Maximum closed-state message length.
pub const CLOSED_MSG_MAX: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKey {
    Contacto,
    Inscripciones,
}

impl GateKey {
    pub const ALL: [GateKey; 2] = [GateKey::Contacto, GateKey::Inscripciones];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contacto => "contacto",
            Self::Inscripciones => "inscripciones",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "contacto" => Ok(Self::Contacto),
            "inscripciones" => Ok(Self::Inscripciones),
            other => Err(CoreError::Validation(format!(
                "Unknown config key '{other}'. Must be one of: contacto, inscripciones"
            ))),
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            Self::Contacto => "Contacto temporalmente cerrado",
            Self::Inscripciones => "Inscripciones cerradas",
        }
    }

    pub fn default_message(self) -> &'static str {
        match self {
            Self::Contacto => {
                "Por el momento no estamos recibiendo mensajes por este medio. Intenta más tarde."
            }
            Self::Inscripciones => "Por el momento no tenemos convocatorias abiertas.",
        }
    }
}

/// Effective gate settings served to the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSettings {
    pub enabled: bool,
    pub closed_title: String,
    pub closed_msg: String,
}

impl GateSettings {
    pub fn defaults(key: GateKey) -> Self {
        Self {
            enabled: true,
            closed_title: key.default_title().to_string(),
            closed_msg: key.default_message().to_string(),
        }
    }

    /// Sanitize admin input; blank texts fall back to the key's defaults.
    pub fn normalize(key: GateKey, enabled: bool, title: &str, msg: &str) -> Self {
        let closed_title = clean_line(title, CLOSED_TITLE_MAX);
        let closed_msg = clean_text(msg, CLOSED_MSG_MAX, true);
        Self {
            enabled,
            closed_title: if closed_title.is_empty() {
                key.default_title().to_string()
            } else {
                closed_title
            },
            closed_msg: if closed_msg.is_empty() {
                key.default_message().to_string()
            } else {
                closed_msg
            },
        }
    }

    /// Reject the action with the closed-state title when the gate is off.
    pub fn ensure_open(&self) -> Result<(), CoreError> {
        if self.enabled {
            Ok(())
        } else {
            Err(CoreError::Conflict(self.closed_title.clone()))
        }
    }
}
