//! Process-wide record of which models speak the native text-generation protocol.
//!
//! The first call for a model id asks a [`CapabilityProbe`]; the answer is kept for the
//! life of the process. A native call rejected with the `model_kwargs` message also
//! records the model as non-native, so later calls go straight to fallback mode.

use crate::client::core::ClientMode;
use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Answers whether a model supports the native protocol.
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    async fn supports_native_protocol(&self, model_id: &str) -> Result<bool>;
}

/// Probe for self-hosted servers: every model is native.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNative;

#[async_trait]
impl CapabilityProbe for AssumeNative {
    async fn supports_native_protocol(&self, _model_id: &str) -> Result<bool> {
        Ok(true)
    }
}

static CAPABILITIES: once_cell::sync::Lazy<RwLock<HashMap<String, bool>>> =
    once_cell::sync::Lazy::new(|| RwLock::new(HashMap::new()));

/// Cached answer for a model id, if any.
pub fn cached(model_id: &str) -> Option<bool> {
    CAPABILITIES
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(model_id)
        .copied()
}

fn record(model_id: &str, native: bool) {
    CAPABILITIES
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(model_id.to_string(), native);
}

/// Record that a model only accepts the generic request shape.
pub fn mark_non_native(model_id: &str) {
    debug!(model = model_id, "recording model as non-native");
    record(model_id, false);
}

pub fn is_known_non_native(model_id: &str) -> bool {
    cached(model_id) == Some(false)
}

/// Mode for a model id: cached answer, else ask the probe once and remember it.
pub async fn resolve_mode(model_id: &str, probe: &dyn CapabilityProbe) -> Result<ClientMode> {
    let native = match cached(model_id) {
        Some(native) => native,
        None => {
            let native = probe.supports_native_protocol(model_id).await?;
            // A concurrent learned rejection wins over a probe answer.
            let mut map = CAPABILITIES.write().unwrap_or_else(PoisonError::into_inner);
            *map.entry(model_id.to_string()).or_insert(native)
        }
    };
    Ok(if native {
        ClientMode::Native
    } else {
        ClientMode::Fallback
    })
}
