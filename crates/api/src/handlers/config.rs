//! Handlers for the config gates that open and close public forms.

use axum::extract::{Path, State};
use axum::Json;
use ong_core::error::CoreError;
use ong_core::site_config::{GateKey, GateSettings};
use ong_db::repositories::SiteConfigRepo;
use ong_db::DbPool;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::ws::events::{ConfigEvent, GateView, CONFIG_UPDATED};

/// Request body for `PUT /admin/config/{key}`. Blank texts reset to defaults.
#[derive(Debug, Deserialize)]
pub struct UpdateGateRequest {
    pub enabled: bool,
    #[serde(default)]
    pub closed_title: String,
    #[serde(default)]
    pub closed_msg: String,
}

fn parse_key(raw: &str) -> AppResult<GateKey> {
    GateKey::parse(raw).map_err(|_| {
        AppError::Core(CoreError::NotFoundByKey {
            entity: "Config gate",
            key: raw.to_string(),
        })
    })
}

/// Effective settings for every gate, in [`GateKey::ALL`] order.
pub async fn load_gates(pool: &DbPool) -> Result<Vec<GateView>, sqlx::Error> {
    let mut gates = Vec::with_capacity(GateKey::ALL.len());
    for key in GateKey::ALL {
        gates.push(GateView {
            key,
            settings: SiteConfigRepo::settings(pool, key).await?,
        });
    }
    Ok(gates)
}

/// GET /api/v1/config
pub async fn list_gates(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<GateView>>>> {
    let gates = load_gates(&state.pool).await?;
    Ok(Json(DataResponse { data: gates }))
}

/// GET /api/v1/config/{key}
pub async fn get_gate(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<GateView>>> {
    let key = parse_key(&key)?;
    let settings = SiteConfigRepo::settings(&state.pool, key).await?;
    Ok(Json(DataResponse {
        data: GateView { key, settings },
    }))
}

/// PUT /api/v1/admin/config/{key}
///
/// Upserts the gate and pushes `config.updated` to every feed subscriber.
pub async fn update_gate(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<UpdateGateRequest>,
) -> AppResult<Json<DataResponse<GateView>>> {
    let key = parse_key(&key)?;
    let settings =
        GateSettings::normalize(key, input.enabled, &input.closed_title, &input.closed_msg);
    let row = SiteConfigRepo::upsert(&state.pool, key, &settings).await?;

    let view = GateView {
        key,
        settings: row.settings(key),
    };
    tracing::info!(
        user_id = admin.user_id,
        key = key.as_str(),
        enabled = view.settings.enabled,
        "Config gate updated"
    );

    let gates = [view.clone()];
    let event = ConfigEvent {
        kind: CONFIG_UPDATED,
        gates: &gates,
    };
    match event.to_message() {
        Ok(msg) => state.ws_manager.broadcast(msg).await,
        Err(e) => tracing::warn!(error = %e, "Failed to encode config event"),
    }

    Ok(Json(DataResponse { data: view }))
}

/// Reject the request with the gate's closed title when it is off.
pub async fn ensure_gate_open(pool: &DbPool, key: GateKey) -> AppResult<()> {
    SiteConfigRepo::settings(pool, key).await?.ensure_open()?;
    Ok(())
}
