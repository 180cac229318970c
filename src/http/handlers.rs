//! Registry endpoint handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;

use crate::http::request::PublishRequest;
use crate::http::response::{
    ErrorBody, HealthResponse, HistoryResponse, PublishResponse, StatusResponse, UrlResponse,
};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::registry::timestamp;

const NO_URL: &str = "No URL provided";

pub async fn index(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": state.store.config().service_name,
        "endpoints": {
            "GET /url": "Get the current backend URL",
            "POST /url": "Publish a backend URL",
            "GET /status": "Check whether a backend is online",
            "GET /history": "Get recently superseded URLs",
            "GET /health": "Health of the tracker itself",
        }
    }))
}

pub async fn get_url(State(state): State<AppState>) -> Json<UrlResponse> {
    let lookup = state.store.lookup();
    let stale = state.store.stale_flag(&lookup.descriptor, Utc::now());

    Json(UrlResponse {
        success: lookup.found,
        error: (!lookup.found).then(|| "No active backend found".to_string()),
        backend: lookup.descriptor,
        stale,
    })
}

pub async fn publish_url(
    State(state): State<AppState>,
    payload: Result<Json<PublishRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected publish body");
            metrics::record_publish_rejected();
            return ErrorBody::response(StatusCode::BAD_REQUEST, NO_URL, Some("invalid_request"));
        }
    };

    let Some(url) = request.url.filter(|u| !u.trim().is_empty()) else {
        metrics::record_publish_rejected();
        return ErrorBody::response(StatusCode::BAD_REQUEST, NO_URL, Some("invalid_request"));
    };

    match state.store.publish(&url, request.model.as_deref()) {
        Ok(backend) => Json(PublishResponse {
            success: true,
            message: "URL registered successfully".to_string(),
            backend,
        })
        .into_response(),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Rejected publish");
            metrics::record_publish_rejected();
            e.into_response()
        }
    }
}

pub async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let descriptor = state.store.lookup().descriptor;
    let stale = state.store.stale_flag(&descriptor, Utc::now());

    Json(StatusResponse {
        success: true,
        online: descriptor.is_online() && stale != Some(true),
        last_updated: timestamp::format(descriptor.last_updated.as_ref()),
        model: descriptor.model,
        stale,
    })
}

pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let (current, history) = state.store.history();
    Json(HistoryResponse {
        success: true,
        current,
        history,
    })
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.store.self_health();
    Json(HealthResponse {
        status: health.status.to_string(),
        service: health.service,
        timestamp: timestamp::format(Some(&health.timestamp)),
    })
}
