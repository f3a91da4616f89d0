//! # Handlers de Sistema
//! src/system/handlers.rs
//!
//! Endpoints colaboradores que conviven con la API de tareas pero no
//! comparten estado con ella:
//! - `/status`  - liveness del proceso
//! - `/metrics` - snapshot del collector de métricas
//! - `/resolve` - resolución DNS de un dominio
//!
//! Ninguno de estos handlers toca el `TodoStore`.

use crate::http::{Request, Response, StatusCode};
use crate::router::{AppState, RouteParams};
use std::net::ToSocketAddrs;

/// Handler para `GET /status`
///
/// # Ejemplo de response
/// ```json
/// {"status": "running", "uptime_seconds": 42, "total_requests": 7}
/// ```
pub fn status_handler(_req: &Request, _params: &RouteParams, state: &AppState) -> Response {
    let snapshot = state.metrics.get_snapshot();

    Response::json(
        StatusCode::Ok,
        &serde_json::json!({
            "status": "running",
            "uptime_seconds": snapshot.uptime_secs,
            "total_requests": snapshot.total_requests,
        }),
    )
}

/// Handler para `GET /metrics`
///
/// Retorna el snapshot completo del collector (ver `metrics::collector`).
pub fn metrics_handler(_req: &Request, _params: &RouteParams, state: &AppState) -> Response {
    Response::json(StatusCode::Ok, &state.metrics.snapshot_json())
}

/// Handler para `GET /resolve?domain=DOMINIO`
///
/// Resuelve el dominio a sus direcciones IP. Acepta el dominio pelado
/// o con esquema (`http://example.com/ruta` → `example.com`).
///
/// # Query parameters
/// - `domain`: dominio a resolver (requerido)
///
/// # Ejemplo de response
/// ```json
/// {"domain": "example.com", "addresses": ["93.184.216.34"]}
/// ```
pub fn resolve_handler(req: &Request, _params: &RouteParams, _state: &AppState) -> Response {
    let raw = match req.query_param("domain") {
        Some(d) if !d.trim().is_empty() => d.trim(),
        _ => {
            return Response::error(
                StatusCode::BadRequest,
                "Missing required parameter: domain",
            );
        }
    };

    let hostname = match extract_hostname(raw) {
        Some(h) => h,
        None => return Response::error(StatusCode::BadRequest, "Invalid domain"),
    };

    // ToSocketAddrs exige un puerto; el 80 es solo para la consulta
    match (hostname.as_str(), 80u16).to_socket_addrs() {
        Ok(addrs) => {
            let mut addresses: Vec<String> =
                addrs.map(|a| a.ip().to_string()).collect();
            addresses.sort();
            addresses.dedup();

            Response::json(
                StatusCode::Ok,
                &serde_json::json!({
                    "domain": hostname,
                    "addresses": addresses,
                }),
            )
        }
        Err(_) => Response::error(
            StatusCode::InternalServerError,
            &format!("Could not resolve domain: {}", hostname),
        ),
    }
}

/// Extrae el hostname de un dominio posiblemente con esquema/ruta/puerto
fn extract_hostname(raw: &str) -> Option<String> {
    let without_scheme = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"))
        .unwrap_or(raw);

    let host = without_scheme
        .split('/')
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("");

    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}
