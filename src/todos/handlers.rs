//! # Handlers HTTP de Tareas
//! src/todos/handlers.rs
//!
//! Implementa los endpoints REST de la colección:
//! - GET    /api/todos
//! - GET    /api/todos/{id}
//! - POST   /api/todos
//! - PUT    /api/todos/{id}
//! - DELETE /api/todos/{id}
//!
//! Los handlers reciben el payload ya decodificado (ver `http::body`) y
//! el id ya tipado (ver `router`); acá solo queda la validación de
//! campos y la forma de la respuesta.

use crate::http::{Request, Response, StatusCode};
use crate::router::{AppState, RouteParams};
use crate::todos::task::{TaskDraft, TaskPatch};
use serde::Serialize;

/// Serializa un payload o degrada a 500 sin filtrar detalle interno
fn json_or_500(status: StatusCode, payload: &impl Serialize) -> Response {
    match serde_json::to_value(payload) {
        Ok(value) => Response::json(status, &value),
        Err(_) => Response::error(StatusCode::InternalServerError, "Serialization failure"),
    }
}

/// Extrae la captura `id` (el router ya la validó como entero positivo)
fn route_id(params: &RouteParams) -> Result<u64, Response> {
    params.get("id").ok_or_else(|| {
        Response::error(StatusCode::InternalServerError, "Missing route parameter")
    })
}

/// Handler para `GET /api/todos`
///
/// Retorna la colección completa en orden de inserción.
///
/// # Ejemplo de response
/// ```json
/// [{"id":1,"title":"Buy milk","completed":false}]
/// ```
pub fn list_handler(_req: &Request, _params: &RouteParams, state: &AppState) -> Response {
    json_or_500(StatusCode::Ok, &state.store.list())
}

/// Handler para `GET /api/todos/{id}`
///
/// Retorna el registro, o 404 si el id no existe.
pub fn get_handler(_req: &Request, params: &RouteParams, state: &AppState) -> Response {
    let id = match route_id(params) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.store.find_by_id(id) {
        Some(task) => json_or_500(StatusCode::Ok, &task),
        None => Response::error(StatusCode::NotFound, "Not found"),
    }
}

/// Handler para `POST /api/todos`
///
/// Valida el payload, crea la tarea y la retorna con su id asignado.
///
/// # Ejemplo de response (201)
/// ```json
/// {"id":4,"title":"Buy milk","completed":false}
/// ```
pub fn create_handler(req: &Request, _params: &RouteParams, state: &AppState) -> Response {
    let draft = match TaskDraft::from_payload(req.payload()) {
        Ok(draft) => draft,
        Err(e) => return Response::error(StatusCode::BadRequest, &e.to_string()),
    };

    match state.store.insert(draft) {
        Ok(task) => json_or_500(StatusCode::Created, &task),
        // El detalle ya quedó en el log del store; al cliente no se filtra
        Err(_) => Response::error(StatusCode::InternalServerError, "Failed to persist todos"),
    }
}

/// Handler para `PUT /api/todos/{id}`
///
/// Actualización parcial: los campos ausentes del payload conservan su
/// valor. Un `id` dentro del payload se ignora; manda el del path.
pub fn update_handler(req: &Request, params: &RouteParams, state: &AppState) -> Response {
    let id = match route_id(params) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let patch = match TaskPatch::from_payload(req.payload()) {
        Ok(patch) => patch,
        Err(e) => return Response::error(StatusCode::BadRequest, &e.to_string()),
    };

    match state.store.replace(id, patch) {
        Ok(Some(task)) => json_or_500(StatusCode::Ok, &task),
        Ok(None) => Response::error(StatusCode::NotFound, "Not found"),
        Err(_) => Response::error(StatusCode::InternalServerError, "Failed to persist todos"),
    }
}

/// Handler para `DELETE /api/todos/{id}`
///
/// 204 sin body al eliminar; 404 si el id no existe.
pub fn delete_handler(_req: &Request, params: &RouteParams, state: &AppState) -> Response {
    let id = match route_id(params) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match state.store.remove(id) {
        Ok(Some(_)) => Response::new(StatusCode::NoContent),
        Ok(None) => Response::error(StatusCode::NotFound, "Not found"),
        Err(_) => Response::error(StatusCode::InternalServerError, "Failed to persist todos"),
    }
}
