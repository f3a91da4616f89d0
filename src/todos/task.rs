//! # Tipos del Dominio de Tareas
//! src/todos/task.rs
//!
//! Define el registro `Task` que se persiste en disco y los tipos de
//! entrada validados (`TaskDraft` para crear, `TaskPatch` para
//! actualizar). La validación es campo por campo sobre el payload JSON:
//! solo `title` y `completed` pasan el filtro, cualquier otro campo del
//! payload se ignora y nunca llega al archivo.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Una tarea de la colección
///
/// Invariantes:
/// - `id` es positivo, único e inmutable después de creado
/// - `title` nunca queda vacío ni con espacios alrededor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identificador único (asignado por el store, nunca reutilizado)
    pub id: u64,

    /// Título de la tarea (no vacío, sin espacios alrededor)
    pub title: String,

    /// Si la tarea está completada
    pub completed: bool,
}

/// Datos validados para crear una tarea (todavía sin id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub completed: bool,
}

/// Cambios validados para actualizar una tarea
///
/// Los campos en `None` estaban ausentes del payload y conservan el
/// valor anterior del registro.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// Errores de validación del payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// El payload no es un objeto JSON
    NotAnObject,

    /// `title` ausente en un create
    TitleRequired,

    /// `title` presente pero no es string o queda vacío al recortar
    TitleInvalid,

    /// `completed` presente pero no es boolean (null también es inválido)
    CompletedInvalid,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::NotAnObject => {
                write!(f, "Body must be a JSON object")
            }
            ValidationError::TitleRequired => {
                write!(f, "title is required and must be a non-empty string")
            }
            ValidationError::TitleInvalid => {
                write!(f, "title must be a non-empty string")
            }
            ValidationError::CompletedInvalid => {
                write!(f, "completed must be a boolean")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Valida el campo `title` de un payload
///
/// Retorna `Ok(None)` si el campo está ausente, `Ok(Some(titulo))` ya
/// recortado si es válido.
fn validate_title(payload: &Value) -> Result<Option<String>, ValidationError> {
    match payload.get("title") {
        None => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Err(ValidationError::TitleInvalid)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        // null, números, arrays... nada de eso es un título
        Some(_) => Err(ValidationError::TitleInvalid),
    }
}

/// Valida el campo `completed` de un payload
fn validate_completed(payload: &Value) -> Result<Option<bool>, ValidationError> {
    match payload.get("completed") {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ValidationError::CompletedInvalid),
    }
}

impl TaskDraft {
    /// Valida el payload de un `POST /api/todos`
    ///
    /// Reglas:
    /// - el payload debe ser un objeto JSON
    /// - `title` es obligatorio y debe ser string no vacío tras recortar
    /// - `completed` es opcional; si viene, debe ser boolean (default false)
    /// - cualquier otro campo (incluido `id`) se ignora
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        if !payload.is_object() {
            return Err(ValidationError::NotAnObject);
        }

        let title = validate_title(payload)?.ok_or(ValidationError::TitleRequired)?;
        let completed = validate_completed(payload)?.unwrap_or(false);

        Ok(TaskDraft { title, completed })
    }
}

impl TaskPatch {
    /// Valida el payload de un `PUT /api/todos/{id}`
    ///
    /// Las mismas reglas de campos que el create, pero `title` puede
    /// estar ausente (el registro conserva su valor). Un payload `{}`
    /// es válido y no cambia nada.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        if !payload.is_object() {
            return Err(ValidationError::NotAnObject);
        }

        Ok(TaskPatch {
            title: validate_title(payload)?,
            completed: validate_completed(payload)?,
        })
    }
}
