//! # Dominio de Tareas
//!
//! Implementa la colección de tareas (todos) con persistencia en un
//! archivo JSON:
//!
//! - `task`: el registro `Task` y la validación de payloads
//! - `storage`: gateway de persistencia (documento JSON completo)
//! - `store`: colección viva en memoria + contador de ids
//! - `handlers`: endpoints REST sobre la colección
//!
//! ## Flujo de una mutación
//!
//! ```text
//! handler → valida payload → TodoStore muta (con lock) → TodoStorage
//! persiste el snapshot completo → response
//! ```

pub mod handlers;
pub mod storage;
pub mod store;
pub mod task;

pub use storage::TodoStorage;
pub use store::{StoreError, TodoStore};
pub use task::{Task, TaskDraft, TaskPatch, ValidationError};
