//! # Endpoints de Sistema
//!
//! Endpoints que conviven en el mismo proceso que la API de tareas
//! pero son colaboradores sin estado compartido con ella:
//!
//! - `GET /status`  - liveness
//! - `GET /metrics` - métricas del servidor
//! - `GET /resolve?domain=X` - resolución DNS

pub mod handlers;
