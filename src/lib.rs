//! # Todo API Server
//! src/lib.rs
//!
//! API REST de tareas (todos) sobre HTTP/1.0 implementado desde cero,
//! con persistencia de la colección completa en un archivo JSON.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing del protocolo HTTP/1.0, lectura del body y
//!   construcción de responses
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//! - `router`: Enrutamiento de peticiones con capturas tipadas
//! - `todos`: Dominio de tareas (registro, store, persistencia, handlers)
//! - `system`: Endpoints colaboradores (/status, /metrics, /resolve)
//! - `metrics`: Recolección de métricas y observabilidad
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use todo_server::config::Config;
//! use todo_server::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod http;
pub mod metrics;
pub mod router;
pub mod server;
pub mod system;
pub mod todos;
