//! # Módulo HTTP
//!
//! Este módulo implementa el protocolo HTTP/1.0 desde cero, sin usar
//! librerías de alto nivel. Incluye:
//!
//! - Parsing de la cabecera de requests HTTP/1.0
//! - Lectura incremental del body con tope de bytes
//! - Construcción de responses HTTP
//! - Manejo de status codes
//!
//! ## Especificación HTTP/1.0
//!
//! El protocolo HTTP/1.0 (RFC 1945) es más simple que HTTP/1.1:
//! - No requiere el header `Host`
//! - No tiene chunked transfer encoding
//! - No mantiene conexiones persistentes por defecto
//!
//! ### Formato de Request
//!
//! ```text
//! POST /api/todos HTTP/1.0\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 22\r\n
//! \r\n
//! {"title":"Buy milk"}
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 201 Created\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 44\r\n
//! \r\n
//! {"id":1,"title":"Buy milk","completed":false}
//! ```

pub mod body;      // Lectura incremental y decodificación del body
pub mod request;   // Parsing de cabeceras de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use request::{Method, Request};
pub use response::Response;
pub use status::StatusCode;
