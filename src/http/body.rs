//! # Lectura del Body del Request
//! src/http/body.rs
//!
//! El body de un request llega por el socket en chunks de tamaño
//! arbitrario, nunca todo de un golpe. Este módulo lo acumula de forma
//! incremental, aplica un tope duro de bytes y decodifica el texto
//! acumulado como JSON.
//!
//! La lectura es una operación única y bloqueante para la conexión: el
//! handler recibe el payload completo (o un error) y nunca ve estado
//! parcial del body.
//!
//! ## Contrato
//!
//! - Body vacío → `Ok(json!({}))` (soporta requests sin body)
//! - Más de `max_bytes` acumulados → `BodyError::TooLarge`; el caller
//!   debe cerrar la conexión sin drenar el resto
//! - Contenido que no es JSON → `BodyError::Malformed`
//! - Error de transporte → `BodyError::Io`

use serde_json::Value;
use std::io::Read;

/// Errores al leer o decodificar el body
#[derive(Debug)]
pub enum BodyError {
    /// El body acumulado superó el tope configurado
    TooLarge,

    /// El body completo no es JSON válido
    Malformed(serde_json::Error),

    /// Error de transporte durante la acumulación
    Io(std::io::Error),
}

impl std::fmt::Display for BodyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BodyError::TooLarge => write!(f, "Payload too large"),
            BodyError::Malformed(e) => write!(f, "Invalid JSON body: {}", e),
            BodyError::Io(e) => write!(f, "I/O error while reading body: {}", e),
        }
    }
}

impl std::error::Error for BodyError {}

/// Lee y decodifica el body JSON de un request
///
/// # Argumentos
///
/// * `reader` - Socket (o cualquier `Read`) del que siguen llegando bytes
/// * `leftover` - Bytes del body que ya llegaron pegados a la cabecera
/// * `content_length` - Valor del header `Content-Length`, si el cliente
///   lo mandó. Sin él se lee hasta EOF (HTTP/1.0, `Connection: close`)
/// * `max_bytes` - Tope duro de bytes acumulados
///
/// # Ejemplo
///
/// ```
/// use std::io::Cursor;
/// use todo_server::http::body::read_json_body;
///
/// let mut reader = Cursor::new(&b"milk\"}"[..]);
/// let payload = read_json_body(&mut reader, b"{\"title\":\"Buy ", None, 1024).unwrap();
/// assert_eq!(payload["title"], "Buy milk");
/// ```
pub fn read_json_body<R: Read>(
    reader: &mut R,
    leftover: &[u8],
    content_length: Option<usize>,
    max_bytes: usize,
) -> Result<Value, BodyError> {
    // Si el cliente ya declaró un tamaño por encima del tope, no hay
    // nada que leer: se aborta antes de consumir el stream
    if let Some(declared) = content_length {
        if declared > max_bytes {
            return Err(BodyError::TooLarge);
        }
    }

    let mut data: Vec<u8> = Vec::new();

    // 1. Arrancar con los bytes que llegaron junto a la cabecera
    match content_length {
        // Con Content-Length, el body son exactamente esos bytes;
        // cualquier exceso en el buffer no pertenece a este request
        Some(declared) => {
            let take = leftover.len().min(declared);
            data.extend_from_slice(&leftover[..take]);
        }
        None => data.extend_from_slice(leftover),
    }

    if data.len() > max_bytes {
        return Err(BodyError::TooLarge);
    }

    // 2. Acumular chunks del socket hasta completar el body
    let mut chunk = [0u8; 4096];
    loop {
        let done = match content_length {
            Some(declared) => data.len() >= declared,
            None => false, // sin Content-Length se lee hasta EOF
        };
        if done {
            break;
        }

        let n = reader.read(&mut chunk).map_err(BodyError::Io)?;
        if n == 0 {
            // EOF: el cliente cerró su mitad de escritura
            break;
        }

        data.extend_from_slice(&chunk[..n]);

        if data.len() > max_bytes {
            return Err(BodyError::TooLarge);
        }
    }

    // Con Content-Length, recortar lo que no pertenece al body
    if let Some(declared) = content_length {
        data.truncate(declared);
    }

    // 3. Decodificar el texto acumulado
    if data.is_empty() {
        // Fin de body sin bytes: objeto vacío, no es un error
        return Ok(serde_json::json!({}));
    }

    serde_json::from_slice(&data).map_err(BodyError::Malformed)
}
