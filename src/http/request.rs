//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Este módulo implementa un parser HTTP/1.0 desde cero.
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! PUT /api/todos/3 HTTP/1.0\r\n
//! Host: localhost:3000\r\n
//! Content-Type: application/json\r\n
//! Content-Length: 18\r\n
//! \r\n
//! {"completed":true}
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path?query HTTP/1.0`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n\r\n` que separa headers del body
//! 4. **Body**: no se parsea aquí. El body llega por el socket en chunks
//!    y lo acumula y decodifica `http::body` una vez ruteado el request;
//!    el resultado se adjunta con [`Request::set_payload`].

use serde_json::Value;
use std::collections::HashMap;

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// HEAD - Como GET pero solo retorna headers
    HEAD,

    /// POST - Crear un recurso
    POST,

    /// PUT - Actualizar un recurso existente
    PUT,

    /// DELETE - Eliminar un recurso
    DELETE,

    /// OPTIONS - Consultar verbos disponibles (solo se parsea, ninguna ruta lo usa)
    OPTIONS,

    /// PATCH - Actualización parcial (solo se parsea, ninguna ruta lo usa)
    PATCH,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no es reconocido
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "OPTIONS" => Ok(Method::OPTIONS),
            "PATCH" => Ok(Method::PATCH),
            _ => Err(ParseError::UnsupportedMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }

    /// Indica si el método lleva body que el servidor debe leer
    pub fn expects_body(&self) -> bool {
        matches!(self, Method::POST | Method::PUT | Method::PATCH)
    }
}

/// Representa la cabecera de un request HTTP/1.0 parseada
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (GET, POST, PUT, DELETE, ...)
    method: Method,

    /// Path de la petición (ej: "/api/todos/3")
    path: String,

    /// Query parameters parseados (ej: {"domain": "example.com"})
    query_params: HashMap<String, String>,

    /// Headers HTTP (ej: {"Content-Length": "18"})
    headers: HashMap<String, String>,

    /// Versión HTTP ("HTTP/1.0" o "HTTP/1.1")
    version: String,

    /// Payload JSON decodificado del body (Null si no se leyó body)
    payload: Value,
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request incompleto o truncado
    IncompleteRequest,

    /// Formato inválido de la request line
    InvalidRequestLine,

    /// Método HTTP no reconocido
    UnsupportedMethod(String),

    /// Versión HTTP incorrecta (debe ser HTTP/1.0 o HTTP/1.1)
    InvalidHttpVersion(String),

    /// Header malformado
    InvalidHeader(String),

    /// Request vacío
    EmptyRequest,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::IncompleteRequest => write!(f, "Incomplete HTTP request"),
            ParseError::InvalidRequestLine => write!(f, "Invalid request line format"),
            ParseError::UnsupportedMethod(m) => write!(f, "Unsupported HTTP method: {}", m),
            ParseError::InvalidHttpVersion(v) => write!(f, "Invalid HTTP version: {}", v),
            ParseError::InvalidHeader(h) => write!(f, "Invalid header: {}", h),
            ParseError::EmptyRequest => write!(f, "Empty request"),
        }
    }
}

impl std::error::Error for ParseError {}

impl Request {
    /// Parsea la cabecera de un request HTTP/1.0 desde bytes
    ///
    /// `buffer` debe contener la request line y los headers (todo lo
    /// anterior al `\r\n\r\n`). Los bytes del body NO deben incluirse.
    ///
    /// # Retorna
    ///
    /// * `Ok(Request)` - Cabecera parseada exitosamente
    /// * `Err(ParseError)` - Error durante el parsing
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use todo_server::http::{Method, Request};
    ///
    /// let raw = b"GET /api/todos HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.method(), Method::GET);
    /// assert_eq!(request.path(), "/api/todos");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Convertir a string (validando que sea UTF-8 válido)
        let request_str = std::str::from_utf8(buffer)
            .map_err(|_| ParseError::InvalidRequestLine)?;

        if request_str.trim().is_empty() {
            return Err(ParseError::EmptyRequest);
        }

        // Separar por \r\n para obtener líneas
        let lines: Vec<&str> = request_str.split("\r\n").collect();

        if lines.is_empty() {
            return Err(ParseError::IncompleteRequest);
        }

        // 1. Parsear la request line (primera línea)
        let (method, path, query_params, version) = Self::parse_request_line(lines[0])?;

        // 2. Parsear headers (resto de líneas hasta encontrar línea vacía)
        let headers = Self::parse_headers(&lines[1..])?;

        Ok(Request {
            method,
            path,
            query_params,
            headers,
            version,
            payload: Value::Null,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path?query HTTP/1.0`
    fn parse_request_line(line: &str) -> Result<(Method, String, HashMap<String, String>, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::InvalidRequestLine);
        }

        // Parsear método
        let method = Method::from_str(parts[0])?;

        // Parsear path y query
        let (path, query_params) = Self::parse_path_and_query(parts[1]);

        // Validar versión HTTP
        let version = parts[2].to_string();
        if version != "HTTP/1.0" && version != "HTTP/1.1" {
            return Err(ParseError::InvalidHttpVersion(version));
        }

        Ok((method, path, query_params, version))
    }

    /// Parsea el path y extrae los query parameters
    ///
    /// Ejemplo: "/resolve?domain=example.com"
    /// Retorna: ("/resolve", {"domain": "example.com"})
    fn parse_path_and_query(path_with_query: &str) -> (String, HashMap<String, String>) {
        // Buscar el símbolo '?' que separa path de query
        if let Some(query_start) = path_with_query.find('?') {
            let path = path_with_query[..query_start].to_string();
            let query_string = &path_with_query[query_start + 1..];
            let query_params = Self::parse_query_string(query_string);
            (path, query_params)
        } else {
            // No hay query parameters
            (path_with_query.to_string(), HashMap::new())
        }
    }

    /// Parsea una query string en un HashMap
    ///
    /// Ejemplo: "domain=example.com&debug"
    /// Retorna: {"domain": "example.com", "debug": ""}
    fn parse_query_string(query: &str) -> HashMap<String, String> {
        let mut params = HashMap::new();

        // Separar por '&' para obtener cada parámetro
        for param in query.split('&') {
            if param.is_empty() {
                continue;
            }

            // Separar por '=' para obtener key y value
            if let Some(eq_pos) = param.find('=') {
                let key = &param[..eq_pos];
                let value = &param[eq_pos + 1..];

                // URL decode básico (reemplazar %20 por espacio, etc.)
                let decoded_value = Self::url_decode(value);

                params.insert(key.to_string(), decoded_value);
            } else {
                // Parámetro sin valor (ej: "?debug")
                params.insert(param.to_string(), String::new());
            }
        }

        params
    }

    /// Decodifica una URL (convierte %20 a espacio, etc.)
    ///
    /// Implementación básica - puede mejorarse con una librería
    fn url_decode(s: &str) -> String {
        // Por ahora solo manejamos %20 (espacio)
        s.replace("%20", " ")
            .replace("+", " ")
    }

    /// Parsea los headers HTTP
    ///
    /// Cada header tiene formato: "Name: Value"
    fn parse_headers(lines: &[&str]) -> Result<HashMap<String, String>, ParseError> {
        let mut headers = HashMap::new();

        for line in lines {
            // La línea vacía marca el fin de los headers
            if line.trim().is_empty() {
                break;
            }

            // Buscar el separador ':'
            if let Some(colon_pos) = line.find(':') {
                let name = line[..colon_pos].trim().to_string();
                let value = line[colon_pos + 1..].trim().to_string();
                headers.insert(name, value);
            } else {
                // Header sin ':' es inválido
                return Err(ParseError::InvalidHeader(line.to_string()));
            }
        }

        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene todos los query parameters
    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.query_params
    }

    /// Obtiene un query parameter específico
    ///
    /// # Ejemplo
    /// ```
    /// use todo_server::http::Request;
    ///
    /// let raw = b"GET /resolve?domain=example.com HTTP/1.0\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.query_param("domain"), Some("example.com"));
    /// assert_eq!(request.query_param("missing"), None);
    /// ```
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name).map(|s| s.as_str())
    }

    /// Obtiene todos los headers
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(|s| s.as_str())
    }

    /// Obtiene el Content-Length declarado, si existe y es un número
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")
            .and_then(|v| v.parse::<usize>().ok())
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Adjunta el payload JSON ya decodificado del body
    pub fn set_payload(&mut self, payload: Value) {
        self.payload = payload;
    }

    /// Obtiene el payload JSON del body (Null si no se leyó body)
    pub fn payload(&self) -> &Value {
        &self.payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_simple_get() {
        let raw = b"GET / HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.path(), "/");
        assert!(request.query_params().is_empty());
    }

    #[test]
    fn test_parse_with_path() {
        let raw = b"GET /api/todos HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/api/todos");
    }

    #[test]
    fn test_parse_all_methods() {
        for (raw, expected) in [
            (&b"GET /api/todos HTTP/1.0\r\n\r\n"[..], Method::GET),
            (&b"POST /api/todos HTTP/1.0\r\n\r\n"[..], Method::POST),
            (&b"PUT /api/todos/1 HTTP/1.0\r\n\r\n"[..], Method::PUT),
            (&b"DELETE /api/todos/1 HTTP/1.0\r\n\r\n"[..], Method::DELETE),
            (&b"PATCH /api/todos/1 HTTP/1.0\r\n\r\n"[..], Method::PATCH),
        ] {
            let request = Request::parse(raw).unwrap();
            assert_eq!(request.method(), expected);
        }
    }

    #[test]
    fn test_expects_body() {
        assert!(Method::POST.expects_body());
        assert!(Method::PUT.expects_body());
        assert!(Method::PATCH.expects_body());
        assert!(!Method::GET.expects_body());
        assert!(!Method::DELETE.expects_body());
    }

    #[test]
    fn test_parse_with_query_params() {
        let raw = b"GET /resolve?domain=example.com HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.path(), "/resolve");
        assert_eq!(request.query_param("domain"), Some("example.com"));
    }

    #[test]
    fn test_parse_with_headers() {
        let raw = b"POST /api/todos HTTP/1.0\r\nHost: localhost:3000\r\nContent-Length: 18\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.header("Host"), Some("localhost:3000"));
        assert_eq!(request.content_length(), Some(18));
    }

    #[test]
    fn test_content_length_invalid() {
        let raw = b"POST /api/todos HTTP/1.0\r\nContent-Length: abc\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.content_length(), None);
    }

    #[test]
    fn test_url_decode() {
        let raw = b"GET /resolve?domain=my%20host HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert_eq!(request.query_param("domain"), Some("my host"));
    }

    #[test]
    fn test_payload_default_null() {
        let raw = b"GET /api/todos HTTP/1.0\r\n\r\n";
        let request = Request::parse(raw).unwrap();

        assert!(request.payload().is_null());
    }

    #[test]
    fn test_set_payload() {
        let raw = b"POST /api/todos HTTP/1.0\r\n\r\n";
        let mut request = Request::parse(raw).unwrap();

        request.set_payload(json!({"title": "Comprar leche"}));
        assert_eq!(request.payload()["title"], "Comprar leche");
    }

    #[test]
    fn test_invalid_method() {
        let raw = b"BREW / HTTP/1.0\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::UnsupportedMethod(_))));
    }

    #[test]
    fn test_invalid_version() {
        let raw = b"GET / HTTP/2.0\r\n\r\n"; // HTTP/2.0 no está soportado
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHttpVersion(_))));
    }

    #[test]
    fn test_empty_request() {
        let raw = b"";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::EmptyRequest)));
    }

    #[test]
    fn test_invalid_request_line() {
        let raw = b"GET\r\n\r\n"; // Falta path y version
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidRequestLine)));
    }

    #[test]
    fn test_invalid_header() {
        let raw = b"GET / HTTP/1.0\r\nsin-dos-puntos\r\n\r\n";
        let result = Request::parse(raw);

        assert!(matches!(result, Err(ParseError::InvalidHeader(_))));
    }
}
