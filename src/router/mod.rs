//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea pares (método, path) a
//! handlers específicos.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router::resolve → (Handler, RouteParams) → Handler → Response
//! ```
//!
//! Los patrones de ruta se registran por segmentos y admiten capturas
//! tipadas: `/api/todos/{id}` captura `id` como entero positivo. La
//! captura se valida ANTES de despachar, así un handler jamás ve un id
//! malformado.
//!
//! ## Precedencia de resolución
//!
//! 1. Match completo (método + path) en orden de registro
//! 2. Path con forma de ruta pero captura inválida → 400
//! 3. Path id-scoped válido con verbo sin ruta → 405
//! 4. Todo lo demás → 404 (incluye verbos no registrados sobre el path
//!    de colección, como hace la referencia)

use crate::http::{Method, Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::todos::TodoStore;
use std::collections::HashMap;

/// Estado compartido que reciben los handlers
///
/// El store de tareas y el collector de métricas son handles clonables;
/// cada conexión recibe su clone y todos comparten el mismo estado.
pub struct AppState {
    pub store: TodoStore,
    pub metrics: MetricsCollector,
}

/// Tipo de función handler
///
/// Un handler recibe el request, las capturas de la ruta y el estado
/// compartido, y retorna una Response
pub type Handler = fn(&Request, &RouteParams, &AppState) -> Response;

/// Capturas tipadas extraídas del path
///
/// Todas las capturas son enteros positivos ya validados.
#[derive(Debug, Default)]
pub struct RouteParams {
    params: HashMap<String, u64>,
}

impl RouteParams {
    /// Obtiene una captura por nombre
    pub fn get(&self, name: &str) -> Option<u64> {
        self.params.get(name).copied()
    }
}

/// Un segmento de un patrón de ruta
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Segmento literal ("api", "todos")
    Literal(String),

    /// Captura tipada ("{id}" → Param("id"))
    Param(String),
}

/// Una ruta registrada
struct Route {
    method: Method,
    segments: Vec<Segment>,
    handler: Handler,
}

/// Fallos de resolución de ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteError {
    /// El path tiene la forma de una ruta pero la captura no es un
    /// entero positivo
    InvalidParam,

    /// Path id-scoped válido, pero el verbo no tiene ruta
    MethodNotAllowed,

    /// Ningún patrón registrado coincide
    NotFound,
}

impl RouteError {
    /// Convierte el fallo en la respuesta HTTP correspondiente
    pub fn to_response(self) -> Response {
        match self {
            RouteError::InvalidParam => Response::error(StatusCode::BadRequest, "Invalid id"),
            RouteError::MethodNotAllowed => {
                Response::error(StatusCode::MethodNotAllowed, "Method not allowed")
            }
            RouteError::NotFound => Response::error(StatusCode::NotFound, "Not found"),
        }
    }
}

/// Router que mapea (método, patrón) a handlers
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta con su handler
    ///
    /// El patrón es un path con segmentos literales o capturas entre
    /// llaves. Las rutas se evalúan en orden de registro.
    ///
    /// # Ejemplo
    /// ```
    /// use todo_server::http::{Method, Request, Response, StatusCode};
    /// use todo_server::router::{AppState, RouteParams, Router};
    ///
    /// fn ping_handler(_req: &Request, _params: &RouteParams, _state: &AppState) -> Response {
    ///     Response::json(StatusCode::Ok, &serde_json::json!({"pong": true}))
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/ping", ping_handler);
    /// ```
    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) {
        self.routes.push(Route {
            method,
            segments: Self::parse_pattern(pattern),
            handler,
        });
    }

    /// Parsea un patrón en segmentos
    fn parse_pattern(pattern: &str) -> Vec<Segment> {
        pattern
            .strip_prefix('/')
            .unwrap_or(pattern)
            .split('/')
            .map(|s| {
                if let Some(name) = s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Segment::Param(name.to_string())
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect()
    }

    /// Resuelve (método, path) al handler y sus capturas
    ///
    /// No ejecuta el handler: el server decide leer el body del request
    /// recién después de saber que la ruta existe, así un 404/405/400
    /// nunca consume el body.
    pub fn resolve(&self, method: Method, path: &str) -> Result<(Handler, RouteParams), RouteError> {
        let path_segments: Vec<&str> = path
            .strip_prefix('/')
            .unwrap_or(path)
            .split('/')
            .collect();

        // Se recuerda el mejor fallo visto para decidir 400 vs 405 vs 404
        let mut saw_invalid_param = false;
        let mut saw_id_scoped_shape = false;

        for route in &self.routes {
            let captures = match Self::match_segments(&route.segments, &path_segments) {
                ShapeMatch::No => continue,
                ShapeMatch::InvalidParam => {
                    saw_invalid_param = true;
                    continue;
                }
                ShapeMatch::Yes(captures) => captures,
            };

            if route.method == method {
                return Ok((route.handler, RouteParams { params: captures }));
            }

            // Path correcto, verbo equivocado: solo las rutas id-scoped
            // producen 405; sobre la colección cae el 404 de referencia
            if route.segments.iter().any(|s| matches!(s, Segment::Param(_))) {
                saw_id_scoped_shape = true;
            }
        }

        if saw_invalid_param {
            Err(RouteError::InvalidParam)
        } else if saw_id_scoped_shape {
            Err(RouteError::MethodNotAllowed)
        } else {
            Err(RouteError::NotFound)
        }
    }

    /// Compara los segmentos de un patrón contra los del path
    fn match_segments(pattern: &[Segment], path: &[&str]) -> ShapeMatch {
        if pattern.len() != path.len() {
            return ShapeMatch::No;
        }

        let mut captures = HashMap::new();
        for (seg, actual) in pattern.iter().zip(path.iter()) {
            match seg {
                Segment::Literal(expected) => {
                    if expected != actual {
                        return ShapeMatch::No;
                    }
                }
                Segment::Param(name) => match Self::parse_id(actual) {
                    Some(value) => {
                        captures.insert(name.clone(), value);
                    }
                    // Los literales ya coincidieron: la forma es la de
                    // esta ruta, pero la captura no tipa
                    None => return ShapeMatch::InvalidParam,
                },
            }
        }

        ShapeMatch::Yes(captures)
    }

    /// Valida una captura como entero positivo
    ///
    /// Solo dígitos ASCII, sin signo, y el valor debe ser >= 1.
    fn parse_id(segment: &str) -> Option<u64> {
        if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match segment.parse::<u64>() {
            Ok(n) if n > 0 => Some(n),
            _ => None,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Resultado de comparar un patrón contra un path
enum ShapeMatch {
    /// No es esta ruta
    No,

    /// La forma coincide pero una captura no es un entero positivo
    InvalidParam,

    /// Coincide, con las capturas ya tipadas
    Yes(HashMap<String, u64>),
}
