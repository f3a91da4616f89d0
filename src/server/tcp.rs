//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio
//! thread.
//!
//! ## Ciclo de una conexión
//!
//! 1. Leer del socket hasta completar la cabecera (`\r\n\r\n`)
//! 2. Parsear request line + headers
//! 3. Resolver la ruta (400/404/405 se deciden acá, sin tocar el body)
//! 4. Para métodos con body, acumular y decodificar el payload JSON
//! 5. Ejecutar el handler y escribir la response
//!
//! Las mutaciones del store quedan serializadas por su mutex interno;
//! acá solo se serializa/deserializa el tráfico de cada conexión.

use crate::config::Config;
use crate::http::body::{read_json_body, BodyError};
use crate::http::{Request, Response, StatusCode};
use crate::metrics::MetricsCollector;
use crate::router::{AppState, Router};
use crate::system::handlers as system_handlers;
use crate::todos::handlers as todo_handlers;
use crate::todos::{TodoStorage, TodoStore};
use crate::http::Method;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Tamaño máximo de la cabecera de un request (request line + headers)
const MAX_HEAD_BYTES: usize = 8192;

/// Servidor HTTP/1.0 concurrente de la API de tareas
pub struct Server {
    config: Config,
    router: Arc<Router>,
    state: Arc<AppState>,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let mut router = Router::new();

        // API REST de tareas
        router.register(Method::GET, "/api/todos", todo_handlers::list_handler);
        router.register(Method::POST, "/api/todos", todo_handlers::create_handler);
        router.register(Method::GET, "/api/todos/{id}", todo_handlers::get_handler);
        router.register(Method::PUT, "/api/todos/{id}", todo_handlers::update_handler);
        router.register(Method::DELETE, "/api/todos/{id}", todo_handlers::delete_handler);

        // Colaboradores sin estado compartido con la colección
        router.register(Method::GET, "/status", system_handlers::status_handler);
        router.register(Method::GET, "/metrics", system_handlers::metrics_handler);
        router.register(Method::GET, "/resolve", system_handlers::resolve_handler);

        let store = TodoStore::new(TodoStorage::new(&config.db_path));
        let state = AppState {
            store,
            metrics: MetricsCollector::new(),
        };

        Self {
            config,
            router: Arc::new(router),
            state: Arc::new(state),
            listener: None,
        }
    }

    /// Hace bind del listener y retorna la dirección efectiva
    ///
    /// Separado de [`Server::run`] para poder usar puerto 0 (efímero)
    /// en tests y conocer el puerto asignado.
    pub fn bind(&mut self) -> std::io::Result<SocketAddr> {
        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        let local = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(local)
    }

    /// Acepta conexiones para siempre, un thread por conexión
    pub fn run(&mut self) -> std::io::Result<()> {
        if self.listener.is_none() {
            let local = self.bind()?;
            println!("[*] Iniciando servidor en {}", local);
        }

        let listener = self.listener.as_ref().unwrap();
        println!("[+] Servidor escuchando en {}", listener.local_addr()?);
        println!("[*] Modo concurrente: un thread por conexion\n");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    let state = Arc::clone(&self.state);
                    let config = self.config.clone();

                    let peer_addr = stream.peer_addr()
                        .map(|addr| addr.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());

                    println!(" ✅ Nueva conexión desde: {} (spawning thread)", peer_addr);

                    // Incrementar contador de threads activos
                    state.metrics.increment_active_threads();

                    thread::spawn(move || {
                        let metrics = state.metrics.clone();
                        if let Err(e) = Self::handle_connection_static(stream, router, state, &config) {
                            eprintln!("   ❌ Error en thread: {}", e);
                        }
                        // Decrementar al terminar
                        metrics.decrement_active_threads();
                    });
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Procesa una conexión completa: un request, una response
    fn handle_connection_static(
        mut stream: TcpStream,
        router: Arc<Router>,
        state: Arc<AppState>,
        config: &Config,
    ) -> std::io::Result<()> {
        let start = Instant::now();

        // El timeout de lectura evita que un cliente colgado retenga el
        // thread para siempre (0 = deshabilitado)
        if config.read_timeout_ms > 0 {
            let timeout = Duration::from_millis(config.read_timeout_ms);
            stream.set_read_timeout(Some(timeout))?;
            stream.set_write_timeout(Some(timeout))?;
        }

        // Generar Request ID único
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        start.elapsed().as_nanos().hash(&mut hasher);
        thread::current().id().hash(&mut hasher);
        let request_id = format!("{:016x}", hasher.finish());
        let thread_id = format!("{:?}", thread::current().id());

        // 1. Leer hasta completar la cabecera (el body puede venir en
        //    los mismos chunks; esos bytes quedan como "leftover")
        let mut head = Vec::with_capacity(1024);
        let mut chunk = [0u8; 1024];
        let head_end = loop {
            if let Some(pos) = find_header_end(&head) {
                break pos;
            }

            if head.len() > MAX_HEAD_BYTES {
                let response = Response::error(StatusCode::BadRequest, "Request head too large");
                return Self::write_response(&mut stream, response).map(|_| ());
            }

            let n = stream.read(&mut chunk)?;
            if n == 0 {
                if head.is_empty() {
                    println!("   ✅ Conexión cerrada");
                    return Ok(());
                }
                // El cliente cerró a mitad de cabecera
                let response = Response::error(StatusCode::BadRequest, "Incomplete HTTP request");
                return Self::write_response(&mut stream, response).map(|_| ());
            }
            head.extend_from_slice(&chunk[..n]);
        };

        let leftover = head[head_end + 4..].to_vec();

        println!("   ✅ {} bytes de cabecera [req_id: {}]", head_end + 4, &request_id[..8]);

        // 2. Parsear la cabecera
        let (response, path) = match Request::parse(&head[..head_end + 4]) {
            Ok(mut request) => {
                let path = request.path().to_string();
                println!("   ✅ {} {}", request.method().as_str(), path);

                // 3. Resolver la ruta ANTES de leer el body: un 404/405
                //    o un id inválido no consumen el payload
                let response = match router.resolve(request.method(), request.path()) {
                    Err(route_error) => route_error.to_response(),
                    Ok((handler, params)) => {
                        if request.method().expects_body() {
                            // 4. Acumular y decodificar el body completo
                            match read_json_body(
                                &mut stream,
                                &leftover,
                                request.content_length(),
                                config.max_body_bytes,
                            ) {
                                Ok(payload) => {
                                    request.set_payload(payload);
                                    handler(&request, &params, &state)
                                }
                                Err(BodyError::TooLarge) => {
                                    // Responder y cortar la conexión sin
                                    // drenar el resto del payload
                                    println!("   ❌ Payload sobre el tope de {} bytes", config.max_body_bytes);
                                    Response::error(StatusCode::BadRequest, "Payload too large")
                                }
                                Err(BodyError::Malformed(_)) => {
                                    Response::error(StatusCode::BadRequest, "Invalid JSON body")
                                }
                                Err(BodyError::Io(e)) => {
                                    // Conexión muerta a mitad de body: se
                                    // abandona el request sin mutar nada
                                    println!("   ❌ Conexión perdida leyendo body: {}", e);
                                    return Err(e);
                                }
                            }
                        } else {
                            handler(&request, &params, &state)
                        }
                    }
                };

                (response, path)
            }
            Err(e) => {
                println!("   ❌ Parse error: {}", e);
                (Response::error(StatusCode::BadRequest, &format!("Invalid: {}", e)), "/error".to_string())
            }
        };

        // 5. Agregar headers comunes y de observabilidad
        let mut response = response;
        response.add_header("Server", "TodoAPI-HTTP/1.0");
        response.add_header("Connection", "close");
        response.add_header("X-Request-Id", &request_id);
        response.add_header("X-Worker-Thread", &thread_id);

        let process_id = std::process::id();
        response.add_header("X-Worker-Pid", &process_id.to_string());

        let status_code = Self::write_response(&mut stream, response)?;

        let latency = start.elapsed();

        // Registrar métricas
        state.metrics.record_request(&path, status_code, latency);

        println!("   ✅ {} ({:.2}ms)\n", status_code, latency.as_secs_f64() * 1000.0);

        Ok(())
    }

    /// Escribe la response completa y retorna su código de estado
    fn write_response(stream: &mut TcpStream, response: Response) -> std::io::Result<u16> {
        let response_bytes = response.to_bytes();
        stream.write_all(&response_bytes)?;
        stream.flush()?;
        Ok(response.status().as_u16())
    }
}

/// Busca el fin de la cabecera (`\r\n\r\n`) en el buffer acumulado
fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}
