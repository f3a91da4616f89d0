//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración del servidor de tareas con
//! soporte completo para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./todo_server --port 3000 \
//!   --db-path ./data/todos.json \
//!   --max-body-bytes 1000000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=3000 HTTP_HOST=0.0.0.0 TODOS_DB=/var/lib/todos.json ./todo_server
//! ```

use clap::Parser;

/// Configuración del servidor de tareas
#[derive(Debug, Clone, Parser)]
#[command(name = "todo_server")]
#[command(about = "API REST de tareas (todos) con persistencia en archivo JSON")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "3000", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    // === Storage ===

    /// Ruta del archivo de persistencia de tareas
    #[arg(long = "db-path", default_value = "./data/todos.json", env = "TODOS_DB")]
    pub db_path: String,

    // === Límites ===

    /// Tope duro de bytes acumulados del body de un request
    #[arg(long = "max-body-bytes", default_value = "1000000", env = "MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Timeout de lectura del socket en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "10000", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use todo_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:3000");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if self.db_path.trim().is_empty() {
            return Err("DB path must not be empty".to_string());
        }

        if self.max_body_bytes == 0 {
            return Err("Max body bytes must be >= 1".to_string());
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("╔══════════════════════════════════════════════════╗");
        println!("║         Todo API Server Configuration            ║");
        println!("╚══════════════════════════════════════════════════╝");
        println!();
        println!("🌐 Network:");
        println!("   Address:        {}", self.address());
        println!();
        println!("💾 Storage:");
        println!("   DB file:        {}", self.db_path);
        println!();
        println!("🚧 Limits:");
        println!("   Max body:       {} bytes", self.max_body_bytes);
        if self.read_timeout_ms > 0 {
            println!("   Read timeout:   {} ms", self.read_timeout_ms);
        } else {
            println!("   Read timeout:   disabled");
        }
        println!();
        println!("════════════════════════════════════════════════════");
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
            db_path: "./data/todos.json".to_string(),
            max_body_bytes: 1_000_000,
            read_timeout_ms: 10_000,
        }
    }
}
