//! # Todo API Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor de tareas.

use todo_server::config::Config;
use todo_server::server::Server;

fn main() {
    println!("=================================");
    println!("  Todo API Server");
    println!("  HTTP/1.0 + JSON file storage");
    println!("=================================\n");

    // Crear configuración desde CLI args y variables de entorno
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(1);
    }

    config.print_summary();

    // Crear el servidor (acá se carga la colección persistida)
    let mut server = Server::new(config);

    // Iniciar el servidor (esto bloqueará el thread)
    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }
}
