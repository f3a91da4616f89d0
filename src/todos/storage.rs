//! # Persistencia de Tareas
//! src/todos/storage.rs
//!
//! Lee y escribe la colección completa como un único documento JSON en
//! disco. La lectura al arranque nunca falla hacia el caller: archivo
//! ausente, ilegible o corrupto → colección vacía (y se reporta por
//! stderr). La escritura es atómica: archivo temporal + rename, así un
//! write fallido jamás corrompe el snapshot anterior.

use crate::todos::task::Task;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Gateway de persistencia de la colección de tareas
#[derive(Debug, Clone)]
pub struct TodoStorage {
    /// Ruta al archivo de persistencia
    path: String,
}

impl TodoStorage {
    /// Crea un gateway apuntando a la ruta indicada
    ///
    /// No toca el disco: la lectura ocurre en [`TodoStorage::load`].
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Ruta del archivo de persistencia
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Carga la colección completa desde el archivo
    ///
    /// Nunca falla: cualquier problema (archivo ausente, ilegible,
    /// JSON inválido) se reporta por stderr y retorna colección vacía.
    /// El orden del array en disco se conserva tal cual.
    pub fn load(&self) -> Vec<Task> {
        if !Path::new(&self.path).exists() {
            eprintln!("   [!] {} no existe, arrancando con colección vacía", self.path);
            return Vec::new();
        }

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("   [!] No se pudo abrir {}: {}, colección vacía", self.path, e);
                return Vec::new();
            }
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, Vec<Task>>(reader) {
            Ok(tasks) => tasks,
            Err(e) => {
                // Archivo corrupto: empezar limpio en vez de tumbar el server
                eprintln!("   [!] {} corrupto ({}), colección vacía", self.path, e);
                Vec::new()
            }
        }
    }

    /// Guarda la colección completa al archivo (snapshot completo)
    ///
    /// Escribe primero a un archivo temporal y luego renombra, así el
    /// documento persistido siempre es un snapshot autoconsistente.
    pub fn save(&self, tasks: &[Task]) -> std::io::Result<()> {
        // Asegurar que el directorio padre exista (ej: ./data)
        if let Some(parent) = Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Crear archivo temporal primero (atomic write)
        let temp_path = format!("{}.tmp", self.path);
        let file = File::create(&temp_path)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer_pretty(&mut writer, tasks)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

        writer.flush()?;

        // Renombrar (atómico en sistemas Unix)
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}
