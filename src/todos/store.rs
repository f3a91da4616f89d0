//! # Store de Tareas en Memoria
//! src/todos/store.rs
//!
//! Fuente única de verdad mientras el proceso vive: la colección
//! ordenada de tareas y el contador de próximo id, ambos detrás de un
//! mutex. Toda mutación ejecuta su secuencia leer-modificar-persistir
//! con el lock tomado, así las mutaciones quedan serializadas y las
//! lecturas siempre ven un snapshot consistente.
//!
//! El contador de ids es estrictamente creciente durante la vida del
//! proceso: un id nunca se reutiliza, ni siquiera después de borrar.

use crate::todos::storage::TodoStorage;
use crate::todos::task::{Task, TaskDraft, TaskPatch};
use std::sync::{Arc, Mutex};

/// Errores de las operaciones mutantes del store
#[derive(Debug)]
pub enum StoreError {
    /// La colección mutó en memoria pero no se pudo escribir a disco
    Persistence(std::io::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Persistence(e) => write!(f, "Failed to persist todos: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Estado interno protegido por el mutex
struct StoreInner {
    /// Colección ordenada por inserción
    tasks: Vec<Task>,

    /// Próximo id a asignar (mayor que todo id emitido en este proceso)
    next_id: u64,
}

/// Store de tareas compartido entre threads
///
/// Es un handle clonable: todos los clones comparten el mismo estado,
/// así cada conexión recibe su propio handle sobre la misma colección.
pub struct TodoStore {
    inner: Arc<Mutex<StoreInner>>,
    storage: TodoStorage,
}

impl TodoStore {
    /// Crea el store cargando la colección persistida
    ///
    /// El contador arranca en `max(ids existentes) + 1`, o `1` si la
    /// colección está vacía.
    pub fn new(storage: TodoStorage) -> Self {
        let tasks = storage.load();
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;

        println!("   [+] {} tareas cargadas desde {}", tasks.len(), storage.path());

        Self {
            inner: Arc::new(Mutex::new(StoreInner { tasks, next_id })),
            storage,
        }
    }

    /// Snapshot de la colección completa, en orden de inserción
    pub fn list(&self) -> Vec<Task> {
        let inner = self.inner.lock().unwrap();
        inner.tasks.clone()
    }

    /// Busca una tarea por id
    pub fn find_by_id(&self, id: u64) -> Option<Task> {
        let inner = self.inner.lock().unwrap();
        inner.tasks.iter().find(|t| t.id == id).cloned()
    }

    /// Cantidad de tareas en la colección
    pub fn count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.tasks.len()
    }

    /// Crea una tarea: asigna id, avanza el contador y agrega al final
    ///
    /// La operación no se considera completa hasta haber persistido la
    /// colección post-mutación. El id consumido no se reemite aunque la
    /// persistencia falle.
    pub fn insert(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let task = Task {
            id: inner.next_id,
            title: draft.title,
            completed: draft.completed,
        };
        inner.next_id += 1;
        inner.tasks.push(task.clone());

        Self::flush(&self.storage, &inner.tasks)?;
        Ok(task)
    }

    /// Actualiza una tarea existente campo por campo
    ///
    /// Solo `title` y `completed` son actualizables; el `id` nunca se
    /// toca. Los campos ausentes del patch conservan su valor.
    /// Retorna `Ok(None)` si el id no existe.
    pub fn replace(&self, id: u64, patch: TaskPatch) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let task = match inner.tasks.iter_mut().find(|t| t.id == id) {
            Some(t) => t,
            None => return Ok(None),
        };

        // Merge explícito con allow-list: nada más entra al registro
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(completed) = patch.completed {
            task.completed = completed;
        }
        let updated = task.clone();

        Self::flush(&self.storage, &inner.tasks)?;
        Ok(Some(updated))
    }

    /// Elimina una tarea por id, conservando el orden de las restantes
    ///
    /// Retorna la tarea eliminada, o `Ok(None)` si el id no existe.
    pub fn remove(&self, id: u64) -> Result<Option<Task>, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        let index = match inner.tasks.iter().position(|t| t.id == id) {
            Some(i) => i,
            None => return Ok(None),
        };

        // Vec::remove desplaza sin reordenar a las sobrevivientes
        let removed = inner.tasks.remove(index);

        Self::flush(&self.storage, &inner.tasks)?;
        Ok(Some(removed))
    }

    /// Persiste el snapshot post-mutación (se llama con el lock tomado)
    fn flush(storage: &TodoStorage, tasks: &[Task]) -> Result<(), StoreError> {
        if let Err(e) = storage.save(tasks) {
            // El estado en memoria y el de disco quedaron divergentes
            // hasta el próximo flush exitoso
            eprintln!(
                "   [!] No se pudo persistir {} ({}); el cambio queda solo en memoria",
                storage.path(),
                e
            );
            return Err(StoreError::Persistence(e));
        }
        Ok(())
    }
}

impl Clone for TodoStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            storage: self.storage.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn store_at(path: &str) -> TodoStore {
        let _ = fs::remove_file(path);
        TodoStore::new(TodoStorage::new(path))
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            completed: false,
        }
    }

    // ==================== Insert ====================

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let path = "/tmp/test_store_sequential.json";
        let store = store_at(path);

        let a = store.insert(draft("a")).unwrap();
        let b = store.insert(draft("b")).unwrap();
        let c = store.insert(draft("c")).unwrap();

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_insert_appends_at_end() {
        let path = "/tmp/test_store_append.json";
        let store = store_at(path);

        store.insert(draft("primera")).unwrap();
        store.insert(draft("segunda")).unwrap();

        let titles: Vec<String> = store.list().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["primera", "segunda"]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_insert_persists_immediately() {
        let path = "/tmp/test_store_persist_now.json";
        let store = store_at(path);

        store.insert(draft("durable")).unwrap();

        // Otra instancia (proceso "reiniciado") debe ver la tarea
        let reloaded = TodoStore::new(TodoStorage::new(path));
        assert_eq!(reloaded.count(), 1);
        assert_eq!(reloaded.find_by_id(1).unwrap().title, "durable");

        let _ = fs::remove_file(path);
    }

    // ==================== Ids Nunca Reutilizados ====================

    #[test]
    fn test_ids_monotonic_after_delete() {
        let path = "/tmp/test_store_monotonic.json";
        let store = store_at(path);

        store.insert(draft("a")).unwrap(); // id 1
        let b = store.insert(draft("b")).unwrap(); // id 2
        store.remove(b.id).unwrap();

        let c = store.insert(draft("c")).unwrap();
        assert_eq!(c.id, 3, "el id 2 no debe reutilizarse");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_next_id_from_persisted_max() {
        let path = "/tmp/test_store_next_from_max.json";
        let _ = fs::remove_file(path);

        // Persistir una colección con huecos y máximos fuera de orden
        let storage = TodoStorage::new(path);
        storage
            .save(&[
                Task { id: 7, title: "siete".to_string(), completed: false },
                Task { id: 3, title: "tres".to_string(), completed: true },
            ])
            .unwrap();

        let store = TodoStore::new(storage);
        let created = store.insert(draft("nueva")).unwrap();
        assert_eq!(created.id, 8);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_unique_ids_across_many_creates() {
        let path = "/tmp/test_store_unique.json";
        let store = store_at(path);

        for i in 0..20 {
            store.insert(draft(&format!("t{}", i))).unwrap();
        }

        let mut ids: Vec<u64> = store.list().into_iter().map(|t| t.id).collect();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);

        let _ = fs::remove_file(path);
    }

    // ==================== Replace ====================

    #[test]
    fn test_replace_partial_update() {
        let path = "/tmp/test_store_partial.json";
        let store = store_at(path);

        let created = store.insert(draft("A")).unwrap();

        let updated = store
            .replace(
                created.id,
                TaskPatch {
                    title: None,
                    completed: Some(true),
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "A", "title ausente conserva su valor");
        assert!(updated.completed);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_replace_does_not_change_id_or_order() {
        let path = "/tmp/test_store_replace_order.json";
        let store = store_at(path);

        store.insert(draft("a")).unwrap();
        store.insert(draft("b")).unwrap();
        store.insert(draft("c")).unwrap();

        store
            .replace(
                2,
                TaskPatch {
                    title: Some("b2".to_string()),
                    completed: None,
                },
            )
            .unwrap()
            .unwrap();

        let ids: Vec<u64> = store.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_replace_not_found() {
        let path = "/tmp/test_store_replace_404.json";
        let store = store_at(path);

        let result = store.replace(999, TaskPatch::default()).unwrap();
        assert!(result.is_none());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_replace_empty_patch_keeps_record() {
        let path = "/tmp/test_store_replace_empty.json";
        let store = store_at(path);

        let created = store.insert(draft("igual")).unwrap();
        let updated = store.replace(created.id, TaskPatch::default()).unwrap().unwrap();

        assert_eq!(updated, created);

        let _ = fs::remove_file(path);
    }

    // ==================== Remove ====================

    #[test]
    fn test_remove_preserves_survivor_order() {
        let path = "/tmp/test_store_remove_order.json";
        let store = store_at(path);

        store.insert(draft("a")).unwrap();
        store.insert(draft("b")).unwrap();
        store.insert(draft("c")).unwrap();

        let removed = store.remove(2).unwrap().unwrap();
        assert_eq!(removed.title, "b");

        let titles: Vec<String> = store.list().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["a", "c"]);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_remove_not_found() {
        let path = "/tmp/test_store_remove_404.json";
        let store = store_at(path);

        assert!(store.remove(1).unwrap().is_none());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_remove_then_find_is_none() {
        let path = "/tmp/test_store_remove_find.json";
        let store = store_at(path);

        let created = store.insert(draft("efímera")).unwrap();
        store.remove(created.id).unwrap();

        assert!(store.find_by_id(created.id).is_none());

        let _ = fs::remove_file(path);
    }

    // ==================== Round Trip (Reinicio Simulado) ====================

    #[test]
    fn test_restart_preserves_order_and_counter() {
        let path = "/tmp/test_store_restart.json";

        {
            let store = store_at(path);
            store.insert(draft("uno")).unwrap();
            store.insert(draft("dos")).unwrap();
            store.insert(draft("tres")).unwrap();
            store.remove(1).unwrap();
        }

        // "Reinicio": nueva instancia sobre el mismo archivo
        let store = TodoStore::new(TodoStorage::new(path));
        let titles: Vec<String> = store.list().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["dos", "tres"]);

        // max(2, 3) + 1 = 4
        let created = store.insert(draft("cuatro")).unwrap();
        assert_eq!(created.id, 4);

        let _ = fs::remove_file(path);
    }

    // ==================== Handle Compartido ====================

    #[test]
    fn test_clone_shares_state() {
        let path = "/tmp/test_store_clone.json";
        let store = store_at(path);
        let other = store.clone();

        store.insert(draft("compartida")).unwrap();

        assert_eq!(other.count(), 1);
        assert_eq!(other.find_by_id(1).unwrap().title, "compartida");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_concurrent_inserts_never_collide() {
        use std::thread;

        let path = "/tmp/test_store_concurrent.json";
        let store = store_at(path);

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    for j in 0..5 {
                        store.insert(TaskDraft {
                            title: format!("t{}-{}", i, j),
                            completed: false,
                        }).unwrap();
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        let mut ids: Vec<u64> = store.list().into_iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 20);
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 20, "ningún id puede repetirse");

        let _ = fs::remove_file(path);
    }

    // ==================== Persistencia Fallida ====================

    #[test]
    fn test_persistence_failure_surfaces_error() {
        // Un directorio como destino hace fallar el rename final
        let dir = "/tmp/test_store_unwritable.json";
        let _ = fs::remove_dir_all(dir);
        let _ = fs::remove_file(dir);
        fs::create_dir_all(dir).unwrap();

        let store = TodoStore::new(TodoStorage::new(dir));
        let result = store.insert(draft("no persiste"));

        assert!(matches!(result, Err(StoreError::Persistence(_))));
        // El cambio queda en memoria hasta el próximo flush exitoso
        assert_eq!(store.count(), 1);

        let _ = fs::remove_dir_all(dir);
        let _ = fs::remove_file(format!("{}.tmp", dir));
    }
}
