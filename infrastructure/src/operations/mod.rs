//! Built-in operations over the project/task store.
//!
//! | Operation | Module |
//! |-----------|--------|
//! | `crear_tarea` | [`tasks`] |
//! | `actualizar_estado_tarea` | [`tasks`] |
//! | `crear_proyecto_y_tareas` | [`projects`] |
//! | `crear_recordatorio` | [`tasks`] |
//! | `listar_tareas` | [`tasks`] |
//! | `listar_proyectos` | [`projects`] |
//!
//! Each operation runs in exactly one [`Store::unit_of_work`](crate::store::Store::unit_of_work).

pub mod error;
pub mod projects;
pub mod registry;
pub mod tasks;

pub use error::{Constraint, OperationError};
pub use registry::{OperationHandler, OperationRegistry};

/// Substring pattern for `LIKE ... ESCAPE '\'`; wildcards in `value` match literally.
pub(crate) fn like_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for c in value.trim().chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
