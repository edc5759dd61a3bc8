//! Project operations: crear_proyecto_y_tareas, listar_proyectos

use super::error::{Constraint, OperationError};
use super::like_pattern;
use crate::store::schema::format_timestamp;
use crate::store::{DEFAULT_TASK_STATUS, Store};
use atlas_domain::{InvocationError, OperationDescriptor, OperationParameter, ToolInvocation};
use rusqlite::params;
use rusqlite::types::Value as SqlValue;

pub const CREATE_PROJECT_WITH_TASKS: &str = "crear_proyecto_y_tareas";
pub const LIST_PROJECTS: &str = "listar_proyectos";

/// Split a free-form task list on commas, semicolons, dashes and newlines.
///
/// Entries are trimmed; empty ones are dropped.
pub fn split_task_list(raw: &str) -> Vec<String> {
    raw.split([',', '\n', '-', ';'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ==================== crear_proyecto_y_tareas ====================

pub fn create_project_with_tasks_definition() -> OperationDescriptor {
    OperationDescriptor::new(
        CREATE_PROJECT_WITH_TASKS,
        "Crea un proyecto y un conjunto de tareas iniciales. La lista de tareas debe ser una cadena separada por comas, saltos de línea o guiones.",
    )
    .with_parameter(OperationParameter::new(
        "nombre_proyecto",
        "El nombre que se le dará al nuevo proyecto.",
        true,
    ))
    .with_parameter(OperationParameter::new(
        "lista_tareas",
        "Cadena de texto con todas las tareas separadas por comas, saltos de línea o guiones.",
        true,
    ))
}

pub fn execute_create_project_with_tasks(
    store: &Store,
    call: &ToolInvocation,
) -> Result<String, InvocationError> {
    let name = call.require_str("nombre_proyecto")?.trim();
    // An empty list is allowed: the project is still created.
    let tasks = split_task_list(
        call.arguments
            .get("lista_tareas")
            .and_then(|v| v.as_str())
            .unwrap_or_default(),
    );

    let project_id = store
        .unit_of_work(|tx| {
            tx.execute("INSERT INTO projects (name) VALUES (?1)", params![name])?;
            let project_id = tx.last_insert_rowid();
            let mut stmt = tx.prepare(
                "INSERT INTO tasks (project_id, description, status) VALUES (?1, ?2, ?3)",
            )?;
            for description in &tasks {
                stmt.execute(params![project_id, description, DEFAULT_TASK_STATUS])?;
            }
            Ok::<_, OperationError>(project_id)
        })
        .map_err(|e| match e.constraint() {
            Some(Constraint::Unique) => InvocationError::conflict(format!(
                "El proyecto '{}' ya existe. Por favor, usa un nombre diferente.",
                name
            )),
            _ => e.into_invocation_error("Error al crear el proyecto y las tareas"),
        })?;

    if tasks.is_empty() {
        Ok(format!(
            "Proyecto '{}' creado (ID: {}), pero no se encontraron tareas válidas en la lista.",
            name, project_id
        ))
    } else {
        Ok(format!(
            "✅ Proyecto '{}' creado (ID: {}) con {} tareas iniciales.",
            name,
            project_id,
            tasks.len()
        ))
    }
}

// ==================== listar_proyectos ====================

pub fn list_projects_definition() -> OperationDescriptor {
    OperationDescriptor::new(
        LIST_PROJECTS,
        "Lista todos los proyectos existentes o filtra por nombre para obtener sus IDs y nombres.",
    )
    .with_parameter(OperationParameter::new(
        "nombre",
        "Filtra proyectos por nombre (búsqueda parcial).",
        false,
    ))
}

pub fn execute_list_projects(
    store: &Store,
    call: &ToolInvocation,
) -> Result<String, InvocationError> {
    let mut sql = String::from("SELECT id, name, created_at FROM projects WHERE 1 = 1");
    let mut values: Vec<SqlValue> = Vec::new();
    if let Some(filter) = call.get_str("nombre") {
        values.push(SqlValue::Text(like_pattern(filter)));
        sql.push_str(" AND name LIKE ?1 ESCAPE '\\'");
    }
    sql.push_str(" ORDER BY id ASC");

    let rows = store
        .unit_of_work(|tx| {
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(values.iter()), |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok::<_, OperationError>(rows)
        })
        .map_err(|e| e.into_invocation_error("Error al listar proyectos"))?;

    if rows.is_empty() {
        return Ok("✅ No se encontraron proyectos.".to_string());
    }

    let mut output = vec![format!("--- {} Proyectos Encontrados ---", rows.len())];
    for (id, name, created_at) in rows {
        output.push(format!(
            "ID: {} | Nombre: {} | Creado: {}",
            id,
            name,
            format_timestamp(&created_at)
        ));
    }
    Ok(output.join("\n"))
}
