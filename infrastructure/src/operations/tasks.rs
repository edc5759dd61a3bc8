//! Task operations: crear_tarea, actualizar_estado_tarea, crear_recordatorio, listar_tareas

use super::error::{Constraint, OperationError};
use super::like_pattern;
use crate::store::Store;
use atlas_domain::{
    InvocationError, OperationDescriptor, OperationParameter, ParamType, ToolInvocation,
};
use rusqlite::params;
use rusqlite::types::Value as SqlValue;
use tracing::debug;

pub const CREATE_TASK: &str = "crear_tarea";
pub const UPDATE_TASK_STATUS: &str = "actualizar_estado_tarea";
pub const CREATE_REMINDER: &str = "crear_recordatorio";
pub const LIST_TASKS: &str = "listar_tareas";

/// Project that collects reminders; created on first use
pub const REMINDERS_PROJECT: &str = "Recordatorios";
/// Status given to reminder tasks
pub const REMINDER_STATUS: &str = "Recordatorio";

// ==================== crear_tarea ====================

pub fn create_task_definition() -> OperationDescriptor {
    OperationDescriptor::new(
        CREATE_TASK,
        "Crea una tarea individual con un título en un proyecto específico. Requiere el ID del proyecto. (Omite asignación y vencimiento).",
    )
    .with_parameter(
        OperationParameter::new(
            "project_id",
            "El ID numérico del proyecto al que se debe asignar la tarea.",
            true,
        )
        .with_type(ParamType::Integer),
    )
    .with_parameter(OperationParameter::new(
        "description",
        "El título conciso de la nueva tarea a crear.",
        true,
    ))
}

pub fn execute_create_task(
    store: &Store,
    call: &ToolInvocation,
) -> Result<String, InvocationError> {
    let project_id = call.require_i64("project_id")?;
    let description = call.require_str("description")?.trim();

    store
        .unit_of_work(|tx| {
            tx.execute(
                "INSERT INTO tasks (project_id, description) VALUES (?1, ?2)",
                params![project_id, description],
            )?;
            Ok::<_, OperationError>(tx.last_insert_rowid())
        })
        .map(|task_id| {
            format!(
                "Tarea '{}' creada exitosamente en el proyecto ID {}. ID de Tarea: {}.",
                description, project_id, task_id
            )
        })
        .map_err(|e| match e.constraint() {
            Some(Constraint::ForeignKey) => InvocationError::not_found(format!(
                "Error al crear la tarea. Asegúrate de que el Project ID {} existe.",
                project_id
            )),
            _ => e.into_invocation_error("Error al crear la tarea"),
        })
}

// ==================== actualizar_estado_tarea ====================

pub fn update_task_status_definition() -> OperationDescriptor {
    OperationDescriptor::new(
        UPDATE_TASK_STATUS,
        "Actualiza el estado de una tarea existente. Los estados válidos comunes son 'Pendiente', 'En Progreso', 'Bloqueada', o 'Hecha'.",
    )
    .with_parameter(
        OperationParameter::new(
            "tarea_id",
            "El ID numérico de la tarea que se va a modificar.",
            true,
        )
        .with_type(ParamType::Integer),
    )
    .with_parameter(OperationParameter::new(
        "nuevo_estado",
        "El nuevo estado de la tarea, ej.: 'En Progreso', 'Hecha', 'Bloqueada'.",
        true,
    ))
}

pub fn execute_update_task_status(
    store: &Store,
    call: &ToolInvocation,
) -> Result<String, InvocationError> {
    let task_id = call.require_i64("tarea_id")?;
    let new_status = call.require_str("nuevo_estado")?.trim();

    store
        .unit_of_work(|tx| {
            let changed = tx.execute(
                "UPDATE tasks SET status = ?1 WHERE id = ?2",
                params![new_status, task_id],
            )?;
            if changed == 0 {
                return Err(OperationError::Rejected(InvocationError::not_found(format!(
                    "No se encontró la tarea con ID {}.",
                    task_id
                ))));
            }
            Ok(())
        })
        .map(|()| {
            format!(
                "✅ Tarea ID {} actualizada. Nuevo estado: {}.",
                task_id, new_status
            )
        })
        .map_err(|e| {
            e.into_invocation_error(&format!(
                "Error al actualizar el estado de la tarea {}",
                task_id
            ))
        })
}

// ==================== crear_recordatorio ====================

pub fn create_reminder_definition() -> OperationDescriptor {
    OperationDescriptor::new(
        CREATE_REMINDER,
        "Crea una tarea de alta prioridad con un título en el proyecto 'Recordatorios'. (No admite fecha/hora límite ni asignado en este esquema).",
    )
    .with_parameter(OperationParameter::new(
        "description",
        "El título o descripción concisa del recordatorio.",
        true,
    ))
}

pub fn execute_create_reminder(
    store: &Store,
    call: &ToolInvocation,
) -> Result<String, InvocationError> {
    let description = call.require_str("description")?.trim();

    store
        .unit_of_work(|tx| {
            tx.execute(
                "INSERT OR IGNORE INTO projects (name) VALUES (?1)",
                params![REMINDERS_PROJECT],
            )?;
            let project_id: i64 = tx.query_row(
                "SELECT id FROM projects WHERE name = ?1",
                params![REMINDERS_PROJECT],
                |row| row.get(0),
            )?;
            tx.execute(
                "INSERT INTO tasks (project_id, description, status) VALUES (?1, ?2, ?3)",
                params![project_id, description, REMINDER_STATUS],
            )?;
            Ok::<_, OperationError>(tx.last_insert_rowid())
        })
        .map(|task_id| format!("✅ Recordatorio '{}' creado (ID: {}).", description, task_id))
        .map_err(|e| e.into_invocation_error("Error al crear el recordatorio"))
}

// ==================== listar_tareas ====================

pub fn list_tasks_definition() -> OperationDescriptor {
    OperationDescriptor::new(
        LIST_TASKS,
        "Busca y lista tareas filtradas por nombre de proyecto o estado. Devuelve un resumen formateado de las tareas encontradas (no incluye asignado ni vencimiento).",
    )
    .with_parameter(OperationParameter::new(
        "project_name",
        "Filtra por nombre del proyecto (búsqueda parcial).",
        false,
    ))
    .with_parameter(OperationParameter::new(
        "status",
        "Filtra por estado de la tarea (ej. 'Pendiente', 'Hecha').",
        false,
    ))
}

struct TaskRow {
    id: i64,
    description: String,
    status: Option<String>,
    project: String,
}

pub fn execute_list_tasks(
    store: &Store,
    call: &ToolInvocation,
) -> Result<String, InvocationError> {
    let mut sql = String::from(
        "SELECT t.id, t.description, t.status, p.name \
         FROM tasks t JOIN projects p ON t.project_id = p.id WHERE 1 = 1",
    );
    let mut values: Vec<SqlValue> = Vec::new();

    if let Some(project_name) = call.get_str("project_name") {
        values.push(SqlValue::Text(like_pattern(project_name)));
        sql.push_str(&format!(" AND p.name LIKE ?{} ESCAPE '\\'", values.len()));
    }
    if let Some(status) = call.get_str("status") {
        values.push(SqlValue::Text(like_pattern(status)));
        sql.push_str(&format!(" AND t.status LIKE ?{} ESCAPE '\\'", values.len()));
    }
    values.push(SqlValue::Integer(i64::from(store.page_size())));
    sql.push_str(&format!(" ORDER BY t.id ASC LIMIT ?{}", values.len()));

    debug!("listar_tareas query: {}", sql);

    let rows = store
        .unit_of_work(|tx| {
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt
                .query_map(rusqlite::params_from_iter(values.iter()), |row| {
                    Ok(TaskRow {
                        id: row.get(0)?,
                        description: row.get(1)?,
                        status: row.get(2)?,
                        project: row.get(3)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok::<_, OperationError>(rows)
        })
        .map_err(|e| e.into_invocation_error("Error al listar tareas"))?;

    if rows.is_empty() {
        return Ok("✅ No se encontraron tareas que coincidan con los filtros especificados.".to_string());
    }

    let mut output = vec![format!("--- {} Tareas Encontradas ---", rows.len())];
    for row in rows {
        output.push(format!(
            "ID: {} | Proyecto: {} | Título: {} | Estado: {}",
            row.id,
            row.project,
            row.description,
            row.status.as_deref().unwrap_or("-")
        ));
    }
    Ok(output.join("\n"))
}
