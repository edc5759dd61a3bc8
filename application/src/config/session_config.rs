//! Session parameters for the tool-call loop
//!
//! [`SessionConfig`] is built once at startup (from the file config in the
//! infrastructure layer) and handed to
//! [`ChatSession`](crate::use_cases::run_chat::ChatSession) by value.

use serde::{Deserialize, Serialize};

/// Default system prompt instructing the model to always act through tools.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
Eres ATLAS, un Agente de Gestión de Proyectos experto. Tu función es gestionar tareas y proyectos.
**REGLA CRÍTICA DE EJECUCIÓN:** Para cualquier acción relacionada con proyectos o tareas (crear, listar, actualizar), **DEBES OBLIGATORIAMENTE** usar una de las herramientas proporcionadas.
No respondas con texto conversacional sobre el estado o la creación si la solicitud requiere una herramienta; en su lugar, **DEBES** hacer la llamada a la herramienta.
**INSTRUCCIÓN ESPECÍFICA:** Para \"Listar proyectos\", \"Ver proyectos\" o \"Mostrar todos los proyectos\", **DEBES USAR LA HERRAMIENTA 'listar_proyectos' sin excepción**.
";

/// Phrases that end the session (compared case-insensitively).
pub const DEFAULT_EXIT_PHRASES: &[&str] = &["salir", "adios", "adiós", "exit", "quit", "q"];

/// Tool-call loop parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// First turn of every conversation.
    pub system_prompt: String,
    /// Closed set of phrases that end the session.
    pub exit_phrases: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            exit_phrases: DEFAULT_EXIT_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SessionConfig {
    // ==================== Builder Methods ====================

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_exit_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exit_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `input` (trimmed, any case) is an exit phrase.
    pub fn is_exit_phrase(&self, input: &str) -> bool {
        let input = input.trim().to_lowercase();
        !input.is_empty()
            && self
                .exit_phrases
                .iter()
                .any(|p| p.trim().to_lowercase() == input)
    }
}
