//! Console output formatter for chat turns

use atlas_application::{call_args_preview, truncate_preview};
use atlas_domain::{Conversation, InvocationOutcome, InvocationResult, RequestedCall, Role};
use colored::Colorize;

/// Longest tool output shown inline in progress lines
const RESULT_PREVIEW_LEN: usize = 120;

/// Formats chat output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Welcome banner printed when the REPL starts
    pub fn welcome(model: &str, exit_phrases: &[String]) -> String {
        let mut output = String::new();
        output.push('\n');
        output.push_str(&Self::header("ATLAS - Gestión de Proyectos"));
        output.push_str(&format!("\n{} {}\n", "Model:".cyan().bold(), model));
        output.push_str(&format!(
            "{} {}\n",
            "Salir con:".cyan().bold(),
            exit_phrases.join(", ")
        ));
        output.push('\n');
        output.push_str(&Self::help());
        output
    }

    pub fn help() -> String {
        let mut output = format!("{}\n", "Commands:".bold());
        output.push_str("  /help, /h, /?      - Show this help\n");
        output.push_str("  /history           - Show the conversation so far\n");
        output.push_str("  /quit, /exit, /q   - Exit chat\n");
        output
    }

    /// The model's final answer for a turn
    pub fn answer(text: &str) -> String {
        format!("{} {}", "ATLAS:".green().bold(), text)
    }

    /// Extra note when the model answered without using a tool
    pub fn policy_violation() -> String {
        format!(
            "{}",
            "(aviso: el modelo respondió sin usar una herramienta; no se realizó ningún cambio)"
                .yellow()
        )
    }

    pub fn transport_failure(message: &str) -> String {
        format!(
            "{} {}\n{}",
            "Error:".red().bold(),
            message,
            "Tu mensaje no se guardó; puedes intentarlo de nuevo.".dimmed()
        )
    }

    /// `[1/2] -> crear_tarea(Revisar contrato)`
    pub fn tool_dispatch(call: &RequestedCall, index: usize, total: usize) -> String {
        format!(
            "  {} {} {}",
            format!("[{}/{}]", index, total).dimmed(),
            "->".cyan(),
            format!("{}({})", call.operation_name, call_args_preview(call)).bold()
        )
    }

    /// One-line summary of a tool result; fatal kinds are flagged separately
    pub fn tool_result(result: &InvocationResult) -> String {
        match &result.outcome {
            InvocationOutcome::Success { output } => format!(
                "  {} {} {}",
                "v".green(),
                result.operation_name,
                truncate_preview(&first_line(output), RESULT_PREVIEW_LEN).dimmed()
            ),
            InvocationOutcome::Failure(e) if e.is_fatal() => format!(
                "  {} {} {} {}",
                "!!".red().bold(),
                result.operation_name,
                format!("[{}]", e.kind).red().bold(),
                e.message.red()
            ),
            InvocationOutcome::Failure(e) => format!(
                "  {} {} {} {}",
                "x".red(),
                result.operation_name,
                format!("[{}]", e.kind).yellow(),
                e.message
            ),
        }
    }

    /// Full transcript, skipping the system prompt
    pub fn history(conversation: &Conversation) -> String {
        let mut output = Self::section_header("Conversation");
        let mut shown = 0;
        for turn in conversation.turns() {
            let line = match turn.role {
                Role::System => continue,
                Role::User => format!("{} {}", "tú:".cyan().bold(), turn.content),
                Role::Assistant if !turn.tool_calls.is_empty() => {
                    let calls = turn
                        .tool_calls
                        .iter()
                        .map(|c| c.operation_name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("{} {}", "ATLAS ->".green().bold(), calls)
                }
                Role::Assistant => format!("{} {}", "ATLAS:".green().bold(), turn.content),
                Role::Tool => Self::indent(
                    &format!(
                        "{} {}",
                        format!("[{}]", turn.name.as_deref().unwrap_or("tool")).dimmed(),
                        turn.content
                    ),
                    "    ",
                ),
            };
            output.push_str(&line);
            output.push('\n');
            shown += 1;
        }
        if shown == 0 {
            output.push_str(&format!("{}\n", "(empty)".dimmed()));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(50);
        format!("{}\n{:^50}\n{}\n", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn first_line(text: &str) -> String {
    let mut lines = text.lines();
    let first = lines.next().unwrap_or("").to_string();
    if lines.next().is_some() {
        format!("{} …", first)
    } else {
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_domain::InvocationError;

    fn plain() {
        colored::control::set_override(false);
    }

    fn result(outcome: InvocationOutcome) -> InvocationResult {
        let call = RequestedCall::new("call_1", "crear_tarea", "{}");
        InvocationResult::new(&call, outcome)
    }

    #[test]
    fn test_tool_result_lines() {
        plain();
        assert_eq!(
            ConsoleFormatter::tool_result(&result(InvocationOutcome::success("creada"))),
            "  v crear_tarea creada"
        );
        assert_eq!(
            ConsoleFormatter::tool_result(&result(InvocationOutcome::failure(
                InvocationError::not_found("No existe")
            ))),
            "  x crear_tarea [not_found] No existe"
        );
        assert_eq!(
            ConsoleFormatter::tool_result(&result(InvocationOutcome::failure(
                InvocationError::executor_unavailable("missing")
            ))),
            "  !! crear_tarea [executor_unavailable] missing"
        );
    }

    #[test]
    fn test_multiline_output_is_summarized() {
        plain();
        let line = ConsoleFormatter::tool_result(&result(InvocationOutcome::success(
            "--- 2 Tareas Encontradas ---\nID: 1 | ...",
        )));
        assert_eq!(line, "  v crear_tarea --- 2 Tareas Encontradas --- …");
    }

    #[test]
    fn test_history_skips_system_prompt() {
        plain();
        let mut conversation = Conversation::new("secret prompt");
        conversation.push_user("hola");
        conversation.push_assistant("¿En qué te ayudo?");

        let history = ConsoleFormatter::history(&conversation);
        assert!(!history.contains("secret prompt"));
        assert!(history.contains("tú: hola"));
        assert!(history.contains("ATLAS: ¿En qué te ayudo?"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "> "), "> a\n> b");
    }
}
