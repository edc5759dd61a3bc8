//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use atlas_application::{ChatSession, TurnOutcome};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;
use tracing::debug;

/// What a slash command asks the REPL to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandAction {
    Continue,
    Exit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    session: ChatSession,
    model_name: String,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(session: ChatSession, model_name: impl Into<String>) -> Self {
        Self {
            session,
            model_name: model_name.into(),
            history_path: default_history_path(),
        }
    }

    /// Override the readline history file
    pub fn with_history_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.history_path = path;
        }
        self
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        if let Some(ref path) = self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        println!(
            "{}",
            ConsoleFormatter::welcome(&self.model_name, &self.session.config().exit_phrases)
        );

        loop {
            match rl.readline("tú> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) == CommandAction::Exit {
                            break;
                        }
                        continue;
                    }

                    let _ = rl.add_history_entry(line);

                    if !self.process_message(line).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("¡Hasta pronto!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            if let Err(e) = rl.save_history(path) {
                debug!("Could not save history to {}: {}", path.display(), e);
            }
        }

        Ok(())
    }

    /// Send one message and print the outcome. Returns `false` once the
    /// session has ended.
    pub async fn process_message(&mut self, message: &str) -> bool {
        let outcome = self.session.handle_input(message).await;
        Self::print_outcome(&outcome);
        !matches!(outcome, TurnOutcome::Ended)
    }

    fn print_outcome(outcome: &TurnOutcome) {
        match outcome {
            TurnOutcome::Ended => println!("¡Hasta pronto!"),
            TurnOutcome::Ignored => {}
            TurnOutcome::Answer {
                text,
                policy_violation,
                ..
            } => {
                println!();
                println!("{}", ConsoleFormatter::answer(text));
                if *policy_violation {
                    println!("{}", ConsoleFormatter::policy_violation());
                }
                println!();
            }
            TurnOutcome::TransportFailure { message, .. } => {
                eprintln!("{}", ConsoleFormatter::transport_failure(message));
                println!();
            }
        }
    }

    /// Handle slash commands.
    fn handle_command(&self, cmd: &str) -> CommandAction {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("¡Hasta pronto!");
                CommandAction::Exit
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("{}", ConsoleFormatter::help());
                CommandAction::Continue
            }
            "/history" => {
                println!("{}", ConsoleFormatter::history(self.session.conversation()));
                CommandAction::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                CommandAction::Continue
            }
        }
    }
}

fn default_history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("atlas").join("history.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use atlas_application::{
        GatewayError, LlmGateway, SessionConfig, ToolChoice, ToolExecutorPort, ToolSchemaPort,
    };
    use atlas_domain::{
        InvocationOutcome, ModelReply, OperationCatalog, OperationDescriptor, ToolInvocation, Turn,
    };
    use std::sync::{Arc, Mutex};

    struct FixedGateway {
        reply: Mutex<Option<Result<ModelReply, GatewayError>>>,
    }

    #[async_trait]
    impl LlmGateway for FixedGateway {
        async fn complete(
            &self,
            _turns: &[Turn],
            _tools: &[serde_json::Value],
            _tool_choice: ToolChoice,
        ) -> Result<ModelReply, GatewayError> {
            self.reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(GatewayError::EmptyResponse))
        }

        fn model_name(&self) -> &str {
            "test-model"
        }
    }

    struct NoExecutor;

    #[async_trait]
    impl ToolExecutorPort for NoExecutor {
        async fn execute(&self, _invocation: &ToolInvocation) -> InvocationOutcome {
            InvocationOutcome::success("unused")
        }
    }

    struct NameSchema;

    impl ToolSchemaPort for NameSchema {
        fn operation_to_schema(&self, descriptor: &OperationDescriptor) -> serde_json::Value {
            serde_json::json!({ "name": descriptor.name })
        }
    }

    fn repl(reply: Result<ModelReply, GatewayError>) -> ChatRepl {
        let session = ChatSession::new(
            Arc::new(FixedGateway {
                reply: Mutex::new(Some(reply)),
            }),
            Arc::new(NoExecutor),
            Arc::new(NameSchema),
            Arc::new(OperationCatalog::new()),
            SessionConfig::default(),
        );
        ChatRepl::new(session, "test-model").with_history_path(None)
    }

    #[tokio::test]
    async fn test_exit_phrase_ends_session() {
        let mut repl = repl(Ok(ModelReply::text("unused")));
        assert!(!repl.process_message("salir").await);
        assert!(repl.session().is_ended());
    }

    #[tokio::test]
    async fn test_answer_keeps_session_running() {
        let mut repl = repl(Ok(ModelReply::text("Hola")));
        assert!(repl.process_message("hola").await);
        assert_eq!(repl.session().conversation().len(), 3);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_session_running() {
        let mut repl = repl(Err(GatewayError::Timeout));
        assert!(repl.process_message("hola").await);
        assert_eq!(repl.session().conversation().len(), 1);
    }

    #[test]
    fn test_slash_commands() {
        let repl = repl(Ok(ModelReply::text("unused")));
        assert_eq!(repl.handle_command("/help"), CommandAction::Continue);
        assert_eq!(repl.handle_command("/history"), CommandAction::Continue);
        assert_eq!(repl.handle_command("/nope"), CommandAction::Continue);
        assert_eq!(repl.handle_command("/quit"), CommandAction::Exit);
    }
}
