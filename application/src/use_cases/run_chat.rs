//! Run Chat use case.
//!
//! Drives one interactive session through the tool-call loop:
//!
//! ```text
//! AwaitingUserInput ──exit phrase──▶ Ended
//!        │ user turn
//!        ▼
//! QueryingModel ──transport error (user turn rolled back)──▶ AwaitingUserInput
//!        │
//!        ├── tool calls ──▶ HandlingToolCalls ──▶ QueryingModel (follow-up)
//!        │                                              │
//!        └── text ──────────────────────────────▶ EmittingFinalAnswer
//!                                                       │
//!                                               AwaitingUserInput
//! ```
//!
//! Calls in one assistant turn are dispatched strictly in the order the
//! model listed them. Every failure becomes a value: the loop itself never
//! returns an error.

use crate::config::SessionConfig;
use crate::ports::chat_observer::{ChatObserver, NoObserver, QueryPhase};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, ToolChoice};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use crate::use_cases::tool_helpers::{call_args_preview, truncate_preview};
use atlas_domain::{
    Conversation, InvocationError, InvocationOutcome, InvocationResult, ModelReply,
    OperationCatalog, RequestedCall,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Where the loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    AwaitingUserInput,
    QueryingModel,
    HandlingToolCalls,
    EmittingFinalAnswer,
    Ended,
}

/// What one line of user input produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// An exit phrase was entered; the session is over
    Ended,
    /// Blank input; nothing was appended
    Ignored,
    /// The model answered
    Answer {
        text: String,
        /// Results of the calls dispatched this turn, in order
        tool_results: Vec<InvocationResult>,
        /// The model answered with text where a tool call was expected
        policy_violation: bool,
    },
    /// A model query failed
    TransportFailure {
        message: String,
        /// Calls already completed before the failure (their turns stay in history)
        tool_results: Vec<InvocationResult>,
    },
}

/// One interactive session of the tool-call loop.
///
/// Owns the conversation history exclusively; nothing else mutates it.
pub struct ChatSession {
    gateway: Arc<dyn LlmGateway>,
    executor: Arc<dyn ToolExecutorPort>,
    schema: Arc<dyn ToolSchemaPort>,
    catalog: Arc<OperationCatalog>,
    observer: Arc<dyn ChatObserver>,
    config: SessionConfig,
    conversation: Conversation,
    state: ChatState,
}

impl ChatSession {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        executor: Arc<dyn ToolExecutorPort>,
        schema: Arc<dyn ToolSchemaPort>,
        catalog: Arc<OperationCatalog>,
        config: SessionConfig,
    ) -> Self {
        let conversation = Conversation::new(config.system_prompt.clone());
        Self {
            gateway,
            executor,
            schema,
            catalog,
            observer: Arc::new(NoObserver),
            config,
            conversation,
            state: ChatState::AwaitingUserInput,
        }
    }

    /// Attach an observer for progress callbacks.
    pub fn with_observer(mut self, observer: Arc<dyn ChatObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_ended(&self) -> bool {
        self.state == ChatState::Ended
    }

    /// Process one line of user input through the full loop.
    pub async fn handle_input(&mut self, line: &str) -> TurnOutcome {
        if self.is_ended() {
            return TurnOutcome::Ended;
        }

        let text = line.trim();
        if self.config.is_exit_phrase(text) {
            info!("Exit phrase received, ending session");
            self.state = ChatState::Ended;
            return TurnOutcome::Ended;
        }
        if text.is_empty() {
            return TurnOutcome::Ignored;
        }

        info!("User turn: {}", truncate_preview(text, 100));
        self.conversation.push_user(text);

        let reply = match self.query(QueryPhase::Initial, ToolChoice::Auto).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Model query failed, rolling back user turn: {}", e);
                self.conversation.rollback_user_turn();
                self.state = ChatState::AwaitingUserInput;
                return TurnOutcome::TransportFailure {
                    message: e.to_string(),
                    tool_results: Vec::new(),
                };
            }
        };

        if !reply.has_tool_calls() {
            let text = reply.text_content().to_string();
            warn!(
                "Policy violation: model answered without a tool call: {}",
                truncate_preview(&text, 100)
            );
            self.observer.on_policy_violation(&text);
            self.state = ChatState::EmittingFinalAnswer;
            self.conversation.push_assistant(text.clone());
            self.state = ChatState::AwaitingUserInput;
            return TurnOutcome::Answer {
                text,
                tool_results: Vec::new(),
                policy_violation: true,
            };
        }

        let tool_results = self.handle_tool_calls(reply).await;

        match self.query(QueryPhase::FollowUp, ToolChoice::None).await {
            Ok(reply) => {
                self.state = ChatState::EmittingFinalAnswer;
                if reply.has_tool_calls() {
                    warn!(
                        "Follow-up reply requested {} more tool call(s); ignoring them",
                        reply.tool_calls.len()
                    );
                }
                let text = reply.text_content().to_string();
                self.conversation.push_assistant(text.clone());
                self.state = ChatState::AwaitingUserInput;
                info!("Turn completed with {} tool call(s)", tool_results.len());
                TurnOutcome::Answer {
                    text,
                    tool_results,
                    policy_violation: false,
                }
            }
            Err(e) => {
                warn!("Follow-up model query failed: {}", e);
                self.state = ChatState::AwaitingUserInput;
                TurnOutcome::TransportFailure {
                    message: e.to_string(),
                    tool_results,
                }
            }
        }
    }

    async fn query(
        &mut self,
        phase: QueryPhase,
        tool_choice: ToolChoice,
    ) -> Result<ModelReply, GatewayError> {
        self.state = ChatState::QueryingModel;
        let tools = self.schema.catalog_schema(&self.catalog);
        debug!(
            "Querying {} ({:?}, tool_choice={}, {} turns, {} tools)",
            self.gateway.model_name(),
            phase,
            tool_choice.as_str(),
            self.conversation.len(),
            tools.len()
        );

        self.observer.on_model_query(phase);
        let result = self
            .gateway
            .complete(self.conversation.turns(), &tools, tool_choice)
            .await;
        self.observer.on_model_done(phase);

        if let Err(e) = &result {
            self.observer.on_transport_error(e);
        }
        result
    }

    async fn handle_tool_calls(&mut self, reply: ModelReply) -> Vec<InvocationResult> {
        self.state = ChatState::HandlingToolCalls;
        let total = reply.tool_calls.len();
        let content = reply.content.unwrap_or_default();
        self.conversation
            .push_assistant_calls(content, reply.tool_calls.clone());

        let mut results = Vec::with_capacity(total);
        for (index, call) in reply.tool_calls.iter().enumerate() {
            self.observer.on_tool_dispatch(call, index + 1, total);
            info!(
                call_id = %call.call_id,
                operation = %call.operation_name,
                "Dispatching tool call {}/{}: {}",
                index + 1,
                total,
                call_args_preview(call)
            );

            let outcome = self.dispatch(call).await;
            log_outcome(call, &outcome);

            let result = InvocationResult::new(call, outcome);
            self.observer.on_tool_result(&result);
            if let Err(e) = self.conversation.push_tool_result(&result) {
                error!("Dropping tool result from history: {}", e);
            }
            results.push(result);
        }
        results
    }

    async fn dispatch(&self, call: &RequestedCall) -> InvocationOutcome {
        if !self.catalog.contains(&call.operation_name) {
            let known: Vec<&str> = self.catalog.names().collect();
            return InvocationOutcome::failure(
                InvocationError::unknown_operation(&call.operation_name)
                    .with_details(format!("Available operations: {}", known.join(", "))),
            );
        }

        match call.parse() {
            Ok(invocation) => self.executor.execute(&invocation).await,
            Err(e) => InvocationOutcome::failure(e),
        }
    }
}

fn log_outcome(call: &RequestedCall, outcome: &InvocationOutcome) {
    match outcome.error() {
        None => debug!(call_id = %call.call_id, "Tool call succeeded"),
        Some(e) if e.is_fatal() => error!(
            call_id = %call.call_id,
            operation = %call.operation_name,
            kind = %e.kind,
            "Executor failure: {}",
            e.message
        ),
        Some(e) => warn!(
            call_id = %call.call_id,
            operation = %call.operation_name,
            kind = %e.kind,
            "Tool call failed: {}",
            e.message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use atlas_domain::{
        ErrorKind, OperationDescriptor, OperationParameter, ParamType, Role, ToolInvocation, Turn,
    };
    use serde_json::json;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct RecordedQuery {
        turns: Vec<Turn>,
        tool_count: usize,
        tool_choice: ToolChoice,
    }

    struct MockGateway {
        replies: Mutex<VecDeque<Result<ModelReply, GatewayError>>>,
        queries: Mutex<Vec<RecordedQuery>>,
    }

    impl MockGateway {
        fn new(replies: Vec<Result<ModelReply, GatewayError>>) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from(replies)),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(
            &self,
            turns: &[Turn],
            tools: &[serde_json::Value],
            tool_choice: ToolChoice,
        ) -> Result<ModelReply, GatewayError> {
            self.queries.lock().unwrap().push(RecordedQuery {
                turns: turns.to_vec(),
                tool_count: tools.len(),
                tool_choice,
            });
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more replies".to_string())))
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }

    /// Records dispatch order; per-operation latency and scripted outcomes.
    struct MockExecutor {
        executed: Mutex<Vec<ToolInvocation>>,
        delays: HashMap<String, Duration>,
        outcomes: HashMap<String, InvocationOutcome>,
    }

    impl MockExecutor {
        fn new() -> Self {
            Self {
                executed: Mutex::new(Vec::new()),
                delays: HashMap::new(),
                outcomes: HashMap::new(),
            }
        }

        fn with_delay(mut self, name: &str, millis: u64) -> Self {
            self.delays
                .insert(name.to_string(), Duration::from_millis(millis));
            self
        }

        fn with_outcome(mut self, name: &str, outcome: InvocationOutcome) -> Self {
            self.outcomes.insert(name.to_string(), outcome);
            self
        }

        fn executed_names(&self) -> Vec<String> {
            self.executed
                .lock()
                .unwrap()
                .iter()
                .map(|i| i.operation_name.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ToolExecutorPort for MockExecutor {
        async fn execute(&self, invocation: &ToolInvocation) -> InvocationOutcome {
            if let Some(delay) = self.delays.get(&invocation.operation_name) {
                tokio::time::sleep(*delay).await;
            }
            self.executed.lock().unwrap().push(invocation.clone());
            self.outcomes
                .get(&invocation.operation_name)
                .cloned()
                .unwrap_or_else(|| {
                    InvocationOutcome::success(format!("{} ok", invocation.operation_name))
                })
        }
    }

    struct NameOnlySchema;

    impl ToolSchemaPort for NameOnlySchema {
        fn operation_to_schema(&self, descriptor: &OperationDescriptor) -> serde_json::Value {
            json!({ "name": descriptor.name })
        }
    }

    #[derive(Default)]
    struct CountingObserver {
        violations: Mutex<Vec<String>>,
        results: Mutex<Vec<InvocationResult>>,
        transport_errors: Mutex<usize>,
    }

    impl ChatObserver for CountingObserver {
        fn on_tool_result(&self, result: &InvocationResult) {
            self.results.lock().unwrap().push(result.clone());
        }

        fn on_policy_violation(&self, text: &str) {
            self.violations.lock().unwrap().push(text.to_string());
        }

        fn on_transport_error(&self, _error: &GatewayError) {
            *self.transport_errors.lock().unwrap() += 1;
        }
    }

    // ==================== Helpers ====================

    fn catalog() -> Arc<OperationCatalog> {
        let descriptors = vec![
            OperationDescriptor::new("op_a", "A"),
            OperationDescriptor::new("op_b", "B"),
            OperationDescriptor::new("op_c", "C"),
            OperationDescriptor::new("crear_proyecto_y_tareas", "Create project")
                .with_parameter(OperationParameter::new("nombre_proyecto", "name", true))
                .with_parameter(OperationParameter::new("lista_tareas", "tasks", true)),
            OperationDescriptor::new("listar_tareas", "List").with_parameter(
                OperationParameter::new("status", "status", false).with_type(ParamType::String),
            ),
        ];
        Arc::new(OperationCatalog::try_from(descriptors).unwrap())
    }

    fn session(gateway: Arc<MockGateway>, executor: Arc<MockExecutor>) -> ChatSession {
        ChatSession::new(
            gateway,
            executor,
            Arc::new(NameOnlySchema),
            catalog(),
            SessionConfig::default().with_system_prompt("sys"),
        )
    }

    fn calls(names: &[(&str, &str)]) -> ModelReply {
        ModelReply::with_tool_calls(
            names
                .iter()
                .enumerate()
                .map(|(i, (name, args))| RequestedCall::new(format!("call_{}", i), *name, *args))
                .collect(),
        )
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_calls_run_in_received_order_despite_latency() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[("op_a", "{}"), ("op_b", "{}"), ("op_c", "{}")])),
            Ok(ModelReply::text("hecho")),
        ]));
        let executor = Arc::new(
            MockExecutor::new()
                .with_delay("op_a", 40)
                .with_delay("op_b", 0)
                .with_delay("op_c", 15),
        );
        let mut chat = session(gateway.clone(), executor.clone());

        let outcome = chat.handle_input("haz tres cosas").await;

        assert_eq!(executor.executed_names(), vec!["op_a", "op_b", "op_c"]);
        let tool_turns: Vec<_> = chat
            .conversation()
            .turns()
            .iter()
            .filter(|t| t.role == Role::Tool)
            .map(|t| t.tool_call_id.clone().unwrap().to_string())
            .collect();
        assert_eq!(tool_turns, vec!["call_0", "call_1", "call_2"]);
        match outcome {
            TurnOutcome::Answer {
                text,
                tool_results,
                policy_violation,
            } => {
                assert_eq!(text, "hecho");
                assert_eq!(tool_results.len(), 3);
                assert!(!policy_violation);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(chat.state(), ChatState::AwaitingUserInput);
    }

    #[tokio::test]
    async fn test_history_layout_after_tool_turn() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[("op_a", "{}")])),
            Ok(ModelReply::text("listo")),
        ]));
        let mut chat = session(gateway, Arc::new(MockExecutor::new()));
        chat.handle_input("hola").await;

        let roles: Vec<Role> = chat.conversation().turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::Tool,
                Role::Assistant
            ]
        );
        assert_eq!(chat.conversation().turns()[2].tool_calls.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_query_rolls_back_user_turn() {
        let gateway = Arc::new(MockGateway::new(vec![Err(GatewayError::ConnectionError(
            "refused".to_string(),
        ))]));
        let observer = Arc::new(CountingObserver::default());
        let mut chat =
            session(gateway, Arc::new(MockExecutor::new())).with_observer(observer.clone());
        let before = chat.conversation().clone();

        let outcome = chat.handle_input("crea una tarea").await;

        assert_eq!(chat.conversation(), &before);
        assert_eq!(chat.state(), ChatState::AwaitingUserInput);
        assert_eq!(*observer.transport_errors.lock().unwrap(), 1);
        match outcome {
            TurnOutcome::TransportFailure {
                message,
                tool_results,
            } => {
                assert!(message.contains("refused"));
                assert!(tool_results.is_empty());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_session_usable_after_rollback() {
        let gateway = Arc::new(MockGateway::new(vec![
            Err(GatewayError::Timeout),
            Ok(calls(&[("op_a", "{}")])),
            Ok(ModelReply::text("ok")),
        ]));
        let mut chat = session(gateway, Arc::new(MockExecutor::new()));

        chat.handle_input("primero").await;
        let outcome = chat.handle_input("segundo").await;

        assert!(matches!(outcome, TurnOutcome::Answer { .. }));
        let users: Vec<_> = chat
            .conversation()
            .turns()
            .iter()
            .filter(|t| t.role == Role::User)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(users, vec!["segundo"]);
    }

    #[tokio::test]
    async fn test_timeout_contained_to_one_call() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[("op_a", "{}"), ("op_b", "{}"), ("op_c", "{}")])),
            Ok(ModelReply::text("b tardó demasiado")),
        ]));
        let executor = Arc::new(
            MockExecutor::new()
                .with_outcome("op_b", InvocationOutcome::failure(InvocationError::timeout(10))),
        );
        let mut chat = session(gateway, executor.clone());

        let outcome = chat.handle_input("tres").await;

        let TurnOutcome::Answer { tool_results, .. } = outcome else {
            panic!("expected an answer");
        };
        let failures: Vec<_> = tool_results.iter().filter(|r| !r.is_success()).collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].operation_name, "op_b");
        assert_eq!(failures[0].outcome.error().unwrap().kind, ErrorKind::Timeout);
        assert_eq!(executor.executed_names().len(), 3);
    }

    #[tokio::test]
    async fn test_create_project_round_trip() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[(
                "crear_proyecto_y_tareas",
                r#"{"nombre_proyecto": "Launch", "lista_tareas": "design, build, ship"}"#,
            )])),
            Ok(ModelReply::text(
                "He creado el proyecto Launch (ID 7) con 3 tareas.",
            )),
        ]));
        let executor = Arc::new(MockExecutor::new().with_outcome(
            "crear_proyecto_y_tareas",
            InvocationOutcome::success(
                "✅ Proyecto 'Launch' creado (ID: 7) con 3 tareas iniciales.",
            ),
        ));
        let mut chat = session(gateway.clone(), executor.clone());

        let outcome = chat
            .handle_input("Create a project called Launch with tasks: design, build, ship")
            .await;

        let executed = executor.executed.lock().unwrap().clone();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].get_str("nombre_proyecto"), Some("Launch"));
        assert_eq!(
            executed[0].get_str("lista_tareas"),
            Some("design, build, ship")
        );

        let TurnOutcome::Answer { text, .. } = outcome else {
            panic!("expected an answer");
        };
        assert!(text.contains('7'));

        // The follow-up query saw the tool result.
        let queries = gateway.queries.lock().unwrap();
        let follow_up = &queries[1];
        let tool_turn = follow_up
            .turns
            .iter()
            .find(|t| t.role == Role::Tool)
            .unwrap();
        assert!(tool_turn.content.contains("(ID: 7)"));
    }

    #[tokio::test]
    async fn test_catalog_sent_and_follow_up_disables_tools() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[("op_a", "{}")])),
            Ok(ModelReply::text("ok")),
        ]));
        let mut chat = session(gateway.clone(), Arc::new(MockExecutor::new()));
        chat.handle_input("hola").await;

        let queries = gateway.queries.lock().unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0].tool_choice, ToolChoice::Auto);
        assert_eq!(queries[1].tool_choice, ToolChoice::None);
        assert_eq!(queries[0].tool_count, 5);
        assert_eq!(queries[1].tool_count, 5);
    }

    #[tokio::test]
    async fn test_unknown_operation_yields_not_found() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[("borrar_todo", "{}")])),
            Ok(ModelReply::text("No puedo hacer eso.")),
            Ok(calls(&[("op_a", "{}")])),
            Ok(ModelReply::text("ok")),
        ]));
        let executor = Arc::new(MockExecutor::new());
        let mut chat = session(gateway, executor.clone());

        let outcome = chat.handle_input("borra todo").await;
        let TurnOutcome::Answer { tool_results, .. } = outcome else {
            panic!("expected an answer");
        };
        let err = tool_results[0].outcome.error().unwrap();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert!(err.message.contains("not found"));
        assert!(executor.executed_names().is_empty());

        let again = chat.handle_input("ahora algo válido").await;
        assert!(matches!(again, TurnOutcome::Answer { .. }));
        assert_eq!(executor.executed_names(), vec!["op_a"]);
    }

    #[tokio::test]
    async fn test_malformed_arguments_do_not_stop_batch() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[("op_a", "{broken"), ("op_b", "{}")])),
            Ok(ModelReply::text("parcial")),
        ]));
        let executor = Arc::new(MockExecutor::new());
        let mut chat = session(gateway, executor.clone());

        let TurnOutcome::Answer { tool_results, .. } = chat.handle_input("dos").await else {
            panic!("expected an answer");
        };
        assert_eq!(
            tool_results[0].outcome.error().unwrap().kind,
            ErrorKind::InvalidArguments
        );
        assert!(tool_results[1].is_success());
        assert_eq!(executor.executed_names(), vec!["op_b"]);

        let tool_turn = &chat.conversation().turns()[3];
        assert!(tool_turn.content.starts_with("Error (invalid_arguments)"));
    }

    #[tokio::test]
    async fn test_text_reply_is_policy_violation() {
        let gateway = Arc::new(MockGateway::new(vec![Ok(ModelReply::text(
            "Claro, ya creé la tarea.",
        ))]));
        let observer = Arc::new(CountingObserver::default());
        let mut chat =
            session(gateway.clone(), Arc::new(MockExecutor::new())).with_observer(observer.clone());

        let outcome = chat.handle_input("crea una tarea").await;

        assert_eq!(
            outcome,
            TurnOutcome::Answer {
                text: "Claro, ya creé la tarea.".to_string(),
                tool_results: Vec::new(),
                policy_violation: true,
            }
        );
        assert_eq!(observer.violations.lock().unwrap().len(), 1);
        let last = chat.conversation().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Claro, ya creé la tarea.");
        // No follow-up query for a text reply.
        assert_eq!(gateway.queries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_follow_up_failure_keeps_tool_turns() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[("op_a", "{}")])),
            Err(GatewayError::Timeout),
        ]));
        let mut chat = session(gateway, Arc::new(MockExecutor::new()));

        let outcome = chat.handle_input("hola").await;

        let TurnOutcome::TransportFailure { tool_results, .. } = outcome else {
            panic!("expected a transport failure");
        };
        assert_eq!(tool_results.len(), 1);
        assert_eq!(chat.conversation().last().unwrap().role, Role::Tool);
        assert_eq!(chat.state(), ChatState::AwaitingUserInput);
    }

    #[tokio::test]
    async fn test_fatal_failure_reaches_observer_and_history() {
        let gateway = Arc::new(MockGateway::new(vec![
            Ok(calls(&[("op_a", "{}")])),
            Ok(ModelReply::text("El ejecutor no está disponible.")),
        ]));
        let executor = Arc::new(MockExecutor::new().with_outcome(
            "op_a",
            InvocationOutcome::failure(InvocationError::executor_unavailable(
                "atlas-executor not found",
            )),
        ));
        let observer = Arc::new(CountingObserver::default());
        let mut chat = session(gateway, executor).with_observer(observer.clone());

        chat.handle_input("hola").await;

        let results = observer.results.lock().unwrap();
        assert!(results[0].outcome.error().unwrap().is_fatal());
        let tool_turn = &chat.conversation().turns()[3];
        assert!(tool_turn.content.starts_with("Error (executor_unavailable)"));
    }

    #[tokio::test]
    async fn test_exit_phrase_ends_session() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let mut chat = session(gateway.clone(), Arc::new(MockExecutor::new()));

        assert_eq!(chat.handle_input("  SALIR ").await, TurnOutcome::Ended);
        assert!(chat.is_ended());
        assert_eq!(chat.handle_input("hola").await, TurnOutcome::Ended);
        assert!(gateway.queries.lock().unwrap().is_empty());
        assert_eq!(chat.conversation().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let gateway = Arc::new(MockGateway::new(vec![]));
        let mut chat = session(gateway.clone(), Arc::new(MockExecutor::new()));

        assert_eq!(chat.handle_input("   ").await, TurnOutcome::Ignored);
        assert_eq!(chat.conversation().len(), 1);
        assert!(gateway.queries.lock().unwrap().is_empty());
    }
}
