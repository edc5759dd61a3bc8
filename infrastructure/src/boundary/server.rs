//! Server side of the executor boundary.
//!
//! [`BoundaryServer::handle`] turns one raw request into the bytes the
//! `atlas-executor` process writes to stdout and the status it exits with.
//! It never panics outward: a panic inside an operation becomes a
//! `crashed` envelope with [`BoundaryStatus::Internal`].

use crate::operations::OperationRegistry;
use crate::store::Store;
use atlas_domain::{
    BoundaryStatus, InvocationError, InvocationOutcome, ToolInvocation, decode_request,
    encode_response,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{error, info, warn};

/// What the executor process should print and exit with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryExit {
    /// Single-line envelope, or `None` for the idle probe
    pub stdout: Option<String>,
    pub exit_code: i32,
}

impl BoundaryExit {
    fn idle() -> Self {
        Self {
            stdout: None,
            exit_code: BoundaryStatus::Success.code(),
        }
    }

    fn from_outcome(outcome: &InvocationOutcome) -> Self {
        Self {
            stdout: Some(encode_response(outcome)),
            exit_code: BoundaryStatus::for_outcome(outcome).code(),
        }
    }
}

pub struct BoundaryServer {
    registry: OperationRegistry,
    store: Store,
}

impl BoundaryServer {
    pub fn new(registry: OperationRegistry, store: Store) -> Self {
        Self { registry, store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Decode `input`, dispatch it and encode the result.
    pub fn handle(&self, input: &str) -> BoundaryExit {
        if input.trim().is_empty() {
            info!("Empty request; nothing to do");
            return BoundaryExit::idle();
        }

        let request = match decode_request(input) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected boundary request");
                return BoundaryExit::from_outcome(&InvocationOutcome::failure(e));
            }
        };

        info!(operation = %request.function, "Handling boundary request");
        let mut invocation = ToolInvocation::new("boundary", request.function);
        invocation.arguments = request.arguments;

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.registry.dispatch(&self.store, &invocation)
        }))
        .unwrap_or_else(|panic| {
            let reason = panic_message(panic.as_ref());
            error!(operation = %invocation.operation_name, reason = %reason, "Operation panicked");
            InvocationOutcome::failure(
                InvocationError::crashed(format!(
                    "Operation '{}' failed unexpectedly",
                    invocation.operation_name
                ))
                .with_details(reason),
            )
        });

        match outcome.error() {
            Some(e) => warn!(operation = %invocation.operation_name, kind = %e.kind, "Operation failed"),
            None => info!(operation = %invocation.operation_name, "Operation succeeded"),
        }
        BoundaryExit::from_outcome(&outcome)
    }
}

/// Send panic reports to the log instead of stderr.
///
/// The default hook prints before [`catch_unwind`] returns, and the client
/// reads any stderr text as a crash that overrides the envelope.
pub fn install_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        error!(panic = %info, "Executor panicked");
    }));
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreConfig;
    use atlas_domain::{ErrorKind, OperationDescriptor, decode_response};
    use std::time::Duration;
    use tempfile::TempDir;

    fn server() -> (TempDir, BoundaryServer) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(
            StoreConfig::at(dir.path().join("atlas.db")).with_retry(1, Duration::ZERO),
        );
        store.initialize_schema().unwrap();
        (dir, BoundaryServer::new(OperationRegistry::builtin(), store))
    }

    fn decoded(exit: &BoundaryExit) -> InvocationOutcome {
        decode_response(exit.stdout.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn test_empty_input_is_idle() {
        let (_dir, server) = server();
        assert_eq!(server.handle(""), BoundaryExit::idle());
        assert_eq!(server.handle("  \n").stdout, None);
    }

    #[test]
    fn test_success_exits_zero() {
        let (_dir, server) = server();
        let exit = server.handle(
            r#"{"function":"crear_proyecto_y_tareas","arguments":{"nombre_proyecto":"Web","lista_tareas":"a, b"}}"#,
        );
        assert_eq!(exit.exit_code, 0);
        let line = exit.stdout.as_deref().unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(
            decoded(&exit).output(),
            Some("✅ Proyecto 'Web' creado (ID: 1) con 2 tareas iniciales.")
        );
    }

    #[test]
    fn test_operation_failure_exits_one() {
        let (_dir, server) = server();
        let exit = server.handle(
            r#"{"function":"actualizar_estado_tarea","arguments":{"tarea_id":9,"nuevo_estado":"Hecha"}}"#,
        );
        assert_eq!(exit.exit_code, 1);
        assert_eq!(decoded(&exit).error().unwrap().kind, ErrorKind::NotFound);
    }

    #[test]
    fn test_unknown_function_exits_one() {
        let (_dir, server) = server();
        let exit = server.handle(r#"{"function":"volar","arguments":{}}"#);
        assert_eq!(exit.exit_code, 1);
        assert_eq!(
            decoded(&exit).error().unwrap().message,
            "Operation 'volar' not found"
        );
    }

    #[test]
    fn test_malformed_json_exits_two() {
        let (_dir, server) = server();
        let exit = server.handle("{not json");
        assert_eq!(exit.exit_code, 2);
        assert_eq!(decoded(&exit).error().unwrap().kind, ErrorKind::Protocol);
    }

    #[test]
    fn test_missing_function_exits_two() {
        let (_dir, server) = server();
        let exit = server.handle(r#"{"arguments":{}}"#);
        assert_eq!(exit.exit_code, 2);
        assert_eq!(
            decoded(&exit).error().unwrap().message,
            "Invalid request: missing 'function'"
        );
    }

    fn explode(
        _store: &Store,
        _call: &ToolInvocation,
    ) -> Result<String, InvocationError> {
        panic!("boom")
    }

    #[test]
    fn test_panic_is_reported_as_crashed() {
        let dir = TempDir::new().unwrap();
        let store = Store::new(StoreConfig::at(dir.path().join("atlas.db")));
        let mut registry = OperationRegistry::new();
        registry
            .register(OperationDescriptor::new("explotar", "Always panics"), explode)
            .unwrap();
        let server = BoundaryServer::new(registry, store);

        let exit = server.handle(r#"{"function":"explotar"}"#);
        assert_eq!(exit.exit_code, 3);
        let outcome = decoded(&exit);
        let err = outcome.error().unwrap();
        assert_eq!(err.kind, ErrorKind::Crashed);
        assert_eq!(err.details.as_deref(), Some("boom"));
    }

    const PANIC_CHILD_ENV: &str = "ATLAS_TEST_PANIC_CHILD";

    #[test]
    fn test_panic_logger_keeps_stderr_clean() {
        if std::env::var_os(PANIC_CHILD_ENV).is_some() {
            install_panic_logger();
            let dir = TempDir::new().unwrap();
            let mut registry = OperationRegistry::new();
            registry
                .register(OperationDescriptor::new("explotar", "Always panics"), explode)
                .unwrap();
            let server =
                BoundaryServer::new(registry, Store::new(StoreConfig::at(dir.path().join("a.db"))));
            assert_eq!(server.handle(r#"{"function":"explotar"}"#).exit_code, 3);
            return;
        }

        // Re-run this test alone in a child process so the hook stays local to it
        let output = std::process::Command::new(std::env::current_exe().unwrap())
            .args([
                "--exact",
                "boundary::server::tests::test_panic_logger_keeps_stderr_clean",
                "--nocapture",
                "--test-threads=1",
            ])
            .env(PANIC_CHILD_ENV, "1")
            .output()
            .unwrap();

        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("boom"), "stderr: {}", stderr);
    }
}
