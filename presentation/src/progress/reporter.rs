//! Progress reporting for chat turns

use crate::output::console::ConsoleFormatter;
use atlas_application::{ChatObserver, GatewayError, QueryPhase};
use atlas_domain::{InvocationResult, RequestedCall};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

/// Spinner while the model thinks, one line per tool call
pub struct ConsoleObserver {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleObserver {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_message(phase: QueryPhase) -> &'static str {
        match phase {
            QueryPhase::Initial => "Pensando...",
            QueryPhase::FollowUp => "Redactando respuesta...",
        }
    }

    fn stop_spinner(&self) {
        if let Ok(mut guard) = self.spinner.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    /// Print above the spinner if one is running
    fn println(&self, line: String) {
        match self.spinner.lock() {
            Ok(guard) => match guard.as_ref() {
                Some(pb) => pb.println(line),
                None => println!("{}", line),
            },
            Err(_) => println!("{}", line),
        }
    }
}

impl Default for ConsoleObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatObserver for ConsoleObserver {
    fn on_model_query(&self, phase: QueryPhase) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(Self::phase_message(phase));
        pb.enable_steady_tick(Duration::from_millis(100));

        match self.spinner.lock() {
            Ok(mut guard) => {
                if let Some(previous) = guard.replace(pb) {
                    previous.finish_and_clear();
                }
            }
            Err(_) => pb.finish_and_clear(),
        }
    }

    fn on_model_done(&self, _phase: QueryPhase) {
        self.stop_spinner();
    }

    fn on_tool_dispatch(&self, call: &RequestedCall, index: usize, total: usize) {
        self.println(ConsoleFormatter::tool_dispatch(call, index, total));
    }

    fn on_tool_result(&self, result: &InvocationResult) {
        self.println(ConsoleFormatter::tool_result(result));
    }

    fn on_transport_error(&self, error: &GatewayError) {
        self.stop_spinner();
        warn!("Model query failed: {}", error);
    }
}

/// Plain text progress (no spinner), used with --quiet or when piping
pub struct SimpleObserver;

impl ChatObserver for SimpleObserver {
    fn on_tool_result(&self, result: &InvocationResult) {
        if let Some(e) = result.outcome.error().filter(|e| e.is_fatal()) {
            eprintln!(
                "{} {} [{}]: {}",
                "!!".red().bold(),
                result.operation_name,
                e.kind,
                e.message
            );
        }
    }
}
