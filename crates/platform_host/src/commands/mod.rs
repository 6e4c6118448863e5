//! External command boundary contracts and adapters.
//!
//! The simulation backend is reached by named commands taking a JSON argument map. A command
//! either rejects with an error string or resolves with a JSON value, which may itself carry an
//! `error` field; interpreting that field is left to the caller.

use std::{cell::RefCell, collections::HashMap, future::Future, pin::Pin, rc::Rc};

use serde_json::Value;

/// Object-safe boxed future used by [`CommandInvoker`].
pub type CommandFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service executing named backend commands.
pub trait CommandInvoker {
    /// Invokes `command` with `args` and resolves with the raw result.
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: Value,
    ) -> CommandFuture<'a, Result<Value, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Command boundary for targets without a backend; every command rejects.
pub struct NoopCommandInvoker;

impl CommandInvoker for NoopCommandInvoker {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        _args: Value,
    ) -> CommandFuture<'a, Result<Value, String>> {
        Box::pin(async move { Err(format!("command `{command}` is unavailable")) })
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory command boundary answering from scripted responses and recording every call.
pub struct MemoryCommandInvoker {
    responses: Rc<RefCell<HashMap<String, Result<Value, String>>>>,
    calls: Rc<RefCell<Vec<(String, Value)>>>,
}

impl MemoryCommandInvoker {
    /// Scripts the result returned for `command`.
    pub fn respond(&self, command: impl Into<String>, result: Result<Value, String>) {
        self.responses.borrow_mut().insert(command.into(), result);
    }

    /// Returns the `(command, args)` pairs received so far, oldest first.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }
}

impl CommandInvoker for MemoryCommandInvoker {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: Value,
    ) -> CommandFuture<'a, Result<Value, String>> {
        Box::pin(async move {
            self.calls.borrow_mut().push((command.to_string(), args));
            self.responses
                .borrow()
                .get(command)
                .cloned()
                .unwrap_or_else(|| Err(format!("no response scripted for `{command}`")))
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;

    #[test]
    fn memory_invoker_replays_scripted_results_and_records_calls() {
        let invoker = MemoryCommandInvoker::default();
        invoker.respond("check_save_exists", Ok(json!({ "exists": true })));

        let status = block_on(invoker.invoke("check_save_exists", json!({ "appId": 1 })))
            .expect("invoke");
        assert_eq!(status, json!({ "exists": true }));
        assert_eq!(
            invoker.calls(),
            vec![("check_save_exists".to_string(), json!({ "appId": 1 }))]
        );

        let err = block_on(invoker.invoke("app_close", Value::Null)).expect_err("unscripted");
        assert!(err.contains("app_close"));
    }

    #[test]
    fn noop_invoker_rejects_every_command() {
        let err = block_on(NoopCommandInvoker.invoke("create_game", json!({})))
            .expect_err("noop rejects");
        assert_eq!(err, "command `create_game` is unavailable");
    }
}
