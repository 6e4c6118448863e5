//! Bridge from backend command calls to user-visible error notifications.
//!
//! A command fails either by rejecting or by resolving to an object with a truthy `error` field.
//! Both are reported the same way: one `Error` notification for the calling app, posted on the
//! critical channel, and a failed [`InvokeOutcome`].

use desktop_app_contract::{
    AppName, CriticalWindowEvent, NotificationAction, NotificationDraft, Severity,
};
use platform_host::CommandInvoker;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::app_bus::EventSink;

/// Header of notifications reporting a failed command.
pub const INVOKE_ERROR_HEADER: &str = "An error occurred";

#[derive(Debug, Clone, PartialEq)]
/// Result of [`handle_invoke`]: a success flag and the value on success.
pub struct InvokeOutcome<T> {
    /// Whether the command succeeded.
    pub success: bool,
    /// Command result; `None` on failure.
    pub value: Option<T>,
}

impl<T> InvokeOutcome<T> {
    fn succeeded(value: T) -> Self {
        Self {
            success: true,
            value: Some(value),
        }
    }

    fn failed() -> Self {
        Self {
            success: false,
            value: None,
        }
    }

    /// Returns the value when the command succeeded.
    pub fn into_option(self) -> Option<T> {
        self.value
    }
}

/// Builds the notification posted for a failed command of `app`.
pub fn error_notification(app: &AppName, message: impl Into<String>) -> NotificationDraft {
    NotificationDraft::new(app.clone(), INVOKE_ERROR_HEADER, message)
        .with_severity(Severity::Error)
        .with_action(NotificationAction::Nothing)
}

fn report_failure<S>(sink: &S, app: &AppName, command: &str, message: String)
where
    S: EventSink + ?Sized,
{
    tracing::warn!(app = %app, command, error = %message, "backend command failed");
    let draft = error_notification(app, message);
    sink.emit(CriticalWindowEvent::WindowSendNotification(draft).into());
}

/// Error text carried by a resolved command result, if it reports a logical failure.
fn reported_error(result: &Value) -> Option<String> {
    let error = result.as_object()?.get("error")?;
    let truthy = match error {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    };
    truthy.then(|| match error {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    })
}

/// Runs `command` for `app`, reporting any failure through `sink`.
pub async fn handle_invoke<I, S>(
    invoker: &I,
    sink: &S,
    app: &AppName,
    command: &str,
    args: Value,
) -> InvokeOutcome<Value>
where
    I: CommandInvoker + ?Sized,
    S: EventSink + ?Sized,
{
    match invoker.invoke(command, args).await {
        Err(message) => {
            report_failure(sink, app, command, message);
            InvokeOutcome::failed()
        }
        Ok(result) => match reported_error(&result) {
            Some(message) => {
                report_failure(sink, app, command, message);
                InvokeOutcome::failed()
            }
            None => InvokeOutcome::succeeded(result),
        },
    }
}

/// [`handle_invoke`] whose successful result is deserialized into `T`.
///
/// A result that does not deserialize is reported like any other failure.
pub async fn handle_invoke_typed<T, I, S>(
    invoker: &I,
    sink: &S,
    app: &AppName,
    command: &str,
    args: Value,
) -> InvokeOutcome<T>
where
    T: DeserializeOwned,
    I: CommandInvoker + ?Sized,
    S: EventSink + ?Sized,
{
    let Some(value) = handle_invoke(invoker, sink, app, command, args)
        .await
        .into_option()
    else {
        return InvokeOutcome::failed();
    };
    match serde_json::from_value(value) {
        Ok(value) => InvokeOutcome::succeeded(value),
        Err(err) => {
            report_failure(sink, app, command, err.to_string());
            InvokeOutcome::failed()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use desktop_app_contract::BusMessage;
    use futures::executor::block_on;
    use platform_host::MemoryCommandInvoker;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct RecordingSink(RefCell<Vec<BusMessage>>);

    impl EventSink for RecordingSink {
        fn emit(&self, message: BusMessage) {
            self.0.borrow_mut().push(message);
        }
    }

    impl RecordingSink {
        fn notifications(&self) -> Vec<NotificationDraft> {
            self.0
                .borrow()
                .iter()
                .filter_map(|message| match message {
                    BusMessage::Critical(CriticalWindowEvent::WindowSendNotification(draft)) => {
                        Some(draft.clone())
                    }
                    _ => None,
                })
                .collect()
        }
    }

    fn finance() -> AppName {
        AppName::new("finance")
    }

    #[test]
    fn rejected_command_posts_one_error_notification() {
        let invoker = MemoryCommandInvoker::default();
        invoker.respond("set_tax_rate", Err("save file locked".to_string()));
        let sink = RecordingSink::default();

        let outcome = block_on(handle_invoke(
            &invoker,
            &sink,
            &finance(),
            "set_tax_rate",
            json!({ "rate": 20 }),
        ));

        assert_eq!(outcome, InvokeOutcome { success: false, value: None });
        assert_eq!(
            sink.notifications(),
            vec![error_notification(&finance(), "save file locked")]
        );
        let posted = sink.notifications();
        let draft = &posted[0];
        assert_eq!(draft.severity, Severity::Error);
        assert_eq!(draft.header, INVOKE_ERROR_HEADER);
        assert_eq!(draft.app, finance());
    }

    #[test]
    fn error_field_is_treated_like_a_rejection() {
        let invoker = MemoryCommandInvoker::default();
        invoker.respond("set_tax_rate", Ok(json!({ "error": "x" })));
        let sink = RecordingSink::default();

        let outcome = block_on(handle_invoke(
            &invoker,
            &sink,
            &finance(),
            "set_tax_rate",
            Value::Null,
        ));

        assert_eq!(outcome, InvokeOutcome { success: false, value: None });
        assert_eq!(sink.notifications(), vec![error_notification(&finance(), "x")]);
    }

    #[test]
    fn falsy_error_field_still_succeeds() {
        let invoker = MemoryCommandInvoker::default();
        invoker.respond("get_rules", Ok(json!({ "error": null, "rules": [] })));
        invoker.respond("get_flag", Ok(json!({ "error": "" })));
        let sink = RecordingSink::default();

        let app = finance();
        let outcome = block_on(handle_invoke(&invoker, &sink, &app, "get_rules", json!({})));
        assert!(outcome.success);
        assert_eq!(outcome.into_option(), Some(json!({ "error": null, "rules": [] })));
        let flag = block_on(handle_invoke(&invoker, &sink, &app, "get_flag", json!({})));
        assert!(flag.success);
        assert!(sink.notifications().is_empty());
    }

    #[test]
    fn typed_results_deserialize_or_fail_loudly() {
        let invoker = MemoryCommandInvoker::default();
        invoker.respond("app_open", Ok(json!("{\"tax_rate\":5}")));
        invoker.respond("get_count", Ok(json!("many")));
        let sink = RecordingSink::default();

        let data: InvokeOutcome<String> = block_on(handle_invoke_typed(
            &invoker,
            &sink,
            &finance(),
            "app_open",
            json!({ "appId": 1 }),
        ));
        assert_eq!(data.into_option().as_deref(), Some("{\"tax_rate\":5}"));

        let count: InvokeOutcome<u32> =
            block_on(handle_invoke_typed(&invoker, &sink, &finance(), "get_count", json!({})));
        assert!(!count.success);
        assert_eq!(sink.notifications().len(), 1);
    }
}
