//! Runtime effect execution and backend data loading for app windows.
//!
//! The async functions here only need a [`CommandInvoker`] and an [`EventSink`], so they run the
//! same under the Leptos provider and in plain tests. [`install`] wires them to the provider's
//! effect queue.

use desktop_app_contract::{AppKind, AppName, AppUpdateEnvelope, WindowEvent};
use leptos::*;
use platform_host::CommandInvoker;
use serde_json::{json, Value};

use crate::{
    app_bus::EventSink,
    invoke::{handle_invoke, handle_invoke_typed},
    reducer::RuntimeEffect,
    runtime_context::DesktopRuntimeContext,
};

/// Backend command returning an app's full view data as a JSON string.
pub const APP_OPEN_COMMAND: &str = "app_open";
/// Backend command telling the simulation an app window closed.
pub const APP_CLOSE_COMMAND: &str = "app_close";
/// Backend event pushing partial app data at the end of a simulated day or month.
pub const APP_UPDATE_EVENT: &str = "update_app";

/// Re-emits a backend [`APP_UPDATE_EVENT`] payload as an `appUpdate` window event.
///
/// # Errors
///
/// Fails when `payload` is not an `{app_id, update_type, data}` object; nothing is emitted then.
pub fn forward_app_update<S>(sink: &S, payload: Value) -> Result<(), serde_json::Error>
where
    S: EventSink + ?Sized,
{
    let envelope: AppUpdateEnvelope = serde_json::from_value(payload)?;
    sink.emit(WindowEvent::AppUpdate(envelope).into());
    Ok(())
}

/// Fetches the initial data of `kind` and emits it as `windowOpened`.
///
/// Returns `false` when the app has no backend state or the command failed; failures are
/// reported through `sink` by the invocation bridge.
pub async fn load_app_data<I, S>(invoker: &I, sink: &S, kind: AppKind) -> bool
where
    I: CommandInvoker + ?Sized,
    S: EventSink + ?Sized,
{
    let Some(app_id) = kind.backend_app_id() else {
        return false;
    };
    let app = AppName::from(kind);
    let outcome = handle_invoke_typed::<String, _, _>(
        invoker,
        sink,
        &app,
        APP_OPEN_COMMAND,
        json!({ "appId": app_id }),
    )
    .await;
    match outcome.into_option() {
        Some(data) => {
            sink.emit(WindowEvent::WindowOpened { app, data }.into());
            true
        }
        None => false,
    }
}

/// Executes one reducer-emitted effect.
pub async fn run_runtime_effect<I, S>(invoker: &I, sink: &S, effect: RuntimeEffect)
where
    I: CommandInvoker + ?Sized,
    S: EventSink + ?Sized,
{
    match effect {
        RuntimeEffect::SyncAppClosed(kind) => {
            let Some(app_id) = kind.backend_app_id() else {
                return;
            };
            let app = AppName::from(kind);
            handle_invoke(
                invoker,
                sink,
                &app,
                APP_CLOSE_COMMAND,
                json!({ "appId": app_id }),
            )
            .await;
        }
        RuntimeEffect::NotificationPosted(id) => {
            ::tracing::debug!(id = id.0, "notification ready for display");
        }
        RuntimeEffect::EmailReceived => ::tracing::debug!("email ready for display"),
    }
}

/// Installs the effect executor that drains reducer-emitted runtime effects in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the queue before spawning so effects queued meanwhile start a fresh batch.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        let invoker = runtime.invoker.get_value();
        let bus = runtime.bus.get_value();
        spawn_local(async move {
            for effect in queued {
                run_runtime_effect(invoker.as_ref(), bus.as_ref(), effect).await;
            }
        });
    });
}
