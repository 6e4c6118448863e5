//! Transition logic applying bus messages to [`DesktopState`] and the side-effect intents it emits.

use desktop_app_contract::{
    AppKind, AppName, AppUpdateError, BusMessage, CriticalWindowEvent, Email, WindowEvent,
};
use thiserror::Error;

use crate::{model::DesktopState, notifications::NotificationId};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side effects requested by [`reduce_desktop`] and executed by the host layer.
pub enum RuntimeEffect {
    /// Tell the simulation backend that this app's window closed (`app_close`).
    SyncAppClosed(AppKind),
    /// A notification was queued.
    NotificationPosted(NotificationId),
    /// A mail arrived in the inbox.
    EmailReceived,
}

#[derive(Debug, Error)]
/// Reducer errors for messages that cannot be applied.
pub enum ReducerError {
    /// `windowOpened` data did not parse as the app's view data.
    #[error("malformed data for app `{app}`: {source}")]
    MalformedAppData {
        /// App whose window opened.
        app: AppName,
        /// Parse failure.
        #[source]
        source: serde_json::Error,
    },
    /// `appUpdate` named an unknown app or carried data that does not fit it.
    #[error("malformed app update: {0}")]
    MalformedAppUpdate(#[from] AppUpdateError),
}

/// Applies `message` to `state` and collects the resulting side effects.
///
/// Messages naming unregistered apps are logged and skipped rather than failing.
///
/// # Errors
///
/// Returns [`ReducerError::MalformedAppData`] when `windowOpened` data does not parse and
/// [`ReducerError::MalformedAppUpdate`] when an `appUpdate` push does not decode; the previous data
/// of that app is kept either way.
pub fn reduce_desktop(
    state: &mut DesktopState,
    message: &BusMessage,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    match message {
        BusMessage::Critical(event) => Ok(reduce_critical(state, event)),
        BusMessage::Window(event) => reduce_window(state, event),
    }
}

fn reduce_critical(state: &mut DesktopState, event: &CriticalWindowEvent) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    match event {
        CriticalWindowEvent::WindowClose { app } => {
            let registered = state.registry.get(app.as_str()).is_some();
            state.registry.close_app(app.as_str());
            if registered {
                if let Some(kind) = app.kind().filter(|kind| kind.backend_app_id().is_some()) {
                    effects.push(RuntimeEffect::SyncAppClosed(kind));
                }
            }
        }
        CriticalWindowEvent::WindowMinimize { app } => state.registry.hide(app.as_str()),
        CriticalWindowEvent::WindowAcquireFocus { app } => {
            state.registry.acquire_focus(app.as_ref().map(AppName::as_str));
        }
        CriticalWindowEvent::WindowSendNotification(draft) => {
            let id = state.notifications.add_notification(draft.clone()).id;
            state.registry.note_pending(draft.app.as_str());
            effects.push(RuntimeEffect::NotificationPosted(id));
        }
    }
    effects
}

fn reduce_window(
    state: &mut DesktopState,
    event: &WindowEvent,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match event {
        WindowEvent::WindowMaximize { app } => state.registry.toggle_maximized(app.as_str()),
        WindowEvent::WindowResize { app, size } => {
            let size = state.preferences.layout.clamp_window_size(*size);
            state.registry.resize(app.as_str(), size);
        }
        WindowEvent::WindowOpened { app, data } => match app.kind() {
            Some(kind) => {
                state
                    .app_data
                    .replace_from_json(kind, data)
                    .map_err(|source| ReducerError::MalformedAppData {
                        app: app.clone(),
                        source,
                    })?;
            }
            None => tracing::debug!(app = %app, "ignoring opened data for unknown app"),
        },
        WindowEvent::AppUpdate(envelope) => {
            let update = envelope.decode()?;
            tracing::debug!(
                app = update.kind().name(),
                update_type = envelope.update_type.as_str(),
                "merging app update"
            );
            state.app_data.apply_update(update);
        }
        WindowEvent::EmailCreate(email) => deliver_email(state, email.clone(), &mut effects),
    }

    if matches!(
        event,
        WindowEvent::WindowOpened { .. } | WindowEvent::AppUpdate(_)
    ) {
        let mail = state
            .advisors
            .review(&state.preferences.username, &state.app_data);
        for email in mail {
            deliver_email(state, email, &mut effects);
        }
    }
    Ok(effects)
}

fn deliver_email(state: &mut DesktopState, email: Email, effects: &mut Vec<RuntimeEffect>) {
    state.emails.create_email(email);
    state.registry.note_pending(AppKind::Email.name());
    effects.push(RuntimeEffect::EmailReceived);
}
