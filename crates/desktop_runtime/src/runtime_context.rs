//! Runtime provider and context wiring for the desktop.
//!
//! This module owns the long-lived desktop state signal, the event bus, the runtime effect queue,
//! and the host command boundary. Bus subscribers feed every message through the reducer.
#![allow(clippy::clone_on_copy)]

use std::rc::Rc;

use desktop_app_contract::{AppName, BusMessage, EventDecodeError};
use leptos::*;
use platform_host::CommandInvoker;
use serde_json::Value;

use crate::{
    app_bus::EventBus,
    apps, effect_executor,
    model::{DesktopPreferences, DesktopState},
    notifications::NotificationId,
    reducer::{reduce_desktop, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop state and dispatching bus messages.
pub struct DesktopRuntimeContext {
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Queue of runtime effects emitted by the reducer and drained by the executor.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Event bus shared with app windows.
    pub bus: StoredValue<Rc<EventBus>>,
    /// Host command boundary.
    pub invoker: StoredValue<Rc<dyn CommandInvoker>>,
    /// Bus dispatch callback.
    pub dispatch: Callback<BusMessage>,
}

impl DesktopRuntimeContext {
    /// Dispatches `message` on the bus.
    pub fn dispatch_message(&self, message: BusMessage) {
        self.dispatch.call(message);
    }

    /// Decodes and dispatches a `(channel, payload)` pair posted by an app window.
    ///
    /// # Errors
    ///
    /// Returns the decode error when the channel or payload is not recognized.
    pub fn dispatch_raw(&self, channel: &str, payload: Value) -> Result<(), EventDecodeError> {
        self.bus.get_value().dispatch_raw(channel, payload)
    }

    /// Feeds a backend `update_app` push into the window channel.
    ///
    /// # Errors
    ///
    /// Returns the parse error when `payload` is not an app update push.
    pub fn push_app_update(&self, payload: Value) -> Result<(), serde_json::Error> {
        effect_executor::forward_app_update(self.bus.get_value().as_ref(), payload)
    }

    /// Opens and focuses `name`, then loads its data from the backend.
    pub fn open_app(&self, name: &AppName) {
        self.state
            .update(|desktop| desktop.registry.open_app(name.as_str()));
        let Some(kind) = name.kind() else {
            return;
        };
        let invoker = self.invoker.get_value();
        let bus = self.bus.get_value();
        spawn_local(async move {
            effect_executor::load_app_data(invoker.as_ref(), bus.as_ref(), kind).await;
        });
    }

    /// Restores a minimized window without moving focus.
    pub fn show_app(&self, name: &AppName) {
        self.state
            .update(|desktop| desktop.registry.show(name.as_str()));
    }

    /// Removes a notification from the queue.
    pub fn dismiss_notification(&self, id: NotificationId) {
        self.state.update(|desktop| {
            desktop.notifications.dismiss(id);
        });
    }
}

fn apply_message(runtime: DesktopRuntimeContext, message: &BusMessage) {
    let mut desktop = runtime.state.get_untracked();
    let previous = desktop.clone();

    match reduce_desktop(&mut desktop, message) {
        Ok(new_effects) => {
            if desktop != previous {
                runtime.state.set(desktop);
            }
            if !new_effects.is_empty() {
                let mut queue = runtime.effects.get_untracked();
                queue.extend(new_effects);
                runtime.effects.set(queue);
            }
        }
        Err(err) => ::tracing::warn!("desktop reducer error: {err}"),
    }
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    let bus = runtime.bus.get_value();
    bus.subscribe_critical(move |event| apply_message(runtime, &event.clone().into()));
    bus.subscribe_window(move |event| apply_message(runtime, &event.clone().into()));
    effect_executor::install(runtime);
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components with the default apps registered.
pub fn DesktopProvider(
    /// Host command boundary assembled by the entry layer.
    invoker: Rc<dyn CommandInvoker>,
    /// Startup configuration; defaults apply when omitted.
    #[prop(optional)]
    preferences: Option<DesktopPreferences>,
    children: Children,
) -> impl IntoView {
    let mut desktop = DesktopState::new(preferences.unwrap_or_default());
    apps::register_default_apps(&mut desktop.registry, &desktop.preferences);

    let state = create_rw_signal(desktop);
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let bus = store_value(Rc::new(EventBus::new()));
    let invoker = store_value(invoker);
    let dispatch = Callback::new(move |message: BusMessage| bus.get_value().dispatch(message));

    let runtime = DesktopRuntimeContext {
        state,
        effects,
        bus,
        invoker,
        dispatch,
    };

    provide_context(runtime.clone());

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
