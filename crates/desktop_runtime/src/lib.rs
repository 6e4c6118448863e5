//! Desktop runtime: app registry, notification and mail queues, per-app data, the event bus, and
//! the Leptos provider tying them together.

pub mod advisor_mail;
pub mod app_bus;
pub mod app_data;
pub mod apps;
pub mod effect_executor;
pub mod emails;
pub mod graphs;
pub mod invoke;
pub mod model;
pub mod notifications;
pub mod reducer;
pub mod runtime_context;
pub mod window_manager;

pub use advisor_mail::{AdvisorDesk, BudgetOutlook};
pub use app_bus::{EventBus, EventSink, SubscriptionId};
pub use app_data::AppDataStore;
pub use apps::{app_catalog, default_descriptor, register_default_apps};
pub use effect_executor::{forward_app_update, load_app_data, run_runtime_effect};
pub use emails::EmailInbox;
pub use graphs::{filter_data, projected_graph_data, FilteredSeries, ProjectedGraphData};
pub use invoke::{handle_invoke, handle_invoke_typed, InvokeOutcome, INVOKE_ERROR_HEADER};
pub use model::*;
pub use notifications::{
    just_displayed, just_displayed_at, Notification, NotificationId, NotificationQueue,
};
pub use reducer::{reduce_desktop, ReducerError, RuntimeEffect};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
pub use window_manager::AppRegistry;
