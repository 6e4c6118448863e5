//! Shared contract types between the simulation desktop shell and its app windows.
//!
//! App windows never call the shell directly. Everything they need from it travels as a typed
//! message on one of two channels: the critical channel carries window-lifecycle requests the
//! shell must honor, the window channel carries best-effort app-custom events.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod app_data;
pub mod graph;

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use app_data::{
    AgeRanges, AppData, AppUpdate, AppUpdateEnvelope, AppUpdateError, BusinessData,
    BusinessFundingRule, BusinessRules, BusinessTaxRule, BusinessUpdate, CareCapacity,
    CoverFoodRule, CoverFoodUnemployedRule, DenyAgeRule, DenyHealthRule, FinanceData,
    FinanceRules, FinanceUpdate, HealthcareData, HealthcareRules, HealthcareUpdate, TaxRule,
    WelfareData, WelfareRules, WelfareUpdate,
};
pub use graph::{Granularity, GraphFilter, GraphSeries, RawGraphData, GRAPH_SENTINEL};

/// Wire name of the critical window-lifecycle channel.
pub const CRITICAL_CHANNEL_NAME: &str = "criticalWindowEvent";
/// Wire name of the best-effort app event channel.
pub const WINDOW_CHANNEL_NAME: &str = "windowEvent";

/// Unique registry key of a desktop application.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppName(String);

impl AppName {
    /// Creates an app name from any string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the string form of the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the built-in app kind this name refers to, if any.
    pub fn kind(&self) -> Option<AppKind> {
        AppKind::from_name(&self.0)
    }
}

impl std::fmt::Display for AppName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for AppName {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<AppKind> for AppName {
    fn from(kind: AppKind) -> Self {
        Self::new(kind.name())
    }
}

impl PartialEq<str> for AppName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for AppName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Built-in simulation applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    /// Government balance, budgets and tax rates.
    Finance,
    /// Business counts, incomes and funding rules.
    Business,
    /// Population health, hospital capacity and care rules.
    Healthcare,
    /// Welfare payouts and food-cover rules.
    Welfare,
    /// In-game advisor mail.
    Email,
}

impl AppKind {
    /// All kinds in desktop display order.
    pub const ALL: [AppKind; 5] = [
        Self::Finance,
        Self::Business,
        Self::Email,
        Self::Healthcare,
        Self::Welfare,
    ];

    /// Returns the canonical registry name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Finance => "finance",
            Self::Business => "business",
            Self::Healthcare => "healthcare",
            Self::Welfare => "welfare",
            Self::Email => "email",
        }
    }

    /// Returns the default window title.
    pub const fn title(self) -> &'static str {
        match self {
            Self::Finance => "Finance",
            Self::Business => "Business",
            Self::Healthcare => "Healthcare",
            Self::Welfare => "Welfare",
            Self::Email => "Email",
        }
    }

    /// Numeric app id understood by the simulation backend commands.
    ///
    /// Email has no backend state and returns `None`.
    pub const fn backend_app_id(self) -> Option<u8> {
        match self {
            Self::Finance => Some(1),
            Self::Healthcare => Some(2),
            Self::Welfare => Some(3),
            Self::Business => Some(4),
            Self::Email => None,
        }
    }

    /// Parses a canonical registry name.
    pub fn from_name(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == raw)
    }

    /// Inverse of [`Self::backend_app_id`].
    pub fn from_backend_app_id(app_id: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.backend_app_id() == Some(app_id))
    }
}

/// Window position in desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pos {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
}

/// Window size in desktop pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
    /// Whether the window is maximized, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximized: Option<bool>,
}

impl Size {
    /// Creates a size without a maximized flag.
    pub const fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            maximized: None,
        }
    }
}

/// Combined window position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Placement {
    /// New position.
    pub pos: Pos,
    /// New size.
    pub size: Size,
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational.
    #[default]
    Normal,
    /// Needs attention.
    Warning,
    /// Something failed.
    Error,
}

/// What activating a notification does.
///
/// Serialized as `openApp` / `nothing`; the numeric indices `0` / `1` used by older app windows
/// are accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationAction {
    /// Open the app that posted the notification.
    OpenApp,
    /// Nothing.
    #[default]
    Nothing,
}

impl<'de> Deserialize<'de> for NotificationAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Index(u64),
            Name(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Index(0) => Ok(Self::OpenApp),
            Wire::Index(1) => Ok(Self::Nothing),
            Wire::Name(name) if name == "openApp" => Ok(Self::OpenApp),
            Wire::Name(name) if name == "nothing" => Ok(Self::Nothing),
            Wire::Index(index) => Err(de::Error::custom(format!(
                "unknown notification action index {index}"
            ))),
            Wire::Name(name) => Err(de::Error::unknown_variant(&name, &["openApp", "nothing"])),
        }
    }
}

/// Notification payload posted by an app window before the shell assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    /// App the notification belongs to.
    pub app: AppName,
    /// Short headline.
    pub header: String,
    /// Body text.
    pub content: String,
    /// Severity.
    #[serde(default)]
    pub severity: Severity,
    /// Activation behavior.
    #[serde(default)]
    pub action: NotificationAction,
    /// Optional in-game date text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Optional label for the action button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_title: Option<String>,
}

impl NotificationDraft {
    /// Creates a draft with `Normal` severity and no action.
    pub fn new(
        app: impl Into<AppName>,
        header: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            app: app.into(),
            header: header.into(),
            content: content.into(),
            severity: Severity::Normal,
            action: NotificationAction::Nothing,
            date: None,
            action_title: None,
        }
    }

    /// Sets the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the activation behavior.
    pub fn with_action(mut self, action: NotificationAction) -> Self {
        self.action = action;
        self
    }
}

/// Advisor mail delivered to the email app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Subject line.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Sender display name.
    pub sender: String,
    /// Severity shown next to the subject.
    #[serde(default)]
    pub severity: Severity,
}

/// Events required for desktop/window coordination, carried on [`Channel::Critical`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum CriticalWindowEvent {
    /// A window asks to be closed.
    WindowClose {
        /// Window's app.
        app: AppName,
    },
    /// A window asks to be minimized.
    WindowMinimize {
        /// Window's app.
        app: AppName,
    },
    /// A window asks for focus, or clears focus with `None`.
    #[serde(rename = "windowAquireFocus")]
    WindowAcquireFocus {
        /// App to focus.
        app: Option<AppName>,
    },
    /// A window posts a user-visible notification.
    WindowSendNotification(NotificationDraft),
}

/// App-custom events carried on [`Channel::Window`]. Delivery is best effort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum WindowEvent {
    /// A window toggled its maximized state.
    WindowMaximize {
        /// Window's app.
        app: AppName,
    },
    /// A window was resized by the user.
    WindowResize {
        /// Window's app.
        app: AppName,
        /// New size.
        size: Size,
    },
    /// A window finished loading its initial data.
    WindowOpened {
        /// Window's app.
        app: AppName,
        /// Serialized full view data for the app, as returned by the backend.
        data: String,
    },
    /// Incremental push of part of an app's view data, as emitted by the backend.
    AppUpdate(AppUpdateEnvelope),
    /// New advisor mail.
    EmailCreate(Email),
}

/// The two event transports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// `criticalWindowEvent`
    #[serde(rename = "criticalWindowEvent")]
    Critical,
    /// `windowEvent`
    #[serde(rename = "windowEvent")]
    Window,
}

impl Channel {
    /// Returns the wire name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Critical => CRITICAL_CHANNEL_NAME,
            Self::Window => WINDOW_CHANNEL_NAME,
        }
    }

    /// Parses a wire name.
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            CRITICAL_CHANNEL_NAME => Some(Self::Critical),
            WINDOW_CHANNEL_NAME => Some(Self::Window),
            _ => None,
        }
    }
}

/// One message on the desktop event bus.
#[derive(Debug, Clone, PartialEq)]
pub enum BusMessage {
    /// Window-lifecycle request.
    Critical(CriticalWindowEvent),
    /// App-custom event.
    Window(WindowEvent),
}

impl BusMessage {
    /// Channel that carries this message.
    pub const fn channel(&self) -> Channel {
        match self {
            Self::Critical(_) => Channel::Critical,
            Self::Window(_) => Channel::Window,
        }
    }

    /// Decodes a `(channel, payload)` pair as sent by an app window.
    ///
    /// # Errors
    ///
    /// Fails when the channel name is unknown or the payload tag does not belong to that channel.
    pub fn decode(channel: &str, payload: Value) -> Result<Self, EventDecodeError> {
        let channel = Channel::from_name(channel)
            .ok_or_else(|| EventDecodeError::UnknownChannel(channel.to_string()))?;
        let decoded = match channel {
            Channel::Critical => serde_json::from_value(payload).map(Self::Critical),
            Channel::Window => serde_json::from_value(payload).map(Self::Window),
        };
        decoded.map_err(|source| EventDecodeError::Payload { channel, source })
    }

    /// Encodes the message into its `(channel, payload)` wire pair.
    ///
    /// # Errors
    ///
    /// Fails only if a payload contains values JSON cannot represent.
    pub fn encode(&self) -> Result<(Channel, Value), serde_json::Error> {
        let payload = match self {
            Self::Critical(event) => serde_json::to_value(event)?,
            Self::Window(event) => serde_json::to_value(event)?,
        };
        Ok((self.channel(), payload))
    }
}

impl From<CriticalWindowEvent> for BusMessage {
    fn from(event: CriticalWindowEvent) -> Self {
        Self::Critical(event)
    }
}

impl From<WindowEvent> for BusMessage {
    fn from(event: WindowEvent) -> Self {
        Self::Window(event)
    }
}

/// Errors decoding a raw channel message.
#[derive(Debug, Error)]
pub enum EventDecodeError {
    /// The channel name is neither critical nor window.
    #[error("unknown event channel `{0}`")]
    UnknownChannel(String),
    /// The payload is not a valid event for the channel.
    #[error("invalid {} payload: {source}", .channel.name())]
    Payload {
        /// Channel the payload arrived on.
        channel: Channel,
        /// Underlying parse failure.
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn critical_events_use_wire_tags() {
        let (channel, payload) = BusMessage::from(CriticalWindowEvent::WindowAcquireFocus {
            app: Some(AppName::from("finance")),
        })
        .encode()
        .expect("encode");

        assert_eq!(channel, Channel::Critical);
        assert_eq!(
            payload,
            json!({ "type": "windowAquireFocus", "data": { "app": "finance" } })
        );
    }

    #[test]
    fn decode_routes_by_channel_name() {
        let message = BusMessage::decode(
            "criticalWindowEvent",
            json!({ "type": "windowClose", "data": { "app": "welfare" } }),
        )
        .expect("decode");
        assert_eq!(
            message,
            BusMessage::Critical(CriticalWindowEvent::WindowClose {
                app: AppName::from("welfare"),
            })
        );

        let message = BusMessage::decode(
            "windowEvent",
            json!({
                "type": "windowResize",
                "data": { "app": "email", "size": { "width": 640, "height": 480 } }
            }),
        )
        .expect("decode");
        assert_eq!(
            message,
            BusMessage::Window(WindowEvent::WindowResize {
                app: AppName::from("email"),
                size: Size::new(640, 480),
            })
        );
    }

    #[test]
    fn decode_rejects_tag_from_the_other_channel() {
        let err = BusMessage::decode(
            "windowEvent",
            json!({ "type": "windowClose", "data": { "app": "finance" } }),
        )
        .expect_err("critical tag on window channel");
        assert!(matches!(
            err,
            EventDecodeError::Payload {
                channel: Channel::Window,
                ..
            }
        ));

        let err = BusMessage::decode("desktopEvent", Value::Null).expect_err("unknown channel");
        assert!(matches!(err, EventDecodeError::UnknownChannel(name) if name == "desktopEvent"));
    }

    #[test]
    fn notification_draft_accepts_minimal_payload() {
        let draft: NotificationDraft = serde_json::from_value(json!({
            "app": "finance",
            "header": "An error occurred",
            "content": "boom",
            "severity": "error",
        }))
        .expect("draft");

        assert_eq!(draft.severity, Severity::Error);
        assert_eq!(draft.action, NotificationAction::Nothing);
        assert_eq!(draft.action_title, None);
    }

    #[test]
    fn app_kind_names_and_backend_ids() {
        assert_eq!(AppKind::from_name("healthcare"), Some(AppKind::Healthcare));
        assert_eq!(AppKind::from_name("Healthcare"), None);
        assert_eq!(AppKind::Business.backend_app_id(), Some(4));
        assert_eq!(AppKind::Email.backend_app_id(), None);
        assert_eq!(AppName::from(AppKind::Welfare).kind(), Some(AppKind::Welfare));
        assert_eq!(AppKind::from_backend_app_id(2), Some(AppKind::Healthcare));
        assert_eq!(AppKind::from_backend_app_id(0), None);
        assert_eq!(AppKind::from_backend_app_id(5), None);
    }

    #[test]
    fn notification_action_reads_names_and_indices() {
        let read = |value: Value| serde_json::from_value::<NotificationAction>(value);

        assert_eq!(read(json!(0)).expect("index"), NotificationAction::OpenApp);
        assert_eq!(read(json!(1)).expect("index"), NotificationAction::Nothing);
        assert_eq!(read(json!("openApp")).expect("name"), NotificationAction::OpenApp);
        assert!(read(json!(2)).is_err());
        assert!(read(json!("open")).is_err());
        assert_eq!(
            serde_json::to_value(NotificationAction::OpenApp).expect("encode"),
            json!("openApp")
        );
    }

    #[test]
    fn backend_update_push_decodes_on_the_window_channel() {
        let message = BusMessage::decode(
            "windowEvent",
            json!({
                "type": "appUpdate",
                "data": { "app_id": 4, "update_type": "day", "data": { "business_count": 7 } },
            }),
        )
        .expect("decode");

        let BusMessage::Window(WindowEvent::AppUpdate(envelope)) = message else {
            panic!("expected an app update");
        };
        assert_eq!(envelope.app_id, 4);
        assert_eq!(envelope.update_type, Granularity::Day);
    }
}
