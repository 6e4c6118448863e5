//! Desktop runtime state model: app descriptors, per-app window state, and user preferences.

use desktop_app_contract::{AppName, Placement, Pos, Size};
use serde::{Deserialize, Serialize};

use crate::{
    advisor_mail::AdvisorDesk, app_data::AppDataStore, emails::EmailInbox,
    notifications::NotificationQueue, window_manager::AppRegistry,
};

/// Default left/top of a freshly registered app window.
pub const DEFAULT_WINDOW_POS: Pos = Pos { x: 100, y: 50 };
/// Default width of a freshly registered app window.
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
/// Default height of a freshly registered app window.
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;
/// Smallest width a window may be resized to.
pub const MIN_WINDOW_WIDTH: i32 = 300;
/// Smallest height a window may be resized to.
pub const MIN_WINDOW_HEIGHT: i32 = 200;
/// Height of a window's title bar.
pub const WINDOW_HEADER_HEIGHT: i32 = 20;
/// Thickness of the window resize handles.
pub const RESIZE_BAR_SIZE: i32 = 5;
/// Width of the notification panel.
pub const NOTIFICATIONS_WINDOW_WIDTH: i32 = 400;
/// Height of the notification panel.
pub const NOTIFICATIONS_WINDOW_HEIGHT: i32 = 200;
/// Height of a notification card header.
pub const NOTIFICATION_HEADER_HEIGHT: i32 = 30;
/// Inner padding of a notification card.
pub const NOTIFICATION_PADDING: i32 = 16;
/// How long a fresh notification stays on screen as a toast.
pub const DEFAULT_NOTIFICATION_DISPLAY_MS: u64 = 5_000;
/// Player name used until a save provides one.
pub const DEFAULT_USERNAME: &str = "Minister";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
/// Opaque key a renderer resolves to an app's (or tab's) view.
pub struct ContentRef(String);

impl ContentRef {
    /// Creates a content key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Named sub-view inside an app window.
pub struct TabDescriptor {
    /// Tab label.
    pub name: String,
    /// Tab body.
    pub content: ContentRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Title and geometry of an app window.
pub struct WindowGeometry {
    /// Title bar text.
    pub title: String,
    /// Top-left corner.
    pub pos: Pos,
    /// Current size.
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Static description of an app handed to [`AppRegistry::register_app`].
pub struct AppDescriptor {
    /// Unique registry key.
    pub name: AppName,
    /// Main view.
    pub content: ContentRef,
    /// Tabs, in display order.
    #[serde(default)]
    pub tabs: Vec<TabDescriptor>,
    /// Initial window geometry.
    pub window: WindowGeometry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Registered app together with its live window flags.
pub struct AppState {
    /// Unique registry key.
    pub name: AppName,
    /// Main view.
    pub content: ContentRef,
    /// Tabs, in display order.
    pub tabs: Vec<TabDescriptor>,
    /// Current window geometry.
    pub window: WindowGeometry,
    /// Registration position; stable for the registry's lifetime.
    pub index: usize,
    /// Whether the window is open.
    pub opened: bool,
    /// Whether the open window is minimized.
    pub minimized: bool,
    /// Pending items the user has not looked at yet.
    pub badge_count: u32,
}

impl AppState {
    pub(crate) fn from_descriptor(descriptor: AppDescriptor, index: usize) -> Self {
        Self {
            name: descriptor.name,
            content: descriptor.content,
            tabs: descriptor.tabs,
            window: descriptor.window,
            index,
            opened: false,
            minimized: false,
            badge_count: 0,
        }
    }

    /// Returns `true` when the window is open and not minimized.
    pub fn is_visible(&self) -> bool {
        self.opened && !self.minimized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Pixel metrics renderers use to lay out windows and the notification panel.
pub struct DesktopLayout {
    /// Minimum window size.
    pub min_window: Size,
    /// Window title bar height.
    pub window_header_height: i32,
    /// Resize handle thickness.
    pub resize_bar_size: i32,
    /// Notification panel size.
    pub notification_panel: Size,
    /// Notification card header height.
    pub notification_header_height: i32,
    /// Notification card padding.
    pub notification_padding: i32,
}

impl Default for DesktopLayout {
    fn default() -> Self {
        Self {
            min_window: Size::new(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT),
            window_header_height: WINDOW_HEADER_HEIGHT,
            resize_bar_size: RESIZE_BAR_SIZE,
            notification_panel: Size::new(NOTIFICATIONS_WINDOW_WIDTH, NOTIFICATIONS_WINDOW_HEIGHT),
            notification_header_height: NOTIFICATION_HEADER_HEIGHT,
            notification_padding: NOTIFICATION_PADDING,
        }
    }
}

impl DesktopLayout {
    /// Clamps `size` so it never drops below [`Self::min_window`].
    pub fn clamp_window_size(&self, size: Size) -> Size {
        Size {
            width: size.width.max(self.min_window.width),
            height: size.height.max(self.min_window.height),
            maximized: size.maximized,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Desktop configuration loaded once at startup.
pub struct DesktopPreferences {
    /// Player name used by advisor mail.
    pub username: String,
    /// How long a new notification is shown as a toast.
    pub notification_display_ms: u64,
    /// Debug switch keeping every notification on screen.
    pub keep_notifications_displayed: bool,
    /// Geometry given to apps from the default catalog.
    pub default_window: Placement,
    /// Renderer layout metrics.
    pub layout: DesktopLayout,
}

impl Default for DesktopPreferences {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            notification_display_ms: DEFAULT_NOTIFICATION_DISPLAY_MS,
            keep_notifications_displayed: false,
            default_window: Placement {
                pos: DEFAULT_WINDOW_POS,
                size: Size::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
            },
            layout: DesktopLayout::default(),
        }
    }
}

impl DesktopPreferences {
    /// Parses preferences from a JSON blob; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when `raw` is not valid JSON or a present key has the wrong type.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Everything the desktop shell owns, created once by the composition root.
pub struct DesktopState {
    /// Registered apps and focus.
    pub registry: AppRegistry,
    /// Posted notifications.
    pub notifications: NotificationQueue,
    /// Received advisor mail.
    pub emails: EmailInbox,
    /// Latest view data per data-bearing app.
    pub app_data: AppDataStore,
    /// Conditions the advisors already mailed about.
    pub advisors: AdvisorDesk,
    /// Startup configuration.
    pub preferences: DesktopPreferences,
}

impl DesktopState {
    /// Creates an empty desktop using `preferences`.
    pub fn new(preferences: DesktopPreferences) -> Self {
        Self {
            preferences,
            ..Self::default()
        }
    }
}
