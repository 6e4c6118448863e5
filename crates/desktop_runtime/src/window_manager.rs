//! App registry: the window-manager state machine over registered apps and desktop focus.
//!
//! Every mutation goes through [`AppRegistry::set_app_state`], which logs and skips unknown app
//! names instead of failing. Focus is a single registry-wide pointer.

use desktop_app_contract::{AppName, Placement, Pos, Size};

use crate::model::{AppDescriptor, AppState};

#[derive(Debug, Clone, Default, PartialEq)]
/// Registered apps in registration order, plus the focused app.
pub struct AppRegistry {
    apps: Vec<AppState>,
    focused_app: Option<AppName>,
}

impl AppRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `descriptor` closed, restored and without badges.
    ///
    /// Registering a name twice is a no-op; returns `true` only when the app was inserted.
    pub fn register_app(&mut self, descriptor: AppDescriptor) -> bool {
        if self.get(descriptor.name.as_str()).is_some() {
            return false;
        }
        let index = self.apps.len();
        self.apps.push(AppState::from_descriptor(descriptor, index));
        true
    }

    /// Applies `update` to the app called `name`.
    ///
    /// Returns `false` (after logging) when no such app is registered.
    pub fn set_app_state(&mut self, name: &str, update: impl FnOnce(&mut AppState)) -> bool {
        match self.apps.iter_mut().find(|app| app.name == name) {
            Some(app) => {
                update(app);
                true
            }
            None => {
                tracing::error!(app = name, "App {name} not found");
                false
            }
        }
    }

    /// Opens, restores and focuses `name`, clearing its badge.
    pub fn open_app(&mut self, name: &str) {
        if self.set_app_state(name, |app| {
            app.opened = true;
            app.minimized = false;
            app.badge_count = 0;
        }) {
            self.focused_app = Some(AppName::new(name));
        }
    }

    /// Closes `name`, dropping focus if it held it. Geometry and `minimized` are kept.
    pub fn close_app(&mut self, name: &str) {
        self.set_app_state(name, |app| app.opened = false);
        if self.is_focused(name) {
            self.focused_app = None;
        }
    }

    /// Minimizes `name` without touching focus.
    pub fn hide(&mut self, name: &str) {
        self.set_app_state(name, |app| app.minimized = true);
    }

    /// Restores `name` from minimized without focusing it.
    pub fn show(&mut self, name: &str) {
        self.set_app_state(name, |app| app.minimized = false);
    }

    /// Moves desktop focus to `name`, or clears it for `None`.
    ///
    /// Focus requests for unregistered apps are logged and ignored.
    pub fn acquire_focus(&mut self, name: Option<&str>) {
        match name {
            None => self.focused_app = None,
            Some(name) if self.get(name).is_some() => self.focused_app = Some(AppName::new(name)),
            Some(name) => tracing::warn!(app = name, "ignoring focus request for unknown app"),
        }
    }

    /// Replaces the window size of `name`.
    pub fn resize(&mut self, name: &str, size: Size) {
        self.set_app_state(name, |app| app.window.size = size);
    }

    /// Moves the window of `name`.
    pub fn move_to(&mut self, name: &str, pos: Pos) {
        self.set_app_state(name, |app| app.window.pos = pos);
    }

    /// Moves and resizes the window of `name` in one step.
    pub fn place(&mut self, name: &str, placement: Placement) {
        self.set_app_state(name, |app| {
            app.window.pos = placement.pos;
            app.window.size = placement.size;
        });
    }

    /// Sets the maximized flag of the window of `name`.
    pub fn set_maximized(&mut self, name: &str, maximized: bool) {
        self.set_app_state(name, |app| app.window.size.maximized = Some(maximized));
    }

    /// Flips the maximized flag of the window of `name`.
    pub fn toggle_maximized(&mut self, name: &str) {
        self.set_app_state(name, |app| {
            let maximized = app.window.size.maximized.unwrap_or(false);
            app.window.size.maximized = Some(!maximized);
        });
    }

    /// Adds one pending item to the badge of `name`.
    pub fn increment_badge(&mut self, name: &str) {
        self.set_app_state(name, |app| app.badge_count = app.badge_count.saturating_add(1));
    }

    /// Bumps the badge of `name` unless the user is already looking at it.
    ///
    /// Unregistered names are skipped silently; returns `true` when the badge changed.
    pub fn note_pending(&mut self, name: &str) -> bool {
        if self.get(name).is_none() || (self.is_visible(name) && self.is_focused(name)) {
            return false;
        }
        self.increment_badge(name);
        true
    }

    /// Returns the app called `name`.
    pub fn get(&self, name: &str) -> Option<&AppState> {
        self.apps.iter().find(|app| app.name == name)
    }

    /// Returns all apps in registration order.
    pub fn apps(&self) -> &[AppState] {
        &self.apps
    }

    /// Returns the focused app, if any.
    pub fn focused_app(&self) -> Option<&AppName> {
        self.focused_app.as_ref()
    }

    /// Returns `true` when `name` holds desktop focus.
    pub fn is_focused(&self, name: &str) -> bool {
        self.focused_app.as_ref().is_some_and(|focused| focused == name)
    }

    /// Returns `true` when `name` is open and not minimized.
    pub fn is_visible(&self, name: &str) -> bool {
        self.get(name).is_some_and(AppState::is_visible)
    }

    /// Iterates open, non-minimized apps in registration order.
    pub fn visible_apps(&self) -> impl Iterator<Item = &AppState> {
        self.apps.iter().filter(|app| app.is_visible())
    }

    /// Number of registered apps.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }
}
