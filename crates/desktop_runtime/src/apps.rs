//! Built-in app catalog registered on desktop start.

use desktop_app_contract::{AppKind, AppName, Placement};

use crate::{
    model::{AppDescriptor, ContentRef, DesktopPreferences, TabDescriptor, WindowGeometry},
    window_manager::AppRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Static catalog row for one built-in app.
pub struct CatalogEntry {
    /// App kind.
    pub kind: AppKind,
    /// Tab labels, in display order.
    pub tabs: &'static [&'static str],
}

const APP_CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        kind: AppKind::Finance,
        tabs: &["Overview", "Budgets"],
    },
    CatalogEntry {
        kind: AppKind::Business,
        tabs: &["Overview", "Rules"],
    },
    CatalogEntry {
        kind: AppKind::Email,
        tabs: &[],
    },
    CatalogEntry {
        kind: AppKind::Healthcare,
        tabs: &["Overview", "Capacity", "Rules"],
    },
    CatalogEntry {
        kind: AppKind::Welfare,
        tabs: &["Overview", "Rules"],
    },
];

/// Built-in apps in desktop display order.
pub fn app_catalog() -> &'static [CatalogEntry] {
    &APP_CATALOG
}

/// Catalog row of `kind`.
pub fn catalog_entry(kind: AppKind) -> Option<&'static CatalogEntry> {
    APP_CATALOG.iter().find(|entry| entry.kind == kind)
}

/// Builds the registry descriptor of `kind` with its window at `placement`.
pub fn default_descriptor(kind: AppKind, placement: Placement) -> AppDescriptor {
    let name = kind.name();
    AppDescriptor {
        name: AppName::from(kind),
        content: ContentRef::new(name),
        tabs: catalog_entry(kind)
            .map_or(&[][..], |entry| entry.tabs)
            .iter()
            .map(|tab| TabDescriptor {
                name: (*tab).to_string(),
                content: ContentRef::new(format!("{name}/{}", tab.to_lowercase())),
            })
            .collect(),
        window: WindowGeometry {
            title: kind.title().to_string(),
            pos: placement.pos,
            size: placement.size,
        },
    }
}

/// Registers every catalog app, in catalog order, at the preferred default geometry.
pub fn register_default_apps(registry: &mut AppRegistry, preferences: &DesktopPreferences) {
    for entry in app_catalog() {
        registry.register_app(default_descriptor(entry.kind, preferences.default_window));
    }
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{Pos, Size};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn catalog_covers_every_kind_once() {
        let mut kinds: Vec<AppKind> = app_catalog().iter().map(|entry| entry.kind).collect();
        kinds.sort();
        let mut all = AppKind::ALL.to_vec();
        all.sort();
        assert_eq!(kinds, all);
        for kind in AppKind::ALL {
            assert_eq!(catalog_entry(kind).map(|entry| entry.kind), Some(kind));
        }
    }

    #[test]
    fn default_apps_register_closed_at_default_geometry() {
        let mut registry = AppRegistry::new();
        register_default_apps(&mut registry, &DesktopPreferences::default());

        let names: Vec<&str> = registry.apps().iter().map(|app| app.name.as_str()).collect();
        assert_eq!(names, vec!["finance", "business", "email", "healthcare", "welfare"]);

        let healthcare = registry.get("healthcare").expect("healthcare");
        assert_eq!(healthcare.window.title, "Healthcare");
        assert_eq!(healthcare.window.pos, Pos { x: 100, y: 50 });
        assert_eq!(healthcare.window.size, Size::new(800, 600));
        assert_eq!(
            healthcare
                .tabs
                .iter()
                .map(|tab| tab.content.as_str())
                .collect::<Vec<_>>(),
            vec!["healthcare/overview", "healthcare/capacity", "healthcare/rules"]
        );
        assert!(!healthcare.opened);
        assert_eq!(registry.focused_app(), None);
    }

    #[test]
    fn registering_defaults_twice_is_harmless() {
        let mut registry = AppRegistry::new();
        let prefs = DesktopPreferences::default();
        register_default_apps(&mut registry, &prefs);
        registry.open_app("email");
        register_default_apps(&mut registry, &prefs);

        assert_eq!(registry.len(), 5);
        assert!(registry.get("email").expect("email").opened);
    }
}
