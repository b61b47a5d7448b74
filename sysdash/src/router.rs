//! Page routing by target marker.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    Firewall,
    Settings,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Dashboard, Page::Firewall, Page::Settings];

    /// Target marker carried by the nav element for this page.
    pub fn marker(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Firewall => "firewall",
            Page::Settings => "settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Firewall => "Firewall",
            Page::Settings => "Settings",
        }
    }

    /// Body text for pages that have no content yet.
    pub fn placeholder(self) -> Option<&'static str> {
        match self {
            Page::Dashboard => None,
            Page::Firewall => Some("Page with firewall logic is under development"),
            Page::Settings => Some("Page for settings is under development."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Render(Page),
    RedirectRoot,
}

pub fn route(marker: Option<&str>) -> Route {
    match marker {
        Some("dashboard") => Route::Render(Page::Dashboard),
        Some("firewall") => Route::Render(Page::Firewall),
        Some("settings") => Route::Render(Page::Settings),
        _ => Route::RedirectRoot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_markers_render_their_page() {
        for page in Page::ALL {
            assert_eq!(route(Some(page.marker())), Route::Render(page));
        }
    }

    #[test]
    fn unknown_or_missing_marker_redirects() {
        assert_eq!(route(None), Route::RedirectRoot);
        assert_eq!(route(Some("unknown")), Route::RedirectRoot);
        assert_eq!(route(Some("")), Route::RedirectRoot);
        assert_eq!(route(Some("Dashboard")), Route::RedirectRoot);
    }
}
