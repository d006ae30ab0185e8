//! Navigation state: active link highlighting and the mobile menu.

/// Where a navigation link is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKind {
    /// Top-level desktop link (`.nav-link`)
    Primary,
    /// Link inside a desktop dropdown (`.dropdown-link`)
    Dropdown,
    /// Mobile menu link (`.mobile-nav-link`)
    Mobile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub kind: NavKind,
    pub href: String,
    /// Index of the owning primary link, for dropdown entries
    pub parent: Option<usize>,
}

impl NavLink {
    pub fn primary(href: &str) -> Self {
        Self {
            kind: NavKind::Primary,
            href: href.to_string(),
            parent: None,
        }
    }

    pub fn dropdown(href: &str, parent: usize) -> Self {
        Self {
            kind: NavKind::Dropdown,
            href: href.to_string(),
            parent: Some(parent),
        }
    }

    pub fn mobile(href: &str) -> Self {
        Self {
            kind: NavKind::Mobile,
            href: href.to_string(),
            parent: None,
        }
    }
}

/// Compute the active flag of every link for the page at `current_path`.
///
/// Primary and mobile links match exactly or as a section prefix (the root
/// link only ever matches the root). Dropdown links match exactly and light
/// up their parent.
pub fn active_links(current_path: &str, links: &[NavLink]) -> Vec<bool> {
    let path = if current_path.ends_with('/') {
        current_path.to_string()
    } else {
        format!("{current_path}/")
    };

    let section_match = |href: &str| {
        href == path || (path != "/" && href != "/" && path.starts_with(href))
    };

    let mut active = vec![false; links.len()];
    for (i, link) in links.iter().enumerate() {
        match link.kind {
            NavKind::Primary | NavKind::Mobile => {
                if section_match(&link.href) {
                    active[i] = true;
                }
            }
            NavKind::Dropdown => {
                if link.href == path {
                    active[i] = true;
                    if let Some(parent) = link.parent.filter(|p| *p < links.len()) {
                        if links[parent].kind == NavKind::Primary {
                            active[parent] = true;
                        }
                    }
                }
            }
        }
    }
    active
}

/// Open/closed state of the mobile menu and the attributes it drives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MobileMenu {
    open: bool,
}

impl MobileMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Handle a key press; returns `true` when the menu was closed by it.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.open {
            self.open = false;
            return true;
        }
        false
    }

    /// Value of the toggle button's `aria-expanded`.
    pub fn aria_expanded(&self) -> &'static str {
        if self.open {
            "true"
        } else {
            "false"
        }
    }

    /// Value of the menu's `aria-hidden`.
    pub fn aria_hidden(&self) -> &'static str {
        if self.open {
            "false"
        } else {
            "true"
        }
    }

    /// Body `overflow` style: scrolling is locked while the menu is open.
    pub fn body_overflow(&self) -> &'static str {
        if self.open {
            "hidden"
        } else {
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_links() -> Vec<NavLink> {
        vec![
            NavLink::primary("/"),
            NavLink::primary("/services/"),
            NavLink::dropdown("/services/web-design/", 1),
            NavLink::dropdown("/services/cybersecurity/", 1),
            NavLink::primary("/resources/"),
            NavLink::mobile("/"),
            NavLink::mobile("/services/"),
        ]
    }

    // ==================== Active Link Tests ====================

    #[test]
    fn test_root_only_matches_root() {
        let active = active_links("/", &site_links());
        assert_eq!(active, vec![true, false, false, false, false, true, false]);
    }

    #[test]
    fn test_section_prefix_match() {
        let active = active_links("/resources/spf-dkim-dmarc-without-pain", &site_links());
        assert!(active[4]);
        assert!(!active[0]);
        assert!(!active[1]);
    }

    #[test]
    fn test_dropdown_exact_match_activates_parent() {
        let active = active_links("/services/web-design/", &site_links());
        assert!(active[2]);
        assert!(!active[3]);
        assert!(active[1]);
        assert!(active[6]);
        assert!(!active[5]);
    }

    #[test]
    fn test_dropdown_requires_exact_match() {
        let links = vec![
            NavLink::primary("/about-us/"),
            NavLink::dropdown("/services/web-design/", 0),
        ];
        let active = active_links("/services/web-design/portfolio/", &links);
        assert_eq!(active, vec![false, false]);
    }

    #[test]
    fn test_dropdown_with_invalid_parent_is_ignored() {
        let links = vec![NavLink::dropdown("/contact/", 7)];
        assert_eq!(active_links("/contact/", &links), vec![true]);
    }

    // ==================== Mobile Menu Tests ====================

    #[test]
    fn test_mobile_menu_starts_closed() {
        let menu = MobileMenu::default();
        assert!(!menu.is_open());
        assert_eq!(menu.aria_expanded(), "false");
        assert_eq!(menu.aria_hidden(), "true");
        assert_eq!(menu.body_overflow(), "");
    }

    #[test]
    fn test_mobile_menu_toggle_and_escape() {
        let mut menu = MobileMenu::default();
        menu.toggle();
        assert!(menu.is_open());
        assert_eq!(menu.aria_expanded(), "true");
        assert_eq!(menu.body_overflow(), "hidden");

        assert!(!menu.handle_key("Enter"));
        assert!(menu.handle_key("Escape"));
        assert!(!menu.is_open());
        assert!(!menu.handle_key("Escape"));
    }

    #[test]
    fn test_mobile_menu_close_on_link() {
        let mut menu = MobileMenu::default();
        menu.toggle();
        menu.close();
        assert_eq!(menu.aria_hidden(), "true");
    }
}
