//! Responsive layout state: mobile sidebar, menu button and drop-zone highlight

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub viewport_width: u32,
    pub breakpoint: u32,
    /// Sidebar slid in on narrow screens
    pub sidebar_open: bool,
    /// Menu button in the header; decided once at startup
    pub mobile_menu_button: bool,
    /// Drop zone is highlighted while files are dragged over it
    pub drop_zone_highlighted: bool,
}

impl Layout {
    pub fn new(viewport_width: u32, breakpoint: u32) -> Self {
        Self {
            viewport_width,
            breakpoint,
            sidebar_open: false,
            mobile_menu_button: viewport_width <= breakpoint,
            drop_zone_highlighted: false,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport_width <= self.breakpoint
    }

    /// Flip the sidebar. Returns the new state.
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    /// Apply a viewport resize; growing past the breakpoint closes the sidebar
    pub fn resize(&mut self, width: u32) {
        self.viewport_width = width;
        if width > self.breakpoint {
            self.sidebar_open = false;
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(1280, 768)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_button_decided_at_startup() {
        assert!(Layout::new(640, 768).mobile_menu_button);
        assert!(Layout::new(768, 768).mobile_menu_button);
        assert!(!Layout::new(1024, 768).mobile_menu_button);

        let mut wide = Layout::new(1024, 768);
        wide.resize(500);
        assert!(!wide.mobile_menu_button);
        assert!(wide.is_mobile());
    }

    #[test]
    fn test_resize_closes_sidebar() {
        let mut layout = Layout::new(600, 768);
        assert!(layout.toggle_sidebar());

        layout.resize(700);
        assert!(layout.sidebar_open);

        layout.resize(900);
        assert!(!layout.sidebar_open);
    }
}
