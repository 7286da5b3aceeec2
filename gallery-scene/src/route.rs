//! Location-based navigation state.
//!
//! The selected frame lives in the location path: `/` selects nothing and
//! `/item/<id>` selects the frame named `<id>`. The router keeps a
//! browser-style history so the viewer can step back and forward.

use crate::identity::FrameId;
use std::fmt;
use tracing::debug;

const ITEM_PREFIX: &str = "/item/";

/// A parsed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`: overview, nothing selected.
    Root,
    /// `/item/<id>`: a frame is selected.
    Item(String),
    /// Any other path. Treated as no selection.
    Other(String),
}

impl Route {
    /// Parse a location path.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() || path == "/" {
            return Route::Root;
        }
        if let Some(rest) = path.strip_prefix(ITEM_PREFIX) {
            let segment = rest.strip_suffix('/').unwrap_or(rest);
            if !segment.is_empty() && !segment.contains('/') {
                return Route::Item(segment.to_string());
            }
        }
        Route::Other(path.to_string())
    }

    /// Route selecting the given frame.
    pub fn item(id: &FrameId) -> Self {
        Route::Item(id.to_string())
    }

    /// The selected identifier, if this route selects one.
    pub fn selected(&self) -> Option<&str> {
        match self {
            Route::Item(id) => Some(id),
            Route::Root | Route::Other(_) => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Root => f.write_str("/"),
            Route::Item(id) => write!(f, "{ITEM_PREFIX}{id}"),
            Route::Other(path) => f.write_str(path),
        }
    }
}

/// Navigation history with a cursor, like a browser tab.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Route>,
    cursor: usize,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            history: vec![initial],
            cursor: 0,
        }
    }

    /// Current route.
    pub fn current(&self) -> &Route {
        &self.history[self.cursor]
    }

    /// Identifier selected by the current route.
    pub fn selected(&self) -> Option<&str> {
        self.current().selected()
    }

    /// Navigate to `route`. Forward history is discarded. Navigating to the
    /// current route is a no-op.
    pub fn navigate(&mut self, route: Route) {
        if *self.current() == route {
            return;
        }
        debug!(from = %self.current(), to = %route, "navigate");
        self.history.truncate(self.cursor + 1);
        self.history.push(route);
        self.cursor += 1;
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        debug!(to = %self.current(), "back");
        true
    }

    /// Step forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if self.cursor + 1 >= self.history.len() {
            return false;
        }
        self.cursor += 1;
        debug!(to = %self.current(), "forward");
        true
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::Root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse(""), Route::Root);
        assert_eq!(Route::parse("/item/abc"), Route::Item("abc".into()));
        assert_eq!(Route::parse("/item/abc/"), Route::Item("abc".into()));
        assert_eq!(Route::parse("/item/"), Route::Other("/item/".into()));
        assert_eq!(Route::parse("/item/a/b"), Route::Other("/item/a/b".into()));
        assert_eq!(Route::parse("/about"), Route::Other("/about".into()));
    }

    #[test]
    fn test_display_matches_parse() {
        let id = FrameId::from_source("a.jpg");
        let route = Route::item(&id);
        assert_eq!(route.to_string(), format!("/item/{id}"));
        assert_eq!(Route::parse(&route.to_string()), route);
        assert_eq!(Route::Root.to_string(), "/");
    }

    #[test]
    fn test_only_item_routes_select() {
        assert_eq!(Route::Item("x".into()).selected(), Some("x"));
        assert_eq!(Route::Root.selected(), None);
        assert_eq!(Route::Other("/x".into()).selected(), None);
    }

    #[test]
    fn test_history_back_and_forward() {
        let mut router = Router::default();
        router.navigate(Route::Item("a".into()));
        router.navigate(Route::Item("b".into()));
        assert_eq!(router.selected(), Some("b"));

        assert!(router.back());
        assert_eq!(router.selected(), Some("a"));
        assert!(router.back());
        assert_eq!(router.current(), &Route::Root);
        assert!(!router.back());

        assert!(router.forward());
        assert_eq!(router.selected(), Some("a"));

        // navigating drops the forward entry
        router.navigate(Route::Item("c".into()));
        assert!(!router.forward());
        assert!(router.back());
        assert_eq!(router.selected(), Some("a"));
    }

    #[test]
    fn test_navigate_to_current_is_noop() {
        let mut router = Router::default();
        router.navigate(Route::Root);
        assert!(!router.back());
    }
}
