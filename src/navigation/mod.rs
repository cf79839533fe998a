//! Client-side routing: the `/` overview and `/item/<id>` detail routes.
//!
//! The [`Router`] is the single shared source of navigation state. Consumers
//! never hold on to it between frames; each tick takes one
//! [`Router::active_id`] snapshot and hands the same value to every frame and
//! to the camera rig, so all of them agree on which portal is active.

use std::fmt;

/// Path prefix of the detail route.
const ITEM_PREFIX: &str = "/item/";

/// A parsed location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// `/`: no portal active.
    #[default]
    Overview,
    /// `/item/<id>`: portal `id` focused. The id is not checked against the
    /// gallery; an unknown id simply matches no portal.
    Item(String),
}

impl Route {
    /// Parse a path. Anything that is not a non-empty `/item/<id>` route
    /// (including query strings and trailing slashes around the id) resolves
    /// to [`Route::Overview`].
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.strip_prefix(ITEM_PREFIX) {
            Some(rest) => {
                let id = rest.trim_end_matches('/');
                if id.is_empty() || id.contains('/') {
                    Self::Overview
                } else {
                    Self::Item(id.to_owned())
                }
            }
            None => Self::Overview,
        }
    }

    /// Route focusing the portal with the given id.
    #[must_use]
    pub fn item(id: impl Into<String>) -> Self {
        Self::Item(id.into())
    }

    /// The id of the active portal, if any.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        match self {
            Self::Overview => None,
            Self::Item(id) => Some(id),
        }
    }

    /// The canonical path for this route.
    #[must_use]
    pub fn to_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overview => f.write_str("/"),
            Self::Item(id) => write!(f, "{ITEM_PREFIX}{id}"),
        }
    }
}

/// Owner of the current location.
///
/// Written only by navigation events ([`Router::navigate`],
/// [`Router::go_home`]); read once per frame.
#[derive(Debug, Default)]
pub struct Router {
    current: Route,
    /// Bumped on every change so observers can detect transitions cheaply.
    generation: u64,
}

impl Router {
    /// Router starting on the overview route.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Router starting at `path`.
    #[must_use]
    pub fn at(path: &str) -> Self {
        Self {
            current: Route::parse(path),
            generation: 0,
        }
    }

    /// Current route.
    #[must_use]
    pub fn route(&self) -> &Route {
        &self.current
    }

    /// Id of the active portal, if the current route is a detail route.
    #[must_use]
    pub fn active_id(&self) -> Option<&str> {
        self.current.active_id()
    }

    /// Number of route changes so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Navigate to a path. Returns `true` if the route changed.
    pub fn navigate(&mut self, path: &str) -> bool {
        self.set(Route::parse(path))
    }

    /// Navigate to an already-parsed route. Returns `true` if it changed.
    pub fn set(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        log::debug!("navigate {} -> {}", self.current, route);
        self.current = route;
        self.generation += 1;
        true
    }

    /// Return to the overview route.
    pub fn go_home(&mut self) -> bool {
        self.set(Route::Overview)
    }

    /// Text of the on-screen navigation hint for the current route.
    #[must_use]
    pub fn hint(&self) -> &'static str {
        match self.current {
            Route::Overview => "double click to enter portal",
            Route::Item(_) => "< back",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_routes() {
        assert_eq!(Route::parse("/"), Route::Overview);
        assert_eq!(Route::parse(""), Route::Overview);
        assert_eq!(Route::parse("/item/02"), Route::item("02"));
        assert_eq!(Route::parse("/item/02/"), Route::item("02"));
        assert_eq!(Route::parse("/item/02?x=1"), Route::item("02"));
    }

    #[test]
    fn malformed_item_routes_fall_back_to_overview() {
        assert_eq!(Route::parse("/item/"), Route::Overview);
        assert_eq!(Route::parse("/item/a/b"), Route::Overview);
        assert_eq!(Route::parse("/items/02"), Route::Overview);
    }

    #[test]
    fn path_round_trip() {
        for path in ["/", "/item/01", "/item/99"] {
            assert_eq!(Route::parse(path).to_path(), path);
        }
    }

    #[test]
    fn navigate_reports_changes() {
        let mut router = Router::new();
        assert_eq!(router.active_id(), None);
        assert!(router.navigate("/item/03"));
        assert!(!router.navigate("/item/03"));
        assert_eq!(router.active_id(), Some("03"));
        assert_eq!(router.generation(), 1);
        assert!(router.go_home());
        assert_eq!(router.active_id(), None);
        assert_eq!(router.generation(), 2);
    }

    #[test]
    fn hint_follows_route() {
        let mut router = Router::at("/item/01");
        assert_eq!(router.hint(), "< back");
        let _ = router.go_home();
        assert_eq!(router.hint(), "double click to enter portal");
    }
}
