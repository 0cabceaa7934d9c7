//! Named routes and URL building.
//!
//! [`Router`] is the seam the wizard builds URLs through. [`RouteTable`] is
//! the default implementation: a map from route name to a path pattern with
//! `{param}` placeholders.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::navigation::{NavigationTarget, EDIT_LISTING_PAGE};
use crate::types::{ListingPageType, PathParams};

/// Default pattern of the edit-listing page.
pub const DEFAULT_EDIT_LISTING_ROUTE: &str = "/l/{slug}/{type}/{id}/{tab}";

const ROUTE_PARAMS: [&str; 4] = ["slug", "id", "type", "tab"];

/// Builds concrete URLs for named routes.
pub trait Router: Send + Sync {
    fn build_path(&self, route_name: &str, params: &PathParams) -> Result<String, CoreError>;

    fn resolve(&self, target: &NavigationTarget) -> Result<String, CoreError> {
        self.build_path(target.route_name, &target.path_params)
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// A table containing only the edit-listing page with `pattern`.
    pub fn new(edit_listing_pattern: impl Into<String>) -> Result<Self, CoreError> {
        Self::empty().with_route(EDIT_LISTING_PAGE, edit_listing_pattern)
    }

    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Register a route. The pattern must be absolute and may only use the
    /// `slug`, `id`, `type` and `tab` placeholders. The edit-listing page
    /// must use all four, so its URLs can be matched back into params.
    pub fn with_route(
        mut self,
        name: impl Into<String>,
        pattern: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let name = name.into();
        let pattern = pattern.into();
        if !pattern.starts_with('/') {
            return Err(CoreError::Config(format!(
                "Route '{name}' pattern must start with '/': {pattern}"
            )));
        }
        let mut used = Vec::with_capacity(ROUTE_PARAMS.len());
        for segment in segments(&pattern) {
            if let Some(param) = placeholder(segment) {
                if !ROUTE_PARAMS.iter().any(|known| *known == param) {
                    return Err(CoreError::Config(format!(
                        "Route '{name}' uses unknown parameter '{{{param}}}'"
                    )));
                }
                if used.contains(&param) {
                    return Err(CoreError::Config(format!(
                        "Route '{name}' uses '{{{param}}}' more than once"
                    )));
                }
                used.push(param);
            }
        }
        if name == EDIT_LISTING_PAGE {
            if let Some(missing) = ROUTE_PARAMS.iter().find(|p| !used.contains(*p)) {
                return Err(CoreError::Config(format!(
                    "Route '{name}' must include '{{{missing}}}': {pattern}"
                )));
            }
        }
        self.routes.insert(name, pattern);
        Ok(self)
    }

    /// Match `url` against the registered routes and recover its path params.
    ///
    /// Query string and fragment are ignored.
    pub fn match_path(&self, url: &str) -> Option<(&str, PathParams)> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let url_segments: Vec<&str> = segments(path).collect();

        self.routes.iter().find_map(|(name, pattern)| {
            let pattern_segments: Vec<&str> = segments(pattern).collect();
            if pattern_segments.len() != url_segments.len() {
                return None;
            }

            let mut values: HashMap<&str, String> = HashMap::new();
            for (expected, actual) in pattern_segments.iter().zip(&url_segments) {
                match placeholder(expected) {
                    Some(param) => {
                        let decoded = urlencoding::decode(actual).ok()?;
                        values.insert(param, decoded.into_owned());
                    }
                    None if expected == actual => {}
                    None => return None,
                }
            }

            let params = PathParams {
                slug: values.remove("slug")?,
                id: values.remove("id")?,
                page_type: ListingPageType::from_param(&values.remove("type")?),
                tab: values.remove("tab")?,
            };
            Some((name.as_str(), params))
        })
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        let mut routes = HashMap::new();
        routes.insert(
            EDIT_LISTING_PAGE.to_string(),
            DEFAULT_EDIT_LISTING_ROUTE.to_string(),
        );
        Self { routes }
    }
}

impl Router for RouteTable {
    fn build_path(&self, route_name: &str, params: &PathParams) -> Result<String, CoreError> {
        let pattern = self.routes.get(route_name).ok_or_else(|| CoreError::NotFound {
            entity: "route",
            id: route_name.to_string(),
        })?;

        let mut path = String::with_capacity(pattern.len() + params.id.len());
        for segment in segments(pattern) {
            path.push('/');
            match placeholder(segment) {
                Some(param) => {
                    let value = match param {
                        "slug" => params.slug.as_str(),
                        "id" => params.id.as_str(),
                        "type" => params.page_type.as_str(),
                        "tab" => params.tab.as_str(),
                        other => {
                            return Err(CoreError::Internal(format!(
                                "Route '{route_name}' has unknown parameter '{other}'"
                            )))
                        }
                    };
                    if value.is_empty() {
                        return Err(CoreError::Validation(format!(
                            "Route '{route_name}' requires a non-empty '{param}'"
                        )));
                    }
                    path.push_str(&urlencoding::encode(value));
                }
                None => path.push_str(segment),
            }
        }
        Ok(path)
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn placeholder(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
