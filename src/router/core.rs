//! Router core module - hot path for request routing.
//!
//! Routes are kept sorted by template precedence, so a lookup is a linear
//! scan that stops at the first (most specific) match.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use http::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::matcher::{ParamVec, UriMatchInfo, UriTemplateMatcher};
use crate::runtime_config::RuntimeConfig;

/// A route to register: method, URI template and the value handed back on
/// a match.
#[derive(Debug, Clone)]
pub struct Route<T> {
    pub method: Method,
    pub template: String,
    pub handler: T,
}

impl<T> Route<T> {
    pub fn new(method: Method, template: impl Into<String>, handler: T) -> Self {
        Self {
            method,
            template: template.into(),
            handler,
        }
    }
}

struct RouteEntry<T> {
    method: Method,
    matcher: UriTemplateMatcher,
    handler: Arc<T>,
}

/// Result of successfully matching a request path to a route
#[derive(Debug)]
pub struct RouteMatch<T> {
    /// Handler registered with the route
    pub handler: Arc<T>,
    /// Template of the matched route, base path included
    pub template: String,
    /// Captured values of the match
    pub info: Arc<UriMatchInfo>,
}

impl<T> Clone for RouteMatch<T> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            template: self.template.clone(),
            info: Arc::clone(&self.info),
        }
    }
}

impl<T> RouteMatch<T> {
    /// Get a path parameter by name
    ///
    /// Uses "last write wins" semantics: if duplicate parameter names exist
    /// at different path depths (e.g., `/org/{id}/team/{team_id}/user/{id}`),
    /// returns the last occurrence (the user id, not the org id).
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.info.get(name)
    }

    /// Captured parameters in template order.
    #[inline]
    #[must_use]
    pub fn path_params(&self) -> &ParamVec {
        self.info.values()
    }

    /// Convert path params to a HashMap
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.info.variable_values()
    }
}

/// Router that matches HTTP requests to handlers by URI template
///
/// Entries are ordered most specific first (longer literal text, then fewer
/// variables), so `/users/list` wins over `/users/{id}` for `/users/list`
/// regardless of registration order.
///
/// ```
/// use http::Method;
/// use uritemplate::router::{Route, Router};
///
/// let router = Router::new(vec![
///     Route::new(Method::GET, "/users/{id}", "show_user"),
///     Route::new(Method::GET, "/users/list", "list_users"),
/// ])
/// .unwrap();
///
/// let m = router.route(&Method::GET, "/users/list").unwrap();
/// assert_eq!(*m.handler, "list_users");
/// let m = router.route(&Method::GET, "/users/7").unwrap();
/// assert_eq!(m.get_path_param("id"), Some("7"));
/// ```
pub struct Router<T> {
    routes: Vec<RouteEntry<T>>,
    /// Template prefix for every route (e.g., `/api/v1`)
    base_path: Option<UriTemplateMatcher>,
    config: RuntimeConfig,
}

impl<T> Clone for Router<T> {
    fn clone(&self) -> Self {
        Self {
            routes: self
                .routes
                .iter()
                .map(|entry| RouteEntry {
                    method: entry.method.clone(),
                    matcher: entry.matcher.clone(),
                    handler: Arc::clone(&entry.handler),
                })
                .collect(),
            base_path: self.base_path.clone(),
            config: self.config,
        }
    }
}

impl<T> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.templates())
            .field("config", &self.config)
            .finish()
    }
}

impl<T> Router<T> {
    /// Create a router with configuration read from the environment.
    ///
    /// # Errors
    ///
    /// Returns the first template that fails to parse or compile.
    pub fn new(routes: Vec<Route<T>>) -> Result<Self> {
        Self::with_config(routes, RuntimeConfig::from_env())
    }

    /// Create a router with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the first template that fails to parse or compile.
    pub fn with_config(routes: Vec<Route<T>>, config: RuntimeConfig) -> Result<Self> {
        Self::build(None, routes, config)
    }

    /// Create a router whose templates are all nested under `base_path`.
    ///
    /// # Errors
    ///
    /// Returns the error of the base path or of the first route that fails
    /// to parse or compile once nested.
    pub fn with_base_path(
        base_path: &str,
        routes: Vec<Route<T>>,
        config: RuntimeConfig,
    ) -> Result<Self> {
        let base = UriTemplateMatcher::new(base_path)?;
        Self::build(Some(base), routes, config)
    }

    fn build(
        base_path: Option<UriTemplateMatcher>,
        routes: Vec<Route<T>>,
        config: RuntimeConfig,
    ) -> Result<Self> {
        let mut router = Self {
            routes: Vec::with_capacity(routes.len()),
            base_path,
            config,
        };
        for route in routes {
            router.push(route)?;
        }
        router.routes.sort_by(|a, b| a.matcher.cmp(&b.matcher));

        let routes_summary: Vec<String> = router
            .routes
            .iter()
            .take(10)
            .map(|entry| format!("{} {}", entry.method, entry.matcher))
            .collect();
        info!(
            routes_count = router.routes.len(),
            base_path = router.base_path.as_ref().map_or("", UriTemplateMatcher::template),
            routes_summary = ?routes_summary,
            slow_match_us = router.config.slow_match_threshold.as_micros(),
            "Routing table loaded"
        );
        Ok(router)
    }

    fn compile(&self, template: &str) -> Result<UriTemplateMatcher> {
        match &self.base_path {
            Some(base) => base.nest(template),
            None => UriTemplateMatcher::new(template),
        }
    }

    fn push(&mut self, route: Route<T>) -> Result<()> {
        let matcher = self.compile(&route.template)?;
        self.routes.push(RouteEntry {
            method: route.method,
            matcher,
            handler: Arc::new(route.handler),
        });
        Ok(())
    }

    /// Register one more route, keeping precedence order.
    ///
    /// A route equal in precedence to existing ones goes after them.
    ///
    /// # Errors
    ///
    /// Returns the parse or compile error of the template.
    pub fn insert(&mut self, route: Route<T>) -> Result<()> {
        let matcher = self.compile(&route.template)?;
        let at = self.routes.partition_point(|entry| entry.matcher <= matcher);
        debug!(
            method = %route.method,
            template = %matcher,
            position = at,
            "Route registered"
        );
        self.routes.insert(
            at,
            RouteEntry {
                method: route.method,
                matcher,
                handler: Arc::new(route.handler),
            },
        );
        Ok(())
    }

    /// Match a request to the most specific route for its method.
    ///
    /// Returns `None` when no route matches (a 404 for an HTTP server).
    #[must_use]
    pub fn route(&self, method: &Method, path: &str) -> Option<RouteMatch<T>> {
        debug!(method = %method, path = %path, "Route match attempt");

        let match_start = Instant::now();
        let result = self
            .routes
            .iter()
            .filter(|entry| entry.method == *method)
            .find_map(|entry| entry.matcher.match_uri(path).map(|info| (entry, info)));
        let match_duration = match_start.elapsed();

        if let Some((entry, info)) = result {
            if match_duration > self.config.slow_match_threshold {
                warn!(
                    method = %method,
                    path = %path,
                    route_pattern = %entry.matcher,
                    path_params = ?info.values(),
                    duration_us = match_duration.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                debug!(
                    method = %method,
                    path = %path,
                    route_pattern = %entry.matcher,
                    path_params = ?info.values(),
                    duration_us = match_duration.as_micros(),
                    "Route matched"
                );
            }
            return Some(RouteMatch {
                handler: Arc::clone(&entry.handler),
                template: entry.matcher.template().to_owned(),
                info,
            });
        }

        warn!(
            method = %method,
            path = %path,
            duration_us = match_duration.as_micros(),
            "No route matched"
        );
        None
    }

    /// Templates in match order, prefixed with their method.
    #[must_use]
    pub fn templates(&self) -> Vec<(Method, &str)> {
        self.routes
            .iter()
            .map(|entry| (entry.method.clone(), entry.matcher.template()))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Print all registered routes to stdout
    ///
    /// Useful for debugging and verifying the match order.
    pub fn dump_routes(&self) {
        let base = self
            .base_path
            .as_ref()
            .map_or("", UriTemplateMatcher::template);
        println!("[routes] base_path={base} count={}", self.routes.len());
        for entry in &self.routes {
            let precedence = entry.matcher.precedence();
            println!(
                "[route] {} {} (literal={} vars={})",
                entry.method, entry.matcher, precedence.raw_length, precedence.variable_count
            );
        }
    }
}
