//! # Router Module
//!
//! Method-aware route table built on [`UriTemplateMatcher`](crate::matcher::UriTemplateMatcher).
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling route templates once at registration
//! - Keeping routes in precedence order (most specific first)
//! - Matching incoming requests and returning the handler with captured
//!   path parameters
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use uritemplate::router::{Route, Router};
//! use uritemplate::runtime_config::RuntimeConfig;
//!
//! let router = Router::with_base_path(
//!     "/api",
//!     vec![Route::new(Method::GET, "/pets/{id}", "get_pet")],
//!     RuntimeConfig::default(),
//! )
//! .unwrap();
//!
//! let m = router.route(&Method::GET, "/api/pets/12").unwrap();
//! assert_eq!(*m.handler, "get_pet");
//! assert_eq!(m.get_path_param("id"), Some("12"));
//! ```
//!
//! ## Performance
//!
//! Lookup is O(n) in the number of routes for the method. Templates without
//! variables compare by string equality, and simple `{name}` segments are
//! captured by scanning without a regex.

mod core;

pub use self::core::{Route, RouteMatch, Router};
