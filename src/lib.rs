//! Storefront URL routing and API composition library

pub mod apps;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod urlconf;

pub use apps::{Apps, AuthViews, MountApp};
pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{ConfigurationError, ResolutionError, RouterRegistry};
pub use urlconf::build_urlconf;
