//! Sub-app contracts.
//!
//! Every business domain owns its route table and hands it over through
//! [`MountApp`]; the URL configuration decides where it is mounted but never
//! looks inside. Authentication is contributed through [`AuthViews`] because
//! the auth surface itself (its three entry points) is fixed here.

pub mod placeholder;

use std::sync::Arc;

use crate::routing::{ConfigurationError, Handler, RouteGroup};

/// Labels of the business sub-apps, in mount order under the API prefix.
pub const API_APPS: [&str; 7] = [
    "cart",
    "customers",
    "orders",
    "payments",
    "catalogue",
    "stores",
    "wishlist",
];

/// A unit that exposes a mountable route group.
pub trait MountApp: Send + Sync {
    /// Stable label used to place the app (e.g. "cart").
    fn label(&self) -> &str;

    /// The app's route table, relative to its mount point.
    fn urls(&self) -> RouteGroup;
}

/// Delegated authentication views.
pub trait AuthViews: Send + Sync {
    /// Browsable login/logout pages, mounted at the auth prefix.
    fn browsable_login(&self) -> RouteGroup;

    /// Issues an access + refresh credential pair.
    fn token_obtain_pair(&self) -> Arc<dyn Handler>;

    /// Exchanges a refresh credential for a new access credential.
    fn token_refresh(&self) -> Arc<dyn Handler>;
}

/// The set of collaborators the URL configuration is composed from.
#[derive(Clone, Default)]
pub struct Apps {
    admin: Option<Arc<dyn MountApp>>,
    auth: Option<Arc<dyn AuthViews>>,
    api: Vec<Arc<dyn MountApp>>,
}

impl Apps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_admin(mut self, app: impl MountApp + 'static) -> Self {
        self.admin = Some(Arc::new(app));
        self
    }

    pub fn with_auth(mut self, views: impl AuthViews + 'static) -> Self {
        self.auth = Some(Arc::new(views));
        self
    }

    /// Register one of the business sub-apps listed in [`API_APPS`].
    pub fn with_api_app(mut self, app: impl MountApp + 'static) -> Self {
        self.api.push(Arc::new(app));
        self
    }

    pub fn admin(&self) -> Result<&Arc<dyn MountApp>, ConfigurationError> {
        self.admin
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingApp("admin".to_string()))
    }

    pub fn auth(&self) -> Result<&Arc<dyn AuthViews>, ConfigurationError> {
        self.auth
            .as_ref()
            .ok_or_else(|| ConfigurationError::MissingApp("auth".to_string()))
    }

    /// Business sub-apps in [`API_APPS`] order.
    ///
    /// Fails if any is missing, unknown or registered twice.
    pub fn api_apps(&self) -> Result<Vec<&Arc<dyn MountApp>>, ConfigurationError> {
        for (idx, app) in self.api.iter().enumerate() {
            let label = app.label();
            if !API_APPS.contains(&label) {
                return Err(ConfigurationError::UnknownApp(label.to_string()));
            }
            if self.api[..idx].iter().any(|other| other.label() == label) {
                return Err(ConfigurationError::DuplicateApp(label.to_string()));
            }
        }

        API_APPS
            .iter()
            .map(|&label| {
                self.api
                    .iter()
                    .find(|app| app.label() == label)
                    .ok_or_else(|| ConfigurationError::MissingApp(label.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::placeholder::{PlaceholderApp, PlaceholderAuth};
    use super::*;

    fn app(label: &'static str) -> PlaceholderApp {
        PlaceholderApp::new(label, &[])
    }

    #[test]
    fn test_api_apps_in_mount_order() {
        let mut apps = Apps::new();
        for label in API_APPS.iter().rev() {
            apps = apps.with_api_app(app(label));
        }

        let labels: Vec<_> = apps.api_apps().unwrap().iter().map(|a| a.label().to_string()).collect();
        assert_eq!(labels, API_APPS.to_vec());
    }

    #[test]
    fn test_missing_unknown_and_duplicate_apps() {
        let partial = Apps::new().with_api_app(app("cart"));
        assert_eq!(
            partial.api_apps().err(),
            Some(ConfigurationError::MissingApp("customers".into()))
        );

        let unknown = Apps::new().with_api_app(app("reviews"));
        assert_eq!(
            unknown.api_apps().err(),
            Some(ConfigurationError::UnknownApp("reviews".into()))
        );

        let twice = Apps::new().with_api_app(app("cart")).with_api_app(app("cart"));
        assert_eq!(
            twice.api_apps().err(),
            Some(ConfigurationError::DuplicateApp("cart".into()))
        );
    }

    #[test]
    fn test_admin_and_auth_required() {
        let apps = Apps::new();
        assert!(matches!(apps.admin(), Err(ConfigurationError::MissingApp(ref l)) if l == "admin"));
        assert!(matches!(apps.auth(), Err(ConfigurationError::MissingApp(ref l)) if l == "auth"));

        let apps = apps.with_auth(PlaceholderAuth);
        assert!(apps.auth().is_ok());
    }
}
