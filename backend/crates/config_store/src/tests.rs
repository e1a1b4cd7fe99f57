//! Unit tests for the config store crate

#[cfg(test)]
mod store_tests {
    use crate::application::ConfigStore;
    use crate::domain::value_objects::ConfigValue;
    use crate::error::ConfigError;
    use crate::infra::memory::InMemoryConfigRepository;
    use kernel::id::UserId;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn store() -> ConfigStore<InMemoryConfigRepository> {
        ConfigStore::new(Arc::new(InMemoryConfigRepository::new()))
    }

    #[tokio::test]
    async fn test_set_then_get_returns_latest_write() {
        let store = store();
        let admin = UserId::new();

        assert_ok!(store.set_config("site_name", "First".into(), None, admin).await);
        assert_eq!(
            store.get_config("site_name", "default".into()).await,
            ConfigValue::from("First")
        );

        assert_ok!(store.set_config("site_name", "Second".into(), None, admin).await);
        assert_eq!(
            store.get_config("site_name", "default".into()).await,
            ConfigValue::from("Second")
        );
    }

    #[tokio::test]
    async fn test_upsert_keeps_single_entry() {
        let repo = Arc::new(InMemoryConfigRepository::new());
        let store = ConfigStore::new(repo.clone());
        let admin = UserId::new();

        let first = store
            .set_config("max_websites_per_publisher", 10_i64.into(), Some("Cap".into()), admin)
            .await
            .unwrap();
        let second = store
            .set_config("max_websites_per_publisher", 20_i64.into(), None, admin)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.description.as_deref(), Some("Cap"));
        assert_eq!(repo.snapshot().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_key_returns_default() {
        let store = store();
        assert_eq!(
            store.get_config("does_not_exist", true.into()).await,
            ConfigValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn test_get_invalid_key_returns_default() {
        let store = store();
        assert_eq!(store.get_config("", 7_i64.into()).await, ConfigValue::from(7_i64));
        assert_eq!(
            store.get_config("bad key!", false.into()).await,
            ConfigValue::Bool(false)
        );
    }

    #[tokio::test]
    async fn test_set_invalid_key_fails() {
        let store = store();
        let err = assert_err!(store.set_config(" ", true.into(), None, UserId::new()).await);
        assert!(matches!(err, ConfigError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_updated_by_tracks_last_writer() {
        let store = store();
        let alice = UserId::new();
        let bob = UserId::new();

        store.set_config("maintenance_mode", true.into(), None, alice).await.unwrap();
        let entry = store.set_config("maintenance_mode", false.into(), None, bob).await.unwrap();

        assert_eq!(entry.updated_by, bob);
    }

    #[tokio::test]
    async fn test_deactivate_hides_and_set_reactivates() {
        let repo = Arc::new(InMemoryConfigRepository::new());
        let store = ConfigStore::new(repo.clone());
        let admin = UserId::new();

        store.set_config("maintenance_mode", true.into(), None, admin).await.unwrap();
        assert!(store.deactivate("maintenance_mode", admin).await.unwrap());

        // Hidden from reads, history kept
        assert_eq!(
            store.get_config("maintenance_mode", false.into()).await,
            ConfigValue::Bool(false)
        );
        assert!(matches!(
            store.get_entry("maintenance_mode").await,
            Err(ConfigError::NotFound(_))
        ));
        assert_eq!(repo.snapshot().unwrap().len(), 1);

        // Second deactivate is a no-op
        assert!(!store.deactivate("maintenance_mode", admin).await.unwrap());

        let entry = store.set_config("maintenance_mode", true.into(), None, admin).await.unwrap();
        assert!(entry.is_active);
        assert_eq!(
            store.get_config("maintenance_mode", false.into()).await,
            ConfigValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn test_list_filters_inactive_and_category() {
        let store = store();
        let admin = UserId::new();

        crate::seed_defaults(store.repository().as_ref(), admin).await.unwrap();
        store.set_config("custom_banner", "Hello".into(), None, admin).await.unwrap();
        store.deactivate("site_name", admin).await.unwrap();

        let all = store.list(None).await.unwrap();
        let keys: Vec<_> = all.iter().map(|e| e.key.as_str()).collect();
        assert!(!keys.contains(&"site_name"));
        // Uncategorised entries sort last
        assert_eq!(keys.last(), Some(&"custom_banner"));

        let security = store.list(Some("security")).await.unwrap();
        assert_eq!(security.len(), 1);
        assert_eq!(security[0].key.as_str(), "2fa_enabled_for_login");
    }
}

#[cfg(test)]
mod typed_setting_tests {
    use crate::application::ConfigStore;
    use crate::domain::settings::{
        MaxWebsitesPerPublisher, SiteName, TwoFactorEnabledForLogin, WebsiteApprovalRequired,
    };
    use crate::infra::memory::InMemoryConfigRepository;
    use kernel::id::UserId;
    use std::sync::Arc;

    fn store() -> ConfigStore<InMemoryConfigRepository> {
        ConfigStore::new(Arc::new(InMemoryConfigRepository::new()))
    }

    #[tokio::test]
    async fn test_typed_defaults_when_missing() {
        let store = store();
        assert!(!store.get::<TwoFactorEnabledForLogin>().await);
        assert!(store.get::<WebsiteApprovalRequired>().await);
        assert_eq!(store.get::<MaxWebsitesPerPublisher>().await, 50);
        assert!(!store.is_two_factor_required_for_login().await);
    }

    #[tokio::test]
    async fn test_typed_roundtrip_sets_metadata() {
        let store = store();
        let admin = UserId::new();

        let entry = store.set::<TwoFactorEnabledForLogin>(true, admin).await.unwrap();
        assert_eq!(entry.category.as_deref(), Some("security"));
        assert!(entry.description.is_some());

        assert!(store.get::<TwoFactorEnabledForLogin>().await);
        assert!(store.is_two_factor_required_for_login().await);
    }

    #[tokio::test]
    async fn test_wrong_shape_falls_back_to_default() {
        let store = store();
        let admin = UserId::new();

        store
            .set_config("2fa_enabled_for_login", "yes".into(), None, admin)
            .await
            .unwrap();
        assert!(!store.is_two_factor_required_for_login().await);

        store.set_config("site_name", 42_i64.into(), None, admin).await.unwrap();
        assert_eq!(store.get::<SiteName>().await, "Guest Post Marketplace");
    }
}

#[cfg(test)]
mod storage_failure_tests {
    use crate::application::ConfigStore;
    use crate::domain::entity::{ConfigEntry, ConfigUpsert};
    use crate::domain::repository::ConfigEntryRepository;
    use crate::domain::settings::{MaxWebsitesPerPublisher, TwoFactorEnabledForLogin};
    use crate::domain::value_objects::{ConfigKey, ConfigValue};
    use crate::error::{ConfigError, ConfigResult};
    use kernel::id::UserId;
    use std::sync::Arc;
    use tokio_test::assert_err;

    /// Repository whose database is unreachable
    struct UnavailableRepository;

    fn unavailable() -> ConfigError {
        ConfigError::Persistence(sqlx::Error::PoolTimedOut)
    }

    impl ConfigEntryRepository for UnavailableRepository {
        async fn find_active(&self, _key: &ConfigKey) -> ConfigResult<Option<ConfigEntry>> {
            Err(unavailable())
        }

        async fn upsert(&self, _upsert: &ConfigUpsert) -> ConfigResult<ConfigEntry> {
            Err(unavailable())
        }

        async fn insert_if_absent(&self, _entry: &ConfigEntry) -> ConfigResult<bool> {
            Err(unavailable())
        }

        async fn list_active(&self, _category: Option<&str>) -> ConfigResult<Vec<ConfigEntry>> {
            Err(unavailable())
        }

        async fn deactivate(&self, _key: &ConfigKey, _updated_by: UserId) -> ConfigResult<bool> {
            Err(unavailable())
        }
    }

    fn store() -> ConfigStore<UnavailableRepository> {
        ConfigStore::new(Arc::new(UnavailableRepository))
    }

    #[tokio::test]
    async fn test_reads_fall_back_to_defaults() {
        let store = store();

        assert_eq!(
            store.get_config("site_name", "fallback".into()).await,
            ConfigValue::from("fallback")
        );
        assert_eq!(store.get::<MaxWebsitesPerPublisher>().await, 50);
        assert!(!store.get::<TwoFactorEnabledForLogin>().await);
    }

    #[tokio::test]
    async fn test_two_factor_off_when_store_down() {
        assert!(!store().is_two_factor_required_for_login().await);
    }

    #[tokio::test]
    async fn test_writes_propagate_persistence_error() {
        let store = store();
        let admin = UserId::new();

        let err = assert_err!(store.set_config("site_name", "x".into(), None, admin).await);
        assert!(matches!(err, ConfigError::Persistence(_)));

        let err = assert_err!(store.set::<TwoFactorEnabledForLogin>(true, admin).await);
        assert!(matches!(err, ConfigError::Persistence(_)));

        let err = assert_err!(store.get_entry("site_name").await);
        assert!(matches!(err, ConfigError::Persistence(_)));
    }
}

#[cfg(test)]
mod seed_tests {
    use crate::application::{ConfigStore, seed_defaults};
    use crate::domain::settings::{MaintenanceMode, known_defaults};
    use crate::domain::value_objects::ConfigValue;
    use crate::infra::memory::InMemoryConfigRepository;
    use kernel::id::UserId;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_creates_all_defaults_with_system_actor() {
        let repo = InMemoryConfigRepository::new();
        let system = UserId::new();

        let created = seed_defaults(&repo, system).await.unwrap();
        assert_eq!(created, known_defaults().len());

        for entry in repo.snapshot().unwrap() {
            assert_eq!(entry.updated_by, system);
            assert!(entry.is_active);
            assert!(entry.category.is_some());
        }
    }

    #[tokio::test]
    async fn test_seed_never_overwrites() {
        let repo = Arc::new(InMemoryConfigRepository::new());
        let store = ConfigStore::new(repo.clone());
        let system = UserId::new();
        let admin = UserId::new();

        store.set::<MaintenanceMode>(true, admin).await.unwrap();
        store.set_config("site_name", "Mine".into(), None, admin).await.unwrap();
        store.deactivate("site_name", admin).await.unwrap();

        let created = seed_defaults(repo.as_ref(), system).await.unwrap();
        assert_eq!(created, known_defaults().len() - 2);
        assert!(store.get::<MaintenanceMode>().await);
        // Deactivated entries are not resurrected
        assert_eq!(
            store.get_config("site_name", "fallback".into()).await,
            ConfigValue::from("fallback")
        );

        // Running again creates nothing
        assert_eq!(seed_defaults(repo.as_ref(), system).await.unwrap(), 0);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(ConfigError, StatusCode)> = vec![
            (ConfigError::InvalidKey("x".into()), StatusCode::BAD_REQUEST),
            (ConfigError::InvalidValue("x".into()), StatusCode::BAD_REQUEST),
            (ConfigError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ConfigError::MissingActor, StatusCode::UNAUTHORIZED),
            (ConfigError::InvalidActor("x".into()), StatusCode::BAD_REQUEST),
            (
                ConfigError::Persistence(sqlx::Error::PoolTimedOut),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ConfigError::Internal("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.status_code(), expected_status);
            let response = error.into_response();
            assert_eq!(response.status(), expected_status);
        }
    }

    #[test]
    fn test_persistence_details_not_exposed() {
        let err = ConfigError::Persistence(sqlx::Error::PoolTimedOut);
        let app = err.to_app_error();
        assert!(!app.message().contains("pool"));
        assert!(app.action().is_some());
    }
}

#[cfg(test)]
mod router_tests {
    use crate::application::ConfigStore;
    use crate::infra::memory::InMemoryConfigRepository;
    use crate::presentation::router::config_router_generic;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use kernel::id::UserId;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        config_router_generic(ConfigStore::new(Arc::new(InMemoryConfigRepository::new())))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn put(key: &str, actor: Option<UserId>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("PUT")
            .uri(format!("/{key}"))
            .header("content-type", "application/json");
        if let Some(actor) = actor {
            builder = builder.header("x-actor-id", actor.to_string());
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let app = app();
        let admin = UserId::new();

        let response = app
            .clone()
            .oneshot(put("2fa_enabled_for_login", Some(admin), r#"{"value":true}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["value"], serde_json::json!(true));
        assert_eq!(body["updatedBy"], serde_json::json!(admin.to_string()));
        assert_eq!(body["isActive"], serde_json::json!(true));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/2fa_enabled_for_login")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["key"], "2fa_enabled_for_login");
    }

    #[tokio::test]
    async fn test_put_without_actor_is_unauthorized() {
        let response = app()
            .oneshot(put("site_name", None, r#"{"value":"x"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_put_with_malformed_actor_is_bad_request() {
        let request = Request::builder()
            .method("PUT")
            .uri("/site_name")
            .header("content-type", "application/json")
            .header("x-actor-id", "not-a-uuid")
            .body(Body::from(r#"{"value":"x"}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_put_null_value_is_bad_request() {
        let response = app()
            .oneshot(put("site_name", Some(UserId::new()), r#"{"value":null}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_and_delete_missing_are_not_found() {
        let app = app();

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/nope")
                    .header("x-actor-id", UserId::new().to_string())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
