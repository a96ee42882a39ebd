//! Integration tests for usersync core
//!
//! This test suite covers:
//! - Error classification
//! - Record and patch types
//! - Trait default methods

use async_trait::async_trait;
use usersync_core::{
    LocalUserRecord, NewUser, ProviderMetadataPatch, SyncError, SyncResult, UserPatch, UserStore,
};

mod error_tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_requests() {
        for err in [
            SyncError::missing_field("username"),
            SyncError::invalid_field("email", "blank"),
        ] {
            assert_eq!(err.status_code(), 400);
            assert!(err.is_client_error());
        }
    }

    #[test]
    fn test_store_faults_are_server_errors() {
        let err = SyncError::database("connection reset");
        assert_eq!(err.status_code(), 500);
        assert!(!err.is_client_error());
        assert_eq!(err.kind(), "database_error");
    }

    #[test]
    fn test_configuration_errors_are_server_errors() {
        let err = SyncError::config("secret key is empty");
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.kind(), "configuration_error");
    }
}

mod type_tests {
    use super::*;

    fn existing() -> LocalUserRecord {
        LocalUserRecord::from_new(
            "local_42".to_string(),
            NewUser {
                provider_user_id: "user_42".to_string(),
                email: "a@x.com".to_string(),
                username: "a".to_string(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_partial_update_keeps_email() {
        let mut user = existing();
        UserPatch {
            username: Some("b".to_string()),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.username, "b");
        assert_eq!(user.id, "local_42");
    }

    #[test]
    fn test_patch_field_names() {
        let patch = UserPatch {
            email: Some("c@x.com".to_string()),
            photo_url: Some("https://img.example.com/c.png".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.field_names(), vec!["email", "photo_url"]);
    }

    #[test]
    fn test_metadata_patch_links_local_id() {
        let patch = ProviderMetadataPatch::for_record(&existing());
        assert_eq!(patch.provider_user_id, "user_42");
        assert_eq!(patch.public_metadata.user_id, "local_42");
    }

    #[test]
    fn test_record_serializes_snake_case() {
        let json = serde_json::to_value(existing()).unwrap();
        assert_eq!(json["provider_user_id"], "user_42");
        assert_eq!(json["photo_url"], "");
    }
}

mod trait_tests {
    use super::*;

    struct EmptyStore;

    #[async_trait]
    impl UserStore for EmptyStore {
        async fn create_user(&self, user: &NewUser) -> SyncResult<LocalUserRecord> {
            Ok(LocalUserRecord::from_new("local_1".to_string(), user.clone()))
        }

        async fn update_user(&self, provider_user_id: &str, _patch: &UserPatch) -> SyncResult<LocalUserRecord> {
            Err(SyncError::not_found("user", "provider_user_id", provider_user_id))
        }

        async fn delete_user(&self, _provider_user_id: &str) -> SyncResult<Option<LocalUserRecord>> {
            Ok(None)
        }

        async fn find_by_provider_id(&self, _provider_user_id: &str) -> SyncResult<Option<LocalUserRecord>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_default_count_users() {
        let store = EmptyStore;
        assert_eq!(store.count_users().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_is_object_safe() {
        let store: Box<dyn UserStore> = Box::new(EmptyStore);
        let result = store.update_user("user_missing", &UserPatch::default()).await;
        assert!(matches!(result, Err(SyncError::NotFound { .. })));
    }
}
