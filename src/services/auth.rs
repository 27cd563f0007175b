//! Staff authentication and authorization service

use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, TokenKind, TokenManager, TokenPair},
    error::{AppError, AppResult},
    models::staff_user::{NewStaffUser, RegisterStaffUser, StaffUser, UpdateProfile},
    repository::CredentialStore,
};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: Arc<TokenManager>,
}

impl AuthService {
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenManager) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Exchange username and password for a token pair.
    ///
    /// Unknown user, wrong password and inactive account all fail the same way.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<TokenPair> {
        let user = self
            .store
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if !verify_password(password, &user.hashed_password) {
            tracing::info!(username, "Login rejected: wrong password");
            return Err(AppError::Unauthenticated);
        }

        if !user.is_active {
            tracing::info!(user_id = user.id, "Login rejected: account inactive");
            return Err(AppError::Unauthenticated);
        }

        tracing::info!(user_id = user.id, "Staff user logged in");
        self.issue_pair(user.id)
    }

    /// Mint a new pair from a valid refresh token of an active user
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let user = self.resolve_subject(refresh_token, TokenKind::Refresh).await?;

        if !user.is_active {
            tracing::info!(user_id = user.id, "Refresh rejected: account inactive");
            return Err(AppError::Unauthenticated);
        }

        self.issue_pair(user.id)
    }

    /// Resolve an access token to an active staff user
    pub async fn authenticate(&self, access_token: &str) -> AppResult<StaffUser> {
        let user = self.resolve_subject(access_token, TokenKind::Access).await?;

        if !user.is_active {
            return Err(AppError::Forbidden("User is inactive".to_string()));
        }

        Ok(user)
    }

    /// Admin-only gate applied after `authenticate`
    pub fn require_admin(user: &StaffUser) -> AppResult<()> {
        if user.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    /// Create a staff account. Callers must already hold an admin identity.
    pub async fn register(&self, request: RegisterStaffUser) -> AppResult<StaffUser> {
        request.validate()?;

        if self.store.find_by_username(&request.username).await?.is_some() {
            return Err(AppError::UsernameTaken);
        }

        let created = self
            .store
            .insert(NewStaffUser {
                username: request.username,
                hashed_password: hash_password(&request.password)?,
                full_name: request.full_name,
                library_id: request.library_id,
                is_active: request.is_active,
                is_admin: request.is_admin,
            })
            .await?;

        tracing::info!(user_id = created.id, username = %created.username, "Staff user registered");
        Ok(created)
    }

    /// Update own full name and, given the current password, the password
    pub async fn update_profile(&self, user: &StaffUser, profile: UpdateProfile) -> AppResult<StaffUser> {
        profile.validate()?;

        let hashed_password = match profile.new_password {
            Some(ref new_password) => {
                let current = profile.current_password.as_deref().ok_or_else(|| {
                    AppError::Validation("Current password required to change password".to_string())
                })?;
                if !verify_password(current, &user.hashed_password) {
                    return Err(AppError::Validation("Current password is incorrect".to_string()));
                }
                Some(hash_password(new_password)?)
            }
            None => None,
        };

        self.store
            .update_profile(user.id, profile.full_name, hashed_password)
            .await
    }

    /// Verify a token of the expected kind and load its subject
    async fn resolve_subject(&self, token: &str, expected: TokenKind) -> AppResult<StaffUser> {
        let claims = self.tokens.verify(token).map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            AppError::Unauthenticated
        })?;

        if claims.kind != expected {
            tracing::debug!(?expected, actual = ?claims.kind, "Token rejected: wrong type");
            return Err(AppError::Unauthenticated);
        }

        let user_id = claims.user_id().ok_or(AppError::Unauthenticated)?;

        self.store
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::Unauthenticated)
    }

    fn issue_pair(&self, user_id: i32) -> AppResult<TokenPair> {
        self.tokens
            .issue_pair(user_id)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::users::MockCredentialStore;
    use chrono::{Duration, Utc};
    use jsonwebtoken::Algorithm;

    const SECRET: &str = "k2V9w7QpZr4Lx8Nc1Bt6Hy3Jd5Mf0Gs!";

    fn tokens() -> TokenManager {
        TokenManager::new(SECRET, Algorithm::HS256, Duration::minutes(20), Duration::days(7))
    }

    fn staff(id: i32, password: &str, is_active: bool, is_admin: bool) -> StaffUser {
        StaffUser {
            id,
            username: format!("staff{}", id),
            hashed_password: hash_password(password).unwrap(),
            full_name: None,
            library_id: None,
            is_active,
            is_admin,
            created_at: Utc::now(),
        }
    }

    fn service_with(store: MockCredentialStore) -> AuthService {
        AuthService::new(Arc::new(store), tokens())
    }

    fn store_returning_by_username(user: Option<StaffUser>) -> MockCredentialStore {
        let mut store = MockCredentialStore::new();
        store
            .expect_find_by_username()
            .returning(move |_| Ok(user.clone()));
        store
    }

    fn store_returning_by_id(user: Option<StaffUser>) -> MockCredentialStore {
        let mut store = MockCredentialStore::new();
        store.expect_find_by_id().returning(move |_| Ok(user.clone()));
        store
    }

    #[tokio::test]
    async fn login_with_valid_credentials_returns_pair() {
        let service = service_with(store_returning_by_username(Some(staff(42, "hunter2-long", true, false))));

        let pair = service.login("staff42", "hunter2-long").await.unwrap();
        assert_eq!(pair.token_type, "bearer");

        let claims = service.tokens().verify(&pair.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_unauthenticated() {
        let service = service_with(store_returning_by_username(Some(staff(1, "right-password", true, false))));
        let result = service.login("staff1", "wrong-password").await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn login_with_unknown_user_is_unauthenticated() {
        let service = service_with(store_returning_by_username(None));
        let result = service.login("nobody", "whatever").await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn login_of_inactive_user_is_unauthenticated() {
        let service = service_with(store_returning_by_username(Some(staff(1, "right-password", false, false))));
        let result = service.login("staff1", "right-password").await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn authenticate_resolves_active_user() {
        let service = service_with(store_returning_by_id(Some(staff(9, "pw-long-enough", true, false))));
        let token = service.tokens().issue_access(9).unwrap();

        let user = service.authenticate(&token).await.unwrap();
        assert_eq!(user.id, 9);
    }

    #[tokio::test]
    async fn authenticate_rejects_refresh_token() {
        let mut store = MockCredentialStore::new();
        store.expect_find_by_id().never();
        let service = service_with(store);
        let token = service.tokens().issue_refresh(9).unwrap();

        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn authenticate_rejects_expired_token() {
        let mut store = MockCredentialStore::new();
        store.expect_find_by_id().never();
        let service = service_with(store);
        let issued = Utc::now() - Duration::minutes(21);
        let token = service.tokens().issue_at(9, TokenKind::Access, issued).unwrap();

        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn authenticate_rejects_unknown_subject() {
        let service = service_with(store_returning_by_id(None));
        let token = service.tokens().issue_access(404).unwrap();

        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn authenticate_forbids_inactive_user() {
        let service = service_with(store_returning_by_id(Some(staff(9, "pw-long-enough", false, false))));
        let token = service.tokens().issue_access(9).unwrap();

        let result = service.authenticate(&token).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn refresh_issues_new_pair() {
        let service = service_with(store_returning_by_id(Some(staff(5, "pw-long-enough", true, false))));
        let refresh_token = service.tokens().issue_refresh(5).unwrap();

        let pair = service.refresh(&refresh_token).await.unwrap();
        let claims = service.tokens().verify(&pair.access_token).unwrap();
        assert_eq!(claims.user_id(), Some(5));
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[tokio::test]
    async fn refresh_rejects_access_token() {
        let mut store = MockCredentialStore::new();
        store.expect_find_by_id().never();
        let service = service_with(store);
        let access_token = service.tokens().issue_access(5).unwrap();

        let result = service.refresh(&access_token).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[tokio::test]
    async fn refresh_rejects_inactive_user() {
        let service = service_with(store_returning_by_id(Some(staff(5, "pw-long-enough", false, false))));
        let refresh_token = service.tokens().issue_refresh(5).unwrap();

        let result = service.refresh(&refresh_token).await;
        assert!(matches!(result, Err(AppError::Unauthenticated)));
    }

    #[test]
    fn require_admin_checks_flag() {
        assert!(AuthService::require_admin(&staff(1, "pw-long-enough", true, true)).is_ok());
        assert!(matches!(
            AuthService::require_admin(&staff(2, "pw-long-enough", true, false)),
            Err(AppError::Forbidden(_))
        ));
    }

    fn register_request(username: &str) -> RegisterStaffUser {
        RegisterStaffUser {
            username: username.to_string(),
            password: "initial-password".to_string(),
            full_name: Some("Anna Clerk".to_string()),
            library_id: Some(3),
            is_active: true,
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn register_hashes_password_and_inserts() {
        let mut store = MockCredentialStore::new();
        store.expect_find_by_username().returning(|_| Ok(None));
        store
            .expect_insert()
            .withf(|new| {
                new.username == "clerk"
                    && new.hashed_password != "initial-password"
                    && verify_password("initial-password", &new.hashed_password)
            })
            .times(1)
            .returning(|new| {
                Ok(StaffUser {
                    id: 11,
                    username: new.username,
                    hashed_password: new.hashed_password,
                    full_name: new.full_name,
                    library_id: new.library_id,
                    is_active: new.is_active,
                    is_admin: new.is_admin,
                    created_at: Utc::now(),
                })
            });
        let service = service_with(store);

        let created = service.register(register_request("clerk")).await.unwrap();
        assert_eq!(created.id, 11);
        assert_eq!(created.library_id, Some(3));
    }

    #[tokio::test]
    async fn register_existing_username_conflicts_without_insert() {
        let mut store = store_returning_by_username(Some(staff(1, "pw-long-enough", true, false)));
        store.expect_insert().never();
        let service = service_with(store);

        let result = service.register(register_request("staff1")).await;
        assert!(matches!(result, Err(AppError::UsernameTaken)));
    }

    #[tokio::test]
    async fn register_race_lost_at_store_conflicts() {
        let mut store = MockCredentialStore::new();
        store.expect_find_by_username().returning(|_| Ok(None));
        store.expect_insert().returning(|_| Err(AppError::UsernameTaken));
        let service = service_with(store);

        let result = service.register(register_request("clerk")).await;
        assert!(matches!(result, Err(AppError::UsernameTaken)));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let mut store = MockCredentialStore::new();
        store.expect_find_by_username().never();
        let service = service_with(store);

        let mut request = register_request("clerk");
        request.password = "short".to_string();
        let result = service.register(request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn password_change_requires_current_password() {
        let mut store = MockCredentialStore::new();
        store.expect_update_profile().never();
        let service = service_with(store);
        let user = staff(1, "old-password", true, false);

        let missing = UpdateProfile {
            new_password: Some("new-password".to_string()),
            ..UpdateProfile::default()
        };
        assert!(matches!(
            service.update_profile(&user, missing).await,
            Err(AppError::Validation(_))
        ));

        let wrong = UpdateProfile {
            current_password: Some("not-the-old-one".to_string()),
            new_password: Some("new-password".to_string()),
            ..UpdateProfile::default()
        };
        assert!(matches!(
            service.update_profile(&user, wrong).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn password_change_stores_new_hash() {
        let user = staff(1, "old-password", true, false);
        let stored = user.clone();
        let mut store = MockCredentialStore::new();
        store
            .expect_update_profile()
            .withf(|id, full_name, hashed| {
                *id == 1
                    && full_name.is_none()
                    && hashed
                        .as_deref()
                        .map(|h| verify_password("new-password", h))
                        .unwrap_or(false)
            })
            .times(1)
            .returning(move |_, _, _| Ok(stored.clone()));
        let service = service_with(store);

        let profile = UpdateProfile {
            current_password: Some("old-password".to_string()),
            new_password: Some("new-password".to_string()),
            ..UpdateProfile::default()
        };
        assert!(service.update_profile(&user, profile).await.is_ok());
    }
}
