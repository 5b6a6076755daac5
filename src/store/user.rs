//! Document-backed user store.

use crate::document::{DocumentConnector, Filter};
use crate::entity::{Claim, User, UserLogin, UserToken};
use crate::error::{IdentityResult, StoreResult};
use crate::identity::{
    QueryableUserStore, UserAuthenticationTokenStore, UserAuthenticatorKeyStore, UserClaimStore,
    UserEmailStore, UserLockoutStore, UserLoginStore, UserPasswordStore, UserPhoneNumberStore,
    UserRoleStore, UserSecurityStampStore, UserStore, UserTwoFactorRecoveryCodeStore,
    UserTwoFactorStore,
};
use crate::options::TenantStoreOptions;
use crate::store::EntityStore;
use chrono::{DateTime, Utc};
use log::debug;
use tokio_util::sync::CancellationToken;

/// User store over the users collection of a document store.
///
/// Implements every user capability trait. Instances are bound to one
/// [`TenantStoreOptions`] value; use a
/// [`UserStoreProvider`](crate::multi_tenant::UserStoreProvider) to obtain
/// one per tenant.
#[derive(Debug)]
pub struct DocumentUserStore<K: DocumentConnector> {
    inner: EntityStore<User, K>,
}

impl<K: DocumentConnector> DocumentUserStore<K> {
    pub fn new(options: TenantStoreOptions, connector: K) -> StoreResult<Self> {
        Ok(Self {
            inner: EntityStore::new(options, connector)?,
        })
    }

    pub fn options(&self) -> &TenantStoreOptions {
        self.inner.options()
    }

    /// The generic store this user store delegates to.
    pub fn entities(&self) -> &EntityStore<User, K> {
        &self.inner
    }

    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

impl<K: DocumentConnector> UserStore for DocumentUserStore<K> {
    async fn create(&self, user: &mut User, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.inner.create(user, cancel).await
    }

    async fn update(&self, user: &User, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.inner.update(user, cancel).await
    }

    async fn delete(&self, user: &User, cancel: &CancellationToken) -> StoreResult<IdentityResult> {
        self.inner.delete(user, cancel).await
    }

    async fn find_by_id(&self, user_id: &str, cancel: &CancellationToken) -> StoreResult<Option<User>> {
        self.inner.find_by_id(user_id, cancel).await
    }

    async fn find_by_name(
        &self,
        normalized_user_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<User>> {
        debug!("Finding the user named '{}'", normalized_user_name);
        self.inner
            .find_one(Filter::eq("normalizedName", normalized_user_name), cancel)
            .await
    }

    fn user_id(&self, user: &User, cancel: &CancellationToken) -> StoreResult<String> {
        self.inner.access(cancel, || user.id.to_string())
    }

    fn user_name(&self, user: &User, cancel: &CancellationToken) -> StoreResult<String> {
        self.inner.access(cancel, || user.name.clone())
    }

    fn set_user_name(
        &self,
        user: &mut User,
        user_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || user.name = user_name.to_string())
    }

    fn normalized_user_name(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || user.normalized_name.clone())
    }

    fn set_normalized_user_name(
        &self,
        user: &mut User,
        normalized_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.normalized_name = normalized_name.map(str::to_string))
    }
}

impl<K: DocumentConnector> QueryableUserStore for DocumentUserStore<K> {
    async fn users(&self, cancel: &CancellationToken) -> StoreResult<Vec<User>> {
        self.inner.find_all(Filter::All, cancel).await
    }
}

impl<K: DocumentConnector> UserPasswordStore for DocumentUserStore<K> {
    fn set_password_hash(
        &self,
        user: &mut User,
        password_hash: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.password_hash = password_hash.map(str::to_string))
    }

    fn password_hash(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || user.password_hash.clone())
    }

    fn has_password(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool> {
        self.inner.access(cancel, || {
            user.password_hash
                .as_deref()
                .is_some_and(|hash| !hash.trim().is_empty())
        })
    }
}

impl<K: DocumentConnector> UserEmailStore for DocumentUserStore<K> {
    fn set_email(
        &self,
        user: &mut User,
        email: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || user.email = email.map(str::to_string))
    }

    fn email(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || user.email.clone())
    }

    fn set_email_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || user.email_confirmed = confirmed)
    }

    fn email_confirmed(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool> {
        self.inner.access(cancel, || user.email_confirmed)
    }

    fn set_normalized_email(
        &self,
        user: &mut User,
        normalized_email: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.normalized_email = normalized_email.map(str::to_string))
    }

    fn normalized_email(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || user.normalized_email.clone())
    }

    async fn find_by_email(
        &self,
        normalized_email: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<User>> {
        debug!("Finding the user with e-mail '{}'", normalized_email);
        self.inner
            .find_one(Filter::eq("normalizedEmail", normalized_email), cancel)
            .await
    }
}

impl<K: DocumentConnector> UserPhoneNumberStore for DocumentUserStore<K> {
    fn set_phone_number(
        &self,
        user: &mut User,
        phone_number: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.phone_number = phone_number.map(str::to_string))
    }

    fn phone_number(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || user.phone_number.clone())
    }

    fn set_phone_number_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.phone_number_confirmed = confirmed)
    }

    fn phone_number_confirmed(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool> {
        self.inner.access(cancel, || user.phone_number_confirmed)
    }
}

impl<K: DocumentConnector> UserLockoutStore for DocumentUserStore<K> {
    fn lockout_end(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<DateTime<Utc>>> {
        self.inner.access(cancel, || user.lockout_end)
    }

    fn set_lockout_end(
        &self,
        user: &mut User,
        lockout_end: Option<DateTime<Utc>>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || user.lockout_end = lockout_end)
    }

    fn increment_access_failed_count(
        &self,
        user: &mut User,
        cancel: &CancellationToken,
    ) -> StoreResult<u32> {
        self.inner.access(cancel, || {
            let count = user.access_failed_count.unwrap_or(0).saturating_add(1);
            user.access_failed_count = Some(count);
            count
        })
    }

    fn reset_access_failed_count(
        &self,
        user: &mut User,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || user.access_failed_count = None)
    }

    fn access_failed_count(&self, user: &User, cancel: &CancellationToken) -> StoreResult<u32> {
        self.inner
            .access(cancel, || user.access_failed_count.unwrap_or(0))
    }

    fn lockout_enabled(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool> {
        self.inner.access(cancel, || user.lockout_enabled)
    }

    fn set_lockout_enabled(
        &self,
        user: &mut User,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || user.lockout_enabled = enabled)
    }
}

impl<K: DocumentConnector> UserLoginStore for DocumentUserStore<K> {
    fn add_login(
        &self,
        user: &mut User,
        login: UserLogin,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || {
            if !user
                .logins
                .iter()
                .any(|existing| existing.is(&login.provider, &login.provider_key))
            {
                user.logins.push(login);
            }
        })
    }

    fn remove_login(
        &self,
        user: &mut User,
        provider: &str,
        provider_key: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || {
            user.logins
                .retain(|login| !login.is(provider, provider_key))
        })
    }

    fn logins(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Vec<UserLogin>> {
        self.inner.access(cancel, || user.logins.clone())
    }

    async fn find_by_login(
        &self,
        provider: &str,
        provider_key: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<User>> {
        debug!("Finding the user for the login '{}'", provider);
        let filter = Filter::elem_match(
            "logins",
            Filter::eq("provider", provider).and(Filter::eq("providerKey", provider_key)),
        );
        self.inner.find_one(filter, cancel).await
    }
}

impl<K: DocumentConnector> UserRoleStore for DocumentUserStore<K> {
    fn add_to_role(
        &self,
        user: &mut User,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || {
            if !user.roles.iter().any(|role| role == role_name) {
                user.roles.push(role_name.to_string());
            }
        })
    }

    fn remove_from_role(
        &self,
        user: &mut User,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.roles.retain(|role| role != role_name))
    }

    fn roles(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Vec<String>> {
        self.inner.access(cancel, || user.roles.clone())
    }

    fn is_in_role(
        &self,
        user: &User,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<bool> {
        self.inner
            .access(cancel, || user.roles.iter().any(|role| role == role_name))
    }

    async fn users_in_role(
        &self,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<Vec<User>> {
        debug!("Finding all users in role '{}'", role_name);
        self.inner
            .find_all(Filter::any_eq("roles", role_name), cancel)
            .await
    }
}

impl<K: DocumentConnector> UserSecurityStampStore for DocumentUserStore<K> {
    fn set_security_stamp(
        &self,
        user: &mut User,
        stamp: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.security_stamp = Some(stamp.to_string()))
    }

    fn security_stamp(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || user.security_stamp.clone())
    }
}

impl<K: DocumentConnector> UserTwoFactorStore for DocumentUserStore<K> {
    fn set_two_factor_enabled(
        &self,
        user: &mut User,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || user.two_factor_enabled = enabled)
    }

    fn two_factor_enabled(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool> {
        self.inner.access(cancel, || user.two_factor_enabled)
    }
}

impl<K: DocumentConnector> UserTwoFactorRecoveryCodeStore for DocumentUserStore<K> {
    fn replace_codes(
        &self,
        user: &mut User,
        codes: Vec<String>,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || user.recovery_codes = codes)
    }

    fn redeem_code(
        &self,
        user: &mut User,
        code: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<bool> {
        self.inner.access(cancel, || {
            match user.recovery_codes.iter().position(|held| held == code) {
                Some(index) => {
                    user.recovery_codes.remove(index);
                    true
                }
                None => false,
            }
        })
    }

    fn count_codes(&self, user: &User, cancel: &CancellationToken) -> StoreResult<usize> {
        self.inner.access(cancel, || user.recovery_codes.len())
    }
}

/// Add `claim` unless a claim of the same type is already held.
pub(crate) fn add_claim_once(claims: &mut Vec<Claim>, claim: Claim) {
    if !claims
        .iter()
        .any(|existing| existing.claim_type == claim.claim_type)
    {
        claims.push(claim);
    }
}

impl<K: DocumentConnector> UserClaimStore for DocumentUserStore<K> {
    fn claims(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Vec<Claim>> {
        self.inner.access(cancel, || user.claims.clone())
    }

    fn add_claims(
        &self,
        user: &mut User,
        claims: &[Claim],
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || {
            for claim in claims {
                add_claim_once(&mut user.claims, claim.clone());
            }
        })
    }

    fn replace_claim(
        &self,
        user: &mut User,
        claim: &Claim,
        new_claim: Claim,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || {
            user.claims
                .retain(|existing| existing.claim_type != claim.claim_type);
            add_claim_once(&mut user.claims, new_claim);
        })
    }

    fn remove_claims(
        &self,
        user: &mut User,
        claims: &[Claim],
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || {
            user.claims.retain(|existing| {
                !claims
                    .iter()
                    .any(|claim| claim.claim_type == existing.claim_type)
            })
        })
    }

    async fn users_for_claim(
        &self,
        claim: &Claim,
        cancel: &CancellationToken,
    ) -> StoreResult<Vec<User>> {
        debug!(
            "Finding all users with claim '{}' of value '{}'",
            claim.claim_type, claim.value
        );
        let filter = Filter::elem_match(
            "claims",
            Filter::eq("type", claim.claim_type.as_str())
                .and(Filter::eq("value", claim.value.as_str())),
        );
        self.inner.find_all(filter, cancel).await
    }
}

impl<K: DocumentConnector> UserAuthenticationTokenStore for DocumentUserStore<K> {
    fn set_token(
        &self,
        user: &mut User,
        provider: &str,
        name: &str,
        value: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner.access(cancel, || {
            let token = UserToken {
                provider: provider.to_string(),
                name: name.to_string(),
                value: value.to_string(),
            };
            match user.tokens.iter_mut().find(|t| t.is(provider, name)) {
                Some(existing) => *existing = token,
                None => user.tokens.push(token),
            }
        })
    }

    fn remove_token(
        &self,
        user: &mut User,
        provider: &str,
        name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.tokens.retain(|t| !t.is(provider, name)))
    }

    fn token(
        &self,
        user: &User,
        provider: &str,
        name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || {
            user.tokens
                .iter()
                .find(|t| t.is(provider, name))
                .map(|t| t.value.clone())
        })
    }
}

impl<K: DocumentConnector> UserAuthenticatorKeyStore for DocumentUserStore<K> {
    fn set_authenticator_key(
        &self,
        user: &mut User,
        key: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()> {
        self.inner
            .access(cancel, || user.authenticator_key = Some(key.to_string()))
    }

    fn authenticator_key(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<String>> {
        self.inner.access(cancel, || user.authenticator_key.clone())
    }
}
