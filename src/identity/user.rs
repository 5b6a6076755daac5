//! Capability contracts of a user store.
//!
//! Each trait covers one concern of a user account. Lookups and writes are
//! async and reach the document store; the field accessors work on the
//! in-memory [`User`] only and take effect on the next [`UserStore::update`].
//! Every method first checks that the store is still usable and that the
//! caller has not cancelled.

use crate::entity::{Claim, User, UserLogin};
use crate::error::{IdentityResult, StoreResult};
use chrono::{DateTime, Utc};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Persistence of user accounts.
pub trait UserStore: Send + Sync {
    /// Persist a new user, assigning its id, creation time and tenant.
    fn create(
        &self,
        user: &mut User,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<IdentityResult>> + Send;

    fn update(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<IdentityResult>> + Send;

    fn delete(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<IdentityResult>> + Send;

    fn find_by_id(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn find_by_name(
        &self,
        normalized_user_name: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;

    fn user_id(&self, user: &User, cancel: &CancellationToken) -> StoreResult<String>;

    fn user_name(&self, user: &User, cancel: &CancellationToken) -> StoreResult<String>;

    fn set_user_name(
        &self,
        user: &mut User,
        user_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn normalized_user_name(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<String>>;

    fn set_normalized_user_name(
        &self,
        user: &mut User,
        normalized_name: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;
}

/// Enumeration of every user visible to the store.
pub trait QueryableUserStore: UserStore {
    fn users(
        &self,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Vec<User>>> + Send;
}

pub trait UserPasswordStore: UserStore {
    fn set_password_hash(
        &self,
        user: &mut User,
        password_hash: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn password_hash(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Option<String>>;

    /// Whether a non-blank password hash is set.
    fn has_password(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool>;
}

pub trait UserEmailStore: UserStore {
    fn set_email(
        &self,
        user: &mut User,
        email: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn email(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Option<String>>;

    fn set_email_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn email_confirmed(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool>;

    fn set_normalized_email(
        &self,
        user: &mut User,
        normalized_email: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn normalized_email(&self, user: &User, cancel: &CancellationToken)
    -> StoreResult<Option<String>>;

    fn find_by_email(
        &self,
        normalized_email: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;
}

pub trait UserPhoneNumberStore: UserStore {
    fn set_phone_number(
        &self,
        user: &mut User,
        phone_number: Option<&str>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn phone_number(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Option<String>>;

    fn set_phone_number_confirmed(
        &self,
        user: &mut User,
        confirmed: bool,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn phone_number_confirmed(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool>;
}

pub trait UserLockoutStore: UserStore {
    fn lockout_end(
        &self,
        user: &User,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<DateTime<Utc>>>;

    fn set_lockout_end(
        &self,
        user: &mut User,
        lockout_end: Option<DateTime<Utc>>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    /// Record a failed access and return the new count.
    fn increment_access_failed_count(
        &self,
        user: &mut User,
        cancel: &CancellationToken,
    ) -> StoreResult<u32>;

    fn reset_access_failed_count(&self, user: &mut User, cancel: &CancellationToken)
    -> StoreResult<()>;

    fn access_failed_count(&self, user: &User, cancel: &CancellationToken) -> StoreResult<u32>;

    fn lockout_enabled(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool>;

    fn set_lockout_enabled(
        &self,
        user: &mut User,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;
}

pub trait UserLoginStore: UserStore {
    /// Link a login; an existing login with the same provider and key is kept.
    fn add_login(
        &self,
        user: &mut User,
        login: UserLogin,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn remove_login(
        &self,
        user: &mut User,
        provider: &str,
        provider_key: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn logins(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Vec<UserLogin>>;

    fn find_by_login(
        &self,
        provider: &str,
        provider_key: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Option<User>>> + Send;
}

pub trait UserRoleStore: UserStore {
    fn add_to_role(
        &self,
        user: &mut User,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn remove_from_role(
        &self,
        user: &mut User,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn roles(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Vec<String>>;

    fn is_in_role(
        &self,
        user: &User,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<bool>;

    fn users_in_role(
        &self,
        role_name: &str,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Vec<User>>> + Send;
}

pub trait UserSecurityStampStore: UserStore {
    fn set_security_stamp(
        &self,
        user: &mut User,
        stamp: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn security_stamp(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Option<String>>;
}

pub trait UserTwoFactorStore: UserStore {
    fn set_two_factor_enabled(
        &self,
        user: &mut User,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn two_factor_enabled(&self, user: &User, cancel: &CancellationToken) -> StoreResult<bool>;
}

pub trait UserTwoFactorRecoveryCodeStore: UserStore {
    /// Replace every recovery code of the user.
    fn replace_codes(
        &self,
        user: &mut User,
        codes: Vec<String>,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    /// Consume `code`; `false` when the user does not hold it.
    fn redeem_code(
        &self,
        user: &mut User,
        code: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<bool>;

    fn count_codes(&self, user: &User, cancel: &CancellationToken) -> StoreResult<usize>;
}

pub trait UserClaimStore: UserStore {
    fn claims(&self, user: &User, cancel: &CancellationToken) -> StoreResult<Vec<Claim>>;

    /// Add claims; a claim whose type is already held is ignored.
    fn add_claims(
        &self,
        user: &mut User,
        claims: &[Claim],
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn replace_claim(
        &self,
        user: &mut User,
        claim: &Claim,
        new_claim: Claim,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn remove_claims(
        &self,
        user: &mut User,
        claims: &[Claim],
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn users_for_claim(
        &self,
        claim: &Claim,
        cancel: &CancellationToken,
    ) -> impl Future<Output = StoreResult<Vec<User>>> + Send;
}

pub trait UserAuthenticationTokenStore: UserStore {
    /// Store a token, replacing the one with the same provider and name.
    fn set_token(
        &self,
        user: &mut User,
        provider: &str,
        name: &str,
        value: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn remove_token(
        &self,
        user: &mut User,
        provider: &str,
        name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn token(
        &self,
        user: &User,
        provider: &str,
        name: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<Option<String>>;
}

pub trait UserAuthenticatorKeyStore: UserStore {
    fn set_authenticator_key(
        &self,
        user: &mut User,
        key: &str,
        cancel: &CancellationToken,
    ) -> StoreResult<()>;

    fn authenticator_key(&self, user: &User, cancel: &CancellationToken)
    -> StoreResult<Option<String>>;
}
