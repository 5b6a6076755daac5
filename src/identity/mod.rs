//! Identity capability contracts.
//!
//! Stores advertise what they can persist by implementing these traits. The
//! document-backed stores in [`crate::store`] implement all of them; code
//! that only needs, say, e-mail lookups can depend on [`UserEmailStore`]
//! alone.

pub mod role;
pub mod user;

pub use role::{QueryableRoleStore, RoleClaimStore, RoleStore};
pub use user::{
    QueryableUserStore, UserAuthenticationTokenStore, UserAuthenticatorKeyStore, UserClaimStore,
    UserEmailStore, UserLockoutStore, UserLoginStore, UserPasswordStore, UserPhoneNumberStore,
    UserRoleStore, UserSecurityStampStore, UserStore, UserTwoFactorRecoveryCodeStore,
    UserTwoFactorStore,
};
