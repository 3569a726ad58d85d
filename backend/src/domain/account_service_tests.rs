//! Tests for the account service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockAccountRepository, MockCredentialHasher, MockTokenBlacklist, MockTokenCodec,
};
use crate::domain::{ErrorCode, RegistrationInput};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[derive(Default)]
struct Mocks {
    accounts: MockAccountRepository,
    hasher: MockCredentialHasher,
    tokens: MockTokenCodec,
    blacklist: MockTokenBlacklist,
}

impl Mocks {
    fn into_service(self, policy: AccountPolicy) -> AccountService {
        AccountService::new(
            AccountPorts {
                accounts: Arc::new(self.accounts),
                hasher: Arc::new(self.hasher),
                tokens: Arc::new(self.tokens),
                blacklist: Arc::new(self.blacklist),
            },
            Arc::new(FixtureClock {
                utc_now: fixture_timestamp(),
            }),
            policy,
        )
    }
}

fn registration(admin: bool) -> Registration {
    Registration::parse(RegistrationInput {
        username: Some("ada"),
        password: Some("Analyt1cal!"),
        email: Some("ada@example.com"),
        name: Some("Ada Lovelace"),
        admin,
    })
    .expect("valid registration")
}

fn stored_account(is_admin: bool) -> Account {
    Account {
        username: "ada".to_owned(),
        email: "ada@example.com".to_owned(),
        name: "Ada Lovelace".to_owned(),
        password_hash: "$argon2id$stub".to_owned(),
        is_admin,
        created_at: fixture_timestamp(),
    }
}

fn claims(user: &str, admin: bool) -> Claims {
    Claims {
        user: user.to_owned(),
        admin,
        exp: fixture_timestamp().timestamp() + 600,
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_usernames_are_conflicts() {
    let mut mocks = Mocks::default();
    mocks
        .accounts
        .expect_find_by_username()
        .return_once(|_| Ok(Some(stored_account(false))));
    mocks.hasher.expect_hash().times(0);

    let err = mocks
        .into_service(AccountPolicy::default())
        .register(registration(false))
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Username already exists");
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_surface_from_the_insert() {
    let mut mocks = Mocks::default();
    mocks
        .accounts
        .expect_find_by_username()
        .return_once(|_| Ok(None));
    mocks
        .hasher
        .expect_hash()
        .return_once(|_| Ok("$argon2id$stub".to_owned()));
    mocks
        .accounts
        .expect_insert()
        .return_once(|_| Err(AccountRepositoryError::duplicate("email")));

    let err = mocks
        .into_service(AccountPolicy::default())
        .register(registration(false))
        .await
        .expect_err("duplicate email");
    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "Email already registered");
}

#[rstest]
#[case(false, false)]
#[case(true, true)]
#[tokio::test]
async fn admin_requests_follow_policy(#[case] allowed: bool, #[case] expect_admin: bool) {
    let mut mocks = Mocks::default();
    mocks
        .accounts
        .expect_find_by_username()
        .return_once(|_| Ok(None));
    mocks
        .hasher
        .expect_hash()
        .return_once(|_| Ok("$argon2id$stub".to_owned()));
    mocks
        .accounts
        .expect_insert()
        .withf(move |account| account.is_admin == expect_admin)
        .return_once(|_| Ok(()));
    mocks
        .tokens
        .expect_issue()
        .withf(move |claims| claims.admin == expect_admin)
        .return_once(|_| Ok("token".to_owned()));

    let policy = AccountPolicy {
        allow_admin_registration: allowed,
        ..AccountPolicy::default()
    };
    let issued = mocks
        .into_service(policy)
        .register(registration(true))
        .await
        .expect("registered");
    assert_eq!(issued.token, "token");
    assert_eq!(issued.email, "ada@example.com");
}

#[rstest]
#[tokio::test]
async fn tokens_expire_after_the_configured_ttl() {
    let mut mocks = Mocks::default();
    mocks
        .accounts
        .expect_find_by_username()
        .return_once(|_| Ok(Some(stored_account(false))));
    mocks.hasher.expect_verify().return_once(|_, _| Ok(true));
    let expected_exp = (fixture_timestamp() + TimeDelta::minutes(30)).timestamp();
    mocks
        .tokens
        .expect_issue()
        .withf(move |claims| claims.exp == expected_exp && claims.user == "ada")
        .return_once(|_| Ok("token".to_owned()));

    let credentials =
        LoginCredentials::try_from_parts("ada", "Analyt1cal!").expect("credentials");
    mocks
        .into_service(AccountPolicy::default())
        .login(credentials)
        .await
        .expect("login");
}

#[rstest]
#[case(None, false)]
#[case(Some(stored_account(false)), false)]
#[tokio::test]
async fn failed_logins_share_one_message(#[case] account: Option<Account>, #[case] verified: bool) {
    let mut mocks = Mocks::default();
    mocks
        .accounts
        .expect_find_by_username()
        .return_once(move |_| Ok(account));
    mocks
        .hasher
        .expect_verify()
        .returning(move |_, _| Ok(verified));

    let credentials = LoginCredentials::try_from_parts("ada", "wrong").expect("credentials");
    let err = mocks
        .into_service(AccountPolicy::default())
        .login(credentials)
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[tokio::test]
async fn revoked_tokens_are_rejected() {
    let mut mocks = Mocks::default();
    mocks
        .tokens
        .expect_decode()
        .return_once(|_| Ok(claims("ada", false)));
    mocks
        .blacklist
        .expect_is_revoked()
        .return_once(|_| Ok(true));

    let err = mocks
        .into_service(AccountPolicy::default())
        .authenticate("revoked")
        .await
        .expect_err("revoked");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[case(TokenCodecError::expired())]
#[case(TokenCodecError::invalid("bad signature"))]
#[tokio::test]
async fn undecodable_tokens_are_unauthorised(#[case] failure: TokenCodecError) {
    let mut mocks = Mocks::default();
    mocks.tokens.expect_decode().return_once(move |_| Err(failure));
    mocks.blacklist.expect_is_revoked().times(0);

    let err = mocks
        .into_service(AccountPolicy::default())
        .authenticate("token")
        .await
        .expect_err("rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn logout_revokes_until_expiry() {
    let mut mocks = Mocks::default();
    mocks
        .tokens
        .expect_decode()
        .return_once(|_| Ok(claims("ada", true)));
    mocks
        .blacklist
        .expect_is_revoked()
        .return_once(|_| Ok(false));
    let expected_expiry = fixture_timestamp() + TimeDelta::seconds(600);
    mocks
        .blacklist
        .expect_revoke()
        .withf(move |token, expires_at| token == "live" && *expires_at == expected_expiry)
        .times(1)
        .return_once(|_, _| Ok(()));

    let service = mocks.into_service(AccountPolicy::default());
    let principal = service.authenticate("live").await.expect("valid token");
    assert!(principal.is_admin);
    service.logout(&principal).await.expect("logout");
}
