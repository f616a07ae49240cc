//! End-to-end registration scenarios over the in-process store.
//!
//! Requests go through the real handlers, trace middleware and registration
//! services. The account store is wrapped in a counting double so tests can
//! assert that rejected requests never reach storage.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use hostwatch::Trace;
use hostwatch::domain::credentials::CostParameters;
use hostwatch::domain::ports::{
    AccountPersistenceError, AccountRepository, HostPersistenceError, HostRepository,
};
use hostwatch::domain::{
    AccountRegistrationService, BearerToken, CredentialHasher, EmailAddress, HostRegistrationService,
    Hostname, NewAccount, NewHost, RecordId, Username,
};
use hostwatch::inbound::http::HttpState;
use hostwatch::inbound::http::accounts::create_account;
use hostwatch::inbound::http::hosts::create_host;
use hostwatch::outbound::memory::{InMemoryAccountRepository, InMemoryHostRepository};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

// -----------------------------------------------------------------------------
// Doubles
// -----------------------------------------------------------------------------

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn registration_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0)
        .single()
        .expect("valid timestamp")
}

/// Counts every call that reaches storage.
#[derive(Clone, Default)]
struct StoreCalls(Arc<AtomicUsize>);

impl StoreCalls {
    fn record(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn total(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

struct CountingAccounts {
    inner: InMemoryAccountRepository,
    calls: StoreCalls,
}

#[async_trait]
impl AccountRepository for CountingAccounts {
    async fn exists(
        &self,
        username: &Username,
        email: &EmailAddress,
    ) -> Result<bool, AccountPersistenceError> {
        self.calls.record();
        self.inner.exists(username, email).await
    }

    async fn exists_by_id(&self, id: &RecordId) -> Result<bool, AccountPersistenceError> {
        self.calls.record();
        self.inner.exists_by_id(id).await
    }

    async fn find_by_token(
        &self,
        token: &BearerToken,
    ) -> Result<Option<RecordId>, AccountPersistenceError> {
        self.calls.record();
        self.inner.find_by_token(token).await
    }

    async fn insert(
        &self,
        account: &NewAccount,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, AccountPersistenceError> {
        self.calls.record();
        self.inner.insert(account, created_at).await
    }
}

struct CountingHosts {
    inner: InMemoryHostRepository,
    calls: StoreCalls,
}

#[async_trait]
impl HostRepository for CountingHosts {
    async fn owner_exists(&self, owner: &RecordId) -> Result<bool, HostPersistenceError> {
        self.calls.record();
        self.inner.owner_exists(owner).await
    }

    async fn exists(
        &self,
        owner: &RecordId,
        hostname: &Hostname,
    ) -> Result<bool, HostPersistenceError> {
        self.calls.record();
        self.inner.exists(owner, hostname).await
    }

    async fn insert(
        &self,
        host: &NewHost,
        created_at: DateTime<Utc>,
    ) -> Result<RecordId, HostPersistenceError> {
        self.calls.record();
        self.inner.insert(host, created_at).await
    }
}

// -----------------------------------------------------------------------------
// Harness
// -----------------------------------------------------------------------------

struct Harness {
    accounts: InMemoryAccountRepository,
    hosts: InMemoryHostRepository,
    calls: StoreCalls,
    state: web::Data<HttpState>,
}

#[fixture]
fn harness() -> Harness {
    let accounts = InMemoryAccountRepository::new();
    let hosts = InMemoryHostRepository::new(accounts.clone());
    let calls = StoreCalls::default();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(registration_time()));

    let account_store = Arc::new(CountingAccounts {
        inner: accounts.clone(),
        calls: calls.clone(),
    });
    let host_store = Arc::new(CountingHosts {
        inner: hosts.clone(),
        calls: calls.clone(),
    });
    let hasher = CredentialHasher::with_cost(CostParameters {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    });

    let state = HttpState::new(
        Arc::new(
            AccountRegistrationService::new(Arc::clone(&account_store), Arc::clone(&clock))
                .with_hasher(hasher),
        ),
        Arc::new(HostRegistrationService::new(account_store, host_store, clock)),
    );

    Harness {
        accounts,
        hosts,
        calls,
        state: web::Data::new(state),
    }
}

fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(create_account)
        .service(create_host)
}

fn alice() -> Value {
    json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "s3cret!",
    })
}

async fn post_json<S>(app: &S, uri: &str, body: &Value) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(uri)
            .set_json(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

async fn post_raw<S>(app: &S, uri: &str, body: &'static str) -> (StatusCode, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri(uri)
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_request(),
    )
    .await;
    let status = res.status();
    let body: Value = test::read_body_json(res).await;
    (status, body)
}

fn account_id(body: &Value) -> Value {
    body.pointer("/metadata/id").cloned().expect("account id")
}

// -----------------------------------------------------------------------------
// Scenarios
// -----------------------------------------------------------------------------

#[rstest]
#[actix_web::test]
async fn new_account_gets_an_id_and_a_token_but_no_password(harness: Harness) {
    let app = test::init_service(app(harness.state.clone())).await;

    let (status, body) = post_json(&app, "/user/create", &alice()).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully!");
    let metadata = body["metadata"].as_object().expect("metadata object");
    assert!(metadata.get("id").is_some_and(|id| !id.is_null()));
    assert!(!metadata.contains_key("password"));
    assert!(!metadata.contains_key("salt"));
    let token = metadata["token"].as_str().expect("token");
    assert_eq!(token.len(), 64);
    assert!(token.bytes().all(|b| b.is_ascii_alphanumeric()));
    assert_eq!(metadata["creationDate"], "2024-06-01T08:30:00Z");
    assert_eq!(harness.accounts.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn repeating_a_registration_is_a_conflict(harness: Harness) {
    let app = test::init_service(app(harness.state.clone())).await;

    let (first, _) = post_json(&app, "/user/create", &alice()).await;
    let (second, body) = post_json(&app, "/user/create", &alice()).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert!(body.get("traceId").is_some());
    assert_eq!(harness.accounts.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn host_registers_under_an_existing_owner(harness: Harness) {
    let app = test::init_service(app(harness.state.clone())).await;
    let (_, account) = post_json(&app, "/user/create", &alice()).await;
    let owner = account_id(&account);

    let (status, body) = post_json(
        &app,
        "/server/create",
        &json!({ "hostname": "web1", "user": { "id": owner } }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Server created successfully!");
    assert_eq!(body["metadata"]["hostname"], "web1");
    assert_eq!(body["metadata"]["owner"], owner);
    assert_eq!(harness.hosts.len(), 1);
}

#[rstest]
#[actix_web::test]
async fn repeating_a_host_registration_is_a_conflict(harness: Harness) {
    let app = test::init_service(app(harness.state.clone())).await;
    let (_, account) = post_json(&app, "/user/create", &alice()).await;
    let request = json!({ "hostname": "web1", "user": { "id": account_id(&account) } });

    let (first, _) = post_json(&app, "/server/create", &request).await;
    let (second, body) = post_json(&app, "/server/create", &request).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(harness.hosts.len(), 1);
}

#[rstest]
#[case("/user/create")]
#[case("/server/create")]
#[actix_web::test]
async fn malformed_bodies_are_unprocessable_and_touch_no_store(
    harness: Harness,
    #[case] uri: &str,
) {
    let app = test::init_service(app(harness.state.clone())).await;

    let (status, body) = post_raw(&app, uri, "{\"username\": \"alice\",").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "unprocessable_entity");
    assert_eq!(harness.calls.total(), 0);
}

// -----------------------------------------------------------------------------
// Owner resolution and input edge cases
// -----------------------------------------------------------------------------

#[rstest]
#[actix_web::test]
async fn token_query_parameter_names_the_owner(harness: Harness) {
    let app = test::init_service(app(harness.state.clone())).await;
    let (_, account) = post_json(&app, "/user/create", &alice()).await;
    let token = account["metadata"]["token"].as_str().expect("token");

    let (status, body) = post_json(
        &app,
        &format!("/server/create?token={token}"),
        &json!({ "hostname": "web1", "operatingSystemName": "Linux" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["metadata"]["owner"], account_id(&account));
    assert_eq!(body["metadata"]["operatingSystemName"], "Linux");
}

#[rstest]
#[case(json!({ "hostname": "web1" }), StatusCode::BAD_REQUEST, "invalid_request")]
#[case(json!({ "hostname": "web1", "user": { "id": 999 } }), StatusCode::NOT_FOUND, "not_found")]
#[case(json!({ "hostname": "   ", "user": { "id": 1 } }), StatusCode::BAD_REQUEST, "invalid_request")]
#[actix_web::test]
async fn unusable_host_requests_are_rejected(
    harness: Harness,
    #[case] request: Value,
    #[case] expected: StatusCode,
    #[case] code: &str,
) {
    let app = test::init_service(app(harness.state.clone())).await;
    post_json(&app, "/user/create", &alice()).await;

    let (status, body) = post_json(&app, "/server/create", &request).await;

    assert_eq!(status, expected);
    assert_eq!(body["code"], code);
    assert!(harness.hosts.is_empty());
}

#[rstest]
#[actix_web::test]
async fn unknown_tokens_are_invalid_input(harness: Harness) {
    let app = test::init_service(app(harness.state.clone())).await;
    let stranger = "x".repeat(64);

    let (status, body) = post_json(
        &app,
        &format!("/server/create?token={stranger}"),
        &json!({ "hostname": "web1" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid token");
}

#[rstest]
#[case(json!({ "username": "al", "email": "alice@example.com", "password": "s3cret!" }), "username")]
#[case(json!({ "username": "alice", "email": "a@b.io", "password": "s3cret!" }), "email")]
#[case(json!({ "username": "alice", "email": "alice-at-example.com", "password": "s3cret!" }), "email")]
#[actix_web::test]
async fn invalid_accounts_name_the_offending_field(
    harness: Harness,
    #[case] request: Value,
    #[case] field: &str,
) {
    let app = test::init_service(app(harness.state.clone())).await;

    let (status, body) = post_json(&app, "/user/create", &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
    assert_eq!(harness.calls.total(), 0);
    assert!(harness.accounts.is_empty());
}
