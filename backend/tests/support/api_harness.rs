//! Server harness and shared world for end-to-end API behaviour tests.
//!
//! The harness owns a single-threaded Tokio runtime plus a `LocalSet` because
//! Actix uses `spawn_local` internally. The `WorldFixture` stops the server
//! even if a scenario panics.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use actix_web::http::Method;
use actix_web::{App, HttpServer, web};
use awc::Client;
use chrono::{TimeDelta, Utc};
use food_places::Trace;
use food_places::domain::ports::TokenCodec;
use food_places::domain::{
    AccountPolicy, AccountPorts, AccountService, BusinessService, CatalogueService, Claims,
    TRACE_ID_HEADER,
};
use food_places::inbound::http::configure;
use food_places::inbound::http::guards::ACCESS_TOKEN_HEADER;
use food_places::inbound::http::health::{HealthState, StorageBackend, live, ready};
use food_places::inbound::http::state::{HttpState, HttpStatePorts};
use food_places::outbound::memory::{
    MemoryAccountRepository, MemoryBusinessRepository, MemoryCityRepository,
    MemoryTokenBlacklist,
};
use food_places::outbound::security::{Argon2Hasher, JwtCodec};
use mockable::DefaultClock;
use serde_json::Value;
use tokio::runtime::Runtime;
use tokio::task::LocalSet;
use zeroize::Zeroizing;

const SIGNING_SECRET: &[u8] = b"end-to-end-signing-secret-for-tests";

/// Request body variants understood by [`send`].
pub(crate) enum Payload {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// Credentials attached to a request.
pub(crate) enum Auth {
    Anonymous,
    Token(String),
    Basic { username: String, password: String },
}

pub(crate) struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) auth: Auth,
    pub(crate) payload: Payload,
}

impl ApiRequest {
    pub(crate) fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            auth: Auth::Anonymous,
            payload: Payload::Empty,
        }
    }

    pub(crate) fn token(mut self, token: impl Into<String>) -> Self {
        self.auth = Auth::Token(token.into());
        self
    }

    pub(crate) fn basic(mut self, username: &str, password: &str) -> Self {
        self.auth = Auth::Basic {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        self
    }

    pub(crate) fn json(mut self, payload: Value) -> Self {
        self.payload = Payload::Json(payload);
        self
    }

    pub(crate) fn form(mut self, fields: &[(&str, &str)]) -> Self {
        self.payload = Payload::Form(
            fields
                .iter()
                .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
                .collect(),
        );
        self
    }
}

pub(crate) struct ApiWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) base_url: String,
    pub(crate) server: ServerHandle,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
    pub(crate) token: Option<String>,
    /// Identifiers captured by earlier steps, keyed by role.
    pub(crate) ids: HashMap<&'static str, String>,
}

impl ApiWorld {
    pub(crate) fn id(&self, key: &str) -> String {
        self.ids
            .get(key)
            .cloned()
            .unwrap_or_else(|| panic!("no {key} captured"))
    }

    pub(crate) fn body(&self) -> &Value {
        self.last_body.as_ref().expect("response body")
    }
}

pub(crate) type SharedWorld = Rc<RefCell<ApiWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        shutdown(self.world.clone());
    }
}

pub(crate) fn shutdown(world: SharedWorld) {
    // `LocalSet` must be driven on the thread that owns it, so we lock the world
    // while calling `block_on`. The future must not try to lock the world.
    let ctx = world.borrow();
    let server = ctx.server.clone();
    ctx.local.block_on(&ctx.runtime, async move {
        server.stop(true).await;
    });
}

pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

fn codec() -> JwtCodec {
    JwtCodec::new(&Zeroizing::new(SIGNING_SECRET.to_vec()))
}

/// Mint a token signed with the harness secret.
pub(crate) fn mint_token(user: &str, admin: bool) -> String {
    codec()
        .issue(&Claims {
            user: user.to_owned(),
            admin,
            exp: (Utc::now() + TimeDelta::minutes(30)).timestamp(),
        })
        .expect("token issues")
}

fn memory_state(base_url: &str) -> HttpState {
    let clock = Arc::new(DefaultClock);
    let catalogue = Arc::new(CatalogueService::new(
        Arc::new(MemoryCityRepository::new()),
        clock.clone(),
    ));
    let accounts = AccountService::new(
        AccountPorts {
            accounts: Arc::new(MemoryAccountRepository::new()),
            hasher: Arc::new(Argon2Hasher::new()),
            tokens: Arc::new(codec()),
            blacklist: Arc::new(MemoryTokenBlacklist::new(clock.clone())),
        },
        clock,
        AccountPolicy::default(),
    );
    HttpState::new(
        HttpStatePorts {
            catalogue_query: catalogue.clone(),
            catalogue_command: catalogue,
            businesses: Arc::new(BusinessService::new(Arc::new(
                MemoryBusinessRepository::new(),
            ))),
            auth: Arc::new(accounts),
        },
        base_url,
    )
}

async fn spawn_api_server(listener: TcpListener, base_url: String) -> Result<ServerHandle, String> {
    let http_data = web::Data::new(memory_state(&base_url));
    let health_data = web::Data::new(HealthState::new(StorageBackend::Memory));
    health_data.mark_ready();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(http_data.clone())
            .app_data(health_data.clone())
            .wrap(Trace)
            .configure(configure)
            .service(ready)
            .service(live)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok(handle)
}

fn create_runtime_and_local() -> (Runtime, LocalSet) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();

    (runtime, local)
}

pub(crate) fn world() -> WorldFixture {
    let (runtime, local) = create_runtime_and_local();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    let base_url = format!("http://{addr}");
    let server = local
        .block_on(&runtime, spawn_api_server(listener, base_url.clone()))
        .expect("server starts");

    WorldFixture {
        world: Rc::new(RefCell::new(ApiWorld {
            runtime,
            local,
            base_url,
            server,
            last_status: None,
            last_body: None,
            last_trace_id: None,
            token: None,
            ids: HashMap::new(),
        })),
    }
}

/// Issue `request` against the running server and record the response.
pub(crate) fn send(world: &SharedWorld, request: ApiRequest) {
    let ApiRequest {
        method,
        path,
        auth,
        payload,
    } = request;
    let (status, trace_id, body) = with_world_async(world, |base_url| async move {
        let mut builder = Client::default().request(method, format!("{base_url}{path}"));
        builder = match auth {
            Auth::Anonymous => builder,
            Auth::Token(token) => builder.insert_header((ACCESS_TOKEN_HEADER, token)),
            Auth::Basic { username, password } => builder.basic_auth(username, password),
        };
        let mut response = match payload {
            Payload::Empty => builder.send().await,
            Payload::Json(value) => builder.send_json(&value).await,
            Payload::Form(fields) => builder.send_form(&fields).await,
        }
        .expect("request completes");
        let status = response.status().as_u16();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let bytes = response.body().await.expect("response body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, trace_id, body)
    });

    let mut ctx = world.borrow_mut();
    ctx.last_status = Some(status);
    ctx.last_trace_id = trace_id;
    ctx.last_body = Some(body);
}

/// Strip the server origin from an absolute URL returned by the API.
pub(crate) fn path_of(world: &SharedWorld, url: &str) -> String {
    let base_url = world.borrow().base_url.clone();
    url.strip_prefix(&base_url)
        .unwrap_or_else(|| panic!("{url} should start with {base_url}"))
        .to_owned()
}
