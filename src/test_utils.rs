//! Shared fixtures for handler and end-to-end tests: an in-memory [`Store`]
//! with the same branch semantics as [`crate::db::PgStore`], stubbed provider
//! endpoints, and a `TestServer` wired exactly like the production service.

use std::sync::{Arc, Mutex};

use axum::{ServiceExt, middleware::from_fn};
use axum_test::TestServer;
use tower::Layer;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{
    AppState, Config, build_router,
    db::{
        BirthdayId, CredentialId, Store,
        errors::Result,
        models::{
            birthdays::{BirthdayCreateDBRequest, BirthdayDBResponse},
            credentials::{CredentialCreateDBRequest, CredentialDBResponse},
        },
    },
    providers::{ApodClient, FetchApod, FetchDateFact, NumbersClient},
};

#[derive(Default)]
struct MemState {
    birthdays: Vec<BirthdayDBResponse>,
    credentials: Vec<CredentialDBResponse>,
    next_birthday_id: BirthdayId,
    next_credential_id: CredentialId,
}

/// In-memory [`Store`] mirroring the PostgreSQL implementation: monotonic
/// identity assignment, the max-id credential link, and the no-duplicate-
/// credential branch of the save procedure.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<MemState>,
}

impl MemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn birthdays(&self) -> Vec<BirthdayDBResponse> {
        self.inner.lock().unwrap().birthdays.clone()
    }

    pub fn credentials(&self) -> Vec<CredentialDBResponse> {
        self.inner.lock().unwrap().credentials.clone()
    }

    pub fn seed_birthday(&self, birthday: BirthdayDBResponse) {
        let mut state = self.inner.lock().unwrap();
        state.next_birthday_id = state.next_birthday_id.max(birthday.id);
        state.birthdays.push(birthday);
    }

    pub fn seed_credential(&self, credential: CredentialDBResponse) {
        let mut state = self.inner.lock().unwrap();
        state.next_credential_id = state.next_credential_id.max(credential.user_id);
        state.credentials.push(credential);
    }
}

#[async_trait::async_trait]
impl Store for MemStore {
    async fn list_birthdays(&self) -> Result<Vec<BirthdayDBResponse>> {
        Ok(self.birthdays())
    }

    async fn get_birthday(&self, id: BirthdayId) -> Result<Option<BirthdayDBResponse>> {
        Ok(self.inner.lock().unwrap().birthdays.iter().find(|b| b.id == id).cloned())
    }

    async fn update_nasa_name(&self, id: BirthdayId, nasa_name: &str) -> Result<Option<BirthdayDBResponse>> {
        let mut state = self.inner.lock().unwrap();
        Ok(state.birthdays.iter_mut().find(|b| b.id == id).map(|birthday| {
            birthday.nasa_name = nasa_name.to_string();
            birthday.clone()
        }))
    }

    async fn find_credential(&self, user_name: &str, user_password: &str) -> Result<Option<CredentialDBResponse>> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .credentials
            .iter()
            .find(|c| c.user_name == user_name && c.user_password == user_password)
            .cloned())
    }

    async fn save_birthday(&self, birthday: &BirthdayCreateDBRequest, credential: &CredentialCreateDBRequest) -> Result<()> {
        let mut state = self.inner.lock().unwrap();

        let already_known = state
            .credentials
            .iter()
            .any(|c| c.user_name == credential.user_name && c.user_password == credential.user_password);

        state.next_birthday_id += 1;
        let id = state.next_birthday_id;
        state.birthdays.push(BirthdayDBResponse {
            id,
            birth_day: birthday.birth_day.clone(),
            birth_month: birthday.birth_month.clone(),
            birth_year: birthday.birth_year.clone(),
            nasa_name: birthday.nasa_name.clone(),
            nasa_url: birthday.nasa_url.clone(),
            fact_year: birthday.fact_year,
            fact_text: birthday.fact_text.clone(),
        });

        if !already_known {
            let latest = state.birthdays.iter().map(|b| b.id).max().expect("just inserted");
            state.next_credential_id += 1;
            let user_id = state.next_credential_id;
            state.credentials.push(CredentialDBResponse {
                user_id,
                user_name: credential.user_name.clone(),
                user_password: credential.user_password.clone(),
                birthday_id: latest,
            });
        }

        Ok(())
    }

    async fn delete_birthday_and_credential(&self, credential: &CredentialDBResponse) -> Result<()> {
        let mut state = self.inner.lock().unwrap();
        state.credentials.retain(|c| c.user_id != credential.user_id);
        state.birthdays.retain(|b| b.id != credential.birthday_id);
        Ok(())
    }
}

pub fn sample_birthday(id: BirthdayId) -> BirthdayDBResponse {
    BirthdayDBResponse {
        id,
        birth_day: "15".to_string(),
        birth_month: "7".to_string(),
        birth_year: "1990".to_string(),
        nasa_name: "Saturn at Night".to_string(),
        nasa_url: "https://apod.test/saturn.jpg".to_string(),
        fact_year: 1799,
        fact_text: "the Rosetta Stone is found".to_string(),
    }
}

pub fn sample_credential(user_id: CredentialId, birthday_id: BirthdayId) -> CredentialDBResponse {
    CredentialDBResponse {
        user_id,
        user_name: "alice".to_string(),
        user_password: "secret".to_string(),
        birthday_id,
    }
}

/// Configuration pointing both providers at a stub server.
pub fn test_config(mock_uri: &str) -> Config {
    let mut config = Config::default();
    config.database_url = "postgres://unused-in-tests".to_string();
    config.providers.apod_url = Url::parse(&format!("{mock_uri}/planetary/apod")).expect("mock APOD url");
    config.providers.date_facts_url = Url::parse(mock_uri).expect("mock date facts url");
    config.providers.request_timeout_secs = 5;
    config
}

/// Mount the default provider stubs: title "T" / image "U" from the astronomy
/// endpoint and fact "F" for 1992 from the trivia endpoint.
pub async fn stub_providers(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/planetary/apod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "title": "T",
            "hdurl": "U"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/\d+/\d+/date$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "text": "F",
            "year": 1992,
            "found": true,
            "type": "date"
        })))
        .mount(server)
        .await;
}

/// Application state over an arbitrary store, with real provider clients
/// pointed at the stub server.
pub fn create_test_state(store: Arc<dyn Store>, mock_uri: &str) -> AppState {
    let config = test_config(mock_uri);
    let apod: Arc<dyn FetchApod> = Arc::new(ApodClient::from_config(&config.providers));
    let date_facts: Arc<dyn FetchDateFact> = Arc::new(NumbersClient::from_config(&config.providers));

    AppState::builder()
        .store(store)
        .apod(apod)
        .date_facts(date_facts)
        .config(config)
        .build()
}

/// Test server with the same outermost middleware as production, so the
/// method-override shim is part of what gets tested.
pub fn create_test_app(state: AppState) -> TestServer {
    let middleware = from_fn(crate::method_override);
    let service = middleware.layer(build_router(state));
    TestServer::new(service.into_make_service()).expect("Failed to create test server")
}

/// Persistence is fire-and-forget relative to the response, so tests poll the
/// store briefly instead of assuming the save has landed.
pub async fn wait_for_birthdays(store: &MemStore, count: usize) {
    for _ in 0..200 {
        if store.birthdays().len() >= count {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("store never reached {count} birthday record(s)");
}
