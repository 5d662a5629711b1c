//! In-memory stand-ins for the hosted services, shared by unit tests.

use crate::dashboard::Operator;
use crate::error::ServiceError;
use crate::models::{ImageList, Property, PropertyDraft, PropertyPayload, Session, SessionUser};
use crate::services::{AuthService, MediaHost, RowStore, ServiceResult, UploadFile};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub const EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "correct horse";

pub fn test_user() -> SessionUser {
    SessionUser {
        id: "user-1".to_string(),
        email: Some(EMAIL.to_string()),
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()
}

pub fn sample_row(n: usize) -> Property {
    Property {
        id: format!("prop-{}", n),
        title: format!("Sample plot {}", n),
        location: "Peradeniya".to_string(),
        perch_price: 450_000.0,
        total_perches: 10.0 + n as f64,
        has_water: true,
        has_electricity: true,
        has_telephone: false,
        distance_to_kandy: Some("4 km from Kandy".to_string()),
        landmark: Some("Near the university".to_string()),
        agent_name: "Channa".to_string(),
        agent_phone: "+94 777 345 678".to_string(),
        images: ImageList::from_items([format!("https://images.test/sample-{}.jpg", n)]),
        description: "Flat land with road access.".to_string(),
        video_url: None,
        tour_360_url: None,
        created_at: epoch() + Duration::minutes(n as i64),
    }
}

pub fn filled_draft() -> PropertyDraft {
    PropertyDraft {
        title: "Premium Residential Land".to_string(),
        location: "Haragama".to_string(),
        perch_price: Some(500_000.0),
        total_perches: Some(20.0),
        agent_name: "Uthpala".to_string(),
        agent_phone: "+94 777 123 456".to_string(),
        description: "Beautiful land plot with all utilities.".to_string(),
        ..Default::default()
    }
}

fn row_from_payload(id: String, created_at: DateTime<Utc>, payload: &PropertyPayload) -> Property {
    Property {
        id,
        title: payload.title.clone(),
        location: payload.location.clone(),
        perch_price: payload.perch_price.unwrap_or_default(),
        total_perches: payload.total_perches.unwrap_or_default(),
        has_water: payload.has_water,
        has_electricity: payload.has_electricity,
        has_telephone: payload.has_telephone,
        distance_to_kandy: payload.distance_to_kandy.clone(),
        landmark: payload.landmark.clone(),
        agent_name: payload.agent_name.clone(),
        agent_phone: payload.agent_phone.clone(),
        images: payload.images.clone(),
        description: payload.description.clone(),
        video_url: payload.video_url.clone(),
        tour_360_url: payload.tour_360_url.clone(),
        created_at,
    }
}

fn rls_denied() -> ServiceError {
    ServiceError::api(403, "new row violates row-level security policy")
}

/// Row store backed by a vector; ids are `prop-N` in insertion order
#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<Vec<Property>>,
    next_id: AtomicUsize,
    fail_list: AtomicBool,
    fail_mutations: AtomicBool,
    list_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    last_payload: Mutex<Option<PropertyPayload>>,
}

impl InMemoryStore {
    pub fn with_rows(n: usize) -> Self {
        let store = Self::default();
        *store.rows.lock().unwrap() = (1..=n).map(sample_row).collect();
        store.next_id.store(n, Ordering::SeqCst);
        store
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<PropertyPayload> {
        self.last_payload.lock().unwrap().clone()
    }

    fn check_mutation(&self, payload: Option<&PropertyPayload>) -> ServiceResult<()> {
        if let Some(payload) = payload {
            *self.last_payload.lock().unwrap() = Some(payload.clone());
        }
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(rls_denied());
        }
        Ok(())
    }
}

#[async_trait]
impl RowStore for InMemoryStore {
    async fn list(&self, _auth: Option<&Session>) -> ServiceResult<Vec<Property>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ServiceError::api(503, "Service Unavailable"));
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn count(&self, _auth: Option<&Session>) -> ServiceResult<u64> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ServiceError::api(404, "relation \"public.properties\" does not exist"));
        }
        Ok(self.len() as u64)
    }

    async fn insert(
        &self,
        _auth: Option<&Session>,
        payload: &PropertyPayload,
    ) -> ServiceResult<Property> {
        self.check_mutation(Some(payload))?;
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = row_from_payload(
            format!("prop-{}", n),
            epoch() + Duration::minutes(n as i64),
            payload,
        );
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        _auth: Option<&Session>,
        id: &str,
        payload: &PropertyPayload,
    ) -> ServiceResult<Property> {
        self.check_mutation(Some(payload))?;
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ServiceError::api(404, format!("Property {} not found", id)))?;
        *row = row_from_payload(row.id.clone(), row.created_at, payload);
        Ok(row.clone())
    }

    async fn delete(&self, _auth: Option<&Session>, id: &str) -> ServiceResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check_mutation(None)?;
        self.rows.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }
}

/// Accepts only [`EMAIL`] / [`PASSWORD`]
#[derive(Default)]
pub struct FakeAuth {
    sign_outs: AtomicUsize,
}

impl FakeAuth {
    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthService for FakeAuth {
    async fn sign_in(&self, email: &str, password: &str) -> ServiceResult<Session> {
        if email == EMAIL && password == PASSWORD {
            Ok(Session::new(
                "token-1".to_string(),
                Some("refresh-1".to_string()),
                3600,
                test_user(),
            ))
        } else {
            Err(ServiceError::api(400, "Invalid login credentials"))
        }
    }

    async fn sign_out(&self, _session: &Session) -> ServiceResult<()> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Media host that hands back `https://media.test/<file name>`
#[derive(Default)]
pub struct FakeMedia {
    fail_on: AtomicUsize,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeMedia {
    /// Make the nth upload (1-based) fail
    pub fn fail_on_call(&self, n: usize) {
        self.fail_on.store(n, Ordering::SeqCst);
    }

    pub fn attempts(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(name, _)| name.clone()).collect()
    }

    pub fn targets(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(_, target)| target.clone()).collect()
    }
}

#[async_trait]
impl MediaHost for FakeMedia {
    async fn upload(&self, file: &UploadFile, upload_target: &str) -> ServiceResult<String> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((file.name.clone(), upload_target.to_string()));
            calls.len()
        };
        if n == self.fail_on.load(Ordering::SeqCst) {
            return Err(ServiceError::api(400, "Upload preset not found"));
        }
        Ok(format!("https://media.test/{}", file.name))
    }

    fn host_name(&self) -> &'static str {
        "test media"
    }
}

/// Answers every confirmation the same way and records what was shown
pub struct ScriptedOperator {
    answer: AtomicBool,
    prompts: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            prompts: Mutex::new(Vec::new()),
            alerts: Mutex::new(Vec::new()),
        }
    }

    pub fn answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Operator for ScriptedOperator {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.load(Ordering::SeqCst)
    }

    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
