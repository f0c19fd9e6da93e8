use std::collections::HashMap;
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::models::{signup_key, SignupRecord};
use crate::store::{SignupStore, StoreError};

/// In-memory SignupStore keyed by the composite signup key
#[derive(Default)]
pub struct MockSignupStore {
    signups: Mutex<HashMap<String, SignupRecord>>,
    upsert_calls: AtomicUsize,
    fail_upserts: AtomicBool,
}

impl MockSignupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following upsert fail with a database error
    pub fn fail_upserts(&self) {
        self.fail_upserts.store(true, Ordering::SeqCst);
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn all_signups(&self) -> Vec<SignupRecord> {
        let signups = self.signups.lock().unwrap();
        let mut all: Vec<_> = signups.values().cloned().collect();
        all.sort_by(|a, b| a.signup_key.cmp(&b.signup_key));
        all
    }
}

#[async_trait]
impl SignupStore for MockSignupStore {
    async fn upsert_signup(&self, record: SignupRecord) -> Result<SignupRecord, StoreError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_upserts.load(Ordering::SeqCst) {
            return Err(StoreError::Database("mock upsert failure".to_string()));
        }

        let mut signups = self.signups.lock().unwrap();
        signups.insert(record.signup_key.clone(), record.clone());
        Ok(record)
    }

    async fn get_signup(
        &self,
        email: &str,
        recruited_by: &str,
        campaign: &str,
    ) -> Result<SignupRecord, StoreError> {
        let key = signup_key(email, recruited_by, campaign);
        let signups = self.signups.lock().unwrap();
        signups
            .get(&key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("Signup {} not found", key)))
    }
}
