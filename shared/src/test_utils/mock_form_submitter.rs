use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::bsd::{CrmError, ExternalPayload, FormSubmitter};

/// Records every submission instead of calling BSD
#[derive(Default)]
pub struct MockFormSubmitter {
    submissions: Mutex<Vec<(String, ExternalPayload)>>,
    reject: AtomicBool,
}

impl MockFormSubmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following submission return a rejection
    pub fn reject_submissions(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    pub fn submissions(&self) -> Vec<(String, ExternalPayload)> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn last_payload(&self) -> Option<ExternalPayload> {
        self.submissions
            .lock()
            .unwrap()
            .last()
            .map(|(_, payload)| payload.clone())
    }
}

#[async_trait]
impl FormSubmitter for MockFormSubmitter {
    async fn submit_form(&self, form_slug: &str, payload: &ExternalPayload) -> Result<(), CrmError> {
        self.submissions
            .lock()
            .unwrap()
            .push((form_slug.to_string(), payload.clone()));

        if self.reject.load(Ordering::SeqCst) {
            return Err(CrmError::Rejected("mock rejection".to_string()));
        }

        Ok(())
    }
}
