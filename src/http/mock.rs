//! In-process backend for unit tests

use super::backend::{HttpBackend, HttpRequest, HttpResponse};
use super::tls::TrustMode;
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&HttpRequest, TrustMode) -> Result<HttpResponse> + Send + Sync>;

/// Backend that answers from a script and records every call
pub struct ScriptedBackend {
    responder: Option<Responder>,
    queue: Mutex<VecDeque<Result<HttpResponse>>>,
    calls: Mutex<Vec<(HttpRequest, TrustMode)>>,
}

impl ScriptedBackend {
    /// Answer calls in order from `responses`
    pub fn queue(responses: Vec<Result<HttpResponse>>) -> Self {
        Self {
            responder: None,
            queue: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with `f`
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&HttpRequest, TrustMode) -> Result<HttpResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Some(Box::new(f)),
            queue: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Recorded calls
    pub fn calls(&self) -> Vec<(HttpRequest, TrustMode)> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpBackend for ScriptedBackend {
    async fn execute(&self, request: &HttpRequest, trust: TrustMode) -> Result<HttpResponse> {
        self.calls.lock().unwrap().push((request.clone(), trust));
        if let Some(responder) = &self.responder {
            return responder(request, trust);
        }
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::Other("no scripted response left".to_string())))
    }
}
