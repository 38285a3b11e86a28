//! The executor capability and the base HTTP executor

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::runtime::errors::{CallError, TransportError};
use crate::runtime::request::{CallOptions, HttpRequest, HttpResponse};

/// One step of the request pipeline
///
/// Every decorator implements this trait and owns the executor it wraps.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<HttpResponse, CallError>;
}

#[async_trait]
impl<T: Executor + ?Sized> Executor for Box<T> {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<HttpResponse, CallError> {
        (**self).execute(request, options).await
    }
}

#[async_trait]
impl<T: Executor + ?Sized> Executor for std::sync::Arc<T> {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<HttpResponse, CallError> {
        (**self).execute(request, options).await
    }
}

/// Innermost executor: sends the request with `reqwest`
///
/// Honors the deadline and cancellation token in [`CallOptions`]; every
/// other failure is returned as-is.
#[derive(Debug, Clone)]
pub struct BaseExecutor {
    client: Client,
}

impl BaseExecutor {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a `reqwest` client with a connect timeout and the crate user agent
    pub fn with_defaults() -> Result<Self, CallError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(TransportError::Request)?;
        Ok(Self { client })
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, CallError> {
        let mut builder = self
            .client
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send().await.map_err(TransportError::Request)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(TransportError::Request)?;

        Ok(HttpResponse::new(status, body.to_vec()).with_headers(headers))
    }
}

#[async_trait]
impl Executor for BaseExecutor {
    async fn execute(
        &self,
        request: HttpRequest,
        options: &CallOptions,
    ) -> Result<HttpResponse, CallError> {
        if options.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }
        let send = self.send(request);
        let bounded = async {
            match options.deadline() {
                Some(deadline) => tokio::time::timeout_at(deadline, send)
                    .await
                    .unwrap_or_else(|_| Err(TransportError::DeadlineExceeded.into())),
                None => send.await,
            }
        };

        match options.cancellation() {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(TransportError::Cancelled.into()),
                result = bounded => result,
            },
            None => bounded.await,
        }
    }
}
