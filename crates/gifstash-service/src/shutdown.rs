use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::task::{Context, Poll};
use std::time::Duration;

use http::{Request, Response, StatusCode};
use tower::{Layer, Service};

/// Tracks shutdown status and the number of requests still in flight.
#[derive(Clone, Default)]
pub struct ShutdownState {
    shutting_down: Arc<AtomicBool>,
    in_flight: Arc<AtomicUsize>,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Resolves once every in-flight request has finished.
    pub async fn drained(&self) {
        while self.in_flight() > 0 {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }

    fn track(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        InFlightGuard(self.in_flight.clone())
    }
}

/// Decrements the counter when the request future completes or is dropped.
struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Tower layer that rejects new requests with 503 once shutdown has begun,
/// while letting in-flight requests run to completion.
#[derive(Clone)]
pub struct DrainLayer {
    state: ShutdownState,
}

impl DrainLayer {
    pub fn new(state: ShutdownState) -> Self {
        Self { state }
    }
}

impl<S> Layer<S> for DrainLayer {
    type Service = DrainService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DrainService {
            inner,
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct DrainService<S> {
    inner: S,
    state: ShutdownState,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DrainService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if self.state.is_shutting_down() {
            let response = Response::builder()
                .status(StatusCode::SERVICE_UNAVAILABLE)
                .body(ResBody::default())
                .expect("empty 503 response");
            return Box::pin(std::future::ready(Ok(response)));
        }

        let guard = self.state.track();
        let fut = self.inner.call(req);
        Box::pin(async move {
            let result = fut.await;
            drop(guard);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http_body_util::Empty;
    use std::convert::Infallible;
    use tower::{ServiceBuilder, ServiceExt, service_fn};

    async fn slow_echo(
        _req: Request<Empty<Bytes>>,
    ) -> Result<Response<Empty<Bytes>>, Infallible> {
        tokio::time::sleep(Duration::from_millis(10)).await;
        Ok(Response::new(Empty::new()))
    }

    #[tokio::test]
    async fn test_requests_pass_through_before_shutdown() {
        let state = ShutdownState::new();
        let service = ServiceBuilder::new()
            .layer(DrainLayer::new(state.clone()))
            .service(service_fn(slow_echo));

        let req = Request::builder().body(Empty::new()).unwrap();
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_new_requests_rejected_after_shutdown_begins() {
        let state = ShutdownState::new();
        let service = ServiceBuilder::new()
            .layer(DrainLayer::new(state.clone()))
            .service(service_fn(slow_echo));

        state.begin_shutdown();

        let req = Request::builder().body(Empty::new()).unwrap();
        let response = service.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(state.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_in_flight_requests_finish_during_shutdown() {
        let state = ShutdownState::new();
        let service = ServiceBuilder::new()
            .layer(DrainLayer::new(state.clone()))
            .service(service_fn(slow_echo));

        let req = Request::builder().body(Empty::new()).unwrap();
        let inflight = tokio::spawn({
            let svc = service.clone();
            async move { svc.oneshot(req).await }
        });

        tokio::time::sleep(Duration::from_millis(3)).await;
        assert_eq!(state.in_flight(), 1);
        state.begin_shutdown();

        let response = inflight.await.unwrap().unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        state.drained().await;
        assert_eq!(state.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_counter_recovers_when_request_is_cancelled() {
        let state = ShutdownState::new();
        let service = ServiceBuilder::new()
            .layer(DrainLayer::new(state.clone()))
            .service(service_fn(slow_echo));

        let req = Request::builder().body(Empty::new()).unwrap();
        let handle = tokio::spawn({
            let svc = service.clone();
            async move { svc.oneshot(req).await }
        });

        tokio::time::sleep(Duration::from_millis(3)).await;
        assert_eq!(state.in_flight(), 1);
        handle.abort();
        let _ = handle.await;

        assert_eq!(state.in_flight(), 0);
    }
}
