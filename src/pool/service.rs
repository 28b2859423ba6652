use std::task::{Context, Poll};

use tonic::body::Body;
use tonic::codegen::http;
use tonic::transport::Channel;
use tower::ServiceExt;
use tower::util::Oneshot;

use super::ConnPool;

/// Lets a pool stand in for a [`Channel`] when building gRPC clients.
///
/// Every request is routed to the connection chosen by [`ConnPool::conn`].
/// Readiness is awaited on that channel as part of the call, so the pool
/// itself is always ready.
impl tower::Service<http::Request<Body>> for ConnPool<Channel> {
    type Response = http::Response<Body>;
    type Error = tonic::transport::Error;
    type Future = Oneshot<Channel, http::Request<Body>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<Body>) -> Self::Future {
        self.conn().oneshot(request)
    }
}
