use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tonic::transport::{ClientTlsConfig, Endpoint};

type EndpointFn =
    dyn Fn(Endpoint) -> Result<Endpoint, tonic::transport::Error> + Send + Sync + 'static;

/// A transport-level setting passed through to the dialer.
///
/// Options are applied to the tonic [`Endpoint`] in registration order, so a
/// later option overrides an earlier one touching the same setting.
#[derive(Clone)]
pub struct DialOption {
    name: &'static str,
    apply: Arc<EndpointFn>,
}

impl DialOption {
    /// Wrap an arbitrary fallible endpoint transform.
    pub fn new<F>(name: &'static str, apply: F) -> Self
    where
        F: Fn(Endpoint) -> Result<Endpoint, tonic::transport::Error> + Send + Sync + 'static,
    {
        Self {
            name,
            apply: Arc::new(apply),
        }
    }

    /// Wrap an infallible endpoint transform.
    pub fn map<F>(name: &'static str, apply: F) -> Self
    where
        F: Fn(Endpoint) -> Endpoint + Send + Sync + 'static,
    {
        Self::new(name, move |endpoint| Ok(apply(endpoint)))
    }

    /// Give up on establishing the connection after `timeout`.
    pub fn connect_timeout(timeout: Duration) -> Self {
        Self::map("connect_timeout", move |e| e.connect_timeout(timeout))
    }

    /// Per-request timeout applied to every call on the connection.
    pub fn timeout(timeout: Duration) -> Self {
        Self::map("timeout", move |e| e.timeout(timeout))
    }

    /// Interval between TCP keepalive packets; `None` disables keepalive.
    pub fn tcp_keepalive(interval: Option<Duration>) -> Self {
        Self::map("tcp_keepalive", move |e| e.tcp_keepalive(interval))
    }

    /// Send HTTP/2 PING frames at this interval.
    pub fn http2_keep_alive_interval(interval: Duration) -> Self {
        Self::map("http2_keep_alive_interval", move |e| {
            e.http2_keep_alive_interval(interval)
        })
    }

    /// Cap the number of in-flight requests on the connection.
    pub fn concurrency_limit(limit: usize) -> Self {
        Self::map("concurrency_limit", move |e| e.concurrency_limit(limit))
    }

    /// Set the `user-agent` header sent with every request.
    pub fn user_agent(user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        Self::new("user_agent", move |e| e.user_agent(user_agent.clone()))
    }

    /// Replace the TLS settings used for secure dials.
    pub fn tls_config(config: ClientTlsConfig) -> Self {
        Self::new("tls_config", move |e| e.tls_config(config.clone()))
    }

    /// Label used in logs and `Debug` output.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn apply(&self, endpoint: Endpoint) -> Result<Endpoint, tonic::transport::Error> {
        (self.apply)(endpoint)
    }
}

impl fmt::Debug for DialOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DialOption").field(&self.name).finish()
    }
}
