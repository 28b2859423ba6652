//! The connection-establishment primitive the pools are built on.

mod grpc;

pub use grpc::{DEFAULT_ENDPOINT, GrpcDialer};

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::connection::Connection;
use crate::error::DialError;
use crate::options::DialOption;

/// Whether a dial negotiates transport security.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    /// TLS, `https` scheme.
    Secure,
    /// Plaintext, `http` scheme.
    Insecure,
}

impl Security {
    /// URI scheme matching the mode.
    pub fn scheme(self) -> &'static str {
        match self {
            Security::Secure => "https",
            Security::Insecure => "http",
        }
    }
}

/// Establishes one connection per call.
///
/// Implementations must stop and return [`DialError::Cancelled`] once `cancel`
/// fires. Retries, if any, are the implementation's business; callers in this
/// crate never retry a failed dial.
pub trait Dialer: Send + Sync {
    type Conn: Connection;

    fn dial(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        security: Security,
        options: &[DialOption],
    ) -> impl Future<Output = Result<Self::Conn, DialError>> + Send;
}
