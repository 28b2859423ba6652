//! # grpc-conn-pool
//!
//! Client-side gRPC connection establishment with optional pooling.
//!
//! Callers describe what they want with an ordered list of
//! [`ClientOption`]s, then ask for either a single connection ([`dial`],
//! [`dial_insecure`]) or a [`ConnPool`] ([`dial_pool`]). A pool with more
//! than one connection hands them out round robin.
//!
//! ```ignore
//! use grpc_conn_pool::options::{with_connection_pool_size, with_endpoint};
//! use grpc_conn_pool::{GrpcDialer, dial_pool};
//! use tokio_util::sync::CancellationToken;
//!
//! grpc_conn_pool::init();
//!
//! let cancel = CancellationToken::new();
//! let pool = dial_pool(
//!     &GrpcDialer::default(),
//!     &cancel,
//!     [with_endpoint("api.example.com:443"), with_connection_pool_size(4)],
//! )
//! .await?;
//!
//! // Each call is routed to the next connection in the pool.
//! let mut client = tonic::client::Grpc::new(pool.clone());
//!
//! pool.close()?;
//! ```
//!
//! Secure dials need the process-wide TLS settings from [`init`] or
//! [`init_with`]; call one of them from the entry point.
//!
//! The crate never retries, never reconnects, and never closes a pool on
//! drop. Teardown is always an explicit [`ConnPool::close`].

pub mod connection;
pub mod dial;
pub mod dialer;
pub mod error;
pub mod options;
pub mod pool;
pub mod tls;

#[cfg(test)]
mod test_support;

use tokio_util::sync::CancellationToken;
use tonic::transport::Channel;

pub use connection::Connection;
pub use dial::{dial, dial_insecure, dial_pool};
pub use dialer::{Dialer, GrpcDialer, Security};
pub use error::{BoxError, DialError, Error};
pub use options::{ClientOption, DialOption, DialSettings};
pub use pool::{ConnPool, RoundRobinConnPool, SingleConnPool};
pub use tls::{init, init_with};

/// Dial a secure gRPC channel with the default [`GrpcDialer`].
pub async fn dial_grpc(
    cancel: &CancellationToken,
    options: impl IntoIterator<Item = ClientOption<Channel>>,
) -> Result<Channel, Error> {
    dial(&GrpcDialer::default(), cancel, options).await
}
