//! Client options and the dial settings they resolve into.
//!
//! Options are applied left to right onto an empty [`DialSettings`]. Scalar
//! settings are last-write-wins; dial options accumulate in order.
//!
//! ```ignore
//! use grpc_conn_pool::options::{with_connection_pool_size, with_endpoint};
//!
//! let pool = grpc_conn_pool::dial_pool(
//!     &dialer,
//!     &cancel,
//!     [with_endpoint("https://api.example.com"), with_connection_pool_size(4)],
//! )
//! .await?;
//! ```

mod dial_option;

pub use dial_option::DialOption;

use crate::error::Error;
use crate::pool::ConnPool;

/// Everything needed to obtain connections to a service.
#[derive(Debug, Clone)]
pub struct DialSettings<C> {
    /// Target address. Empty means the dialer's default.
    pub endpoint: String,
    /// Passed through to the dialer in registration order.
    pub dial_options: Vec<DialOption>,
    /// Caller-built connection. Takes precedence over every other setting.
    pub conn: Option<C>,
    /// Caller-built pool. Short-circuits pool construction.
    pub conn_pool: Option<ConnPool<C>>,
    /// Requested pool size. Anything at or below 1 means a single connection.
    pub pool_size: i32,
    pub skip_validation: bool,
}

impl<C> Default for DialSettings<C> {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            dial_options: Vec::new(),
            conn: None,
            conn_pool: None,
            pool_size: 0,
            skip_validation: false,
        }
    }
}

impl<C> DialSettings<C> {
    /// Fold `options` onto empty settings in order.
    pub fn resolve(options: impl IntoIterator<Item = ClientOption<C>>) -> Self {
        let mut settings = Self::default();
        for option in options {
            option.apply(&mut settings);
        }
        settings
    }

    /// Reject settings that cannot be dialed unambiguously.
    ///
    /// An explicit pool is only accepted together with `skip_validation`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.skip_validation {
            return Ok(());
        }

        if self.conn_pool.is_some() {
            return Err(Error::Configuration(
                "explicit connection pool requires skip_validation",
            ));
        }

        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// A single configuration mutation.
#[derive(Debug, Clone)]
pub enum ClientOption<C> {
    /// Replace the service endpoint.
    Endpoint(String),
    /// Append a transport option.
    DialOption(DialOption),
    /// Use an existing connection instead of dialing.
    Conn(C),
    /// Use an existing pool instead of building one.
    ConnPool(ConnPool<C>),
    /// Number of connections for [`dial_pool`](crate::dial_pool).
    ConnectionPoolSize(i32),
    /// Skip the consistency checks in [`DialSettings::validate`].
    SkipValidation,
}

impl<C> ClientOption<C> {
    /// Write this option into `settings`, overwriting any earlier value of the
    /// same field. Dial options accumulate instead.
    pub fn apply(self, settings: &mut DialSettings<C>) {
        match self {
            ClientOption::Endpoint(endpoint) => settings.endpoint = endpoint,
            ClientOption::DialOption(option) => settings.dial_options.push(option),
            ClientOption::Conn(conn) => settings.conn = Some(conn),
            ClientOption::ConnPool(pool) => settings.conn_pool = Some(pool),
            ClientOption::ConnectionPoolSize(size) => settings.pool_size = size,
            ClientOption::SkipValidation => settings.skip_validation = true,
        }
    }
}

/// Set the service endpoint. The last one wins.
pub fn with_endpoint<C>(endpoint: impl Into<String>) -> ClientOption<C> {
    ClientOption::Endpoint(endpoint.into())
}

/// Append a transport option for the underlying dial. Ignored when an explicit
/// connection is supplied.
pub fn with_dial_option<C>(option: DialOption) -> ClientOption<C> {
    ClientOption::DialOption(option)
}

/// Use `conn` instead of dialing. Forces a pool size of one.
pub fn with_conn<C>(conn: C) -> ClientOption<C> {
    ClientOption::Conn(conn)
}

/// Use `pool` instead of building one. Requires [`skip_validation`].
pub fn with_conn_pool<C>(pool: ConnPool<C>) -> ClientOption<C> {
    ClientOption::ConnPool(pool)
}

/// Spread calls over `size` connections when dialing a pool.
pub fn with_connection_pool_size<C>(size: i32) -> ClientOption<C> {
    ClientOption::ConnectionPoolSize(size)
}

/// Bypass [`DialSettings::validate`].
pub fn skip_validation<C>() -> ClientOption<C> {
    ClientOption::SkipValidation
}
