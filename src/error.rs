use thiserror::Error;

/// Boxed error used where the failing layer is not known statically.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by the dial entry points and by pool teardown.
#[derive(Debug, Error)]
pub enum Error {
    /// The resolved dial settings are inconsistent. Raised before any network I/O.
    #[error("invalid dial configuration: {0}")]
    Configuration(&'static str),

    /// Establishing a connection failed.
    #[error("failed to dial '{endpoint}'")]
    Dial {
        endpoint: String,
        #[source]
        source: DialError,
    },

    /// Releasing a single connection failed.
    #[error("failed to close connection")]
    Close(#[source] BoxError),

    /// Releasing one or more pooled connections failed.
    ///
    /// Every connection was still closed; `errors` holds one entry per failure.
    #[error("failed to close {} of {total} pooled connections", .errors.len())]
    CloseAll { total: usize, errors: Vec<Error> },
}

impl Error {
    /// Returns `true` if this is a dial failure caused by cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Error::Dial {
                source: DialError::Cancelled,
                ..
            }
        )
    }
}

/// Failures reported by a [`Dialer`](crate::dialer::Dialer).
#[derive(Debug, Error)]
pub enum DialError {
    /// The endpoint could not be turned into a transport address.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[source] tonic::transport::Error),

    /// The transport failed to connect, or a dial option was rejected.
    #[error("transport error")]
    Transport(#[from] tonic::transport::Error),

    /// A secure dial was attempted before [`init`](crate::init) ran.
    #[error("client TLS settings are not initialized; call grpc_conn_pool::init() at startup")]
    TlsUninitialized,

    /// The caller's cancellation token fired before the dial finished.
    #[error("dial cancelled")]
    Cancelled,

    /// A failure from a non-tonic dialer.
    #[error(transparent)]
    Other(BoxError),
}
