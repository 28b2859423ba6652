use bon::Builder;
use tokio_util::sync::CancellationToken;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

use super::{Dialer, Security};
use crate::error::DialError;
use crate::options::DialOption;
use crate::tls;

/// Endpoint used when no endpoint option is supplied.
pub const DEFAULT_ENDPOINT: &str = "localhost:443";

/// Dials tonic [`Channel`]s.
///
/// Targets without a scheme get one from the requested [`Security`]:
/// `https` for secure dials, plaintext `http` otherwise. A scheme given by the
/// caller is kept as is.
///
/// Secure dials use the TLS settings installed by [`init`](crate::init) and
/// fail with [`DialError::TlsUninitialized`] before that. Dial options run
/// after the security setup, so a [`DialOption::tls_config`] replaces the
/// process-wide settings for one dialer call.
#[derive(Debug, Clone, Builder)]
pub struct GrpcDialer {
    /// Target used when the resolved endpoint is empty.
    #[builder(default = DEFAULT_ENDPOINT.to_string(), into)]
    default_endpoint: String,

    /// Return unconnected channels that connect on first use.
    #[builder(default)]
    lazy: bool,
}

impl GrpcDialer {
    /// Target used when the resolved endpoint is empty.
    pub fn default_endpoint(&self) -> &str {
        &self.default_endpoint
    }

    fn endpoint(&self, target: &str, security: Security) -> Result<Endpoint, DialError> {
        let target = if target.is_empty() {
            self.default_endpoint.as_str()
        } else {
            target
        };
        let uri = if target.contains("://") {
            target.to_string()
        } else {
            format!("{}://{target}", security.scheme())
        };

        let endpoint = Endpoint::from_shared(uri).map_err(DialError::InvalidEndpoint)?;
        match security {
            Security::Secure => {
                let config = tls::client_config().ok_or(DialError::TlsUninitialized)?;
                Ok(endpoint.tls_config(config)?)
            }
            Security::Insecure => Ok(endpoint),
        }
    }
}

impl Default for GrpcDialer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Dialer for GrpcDialer {
    type Conn = Channel;

    async fn dial(
        &self,
        cancel: &CancellationToken,
        endpoint: &str,
        security: Security,
        options: &[DialOption],
    ) -> Result<Channel, DialError> {
        let endpoint = options
            .iter()
            .try_fold(self.endpoint(endpoint, security)?, |endpoint, option| {
                option.apply(endpoint)
            })?;

        debug!(
            uri = %endpoint.uri(),
            ?security,
            lazy = self.lazy,
            options = options.len(),
            "Dialing gRPC endpoint"
        );

        if self.lazy {
            return Ok(endpoint.connect_lazy());
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(DialError::Cancelled),
            result = endpoint.connect() => Ok(result?),
        }
    }
}
