//! Process-wide TLS settings for secure dials.
//!
//! [`GrpcDialer`](crate::GrpcDialer) refuses secure dials until one of
//! [`init`] or [`init_with`] has run.

use std::sync::OnceLock;

use tonic::transport::ClientTlsConfig;
use tracing::debug;

static CLIENT_TLS: OnceLock<ClientTlsConfig> = OnceLock::new();

/// Trust the platform's native root certificates for secure dials.
///
/// Later calls, and calls after [`init_with`], do nothing.
pub fn init() {
    init_with(ClientTlsConfig::new().with_native_roots());
}

/// Use `config` for every secure dial in the process.
///
/// Returns `false` if TLS settings were already installed; the first ones stay.
pub fn init_with(config: ClientTlsConfig) -> bool {
    let installed = CLIENT_TLS.set(config).is_ok();
    if !installed {
        debug!("client TLS settings already initialized");
    }
    installed
}

/// The installed TLS settings, if any.
pub(crate) fn client_config() -> Option<ClientTlsConfig> {
    CLIENT_TLS.get().cloned()
}
