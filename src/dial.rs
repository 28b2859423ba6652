//! Dial entry points.
//!
//! All of them resolve the client options, validate the result before any
//! network I/O, and then pick the cheapest way to satisfy the request:
//! an explicit pool, an explicit connection, or fresh dials.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::connection::Connection;
use crate::dialer::{Dialer, Security};
use crate::error::Error;
use crate::options::{ClientOption, DialSettings};
use crate::pool::{ConnPool, RoundRobinConnPool, SingleConnPool};

/// Return a connection to the configured service.
///
/// With an explicit pool, a connection is selected from it instead of dialing.
/// Otherwise the dial is secure. `cancel` is passed to the dialer unchanged.
pub async fn dial<D: Dialer>(
    dialer: &D,
    cancel: &CancellationToken,
    options: impl IntoIterator<Item = ClientOption<D::Conn>>,
) -> Result<D::Conn, Error> {
    let settings = process_and_validate(options)?;
    if let Some(pool) = &settings.conn_pool {
        return Ok(pool.conn());
    }

    dial_conn(dialer, cancel, Security::Secure, &settings).await
}

/// Return a plaintext connection to the configured service.
///
/// Unlike [`dial`], an explicit pool is not consulted.
pub async fn dial_insecure<D: Dialer>(
    dialer: &D,
    cancel: &CancellationToken,
    options: impl IntoIterator<Item = ClientOption<D::Conn>>,
) -> Result<D::Conn, Error> {
    let settings = process_and_validate(options)?;
    dial_conn(dialer, cancel, Security::Insecure, &settings).await
}

/// Return a pool of connections to the configured service.
///
/// The pool size comes from
/// [`with_connection_pool_size`](crate::options::with_connection_pool_size) and
/// is forced to one when an explicit connection is supplied. Connections are
/// dialed one after another. If any dial fails, the connections already
/// established are closed and the dial error is returned; close failures
/// during that cleanup are dropped.
pub async fn dial_pool<D: Dialer>(
    dialer: &D,
    cancel: &CancellationToken,
    options: impl IntoIterator<Item = ClientOption<D::Conn>>,
) -> Result<ConnPool<D::Conn>, Error> {
    let mut settings = process_and_validate(options)?;
    if let Some(pool) = settings.conn_pool.take() {
        return Ok(pool);
    }

    let pool_size = if settings.conn.is_some() {
        1
    } else {
        settings.pool_size
    };

    if pool_size <= 1 {
        let conn = dial_conn(dialer, cancel, Security::Secure, &settings).await?;
        return Ok(ConnPool::Single(SingleConnPool::new(conn)));
    }

    let pool_size = pool_size as usize;
    let mut conns = Vec::with_capacity(pool_size);
    for index in 0..pool_size {
        match dial_conn(dialer, cancel, Security::Secure, &settings).await {
            Ok(conn) => conns.push(conn),
            Err(e) => {
                warn!(
                    endpoint = %settings.endpoint(),
                    index,
                    pool_size,
                    established = conns.len(),
                    error = %e,
                    "Pool dial failed, releasing established connections"
                );
                release(conns);
                return Err(e);
            }
        }
    }

    info!(endpoint = %settings.endpoint(), pool_size, "Connection pool established");

    Ok(ConnPool::RoundRobin(RoundRobinConnPool::new(conns)))
}

fn process_and_validate<C>(
    options: impl IntoIterator<Item = ClientOption<C>>,
) -> Result<DialSettings<C>, Error> {
    let settings = DialSettings::resolve(options);
    settings.validate()?;
    Ok(settings)
}

async fn dial_conn<D: Dialer>(
    dialer: &D,
    cancel: &CancellationToken,
    security: Security,
    settings: &DialSettings<D::Conn>,
) -> Result<D::Conn, Error> {
    if let Some(conn) = &settings.conn {
        return Ok(conn.clone());
    }

    let endpoint = settings.endpoint();
    dialer
        .dial(cancel, endpoint, security, &settings.dial_options)
        .await
        .map_err(|source| Error::Dial {
            endpoint: endpoint.to_string(),
            source,
        })
}

/// Close partially built pool members, ignoring failures.
fn release<C: Connection>(conns: Vec<C>) {
    for (index, conn) in conns.into_iter().enumerate() {
        if let Err(e) = conn.close() {
            debug!(index, error = %e, "Ignoring close failure during pool cleanup");
        }
    }
}
