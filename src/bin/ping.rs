use std::time::Duration;

use anyhow::{Context, Result};
use grpc_conn_pool::options::{with_connection_pool_size, with_dial_option, with_endpoint};
use grpc_conn_pool::{ConnPool, DialOption, GrpcDialer, dial_pool};
use tokio_util::sync::CancellationToken;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::Channel;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const HEALTH_CHECK_PATH: &str = "/grpc.health.v1.Health/Check";

#[derive(Clone, PartialEq, prost::Message)]
struct HealthCheckRequest {
    #[prost(string, tag = "1")]
    service: String,
}

#[derive(Clone, PartialEq, prost::Message)]
struct HealthCheckResponse {
    #[prost(int32, tag = "1")]
    status: i32,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    grpc_conn_pool::init();

    let endpoint =
        std::env::var("GRPC_ENDPOINT").unwrap_or_else(|_| "localhost:50051".to_string());
    let pool_size: i32 = std::env::var("GRPC_POOL_SIZE")
        .unwrap_or_else(|_| "4".to_string())
        .parse()
        .context("GRPC_POOL_SIZE must be an integer")?;
    let count: usize = std::env::var("PING_COUNT")
        .unwrap_or_else(|_| "8".to_string())
        .parse()
        .context("PING_COUNT must be an integer")?;

    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c_cancel.cancel();
        }
    });

    info!(endpoint = %endpoint, pool_size, "Dialing connection pool");

    let pool = dial_pool(
        &GrpcDialer::default(),
        &cancel,
        [
            with_endpoint(endpoint),
            with_connection_pool_size(pool_size),
            with_dial_option(DialOption::connect_timeout(Duration::from_secs(5))),
            with_dial_option(DialOption::timeout(Duration::from_secs(10))),
        ],
    )
    .await?;

    info!(connections = pool.num(), "Pool ready");

    for seq in 0..count {
        match check(&pool).await {
            Ok(status) => info!(seq, status, "Health check"),
            Err(e) => error!(seq, error = %e, "Health check failed"),
        }
    }

    pool.close()?;
    Ok(())
}

async fn check(pool: &ConnPool<Channel>) -> Result<i32> {
    // Each unary call picks the next pooled channel.
    let mut grpc = tonic::client::Grpc::new(pool.clone());
    grpc.ready().await?;

    let response = grpc
        .unary(
            tonic::Request::new(HealthCheckRequest {
                service: String::new(),
            }),
            PathAndQuery::from_static(HEALTH_CHECK_PATH),
            tonic_prost::ProstCodec::<HealthCheckRequest, HealthCheckResponse>::default(),
        )
        .await?;

    Ok(response.into_inner().status)
}
