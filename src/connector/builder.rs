use log::{debug, info, warn};

use alloy::providers::{DynProvider, Provider, ProviderBuilder, WsConnect};

use crate::{
    config::ConnectConfig,
    errors::ConnectError,
    types::Address,
};

use super::RpcConnector;

/// Build a provider for an HTTP(S) or WebSocket endpoint
pub async fn get_provider(rpc_url: &str) -> Result<DynProvider, ConnectError> {
    let provider = if rpc_url.starts_with("http") {
        let url = rpc_url
            .parse()
            .map_err(|_| ConnectError::InvalidRpcUrl(rpc_url.to_string()))?;
        ProviderBuilder::new().connect_http(url).erased()
    } else if rpc_url.starts_with("ws") {
        let ws_connect = WsConnect::new(rpc_url);
        ProviderBuilder::new()
            .connect_ws(ws_connect)
            .await
            .map_err(|e| ConnectError::Attempt(format!("WebSocket connection failed: {e}")))?
            .erased()
    } else {
        return Err(ConnectError::InvalidRpcUrl(rpc_url.to_string()));
    };
    Ok(provider)
}

/// Connect to a node, retrying with a fixed backoff
///
/// Each attempt builds a provider and fetches the chain id to confirm the node
/// is answering. At least one attempt is made even if `max_retries` is zero.
///
/// # Example
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use chain_lens::{config::ConnectConfig, connector::connect, types::MULTICALL3_ADDRESS};
/// let connector = connect("https://eth.llamarpc.com", &ConnectConfig::default(), MULTICALL3_ADDRESS).await?;
/// println!("chain id {}", connector.chain_id());
/// # Ok(())
/// # }
/// ```
pub async fn connect(
    rpc_url: &str,
    config: &ConnectConfig,
    multicall_address: Address,
) -> Result<RpcConnector, ConnectError> {
    let attempts = config.max_retries.max(1);
    let mut last_error = String::new();

    for attempt in 1..=attempts {
        debug!("Connecting to {rpc_url} (attempt {attempt}/{attempts})");
        match try_connect(rpc_url, config).await {
            Ok((provider, chain_id)) => {
                info!("Connected to chain {chain_id}");
                return Ok(RpcConnector::new(
                    provider,
                    multicall_address,
                    config.request_timeout(),
                    chain_id,
                ));
            }
            Err(ConnectError::InvalidRpcUrl(url)) => return Err(ConnectError::InvalidRpcUrl(url)),
            Err(e) => {
                last_error = match e {
                    ConnectError::Attempt(reason) => reason,
                    other => other.to_string(),
                };
                warn!("Connection failed (attempt {attempt}/{attempts}): {last_error}");
                if attempt < attempts {
                    tokio::time::sleep(config.retry_interval()).await;
                }
            }
        }
    }

    Err(ConnectError::Exhausted {
        attempts,
        last_error,
    })
}

async fn try_connect(
    rpc_url: &str,
    config: &ConnectConfig,
) -> Result<(DynProvider, u64), ConnectError> {
    let timeout = config.request_timeout();
    let provider = tokio::time::timeout(timeout, get_provider(rpc_url))
        .await
        .map_err(|_| ConnectError::Attempt(format!("dial timed out after {timeout:?}")))??;
    let chain_id = tokio::time::timeout(timeout, provider.get_chain_id())
        .await
        .map_err(|_| ConnectError::Attempt(format!("chain id request timed out after {timeout:?}")))?
        .map_err(|e| ConnectError::Attempt(format!("failed to fetch chain id: {e}")))?;
    Ok((provider, chain_id))
}
