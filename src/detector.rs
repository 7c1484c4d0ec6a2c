//! Token type detection
//!
//! Resolves the checker a session uses. With an explicit token type the
//! matching checker is bound directly and a bind failure is final. Without
//! one, candidates are probed left to right in [`DETECTION_ORDER`] and the
//! first checker that binds wins:
//!
//! 1. ERC20: `decimals()` answers
//! 2. ERC721: `symbol()` answers
//! 3. Native: the node answers a balance lookup
//!
//! Every probe issues at least one network call and is attempted once.

use alloy::primitives::Address;
use log::{debug, info};

use crate::{
    checkers::{Erc20Checker, Erc721Checker, NativeChecker, TokenChecker},
    errors::{CheckError, DetectError},
    traits::{BalanceChecker, SharedConnector},
    types::TokenType,
};

/// Order in which candidate token types are probed
pub const DETECTION_ORDER: [TokenType; 3] = [TokenType::Erc20, TokenType::Erc721, TokenType::Native];

/// Bind the checker for one specific token type
pub async fn bind_checker(
    connector: SharedConnector,
    token: Address,
    token_type: TokenType,
    native_symbol: &str,
) -> Result<TokenChecker, CheckError> {
    let checker: TokenChecker = match token_type {
        TokenType::Erc20 => Erc20Checker::bind(connector, token).await?.into(),
        TokenType::Erc721 => Erc721Checker::bind(connector, token).await?.into(),
        TokenType::Native => NativeChecker::bind(connector, token, native_symbol).await?.into(),
    };
    Ok(checker)
}

/// Resolve the session checker, detecting the token type when not given
pub async fn detect_checker(
    connector: SharedConnector,
    token: Address,
    explicit: Option<TokenType>,
    native_symbol: &str,
) -> Result<TokenChecker, DetectError> {
    if let Some(token_type) = explicit {
        let checker = bind_checker(connector, token, token_type, native_symbol)
            .await
            .map_err(|source| DetectError::Bind {
                token,
                token_type,
                source,
            })?;
        info!("Using declared {token_type} checker ({})", checker.meta().symbol);
        return Ok(checker);
    }

    let mut failures = Vec::with_capacity(DETECTION_ORDER.len());
    for candidate in DETECTION_ORDER {
        match bind_checker(connector.clone(), token, candidate, native_symbol).await {
            Ok(checker) => {
                info!("Auto-detected {candidate} token ({})", checker.meta().symbol);
                return Ok(checker);
            }
            Err(e) => {
                debug!("{candidate} probe failed for {token}: {e}");
                failures.push(format!("{candidate}: {e}"));
            }
        }
    }

    Err(DetectError::Exhausted { token, failures })
}
