//! Rate limiting middleware using token bucket algorithm.

use axum::Router;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

use crate::state::AppState;

/// Burst allowance per client.
const BURST_SIZE: u32 = 100;

/// One request is replenished per period, about 100 per 15 minutes.
const REPLENISH_PERIOD: Duration = Duration::from_secs(9);

/// How the client of a request is identified for rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitMode {
    /// No limiting. Used by tests, which have no peer address.
    Off,
    /// Key on the socket peer address.
    PeerIp,
    /// Key on `X-Forwarded-For` / `X-Real-IP`, falling back to the peer address.
    /// Only safe behind a trusted reverse proxy.
    Forwarded,
}

impl RateLimitMode {
    pub fn from_behind_proxy(behind_proxy: bool) -> Self {
        if behind_proxy {
            RateLimitMode::Forwarded
        } else {
            RateLimitMode::PeerIp
        }
    }

    /// Wraps `router` in the limiter for this mode.
    pub fn apply(self, router: Router<AppState>) -> Router<AppState> {
        match self {
            RateLimitMode::Off => router,
            RateLimitMode::PeerIp => router.layer(layer()),
            RateLimitMode::Forwarded => router.layer(proxied_layer()),
        }
    }
}

/// Creates a rate limiter for the public authentication endpoints.
///
/// # Limits
///
/// - **Rate**: 1 request every 9 seconds
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .period(REPLENISH_PERIOD)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("non-zero period and burst size"),
    );

    GovernorLayer::new(governor_conf)
}

/// Same limits as [`layer`], keyed on proxy headers.
pub fn proxied_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .period(REPLENISH_PERIOD)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("non-zero period and burst size"),
    );

    GovernorLayer::new(governor_conf)
}
