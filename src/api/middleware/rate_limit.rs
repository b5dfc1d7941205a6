//! Per-IP rate limiting using a token bucket.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type IpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Rate limiter for authenticated API routes.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 50 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. The key is
/// the socket peer address, so the server must be started with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn api_layer() -> IpGovernorLayer {
    governed(2, 50)
}

/// Looser limiter for the public health probe.
pub fn public_layer() -> IpGovernorLayer {
    governed(10, 100)
}

fn governed(per_second: u64, burst_size: u32) -> IpGovernorLayer {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(per_second)
            .burst_size(burst_size)
            .finish()
            .expect("rate limit values are non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
