use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::GeoPoint;

/// Per-user cache of the last device position reported by a client.
/// Device geolocation is best-effort: when a later request carries no
/// coordinates, the cached position stands in until it expires.
pub struct SessionPositionCache {
    ttl: Duration,
    inner: RwLock<HashMap<String, CachedPosition>>,
}

struct CachedPosition {
    point: GeoPoint,
    recorded_at: DateTime<Utc>,
}

impl SessionPositionCache {
    pub fn new(ttl_minutes: i64) -> Self {
        Self {
            ttl: Duration::minutes(ttl_minutes),
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub async fn record(&self, user_id: &str, point: GeoPoint) {
        let mut positions = self.inner.write().await;

        // Writes double as the sweep so stale users do not accumulate.
        let now = Utc::now();
        positions.retain(|_, cached| now - cached.recorded_at <= self.ttl);

        positions.insert(
            user_id.to_string(),
            CachedPosition {
                point,
                recorded_at: Utc::now(),
            },
        );
        debug!("Recorded position for user {}", user_id);
    }

    /// Returns the cached position unless it has outlived the TTL.
    pub async fn lookup(&self, user_id: &str) -> Option<GeoPoint> {
        let positions = self.inner.read().await;
        let cached = positions.get(user_id)?;

        if Utc::now() - cached.recorded_at > self.ttl {
            debug!("Cached position for user {} expired", user_id);
            return None;
        }

        Some(cached.point)
    }
}
