//! External router HTTP client (§4.3, §6). Grounded in the reference crate's
//! `routing/osrm_spawn/client.rs`: a thin blocking-`reqwest` wrapper with the
//! URL construction and response parsing split into small, separately
//! testable functions, the way `osrm_spawn::{radius, parser}` do.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::RouterConfig;
use crate::geo::Point;

#[derive(Debug)]
pub enum OsrmError {
    Http(reqwest::Error),
    Json(reqwest::Error),
    Api(String),
    NoRoute,
}

impl fmt::Display for OsrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsrmError::Http(e) => write!(f, "OSRM request failed: {e}"),
            OsrmError::Json(e) => write!(f, "OSRM response could not be parsed: {e}"),
            OsrmError::Api(code) => write!(f, "OSRM returned code {code}"),
            OsrmError::NoRoute => write!(f, "OSRM returned no usable route"),
        }
    }
}

impl std::error::Error for OsrmError {}

#[derive(Debug, Clone, PartialEq)]
pub struct OsrmRoute {
    pub distance_km: f64,
    pub duration_minutes: f64,
    /// Precision-5 encoded polyline, passed through verbatim from OSRM.
    pub geometry: String,
    /// Extra candidate routes from the same query (§4.3 step 5), same shape
    /// as the chosen route minus its own alternatives.
    pub alternatives: Vec<AlternativeRoute>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlternativeRoute {
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub geometry: String,
}

#[derive(Deserialize)]
struct OsrmResponseBody {
    code: String,
    routes: Option<Vec<OsrmRouteBody>>,
}

#[derive(Deserialize)]
struct OsrmRouteBody {
    distance: f64,
    duration: f64,
    geometry: String,
}

/// Abstraction over the external router so [`crate::routing::enhance`] can be
/// tested against a stub instead of a live OSRM instance.
pub trait Router: Send + Sync {
    fn route(&self, stops: &[Point]) -> Result<OsrmRoute, OsrmError>;
}

pub struct OsrmClient {
    client: Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(config: &RouterConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .expect("failed to build OSRM HTTP client");
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds the client wrapped in a [`CachedRouter`] sized per `config`.
    pub fn cached(config: &RouterConfig) -> CachedRouter {
        CachedRouter::new(Box::new(Self::new(config)), config.route_cache_capacity)
    }
}

/// `GET /{base}/route/v1/driving/{lng,lat;…}?overview=full&alternatives=true
/// &steps=true&geometries=polyline` (§6).
pub(crate) fn build_route_url(base_url: &str, stops: &[Point]) -> String {
    let coords = stops
        .iter()
        .map(|p| format!("{},{}", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(";");
    format!(
        "{base_url}/route/v1/driving/{coords}?overview=full&alternatives=true&steps=true&geometries=polyline"
    )
}

impl Router for OsrmClient {
    fn route(&self, stops: &[Point]) -> Result<OsrmRoute, OsrmError> {
        if stops.len() < 2 {
            return Err(OsrmError::NoRoute);
        }
        let url = build_route_url(&self.base_url, stops);
        let response = self.client.get(&url).send().map_err(OsrmError::Http)?;
        let parsed: OsrmResponseBody = response.json().map_err(OsrmError::Json)?;
        if parsed.code != "Ok" {
            return Err(OsrmError::Api(parsed.code));
        }
        let mut routes = parsed.routes.ok_or(OsrmError::NoRoute)?.into_iter();
        let route = routes.next().ok_or(OsrmError::NoRoute)?;
        let alternatives = routes
            .map(|alt| AlternativeRoute {
                distance_km: alt.distance / 1000.0,
                duration_minutes: alt.duration / 60.0,
                geometry: alt.geometry,
            })
            .collect();
        Ok(OsrmRoute {
            distance_km: route.distance / 1000.0,
            duration_minutes: route.duration / 60.0,
            geometry: route.geometry,
            alternatives,
        })
    }
}

// ---------------------------------------------------------------------------
// Caching wrapper
// ---------------------------------------------------------------------------

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Stop-sequence cache key: coordinates rounded to ~1m precision so that
/// float jitter between otherwise-identical requests still hits the cache.
fn cache_key(stops: &[Point]) -> Vec<(i64, i64)> {
    stops
        .iter()
        .map(|p| ((p.lat * 1e5).round() as i64, (p.lng * 1e5).round() as i64))
        .collect()
}

/// LRU-cached wrapper around any [`Router`], grounded on the reference
/// crate's `CachedRouteProvider`: directional cache keyed on the full stop
/// sequence, inner provider queried only on a miss.
pub struct CachedRouter {
    inner: Box<dyn Router>,
    cache: Mutex<LruCache<Vec<(i64, i64)>, OsrmRoute>>,
}

impl CachedRouter {
    pub fn new(inner: Box<dyn Router>, capacity: usize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity.max(1)).expect("cache capacity must be > 0"),
            )),
        }
    }
}

impl Router for CachedRouter {
    fn route(&self, stops: &[Point]) -> Result<OsrmRoute, OsrmError> {
        let key = cache_key(stops);
        {
            let mut cache = self.cache.lock().expect("OSRM route cache poisoned");
            if let Some(cached) = cache.get(&key) {
                return Ok(cached.clone());
            }
        }
        let route = self.inner.route(stops)?;
        self.cache.lock().expect("OSRM route cache poisoned").put(key, route.clone());
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn build_route_url_orders_coordinates_as_lng_lat_and_sets_query() {
        let stops = vec![Point::new(24.70, 46.60), Point::new(24.71, 46.61)];
        let url = build_route_url("http://localhost:5000", &stops);
        assert_eq!(
            url,
            "http://localhost:5000/route/v1/driving/46.6,24.7;46.61,24.71?overview=full&alternatives=true&steps=true&geometries=polyline"
        );
    }

    struct CountingRouter {
        calls: std::sync::Arc<AtomicUsize>,
    }

    impl Router for CountingRouter {
        fn route(&self, _stops: &[Point]) -> Result<OsrmRoute, OsrmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(OsrmRoute {
                distance_km: 1.0,
                duration_minutes: 2.0,
                geometry: "geo".to_string(),
                alternatives: Vec::new(),
            })
        }
    }

    #[test]
    fn cached_router_only_calls_the_inner_router_once_per_key() {
        let calls = std::sync::Arc::new(AtomicUsize::new(0));
        let cached = CachedRouter::new(Box::new(CountingRouter { calls: calls.clone() }), 10);
        let stops = vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)];

        let first = cached.route(&stops).unwrap();
        let second = cached.route(&stops).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
