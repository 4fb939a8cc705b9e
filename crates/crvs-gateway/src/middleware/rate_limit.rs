//! # Per-Key Rate Limiting
//!
//! Fixed-window limiter for the credential endpoints proxied to the auth
//! service. The key is read from the JSON payload (a username, phone number
//! or email) so guessing is throttled per account rather than per client.
//!
//! Buckets are keyed `<route>:<key>`. Windows that have expired are swept
//! lazily, at most once per window.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde_json::Value;

/// Key used when the payload is unparseable or carries no key.
pub const ANONYMOUS_KEY: &str = "anonymous";

/// Rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window.
    pub max_requests: u64,
    /// Window length.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

/// Where the bucket key lives in a request payload.
#[derive(Debug, Clone, Copy)]
pub enum KeyPath {
    /// A single top-level field.
    Field(&'static str),
    /// The first present of several top-level fields.
    FirstOf(&'static [&'static str]),
}

impl KeyPath {
    /// Read the key from a raw JSON payload.
    pub fn key_from_payload(&self, payload: &[u8]) -> String {
        let Ok(value) = serde_json::from_slice::<Value>(payload) else {
            return ANONYMOUS_KEY.to_string();
        };
        let fields: &[&str] = match self {
            Self::Field(f) => std::slice::from_ref(f),
            Self::FirstOf(fs) => *fs,
        };
        fields
            .iter()
            .find_map(|f| value.get(*f).and_then(key_string))
            .unwrap_or_else(|| ANONYMOUS_KEY.to_string())
    }
}

fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone)]
struct BucketState {
    count: u64,
    window_start: Instant,
}

#[derive(Debug)]
struct Buckets {
    entries: HashMap<String, BucketState>,
    last_sweep: Instant,
}

/// Shared rate limiter state.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Arc<Mutex<Buckets>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Arc::new(Mutex::new(Buckets {
                entries: HashMap::new(),
                last_sweep: Instant::now(),
            })),
        }
    }

    /// Count a request against `route:key`. Returns false when over the limit.
    pub fn check(&self, route: &str, key: &str) -> bool {
        self.check_at(&format!("{route}:{key}"), Instant::now())
    }

    fn check_at(&self, bucket_key: &str, now: Instant) -> bool {
        let window = self.config.window;
        let mut buckets = self.buckets.lock();

        if now.saturating_duration_since(buckets.last_sweep) >= window {
            buckets
                .entries
                .retain(|_, b| now.saturating_duration_since(b.window_start) < window);
            buckets.last_sweep = now;
        }

        let bucket = buckets
            .entries
            .entry(bucket_key.to_string())
            .or_insert(BucketState {
                count: 0,
                window_start: now,
            });

        if now.saturating_duration_since(bucket.window_start) >= window {
            bucket.count = 0;
            bucket.window_start = now;
        }

        if bucket.count >= self.config.max_requests {
            tracing::warn!(bucket = bucket_key, "rate limit exceeded");
            false
        } else {
            bucket.count += 1;
            true
        }
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.buckets.lock().entries.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u64) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests: max,
            window: Duration::from_secs(60),
        })
    }

    #[test]
    fn eleventh_request_in_window_is_refused() {
        let rl = limiter(10);
        let t0 = Instant::now();
        for _ in 0..10 {
            assert!(rl.check_at("authenticate:kalusha", t0));
        }
        assert!(!rl.check_at("authenticate:kalusha", t0 + Duration::from_secs(59)));
    }

    #[test]
    fn keys_are_independent() {
        let rl = limiter(1);
        let t0 = Instant::now();
        assert!(rl.check_at("authenticate:a", t0));
        assert!(rl.check_at("authenticate:b", t0));
        assert!(rl.check_at("verifyUser:a", t0));
        assert!(!rl.check_at("authenticate:a", t0));
    }

    #[test]
    fn window_resets() {
        let rl = limiter(1);
        let t0 = Instant::now();
        assert!(rl.check_at("k", t0));
        assert!(!rl.check_at("k", t0 + Duration::from_secs(30)));
        assert!(rl.check_at("k", t0 + Duration::from_secs(60)));
    }

    #[test]
    fn expired_buckets_are_swept() {
        let rl = limiter(5);
        let t0 = Instant::now();
        rl.check_at("a", t0);
        rl.check_at("b", t0);
        assert_eq!(rl.tracked(), 2);
        rl.check_at("c", t0 + Duration::from_secs(120));
        assert_eq!(rl.tracked(), 1);
    }

    #[test]
    fn key_read_from_payload() {
        let path = KeyPath::Field("username");
        assert_eq!(path.key_from_payload(br#"{"username":"kalusha"}"#), "kalusha");
        assert_eq!(path.key_from_payload(br#"{"password":"x"}"#), ANONYMOUS_KEY);
        assert_eq!(path.key_from_payload(b"username=kalusha"), ANONYMOUS_KEY);
        assert_eq!(path.key_from_payload(br#"{"username":""}"#), ANONYMOUS_KEY);
    }

    #[test]
    fn first_present_option_wins() {
        let path = KeyPath::FirstOf(&["mobile", "email"]);
        assert_eq!(
            path.key_from_payload(br#"{"mobile":"+260911111111","email":"k@x.org"}"#),
            "+260911111111"
        );
        assert_eq!(path.key_from_payload(br#"{"email":"k@x.org"}"#), "k@x.org");
        assert_eq!(path.key_from_payload(br#"{}"#), ANONYMOUS_KEY);
    }
}
