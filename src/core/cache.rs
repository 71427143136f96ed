//! TTL cache shared by every read the engine performs.
//!
//! Each logical query is described by a [`QueryKey`] whose signature covers
//! every input of the producer that computes it. A lookup either returns the
//! memoized value, or runs the producer and stores its result.
//!
//! - Entries expire lazily: age is checked against the caller's TTL on access.
//! - Entries are only ever replaced, never mutated or evicted by size.
//! - If a refresh fails because the live API is down, the expired value is
//!   served instead and marked [`CacheStatus::Stale`].
//! - Concurrent lookups of one key share a single producer call.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, warn};

use super::clock::{Clock, SystemClock};
use crate::error::{FootballError, Result};
use crate::{LeagueCode, Season, TeamId};

/// Anything that can name a cache slot.
pub trait CacheKey {
    /// Deterministic signature; equal queries must produce equal strings.
    fn to_cache_key(&self) -> String;
}

/// Every query the engine memoizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Team { team_id: TeamId, season: Season },
    Teams { season: Season },
    TeamByExternalId { external_id: u32, season: Season },
    Players { team_id: TeamId, season: Season },
    Matches { team_id: TeamId, season: Season },
    LocalTopScorers { season: Season, limit: u32 },
    LeagueSummary { season: Season },
    PositionDistribution { season: Season },
    NationalityBreakdown { season: Season },
    Standings { league: LeagueCode },
    Fixtures { league: LeagueCode },
    Results { league: LeagueCode },
    TopScorers { league: LeagueCode },
}

impl CacheKey for QueryKey {
    fn to_cache_key(&self) -> String {
        match self {
            QueryKey::Team { team_id, season } => {
                format!("store:team:t{}:s{}", team_id.as_u32(), season.as_u16())
            }
            QueryKey::Teams { season } => format!("store:teams:s{}", season.as_u16()),
            QueryKey::TeamByExternalId {
                external_id,
                season,
            } => format!("store:team_ext:e{}:s{}", external_id, season.as_u16()),
            QueryKey::Players { team_id, season } => {
                format!("store:players:t{}:s{}", team_id.as_u32(), season.as_u16())
            }
            QueryKey::Matches { team_id, season } => {
                format!("store:matches:t{}:s{}", team_id.as_u32(), season.as_u16())
            }
            QueryKey::LocalTopScorers { season, limit } => {
                format!("store:top_scorers:s{}:n{}", season.as_u16(), limit)
            }
            QueryKey::LeagueSummary { season } => {
                format!("store:league_summary:s{}", season.as_u16())
            }
            QueryKey::PositionDistribution { season } => {
                format!("store:positions:s{}", season.as_u16())
            }
            QueryKey::NationalityBreakdown { season } => {
                format!("store:nationalities:s{}", season.as_u16())
            }
            QueryKey::Standings { league } => format!("api:standings:{}", league),
            QueryKey::Fixtures { league } => format!("api:fixtures:{}", league),
            QueryKey::Results { league } => format!("api:results:{}", league),
            QueryKey::TopScorers { league } => format!("api:top_scorers:{}", league),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cache_key())
    }
}

/// How a value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    /// Served from a live entry; the producer did not run.
    Hit,
    /// Producer ran and its result was stored.
    Miss,
    /// Refresh failed; an expired entry was served instead.
    Stale,
}

/// A cached value plus the metadata consumers need to flag stale data.
#[derive(Debug)]
pub struct Cached<T> {
    value: Arc<T>,
    status: CacheStatus,
    cached_at: DateTime<Utc>,
}

impl<T> Cached<T> {
    fn new(value: Arc<T>, status: CacheStatus, cached_at: DateTime<Utc>) -> Self {
        Self {
            value,
            status,
            cached_at,
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// The shared allocation held by the cache.
    pub fn shared(&self) -> Arc<T> {
        Arc::clone(&self.value)
    }

    pub fn status(&self) -> CacheStatus {
        self.status
    }

    pub fn cached_at(&self) -> DateTime<Utc> {
        self.cached_at
    }

    pub fn is_stale(&self) -> bool {
        self.status == CacheStatus::Stale
    }
}

impl<T> Clone for Cached<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            status: self.status,
            cached_at: self.cached_at,
        }
    }
}

impl<T> Deref for Cached<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

/// Counters describing cache activity since creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub stale_served: u64,
}

type Payload = Arc<dyn Any + Send + Sync>;

struct CacheEntry {
    value: Payload,
    created_at: DateTime<Utc>,
    ttl: Duration,
}

impl CacheEntry {
    fn age(&self, now: DateTime<Utc>) -> Duration {
        // A clock that stepped backwards makes the entry look brand new.
        (now - self.created_at).to_std().unwrap_or(Duration::ZERO)
    }
}

/// One key's storage. `filled` mirrors `entry.is_some()` so it can be read
/// while a producer holds the lock.
#[derive(Default)]
struct SlotCell {
    filled: AtomicBool,
    entry: AsyncMutex<Option<CacheEntry>>,
}

type Slot = Arc<SlotCell>;

/// Process-wide query cache. Build one at startup and share it by reference.
pub struct CacheLayer {
    slots: Mutex<HashMap<String, Slot>>,
    clock: Arc<dyn Clock>,
    hits: AtomicU64,
    misses: AtomicU64,
    stale_served: AtomicU64,
}

impl CacheLayer {
    /// Cache driven by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            clock,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stale_served: AtomicU64::new(0),
        }
    }

    /// Return the value for `key`, computing it with `producer` when absent
    /// or older than `ttl`.
    ///
    /// Producer errors propagate unchanged, except `ApiUnavailable` when an
    /// expired entry exists: that entry is returned with [`CacheStatus::Stale`].
    pub async fn get<K, T, F, Fut>(&self, key: &K, ttl: Duration, producer: F) -> Result<Cached<T>>
    where
        K: CacheKey + ?Sized,
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let signature = key.to_cache_key();
        let slot = self.slot(&signature);

        // Held across the producer call: this is what collapses concurrent
        // misses on one key into a single producer invocation.
        let mut entry = slot.entry.lock().await;

        if let Some(existing) = entry.as_ref() {
            let age = existing.age(self.clock.now());
            if age < ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %signature, ?age, "cache hit");
                let value = downcast::<T>(&signature, &existing.value)?;
                return Ok(Cached::new(value, CacheStatus::Hit, existing.created_at));
            }
            debug!(key = %signature, ?age, ?ttl, "cache entry expired");
        } else {
            debug!(key = %signature, "cache miss");
        }

        self.misses.fetch_add(1, Ordering::Relaxed);

        match producer().await {
            Ok(value) => {
                let value = Arc::new(value);
                let payload: Payload = value.clone();
                let created_at = self.clock.now();
                *entry = Some(CacheEntry {
                    value: payload,
                    created_at,
                    ttl,
                });
                slot.filled.store(true, Ordering::Release);
                Ok(Cached::new(value, CacheStatus::Miss, created_at))
            }
            Err(err) if err.is_recoverable() => match entry.as_ref() {
                Some(stale) => {
                    self.stale_served.fetch_add(1, Ordering::Relaxed);
                    warn!(
                        key = %signature,
                        cached_at = %stale.created_at,
                        entry_ttl = ?stale.ttl,
                        error = %err,
                        "refresh failed, serving stale value"
                    );
                    let value = downcast::<T>(&signature, &stale.value)?;
                    Ok(Cached::new(value, CacheStatus::Stale, stale.created_at))
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    /// Drop the entry for `key` so the next lookup runs its producer.
    pub async fn invalidate<K: CacheKey + ?Sized>(&self, key: &K) {
        let signature = key.to_cache_key();
        let slot = self.lock_slots().get(&signature).cloned();
        if let Some(slot) = slot {
            slot.entry.lock().await.take();
            slot.filled.store(false, Ordering::Release);
            debug!(key = %signature, "cache entry invalidated");
        }
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock_slots().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self
            .lock_slots()
            .values()
            .filter(|slot| slot.filled.load(Ordering::Acquire))
            .count();

        CacheStats {
            entries,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale_served: self.stale_served.load(Ordering::Relaxed),
        }
    }

    fn slot(&self, signature: &str) -> Slot {
        let mut slots = self.lock_slots();
        Arc::clone(
            slots
                .entry(signature.to_string())
                .or_insert_with(Slot::default),
        )
    }

    fn lock_slots(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CacheLayer {
    fn default() -> Self {
        Self::new()
    }
}

fn downcast<T: Send + Sync + 'static>(signature: &str, payload: &Payload) -> Result<Arc<T>> {
    Arc::clone(payload)
        .downcast::<T>()
        .map_err(|_| FootballError::Cache {
            message: format!(
                "entry {signature} does not hold a {}",
                std::any::type_name::<T>()
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use std::sync::atomic::AtomicUsize;

    const TTL: Duration = Duration::from_secs(60);

    fn test_cache() -> (CacheLayer, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        (CacheLayer::with_clock(clock.clone()), clock)
    }

    fn team_key(id: u32) -> QueryKey {
        QueryKey::Team {
            team_id: TeamId::new(id),
            season: Season::new(2024),
        }
    }

    fn api_down() -> FootballError {
        FootballError::ApiUnavailable {
            endpoint: "competitions/PD/standings".to_string(),
            attempts: 4,
            reason: "HTTP 503".to_string(),
        }
    }

    #[test]
    fn test_cache_key_signatures_cover_all_inputs() {
        let a = QueryKey::Players {
            team_id: TeamId::new(1),
            season: Season::new(2024),
        };
        let b = QueryKey::Players {
            team_id: TeamId::new(1),
            season: Season::new(2023),
        };
        let c = QueryKey::Matches {
            team_id: TeamId::new(1),
            season: Season::new(2024),
        };

        assert_eq!(a.to_cache_key(), "store:players:t1:s2024");
        assert_ne!(a.to_cache_key(), b.to_cache_key());
        assert_ne!(a.to_cache_key(), c.to_cache_key());
        assert_eq!(
            QueryKey::Standings {
                league: LeagueCode::new("pd")
            }
            .to_cache_key(),
            "api:standings:PD"
        );
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_returns_same_value_without_producer() {
        let (cache, clock) = test_cache();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get(&team_key(1), TTL, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![1u32, 2, 3])
            })
            .await
            .unwrap();

        clock.advance(Duration::from_secs(59));

        let second = cache
            .get(&team_key(1), TTL, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![9u32])
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.status(), CacheStatus::Miss);
        assert_eq!(second.status(), CacheStatus::Hit);
        assert!(Arc::ptr_eq(&first.shared(), &second.shared()));
        assert_eq!(second.cached_at(), first.cached_at());
    }

    #[tokio::test]
    async fn test_expired_entry_runs_producer_once_more() {
        let (cache, clock) = test_cache();
        let calls = AtomicUsize::new(0);
        let produce = || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            Ok(n)
        };

        cache.get(&team_key(1), TTL, produce).await.unwrap();
        clock.advance(TTL);
        let refreshed = cache.get(&team_key(1), TTL, produce).await.unwrap();
        let again = cache.get(&team_key(1), TTL, produce).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(*refreshed, 1);
        assert_eq!(refreshed.status(), CacheStatus::Miss);
        assert_eq!(again.status(), CacheStatus::Hit);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_producer_call() {
        let (cache, _clock) = test_cache();
        let calls = AtomicUsize::new(0);
        let produce = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok("standings".to_string())
        };

        let key = team_key(7);
        let (a, b, c) = tokio::join!(
            cache.get(&key, TTL, produce),
            cache.get(&key, TTL, produce),
            cache.get(&key, TTL, produce),
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
        assert!(Arc::ptr_eq(&a.shared(), &b.shared()));
        assert!(Arc::ptr_eq(&a.shared(), &c.shared()));
    }

    #[tokio::test]
    async fn test_api_outage_serves_stale_entry() {
        let (cache, clock) = test_cache();

        let fresh = cache
            .get(&team_key(2), TTL, || async { Ok(42u32) })
            .await
            .unwrap();
        clock.advance(Duration::from_secs(3 * 60));

        let stale = cache
            .get(&team_key(2), TTL, || async { Err::<u32, _>(api_down()) })
            .await
            .unwrap();

        assert_eq!(*stale, 42);
        assert!(stale.is_stale());
        assert_eq!(stale.cached_at(), fresh.cached_at());
        assert!(Arc::ptr_eq(&fresh.shared(), &stale.shared()));
        assert_eq!(cache.stats().stale_served, 1);
    }

    #[tokio::test]
    async fn test_api_outage_without_entry_propagates() {
        let (cache, _clock) = test_cache();

        let result = cache
            .get(&team_key(3), TTL, || async { Err::<u32, _>(api_down()) })
            .await;

        match result {
            Err(FootballError::ApiUnavailable { attempts, .. }) => assert_eq!(attempts, 4),
            other => panic!("Expected ApiUnavailable, got {:?}", other.map(|c| *c)),
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_not_masked_by_stale_entry() {
        let (cache, clock) = test_cache();

        cache
            .get(&team_key(4), TTL, || async { Ok(1u32) })
            .await
            .unwrap();
        clock.advance(TTL * 2);

        let result = cache
            .get(&team_key(4), TTL, || async {
                Err::<u32, _>(FootballError::StoreUnavailable {
                    message: "database is locked".to_string(),
                })
            })
            .await;

        assert!(matches!(
            result,
            Err(FootballError::StoreUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_entry_for_next_call() {
        let (cache, clock) = test_cache();

        cache
            .get(&team_key(5), TTL, || async { Ok(10u32) })
            .await
            .unwrap();
        clock.advance(TTL * 2);
        let _ = cache
            .get(&team_key(5), TTL, || async { Err::<u32, _>(api_down()) })
            .await
            .unwrap();

        let recovered = cache
            .get(&team_key(5), TTL, || async { Ok(11u32) })
            .await
            .unwrap();

        assert_eq!(*recovered, 11);
        assert_eq!(recovered.status(), CacheStatus::Miss);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let (cache, _clock) = test_cache();

        cache
            .get(&team_key(6), TTL, || async { Ok(1u32) })
            .await
            .unwrap();
        cache.invalidate(&team_key(6)).await;
        let after = cache
            .get(&team_key(6), TTL, || async { Ok(2u32) })
            .await
            .unwrap();

        assert_eq!(*after, 2);
        assert_eq!(after.status(), CacheStatus::Miss);
    }

    #[tokio::test]
    async fn test_type_mismatch_for_key_is_an_error() {
        let (cache, _clock) = test_cache();

        cache
            .get(&team_key(8), TTL, || async { Ok(1u32) })
            .await
            .unwrap();
        let result = cache
            .get(&team_key(8), TTL, || async { Ok("text".to_string()) })
            .await;

        assert!(matches!(result, Err(FootballError::Cache { .. })));
    }

    #[tokio::test]
    async fn test_stats_and_clear() {
        let (cache, _clock) = test_cache();

        cache
            .get(&team_key(1), TTL, || async { Ok(1u32) })
            .await
            .unwrap();
        cache
            .get(&team_key(1), TTL, || async { Ok(1u32) })
            .await
            .unwrap();
        cache
            .get(&team_key(2), TTL, || async { Ok(2u32) })
            .await
            .unwrap();

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);

        cache.clear();
        assert_eq!(cache.stats().entries, 0);
    }

    #[tokio::test]
    async fn test_entries_ignore_in_flight_producers() {
        let (cache, clock) = test_cache();

        let seen = cache
            .get(&team_key(1), TTL, || async { Ok(cache.stats().entries) })
            .await
            .unwrap();
        assert_eq!(*seen, 0);
        assert_eq!(cache.stats().entries, 1);

        // A refresh keeps counting the entry it is about to replace.
        clock.advance(TTL * 2);
        let seen = cache
            .get(&team_key(1), TTL, || async { Ok(cache.stats().entries) })
            .await
            .unwrap();
        assert_eq!(*seen, 1);

        cache.invalidate(&team_key(1)).await;
        assert_eq!(cache.stats().entries, 0);
    }
}
