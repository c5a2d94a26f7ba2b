use crate::domain::ml::PredictionResult;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Exact-match key: the bit pattern of every feature value
pub type CacheKey = Vec<u64>;

pub fn cache_key(features: &[f64]) -> CacheKey {
    features.iter().map(|v| v.to_bits()).collect()
}

struct CacheState {
    entries: HashMap<CacheKey, PredictionResult>,
    order: VecDeque<CacheKey>,
}

/// Bounded memo of prediction results keyed by the exact feature vector.
///
/// Oldest insertions are evicted first once `capacity` is reached.
pub struct PredictionCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl std::fmt::Debug for PredictionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionCache")
            .field("capacity", &self.capacity)
            .field("state", &"<Mutex>")
            .finish()
    }
}

impl PredictionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<PredictionResult> {
        let state = self.state.lock().ok()?;
        state.entries.get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, result: PredictionResult) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.entries.contains_key(&key) {
            state.entries.insert(key, result);
            return;
        }
        while state.order.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
            }
        }
        state.order.push_back(key.clone());
        state.entries.insert(key, result);
    }

    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ml::RiskLabel;

    fn result(label: RiskLabel) -> PredictionResult {
        PredictionResult::new(label, "diabetes", None)
    }

    #[test]
    fn test_cache_hit_requires_exact_vector() {
        let cache = PredictionCache::new(4);
        cache.insert(cache_key(&[1.0, 2.0]), result(RiskLabel::High));

        assert_eq!(
            cache.get(&cache_key(&[1.0, 2.0])),
            Some(result(RiskLabel::High))
        );
        assert_eq!(cache.get(&cache_key(&[1.0, 2.000001])), None);
    }

    #[test]
    fn test_cache_evicts_oldest() {
        let cache = PredictionCache::new(2);
        cache.insert(cache_key(&[1.0]), result(RiskLabel::Low));
        cache.insert(cache_key(&[2.0]), result(RiskLabel::High));
        cache.insert(cache_key(&[3.0]), result(RiskLabel::Low));

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&cache_key(&[1.0])).is_none());
        assert!(cache.get(&cache_key(&[3.0])).is_some());
    }

    #[test]
    fn test_zero_capacity_disables_cache() {
        let cache = PredictionCache::new(0);
        cache.insert(cache_key(&[1.0]), result(RiskLabel::Low));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_large_capacity_is_a_limit_not_an_allocation() {
        let cache = PredictionCache::new(usize::MAX / 2);
        assert!(cache.is_empty());
        cache.insert(cache_key(&[1.0]), result(RiskLabel::High));
        assert_eq!(cache.len(), 1);
    }
}
