//! Tokenizer resolver with a process-lifetime cache

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::tokenizer::engine::TokenizerHandle;
use crate::tokenizer::error::{TokenizerError, TokenizerResult};
use crate::tokenizer::model::ModelId;
use crate::tokenizer::source::{TokenizerDefinition, TokenizerSource};

/// Statistics for the tokenizer cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of resolves served from the cache
    pub hits: usize,
    /// Number of resolves that loaded a tokenizer
    pub misses: usize,
}

impl CacheStats {
    /// Share of resolves served from the cache, in percent
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Resolves model identifiers to shared tokenizer handles
///
/// Each identifier owns a [`OnceCell`], so concurrent resolves of the same
/// uncached model wait for a single load while other models proceed. A failed
/// load counts as a miss and its entry is dropped, so the next resolve tries again.
pub struct Resolver {
    source: Box<dyn TokenizerSource>,
    cache: Mutex<HashMap<ModelId, Arc<OnceCell<TokenizerHandle>>>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl Resolver {
    /// Create a resolver with an empty cache
    pub fn new(source: Box<dyn TokenizerSource>) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Return the cached tokenizer for `model`, loading it on first use
    pub fn resolve(&self, model: &ModelId) -> TokenizerResult<TokenizerHandle> {
        let cell = {
            let mut cache = self.cache.lock().map_err(|_| TokenizerError::CacheLock)?;
            Arc::clone(cache.entry(model.clone()).or_default())
        };

        let mut loaded = false;
        let handle = match cell.get_or_try_init(|| {
            loaded = true;
            self.load(model)
        }) {
            Ok(handle) => handle,
            Err(err) => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                self.forget_failed(model, &cell)?;
                return Err(err);
            }
        };

        if loaded {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!(%model, "Tokenizer cache hit");
        }

        Ok(handle.clone())
    }

    /// Identifiers with a loaded tokenizer, sorted
    pub fn cached_models(&self) -> TokenizerResult<Vec<ModelId>> {
        let cache = self.cache.lock().map_err(|_| TokenizerError::CacheLock)?;
        let mut models: Vec<ModelId> = cache
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(model, _)| model.clone())
            .collect();
        models.sort();
        Ok(models)
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drop the entry for `model` if it still holds the empty cell of a failed load
    ///
    /// Only the map and `cell` may reference it; another holder could still be
    /// initializing the same cell.
    fn forget_failed(
        &self,
        model: &ModelId,
        cell: &Arc<OnceCell<TokenizerHandle>>,
    ) -> TokenizerResult<()> {
        let mut cache = self.cache.lock().map_err(|_| TokenizerError::CacheLock)?;
        let stale = cache
            .get(model)
            .is_some_and(|current| {
                Arc::ptr_eq(current, cell)
                    && Arc::strong_count(current) == 2
                    && current.get().is_none()
            });
        if stale {
            cache.remove(model);
        }
        Ok(())
    }

    fn load(&self, model: &ModelId) -> TokenizerResult<TokenizerHandle> {
        info!(%model, "Loading tokenizer");

        let engine = self
            .source
            .fetch_definition(model)
            .and_then(TokenizerDefinition::into_engine)
            .map_err(|source| TokenizerError::Load {
                model: model.clone(),
                source,
            })?;

        Ok(TokenizerHandle::from_arc(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::engine::TokenizerEngine;
    use crate::tokenizer::error::{BoxError, SourceError, SourceResult};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    struct CharEngine;

    impl TokenizerEngine for CharEngine {
        fn encode(&self, text: &str) -> Result<Vec<u32>, BoxError> {
            Ok(text.chars().map(u32::from).collect())
        }
    }

    /// Source that counts fetches and fails the first `failures` of them
    struct CountingSource {
        fetches: Arc<AtomicUsize>,
        failures: usize,
        delay: Duration,
    }

    impl CountingSource {
        fn new(fetches: &Arc<AtomicUsize>) -> Self {
            Self {
                fetches: Arc::clone(fetches),
                failures: 0,
                delay: Duration::ZERO,
            }
        }
    }

    impl TokenizerSource for CountingSource {
        fn fetch_definition(&self, model: &ModelId) -> SourceResult<TokenizerDefinition> {
            let attempt = self.fetches.fetch_add(1, Ordering::SeqCst);
            thread::sleep(self.delay);
            if attempt < self.failures {
                return Err(SourceError::NotFound {
                    url: format!("stub://{}", model),
                });
            }
            Ok(TokenizerDefinition::Engine(Arc::new(CharEngine)))
        }
    }

    #[test]
    fn test_resolve_is_cached() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let resolver = Resolver::new(Box::new(CountingSource::new(&fetches)));
        let model = ModelId::parse("org/model").unwrap();

        let first = resolver.resolve(&model).unwrap();
        let second = resolver.resolve(&model).unwrap();

        assert!(TokenizerHandle::ptr_eq(&first, &second));
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.stats(), CacheStats { hits: 1, misses: 1 });
        assert_eq!(resolver.stats().hit_rate(), 50.0);
    }

    #[test]
    fn test_distinct_models_get_distinct_handles() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let resolver = Resolver::new(Box::new(CountingSource::new(&fetches)));
        let a = ModelId::parse("org/a").unwrap();
        let b = ModelId::parse("org/b").unwrap();

        let handle_a = resolver.resolve(&a).unwrap();
        let handle_b = resolver.resolve(&b).unwrap();

        assert!(!TokenizerHandle::ptr_eq(&handle_a, &handle_b));
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.cached_models().unwrap(), vec![a, b]);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            failures: 1,
            ..CountingSource::new(&fetches)
        };
        let resolver = Resolver::new(Box::new(source));
        let model = ModelId::parse("org/flaky").unwrap();

        let err = resolver.resolve(&model).unwrap_err();
        assert_eq!(err.model(), Some(&model));
        assert!(matches!(
            err,
            TokenizerError::Load {
                source: SourceError::NotFound { .. },
                ..
            }
        ));
        assert!(resolver.cached_models().unwrap().is_empty());
        assert_eq!(resolver.stats(), CacheStats { hits: 0, misses: 1 });

        assert!(resolver.resolve(&model).is_ok());
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
        assert_eq!(resolver.cached_models().unwrap(), vec![model]);
        assert_eq!(resolver.stats(), CacheStats { hits: 0, misses: 2 });
    }

    #[test]
    fn test_failed_loads_leave_no_entries() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            failures: usize::MAX,
            ..CountingSource::new(&fetches)
        };
        let resolver = Resolver::new(Box::new(source));

        for name in ["org/a", "org/b", "org/a"] {
            let model = ModelId::parse(name).unwrap();
            assert!(resolver.resolve(&model).is_err());
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 3);
        assert_eq!(resolver.stats(), CacheStats { hits: 0, misses: 3 });
        assert!(resolver.cache.lock().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_resolves_fetch_once() {
        let fetches = Arc::new(AtomicUsize::new(0));
        let source = CountingSource {
            delay: Duration::from_millis(50),
            ..CountingSource::new(&fetches)
        };
        let resolver = Arc::new(Resolver::new(Box::new(source)));
        let barrier = Arc::new(Barrier::new(8));
        let model = ModelId::parse("org/shared").unwrap();

        let workers: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                let barrier = Arc::clone(&barrier);
                let model = model.clone();
                thread::spawn(move || {
                    barrier.wait();
                    resolver.resolve(&model).unwrap()
                })
            })
            .collect();

        let handles: Vec<TokenizerHandle> =
            workers.into_iter().map(|w| w.join().unwrap()).collect();

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(handles
            .windows(2)
            .all(|pair| TokenizerHandle::ptr_eq(&pair[0], &pair[1])));
        assert_eq!(resolver.stats(), CacheStats { hits: 7, misses: 1 });
    }
}
