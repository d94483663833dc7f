//! Read-through caching for materialized collections.
//!
//! A [`ResourceCache`] wraps a parameterless async loader and materializes
//! the full collection on first read; an [`append`](ResourceCache::append)
//! after a create operation keeps the cache current without a round trip.
//! [`KeyedCache`] partitions independent caches by key, each with its own
//! loader closing over that key.
//!
//! There is no TTL and no eviction in this layer; callers needing
//! freshness construct a new cache instance.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::clients::HttpError;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type Loader<T> = Box<dyn Fn() -> BoxFuture<Result<Vec<T>, HttpError>> + Send + Sync>;

/// A read-through cache over one collection.
///
/// The first read invokes the loader exactly once; the lock around the
/// materialized list is held across the load, so concurrent readers during
/// population wait for the same result rather than each issuing a
/// redundant fetch. Once populated, the list is the single source of truth
/// until an explicit [`append`](ResourceCache::append).
///
/// # Example
///
/// ```rust,ignore
/// let client = client.clone();
/// let cache = ResourceCache::new(move || {
///     let client = client.clone();
///     async move {
///         client
///             .pages("prebuildGroups/", ListParams::new().page_size(250))
///             .drain()
///             .await
///     }
/// });
///
/// let groups = cache.items().await?; // loads once
/// let again = cache.items().await?;  // served from the cache
/// ```
pub struct ResourceCache<T> {
    loader: Loader<T>,
    items: Mutex<Option<Vec<T>>>,
}

impl<T: Clone> ResourceCache<T> {
    /// Creates a cache over an async loader.
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, HttpError>> + Send + 'static,
    {
        Self::from_boxed(Box::new(move || Box::pin(loader())))
    }

    fn from_boxed(loader: Loader<T>) -> Self {
        Self {
            loader,
            items: Mutex::new(None),
        }
    }

    /// Returns the materialized collection, loading it on first access.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error; a failed load leaves the cache
    /// unpopulated, so the next read tries again.
    pub async fn items(&self) -> Result<Vec<T>, HttpError> {
        let mut guard = self.items.lock().await;
        if let Some(items) = guard.as_ref() {
            return Ok(items.clone());
        }
        let loaded = (self.loader)().await?;
        *guard = Some(loaded.clone());
        Ok(loaded)
    }

    /// Appends a record in place, with no reload.
    ///
    /// Used after a create operation so the cache reflects the
    /// just-created record. If the collection has not been materialized
    /// yet, it is loaded first so the append is not lost.
    ///
    /// # Errors
    ///
    /// Propagates the loader's error when a first load is needed.
    pub async fn append(&self, item: T) -> Result<(), HttpError> {
        let mut guard = self.items.lock().await;
        if guard.is_none() {
            *guard = Some((self.loader)().await?);
        }
        if let Some(items) = guard.as_mut() {
            items.push(item);
        }
        Ok(())
    }

    /// Whether the collection has been materialized.
    pub async fn is_loaded(&self) -> bool {
        self.items.lock().await.is_some()
    }
}

impl<T> std::fmt::Debug for ResourceCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache").finish_non_exhaustive()
    }
}

type LoaderFactory<K, T> = Box<dyn Fn(&K) -> Loader<T> + Send + Sync>;

/// A map from partition key to an independent [`ResourceCache`].
///
/// Entries are created lazily on first lookup of an unseen key, each with
/// a loader produced by the factory for that key, and are never evicted
/// within the cache's lifetime. Unbounded growth is a deliberate
/// simplicity/staleness trade-off.
///
/// # Example
///
/// ```rust,ignore
/// let client = client.clone();
/// let by_group = KeyedCache::new(move |group_id: &i64| {
///     let client = client.clone();
///     let group_id = *group_id;
///     move || {
///         let client = client.clone();
///         async move {
///             client
///                 .prebuild_standard_price_pages(
///                     ListParams::new().page_size(250),
///                     Some(group_id),
///                 )
///                 .drain()
///                 .await
///         }
///     }
/// });
///
/// let prices = by_group.entry(47).await.items().await?;
/// ```
pub struct KeyedCache<K, T> {
    make_loader: LoaderFactory<K, T>,
    entries: Mutex<HashMap<K, Arc<ResourceCache<T>>>>,
}

impl<K, T> KeyedCache<K, T>
where
    K: Eq + Hash + Clone,
    T: Clone,
{
    /// Creates a keyed cache from a loader factory.
    ///
    /// The factory is invoked once per unseen key to produce that
    /// partition's loader, a plain async closure; the boxing happens here
    /// so callers never spell out the erased types.
    pub fn new<F, L, Fut>(make_loader: F) -> Self
    where
        F: Fn(&K) -> L + Send + Sync + 'static,
        L: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, HttpError>> + Send + 'static,
    {
        Self {
            make_loader: Box::new(move |key| {
                let loader = make_loader(key);
                Box::new(move || Box::pin(loader()))
            }),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cache entry for `key`, creating it lazily.
    pub async fn entry(&self, key: K) -> Arc<ResourceCache<T>> {
        let mut entries = self.entries.lock().await;
        entries
            .entry(key.clone())
            .or_insert_with(|| Arc::new(ResourceCache::from_boxed((self.make_loader)(&key))))
            .clone()
    }

    /// The number of partitions seen so far.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether no partition has been looked up yet.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl<K, T> std::fmt::Debug for KeyedCache<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedCache").finish_non_exhaustive()
    }
}
