//! Request-time enforcement of content expiration.

use std::{
    borrow::Cow,
    fmt, mem,
    sync::Arc,
    task::{Context, Poll},
};

use futures::future::{BoxFuture, FutureExt};
use http::{header, HeaderValue, Request, Response, StatusCode};
use tower::{Layer, Service};
use tower_expire_core::{
    store::load_record,
    time::now,
    ItemId, MetadataStore, ResolvedAction,
};

use crate::{
    host::{ContentHost, ContentStatus},
    util::ErrorExt,
};

/// A layer that enforces expiration on singular content views.
///
/// The host's router resolves which content item (if any) a request
/// renders and inserts its [`ItemId`] into the request extensions before
/// this layer runs. Requests without one — listings, search results,
/// administrative screens — pass through untouched, as do items with no
/// expiration record or a record still in the future.
///
/// When the viewed item has expired, exactly one terminal action occurs
/// and the inner service is never called:
///
/// - a redirect action answers `302 Found` to the configured url;
/// - a draft action reverts the item to draft and flushes the host cache,
///   then answers `302 Found` to the configured [`home_url`].
///
/// [`home_url`]: ExpiryLayer::home_url
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tower_expire::{host::MemoryHost, store::MemoryStore, ExpiryLayer};
///
/// let store = Arc::new(MemoryStore::new());
/// let host = Arc::new(MemoryHost::new());
/// let layer = ExpiryLayer::new(store, host).home_url("https://example.com/");
/// ```
pub struct ExpiryLayer<Store: MetadataStore, Host: ContentHost> {
    store: Arc<Store>,
    host: Arc<Host>,
    config: Arc<Config>, // This is put in an `Arc` to make clones cheap.
}

/// A middleware produced by [`ExpiryLayer`].
pub struct ExpiryEnforcer<S, Store: MetadataStore, Host: ContentHost> {
    inner: S,
    layer: ExpiryLayer<Store, Host>,
}

#[derive(Clone, Debug)]
struct Config {
    home_url: Cow<'static, str>,
}

const DEFAULT_HOME_URL: &str = "/";

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Config {
            home_url: Cow::Borrowed(DEFAULT_HOME_URL),
        }
    }
}

impl<Store: MetadataStore, Host: ContentHost> ExpiryLayer<Store, Host> {
    /// Creates a new `ExpiryLayer` with default configuration values.
    pub fn new(store: Arc<Store>, host: Arc<Host>) -> ExpiryLayer<Store, Host> {
        ExpiryLayer {
            store,
            host,
            config: Arc::new(Config::default()),
        }
    }

    /// Sets the redirect target used after a draft action.
    ///
    /// Default is `"/"`.
    ///
    /// # Panics
    ///
    /// Panics if `url` is not a valid `Location` header value.
    #[track_caller]
    pub fn home_url(mut self, url: impl Into<Cow<'static, str>>) -> Self {
        let url = url.into();

        if let Err(err) = HeaderValue::from_str(&url) {
            panic!("invalid `home_url` value: {}", err.display_chain());
        }

        self.config_mut().home_url = url;
        self
    }

    fn config_mut(&mut self) -> &mut Config {
        Arc::make_mut(&mut self.config)
    }
}

impl<Store: MetadataStore, Host: ContentHost> Clone for ExpiryLayer<Store, Host> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            host: Arc::clone(&self.host),
            config: self.config.clone(),
        }
    }
}

impl<Store: MetadataStore, Host: ContentHost> fmt::Debug for ExpiryLayer<Store, Host>
where
    Store: fmt::Debug,
    Host: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ExpiryLayer");
        d.field("store", &*self.store);
        d.field("host", &*self.host);
        d.field("config", &self.config);
        d.finish()
    }
}

impl<S, Store: MetadataStore, Host: ContentHost> Layer<S> for ExpiryLayer<Store, Host> {
    type Service = ExpiryEnforcer<S, Store, Host>;

    fn layer(&self, inner: S) -> Self::Service {
        ExpiryEnforcer {
            inner,
            layer: self.clone(),
        }
    }
}

impl<S, Store: MetadataStore, Host: ContentHost> Clone for ExpiryEnforcer<S, Store, Host>
where
    S: Clone,
{
    fn clone(&self) -> Self {
        ExpiryEnforcer {
            inner: self.inner.clone(),
            layer: self.layer.clone(),
        }
    }
}

impl<S, Store: MetadataStore, Host: ContentHost> fmt::Debug for ExpiryEnforcer<S, Store, Host>
where
    S: fmt::Debug,
    Store: fmt::Debug,
    Host: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ExpiryEnforcer");
        d.field("inner", &self.inner);
        d.field("layer", &self.layer);
        d.finish()
    }
}

impl<ReqBody, ResBody, S, Store, Host> Service<Request<ReqBody>> for ExpiryEnforcer<S, Store, Host>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Error: Send,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
    Store: MetadataStore,
    Host: ContentHost,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let item = req.extensions().get::<ItemId>().copied();

        let store = Arc::clone(&self.layer.store);
        let host = Arc::clone(&self.layer.host);
        let config = Arc::clone(&self.layer.config);

        // Take the service that was driven to readiness; leave the clone
        // to be polled again.
        let clone = self.inner.clone();
        let mut inner = mem::replace(&mut self.inner, clone);

        async move {
            let Some(item) = item else {
                return inner.call(req).await;
            };

            // One instant per request: every comparison below sees the
            // same "now".
            let now = now();

            let record = match load_record(store.as_ref(), item).await {
                Ok(Some(record)) => record,
                // No record means the item never expires.
                Ok(None) => return inner.call(req).await,
                // A store that cannot be read must not hide content.
                Err(_err) => {
                    warn!(
                        item = %item,
                        err = %_err.display_chain(),
                        "failed to load expiration record; rendering normally"
                    );
                    return inner.call(req).await;
                }
            };

            if !record.is_expired(now) {
                return inner.call(req).await;
            }

            match record.resolve_action() {
                ResolvedAction::Redirect(url) => {
                    debug!(item = %item, url, "expired; redirecting");
                    Ok(redirect(url))
                }
                ResolvedAction::Draft => {
                    debug!(item = %item, "expired; reverting to draft");
                    if let Err(_err) = host.set_status(item, ContentStatus::Draft).await {
                        warn!(
                            item = %item,
                            err = %_err.display_chain(),
                            "failed to revert expired item to draft"
                        );
                    }
                    if let Err(_err) = host.flush_cache().await {
                        warn!(err = %_err.display_chain(), "failed to flush host cache");
                    }
                    Ok(redirect(&config.home_url))
                }
            }
        }
        .boxed()
    }
}

fn redirect<B: Default>(location: &str) -> Response<B> {
    let mut res = Response::new(B::default());
    *res.status_mut() = StatusCode::FOUND;
    match HeaderValue::try_from(location) {
        Ok(value) => {
            res.headers_mut().insert(header::LOCATION, value);
        }
        Err(_err) => {
            // The validator only persists urls that parse as absolute
            // http(s) uris, so this is likely a bug.
            warn!(err = %_err.display_chain(), location, "redirect target is not a valid header value");
        }
    }
    res
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn redirect_sets_status_and_location() {
        let res: Response<String> = redirect("https://x.test/gone");
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).unwrap(),
            "https://x.test/gone"
        );
    }

    #[test]
    fn redirect_with_invalid_location_omits_the_header() {
        let res: Response<String> = redirect("https://x.test/\nnewline");
        assert_eq!(res.status(), StatusCode::FOUND);
        assert!(res.headers().get(header::LOCATION).is_none());
    }
}
