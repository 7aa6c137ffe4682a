use burrow_core::{FullUrl, ShortCode, Shortener, ShortenerError};
use http::{Method, StatusCode};
use tracing::{debug, error};

const EMPTY_BODY: &str = "Body is empty";
pub const NOT_FOUND: &str = "Not found";
const METHOD_NOT_ALLOWED: &str = "Method not allowed!";

/// How a POST persists a new mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Reply as soon as a code is allocated; the mapping is written later.
    #[default]
    Background,
    /// Reply only after the mapping is committed.
    Synchronous,
}

/// A response produced by [`Endpoint::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl From<&ShortenerError> for Reply {
    fn from(err: &ShortenerError) -> Self {
        match err {
            ShortenerError::InvalidInput(message) => Self::new(StatusCode::BAD_REQUEST, message),
            ShortenerError::InvalidShortCode(_) => Self::new(StatusCode::NOT_FOUND, NOT_FOUND),
            ShortenerError::Storage(_) | ShortenerError::GeneratorStopped => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

/// Transport-agnostic request handler in front of a [`Shortener`].
///
/// `POST` with the URL as body shortens it, `GET /{code}` resolves a code.
/// Any transport can feed requests through [`handle`](Self::handle) and
/// write the [`Reply`] back.
#[derive(Debug)]
pub struct Endpoint<'a, S: ?Sized> {
    shortener: &'a S,
    host: String,
    mode: WriteMode,
}

impl<'a, S: Shortener + ?Sized> Endpoint<'a, S> {
    /// `host` prefixes the short urls handed back to clients.
    pub fn new(shortener: &'a S, host: impl Into<String>) -> Self {
        Self {
            shortener,
            host: host.into(),
            mode: WriteMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub async fn handle(&self, method: &Method, path: &str, body: &[u8]) -> Reply {
        match *method {
            Method::POST => self.shorten(body).await,
            Method::GET => self.resolve(path).await,
            _ => {
                debug!(%method, "rejected request method");
                Reply::new(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED)
            }
        }
    }

    async fn shorten(&self, body: &[u8]) -> Reply {
        if body.is_empty() {
            return Reply::from(&ShortenerError::InvalidInput(EMPTY_BODY.to_string()));
        }

        let full = FullUrl::from(body);
        let saved = match self.mode {
            WriteMode::Background => self.shortener.save(full).await,
            WriteMode::Synchronous => self.shortener.save_sync(full).await,
        };

        match saved {
            Ok(short) => Reply::new(
                StatusCode::OK,
                format!("Short url: {}", short.to_url(&self.host)),
            ),
            Err(err) => {
                error!(error = %err, "failed to shorten url");
                Reply::from(&err)
            }
        }
    }

    async fn resolve(&self, path: &str) -> Reply {
        let raw = path.strip_prefix('/').unwrap_or(path);
        let short = match ShortCode::new(raw) {
            Ok(short) => short,
            Err(err) => {
                debug!(path, error = %err, "request path is not a short code");
                return Reply::from(&ShortenerError::from(err));
            }
        };

        match self.shortener.get_full(&short).await {
            Ok(Some(full)) => Reply::new(StatusCode::OK, format!("Full url: {full}")),
            Ok(None) => Reply::new(StatusCode::NOT_FOUND, NOT_FOUND),
            Err(err) => {
                error!(short_code = %short, error = %err, "failed to resolve short code");
                Reply::from(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinkStore;
    use burrow_storage::InMemoryIndex;

    async fn store() -> LinkStore<InMemoryIndex> {
        LinkStore::init(InMemoryIndex::new()).await.unwrap()
    }

    #[tokio::test]
    async fn post_shortens_and_get_resolves() {
        let store = store().await;
        let endpoint = Endpoint::new(&store, "localhost").with_mode(WriteMode::Synchronous);

        let reply = endpoint.handle(&Method::POST, "/", b"http://tt.t").await;
        assert_eq!(reply, Reply::new(StatusCode::OK, "Short url: localhost/1"));

        let reply = endpoint.handle(&Method::GET, "/1", b"").await;
        assert_eq!(reply, Reply::new(StatusCode::OK, "Full url: http://tt.t"));

        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn post_with_empty_body_is_rejected() {
        let store = store().await;
        let endpoint = Endpoint::new(&store, "localhost");

        let reply = endpoint.handle(&Method::POST, "/", b"").await;

        assert_eq!(reply, Reply::new(StatusCode::BAD_REQUEST, "Body is empty"));
        assert_eq!(store.pending_writes(), 0);
        assert!(store.index().is_empty());
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn background_post_replies_with_code() {
        let store = store().await;
        let endpoint = Endpoint::new(&store, "sho.rt");

        let reply = endpoint.handle(&Method::POST, "/", b"http://tt.t").await;

        assert_eq!(reply, Reply::new(StatusCode::OK, "Short url: sho.rt/1"));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_unknown_or_invalid_code_is_not_found() {
        let store = store().await;
        let endpoint = Endpoint::new(&store, "localhost");

        let unknown = endpoint.handle(&Method::GET, "/999", b"").await;
        let invalid = endpoint.handle(&Method::GET, "/not/a/code", b"").await;
        let empty = endpoint.handle(&Method::GET, "/", b"").await;

        assert_eq!(unknown.status, StatusCode::NOT_FOUND);
        assert_eq!(invalid.status, StatusCode::NOT_FOUND);
        assert_eq!(empty.status, StatusCode::NOT_FOUND);
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn other_methods_are_not_allowed() {
        let store = store().await;
        let endpoint = Endpoint::new(&store, "localhost");

        for method in [Method::PUT, Method::DELETE, Method::PATCH] {
            let reply = endpoint.handle(&method, "/1", b"http://tt.t").await;
            assert_eq!(
                reply,
                Reply::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed!")
            );
        }
        store.close().await.unwrap();
    }

    #[test]
    fn errors_map_to_statuses() {
        let storage = ShortenerError::Storage(burrow_core::StorageError::Read("io".into()));

        assert_eq!(
            Reply::from(&storage).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Reply::from(&ShortenerError::GeneratorStopped).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Reply::from(&ShortenerError::InvalidShortCode("x".into())).status,
            StatusCode::NOT_FOUND
        );
    }
}
