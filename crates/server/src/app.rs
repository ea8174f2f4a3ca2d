use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Request, Response};
use http_body::Body;
use micro_ingest::{IngestConfig, IngestError, PipelineGate, Rejection};
use micro_ingest_http::handler::Handler;
use micro_ingest_http::protocol::body::ReqBody;
use tracing::debug;

use crate::error::ServeError;
use crate::response::{self, ResponseBody};
use crate::routes::{ComplaintRoutes, Endpoint};
use crate::store::{DocumentStore, MemoryStore};

type InnerRouter = matchit::Router<Vec<(Method, Endpoint)>>;

/// The services behind one ingestion gate.
///
/// Every request passes through the gate before routing, so a rejected or
/// broken body never reaches an endpoint, and an unknown path still has its
/// body consumed.
pub struct App {
    gate: PipelineGate,
    store: Arc<dyn DocumentStore>,
    router: InnerRouter,
}

pub struct AppBuilder {
    config: IngestConfig,
    store: Option<Arc<dyn DocumentStore>>,
    complaint_routes: ComplaintRoutes,
}

impl AppBuilder {
    fn new() -> Self {
        Self { config: IngestConfig::default(), store: None, complaint_routes: ComplaintRoutes::default() }
    }

    pub fn ingest_config(mut self, config: IngestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Picks the complaint service to mount, [`ComplaintRoutes::ByUser`] by default.
    pub fn complaint_routes(mut self, complaint_routes: ComplaintRoutes) -> Self {
        self.complaint_routes = complaint_routes;
        self
    }

    /// Builds the app, falling back to an empty [`MemoryStore`] if no store was set.
    pub fn build(self) -> Result<App, ServeError> {
        let mut router = InnerRouter::new();
        for (path, method, endpoint) in self.complaint_routes.routes() {
            match router.at_mut(path) {
                Ok(matched) => matched.value.push((method, endpoint)),
                Err(_) => router.insert(path, vec![(method, endpoint)])?,
            }
        }

        let store = self.store.unwrap_or_else(|| Arc::new(MemoryStore::new()));
        Ok(App { gate: PipelineGate::new(self.config), store, router })
    }
}

impl App {
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// The endpoint for `method` on `path`, with the `{id}` segment if the route has one.
    fn route(&self, method: &Method, path: &str) -> Option<(Endpoint, Option<String>)> {
        let matched = self.router.at(path).ok()?;
        let (_, endpoint) = matched.value.iter().find(|(m, _)| m == method)?;
        Some((*endpoint, matched.params.get("id").map(str::to_string)))
    }

    /// Ingests the request body, then serves the request.
    ///
    /// Returns `Err` only when the body stream broke; the request must then
    /// go unanswered.
    pub async fn handle<B>(&self, request: Request<B>) -> Result<Response<ResponseBody>, IngestError>
    where
        B: Body<Data = Bytes>,
        B::Error: Display,
    {
        let route = self.route(request.method(), request.uri().path());
        let store = self.store.as_ref();

        let gated = self
            .gate
            .run(request, |request| async move {
                match route {
                    Some((endpoint, id)) => endpoint.serve(store, id.as_deref(), request).await,
                    None => {
                        debug!(method = %request.method(), path = request.uri().path(), "no route");
                        response::not_found()
                    }
                }
            })
            .await?;

        Ok(gated.unwrap_or_else(Rejection::into_response))
    }
}

#[async_trait]
impl Handler for App {
    type RespBody = ResponseBody;
    type Error = IngestError;

    async fn call(&self, req: Request<ReqBody>) -> Result<Response<Self::RespBody>, Self::Error> {
        self.handle(req).await
    }
}
