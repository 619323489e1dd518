use std::pin::Pin;
use std::sync::Arc;

use persona_agent_model::{
    ModelProvider, ModelProviderError, ModelRequest, ModelResponse,
};
use tracing::Instrument;

use crate::error::{Backend, Error};

type SendRequestResult = Result<ModelResponse, Box<dyn ModelProviderError>>;
type BoxedSendRequestFuture =
    Pin<Box<dyn Future<Output = SendRequestResult> + Send>>;
type HandlerFn = Arc<dyn Fn(ModelRequest) -> BoxedSendRequestFuture + Send + Sync>;

/// A wrapper around a model provider that provides a type-erased interface
/// for the other modules.
///
/// The responder and the evaluator each own one, configured with different
/// providers.
#[derive(Clone)]
pub struct ModelClient {
    handler_fn: HandlerFn,
    backend: Backend,
}

impl ModelClient {
    #[inline]
    pub fn new<P: ModelProvider + 'static>(provider: P, backend: Backend) -> Self {
        // We have to erase the type `P`, since `ModelClient` doesn't have a
        // generic parameter and we don't want it either.
        let handler_fn: HandlerFn = Arc::new(move |req| {
            let fut = provider.send_request(&req);
            Box::pin(
                async move {
                    trace!("got a request: {:?}", req);
                    match fut.await {
                        Ok(resp) => {
                            trace!("finished a request");
                            Ok(resp)
                        }
                        Err(err) => {
                            error!("got an error: {err:?}");
                            Err(Box::new(err) as Box<dyn ModelProviderError>)
                        }
                    }
                }
                .instrument(trace_span!("model client req", %backend)),
            )
        });
        Self {
            handler_fn,
            backend,
        }
    }

    /// Sends a request and waits for the complete response.
    ///
    /// Transport failures are reported once and never retried here.
    #[inline]
    pub async fn send_request(
        &self,
        req: ModelRequest,
    ) -> Result<ModelResponse, Error> {
        (self.handler_fn)(req)
            .await
            .map_err(|err| Error::BackendUnavailable {
                backend: self.backend,
                kind: err.kind(),
                message: err.to_string(),
            })
    }

    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }
}
