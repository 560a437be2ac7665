use axum_core::{
    body::{self, BoxBody},
    response::Response,
    BoxError,
};
use bytes::Bytes;
use futures::future::BoxFuture;
use http::Request;
use http_body::Body as HttpBody;
use std::{
    convert::Infallible,
    fmt::{self, Debug, Formatter},
    task::{Context, Poll},
};
use tower_service::Service;

use crate::{constants::bearer_token, session::AxumSession, session_store::AxumSessionStore};

#[derive(Clone)]
pub struct AxumSessionService<S> {
    pub(crate) session_store: AxumSessionStore,
    pub(crate) inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for AxumSessionService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>, Error = Infallible>
        + Clone
        + Send
        + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: HttpBody<Data = Bytes> + Send + 'static,
    ResBody::Error: Into<BoxError>,
{
    type Response = Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let store = self.session_store.clone();
        let not_ready_inner = self.inner.clone();
        let mut ready_inner = std::mem::replace(&mut self.inner, not_ready_inner);

        Box::pin(async move {
            let token = bearer_token(req.headers());

            let session_data = match token {
                Some(token) => match store.load(&token).await {
                    Ok(Some(mut session)) => {
                        if let Err(e) = store.touch(&mut session).await {
                            tracing::error!("session refresh error: {}", e);
                        }
                        Some(session)
                    }
                    Ok(None) => None,
                    Err(e) => {
                        tracing::error!("session load error: {}", e);
                        None
                    }
                },
                None => None,
            };
            if let Err(e) = store.purge_expired_if_due().await {
                tracing::error!("session purge error: {}", e);
            }

            req.extensions_mut().insert(AxumSession {
                store,
                session_data,
            });

            Ok(ready_inner.call(req).await?.map(body::boxed))
        })
    }
}

impl<S> Debug for AxumSessionService<S>
where
    S: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxumSessionService")
            .field("session_store", &self.session_store)
            .field("inner", &self.inner)
            .finish()
    }
}
