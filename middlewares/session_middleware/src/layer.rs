use tower_layer::Layer;

use crate::{service::AxumSessionService, session_store::AxumSessionStore};

#[derive(Clone, Debug)]
pub struct AxumSessionLayer {
    session_store: AxumSessionStore,
}

impl AxumSessionLayer {
    #[inline]
    pub fn new(session_store: AxumSessionStore) -> Self {
        AxumSessionLayer { session_store }
    }
}

impl<S> Layer<S> for AxumSessionLayer {
    type Service = AxumSessionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AxumSessionService {
            session_store: self.session_store.clone(),
            inner,
        }
    }
}
