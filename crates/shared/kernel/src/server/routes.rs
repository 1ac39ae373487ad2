use super::state::ApiState;
use axum::extract::Request;
use axum::http::Method;
use axum::response::IntoResponse;
use axum::routing::{MethodFilter, MethodRouter};
use std::borrow::Cow;
use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use tower::{Layer, Service};

#[envstore_derive::envstore_error]
pub enum RouteError {
    #[error("The requested route \"{name}\" is missing")]
    NotFound { name: Cow<'static, str> },

    #[error("Route \"{name}\" is registered twice")]
    DuplicateName { name: Cow<'static, str> },

    #[error("Route \"{name}\" overlaps {method} {pattern}")]
    Overlap { name: Cow<'static, str>, method: Method, pattern: String },

    #[error("Route \"{name}\" uses unsupported method {method}")]
    UnsupportedMethod { name: Cow<'static, str>, method: Method },

    #[error("Invalid route pattern{}: {message}", format_context(.context))]
    InvalidPattern { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

type Wrap = dyn Fn(MethodRouter<ApiState>) -> MethodRouter<ApiState> + Send + Sync;

/// A named transformation of a route handler.
///
/// Anything usable with [`MethodRouter::layer`] fits, typically
/// [`axum::middleware::from_fn`].
#[derive(Clone)]
pub struct Middleware {
    name: Cow<'static, str>,
    wrap: Arc<Wrap>,
}

impl Middleware {
    pub fn layer<L>(name: impl Into<Cow<'static, str>>, layer: L) -> Self
    where
        L: Layer<axum::routing::Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request, Error = Infallible> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        Self {
            name: name.into(),
            wrap: Arc::new(move |handler: MethodRouter<ApiState>| {
                handler.layer::<L, Infallible>(layer.clone())
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn apply(&self, handler: MethodRouter<ApiState>) -> MethodRouter<ApiState> {
        (self.wrap)(handler)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Middleware").field(&self.name).finish()
    }
}

/// One endpoint: a unique name, a method, a path pattern, a handler and its middleware chain.
#[derive(Debug)]
pub struct Route {
    name: Cow<'static, str>,
    method: Method,
    pattern: String,
    handler: MethodRouter<ApiState>,
    middlewares: Vec<Middleware>,
}

impl Route {
    /// Binds `handler` to `method` on `pattern` (axum syntax, e.g. `/storage/{key}`).
    pub fn new<H, T>(
        name: impl Into<Cow<'static, str>>,
        method: Method,
        pattern: impl Into<String>,
        handler: H,
    ) -> Result<Self, RouteError>
    where
        H: axum::handler::Handler<T, ApiState>,
        T: 'static,
    {
        let name = name.into();
        let pattern = pattern.into();
        if !pattern.starts_with('/') {
            return Err(RouteError::InvalidPattern {
                message: pattern.into(),
                context: Some(format!("route \"{name}\" must start with '/'").into()),
            });
        }
        let Ok(filter) = MethodFilter::try_from(method.clone()) else {
            return Err(RouteError::UnsupportedMethod { name, method });
        };

        Ok(Self {
            name,
            method,
            pattern,
            handler: axum::routing::on(filter, handler),
            middlewares: Vec::new(),
        })
    }

    /// Appends a middleware. The first one added is the outermost.
    #[must_use]
    pub fn with(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn middlewares(&self) -> &[Middleware] {
        &self.middlewares
    }

    /// The handler wrapped in its middleware chain, first middleware outermost.
    pub(crate) fn service(&self) -> MethodRouter<ApiState> {
        self.middlewares.iter().rev().fold(self.handler.clone(), |handler, m| m.apply(handler))
    }
}

/// Ordered route table. Built once at startup.
#[derive(Debug, Default)]
pub struct Routes {
    routes: Vec<Route>,
}

impl Routes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a route, rejecting a reused name or an already bound method and path.
    pub fn with(mut self, route: Route) -> Result<Self, RouteError> {
        if self.routes.iter().any(|r| r.name == route.name) {
            return Err(RouteError::DuplicateName { name: route.name });
        }
        let normalize = |p: &str| p.trim_end_matches('/').to_owned();
        if let Some(existing) = self
            .routes
            .iter()
            .find(|r| r.method == route.method && normalize(&r.pattern) == normalize(&route.pattern))
        {
            return Err(RouteError::Overlap {
                name: route.name,
                method: existing.method.clone(),
                pattern: existing.pattern.clone(),
            });
        }
        self.routes.push(route);
        Ok(self)
    }

    /// Looks a route up by name.
    pub fn route(&self, name: &str) -> Result<&Route, RouteError> {
        self.routes.iter().find(|r| r.name == name).ok_or_else(|| RouteError::NotFound {
            name: Cow::Owned(name.to_owned()),
        })
    }

    /// Fails on the first name in `names` that is not registered.
    pub fn require<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<(), RouteError> {
        names.into_iter().try_for_each(|name| self.route(name).map(|_| ()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl<'a> IntoIterator for &'a Routes {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}
