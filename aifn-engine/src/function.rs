//! Callable bodies and the descriptors that pair them with signatures.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use aifn_primitives::{Arguments, FunctionResult, FunctionSpec, Result};
use aifn_schema::{SchemaDescriptor, derive_schema, normalize_doc};
use async_trait::async_trait;

/// A function body that produces its result immediately.
pub trait SyncFunction: Send + Sync {
    /// Invokes the function with decoded arguments.
    ///
    /// # Errors
    ///
    /// Returns whatever error the function body reports.
    fn call(&self, args: Arguments) -> FunctionResult;
}

impl<F> SyncFunction for F
where
    F: Fn(Arguments) -> FunctionResult + Send + Sync,
{
    fn call(&self, args: Arguments) -> FunctionResult {
        (self)(args)
    }
}

/// A function body that suspends and must be driven by a scheduler.
#[async_trait]
pub trait AsyncFunction: Send + Sync {
    /// Invokes the function with decoded arguments.
    ///
    /// # Errors
    ///
    /// Returns whatever error the function body reports.
    async fn call(&self, args: Arguments) -> FunctionResult;
}

#[async_trait]
impl<F, Fut> AsyncFunction for F
where
    F: Fn(Arguments) -> Fut + Send + Sync,
    Fut: Future<Output = FunctionResult> + Send,
{
    async fn call(&self, args: Arguments) -> FunctionResult {
        (self)(args).await
    }
}

/// Calling convention of a registered function.
#[derive(Clone)]
pub enum Callable {
    /// Blocking function invoked inline.
    Sync(Arc<dyn SyncFunction>),
    /// Suspending function that needs a scheduler.
    Async(Arc<dyn AsyncFunction>),
}

impl Callable {
    /// Returns `true` for suspending functions.
    #[must_use]
    pub fn is_async(&self) -> bool {
        matches!(self, Self::Async(_))
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Callable::Sync"),
            Self::Async(_) => f.write_str("Callable::Async"),
        }
    }
}

/// A named function together with its declared signature.
#[derive(Clone, Debug)]
pub struct FunctionDescriptor {
    spec: FunctionSpec,
    callable: Callable,
}

impl FunctionDescriptor {
    /// Pairs a signature with a callable.
    #[must_use]
    pub fn new(spec: FunctionSpec, callable: Callable) -> Self {
        Self { spec, callable }
    }

    /// Wraps a blocking closure.
    #[must_use]
    pub fn sync_fn<F>(spec: FunctionSpec, function: F) -> Self
    where
        F: Fn(Arguments) -> FunctionResult + Send + Sync + 'static,
    {
        Self::new(spec, Callable::Sync(Arc::new(function)))
    }

    /// Wraps a closure returning a future.
    #[must_use]
    pub fn async_fn<F, Fut>(spec: FunctionSpec, function: F) -> Self
    where
        F: Fn(Arguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FunctionResult> + Send + 'static,
    {
        Self::new(spec, Callable::Async(Arc::new(function)))
    }

    /// Returns the function name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Returns the declared signature.
    #[must_use]
    pub fn spec(&self) -> &FunctionSpec {
        &self.spec
    }

    /// Returns the callable body.
    #[must_use]
    pub fn callable(&self) -> &Callable {
        &self.callable
    }

    /// Returns the normalized documentation string.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        self.spec.doc().and_then(normalize_doc)
    }

    /// Derives the schema exposed for this function.
    ///
    /// # Errors
    ///
    /// Propagates schema derivation failures.
    pub fn schema(&self) -> Result<SchemaDescriptor> {
        derive_schema(&self.spec)
    }
}

/// Name-based lookup over a set of functions.
pub trait FunctionLookup {
    /// Returns the function registered under `name`.
    fn lookup(&self, name: &str) -> Option<&FunctionDescriptor>;
}

impl FunctionLookup for [FunctionDescriptor] {
    fn lookup(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.iter().find(|function| function.name() == name)
    }
}

impl FunctionLookup for Vec<FunctionDescriptor> {
    fn lookup(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.as_slice().lookup(name)
    }
}

impl<S: std::hash::BuildHasher> FunctionLookup for HashMap<String, FunctionDescriptor, S> {
    fn lookup(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.get(name)
    }
}
