//! Registry that owns named functions in registration order.

use std::collections::HashMap;
use std::fmt;

use aifn_engine::{
    CallOutput, ExecuteOptions, FunctionDescriptor, FunctionLookup, OutputConverter,
    SchedulerHandle, execute, execute_async,
};
use aifn_primitives::{CallArguments, Error, Result};
use aifn_schema::{SchemaDescriptor, derive_schemas, validate};
use tracing::{debug, warn};

use crate::call::{CallOptions, FunctionCall};
use crate::config::RegistryConfig;

/// Named functions exposed to a function-calling model.
///
/// Registration takes `&mut self` and dispatch takes `&self`, so a registry
/// shared across worker threads through an `Arc` cannot change underneath an
/// in-flight call.
#[derive(Default)]
pub struct AiFunctions {
    functions: Vec<FunctionDescriptor>,
    index: HashMap<String, usize>,
    config: RegistryConfig,
}

impl fmt::Debug for AiFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiFunctions")
            .field(
                "registered",
                &self.functions.iter().map(FunctionDescriptor::name).collect::<Vec<_>>(),
            )
            .field("index", &self.index.len())
            .field("config", &self.config)
            .finish()
    }
}

impl AiFunctions {
    /// Creates a registry with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns the first schema derivation failure among `functions`.
    pub fn new<I>(functions: I) -> Result<Self>
    where
        I: IntoIterator<Item = FunctionDescriptor>,
    {
        Self::with_config(functions, RegistryConfig::default())
    }

    /// Creates a registry with an explicit configuration.
    ///
    /// Later functions replace earlier ones with the same name.
    ///
    /// # Errors
    ///
    /// Returns the first schema derivation failure among `functions`.
    pub fn with_config<I>(functions: I, config: RegistryConfig) -> Result<Self>
    where
        I: IntoIterator<Item = FunctionDescriptor>,
    {
        let mut registry = Self {
            functions: Vec::new(),
            index: HashMap::new(),
            config,
        };
        for function in functions {
            registry.insert(function);
        }
        registry.validate()?;
        debug!(functions = registry.len(), "function registry created");
        Ok(registry)
    }

    /// Checks that every registered function can be exposed.
    ///
    /// # Errors
    ///
    /// Returns the first schema derivation failure.
    pub fn validate(&self) -> Result<()> {
        validate(self.functions.iter().map(FunctionDescriptor::spec))
    }

    /// Returns schemas in registration order. An empty `names` selects every
    /// function; otherwise unknown names are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first schema derivation failure.
    pub fn schemas(&self, names: &[&str]) -> Result<Vec<SchemaDescriptor>> {
        let selected = self
            .functions
            .iter()
            .filter(|function| names.is_empty() || names.contains(&function.name()))
            .map(FunctionDescriptor::spec);
        derive_schemas(selected)
    }

    /// Validates and registers a function, replacing any function with the
    /// same name in place.
    ///
    /// # Errors
    ///
    /// Returns the schema derivation failure; the registry is left unchanged.
    pub fn add(&mut self, function: FunctionDescriptor) -> Result<()> {
        if let Err(err) = function.schema() {
            warn!(function = function.name(), error = %err, "rejected function registration");
            return Err(err);
        }
        debug!(function = function.name(), "registered function");
        self.insert(function);
        Ok(())
    }

    /// Removes a function by name.
    pub fn discard(&mut self, name: &str) -> Option<FunctionDescriptor> {
        let position = self.index.remove(name)?;
        let removed = self.functions.remove(position);
        for function in &self.functions[position..] {
            if let Some(slot) = self.index.get_mut(function.name()) {
                *slot -= 1;
            }
        }
        Some(removed)
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Returns the function registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.index.get(name).and_then(|&position| self.functions.get(position))
    }

    /// Returns the normalized documentation of `name`.
    #[must_use]
    pub fn description(&self, name: &str) -> Option<String> {
        self.get(name).and_then(FunctionDescriptor::description)
    }

    /// Iterates over functions in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, FunctionDescriptor> {
        self.functions.iter()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(FunctionDescriptor::name)
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Replaces the output converter; `None` returns raw values.
    pub fn set_convert_output(&mut self, converter: Option<OutputConverter>) {
        self.config.set_convert_output(converter);
    }

    /// Replaces the default scheduler.
    pub fn set_scheduler(&mut self, scheduler: Option<SchedulerHandle>) {
        self.config.set_scheduler(scheduler);
    }

    /// Runs a named function from synchronous code.
    ///
    /// # Errors
    ///
    /// Propagates dispatch errors from the execution engine.
    pub fn execute(&self, name: &str, arguments: impl Into<CallArguments>) -> Result<CallOutput> {
        self.execute_with(name, arguments, CallOptions::default())
    }

    /// Runs a named function with per-call overrides.
    ///
    /// # Errors
    ///
    /// Propagates dispatch errors from the execution engine.
    pub fn execute_with(
        &self,
        name: &str,
        arguments: impl Into<CallArguments>,
        options: CallOptions,
    ) -> Result<CallOutput> {
        execute(self, name, arguments, &self.engine_options(options))
            .inspect_err(|err| log_failure(name, err))
    }

    /// Runs a model-issued call object.
    ///
    /// # Errors
    ///
    /// Propagates dispatch errors from the execution engine.
    pub fn execute_call(&self, call: FunctionCall) -> Result<CallOutput> {
        self.execute_call_with(call, CallOptions::default())
    }

    /// Runs a model-issued call object with per-call overrides.
    ///
    /// # Errors
    ///
    /// Propagates dispatch errors from the execution engine.
    pub fn execute_call_with(
        &self,
        call: FunctionCall,
        options: CallOptions,
    ) -> Result<CallOutput> {
        self.execute_with(&call.name, call.arguments, options)
    }

    /// Runs a named function from asynchronous code.
    ///
    /// # Errors
    ///
    /// Propagates dispatch errors from the execution engine.
    pub async fn execute_async(
        &self,
        name: &str,
        arguments: impl Into<CallArguments>,
    ) -> Result<CallOutput> {
        self.execute_async_with(name, arguments, CallOptions::default())
            .await
    }

    /// Runs a named function from asynchronous code with per-call overrides.
    /// The scheduler override is ignored; the caller's runtime drives the call.
    ///
    /// # Errors
    ///
    /// Propagates dispatch errors from the execution engine.
    pub async fn execute_async_with(
        &self,
        name: &str,
        arguments: impl Into<CallArguments>,
        options: CallOptions,
    ) -> Result<CallOutput> {
        let options = self.engine_options(options);
        execute_async(self, name, arguments, &options)
            .await
            .inspect_err(|err| log_failure(name, err))
    }

    /// Runs a model-issued call object from asynchronous code.
    ///
    /// # Errors
    ///
    /// Propagates dispatch errors from the execution engine.
    pub async fn execute_call_async(&self, call: FunctionCall) -> Result<CallOutput> {
        self.execute_async_with(&call.name, call.arguments, CallOptions::default())
            .await
    }

    fn engine_options(&self, options: CallOptions) -> ExecuteOptions {
        ExecuteOptions {
            scheduler: options.scheduler.or_else(|| self.config.scheduler().cloned()),
            convert_output: self.config.convert_output().cloned(),
            auto_coerce: self.config.auto_coerce(),
            bridge_timeout: self.config.bridge_timeout(),
            extra: options.extra,
        }
    }

    fn insert(&mut self, function: FunctionDescriptor) {
        if let Some(&position) = self.index.get(function.name()) {
            self.functions[position] = function;
            return;
        }
        self.index
            .insert(function.name().to_owned(), self.functions.len());
        self.functions.push(function);
    }
}

fn log_failure(name: &str, err: &Error) {
    if err.is_argument_error() {
        debug!(function = name, error = %err, "rejected model-issued call");
    } else {
        warn!(function = name, error = %err, "function call failed");
    }
}

impl FunctionLookup for AiFunctions {
    fn lookup(&self, name: &str) -> Option<&FunctionDescriptor> {
        self.get(name)
    }
}

impl<'a> IntoIterator for &'a AiFunctions {
    type Item = &'a FunctionDescriptor;
    type IntoIter = std::slice::Iter<'a, FunctionDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
