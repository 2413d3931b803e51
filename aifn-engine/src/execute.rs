//! Synchronous and asynchronous dispatch.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use aifn_primitives::{Arguments, CallArguments, Error, FunctionResult, Result};
use serde_json::Value;
use tracing::debug;

use crate::convert::{CallOutput, OutputConverter, default_converter};
use crate::function::{Callable, FunctionLookup};
use crate::prepare::prepare_call;
use crate::scheduler::SchedulerHandle;

/// Per-dispatch settings.
#[derive(Clone)]
pub struct ExecuteOptions {
    /// Scheduler used to run asynchronous functions from synchronous code.
    pub scheduler: Option<SchedulerHandle>,
    /// Output conversion; `None` returns the raw value.
    pub convert_output: Option<OutputConverter>,
    /// Whether arguments are coerced to declared types.
    pub auto_coerce: bool,
    /// Upper bound on a bridged call; `None` waits indefinitely.
    pub bridge_timeout: Option<Duration>,
    /// Values merged over the decoded arguments.
    pub extra: Arguments,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            scheduler: None,
            convert_output: Some(default_converter()),
            auto_coerce: true,
            bridge_timeout: None,
            extra: Arguments::new(),
        }
    }
}

impl fmt::Debug for ExecuteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecuteOptions")
            .field("scheduler", &self.scheduler)
            .field("convert_output", &self.convert_output.is_some())
            .field("auto_coerce", &self.auto_coerce)
            .field("bridge_timeout", &self.bridge_timeout)
            .field("extra", &self.extra)
            .finish()
    }
}

impl ExecuteOptions {
    /// Sets the scheduler used for asynchronous functions.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: SchedulerHandle) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Replaces the output converter; `None` disables conversion.
    #[must_use]
    pub fn with_convert_output(mut self, converter: Option<OutputConverter>) -> Self {
        self.convert_output = converter;
        self
    }

    /// Enables or disables argument coercion.
    #[must_use]
    pub fn with_auto_coerce(mut self, enabled: bool) -> Self {
        self.auto_coerce = enabled;
        self
    }

    /// Bounds how long a bridged call may block.
    #[must_use]
    pub fn with_bridge_timeout(mut self, timeout: Duration) -> Self {
        self.bridge_timeout = Some(timeout);
        self
    }

    /// Adds an engine-supplied argument.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key, value);
        self
    }
}

/// Dispatches `name` from synchronous code.
///
/// Asynchronous functions are submitted to `options.scheduler` and the
/// calling thread blocks until they complete.
///
/// # Errors
///
/// Propagates [`prepare_call`] errors, returns [`Error::MissingScheduler`]
/// for an asynchronous function without a scheduler, [`Error::Scheduler`]
/// when bridging fails, and [`Error::Function`] when the body fails.
pub fn execute<L>(
    functions: &L,
    name: &str,
    arguments: impl Into<CallArguments>,
    options: &ExecuteOptions,
) -> Result<CallOutput>
where
    L: FunctionLookup + ?Sized,
{
    let prepared = prepare_call(functions, name, arguments.into(), options.auto_coerce)?;
    let (function, arguments) = prepared.with_extra(options.extra.clone()).into_parts();

    debug!(
        function = name,
        asynchronous = function.callable().is_async(),
        "executing function"
    );

    let result = match function.callable() {
        Callable::Sync(body) => body.call(arguments),
        Callable::Async(body) => {
            let scheduler = options
                .scheduler
                .as_ref()
                .ok_or_else(|| Error::MissingScheduler {
                    name: name.to_owned(),
                })?;
            let body = Arc::clone(body);
            debug!(function = name, "bridging asynchronous function onto scheduler");
            scheduler.submit_blocking(
                async move { body.call(arguments).await },
                options.bridge_timeout,
            )?
        }
    };

    finish(name, result, options)
}

/// Dispatches `name` from asynchronous code, awaiting suspending functions
/// on the caller's own scheduler.
///
/// # Errors
///
/// Propagates [`prepare_call`] errors and returns [`Error::Function`] when
/// the body fails.
pub async fn execute_async<L>(
    functions: &L,
    name: &str,
    arguments: impl Into<CallArguments>,
    options: &ExecuteOptions,
) -> Result<CallOutput>
where
    L: FunctionLookup + ?Sized,
{
    let prepared = prepare_call(functions, name, arguments.into(), options.auto_coerce)?;
    let (function, arguments) = prepared.with_extra(options.extra.clone()).into_parts();

    debug!(
        function = name,
        asynchronous = function.callable().is_async(),
        "awaiting function"
    );

    let result = match function.callable() {
        Callable::Sync(body) => body.call(arguments),
        Callable::Async(body) => body.call(arguments).await,
    };

    finish(name, result, options)
}

fn finish(
    name: &str,
    result: FunctionResult,
    options: &ExecuteOptions,
) -> Result<CallOutput> {
    let value = result.map_err(|source| Error::Function {
        name: name.to_owned(),
        source,
    })?;
    Ok(CallOutput::finish(value, options.convert_output.as_ref()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aifn_primitives::{BaseType, FunctionSpec, ReturnValue};
    use serde_json::json;

    use super::*;
    use crate::function::FunctionDescriptor;
    use crate::scheduler::EventLoop;

    fn add_one_spec(name: &str) -> FunctionSpec {
        FunctionSpec::new(name)
            .with_doc("Adds 1 to x.")
            .arg("x", BaseType::Integer, "x val")
    }

    fn functions() -> Vec<FunctionDescriptor> {
        vec![
            FunctionDescriptor::sync_fn(add_one_spec("example_func1"), |args| {
                let x: i64 = args.required("x")?;
                Ok(ReturnValue::from(x + 1))
            }),
            FunctionDescriptor::async_fn(add_one_spec("async_example_func1"), |args| async move {
                tokio::task::yield_now().await;
                let x: i64 = args.required("x")?;
                Ok(ReturnValue::from(x + 1))
            }),
            FunctionDescriptor::sync_fn(
                FunctionSpec::new("fail").with_doc("Always fails."),
                |_| Err("tool exploded".into()),
            ),
            FunctionDescriptor::sync_fn(
                FunctionSpec::new("context")
                    .with_doc("Reads injected context.")
                    .arg("x", BaseType::Integer, "x val"),
                |args| {
                    let session: String = args.required("session")?;
                    Ok(ReturnValue::from(session))
                },
            ),
        ]
    }

    #[test]
    fn executes_and_converts() {
        let options = ExecuteOptions::default();
        let output = execute(&functions(), "example_func1", r#"{"x":5}"#, &options).unwrap();
        assert_eq!(output.as_text(), Some("6"));
    }

    #[test]
    fn returns_raw_value_without_converter() {
        let options = ExecuteOptions::default().with_convert_output(None);
        let output = execute(&functions(), "example_func1", r#"{"x":5}"#, &options).unwrap();
        let raw = output.into_raw().unwrap();
        assert_eq!(raw.as_json(), Some(&json!(6)));
    }

    #[test]
    fn coerces_before_invocation() {
        let options = ExecuteOptions::default();
        let output = execute(&functions(), "example_func1", r#"{"x":"5"}"#, &options).unwrap();
        assert_eq!(output.as_text(), Some("6"));
    }

    #[test]
    fn custom_converter_is_applied() {
        let converter: OutputConverter =
            Arc::new(|value: ReturnValue| format!("result={}", crate::convert_response(value)));
        let options = ExecuteOptions::default().with_convert_output(Some(converter));
        let output = execute(&functions(), "example_func1", json!({"x": 1}), &options).unwrap();
        assert_eq!(output.as_text(), Some("result=2"));
    }

    #[test]
    fn async_function_requires_scheduler() {
        let options = ExecuteOptions::default();
        let err = execute(&functions(), "async_example_func1", json!({"x": 5}), &options)
            .unwrap_err();
        assert!(matches!(err, Error::MissingScheduler { name } if name == "async_example_func1"));
    }

    #[test]
    fn async_function_is_bridged_onto_scheduler() {
        let event_loop = EventLoop::start("aifn-execute-loop").unwrap();
        let options = ExecuteOptions::default().with_scheduler(event_loop.handle());
        let output =
            execute(&functions(), "async_example_func1", json!({"x": 5}), &options).unwrap();
        assert_eq!(output.as_text(), Some("6"));
    }

    #[test]
    fn function_failures_are_wrapped() {
        let err = execute(&functions(), "fail", "{}", &ExecuteOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Function { ref name, .. } if name == "fail"));
        assert!(err.to_string().contains("tool exploded"));
    }

    #[test]
    fn extra_arguments_reach_the_body() {
        let options = ExecuteOptions::default().with_extra("session", "s-1");
        let output = execute(&functions(), "context", json!({"x": 1}), &options).unwrap();
        assert_eq!(output.as_text(), Some("s-1"));
    }

    #[test]
    fn unknown_function_is_reported() {
        let options = ExecuteOptions::default();
        let err = execute(&functions(), "unknown_function", "{}", &options).unwrap_err();
        assert!(matches!(err, Error::UnknownFunction { .. }));
    }

    #[tokio::test]
    async fn async_path_awaits_on_caller_runtime() {
        let functions = functions();
        let options = ExecuteOptions::default();
        let output = execute_async(&functions, "async_example_func1", json!({"x": 5}), &options)
            .await
            .unwrap();
        assert_eq!(output.as_text(), Some("6"));

        let output = execute_async(&functions, "example_func1", r#"{"x":"5"}"#, &options)
            .await
            .unwrap();
        assert_eq!(output.as_text(), Some("6"));
    }
}
