//! Command dispatcher.

use std::any::type_name;
use std::sync::Arc;

use crate::command::Command;
use crate::context::DispatchContext;
use crate::error::Result;
use crate::registry::CommandRegistry;

/// Routes each command to the single handler registered for its type.
///
/// Every call resolves a fresh handler from the registry, invokes it once
/// and returns its outcome as-is. The dispatcher keeps no state between
/// calls and never retries, queues or translates errors.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Dispatches a command that produces no result.
    pub async fn send<C>(&self, ctx: &DispatchContext, command: C) -> Result<()>
    where
        C: Command<Output = ()>,
    {
        self.dispatch(ctx, command).await
    }

    /// Dispatches a command and returns the handler's result.
    pub async fn send_with_result<C: Command>(
        &self,
        ctx: &DispatchContext,
        command: C,
    ) -> Result<C::Output> {
        self.dispatch(ctx, command).await
    }

    /// Dispatches a command that may be absent.
    ///
    /// An absent command is not an error: a warning is logged, no handler is
    /// resolved, and `Ok(None)` is returned. A present command yields
    /// `Ok(Some(output))`.
    pub async fn send_optional<C: Command>(
        &self,
        ctx: &DispatchContext,
        command: Option<C>,
    ) -> Result<Option<C::Output>> {
        let Some(command) = command else {
            tracing::warn!(
                command = type_name::<C>(),
                "command is absent, skipping handler invocation"
            );
            return Ok(None);
        };

        self.dispatch(ctx, command).await.map(Some)
    }

    #[tracing::instrument(
        name = "dispatch_command",
        skip_all,
        fields(command = type_name::<C>(), correlation_id = %ctx.correlation_id())
    )]
    async fn dispatch<C: Command>(&self, ctx: &DispatchContext, command: C) -> Result<C::Output> {
        let description = format!("{command:?}");
        tracing::trace!(command = %description, "dispatching command");

        let result = match self.registry.resolve_one::<C>(ctx) {
            Ok(handler) => handler.handle(ctx, command).await,
            Err(error) => Err(error),
        };

        match &result {
            Ok(_) => {
                tracing::info!(command = %description, "command dispatched");
                metrics::counter!("commands_dispatched_total", "command" => type_name::<C>())
                    .increment(1);
            }
            Err(error) => {
                tracing::error!(
                    command = %description,
                    %error,
                    "handler resolution/invocation failed"
                );
                metrics::counter!("commands_failed_total", "command" => type_name::<C>())
                    .increment(1);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandHandler;
    use crate::error::AppError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct Register {
        name: String,
    }

    impl Command for Register {
        type Output = ();
    }

    #[derive(Debug)]
    struct Count;

    impl Command for Count {
        type Output = usize;
    }

    struct RegisterHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandHandler<Register> for RegisterHandler {
        async fn handle(&self, _ctx: &DispatchContext, command: Register) -> Result<()> {
            if command.name.is_empty() {
                return Err(AppError::Persistence("name rejected".to_string()));
            }
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct CountHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CommandHandler<Count> for CountHandler {
        async fn handle(&self, _ctx: &DispatchContext, _command: Count) -> Result<usize> {
            Ok(self.calls.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    fn dispatcher(calls: &Arc<AtomicUsize>) -> CommandDispatcher {
        let registry = CommandRegistry::new();
        let register_calls = calls.clone();
        registry
            .register::<Register, _, _>(move |_ctx| RegisterHandler {
                calls: register_calls.clone(),
            })
            .unwrap();
        let count_calls = calls.clone();
        registry
            .register::<Count, _, _>(move |_ctx| CountHandler {
                calls: count_calls.clone(),
            })
            .unwrap();
        CommandDispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn send_invokes_the_handler_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(&calls);

        dispatcher
            .send(
                &DispatchContext::new(),
                Register {
                    name: "RustConf".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn send_with_result_returns_handler_output() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(&calls);
        let ctx = DispatchContext::new();

        assert_eq!(dispatcher.send_with_result(&ctx, Count).await.unwrap(), 1);
        assert_eq!(dispatcher.send_with_result(&ctx, Count).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn handler_error_is_returned_unchanged() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(&calls);

        let error = dispatcher
            .send(
                &DispatchContext::new(),
                Register {
                    name: String::new(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::Persistence(ref reason) if reason == "name rejected"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unregistered_command_is_handler_not_found() {
        let dispatcher = CommandDispatcher::new(Arc::new(CommandRegistry::new()));

        let error = dispatcher
            .send_with_result(&DispatchContext::new(), Count)
            .await
            .unwrap_err();

        assert!(matches!(error, AppError::HandlerNotFound(name) if name.ends_with("Count")));
    }

    // An absent command short-circuits without touching the registry, even
    // when no handler is registered at all.
    #[tokio::test]
    async fn absent_command_returns_no_result() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(&calls);
        let ctx = DispatchContext::new();

        let first = dispatcher.send_optional::<Count>(&ctx, None).await.unwrap();
        let second = dispatcher.send_optional::<Count>(&ctx, None).await.unwrap();
        assert_eq!(first, None);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let empty = CommandDispatcher::new(Arc::new(CommandRegistry::new()));
        assert_eq!(empty.send_optional::<Count>(&ctx, None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn present_optional_command_is_dispatched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(&calls);

        let result = dispatcher
            .send_optional(&DispatchContext::new(), Some(Count))
            .await
            .unwrap();
        assert_eq!(result, Some(1));

        let result = dispatcher
            .send_optional(
                &DispatchContext::new(),
                Some(Register {
                    name: "EuroRust".to_string(),
                }),
            )
            .await
            .unwrap();
        assert_eq!(result, Some(()));
    }
}
