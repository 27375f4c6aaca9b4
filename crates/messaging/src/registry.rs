//! Type-keyed registries of command handlers and domain event handlers.

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures_util::future::BoxFuture;
use kernel::DomainEvent;

use crate::command::{Command, CommandHandler};
use crate::context::DispatchContext;
use crate::error::{AppError, Result};
use crate::events::DomainEventHandler;

type CommandFactory<C> =
    Arc<dyn Fn(&DispatchContext) -> Box<dyn CommandHandler<C>> + Send + Sync>;

type EventHandlerFuture = BoxFuture<'static, Result<()>>;

type EventHandlerFn =
    Arc<dyn Fn(Arc<dyn DomainEvent>, DispatchContext) -> EventHandlerFuture + Send + Sync>;

struct CommandRegistration {
    command: &'static str,
    // Holds a `CommandFactory<C>` for the `C` whose `TypeId` keys the entry.
    factory: Box<dyn Any + Send + Sync>,
}

/// A type-erased domain event handler as stored in the registry.
#[derive(Clone)]
pub struct RegisteredEventHandler {
    name: &'static str,
    invoke: EventHandlerFn,
}

impl RegisteredEventHandler {
    /// Returns the type name of the handler.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invokes the handler with an event of the type it was registered for.
    pub async fn handle(&self, ctx: &DispatchContext, event: Arc<dyn DomainEvent>) -> Result<()> {
        (self.invoke)(event, ctx.clone()).await
    }
}

impl std::fmt::Debug for RegisteredEventHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredEventHandler")
            .field("name", &self.name)
            .finish()
    }
}

/// Command handler factories keyed by the exact command type.
///
/// Built at startup and shared by the [`CommandDispatcher`](crate::CommandDispatcher).
/// One factory per type; every resolution builds a new handler, so each
/// dispatch gets its own handler scope.
#[derive(Default)]
pub struct CommandRegistry {
    commands: DashMap<TypeId, CommandRegistration>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler factory for command type `C`.
    ///
    /// Fails with [`AppError::HandlerAlreadyRegistered`] if `C` already has one.
    pub fn register<C, H, F>(&self, factory: F) -> Result<()>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
        F: Fn(&DispatchContext) -> H + Send + Sync + 'static,
    {
        let factory: CommandFactory<C> = Arc::new(move |ctx: &DispatchContext| {
            Box::new(factory(ctx)) as Box<dyn CommandHandler<C>>
        });

        match self.commands.entry(TypeId::of::<C>()) {
            Entry::Occupied(_) => Err(AppError::HandlerAlreadyRegistered(type_name::<C>())),
            Entry::Vacant(slot) => {
                slot.insert(CommandRegistration {
                    command: type_name::<C>(),
                    factory: Box::new(factory),
                });
                tracing::debug!(command = type_name::<C>(), "command handler registered");
                Ok(())
            }
        }
    }

    /// Builds a new handler for command type `C`.
    pub fn resolve_one<C: Command>(
        &self,
        ctx: &DispatchContext,
    ) -> Result<Box<dyn CommandHandler<C>>> {
        let factory = self
            .commands
            .get(&TypeId::of::<C>())
            .and_then(|registration| {
                registration
                    .factory
                    .downcast_ref::<CommandFactory<C>>()
                    .cloned()
            })
            .ok_or(AppError::HandlerNotFound(type_name::<C>()))?;

        Ok(factory(ctx))
    }

    /// Returns true if a handler is registered for command type `C`.
    pub fn contains<C: Command>(&self) -> bool {
        self.commands.contains_key(&TypeId::of::<C>())
    }

    /// Returns the type names of every command with a registered handler.
    pub fn registered_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.iter().map(|entry| entry.command).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.registered_commands())
            .finish()
    }
}

/// Domain event handlers keyed by the exact event type.
///
/// Built at startup and shared by the [`DomainEventDispatcher`](crate::DomainEventDispatcher).
/// Any number of handlers may be registered per type; they are resolved
/// in registration order.
#[derive(Default)]
pub struct EventHandlerRegistry {
    handlers: DashMap<TypeId, Vec<RegisteredEventHandler>>,
}

impl EventHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler for domain event type `E`.
    pub fn register<E, H>(&self, handler: Arc<H>)
    where
        E: DomainEvent,
        H: DomainEventHandler<E> + 'static,
    {
        let invoke: EventHandlerFn = Arc::new(
            move |event: Arc<dyn DomainEvent>, ctx: DispatchContext| -> EventHandlerFuture {
                let handler = handler.clone();

                Box::pin(async move {
                    // Entries are keyed by `TypeId::of::<E>()`, so the downcast holds.
                    match event.downcast_ref::<E>() {
                        Some(event) => handler.handle(&ctx, event).await,
                        None => Ok(()),
                    }
                })
            },
        );

        self.handlers
            .entry(TypeId::of::<E>())
            .or_default()
            .push(RegisteredEventHandler {
                name: type_name::<H>(),
                invoke,
            });
        tracing::debug!(
            event = type_name::<E>(),
            handler = type_name::<H>(),
            "domain event handler registered"
        );
    }

    /// Returns the handlers registered for the event type identified by `event_type`.
    pub fn resolve_all(&self, event_type: TypeId) -> Vec<RegisteredEventHandler> {
        self.handlers
            .get(&event_type)
            .map(|handlers| handlers.clone())
            .unwrap_or_default()
    }

    /// Returns the number of handlers registered for event type `E`.
    pub fn handler_count<E: DomainEvent>(&self) -> usize {
        self.handlers
            .get(&TypeId::of::<E>())
            .map(|handlers| handlers.len())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for EventHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHandlerRegistry")
            .field("event_types", &self.handlers.len())
            .finish()
    }
}
