//! Command and command handler traits.

use std::fmt::Debug;

use async_trait::async_trait;

use crate::context::DispatchContext;
use crate::error::Result;

/// An immutable request to change state, identified by its concrete type.
///
/// Commands that only signal success use `Output = ()`; commands that hand
/// something back to the caller (for example a generated identity) name
/// their result type.
pub trait Command: Debug + Send + 'static {
    type Output: Send + 'static;
}

/// Handles one command type.
///
/// Exactly one handler may be registered per command type. Handlers are
/// built fresh for every dispatch, so they may keep per-call state.
#[async_trait]
pub trait CommandHandler<C: Command>: Send + Sync {
    async fn handle(&self, ctx: &DispatchContext, command: C) -> Result<C::Output>;
}
