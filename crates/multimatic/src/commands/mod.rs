//! Command dispatch: bridges CLI args -> client calls -> output formatting.

pub mod config_cmd;
pub mod read;
pub mod write;

use serde_json::Value;

use multimatic_core::Client;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// What a connected command gets to work with.
pub struct Context<'a> {
    pub client: &'a Client,
    pub global: &'a GlobalOpts,
    /// Facility from `--facility` or the profile, if any.
    pub facility: Option<String>,
}

impl Context<'_> {
    /// The facility to act on.
    ///
    /// Falls back to the account's only facility when none is configured.
    pub async fn serial(&self) -> Result<String, CliError> {
        if let Some(ref serial) = self.facility {
            return Ok(serial.clone());
        }

        let facilities = self
            .client
            .get_facilities()
            .await
            .ok_or_else(|| CliError::RequestFailed {
                what: "facility list".into(),
            })?;

        match facilities.as_slice() {
            [only] => serial_number(only).ok_or_else(|| CliError::Validation {
                field: "facility".into(),
                reason: "facility entry has no serialNumber".into(),
            }),
            _ => Err(CliError::NoFacility {
                count: facilities.len(),
            }),
        }
    }
}

pub fn serial_number(facility: &Value) -> Option<String> {
    facility
        .get("serialNumber")
        .and_then(Value::as_str)
        .map(str::to_owned)
}

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Facilities => read::facilities(ctx).await,
        Command::State => read::state(ctx).await,
        Command::Zones(args) => read::zones(ctx, args).await,
        Command::Overview => read::overview(ctx).await,
        Command::Events => read::events(ctx).await,
        Command::SetTemp(args) => write::set_temp(ctx, args).await,
        Command::SetReduced(args) => write::set_reduced(ctx, args).await,
        Command::SetMode(args) => write::set_mode(ctx, args).await,
        Command::SetDhwTemp(args) => write::set_dhw_temp(ctx, args).await,
        Command::SetDhwMode(args) => write::set_dhw_mode(ctx, args).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
