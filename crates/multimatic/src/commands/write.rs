//! Write command handlers.
//!
//! Writes go through the client's queue; the process waits for the queue
//! to go idle before exiting. The queue reports no per-command outcome, so
//! a failed write only shows up in the logs (`-v`).

use crate::cli::{DhwModeArgs, DhwTemperatureArgs, ZoneModeArgs, ZoneTemperatureArgs};
use crate::error::CliError;
use crate::output;

use super::Context;

fn check_temperature(temperature: f64) -> Result<(), CliError> {
    if temperature.is_finite() {
        Ok(())
    } else {
        Err(CliError::Validation {
            field: "temperature".into(),
            reason: format!("{temperature} is not a number"),
        })
    }
}

async fn flush(ctx: &Context<'_>, message: String) {
    ctx.client.wait_idle().await;
    output::status(&message, ctx.global.quiet);
}

pub async fn set_temp(ctx: &Context<'_>, args: ZoneTemperatureArgs) -> Result<(), CliError> {
    check_temperature(args.temperature)?;
    let serial = ctx.serial().await?;
    ctx.client
        .set_target_temperature(&serial, &args.zone, args.temperature);
    flush(ctx, format!("Zone {} setpoint sent: {}°C", args.zone, args.temperature)).await;
    Ok(())
}

pub async fn set_reduced(ctx: &Context<'_>, args: ZoneTemperatureArgs) -> Result<(), CliError> {
    check_temperature(args.temperature)?;
    let serial = ctx.serial().await?;
    ctx.client
        .set_target_reduced_temperature(&serial, &args.zone, args.temperature);
    flush(ctx, format!("Zone {} reduced temperature sent: {}°C", args.zone, args.temperature)).await;
    Ok(())
}

pub async fn set_mode(ctx: &Context<'_>, args: ZoneModeArgs) -> Result<(), CliError> {
    let serial = ctx.serial().await?;
    ctx.client.set_heating_mode(&serial, &args.zone, args.mode);
    flush(ctx, format!("Zone {} mode sent: {}", args.zone, args.mode)).await;
    Ok(())
}

pub async fn set_dhw_temp(ctx: &Context<'_>, args: DhwTemperatureArgs) -> Result<(), CliError> {
    check_temperature(args.temperature)?;
    let serial = ctx.serial().await?;
    ctx.client
        .set_target_dhw_temperature(&serial, &args.dhw, args.temperature);
    flush(ctx, format!("Hot water {} setpoint sent: {}°C", args.dhw, args.temperature)).await;
    Ok(())
}

pub async fn set_dhw_mode(ctx: &Context<'_>, args: DhwModeArgs) -> Result<(), CliError> {
    let serial = ctx.serial().await?;
    ctx.client.set_dhw_operation_mode(&serial, &args.dhw, args.mode);
    flush(ctx, format!("Hot water {} mode sent: {}", args.dhw, args.mode)).await;
    Ok(())
}
