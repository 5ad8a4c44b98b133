//! Read command handlers.

use serde_json::Value;

use crate::cli::ZonesArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

fn print(ctx: &Context<'_>, value: &Value) -> Result<(), CliError> {
    let rendered = output::render(ctx.global.output, value)?;
    output::print_output(&rendered, ctx.global.quiet)
}

fn unavailable(what: impl Into<String>) -> CliError {
    CliError::RequestFailed { what: what.into() }
}

pub async fn facilities(ctx: &Context<'_>) -> Result<(), CliError> {
    let facilities = ctx
        .client
        .get_facilities()
        .await
        .ok_or_else(|| unavailable("facility list"))?;
    print(ctx, &Value::Array(facilities))
}

pub async fn state(ctx: &Context<'_>) -> Result<(), CliError> {
    let serial = ctx.serial().await?;
    let snapshot = ctx.client.try_get_full_state(&serial).await?;
    let rendered = output::render(ctx.global.output, &snapshot)?;
    output::print_output(&rendered, ctx.global.quiet)
}

pub async fn zones(ctx: &Context<'_>, args: ZonesArgs) -> Result<(), CliError> {
    let serial = ctx.serial().await?;
    let executor = ctx.client.executor();

    let value = match (args.zone, args.timeprogram) {
        (None, _) => executor
            .get_zones(&serial)
            .await
            .ok_or_else(|| unavailable("zone list"))?,
        (Some(zone), false) => executor
            .get_zone(&serial, &zone)
            .await
            .ok_or_else(|| CliError::NotFound {
                resource_type: "zone".into(),
                identifier: zone,
            })?,
        (Some(zone), true) => executor
            .get_zone_timeprogram(&serial, &zone)
            .await
            .ok_or_else(|| unavailable(format!("time program of zone {zone}")))?,
    };
    print(ctx, &value)
}

pub async fn overview(ctx: &Context<'_>) -> Result<(), CliError> {
    let serial = ctx.serial().await?;
    let value = ctx
        .client
        .executor()
        .get_overview(&serial)
        .await
        .ok_or_else(|| unavailable("hvac overview"))?;
    print(ctx, &value)
}

pub async fn events(ctx: &Context<'_>) -> Result<(), CliError> {
    let serial = ctx.serial().await?;
    let value = ctx
        .client
        .executor()
        .get_events(&serial)
        .await
        .ok_or_else(|| unavailable("event list"))?;
    print(ctx, &value)
}
