// Relative endpoint paths.
//
// Every facility resource lives under `/facilities/{serial}/`. Paths are
// relative to the API base URL; `Transport::url_for` resolves them.

pub const TOKEN_NEW: &str = "/account/authentication/v1/token/new";
pub const AUTHENTICATE: &str = "/account/authentication/v1/authenticate";
pub const FACILITIES: &str = "/facilities";

fn system_control(serial: &str) -> String {
    format!("/facilities/{serial}/systemcontrol/v1")
}

// ── Snapshot sources ─────────────────────────────────────────────────

/// Full system tree (zones, dhw, ventilation, configuration).
pub fn full_system(serial: &str) -> String {
    format!("{}/", system_control(serial))
}

pub fn status(serial: &str) -> String {
    format!("{}/status", system_control(serial))
}

pub fn live_report(serial: &str) -> String {
    format!("/facilities/{serial}/livereport/v1")
}

pub fn gateway(serial: &str) -> String {
    format!("/facilities/{serial}/public/v1/gatewayType")
}

// ── Other reads ──────────────────────────────────────────────────────

pub fn zones(serial: &str) -> String {
    format!("{}/zones", system_control(serial))
}

pub fn zone(serial: &str, zone: &str) -> String {
    format!("{}/zones/{zone}", system_control(serial))
}

pub fn zone_heating_configuration(serial: &str, zone: &str) -> String {
    format!("{}/zones/{zone}/heating/configuration", system_control(serial))
}

pub fn zone_timeprogram(serial: &str, zone: &str) -> String {
    format!("{}/zones/{zone}/heating/timeprogram", system_control(serial))
}

pub fn dhw_timeprogram(serial: &str, dhw: &str) -> String {
    format!("{}/dhw/{dhw}/hotwater/timeprogram", system_control(serial))
}

pub fn hvac_overview(serial: &str) -> String {
    format!("/facilities/{serial}/hvacstate/v1/overview")
}

pub fn parameters(serial: &str) -> String {
    format!("{}/parameters", system_control(serial))
}

pub fn events(serial: &str) -> String {
    format!("/facilities/{serial}/events/v1")
}

pub fn device_report(serial: &str, device: &str, report: &str) -> String {
    format!("/facilities/{serial}/livereport/v1/devices/{device}/reports/{report}")
}

// ── Writes ───────────────────────────────────────────────────────────

pub fn zone_setpoint_temperature(serial: &str, zone: &str) -> String {
    format!(
        "{}/setpoint_temperature",
        zone_heating_configuration(serial, zone)
    )
}

pub fn zone_setback_temperature(serial: &str, zone: &str) -> String {
    format!(
        "{}/setback_temperature",
        zone_heating_configuration(serial, zone)
    )
}

pub fn zone_heating_mode(serial: &str, zone: &str) -> String {
    format!("{}/mode", zone_heating_configuration(serial, zone))
}

pub fn dhw_temperature_setpoint(serial: &str, dhw: &str) -> String {
    format!(
        "{}/dhw/{dhw}/hotwater/configuration/temperature_setpoint",
        system_control(serial)
    )
}

pub fn dhw_operation_mode(serial: &str, dhw: &str) -> String {
    format!(
        "{}/dhw/{dhw}/hotwater/configuration/operation_mode",
        system_control(serial)
    )
}
