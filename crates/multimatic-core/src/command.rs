// ── Write commands ──
//
// Every write is a `Command`: a PUT of a small JSON document to one target
// path. The target is the command's identity in the write queue.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strum::{Display, EnumString};

use multimatic_api::{ApiRequest, Method, endpoints};

/// Heating operation mode of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum HeatingMode {
    /// Follow the time program.
    Auto,
    /// Hold the day setpoint.
    Day,
    /// Hold the setback (night) temperature.
    Night,
    Off,
}

/// Operation mode of a domestic hot water circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum DhwOperationMode {
    Auto,
    On,
    Off,
}

/// A pending write: one payload for one target.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    /// API-relative path; two commands with the same target coalesce.
    pub target: String,
    pub method: Method,
    pub payload: Value,
}

impl Command {
    pub fn put(target: impl Into<String>, payload: Value) -> Self {
        Self {
            target: target.into(),
            method: Method::PUT,
            payload,
        }
    }

    pub fn zone_setpoint_temperature(serial: &str, zone: &str, temperature: f64) -> Self {
        Self::put(
            endpoints::zone_setpoint_temperature(serial, zone),
            json!({ "setpoint_temperature": temperature }),
        )
    }

    pub fn zone_setback_temperature(serial: &str, zone: &str, temperature: f64) -> Self {
        Self::put(
            endpoints::zone_setback_temperature(serial, zone),
            json!({ "setback_temperature": temperature }),
        )
    }

    pub fn zone_heating_mode(serial: &str, zone: &str, mode: HeatingMode) -> Self {
        Self::put(
            endpoints::zone_heating_mode(serial, zone),
            json!({ "mode": mode }),
        )
    }

    pub fn dhw_temperature_setpoint(serial: &str, dhw: &str, temperature: f64) -> Self {
        Self::put(
            endpoints::dhw_temperature_setpoint(serial, dhw),
            json!({ "temperature_setpoint": temperature }),
        )
    }

    pub fn dhw_operation_mode(serial: &str, dhw: &str, mode: DhwOperationMode) -> Self {
        Self::put(
            endpoints::dhw_operation_mode(serial, dhw),
            json!({ "operation_mode": mode }),
        )
    }

    /// Replace a zone's weekly heating time program.
    pub fn zone_timeprogram(serial: &str, zone: &str, program: Value) -> Self {
        Self::put(endpoints::zone_timeprogram(serial, zone), program)
    }

    pub fn to_request(&self) -> ApiRequest {
        ApiRequest {
            method: self.method.clone(),
            path: self.target.clone(),
            payload: Some(self.payload.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setpoint_command_payload() {
        let cmd = Command::zone_setpoint_temperature("123", "Z1", 21.5);
        assert_eq!(cmd.method, Method::PUT);
        assert_eq!(
            cmd.target,
            "/facilities/123/systemcontrol/v1/zones/Z1/heating/configuration/setpoint_temperature"
        );
        assert_eq!(cmd.payload, json!({ "setpoint_temperature": 21.5 }));
    }

    #[test]
    fn modes_serialize_in_upper_case() {
        let cmd = Command::zone_heating_mode("123", "Z1", HeatingMode::Night);
        assert_eq!(cmd.payload, json!({ "mode": "NIGHT" }));

        let cmd = Command::dhw_operation_mode("123", "Control_DHW", DhwOperationMode::On);
        assert_eq!(cmd.payload, json!({ "operation_mode": "ON" }));
    }

    #[test]
    fn modes_parse_case_insensitively() {
        assert_eq!("auto".parse::<HeatingMode>().unwrap(), HeatingMode::Auto);
        assert_eq!("OFF".parse::<DhwOperationMode>().unwrap(), DhwOperationMode::Off);
        assert_eq!(HeatingMode::Day.to_string(), "DAY");
        assert!("boost".parse::<HeatingMode>().is_err());
    }

    #[test]
    fn request_mirrors_command() {
        let cmd = Command::dhw_temperature_setpoint("123", "Control_DHW", 50.0);
        let req = cmd.to_request();
        assert_eq!(req.path, cmd.target);
        assert_eq!(req.payload, Some(json!({ "temperature_setpoint": 50.0 })));
    }
}
