// ── Facility snapshot ──
//
// The merged view of one facility: system tree, live measurements, status
// and gateway metadata. Zones and hot water circuits are re-keyed by their
// `_id`, and every hot water circuit gets a `configuration` map of its
// temperature reports from the live measurements.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::CoreError;

const TEMPERATURE_CATEGORY: &str = "TEMPERATURE";

/// Point-in-time state of one facility. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemSnapshot {
    pub system: SystemTree,
    pub measures: Value,
    pub status: Value,
    pub gateway: Value,
}

/// The facility's system tree with zones and dhw indexed by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemTree {
    pub zones: IndexMap<String, Value>,
    pub dhw: IndexMap<String, Value>,
    /// Every other member of the tree, untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl SystemSnapshot {
    /// Merge the four raw reads into a snapshot.
    pub fn assemble(
        system: Value,
        measures: Value,
        status: Value,
        gateway: Value,
    ) -> Result<Self, CoreError> {
        let Value::Object(mut other) = system else {
            return Err(malformed("system tree is not an object"));
        };

        let zones = index_by_id("zones", other.remove("zones"))?;
        let mut dhw = index_by_id("dhw", other.remove("dhw"))?;

        for (id, entry) in &mut dhw {
            let configuration = temperature_reports(&measures, id);
            let Value::Object(fields) = entry else {
                return Err(malformed(format!("dhw entry {id} is not an object")));
            };
            fields.insert("configuration".into(), Value::Object(configuration));
        }

        Ok(Self {
            system: SystemTree { zones, dhw, other },
            measures,
            status,
            gateway,
        })
    }

    pub fn zone(&self, id: &str) -> Option<&Value> {
        self.system.zones.get(id)
    }

    pub fn dhw(&self, id: &str) -> Option<&Value> {
        self.system.dhw.get(id)
    }

    /// Temperature reports attached to a dhw circuit, keyed by report id.
    pub fn dhw_configuration(&self, id: &str) -> Option<&Map<String, Value>> {
        self.dhw(id)?.get("configuration")?.as_object()
    }
}

/// Turn an array of `{_id, ...}` objects into an id-keyed map.
///
/// Order follows the array; a repeated id keeps its first position and
/// its last value.
fn index_by_id(field: &str, entries: Option<Value>) -> Result<IndexMap<String, Value>, CoreError> {
    let Some(Value::Array(entries)) = entries else {
        return Err(malformed(format!("system.{field} is missing or not an array")));
    };

    let mut indexed = IndexMap::with_capacity(entries.len());
    for entry in entries {
        let Some(id) = entry_id(&entry) else {
            return Err(malformed(format!("system.{field} entry without an _id")));
        };
        indexed.insert(id, entry);
    }
    Ok(indexed)
}

/// The `_id` of an entry as a map key. Numbers are accepted and rendered
/// as their decimal text.
fn entry_id(entry: &Value) -> Option<String> {
    match entry.get("_id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// TEMPERATURE reports of the device with the given id, keyed by report id.
///
/// No matching device (or no device list at all) yields an empty map.
/// Unlike zones and dhw entries, a report without an `_id` is not an
/// error; it is skipped.
fn temperature_reports(measures: &Value, device_id: &str) -> Map<String, Value> {
    let device = measures
        .get("devices")
        .and_then(Value::as_array)
        .and_then(|devices| {
            devices
                .iter()
                .find(|d| entry_id(d).as_deref() == Some(device_id))
        });

    let Some(reports) = device
        .and_then(|d| d.get("reports"))
        .and_then(Value::as_array)
    else {
        return Map::new();
    };

    reports
        .iter()
        .filter(|r| r.get("measurement_category").and_then(Value::as_str) == Some(TEMPERATURE_CATEGORY))
        .filter_map(|r| match entry_id(r) {
            Some(id) => Some((id, r.clone())),
            None => {
                debug!(device = device_id, "skipping temperature report without an _id");
                None
            }
        })
        .collect()
}

fn malformed(message: impl Into<String>) -> CoreError {
    CoreError::MalformedState {
        message: message.into(),
    }
}
