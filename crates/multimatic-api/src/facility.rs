// Facility read endpoints
//
// Thin single-endpoint reads. Each one is a GET through the executor that
// returns the response `body`, or `None` when the request failed.

use serde_json::Value;
use tracing::debug;

use crate::endpoints;
use crate::executor::RequestExecutor;
use crate::transport::ApiRequest;

impl RequestExecutor {
    /// List the facilities registered to the account.
    ///
    /// `GET /facilities` → `body.facilitiesList`
    pub async fn get_facilities(&self) -> Option<Vec<Value>> {
        debug!("listing facilities");
        let mut body = self.query_body(&ApiRequest::get(endpoints::FACILITIES)).await?;
        match body.get_mut("facilitiesList")?.take() {
            Value::Array(list) => Some(list),
            _ => None,
        }
    }

    /// `GET /facilities/{serial}/systemcontrol/v1/`
    pub async fn get_full_system(&self, serial: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::full_system(serial)))
            .await
    }

    /// `GET /facilities/{serial}/systemcontrol/v1/status`
    pub async fn get_status(&self, serial: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::status(serial)))
            .await
    }

    /// `GET /facilities/{serial}/livereport/v1`
    pub async fn get_live_report(&self, serial: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::live_report(serial)))
            .await
    }

    /// `GET /facilities/{serial}/public/v1/gatewayType`
    pub async fn get_gateway(&self, serial: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::gateway(serial)))
            .await
    }

    pub async fn get_zones(&self, serial: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::zones(serial)))
            .await
    }

    pub async fn get_zone(&self, serial: &str, zone: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::zone(serial, zone)))
            .await
    }

    pub async fn get_zone_heating_configuration(&self, serial: &str, zone: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::zone_heating_configuration(
            serial, zone,
        )))
        .await
    }

    pub async fn get_zone_timeprogram(&self, serial: &str, zone: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::zone_timeprogram(serial, zone)))
            .await
    }

    pub async fn get_dhw_timeprogram(&self, serial: &str, dhw: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::dhw_timeprogram(serial, dhw)))
            .await
    }

    /// `GET /facilities/{serial}/hvacstate/v1/overview`
    pub async fn get_overview(&self, serial: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::hvac_overview(serial)))
            .await
    }

    pub async fn get_parameters(&self, serial: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::parameters(serial)))
            .await
    }

    pub async fn get_events(&self, serial: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::events(serial)))
            .await
    }

    /// A single live report of one device, e.g. the water pressure sensor.
    pub async fn get_device_report(&self, serial: &str, device: &str, report: &str) -> Option<Value> {
        self.query_body(&ApiRequest::get(endpoints::device_report(
            serial, device, report,
        )))
        .await
    }
}
