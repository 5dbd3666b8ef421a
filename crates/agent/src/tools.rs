use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

use staybook_core::domain::booking::NewBooking;
use staybook_core::domain::guest::NewGuest;
use staybook_core::domain::room::RoomId;
use staybook_core::errors::OperationError;
use staybook_core::pricing::{format_price, price_stay};
use staybook_db::repositories::{BookingRepository, GuestRepository, RoomRepository};

use crate::contracts::{
    AvailabilityEcho, AvailabilityRequest, AvailabilityResponse, BookingCreateRequest,
    BookingCreateResponse, GuestUpsertRequest, GuestUpsertResponse, StayPriceRequest,
    StayPriceResponse,
};

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    async fn execute(&self, input: Value) -> Result<Value>;
}

#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub async fn execute(&self, name: &str, input: Value) -> Result<Value> {
        let tool =
            self.tools.get(name).ok_or_else(|| anyhow::anyhow!("unknown tool `{name}`"))?;
        tool.execute(input).await
    }
}

/// Operation failures cross the tool boundary as tagged payloads, never as
/// raised errors.
fn error_payload(error: &OperationError) -> Value {
    json!({
        "error": {
            "kind": error.kind().as_str(),
            "message": error.to_string(),
        }
    })
}

fn parse_input<T: DeserializeOwned>(tool: &'static str, input: Value) -> Result<T, Value> {
    serde_json::from_value(input).map_err(|error| {
        json!({
            "error": {
                "kind": "validation",
                "message": format!("invalid `{tool}` input: {error}"),
            }
        })
    })
}

pub struct GuestUpsertTool {
    directory: Arc<dyn GuestRepository>,
}

impl GuestUpsertTool {
    pub fn new(directory: Arc<dyn GuestRepository>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for GuestUpsertTool {
    fn name(&self) -> &'static str {
        "guest_upsert"
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let request: GuestUpsertRequest = match parse_input(self.name(), input) {
            Ok(request) => request,
            Err(payload) => return Ok(payload),
        };
        debug!(tool = self.name(), phone = %request.phone, "executing tool");

        let outcome = self
            .directory
            .upsert(NewGuest { name: request.name, phone: request.phone, city: request.city })
            .await;

        match outcome {
            Ok(outcome) => Ok(serde_json::to_value(GuestUpsertResponse {
                new_guest: outcome.new_guest,
                guest: outcome.guest.into(),
            })?),
            Err(error) => Ok(error_payload(&error)),
        }
    }
}

pub struct AvailabilityTool {
    rooms: Arc<dyn RoomRepository>,
}

impl AvailabilityTool {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }
}

#[async_trait]
impl Tool for AvailabilityTool {
    fn name(&self) -> &'static str {
        "room_availability"
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let request: AvailabilityRequest = match parse_input(self.name(), input) {
            Ok(request) => request,
            Err(payload) => return Ok(payload),
        };
        debug!(tool = self.name(), num_people = request.num_people, "executing tool");

        let availability = self
            .rooms
            .find_available(request.num_people, &request.check_in, &request.check_out)
            .await;

        match availability {
            Ok(availability) => Ok(serde_json::to_value(AvailabilityResponse {
                given_input_specifications: AvailabilityEcho {
                    num_people: request.num_people,
                    check_in: request.check_in,
                    check_out: request.check_out,
                    result_count: availability.count(),
                },
                available_rooms: availability.rooms.into_iter().map(Into::into).collect(),
            })?),
            Err(error) => Ok(error_payload(&error)),
        }
    }
}

pub struct StayPriceTool {
    rooms: Arc<dyn RoomRepository>,
}

impl StayPriceTool {
    pub fn new(rooms: Arc<dyn RoomRepository>) -> Self {
        Self { rooms }
    }
}

#[async_trait]
impl Tool for StayPriceTool {
    fn name(&self) -> &'static str {
        "stay_price"
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let request: StayPriceRequest = match parse_input(self.name(), input) {
            Ok(request) => request,
            Err(payload) => return Ok(payload),
        };
        debug!(tool = self.name(), room_id = request.room_id, "executing tool");

        let rate = match self.rooms.rate_for_room(RoomId(request.room_id)).await {
            Ok(Some(rate)) => rate,
            Ok(None) => return Ok(error_payload(&OperationError::InvalidRoom(request.room_id))),
            Err(error) => return Ok(error_payload(&error)),
        };

        match price_stay(&rate, request.days_charged, request.extra_beds) {
            Ok(pricing) => Ok(serde_json::to_value(StayPriceResponse {
                room_id: request.room_id,
                days_charged: request.days_charged,
                extra_beds: request.extra_beds,
                subtotal_amount: pricing.subtotal_amount,
                taxes_and_fees: pricing.taxes_and_fees,
                total_price: pricing.total_price,
                advance_due_amount: pricing.advance_due_amount,
                display_total: format_price(pricing.total_price),
                display_advance_due: format_price(pricing.advance_due_amount),
            })?),
            Err(error) => Ok(error_payload(&error)),
        }
    }
}

pub struct BookingCreateTool {
    ledger: Arc<dyn BookingRepository>,
}

impl BookingCreateTool {
    pub fn new(ledger: Arc<dyn BookingRepository>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl Tool for BookingCreateTool {
    fn name(&self) -> &'static str {
        "booking_create"
    }

    async fn execute(&self, input: Value) -> Result<Value> {
        let request: BookingCreateRequest = match parse_input(self.name(), input) {
            Ok(request) => request,
            Err(payload) => return Ok(payload),
        };
        debug!(
            tool = self.name(),
            guest_id = request.guest_id,
            room_id = request.room_id,
            "executing tool"
        );

        let booking = NewBooking {
            guest_id: request.guest_id(),
            room_id: request.room_id(),
            num_persons: request.num_persons,
            check_in_datetime: request.check_in_datetime,
            check_out_datetime: request.check_out_datetime,
            days_charged: request.days_charged,
            extra_beds: request.extra_beds,
            extra_bed_price: request.extra_bed_price,
            subtotal_amount: request.subtotal_amount,
            taxes_and_fees: request.taxes_and_fees,
            total_price: request.total_price,
            advance_due_amount: request.advance_due_amount,
        };

        match self.ledger.create(booking).await {
            Ok(confirmation) => Ok(serde_json::to_value(BookingCreateResponse {
                system_booking_id: confirmation.booking_id.0,
                reference_code: confirmation.reference_code,
                message: confirmation.message,
                details: confirmation.details,
            })?),
            Err(error) => Ok(error_payload(&error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::{Tool, ToolRegistry};

    struct EchoTool;

    #[async_trait::async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn execute(&self, input: Value) -> anyhow::Result<Value> {
            Ok(input)
        }
    }

    #[tokio::test]
    async fn registry_dispatches_by_name() {
        let mut registry = ToolRegistry::default();
        registry.register(EchoTool);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["echo"]);

        let output = registry.execute("echo", json!({"ping": true})).await.expect("dispatch");
        assert_eq!(output, json!({"ping": true}));
    }

    #[tokio::test]
    async fn unknown_tool_is_a_dispatch_error() {
        let registry = ToolRegistry::default();
        assert!(registry.is_empty());

        let error = registry.execute("missing", json!({})).await.expect_err("should fail");
        assert!(error.to_string().contains("unknown tool"));
    }
}
