use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderLine, OrderStatus, Shipment, ShipmentStatus};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmOrderResponse {
    pub message: String,
    pub order_code: String,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateShipmentStatusRequest {
    pub status: ShipmentStatus,
    pub tracking_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShipmentList {
    pub items: Vec<Shipment>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignShipmentRequest {
    /// User id of an approved delivery partner.
    pub delivery_partner_id: Uuid,
}
