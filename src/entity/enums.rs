use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum GarmentType {
    #[sea_orm(string_value = "shirt_blouse")]
    ShirtBlouse,
    #[sea_orm(string_value = "polo_tshirt")]
    PoloTshirt,
    #[sea_orm(string_value = "trousers_pants")]
    TrousersPants,
    #[sea_orm(string_value = "skirt")]
    Skirt,
    #[sea_orm(string_value = "shorts")]
    Shorts,
    #[sea_orm(string_value = "pinafore")]
    Pinafore,
    #[sea_orm(string_value = "blazer")]
    Blazer,
    #[sea_orm(string_value = "pe_kit")]
    PeKit,
    #[sea_orm(string_value = "accessory")]
    Accessory,
}

impl GarmentType {
    pub fn display_name(&self) -> &'static str {
        match self {
            GarmentType::ShirtBlouse => "Shirt/Blouse (formal)",
            GarmentType::PoloTshirt => "Polo/T-shirt",
            GarmentType::TrousersPants => "Trousers/Pants",
            GarmentType::Skirt => "Skirt",
            GarmentType::Shorts => "Shorts",
            GarmentType::Pinafore => "Pinafore/Overall/Tunic/Dress",
            GarmentType::Blazer => "Blazer/Jacket/Cardigan",
            GarmentType::PeKit => "PE Kit",
            GarmentType::Accessory => "Accessory (Tie/Belt)",
        }
    }
}

/// Order lifecycle: pending -> confirmed -> in_production -> completed -> shipped -> delivered,
/// or cancelled.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "in_production")]
    InProduction,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "shipped")]
    Shipped,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InProduction => "in_production",
            OrderStatus::Completed => "completed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Transitions a tailor may perform on an order of a school they serve.
    pub fn tailor_can_move_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Confirmed, OrderStatus::InProduction)
                | (OrderStatus::InProduction, OrderStatus::Completed)
        )
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "assigned")]
    Assigned,
    #[sea_orm(string_value = "picked_up")]
    PickedUp,
    #[sea_orm(string_value = "in_transit")]
    InTransit,
    #[sea_orm(string_value = "delivered")]
    Delivered,
}

impl ShipmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Pending => "pending",
            ShipmentStatus::Assigned => "assigned",
            ShipmentStatus::PickedUp => "picked_up",
            ShipmentStatus::InTransit => "in_transit",
            ShipmentStatus::Delivered => "delivered",
        }
    }

    /// The single status a delivery partner may advance to from here.
    pub fn next_for_delivery(&self) -> Option<ShipmentStatus> {
        match self {
            ShipmentStatus::Assigned => Some(ShipmentStatus::PickedUp),
            ShipmentStatus::PickedUp => Some(ShipmentStatus::InTransit),
            ShipmentStatus::InTransit => Some(ShipmentStatus::Delivered),
            ShipmentStatus::Pending | ShipmentStatus::Delivered => None,
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "snake_case")]
pub enum StudentGender {
    #[sea_orm(string_value = "male")]
    Male,
    #[sea_orm(string_value = "female")]
    Female,
    #[sea_orm(string_value = "other")]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tailor_transitions_follow_production_order() {
        assert!(OrderStatus::Confirmed.tailor_can_move_to(OrderStatus::InProduction));
        assert!(OrderStatus::InProduction.tailor_can_move_to(OrderStatus::Completed));
        assert!(!OrderStatus::Pending.tailor_can_move_to(OrderStatus::InProduction));
        assert!(!OrderStatus::Confirmed.tailor_can_move_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.tailor_can_move_to(OrderStatus::Shipped));
    }

    #[test]
    fn delivery_walks_shipment_forward_one_step() {
        assert_eq!(
            ShipmentStatus::Assigned.next_for_delivery(),
            Some(ShipmentStatus::PickedUp)
        );
        assert_eq!(
            ShipmentStatus::InTransit.next_for_delivery(),
            Some(ShipmentStatus::Delivered)
        );
        assert_eq!(ShipmentStatus::Pending.next_for_delivery(), None);
        assert_eq!(ShipmentStatus::Delivered.next_for_delivery(), None);
    }

    #[test]
    fn statuses_serialize_as_snake_case() {
        let value = serde_json::to_value(OrderStatus::InProduction).unwrap();
        assert_eq!(value, "in_production");
        let value = serde_json::to_value(GarmentType::PeKit).unwrap();
        assert_eq!(value, "pe_kit");
    }
}
