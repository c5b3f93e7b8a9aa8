pub mod audit_logs;
pub mod cart_items;
pub mod carts;
pub mod delivery_partner_profiles;
pub mod enums;
pub mod order_lines;
pub mod orders;
pub mod payments;
pub mod products;
pub mod schools;
pub mod shipments;
pub mod tailor_profiles;
pub mod tailor_schools;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use carts::Entity as Carts;
pub use delivery_partner_profiles::Entity as DeliveryPartnerProfiles;
pub use order_lines::Entity as OrderLines;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use products::Entity as Products;
pub use schools::Entity as Schools;
pub use shipments::Entity as Shipments;
pub use tailor_profiles::Entity as TailorProfiles;
pub use tailor_schools::Entity as TailorSchools;
pub use users::Entity as Users;
