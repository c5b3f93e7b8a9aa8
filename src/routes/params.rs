use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{GarmentType, OrderStatus};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

// Query strings are flat: page fields live on each query struct, since
// `serde(flatten)` loses the numeric types under `serde_urlencoded`.

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SchoolQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Matches name, town or province.
    pub q: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub garment_type: Option<GarmentType>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub is_approved: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TemplateQuery {
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentStatusQuery {
    pub order_code: String,
}

macro_rules! impl_pagination {
    ($($ty:ty),*) => {
        $(impl $ty {
            pub fn pagination(&self) -> Pagination {
                Pagination::new(self.page, self.per_page)
            }
        })*
    };
}

impl_pagination!(SchoolQuery, ProductQuery, OrderListQuery, PageQuery, UserListQuery, ProfileListQuery);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize(), (1, 20, 0));
        assert_eq!(Pagination::new(Some(3), Some(10)).normalize(), (3, 10, 20));
        assert_eq!(Pagination::new(Some(0), Some(500)).normalize(), (1, 100, 0));
    }

    #[test]
    fn order_query_parses_status_from_query_string() {
        let uri: axum::http::Uri = "/api/orders?page=2&per_page=5&status=in_production"
            .parse()
            .unwrap();
        let axum::extract::Query(query) =
            axum::extract::Query::<OrderListQuery>::try_from_uri(&uri).unwrap();
        assert_eq!(query.pagination().normalize(), (2, 5, 5));
        assert_eq!(query.status, Some(OrderStatus::InProduction));
    }
}
