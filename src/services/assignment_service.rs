//! Automatic tailor assignment for freshly paid orders.

use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait, Set,
};

use crate::{
    codes,
    entity::{
        orders::{ActiveModel as OrderActive, Model as OrderModel},
        tailor_profiles::{self, Column as TailorCol, Entity as TailorProfiles, Model as TailorModel},
        tailor_schools::Column as TailorSchoolCol,
        users::{Entity as Users, Model as UserModel},
    },
    error::AppResult,
    notifications::{self, OrderSummary},
    state::AppState,
};

pub const PRODUCTION_DAYS: i64 = 7;

#[derive(Debug, Clone)]
pub struct TailorAssignment {
    pub tailor: UserModel,
    pub token: String,
    pub deadline: DateTime<Utc>,
}

/// The longest-registered approved, email-verified tailor serving the school.
pub async fn find_tailor_for_school<C: ConnectionTrait>(
    conn: &C,
    school_id: uuid::Uuid,
) -> AppResult<Option<(TailorModel, UserModel)>> {
    let found = TailorProfiles::find()
        .join(JoinType::InnerJoin, tailor_profiles::Relation::TailorSchools.def())
        .filter(TailorSchoolCol::SchoolId.eq(school_id))
        .filter(TailorCol::IsApproved.eq(true))
        .filter(TailorCol::IsEmailVerified.eq(true))
        .order_by_asc(TailorCol::CreatedAt)
        .order_by_asc(TailorCol::Id)
        .find_also_related(Users)
        .one(conn)
        .await?;

    Ok(found.and_then(|(profile, user)| user.map(|user| (profile, user))))
}

/// Stamp the assignment onto an order that is about to be saved.
pub fn apply(order: &mut OrderActive, tailor: UserModel, now: DateTime<Utc>) -> TailorAssignment {
    let token = codes::confirmation_token();
    let deadline = now + Duration::days(PRODUCTION_DAYS);

    order.tailor_id = Set(Some(tailor.id));
    order.assigned_at = Set(Some(now.into()));
    order.deadline = Set(Some(deadline.into()));
    order.confirmation_token = Set(Some(token.clone()));

    TailorAssignment {
        tailor,
        token,
        deadline,
    }
}

/// Pick a tailor for the order's school and stamp it onto `active`.
/// Leaves the order unassigned, with a warning, when nobody qualifies.
pub async fn assign<C: ConnectionTrait>(
    conn: &C,
    order: &OrderModel,
    active: &mut OrderActive,
    now: DateTime<Utc>,
) -> AppResult<Option<TailorAssignment>> {
    match find_tailor_for_school(conn, order.school_id).await? {
        Some((profile, user)) => {
            tracing::info!(
                order_id = %order.id,
                order_code = %order.order_code,
                tailor_profile_id = %profile.id,
                "tailor assigned"
            );
            Ok(Some(apply(active, user, now)))
        }
        None => {
            tracing::warn!(
                order_id = %order.id,
                order_code = %order.order_code,
                school_id = %order.school_id,
                "no approved tailor available for school"
            );
            Ok(None)
        }
    }
}

pub async fn notify_tailor(
    state: &AppState,
    assignment: &TailorAssignment,
    order: &OrderModel,
    school_name: &str,
) -> AppResult<()> {
    let summary = OrderSummary {
        order_code: &order.order_code,
        school_name,
        student_name: order.student_name.as_deref(),
        total_amount: order.total_amount,
        deadline: Some(assignment.deadline),
    };
    let tailor_name = format!("{} {}", assignment.tailor.first_name, assignment.tailor.last_name);
    let email = notifications::tailor_assignment(
        &state.config,
        &assignment.tailor.email,
        tailor_name.trim(),
        &summary,
        &assignment.token,
    );
    state.mailer.send(&email).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::ActiveValue;
    use uuid::Uuid;

    #[test]
    fn apply_sets_deadline_token_and_tailor() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 8, 0, 0).unwrap();
        let tailor = UserModel {
            id: Uuid::new_v4(),
            email: "tailor@example.com".into(),
            password_hash: String::new(),
            first_name: "Sipho".into(),
            last_name: "Dube".into(),
            role: "tailor".into(),
            created_at: now.into(),
        };
        let mut active = OrderActive::default();

        let assignment = apply(&mut active, tailor.clone(), now);

        assert_eq!(assignment.deadline, now + Duration::days(7));
        assert_eq!(assignment.token.len(), codes::CONFIRMATION_TOKEN_LEN);
        assert_eq!(active.tailor_id, ActiveValue::Set(Some(tailor.id)));
        assert_eq!(
            active.confirmation_token,
            ActiveValue::Set(Some(assignment.token.clone()))
        );
    }
}
