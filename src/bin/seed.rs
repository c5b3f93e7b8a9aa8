use uniform_orders_api::{
    config::AppConfig,
    db::{create_orm_conn, pool_from_orm, run_migrations},
    middleware::auth::ROLE_ADMIN,
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let pool = pool_from_orm(&orm);

    let admin_id = ensure_admin(&pool, "admin@example.com", "admin12345").await?;
    let schools = seed_schools(&pool).await?;
    seed_products(&pool, &schools).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, {} schools",
        schools.len()
    );
    Ok(())
}

async fn ensure_admin(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name, role)
        VALUES ($1, $2, $3, 'Site', 'Admin', $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(ROLE_ADMIN)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={ROLE_ADMIN})");
    Ok(user_id)
}

async fn seed_schools(pool: &sqlx::PgPool) -> anyhow::Result<Vec<(Uuid, String)>> {
    let schools = [
        ("Greenwood Primary", "12 Oak Street", "Pretoria", "Gauteng"),
        ("Riverside High", "4 River Road", "Durban", "KwaZulu-Natal"),
        ("Mountain View College", "88 Summit Avenue", "Cape Town", "Western Cape"),
    ];

    let mut ids = Vec::with_capacity(schools.len());
    for (name, address, town, province) in schools {
        let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM schools WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;

        let id = match existing {
            Some((id,)) => id,
            None => {
                let (id,): (Uuid,) = sqlx::query_as(
                    r#"
                    INSERT INTO schools (id, name, address, town, province, is_active)
                    VALUES ($1, $2, $3, $4, $5, TRUE)
                    RETURNING id
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(name)
                .bind(address)
                .bind(town)
                .bind(province)
                .fetch_one(pool)
                .await?;
                id
            }
        };
        ids.push((id, name.to_string()));
    }

    println!("Seeded schools");
    Ok(ids)
}

async fn seed_products(pool: &sqlx::PgPool, schools: &[(Uuid, String)]) -> anyhow::Result<()> {
    let products = [
        ("White Shirt", "Short sleeve formal shirt", 18000_i64, "shirt_blouse"),
        ("Grey Trousers", "Regular fit school trousers", 25000, "trousers_pants"),
        ("Pleated Skirt", "Knee length pleated skirt", 22000, "skirt"),
        ("School Blazer", "Embroidered blazer with crest", 65000, "blazer"),
        ("Striped Tie", "School colours", 6000, "accessory"),
    ];
    let sizes = serde_json::json!(["XS", "S", "M", "L", "XL"]);

    for (school_id, school_name) in schools {
        for (name, desc, price, garment_type) in products {
            let name = format!("{school_name} {name}");
            sqlx::query(
                r#"
                INSERT INTO products (id, school_id, name, description, price, garment_type, available_sizes)
                SELECT $1, $2, $3, $4, $5, $6, $7
                WHERE NOT EXISTS (SELECT 1 FROM products WHERE school_id = $2 AND name = $3)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(school_id)
            .bind(&name)
            .bind(desc)
            .bind(price)
            .bind(garment_type)
            .bind(&sizes)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded products");
    Ok(())
}
