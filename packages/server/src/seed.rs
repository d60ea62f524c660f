use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use sea_orm::*;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::builds::ComponentCategory;
use crate::entity::{build, build_component, component};

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite non-unique indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // GET /builds/my: WHERE owner_id = ? ORDER BY updated_at DESC
    create_index(
        db,
        "idx_build_owner_updated",
        Index::create()
            .table(build::Entity)
            .col(build::Column::OwnerId)
            .col(build::Column::UpdatedAt)
            .to_owned(),
    )
    .await;

    // GET /builds/public: WHERE is_public ORDER BY created_at DESC
    create_index(
        db,
        "idx_build_public_created",
        Index::create()
            .table(build::Entity)
            .col(build::Column::IsPublic)
            .col(build::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    // Member rows are always read per build in selection order.
    create_index(
        db,
        "idx_build_component_build_position",
        Index::create()
            .table(build_component::Entity)
            .col(build_component::Column::BuildId)
            .col(build_component::Column::Position)
            .to_owned(),
    )
    .await;

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, mut stmt: IndexCreateStatement) {
    let sql = stmt
        .if_not_exists()
        .name(name)
        .to_string(PostgresQueryBuilder);

    match db.execute_unprepared(&sql).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
    }
}

struct DemoComponent {
    name: &'static str,
    brand: &'static str,
    model: &'static str,
    category: ComponentCategory,
    price: i64,
    specs: serde_json::Value,
}

fn demo_components() -> Vec<DemoComponent> {
    vec![
        DemoComponent {
            name: "Intel Core i7-13700K",
            brand: "Intel",
            model: "i7-13700K",
            category: ComponentCategory::Cpu,
            price: 185_000,
            specs: json!({ "cores": 16, "threads": 24, "socket": "LGA1700", "tdp_w": 125 }),
        },
        DemoComponent {
            name: "AMD Ryzen 7 7700X",
            brand: "AMD",
            model: "7700X",
            category: ComponentCategory::Cpu,
            price: 162_000,
            specs: json!({ "cores": 8, "threads": 16, "socket": "AM5", "tdp_w": 105 }),
        },
        DemoComponent {
            name: "NVIDIA RTX 4070",
            brand: "NVIDIA",
            model: "RTX 4070",
            category: ComponentCategory::Gpu,
            price: 259_000,
            specs: json!({ "memory": "12 GB GDDR6X", "power_w": 200 }),
        },
        DemoComponent {
            name: "AMD RX 7800 XT",
            brand: "AMD",
            model: "RX 7800 XT",
            category: ComponentCategory::Gpu,
            price: 237_000,
            specs: json!({ "memory": "16 GB GDDR6", "power_w": 263 }),
        },
        DemoComponent {
            name: "Corsair Vengeance DDR5-5600 32GB",
            brand: "Corsair",
            model: "Vengeance DDR5-5600",
            category: ComponentCategory::Ram,
            price: 59_000,
            specs: json!({ "capacity": "32 GB", "modules": "2x16 GB", "timings": "CL36" }),
        },
        DemoComponent {
            name: "Samsung 980 PRO 1TB",
            brand: "Samsung",
            model: "980 PRO",
            category: ComponentCategory::Storage,
            price: 55_000,
            specs: json!({ "capacity": "1 TB", "interface": "PCIe 4.0 x4" }),
        },
        DemoComponent {
            name: "Corsair RM850x",
            brand: "Corsair",
            model: "RM850x",
            category: ComponentCategory::Psu,
            price: 67_000,
            specs: json!({ "power_w": 850, "efficiency": "80+ Gold" }),
        },
    ]
}

/// Insert a small demo catalog when the `component` table is empty.
pub async fn seed_demo_catalog(db: &DatabaseConnection) -> Result<(), DbErr> {
    if component::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let now = chrono::Utc::now();
    let rows: Vec<component::ActiveModel> = demo_components()
        .into_iter()
        .map(|c| component::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(c.name.to_string()),
            brand: Set(c.brand.to_string()),
            model: Set(c.model.to_string()),
            category: Set(c.category.as_str().to_string()),
            price: Set(c.price),
            currency: Set("KZT".to_string()),
            specs: Set(c.specs),
            images: Set(json!([])),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        })
        .collect();
    let count = rows.len();

    component::Entity::insert_many(rows)
        .exec_without_returning(db)
        .await?;

    info!("Seeded {} demo catalog components", count);
    Ok(())
}
