//! # Seed Data Generator
//!
//! Populates the database with demo salon data for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p ledger-db --bin seed
//!
//! # Specify database path
//! cargo run -p ledger-db --bin seed -- --db ./data/ledger.db
//! ```
//!
//! ## Generated Data
//! - Two staff users (a manager and a professional)
//! - A retail/backbar product catalog with one KIT product
//! - Initial stock counts ledgered as adjustments
//! - An open cash register with a morning of sales across payment methods
//! - Pending commissions for the professional

use std::env;

use ledger_core::{Product, ProductKind, StockLocation};
use ledger_db::{Database, DbConfig};
use chrono::Utc;
use uuid::Uuid;

const SALON_ID: &str = "salon-demo";
const MANAGER_ID: &str = "user-manager";
const PROFESSIONAL_ID: &str = "user-ana";

/// (name, retail price cents, cost cents, unit, retail?, backbar?, initial retail, initial internal)
const PRODUCTS: &[(&str, i64, i64, &str, bool, bool, i64, i64)] = &[
    ("Shampoo Nutritivo 300ml", 4990, 2100, "un", true, false, 12, 0),
    ("Condicionador Reparador 300ml", 4590, 1900, "un", true, false, 9, 0),
    ("Mascara Hidratante 500g", 8900, 3800, "un", true, true, 4, 6),
    ("Oleo Finalizador 60ml", 3490, 1400, "un", true, true, 7, 3),
    ("Agua Oxigenada 30vol 900ml", 0, 1200, "ml", false, true, 0, 5),
    ("Po Descolorante 500g", 0, 4500, "g", false, true, 0, 3),
];

/// (payment method, amount cents)
const SALES: &[(&str, i64)] = &[
    ("CASH", 12000),
    ("PIX", 8900),
    ("CREDIT_CARD", 25000),
    ("CASH", 4990),
    ("DEBIT_CARD", 13490),
    ("PIX", 4590),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut db_path = String::from("./ledger_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Salon Ledger Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Salon Ledger Seed Data Generator");
    println!("===================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if db.registers().current(SALON_ID).await?.is_some() {
        println!("⚠ Demo salon already has an open register.");
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let stock = db.stock();
    let registers = db.registers();
    let commissions = db.commissions();

    // Staff
    stock.upsert_user(MANAGER_ID, "Carla Mendes").await?;
    stock.upsert_user(PROFESSIONAL_ID, "Ana Souza").await?;
    println!("✓ Seeded 2 users");

    // Catalog with initial stock ledgered as adjustments
    println!();
    println!("Seeding products...");
    let now = Utc::now();
    let mut product_ids = Vec::new();

    for (name, sale_price, cost, unit, retail, backbar, initial_retail, initial_internal) in
        PRODUCTS
    {
        let product = Product {
            id: Uuid::new_v4().to_string(),
            salon_id: SALON_ID.to_string(),
            name: name.to_string(),
            kind: ProductKind::Simple,
            is_retail: *retail,
            is_backbar: *backbar,
            stock_retail: 0,
            stock_internal: 0,
            min_stock_retail: if *retail { 3 } else { 0 },
            min_stock_internal: if *backbar { 2 } else { 0 },
            cost_price_cents: *cost,
            sale_price_cents: *sale_price,
            unit: unit.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        stock.insert_product(&product).await?;

        if *initial_retail > 0 {
            stock
                .adjust(
                    SALON_ID,
                    &product.id,
                    StockLocation::Retail,
                    *initial_retail,
                    "contagem inicial",
                    MANAGER_ID,
                )
                .await?;
        }
        if *initial_internal > 0 {
            stock
                .adjust(
                    SALON_ID,
                    &product.id,
                    StockLocation::Internal,
                    *initial_internal,
                    "contagem inicial",
                    MANAGER_ID,
                )
                .await?;
        }

        println!("  {} ({})", product.name, product.id);
        product_ids.push(product.id);
    }

    // A treatment kit: 1x mask + 1x finishing oil
    let kit = Product {
        id: Uuid::new_v4().to_string(),
        salon_id: SALON_ID.to_string(),
        name: "Kit Hidratacao Profunda".to_string(),
        kind: ProductKind::Kit,
        is_retail: true,
        is_backbar: true,
        stock_retail: 0,
        stock_internal: 0,
        min_stock_retail: 1,
        min_stock_internal: 1,
        cost_price_cents: 5200,
        sale_price_cents: 11900,
        unit: "un".to_string(),
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    stock.insert_product(&kit).await?;
    stock.add_kit_component(&kit.id, &product_ids[2], 1).await?;
    stock.add_kit_component(&kit.id, &product_ids[3], 1).await?;
    println!("  {} (kit of 2 components)", kit.name);

    // Open the drawer with R$200.00 and run a morning of sales
    println!();
    println!("Seeding cash register...");
    let register = registers.open(SALON_ID, 20_000, MANAGER_ID).await?;
    println!("  Opened register {}", register.id);

    for (method, amount) in SALES {
        registers
            .add_sale(SALON_ID, method, *amount, Some(PROFESSIONAL_ID))
            .await?;
    }
    registers
        .withdrawal(&register.id, 5_000, "troco para a recepcao", MANAGER_ID)
        .await?;
    println!("  Posted {} sales and 1 withdrawal", SALES.len());

    if let Some(current) = registers.current(SALON_ID).await? {
        println!("{}", serde_json::to_string_pretty(&current)?);
    }

    // Retail sale consumption + commissions for the professional
    stock
        .record_sale(
            SALON_ID,
            &product_ids[0],
            1,
            StockLocation::Retail,
            "cmd-0001",
            Some(PROFESSIONAL_ID),
        )
        .await?;
    commissions
        .create_from_command_item(
            SALON_ID,
            "cmd-0001",
            "item-0001",
            PROFESSIONAL_ID,
            "Shampoo Nutritivo 300ml",
            4990,
            1000,
        )
        .await?;
    commissions
        .create_from_command_item(
            SALON_ID,
            "cmd-0002",
            "item-0002",
            PROFESSIONAL_ID,
            "Corte feminino",
            12000,
            4000,
        )
        .await?;
    println!("  Created 2 pending commissions");

    // Sanity: counters must match the ledger
    let mismatches = stock.verify_integrity(SALON_ID).await?;
    if mismatches.is_empty() {
        println!();
        println!("✓ Stock ledger integrity verified");
    } else {
        eprintln!("⚠ Integrity mismatches: {:?}", mismatches);
    }

    let summary = commissions.summary(SALON_ID, None).await?;
    println!(
        "✓ Commissions pending: {} (R${:.2})",
        summary.pending_count,
        summary.pending_cents as f64 / 100.0
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
