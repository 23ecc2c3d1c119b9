//! # Seed Data Generator
//!
//! Stocks the inventory store for development.
//!
//! ## Usage
//! ```bash
//! # Starter catalog only
//! cargo run -p kasir-db --bin seed
//!
//! # Starter catalog plus 200 generated products
//! cargo run -p kasir-db --bin seed -- --extra 200
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! ## Generated Products
//! The starter catalog always gets ids 1, 2 and 3 on an empty database.
//! Generated products combine a grocery name with a pack size; price and
//! stock are derived from the product index so reruns are reproducible.

use std::env;

use anyhow::Context;
use kasir_core::NewProduct;
use kasir_db::{Database, DbConfig};

/// Starter catalog: (name, price, stock)
const STARTER_CATALOG: &[(&str, i64, i64)] = &[
    ("Sarimie Istri 3", 6969, 69),
    ("BahleelOil", 9000, 20),
    ("Minyak Jelantah", 1500, 15),
];

/// Grocery names for generated products
const GROCERIES: &[&str] = &[
    "Beras Pandan Wangi",
    "Gula Pasir",
    "Teh Celup",
    "Kopi Bubuk",
    "Kecap Manis",
    "Saus Sambal",
    "Garam Dapur",
    "Tepung Terigu",
    "Susu Kental Manis",
    "Mie Goreng",
    "Air Mineral",
    "Sabun Mandi",
    "Telur Ayam",
    "Roti Tawar",
    "Biskuit Kelapa",
];

/// Pack sizes with price multiplier
const SIZES: &[(&str, i64)] = &[("Kecil", 1), ("Sedang", 2), ("Besar", 4)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut extra: usize = 0;
    let mut db_path = String::from("./kasir.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--extra" | "-e" => {
                if i + 1 < args.len() {
                    extra = parse_extra(&args[i + 1])?;
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -e, --extra <N>    Generated products after the starter catalog (default: 0)");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!("Extra products: {}", extra);
    println!();

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening database {}", db_path))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();
    let products = db.products();

    for &(name, price, stock) in STARTER_CATALOG {
        let product = products
            .insert(&NewProduct::new(name, price, stock))
            .await
            .with_context(|| format!("inserting {}", name))?;
        println!("  #{} {} (price {}, stock {})", product.id, product.name, product.price, product.stock);
    }

    let mut generated = 0;
    for index in 0..extra {
        let product = generate_product(index);
        if let Err(e) = products.insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.name, e);
            continue;
        }

        generated += 1;
        if generated % 100 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    println!();
    println!(
        "✓ Stocked {} products in {:?}",
        STARTER_CATALOG.len() + generated,
        start.elapsed()
    );

    db.close().await;
    Ok(())
}

/// Builds the `index`-th generated product.
fn generate_product(index: usize) -> NewProduct {
    let grocery = GROCERIES[index % GROCERIES.len()];
    let (size, multiplier) = SIZES[(index / GROCERIES.len()) % SIZES.len()];
    let batch = index / (GROCERIES.len() * SIZES.len());

    let name = if batch == 0 {
        format!("{} {}", grocery, size)
    } else {
        format!("{} {} #{}", grocery, size, batch + 1)
    };

    // 1,000 - 24,500 in steps of 500, scaled by pack size
    let base_price = 1000 + ((index * 7) % 48) as i64 * 500;
    let stock = (index % 101) as i64;

    NewProduct::new(name, base_price * multiplier, stock)
}

fn parse_extra(value: &str) -> anyhow::Result<usize> {
    value
        .parse()
        .with_context(|| format!("--extra expects a product count, got {:?}", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extra() {
        assert_eq!(parse_extra("25").unwrap(), 25);

        let err = parse_extra("abc").unwrap_err();
        assert_eq!(err.to_string(), r#"--extra expects a product count, got "abc""#);
        assert!(parse_extra("-3").is_err());
    }
}
