//! Database seeding command.
//!
//! Loads a small sample catalog for local development. Idempotent:
//! rows are matched by slug, so running it twice changes nothing.
//!
//! ```bash
//! animart-cli seed
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use animart_core::slugify;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
    original_price: Option<Decimal>,
    stock: i32,
    category: &'static str,
    anime: Option<&'static str>,
    featured: bool,
}

const CATEGORIES: &[(&str, &str)] = &[
    ("Figures", "Scale figures, nendoroids, and prize figures"),
    ("Apparel", "T-shirts, hoodies, and cosplay"),
    ("Accessories", "Keychains, pins, and bags"),
    ("Home & Desk", "Posters, mugs, and desk mats"),
];

const ANIMES: &[&str] = &[
    "One Piece",
    "Jujutsu Kaisen",
    "Chainsaw Man",
    "Frieren: Beyond Journey's End",
    "Spy x Family",
];

fn sample_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Monkey D. Luffy Gear 5 Figure",
            description: "1/8 scale PVC figure, 24cm, window box packaging.",
            price: dec!(89.99),
            original_price: Some(dec!(109.99)),
            stock: 25,
            category: "Figures",
            anime: Some("One Piece"),
            featured: true,
        },
        SeedProduct {
            name: "Gojo Satoru Nendoroid",
            description: "Chibi figure with three face plates and effect parts.",
            price: dec!(54.99),
            original_price: None,
            stock: 40,
            category: "Figures",
            anime: Some("Jujutsu Kaisen"),
            featured: true,
        },
        SeedProduct {
            name: "Pochita Plush Keychain",
            description: "10cm plush keychain with metal clasp.",
            price: dec!(12.99),
            original_price: None,
            stock: 120,
            category: "Accessories",
            anime: Some("Chainsaw Man"),
            featured: false,
        },
        SeedProduct {
            name: "Frieren Journey Map Poster",
            description: "A2 matte poster of the northern lands.",
            price: dec!(18.50),
            original_price: None,
            stock: 60,
            category: "Home & Desk",
            anime: Some("Frieren: Beyond Journey's End"),
            featured: false,
        },
        SeedProduct {
            name: "Anya Forger Embroidered Hoodie",
            description: "Heavyweight cotton hoodie, unisex sizing S-XXL.",
            price: dec!(64.00),
            original_price: Some(dec!(75.00)),
            stock: 35,
            category: "Apparel",
            anime: Some("Spy x Family"),
            featured: true,
        },
        SeedProduct {
            name: "Catppuccino Desk Mat",
            description: "900x400mm stitched-edge desk mat, original artwork.",
            price: dec!(29.99),
            original_price: None,
            stock: 80,
            category: "Home & Desk",
            anime: None,
            featured: false,
        },
    ]
}

/// Seed the database with sample catalog data.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Connecting to database...");
    let pool = super::connect().await?;

    tracing::info!("Seeding categories...");
    for (name, description) in CATEGORIES {
        sqlx::query(
            "INSERT INTO shop.category (name, slug, description)
             VALUES ($1, $2, $3)
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(name)
        .bind(slugify(name))
        .bind(description)
        .execute(&pool)
        .await?;
    }

    tracing::info!("Seeding anime series...");
    for name in ANIMES {
        sqlx::query(
            "INSERT INTO shop.anime (name, slug)
             VALUES ($1, $2)
             ON CONFLICT (slug) DO NOTHING",
        )
        .bind(name)
        .bind(slugify(name))
        .execute(&pool)
        .await?;
    }

    tracing::info!("Seeding products...");
    for product in sample_products() {
        seed_product(&pool, &product).await?;
    }

    tracing::info!("Seeding complete!");
    Ok(())
}

async fn seed_product(pool: &PgPool, product: &SeedProduct) -> Result<(), sqlx::Error> {
    let category_id: i32 = sqlx::query_scalar("SELECT id FROM shop.category WHERE slug = $1")
        .bind(slugify(product.category))
        .fetch_one(pool)
        .await?;

    let anime_id: Option<i32> = match product.anime {
        Some(anime) => {
            sqlx::query_scalar("SELECT id FROM shop.anime WHERE slug = $1")
                .bind(slugify(anime))
                .fetch_optional(pool)
                .await?
        }
        None => None,
    };

    sqlx::query(
        "INSERT INTO shop.product
             (name, slug, description, price, original_price, stock, status,
              category_id, anime_id, is_featured)
         VALUES ($1, $2, $3, $4, $5, $6, 'published', $7, $8, $9)
         ON CONFLICT (slug) DO NOTHING",
    )
    .bind(product.name)
    .bind(slugify(product.name))
    .bind(product.description)
    .bind(product.price)
    .bind(product.original_price)
    .bind(product.stock)
    .bind(category_id)
    .bind(anime_id)
    .bind(product.featured)
    .execute(pool)
    .await?;

    Ok(())
}
