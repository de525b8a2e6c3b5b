//! Sample data seeder.
//!
//! Replaces everything in the database with a small fixed marketplace:
//! three users (one customer, two store owners), four stores, and sixteen
//! products. All accounts share the password `password123`.
//!
//! Inserts go through the server's repository layer so seeded rows take
//! the same path as API writes.

use rust_decimal::Decimal;
use tracing::info;

use retail_radar_core::{Email, Role, StoreId, UserId};
use retail_radar_server::db::products::ProductFields;
use retail_radar_server::db::stores::StoreFields;
use retail_radar_server::db::users::CreateUser;
use retail_radar_server::db::{ProductRepository, StoreRepository, UserRepository, create_pool};
use retail_radar_server::services::auth::hash_password;

const SEED_PASSWORD: &str = "password123";

/// Seed the database with sample users, stores, and products.
///
/// Clears all existing data first, including orders.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = crate::commands::database_url()?;
    let pool = create_pool(&database_url).await?;
    info!("Connected to database");

    // Clear existing data
    sqlx::query(
        "TRUNCATE app_user, store, product, customer_order, order_item RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await?;
    info!("Cleared existing data");

    // One hash for all sample accounts
    let password_hash = hash_password(SEED_PASSWORD)?;

    let users = UserRepository::new(&pool);
    let _customer = create_user(
        &users,
        "John Doe",
        "john@customer.com",
        &password_hash,
        Role::Customer,
    )
    .await?;
    let owner1 = create_user(
        &users,
        "Store Owner 1",
        "owner1@store.com",
        &password_hash,
        Role::StoreOwner,
    )
    .await?;
    let owner2 = create_user(
        &users,
        "Store Owner 2",
        "owner2@store.com",
        &password_hash,
        Role::StoreOwner,
    )
    .await?;
    info!("Created sample users");

    let stores = StoreRepository::new(&pool);
    let tech_galaxy = create_store(
        &stores,
        owner1,
        store_fields(
            "Tech Galaxy",
            "Your one-stop shop for all electronics and gadgets",
            "Shop No. 123, Brigade Road, Bangalore - 560001",
            "Brigade Road",
            "+91-9876543210",
            "techgalaxy@store.com",
        ),
    )
    .await?;
    let fresh_mart = create_store(
        &stores,
        owner1,
        store_fields(
            "Fresh Mart Grocery",
            "Fresh fruits, vegetables, and daily essentials",
            "No. 45, Koramangala 4th Block, Bangalore - 560034",
            "Koramangala",
            "+91-9876543211",
            "freshmart@store.com",
        ),
    )
    .await?;
    let fashion_hub = create_store(
        &stores,
        owner2,
        store_fields(
            "Fashion Hub",
            "Trendy clothing and accessories for all ages",
            "Unit 67, Commercial Street, Bangalore - 560001",
            "Commercial Street",
            "+91-9876543212",
            "fashionhub@store.com",
        ),
    )
    .await?;
    let book_paradise = create_store(
        &stores,
        owner2,
        store_fields(
            "Book Paradise",
            "Books, stationery, and educational materials",
            "Shop 34, Jayanagar 4th Block, Bangalore - 560011",
            "Jayanagar",
            "+91-9876543213",
            "bookparadise@store.com",
        ),
    )
    .await?;
    info!("Created sample stores");

    // (store, name, description, category, price, stock)
    let catalog: [(StoreId, &str, &str, &str, i64, i32); 16] = [
        (
            tech_galaxy,
            "iPhone 15",
            "Latest Apple iPhone with advanced features",
            "Electronics",
            79999,
            10,
        ),
        (
            tech_galaxy,
            "Samsung Galaxy S24",
            "Flagship Android smartphone",
            "Electronics",
            69999,
            15,
        ),
        (
            tech_galaxy,
            "MacBook Air M3",
            "Lightweight laptop for professionals",
            "Electronics",
            114_900,
            5,
        ),
        (
            tech_galaxy,
            "Sony WH-1000XM5",
            "Noise cancelling wireless headphones",
            "Electronics",
            29990,
            20,
        ),
        (
            fresh_mart,
            "Organic Bananas",
            "Fresh organic bananas - 1kg pack",
            "Fruits",
            80,
            50,
        ),
        (
            fresh_mart,
            "Basmati Rice",
            "Premium quality basmati rice - 5kg",
            "Groceries",
            450,
            30,
        ),
        (
            fresh_mart,
            "Fresh Milk",
            "Pure cow milk - 1 liter pack",
            "Dairy",
            60,
            100,
        ),
        (
            fresh_mart,
            "Whole Wheat Bread",
            "Healthy whole wheat bread loaf",
            "Bakery",
            35,
            25,
        ),
        (
            fashion_hub,
            "Casual T-Shirt",
            "Comfortable cotton t-shirt for daily wear",
            "Clothing",
            599,
            40,
        ),
        (
            fashion_hub,
            "Denim Jeans",
            "Stylish denim jeans - Regular fit",
            "Clothing",
            1299,
            25,
        ),
        (
            fashion_hub,
            "Sneakers",
            "Comfortable sports sneakers",
            "Footwear",
            2499,
            15,
        ),
        (
            fashion_hub,
            "Leather Wallet",
            "Genuine leather wallet with multiple slots",
            "Accessories",
            899,
            30,
        ),
        (
            book_paradise,
            "Programming Book",
            "Complete guide to modern JavaScript",
            "Books",
            699,
            20,
        ),
        (
            book_paradise,
            "Notebook Set",
            "Set of 5 ruled notebooks",
            "Stationery",
            150,
            50,
        ),
        (
            book_paradise,
            "Scientific Calculator",
            "Advanced scientific calculator for students",
            "Electronics",
            899,
            12,
        ),
        (
            book_paradise,
            "Art Supplies Kit",
            "Complete art supplies for drawing and painting",
            "Art Supplies",
            1299,
            8,
        ),
    ];

    let products = ProductRepository::new(&pool);
    for (store_id, name, description, category, price, stock) in catalog {
        products
            .create(
                store_id,
                ProductFields {
                    name: name.to_owned(),
                    description: description.to_owned(),
                    category: category.to_owned(),
                    price: Decimal::from(price),
                    stock,
                    image_url: None,
                },
            )
            .await?;
    }
    info!("Created sample products");

    info!("Seeding complete!");
    info!("  Users: 3, Stores: 4, Products: {}", catalog.len());
    info!("Login credentials:");
    info!("  Customer: john@customer.com / {SEED_PASSWORD}");
    info!("  Store Owner 1: owner1@store.com / {SEED_PASSWORD}");
    info!("  Store Owner 2: owner2@store.com / {SEED_PASSWORD}");

    Ok(())
}

async fn create_user(
    users: &UserRepository<'_>,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<UserId, Box<dyn std::error::Error>> {
    let user = users
        .create(CreateUser {
            name: name.to_owned(),
            email: Email::parse(email)?,
            password_hash: password_hash.to_owned(),
            role,
        })
        .await?;
    Ok(user.id)
}

async fn create_store(
    stores: &StoreRepository<'_>,
    owner: UserId,
    fields: StoreFields,
) -> Result<StoreId, Box<dyn std::error::Error>> {
    let created = stores.create(owner, fields).await?;
    Ok(created.store.id)
}

fn store_fields(
    name: &str,
    description: &str,
    address: &str,
    locality: &str,
    phone: &str,
    email: &str,
) -> StoreFields {
    StoreFields {
        name: name.to_owned(),
        description: description.to_owned(),
        address: address.to_owned(),
        locality: locality.to_owned(),
        phone: phone.to_owned(),
        email: email.to_owned(),
    }
}
