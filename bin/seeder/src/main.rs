use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use dotenvy::dotenv;
use eyre::{eyre, Result};
use reclaim_core::repositories::{
    MerchantRepository, PartnerRepository, SettingRepository, UserRepository,
};
use reclaim_core::security::SecurityConfig;
use reclaim_core::services::settings_service::{ImpactSettings, SettingKey};
use reclaim_primitives::models::entities::enum_types::UserRole;
use reclaim_primitives::models::entities::merchant::NewMerchant;
use reclaim_primitives::models::entities::partner::{NewPartner, Partner};
use reclaim_primitives::schema::partners;
use std::env;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../../migrations");

fn establish_connection() -> Result<PgConnection> {
    let database_url = env::var("DATABASE_URL").map_err(|_| eyre!("DATABASE_URL must be set"))?;
    PgConnection::establish(&database_url).map_err(|e| eyre!("Error connecting to database: {}", e))
}

fn main() -> Result<()> {
    dotenv().ok();
    println!("🌱 Seeding database...");

    let mut conn = establish_connection()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| eyre!("Failed to run migrations: {}", e))?;

    if env::args().any(|a| a == "--clean") {
        clean_db(&mut conn)?;
    }

    let admin_email = env::var("SEED_ADMIN_EMAIL").unwrap_or_else(|_| "admin@reclaim.local".into());
    let admin = UserRepository::find_or_create(&mut conn, &admin_email, Some("Admin"), UserRole::Admin)?;
    println!("Admin: {} ({})", admin.email, admin.id);

    let demo = UserRepository::find_or_create(
        &mut conn,
        "demo@reclaim.local",
        Some("Demo User"),
        UserRole::User,
    )?;
    println!("User: {} ({})", demo.email, demo.id);

    let partner = seed_partner(&mut conn, "Ocean Allies", 1_000)?;

    let api_key = SecurityConfig::generate_api_key();
    let key_hash = SecurityConfig::hash_secret(&api_key);
    let merchant = MerchantRepository::create(
        &mut conn,
        NewMerchant {
            name: "Demo Grocer",
            contact_email: Some("billing@grocer.local"),
            partner_id: Some(partner.id),
            multiplier_bps: Some(12_500),
            billing_enabled: true,
            api_key_hash: Some(&key_hash),
        },
    )?;
    println!("Merchant: {} ({})", merchant.name, merchant.id);
    println!("Merchant API key (shown once): {}", api_key);

    // make the defaults visible in the settings table
    let defaults = ImpactSettings::default();
    for key in SettingKey::ALL {
        SettingRepository::upsert(&mut conn, &key.to_string(), &defaults.get(key).to_string())?;
    }

    println!("✅ Database seeded successfully!");
    Ok(())
}

fn clean_db(conn: &mut PgConnection) -> Result<()> {
    println!("🧹 Cleaning database...");
    diesel::sql_query(
        "TRUNCATE audit_logs, magic_links, transactions, invoices, gift_codes, \
         merchants, partners, settings, users CASCADE",
    )
    .execute(conn)?;
    Ok(())
}

fn seed_partner(conn: &mut PgConnection, name: &str, commission_bps: i32) -> Result<Partner> {
    let existing = partners::table
        .filter(partners::name.eq(name))
        .first::<Partner>(conn)
        .optional()?;

    if let Some(partner) = existing {
        println!("Partner {} already exists", name);
        return Ok(partner);
    }

    let partner = PartnerRepository::create(
        conn,
        NewPartner {
            name,
            contact_email: None,
            commission_bps,
        },
    )?;
    println!("Created partner: {}", partner.name);
    Ok(partner)
}
