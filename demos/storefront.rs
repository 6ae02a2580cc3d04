//! End to end walkthrough: catalog, cart, placement, cancellation.
//!
//! ```bash
//! cargo run --example storefront
//! RUST_LOG=debug cargo run --example storefront
//! ```

use mini_commerce::config::Settings;
use mini_commerce::product::ProductDraft;
use mini_commerce::service::CommerceService;
use mini_commerce::store::Store;
use mini_commerce::user::{Actor, Role};
use rust_decimal::Decimal;

fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    setup_tracing();

    let dir = tempfile::tempdir()?;
    let store = Store::open(dir.path().join("storefront.db"))?;
    let service = CommerceService::new(store, Settings::default());

    let customer = service.register_user("alice", "alice@example.com", Role::Customer)?;

    let keyboard = service.create_product(
        ProductDraft::new()
            .name("mechanical keyboard")
            .description("tenkeyless, brown switches")
            .price(Decimal::new(12_500, 2))
            .stock(10),
    )?;
    let mouse = service.create_product(
        ProductDraft::new()
            .name("wireless mouse")
            .price(Decimal::new(3_499, 2))
            .stock(25),
    )?;

    service.add_to_cart(&customer.id, &keyboard.id, 1)?;
    service.add_to_cart(&customer.id, &mouse.id, 2)?;

    let order = service.place_order(&customer.id)?;
    println!("placed {} for {}", order.id, order.total_amount);
    println!(
        "keyboard stock after placement: {}",
        service.get_product(&keyboard.id)?.stock
    );

    let actor = Actor::customer(customer.id.clone());
    service.cancel_order(&order.id, &actor)?;

    println!(
        "keyboard stock after cancellation: {}",
        service.get_product(&keyboard.id)?.stock
    );
    println!("{:#?}", service.list_orders(&actor)?);

    Ok(())
}
