//! Order lifecycle and inventory reservation core for a small e-commerce
//! backend.
//!
//! Catalog products, per-user carts, orders and users live as CBOR records
//! in a sled keyspace. Placing an order validates the cart, snapshots the
//! current prices into the order lines, reserves stock and clears the cart
//! in a single transaction. Cancelling a pending order reverses the
//! reservation and counts a fraud signal against the owner.

pub mod cart;
pub mod config;
pub mod error;
pub mod order;
pub mod product;
pub mod service;
pub mod store;
pub mod types;
pub mod user;
pub mod utils;
