//! Entities for the café order schema.
//!
//! Table and column names follow the existing database (`pedido`,
//! `detallepedido`, `producto`, ...); Rust field names are English.

pub mod combo;
pub mod combo_item;
pub mod order;
pub mod order_line;
pub mod prediction;
pub mod product;

/// Product identifier as stored in `producto.id_producto`.
pub type ProductId = i32;
