//! Demo storefront tools
//!
//! A small catalog, an in-memory cart and the tools that expose them to the
//! chat assistant.

pub mod cart;
pub mod catalog;
pub mod tools;

pub use cart::{lock_cart, shared_cart, Cart, CartLine, SharedCart};
pub use catalog::{Catalog, Product};
pub use tools::shop_tools;
