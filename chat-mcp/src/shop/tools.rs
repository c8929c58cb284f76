//! Shop assistant tools
//!
//! The tools the storefront chat widget registers. Handlers read and mutate
//! the session's cart; a request for an unknown product is answered with an
//! error-flagged result rather than a handler failure.

use std::sync::Arc;

use anyhow::Context;
use mcp_protocol::{error_result, text_success, ToolResult};
use serde_json::Value;

use super::cart::{lock_cart, SharedCart};
use super::catalog::Catalog;
use crate::tools::{handler_fn, InputSchema, Params, PropertySchema, Tool};

/// All shop tools, sharing one catalog and cart
pub fn shop_tools(catalog: Catalog, cart: SharedCart) -> Vec<Tool> {
    let catalog = Arc::new(catalog);
    vec![
        get_products(catalog.clone()),
        add_to_cart(catalog, cart.clone()),
        remove_from_cart(cart.clone()),
        get_cart_status(cart),
    ]
}

fn get_products(catalog: Arc<Catalog>) -> Tool {
    Tool::new(
        "get_products",
        "Get a list of available products in the shop",
        InputSchema::new()
            .property(
                "category",
                PropertySchema::string().description("Filter by product category (optional)"),
            )
            .property(
                "limit",
                PropertySchema::number()
                    .description("Maximum number of products to return (optional)"),
            ),
        handler_fn(move |params| {
            let catalog = catalog.clone();
            async move {
                let category = params.get("category").and_then(Value::as_str);
                let limit = match parse_limit(params.get("limit")) {
                    Ok(limit) => limit,
                    Err(message) => return Ok(error_result(message)),
                };

                let products = catalog.filter(category, limit);
                if products.is_empty() {
                    return Ok(text_success(match category {
                        Some(c) => format!("No products found in category '{}'.", c),
                        None => "No products are available right now.".to_string(),
                    }));
                }

                let listing = products
                    .iter()
                    .map(|p| format!("• {} - ${:.2} ({})", p.name, p.price, p.category))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(text_success(format!(
                    "Here are the available products:\n\n{}",
                    listing
                )))
            }
        }),
    )
}

fn add_to_cart(catalog: Arc<Catalog>, cart: SharedCart) -> Tool {
    Tool::new(
        "add_to_cart",
        "Add a product to the shopping cart",
        InputSchema::new()
            .property(
                "productId",
                PropertySchema::number().description("The ID of the product to add to cart"),
            )
            .property(
                "quantity",
                PropertySchema::number()
                    .description("The quantity to add (optional, defaults to 1)")
                    .default_value(Value::from(1)),
            )
            .required("productId"),
        handler_fn(move |params| {
            let catalog = catalog.clone();
            let cart = cart.clone();
            async move {
                let product_id = product_id(&params)?;
                let quantity = match parse_quantity(params.get("quantity")) {
                    Ok(quantity) => quantity,
                    Err(message) => return Ok(error_result(message)),
                };

                let Some(product) = catalog.find(product_id) else {
                    return Ok(not_found(product_id));
                };

                let Some(total) = lock_cart(&cart)?.add(product, quantity) else {
                    return Ok(error_result("Quantity too large."));
                };
                tracing::info!(product_id, quantity, total, "Added to cart");

                Ok(text_success(format!(
                    "Successfully added {} unit(s) of {} to your cart! 🛒",
                    quantity, product.name
                )))
            }
        }),
    )
}

fn remove_from_cart(cart: SharedCart) -> Tool {
    Tool::new(
        "remove_from_cart",
        "Remove a product from the shopping cart",
        InputSchema::new()
            .property(
                "productId",
                PropertySchema::number().description("The ID of the product to remove"),
            )
            .required("productId"),
        handler_fn(move |params| {
            let cart = cart.clone();
            async move {
                let product_id = product_id(&params)?;
                match lock_cart(&cart)?.remove(product_id) {
                    Some(line) => Ok(text_success(format!(
                        "Removed {} from your cart.",
                        line.product.name
                    ))),
                    None => Ok(error_result(format!(
                        "Product {} is not in your cart.",
                        product_id
                    ))),
                }
            }
        }),
    )
}

fn get_cart_status(cart: SharedCart) -> Tool {
    Tool::new(
        "get_cart_status",
        "Get current cart status and items",
        InputSchema::new(),
        handler_fn(move |_| {
            let cart = cart.clone();
            async move {
                let cart = lock_cart(&cart)?;
                if cart.is_empty() {
                    return Ok(text_success("Your cart is empty."));
                }

                let lines = cart
                    .lines()
                    .iter()
                    .map(|l| format!("• {}x {} (${:.2})", l.quantity, l.product.name, l.subtotal()))
                    .collect::<Vec<_>>()
                    .join("\n");
                Ok(text_success(format!(
                    "Your cart contains:\n{}\n\nTotal: ${:.2}",
                    lines,
                    cart.total_price()
                )))
            }
        }),
    )
}

fn product_id(params: &Params) -> anyhow::Result<u64> {
    params
        .get("productId")
        .and_then(Value::as_u64)
        .context("productId must be a positive whole number")
}

/// `limit` of zero (or absent) means no limit; fractions are truncated
fn parse_limit(limit: Option<&Value>) -> Result<Option<usize>, &'static str> {
    let Some(limit) = limit else {
        return Ok(None);
    };
    match limit.as_f64() {
        Some(n) if n < 0.0 => Err("Limit must not be negative."),
        Some(n) if n < 1.0 => Ok(None),
        Some(n) => Ok(Some(n as usize)),
        None => Err("Limit must be a number."),
    }
}

/// `quantity` defaults to 1 and must be a positive whole number
fn parse_quantity(quantity: Option<&Value>) -> Result<u32, &'static str> {
    let Some(quantity) = quantity else {
        return Ok(1);
    };
    let Some(n) = quantity.as_u64() else {
        return Err("Quantity must be a whole number.");
    };
    match u32::try_from(n) {
        Ok(0) => Err("Quantity must be at least 1."),
        Ok(n) => Ok(n),
        Err(_) => Err("Quantity too large."),
    }
}

fn not_found(product_id: u64) -> ToolResult {
    error_result(format!("Product {} not found.", product_id))
}
