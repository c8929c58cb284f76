//! In-memory shopping cart
//!
//! Plain quantity bookkeeping. Nothing is persisted; a cart lives as long as
//! the session holding it.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use super::catalog::Product;

/// Cart shared between the session's tool handlers
pub type SharedCart = Arc<Mutex<Cart>>;

pub fn shared_cart() -> SharedCart {
    Arc::new(Mutex::new(Cart::default()))
}

/// Lock a shared cart, mapping poisoning to an error
pub fn lock_cart(cart: &SharedCart) -> anyhow::Result<MutexGuard<'_, Cart>> {
    cart.lock()
        .map_err(|_| anyhow::anyhow!("cart state is unavailable (lock poisoned)"))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add `quantity` units, merging with an existing line
    ///
    /// Returns the line's new quantity, or `None` (leaving the cart
    /// untouched) if it would overflow.
    pub fn add(&mut self, product: &Product, quantity: u32) -> Option<u32> {
        match self.lines.iter_mut().find(|l| l.product.id == product.id) {
            Some(line) => {
                line.quantity = line.quantity.checked_add(quantity)?;
                Some(line.quantity)
            }
            None if quantity == 0 => Some(0),
            None => {
                self.lines.push(CartLine {
                    product: product.clone(),
                    quantity,
                });
                Some(quantity)
            }
        }
    }

    /// Remove a line, returning it if present
    pub fn remove(&mut self, product_id: u64) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| l.product.id == product_id)?;
        Some(self.lines.remove(index))
    }

    /// Set a line's quantity; zero removes the line
    pub fn update_quantity(&mut self, product_id: u64, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.product.id == product_id) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn total_price(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}
