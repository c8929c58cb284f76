//! Product catalog

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub category: String,
}

impl Product {
    pub fn new(id: u64, name: impl Into<String>, price: f64, category: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: category.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The storefront's demo inventory
    pub fn demo() -> Self {
        Self::new(vec![
            Product::new(1, "Wireless Headphones", 99.99, "electronics"),
            Product::new(2, "Coffee Mug", 14.99, "kitchen"),
            Product::new(3, "Yoga Mat", 29.99, "fitness"),
        ])
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: u64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in `category` (all when `None`), at most `limit` of them
    pub fn filter(&self, category: Option<&str>, limit: Option<usize>) -> Vec<&Product> {
        self.products
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }
}
