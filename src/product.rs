//! Catalog products and the stock ledger

use crate::error::{InsufficientStock, ValidationError};
use crate::types::{Price, Timestamp};
use rust_decimal::Decimal;

/// A catalog product. Stock is a plain count kept non-negative by
/// construction: the only way down is [`Product::reserve`].
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Product {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub description: Option<String>,
    #[n(3)]
    pub price: Price,
    #[n(4)]
    pub stock: u32,
    #[n(5)]
    pub created_at: Timestamp,
    #[n(6)]
    pub updated_at: Timestamp,
}

impl Product {
    /// Check a reservation without applying it.
    pub fn check_available(&self, quantity: u32) -> Result<(), InsufficientStock> {
        if self.stock < quantity {
            return Err(InsufficientStock {
                name: self.name.clone(),
                requested: quantity,
                available: self.stock,
            });
        }

        Ok(())
    }

    /// Take `quantity` units out of stock.
    pub fn reserve(&mut self, quantity: u32) -> Result<(), InsufficientStock> {
        self.check_available(quantity)?;
        self.stock -= quantity;
        self.updated_at = Timestamp::now();

        Ok(())
    }

    /// Put `quantity` units back. No upper bound, a restock is always valid.
    pub fn restore(&mut self, quantity: u32) {
        self.stock += quantity;
        self.updated_at = Timestamp::now();
    }

    /// Apply an admin update. `None` fields stay untouched.
    pub fn apply(&mut self, update: ProductUpdate) -> Result<(), ValidationError> {
        if let Some(name) = &update.name {
            if name.is_empty() {
                return Err(ValidationError::MissingName);
            }
        }
        if let Some(price) = update.price {
            if price <= Decimal::ZERO {
                return Err(ValidationError::NonPositivePrice);
            }
        }

        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(price) = update.price {
            self.price = Price::new(price);
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        self.updated_at = Timestamp::now();

        Ok(())
    }
}

/// Partial update for an existing product. `None` leaves a field alone.
#[derive(Debug, Default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<u32>,
}

/// Draft for a new catalog entry. Validated when built into a [`Product`].
#[derive(Debug, Default)]
pub struct ProductDraft {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    stock: u32,
}

impl ProductDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    pub fn stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    /// Validate the draft and produce the product record.
    pub fn build(self, id: String, created_at: Timestamp) -> Result<Product, ValidationError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ValidationError::MissingName),
        };
        let price = self.price.ok_or(ValidationError::MissingPrice)?;
        if price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice);
        }

        Ok(Product {
            id,
            name,
            description: self.description,
            price: Price::new(price),
            stock: self.stock,
            created_at: created_at.clone(),
            updated_at: created_at,
        })
    }
}
