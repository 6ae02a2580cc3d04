//! Per-user shopping carts

use crate::types::Timestamp;

/// One cart per user, created lazily on first access. The items live inside
/// the cart record and are written back as a unit, which keeps the one line
/// per product rule local to this type.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct Cart {
    #[n(0)]
    pub user_id: String,
    #[n(1)]
    items: Vec<CartItem>,
    #[n(2)]
    pub created_at: Timestamp,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    #[n(0)]
    pub product_id: String,
    #[n(1)]
    pub quantity: u32,
}

impl Cart {
    pub fn new(user_id: impl Into<String>, created_at: Timestamp) -> Self {
        Self {
            user_id: user_id.into(),
            items: vec![],
            created_at,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
        self.items
            .iter()
            .find(|item| item.product_id == product_id)
            .map(|item| item.quantity)
    }

    /// Add to the cart, merging with an existing line for the same product.
    /// Returns the resulting line quantity.
    pub fn add(&mut self, product_id: &str, quantity: u32) -> u32 {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            item.quantity += quantity;
            return item.quantity;
        }

        self.items.push(CartItem {
            product_id: product_id.to_owned(),
            quantity,
        });
        quantity
    }

    /// Overwrite a line's quantity. Returns false when the product is not
    /// in the cart.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        match self
            .items
            .iter_mut()
            .find(|item| item.product_id == product_id)
        {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Drop a line. Returns false when the product is not in the cart.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product_id != product_id);
        self.items.len() < before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
