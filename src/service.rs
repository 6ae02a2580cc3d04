//! Service layer API for catalog, cart and order lifecycle operations

use crate::cart::Cart;
use crate::config::Settings;
use crate::error::{CommerceError, ValidationError};
use crate::order::{Order, OrderItem, OrderStatus};
use crate::product::{Product, ProductDraft, ProductUpdate};
use crate::store::{self, ORDER_HRP, PRODUCT_HRP, Store, USER_HRP, cart_key};
use crate::types::Timestamp;
use crate::user::{Actor, Role, User};
use crate::utils;
use sled::transaction::abort;
use tracing::{debug, info};

pub struct CommerceService {
    store: Store,
    settings: Settings,
}

impl CommerceService {
    pub fn new(store: Store, settings: Settings) -> Self {
        Self { store, settings }
    }

    /// Register a user. Credential handling lives at the boundary, the
    /// record only carries what the order lifecycle needs.
    pub fn register_user(&self, username: &str, email: &str, role: Role) -> anyhow::Result<User> {
        let user = User::new(
            utils::mint_id(USER_HRP)?,
            username,
            email,
            role,
            Timestamp::now(),
        );
        self.store.put(&user.id, &user)?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub fn get_user(&self, user_id: &str) -> anyhow::Result<User> {
        self.store
            .get::<User>(user_id)?
            .ok_or_else(|| CommerceError::UserNotFound(user_id.to_owned()).into())
    }

    pub fn create_product(&self, draft: ProductDraft) -> anyhow::Result<Product> {
        let product = draft.build(utils::mint_id(PRODUCT_HRP)?, Timestamp::now())?;
        self.store.put(&product.id, &product)?;

        info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    pub fn get_product(&self, product_id: &str) -> anyhow::Result<Product> {
        self.store
            .get::<Product>(product_id)?
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_owned()).into())
    }

    pub fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let mut products = self.store.scan::<Product>(PRODUCT_HRP)?;
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    pub fn update_product(
        &self,
        product_id: &str,
        update: ProductUpdate,
    ) -> anyhow::Result<Product> {
        let mut product = self.get_product(product_id)?;
        product.apply(update)?;
        self.store.put(&product.id, &product)?;

        info!(product_id = %product.id, "product updated");
        Ok(product)
    }

    /// Delete a catalog entry. Historical order lines keep their snapshots;
    /// carts still holding the product fail the resolution step at
    /// placement.
    pub fn delete_product(&self, product_id: &str) -> anyhow::Result<()> {
        if !self.store.remove(product_id)? {
            return Err(CommerceError::ProductNotFound(product_id.to_owned()).into());
        }

        info!(product_id, "product deleted");
        Ok(())
    }

    /// Fetch the user's cart, creating it on first access.
    pub fn get_cart(&self, user_id: &str) -> anyhow::Result<Cart> {
        let key = cart_key(user_id);
        if let Some(cart) = self.store.get::<Cart>(&key)? {
            return Ok(cart);
        }

        let cart = Cart::new(user_id, Timestamp::now());
        self.store.put(&key, &cart)?;
        Ok(cart)
    }

    /// Add a product to the cart, merging with an existing line. The stock
    /// check covers the merged quantity.
    pub fn add_to_cart(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> anyhow::Result<Cart> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }

        let key = cart_key(user_id);
        let created = Timestamp::now();
        let cart = self.store.tx(|tx| {
            let product: Product = match store::tx_get(tx, product_id)? {
                Some(product) => product,
                None => return abort(CommerceError::ProductNotFound(product_id.to_owned()).into()),
            };
            let mut cart = store::tx_get::<Cart>(tx, &key)?
                .unwrap_or_else(|| Cart::new(user_id, created.clone()));

            let merged = cart.quantity_of(product_id).unwrap_or(0) + quantity;
            if let Err(err) = product.check_available(merged) {
                return abort(err.into());
            }

            cart.add(product_id, quantity);
            store::tx_put(tx, &key, &cart)?;
            Ok(cart)
        })?;

        debug!(user_id, product_id, quantity, "added to cart");
        Ok(cart)
    }

    /// Overwrite a cart line's quantity.
    pub fn update_cart_item(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> anyhow::Result<Cart> {
        if quantity == 0 {
            return Err(ValidationError::ZeroQuantity.into());
        }

        let key = cart_key(user_id);
        let cart = self.store.tx(|tx| {
            let mut cart: Cart = match store::tx_get(tx, &key)? {
                Some(cart) => cart,
                None => return abort(CommerceError::CartNotFound(user_id.to_owned()).into()),
            };
            if cart.quantity_of(product_id).is_none() {
                return abort(CommerceError::NotInCart(product_id.to_owned()).into());
            }
            let product: Product = match store::tx_get(tx, product_id)? {
                Some(product) => product,
                None => return abort(CommerceError::ProductNotFound(product_id.to_owned()).into()),
            };
            if let Err(err) = product.check_available(quantity) {
                return abort(err.into());
            }

            cart.set_quantity(product_id, quantity);
            store::tx_put(tx, &key, &cart)?;
            Ok(cart)
        })?;

        debug!(user_id, product_id, quantity, "cart item updated");
        Ok(cart)
    }

    pub fn remove_from_cart(&self, user_id: &str, product_id: &str) -> anyhow::Result<Cart> {
        let key = cart_key(user_id);
        let mut cart = self
            .store
            .get::<Cart>(&key)?
            .ok_or_else(|| CommerceError::CartNotFound(user_id.to_owned()))?;
        if !cart.remove(product_id) {
            return Err(CommerceError::NotInCart(product_id.to_owned()).into());
        }
        self.store.put(&key, &cart)?;

        debug!(user_id, product_id, "removed from cart");
        Ok(cart)
    }

    pub fn clear_cart(&self, user_id: &str) -> anyhow::Result<()> {
        let key = cart_key(user_id);
        let mut cart = self
            .store
            .get::<Cart>(&key)?
            .ok_or_else(|| CommerceError::CartNotFound(user_id.to_owned()))?;
        cart.clear();
        self.store.put(&key, &cart)?;

        debug!(user_id, "cart cleared");
        Ok(())
    }

    /// Place an order from the caller's cart. Stock checks, price
    /// snapshots, reservation and cart clearing commit as one transaction;
    /// a failure at any step leaves the store untouched.
    pub fn place_order(&self, user_id: &str) -> anyhow::Result<Order> {
        let key = cart_key(user_id);
        let order_id = utils::mint_id(ORDER_HRP)?;
        let placed_at = Timestamp::now();

        let order = self.store.tx(|tx| {
            let cart: Cart = match store::tx_get::<Cart>(tx, &key)? {
                Some(cart) if !cart.is_empty() => cart,
                _ => return abort(CommerceError::EmptyCart.into()),
            };

            // resolve and check every line before any mutation
            let mut products: Vec<Product> = Vec::with_capacity(cart.items().len());
            for item in cart.items() {
                let product: Product = match store::tx_get(tx, &item.product_id)? {
                    Some(product) => product,
                    None => {
                        return abort(
                            CommerceError::ProductNotFound(item.product_id.clone()).into(),
                        );
                    }
                };
                if let Err(err) = product.check_available(item.quantity) {
                    return abort(err.into());
                }
                products.push(product);
            }

            // snapshot the current prices into the order lines
            let items: Vec<OrderItem> = cart
                .items()
                .iter()
                .zip(&products)
                .map(|(item, product)| OrderItem {
                    product_id: product.id.clone(),
                    quantity: item.quantity,
                    price: product.price,
                })
                .collect();
            let order = Order::new(order_id.clone(), user_id, items, placed_at.clone());
            store::tx_put(tx, &order.id, &order)?;

            // reserve stock for every line
            for (item, mut product) in cart.items().iter().zip(products) {
                if let Err(err) = product.reserve(item.quantity) {
                    return abort(err.into());
                }
                store::tx_put(tx, &product.id, &product)?;
            }

            // the cart record stays, its items are gone
            let mut cart = cart;
            cart.clear();
            store::tx_put(tx, &key, &cart)?;

            Ok(order)
        })?;

        info!(order_id = %order.id, user_id, total = %order.total_amount, "order placed");
        Ok(order)
    }

    /// Orders newest first. Admins see everything, customers their own.
    pub fn list_orders(&self, actor: &Actor) -> anyhow::Result<Vec<Order>> {
        let mut orders = self.store.scan::<Order>(ORDER_HRP)?;
        if !actor.is_admin() {
            orders.retain(|order| order.user_id == actor.user_id);
        }
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    pub fn get_order(&self, order_id: &str, actor: &Actor) -> anyhow::Result<Order> {
        let order = self
            .store
            .get::<Order>(order_id)?
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_owned()))?;
        if !actor.can_access(&order.user_id) {
            return Err(CommerceError::Forbidden(order_id.to_owned()).into());
        }

        Ok(order)
    }

    /// Set an order's status. Any status may be set to any other; the
    /// transition table is deliberately open. Admin gating happens at the
    /// boundary.
    pub fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> anyhow::Result<Order> {
        let mut order = self
            .store
            .get::<Order>(order_id)?
            .ok_or_else(|| CommerceError::OrderNotFound(order_id.to_owned()))?;
        order.set_status(status);
        self.store.put(&order.id, &order)?;

        info!(order_id = %order.id, status = %status, "order status updated");
        Ok(order)
    }

    /// Cancel a pending order: restock every line, flip the status and
    /// count the cancellation against the owner, all in one transaction.
    /// When the owner's count passes the configured limit the cancellation
    /// still stands; the error only tells the caller the account is now
    /// flagged.
    pub fn cancel_order(&self, order_id: &str, actor: &Actor) -> anyhow::Result<()> {
        let cancellations = self.store.tx(|tx| {
            let mut order: Order = match store::tx_get(tx, order_id)? {
                Some(order) => order,
                None => return abort(CommerceError::OrderNotFound(order_id.to_owned()).into()),
            };
            if !actor.can_access(&order.user_id) {
                return abort(CommerceError::Forbidden(order_id.to_owned()).into());
            }
            if order.status != OrderStatus::Pending {
                return abort(CommerceError::NotCancellable(order.status).into());
            }

            for item in order.items() {
                // a product deleted since placement is skipped, the order
                // history matters more than the restock
                if let Some(mut product) = store::tx_get::<Product>(tx, &item.product_id)? {
                    product.restore(item.quantity);
                    store::tx_put(tx, &product.id, &product)?;
                }
            }

            order.set_status(OrderStatus::Cancelled);
            store::tx_put(tx, order_id, &order)?;

            let mut owner: User = match store::tx_get(tx, &order.user_id)? {
                Some(owner) => owner,
                None => return abort(CommerceError::UserNotFound(order.user_id.clone()).into()),
            };
            let cancellations = owner.record_cancellation();
            store::tx_put(tx, &owner.id, &owner)?;

            Ok(cancellations)
        })?;

        info!(order_id, cancellations, "order cancelled");

        if cancellations > self.settings.max_cancellations {
            // the cancellation above has already committed, only the caller
            // is stopped from here on
            return Err(CommerceError::AccountSuspended(cancellations).into());
        }

        Ok(())
    }
}
