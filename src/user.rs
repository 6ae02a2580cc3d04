//! Users and the authenticated caller identity

use crate::types::Timestamp;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    #[n(0)]
    Admin,
    #[n(1)]
    Customer,
}

/// The fields of a user the order lifecycle needs. Credentials live at the
/// boundary and never reach this record.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq)]
pub struct User {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub username: String,
    #[n(2)]
    pub email: String,
    #[n(3)]
    pub role: Role,
    #[n(4)]
    pub order_cancellation_count: u32,
    #[n(5)]
    pub created_at: Timestamp,
}

impl User {
    pub fn new(
        id: String,
        username: impl Into<String>,
        email: impl Into<String>,
        role: Role,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            role,
            order_cancellation_count: 0,
            created_at,
        }
    }

    /// Count one more cancellation against this user. The counter only ever
    /// goes up. Returns the new total.
    pub fn record_cancellation(&mut self) -> u32 {
        self.order_cancellation_count += 1;
        self.order_cancellation_count
    }
}

/// The authenticated `(user, role)` pair handed in by the boundary for
/// every operation. The core trusts it and performs no credential checks of
/// its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn admin(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Admin)
    }

    pub fn customer(user_id: impl Into<String>) -> Self {
        Self::new(user_id, Role::Customer)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Admins see everything, customers only what they own.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_admin() || self.user_id == owner_id
    }
}
