//! In-memory store (for development and tests)

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tunes_core::{
    ContactInquiry, NewContactInquiry, NewOrder, Order, OrderId, OrderStatus, Payment,
    PaymentStatus, User,
};

use crate::error::{Result, StoreError};
use crate::{OrderStore, SettleOutcome, Settlement};

#[derive(Default)]
struct Tables {
    next_order_id: i64,
    next_contact_id: i64,
    orders: HashMap<OrderId, Order>,
    payments: Vec<Payment>,
    users: HashMap<String, User>,
    contacts: Vec<ContactInquiry>,
}

/// In-memory store
///
/// All tables sit behind one lock, so a settlement is applied in full or not
/// at all, matching the transactional backend.
#[derive(Default)]
pub struct MemoryOrderStore {
    tables: Mutex<Tables>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored payments (all orders)
    pub async fn payment_count(&self) -> usize {
        self.tables.lock().await.payments.len()
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }

    /// Stored contact inquiries, oldest first
    pub async fn contacts(&self) -> Vec<ContactInquiry> {
        self.tables.lock().await.contacts.clone()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert_order(&self, order: NewOrder) -> Result<Order> {
        let mut tables = self.tables.lock().await;
        tables.next_order_id += 1;
        let id = OrderId::new(tables.next_order_id);

        let order = Order::from_new(id, order, Utc::now());
        tables.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn attach_gateway_order(&self, id: OrderId, gateway_order_id: &str) -> Result<()> {
        let mut tables = self.tables.lock().await;
        let order = tables.orders.get_mut(&id).ok_or(StoreError::OrderNotFound(id))?;
        order.gateway_order_id = Some(gateway_order_id.to_owned());
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        Ok(self.tables.lock().await.orders.get(&id).cloned())
    }

    async fn settle_payment(&self, settlement: &Settlement) -> Result<SettleOutcome> {
        let mut tables = self.tables.lock().await;

        let order = tables
            .orders
            .get(&settlement.order_id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(settlement.order_id))?;

        if order.gateway_order_id.as_deref() != Some(settlement.gateway_order_id.as_str()) {
            return Err(StoreError::GatewayOrderMismatch(order.id));
        }

        if order.is_paid() {
            if order.is_settled_by(&settlement.gateway_payment_id) {
                return Ok(SettleOutcome::AlreadySettled(order));
            }
            return Err(StoreError::AlreadyPaid {
                order_id: order.id,
                payment_id: order.gateway_payment_id.unwrap_or_default(),
            });
        }

        let now = Utc::now();
        let mut paid = order;
        paid.gateway_payment_id = Some(settlement.gateway_payment_id.clone());
        paid.status = OrderStatus::Paid;
        paid.updated_at = now;

        if !tables.users.contains_key(&paid.customer_email) {
            tables.users.insert(
                paid.customer_email.clone(),
                User {
                    email: paid.customer_email.clone(),
                    username: paid.customer_name.clone(),
                    created_at: now,
                },
            );
        }

        tables.payments.push(Payment {
            payment_id: settlement.gateway_payment_id.clone(),
            gateway_order_id: settlement.gateway_order_id.clone(),
            amount: paid.package_price,
            status: PaymentStatus::Captured,
            method: settlement.method.clone(),
            created_at: now,
        });
        tables.orders.insert(paid.id, paid.clone());

        Ok(SettleOutcome::Settled(paid))
    }

    async fn get_user(&self, email: &str) -> Result<Option<User>> {
        Ok(self.tables.lock().await.users.get(email).cloned())
    }

    async fn payments_for_gateway_order(&self, gateway_order_id: &str) -> Result<Vec<Payment>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .payments
            .iter()
            .filter(|p| p.gateway_order_id == gateway_order_id)
            .cloned()
            .collect())
    }

    async fn insert_contact(&self, inquiry: NewContactInquiry) -> Result<ContactInquiry> {
        let mut tables = self.tables.lock().await;
        tables.next_contact_id += 1;

        let stored = ContactInquiry {
            id: tables.next_contact_id,
            sender_name: inquiry.sender_name,
            sender_email: inquiry.sender_email,
            subject: inquiry.subject,
            message: inquiry.message,
            created_at: Utc::now(),
        };
        tables.contacts.push(stored.clone());
        Ok(stored)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "memory"
    }
}
