//! MySQL store
//!
//! Plain `sqlx::query` with bound `?` parameters; rows are mapped through
//! `FromRow` structs and converted into domain types.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::{FromRow, MySql, Transaction};
use tunes_core::{
    ContactInquiry, NewContactInquiry, NewOrder, Order, OrderId, OrderStatus, Payment,
    PaymentStatus, User,
};

use crate::error::{Result, StoreError};
use crate::{OrderStore, SettleOutcome, Settlement};

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, customer_mobile, song_language, \
     song_description, package_name, package_price, gateway_order_id, gateway_payment_id, \
     order_status, created_at, updated_at";

#[derive(FromRow)]
struct OrderRow {
    id: i64,
    customer_name: String,
    customer_email: String,
    customer_mobile: String,
    song_language: String,
    song_description: String,
    package_name: String,
    package_price: Decimal,
    gateway_order_id: Option<String>,
    gateway_payment_id: Option<String>,
    order_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> Result<Self> {
        let status = OrderStatus::parse(&row.order_status)
            .map_err(|e| StoreError::Corrupt(format!("order {}: {e}", row.id)))?;
        Ok(Order {
            id: OrderId::new(row.id),
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            customer_mobile: row.customer_mobile,
            song_language: row.song_language,
            song_description: row.song_description,
            package_name: row.package_name,
            package_price: row.package_price,
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct PaymentRow {
    payment_id: String,
    gateway_order_id: String,
    amount: Decimal,
    payment_method: String,
    created_at: DateTime<Utc>,
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Payment {
            payment_id: row.payment_id,
            gateway_order_id: row.gateway_order_id,
            amount: row.amount,
            status: PaymentStatus::Captured,
            method: row.payment_method,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

/// MySQL-backed store
#[derive(Clone)]
pub struct MySqlOrderStore {
    pool: MySqlPool,
}

impl MySqlOrderStore {
    /// Wrap an existing pool
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connect with a bounded pool
    pub async fn connect(options: MySqlConnectOptions) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;
        Ok(Self::new(pool))
    }

    /// Apply embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn lock_order(tx: &mut Transaction<'_, MySql>, id: OrderId) -> Result<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? FOR UPDATE"))
                .bind(id.get())
                .fetch_optional(&mut **tx)
                .await?;
        row.map(Order::try_from).transpose()
    }

    async fn apply_settlement(
        tx: &mut Transaction<'_, MySql>,
        settlement: &Settlement,
    ) -> Result<SettleOutcome> {
        let order = Self::lock_order(tx, settlement.order_id)
            .await?
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
        let updated = sqlx::query(
            r#"
            UPDATE orders
            SET gateway_payment_id = ?, order_status = 'Paid', updated_at = ?
            WHERE id = ? AND gateway_order_id = ? AND order_status = 'Pending'
            "#,
        )
        .bind(&settlement.gateway_payment_id)
        .bind(now)
        .bind(order.id.get())
        .bind(&settlement.gateway_order_id)
        .execute(&mut **tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(StoreError::GatewayOrderMismatch(order.id));
        }

        // uq_users_email decides; a concurrent insert of the same email is skipped
        let user_inserted =
            sqlx::query("INSERT IGNORE INTO users (username, email, created_at) VALUES (?, ?, ?)")
                .bind(&order.customer_name)
                .bind(&order.customer_email)
                .bind(now)
                .execute(&mut **tx)
                .await?;

        if user_inserted.rows_affected() > 0 {
            tracing::info!(email = %order.customer_email, "New user inserted");
        }

        sqlx::query(
            r#"
            INSERT INTO payments (payment_id, gateway_order_id, amount, status, payment_method, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&settlement.gateway_payment_id)
        .bind(&settlement.gateway_order_id)
        .bind(order.package_price)
        .bind(PaymentStatus::Captured.as_str())
        .bind(&settlement.method)
        .bind(now)
        .execute(&mut **tx)
        .await?;

        let mut paid = order;
        paid.gateway_payment_id = Some(settlement.gateway_payment_id.clone());
        paid.status = OrderStatus::Paid;
        paid.updated_at = now;
        Ok(SettleOutcome::Settled(paid))
    }
}

#[async_trait]
impl OrderStore for MySqlOrderStore {
    async fn insert_order(&self, order: NewOrder) -> Result<Order> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO orders
            (customer_name, customer_email, customer_mobile, song_language, song_description,
             package_name, package_price, order_status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, 'Pending', ?, ?)
            "#,
        )
        .bind(&order.customer_name)
        .bind(&order.customer_email)
        .bind(&order.customer_mobile)
        .bind(&order.song_language)
        .bind(&order.song_description)
        .bind(&order.package_name)
        .bind(order.package_price)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| StoreError::Corrupt("order id out of range".into()))?;
        Ok(Order::from_new(OrderId::new(id), order, now))
    }

    async fn attach_gateway_order(&self, id: OrderId, gateway_order_id: &str) -> Result<()> {
        let result = sqlx::query("UPDATE orders SET gateway_order_id = ?, updated_at = ? WHERE id = ?")
            .bind(gateway_order_id)
            .bind(Utc::now())
            .bind(id.get())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::OrderNotFound(id));
        }
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let row: Option<OrderRow> =
            sqlx::query_as(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ? LIMIT 1"))
                .bind(id.get())
                .fetch_optional(&self.pool)
                .await?;
        row.map(Order::try_from).transpose()
    }

    async fn settle_payment(&self, settlement: &Settlement) -> Result<SettleOutcome> {
        let mut tx = self.pool.begin().await?;

        match Self::apply_settlement(&mut tx, settlement).await {
            Ok(SettleOutcome::Settled(order)) => {
                tx.commit().await?;
                Ok(SettleOutcome::Settled(order))
            }
            Ok(replay @ SettleOutcome::AlreadySettled(_)) => {
                tx.rollback().await?;
                Ok(replay)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::error!(error = %rollback, "Settlement rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn get_user(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT username, email, created_at FROM users WHERE email = ? LIMIT 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|r| User {
            email: r.email,
            username: r.username,
            created_at: r.created_at,
        }))
    }

    async fn payments_for_gateway_order(&self, gateway_order_id: &str) -> Result<Vec<Payment>> {
        let rows: Vec<PaymentRow> = sqlx::query_as(
            r#"
            SELECT payment_id, gateway_order_id, amount, payment_method, created_at
            FROM payments WHERE gateway_order_id = ? ORDER BY id
            "#,
        )
        .bind(gateway_order_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    async fn insert_contact(&self, inquiry: NewContactInquiry) -> Result<ContactInquiry> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO contact_inquiries (sender_name, sender_email, subject, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&inquiry.sender_name)
        .bind(&inquiry.sender_email)
        .bind(&inquiry.subject)
        .bind(&inquiry.message)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = i64::try_from(result.last_insert_id())
            .map_err(|_| StoreError::Corrupt("contact id out of range".into()))?;
        Ok(ContactInquiry {
            id,
            sender_name: inquiry.sender_name,
            sender_email: inquiry.sender_email,
            subject: inquiry.subject,
            message: inquiry.message,
            created_at: now,
        })
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    fn name(&self) -> &str {
        "mysql"
    }
}

// These need a MySQL server: `DATABASE_URL=mysql://... cargo test -- --ignored`
#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_order(email: &str) -> NewOrder {
        NewOrder {
            customer_name: "A".into(),
            customer_email: email.into(),
            customer_mobile: "999".into(),
            song_language: "English".into(),
            song_description: "d".into(),
            package_name: "Premium".into(),
            package_price: dec!(999),
        }
    }

    fn settlement(order_id: OrderId, gateway_order_id: &str, payment_id: &str) -> Settlement {
        Settlement {
            order_id,
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: payment_id.into(),
            method: "upi".into(),
        }
    }

    async fn pending_order(store: &MySqlOrderStore, email: &str, gateway_order_id: &str) -> Order {
        let order = store.insert_order(new_order(email)).await.unwrap();
        store.attach_gateway_order(order.id, gateway_order_id).await.unwrap();
        order
    }

    async fn count(pool: &MySqlPool, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_settle_marks_paid_and_records_everything(pool: MySqlPool) {
        let store = MySqlOrderStore::new(pool.clone());
        let order = pending_order(&store, "a@x.com", "order_GW1").await;

        let outcome = store.settle_payment(&settlement(order.id, "order_GW1", "pay_1")).await.unwrap();
        assert!(!outcome.is_replay());
        assert_eq!(outcome.order().status, OrderStatus::Paid);

        let stored = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Paid);
        assert_eq!(stored.gateway_payment_id.as_deref(), Some("pay_1"));

        let payments = store.payments_for_gateway_order("order_GW1").await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, dec!(999));
        assert_eq!(payments[0].method, "upi");

        let user = store.get_user("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.username, "A");
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_replay_writes_nothing(pool: MySqlPool) {
        let store = MySqlOrderStore::new(pool.clone());
        let order = pending_order(&store, "a@x.com", "order_GW1").await;

        store.settle_payment(&settlement(order.id, "order_GW1", "pay_1")).await.unwrap();
        let replay = store.settle_payment(&settlement(order.id, "order_GW1", "pay_1")).await.unwrap();

        assert!(replay.is_replay());
        assert_eq!(replay.order().gateway_payment_id.as_deref(), Some("pay_1"));
        assert_eq!(count(&pool, "payments").await, 1);
        assert_eq!(count(&pool, "users").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_second_payment_conflicts(pool: MySqlPool) {
        let store = MySqlOrderStore::new(pool.clone());
        let order = pending_order(&store, "a@x.com", "order_GW1").await;

        store.settle_payment(&settlement(order.id, "order_GW1", "pay_1")).await.unwrap();
        let result = store.settle_payment(&settlement(order.id, "order_GW1", "pay_2")).await;

        assert!(matches!(
            result,
            Err(StoreError::AlreadyPaid { ref payment_id, .. }) if payment_id == "pay_1"
        ));
        assert_eq!(count(&pool, "payments").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_gateway_order_mismatch_leaves_order_pending(pool: MySqlPool) {
        let store = MySqlOrderStore::new(pool.clone());
        let order = pending_order(&store, "a@x.com", "order_GW1").await;

        let result = store.settle_payment(&settlement(order.id, "order_OTHER", "pay_1")).await;
        assert!(matches!(result, Err(StoreError::GatewayOrderMismatch(_))));

        let stored = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.gateway_payment_id, None);
        assert_eq!(count(&pool, "payments").await, 0);
        assert_eq!(count(&pool, "users").await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_failed_payment_insert_rolls_back_order_and_user(pool: MySqlPool) {
        let store = MySqlOrderStore::new(pool.clone());
        let first = pending_order(&store, "a@x.com", "order_GW1").await;
        let second = pending_order(&store, "b@x.com", "order_GW2").await;

        store.settle_payment(&settlement(first.id, "order_GW1", "pay_1")).await.unwrap();

        // pay_1 is already recorded, so the payment insert hits uq_payments_payment_id
        let result = store.settle_payment(&settlement(second.id, "order_GW2", "pay_1")).await;
        assert!(matches!(result, Err(StoreError::Database(_))));

        let stored = store.get_order(second.id).await.unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Pending);
        assert_eq!(stored.gateway_payment_id, None);
        assert!(store.get_user("b@x.com").await.unwrap().is_none());
        assert_eq!(count(&pool, "payments").await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requires DATABASE_URL"]
    async fn test_repeat_customer_keeps_one_user(pool: MySqlPool) {
        let store = MySqlOrderStore::new(pool.clone());
        let first = pending_order(&store, "a@x.com", "order_GW1").await;
        let second = pending_order(&store, "a@x.com", "order_GW2").await;

        store.settle_payment(&settlement(first.id, "order_GW1", "pay_1")).await.unwrap();
        store.settle_payment(&settlement(second.id, "order_GW2", "pay_2")).await.unwrap();

        assert_eq!(count(&pool, "users").await, 1);
        assert_eq!(count(&pool, "payments").await, 2);
    }
}
