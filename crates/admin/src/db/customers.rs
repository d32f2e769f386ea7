//! Customer repository: account management and admin credential lookup.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use animart_core::{Email, Pagination, UserId, UserRole};

use super::RepositoryError;
use crate::models::Customer;

const CUSTOMER_COLUMNS: &str = r"
    u.id, u.email, u.first_name, u.last_name, u.role, u.is_active,
    u.loyalty_points, u.total_spent, u.last_login_at, u.created_at,
    (SELECT COUNT(*) FROM shop.shop_order o WHERE o.user_id = u.id) AS orders_count
";

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: i32,
    email: String,
    first_name: String,
    last_name: String,
    role: UserRole,
    is_active: bool,
    loyalty_points: i32,
    total_spent: Decimal,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    orders_count: i64,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email for user {}: {e}", row.id))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            first_name: row.first_name,
            last_name: row.last_name,
            role: row.role,
            is_active: row.is_active,
            loyalty_points: row.loyalty_points,
            total_spent: row.total_spent,
            orders_count: row.orders_count,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
        })
    }
}

/// One entry in a customer's activity feed.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityEvent {
    /// One of `registration`, `login`, `order`, `wishlist`.
    pub kind: String,
    pub at: DateTime<Utc>,
    /// Order number or product name, depending on the kind.
    pub detail: Option<String>,
}

/// Stored credentials for an admin sign-in attempt.
#[derive(Debug)]
pub struct AdminCredentials {
    pub id: UserId,
    pub email: Email,
    pub role: UserRole,
    pub is_active: bool,
    pub password_hash: String,
}

/// Filters accepted by the customer listing.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Case-insensitive substring over email, first name, and last name.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub page: u32,
    pub limit: u32,
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &CustomerFilter) {
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        qb.push(" AND (u.email ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.first_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR u.last_name ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(is_active) = filter.is_active {
        qb.push(" AND u.is_active = ").push_bind(is_active);
    }
}

/// Repository for customer management.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List customers, newest first, with order aggregates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails, or
    /// `RepositoryError::DataCorruption` for an unparseable stored email.
    pub async fn list(
        &self,
        filter: &CustomerFilter,
    ) -> Result<(Vec<Customer>, Pagination), RepositoryError> {
        let mut count_qb = QueryBuilder::new("SELECT COUNT(*) FROM shop.shop_user u WHERE TRUE");
        push_filters(&mut count_qb, filter);
        let total: i64 = count_qb.build_query_scalar().fetch_one(self.pool).await?;

        let pagination = Pagination::new(
            u64::try_from(total).unwrap_or_default(),
            filter.page,
            filter.limit,
        );

        let mut qb = QueryBuilder::new(format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.shop_user u WHERE TRUE"
        ));
        push_filters(&mut qb, filter);
        qb.push(" ORDER BY u.created_at DESC, u.id DESC");
        qb.push(" LIMIT ")
            .push_bind(i64::from(pagination.limit))
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let rows: Vec<CustomerRow> = qb.build_query_as().fetch_all(self.pool).await?;

        let customers = rows
            .into_iter()
            .map(Customer::try_from)
            .collect::<Result<_, _>>()?;

        Ok((customers, pagination))
    }

    /// Get a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: UserId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM shop.shop_user u WHERE u.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Activate or suspend a customer account.
    ///
    /// Suspension blocks sign-in; existing sessions lapse on expiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer does not exist.
    pub async fn set_active(
        &self,
        id: UserId,
        is_active: bool,
    ) -> Result<Customer, RepositoryError> {
        let result = sqlx::query("UPDATE shop.shop_user SET is_active = $2 WHERE id = $1")
            .bind(id)
            .bind(is_active)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        self.get(id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Recent activity for one customer, newest first, capped at `limit`.
    ///
    /// Merges their registration, last sign-in, orders, and wishlist adds
    /// into one feed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn activity(
        &self,
        id: UserId,
        limit: i64,
    ) -> Result<Vec<ActivityEvent>, RepositoryError> {
        let rows = sqlx::query_as::<_, ActivityEvent>(
            "SELECT 'registration' AS kind, u.created_at AS at, NULL::text AS detail
             FROM shop.shop_user u WHERE u.id = $1
             UNION ALL
             SELECT 'login', u.last_login_at, NULL
             FROM shop.shop_user u WHERE u.id = $1 AND u.last_login_at IS NOT NULL
             UNION ALL
             SELECT 'order', o.created_at, o.order_number
             FROM shop.shop_order o WHERE o.user_id = $1
             UNION ALL
             SELECT 'wishlist', w.added_at, p.name
             FROM shop.wishlist_item w
             JOIN shop.product p ON p.id = w.product_id
             WHERE w.user_id = $1
             ORDER BY at DESC
             LIMIT $2",
        )
        .bind(id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Look up stored credentials by email for an admin sign-in.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<AdminCredentials>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct CredRow {
            id: i32,
            email: String,
            role: UserRole,
            is_active: bool,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, CredRow>(
            "SELECT id, email, role, is_active, password_hash
             FROM shop.shop_user WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let email = Email::parse(&r.email).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email for user {}: {e}", r.id))
            })?;
            Ok(AdminCredentials {
                id: UserId::new(r.id),
                email,
                role: r.role,
                is_active: r.is_active,
                password_hash: r.password_hash,
            })
        })
        .transpose()
    }
}
