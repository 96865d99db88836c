use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::models::user::{NewUser, User, UserType};
use crate::store::{StoreError, UserStore};

const SELECT_BY_EMAIL: &str = "SELECT id, email, password_hash, user_type, first_name, last_name, phone \
     FROM users WHERE email = $1";

const INSERT_USER: &str = "INSERT INTO users (email, password_hash, user_type, first_name, last_name, phone) \
     VALUES ($1, $2, $3, $4, $5, $6) \
     RETURNING id, email, password_hash, user_type, first_name, last_name, phone";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(|err| StoreError::Backend(format!("failed to connect: {err}")))?;

        Ok(Self::new(pool))
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    user_type: String,
    first_name: String,
    last_name: String,
    phone: Option<String>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_type: UserType = row.user_type.parse().map_err(StoreError::Backend)?;

        Ok(User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            user_type,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
        })
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StoreError::Backend(err.to_string()))?
            .map(User::try_from)
            .transpose()
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(INSERT_USER)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(new_user.user_type.as_str())
            .bind(&new_user.first_name)
            .bind(&new_user.last_name)
            .bind(&new_user.phone)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| match &err {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::DuplicateEmail
                }
                _ => StoreError::Backend(err.to_string()),
            })?;

        row.try_into()
    }
}
