//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserCredentials, UserPersistenceError, UserRepository};
use crate::domain::{
    Email, Locality, PasswordDigest, PersonName, PhoneNumber, Pincode, Role, User, UserId,
    UserProfile, UserValidationError,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed user directory.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_connection_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation => UserPersistenceError::duplicate_email(),
        DieselFailure::ForeignKeyViolation => UserPersistenceError::query("foreign key violation"),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn corrupt_row(field: &str, error: UserValidationError) -> UserPersistenceError {
    UserPersistenceError::query(format!("stored user has invalid {field}: {error}"))
}

fn optional_locality(
    field: &str,
    value: Option<String>,
) -> Result<Option<Locality>, UserPersistenceError> {
    value
        .map(|raw| Locality::new(raw).map_err(|err| corrupt_row(field, err)))
        .transpose()
}

fn row_to_credentials(row: UserRow) -> Result<UserCredentials, UserPersistenceError> {
    let profile = UserProfile {
        first_name: PersonName::new(&row.first_name)
            .map_err(|err| corrupt_row("first_name", err))?,
        last_name: PersonName::new(&row.last_name)
            .map_err(|err| corrupt_row("last_name", err))?,
        phone: PhoneNumber::new(&row.phone).map_err(|err| corrupt_row("phone", err))?,
        pincode: Pincode::new(&row.pincode).map_err(|err| corrupt_row("pincode", err))?,
        address: row.address,
        city: optional_locality("city", row.city)?,
        state: optional_locality("state", row.state)?,
        country: optional_locality("country", row.country)?,
    };
    let email = Email::new(&row.email).map_err(|err| corrupt_row("email", err))?;
    let role = row
        .role
        .parse::<Role>()
        .map_err(|err| corrupt_row("role", err))?;
    let user = User::new(UserId::from(row.id), email, profile, role).with_active(row.is_active);
    Ok(UserCredentials {
        user,
        password_hash: PasswordDigest::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(
        &self,
        user: &User,
        password_hash: &PasswordDigest,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_connection_error)?;

        let profile = user.profile();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_str(),
            password_hash: password_hash.as_str(),
            first_name: profile.first_name.as_str(),
            last_name: profile.last_name.as_str(),
            phone: profile.phone.as_str(),
            pincode: profile.pincode.as_str(),
            address: profile.address.as_deref(),
            city: profile.city.as_ref().map(Locality::as_str),
            state: profile.state.as_ref().map(Locality::as_str),
            country: profile.country.as_ref().map(Locality::as_str),
            role: user.role().as_str(),
            is_active: user.is_active(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_connection_error)?;

        let row = users::table
            .filter(users::id.eq(*id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| row_to_credentials(row).map(|found| found.user))
            .transpose()
    }

    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(map_connection_error)?;

        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_credentials).transpose()
    }
}
