use sqlx::PgConnection;

use kernel::interface::query::{PartnerQuery, UserQuery};
use kernel::prelude::entity::{PartnerId, UserId};
use kernel::KernelError;

use crate::database::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresAccountRepository;

#[async_trait::async_trait]
impl UserQuery for PostgresAccountRepository {
    type Transaction = PostgresTransaction;

    async fn exists(
        &self,
        con: &mut PostgresTransaction,
        id: &UserId,
    ) -> error_stack::Result<bool, KernelError> {
        PgAccountInternal::user_exists(con, id).await
    }
}

#[async_trait::async_trait]
impl PartnerQuery for PostgresAccountRepository {
    type Transaction = PostgresTransaction;

    async fn exists(
        &self,
        con: &mut PostgresTransaction,
        id: &PartnerId,
    ) -> error_stack::Result<bool, KernelError> {
        PgAccountInternal::partner_exists(con, id).await
    }
}

pub(in crate::database) struct PgAccountInternal;

impl PgAccountInternal {
    async fn user_exists(con: &mut PgConnection, id: &UserId) -> error_stack::Result<bool, KernelError> {
        sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()
    }

    async fn partner_exists(
        con: &mut PgConnection,
        id: &PartnerId,
    ) -> error_stack::Result<bool, KernelError> {
        sqlx::query_scalar::<_, bool>(
            // language=postgresql
            r#"
            SELECT EXISTS (SELECT 1 FROM partners WHERE id = $1)
            "#,
        )
        .bind(id.as_ref())
        .fetch_one(con)
        .await
        .convert_error()
    }
}
