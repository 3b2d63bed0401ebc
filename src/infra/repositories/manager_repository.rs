//! Manager repository: storage for the identity side of the system.
//!
//! Authentication itself happens at the boundary; this store backs the
//! boundary's lookups and the seed command.

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use super::entities::manager::{self, ActiveModel, Entity as ManagerEntity};
use crate::domain::User;
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Manager repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ManagerRepository: Send + Sync {
    /// Find manager by id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find manager by email address
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Persist a new manager
    async fn insert(&self, user: User) -> AppResult<User>;

    /// List all managers
    async fn list(&self) -> AppResult<Vec<User>>;

    /// Count stored managers
    async fn count(&self) -> AppResult<u64>;
}

/// Concrete implementation of ManagerRepository
pub struct ManagerStore {
    db: DatabaseConnection,
}

impl ManagerStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ManagerRepository for ManagerStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = ManagerEntity::find_by_id(id).one(&self.db).await?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = ManagerEntity::find()
            .filter(manager::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(result.map(User::from))
    }

    async fn insert(&self, user: User) -> AppResult<User> {
        let model = ActiveModel {
            id: Set(user.id),
            name: Set(user.name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            phone: Set(user.phone.clone()),
            role: Set(user.role.as_str().to_string()),
            position_title: Set(user.position_title.clone()),
            join_date: Set(user.join_date),
            admin_title: Set(user.admin_title.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };

        model.insert(&self.db).await?;
        Ok(user)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let models = ManagerEntity::find().all(&self.db).await?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        let count = ManagerEntity::find().count(&self.db).await?;
        Ok(count)
    }
}
