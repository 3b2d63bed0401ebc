//! Activity repository: persistence and query operations for activities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Condition, Expr, Func};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::activity::{self, ActiveModel, Entity as ActivityEntity};
use super::entities::manager::Entity as ManagerEntity;
use crate::domain::{Activity, ActivityStatus};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Activity repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Persist a new activity; the store assigns the id
    async fn insert(&self, activity: Activity) -> AppResult<Activity>;

    /// Persist the current state of an existing activity
    async fn save(&self, activity: &Activity) -> AppResult<Activity>;

    /// Find activity by id, with its creator
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Activity>>;

    /// Permanently remove an activity
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Find all activities in a given status
    async fn find_by_status(&self, status: ActivityStatus) -> AppResult<Vec<Activity>>;

    /// All published activities, newest start time first
    async fn find_all_published(&self) -> AppResult<Vec<Activity>>;

    /// All activities awaiting review, oldest submission first
    async fn find_all_pending_review(&self) -> AppResult<Vec<Activity>>;

    /// Activities created by a given manager
    async fn find_by_creator(&self, creator_id: Uuid) -> AppResult<Vec<Activity>>;

    /// Activities created by a given manager in a given status
    async fn find_by_creator_and_status(
        &self,
        creator_id: Uuid,
        status: ActivityStatus,
    ) -> AppResult<Vec<Activity>>;

    /// Activities in a category and status
    async fn find_by_category_and_status(
        &self,
        category: &str,
        status: ActivityStatus,
    ) -> AppResult<Vec<Activity>>;

    /// Case-insensitive keyword search over title/description, published only
    async fn search_published(&self, keyword: &str) -> AppResult<Vec<Activity>>;

    /// Published activities whose end time has passed (sweep input)
    async fn find_published_past_end_time(&self, now: DateTime<Utc>)
        -> AppResult<Vec<Activity>>;

    /// Count activities in a given status
    async fn count_by_status(&self, status: ActivityStatus) -> AppResult<u64>;
}

/// Concrete implementation of ActivityRepository over SeaORM
pub struct ActivityStore {
    db: DatabaseConnection,
}

impl ActivityStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn collect(rows: Vec<(activity::Model, Option<super::entities::manager::Model>)>) -> AppResult<Vec<Activity>> {
        rows.into_iter()
            .map(|(model, creator)| model.into_domain(creator))
            .collect()
    }

    fn active_model(activity: &Activity) -> ActiveModel {
        ActiveModel {
            id: Set(activity.id),
            title: Set(activity.title.clone()),
            description: Set(activity.description.clone()),
            category: Set(activity.category.clone()),
            location: Set(activity.location.clone()),
            max_participants: Set(activity.max_participants),
            cost: Set(activity.cost),
            qualifications: Set(activity.qualifications.clone()),
            image_url: Set(activity.image_url.clone()),
            start_time: Set(activity.start_time),
            end_time: Set(activity.end_time),
            status: Set(activity.status.as_str().to_string()),
            rejection_reason: Set(activity.rejection_reason.clone()),
            creator_id: Set(activity.creator.id),
            created_at: Set(activity.created_at),
            updated_at: Set(activity.updated_at),
        }
    }
}

#[async_trait]
impl ActivityRepository for ActivityStore {
    async fn insert(&self, activity: Activity) -> AppResult<Activity> {
        let mut model = Self::active_model(&activity);
        model.id = NotSet;

        let inserted = model.insert(&self.db).await?;

        let mut created = activity;
        created.id = inserted.id;
        Ok(created)
    }

    async fn save(&self, activity: &Activity) -> AppResult<Activity> {
        if activity.id == 0 {
            return Err(AppError::internal("cannot save an activity that was never inserted"));
        }

        let model = Self::active_model(activity);
        model.update(&self.db).await?;

        Ok(activity.clone())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Activity>> {
        let row = ActivityEntity::find_by_id(id)
            .find_also_related(ManagerEntity)
            .one(&self.db)
            .await?;

        row.map(|(model, creator)| model.into_domain(creator))
            .transpose()
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        let result = ActivityEntity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn find_by_status(&self, status: ActivityStatus) -> AppResult<Vec<Activity>> {
        let rows = ActivityEntity::find()
            .filter(activity::Column::Status.eq(status.as_str()))
            .find_also_related(ManagerEntity)
            .all(&self.db)
            .await?;

        Self::collect(rows)
    }

    async fn find_all_published(&self) -> AppResult<Vec<Activity>> {
        let rows = ActivityEntity::find()
            .filter(activity::Column::Status.eq(ActivityStatus::Published.as_str()))
            .order_by_desc(activity::Column::StartTime)
            .find_also_related(ManagerEntity)
            .all(&self.db)
            .await?;

        Self::collect(rows)
    }

    async fn find_all_pending_review(&self) -> AppResult<Vec<Activity>> {
        let rows = ActivityEntity::find()
            .filter(activity::Column::Status.eq(ActivityStatus::PendingReview.as_str()))
            .order_by_asc(activity::Column::CreatedAt)
            .find_also_related(ManagerEntity)
            .all(&self.db)
            .await?;

        Self::collect(rows)
    }

    async fn find_by_creator(&self, creator_id: Uuid) -> AppResult<Vec<Activity>> {
        let rows = ActivityEntity::find()
            .filter(activity::Column::CreatorId.eq(creator_id))
            .order_by_desc(activity::Column::CreatedAt)
            .find_also_related(ManagerEntity)
            .all(&self.db)
            .await?;

        Self::collect(rows)
    }

    async fn find_by_creator_and_status(
        &self,
        creator_id: Uuid,
        status: ActivityStatus,
    ) -> AppResult<Vec<Activity>> {
        let rows = ActivityEntity::find()
            .filter(activity::Column::CreatorId.eq(creator_id))
            .filter(activity::Column::Status.eq(status.as_str()))
            .order_by_desc(activity::Column::CreatedAt)
            .find_also_related(ManagerEntity)
            .all(&self.db)
            .await?;

        Self::collect(rows)
    }

    async fn find_by_category_and_status(
        &self,
        category: &str,
        status: ActivityStatus,
    ) -> AppResult<Vec<Activity>> {
        let rows = ActivityEntity::find()
            .filter(activity::Column::Category.eq(category))
            .filter(activity::Column::Status.eq(status.as_str()))
            .order_by_desc(activity::Column::StartTime)
            .find_also_related(ManagerEntity)
            .all(&self.db)
            .await?;

        Self::collect(rows)
    }

    async fn search_published(&self, keyword: &str) -> AppResult<Vec<Activity>> {
        let pattern = format!("%{}%", keyword.to_lowercase());

        let rows = ActivityEntity::find()
            .filter(activity::Column::Status.eq(ActivityStatus::Published.as_str()))
            .filter(
                Condition::any()
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            ActivityEntity,
                            activity::Column::Title,
                        ))))
                        .like(pattern.as_str()),
                    )
                    .add(
                        Expr::expr(Func::lower(Expr::col((
                            ActivityEntity,
                            activity::Column::Description,
                        ))))
                        .like(pattern.as_str()),
                    ),
            )
            .order_by_desc(activity::Column::StartTime)
            .find_also_related(ManagerEntity)
            .all(&self.db)
            .await?;

        Self::collect(rows)
    }

    async fn find_published_past_end_time(
        &self,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<Activity>> {
        let rows = ActivityEntity::find()
            .filter(activity::Column::Status.eq(ActivityStatus::Published.as_str()))
            .filter(activity::Column::EndTime.lt(now))
            .find_also_related(ManagerEntity)
            .all(&self.db)
            .await?;

        Self::collect(rows)
    }

    async fn count_by_status(&self, status: ActivityStatus) -> AppResult<u64> {
        let count = ActivityEntity::find()
            .filter(activity::Column::Status.eq(status.as_str()))
            .count(&self.db)
            .await?;

        Ok(count)
    }
}
