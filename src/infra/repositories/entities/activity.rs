//! Activity database entity for SeaORM.

use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

use crate::domain::{Activity, ActivityStatus, Creator};
use crate::errors::{AppError, AppResult};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: String,
    pub location: String,
    pub max_participants: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub cost: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub qualifications: Option<String>,
    pub image_url: Option<String>,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub creator_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::manager::Entity",
        from = "Column::CreatorId",
        to = "super::manager::Column::Id"
    )]
    Manager,
}

impl Related<super::manager::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Manager.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to a domain entity given the joined creator row.
    ///
    /// The creator is a non-null foreign key; a missing row means the store
    /// itself is inconsistent.
    pub fn into_domain(self, creator: Option<super::manager::Model>) -> AppResult<Activity> {
        let creator = creator.ok_or_else(|| {
            AppError::internal(format!("activity {} has no creator row", self.id))
        })?;

        Ok(Activity {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            location: self.location,
            max_participants: self.max_participants,
            cost: self.cost,
            qualifications: self.qualifications,
            image_url: self.image_url,
            start_time: self.start_time,
            end_time: self.end_time,
            status: ActivityStatus::from(self.status.as_str()),
            rejection_reason: self.rejection_reason,
            creator: Creator {
                id: creator.id,
                name: creator.name,
                email: creator.email,
            },
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
