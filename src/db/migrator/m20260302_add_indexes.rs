use crate::entities::{prelude::*, registrations, workshops};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const IDX_REGISTRATIONS_USER: &str = "idx_registrations_user_id";
const IDX_REGISTRATIONS_WORKSHOP: &str = "idx_registrations_workshop_id";
const IDX_WORKSHOPS_CREATED: &str = "idx_workshops_created_at";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_REGISTRATIONS_USER)
                    .table(Registrations)
                    .col(registrations::Column::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_REGISTRATIONS_WORKSHOP)
                    .table(Registrations)
                    .col(registrations::Column::WorkshopId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(IDX_WORKSHOPS_CREATED)
                    .table(Workshops)
                    .col(workshops::Column::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_REGISTRATIONS_USER)
                    .table(Registrations)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_REGISTRATIONS_WORKSHOP)
                    .table(Registrations)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name(IDX_WORKSHOPS_CREATED)
                    .table(Workshops)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
