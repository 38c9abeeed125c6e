//! Migration: salons with their services and counters.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::SalonOwners;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Salons::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Salons::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Salons::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Salons::Name).string().not_null())
                    .col(ColumnDef::new(Salons::Description).text().null())
                    .col(ColumnDef::new(Salons::Address).string().not_null())
                    .col(ColumnDef::new(Salons::City).string().not_null())
                    .col(ColumnDef::new(Salons::State).string().null())
                    .col(ColumnDef::new(Salons::ZipCode).string().null())
                    .col(ColumnDef::new(Salons::Phone).string().not_null())
                    .col(ColumnDef::new(Salons::Email).string().null())
                    .col(ColumnDef::new(Salons::Images).json_binary().not_null())
                    .col(ColumnDef::new(Salons::OperatingHours).json_binary().null())
                    .col(
                        ColumnDef::new(Salons::Status)
                            .string()
                            .not_null()
                            .default("PENDING_APPROVAL"),
                    )
                    .col(
                        ColumnDef::new(Salons::Rating)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Salons::TotalReviews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Salons::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Salons::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Salons::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_salons_owner")
                            .from(Salons::Table, Salons::OwnerId)
                            .to(SalonOwners::Table, SalonOwners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_salons_owner_id")
                    .table(Salons::Table)
                    .col(Salons::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Services::SalonId).uuid().not_null())
                    .col(ColumnDef::new(Services::Name).string().not_null())
                    .col(ColumnDef::new(Services::Description).text().null())
                    .col(ColumnDef::new(Services::Category).string().not_null())
                    .col(ColumnDef::new(Services::Price).double().not_null())
                    .col(ColumnDef::new(Services::Duration).integer().not_null())
                    .col(ColumnDef::new(Services::Images).json_binary().not_null())
                    .col(
                        ColumnDef::new(Services::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Services::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Services::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_salon")
                            .from(Services::Table, Services::SalonId)
                            .to(Salons::Table, Salons::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Counters::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Counters::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Counters::SalonId).uuid().not_null())
                    .col(ColumnDef::new(Counters::Name).string().not_null())
                    .col(ColumnDef::new(Counters::Code).string().null())
                    .col(
                        ColumnDef::new(Counters::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Counters::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Counters::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_counters_salon")
                            .from(Counters::Table, Counters::SalonId)
                            .to(Salons::Table, Salons::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Counters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Salons::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Salons {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    Address,
    City,
    State,
    ZipCode,
    Phone,
    Email,
    Images,
    OperatingHours,
    Status,
    Rating,
    TotalReviews,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub(super) enum Services {
    Table,
    Id,
    SalonId,
    Name,
    Description,
    Category,
    Price,
    Duration,
    Images,
    IsActive,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
pub(super) enum Counters {
    Table,
    Id,
    SalonId,
    Name,
    Code,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
