//! Migration: staff profiles and the services each member performs.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240102_000001_create_salons_table::{Salons, Services};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Staff::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Staff::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Staff::UserId).uuid().not_null())
                    .col(ColumnDef::new(Staff::SalonId).uuid().not_null())
                    .col(ColumnDef::new(Staff::Speciality).string().null())
                    .col(ColumnDef::new(Staff::Experience).integer().null())
                    .col(ColumnDef::new(Staff::Bio).text().null())
                    .col(
                        ColumnDef::new(Staff::Status)
                            .string()
                            .not_null()
                            .default("AVAILABLE"),
                    )
                    .col(ColumnDef::new(Staff::Rating).double().not_null().default(0.0))
                    .col(
                        ColumnDef::new(Staff::TotalReviews)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Staff::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Staff::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Staff::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_user")
                            .from(Staff::Table, Staff::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_salon")
                            .from(Staff::Table, Staff::SalonId)
                            .to(Salons::Table, Salons::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StaffServices::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(StaffServices::StaffId).uuid().not_null())
                    .col(ColumnDef::new(StaffServices::ServiceId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(StaffServices::StaffId)
                            .col(StaffServices::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_services_staff")
                            .from(StaffServices::Table, StaffServices::StaffId)
                            .to(Staff::Table, Staff::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_staff_services_service")
                            .from(StaffServices::Table, StaffServices::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaffServices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Staff::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Staff {
    Table,
    Id,
    UserId,
    SalonId,
    Speciality,
    Experience,
    Bio,
    Status,
    Rating,
    TotalReviews,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(Iden)]
enum StaffServices {
    Table,
    StaffId,
    ServiceId,
}
