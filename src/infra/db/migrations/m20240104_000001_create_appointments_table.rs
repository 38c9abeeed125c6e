//! Migration: appointments, with partial unique indexes guarding every
//! occupied staff and counter slot.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240102_000001_create_salons_table::{Counters, Salons, Services};
use super::m20240103_000001_create_staff_table::Staff;

/// One active appointment per (salon, counter, date, start time).
pub const COUNTER_SLOT_INDEX: &str = "uq_appointments_counter_slot";
/// One active appointment per (staff, date, start time).
pub const STAFF_SLOT_INDEX: &str = "uq_appointments_staff_slot";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Appointments::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Appointments::SalonId).uuid().not_null())
                    .col(ColumnDef::new(Appointments::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(Appointments::StaffId).uuid().not_null())
                    .col(ColumnDef::new(Appointments::CounterId).uuid().not_null())
                    .col(ColumnDef::new(Appointments::AppointmentDate).date().not_null())
                    .col(ColumnDef::new(Appointments::StartTime).string().not_null())
                    .col(
                        ColumnDef::new(Appointments::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Appointments::Notes).text().null())
                    .col(ColumnDef::new(Appointments::CancellationReason).text().null())
                    .col(
                        ColumnDef::new(Appointments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_customer")
                            .from(Appointments::Table, Appointments::CustomerId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_salon")
                            .from(Appointments::Table, Appointments::SalonId)
                            .to(Salons::Table, Salons::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_service")
                            .from(Appointments::Table, Appointments::ServiceId)
                            .to(Services::Table, Services::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_staff")
                            .from(Appointments::Table, Appointments::StaffId)
                            .to(Staff::Table, Staff::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_counter")
                            .from(Appointments::Table, Appointments::CounterId)
                            .to(Counters::Table, Counters::Id),
                    )
                    .to_owned(),
            )
            .await?;

        for (name, column) in [
            ("idx_appointments_customer_id", Appointments::CustomerId),
            ("idx_appointments_salon_id", Appointments::SalonId),
            ("idx_appointments_staff_id", Appointments::StaffId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(Appointments::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        // Partial indexes are not expressible through the schema builder;
        // the statement is identical on Postgres and SQLite.
        let db = manager.get_connection();
        db.execute_unprepared(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {COUNTER_SLOT_INDEX} \
             ON appointments (salon_id, counter_id, appointment_date, start_time) \
             WHERE status IN ('PENDING', 'CONFIRMED')"
        ))
        .await?;
        db.execute_unprepared(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {STAFF_SLOT_INDEX} \
             ON appointments (staff_id, appointment_date, start_time) \
             WHERE status IN ('PENDING', 'CONFIRMED')"
        ))
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub(super) enum Appointments {
    Table,
    Id,
    CustomerId,
    SalonId,
    ServiceId,
    StaffId,
    CounterId,
    AppointmentDate,
    StartTime,
    Status,
    Notes,
    CancellationReason,
    CreatedAt,
    UpdatedAt,
}
