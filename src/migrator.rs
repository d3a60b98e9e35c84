use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_vendors_table::Migration),
            Box::new(m20240101_000002_create_purchase_orders_table::Migration),
            Box::new(m20240101_000003_create_performance_snapshots_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_vendors_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_vendors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Vendors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Vendors::VendorCode)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Vendors::Name).string().not_null())
                        .col(ColumnDef::new(Vendors::ContactDetails).text().not_null())
                        .col(ColumnDef::new(Vendors::Address).text().not_null())
                        .col(
                            ColumnDef::new(Vendors::OnTimeDeliveryRate)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::QualityRatingAvg)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::AverageResponseTime)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::FulfillmentRate)
                                .double()
                                .not_null()
                                .default(0.0),
                        )
                        .col(
                            ColumnDef::new(Vendors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Vendors::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Vendors::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum Vendors {
        Table,
        VendorCode,
        Name,
        ContactDetails,
        Address,
        OnTimeDeliveryRate,
        QualityRatingAvg,
        AverageResponseTime,
        FulfillmentRate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_purchase_orders_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_vendors_table::Vendors;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::PoNumber)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::VendorCode).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseOrders::OrderDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::DeliveryDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseOrders::Items).json().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Quantity).integer().not_null())
                        .col(ColumnDef::new(PurchaseOrders::Status).string().not_null())
                        .col(ColumnDef::new(PurchaseOrders::QualityRating).double().null())
                        .col(
                            ColumnDef::new(PurchaseOrders::IssueDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::AcknowledgmentDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_vendor")
                                .from(PurchaseOrders::Table, PurchaseOrders::VendorCode)
                                .to(Vendors::Table, Vendors::VendorCode)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_purchase_orders_vendor_code")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::VendorCode)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum PurchaseOrders {
        Table,
        PoNumber,
        VendorCode,
        OrderDate,
        DeliveryDate,
        Items,
        Quantity,
        Status,
        QualityRating,
        IssueDate,
        AcknowledgmentDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_performance_snapshots_table {
    use sea_orm_migration::prelude::*;

    use super::m20240101_000001_create_vendors_table::Vendors;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_performance_snapshots_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PerformanceSnapshots::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PerformanceSnapshots::Id)
                                .big_integer()
                                .primary_key()
                                .auto_increment()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PerformanceSnapshots::VendorCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PerformanceSnapshots::RecordedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PerformanceSnapshots::OnTimeDeliveryRate)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PerformanceSnapshots::QualityRatingAvg)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PerformanceSnapshots::AverageResponseTime)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PerformanceSnapshots::FulfillmentRate)
                                .double()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_performance_snapshots_vendor")
                                .from(
                                    PerformanceSnapshots::Table,
                                    PerformanceSnapshots::VendorCode,
                                )
                                .to(Vendors::Table, Vendors::VendorCode)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // One snapshot row per vendor; recalculation upserts in place.
            manager
                .create_index(
                    Index::create()
                        .name("idx_performance_snapshots_vendor_code")
                        .table(PerformanceSnapshots::Table)
                        .col(PerformanceSnapshots::VendorCode)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PerformanceSnapshots::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    pub enum PerformanceSnapshots {
        Table,
        Id,
        VendorCode,
        RecordedAt,
        OnTimeDeliveryRate,
        QualityRatingAvg,
        AverageResponseTime,
        FulfillmentRate,
    }
}
