//! Cash ledger schema.
//!
//! Creates the transactions table and the per-transaction denominations table.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SQLite only autoincrements an INTEGER PRIMARY KEY.
        let mut id = ColumnDef::new(Transactions::Id);
        if manager.get_database_backend() == DatabaseBackend::Sqlite {
            id.integer();
        } else {
            id.big_integer();
        }
        id.not_null().auto_increment().primary_key();

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(&mut id)
                    .col(ColumnDef::new(Transactions::TransactionDate).date().not_null())
                    .col(ColumnDef::new(Transactions::TransactionType).string_len(16).not_null())
                    .col(ColumnDef::new(Transactions::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Transactions::Summary).text().not_null().default(""))
                    .col(ColumnDef::new(Transactions::Memo).text().not_null().default(""))
                    .col(ColumnDef::new(Transactions::Recipient).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Transactions::RunningBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Canonical ledger order
        manager
            .create_index(
                Index::create()
                    .name("idx_transactions_date_id")
                    .table(Transactions::Table)
                    .col(Transactions::TransactionDate)
                    .col(Transactions::Id)
                    .to_owned(),
            )
            .await?;

        let mut denominations = Table::create();
        denominations
            .table(Denominations::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Denominations::TransactionId)
                    .big_integer()
                    .not_null()
                    .primary_key(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_denominations_transaction")
                    .from(Denominations::Table, Denominations::TransactionId)
                    .to(Transactions::Table, Transactions::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        for column in Denominations::COUNTS {
            denominations.col(ColumnDef::new(column).big_integer().not_null().default(0));
        }
        manager.create_table(denominations.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Denominations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Transactions {
    Table,
    Id,
    TransactionDate,
    TransactionType,
    Amount,
    Summary,
    Memo,
    Recipient,
    RunningBalance,
}

#[derive(DeriveIden, Clone, Copy)]
enum Denominations {
    Table,
    TransactionId,
    #[sea_orm(iden = "count_10000")]
    Count10000,
    #[sea_orm(iden = "count_5000")]
    Count5000,
    #[sea_orm(iden = "count_1000")]
    Count1000,
    #[sea_orm(iden = "count_500")]
    Count500,
    #[sea_orm(iden = "count_100")]
    Count100,
    #[sea_orm(iden = "count_50")]
    Count50,
    #[sea_orm(iden = "count_10")]
    Count10,
    #[sea_orm(iden = "count_5")]
    Count5,
    #[sea_orm(iden = "count_1")]
    Count1,
}

impl Denominations {
    const COUNTS: [Self; 9] = [
        Self::Count10000,
        Self::Count5000,
        Self::Count1000,
        Self::Count500,
        Self::Count100,
        Self::Count50,
        Self::Count10,
        Self::Count5,
        Self::Count1,
    ];
}
