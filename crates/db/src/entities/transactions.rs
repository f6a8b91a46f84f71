//! `SeaORM` Entity for transactions table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub transaction_date: Date,
    /// `deposit` or `withdrawal`.
    pub transaction_type: String,
    pub amount: i64,
    pub summary: String,
    pub memo: String,
    pub recipient: String,
    pub running_balance: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::denominations::Entity")]
    Denominations,
}

impl Related<super::denominations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Denominations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
