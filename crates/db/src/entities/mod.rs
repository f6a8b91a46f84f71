//! `SeaORM` entity definitions.

pub mod denominations;
pub mod transactions;

pub mod prelude {
    //! Entity re-exports.
    pub use super::denominations::Entity as Denominations;
    pub use super::transactions::Entity as Transactions;
}
