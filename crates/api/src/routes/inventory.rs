//! Inventory routes: what the box should hold, and how a physical count
//! compares to it.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use cashbox_core::cash::DenominationBreakdown;
use cashbox_core::ledger::{CountDifference, InventorySnapshot, LedgerRepository};
use cashbox_core::transfer::{InventoryRow, export_inventory};
use serde::Serialize;

use crate::{AppState, error::ApiError};

/// Creates the inventory routes.
pub fn routes<R: LedgerRepository>() -> Router<AppState<R>> {
    Router::new()
        .route("/inventory", get(get_inventory::<R>))
        .route("/inventory/count", post(count_inventory::<R>))
}

/// Response for the current inventory.
#[derive(Debug, Serialize)]
pub struct InventoryResponse {
    /// Denomination set the counts refer to.
    pub set_version: u32,
    /// One row per denomination, highest value first.
    pub denominations: Vec<InventoryRow>,
    /// Face value of everything in the box.
    pub total_value: i64,
    /// Face values whose net count is negative.
    pub shortfalls: Vec<u32>,
}

impl From<&InventorySnapshot> for InventoryResponse {
    fn from(snapshot: &InventorySnapshot) -> Self {
        Self {
            set_version: snapshot.set_version(),
            denominations: export_inventory(snapshot),
            total_value: snapshot.total_value(),
            shortfalls: snapshot.shortfalls().iter().map(|d| d.value()).collect(),
        }
    }
}

/// One denomination whose physical count disagrees.
#[derive(Debug, Serialize)]
pub struct Discrepancy {
    /// Face value.
    pub denomination: u32,
    /// Counted minus expected pieces.
    pub difference: i64,
}

/// Response for a physical count.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// True when every denomination matches.
    pub balanced: bool,
    /// Counted minus expected value.
    pub value_difference: i64,
    /// Denominations that disagree.
    pub discrepancies: Vec<Discrepancy>,
    /// The inventory the count was compared against.
    pub expected: InventoryResponse,
}

impl CountResponse {
    fn new(difference: &CountDifference, expected: &InventorySnapshot) -> Self {
        Self {
            balanced: difference.is_balanced(),
            value_difference: difference.value(),
            discrepancies: difference
                .discrepancies()
                .into_iter()
                .map(|(d, diff)| Discrepancy {
                    denomination: d.value(),
                    difference: diff,
                })
                .collect(),
            expected: expected.into(),
        }
    }
}

/// GET `/inventory` - Current inventory derived from the full history.
async fn get_inventory<R: LedgerRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<InventoryResponse>, ApiError> {
    let snapshot = state.store.current_inventory().await?;
    Ok(Json((&snapshot).into()))
}

/// POST `/inventory/count` - Compare a physical count to the inventory.
async fn count_inventory<R: LedgerRepository>(
    State(state): State<AppState<R>>,
    Json(counted): Json<DenominationBreakdown>,
) -> Result<Json<CountResponse>, ApiError> {
    let snapshot = state.store.current_inventory().await?;
    let difference = snapshot.difference(&counted);
    Ok(Json(CountResponse::new(&difference, &snapshot)))
}
