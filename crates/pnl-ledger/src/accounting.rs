use crate::types::{CanonicalTrade, Position, PositionMap};

/// Apply a buy to the symbol's position (weighted-average cost).
///
/// Rules:
/// - Missing position starts at `{ quantity: 0, average_cost: 0 }`.
/// - new_avg = (q0 * avg0 + q * p) / (q0 + q)
/// - new_qty = q0 + q
/// - A buy never realizes PnL.
pub fn apply_buy(positions: &mut PositionMap, trade: &CanonicalTrade) {
    debug_assert!(trade.quantity > 0.0);
    debug_assert!(trade.price >= 0.0);

    let pos = positions.entry(trade.symbol.clone()).or_default();

    let total_cost = pos.quantity * pos.average_cost + trade.quantity * trade.price;
    let new_qty = pos.quantity + trade.quantity;

    *pos = Position {
        quantity: new_qty,
        average_cost: total_cost / new_qty,
    };
}

/// Apply a sell and return the realized PnL, if any.
///
/// Rules:
/// - No position, or position quantity <= 0: returns `None`, position is not
///   touched and is not created.
/// - Otherwise realized = (p - avg) * q over the full requested quantity (no
///   clamp to the held quantity), quantity -= q, average cost unchanged.
pub fn apply_sell(positions: &mut PositionMap, trade: &CanonicalTrade) -> Option<f64> {
    debug_assert!(trade.quantity > 0.0);
    debug_assert!(trade.price >= 0.0);

    let pos = positions.get_mut(&trade.symbol)?;
    if !pos.is_open() {
        return None;
    }

    let realized = (trade.price - pos.average_cost) * trade.quantity;
    pos.quantity -= trade.quantity;
    Some(realized)
}
