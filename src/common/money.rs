// src/common/money.rs

use rust_decimal::{Decimal, RoundingStrategy};

/// Arredonda para 2 casas, meio para cima (empates se afastam do zero).
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// Limites das colunas NUMERIC: quantidade (12,3), preço (12,2), total (14,2)
pub const QUANTITY_SCALE: u32 = 3;

pub fn max_quantity() -> Decimal {
    Decimal::new(999_999_999_999, QUANTITY_SCALE)
}

pub fn max_price() -> Decimal {
    Decimal::new(999_999_999_999, 2)
}

pub fn max_amount() -> Decimal {
    Decimal::new(99_999_999_999_999, 2)
}

/// Subtotal de uma linha: quantidade x preço unitário, já arredondado.
/// Para valores lidos do banco, que já respeitam os limites das colunas.
pub fn line_subtotal(quantity: Decimal, unit_price: Decimal) -> Decimal {
    round_money(quantity * unit_price)
}

/// Soma de subtotais (uma lista vazia vale 0.00).
pub fn sum_money<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    round_money(values.into_iter().fold(Decimal::ZERO, |acc, v| acc + v))
}

/// Como `line_subtotal`, mas devolve `None` se a multiplicação estourar.
pub fn checked_line_subtotal(quantity: Decimal, unit_price: Decimal) -> Option<Decimal> {
    quantity.checked_mul(unit_price).map(round_money)
}

/// Como `sum_money`, mas devolve `None` se a soma estourar.
pub fn checked_sum_money<I>(values: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .map(round_money)
}

/// Média com divisão protegida: sem elementos a média é zero.
pub fn average_money(total: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return round_money(Decimal::ZERO);
    }
    round_money(total / Decimal::from(count as u64))
}
