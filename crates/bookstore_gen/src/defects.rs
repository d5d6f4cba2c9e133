//! Defect injection for the dirty variant.
//!
//! Post-processes generated rows in place: customer emails and addresses are
//! nulled at fixed rates, order rows are appended as copies with fresh ids,
//! and whole order_details rows are blanked at positions drawn with
//! replacement. Row order is preserved.

use crate::generator::Dataset;
use crate::provider::DataProvider;
use crate::record::{Customer, Order, OrderDetail};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Rates and counts for each defect kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DefectPolicy {
    /// Probability a customer email is nulled outright
    pub email_null_rate: f64,
    /// Probability a customer's address and zipcode are both nulled
    pub address_null_rate: f64,
    /// Order rows appended as copies of the first rows
    pub duplicate_orders: usize,
    /// Positions drawn (with replacement) for blanking order_details rows
    pub null_detail_rows: usize,
}

impl Default for DefectPolicy {
    fn default() -> Self {
        Self {
            email_null_rate: 0.10,
            address_null_rate: 0.05,
            duplicate_orders: 50,
            null_detail_rows: 50,
        }
    }
}

/// What the injector changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefectReport {
    pub emails_nulled_by_rate: usize,
    pub emails_nulled_by_collision: usize,
    pub addresses_nulled: usize,
    pub orders_appended: usize,
    pub detail_draws: usize,
    /// Distinct rows blanked; at most `detail_draws`
    pub detail_rows_nulled: usize,
}

/// Apply every defect policy to a dataset
pub fn inject<P: DataProvider>(
    provider: &mut P,
    dataset: &mut Dataset,
    policy: &DefectPolicy,
) -> DefectReport {
    let mut report = DefectReport::default();

    inject_customer_defects(provider, &mut dataset.customers, policy, &mut report);
    report.orders_appended = append_duplicate_orders(&mut dataset.orders, policy.duplicate_orders);
    let (draws, nulled) =
        null_order_details(provider, &mut dataset.order_details, policy.null_detail_rows);
    report.detail_draws = draws;
    report.detail_rows_nulled = nulled;

    report
}

/// Null emails by rate or on collision, and addresses by rate.
///
/// The rate trial runs first; an email nulled by it is never registered as
/// issued. Remaining emails are nulled when already issued earlier in the run.
pub fn inject_customer_defects<P: DataProvider>(
    provider: &mut P,
    customers: &mut [Customer],
    policy: &DefectPolicy,
    report: &mut DefectReport,
) {
    let mut issued: AHashSet<String> = AHashSet::with_capacity(customers.len());

    for customer in customers.iter_mut() {
        if provider.chance(policy.email_null_rate) {
            if customer.email.take().is_some() {
                report.emails_nulled_by_rate += 1;
            }
        } else if let Some(email) = customer.email.take() {
            if issued.contains(&email) {
                report.emails_nulled_by_collision += 1;
            } else {
                issued.insert(email.clone());
                customer.email = Some(email);
            }
        }

        if provider.chance(policy.address_null_rate) {
            customer.address = None;
            customer.zipcode = None;
            report.addresses_nulled += 1;
        }
    }
}

/// Append copies of the first `count` orders with ids after the current max.
///
/// Returns the number of rows appended, which is smaller than `count` when
/// fewer orders exist.
pub fn append_duplicate_orders(orders: &mut Vec<Order>, count: usize) -> usize {
    let max_id = orders.iter().map(|o| o.order_id).max().unwrap_or(0);
    let copies: Vec<Order> = orders
        .iter()
        .take(count)
        .zip(1..)
        .map(|(order, offset)| Order {
            order_id: max_id + offset,
            ..order.clone()
        })
        .collect();

    let appended = copies.len();
    orders.extend(copies);
    appended
}

/// Blank whole rows at `draws` positions chosen uniformly with replacement.
///
/// Returns `(draws made, distinct rows nulled)`.
pub fn null_order_details<P: DataProvider>(
    provider: &mut P,
    details: &mut [OrderDetail],
    draws: usize,
) -> (usize, usize) {
    if details.is_empty() {
        return (0, 0);
    }

    let mut positions = AHashSet::with_capacity(draws);
    for _ in 0..draws {
        let idx = provider.random_index(details.len());
        details[idx].nullify();
        positions.insert(idx);
    }

    (draws, positions.len())
}
