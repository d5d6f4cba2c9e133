//! Generator and defect injection driven by a scripted provider, so every
//! Bernoulli and uniform draw is known up front.

use bookstore_gen::defects::{inject_customer_defects, null_order_details};
use bookstore_gen::{
    Customer, DataProvider, DefectPolicy, DefectReport, Gender, Generator, GeneratorConfig,
    OrderDetail, Variant,
};
use chrono::NaiveDate;
use std::collections::{HashSet, VecDeque};

/// Returns queued values where scripted, fixed fallbacks otherwise.
#[derive(Default)]
struct ScriptedProvider {
    emails: VecDeque<String>,
    chances: VecDeque<bool>,
    ints: VecDeque<i64>,
    indices: VecDeque<usize>,
    names: usize,
}

impl DataProvider for ScriptedProvider {
    fn name(&mut self) -> String {
        self.names += 1;
        format!("Person {}", self.names)
    }

    fn email(&mut self) -> String {
        self.emails
            .pop_front()
            .unwrap_or_else(|| "same@example.com".to_string())
    }

    fn address(&mut self) -> String {
        "1 Main St\nSpringfield, IL 62701".to_string()
    }

    fn city(&mut self) -> String {
        "Springfield".to_string()
    }

    fn state_abbr(&mut self) -> String {
        "IL".to_string()
    }

    fn zipcode(&mut self) -> String {
        "62701".to_string()
    }

    fn sentence(&mut self) -> String {
        "A tale of two tests.".to_string()
    }

    fn country(&mut self) -> String {
        "Norway".to_string()
    }

    fn random_int(&mut self, min: i64, max: i64) -> i64 {
        self.ints.pop_front().unwrap_or(min).clamp(min, max)
    }

    fn random_float(&mut self, min: f64, _max: f64) -> f64 {
        min
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.chances.pop_front().unwrap_or(false)
    }

    fn random_index(&mut self, len: usize) -> usize {
        self.indices.pop_front().unwrap_or(0) % len
    }
}

fn config(count: usize, variant: Variant) -> GeneratorConfig {
    GeneratorConfig {
        count,
        reference_max: 5,
        as_of: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        variant,
        defects: DefectPolicy::default(),
    }
}

fn customer(email: &str) -> Customer {
    Customer {
        name: "Jo".to_string(),
        email: Some(email.to_string()),
        age: 30,
        gender: Gender::Female,
        address: Some("1 Main St".to_string()),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zipcode: Some("62701".to_string()),
    }
}

#[test]
fn clean_emails_stay_distinct_when_provider_repeats() {
    let mut generator = Generator::new(ScriptedProvider::default(), config(3, Variant::Clean));
    let customers = generator.generate_customers();

    let emails: HashSet<_> = customers
        .iter()
        .map(|c| c.email.clone().unwrap())
        .collect();
    assert_eq!(emails.len(), 3);
    assert!(emails.contains("same@example.com"));
    assert!(emails.iter().all(|e| e.ends_with("@example.com")));
}

#[test]
fn dirty_customers_keep_raw_emails_until_injection() {
    let mut generator = Generator::new(ScriptedProvider::default(), config(3, Variant::Dirty));
    let customers = generator.generate_customers();

    assert!(customers
        .iter()
        .all(|c| c.email.as_deref() == Some("same@example.com")));
}

#[test]
fn customer_defects_follow_scripted_trials() {
    let mut customers = vec![
        customer("a@x.com"),
        customer("a@x.com"),
        customer("b@x.com"),
        customer("a@x.com"),
    ];
    // (email trial, address trial) per customer
    let mut provider = ScriptedProvider {
        chances: [false, false, true, false, false, true, false, false]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let mut report = DefectReport::default();

    inject_customer_defects(
        &mut provider,
        &mut customers,
        &DefectPolicy::default(),
        &mut report,
    );

    assert_eq!(customers[0].email.as_deref(), Some("a@x.com"));
    assert_eq!(customers[1].email, None);
    assert_eq!(customers[2].email.as_deref(), Some("b@x.com"));
    assert_eq!(customers[2].address, None);
    assert_eq!(customers[2].zipcode, None);
    assert_eq!(customers[3].email, None);
    assert!(customers[3].address.is_some());

    assert_eq!(report.emails_nulled_by_rate, 1);
    assert_eq!(report.emails_nulled_by_collision, 1);
    assert_eq!(report.addresses_nulled, 1);
}

#[test]
fn rate_nulled_email_does_not_block_later_duplicate() {
    let mut customers = vec![customer("a@x.com"), customer("a@x.com")];
    let mut provider = ScriptedProvider {
        chances: [true, false, false, false].into_iter().collect(),
        ..Default::default()
    };
    let mut report = DefectReport::default();

    inject_customer_defects(
        &mut provider,
        &mut customers,
        &DefectPolicy::default(),
        &mut report,
    );

    assert_eq!(customers[0].email, None);
    assert_eq!(customers[1].email.as_deref(), Some("a@x.com"));
    assert_eq!(report.emails_nulled_by_collision, 0);
}

#[test]
fn detail_positions_drawn_with_replacement() {
    let mut details: Vec<OrderDetail> = (1..=4)
        .map(|id| OrderDetail::new(id, 1, 1, 10.0))
        .collect();
    let mut provider = ScriptedProvider {
        indices: [2, 2, 0].into_iter().collect(),
        ..Default::default()
    };

    let (draws, nulled) = null_order_details(&mut provider, &mut details, 3);

    assert_eq!(draws, 3);
    assert_eq!(nulled, 2);
    assert!(details[0].is_null());
    assert!(!details[1].is_null());
    assert!(details[2].is_null());
    assert!(!details[3].is_null());
}

#[test]
fn order_dates_use_scripted_offsets() {
    let mut provider = ScriptedProvider::default();
    // days_back then customer reference, per order
    provider.ints = [1, 3, 365, 2].into_iter().collect();
    let mut generator = Generator::new(provider, config(2, Variant::Clean));

    let orders = generator.generate_orders();

    assert_eq!(orders[0].order_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    assert_eq!(orders[0].customer_id, 3);
    assert_eq!(orders[1].order_date, NaiveDate::from_ymd_opt(2023, 3, 2).unwrap());
    assert_eq!(orders[1].customer_id, 2);
}

#[test]
fn dirty_generation_appends_and_blanks() {
    let mut generator = Generator::new(ScriptedProvider::default(), config(60, Variant::Dirty));
    let dataset = generator.generate();
    let report = dataset.defects.clone().unwrap();

    assert_eq!(dataset.orders.len(), 110);
    assert_eq!(report.orders_appended, 50);
    assert_eq!(dataset.orders[60].order_id, 61);
    assert_eq!(dataset.orders[60].customer_id, dataset.orders[0].customer_id);

    // every scripted index is 0, so only the first row is blanked
    assert_eq!(report.detail_draws, 50);
    assert_eq!(report.detail_rows_nulled, 1);
    assert!(dataset.order_details[0].is_null());

    // all emails identical and no rate trial fires: only the first survives
    assert_eq!(report.emails_nulled_by_collision, 59);
    assert_eq!(
        dataset.customers.iter().filter(|c| c.email.is_some()).count(),
        1
    );
}
