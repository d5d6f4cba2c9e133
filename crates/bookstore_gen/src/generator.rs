//! Entity generators producing row data for all bookstore tables.
//!
//! Rows are held in memory as typed records and converted to [`TableData`]
//! in load order. Reference columns are drawn from `[1, reference_max]`
//! without looking at how many rows the referenced table received.

use crate::defects::{self, DefectPolicy, DefectReport};
use crate::provider::{DataProvider, FakeProvider};
use crate::record::{Author, Book, Customer, Gender, Genre, Order, OrderDetail};
use crate::schema::{bookstore_schema, AUTHORS, BOOKS, CUSTOMERS, ORDERS, ORDER_DETAILS};
use ahash::AHashSet;
use chrono::{Duration, NaiveDate};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Redraws attempted before a colliding clean email gets a discriminator
const MAX_EMAIL_ATTEMPTS: usize = 16;

/// Which dataset to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// No injected defects
    #[default]
    Clean,
    /// Nulls and appended duplicate rows injected after generation
    Dirty,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Clean => "clean",
            Variant::Dirty => "dirty",
        }
    }
}

impl std::str::FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "clean" | "1" | "v1" => Ok(Variant::Clean),
            "dirty" | "2" | "v2" => Ok(Variant::Dirty),
            _ => Err(format!("Unknown variant: {}. Use clean or dirty", s)),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL value representation
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl From<Option<String>> for SqlValue {
    fn from(value: Option<String>) -> Self {
        value.map(SqlValue::Text).unwrap_or(SqlValue::Null)
    }
}

impl From<Option<i64>> for SqlValue {
    fn from(value: Option<i64>) -> Self {
        value.map(SqlValue::Int).unwrap_or(SqlValue::Null)
    }
}

impl From<Option<f64>> for SqlValue {
    fn from(value: Option<f64>) -> Self {
        value.map(SqlValue::Float).unwrap_or(SqlValue::Null)
    }
}

/// A row of generated data
pub type Row = Vec<SqlValue>;

/// Generated data for a single table
#[derive(Debug, Clone)]
pub struct TableData {
    pub table_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Generator settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Rows per entity
    pub count: usize,
    /// Upper bound for reference columns. Values below 1 are treated as 1.
    pub reference_max: i64,
    /// Order dates are drawn from the 365 days before this date
    pub as_of: NaiveDate,
    pub variant: Variant,
    /// Only used by the dirty variant
    pub defects: DefectPolicy,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            reference_max: 1000,
            as_of: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            variant: Variant::Clean,
            defects: DefectPolicy::default(),
        }
    }
}

/// All generated rows for one run
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub authors: Vec<Author>,
    pub books: Vec<Book>,
    pub customers: Vec<Customer>,
    pub orders: Vec<Order>,
    pub order_details: Vec<OrderDetail>,
    /// Present when defects were injected
    pub defects: Option<DefectReport>,
}

impl Dataset {
    /// Row data per table, in load order
    pub fn tables(&self) -> Vec<TableData> {
        let schema = bookstore_schema();
        schema
            .tables_in_order()
            .into_iter()
            .map(|table| {
                let rows = match table.name.as_str() {
                    AUTHORS => self.authors.iter().map(Author::to_row).collect(),
                    BOOKS => self.books.iter().map(Book::to_row).collect(),
                    CUSTOMERS => self.customers.iter().map(Customer::to_row).collect(),
                    ORDERS => self.orders.iter().map(Order::to_row).collect(),
                    ORDER_DETAILS => self.order_details.iter().map(OrderDetail::to_row).collect(),
                    _ => Vec::new(),
                };
                TableData {
                    table_name: table.name.clone(),
                    columns: table.insert_columns().iter().map(|c| c.to_string()).collect(),
                    rows,
                }
            })
            .collect()
    }

    /// `(table, row count)` pairs in load order
    pub fn row_counts(&self) -> Vec<(&'static str, usize)> {
        vec![
            (AUTHORS, self.authors.len()),
            (BOOKS, self.books.len()),
            (CUSTOMERS, self.customers.len()),
            (ORDERS, self.orders.len()),
            (ORDER_DETAILS, self.order_details.len()),
        ]
    }
}

/// Main data generator
pub struct Generator<P: DataProvider> {
    provider: P,
    config: GeneratorConfig,
}

impl Generator<FakeProvider<ChaCha8Rng>> {
    /// Generator over a seeded `fake` provider
    pub fn seeded(seed: u64, config: GeneratorConfig) -> Self {
        Self::new(FakeProvider::seeded(seed), config)
    }
}

impl<P: DataProvider> Generator<P> {
    pub fn new(provider: P, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    /// Generate every table, then inject defects for the dirty variant
    pub fn generate(&mut self) -> Dataset {
        let mut dataset = Dataset {
            authors: self.generate_authors(),
            books: self.generate_books(),
            customers: self.generate_customers(),
            orders: self.generate_orders(),
            order_details: self.generate_order_details(),
            defects: None,
        };

        if self.config.variant == Variant::Dirty {
            let report = defects::inject(&mut self.provider, &mut dataset, &self.config.defects);
            dataset.defects = Some(report);
        }

        dataset
    }

    pub fn generate_authors(&mut self) -> Vec<Author> {
        (0..self.config.count)
            .map(|_| Author {
                name: self.provider.name(),
                nationality: self.provider.country(),
                birth_year: self.provider.random_int(1900, 2000),
            })
            .collect()
    }

    pub fn generate_books(&mut self) -> Vec<Book> {
        (0..self.config.count)
            .map(|_| Book {
                title: self.provider.sentence(),
                genre: *self.provider.random_element(&Genre::ALL),
                publication_year: self.provider.random_int(1900, 2023),
                author_id: self.reference(),
                price: self.provider.random_int(0, 99) as f64,
            })
            .collect()
    }

    /// Customers with raw provider emails.
    ///
    /// The clean variant redraws colliding emails so the unique email column
    /// always loads; the dirty variant leaves collisions to the injector.
    pub fn generate_customers(&mut self) -> Vec<Customer> {
        let mut issued = AHashSet::with_capacity(self.config.count);
        let mut customers = Vec::with_capacity(self.config.count);

        for _ in 0..self.config.count {
            let name = self.provider.name();
            let email = match self.config.variant {
                Variant::Clean => self.unique_email(&mut issued),
                Variant::Dirty => self.provider.email(),
            };
            customers.push(Customer {
                name,
                email: Some(email),
                age: self.provider.random_int(18, 70),
                gender: *self.provider.random_element(&Gender::ALL),
                address: Some(self.provider.address()),
                city: self.provider.city(),
                state: self.provider.state_abbr(),
                zipcode: Some(self.provider.zipcode()),
            });
        }

        customers
    }

    pub fn generate_orders(&mut self) -> Vec<Order> {
        (1..=self.config.count as i64)
            .map(|order_id| {
                let days_back = self.provider.random_int(1, 365);
                Order {
                    order_id,
                    customer_id: self.reference(),
                    order_date: self.config.as_of - Duration::days(days_back),
                    total_amount: self.provider.random_float(10.0, 500.0),
                }
            })
            .collect()
    }

    /// One line item per order ordinal; only the book reference is random
    pub fn generate_order_details(&mut self) -> Vec<OrderDetail> {
        (1..=self.config.count as i64)
            .map(|order_id| {
                let book_id = self.reference();
                let quantity = self.provider.random_int(1, 10);
                let unit_price = self.provider.random_float(10.0, 50.0);
                OrderDetail::new(order_id, book_id, quantity, unit_price)
            })
            .collect()
    }

    fn reference(&mut self) -> i64 {
        self.provider.random_int(1, self.config.reference_max.max(1))
    }

    fn unique_email(&mut self, issued: &mut AHashSet<String>) -> String {
        for _ in 0..MAX_EMAIL_ATTEMPTS {
            let email = self.provider.email();
            if issued.insert(email.clone()) {
                return email;
            }
        }

        let base = self.provider.email();
        let (local, domain) = base.split_once('@').unwrap_or((base.as_str(), "example.com"));
        let mut discriminator = issued.len();
        loop {
            let candidate = format!("{}{}@{}", local, discriminator, domain);
            if issued.insert(candidate.clone()) {
                return candidate;
            }
            discriminator += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: usize, variant: Variant) -> GeneratorConfig {
        GeneratorConfig {
            count,
            variant,
            as_of: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_generator_deterministic() {
        let data1 = Generator::seeded(42, config(50, Variant::Dirty)).generate();
        let data2 = Generator::seeded(42, config(50, Variant::Dirty)).generate();

        assert_eq!(data1.authors, data2.authors);
        assert_eq!(data1.customers, data2.customers);
        assert_eq!(data1.orders, data2.orders);
        assert_eq!(data1.order_details, data2.order_details);
    }

    #[test]
    fn test_reference_max_below_one_clamps() {
        let config = GeneratorConfig {
            count: 20,
            reference_max: 0,
            ..config(20, Variant::Clean)
        };
        let data = Generator::seeded(3, config).generate();

        assert!(data.books.iter().all(|b| b.author_id == 1));
        assert!(data.orders.iter().all(|o| o.customer_id == 1));
    }

    #[test]
    fn test_clean_counts() {
        let data = Generator::seeded(7, config(1000, Variant::Clean)).generate();

        for (table, count) in data.row_counts() {
            assert_eq!(count, 1000, "unexpected row count for {}", table);
        }
        assert!(data.defects.is_none());
    }

    #[test]
    fn test_book_bounds() {
        let data = Generator::seeded(11, config(1000, Variant::Clean)).generate();

        for book in &data.books {
            assert!((1900..=2023).contains(&book.publication_year));
            assert!((1..=1000).contains(&book.author_id));
            assert!((0.0..=99.0).contains(&book.price));
            assert_eq!(book.price.fract(), 0.0);
            assert!(Genre::ALL.contains(&book.genre));
        }
    }

    #[test]
    fn test_author_and_customer_bounds() {
        let data = Generator::seeded(12, config(500, Variant::Clean)).generate();

        assert!(data
            .authors
            .iter()
            .all(|a| (1900..=2000).contains(&a.birth_year)));
        assert!(data.customers.iter().all(|c| (18..=70).contains(&c.age)));
    }

    #[test]
    fn test_order_ids_sequential() {
        let data = Generator::seeded(3, config(1000, Variant::Clean)).generate();
        let ids: Vec<i64> = data.orders.iter().map(|o| o.order_id).collect();
        let expected: Vec<i64> = (1..=1000).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_order_dates_within_past_year() {
        let cfg = config(1000, Variant::Clean);
        let as_of = cfg.as_of;
        let data = Generator::seeded(5, cfg).generate();

        for order in &data.orders {
            assert!(order.order_date < as_of);
            assert!(order.order_date >= as_of - Duration::days(365));
            assert!((10.0..=500.0).contains(&order.total_amount));
            assert!((1..=1000).contains(&order.customer_id));
        }
    }

    #[test]
    fn test_order_detail_bounds() {
        let data = Generator::seeded(8, config(1000, Variant::Clean)).generate();

        for (idx, detail) in data.order_details.iter().enumerate() {
            assert_eq!(detail.order_id, Some(idx as i64 + 1));
            assert!((1..=1000).contains(&detail.book_id.unwrap()));
            assert!((1..=10).contains(&detail.quantity.unwrap()));
            assert!((10.0..=50.0).contains(&detail.unit_price.unwrap()));
        }
    }

    #[test]
    fn test_clean_emails_unique() {
        let data = Generator::seeded(21, config(1000, Variant::Clean)).generate();
        let mut seen = AHashSet::new();
        for customer in &data.customers {
            let email = customer.email.as_ref().expect("clean emails are never null");
            assert!(seen.insert(email.clone()), "duplicate email {}", email);
        }
    }

    #[test]
    fn test_tables_follow_schema_columns() {
        let data = Generator::seeded(1, config(5, Variant::Clean)).generate();
        let tables = data.tables();
        let names: Vec<&str> = tables.iter().map(|t| t.table_name.as_str()).collect();

        assert_eq!(
            names,
            vec![AUTHORS, BOOKS, CUSTOMERS, ORDERS, ORDER_DETAILS]
        );
        for table in &tables {
            for row in &table.rows {
                assert_eq!(row.len(), table.columns.len());
            }
        }
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("clean".parse::<Variant>().unwrap(), Variant::Clean);
        assert_eq!("DIRTY".parse::<Variant>().unwrap(), Variant::Dirty);
        assert_eq!("2".parse::<Variant>().unwrap(), Variant::Dirty);
        assert!("filthy".parse::<Variant>().is_err());
    }
}
