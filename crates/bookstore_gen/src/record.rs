//! Typed rows for the bookstore tables.
//!
//! Each record converts into a [`Row`] whose value order matches
//! [`Table::insert_columns`](crate::schema::Table::insert_columns).

use crate::generator::{Row, SqlValue};
use chrono::NaiveDate;

/// Book genres
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Genre {
    Fiction,
    Mystery,
    ScienceFiction,
    Romance,
    Thriller,
}

impl Genre {
    pub const ALL: [Genre; 5] = [
        Genre::Fiction,
        Genre::Mystery,
        Genre::ScienceFiction,
        Genre::Romance,
        Genre::Thriller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::Mystery => "Mystery",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Romance => "Romance",
            Genre::Thriller => "Thriller",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Author {
    pub name: String,
    pub nationality: String,
    pub birth_year: i64,
}

impl Author {
    pub fn to_row(&self) -> Row {
        vec![
            SqlValue::Text(self.name.clone()),
            SqlValue::Text(self.nationality.clone()),
            SqlValue::Int(self.birth_year),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub title: String,
    pub genre: Genre,
    pub publication_year: i64,
    /// Not checked against the authors actually generated
    pub author_id: i64,
    pub price: f64,
}

impl Book {
    pub fn to_row(&self) -> Row {
        vec![
            SqlValue::Text(self.title.clone()),
            SqlValue::Text(self.genre.as_str().to_string()),
            SqlValue::Int(self.publication_year),
            SqlValue::Int(self.author_id),
            SqlValue::Float(self.price),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    pub email: Option<String>,
    pub age: i64,
    pub gender: Gender,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub zipcode: Option<String>,
}

impl Customer {
    pub fn to_row(&self) -> Row {
        vec![
            SqlValue::Text(self.name.clone()),
            self.email.clone().into(),
            SqlValue::Int(self.age),
            SqlValue::Text(self.gender.as_str().to_string()),
            self.address.clone().into(),
            SqlValue::Text(self.city.clone()),
            SqlValue::Text(self.state.clone()),
            self.zipcode.clone().into(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: i64,
    pub customer_id: i64,
    pub order_date: NaiveDate,
    pub total_amount: f64,
}

impl Order {
    pub fn to_row(&self) -> Row {
        vec![
            SqlValue::Int(self.order_id),
            SqlValue::Int(self.customer_id),
            SqlValue::Date(self.order_date),
            SqlValue::Float(self.total_amount),
        ]
    }
}

/// Order line item. Every field is nullable because the defect injector
/// can blank whole rows.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDetail {
    pub order_id: Option<i64>,
    pub book_id: Option<i64>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
}

impl OrderDetail {
    pub fn new(order_id: i64, book_id: i64, quantity: i64, unit_price: f64) -> Self {
        Self {
            order_id: Some(order_id),
            book_id: Some(book_id),
            quantity: Some(quantity),
            unit_price: Some(unit_price),
        }
    }

    pub fn nullify(&mut self) {
        self.order_id = None;
        self.book_id = None;
        self.quantity = None;
        self.unit_price = None;
    }

    pub fn is_null(&self) -> bool {
        self.order_id.is_none()
            && self.book_id.is_none()
            && self.quantity.is_none()
            && self.unit_price.is_none()
    }

    pub fn to_row(&self) -> Row {
        vec![
            self.order_id.into(),
            self.book_id.into(),
            self.quantity.into(),
            self.unit_price.into(),
        ]
    }
}
