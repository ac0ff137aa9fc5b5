//! Small language-feature showcases served at `/api/kotlin/test`.
//!
//! - associated constants and functions in place of static members
//! - a computed getter
//! - an extension trait on `str`
//! - a closure

use serde::Serialize;

/// A postal address with fixed defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub name: String,
    pub street: String,
    pub city: String,
    pub state: Option<String>,
    pub zip: String,
}

impl Address {
    pub const RANDOM_VARIABLE: &'static str = "Random";

    pub fn random_value() -> &'static str {
        Self::RANDOM_VARIABLE
    }
}

impl Default for Address {
    fn default() -> Self {
        Self {
            name: "Holmes, Sherlock".to_string(),
            street: "Baker".to_string(),
            city: "London".to_string(),
            state: None,
            zip: "123456".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    width: u32,
    height: u32,
}

impl Rectangle {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }
}

pub trait Greet {
    fn greet(&self) -> String;
}

impl Greet for str {
    fn greet(&self) -> String {
        format!("Hello, {}!", self)
    }
}

/// Values produced by running every showcase once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Showcase {
    pub rectangle_area: u32,
    pub random_value: &'static str,
    pub greeting: String,
    pub sum: i32,
    pub address: Address,
}

pub fn run_showcase() -> Showcase {
    let add = |x: i32, y: i32| x + y;

    Showcase {
        rectangle_area: Rectangle::new(3, 4).area(),
        random_value: Address::random_value(),
        greeting: "Shubham".greet(),
        sum: add(2, 3),
        address: Address::default(),
    }
}
