use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stocked product as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"id": 1, "name": "Wireless Mouse", "price": 24.99, "quantity": 25}))]
pub struct Product {
    /// Store-assigned identifier; `None` only before the first save
    pub id: Option<i64>,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

impl Product {
    /// An unsaved product built from validated input.
    pub fn new(input: ValidProduct) -> Self {
        Self {
            id: None,
            name: input.name,
            price: input.price,
            quantity: input.quantity,
        }
    }

    /// Overwrite name, price and quantity, keeping the identifier.
    pub fn apply(&mut self, input: ValidProduct) {
        self.name = input.name;
        self.price = input.price;
        self.quantity = input.quantity;
    }
}

/// Request body for create and update.
///
/// Every field is optional at the parsing layer so that a missing field
/// becomes a field-level validation error. An `id` in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[schema(example = json!({"name": "Wireless Mouse", "price": 24.99, "quantity": 25}))]
pub struct ProductInput {
    #[schema(required = true, max_length = 100)]
    pub name: Option<String>,
    #[schema(required = true, exclusive_minimum = 0.0)]
    pub price: Option<f64>,
    #[schema(required = true, minimum = 0)]
    pub quantity: Option<i32>,
}

/// Product fields that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}
