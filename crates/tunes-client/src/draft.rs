//! Order Draft
//!
//! In-progress order kept across page sections until it is submitted.

use tunes_core::wire::CreateOrderRequest;

/// A package as offered on the pricing cards
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    pub name: String,

    /// Display price, sent to the server as-is (e.g. `₹999`)
    pub price: String,

    pub features: Vec<String>,
}

impl Package {
    pub fn new(name: impl Into<String>, price: impl Into<String>, features: &[&str]) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            features: features.iter().map(|f| (*f).to_owned()).collect(),
        }
    }

    /// Package preselected on page load
    pub fn premium() -> Self {
        Self::new(
            "Premium",
            "₹999",
            &[
                "All premium features",
                "Priority support",
                "Editable Extra mix revisions",
            ],
        )
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::premium()
    }
}

/// Everything the customer has entered so far
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderDraft {
    pub package: Package,
    pub language: String,
    pub description: String,
    pub name: String,
    pub email: String,
    pub mobile: String,
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self {
            package: Package::premium(),
            language: "English".into(),
            description: String::new(),
            name: String::new(),
            email: String::new(),
            mobile: String::new(),
        }
    }
}

impl OrderDraft {
    /// Body for `POST /create-order`
    ///
    /// Values go out untrimmed; the server validates.
    pub fn to_request(&self) -> CreateOrderRequest {
        CreateOrderRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            language: self.language.clone(),
            description: self.description.clone(),
            package_name: self.package.name.clone(),
            package_price: self.package.price.clone(),
        }
    }
}
