//! Request Intake
//!
//! Validates raw request bodies at the boundary and turns them into domain
//! values before any store or gateway call is made.

use crate::error::{CoreError, Result};
use crate::model::{NewContactInquiry, NewOrder};
use crate::pricing;
use crate::wire::{ContactRequest, CreateOrderRequest};

/// A validated order request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderIntake {
    pub order: NewOrder,

    /// Gateway amount in minor units
    pub amount_minor: i64,
}

impl TryFrom<&CreateOrderRequest> for OrderIntake {
    type Error = CoreError;

    fn try_from(req: &CreateOrderRequest) -> Result<Self> {
        let name = required("name", &req.name)?;
        let email = required("email", &req.email)?;
        let mobile = required("mobile", &req.mobile)?;
        let language = required("language", &req.language)?;
        let description = required("description", &req.description)?;
        let package_name = required("packageName", &req.package_name)?;
        let price_label = required("packagePrice", &req.package_price)?;

        let package_price = pricing::parse_price(price_label)?;
        let amount_minor = pricing::to_minor_units(package_price)?;

        Ok(Self {
            order: NewOrder {
                customer_name: name.to_owned(),
                customer_email: email.to_owned(),
                customer_mobile: mobile.to_owned(),
                song_language: language.to_owned(),
                song_description: description.to_owned(),
                package_name: package_name.to_owned(),
                package_price,
            },
            amount_minor,
        })
    }
}

/// A validated contact form submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContactIntake(pub NewContactInquiry);

impl TryFrom<&ContactRequest> for ContactIntake {
    type Error = CoreError;

    fn try_from(req: &ContactRequest) -> Result<Self> {
        Ok(Self(NewContactInquiry {
            sender_name: required("name", &req.name)?.to_owned(),
            sender_email: required("email", &req.email)?.to_owned(),
            subject: required("subject", &req.subject)?.to_owned(),
            message: required("message", &req.message)?.to_owned(),
        }))
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}
