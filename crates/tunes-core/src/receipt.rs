//! Receipt Rendering
//!
//! HTML for the payment-success page and the downloadable receipt. Markup is
//! built with `maud`, so every customer-supplied field is escaped on the way
//! out.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::model::{Order, OrderId};
use crate::pricing::format_amount;
use crate::wire::receipt_link;

/// Timestamp format used on receipts (`15 Oct 2026, 01:45 PM`)
const RECEIPT_DATE_FORMAT: &str = "%d %b %Y, %I:%M %p";

const SUCCESS_STYLE: &str = "\
body { background: #f8f9fa; display: flex; align-items: center; justify-content: center; height: 100vh; font-family: Arial, sans-serif; }
.card { max-width: 500px; padding: 24px; box-shadow: 0 4px 10px rgba(0,0,0,0.1); border-radius: 15px; background: #fff; text-align: center; }
.success-icon { font-size: 60px; color: #28a745; }
ul { list-style: none; padding: 0; text-align: left; }
li { padding: 8px 0; border-bottom: 1px solid #eee; }
";

const RECEIPT_STYLE: &str = "\
body { font-family: Arial, sans-serif; padding: 20px; }
h2 { text-align: center; }
.receipt { border: 1px solid #ddd; padding: 20px; border-radius: 10px; }
.info { margin: 10px 0; }
.footer { text-align: center; margin-top: 20px; font-size: 0.9em; color: #555; }
";

/// Attachment filename for an order's receipt
pub fn receipt_filename(order_id: OrderId) -> String {
    format!("receipt_order_{order_id}.html")
}

/// Render the confirmation page shown after a successful payment
pub fn render_success_page(order: &Order, payment_id: &str, currency: &str) -> String {
    let amount = format_amount(order.package_price, currency);
    let download = receipt_link(order.id, payment_id);

    let page: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                title { "Payment Successful" }
                style { (PreEscaped(SUCCESS_STYLE)) }
            }
            body {
                div class="card" {
                    div class="success-icon" { (PreEscaped("&#10004;")) }
                    h3 { "Payment Successful!" }
                    p {
                        "Thank you, " strong { (order.customer_name) } "."
                        br;
                        "Your payment for " strong { (amount) } " has been received."
                    }
                    ul {
                        li { strong { "Order ID:" } " " (order.id.get()) }
                        li { strong { "Payment ID:" } " " (payment_id) }
                        li { strong { "Package:" } " " (order.package_name) }
                    }
                    a href=(download) { "Download Receipt" }
                    br;
                    a href="/" { "Return to Homepage" }
                }
            }
        }
    };
    page.into_string()
}

/// Render the standalone receipt document offered as a download
pub fn render_receipt(order: &Order, payment_id: &str, currency: &str) -> String {
    let amount = format_amount(order.package_price, currency);
    let date = order.updated_at.format(RECEIPT_DATE_FORMAT).to_string();

    let page: Markup = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="UTF-8";
                title { "Payment Receipt" }
                style { (PreEscaped(RECEIPT_STYLE)) }
            }
            body {
                div class="receipt" {
                    h2 { "Payment Receipt" }
                    p class="info" { strong { "Name:" } " " (order.customer_name) }
                    p class="info" { strong { "Email:" } " " (order.customer_email) }
                    p class="info" { strong { "Order ID:" } " " (order.id.get()) }
                    p class="info" { strong { "Payment ID:" } " " (payment_id) }
                    p class="info" { strong { "Package:" } " " (order.package_name) }
                    p class="info" { strong { "Amount Paid:" } " " (amount) }
                    p class="info" { strong { "Date:" } " " (date) }
                    div class="footer" {
                        "Payment received via Razorpay."
                        br;
                        "Thank you for your purchase!"
                    }
                }
            }
        }
    };
    page.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewOrder, OrderStatus};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn paid_order() -> Order {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 13, 45, 0).unwrap();
        let mut order = Order::from_new(
            OrderId::new(3),
            NewOrder {
                customer_name: "<Asha>".into(),
                customer_email: "asha@x.com".into(),
                customer_mobile: "999".into(),
                song_language: "Hindi".into(),
                song_description: "birthday".into(),
                package_name: "Premium".into(),
                package_price: dec!(1999),
            },
            now,
        );
        order.status = OrderStatus::Paid;
        order.gateway_payment_id = Some("pay_1".into());
        order
    }

    #[test]
    fn test_success_page_contents() {
        let html = render_success_page(&paid_order(), "pay_1", "INR");
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&lt;Asha&gt;"));
        assert!(!html.contains("<Asha>"));
        assert!(html.contains("₹1,999.00"));
        assert!(html.contains("/download-receipt?order_id=3&amp;payment_id=pay_1"));
    }

    #[test]
    fn test_success_page_escapes_payment_id_in_link() {
        let html = render_success_page(&paid_order(), "pay\"><script>", "INR");
        assert!(!html.contains("<script>"));
        assert!(html.contains("payment_id=pay%22%3E%3Cscript%3E"));
        assert!(html.contains("pay&quot;&gt;&lt;script&gt;"));
    }

    #[test]
    fn test_receipt_contents() {
        let html = render_receipt(&paid_order(), "pay_1", "INR");
        assert!(html.contains("asha@x.com"));
        assert!(html.contains("15 Oct 2026, 01:45 PM"));
        assert!(html.contains("<strong>Order ID:</strong> 3"));
        assert!(html.contains("<strong>Amount Paid:</strong> ₹1,999.00"));
    }

    #[test]
    fn test_receipt_uses_configured_currency() {
        let html = render_receipt(&paid_order(), "pay_1", "USD");
        assert!(html.contains("$1,999.00"));
        assert!(!html.contains('₹'));
    }

    #[test]
    fn test_receipt_filename() {
        assert_eq!(receipt_filename(OrderId::new(3)), "receipt_order_3.html");
    }
}
