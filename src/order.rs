use anyhow::Context as _;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::cart::Cart;
use crate::formats::OrderSubmission;

#[derive(Debug, Clone, Default)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// Builds the order body for `cart`. The form handler rejects orders without
/// a name, phone, address or items, so those are checked up front.
pub fn build_submission(
    customer: &Customer,
    cart: &Cart,
    now: DateTime<Utc>,
) -> anyhow::Result<OrderSubmission> {
    let required = [
        ("name", customer.name.trim()),
        ("phone", customer.phone.trim()),
        ("address", customer.address.trim()),
    ];
    for (field, value) in required {
        if value.is_empty() {
            anyhow::bail!("order {field} is required");
        }
    }
    if cart.is_empty() {
        anyhow::bail!("cart is empty");
    }

    Ok(OrderSubmission {
        name: customer.name.trim().to_owned(),
        phone: customer.phone.trim().to_owned(),
        address: customer.address.trim().to_owned(),
        items: cart.items_summary(),
        total: cart.total(),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// Posts the order to the form endpoint. The reply body is only logged.
pub async fn submit(
    client: &reqwest::Client,
    endpoint: &str,
    order: &OrderSubmission,
) -> anyhow::Result<()> {
    let response = client
        .post(endpoint)
        .json(order)
        .send()
        .await
        .with_context(|| format!("POST {endpoint}"))?;

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if !status.is_success() {
        anyhow::bail!("order submission failed ({status}): {body}");
    }

    tracing::info!(%status, items = %order.items, total = %order.total, "order submitted");
    tracing::debug!(body = %body, "order endpoint reply");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;
    use crate::records::build_all;

    fn customer() -> Customer {
        Customer {
            name: " Amal ".to_owned(),
            phone: "0500000000".to_owned(),
            address: "Riyadh".to_owned(),
        }
    }

    fn cart() -> anyhow::Result<Cart> {
        let books = build_all("Title,Suggestted,Availability\nDune,10,3\n");
        let mut cart = Cart::default();
        cart.add(&books[0])?;
        cart.add(&books[0])?;
        Ok(cart)
    }

    #[test]
    fn submission_carries_summary_total_and_timestamp() -> anyhow::Result<()> {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let order = build_submission(&customer(), &cart()?, now)?;
        assert_eq!(order.name, "Amal");
        assert_eq!(order.items, "Dune (qty 2)");
        assert_eq!(order.total, "20.00");
        assert_eq!(order.timestamp, "2026-01-02T03:04:05.000Z");
        Ok(())
    }

    #[test]
    fn missing_fields_are_rejected() -> anyhow::Result<()> {
        let mut customer = customer();
        customer.phone = "  ".to_owned();
        let err = build_submission(&customer, &cart()?, Utc::now())
            .unwrap_err()
            .to_string();
        assert!(err.contains("phone is required"));

        let err = build_submission(&self::customer(), &Cart::default(), Utc::now())
            .unwrap_err()
            .to_string();
        assert!(err.contains("cart is empty"));
        Ok(())
    }
}
