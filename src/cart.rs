use std::path::PathBuf;

use anyhow::Context as _;

use crate::formats::{BookRecord, CartLine};
use crate::storefront::parse_leading_float;
use crate::store;

/// Cart lines keyed by book title.
///
/// Two books sharing a title share a line; the catalog has no stronger
/// identity to key on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds one copy of `book`, returning the new line quantity.
    pub fn add(&mut self, book: &BookRecord) -> anyhow::Result<u32> {
        if !book.availability.is_available() {
            anyhow::bail!("book is not available: {}", book.title);
        }

        let stock = book.availability_quantity.max(1);
        match self.lines.iter_mut().find(|line| line.book.title == book.title) {
            Some(line) => {
                if line.quantity >= stock {
                    anyhow::bail!("only {stock} in stock: {}", book.title);
                }
                line.quantity += 1;
                line.book = book.clone();
                Ok(line.quantity)
            }
            None => {
                self.lines.push(CartLine {
                    book: book.clone(),
                    quantity: 1,
                });
                Ok(1)
            }
        }
    }

    /// Sets a line quantity; zero removes the line. Returns whether a line matched.
    pub fn set_quantity(&mut self, title: &str, quantity: u32) -> anyhow::Result<bool> {
        if quantity == 0 {
            return Ok(self.remove(title));
        }
        let Some(line) = self.lines.iter_mut().find(|line| line.book.title == title) else {
            return Ok(false);
        };
        let stock = line.book.availability_quantity.max(1);
        if quantity > stock {
            anyhow::bail!("only {stock} in stock: {title}");
        }
        line.quantity = quantity;
        Ok(true)
    }

    pub fn remove(&mut self, title: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.book.title != title);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of price × quantity, with two decimals. Unpriced books count as zero.
    #[must_use]
    pub fn total(&self) -> String {
        let total: f64 = self
            .lines
            .iter()
            .map(|line| parse_leading_float(&line.book.price).unwrap_or(0.0) * f64::from(line.quantity))
            .sum();
        format!("{total:.2}")
    }

    /// `"Title (qty 2), Other (qty 1)"`, the format the order sheet parses back.
    #[must_use]
    pub fn items_summary(&self) -> String {
        self.lines
            .iter()
            .map(|line| format!("{} (qty {})", line.book.title, line.quantity))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone)]
pub struct CartStore {
    path: PathBuf,
}

impl CartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> anyhow::Result<Cart> {
        let lines = store::read_json::<Vec<CartLine>>(&self.path)
            .await
            .with_context(|| format!("load cart: {}", self.path.display()))?;
        Ok(Cart::from_lines(lines.unwrap_or_default()))
    }

    pub async fn save(&self, cart: &Cart) -> anyhow::Result<()> {
        store::write_json_atomic(&self.path, &cart.lines)
            .await
            .with_context(|| format!("save cart: {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::build_all;

    fn books() -> Vec<BookRecord> {
        build_all(
            "Title,Suggestted,Availability\n\
Dune,12.5,2\n\
Cosmos,ask,yes\n\
Gone,9,0\n",
        )
    }

    #[test]
    fn adding_increments_up_to_stock() -> anyhow::Result<()> {
        let books = books();
        let mut cart = Cart::default();
        assert_eq!(cart.add(&books[0])?, 1);
        assert_eq!(cart.add(&books[0])?, 2);
        let err = cart.add(&books[0]).unwrap_err().to_string();
        assert!(err.contains("only 2 in stock"));
        assert_eq!(cart.lines().len(), 1);
        Ok(())
    }

    #[test]
    fn unavailable_books_are_refused() {
        let books = books();
        let mut cart = Cart::default();
        let err = cart.add(&books[2]).unwrap_err().to_string();
        assert!(err.contains("not available"));
        assert!(cart.is_empty());
    }

    #[test]
    fn totals_and_summary() -> anyhow::Result<()> {
        let books = books();
        let mut cart = Cart::default();
        cart.add(&books[0])?;
        cart.add(&books[0])?;
        cart.add(&books[1])?;

        assert_eq!(cart.total(), "25.00");
        assert_eq!(cart.items_summary(), "Dune (qty 2), Cosmos (qty 1)");
        Ok(())
    }

    #[test]
    fn set_quantity_and_remove() -> anyhow::Result<()> {
        let books = books();
        let mut cart = Cart::default();
        cart.add(&books[0])?;
        assert!(cart.set_quantity("Dune", 2)?);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert!(cart.set_quantity("Dune", 5).is_err());
        assert_eq!(cart.lines()[0].quantity, 2);
        assert!(cart.set_quantity("Dune", 0)?);
        assert!(cart.is_empty());
        assert!(!cart.remove("Dune"));
        assert!(!cart.set_quantity("Nope", 1)?);
        Ok(())
    }

    #[tokio::test]
    async fn cart_persists_book_fields_with_quantity() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("cart.json");
        let store = CartStore::new(&path);

        let mut cart = store.load().await?;
        assert!(cart.is_empty());
        cart.add(&books()[0])?;
        store.save(&cart).await?;

        let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(raw[0]["title"], "Dune");
        assert_eq!(raw[0]["quantity"], 1);
        assert_eq!(raw[0]["availabilityQuantity"], 2);

        assert_eq!(store.load().await?, cart);
        Ok(())
    }
}
