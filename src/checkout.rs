use anyhow::Context as _;
use serde::Serialize;

use crate::cart::{Cart, CartStore};
use crate::catalog::{load_books, print_json};
use crate::cli::{
    CartAddArgs, CartRemoveArgs, CartSetArgs, CartShowArgs, CheckoutArgs, UploadImageArgs,
};
use crate::config;
use crate::formats::CartLine;
use crate::order::{self, Customer};
use crate::overrides::OverrideStore;
use crate::upload;

#[derive(Debug, Serialize)]
struct CartView<'a> {
    lines: &'a [CartLine],
    items: String,
    total: String,
}

impl<'a> CartView<'a> {
    fn new(cart: &'a Cart) -> Self {
        Self {
            lines: cart.lines(),
            items: cart.items_summary(),
            total: cart.total(),
        }
    }
}

pub async fn cart_add(args: CartAddArgs) -> anyhow::Result<()> {
    let books = load_books(&args.source).await.context("load books")?;
    let book = books
        .iter()
        .find(|book| book.title == args.title)
        .ok_or_else(|| anyhow::anyhow!("book not found: {}", args.title))?;

    let store = CartStore::new(&args.cart);
    let mut cart = store.load().await?;
    let quantity = cart.add(book)?;
    store.save(&cart).await?;

    tracing::info!(title = %book.title, quantity, "added to cart");
    print_json(&CartView::new(&cart))
}

pub async fn cart_set(args: CartSetArgs) -> anyhow::Result<()> {
    let store = CartStore::new(&args.cart);
    let mut cart = store.load().await?;
    if !cart.set_quantity(&args.title, args.quantity)? {
        anyhow::bail!("not in cart: {}", args.title);
    }
    store.save(&cart).await?;
    print_json(&CartView::new(&cart))
}

pub async fn cart_remove(args: CartRemoveArgs) -> anyhow::Result<()> {
    let store = CartStore::new(&args.cart);
    let mut cart = store.load().await?;
    if !cart.remove(&args.title) {
        anyhow::bail!("not in cart: {}", args.title);
    }
    store.save(&cart).await?;
    print_json(&CartView::new(&cart))
}

pub async fn cart_show(args: CartShowArgs) -> anyhow::Result<()> {
    let cart = CartStore::new(&args.cart).load().await?;
    print_json(&CartView::new(&cart))
}

pub async fn checkout(args: CheckoutArgs) -> anyhow::Result<()> {
    let endpoint = config::required_endpoint(
        args.order_url.as_deref(),
        config::ORDER_URL_ENV,
        "--order-url",
    )?;

    let store = CartStore::new(&args.cart);
    let mut cart = store.load().await?;
    let customer = Customer {
        name: args.name,
        phone: args.phone,
        address: args.address,
    };
    let submission = order::build_submission(&customer, &cart, chrono::Utc::now())?;

    order::submit(&reqwest::Client::new(), &endpoint, &submission)
        .await
        .context("submit order")?;

    cart.clear();
    store.save(&cart).await?;
    print_json(&submission)
}

pub async fn upload_image(args: UploadImageArgs) -> anyhow::Result<()> {
    let endpoint = config::required_endpoint(
        args.upload_url.as_deref(),
        config::UPLOAD_URL_ENV,
        "--upload-url",
    )?;

    let url = upload::upload_cover(
        &reqwest::Client::new(),
        &endpoint,
        &args.title,
        std::path::Path::new(&args.image),
    )
    .await
    .context("upload cover image")?;

    if let Some(path) = &args.overrides {
        OverrideStore::new(path)
            .save_one(&args.title, &url)
            .await
            .context("record image override")?;
    }

    println!("{url}");
    Ok(())
}
