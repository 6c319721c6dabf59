//! Runs one subcommand against the cart.

use crate::{
    cli::{
        args::{AddArgs, Command},
        terminal::{TerminalObserver, render_view},
    },
    core::{
        cart::{CartEngine, CartSignal, dispatch},
        item::{CartItem, parse_quantity},
        menu::MenuCatalog,
        receipt::{DocumentSink, ReceiptExporter},
        request::{CustomizationConfig, IngredientOption, ItemRequest, NumberInput, StaticForm, build_item},
        store::CartStore,
        view::{CartView, format_money},
    },
    errors::{Error, Result},
};
use chrono::Local;
use std::io::Write;
use tracing::{info, instrument, warn};

const QUANTITY_INPUT: &str = "quantity";
const ORDER_TYPE_INPUT: &str = "order-type";
const COMMENTS_INPUT: &str = "comments";

/// Everything a subcommand needs: the cart, the menu and the receipt exporter.
pub struct Session<S, D> {
    engine: CartEngine<S>,
    catalog: MenuCatalog,
    exporter: ReceiptExporter,
    sink: D,
    observer: TerminalObserver,
}

impl<S: CartStore, D: DocumentSink> Session<S, D> {
    /// Creates a session over `engine`, delivering receipts to `sink`.
    #[must_use]
    pub fn new(
        engine: CartEngine<S>,
        catalog: MenuCatalog,
        exporter: ReceiptExporter,
        sink: D,
    ) -> Self {
        Self {
            engine,
            catalog,
            exporter,
            sink,
            observer: TerminalObserver::new(),
        }
    }

    /// The cart engine.
    pub const fn engine(&self) -> &CartEngine<S> {
        &self.engine
    }

    /// Runs `command`, printing results to `out`.
    ///
    /// # Errors
    /// Storage failures, unknown line positions and export failures other
    /// than a missing PDF backend, which is reported on `out` instead.
    #[instrument(skip(self, out))]
    pub async fn run(&self, command: Command, out: &mut impl Write) -> Result<()> {
        match command {
            Command::Menu => self.print_menu(out),
            Command::Add(args) => {
                let (request, form) = self.request_for(&args)?;
                let item = build_item(&request, &form, &self.catalog);
                let signals = self.engine.add_item(item).await?;
                self.report(&signals, out).await
            }
            Command::Remove { line } => {
                let item = self.line_at(line).await?;
                let signals = self
                    .engine
                    .remove_item(&item.name, item.extras.as_ref())
                    .await?;
                self.report(&signals, out).await
            }
            Command::Update { line, quantity } => {
                let item = self.line_at(line).await?;
                let signals = self
                    .engine
                    .update_quantity(
                        &item.name,
                        item.extras.as_ref(),
                        i64::from(parse_quantity(&quantity)),
                    )
                    .await?;
                self.report(&signals, out).await
            }
            Command::Clear => {
                let signals = self.engine.clear().await?;
                self.report(&signals, out).await
            }
            Command::Show => self.print_cart(out).await,
            Command::Export => self.export(out).await,
        }
    }

    /// Builds the request and control values an "add" would hand over.
    fn request_for(&self, args: &AddArgs) -> Result<(ItemRequest, StaticForm)> {
        let mut form = StaticForm::new();
        if let Some(quantity) = &args.quantity {
            form = form.with_value(QUANTITY_INPUT, quantity.as_str());
        }

        let mut request = if let Some(entry) = self.catalog.find(&args.item) {
            if let Some(customization) = &entry.customization {
                form = fill_form(form, customization, args);
            } else if has_customization(args) {
                warn!("{} takes no customization, ignoring it", entry.name);
            }
            MenuCatalog::request_for(entry, Some(QUANTITY_INPUT))?
        } else {
            info!("{} is not on the menu, adding it as given", args.item);
            let customization = ad_hoc_customization(args);
            if let Some(customization) = &customization {
                form = fill_form(form, customization, args);
            }
            ItemRequest {
                name: args.item.clone(),
                price: None,
                category: String::new(),
                quantity_id: Some(QUANTITY_INPUT.to_string()),
                extras: customization
                    .as_ref()
                    .map(serde_json::to_string)
                    .transpose()?,
            }
        };

        if let Some(price) = &args.price {
            request.price = Some(NumberInput::Text(price.clone()));
        }
        if let Some(category) = &args.category {
            request.category.clone_from(category);
        }
        Ok((request, form))
    }

    async fn line_at(&self, position: usize) -> Result<CartItem> {
        let mut items = self.engine.items().await?;
        match position.checked_sub(1) {
            Some(index) if index < items.len() => Ok(items.swap_remove(index)),
            _ => Err(Error::LineNotFound { index: position }),
        }
    }

    async fn report(&self, signals: &[CartSignal], out: &mut impl Write) -> Result<()> {
        dispatch(&self.observer, signals);
        for notice in self.observer.take_notices() {
            writeln!(out, "{notice}")?;
        }
        if self.observer.take_show_cart() {
            self.print_cart(out).await?;
        }
        Ok(())
    }

    async fn print_cart(&self, out: &mut impl Write) -> Result<()> {
        let items = self.engine.items().await?;
        let view = CartView::from_items(&items, &self.exporter.settings().currency_symbol);
        for line in render_view(&view) {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }

    fn print_menu(&self, out: &mut impl Write) -> Result<()> {
        let symbol = self.exporter.settings().currency_symbol.as_str();
        if self.catalog.entries().is_empty() {
            writeln!(out, "No menu configured.")?;
        }
        for entry in self.catalog.entries() {
            writeln!(
                out,
                "{}  {} [{}]  {}",
                entry.id,
                entry.name,
                entry.category,
                format_money(symbol, entry.base_price)
            )?;
            for (order_type, price) in &entry.prices {
                writeln!(out, "      {order_type}: {}", format_money(symbol, *price))?;
            }
        }
        Ok(())
    }

    async fn export(&self, out: &mut impl Write) -> Result<()> {
        let items = self.engine.items().await?;
        match self
            .exporter
            .export(&items, Local::now().naive_local(), &self.sink)
        {
            Ok(receipt) => writeln!(
                out,
                "Receipt saved to {} ({} page(s))",
                receipt.location.display(),
                receipt.document.pages.len()
            )?,
            Err(Error::ExportUnavailable) => writeln!(out, "{}", Error::ExportUnavailable)?,
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

fn has_customization(args: &AddArgs) -> bool {
    args.order_type.is_some() || !args.ingredients.is_empty() || args.comments.is_some()
}

/// Customization controls for a product that is not on the menu: one per option given.
fn ad_hoc_customization(args: &AddArgs) -> Option<CustomizationConfig> {
    if !has_customization(args) {
        return None;
    }

    let ingredients = (!args.ingredients.is_empty()).then(|| {
        args.ingredients
            .iter()
            .enumerate()
            .map(|(index, name)| IngredientOption {
                id: format!("ingredient-{index}"),
                name: name.clone(),
            })
            .collect()
    });

    Some(CustomizationConfig {
        order_type_id: args.order_type.as_ref().map(|_| ORDER_TYPE_INPUT.to_string()),
        ingredients,
        comments_id: args.comments.as_ref().map(|_| COMMENTS_INPUT.to_string()),
    })
}

/// Sets the controls named by `config` from the command line options.
fn fill_form(mut form: StaticForm, config: &CustomizationConfig, args: &AddArgs) -> StaticForm {
    if let (Some(id), Some(order_type)) = (&config.order_type_id, &args.order_type) {
        form = form.with_value(id.as_str(), order_type.as_str());
    }
    if let (Some(id), Some(comments)) = (&config.comments_id, &args.comments) {
        form = form.with_value(id.as_str(), comments.as_str());
    }

    let options = config.ingredients.as_deref().unwrap_or_default();
    for wanted in &args.ingredients {
        let found = options
            .iter()
            .find(|option| option.id == *wanted || option.name.to_lowercase() == wanted.to_lowercase());
        match found {
            Some(option) => form = form.with_checked(option.id.as_str()),
            None => warn!("Unknown ingredient {:?}, ignoring it", wanted),
        }
    }
    form
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::config::app::{MenuItemConfig, ReceiptSettings};
    use crate::core::receipt::DirectorySink;
    use crate::core::store::MemoryStore;
    use crate::test_utils::init_test_tracing;

    fn catalog() -> MenuCatalog {
        MenuCatalog::new(vec![
            MenuItemConfig {
                id: "pozole".to_string(),
                name: "Pozole".to_string(),
                category: "Caldos".to_string(),
                base_price: 95.0,
                prices: [("completa".to_string(), 95.0), ("media".to_string(), 60.0)]
                    .into_iter()
                    .collect(),
                customization: Some(CustomizationConfig {
                    order_type_id: Some("order-type-pozole".to_string()),
                    ingredients: Some(vec![
                        IngredientOption {
                            id: "ing-oregano".to_string(),
                            name: "Orégano".to_string(),
                        },
                        IngredientOption {
                            id: "ing-limon".to_string(),
                            name: "Limón".to_string(),
                        },
                    ]),
                    comments_id: Some("comments-pozole".to_string()),
                }),
            },
            MenuItemConfig {
                id: "agua".to_string(),
                name: "Agua fresca".to_string(),
                category: "Bebidas".to_string(),
                base_price: 25.0,
                prices: Default::default(),
                customization: None,
            },
        ])
    }

    fn session(
        exporter: ReceiptExporter,
        dir: &std::path::Path,
    ) -> Session<MemoryStore, DirectorySink> {
        Session::new(
            CartEngine::new(MemoryStore::new()),
            catalog(),
            exporter,
            DirectorySink::new(dir),
        )
    }

    async fn run(session: &Session<MemoryStore, DirectorySink>, command: Command) -> Result<String> {
        let mut out = Vec::new();
        session.run(command, &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn add(item: &str) -> AddArgs {
        AddArgs {
            item: item.to_string(),
            ..AddArgs::default()
        }
    }

    #[tokio::test]
    async fn test_add_from_menu_with_customization() -> Result<()> {
        init_test_tracing();
        let dir = tempfile::tempdir()?;
        let session = session(ReceiptExporter::with_backend(ReceiptSettings::default(), None), dir.path());

        let args = AddArgs {
            quantity: Some("2".to_string()),
            order_type: Some("Media".to_string()),
            ingredients: vec!["limón".to_string(), "cilantro".to_string()],
            comments: Some(" sin chile ".to_string()),
            ..add("pozole")
        };
        let output = run(&session, Command::Add(args)).await?;
        assert!(output.contains("Cart: 2 item(s)"));
        assert!(output.contains("Pozole added to cart"));
        assert!(output.contains("Total: $120.00"));

        let items = session.engine().items().await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].price, 60.0);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].category, "Caldos");
        let extras = items[0].extras.as_ref().unwrap();
        assert_eq!(extras.order_type.as_deref(), Some("Media"));
        assert_eq!(extras.ingredients, vec!["Limón"]);
        assert_eq!(extras.comments, "sin chile");
        Ok(())
    }

    #[tokio::test]
    async fn test_repeated_add_merges_lines() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let session = session(ReceiptExporter::with_backend(ReceiptSettings::default(), None), dir.path());

        run(&session, Command::Add(add("agua"))).await?;
        run(&session, Command::Add(add("Agua Fresca"))).await?;
        run(
            &session,
            Command::Add(AddArgs {
                order_type: Some("Completa".to_string()),
                ..add("pozole")
            }),
        )
        .await?;

        let items = session.engine().items().await?;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(session.engine().total().await?, 145.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_ad_hoc_item_uses_given_price_and_options() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let session = session(ReceiptExporter::with_backend(ReceiptSettings::default(), None), dir.path());

        let args = AddArgs {
            price: Some("70".to_string()),
            category: Some("Antojitos".to_string()),
            ingredients: vec!["Queso".to_string(), "Crema".to_string()],
            ..add("Flautas")
        };
        run(&session, Command::Add(args)).await?;

        let items = session.engine().items().await?;
        assert_eq!(items[0].name, "Flautas");
        assert_eq!(items[0].price, 70.0);
        assert_eq!(items[0].category, "Antojitos");
        let extras = items[0].extras.as_ref().unwrap();
        assert_eq!(extras.order_type, None);
        assert_eq!(extras.ingredients, vec!["Queso", "Crema"]);

        run(&session, Command::Add(add("Refresco"))).await?;
        let items = session.engine().items().await?;
        assert_eq!(items[1].price, 0.0);
        assert!(items[1].extras.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_remove_by_position() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let session = session(ReceiptExporter::with_backend(ReceiptSettings::default(), None), dir.path());
        run(&session, Command::Add(add("agua"))).await?;
        run(&session, Command::Add(add("pozole"))).await?;

        run(
            &session,
            Command::Update {
                line: 1,
                quantity: "4".to_string(),
            },
        )
        .await?;
        assert_eq!(session.engine().item_count().await?, 5);

        // Non-numeric text means 1
        run(
            &session,
            Command::Update {
                line: 1,
                quantity: "muchos".to_string(),
            },
        )
        .await?;
        assert_eq!(session.engine().items().await?[0].quantity, 1);

        let result = run(&session, Command::Remove { line: 3 }).await;
        assert!(matches!(result, Err(Error::LineNotFound { index: 3 })));
        let result = run(&session, Command::Remove { line: 0 }).await;
        assert!(matches!(result, Err(Error::LineNotFound { index: 0 })));

        let output = run(&session, Command::Remove { line: 1 }).await?;
        assert!(output.contains("Cart: 1 item(s)"));
        let items = session.engine().items().await?;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Pozole");
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_and_show_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let session = session(ReceiptExporter::with_backend(ReceiptSettings::default(), None), dir.path());
        run(&session, Command::Add(add("agua"))).await?;

        let output = run(&session, Command::Clear).await?;
        assert!(output.contains("Cart: 0 item(s)"));

        let output = run(&session, Command::Show).await?;
        assert_eq!(
            output,
            "Your cart is empty. Add products from any page.\nTotal: $0.00\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_menu_listing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let session = session(ReceiptExporter::with_backend(ReceiptSettings::default(), None), dir.path());

        let output = run(&session, Command::Menu).await?;
        assert!(output.contains("pozole  Pozole [Caldos]  $95.00"));
        assert!(output.contains("      media: $60.00"));
        assert!(output.contains("agua  Agua fresca [Bebidas]  $25.00"));
        Ok(())
    }

    #[tokio::test]
    async fn test_export_without_backend_alerts() -> Result<()> {
        init_test_tracing();
        let dir = tempfile::tempdir()?;
        let session = session(ReceiptExporter::with_backend(ReceiptSettings::default(), None), dir.path());
        run(&session, Command::Add(add("agua"))).await?;

        let output = run(&session, Command::Export).await?;
        assert_eq!(
            output,
            "The PDF generator is not available. The receipt could not be created.\n"
        );
        assert!(!dir.path().join("order.pdf").exists());
        assert_eq!(session.engine().item_count().await?, 1);
        Ok(())
    }

    #[cfg(feature = "pdf")]
    #[tokio::test]
    async fn test_export_writes_pdf() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let session = session(ReceiptExporter::new(ReceiptSettings::default()), dir.path());
        run(&session, Command::Add(add("pozole"))).await?;

        let output = run(&session, Command::Export).await?;
        assert!(output.starts_with("Receipt saved to "));
        let bytes = std::fs::read(dir.path().join("order.pdf"))?;
        assert!(bytes.starts_with(b"%PDF"));
        Ok(())
    }
}
