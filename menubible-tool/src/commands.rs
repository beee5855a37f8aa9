use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use menubible_core::{
    AdminCapability, Body, CategoryPage, FormMode, ImageRef, ItemDetail, ItemDraft, ItemFilter,
    ItemStore, MenuItem, PendingImage, PriceDisplay, SearchMode, catalog, search,
};

use crate::backend::AppContext;
use crate::error::ToolError;

/// Item fields accepted by `add` and `edit`. Unset flags keep the draft's value.
#[derive(Debug, Default, Args)]
pub struct ItemArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Sub-category, e.g. "Wines"
    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    /// Glass price, for housepouring items
    #[arg(long)]
    pub glass: Option<String>,

    /// Bottle price, for housepouring items
    #[arg(long)]
    pub bottle: Option<String>,

    /// Comma-separated type tags
    #[arg(long, value_delimiter = ',')]
    pub types: Option<Vec<String>>,

    /// light, medium or full (wines only)
    #[arg(long, value_parser = parse_body)]
    pub body: Option<Body>,

    #[arg(long)]
    pub description: Option<String>,

    /// Comma-separated ingredients
    #[arg(long)]
    pub ingredients: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Comma-separated allergen tags
    #[arg(long)]
    pub allergens: Option<String>,

    #[arg(long)]
    pub trivia: Option<String>,

    /// Local image to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

fn parse_body(s: &str) -> Result<Body, String> {
    let wanted = s.trim().to_lowercase();
    Body::ALL
        .into_iter()
        .find(|b| {
            let label = b.label().to_lowercase();
            label == wanted || label.split_whitespace().next() == Some(wanted.as_str())
        })
        .ok_or_else(|| format!("unknown body: {}", s))
}

impl ItemArgs {
    pub fn apply(self, draft: &mut ItemDraft) {
        let text_fields = [
            (self.name, &mut draft.name),
            (self.price, &mut draft.price),
            (self.glass, &mut draft.price_glass),
            (self.bottle, &mut draft.price_bottle),
            (self.description, &mut draft.description),
            (self.ingredients, &mut draft.ingredients),
            (self.notes, &mut draft.method),
            (self.allergens, &mut draft.allergens),
            (self.trivia, &mut draft.trivia),
        ];
        for (value, slot) in text_fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(category) = self.category {
            draft.sub_category = category;
        }
        if let Some(types) = self.types {
            draft.types = types
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if self.body.is_some() {
            draft.body = self.body;
        }
        if let Some(path) = self.image {
            draft.image = ImageRef::Pending(PendingImage::new(path));
        }
    }
}

pub fn format_item_line(item: &MenuItem) -> String {
    let types = if item.types.is_empty() {
        String::new()
    } else {
        format!("  [{}]", item.types.join(", "))
    };
    format!("{:<32} {:>28}{}  ({})", item.name, PriceDisplay::for_item(item).to_string(), types, item.id)
}

fn print_detail(detail: &ItemDetail) {
    println!("{}", detail.name);
    if !detail.types.is_empty() {
        println!("  {}", detail.types.join(" · "));
    }
    println!("  {}", detail.price);
    if let Some(body) = &detail.body {
        println!("  {}", body);
    }
    if let Some(description) = &detail.description {
        println!("\n{}", description);
    }
    if !detail.ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in &detail.ingredients {
            println!("  - {}", ingredient);
        }
    }
    if let Some(notes) = &detail.notes {
        println!("\nNotes:\n  {}", notes);
    }
    if !detail.allergens.is_empty() {
        println!("\nAllergens:");
        for tag in &detail.allergens {
            println!("  {} {}", tag.icon.glyph(), tag.label);
        }
    }
    if !detail.trivia.is_empty() {
        println!("\nDid you know?");
        for sentence in &detail.trivia {
            println!("  • {}.", sentence);
        }
    }
    if let Some(image) = &detail.image {
        println!("\nImage: {}", image);
    }
}

pub async fn list(ctx: &AppContext, category: Option<String>, chip: Option<String>) -> Result<(), ToolError> {
    let Some(category) = category else {
        let mut items = ctx.store.list(&ItemFilter::All, None).await?;
        items.sort_by(|a, b| (&a.sub_category, &a.name).cmp(&(&b.sub_category, &b.name)));
        let mut current: Option<&str> = None;
        for item in &items {
            if current != Some(item.sub_category.as_str()) {
                current = Some(item.sub_category.as_str());
                println!("\n{}", catalog::display_name(&item.sub_category));
            }
            println!("  {}", format_item_line(item));
        }
        return Ok(());
    };

    if !catalog::is_known_category(&category) {
        return Err(ToolError::UnknownCategory(category));
    }

    let mut page = CategoryPage::load(&ctx.store, &category).await?;
    if let Some(chip) = &chip {
        page.select_chip(chip);
    }

    println!("{} {}", page.icon().glyph(), page.title());
    println!("{}", page.description());
    if !page.chips().is_empty() {
        println!("Filter: {}", page.selected_chip());
    }
    println!();
    let displayed = page.displayed();
    if displayed.is_empty() {
        println!("  No items.");
    }
    for item in displayed {
        println!("  {}", format_item_line(item));
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, id: &str, simple: bool) -> Result<(), ToolError> {
    let item = ctx
        .store
        .get(id)
        .await?
        .ok_or_else(|| ToolError::ItemNotFound(id.to_string()))?;
    print_detail(&ItemDetail::new(&item, simple));
    Ok(())
}

pub async fn search_items(ctx: &AppContext, term: &str, mode: SearchMode) -> Result<(), ToolError> {
    let results = search(&ctx.store, term, mode).await?;
    if results.is_empty() {
        println!("No results for \"{}\" ({})", term, mode);
    }
    for item in &results {
        println!("{}  · {}", format_item_line(item), catalog::display_name(&item.sub_category));
    }
    Ok(())
}

pub fn print_catalog() {
    for (section, categories) in catalog::sections() {
        println!("{}", section);
        for category in categories {
            let chips = catalog::type_chips(category);
            if chips.is_empty() {
                println!("  {} {}", catalog::icon(category).glyph(), category);
            } else {
                println!("  {} {}: {}", catalog::icon(category).glyph(), category, chips.join(", "));
            }
        }
    }
}

fn unlock(ctx: &AppContext, passcode: &str) -> Result<AdminCapability, ToolError> {
    ctx.gate.unlock(passcode).ok_or(ToolError::Denied)
}

pub async fn add(ctx: &AppContext, passcode: &str, args: ItemArgs) -> Result<(), ToolError> {
    let admin = unlock(ctx, passcode)?;
    let category = args.category.clone().unwrap_or_default();
    if !catalog::is_known_category(&category) {
        return Err(ToolError::UnknownCategory(category));
    }

    let mut draft = ItemDraft::new(category);
    args.apply(&mut draft);

    let outcome = menubible_core::submit(&admin, &draft, &FormMode::Create, &ctx.store, &ctx.uploader).await?;
    println!("Item added: {}", outcome.id());
    Ok(())
}

pub async fn edit(ctx: &AppContext, passcode: &str, id: &str, args: ItemArgs) -> Result<(), ToolError> {
    let admin = unlock(ctx, passcode)?;
    let item = ctx
        .store
        .get(id)
        .await?
        .ok_or_else(|| ToolError::ItemNotFound(id.to_string()))?;

    let mut draft = ItemDraft::from_item(&item);
    args.apply(&mut draft);

    let mode = FormMode::Edit(id.to_string());
    menubible_core::submit(&admin, &draft, &mode, &ctx.store, &ctx.uploader).await?;
    println!("Item updated: {}", id);
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool, ToolError> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub async fn delete(ctx: &AppContext, passcode: &str, id: &str, yes: bool) -> Result<(), ToolError> {
    let admin = unlock(ctx, passcode)?;
    if !yes {
        let name = ctx.store.get(id).await?.map(|i| i.name).unwrap_or_else(|| id.to_string());
        if !confirm(&format!("Delete \"{}\"?", name))? {
            println!("Cancelled");
            return Ok(());
        }
    }
    menubible_core::delete(&admin, &ctx.store, id).await?;
    println!("Item deleted: {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_parsing_accepts_short_names() {
        assert_eq!(parse_body("light"), Ok(Body::Light));
        assert_eq!(parse_body("Full Bodied"), Ok(Body::Full));
        assert!(parse_body("heavy").is_err());
    }

    #[test]
    fn args_only_override_given_fields() {
        let mut draft = ItemDraft::new("Wines");
        draft.name = "Chablis".to_string();
        draft.price = "280".to_string();

        let args = ItemArgs {
            price: Some("300".to_string()),
            types: Some(vec!["White".to_string(), " ".to_string()]),
            image: Some(PathBuf::from("/tmp/chablis.jpg")),
            ..ItemArgs::default()
        };
        args.apply(&mut draft);

        assert_eq!(draft.name, "Chablis");
        assert_eq!(draft.price, "300");
        assert_eq!(draft.types, vec!["White".to_string()]);
        assert!(matches!(draft.image, ImageRef::Pending(_)));
    }

    #[test]
    fn item_line_hides_price_for_housepouring() {
        let item = menubible_core::ItemRecord {
            name: Some("House White".to_string()),
            types: Some(vec!["Housepouring".to_string()]),
            price: Some(999.0),
            price_glass: Some(40.0),
            price_bottle: Some(170.0),
            ..Default::default()
        }
        .into_item("hw");

        let line = format_item_line(&item);
        assert!(line.contains("40 glass"));
        assert!(!line.contains("999"));
    }
}
