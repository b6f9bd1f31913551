//! Subcommand execution and terminal output.

use crate::{AddArgs, Command, KeyArgs};
use anyhow::{Context, Result};
use stockcart_core::{
    list_backups, parse_price, FileDocument, InventoryService, Product, ProductDraft, ProductKey,
    StorePaths,
};

type Inventory = InventoryService<FileDocument>;

/// Opens the stores and runs one subcommand.
pub fn execute(command: Command, paths: &StorePaths) -> Result<()> {
    let loaded = InventoryService::open(paths);
    for notice in &loaded.notices {
        eprintln!("warning: {notice}");
    }
    let mut inventory = loaded.store;

    match command {
        Command::List => print_products(&inventory, inventory.products()),
        Command::Search { query, by } => {
            let found = inventory.search(&query, by);
            println!("{} of {} products match ({by})", found.len(), inventory.product_count());
            print_products(&inventory, &found);
        }
        Command::Add(args) => add(&mut inventory, args)?,
        Command::Delete(args) => {
            let key = resolve(&inventory, &args);
            let removed = inventory
                .delete_product(&key)
                .with_context(|| format!("deleting `{key}`"))?;
            if removed == 0 {
                println!("No product matched `{key}`.");
            } else {
                println!("Deleted {removed} product(s) `{key}`.");
            }
            print_total(&inventory);
        }
        Command::Inc(args) => adjust(&mut inventory, &args, 1)?,
        Command::Dec(args) => adjust(&mut inventory, &args, -1)?,
        Command::Adjust { key, delta } => adjust(&mut inventory, &key, delta)?,
        Command::Cart => print_cart(&inventory),
        Command::Total => print_total(&inventory),
        Command::SaveCart => {
            inventory.save_cart().context("saving cart")?;
            println!("Order saved.");
        }
        Command::ClearCart => {
            inventory.clear_cart().context("clearing cart")?;
            println!("Cart cleared.");
        }
        Command::Backup => {
            let path = inventory
                .backup(&paths.backup_dir)
                .context("creating backup")?;
            println!("Data backed up to {}", path.display());
        }
        Command::RestoreDefaults => {
            inventory
                .restore_defaults()
                .context("restoring default products")?;
            println!("Default data restored ({} products).", inventory.product_count());
        }
        Command::RestoreBackup { path } => {
            let count = inventory
                .restore_backup(&path)
                .with_context(|| format!("restoring {}", path.display()))?;
            println!("Restored {count} products from {}.", path.display());
        }
        Command::Backups => print_backups(paths)?,
    }

    Ok(())
}

fn resolve(inventory: &Inventory, args: &KeyArgs) -> ProductKey {
    match (&args.key, &args.name) {
        (Some(rendered), _) => inventory.resolve_key(rendered),
        (None, Some(name)) => ProductKey::new(args.part_number.as_str(), name.as_str()),
        (None, None) => ProductKey::new(args.part_number.as_str(), ""),
    }
}

fn add(inventory: &mut Inventory, args: AddArgs) -> Result<()> {
    let price = parse_price(&args.price)?;
    let draft = ProductDraft {
        part_number: args.part_number,
        product_name: args.name,
        description: args.description,
        country: args.country,
        price,
        barcode: args.barcode,
    };
    let key = inventory.add_product(draft).context("adding product")?;
    println!(
        "Product added `{key}` ({} products).",
        inventory.product_count()
    );
    Ok(())
}

fn adjust(inventory: &mut Inventory, args: &KeyArgs, delta: i64) -> Result<()> {
    let key = resolve(inventory, args);
    if inventory.find_product(&key).is_none() {
        eprintln!("warning: `{key}` is not in the catalog; it will not count toward the total");
    }
    let qty = inventory
        .adjust_quantity(&key, delta)
        .with_context(|| format!("updating quantity for `{key}`"))?;
    println!("{key}: {qty}");
    print_total(inventory);
    Ok(())
}

fn print_products(inventory: &Inventory, products: &[Product]) {
    for product in products {
        let qty = inventory.quantity(&product.key());
        println!(
            "{:<12} {:<40} {:>12.2}  qty {:>3}  barcode {}  {}",
            product.part_number,
            product.product_name,
            product.price,
            qty,
            product.barcode,
            product.country
        );
        if !product.description.is_empty() {
            println!("{:<12} {}", "", product.description);
        }
        if let Some(subtotal) = inventory.line_subtotal(product) {
            println!("{:<12} subtotal {:.2}", "", subtotal);
        }
    }
    println!("Total products: {}", products.len());
}

fn print_cart(inventory: &Inventory) {
    if !inventory.has_items() {
        println!("Cart is empty.");
        return;
    }
    println!("{:<40} {:<15} {:>5} {:>14}", "Product", "Barcode", "Qty", "Subtotal");
    for line in inventory.cart_lines() {
        println!(
            "{:<40} {:<15} {:>5} {:>14.2}",
            line.product_name, line.barcode, line.quantity, line.subtotal
        );
    }
    print_total(inventory);
}

fn print_total(inventory: &Inventory) {
    println!("Cart total: {:.2}", inventory.cart_total());
}

fn print_backups(paths: &StorePaths) -> Result<()> {
    let backups = list_backups(&paths.backup_dir)
        .with_context(|| format!("listing {}", paths.backup_dir.display()))?;
    if backups.is_empty() {
        println!("No backups in {}.", paths.backup_dir.display());
    }
    for path in backups {
        println!("{}", path.display());
    }
    Ok(())
}
