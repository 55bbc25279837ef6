use cucumber::{gherkin::Step, given};
use log::*;
use pricebot_engine::catalog::{CatalogEntry, Category};

use crate::cucumber::ResolverWorld;

#[given("a catalog of items")]
async fn catalog_of_items(world: &mut ResolverWorld, step: &Step) {
    let table = step.table.as_ref().expect("The catalog needs a table of items");
    let items = table
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            let id = row[0].parse::<i64>().expect("Item ids must be numbers");
            CatalogEntry::item(id, row[1].clone())
        })
        .collect::<Vec<_>>();
    let version = world.store.publish([(Category::Item, items)]);
    debug!("🚀️ Catalog version {version} loaded");
}

#[given(expr = "the shortcut {string} for {string}")]
async fn shortcut(world: &mut ResolverWorld, key: String, expansion: String) {
    world.shortcuts.insert(key, expansion);
}

#[given("the standard shortcuts")]
async fn standard_shortcuts(world: &mut ResolverWorld) {
    world.shortcuts = pricebot_engine::ShortcutTable::standard();
}

#[given(expr = "only items {word} are published")]
async fn only_published(world: &mut ResolverWorld, ids: String) {
    let ids = ids.split(',').map(|id| id.trim().parse::<i64>().expect("Item ids must be numbers")).collect();
    world.published = Some(ids);
}

#[given("fuzzy matching is disabled")]
async fn fuzzy_disabled(world: &mut ResolverWorld) {
    world.fuzzy_disabled = true;
}
