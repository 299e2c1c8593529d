//! Scripted runs that exercise the engines end to end and print each step.

use crate::config::{Catalogs, LarderConfig};
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use larder_core::ItemRegistry;
use larder_world::{transfer, CookingStation, Player, Storage};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Seed, merge, split, swap, remove, add and sort.
    Inventory,
    /// Weapon and armor wear, clamping and swaps.
    Durability,
    /// Load a station, cook a batch, let the rest burn, collect.
    Cooking,
    /// Readiness reports and crafting.
    Crafting,
    /// Every scenario in turn.
    All,
}

pub fn run(scenario: Scenario, catalogs: &Catalogs, config: &LarderConfig, ticks: u32) -> Result<()> {
    info!(?scenario, "running scenario");
    match scenario {
        Scenario::Inventory => inventory(catalogs, config),
        Scenario::Durability => durability(catalogs, config),
        Scenario::Cooking => cooking(catalogs, config, ticks),
        Scenario::Crafting => crafting(catalogs, config),
        Scenario::All => {
            inventory(catalogs, config)?;
            durability(catalogs, config)?;
            cooking(catalogs, config, ticks)?;
            crafting(catalogs, config)
        }
    }
}

fn heading(title: &str) {
    println!("\n=== {title} ===");
}

fn inventory(catalogs: &Catalogs, config: &LarderConfig) -> Result<()> {
    let mut reg = ItemRegistry::new(catalogs.items.clone());
    let mut player = Player::new("Player", config.inventory_capacity.max(8));

    heading("Seed slots");
    player.set_slot(&mut reg, 0, "wood", 95, None)?;
    player.set_slot(&mut reg, 1, "wood", 20, None)?;
    player.set_slot(&mut reg, 2, "apple", 5, None)?;
    player.set_slot(&mut reg, 4, "iron_sword", 1, None)?;
    println!("{}", player.inventory());

    heading("Merge wood 1 -> 0");
    player.move_stack(&mut reg, 1, 0);
    println!("{}", player.inventory());

    heading("Split 8 wood 1 -> 3");
    println!("split ok? {}", player.split(&reg, 1, 3, 8));
    println!("split onto occupied 2 -> 0 ok? {}", player.split(&reg, 2, 0, 2));
    println!("{}", player.inventory());

    heading("Split half 0 -> 6");
    println!("split half ok? {}", player.split_half(&reg, 0, 6));
    println!("{}", player.inventory());

    heading("Swap sword 4 <-> 0");
    println!("swap ok? {}", player.move_stack(&mut reg, 4, 0));
    println!("{}", player.inventory());

    heading("Remove 10 wood, rightmost first");
    let before = player.count("wood");
    let removed = player.remove(&mut reg, "wood", 10);
    println!("wood before = {before}, removed = {removed}, after = {}", player.count("wood"));
    println!("{}", player.inventory());

    heading("Add 25 wood");
    let added = player.add(&mut reg, "wood", 25);
    println!("added: {added}");
    println!("{}", player.inventory());

    heading("Sort");
    player.sort(&reg);
    print!("{}", player.show(&reg, true));

    if player.count("wood") != before - removed + added {
        bail!("wood total drifted during rearranging");
    }
    Ok(())
}

fn durability(catalogs: &Catalogs, config: &LarderConfig) -> Result<()> {
    let mut reg = ItemRegistry::new(catalogs.items.clone());
    let mut chest = Storage::new("Chest", config.storage_capacity.max(8));
    let mut player = Player::new("Player", config.inventory_capacity.max(8));

    let sword_max = catalogs
        .items
        .get("iron_sword")
        .and_then(|def| def.max_durability)
        .context("iron_sword needs a max durability")?;
    let armor_max = catalogs
        .items
        .get("cloth_armor")
        .and_then(|def| def.max_durability)
        .unwrap_or(60.0);

    heading("Seed worn gear");
    chest.set_slot(&mut reg, 1, "iron_sword", 1, Some(sword_max * 0.80))?;
    chest.set_slot(&mut reg, 2, "iron_sword", 1, Some(sword_max * 0.45))?;
    chest.set_slot(&mut reg, 5, "cloth_armor", 1, None)?;
    chest.set_slot(&mut reg, 6, "cloth_armor", 1, Some(armor_max * 0.50))?;
    chest.add(&mut reg, "wood", 150);
    print!("{}", chest.show(&reg, true));

    heading("Wear the first sword");
    let sword = chest
        .inventory()
        .get(1)
        .and_then(|stack| stack.instance)
        .context("seeded sword has no instance")?;
    println!("start: {:?}", reg.durability(sword));
    println!("after wear 12.5: {:?}", reg.lose_durability(sword, 12.5));
    println!("after negative wear: {:?}", reg.lose_durability(sword, -5.0));
    println!("set 250: {:?}", reg.set_durability(sword, 250.0));
    println!("set -10: {:?}", reg.set_durability(sword, -10.0));
    println!(
        "ratio: {:.1}%",
        reg.durability_ratio(sword).unwrap_or_default() * 100.0
    );

    heading("Swap swords 1 <-> 2");
    println!("swap ok? {}", chest.move_stack(&mut reg, 1, 2));
    if chest.inventory().get(2).and_then(|stack| stack.instance) != Some(sword) {
        bail!("sword instance did not travel with its stack");
    }
    print!("{}", chest.show(&reg, true));

    heading("Hand the armor to the player");
    transfer(&reg, chest.inventory_mut(), 6, player.inventory_mut(), 0);
    print!("{}", player.show(&reg, true));
    Ok(())
}

fn cooking(catalogs: &Catalogs, config: &LarderConfig, ticks: u32) -> Result<()> {
    let mut reg = ItemRegistry::new(catalogs.items.clone());
    let mut player = Player::new("Player", config.inventory_capacity);
    let mut station = CookingStation::new(
        catalogs.items.clone(),
        catalogs.cooking.clone(),
        config.station,
    );

    heading("Load ingredients");
    println!("apples accepted: {}", station.add_ingredient(0, "apple", 3));
    println!("bread accepted: {}", station.add_ingredient(1, "bread", 1));
    println!("{}", station.format_recipe_options());

    heading("Select the best option");
    match station.select_recipe_by_index(0) {
        Ok(selection) => println!("{selection}"),
        Err(err) => bail!("selection failed: {err}"),
    }
    println!("{}", station.status_text());

    heading(&format!("Advance {ticks} ticks of {}s", config.tick_seconds));
    for tick in 0..ticks {
        station.advance(config.tick_seconds);
        if let Some(progress) = station.job_progress() {
            info!(tick, progress, "cooking");
        }
    }
    println!("{}", station.status_text());

    heading("Switch to apples");
    while station.is_cooking() {
        station.advance(config.tick_seconds);
    }
    match station.select_recipe_by_key("cooked_apple") {
        Ok(selection) => println!("{selection}"),
        Err(err) => println!("{err}"),
    }
    for _ in 0..ticks {
        station.advance(config.tick_seconds);
    }
    println!("{}", station.status_text());

    heading("Collect");
    let outputs = station.cooked_out().len();
    let mut cooked = 0;
    let mut burned = 0;
    for slot in 0..outputs {
        cooked += station.collect_cooked(player.inventory_mut(), &mut reg, slot, None);
        burned += station.collect_burned(player.inventory_mut(), &mut reg, slot, None);
    }
    println!("collected {cooked} cooked, {burned} burned");
    println!("{}", player.inventory());
    Ok(())
}

fn crafting(catalogs: &Catalogs, config: &LarderConfig) -> Result<()> {
    let mut reg = ItemRegistry::new(catalogs.items.clone());
    let mut player = Player::new("Player", config.inventory_capacity);
    let book = &catalogs.crafting;

    player.add(&mut reg, "wood", 7);
    player.add(&mut reg, "iron_ingot", 1);
    player.add(&mut reg, "stick", 2);
    println!("{}", player.inventory());

    for (output, times) in [("wooden_pickaxe", 1), ("wooden_pickaxe", 3), ("iron_pickaxe", 1), ("torch", 2)] {
        heading(&format!("Craft {output} x{times}"));
        match book.can_craft(player.inventory(), output, times) {
            Ok(readiness) => println!("can craft: {readiness}"),
            Err(err) => println!("cannot craft: {err}"),
        }
        match book.craft(player.inventory_mut(), &mut reg, output, times) {
            Ok(()) => println!("crafted."),
            Err(err) => println!("craft failed: {err}"),
        }
        println!("{}", player.inventory());
    }
    Ok(())
}
