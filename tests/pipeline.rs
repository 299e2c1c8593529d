use larder_core::{ItemCatalog, ItemRegistry};
use larder_world::{
    CookingCatalog, CookingStation, CraftError, CraftingBook, Inventory, Selection, StationConfig,
};
use std::sync::Arc;

const ITEMS: &str = r#"
[
  { "id": "wood", "name": "Wood", "stack_size": 99 },
  { "id": "apple", "name": "Apple", "stack_size": 16, "tags": ["food"] },
  { "id": "bread", "name": "Bread", "stack_size": 16, "tags": ["food"] },
  { "id": "cooked_apple", "name": "Cooked Apple", "stack_size": 16 },
  { "id": "burned_apple", "name": "Burned Apple", "stack_size": 16 },
  { "id": "apple_pie", "name": "Apple Pie", "stack_size": 4 },
  { "id": "burned_apple_pie", "name": "Burned Apple Pie", "stack_size": 4 },
  { "id": "picnic_basket", "name": "Picnic Basket", "stack_size": 1, "tags": ["craftable"] },
  { "id": "iron_sword", "name": "Iron Sword", "stack_size": 1, "tags": ["weapon"], "max_durability": 250.0 }
]
"#;

const COOKING: &str = r#"
[
  {
    "key": "cooked_apple",
    "inputs": [{ "item_id": "apple", "qty": 1 }],
    "cooked": { "item_id": "cooked_apple", "qty": 1 },
    "burned": { "item_id": "burned_apple", "qty": 1 },
    "cook_time": 5.0,
    "burn_time": 5.0
  },
  {
    "key": "apple_pie",
    "inputs": [{ "item_id": "apple", "qty": 1 }, { "item_id": "bread", "qty": 1 }],
    "cooked": { "item_id": "apple_pie", "qty": 1 },
    "burned": { "item_id": "burned_apple_pie", "qty": 1 },
    "cook_time": 10.0,
    "burn_time": 10.0
  }
]
"#;

const CRAFTING: &str = r#"
[
  {
    "output_id": "picnic_basket",
    "inputs": [{ "item_id": "wood", "qty": 4 }, { "item_id": "apple_pie", "qty": 2 }]
  }
]
"#;

struct World {
    items: Arc<ItemCatalog>,
    registry: ItemRegistry,
    station: CookingStation,
    book: CraftingBook,
}

fn world() -> World {
    let items = Arc::new(ItemCatalog::from_json_str(ITEMS).expect("valid items"));
    let cooking = Arc::new(CookingCatalog::load_from_str(COOKING).expect("valid cooking recipes"));
    let book = CraftingBook::load_from_str(Arc::clone(&items), CRAFTING).expect("valid crafting recipes");
    World {
        registry: ItemRegistry::new(Arc::clone(&items)),
        station: CookingStation::new(Arc::clone(&items), cooking, StationConfig::default()),
        items,
        book,
    }
}

#[test]
fn cook_collect_and_craft_from_json() {
    let World {
        items,
        mut registry,
        mut station,
        book,
    } = world();
    assert_eq!(items.len(), 9);

    let mut bag = Inventory::new(6);
    bag.add(&mut registry, "wood", 10);

    assert_eq!(station.add_ingredient(0, "apple", 2), 2);
    assert_eq!(station.add_ingredient(1, "bread", 2), 2);
    assert_eq!(station.preview_recipe_key(), Some("apple_pie"));
    assert_eq!(station.select_recipe_by_index(0), Ok(Selection::Ready));

    station.advance(10.0);
    station.advance(10.0);
    assert_eq!(station.collect_cooked(&mut bag, &mut registry, 0, None), 2);
    assert_eq!(bag.count("apple_pie"), 2);
    assert!(station.inputs().iter().all(Option::is_none));

    book.craft(&mut bag, &mut registry, "picnic_basket", 1)
        .expect("materials are in the bag");
    assert_eq!(bag.count("picnic_basket"), 1);
    assert_eq!(bag.count("apple_pie"), 0);
    assert_eq!(bag.count("wood"), 6);

    let err = book.can_craft(&bag, "picnic_basket", 1).unwrap_err();
    assert!(matches!(err, CraftError::MissingMaterials { .. }));
    assert_eq!(
        err.to_string(),
        "Missing materials: apple_pie: need 2, have 0 (short 2)."
    );
}

#[test]
fn uncollected_batch_burns_one_unit_at_a_time() {
    let World {
        mut registry,
        mut station,
        ..
    } = world();

    station.add_ingredient(0, "apple", 2);
    station.select_recipe_by_key("cooked_apple").unwrap();
    station.advance(5.0);
    station.advance(5.0);
    assert!(!station.is_cooking());

    station.advance(5.0);
    station.advance(5.0);

    let mut bag = Inventory::new(2);
    assert_eq!(station.collect_cooked(&mut bag, &mut registry, 0, None), 0);
    assert_eq!(station.collect_burned(&mut bag, &mut registry, 0, None), 2);
    assert_eq!(bag.count("burned_apple"), 2);
}

#[test]
fn sword_durability_survives_rearranging() {
    let World { mut registry, .. } = world();
    let mut bag = Inventory::new(4);
    bag.set_slot(&mut registry, 3, "iron_sword", 1, Some(100.0))
        .unwrap();
    bag.add(&mut registry, "wood", 150);
    let sword = bag.get(3).and_then(|stack| stack.instance).unwrap();

    registry.lose_durability(sword, 25.0);
    bag.sort(&registry);

    let slot = bag
        .slots()
        .iter()
        .position(|stack| stack.as_ref().and_then(|s| s.instance) == Some(sword))
        .unwrap();
    assert_eq!(bag.get(slot).map(|s| s.item_id.as_str()), Some("iron_sword"));
    assert_eq!(registry.durability(sword), Some(75.0));
    assert_eq!(registry.durability_ratio(sword), Some(0.3));
}
