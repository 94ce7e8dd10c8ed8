use super::*;

use lookbook_core::Pricing;

use crate::kv::MemoryKv;

fn make_product(id: &str, name: &str) -> Product {
    Product {
        id: id.to_string(),
        name: Some(name.to_string()),
        titles: None,
        media: None,
        image_url: None,
        pricing: Pricing {
            price: 149.0,
            was: None,
        },
        swatches: vec![],
        variants: vec![],
        stock: None,
    }
}

// -----------------------------------------------------------------------
// Bundle
// -----------------------------------------------------------------------

#[test]
fn new_bundle_stamps_matching_timestamps() {
    let bundle = Bundle::new("Spring Edit", vec![make_product("p1", "Red Dress")], None);

    assert_eq!(bundle.created_at, bundle.updated_at);
    assert!(bundle.created_at > 0);
}

#[test]
fn bundle_ids_are_distinct_even_in_the_same_millisecond() {
    let products = vec![make_product("p1", "Red Dress")];
    let ids: Vec<String> = (0..50)
        .map(|_| Bundle::new("Spring Edit", products.clone(), None).id)
        .collect();

    let unique: std::collections::HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "expected all bundle ids distinct");
}

#[test]
fn bundle_id_has_expected_shape() {
    let bundle = Bundle::new("Spring Edit", vec![], None);
    let parts: Vec<&str> = bundle.id.splitn(3, '_').collect();

    assert_eq!(parts[0], "bundle");
    assert!(parts[1].parse::<i64>().is_ok(), "timestamp segment");
    assert_eq!(parts[2].len(), 7, "random suffix segment");
}

#[test]
fn bundle_captures_products_by_value() {
    let mut selection = vec![make_product("p1", "Red Dress")];
    let bundle = Bundle::new("Spring Edit", selection.clone(), None);

    // Mutating the caller's selection must not reach the saved snapshot.
    selection.clear();

    assert_eq!(bundle.products.len(), 1);
    assert_eq!(bundle.products[0].id, "p1");
}

#[test]
fn apply_patches_name_and_refreshes_updated_at() {
    let bundle = Bundle::new("Spring Edit", vec![make_product("p1", "Red Dress")], None);

    let renamed = bundle.apply(BundlePatch {
        name: Some("Summer Edit".to_string()),
        ..BundlePatch::default()
    });

    assert_eq!(renamed.name, "Summer Edit");
    assert_eq!(renamed.id, bundle.id);
    assert_eq!(renamed.created_at, bundle.created_at);
    assert!(renamed.updated_at >= bundle.updated_at);
    assert_eq!(renamed.products, bundle.products);
}

#[test]
fn apply_with_empty_patch_only_touches_updated_at() {
    let bundle = Bundle::new(
        "Spring Edit",
        vec![make_product("p1", "Red Dress")],
        Some("six looks".to_string()),
    );

    let touched = bundle.apply(BundlePatch::default());

    assert_eq!(touched.name, bundle.name);
    assert_eq!(touched.description, bundle.description);
    assert_eq!(touched.products, bundle.products);
}

#[test]
fn apply_replaces_product_list() {
    let bundle = Bundle::new("Spring Edit", vec![make_product("p1", "Red Dress")], None);

    let swapped = bundle.apply(BundlePatch {
        products: Some(vec![
            make_product("p2", "Tote"),
            make_product("p3", "Court Shoe"),
        ]),
        ..BundlePatch::default()
    });

    assert_eq!(swapped.products.len(), 2);
    assert_eq!(swapped.products[0].id, "p2");
}

// -----------------------------------------------------------------------
// BundleStore
// -----------------------------------------------------------------------

#[test]
fn add_keeps_insertion_order_and_allows_duplicate_names() {
    let mut store = BundleStore::new();
    store.add(Bundle::new("Edit", vec![make_product("p1", "A")], None));
    store.add(Bundle::new("Edit", vec![make_product("p2", "B")], None));

    assert_eq!(store.bundles.len(), 2);
    assert_eq!(store.bundles[0].products[0].id, "p1");
    assert_eq!(store.bundles[1].products[0].id, "p2");
}

#[test]
fn update_replaces_in_place_without_reordering() {
    let mut store = BundleStore::new();
    let first = Bundle::new("First", vec![make_product("p1", "A")], None);
    let second = Bundle::new("Second", vec![make_product("p2", "B")], None);
    store.add(first.clone());
    store.add(second);

    let renamed = first.apply(BundlePatch {
        name: Some("First, renamed".to_string()),
        ..BundlePatch::default()
    });
    assert!(store.update(renamed));

    assert_eq!(store.bundles[0].name, "First, renamed");
    assert_eq!(store.bundles[1].name, "Second");
}

#[test]
fn update_unknown_id_returns_false() {
    let mut store = BundleStore::new();
    let orphan = Bundle::new("Orphan", vec![make_product("p1", "A")], None);

    assert!(!store.update(orphan));
    assert!(store.bundles.is_empty());
}

#[test]
fn remove_clears_selection_when_selected_bundle_is_deleted() {
    let mut store = BundleStore::new();
    let bundle = Bundle::new("Edit", vec![make_product("p1", "A")], None);
    let id = bundle.id.clone();
    store.add(bundle);
    store.select(Some(id.clone()));

    assert!(store.remove(&id));
    assert!(store.selected_bundle_id.is_none());
}

#[test]
fn remove_keeps_selection_when_other_bundle_is_deleted() {
    let mut store = BundleStore::new();
    let keep = Bundle::new("Keep", vec![make_product("p1", "A")], None);
    let discard = Bundle::new("Discard", vec![make_product("p2", "B")], None);
    let keep_id = keep.id.clone();
    let discard_id = discard.id.clone();
    store.add(keep);
    store.add(discard);
    store.select(Some(keep_id.clone()));

    assert!(store.remove(&discard_id));
    assert_eq!(store.selected_bundle_id.as_deref(), Some(keep_id.as_str()));
}

#[test]
fn remove_missing_id_is_a_noop() {
    let mut store = BundleStore::new();
    assert!(!store.remove("bundle_1_zzzzzzz"));
}

#[test]
fn dangling_selection_resolves_to_none_at_read_time() {
    let mut store = BundleStore::new();
    store.select(Some("bundle_1_zzzzzzz".to_string()));

    assert!(store.selected().is_none());
}

#[test]
fn selected_resolves_cursor() {
    let mut store = BundleStore::new();
    let bundle = Bundle::new("Edit", vec![make_product("p1", "A")], None);
    let id = bundle.id.clone();
    store.add(bundle);

    store.select(Some(id.clone()));
    assert_eq!(store.selected().map(|b| b.id.as_str()), Some(id.as_str()));

    store.select(None);
    assert!(store.selected().is_none());
}

// -----------------------------------------------------------------------
// persistence
// -----------------------------------------------------------------------

#[test]
fn load_without_persisted_blob_is_empty() {
    let kv = MemoryKv::new();
    let store = load_bundles(&kv);

    assert!(store.bundles.is_empty());
    assert!(store.selected_bundle_id.is_none());
}

#[test]
fn save_then_load_roundtrips() {
    let kv = MemoryKv::new();
    let mut store = BundleStore::new();
    let bundle = Bundle::new(
        "Spring Edit",
        vec![make_product("p1", "Red Dress")],
        Some("six looks for the launch email".to_string()),
    );
    store.select(Some(bundle.id.clone()));
    store.add(bundle);

    save_bundles(&kv, &store).unwrap();
    let loaded = load_bundles(&kv);

    assert_eq!(loaded, store);
}

#[test]
fn load_discards_unparseable_blob() {
    let kv = MemoryKv::new();
    kv.set(BUNDLES_KEY, "][ not json").unwrap();

    let store = load_bundles(&kv);
    assert!(store.bundles.is_empty());
}
