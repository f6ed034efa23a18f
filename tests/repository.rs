use diesel::prelude::*;
use pushkind_catalog::domain::product::{NewProduct, ProductUpdate};
use pushkind_catalog::domain::types::{
    CategoryId, ImagePath, ProductId, ProductName, ProductPrice, StockQuantity,
};
use pushkind_catalog::repository::{
    CategoryReader, DieselRepository, ProductReader, ProductSearchQuery, ProductWriter,
    RepositoryError,
};
use pushkind_catalog::schema::products;

mod common;

fn new_product(name: &str, category_id: i32, image: Option<&str>) -> NewProduct {
    NewProduct {
        name: ProductName::new(name).expect("valid product name"),
        category_id: CategoryId::new(category_id).expect("valid category id"),
        stock: StockQuantity::new(10.0).expect("valid stock"),
        price: ProductPrice::new(19.9).expect("valid price"),
        image: image.map(|p| ImagePath::new(p).expect("valid image path")),
    }
}

fn update_for(name: &str, category_id: i32, image: Option<&str>) -> ProductUpdate {
    let product = new_product(name, category_id, image);
    ProductUpdate {
        name: product.name,
        category_id: product.category_id,
        stock: StockQuantity::new(3.5).expect("valid stock"),
        price: ProductPrice::new(7.25).expect("valid price"),
        image: product.image,
    }
}

#[test]
fn test_product_repository_crud() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let category_id = test_db.seed_category("Tools");

    let created = repo
        .create_product(&new_product("Hammer", category_id, Some("products/1-a.png")))
        .expect("should create product");
    assert_eq!(created.name.as_str(), "Hammer");
    assert_eq!(created.price.get(), 19.9);
    assert_eq!(created.image.as_ref().unwrap().as_str(), "products/1-a.png");

    let fetched = repo
        .get_product_by_id(created.id)
        .expect("should query product")
        .expect("product should exist");
    assert_eq!(fetched, created);

    let updated = repo
        .update_product(created.id, &update_for("Claw Hammer", category_id, None))
        .expect("should update product");
    assert_eq!(updated.name.as_str(), "Claw Hammer");
    assert_eq!(updated.stock.get(), 3.5);
    assert_eq!(updated.price.get(), 7.25);
    assert_eq!(
        updated.image.as_ref().unwrap().as_str(),
        "products/1-a.png",
        "image is kept when the update carries none"
    );

    let replaced = repo
        .update_product(
            created.id,
            &update_for("Claw Hammer", category_id, Some("products/2-b.jpg")),
        )
        .expect("should replace image");
    assert_eq!(replaced.image.unwrap().as_str(), "products/2-b.jpg");

    assert_eq!(repo.delete_product(created.id).expect("should delete"), 1);
    assert!(
        repo.get_product_by_id(created.id)
            .expect("should query product")
            .is_none()
    );
}

#[test]
fn list_left_joins_category_names() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let tools = test_db.seed_category("Tools");

    repo.create_product(&new_product("Hammer", tools, None))
        .expect("should create product");
    repo.create_product(&new_product("Orphan", 999, None))
        .expect("should create product without a matching category");

    let products = repo
        .list_products_with_category()
        .expect("should list products");

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].category.as_ref().unwrap().as_str(), "Tools");
    assert!(products[1].category.is_none());

    let value = serde_json::to_value(&products[0]).expect("should serialize");
    assert_eq!(value["name"], "Hammer");
    assert_eq!(value["category"], "Tools");
    assert!(value["image"].is_null());
}

#[test]
fn detail_includes_category_id_and_name() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let garden = test_db.seed_category("Garden");

    let created = repo
        .create_product(&new_product("Rake", garden, None))
        .expect("should create product");

    let detail = repo
        .get_product_detail(created.id)
        .expect("should query product")
        .expect("product should exist");

    let value = serde_json::to_value(&detail).expect("should serialize");
    assert_eq!(value["id"], created.id.get());
    assert_eq!(
        value["category"],
        serde_json::json!({ "id": garden, "name": "Garden" })
    );

    let missing = ProductId::new(created.id.get() + 1).unwrap();
    assert!(repo.get_product_detail(missing).unwrap().is_none());
}

#[test]
fn duplicate_names_are_unique_violations() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let tools = test_db.seed_category("Tools");

    let first = repo
        .create_product(&new_product("Hammer", tools, None))
        .expect("should create product");
    let second = repo
        .create_product(&new_product("Saw", tools, None))
        .expect("should create product");

    let err = repo
        .create_product(&new_product("Hammer", tools, None))
        .expect_err("duplicate insert must fail");
    assert!(matches!(err, RepositoryError::UniqueViolation(_)));

    let err = repo
        .update_product(second.id, &update_for("Hammer", tools, None))
        .expect_err("duplicate update must fail");
    assert!(matches!(err, RepositoryError::UniqueViolation(_)));

    let name = ProductName::new("Hammer").unwrap();
    assert!(repo.product_name_exists(&name, None).unwrap());
    assert!(!repo.product_name_exists(&name, Some(first.id)).unwrap());
    assert!(repo.product_name_exists(&name, Some(second.id)).unwrap());

    let mut conn = test_db.pool().get().expect("should acquire DB connection");
    let count: i64 = products::table
        .count()
        .get_result(&mut conn)
        .expect("should count products");
    assert_eq!(count, 2, "failed writes leave no rows behind");
}

#[test]
fn missing_rows_are_not_found() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let tools = test_db.seed_category("Tools");
    let missing = ProductId::new(42).unwrap();

    assert!(matches!(
        repo.update_product(missing, &update_for("Ghost", tools, None)),
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        repo.delete_product(missing),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn search_filters_case_insensitively_and_orders_by_name() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let tools = test_db.seed_category("Tools");

    for name in ["Widget", "gadget", "Big WIDGET", "100% cotton", "under_score"] {
        repo.create_product(&new_product(name, tools, None))
            .expect("should create product");
    }

    let labels = |search: &str| -> Vec<String> {
        repo.search_products(ProductSearchQuery::default().search(search))
            .expect("should search products")
            .into_iter()
            .map(|p| p.label.into_inner())
            .collect()
    };

    assert_eq!(labels("widget"), vec!["Big WIDGET", "Widget"]);
    assert_eq!(labels("%"), vec!["100% cotton"]);
    assert_eq!(labels("_"), vec!["under_score"]);
    assert_eq!(labels("   ").len(), 5);
    assert!(labels("nothing").is_empty());
}

#[test]
fn search_folds_case_beyond_ascii() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let bakery = test_db.seed_category("Bakery");

    for name in ["Éclair", "Ölkanne", "Baguette"] {
        repo.create_product(&new_product(name, bakery, None))
            .expect("should create product");
    }

    let labels = |search: &str| -> Vec<String> {
        repo.search_products(ProductSearchQuery::default().search(search))
            .expect("should search products")
            .into_iter()
            .map(|p| p.label.into_inner())
            .collect()
    };

    assert_eq!(labels("écl"), vec!["Éclair"]);
    assert_eq!(labels("ÉCL"), vec!["Éclair"]);
    assert_eq!(labels("ölk"), vec!["Ölkanne"]);
    assert_eq!(labels("BAGUETTE"), vec!["Baguette"]);
}

#[test]
fn search_is_capped_at_one_hundred_rows() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let tools = test_db.seed_category("Tools");

    for i in 0..105 {
        repo.create_product(&new_product(&format!("Item {i:03}"), tools, None))
            .expect("should create product");
    }

    let results = repo
        .search_products(ProductSearchQuery::default())
        .expect("should search products");

    assert_eq!(results.len(), 100);
    assert_eq!(results[0].label.as_str(), "Item 000");
    assert_eq!(results[99].label.as_str(), "Item 099");
}

#[test]
fn categories_are_ordered_by_name() {
    let test_db = common::TestDb::new();
    let repo = DieselRepository::new(test_db.pool());
    let tools = test_db.seed_category("Tools");
    let garden = test_db.seed_category("Garden");

    let categories = repo.list_categories().expect("should list categories");

    let ids: Vec<i32> = categories.iter().map(|c| c.id.get()).collect();
    assert_eq!(ids, vec![garden, tools]);
}
