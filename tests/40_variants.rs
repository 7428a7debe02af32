mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn variants_belong_to_their_product() -> Result<()> {
    let app = require_app!(common::spawn_app());
    let admin = app.admin().await?;
    let product = app
        .create_product(&admin, &common::unique_tag("tee"), "https://cdn.test/tee.png")
        .await?;
    let product_id = product["id"].as_str().unwrap_or_default();

    let small = app.create_variant(&admin, product_id, "Small", 4).await?;
    app.create_variant(&admin, product_id, "Large", 0).await?;
    assert_eq!(small["productID"], product_id);
    assert_eq!(small["quantity"], 4);

    let detail: Value = app
        .get(&admin, &format!("/api/products/{}", product_id))
        .send()
        .await?
        .json()
        .await?;
    let names: Vec<&str> = detail["variants"]
        .as_array()
        .map(|v| v.iter().filter_map(|x| x["variantName"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Small", "Large"]);

    let listed: Vec<Value> = app
        .get(&admin, "/api/products/variants")
        .query(&[("productID", product_id)])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed.len(), 2);
    Ok(())
}

#[tokio::test]
async fn variant_validation() -> Result<()> {
    let app = require_app!(common::spawn_app());
    let admin = app.admin().await?;
    let product = app
        .create_product(&admin, &common::unique_tag("cap"), "https://cdn.test/cap.png")
        .await?;
    let product_id = product["id"].as_str().unwrap_or_default();

    let res = app
        .post(&admin, "/api/products/variants")
        .json(&json!({ "variantName": "Neg", "quantity": -1, "productID": product_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .post(&admin, "/api/products/variants")
        .json(&json!({ "variantName": "", "quantity": 1, "productID": product_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = app
        .post(&admin, "/api/products/variants")
        .json(&json!({ "variantName": "Orphan", "quantity": 1, "productID": uuid::Uuid::new_v4() }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn update_and_delete_variant() -> Result<()> {
    let app = require_app!(common::spawn_app());
    let admin = app.admin().await?;
    let product = app
        .create_product(&admin, &common::unique_tag("sock"), "https://cdn.test/sock.png")
        .await?;
    let product_id = product["id"].as_str().unwrap_or_default();
    let variant = app.create_variant(&admin, product_id, "Pair", 2).await?;
    let path = format!("/api/products/variants/{}", variant["id"].as_str().unwrap_or_default());

    let res = app
        .put(&admin, &path)
        .json(&json!({ "variantName": "Three pack", "quantity": 9 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let fetched: Value = app.get(&admin, &path).send().await?.json().await?;
    assert_eq!(fetched["variantName"], "Three pack");
    assert_eq!(fetched["quantity"], 9);

    let res = app.delete(&admin, &path).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.get(&admin, &path).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_owner_cannot_touch_variants() -> Result<()> {
    let app = require_app!(common::spawn_app());
    let owner = app.admin().await?;
    let intruder = app.admin().await?;
    let product = app
        .create_product(&owner, &common::unique_tag("hat"), "https://cdn.test/hat.png")
        .await?;
    let product_id = product["id"].as_str().unwrap_or_default();
    let variant = app.create_variant(&owner, product_id, "Wool", 5).await?;
    let path = format!("/api/products/variants/{}", variant["id"].as_str().unwrap_or_default());

    let res = app
        .post(&intruder, "/api/products/variants")
        .json(&json!({ "variantName": "Sneaky", "quantity": 1, "productID": product_id }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app
        .put(&intruder, &path)
        .json(&json!({ "variantName": "Sneaky", "quantity": 0 }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app.delete(&intruder, &path).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Reads are not scoped to the owner
    let fetched: Value = app.get(&intruder, &path).send().await?.json().await?;
    assert_eq!(fetched["variantName"], "Wool");
    assert_eq!(fetched["quantity"], 5);
    Ok(())
}

#[tokio::test]
async fn variant_list_rejects_bad_product_filter() -> Result<()> {
    let app = require_app!(common::spawn_app());
    let admin = app.admin().await?;

    let res = app
        .get(&admin, "/api/products/variants")
        .query(&[("productID", "not-a-uuid")])
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
