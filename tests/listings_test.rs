use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kerala_classifieds::error::Error;
use kerala_classifieds::listings::{ListingQuery, SortKey};
use kerala_classifieds::Marketplace;

fn ad_row(title: &str, price: Option<f64>) -> serde_json::Value {
    json!({
        "id": Uuid::new_v4(),
        "title": title,
        "description": "A reasonable description of the item on offer",
        "price": price,
        "price_type": "fixed",
        "category_id": Uuid::new_v4(),
        "location_id": Uuid::new_v4(),
        "user_id": Uuid::new_v4(),
        "images": [],
        "contact_phone": null,
        "contact_email": null,
        "status": "approved",
        "is_featured": false,
        "featured_until": null,
        "view_count": 3,
        "created_at": "2025-06-01T10:00:00Z",
        "updated_at": "2025-06-01T10:00:00Z",
        "expires_at": "2025-07-01T10:00:00Z",
        "categories": { "name": "For Sale", "slug": "for-sale" },
        "locations": { "city": "Kochi", "district": "Ernakulam" },
        "profiles": { "full_name": "Anil Kumar" }
    })
}

#[tokio::test]
async fn every_search_is_restricted_to_approved_ads() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/ads"))
        .and(query_param("status", "eq.approved"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([ad_row("Old study table", Some(900.0))])))
        .expect(2)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");

    let plain = app.listings().search(&ListingQuery::default()).await.unwrap();
    assert_eq!(plain.len(), 1);

    let filtered = app
        .listings()
        .search(&ListingQuery {
            search: Some("table".to_string()),
            category_id: Some(Uuid::new_v4()),
            location_id: Some(Uuid::new_v4()),
            sort: SortKey::PriceHigh,
        })
        .await
        .unwrap();
    assert_eq!(filtered.len(), 1);
}

#[tokio::test]
async fn search_text_becomes_a_title_description_disjunction() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/ads"))
        .and(query_param(
            "or",
            "(title.ilike.%bicycle%,description.ilike.%bicycle%)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let query = ListingQuery {
        search: Some("bicycle".to_string()),
        ..Default::default()
    };
    app.listings().search(&query).await.unwrap();
}

#[tokio::test]
async fn category_and_location_filters_are_exact_matches() {
    let server = MockServer::start().await;
    let category_id = Uuid::new_v4();
    let location_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/ads"))
        .and(query_param("category_id", format!("eq.{}", category_id)))
        .and(query_param("location_id", format!("eq.{}", location_id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let query = ListingQuery {
        category_id: Some(category_id),
        location_id: Some(location_id),
        ..Default::default()
    };
    app.listings().search(&query).await.unwrap();
}

#[tokio::test]
async fn sort_keys_order_with_an_id_tie_break() {
    let cases = [
        (SortKey::Newest, "created_at.desc,id.asc"),
        (SortKey::Oldest, "created_at.asc,id.asc"),
        (SortKey::PriceLow, "price.asc,id.asc"),
        (SortKey::PriceHigh, "price.desc,id.asc"),
    ];

    for (sort, expected) in cases {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/ads"))
            .and(query_param("order", expected))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let app = Marketplace::new(&server.uri(), "anon-key");
        let query = ListingQuery {
            sort,
            ..Default::default()
        };
        app.listings().search(&query).await.unwrap();
    }
}

#[tokio::test]
async fn backend_errors_surface_the_backend_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/ads"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "message": "permission denied for table ads" })),
        )
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let error = app
        .listings()
        .search(&ListingQuery::default())
        .await
        .unwrap_err();

    match error {
        Error::Database(message) => assert_eq!(message, "permission denied for table ads"),
        other => panic!("expected a database error, got {:?}", other),
    }
}

#[tokio::test]
async fn the_detail_view_fetches_a_single_approved_ad() {
    let server = MockServer::start().await;
    let ad_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/ads"))
        .and(query_param("id", format!("eq.{}", ad_id)))
        .and(query_param("status", "eq.approved"))
        .and(query_param("limit", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([ad_row("Old study table", Some(900.0))])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let ad = app.listings().get(ad_id).await.unwrap().expect("one ad");
    assert_eq!(ad.ad.title, "Old study table");

    // A rejected or pending ad never comes back through the detail view;
    // the status filter makes the backend return nothing.
    let missing_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/ads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&missing_server)
        .await;

    let app = Marketplace::new(&missing_server.uri(), "anon-key");
    assert!(app.listings().get(ad_id).await.unwrap().is_none());
}

#[tokio::test]
async fn categories_are_active_only_in_display_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/categories"))
        .and(query_param("is_active", "eq.true"))
        .and(query_param("order", "sort_order.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "name": "Real Estate",
            "slug": "real-estate",
            "icon": "home",
            "description": null,
            "is_active": true,
            "sort_order": 1,
            "created_at": "2025-01-01T00:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let categories = app.listings().categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Real Estate");
}

#[tokio::test]
async fn locations_are_ordered_by_district() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/locations"))
        .and(query_param("order", "district.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "district": "Ernakulam",
            "city": "Kochi",
            "state": "Kerala",
            "created_at": "2025-01-01T00:00:00Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let app = Marketplace::new(&server.uri(), "anon-key");
    let locations = app.listings().locations().await.unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].city, "Kochi");
}
