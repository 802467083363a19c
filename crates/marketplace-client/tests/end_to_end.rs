//! Client against a live in-process API server.

use std::sync::Arc;

use api::AppState;
use marketplace_client::{App, ClientConfig, ClientError, Language, MarketplaceClient, Screen};
use marketplace_core::{
    ListingKind, MarketConfig, Marketplace, MemoryStore, NotificationType, Role, Severity,
    WeatherAlert,
};
use serde_json::{json, Map, Value};

async fn spawn_server() -> String {
    let market = Marketplace::new(Arc::new(MemoryStore::new()), MarketConfig::default());
    let app = api::app(AppState::new(market));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on.
async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn profile(name: &str, location: &str) -> Map<String, Value> {
    match json!({"name": name, "location": location, "phoneNumber": "+91 90000 00000"}) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

async fn onboard(base: &str, email: &str, role: Role, name: &str, location: &str) -> App {
    let client = MarketplaceClient::new(ClientConfig::new(base)).unwrap();
    let mut app = App::new(client);
    app.start_signup(email).unwrap();
    app.choose_language(Language::Tamil).unwrap();
    app.choose_role(role).unwrap();
    app.complete_profile(profile(name, location), "harvest42").await.unwrap();
    app
}

#[tokio::test]
async fn test_onboarding_lands_on_role_home() {
    let base = spawn_server().await;
    let app = onboard(&base, "ravi@example.com", Role::Farmer, "Ravi", "Coimbatore, TN").await;

    assert_eq!(app.screen(), Screen::Home(Role::Farmer));
    let session = app.session();
    assert!(session.is_signed_in());
    assert_eq!(session.language, Language::Tamil);
    assert_eq!(session.user.as_ref().unwrap().profile.name, "Ravi");
    assert!(session.draft.email.is_none());
}

#[tokio::test]
async fn test_listing_and_notification_flow() {
    let base = spawn_server().await;
    let mut farmer = onboard(&base, "ravi@example.com", Role::Farmer, "Ravi", "Coimbatore, TN").await;
    let buyer = onboard(&base, "anu@example.com", Role::Buyer, "Anu", "Chennai").await;

    farmer.open(Screen::Post).unwrap();
    let created = farmer
        .create_listing(
            ListingKind::Post,
            &json!({"cropName": "Tomato", "quantity": "300 kg", "price": 24, "description": "Fresh"}),
        )
        .await
        .unwrap();
    farmer.back_home().unwrap();

    let posts = buyer.listings(ListingKind::Post).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].id, created.id);
    assert_eq!(posts[0].fields["farmerName"], "Ravi");

    // Server-side rejection propagates with the server's message.
    let err = buyer
        .create_listing(ListingKind::Post, &json!({"cropName": "Rice"}))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(400));

    let client = MarketplaceClient::new(ClientConfig::new(&base)).unwrap();
    let farmer_token = farmer.session().token().unwrap().to_string();
    let sent = client
        .weather_alert(
            buyer.session().token().unwrap(),
            &WeatherAlert {
                alert_type: "Heavy Rain".to_string(),
                location: "coimbatore".to_string(),
                severity: Severity::High,
                message: "Cover harvested produce".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(sent, 1);

    let sent = client
        .send_notification(
            buyer.session().token().unwrap(),
            NotificationType::NewCropListing,
            json!("Looking for onions"),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(sent, 1);

    let inbox = farmer.notifications().await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(farmer.mark_all_read().await.unwrap(), 2);
    assert_eq!(farmer.mark_all_read().await.unwrap(), 0);

    let stats = client.analytics(&farmer_token).await.unwrap();
    assert_eq!(stats.user_posts, 1);
    assert_eq!(stats.unread_notifications, 0);
}

#[tokio::test]
async fn test_demo_mode_serves_samples_when_offline() {
    let base = dead_url().await;

    let demo = MarketplaceClient::new(ClientConfig::new(&base).with_demo_mode(true)).unwrap();
    let tools = demo.listings("token", ListingKind::Tool).await.unwrap();
    assert!(!tools.is_empty());
    assert!(tools.iter().all(|t| t.id.starts_with("demo-")));

    let strict = MarketplaceClient::new(ClientConfig::new(&base)).unwrap();
    let err = strict.listings("token", ListingKind::Tool).await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn test_demo_mode_does_not_mask_server_errors() {
    let base = spawn_server().await;
    let demo = MarketplaceClient::new(ClientConfig::new(&base).with_demo_mode(true)).unwrap();

    let err = demo.listings("bogus", ListingKind::Post).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 401, .. }));
}

#[tokio::test]
async fn test_authenticated_calls_need_a_session() {
    let base = spawn_server().await;
    let app = App::new(MarketplaceClient::new(ClientConfig::new(&base)).unwrap());

    assert!(matches!(
        app.notifications().await,
        Err(ClientError::NotSignedIn)
    ));
    assert!(MarketplaceClient::new(ClientConfig::new(&base))
        .unwrap()
        .health_check()
        .await
        .unwrap());
}
