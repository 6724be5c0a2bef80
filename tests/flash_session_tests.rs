use std::sync::Arc;

use flashkit::{
    App, AppConfig, Client, Flash, FlashCarrier, MemoryStore, Request, Session, SessionStore,
};

const SHOW_TPL: &str =
    "{{#each flash.errors as |msg|}}<p class=\"error\">{{msg}}</p>{{/each}}{{#unless flash}}clean{{/unless}}";

fn redirecting_app(store: Arc<dyn SessionStore>, config: AppConfig) -> anyhow::Result<App> {
    let mut app = App::new(config, store)?;
    let view = app.renderer().html_str(SHOW_TPL);
    let same_page = view.clone();

    app.post("/save", |ctx| {
        Box::pin(async move {
            ctx.flash_mut().add("errors", "A").add("errors", "B");
            Ok(ctx.redirect(302, "/show"))
        })
    })?;
    app.post("/save-and-show", move |ctx| {
        let view = same_page.clone();
        Box::pin(async move {
            ctx.flash_mut().add("errors", "A").add("errors", "B");
            ctx.render(200, &view)
        })
    })?;
    app.get("/show", move |ctx| {
        let view = view.clone();
        Box::pin(async move { ctx.render(200, &view) })
    })?;
    app.get("/plain", |ctx| {
        Box::pin(async move { Ok(flashkit::Response::text(200, ctx.flash().len().to_string())) })
    })?;
    Ok(app)
}

fn slot_key(client: &Client<'_>) -> String {
    format!("session:{}:_flash", client.session_id().unwrap_or_default())
}

#[tokio::test]
async fn flash_survives_exactly_one_redirect() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let app = redirecting_app(store.clone(), AppConfig::default())?;
    let mut client = Client::new(&app);

    let r1 = client.post("/save").await;
    assert!(r1.is_redirect());
    assert_eq!(r1.location.as_deref(), Some("/show"));
    assert!(
        store.get(&slot_key(&client)).await?.is_some(),
        "flash stored in the session slot"
    );

    let r2 = client.follow(r1, 1).await;
    assert_eq!(r2.status, 200);
    assert_eq!(r2.body, r#"<p class="error">A</p><p class="error">B</p>"#);
    assert_eq!(store.get(&slot_key(&client)).await?, None, "slot cleared once read");

    let r3 = client.get("/show").await;
    assert_eq!(r3.body, "clean");
    Ok(())
}

#[tokio::test]
async fn flash_rendered_on_the_same_request_is_not_shown_again() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let app = redirecting_app(store.clone(), AppConfig::default())?;
    let mut client = Client::new(&app);

    let r1 = client.post("/save-and-show").await;
    assert_eq!(r1.status, 200);
    assert_eq!(r1.body, r#"<p class="error">A</p><p class="error">B</p>"#);
    assert_eq!(store.get(&slot_key(&client)).await?, None);

    let r2 = client.get("/show").await;
    assert_eq!(r2.body, "clean");
    assert!(!r2.body.contains("<p"));
    Ok(())
}

#[tokio::test]
async fn undisplayed_flash_is_shown_once_after_several_redirects() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let app = redirecting_app(store.clone(), AppConfig::default())?;
    let mut client = Client::new(&app);

    client.post("/save").await;
    client.post("/save").await;

    let shown = client.get("/show").await;
    assert_eq!(shown.body.matches("<p").count(), 4);
    assert_eq!(client.get("/show").await.body, "clean");
    Ok(())
}

#[tokio::test]
async fn flash_waits_for_a_render() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let app = redirecting_app(store.clone(), AppConfig::default())?;
    let mut client = Client::new(&app);

    client.post("/save").await;
    assert_eq!(client.get("/plain").await.body, "2");
    assert_eq!(client.get("/plain").await.body, "2");
    assert_eq!(client.get("/show").await.body, r#"<p class="error">A</p><p class="error">B</p>"#);
    assert_eq!(client.get("/plain").await.body, "0");
    Ok(())
}

#[tokio::test]
async fn sessions_keep_their_flash_apart() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let app = redirecting_app(store.clone(), AppConfig::default())?;
    let mut alice = Client::new(&app);
    let mut bob = Client::new(&app);

    alice.post("/save").await;
    bob.get("/show").await;
    assert_ne!(alice.session_id(), bob.session_id());

    assert_eq!(bob.get("/show").await.body, "clean");
    assert!(alice.get("/show").await.body.contains(">A<"));
    Ok(())
}

#[tokio::test]
async fn custom_slot_and_prefix_are_used() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let config = AppConfig {
        flash_slot: "notices".to_string(),
        session_prefix: "web".to_string(),
        ..AppConfig::default()
    };
    let app = redirecting_app(store.clone(), config)?;
    let mut client = Client::new(&app);

    client.post("/save").await;
    let id = client.session_id().unwrap_or_default().to_string();
    assert_eq!(
        store.get(&format!("web:{id}:notices")).await?,
        Some(r#"{"errors":["A","B"]}"#.to_string())
    );
    assert_eq!(
        store.keys_with_prefix(&format!("web:{id}:")),
        vec![format!("web:{id}:_issued"), format!("web:{id}:notices")]
    );

    let session = Session::with_prefix(store.clone(), id, "web");
    let flash = FlashCarrier::new("notices").take(&session).await?;
    let mut expected = Flash::new();
    expected.add("errors", "A").add("errors", "B");
    assert_eq!(flash, expected);
    Ok(())
}

#[tokio::test]
async fn forged_session_id_cannot_read_another_flash() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let app = redirecting_app(store.clone(), AppConfig::default())?;

    store
        .set("session:guessed:_flash", r#"{"errors":["secret"]}"#.to_string())
        .await?;
    let res = app.serve(Request::get("/show").with_session("guessed")).await;
    assert_eq!(res.body, "clean");
    assert_ne!(res.session_id.as_deref(), Some("guessed"));
    assert!(store.get("session:guessed:_flash").await?.is_some());
    Ok(())
}

#[tokio::test]
async fn corrupt_slot_renders_as_empty() -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let app = redirecting_app(store.clone(), AppConfig::default())?;
    let mut client = Client::new(&app);

    client.get("/show").await;
    store.set(&slot_key(&client), "{not json".to_string()).await?;

    let res = client.get("/show").await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, "clean");
    assert_eq!(store.get(&slot_key(&client)).await?, None);
    Ok(())
}
