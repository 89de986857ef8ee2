use std::sync::Once;

use patsum::{completion, config, document};

static INIT: Once = Once::new();

fn init_config_once() -> &'static config::Config {
    INIT.call_once(|| {
        config::init_config().expect("live tests need a configured environment");
    });
    config::get_config()
}

#[tokio::test]
#[ignore = "Requires live document source"]
async fn live_patent_description_is_available() {
    let config = init_config_once();
    let source = document::UsptoDocumentSource::from_config(config).expect("source client");
    let fetched = document::fetch(&source, &document::resolve("9878232")).await;
    assert!(
        fetched.has_content(),
        "expected description text: {:?}",
        fetched.retrieval_error
    );
}

#[tokio::test]
#[ignore = "Requires live completion provider"]
async fn live_completion_roundtrip() {
    let config = init_config_once();
    let client = completion::build_completion_client(config).expect("completion client");
    let output = client
        .complete("Reply with a single word.", "Say hello.")
        .await
        .expect("completion");
    assert!(!output.into_text().is_empty());
}
