//! Import / export round-trip tests
//!
//! Drives the public API end to end: XML fragments are materialized
//! through the in-memory store, exported back through the layout blocks,
//! and compared for ordered child-set fidelity. Also covers the
//! partial-failure contract: a malformed child is skipped and recorded,
//! never fatal.

use courseblock_core::blocks::ContentBlock;
use courseblock_core::runtime::{ContentStore, InMemoryStore};
use courseblock_core::xml::XmlElement;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn child_ids(element: &XmlElement) -> Vec<String> {
    element
        .child_elements()
        .map(|child| child.attribute("url_name").unwrap_or_default().to_string())
        .collect()
}

fn export(store: &InMemoryStore, usage_id: &str) -> XmlElement {
    store
        .block(usage_id)
        .unwrap()
        .to_xml(store)
        .unwrap()
}

#[test]
fn test_parse_then_serialize_preserves_child_order() {
    init_tracing();
    let mut store = InMemoryStore::new();
    let usage_id = store
        .process_xml_fragment(
            r#"<vertical url_name="unit-1" display_name="Unit 1">
                <video url_name="v-1">Intro</video>
                <problem url_name="p-1">Quiz</problem>
                <html url_name="h-1">Notes</html>
            </vertical>"#,
        )
        .unwrap();

    assert_eq!(usage_id, "unit-1");
    let element = export(&store, "unit-1");
    assert_eq!(element.name, "vertical");
    assert_eq!(element.attribute("display_name"), Some("Unit 1"));
    assert_eq!(child_ids(&element), vec!["v-1", "p-1", "h-1"]);
    assert!(store.error_log().is_empty());
}

#[test]
fn test_round_trip_through_fresh_store() {
    init_tracing();
    let mut first = InMemoryStore::new();
    first
        .process_xml_fragment(
            r#"<vertical url_name="unit-1"><video url_name="v-1">A</video><html url_name="h-1">B</html></vertical>"#,
        )
        .unwrap();
    let exported = export(&first, "unit-1").to_xml_string();

    let mut second = InMemoryStore::new();
    let usage_id = second.process_xml_fragment(&exported).unwrap();

    assert_eq!(usage_id, "unit-1");
    assert_eq!(child_ids(&export(&second, "unit-1")), vec!["v-1", "h-1"]);
}

#[test]
fn test_malformed_child_is_skipped_and_recorded() {
    init_tracing();
    let mut store = InMemoryStore::new();
    let usage_id = store
        .process_xml_fragment(
            r#"<vertical url_name="unit-1">
                <html url_name="h-1">First</html>
                <video url_name="v-bad" due="not-a-date">Broken</video>
                <html url_name="h-2">Third</html>
            </vertical>"#,
        )
        .unwrap();

    // Exactly the 1st and 3rd children survive, in original relative order.
    assert_eq!(child_ids(&export(&store, &usage_id)), vec!["h-1", "h-2"]);
    assert!(!store.contains("v-bad"));

    // Exactly one error reached the tracker, and it names the failure.
    let errors = store.error_log();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("ERROR: "));

    // The skipped child is absent from the re-imported side too.
    let exported = export(&store, &usage_id).to_xml_string();
    let mut second = InMemoryStore::new();
    second.process_xml_fragment(&exported).unwrap();
    assert_eq!(child_ids(&export(&second, "unit-1")), vec!["h-1", "h-2"]);
}

#[test]
fn test_nested_layouts_round_trip() {
    init_tracing();
    let mut store = InMemoryStore::new();
    store
        .process_xml_fragment(
            r#"<vertical url_name="unit-1">
                <wrapper url_name="wrap-1">
                    <html url_name="h-1">Inner</html>
                </wrapper>
                <video url_name="v-1">Outro</video>
            </vertical>"#,
        )
        .unwrap();

    let element = export(&store, "unit-1");
    assert_eq!(child_ids(&element), vec!["wrap-1", "v-1"]);

    let wrapper = element.child_elements().next().unwrap();
    assert_eq!(wrapper.name, "wrapper");
    assert_eq!(child_ids(wrapper), vec!["h-1"]);
}

#[test]
fn test_wrapper_round_trip() {
    init_tracing();
    let mut store = InMemoryStore::new();
    let usage_id = store
        .process_xml_fragment(
            r#"<wrapper url_name="wrap-1"><html url_name="h-1">A</html><html url_name="h-2">B</html></wrapper>"#,
        )
        .unwrap();

    let element = export(&store, &usage_id);
    assert_eq!(element.name, "wrapper");
    assert_eq!(child_ids(&element), vec!["h-1", "h-2"]);
}

#[test]
fn test_duplicate_child_id_is_recorded_not_fatal() {
    init_tracing();
    let mut store = InMemoryStore::new();
    let usage_id = store
        .process_xml_fragment(
            r#"<vertical url_name="unit-1">
                <html url_name="h-1">A</html>
                <html url_name="h-1">B</html>
            </vertical>"#,
        )
        .unwrap();

    assert_eq!(child_ids(&export(&store, &usage_id)), vec!["h-1"]);
    assert_eq!(store.error_log().len(), 1);
}

#[test]
fn test_leaf_attributes_survive_round_trip() {
    init_tracing();
    let mut store = InMemoryStore::new();
    store
        .process_xml_fragment(
            r#"<vertical url_name="unit-1"><problem url_name="p-1" weight="1.5" due="2026-09-01T00:00:00+00:00">Quiz</problem></vertical>"#,
        )
        .unwrap();

    let element = export(&store, "unit-1");
    let problem = element.child_elements().next().unwrap();
    assert_eq!(problem.attribute("weight"), Some("1.5"));
    assert_eq!(problem.attribute("due"), Some("2026-09-01T00:00:00+00:00"));
    assert_eq!(problem.text_content(), "Quiz");
}
