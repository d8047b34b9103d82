//! Integration tests over a realistic landing page

use beacon_dom::{derive_selector, Document, RESERVED_CLASS_PREFIX};

const LANDING: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Beacon Platform</title>
  <style>.card > p { color: #333; }</style>
</head>
<body>
  <header class="hero">
    <h1>Beacon</h1>
    <p class="tagline">Ship pages <em>together</em>.</p>
    <div class="stat"><span class="num">12</span><span class="label">teams</span></div>
    <div class="stat"><span class="num">3</span><span class="label">regions</span></div>
  </header>
  <section id="features">
    <div class="card"><h3>Edit</h3><p>Click any text.</p></div>
    <div class="card"><h3>Sync</h3><p>Everyone sees it.</p></div>
  </section>
  <table>
    <tr><th>Plan</th><th>Price</th></tr>
    <tr><td>Free</td><td>$0</td></tr>
  </table>
  <div id="beacon-edit-ui"><p>Edit</p></div>
</body>
</html>"#;

#[test]
fn test_document_roundtrips() {
    let doc = Document::parse(LANDING);
    assert_eq!(doc.to_html(), LANDING);
}

#[test]
fn test_every_derived_selector_resolves_to_its_element() {
    let doc = Document::parse(LANDING);
    let candidates = doc
        .query_selector_all("h1, h3, p, td, th, .hero .stat .num, .hero .stat .label")
        .unwrap();
    assert!(candidates.len() > 10);

    for node in candidates {
        let selector = derive_selector(&doc, node, RESERVED_CLASS_PREFIX).unwrap();
        let resolved = doc.query_selector(&selector).unwrap();
        assert_eq!(resolved, Some(node), "selector {} resolved elsewhere", selector);
    }
}

#[test]
fn test_stat_selectors_carry_position() {
    let doc = Document::parse(LANDING);
    let labels = doc.query_selector_all(".hero .stat .label").unwrap();
    let selectors: Vec<String> = labels
        .iter()
        .map(|n| derive_selector(&doc, *n, RESERVED_CLASS_PREFIX).unwrap())
        .collect();

    assert_eq!(
        selectors,
        vec![
            "header.hero > div.stat:nth-of-type(1) > span.label:nth-of-type(2)",
            "header.hero > div.stat:nth-of-type(2) > span.label:nth-of-type(2)",
        ]
    );
}

#[test]
fn test_set_inner_html_is_idempotent() {
    let mut doc = Document::parse(LANDING);
    let tagline = doc.query_selector(".tagline").unwrap().unwrap();

    doc.set_inner_html(tagline, "Ship pages <strong>faster</strong>.");
    let once = doc.to_html();
    doc.set_inner_html(tagline, "Ship pages <strong>faster</strong>.");

    assert_eq!(doc.to_html(), once);
    assert_eq!(doc.inner_html(tagline), "Ship pages <strong>faster</strong>.");
}
