use super::*;
use beacon_dom::Document;
use beacon_store::{Content, VersionRecord};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};

fn exported_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 6)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
}

fn record(id: i64, minor: u32, entries: &[(&str, &str)]) -> VersionRecord {
    VersionRecord {
        id,
        page: "index".into(),
        content: entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Content>(),
        version_major: Some(1),
        version_minor: Some(minor),
        updated_by: Some("ada".into()),
        updated_at: Utc.with_ymd_and_hms(2024, 2, 5, 10, 0, 0).unwrap(),
    }
}

#[test]
fn test_flat_backup_layout() {
    let md = flat_backup(&[record(2, 1, &[("h1", "<b>Hi</b> there")])], exported_at());

    assert_eq!(
        md,
        "# Beacon Platform - Edit Backup\n\n\
         Exported: 2024-02-06 09:30\n\
         Total versions: 1\n\n---\n\n\
         ## Version 1.1\n\
         - **Updated by:** ada\n\
         - **Updated at:** 2024-02-05T10:00:00+00:00\n\
         - **Page:** index\n\n\
         Edited 1 elements.\n\n\
         - `h1`: Hi there...\n\
         \n---\n\n"
    );
}

#[test]
fn test_flat_backup_caps_previews() {
    let entries: Vec<(String, String)> = (1..=12)
        .map(|i| (format!("li:nth-of-type({})", i), "x".repeat(150)))
        .collect();
    let borrowed: Vec<(&str, &str)> = entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let md = flat_backup(&[record(1, 0, &borrowed)], exported_at());

    assert!(md.contains("Edited 12 elements."));
    assert_eq!(md.matches("- `li:nth-of-type(").count(), 10);
    assert!(md.contains("- ... and 2 more edits\n"));
    assert!(md.contains(&format!("`li:nth-of-type(1)`: {}...", "x".repeat(FLAT_PREVIEW_CHARS))));
}

#[test]
fn test_sectioned_backup_groups_by_id() {
    let version = record(
        3,
        2,
        &[
            ("#pricing > p", "Cheap &amp; good"),
            ("h1", "Title"),
            ("#about", "About <em>us</em>"),
            ("#pricing > h2", ""),
        ],
    );
    let md = sectioned_backup(&[version], exported_at());

    assert!(md.starts_with("# Beacon Platform - Edit History Backup\n\nExported: 2024-02-06 09:30\n\nTotal versions: 1\n\n---\n"));
    assert!(md.contains("## Version 1.2\n- **Updated by:** ada\n"));
    assert!(md.contains("### Edited Sections\n"));

    let about = md.find("#### about").unwrap();
    let other = md.find("#### other").unwrap();
    let pricing = md.find("#### pricing").unwrap();
    assert!(about < other && other < pricing);

    assert!(md.contains("- `#about`: About us..."));
    assert!(md.contains("- `h1`: Title..."));
    assert!(md.contains("- `#pricing > p`: Cheap & good..."));
    // Empty previews are left out
    assert!(!md.contains("`#pricing > h2`"));
}

#[test]
fn test_sectioned_backup_caps_sections() {
    let entries: Vec<(String, String)> = (1..=7)
        .map(|i| (format!("#faq > p:nth-of-type({})", i), format!("Answer {}", i)))
        .collect();
    let borrowed: Vec<(&str, &str)> = entries.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let md = sectioned_backup(&[record(1, 0, &borrowed)], exported_at());

    assert_eq!(md.matches("Answer ").count(), 5);
    assert!(md.contains("- ... and 2 more edits in this section"));
}

#[test]
fn test_section_of() {
    assert_eq!(section_of("#intro > div.card > p"), "intro");
    assert_eq!(section_of("div.card > p"), "other");
    assert_eq!(section_of("main > a#b-c_d > p"), "b-c_d");
    assert_eq!(section_of("# > #x"), "x");
}

#[test]
fn test_layout_from_str() {
    assert_eq!("flat".parse::<MarkdownLayout>().unwrap(), MarkdownLayout::Flat);
    assert_eq!("Sectioned".parse::<MarkdownLayout>().unwrap(), MarkdownLayout::Sectioned);
    assert!("tree".parse::<MarkdownLayout>().is_err());
}

#[test]
fn test_json_dumps() {
    let versions = vec![record(2, 1, &[("h1", "B")]), record(1, 0, &[("h1", "A")])];

    let full: serde_json::Value = serde_json::from_str(&full_dump(&versions).unwrap()).unwrap();
    assert_eq!(full.as_array().unwrap().len(), 2);
    assert_eq!(full[0]["content"]["h1"], "B");

    let latest: serde_json::Value = serde_json::from_str(&latest_state(&versions).unwrap().unwrap()).unwrap();
    assert_eq!(latest["id"], 2);
    assert!(latest_state(&[]).unwrap().is_none());
}

#[test]
fn test_write_backup() {
    let dir = tempfile::tempdir().unwrap();
    let files = write_backup(dir.path(), &[record(1, 0, &[("h1", "A")])], MarkdownLayout::Flat, exported_at()).unwrap();

    assert!(std::fs::read_to_string(&files.markdown).unwrap().contains("## Version 1.0"));
    assert!(files.full_json.ends_with(FULL_JSON_FILE));
    assert!(files.latest_json.is_some());

    let empty = tempfile::tempdir().unwrap();
    let files = write_backup(empty.path(), &[], MarkdownLayout::Sectioned, exported_at()).unwrap();
    assert!(files.latest_json.is_none());
}

const PAGE: &str = r#"<html><head><title>Beacon &amp; Co</title><style>p { color: red; }</style></head><body>
<header class="hero"><h1>Beacon</h1><div class="stat"><span class="num">12</span><span class="label">teams</span></div></header>
<ul><li>Fast</li><li>Safe</li></ul>
<table><tr><th>Plan</th><th>Price</th></tr><tr><td>Free</td><td>$0</td></tr></table>
<p>Tom &amp; Jerry</p>
<div id="beacon-edit-ui"><p>Edit</p></div>
<script>alert(1)</script>
</body></html>"#;

#[test]
fn test_visible_blocks() {
    let doc = Document::parse(PAGE);
    let blocks = visible_blocks(&doc, &[]);

    assert_eq!(
        blocks,
        vec![
            Block::Heading { level: 1, text: "Beacon".into() },
            Block::Paragraph("12 teams".into()),
            Block::ListItem("Fast".into()),
            Block::ListItem("Safe".into()),
            Block::Table(vec![
                vec!["Plan".into(), "Price".into()],
                vec!["Free".into(), "$0".into()],
            ]),
            Block::Paragraph("Tom & Jerry".into()),
        ]
    );
    assert_eq!(page_title(&doc).as_deref(), Some("Beacon & Co"));
}

#[test]
fn test_configured_ui_containers_are_hidden() {
    let doc = Document::parse("<body><p>Keep</p><aside class=\"chrome\"><p>Drop</p></aside></body>");
    let blocks = visible_blocks(&doc, &[".chrome".to_string()]);
    assert_eq!(blocks, vec![Block::Paragraph("Keep".into())]);
}

#[test]
fn test_wordml_export() {
    let doc = Document::parse(PAGE);
    let xml = compile_to_wordml(&doc, &WordOptions::default());

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<?mso-application progid=\"Word.Document\"?>"));
    assert!(xml.contains("<o:Title>Beacon &amp; Co</o:Title>"));
    assert!(xml.contains("<w:sz w:val=\"48\"/></w:rPr><w:t xml:space=\"preserve\">Beacon</w:t>"));
    assert!(xml.contains("<w:t xml:space=\"preserve\">\u{2022} Fast</w:t>"));
    assert!(xml.contains("<w:tc><w:p><w:r><w:t xml:space=\"preserve\">$0</w:t></w:r></w:p></w:tc>"));
    assert!(xml.contains("Tom &amp; Jerry"));
    assert!(!xml.contains("preserve\">Edit<"));
    assert!(!xml.contains("alert"));
    assert!(xml.trim_end().ends_with("</w:wordDocument>"));
}

#[test]
fn test_word_html_export() {
    let doc = Document::parse(PAGE);
    let options = WordOptions {
        title: Some("Landing".into()),
        ..WordOptions::default()
    };
    let html = compile_to_word_html(&doc, &options);

    assert!(html.contains("xmlns:w=\"urn:schemas-microsoft-com:office:word\""));
    assert!(html.contains("<title>Landing</title>"));
    assert!(html.contains("<li>Fast</li>"));
    assert!(html.contains("<p>Tom &amp; Jerry</p>"));
    assert!(!html.contains("beacon-edit-ui"));
    assert!(!html.contains("alert(1)"));
    // The source document is left untouched
    assert!(doc.to_html().contains("beacon-edit-ui"));
}
