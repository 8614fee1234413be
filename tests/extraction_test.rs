//! Integration tests for end-to-end record extraction.

use unfield::render::{scan_to_text, to_json, to_text, JsonFormat};
use unfield::{
    normalize, parse_document, ExtractOptions, FieldMapping, KeyedField, PositionedToken,
    ProfileRegistry, RawDocument, RawPage, RawToken, RecordAssembler, RowTemplate, ScanOptions,
    Template, Unfield,
};

const PROFILES: &str = r#"
default = "meter_v1"

[profiles.meter_v1]
skip_ordinals = [3]

[[profiles.meter_v1.single_fields]]
name = "station"
ordinal = 1

[[profiles.meter_v1.keyed_fields]]
name = "meter_status"
key_ordinal = 2
value_ordinal = 4
expected_key = "Meter Status"

[profiles.meter_v1.row_group]
base_ordinal = 5
stride = 2
row_count = 3
columns = { date = 0, volume = 1 }

[[profiles.meter_v1.aggregate_fields]]
name = "total"
ordinal = 11

[profiles.meter_v2]
planned = true
"#;

/// Build a page whose tokens arrive shuffled, with `y` giving the reading order.
fn report_page(station: &str, readings: &[(&str, &str)], total: &str) -> RawPage {
    let mut texts = vec![station.to_string(), "Meter%20Status".to_string()];
    texts.push("%20".to_string());
    texts.push("Active".to_string());
    for (date, volume) in readings {
        texts.push(date.to_string());
        texts.push(volume.to_string());
    }
    texts.push(total.to_string());

    let mut tokens: Vec<RawToken> = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| RawToken::new(10.0, (i as f64 + 1.0) * 1.5, text))
        .collect();
    tokens.reverse();
    RawPage::new(tokens)
}

fn document() -> RawDocument {
    let mut doc = RawDocument::new();
    doc.add_page(report_page(
        "North",
        &[("2021-09-01", "10.5"), ("2021-09-02", "11.0"), ("2021-09-03", "9.5")],
        "31.0",
    ));
    doc.add_page(report_page("South", &[("2021-09-01", "4.0")], "4.0"));
    doc.set_metadata("CreationDate", "D:20210914154800-07'00'");
    doc.set_metadata("ModDate", "D:20210915080000+02'00'");
    doc.set_metadata("Producer", "pdf2json");
    doc.set_metadata("Metadata", "<x:xmpmeta/>");
    doc
}

#[test]
fn test_full_extraction() {
    let registry = ProfileRegistry::from_toml_str(PROFILES).unwrap();
    let extraction = RecordAssembler::new(&registry).assemble(&document(), Some("meter_v1"));

    assert_eq!(extraction.record_count(), 2);

    let north = &extraction.records[0];
    assert_eq!(north.get("station"), Some("North"));
    assert_eq!(north.get("meter_status"), Some("Active"));
    let rows = north.rows.as_ref().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2]["date"], "2021-09-03");
    assert_eq!(rows[2]["volume"], "9.5");
    assert_eq!(north.aggregate_value("total"), Some("31.0"));

    // short page: trailing rows are empty, total lands where a row would be
    let south = &extraction.records[1];
    let rows = south.rows.as_ref().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["volume"], "4.0");
    assert_eq!(rows[1]["date"], "4.0");
    assert_eq!(rows[1]["volume"], "");
    assert_eq!(rows[2]["date"], "");
    assert_eq!(south.aggregate_value("total"), Some(""));

    assert_eq!(extraction.metadata["CreationDate"], "2021-09-14 15:48:00");
    assert_eq!(extraction.metadata["ModDate"], "2021-09-15 08:00:00");
    assert_eq!(extraction.metadata["Producer"], "pdf2json");
    assert!(!extraction.metadata.contains_key("Metadata"));
}

#[test]
fn test_planned_and_unknown_profiles_use_default() {
    let registry = ProfileRegistry::from_toml_str(PROFILES).unwrap();
    let assembler = RecordAssembler::new(&registry);
    let doc = document();

    let expected = assembler.assemble(&doc, Some("meter_v1"));
    for profile in [None, Some("meter_v2"), Some("does_not_exist")] {
        let extraction = assembler.assemble(&doc, profile);
        assert_eq!(extraction.records, expected.records, "profile {:?}", profile);
    }
}

#[test]
fn test_json_output_shape() {
    let registry = ProfileRegistry::from_toml_str(PROFILES).unwrap();
    let extraction = RecordAssembler::new(&registry).assemble(&document(), None);

    let json = to_json(&extraction, JsonFormat::Compact).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let first = &value["records"][0];
    assert_eq!(first["station"], "North");
    assert_eq!(first["rows"].as_array().unwrap().len(), 3);
    assert_eq!(first["aggregate"]["total"], "31.0");
    assert_eq!(value["metadata"]["Producer"], "pdf2json");
}

#[test]
fn test_record_without_rows_or_aggregate_omits_them() {
    let mut registry = ProfileRegistry::new();
    registry
        .register(
            "flat",
            Template::new().with_field(FieldMapping::value("status", 9)),
        )
        .unwrap();

    let mut doc = RawDocument::new();
    doc.add_page(RawPage::new(
        (1..=8)
            .map(|i| RawToken::new(0.0, f64::from(i), format!("t{}", i)))
            .collect(),
    ));

    let extraction = RecordAssembler::new(&registry).assemble(&doc, Some("flat"));
    let json = to_json(&extraction.records[0], JsonFormat::Compact).unwrap();
    assert_eq!(json, r#"{"status":""}"#);
}

#[test]
fn test_row_group_by_stride() {
    let template = Template::new()
        .with_row_group(RowTemplate::new(101, 10, 2).with_column("energy", 0));
    let tokens: Vec<PositionedToken> = (1..=115)
        .map(|i| PositionedToken::new(0.0, f64::from(i), format!("v{}", i)))
        .collect();

    let record = template.apply(&normalize(tokens));
    let rows = record.rows.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["energy"], "v101");
    assert_eq!(rows[1]["energy"], "v111");
}

#[test]
fn test_keyed_field_with_blank_key() {
    let template = Template::new().with_keyed_field(KeyedField::new("pressure", 1, 2));
    let tokens = vec![
        PositionedToken::new(0.0, 1.0, "   "),
        PositionedToken::new(0.0, 2.0, " 14.73 "),
    ];
    assert_eq!(template.apply(&tokens).get("pressure"), Some("14.73"));
}

#[test]
fn test_undecodable_tokens_shift_nothing_else() {
    let json = r#"{
        "pages": [{"tokens": [
            {"x": 0, "y": 1, "encodedText": "A"},
            {"x": 0, "y": 2, "encodedText": "%E2%82"},
            {"x": 0, "y": 3, "encodedText": "C%C3%A9"}
        ]}]
    }"#;
    let doc = parse_document(json).unwrap();

    let mut registry = ProfileRegistry::new();
    registry
        .register(
            "p",
            Template::new()
                .with_field(FieldMapping::value("first", 1))
                .with_field(FieldMapping::value("second", 2)),
        )
        .unwrap();

    let extraction = RecordAssembler::new(&registry).assemble(&doc, Some("p"));
    let record = &extraction.records[0];
    assert_eq!(record.get("first"), Some("A"));
    assert_eq!(record.get("second"), Some("Cé"));
    assert_eq!(extraction.stats.dropped_tokens, 1);
}

#[test]
fn test_decoder_flags_and_xmp_object_in_metadata() {
    let json = r#"{
        "pages": [{"tokens": [
            {"x": 0, "y": 2, "encodedText": "Active"},
            {"x": 0, "y": 1, "encodedText": "Meter%20Status"}
        ]}],
        "metadata": {
            "CreationDate": "D:20210914154800-07'00'",
            "IsAcroFormPresent": false,
            "IsXFAPresent": false,
            "Metadata": {"dc:title": "Meter report", "xmp:CreatorTool": "Writer"}
        }
    }"#;

    let mut registry = ProfileRegistry::new();
    registry
        .register(
            "p",
            Template::new().with_keyed_field(KeyedField::new("meter_status", 1, 2)),
        )
        .unwrap();

    let extraction = unfield::extract_str(json, &registry, Some("p")).unwrap();
    assert_eq!(extraction.records[0].get("meter_status"), Some("Active"));
    assert_eq!(extraction.metadata["CreationDate"], "2021-09-14 15:48:00");
    assert_eq!(extraction.metadata["IsAcroFormPresent"], "false");
    assert!(!extraction.metadata.contains_key("Metadata"));
}

#[test]
fn test_text_output() {
    let registry = ProfileRegistry::from_toml_str(PROFILES).unwrap();
    let extraction = Unfield::new()
        .with_registry(registry)
        .with_options(ExtractOptions::new().sequential())
        .extract(&document());

    let text = to_text(&extraction);
    assert!(text.starts_with("CreationDate: 2021-09-14 15:48:00"));
    assert!(text.contains("Page 2\nstation: South"));
    assert!(text.contains("rows[2].volume: 9.5"));
    assert!(text.contains("aggregate.total: 31.0"));
}

#[test]
fn test_scan_listing() {
    let registry = ProfileRegistry::from_toml_str(PROFILES).unwrap();
    let scans = Unfield::new()
        .with_registry(registry)
        .with_profile("meter_v1")
        .scan(&document(), ScanOptions::new().with_max_tokens(5).with_max_pages(1));

    assert_eq!(scans.len(), 1);
    // ordinal 3 is blank and also skipped
    let ordinals: Vec<u32> = scans[0].entries.iter().map(|e| e.ordinal).collect();
    assert_eq!(ordinals, vec![1, 2, 4, 5]);

    let text = scan_to_text(&scans);
    assert!(text.contains("   2  Meter Status  [meter_status key]"));
    assert!(text.contains("   5  2021-09-01  [date[0] value]"));
}
