use ranalysis::fields::{self, Scalar, Series};

#[test]
fn parses_columns_in_row_order() {
    let table = fields::parse("1 2\n3 4\n5 6");
    assert_eq!(table.names(), vec!["Field 1", "Field 2"]);
    assert_eq!(table.get("Field 1"), Some(&Series::Numeric(vec![1.0, 3.0, 5.0])));
    assert_eq!(table.get("Field 2"), Some(&Series::Numeric(vec![2.0, 4.0, 6.0])));
    assert!(!table.is_ragged());
}

#[test]
fn empty_or_blank_input_has_no_fields() {
    assert!(fields::parse("").is_empty());
    assert!(fields::parse("   \n\t\n  ").is_empty());
}

#[test]
fn tabs_and_repeated_spaces_separate_tokens() {
    let table = fields::parse("1\t\t2   3\r\n4 5\t6\r\n");
    assert_eq!(table.len(), 3);
    assert_eq!(table.get("Field 3"), Some(&Series::Numeric(vec![3.0, 6.0])));
}

#[test]
fn numbers_match_standard_decimal_parse() {
    let tokens = ["0.1", "-2.5e-3", "1e308", "3", "007", "+4.25", ".5"];
    let table = fields::parse(&tokens.join("\n"));
    let expected: Vec<f64> = tokens.iter().map(|t| t.parse::<f64>().unwrap()).collect();
    match table.get("Field 1") {
        Some(Series::Numeric(values)) => {
            let bits: Vec<u64> = values.iter().map(|v| v.to_bits()).collect();
            let want: Vec<u64> = expected.iter().map(|v| v.to_bits()).collect();
            assert_eq!(bits, want);
        }
        other => panic!("expected numeric field, got {other:?}"),
    }
}

#[test]
fn text_tokens_stay_text_per_token() {
    let table = fields::parse("a 1\nb 2\n3 c");
    assert_eq!(
        table.get("Field 1"),
        Some(&Series::Mixed(vec![
            Scalar::Text("a".into()),
            Scalar::Text("b".into()),
            Scalar::Number(3.0),
        ]))
    );
    assert_eq!(
        table.get("Field 2"),
        Some(&Series::Mixed(vec![
            Scalar::Number(1.0),
            Scalar::Number(2.0),
            Scalar::Text("c".into()),
        ]))
    );
}

#[test]
fn all_text_column_is_text() {
    let table = fields::parse("ctrl 1\ntreat 2");
    assert_eq!(
        table.get("Field 1"),
        Some(&Series::Text(vec!["ctrl".into(), "treat".into()]))
    );
}

#[test]
fn field_count_is_widest_row() {
    let table = fields::parse("1\n2 3 4\n5 6");
    assert_eq!(table.len(), 3);
}

#[test]
fn ragged_rows_leave_short_fields() {
    // Later, wider rows create fields that start mid-way; narrower rows skip
    // the excess fields.
    let table = fields::parse("1 2\n3 4 5\n6");
    assert_eq!(table.get("Field 1"), Some(&Series::Numeric(vec![1.0, 3.0, 6.0])));
    assert_eq!(table.get("Field 2"), Some(&Series::Numeric(vec![2.0, 4.0])));
    assert_eq!(table.get("Field 3"), Some(&Series::Numeric(vec![5.0])));
    assert!(table.is_ragged());
}

#[test]
fn resolve_accepts_names_and_indices() {
    let table = fields::parse("1 2\n3 4");
    assert_eq!(table.resolve("Field 2").map(|f| f.name.as_str()), Some("Field 2"));
    assert_eq!(table.resolve("field 1").map(|f| f.name.as_str()), Some("Field 1"));
    assert_eq!(table.resolve("2").map(|f| f.name.as_str()), Some("Field 2"));
    assert!(table.resolve("0").is_none());
    assert!(table.resolve("3").is_none());
    assert!(table.resolve("x").is_none());
}

#[test]
fn parse_tokens_for_literal_bindings() {
    assert_eq!(Series::parse_tokens("30"), Series::Numeric(vec![30.0]));
    assert_eq!(
        Series::parse_tokens("low high"),
        Series::Text(vec!["low".into(), "high".into()])
    );
    assert!(Series::parse_tokens("").is_empty());
}

#[test]
fn bare_string_is_single_text_value() {
    assert_eq!(Series::from("hello"), Series::Text(vec!["hello".into()]));
}

#[test]
fn serializes_in_column_order() {
    let table = fields::parse("1 a\n2 b");
    let json = serde_json::to_string(&table).unwrap();
    assert_eq!(json, r#"{"Field 1":[1.0,2.0],"Field 2":["a","b"]}"#);
}
