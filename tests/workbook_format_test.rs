//! Integration tests for the generated workbook format.
//!
//! XLSX files are zip archives; these tests unzip the generated bytes
//! and assert on the workbook XML directly.

use std::io::{Cursor, Read};

use serde_json::Value as JsonValue;
use vitatrack_export::export::WorkbookBuilder;
use vitatrack_export::models::{ColumnMetadata, TableData, TableName};

fn table(name: &str, columns: &[&str], rows: Vec<Vec<JsonValue>>) -> TableData {
    TableData::new(
        TableName::new(name).unwrap(),
        columns
            .iter()
            .map(|c| ColumnMetadata::new(*c, "varchar", true))
            .collect(),
        rows,
    )
}

fn read_entry(bytes: &[u8], entry: &str) -> String {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("output is not a zip archive");
    let mut file = archive.by_name(entry).expect("missing archive entry");
    let mut xml = String::new();
    file.read_to_string(&mut xml).expect("entry is not UTF-8");
    xml
}

#[test]
fn test_sheet_names_follow_table_order() {
    let tables = [
        "user",
        "foods",
        "meal_records",
        "food_records",
        "goal_settings",
    ];

    let mut builder = WorkbookBuilder::new();
    for name in tables {
        builder
            .add_table(&table(name, &["id"], vec![vec![JsonValue::from(1)]]))
            .unwrap();
    }
    let bytes = builder.save_to_buffer().unwrap();

    let workbook_xml = read_entry(&bytes, "xl/workbook.xml");
    let positions: Vec<usize> = tables
        .iter()
        .map(|name| {
            workbook_xml
                .find(&format!("name=\"{}\"", name))
                .unwrap_or_else(|| panic!("sheet '{}' missing from workbook.xml", name))
        })
        .collect();

    for pair in positions.windows(2) {
        assert!(pair[0] < pair[1], "sheet order does not match table order");
    }
}

#[test]
fn test_header_row_precedes_data_rows() {
    let data = table(
        "foods",
        &["id", "name"],
        vec![
            vec![JsonValue::from(1), JsonValue::from("apple")],
            vec![JsonValue::from(2), JsonValue::from("rice")],
        ],
    );

    let mut builder = WorkbookBuilder::new();
    builder.add_table(&data).unwrap();
    let bytes = builder.save_to_buffer().unwrap();

    let strings_xml = read_entry(&bytes, "xl/sharedStrings.xml");
    assert!(strings_xml.contains("<t>id</t>"));
    assert!(strings_xml.contains("<t>name</t>"));
    assert!(strings_xml.contains("<t>apple</t>"));
    assert!(strings_xml.contains("<t>rice</t>"));

    let sheet_xml = read_entry(&bytes, "xl/worksheets/sheet1.xml");
    let header_pos = sheet_xml.find("<row r=\"1\"").expect("missing header row");
    let first_data_pos = sheet_xml.find("<row r=\"2\"").expect("missing data row");
    let second_data_pos = sheet_xml.find("<row r=\"3\"").expect("missing data row");
    assert!(header_pos < first_data_pos);
    assert!(first_data_pos < second_data_pos);
}

#[test]
fn test_empty_table_gets_header_only() {
    let data = table("goal_settings", &["id", "target_weight"], Vec::new());

    let mut builder = WorkbookBuilder::new();
    builder.add_table(&data).unwrap();
    let bytes = builder.save_to_buffer().unwrap();

    let strings_xml = read_entry(&bytes, "xl/sharedStrings.xml");
    assert!(strings_xml.contains("<t>target_weight</t>"));

    let sheet_xml = read_entry(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet_xml.contains("<row r=\"1\""));
    assert!(!sheet_xml.contains("<row r=\"2\""));
}

#[test]
fn test_numbers_are_numeric_cells() {
    let data = TableData::new(
        TableName::new("meal_records").unwrap(),
        vec![
            ColumnMetadata::new("id", "int", false),
            ColumnMetadata::new("calories", "double", true),
        ],
        vec![vec![JsonValue::from(7), JsonValue::from(320.5)]],
    );

    let mut builder = WorkbookBuilder::new();
    builder.add_table(&data).unwrap();
    let bytes = builder.save_to_buffer().unwrap();

    // Numeric cells carry their value inline instead of a shared string
    let sheet_xml = read_entry(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet_xml.contains("<v>7</v>"));
    assert!(sheet_xml.contains("<v>320.5</v>"));

    let strings_xml = read_entry(&bytes, "xl/sharedStrings.xml");
    assert!(!strings_xml.contains("320.5"));
}

#[test]
fn test_null_cells_are_omitted() {
    let data = table(
        "user",
        &["id", "nickname"],
        vec![vec![JsonValue::from("u1"), JsonValue::Null]],
    );

    let mut builder = WorkbookBuilder::new();
    builder.add_table(&data).unwrap();
    let bytes = builder.save_to_buffer().unwrap();

    let sheet_xml = read_entry(&bytes, "xl/worksheets/sheet1.xml");
    let row_start = sheet_xml.find("<row r=\"2\"").expect("missing data row");
    let row_end = row_start + sheet_xml[row_start..].find("</row>").expect("unterminated row");
    let row_xml = &sheet_xml[row_start..row_end];
    assert_eq!(row_xml.matches("<c ").count(), 1, "NULL produced a cell");
}

#[test]
fn test_multibyte_text_round_trips() {
    let data = table(
        "meal_records",
        &["note"],
        vec![
            vec![JsonValue::from("早餐：燕麦粥")],
            vec![JsonValue::from("晚餐：米饭和青菜")],
        ],
    );

    let mut builder = WorkbookBuilder::new();
    builder.add_table(&data).unwrap();
    let bytes = builder.save_to_buffer().unwrap();

    let strings_xml = read_entry(&bytes, "xl/sharedStrings.xml");
    assert!(strings_xml.contains("早餐：燕麦粥"));
    assert!(strings_xml.contains("晚餐：米饭和青菜"));
}

#[test]
fn test_boolean_cells() {
    let data = table("user", &["active"], vec![vec![JsonValue::Bool(true)]]);

    let mut builder = WorkbookBuilder::new();
    builder.add_table(&data).unwrap();
    let bytes = builder.save_to_buffer().unwrap();

    let sheet_xml = read_entry(&bytes, "xl/worksheets/sheet1.xml");
    assert!(sheet_xml.contains("t=\"b\""), "expected a boolean cell");
}
