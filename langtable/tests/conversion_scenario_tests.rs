use indoc::indoc;
use langtable::{
    ColumnRequest, ConversionOptions, DuplicateKeys, Error, FormatType, csv_file_to_resources,
    csv_to_resources, resources_to_csv, resources_to_matrix,
};
use std::{collections::HashSet, fs, io::Cursor};
use tempfile::TempDir;

fn scenario_request() -> ColumnRequest {
    ColumnRequest::new()
        .with_key_column(0)
        .with_state_column(Some(1))
        .with_language("English", 2)
        .with_language("French", 3)
}

fn options_for(dir: &TempDir) -> ConversionOptions {
    ConversionOptions {
        output_path: dir.path().to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_single_row_to_strings() {
    let dir = TempDir::new().unwrap();
    csv_to_resources(
        Cursor::new("greeting,approved,Hello,Bonjour\n"),
        &scenario_request(),
        FormatType::Strings,
        &options_for(&dir),
    )
    .unwrap();

    let english = fs::read_to_string(dir.path().join("English.strings")).unwrap();
    assert_eq!(english, "\"greeting\" = \"Hello\";\n");
    let french = fs::read_to_string(dir.path().join("French.strings")).unwrap();
    assert_eq!(french, "\"greeting\" = \"Bonjour\";\n");
}

#[test]
fn test_excluded_state_is_absent_from_every_format() {
    let csv = indoc! {"
        greeting,approved,Hello,Bonjour
        farewell,draft,Bye,Au revoir
    "};
    for format in FormatType::ALL {
        let dir = TempDir::new().unwrap();
        let options = ConversionOptions {
            excluded_states: HashSet::from(["draft".to_string()]),
            ..options_for(&dir)
        };
        let files = csv_to_resources(Cursor::new(csv), &scenario_request(), format, &options).unwrap();
        for file in &files {
            let content = fs::read_to_string(&file.path).unwrap();
            assert!(content.contains("greeting"), "{} {}", format, file.language);
            assert!(!content.contains("farewell"), "{} {}", format, file.language);
        }
    }
}

#[test]
fn test_android_files_align_missing_keys_to_empty() {
    let dir = TempDir::new().unwrap();
    let en = dir.path().join("en.xml");
    let fr = dir.path().join("fr.xml");
    fs::write(&en, r#"<resources><string name="k1">A</string></resources>"#).unwrap();
    fs::write(&fr, r#"<resources><string name="k2">B</string></resources>"#).unwrap();

    let matrix = resources_to_matrix(&[&en, &fr], FormatType::AndroidStrings, None).unwrap();
    let keys: HashSet<&str> = matrix.keys().collect();
    assert_eq!(keys, HashSet::from(["k1", "k2"]));
    assert_eq!(matrix.find_row("k2").unwrap().get_translation("en"), Some(""));
    assert_eq!(matrix.find_row("k1").unwrap().get_translation("fr"), Some(""));
    assert_eq!(matrix.find_row("k1").unwrap().get_translation("en"), Some("A"));
}

#[test]
fn test_language_without_column_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let request = ColumnRequest::new().with_header_language("German");
    let result = csv_to_resources(
        Cursor::new("greeting,approved,Hello,Bonjour\n"),
        &request,
        FormatType::Json,
        &options_for(&dir),
    );
    assert!(matches!(result, Err(Error::Configuration(_))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_language_column_beyond_width_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let request = scenario_request().with_language("German", 9);
    let result = csv_to_resources(
        Cursor::new("greeting,approved,Hello,Bonjour\n"),
        &request,
        FormatType::Json,
        &options_for(&dir),
    );
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_empty_csv_renders_empty_files() {
    let dir = TempDir::new().unwrap();
    let files = csv_to_resources(
        Cursor::new(""),
        &scenario_request(),
        FormatType::Php,
        &options_for(&dir),
    )
    .unwrap();
    assert_eq!(files.len(), 2);
    let english = fs::read_to_string(dir.path().join("English.php")).unwrap();
    assert_eq!(english, "<?php\n$LANG = array(\n);\n");
}

#[test]
fn test_short_row_reports_row_number() {
    let dir = TempDir::new().unwrap();
    let csv = indoc! {"
        greeting,approved,Hello,Bonjour
        farewell,approved,Bye
    "};
    let result = csv_to_resources(
        Cursor::new(csv),
        &scenario_request(),
        FormatType::Php,
        &options_for(&dir),
    );
    assert!(matches!(result, Err(Error::MalformedRow { row: 2, .. })));
}

#[test]
fn test_fallback_fills_empty_cells_from_default_language() {
    let dir = TempDir::new().unwrap();
    let csv = indoc! {"
        greeting,approved,Hello,
        farewell,approved,Bye,Au revoir
    "};
    let options = ConversionOptions {
        default_language: Some("English".to_string()),
        ..options_for(&dir)
    };
    csv_to_resources(Cursor::new(csv), &scenario_request(), FormatType::Json, &options).unwrap();

    let french = fs::read_to_string(dir.path().join("French.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&french).unwrap();
    assert_eq!(value["greeting"], "Hello");
    assert_eq!(value["farewell"], "Au revoir");
}

#[test]
fn test_duplicate_keys_follow_policy() {
    let csv = indoc! {"
        greeting,approved,Hello,Bonjour
        greeting,approved,Hi,Salut
    "};
    let dir = TempDir::new().unwrap();
    let result = csv_to_resources(
        Cursor::new(csv),
        &scenario_request(),
        FormatType::Json,
        &options_for(&dir),
    );
    assert!(matches!(result, Err(Error::Configuration(_))));

    let options = ConversionOptions {
        duplicates: DuplicateKeys::KeepLast,
        dry_run: true,
        ..options_for(&dir)
    };
    let files = csv_to_resources(Cursor::new(csv), &scenario_request(), FormatType::Json, &options)
        .unwrap();
    assert!(files[0].content.contains("Hi"));
    assert!(!files[0].content.contains("Hello"));
}

#[test]
fn test_escaping_survives_every_format() {
    let tricky = "Say \"hi\"\\ <b>&amp;</b>\nnext\tline 'quoted' ü 日本";
    for format in FormatType::ALL {
        let dir = TempDir::new().unwrap();
        let csv_path = dir.path().join("in.csv");
        let mut writer = csv::Writer::from_path(&csv_path).unwrap();
        writer.write_record(["tricky", "approved", tricky, "plain"]).unwrap();
        writer.flush().unwrap();
        drop(writer);

        let files = csv_file_to_resources(&csv_path, &scenario_request(), format, &options_for(&dir))
            .unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        let matrix = resources_to_matrix(&paths, format, None).unwrap();
        assert_eq!(
            matrix.find_row("tricky").unwrap().get_translation("English"),
            Some(tricky),
            "format {}",
            format
        );
    }
}

#[test]
fn test_resources_to_csv_and_back() {
    let dir = TempDir::new().unwrap();
    let en = dir.path().join("en.json");
    let fr = dir.path().join("fr.json");
    fs::write(&en, r#"{"hello": "Hello", "bye": "Bye"}"#).unwrap();
    fs::write(&fr, r#"{"hello": "Bonjour"}"#).unwrap();
    let csv_path = dir.path().join("translations.csv");

    let records = resources_to_csv(&[&en, &fr], FormatType::Json, &csv_path, &ConversionOptions::default())
        .unwrap();
    assert_eq!(records[0], vec!["Variables", "en", "fr"]);
    assert_eq!(records[2], vec!["bye", "Bye", ""]);

    let written = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(written, "Variables,en,fr\nhello,Hello,Bonjour\nbye,Bye,\n");

    let out = dir.path().join("out");
    let request = ColumnRequest::new()
        .with_header(true)
        .with_header_language("en")
        .with_header_language("fr");
    let options = ConversionOptions {
        output_path: out.clone(),
        ..Default::default()
    };
    csv_file_to_resources(&csv_path, &request, FormatType::Php, &options).unwrap();
    let french = fs::read_to_string(out.join("fr.php")).unwrap();
    assert_eq!(
        french,
        "<?php\n$LANG = array(\n    'hello' => 'Bonjour',\n    'bye' => '',\n);\n"
    );
}

#[test]
fn test_dry_run_reverse_direction_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let en = dir.path().join("en.strings");
    fs::write(&en, "\"a\" = \"A\";\n").unwrap();
    let csv_path = dir.path().join("out.csv");
    let options = ConversionOptions {
        dry_run: true,
        header_overrides: Some(vec!["English".to_string()]),
        ..Default::default()
    };
    let records = resources_to_csv(&[&en], FormatType::Strings, &csv_path, &options).unwrap();
    assert_eq!(records, vec![vec!["Variables", "English"], vec!["a", "A"]]);
    assert!(!csv_path.exists());
}

#[test]
fn test_parse_error_names_the_file() {
    let dir = TempDir::new().unwrap();
    let en = dir.path().join("en.php");
    fs::write(&en, "<?php\n$LANG = array(\n    'a' => 'A',\n").unwrap();
    let err = resources_to_matrix(&[&en], FormatType::Php, None).unwrap_err();
    match err {
        Error::FormatParse { file, .. } => assert!(file.ends_with("en.php")),
        other => panic!("unexpected error {other:?}"),
    }
}
