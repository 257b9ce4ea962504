//! End-to-end validation tests

use std::io::{self, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use csv_validation_engine::{
    CellValue, ColumnDefinition, Engine, EngineFault, Schema, Status, Termination,
    ValidationOptions, ValidationResult, validate,
};

fn people_schema() -> Schema {
    Schema::new(vec![
        ColumnDefinition::integer("id").unique(),
        ColumnDefinition::integer("age").required(),
    ])
    .with_identifier("id")
}

fn run(input: &str, schema: &Schema) -> ValidationResult {
    validate(input.as_bytes(), schema, &ValidationOptions::default()).unwrap()
}

fn run_with(input: &str, schema: &Schema, options: ValidationOptions) -> ValidationResult {
    validate(input.as_bytes(), schema, &options).unwrap()
}

fn assert_sorted(result: &ValidationResult) {
    let keys: Vec<(Option<usize>, Option<&str>)> = result
        .errors()
        .iter()
        .map(|e| (e.row_index(), e.column()))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

mod contract_tests {
    use super::*;

    #[test]
    fn test_empty_stream_is_one_file_error() {
        let result = run("", &people_schema());
        assert_eq!(result.status(), Status::Fail);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind(), "EmptyFile");
        assert_eq!(result.errors()[0].row_index(), None);
        assert_eq!(result.errors()[0].column(), None);
    }

    #[test]
    fn test_well_formed_file_passes() {
        let result = run("id,age\n1,30\n2,40\n3,50\n", &people_schema());
        assert_eq!(result.status(), Status::Pass);
        assert!(result.errors().is_empty());
        assert_eq!(result.to_json().unwrap(), r#"{"status":"pass","errors":[]}"#);
    }

    #[test]
    fn test_header_only_file_passes() {
        assert!(run("id,age\n", &people_schema()).passed());
    }

    #[test]
    fn test_duplicate_identifier() {
        let result = run("id,age\n1,30\n1,40\n", &people_schema());

        assert_eq!(result.errors().len(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.kind(), "DuplicateValue");
        assert_eq!(error.row_index(), Some(1));
        assert_eq!(error.column(), Some("id"));
        assert_eq!(error.id(), Some(&CellValue::Integer(1)));
        assert!(error.message().contains("row 0"));

        assert_eq!(
            result.to_json().unwrap(),
            r#"{"status":"fail","errors":[{"row_index":1,"id":1,"column":"id","error_message":"Duplicate value '1': already used in row 0."}]}"#
        );
    }

    #[test]
    fn test_too_many_fields_skips_column_checks() {
        let result = run("id,age\n1,2,3\nx,\n", &people_schema());

        let first: Vec<_> = result
            .errors()
            .iter()
            .filter(|e| e.row_index() == Some(0))
            .collect();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind(), "TooManyFields");
        assert_eq!(first[0].column(), None);
        assert_eq!(first[0].id(), None);

        // The following row is still validated
        assert!(result.errors().iter().any(|e| e.row_index() == Some(1)));
    }

    #[test]
    fn test_error_cap_returns_partial_result() {
        let options = ValidationOptions::builder().max_errors(2).build();
        let input = "id,age\na,1\nb,2\nc,3\nd,4\ne,5\n";
        let report = Engine::with_options(options)
            .run(input.as_bytes(), &people_schema())
            .unwrap();

        let errors = report.result.errors();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0].kind(), "ErrorLimitReached");
        assert_eq!(errors[0].row_index(), None);
        assert_eq!(errors[1].row_index(), Some(0));
        assert_eq!(errors[2].row_index(), Some(1));
        assert!(report.result.is_partial());
        assert_eq!(report.stats.rows_read, 3);
        assert_eq!(report.stats.termination, Termination::ErrorLimit);
    }

    #[test]
    fn test_results_are_idempotent() {
        let schema = people_schema();
        let input = "id,age\n1,x\n1,\n2,3,4\n\"5\n";
        let first = run(input, &schema).to_json().unwrap();
        let second = run(input, &schema).to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_errors_are_sorted() {
        let schema = Schema::new(vec![
            ColumnDefinition::string("z").required(),
            ColumnDefinition::integer("a").required(),
            ColumnDefinition::integer("m").unique(),
        ]);
        let input = "z,a,m,z\n,x,1,q\nok,1,1\n,,2\n";
        let result = run(input, &schema);

        assert!(!result.passed());
        assert_sorted(&result);
        assert_eq!(result.errors()[0].kind(), "DuplicateHeaderColumn");
        let row0: Vec<&str> = result
            .errors()
            .iter()
            .filter(|e| e.row_index() == Some(0))
            .filter_map(|e| e.column())
            .collect();
        assert_eq!(row0, vec!["a", "z"]);
    }
}

mod rule_tests {
    use super::*;

    fn full_schema() -> Schema {
        Schema::new(vec![
            ColumnDefinition::integer("id").unique(),
            ColumnDefinition::string("email")
                .required()
                .with_pattern(r"[^@\s]+@[^@\s]+\.[a-z]+"),
            ColumnDefinition::integer("age").with_min(18).with_max(100),
            ColumnDefinition::float("score").with_min(0).with_max(1),
            ColumnDefinition::boolean("active"),
            ColumnDefinition::date("joined", "%Y-%m-%d").with_min("2000-01-01"),
        ])
        .with_identifier("id")
    }

    const HEADER: &str = "id,email,age,score,active,joined\n";

    fn single(row: &str) -> ValidationResult {
        run(&format!("{}{}\n", HEADER, row), &full_schema())
    }

    #[test]
    fn test_valid_row() {
        assert!(single("1,a@b.io,30,0.5,TRUE,2021-06-01").passed());
        assert!(single("2,a@b.io,,,,").passed());
    }

    #[test]
    fn test_type_mismatch_names_type() {
        let result = single("1,a@b.io,3.5,0.5,yes,2021-13-01");
        let messages: Vec<String> = result.errors().iter().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec![
                "Invalid boolean value: 'yes'.",
                "Invalid integer value: '3.5'.",
                "Invalid date value: '2021-13-01'.",
            ]
        );
        assert!(result.errors().iter().all(|e| e.id() == Some(&CellValue::Integer(1))));
    }

    #[test]
    fn test_range_and_pattern() {
        let result = single("7,not-an-email,17,1.5,0,1999-12-31");
        let kinds: Vec<(&str, &str)> = result
            .errors()
            .iter()
            .map(|e| (e.column().unwrap_or_default(), e.kind()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("age", "RangeViolation"),
                ("email", "PatternMismatch"),
                ("joined", "RangeViolation"),
                ("score", "RangeViolation"),
            ]
        );
        let joined = result
            .errors()
            .iter()
            .find(|e| e.column() == Some("joined"))
            .unwrap();
        assert_eq!(
            joined.message(),
            "Value 1999-12-31 is outside the allowed range: must be at least 2000-01-01."
        );
    }

    #[test]
    fn test_whitespace_only_required_field_is_missing() {
        let result = single("1,   ,30,0.5,1,2021-01-01");
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind(), "MissingRequiredField");
    }

    #[test]
    fn test_numbers_with_whitespace_are_rejected() {
        let result = single("1,a@b.io, 30,0.5,1,2021-01-01");
        assert_eq!(result.errors()[0].kind(), "TypeMismatch");
    }

    #[test]
    fn test_invalid_identifier_means_null_id() {
        let result = single("one,,30,0.5,1,2021-01-01");
        assert_eq!(result.errors().len(), 2);
        assert!(result.errors().iter().all(|e| e.id().is_none()));
    }

    #[test]
    fn test_uniqueness_normalizes_values() {
        let schema = Schema::new(vec![
            ColumnDefinition::integer("n").unique(),
            ColumnDefinition::boolean("b").unique(),
        ]);
        let result = run("n,b\n1,true\n01,1\n", &schema);
        let kinds: Vec<&str> = result.errors().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["DuplicateValue", "DuplicateValue"]);
        assert!(result.errors().iter().all(|e| e.row_index() == Some(1)));
    }

    #[test]
    fn test_duplicate_always_names_first_row() {
        let result = run("id,age\n5,1\n5,2\n5,3\n", &people_schema());
        let messages: Vec<String> = result.errors().iter().map(|e| e.message()).collect();
        assert_eq!(
            messages,
            vec![
                "Duplicate value '5': already used in row 0.",
                "Duplicate value '5': already used in row 0.",
            ]
        );
    }

    #[test]
    fn test_wire_id_is_an_integer() {
        let result = run("id,age\n7,\n", &people_schema());
        assert_eq!(
            result.to_json().unwrap(),
            r#"{"status":"fail","errors":[{"row_index":0,"id":7,"column":"age","error_message":"Column 'age' is required but the value is empty."}]}"#
        );
    }

    #[test]
    fn test_non_integer_identifier_is_a_fault() {
        let schema = Schema::new(vec![
            ColumnDefinition::string("code"),
            ColumnDefinition::integer("n").required(),
        ])
        .with_identifier("code");
        let err = validate("code,n\nA-1,\n".as_bytes(), &schema, &ValidationOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineFault::SchemaConfiguration(_)));
    }
}

mod structure_tests {
    use super::*;

    #[test]
    fn test_missing_schema_column_is_file_error() {
        let result = run("id\n1\n", &people_schema());
        assert_eq!(result.errors().len(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.kind(), "MissingColumn");
        assert_eq!(error.row_index(), None);
        assert_eq!(error.column(), Some("age"));
    }

    #[test]
    fn test_extra_header_columns_are_ignored() {
        assert!(run("note,id,age\nhello,1,30\n", &people_schema()).passed());
    }

    #[test]
    fn test_duplicate_header_keeps_validating() {
        let result = run("id,age,id\n1,30,9\nx,40,9\n", &people_schema());
        let kinds: Vec<&str> = result.errors().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["DuplicateHeaderColumn", "TypeMismatch"]);
        assert_eq!(result.errors()[1].row_index(), Some(1));
    }

    #[test]
    fn test_unterminated_quote() {
        let result = run("id,age\n1,30\n2,\"40\n3,50\n", &people_schema());
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind(), "UnterminatedQuote");
        assert_eq!(result.errors()[0].row_index(), Some(1));
    }

    #[test]
    fn test_invalid_encoding_row() {
        let input: &[u8] = b"id,age\n1,\xC3\x28\n2,30\n";
        let result = validate(input, &people_schema(), &ValidationOptions::default()).unwrap();
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind(), "InvalidEncoding");
    }

    #[test]
    fn test_quoted_fields_and_custom_dialect() {
        let schema = Schema::new(vec![
            ColumnDefinition::string("name").required(),
            ColumnDefinition::integer("n"),
        ]);
        let input = "name;n\r\n'Smith; John';1\r\n'It''s';2\r\n";
        let options = ValidationOptions::builder()
            .delimiter(';')
            .quote_char('\'')
            .build();
        assert!(run_with(input, &schema, options).passed());
    }

    #[test]
    fn test_single_column_blank_line_is_skipped_not_missing() {
        let schema = Schema::new(vec![ColumnDefinition::string("name").required()]);
        let result = run("name\nAda\n\n\"\"\n", &schema);

        assert_eq!(result.errors().len(), 1);
        let error = &result.errors()[0];
        assert_eq!(error.kind(), "MissingRequiredField");
        assert_eq!(error.row_index(), Some(1));
    }

    #[test]
    fn test_blank_lines_do_not_shift_row_indices() {
        let result = run("id,age\n1,30\n\n\nx,40\n", &people_schema());
        assert_eq!(result.errors()[0].row_index(), Some(1));
    }
}

mod limit_tests {
    use super::*;

    #[test]
    fn test_zero_timeout_is_labelled_partial() {
        let options = ValidationOptions::builder().timeout_ms(0).build();
        let report = Engine::with_options(options)
            .run("id,age\n1,30\n".as_bytes(), &people_schema())
            .unwrap();

        assert_eq!(report.stats.termination, Termination::TimedOut);
        assert_eq!(report.result.errors().len(), 1);
        assert_eq!(report.result.errors()[0].kind(), "ValidationTimedOut");
        assert!(!report.result.passed());
    }

    #[test]
    fn test_generous_timeout_does_not_fire() {
        let options = ValidationOptions::builder().timeout_ms(60_000).build();
        assert!(run_with("id,age\n1,30\n", &people_schema(), options).passed());
    }

    #[test]
    fn test_row_limit() {
        let options = ValidationOptions::builder().max_rows(1).build();
        let result = run_with("id,age\n1,30\nx,40\n", &people_schema(), options);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].kind(), "RowLimitReached");
    }

    #[test]
    fn test_min_rows() {
        let options = ValidationOptions::builder().min_rows(3).build();
        let result = run_with("id,age\n1,30\n2,40\n", &people_schema(), options);
        assert_eq!(result.errors().len(), 1);
        assert_eq!(
            result.errors()[0].message(),
            "File contains 2 data rows; at least 3 are required."
        );
    }

    #[test]
    fn test_min_rows_survives_a_full_error_cap() {
        let schema = Schema::new(vec![ColumnDefinition::integer("n")]);
        let options = ValidationOptions::builder().max_errors(1).min_rows(5).build();
        let report = Engine::with_options(options)
            .run("n\nx\n".as_bytes(), &schema)
            .unwrap();

        let kinds: Vec<&str> = report.result.errors().iter().map(|e| e.kind()).collect();
        assert_eq!(kinds, vec!["TooFewRows", "TypeMismatch"]);
        assert!(!report.result.is_partial());
        assert_eq!(report.stats.termination, Termination::Exhausted);
    }

    #[test]
    fn test_exactly_cap_errors_is_complete() {
        let options = ValidationOptions::builder().max_errors(2).build();
        let result = run_with("id,age\nx,1\ny,2\n", &people_schema(), options);
        assert_eq!(result.errors().len(), 2);
        assert!(!result.is_partial());
    }
}

mod fault_tests {
    use super::*;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    struct TrackedReader<R> {
        inner: R,
        dropped: Arc<AtomicBool>,
    }

    impl<R: Read> Read for TrackedReader<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl<R> Drop for TrackedReader<R> {
        fn drop(&mut self) {
            self.dropped.store(true, Ordering::SeqCst);
        }
    }

    fn tracked(input: &'static str) -> (TrackedReader<&'static [u8]>, Arc<AtomicBool>) {
        let dropped = Arc::new(AtomicBool::new(false));
        let reader = TrackedReader {
            inner: input.as_bytes(),
            dropped: Arc::clone(&dropped),
        };
        (reader, dropped)
    }

    #[test]
    fn test_io_failure_is_a_fault() {
        let err = validate(FailingReader, &people_schema(), &ValidationOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineFault::Io(_)));
    }

    #[test]
    fn test_bad_schema_is_a_fault() {
        let schema = Schema::new(vec![ColumnDefinition::integer("n").with_min(5).with_max(1)]);
        let err = validate("n\n1\n".as_bytes(), &schema, &ValidationOptions::default())
            .unwrap_err();
        assert!(matches!(err, EngineFault::SchemaConfiguration(_)));
    }

    #[test]
    fn test_bad_options_are_a_fault() {
        let options = ValidationOptions::builder().max_errors(0).build();
        let err = validate("id,age\n".as_bytes(), &people_schema(), &options).unwrap_err();
        assert!(matches!(err, EngineFault::InvalidOptions(_)));
    }

    #[test]
    fn test_reader_released_on_every_exit() {
        let (reader, dropped) = tracked("id,age\n1,30\n");
        validate(reader, &people_schema(), &ValidationOptions::default()).unwrap();
        assert!(dropped.load(Ordering::SeqCst));

        let (reader, dropped) = tracked("id,age\nx,1\ny,2\nz,3\n");
        let options = ValidationOptions::builder().max_errors(1).build();
        validate(reader, &people_schema(), &options).unwrap();
        assert!(dropped.load(Ordering::SeqCst));

        let (reader, dropped) = tracked("id,age\n1,30\n");
        let options = ValidationOptions::builder().timeout_ms(0).build();
        validate(reader, &people_schema(), &options).unwrap();
        assert!(dropped.load(Ordering::SeqCst));

        let (reader, dropped) = tracked("id,age\n1,30\n");
        let options = ValidationOptions::builder().delimiter('"').build();
        assert!(validate(reader, &people_schema(), &options).is_err());
        assert!(dropped.load(Ordering::SeqCst));
    }
}

#[cfg(feature = "parallel")]
mod parallel_tests {
    use super::*;

    fn noisy_input(rows: usize) -> String {
        let mut input = String::from("id,age,extra\n");
        for i in 0..rows {
            match i % 7 {
                0 => input.push_str(&format!("{},{},x\n", i / 2, i)),
                1 => input.push_str("bad,,x\n"),
                2 => input.push_str(&format!("{},1,2,3\n", i)),
                _ => input.push_str(&format!("{},{},y\n", i, i % 50)),
            }
        }
        input
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let schema = people_schema();
        let input = noisy_input(500);

        for max_errors in [5, 50, 10_000] {
            let sequential = ValidationOptions::builder().max_errors(max_errors).build();
            let parallel = ValidationOptions::builder()
                .max_errors(max_errors)
                .parallel_batch_size(64)
                .build();

            let expected = run_with(&input, &schema, sequential).to_json().unwrap();
            let actual = run_with(&input, &schema, parallel).to_json().unwrap();
            assert_eq!(expected, actual, "max_errors = {}", max_errors);
        }
    }

    #[test]
    fn test_parallel_row_limit_matches_sequential() {
        let schema = people_schema();
        let input = noisy_input(100);
        let sequential = ValidationOptions::builder().max_rows(40).build();
        let parallel = ValidationOptions::builder()
            .max_rows(40)
            .parallel_batch_size(16)
            .build();

        assert_eq!(
            run_with(&input, &schema, sequential).to_json().unwrap(),
            run_with(&input, &schema, parallel).to_json().unwrap()
        );
    }
}
