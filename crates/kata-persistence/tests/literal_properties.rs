//! Property tests for the record database module format.
//!
//! Arbitrary JSON trees are rendered and read back through the ECMAScript
//! parser, so every rendered module must be valid JavaScript that evaluates
//! to the same value, whatever the keys and strings contain.

use proptest::prelude::*;
use serde_json::{Map, Number, Value};

use kata_persistence::literal::{parse_module, render_module};
use kata_persistence::LiteralStyle;

// ─── Strategies ─────────────────────────────────────────────────────────────

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("__proto__".to_string()),
        Just(String::new()),
        Just("constructor".to_string()),
        "[a-zA-Z_$][a-zA-Z0-9_$]{0,8}",
        r#"["'\\\n\t\x01-\x1f \u{2028}]{0,6}"#,
        any::<String>(),
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    prop_oneof![
        r#"["'\\\n\r\t\x00-\x1f\u{2028}\u{2029}a]{0,12}"#,
        any::<String>(),
    ]
}

fn arb_number() -> impl Strategy<Value = Number> {
    prop_oneof![
        any::<i64>().prop_map(Number::from),
        any::<u64>().prop_map(Number::from),
        // -0.0 is written as 0, which reads back as an integer
        any::<f64>()
            .prop_filter_map("finite", |f| Number::from_f64(if f == 0.0 { 0.0 } else { f })),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        arb_number().prop_map(Value::Number),
        arb_string().prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::vec((arb_key(), inner), 0..8)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

// ─── Properties ─────────────────────────────────────────────────────────────

proptest! {
    /// Rendered modules parse back to the exported value.
    #[test]
    fn rendered_module_reads_back(value in arb_value()) {
        let module = render_module("userCompletedDB", &value, &LiteralStyle::default());
        let (name, parsed) = parse_module(&module)
            .map_err(|e| TestCaseError::fail(format!("{e}\n{module}")))?;

        prop_assert_eq!(name, "userCompletedDB");
        prop_assert_eq!(parsed, value);
    }

    /// Output keeps the fixed style at any print width.
    #[test]
    fn rendered_module_has_no_trailing_commas(
        value in arb_value(),
        print_width in 20usize..200,
    ) {
        let style = LiteralStyle::default().with_print_width(print_width);
        let module = render_module("db", &value, &style);
        let (_, parsed) = parse_module(&module)
            .map_err(|e| TestCaseError::fail(format!("{e}\n{module}")))?;

        prop_assert!(module.ends_with('\n'));
        let lines: Vec<&str> = module.lines().collect();
        for pair in lines.windows(2) {
            let closes = pair[1].trim_start().starts_with(['}', ']']);
            prop_assert!(!(closes && pair[0].ends_with(',')), "trailing comma in\n{}", module);
        }
        prop_assert_eq!(parsed, value);
    }
}
