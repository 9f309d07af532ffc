//! Integration tests for running shift specs end to end.

use serde_json::{json, Value};
use shiftquill::{Shiftr, SpecError, TransformError};
use std::sync::Arc;

fn shift(spec: Value, input: Value) -> Value {
    Shiftr::new(&spec).unwrap().transform(&input).unwrap()
}

#[test]
fn test_rating_example() {
    let spec = json!({
        "rating": {
            "primary": {
                "value": "Rating",
                "max": "RatingRange"
            },
            "*": {
                "max": "SecondaryRatings.&1.Range",
                "value": "SecondaryRatings.&1.Value",
                "$": "SecondaryRatings.&.Id"
            }
        }
    });
    let input = json!({
        "rating": {
            "primary": { "value": 3, "max": 5 },
            "quality": { "value": 4, "max": 5 }
        }
    });

    assert_eq!(
        shift(spec, input),
        json!({
            "Rating": 3,
            "RatingRange": 5,
            "SecondaryRatings": {
                "quality": { "Id": "quality", "Value": 4, "Range": 5 }
            }
        })
    );
}

#[test]
fn test_literal_spec_is_idempotent_and_order_independent() {
    let shiftr = Shiftr::new(&json!({
        "user": { "first": "name.given", "last": "name.family" },
        "age": "years"
    }))
    .unwrap();

    let input = json!({"user": {"first": "Ada", "last": "Lovelace"}, "age": 36});
    let reordered = json!({"age": 36, "user": {"last": "Lovelace", "first": "Ada"}});

    let first = shiftr.transform(&input).unwrap();
    let second = shiftr.transform(&input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, shiftr.transform(&reordered).unwrap());
    assert_eq!(
        first,
        json!({"name": {"given": "Ada", "family": "Lovelace"}, "years": 36})
    );
}

#[test]
fn test_longer_wildcard_wins() {
    let output = shift(
        json!({
            "rating-*": "short.&(0,1)",
            "rating-range-*": "long.&(0,1)"
        }),
        json!({"rating-range-5": 1, "rating-7": 2}),
    );
    assert_eq!(output, json!({"long": {"5": 1}, "short": {"7": 2}}));
}

#[test]
fn test_double_wildcard_is_non_greedy() {
    let output = shift(
        json!({"*-tuna-*": "&(0,1).&(0,2)"}),
        json!({"abc-tuna-def": 1, "a-tuna-b-tuna-c": 2}),
    );
    assert_eq!(output, json!({"abc": {"def": 1}, "a": {"b-tuna-c": 2}}));
}

#[test]
fn test_backreference_to_parent_capture() {
    let output = shift(
        json!({"tuna-*-marlin-*": {"rating-*": "&(1,2).&.value"}}),
        json!({"tuna-A-marlin-AAA": {"rating-BBB": "bar"}}),
    );
    assert_eq!(output, json!({"AAA": {"rating-BBB": {"value": "bar"}}}));
}

#[test]
fn test_alternatives_collide_into_list() {
    let output = shift(json!({"a|b": "out"}), json!({"a": 1, "b": 2}));
    assert_eq!(output, json!({"out": [1, 2]}));
}

#[test]
fn test_collision_never_overwrites() {
    let output = shift(
        json!({"a": "out", "b": "out", "c": "out"}),
        json!({"a": 1, "b": [2], "c": 3}),
    );
    assert_eq!(output, json!({"out": [1, [2], 3]}));
}

#[test]
fn test_explicit_index_pads_with_null() {
    let output = shift(json!({"a": "out[3]"}), json!({"a": "v"}));
    assert_eq!(output, json!({"out": [null, null, null, "v"]}));
}

#[test]
fn test_index_from_input_position() {
    let output = shift(
        json!({"photos": {"*": {"url": "images[&1].src"}}}),
        json!({"photos": [{"url": "a.png"}, {"url": "b.png"}]}),
    );
    assert_eq!(
        output,
        json!({"images": [{"src": "a.png"}, {"src": "b.png"}]})
    );
}

#[test]
fn test_auto_expand_appends() {
    let output = shift(
        json!({"items": {"*": "all[]"}, "extra": "all[]"}),
        json!({"items": ["a", "b"], "extra": "c"}),
    );
    assert_eq!(output, json!({"all": ["a", "b", "c"]}));
}

#[test]
fn test_hash_count_index() {
    let output = shift(
        json!({"photos": {"*": {"url": "out[#2].u", "id": "out[#2].i"}}}),
        json!({"photos": {
            "first": {"url": "a", "id": 1},
            "second": {"url": "b", "id": 2}
        }}),
    );
    assert_eq!(
        output,
        json!({"out": [{"u": "a", "i": 1}, {"u": "b", "i": 2}]})
    );
}

#[test]
fn test_duplicate_keys_fail_at_build_time() {
    let result = Shiftr::new(&json!({"rating": {"&": "a", "&(0,0)": "b"}}));
    assert!(matches!(result, Err(SpecError::DuplicateKey { .. })));
}

#[test]
fn test_absent_transpose_skips_write() {
    let output = shift(
        json!({"*": {"name": "byId.@(1,id)"}}),
        json!({
            "u1": {"name": "ada", "id": "x1"},
            "u2": {"name": "bob"},
            "u3": {"name": "cy", "id": {"not": "scalar"}}
        }),
    );
    assert_eq!(output, json!({"byId": {"x1": "ada"}}));
}

#[test]
fn test_only_absent_transposes_give_null() {
    let output = shift(
        json!({"*": {"name": "byId.@(1,id)"}}),
        json!({"u2": {"name": "bob"}}),
    );
    assert_eq!(output, Value::Null);
}

#[test]
fn test_at_copies_current_value() {
    let output = shift(
        json!({"user": {"@": "copy", "name": "name"}}),
        json!({"user": {"name": "ada", "id": 1}}),
    );
    assert_eq!(
        output,
        json!({"copy": {"name": "ada", "id": 1}, "name": "ada"})
    );
}

#[test]
fn test_dollar_writes_keys_and_captures() {
    let output = shift(
        json!({"rating-*": {"$": "keys[]", "$(0,1)": "levels[]"}}),
        json!({"rating-5": {"x": 1}, "rating-7": {"x": 2}}),
    );
    assert_eq!(
        output,
        json!({"keys": ["rating-5", "rating-7"], "levels": ["5", "7"]})
    );
}

#[test]
fn test_hash_writes_literal() {
    let output = shift(
        json!({"user": {"#present": "flags.&1"}}),
        json!({"user": {"name": "ada"}}),
    );
    assert_eq!(output, json!({"flags": {"user": "present"}}));
}

#[test]
fn test_scalar_value_dispatches_as_key() {
    let output = shift(
        json!({"status": {"active": {"#yes": "isActive"}, "*": {"$": "otherStatus"}}}),
        json!({"status": "suspended"}),
    );
    assert_eq!(output, json!({"otherStatus": "suspended"}));
}

#[test]
fn test_transpose_leaf_reads_sibling() {
    let output = shift(
        json!({"user": {"@(0,name)": "who"}}),
        json!({"user": {"name": "ada"}}),
    );
    assert_eq!(output, json!({"who": "ada"}));
}

#[test]
fn test_transpose_composite_walks_other_data() {
    let output = shift(
        json!({"@(0,meta.tags)": {"*": "tags[]"}}),
        json!({"meta": {"tags": ["x", "y"]}}),
    );
    assert_eq!(output, json!({"tags": ["x", "y"]}));
}

#[test]
fn test_reference_key_on_match_side() {
    let output = shift(
        json!({"*": {"&0-id": "ids.&1"}}),
        json!({"user": {"user-id": 7, "other": 1}}),
    );
    assert_eq!(output, json!({"ids": {"user": 7}}));
}

#[test]
fn test_multiple_outputs() {
    let output = shift(json!({"a": ["x", "y.z"]}), json!({"a": 1}));
    assert_eq!(output, json!({"x": 1, "y": {"z": 1}}));
}

#[test]
fn test_empty_output_path_writes_root() {
    let output = shift(json!({"wrapper": ""}), json!({"wrapper": {"x": 1}}));
    assert_eq!(output, json!({"x": 1}));
}

#[test]
fn test_escaped_keys() {
    let output = shift(
        json!({"a\\.b": "plain", "\\@at": "at"}),
        json!({"a.b": 1, "@at": 2}),
    );
    assert_eq!(output, json!({"plain": 1, "at": 2}));
}

#[test]
fn test_out_of_range_depth_is_error() {
    let shiftr = Shiftr::new(&json!({"a": "&(5,0)"})).unwrap();
    assert!(matches!(
        shiftr.transform(&json!({"a": 1})),
        Err(TransformError::ReferenceDepth { depth: 5, .. })
    ));
}

#[test]
fn test_out_of_range_group_is_error() {
    let shiftr = Shiftr::new(&json!({"a-*": "&(0,3)"})).unwrap();
    assert!(matches!(
        shiftr.transform(&json!({"a-1": 1})),
        Err(TransformError::CaptureGroup { group: 3, .. })
    ));
}

#[test]
fn test_unmatched_keys_do_not_fail() {
    let shiftr = Shiftr::new(&json!({"a-*": "&(0,3)"})).unwrap();
    assert_eq!(shiftr.transform(&json!({"b": 1})).unwrap(), Value::Null);
}

#[test]
fn test_depth_limit() {
    let shiftr = Shiftr::with_max_depth(&json!({"a": {"b": {"c": "out"}}}), 3).unwrap();
    assert_eq!(
        shiftr.transform(&json!({"a": {"b": {"c": 1}}})),
        Err(TransformError::DepthExceeded { limit: 3 })
    );
}

#[test]
fn test_shared_across_threads() {
    let shiftr = Arc::new(Shiftr::new(&json!({"*": "out.&"})).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let shiftr = Arc::clone(&shiftr);
            std::thread::spawn(move || {
                let input = json!({ format!("k{}", i): i });
                shiftr.transform(&input).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let output = handle.join().unwrap();
        assert_eq!(output, json!({"out": { format!("k{}", i): i }}));
    }
}

#[test]
fn test_repeated_index_collides_into_list() {
    let output = shift(
        json!({"a": "out[0]", "b": "out[0]"}),
        json!({"a": 1, "b": 2}),
    );
    assert_eq!(output, json!({"out": [[1, 2]]}));
}

#[test]
fn test_huge_index_from_input_key_is_skipped() {
    let shiftr = Shiftr::new(&json!({"*": "out[&0]"})).unwrap();
    for key in ["18446744073709551615", "1000000000000000000", "1000000000000"] {
        let input = json!({ key: 1, "2": "kept" });
        assert_eq!(
            shiftr.transform(&input).unwrap(),
            json!({"out": [null, null, "kept"]}),
            "key {}",
            key
        );
    }
}

#[test]
fn test_index_ceiling_is_configurable() {
    let shiftr = Shiftr::with_limits(&json!({"*": "out[&0]"}), 64, 3).unwrap();
    assert_eq!(
        shiftr.transform(&json!({"3": "a", "4": "b"})).unwrap(),
        json!({"out": [null, null, null, "a"]})
    );
}

#[test]
fn test_huge_literal_index_fails_at_build_time() {
    assert!(matches!(
        Shiftr::new(&json!({"a": "out[1000000000000]"})),
        Err(SpecError::InvalidArray { .. })
    ));
    assert!(matches!(
        Shiftr::new(&json!({"a": "out[99999999999999999999999]"})),
        Err(SpecError::InvalidArray { .. })
    ));
}
