// Flat string lists and JSON buffers crossing the boundary.
use std::os::raw::c_char;
use std::ptr;

use serde_json::{Value, json};

use scopeshim::abi::*;
use scopeshim::core::strings::{StrData, join_strings, split_strings};

#[test]
fn flat_lists_round_trip_for_any_length() {
    let pool = ["", "w1", "caf\u{e9}", "", "with space", "\u{1f600}"];
    for n in 0..=pool.len() {
        let items: Vec<&str> = pool.iter().take(n).copied().collect();
        let encoded = join_strings(&items);
        assert_eq!(encoded.iter().filter(|byte| **byte == 0).count(), n);
        assert_eq!(split_strings(&encoded), items);
    }
}

#[test]
fn flat_list_survives_the_keyword_setter() {
    let mut err: *mut c_char = ptr::null_mut();
    let metadata = uscp_search_metadata_new(0, StrData::empty(), StrData::empty(), &mut err);
    let encoded = join_strings(&["b", "a"]);
    uscp_search_metadata_set_aggregated_keywords(
        metadata,
        StrData::from_bytes(&encoded),
        &mut err,
    );
    assert!(err.is_null());
    let mut len = 0usize;
    let raw = uscp_search_metadata_aggregated_keywords(metadata, &mut len);
    let bytes = unsafe { std::slice::from_raw_parts(raw.cast::<u8>(), len) }.to_vec();
    uscp_bytes_free(raw);
    assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!(["a", "b"]));
    uscp_search_metadata_free(metadata);
}

#[test]
fn json_trees_round_trip_through_result_attributes() {
    let trees = [
        json!(null),
        json!(true),
        json!(-12.25),
        json!("text with \"quotes\""),
        json!([1, [2, [3]], {"k": null}]),
        json!({"b": {"nested": [false, "x"]}, "a": 0}),
    ];
    let result = uscp_result_new();
    for (idx, tree) in trees.iter().enumerate() {
        let key = format!("k{idx}");
        let encoded = serde_json::to_vec(tree).unwrap();
        let mut err: *mut c_char = ptr::null_mut();
        uscp_result_set_attr(
            result,
            StrData::from_text(&key),
            StrData::from_bytes(&encoded),
            &mut err,
        );
        assert!(err.is_null());

        let mut len = 0usize;
        let raw = uscp_result_get_attr(result, StrData::from_text(&key), &mut len, &mut err);
        assert!(err.is_null());
        let bytes = unsafe { std::slice::from_raw_parts(raw.cast::<u8>(), len) }.to_vec();
        uscp_bytes_free(raw);
        assert_eq!(&serde_json::from_slice::<Value>(&bytes).unwrap(), tree);
    }

    let mut len = 0usize;
    let raw = uscp_result_serialize(result, &mut len);
    let bytes = unsafe { std::slice::from_raw_parts(raw.cast::<u8>(), len) }.to_vec();
    uscp_bytes_free(raw);
    let serialized: Value = serde_json::from_slice(&bytes).unwrap();
    let keys: Vec<&str> = serialized["attrs"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["k0", "k1", "k2", "k3", "k4", "k5"]);
    uscp_result_free(result);
}

#[test]
fn empty_json_payload_still_yields_a_buffer() {
    let mut err: *mut c_char = ptr::null_mut();
    let response = uscp_activation_response_new(0, &mut err);
    let mut len = usize::MAX;
    let raw = uscp_activation_response_scope_data(response, &mut len);
    assert!(!raw.is_null());
    let bytes = unsafe { std::slice::from_raw_parts(raw.cast::<u8>(), len) }.to_vec();
    assert_eq!(bytes, b"null");
    uscp_bytes_free(raw);
    uscp_activation_response_free(response);
}

#[test]
fn malformed_utf8_in_json_is_a_conversion_error() {
    let mut err: *mut c_char = ptr::null_mut();
    let query = uscp_canned_query_new(StrData::from_text("s"), StrData::empty(), StrData::empty());
    let bad = [b'{', 0xff, b'}'];
    uscp_canned_query_set_filter_state(query, StrData::from_bytes(&bad), &mut err);
    assert!(!err.is_null());
    let message = unsafe { std::ffi::CStr::from_ptr(err) }
        .to_string_lossy()
        .into_owned();
    uscp_string_free(err);
    assert_eq!(message.split(" (").next(), Some("Conversion: filter state: invalid json utf-8"));
    uscp_canned_query_free(query);
}

#[test]
fn trailing_bytes_after_the_last_terminator_are_ignored() {
    let mut err: *mut c_char = ptr::null_mut();
    let layout = uscp_column_layout_new(1, &mut err);
    uscp_column_layout_add_column(layout, StrData::from_bytes(b"a\0b\0dangling"), &mut err);
    let mut len = 0usize;
    let raw = uscp_column_layout_column(layout, 0, &mut len, &mut err);
    assert!(err.is_null());
    let bytes = unsafe { std::slice::from_raw_parts(raw.cast::<u8>(), len) }.to_vec();
    uscp_bytes_free(raw);
    assert_eq!(serde_json::from_slice::<Value>(&bytes).unwrap(), json!(["a", "b"]));
    uscp_column_layout_free(layout);
}
