//! Typed decoding through the operation facades.

mod common;

use std::time::Duration;

use bytes::Bytes;
use common::{bulk, fresh};
use serde::{Deserialize, Serialize};

use redikit_client::{
    DataType, Error, KeyTtl, KvTemplate, Reply, SortQuery, StringSerializer,
};

fn string_template() -> (KvTemplate<String, String>, std::sync::Arc<common::FakeState>) {
    let (factory, state) = fresh();
    (KvTemplate::string_template(factory), state)
}

#[test]
fn get_decodes_present_value() {
    let (template, state) = string_template();
    state.script([bulk(b"hello")]);
    let value = template.value_ops().get(&"greeting".to_owned()).unwrap();
    assert_eq!(value, Some("hello".to_owned()));
    assert_eq!(state.commands(), vec!["get"]);
}

#[test]
fn missing_value_is_absent_not_empty() {
    let (template, state) = string_template();
    state.script([Reply::Nil, bulk(b"")]);
    assert_eq!(template.value_ops().get(&"a".to_owned()).unwrap(), None);
    // An empty stored payload is still a present value.
    assert_eq!(template.value_ops().get(&"b".to_owned()).unwrap(), Some(String::new()));
}

#[test]
fn multi_get_keeps_positional_gaps() {
    let (template, state) = string_template();
    state.script([Reply::Array(vec![bulk(b"a"), Reply::Nil, bulk(b"c")])]);
    let values = template
        .value_ops()
        .multi_get(&["k1".to_owned(), "k2".to_owned(), "k3".to_owned()])
        .unwrap();
    assert_eq!(values, vec![Some("a".into()), None, Some("c".into())]);
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Task {
    id: u64,
    title: String,
}

#[test]
fn object_graph_round_trips_through_json_role() {
    let (factory, state) = fresh();
    let template: KvTemplate<String, Task> =
        KvTemplate::builder(factory).key_serializer(StringSerializer).build();

    let task = Task { id: 9, title: "ship it".into() };
    let payload = serde_json::to_vec(&task).unwrap();
    state.script([Reply::Bulk(Bytes::from(payload))]);

    let loaded = template.value_ops().get(&"task:9".to_owned()).unwrap();
    assert_eq!(loaded, Some(task));
}

#[test]
fn expiration_states_map_from_ttl_replies() {
    let (template, state) = string_template();
    let key = "task".to_owned();

    state.script([Reply::Int(-2), Reply::Int(-1), Reply::Int(42)]);
    assert_eq!(template.get_expire(&key).unwrap(), KeyTtl::Missing);
    assert_eq!(template.get_expire(&key).unwrap(), KeyTtl::NoExpiry);
    assert_eq!(
        template.get_expire(&key).unwrap(),
        KeyTtl::ExpiresIn(Duration::from_secs(42))
    );
}

#[test]
fn type_codes_map_to_data_types() {
    let (template, state) = string_template();
    state.script([Reply::Status("zset".into()), Reply::Status("none".into())]);
    assert_eq!(template.type_of(&"board".to_owned()).unwrap(), DataType::ZSet);
    assert_eq!(template.type_of(&"gone".to_owned()).unwrap(), DataType::None);
}

#[test]
fn hash_entries_pair_fields_with_values() {
    let (template, state) = string_template();
    state.script([Reply::Array(vec![
        bulk(b"owner"),
        bulk(b"kim"),
        bulk(b"state"),
        bulk(b"open"),
    ])]);
    let entries = template.hash_ops().entries(&"task:9".to_owned()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries.get("owner").map(String::as_str), Some("kim"));
    assert_eq!(entries.get("state").map(String::as_str), Some("open"));
}

#[test]
fn odd_length_hash_reply_is_malformed() {
    let (template, state) = string_template();
    state.script([Reply::Array(vec![bulk(b"owner"), bulk(b"kim"), bulk(b"state")])]);
    let err = template.hash_ops().entries(&"task:9".to_owned()).unwrap_err();
    assert!(matches!(err, Error::MalformedReply(_)));
}

#[test]
fn scores_parse_and_missing_members_stay_absent() {
    let (template, state) = string_template();
    state.script([bulk(b"3.5"), Reply::Nil, Reply::Nil]);
    let key = "board".to_owned();
    let member = "kim".to_owned();
    assert_eq!(template.zset_ops().score(&key, &member).unwrap(), Some(3.5));
    assert_eq!(template.zset_ops().score(&key, &member).unwrap(), None);
    assert_eq!(template.zset_ops().rank(&key, &member).unwrap(), None);
}

#[test]
fn sort_mapped_reassembles_pattern_groups() {
    let (template, state) = string_template();
    state.script([Reply::Array(vec![
        bulk(b"t1"),
        bulk(b"kim"),
        bulk(b"t2"),
        Reply::Nil,
        bulk(b"t3"),
        bulk(b"ada"),
    ])]);

    let query = SortQuery::new("tasks".to_owned()).get("title_*").get("owner_*");
    let records = template
        .sort_mapped(&query, |chunk| (chunk[0].clone(), chunk[1].clone()))
        .unwrap();
    assert_eq!(
        records,
        vec![
            (Some("t1".into()), Some("kim".into())),
            (Some("t2".into()), None),
            (Some("t3".into()), Some("ada".into())),
        ]
    );
}

#[test]
fn sort_partial_trailing_group_fails() {
    let (template, state) = string_template();
    state.script([Reply::Array(vec![
        bulk(b"t1"),
        bulk(b"kim"),
        bulk(b"t2"),
    ])]);
    let query = SortQuery::new("tasks".to_owned()).get("title_*").get("owner_*");
    let err = template.sort_mapped(&query, |chunk| chunk.len()).unwrap_err();
    assert!(matches!(err, Error::MalformedReply(_)));
}

#[test]
fn sort_and_store_reports_stored_count() {
    let (factory, state) = fresh();
    let template = KvTemplate::string_template(factory);
    state.script([Reply::Int(3)]);
    let query = SortQuery::new("tasks".to_owned());
    let stored = template.sort_and_store(&query, &"tasks:sorted".to_owned()).unwrap();
    assert_eq!(stored, 3);
    assert_eq!(state.commands(), vec!["sort_store"]);
}

#[test]
fn publish_rejects_empty_channel_without_acquiring() {
    let (template, state) = string_template();
    let err = template.publish("", &"message".to_owned()).unwrap_err();
    assert!(matches!(err, Error::InvalidUsage(_)));
    assert_eq!(state.acquired(), 0);
}
