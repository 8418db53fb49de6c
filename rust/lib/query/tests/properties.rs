//! End-to-end checks: JSON criteria/options in, wire strings out.

use erp_query::*;

fn filter(json: &str) -> Option<String> {
    let criteria: SearchCriteria = serde_json::from_str(json).unwrap();
    compile_filter(&criteria)
}

#[test]
fn documented_filter_examples() {
    assert_eq!(filter("{}"), None);
    assert_eq!(filter(r#"{"a": null, "b": null}"#), None);
    assert_eq!(filter(r#"{"status": 1}"#).as_deref(), Some("STATUS eq 1"));
    assert_eq!(
        filter(r#"{"tags": ["A", "B"]}"#).as_deref(),
        Some("(TAGS eq 'A' or TAGS eq 'B')")
    );
    assert_eq!(
        filter(r#"{"price": {"gte": 100, "lte": 500}}"#).as_deref(),
        Some("PRICE gte 100 and PRICE lte 500")
    );
}

#[test]
fn json_key_order_drives_clause_order() {
    assert_eq!(
        filter(r#"{"status": 1, "code": "ABC"}"#).as_deref(),
        Some("STATUS eq 1 and CODE eq 'ABC'")
    );
    assert_eq!(
        filter(r#"{"code": "ABC", "status": 1}"#).as_deref(),
        Some("CODE eq 'ABC' and STATUS eq 1")
    );
}

#[test]
fn nested_values_without_literal_form_are_dropped() {
    assert_eq!(
        filter(r#"{"a": [{"x": 1}, [2]], "b": {"eq": {"x": 1}}, "c": 3}"#).as_deref(),
        Some("C eq 3")
    );
}

#[test]
fn compiled_filter_rides_in_q() {
    let criteria: SearchCriteria =
        serde_json::from_str(r#"{"cardType": 3, "auxilCode": {"like": "A*"}}"#).unwrap();
    let options = QueryOptions::new()
        .limit(25)
        .sort(SortSpec::by("CODE"))
        .q(compile_filter(&criteria).unwrap());
    assert_eq!(
        compile_query(Some(&options)),
        "limit=25&sort=CODE&q=CARD_TYPE%20eq%203%20and%20AUXIL_CODE%20like%20'A*'"
    );
}

#[test]
fn wildcard_helper() {
    assert_eq!(wildcard_search("auxilCode", "test"), "AUXIL_CODE like 'test*'");
}

#[test]
fn build_query_does_not_reparse() {
    assert_eq!(
        build_query(["CODE eq 'ABC'", "STATUS eq 1"]).as_deref(),
        Some("CODE eq 'ABC' and STATUS eq 1")
    );
}

#[test]
fn equal_options_compile_identically() {
    let json = r#"{"limit": 10, "offset": 0, "sort": ["CODE"], "fields": ["CODE", "NAME"], "q": "STATUS eq 1"}"#;
    let a: QueryOptions = serde_json::from_str(json).unwrap();
    let b: QueryOptions = serde_json::from_str(json).unwrap();
    assert_eq!(compile_query(Some(&a)), compile_query(Some(&b)));
    assert_eq!(
        compile_query(Some(&a)),
        "limit=10&offset=0&fields=CODE,NAME&sort=CODE&q=STATUS%20eq%201"
    );
}

#[test]
fn documented_pagination_example() {
    let o: QueryOptions = serde_json::from_str(r#"{"limit": 10, "offset": 0, "sort": ["CODE"]}"#).unwrap();
    assert_eq!(compile_query(Some(&o)), "limit=10&offset=0&sort=CODE");
}

#[test]
fn multi_field_sort_round_trip() {
    let o: QueryOptions = serde_json::from_str(r#"{"sort": [["TITLE", "CODE"], "desc"]}"#).unwrap();
    let query = compile_query(Some(&o));
    assert_eq!(query, "sort=TITLE,CODE,desc");

    let value = query.strip_prefix("sort=").unwrap();
    let back: SortSpec = value.parse().unwrap();
    assert_eq!(Some(back), o.sort);
}

#[test]
fn in_with_lone_operand_is_single_eq() {
    assert_eq!(filter(r#"{"code": {"in": "A"}}"#).as_deref(), Some("CODE eq 'A'"));
    assert_eq!(filter(r#"{"qty": {"in": 3, "lt": 9}}"#).as_deref(), Some("QTY lt 9 and QTY eq 3"));
    assert_eq!(filter(r#"{"code": {"in": null}}"#), None);
}
