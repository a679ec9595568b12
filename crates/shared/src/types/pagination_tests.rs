use super::*;
use rstest::rstest;

#[test]
fn test_missing_query_params_use_defaults() {
    let request: PageRequest = serde_json::from_str("{}").unwrap();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, 20);

    let request: PageRequest = serde_json::from_str(r#"{"page": 4}"#).unwrap();
    assert_eq!(request.page, 4);
    assert_eq!(request.per_page, 20);
}

#[rstest]
#[case(1, 20, 0, 20)]
#[case(2, 20, 20, 20)]
#[case(5, 7, 28, 7)]
fn test_offset_and_limit(
    #[case] page: u32,
    #[case] per_page: u32,
    #[case] offset: u64,
    #[case] limit: u64,
) {
    let request = PageRequest { page, per_page };
    assert_eq!(request.offset(), offset);
    assert_eq!(request.limit(), limit);
}

#[test]
fn test_offset_does_not_overflow_u32() {
    let request = PageRequest {
        page: u32::MAX,
        per_page: MAX_PER_PAGE,
    };
    assert_eq!(
        request.offset(),
        u64::from(u32::MAX - 1) * u64::from(MAX_PER_PAGE)
    );
}

#[test]
fn test_normalized_clamps_both_bounds() {
    let request = PageRequest {
        page: 0,
        per_page: 10_000,
    }
    .normalized();
    assert_eq!(request.page, 1);
    assert_eq!(request.per_page, MAX_PER_PAGE);

    let request = PageRequest {
        page: 3,
        per_page: 0,
    }
    .normalized();
    assert_eq!(request.page, 3);
    assert_eq!(request.per_page, 1);
}

#[rstest]
#[case(0, 10, 1)]
#[case(3, 10, 1)]
#[case(10, 10, 1)]
#[case(25, 10, 3)]
#[case(101, 100, 2)]
fn test_total_pages(#[case] total: u64, #[case] per_page: u32, #[case] pages: u32) {
    let response: PageResponse<u8> = PageResponse::new(vec![], 1, per_page, total);
    assert_eq!(response.meta.total_pages, pages);
    assert_eq!(response.meta.total, total);
}

#[test]
fn test_response_serializes_meta() {
    let response = PageResponse::new(vec!["a", "b"], 2, 2, 5);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["data"], serde_json::json!(["a", "b"]));
    assert_eq!(json["meta"]["page"], 2);
    assert_eq!(json["meta"]["total_pages"], 3);
}
