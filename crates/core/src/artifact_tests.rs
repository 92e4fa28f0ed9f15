use super::*;

#[test]
fn fnv1a32_matches_reference_vector() {
    // Reference FNV-1a 32-bit hash of the empty string is the offset basis.
    assert_eq!(fnv1a32(b""), FNV_OFFSET_BASIS);
    // Known vector for "a".
    assert_eq!(fnv1a32(b"a"), 0xe40c292c);
}

#[test]
fn partition_is_stable_across_calls() {
    assert_eq!(partition("the", 7), partition("the", 7));
}

#[test]
fn partition_is_within_range() {
    for key in ["the", "cat", "sat", "mat", ""] {
        assert!(partition(key, 5) < 5);
    }
}

#[yare::parameterized(
    map0_r0 = (0, 0, "mr-0-0"),
    map3_r5 = (3, 5, "mr-3-5"),
)]
fn intermediate_name_is_mr_dash_index_dash_partition(map_index: usize, r: u32, expected: &str) {
    assert_eq!(intermediate_name(map_index, r), expected);
}

#[test]
fn output_name_is_mr_out_dash_partition() {
    assert_eq!(output_name(2), "mr-out-2");
}

#[test]
fn temp_name_appends_tmp_dash_attempt() {
    assert_eq!(temp_name("mr-out-2", 3), "mr-out-2.tmp-3");
}
