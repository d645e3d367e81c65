use peer_fs::{Error, validate_client_name};
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case("alice")]
#[case("Bob_Phone-2")]
#[case("laptop.home")]
#[case("名前")]
fn test_valid_names(#[case] name: &str) {
    assert!(validate_client_name(name).is_ok());
}

#[rstest]
#[case::empty("")]
#[case::blank("   ")]
#[case::dot(".")]
#[case::dotdot("..")]
#[case::hidden(".ssh")]
#[case::traversal("../server.conf")]
#[case::nested("a/b")]
#[case::windows_separator("a\\b")]
#[case::newline("alice\n")]
#[case::padded(" alice")]
fn test_invalid_names(#[case] name: &str) {
    assert!(matches!(
        validate_client_name(name),
        Err(Error::InvalidClientName { .. })
    ));
}

proptest! {
    #[test]
    fn accepted_names_are_single_components(name in "\\PC{0,24}") {
        if validate_client_name(&name).is_ok() {
            let path = std::path::Path::new("clients").join(&name);
            prop_assert_eq!(path.components().count(), 2);
        }
    }
}
