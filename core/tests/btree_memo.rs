use kombi_core::BTreeMemo;

use kombi_shared_tests::{suites::{test_suite0, test_suite1}, utils::Sample};


#[test]
fn suite0() {
    test_suite0::<BTreeMemo<()>>();
}

#[test]
fn suite1() {
    test_suite1::<BTreeMemo<Sample>>();
}
