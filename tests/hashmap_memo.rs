use kombi::memo::HashMapMemo;

use kombi_shared_tests::{suites::{test_suite0, test_suite1}, utils::Sample};


#[test]
fn suite0() {
    test_suite0::<HashMapMemo<()>>();
}

#[test]
fn suite1() {
    test_suite1::<HashMapMemo<Sample>>();
}
