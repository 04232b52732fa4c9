use crate::order::{FinishKey, EPSILON};

#[test]
fn distinct_finish_times_order_by_value() {
    let a = FinishKey::new(1.0, 5);
    let b = FinishKey::new(2.0, 0);
    assert!(a < b);
}

#[test]
fn near_tie_within_epsilon_breaks_by_appearance_order() {
    let a = FinishKey::new(100.0, 3);
    let b = FinishKey::new(100.0 + EPSILON / 2.0, 1);
    assert!(a > b, "smaller appearance_order should win within epsilon");
}

#[test]
fn difference_larger_than_epsilon_is_not_a_tie() {
    let a = FinishKey::new(100.0, 0);
    let b = FinishKey::new(100.0 + EPSILON * 10.0, 1);
    assert!(a < b);
}

#[test]
fn exact_equality_breaks_by_appearance_order() {
    let a = FinishKey::new(50.0, 2);
    let b = FinishKey::new(50.0, 1);
    assert!(a > b);
}
