use super::*;

#[test]
fn sequential_ids_count_from_one() {
    let mut ids = SequentialIds::new();
    assert_eq!(ids.next_id(), Uuid::from_u128(1));
    assert_eq!(ids.next_id(), Uuid::from_u128(2));
}

#[test]
fn random_ids_differ() {
    let mut ids = RandomIds;
    assert_ne!(ids.next_id(), ids.next_id());
}
