//! Integration tests for node id allocation across a client session.

use scsynth_alloc::{
    ConfigError, DEFAULT_BOUNDARY, LOCAL_ID_MASK, NamedId, NodeIdAllocator, client_of, local_id,
};

#[test]
fn client_id_must_fit_five_bits() {
    let err = NodeIdAllocator::new(32, DEFAULT_BOUNDARY).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::ClientIdOutOfRange { client_id: 32, .. }
    ));
    assert!(NodeIdAllocator::new(31, DEFAULT_BOUNDARY).is_ok());
}

#[test]
fn freed_permanent_id_is_reused() {
    let mut ids = NodeIdAllocator::new(0, 1000).unwrap();
    let a = ids.allocate_permanent();
    let b = ids.allocate_permanent();
    let c = ids.allocate_permanent();
    assert_eq!((a, b, c), (1, 2, 3));

    ids.free_permanent(b);
    assert_eq!(ids.allocate_permanent(), 2);
}

#[test]
fn session_with_groups_and_voices() {
    let mut ids = NodeIdAllocator::for_client(4).unwrap();

    let root = ids.allocate_named("root");
    let fx = ids.allocate_named("fx");
    assert!(root.is_fresh() && fx.is_fresh());
    assert_ne!(root.id(), fx.id());

    let voices: Vec<i32> = (0..16).map(|_| ids.allocate_temporary(1)).collect();
    for (i, &voice) in voices.iter().enumerate() {
        assert_eq!(client_of(voice), 4);
        assert_eq!(local_id(voice), DEFAULT_BOUNDARY + i as i32);
        assert!(!ids.is_permanent(voice));
    }

    // Looking the groups up again must not allocate.
    assert_eq!(ids.allocate_named("root"), NamedId::Existing(root.id()));
    assert_eq!(ids.allocate_named("fx"), NamedId::Existing(fx.id()));
    assert_eq!(local_id(ids.allocate_permanent()), 3);
}

#[test]
fn clients_do_not_collide() {
    let mut a = NodeIdAllocator::new(1, 1000).unwrap();
    let mut b = NodeIdAllocator::new(2, 1000).unwrap();
    for _ in 0..100 {
        assert_ne!(a.allocate_permanent(), b.allocate_permanent());
        assert_ne!(a.allocate_temporary(1), b.allocate_temporary(1));
    }
}

#[test]
fn temporary_ids_wrap_without_entering_permanent_range() {
    let boundary = LOCAL_ID_MASK - 9;
    let mut ids = NodeIdAllocator::new(0, boundary).unwrap();
    let seen: Vec<i32> = (0..25).map(|_| ids.allocate_temporary(1)).collect();
    assert!(seen.iter().all(|&id| id >= boundary && id <= LOCAL_ID_MASK));
    assert_eq!(seen[0], boundary);
    assert_eq!(seen[9], LOCAL_ID_MASK);
    assert_eq!(seen[10], boundary);
    assert_eq!(seen[20], boundary);
}

#[test]
fn reset_starts_a_new_session() {
    let mut ids = NodeIdAllocator::new(7, 500).unwrap();
    let first = ids.allocate_named("main").id();
    ids.allocate_temporary(42);
    ids.reset();

    assert_eq!(ids.named_id("main"), None);
    assert_eq!(ids.allocate_named("main"), NamedId::Fresh(first));
    assert_eq!(local_id(ids.allocate_temporary(1)), 500);
}

#[test]
fn freeing_the_root_group_is_ignored() {
    let mut ids = NodeIdAllocator::new(3, 1000).unwrap();
    ids.free_permanent(0);
    assert_eq!(local_id(ids.allocate_permanent()), 1);
    assert_eq!(local_id(ids.allocate_permanent()), 2);
}
