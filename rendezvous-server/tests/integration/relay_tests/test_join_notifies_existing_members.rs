use rendezvous_core::{ClientSignal, RoomId, ServerSignal};

use crate::integration::{create_test_relay, init_tracing};
use crate::utils::register_silent;

#[tokio::test]
async fn test_join_notifies_existing_members() {
    init_tracing();

    let t = create_test_relay();
    let room = RoomId::from("r1");
    let a = register_silent(&t.registry);
    let b = register_silent(&t.registry);

    t.relay
        .handle(&a, ClientSignal::JoinRoom { room_id: room.clone() })
        .await;
    assert_eq!(t.output.len().await, 0, "First member has nobody to notify");

    t.relay
        .handle(&b, ClientSignal::JoinRoom { room_id: room.clone() })
        .await;

    assert_eq!(
        t.output.signals_for(&a).await,
        vec![ServerSignal::UserJoined {
            connection_id: b.clone()
        }]
    );
    assert!(
        t.output.signals_for(&b).await.is_empty(),
        "Joiner is not told about itself"
    );
}

#[tokio::test]
async fn test_later_joiners_miss_earlier_announcements() {
    init_tracing();

    let t = create_test_relay();
    let room = RoomId::from("r1");
    let a = register_silent(&t.registry);
    let b = register_silent(&t.registry);
    let c = register_silent(&t.registry);

    for id in [&a, &b, &c] {
        t.relay
            .handle(id, ClientSignal::JoinRoom { room_id: room.clone() })
            .await;
    }

    assert_eq!(
        t.output.signals_for(&a).await,
        vec![
            ServerSignal::UserJoined {
                connection_id: b.clone()
            },
            ServerSignal::UserJoined {
                connection_id: c.clone()
            },
        ]
    );
    assert_eq!(
        t.output.signals_for(&b).await,
        vec![ServerSignal::UserJoined {
            connection_id: c.clone()
        }]
    );
    assert!(t.output.signals_for(&c).await.is_empty());
}

#[tokio::test]
async fn test_duplicate_join_keeps_single_membership() {
    init_tracing();

    let t = create_test_relay();
    let room = RoomId::from("r1");
    let a = register_silent(&t.registry);
    let b = register_silent(&t.registry);

    t.relay
        .handle(&a, ClientSignal::JoinRoom { room_id: room.clone() })
        .await;
    t.relay
        .handle(&b, ClientSignal::JoinRoom { room_id: room.clone() })
        .await;
    t.relay
        .handle(&b, ClientSignal::JoinRoom { room_id: room.clone() })
        .await;

    assert_eq!(t.rooms.members_of(&room).len(), 2);
    // A repeated join is announced again so peers can restart negotiation.
    assert_eq!(t.output.signals_for(&a).await.len(), 2);
}

#[tokio::test]
async fn test_join_from_unregistered_connection_is_ignored() {
    init_tracing();

    let t = create_test_relay();
    let room = RoomId::from("r1");
    let a = register_silent(&t.registry);
    let ghost = register_silent(&t.registry);
    t.registry.unregister(&ghost);

    t.relay
        .handle(&a, ClientSignal::JoinRoom { room_id: room.clone() })
        .await;
    t.relay
        .handle(&ghost, ClientSignal::JoinRoom { room_id: room.clone() })
        .await;

    assert!(!t.rooms.members_of(&room).contains(&ghost));
    assert!(t.output.signals_for(&a).await.is_empty());
}
