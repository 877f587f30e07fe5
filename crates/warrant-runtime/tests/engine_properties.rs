//! Integration tests for resolution and administration.
//!
//! Each test drives the public engine API over a `MemoryStore`.

use warrant_auth::PermissionValue;
use warrant_runtime::{EngineError, Inheritance, MemoryStore, PermissionEngine};
use warrant_types::{GroupName, Subject, UserId};

fn engine() -> PermissionEngine<MemoryStore> {
    PermissionEngine::with_store(MemoryStore::new())
}

fn group(name: &str) -> GroupName {
    GroupName::new(name).expect("valid group name")
}

/// create admins, grant server.stop, add U, check, remove U, check again
#[tokio::test]
async fn admins_scenario() {
    let engine = engine();
    let admins = group("admins");
    let user = UserId::new();
    let subject = Subject::User(user);

    engine.create_group(&admins).await.expect("should create admins");
    engine
        .grant(&Subject::Group(admins.clone()), "server.stop")
        .await
        .expect("should grant to admins");
    engine
        .add_member(&admins, &user)
        .await
        .expect("should add user to admins");

    assert_eq!(
        engine.check(&subject, "server.stop").await.expect("check"),
        PermissionValue::Granted
    );

    engine
        .remove_member(&admins, &user)
        .await
        .expect("should remove user from admins");

    assert_eq!(
        engine.check(&subject, "server.stop").await.expect("check"),
        PermissionValue::Default
    );
}

/// direct chat.* lists with its ancestor and covers chat.color
#[tokio::test]
async fn direct_wildcard_scenario() {
    let engine = engine();
    let subject = Subject::User(UserId::new());

    engine.grant(&subject, "chat.*").await.expect("grant");

    assert_eq!(
        engine
            .list_granted(&subject, Inheritance::Direct)
            .await
            .expect("list"),
        vec!["chat.*", "chat"]
    );
    assert!(engine
        .check(&subject, "chat.color")
        .await
        .expect("check")
        .is_granted());
}

#[tokio::test]
async fn direct_grant_takes_precedence() {
    let engine = engine();
    let user = UserId::new();
    let subject = Subject::User(user);
    let plain = group("plain");

    engine.create_group(&plain).await.expect("create");
    engine.add_member(&plain, &user).await.expect("add");
    engine.grant(&subject, "fly").await.expect("grant");

    assert!(engine.check(&subject, "fly").await.expect("check").is_granted());
}

#[tokio::test]
async fn any_group_in_order_grants() {
    for granting in ["g1", "g2"] {
        let engine = engine();
        let user = UserId::new();
        let subject = Subject::User(user);

        for name in ["g1", "g2"] {
            engine.create_group(&group(name)).await.expect("create");
            engine.add_member(&group(name), &user).await.expect("add");
        }
        engine
            .grant(&Subject::Group(group(granting)), "perm")
            .await
            .expect("grant");

        assert!(
            engine.check(&subject, "perm").await.expect("check").is_granted(),
            "perm should be granted through {granting}"
        );
    }
}

#[tokio::test]
async fn wildcard_dominance() {
    let engine = engine();
    let subject = Subject::User(UserId::new());
    engine.grant(&subject, "a.b.*").await.expect("grant");

    assert!(engine.check(&subject, "a.b.c").await.expect("check").is_granted());
    assert!(engine.check(&subject, "a.b.c.d").await.expect("check").is_granted());
    assert!(!engine.check(&subject, "a.x").await.expect("check").is_granted());
}

#[tokio::test]
async fn existence_queries_stay_out_of_registry() {
    let engine = engine();
    let subject = Subject::User(UserId::new());
    engine.grant(&subject, "a.b.c").await.expect("grant");

    assert!(engine.check(&subject, "a.b.?").await.expect("check").is_granted());
    assert!(!engine.suggestions("").contains(&"a.b.?".to_string()));

    engine.check(&subject, "a.b").await.expect("check");
    assert!(engine.suggestions("").contains(&"a.b".to_string()));
}

#[tokio::test]
async fn everyone_is_protected() {
    let engine = engine();
    let everyone = GroupName::everyone();
    let user = UserId::new();

    // Before the group exists.
    assert!(matches!(
        engine.remove_member(&everyone, &user).await,
        Err(EngineError::ProtectedGroup(_))
    ));

    engine.bootstrap().await.expect("bootstrap");
    engine.on_connect(&user).await.expect("connect");

    // While the user is a member.
    assert!(matches!(
        engine.remove_member(&everyone, &user).await,
        Err(EngineError::ProtectedGroup(_))
    ));
    assert_eq!(
        engine.groups_of(&user).await.expect("groups"),
        vec![everyone]
    );
}

#[tokio::test]
async fn group_admin_errors() {
    let engine = engine();
    let mods = group("mods");
    let user = UserId::new();

    assert!(matches!(
        engine.delete_group(&mods).await,
        Err(EngineError::GroupNotFound(_))
    ));
    assert!(matches!(
        engine.add_member(&mods, &user).await,
        Err(EngineError::GroupNotFound(_))
    ));
    assert!(matches!(
        engine.remove_member(&mods, &user).await,
        Err(EngineError::GroupNotFound(_))
    ));

    engine.create_group(&mods).await.expect("create");
    assert!(matches!(
        engine.create_group(&mods).await,
        Err(EngineError::GroupExists(_))
    ));
    assert!(matches!(
        engine.remove_member(&mods, &user).await,
        Err(EngineError::NotMember { .. })
    ));

    engine.add_member(&mods, &user).await.expect("add");
    assert!(matches!(
        engine.add_member(&mods, &user).await,
        Err(EngineError::AlreadyMember { .. })
    ));

    engine.delete_group(&mods).await.expect("delete");
    assert!(engine.list_groups().await.expect("list").is_empty());
}

#[tokio::test]
async fn deleted_group_stops_granting() {
    let engine = engine();
    let vip = group("vip");
    let user = UserId::new();
    let subject = Subject::User(user);

    engine.grant(&Subject::Group(vip.clone()), "lounge").await.expect("grant");
    engine.add_member(&vip, &user).await.expect("add");
    assert!(engine.check(&subject, "lounge").await.expect("check").is_granted());

    engine.delete_group(&vip).await.expect("delete");
    assert!(!engine.check(&subject, "lounge").await.expect("check").is_granted());
    // Membership rows survive group deletion.
    assert_eq!(engine.groups_of(&user).await.expect("groups"), vec![vip]);
}

#[tokio::test]
async fn inherited_listing_keeps_duplicates_in_order() {
    let engine = engine();
    let user = UserId::new();
    let subject = Subject::User(user);
    let staff = group("staff");
    let builders = group("builders");

    engine.grant(&subject, "build").await.expect("grant");
    engine.grant(&Subject::Group(staff.clone()), "kick").await.expect("grant");
    engine.grant(&Subject::Group(builders.clone()), "build").await.expect("grant");
    engine.add_member(&staff, &user).await.expect("add");
    engine.add_member(&builders, &user).await.expect("add");

    assert_eq!(
        engine
            .list_granted(&subject, Inheritance::Inherited)
            .await
            .expect("list"),
        vec!["build", "kick", "build"]
    );
    assert_eq!(
        engine
            .list_granted(&subject, Inheritance::Direct)
            .await
            .expect("list"),
        vec!["build"]
    );

    let group_subject = Subject::Group(staff);
    assert_eq!(
        engine
            .list_granted(&group_subject, Inheritance::Inherited)
            .await
            .expect("list"),
        engine
            .list_granted(&group_subject, Inheritance::Direct)
            .await
            .expect("list"),
    );
}

#[tokio::test]
async fn filtered_inherited_listing() {
    let engine = engine();
    let user = UserId::new();
    let subject = Subject::User(user);
    let staff = group("staff");

    engine.grant(&subject, "chat.color").await.expect("grant");
    engine.grant(&Subject::Group(staff.clone()), "chat.bold").await.expect("grant");
    engine.grant(&Subject::Group(staff.clone()), "server.stop").await.expect("grant");
    engine.add_member(&staff, &user).await.expect("add");

    assert_eq!(
        engine
            .list_granted_under(&subject, "chat.", Inheritance::Inherited)
            .await
            .expect("list"),
        vec!["color", "bold"]
    );
}

#[tokio::test]
async fn grant_revoke_cycles_are_idempotent() {
    let engine = engine();
    let subject = Subject::User(UserId::new());

    for _ in 0..3 {
        engine.grant(&subject, "home.set").await.expect("grant");
        engine.grant(&subject, "home.set").await.expect("grant again");
        assert!(engine.check(&subject, "home.set").await.expect("check").is_granted());

        engine.revoke(&subject, "home.set").await.expect("revoke");
        engine.revoke(&subject, "home.set").await.expect("revoke again");
        assert!(!engine.check(&subject, "home.set").await.expect("check").is_granted());
    }
}

#[tokio::test]
async fn narrower_grant_keeps_broader_one() {
    let engine = engine();
    let subject = Subject::User(UserId::new());

    engine.grant(&subject, "a.b").await.expect("grant a.b");
    engine.grant(&subject, "a.b.c").await.expect("grant a.b.c");

    for permission in ["a.b", "a.b.c"] {
        assert_eq!(
            engine.check(&subject, permission).await.expect("check"),
            PermissionValue::Granted,
            "{permission}"
        );
    }
}

#[tokio::test]
async fn plain_grant_after_wildcard_takes_effect() {
    let engine = engine();
    let subject = Subject::User(UserId::new());

    engine.grant(&subject, "chat.*").await.expect("grant chat.*");
    engine.grant(&subject, "chat").await.expect("grant chat");

    assert_eq!(
        engine.check(&subject, "chat").await.expect("check"),
        PermissionValue::Granted
    );
    assert!(engine
        .check(&subject, "chat.color")
        .await
        .expect("check")
        .is_granted());
}

/// revoking server.stop leaves server granted and widens nothing
#[tokio::test]
async fn revoking_child_keeps_parent() {
    let engine = engine();
    let subject = Subject::User(UserId::new());

    engine.grant(&subject, "server.stop").await.expect("grant");
    assert!(engine.check(&subject, "server").await.expect("check").is_granted());

    assert!(engine.revoke(&subject, "server.stop").await.expect("revoke"));

    assert_eq!(
        engine.check(&subject, "server.stop").await.expect("check"),
        PermissionValue::Default
    );
    assert_eq!(
        engine.check(&subject, "server").await.expect("check"),
        PermissionValue::Granted
    );
    assert!(!engine
        .check(&subject, "server.restart")
        .await
        .expect("check")
        .is_granted());
    assert_eq!(
        engine
            .list_granted(&subject, Inheritance::Direct)
            .await
            .expect("list"),
        vec!["server"]
    );
}
