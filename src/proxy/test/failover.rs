use crate::backend;
use crate::config::NoReplay;

use super::*;

#[tokio::test]
async fn test_replica_error_replayed_on_leader() {
    let setup = Setup::new();
    let mut proxy = setup.proxy();

    setup.default[0].fail(backend::Error::connection_lost(
        "Mysql2::Error",
        "connection error",
    ));

    let output = proxy.dispatch("select_all", &[]).await.unwrap();

    assert_eq!(output, "leader:select_all");
    assert_eq!(setup.default[0].count("select_all"), 1);
    assert_eq!(setup.default[1].total(), 0);
    assert_eq!(setup.leader.count("select_all"), 1);
    assert_eq!(setup.default[0].verifies(), 0);

    // Next call goes back to the same replica.
    assert_eq!(proxy.dispatch("select_all", &[]).await.unwrap(), "r1:select_all");
}

#[tokio::test]
async fn test_timeout_not_replayed() {
    let setup = Setup::new();
    let mut proxy = setup.proxy();

    let timeout = backend::Error::timeout("Mysql2::Error", "Timeout waiting for a response");
    setup.default[0].fail(timeout.clone());

    let err = proxy.dispatch("select_all", &[]).await.unwrap_err();

    assert!(matches!(err, Error::Replica { .. }));
    assert_eq!(err.endpoint(), Some("r1"));
    assert_eq!(err.endpoint_error(), Some(&timeout));
    assert_eq!(setup.leader.total(), 0);
    assert_eq!(setup.default[0].verifies(), 1);
}

#[tokio::test]
async fn test_no_verify() {
    let setup = Setup::with_policy(Policy {
        verify_replica: false,
        ..Default::default()
    });
    let mut proxy = setup.proxy();

    setup.default[0].fail(backend::Error::timeout("PG::QueryCanceled", "canceled"));
    assert!(proxy.dispatch("select_one", &[]).await.is_err());
    assert_eq!(setup.default[0].verifies(), 0);
}

#[tokio::test]
async fn test_whole_class_not_replayed() {
    let rules = vec![NoReplay {
        class: Some("RuntimeError".into()),
        ..Default::default()
    }];
    let setup = Setup::with_policy(Policy {
        replay: ReplayPolicy::new(&rules).unwrap(),
        ..Default::default()
    });
    let mut proxy = setup.proxy();

    setup.default[0].fail(backend::Error::new("RuntimeError", "some error"));
    let err = proxy.dispatch("select_all", &[]).await.unwrap_err();
    assert_eq!(err.endpoint_error().map(|err| err.class.as_str()), Some("RuntimeError"));
    assert_eq!(setup.leader.total(), 0);

    // Timeouts are replayed once the defaults are replaced.
    setup.default[0].fail(backend::Error::timeout("Mysql2::Error", "timeout"));
    assert_eq!(
        proxy.dispatch("select_all", &[]).await.unwrap(),
        "leader:select_all"
    );
}

#[tokio::test]
async fn test_replay_fails_on_leader() {
    let setup = Setup::new();
    let mut proxy = setup.proxy();

    setup.default[0].fail(backend::Error::new("PG::Error", "replica gone"));
    setup.leader.fail(backend::Error::new("PG::Error", "leader gone"));

    let err = proxy.dispatch("select_one", &[]).await.unwrap_err();

    assert!(matches!(err, Error::Leader { .. }));
    assert_eq!(err.endpoint(), Some("leader"));
    assert_eq!(setup.leader.count("select_one"), 1);
    assert!(proxy.reconnect_scheduled());
}

#[tokio::test]
async fn test_leader_error_not_retried() {
    let setup = Setup::new();
    let mut proxy = setup.proxy();

    let err = backend::Error::connection_lost("PG::ConnectionBad", "server closed the connection");
    setup.leader.fail(err.clone());

    let result = proxy.dispatch("insert", &["INSERT INTO t VALUES (1)".into()]).await;

    assert!(matches!(&result, Err(Error::Leader { source, .. }) if *source == err));
    assert_eq!(setup.leader.count("insert"), 1);
    assert_eq!(setup.replica_calls(), 0);
    assert!(proxy.reconnect_scheduled());
    assert_eq!(setup.leader.reconnects(), 0);

    // Reconnects before the next leader call.
    assert_eq!(proxy.dispatch("insert", &[]).await.unwrap(), "leader:insert");
    assert_eq!(setup.leader.reconnects(), 1);
    assert!(!proxy.reconnect_scheduled());

    proxy.dispatch("insert", &[]).await.unwrap();
    assert_eq!(setup.leader.reconnects(), 1);
}

#[tokio::test]
async fn test_leader_error_in_leader_scope() {
    let setup = Setup::new();
    let mut proxy = setup.proxy();

    setup.leader.fail(backend::Error::timeout("PG::QueryCanceled", "canceled"));

    {
        let mut leader = proxy.with_leader().unwrap();
        assert!(matches!(
            leader.dispatch("select_one", &[]).await,
            Err(Error::Leader { .. })
        ));
    }

    assert_eq!(setup.leader.count("select_one"), 1);
    assert_eq!(setup.replica_calls(), 0);
    assert_eq!(proxy.depth(), 0);
}

#[tokio::test]
async fn test_no_reconnect() {
    let setup = Setup::with_policy(Policy {
        reconnect_leader: false,
        ..Default::default()
    });
    let mut proxy = setup.proxy();

    setup.leader.fail(backend::Error::new("PG::Error", "oops"));
    assert!(proxy.dispatch("update", &[]).await.is_err());
    assert!(!proxy.reconnect_scheduled());

    proxy.dispatch("update", &[]).await.unwrap();
    assert_eq!(setup.leader.reconnects(), 0);
}

#[tokio::test]
async fn test_leader_disabled() {
    let setup = Setup::with_policy(Policy {
        disable_leader: true,
        ..Default::default()
    });
    let mut proxy = setup.proxy();

    assert!(matches!(proxy.with_leader(), Err(Error::LeaderDisabled)));
    assert_eq!(proxy.depth(), 0);

    assert!(matches!(proxy.transaction().await, Err(Error::LeaderDisabled)));
    assert_eq!(proxy.depth(), 0);

    assert!(matches!(
        proxy.dispatch("insert", &[]).await,
        Err(Error::LeaderDisabled)
    ));

    // Reads still work.
    assert_eq!(proxy.dispatch("select_one", &[]).await.unwrap(), "r1:select_one");

    // Replica errors can't be replayed.
    setup.default[0].fail(backend::Error::new("PG::Error", "replica gone"));
    assert!(matches!(
        proxy.dispatch("select_one", &[]).await,
        Err(Error::Replica { .. })
    ));

    assert_eq!(setup.leader.total(), 0);
    assert!(setup.leader.transactions().is_empty());
}

#[tokio::test]
async fn test_leader_only() {
    crate::logger();

    let leader = Arc::new(Mock::new("leader"));
    let router = Router::new(leader.clone(), PoolSet::new(vec![], &leader), Policy::default());
    let mut proxy = router.session();

    assert_eq!(proxy.current_pool_name(), "default");
    assert!(proxy.is_leader(proxy.current()));
    assert_eq!(proxy.dispatch("select_one", &[]).await.unwrap(), "leader:select_one");

    proxy.next_replica();
    assert!(proxy.is_leader(proxy.current()));

    leader.fail(backend::Error::new("PG::Error", "oops"));
    assert!(matches!(
        proxy.dispatch("select_one", &[]).await,
        Err(Error::Leader { .. })
    ));
    assert_eq!(leader.count("select_one"), 2);
}
