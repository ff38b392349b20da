use std::collections::HashMap;

use crate::config::Config;

use super::*;

fn replicas() -> HashMap<String, Arc<Mock>> {
    ["db1", "db2", "db3"]
        .into_iter()
        .map(|name| (name.to_owned(), Arc::new(Mock::new(name))))
        .collect()
}

#[tokio::test]
async fn test_from_config() {
    crate::logger();

    let config = Config::from_toml(
        r#"
[general]
defaults_to_leader = false

[[pools]]
name = "default"
replicas = ["db1", "db2"]

[[pools]]
name = "secondary"
replicas = ["db3", "missing"]
"#,
    )
    .unwrap();

    let replicas = replicas();
    let leader = Arc::new(Mock::new("leader"));
    let router = Router::from_config(leader, &config, |name| replicas.get(name).cloned()).unwrap();

    assert_eq!(router.pools().names(), vec!["default", "secondary"]);
    assert_eq!(router.pools().get("secondary").unwrap().len(), 1);

    let mut first = router.session();
    let second = router.session();
    assert_eq!(first.current_endpoint_name(), "db1");

    first.next_replica();
    assert_eq!(first.current_endpoint_name(), "db2");

    // Sessions have their own state but share pool cursors.
    assert_eq!(second.current_endpoint_name(), "db1");
    assert_eq!(router.session().current_endpoint_name(), "db2");

    let mut pool = first.with_pool("secondary");
    assert_eq!(pool.dispatch("select_one", &[]).await.unwrap(), "db3:select_one");
}

#[test]
fn test_from_config_defaults_to_leader() {
    let config = Config::from_toml(
        r#"
[general]
defaults_to_leader = true
"#,
    )
    .unwrap();

    let leader = Arc::new(Mock::new("leader"));
    let router = Router::from_config(leader, &config, |_| None).unwrap();
    let proxy = router.session();

    assert!(proxy.within_leader());
    assert_eq!(proxy.current_endpoint_name(), "leader");
    assert_eq!(router.pools().names(), vec!["default"]);
}

#[test]
fn test_from_config_bad_regex() {
    let config = Config::from_toml(
        r#"
[[no_replay]]
messages = ["(unclosed"]
"#,
    )
    .unwrap();

    let leader = Arc::new(Mock::new("leader"));
    assert!(matches!(
        Router::from_config(leader, &config, |_| None),
        Err(Error::Config(_))
    ));
}
