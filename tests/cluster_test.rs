use paxkv::{Acceptor, ActivityLog, Cluster, ClusterConfig, PeerClient, TimingConfig};
use std::time::Duration;

fn test_config(ports: &[u16]) -> ClusterConfig {
    let mut config = ClusterConfig::new("127.0.0.1".to_string(), ports.to_vec());
    config.timing = TimingConfig {
        heartbeat_interval_ms: 500,
        monitor_interval_ms: 1_000,
        election_min_interval_ms: 300,
        failure_delay_min_secs: 1,
        failure_delay_max_secs: 2,
        rpc_timeout_ms: 2_000,
    };
    config
}

async fn start_cluster(ports: &[u16]) -> (Cluster, PeerClient) {
    let mut cluster = Cluster::new(test_config(ports), ActivityLog::disabled()).unwrap();
    cluster.start().await.unwrap();
    let client = PeerClient::new(Duration::from_secs(2)).unwrap();
    (cluster, client)
}

async fn get_on_every_peer(cluster: &Cluster, client: &PeerClient, key: &str) -> Vec<String> {
    let mut values = Vec::new();
    for peer in &cluster.peers {
        values.push(
            client
                .execute(&peer.base_url, "tester", &format!("GET {key}"))
                .await
                .unwrap(),
        );
    }
    values
}

fn leader_acceptor_count(cluster: &Cluster) -> usize {
    cluster
        .peers
        .iter()
        .filter_map(|peer| peer.slot.get())
        .filter(|acceptor| acceptor.is_leader())
        .count()
}

async fn wait_until(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    false
}

#[tokio::test(flavor = "multi_thread")]
async fn test_put_replicates_to_every_peer() {
    let (mut cluster, client) = start_cluster(&[18201, 18202, 18203, 18204, 18205]).await;
    cluster.elect_leaders().await;

    let base = cluster.peers[0].base_url.clone();
    assert_eq!(
        client.execute(&base, "tester", "PUT color red").await.unwrap(),
        "color"
    );
    assert_eq!(
        get_on_every_peer(&cluster, &client, "color").await,
        vec!["red"; 5]
    );

    // Overwrite through a different peer's service.
    let other = cluster.peers[3].base_url.clone();
    assert_eq!(
        client.execute(&other, "tester", "PUT color blue").await.unwrap(),
        "color"
    );
    assert_eq!(
        get_on_every_peer(&cluster, &client, "color").await,
        vec!["blue"; 5]
    );

    cluster.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_then_get_returns_null() {
    let (mut cluster, client) = start_cluster(&[18211, 18212, 18213, 18214, 18215]).await;
    cluster.elect_leaders().await;

    let base = cluster.peers[2].base_url.clone();
    client.execute(&base, "tester", "PUT x 1").await.unwrap();
    assert_eq!(
        client.execute(&base, "tester", "DELETE x").await.unwrap(),
        "x"
    );
    assert_eq!(get_on_every_peer(&cluster, &client, "x").await, vec!["NULL"; 5]);

    // Deleting an absent key still reports submission success.
    assert_eq!(
        client.execute(&base, "tester", "DELETE missing").await.unwrap(),
        "missing"
    );

    cluster.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_input_never_reaches_consensus() {
    let (mut cluster, client) = start_cluster(&[18221, 18222, 18223, 18224, 18225]).await;
    cluster.elect_leaders().await;

    let base = cluster.peers[0].base_url.clone();
    assert_eq!(
        client.execute(&base, "tester", "FOO bar baz").await.unwrap(),
        "Invalid command"
    );
    assert_eq!(client.execute(&base, "tester", "GET").await.unwrap(), "NULL");
    assert_eq!(
        client.execute(&base, "tester", "PUT key").await.unwrap(),
        "NULL"
    );

    cluster.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_write_before_election_reports_missing_leader() {
    let (mut cluster, client) = start_cluster(&[18231, 18232, 18233, 18234, 18235]).await;

    let base = cluster.peers[0].base_url.clone();
    assert_eq!(
        client.execute(&base, "tester", "PUT color red").await.unwrap(),
        "ERROR: No leader Here"
    );

    cluster.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_election_is_unique_and_debounced() {
    let (mut cluster, _client) = start_cluster(&[18241, 18242, 18243, 18244, 18245]).await;
    cluster.elect_leaders().await;

    assert_eq!(leader_acceptor_count(&cluster), 1);
    let proposer_leaders = cluster
        .peers
        .iter()
        .filter(|peer| peer.proposer.is_leader())
        .count();
    assert_eq!(proposer_leaders, 1);

    // A second run inside the debounce window is refused outright.
    assert!(cluster.election().assign_leadership_proposer().await.is_none());
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(cluster.election().assign_leadership_proposer().await.is_some());
    assert_eq!(
        cluster
            .peers
            .iter()
            .filter(|peer| peer.proposer.is_leader())
            .count(),
        1
    );

    cluster.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_writes_survive_a_non_leader_acceptor_failure() {
    let (mut cluster, client) = start_cluster(&[18251, 18252, 18253, 18254, 18255]).await;
    cluster.elect_leaders().await;

    let victim = cluster
        .peers
        .iter()
        .position(|peer| !peer.slot.get().unwrap().is_leader())
        .unwrap();
    cluster.peers[victim].slot.unbind();

    // Quorum is 3 of the 4 remaining acceptors; learners are untouched.
    let base = cluster.peers[victim].base_url.clone();
    assert_eq!(
        client.execute(&base, "tester", "PUT k v").await.unwrap(),
        "k"
    );
    assert_eq!(get_on_every_peer(&cluster, &client, "k").await, vec!["v"; 5]);

    cluster.shutdown();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_leader_acceptor_failure_recovers_through_reelection() {
    let (mut cluster, client) = start_cluster(&[18261, 18262, 18263, 18264, 18265]).await;
    cluster.elect_leaders().await;

    let leader = cluster
        .peers
        .iter()
        .position(|peer| peer.slot.get().unwrap().is_leader())
        .unwrap();

    // Take the leader acceptor down and bind a fresh instance at the same
    // URL, as the failure injector would.
    cluster.peers[leader].slot.unbind();
    let fresh = Acceptor::new(cluster.context(), cluster.election().clone());
    cluster.peers[leader].slot.bind(fresh);

    // With no leader acceptor, writes fail cleanly instead of hanging.
    let base = cluster.peers[0].base_url.clone();
    assert_eq!(
        client.execute(&base, "tester", "PUT lost v").await.unwrap(),
        "lost"
    );
    assert_eq!(
        get_on_every_peer(&cluster, &client, "lost").await,
        vec!["NULL"; 5]
    );

    // Heartbeats have stopped, so a monitor triggers re-election.
    let recovered = wait_until(Duration::from_secs(10), || {
        leader_acceptor_count(&cluster) == 1
    })
    .await;
    assert!(recovered, "no leader acceptor re-elected");

    // Rounds may still race with election churn; retry until replicated.
    let mut replicated = false;
    for _ in 0..10 {
        client.execute(&base, "tester", "PUT back v2").await.unwrap();
        if get_on_every_peer(&cluster, &client, "back").await == vec!["v2"; 5] {
            replicated = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    assert!(replicated, "writes did not resume after re-election");

    cluster.shutdown();
}
