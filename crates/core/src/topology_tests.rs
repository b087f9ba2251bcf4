use super::*;

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[yare::parameterized(
    empty_required_always_matches = { &[], &[("zone", "z1")], true },
    exact_match = { &[("zone", "z1")], &[("zone", "z1")], true },
    subset_matches = { &[("zone", "z1")], &[("zone", "z1"), ("dc", "a")], true },
    missing_key_fails = { &[("zone", "z1")], &[("dc", "a")], false },
    mismatched_value_fails = { &[("zone", "z1")], &[("zone", "z2")], false },
)]
fn label_match_is_subset(required: &[(&str, &str)], actual: &[(&str, &str)], expected: bool) {
    assert_eq!(is_labels_match(&labels(required), &labels(actual)), expected);
}

#[test]
fn server_labels_are_flattened_from_dotted_config_keys() {
    let mut config = BTreeMap::new();
    config.insert("server.labels.zone".to_string(), "z1".to_string());
    config.insert("server.labels.host".to_string(), "h1".to_string());
    config.insert("log.level".to_string(), "info".to_string());

    let node = TiKVServerSpec {
        host: "10.0.0.1".to_string(),
        port: 20160,
        ssh_port: None,
        data_dir: "/data".to_string(),
        deploy_dir: "/deploy".to_string(),
        config,
    };

    let flattened = node.labels();
    assert_eq!(flattened.get("zone"), Some(&"z1".to_string()));
    assert_eq!(flattened.get("host"), Some(&"h1".to_string()));
    assert_eq!(flattened.len(), 2);
}

#[test]
fn matching_nodes_filters_by_required_labels() {
    let mut z1 = BTreeMap::new();
    z1.insert("server.labels.zone".to_string(), "z1".to_string());
    let mut z2 = BTreeMap::new();
    z2.insert("server.labels.zone".to_string(), "z2".to_string());

    let topo = TopologyView {
        global: GlobalOptions::default(),
        tikv_servers: vec![
            TiKVServerSpec {
                host: "n1".to_string(),
                port: 20160,
                ssh_port: None,
                data_dir: String::new(),
                deploy_dir: String::new(),
                config: z1,
            },
            TiKVServerSpec {
                host: "n2".to_string(),
                port: 20160,
                ssh_port: None,
                data_dir: String::new(),
                deploy_dir: String::new(),
                config: z2,
            },
        ],
        pd_servers: vec![],
    };

    let required = labels(&[("zone", "z1")]);
    let matched = topo.matching_nodes(&required);
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].host, "n1");
}
