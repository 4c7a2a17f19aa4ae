use std::time::Duration;

use fdgraph::{ConfigError, GraphError, GraphFile, LayoutConfig, NodeKey, Rgb, SimulationParams};

#[test]
fn empty_yaml_gives_defaults() {
    let config = LayoutConfig::from_yaml_str("{}").unwrap();

    assert_eq!(config, LayoutConfig::default());
    assert_eq!(config.simulation.params, SimulationParams::default());
    assert!(config.simulation.barnes_hut);
    assert_eq!(config.interaction.auto_cycle_interval().unwrap(), Duration::from_secs(5));
    assert_eq!(config.camera.fov_degrees, 75.0);
    assert_eq!(config.driver.options().tick, Duration::from_millis(16));
}

#[test]
fn default_params_match_stock_layout() {
    let p = SimulationParams::default();
    assert_eq!(p.spring_length, 110.0);
    assert_eq!(p.spring_coeff, 1e-6);
    assert_eq!(p.gravity, -2.0);
    assert_eq!(p.theta, 0.1);
    assert_eq!(p.drag_coeff, 0.3);
    assert_eq!(p.time_step, 1.0);
}

#[test]
fn partial_yaml_overrides_only_given_fields() {
    let yaml = r##"
simulation:
  gravity: -5.0
  theta: 0.5
  barnes_hut: false
interaction:
  auto_cycle_secs: 2.5
driver:
  settle_threshold: 0.01
palette:
  node: "#102030"
"##;
    let config = LayoutConfig::from_yaml_str(yaml).unwrap();

    assert_eq!(config.simulation.params.gravity, -5.0);
    assert_eq!(config.simulation.params.theta, 0.5);
    assert_eq!(config.simulation.params.spring_length, 110.0);
    assert!(!config.simulation.barnes_hut);
    assert_eq!(config.interaction.auto_cycle_interval().unwrap(), Duration::from_millis(2500));
    assert_eq!(config.driver.options().settle_threshold, Some(0.01));
    assert_eq!(config.palette.node, Rgb(0x102030));
    assert_eq!(config.palette.node_hover, Rgb(0xffe213));
}

#[test]
fn out_of_range_values_are_rejected() {
    for yaml in [
        "simulation: { theta: 1.5 }",
        "simulation: { theta: 0.0 }",
        "simulation: { time_step: -1.0 }",
        "interaction: { auto_cycle_secs: 0.0 }",
        "interaction: { auto_cycle_secs: 1.0e30 }",
        "camera: { fov_degrees: 190.0 }",
    ] {
        assert!(
            matches!(LayoutConfig::from_yaml_str(yaml), Err(ConfigError::InvalidParameter(_))),
            "accepted {yaml}"
        );
    }
}

#[test]
fn huge_auto_cycle_interval_is_an_error_not_a_panic() {
    let err = LayoutConfig::from_yaml_str("interaction:\n  auto_cycle_secs: 1.0e30\n").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidParameter(ref e) if e.name == "auto_cycle_secs"));
}

#[test]
fn node_keys_keep_their_json_type() {
    assert_eq!(serde_json::to_value(NodeKey::Number(1)).unwrap(), serde_json::json!(1));
    assert_eq!(serde_json::to_value(NodeKey::Text("1".into())).unwrap(), serde_json::json!("1"));
    assert_ne!(NodeKey::Number(1), NodeKey::Text("1".into()));

    assert_eq!("7".parse::<NodeKey>(), Ok(NodeKey::Number(7)));
    assert_eq!("abc".parse::<NodeKey>(), Ok(NodeKey::Text("abc".into())));
}

#[test]
fn bad_color_is_a_parse_error() {
    let err = LayoutConfig::from_yaml_str("palette: { node: \"#12\" }").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn colors_parse_and_print() {
    assert_eq!("#c6492c".parse::<Rgb>(), Ok(Rgb(0xc6492c)));
    assert_eq!("0xFFE213".parse::<Rgb>(), Ok(Rgb(0xffe213)));
    assert_eq!("aab172".parse::<Rgb>(), Ok(Rgb(0xaab172)));
    assert!("#zzzzzz".parse::<Rgb>().is_err());
    assert_eq!(Rgb(0x00ff01).to_string(), "#00ff01");
}

#[test]
fn graph_file_builds_a_graph() {
    let json = r#"{
        "nodes": [
            { "id": 1, "data": { "name": "one" } },
            { "id": "two" },
            { "id": 3 }
        ],
        "links": [
            { "source": 1, "target": "two" },
            { "source": "two", "target": 3, "length": 42.0 }
        ]
    }"#;
    let graph = GraphFile::from_json_str(json).unwrap().into_graph().unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.link_count(), 2);
    assert_eq!(graph.node(&NodeKey::Number(1)).unwrap().data["name"], "one");
    assert_eq!(graph.links_of(&NodeKey::from("two")).unwrap().len(), 2);
    assert_eq!(graph.links_of(&NodeKey::from(3)).unwrap()[0].length, Some(42.0));
    assert_eq!(NodeKey::from("two").to_string(), "two");
}

#[test]
fn graph_file_with_dangling_link_fails() {
    let json = r#"{ "nodes": [{ "id": "a" }], "links": [{ "source": "a", "target": "b" }] }"#;
    let err = GraphFile::from_json_str(json).unwrap().into_graph().unwrap_err();
    assert!(matches!(err, GraphError::UnknownNode(_)));
}

#[test]
fn graph_file_with_duplicate_ids_fails() {
    let json = r#"{ "nodes": [{ "id": "a" }, { "id": "a" }] }"#;
    let err = GraphFile::from_json_str(json).unwrap().into_graph().unwrap_err();
    assert!(matches!(err, GraphError::DuplicateId(_)));
}

#[test]
fn malformed_graph_json_is_reported() {
    assert!(matches!(GraphFile::from_json_str("{ nodes: "), Err(ConfigError::Json(_))));
}

#[test]
fn shipped_scenario_files_load() {
    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios");

    let config = LayoutConfig::load(dir.join("default.yaml")).unwrap();
    assert_eq!(config.simulation.params, SimulationParams::default());
    assert_eq!(config.palette, fdgraph::Palette::default());

    let graph = GraphFile::load(dir.join("triangle.json")).unwrap().into_graph().unwrap();
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.link_count(), 2);
}
