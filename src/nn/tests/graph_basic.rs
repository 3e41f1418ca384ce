use crate::assert_err;
use crate::nn::{
    Conv2d, GraphError, GraphInner, ImageInput, LayerKind, NodeId, Relu, ResolveState, ShapeSlot,
    TraitShapeRule,
};

#[test]
fn test_graph_creation() {
    // 测试默认创建
    let graph = GraphInner::new();
    assert_eq!(graph.name(), "default_graph");
    assert_eq!(graph.nodes_count(), 0);
    assert_eq!(graph.edges_count(), 0);
    assert_eq!(graph.last_propagation_id(), 0);

    // 测试指定名称创建
    let named_graph = GraphInner::with_name("custom_graph");
    assert_eq!(named_graph.name(), "custom_graph");
    assert_eq!(named_graph.nodes_count(), 0);
}

#[test]
fn test_add_node_ids_are_monotonic() {
    let mut graph = GraphInner::new();
    let a = graph.add_node(ImageInput::new(32, 3, 28, 28));
    let b = graph.add_node(Relu::default());
    let c = graph.add_default_node(LayerKind::Linear);
    assert!(a < b && b < c);
    assert_eq!(graph.nodes(), vec![a, b, c]);

    // 删除后 id 不复用
    graph.delete_node(b).unwrap();
    let d = graph.add_node(Relu::default());
    assert!(d > c);
    assert!(!graph.contains_node(b));
}

#[test]
fn test_input_node_output_known_at_creation() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(32, 3, 28, 28));
    assert_eq!(graph.node_output(image)?.to_string(), "(32, 3, 28, 28)");
    assert_eq!(graph.node_state(image)?, ResolveState::Resolved);

    // 非输入层在连线前为“未连接”
    let conv = graph.add_node(Conv2d::new(16, 3));
    assert_eq!(graph.node_output(conv)?, &ShapeSlot::NotConnected);
    assert_eq!(graph.node_state(conv)?, ResolveState::NotConnected);
    assert_eq!(graph.node_inputs(conv)?.len(), 1);
    Ok(())
}

#[test]
fn test_default_nodes_for_every_kind() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    for kind in LayerKind::ALL {
        let id = graph.add_default_node(kind);
        let params = graph.node_params(id)?;
        assert_eq!(params.kind(), kind);
        assert_eq!(graph.node_inputs(id)?.len(), params.arity());
    }
    assert_eq!(graph.nodes_count(), LayerKind::ALL.len());
    Ok(())
}

#[test]
fn test_node_not_found_errors() {
    let mut graph = GraphInner::new();
    let invalid_id = NodeId(999);

    assert_err!(graph.node(invalid_id), GraphError::NodeNotFound(NodeId(999)));
    assert_err!(graph.node_output(invalid_id), GraphError::NodeNotFound(NodeId(999)));
    assert_err!(graph.get_node_parents(invalid_id), GraphError::NodeNotFound(NodeId(999)));
    assert_err!(graph.delete_node(invalid_id), GraphError::NodeNotFound(NodeId(999)));
    assert_err!(
        graph.update_node_params(invalid_id, &serde_json::json!({})),
        GraphError::NodeNotFound(id) if *id == invalid_id
    );
}

#[test]
fn test_node_display() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let conv = graph.add_node(Conv2d::new(16, 3));
    assert_eq!(graph.node(conv)?.to_string(), format!("节点[id={conv}, type=Conv2D]"));
    Ok(())
}

#[test]
fn test_parents_and_children() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(8, 3, 16, 16));
    let relu = graph.add_node(Relu::default());
    let conv = graph.add_node(Conv2d::new(4, 3));
    graph.connect(image, relu, None)?;
    graph.connect(image, conv, None)?;

    assert_eq!(graph.get_node_children(image)?, vec![relu, conv]);
    assert_eq!(graph.get_node_parents(relu)?, vec![image]);
    assert!(graph.get_node_parents(image)?.is_empty());
    Ok(())
}

#[test]
fn test_delete_node_cascades_not_connected() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(32, 3, 28, 28));
    let conv = graph.add_node(Conv2d::new(16, 3));
    let relu = graph.add_node(Relu::default());
    graph.connect(image, conv, None)?;
    graph.connect(conv, relu, None)?;
    assert_eq!(graph.node_output(relu)?.to_string(), "(32, 16, 26, 26)");

    let report = graph.delete_node(image)?;
    assert_eq!(report.visited, vec![conv, relu]);
    assert_eq!(graph.edges_count(), 1);
    assert_eq!(graph.node_inputs(conv)?[0], ShapeSlot::NotConnected);
    assert_eq!(graph.node_output(conv)?, &ShapeSlot::NotConnected);
    assert_eq!(graph.node_output(relu)?, &ShapeSlot::NotConnected);
    Ok(())
}

#[test]
fn test_delete_leaf_node_propagates_nothing() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(32, 3, 28, 28));
    let relu = graph.add_node(Relu::default());
    graph.connect(image, relu, None)?;

    let report = graph.delete_node(relu)?;
    assert!(report.visited.is_empty());
    assert_eq!(graph.edges_count(), 0);
    assert!(graph.outgoing_edges(image).is_empty());
    Ok(())
}
