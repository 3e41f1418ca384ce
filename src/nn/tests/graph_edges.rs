use crate::assert_err;
use crate::nn::{
    ClassificationOutput, Concat, EdgeId, GraphError, GraphInner, ImageInput, InputPort, Linear,
    Relu, ShapeSlot, TabularInput,
};

// ==================== 建立连线 ====================

#[test]
fn test_connect_propagates_immediately() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(32, 3, 28, 28));
    let relu = graph.add_node(Relu::default());

    let edge = graph.connect(image, relu, None)?;
    let stored = graph.edge(edge)?;
    assert_eq!((stored.source, stored.target), (image, relu));
    assert_eq!(stored.target_port, InputPort::FIRST);
    assert_eq!(graph.node_output(relu)?.to_string(), "(32, 3, 28, 28)");
    assert_eq!(graph.node_inputs(relu)?[0].to_string(), "(32, 3, 28, 28)");
    Ok(())
}

#[test]
fn test_connect_rejects_cycles() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let a = graph.add_node(Relu::default());
    let b = graph.add_node(Relu::default());
    let c = graph.add_node(Relu::default());
    graph.connect(a, b, None)?;
    graph.connect(b, c, None)?;

    assert_err!(
        graph.connect(c, a, None),
        GraphError::CycleDetected { from, to } if *from == c && *to == a
    );
    // 自环同样是环
    assert_err!(graph.connect(a, a, None), GraphError::CycleDetected { .. });
    // 失败后图不变
    assert_eq!(graph.edges_count(), 2);
    Ok(())
}

#[test]
fn test_connect_port_rules() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let left = graph.add_node(TabularInput::default());
    let right = graph.add_node(TabularInput::default());
    let third = graph.add_node(TabularInput::default());
    let relu = graph.add_node(Relu::default());
    let concat = graph.add_node(Concat::new(1));

    // 单输入层：第二条连线没有空闲端口
    graph.connect(left, relu, None)?;
    assert_err!(
        graph.connect(right, relu, None),
        GraphError::NoFreePort { target } if *target == relu
    );
    assert_err!(
        graph.connect(right, relu, Some(InputPort::FIRST)),
        GraphError::PortOccupied { port, .. } if *port == InputPort::FIRST
    );
    assert_err!(
        graph.connect(right, relu, Some(InputPort::SECOND)),
        GraphError::InvalidPort { arity: 1, .. }
    );

    // 拼接层：显式指定第二端口后，第一端口仍是空闲的
    graph.connect(right, concat, Some(InputPort::SECOND))?;
    let edge = graph.connect(left, concat, None)?;
    assert_eq!(graph.edge(edge)?.target_port, InputPort::FIRST);
    assert_err!(graph.connect(third, concat, None), GraphError::NoFreePort { .. });
    assert_eq!(graph.get_node_parents(concat)?, vec![left, right]);
    Ok(())
}

#[test]
fn test_connect_endpoint_roles() {
    let mut graph = GraphInner::new();
    let tabular = graph.add_node(TabularInput::default());
    let other = graph.add_node(TabularInput::default());
    let linear = graph.add_node(Linear::new(4));
    let output = graph.add_node(ClassificationOutput::default());

    // 输入层没有输入端口
    assert_err!(graph.connect(linear, other, None), GraphError::NoInputPort(_));
    // 终端输出层没有输出
    assert_err!(graph.connect(output, linear, None), GraphError::NoOutput(_));
    assert!(graph.connect(tabular, linear, None).is_ok());
    assert!(graph.connect(linear, output, None).is_ok());
}

// ==================== 断开与改接 ====================

#[test]
fn test_disconnect_resets_port() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let tabular = graph.add_node(TabularInput {
        batch_size: Some(16),
        num_features: Some(10),
    });
    let linear = graph.add_node(Linear::new(4));
    let relu = graph.add_node(Relu::default());
    let edge = graph.connect(tabular, linear, None)?;
    graph.connect(linear, relu, None)?;
    assert_eq!(graph.node_output(relu)?.to_string(), "(16, 4)");

    let report = graph.disconnect(edge)?;
    assert_eq!(report.visited, vec![linear, relu]);
    assert_eq!(graph.node_inputs(linear)?[0], ShapeSlot::NotConnected);
    assert_eq!(graph.node_output(relu)?, &ShapeSlot::NotConnected);
    assert!(graph.outgoing_edges(tabular).is_empty());

    assert_err!(graph.disconnect(edge), GraphError::EdgeNotFound(id) if *id == edge);
    assert_err!(graph.disconnect(EdgeId(42)), GraphError::EdgeNotFound(_));
    Ok(())
}

#[test]
fn test_reconnect_moves_edge() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let tabular = graph.add_node(TabularInput {
        batch_size: Some(16),
        num_features: Some(10),
    });
    let first = graph.add_node(Linear::new(4));
    let second = graph.add_node(Linear::new(8));
    let edge = graph.connect(tabular, first, None)?;

    let report = graph.reconnect(edge, second, None)?;
    assert!(report.position(first).is_some());
    assert!(report.position(second).is_some());
    assert_eq!(graph.node_output(first)?, &ShapeSlot::NotConnected);
    assert_eq!(graph.node_output(second)?.to_string(), "(16, 8)");
    assert_eq!(graph.edge(edge)?.target, second);
    assert_eq!(graph.edges_count(), 1);
    Ok(())
}

#[test]
fn test_reconnect_to_own_port_is_allowed() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let tabular = graph.add_node(TabularInput::default());
    let relu = graph.add_node(Relu::default());
    let edge = graph.connect(tabular, relu, None)?;

    // 正在改接的连线本身不算占用端口
    graph.reconnect(edge, relu, Some(InputPort::FIRST))?;
    assert_eq!(graph.node_output(relu)?.to_string(), "(N, C)");
    Ok(())
}

#[test]
fn test_failed_reconnect_leaves_graph_unchanged() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let tabular = graph.add_node(TabularInput::default());
    let a = graph.add_node(Relu::default());
    let b = graph.add_node(Relu::default());
    let edge = graph.connect(tabular, a, None)?;
    graph.connect(a, b, None)?;
    let pass_before = graph.last_propagation_id();

    // 把 a → b 改接到 a 自身会形成自环
    let back = graph.outgoing_edges(a)[0].id;
    assert_err!(graph.reconnect(back, a, None), GraphError::CycleDetected { .. });
    assert_err!(graph.reconnect(edge, tabular, None), GraphError::NoInputPort(_));
    assert_err!(graph.reconnect(EdgeId(99), a, None), GraphError::EdgeNotFound(_));

    assert_eq!(graph.edge(edge)?.target, a);
    assert_eq!(graph.last_propagation_id(), pass_before);
    assert_eq!(graph.node_output(b)?.to_string(), "(N, C)");
    Ok(())
}
