/*
 * @Description  : 参数补丁测试：逐字段校验、拒绝不影响其它字段、错误信息挂在节点上
 */

use crate::assert_err;
use crate::nn::{
    Concat, Conv2d, Dropout, GraphError, GraphInner, ImageInput, LayerKind, LayerParams, Relu,
};
use approx::assert_relative_eq;
use serde_json::json;

fn conv_graph() -> (GraphInner, crate::nn::NodeId) {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(32, 3, 28, 28));
    let conv = graph.add_node(Conv2d::new(16, 3));
    graph.connect(image, conv, None).unwrap();
    (graph, conv)
}

#[test]
fn test_valid_patch_commits_and_propagates() -> Result<(), GraphError> {
    let (mut graph, conv) = conv_graph();
    let update = graph.update_node_params(conv, &json!({"num_filters": 32, "padding": 1}))?;
    assert!(update.is_fully_committed());
    assert_eq!(update.committed.len(), 2);
    assert!(update.propagation.is_some());
    assert_eq!(graph.node_output(conv)?.to_string(), "(32, 32, 28, 28)");
    Ok(())
}

#[test]
fn test_invalid_field_rejected_others_committed() -> Result<(), GraphError> {
    let (mut graph, conv) = conv_graph();
    let update = graph.update_node_params(conv, &json!({"num_filters": 8, "stride": 0}))?;
    assert_eq!(update.committed, vec!["num_filters".to_string()]);
    assert_eq!(update.rejected.len(), 1);
    assert_eq!(update.rejected[0].field, "stride");
    assert_eq!(update.rejected[0].message, "stride须>0");

    // 被拒绝的字段保留旧值，合法字段已生效
    assert_eq!(graph.node_output(conv)?.to_string(), "(32, 8, 26, 26)");
    let node = graph.node(conv)?;
    assert_eq!(node.field_error("stride").map(|e| e.message.as_str()), Some("stride须>0"));
    assert!(node.field_error("num_filters").is_none());

    // 再次提交合法值后错误清除
    graph.update_node_params(conv, &json!({"stride": 2}))?;
    let node = graph.node(conv)?;
    assert!(node.field_errors().is_empty());
    assert_eq!(node.output().to_string(), "(32, 8, 13, 13)");
    Ok(())
}

#[test]
fn test_all_rejected_does_not_propagate() -> Result<(), GraphError> {
    let (mut graph, conv) = conv_graph();
    let pass_before = graph.last_propagation_id();
    let update = graph.update_node_params(conv, &json!({"kernel_size": -1, "bias": "yes"}))?;
    assert!(update.committed.is_empty());
    assert!(update.propagation.is_none());
    assert_eq!(graph.last_propagation_id(), pass_before);
    assert_eq!(graph.node(conv)?.field_errors().len(), 2);
    assert_eq!(
        graph.node(conv)?.field_error("bias").map(|e| e.message.as_str()),
        Some("bias须为布尔值")
    );
    Ok(())
}

#[test]
fn test_null_clears_optional_but_not_required_fields() -> Result<(), GraphError> {
    let (mut graph, conv) = conv_graph();
    graph.update_node_params(conv, &json!({"kernel_size": null}))?;
    assert_eq!(graph.node_output(conv)?.to_string(), "(32, 16, Hout, Wout)");

    let mut graph = GraphInner::new();
    let concat = graph.add_node(Concat::new(1));
    let update = graph.update_node_params(concat, &json!({"dim": null}))?;
    assert_eq!(update.rejected[0].message, "dim不能为空");
    assert_eq!(graph.node_params(concat)?, &LayerParams::from(Concat::new(1)));
    Ok(())
}

#[test]
fn test_patch_shape_errors() -> Result<(), GraphError> {
    let (mut graph, conv) = conv_graph();
    assert_err!(
        graph.update_node_params(conv, &json!({"units": 3, "num_filters": 4})),
        GraphError::UnknownField { field, .. } if field == "units"
    );
    assert_err!(
        graph.update_node_params(conv, &json!({"kind": "linear"})),
        GraphError::UnknownField { field, .. } if field == "kind"
    );
    assert_err!(
        graph.update_node_params(conv, &json!([1, 2])),
        GraphError::InvalidOperation(msg) if msg.starts_with("参数补丁须为JSON对象")
    );
    // 整个补丁被拒绝，合法字段也未提交
    assert_eq!(graph.node_output(conv)?.to_string(), "(32, 16, 26, 26)");
    Ok(())
}

#[test]
fn test_float_params() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let dropout = graph.add_default_node(LayerKind::Dropout);
    let update = graph.update_node_params(dropout, &json!({"p": 0.25, "inplace": true}))?;
    assert!(update.is_fully_committed());
    let LayerParams::Dropout(Dropout { p, inplace }) = graph.node_params(dropout)? else {
        panic!("层类型不应改变");
    };
    assert_relative_eq!(p.unwrap_or_default(), 0.25);
    assert!(*inplace);

    let update = graph.update_node_params(dropout, &json!({"p": 1.5}))?;
    assert_eq!(update.rejected[0].message, "p须≤1");
    Ok(())
}

#[test]
fn test_set_node_params() -> Result<(), GraphError> {
    let (mut graph, conv) = conv_graph();
    graph.update_node_params(conv, &json!({"stride": 0}))?;
    assert!(!graph.node(conv)?.field_errors().is_empty());

    graph.set_node_params(conv, Conv2d::new(4, 1))?;
    assert!(graph.node(conv)?.field_errors().is_empty());
    assert_eq!(graph.node_output(conv)?.to_string(), "(32, 4, 28, 28)");

    assert_err!(
        graph.set_node_params(conv, Relu::default()),
        GraphError::KindMismatch { expected: LayerKind::Conv2d, got: LayerKind::Relu }
    );
    Ok(())
}

#[test]
fn test_integral_real_accepted_for_int_field() -> Result<(), GraphError> {
    let (mut graph, conv) = conv_graph();
    let update = graph.update_node_params(conv, &json!({"num_filters": 8.0, "padding": 1e0}))?;
    assert!(update.is_fully_committed());
    assert_eq!(graph.node_output(conv)?.to_string(), "(32, 8, 28, 28)");

    let update = graph.update_node_params(conv, &json!({"stride": 1.5}))?;
    assert_eq!(update.rejected[0].message, "stride须为整数");
    Ok(())
}
