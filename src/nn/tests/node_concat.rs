/*
 * @Description  : 拼接层形状规则测试
 */

use crate::errors::ShapeError;
use crate::nn::{
    Concat, GraphError, GraphInner, InputPort, LayerKind, ShapeSlot, TabularInput, TimeseriesInput,
};
use serde_json::json;

fn series(features: usize, length: Option<usize>) -> TimeseriesInput {
    TimeseriesInput {
        batch_size: None,
        num_features: Some(features),
        sequence_length: length,
        channels_last: false,
    }
}

#[test]
fn test_concat_sums_concat_axis() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let left = graph.add_node(series(3, None));
    let right = graph.add_node(series(5, None));
    let concat = graph.add_node(Concat::new(1));
    graph.connect(left, concat, Some(InputPort::FIRST))?;
    // 只连一个输入时仍为“未连接”
    assert_eq!(graph.node_output(concat)?, &ShapeSlot::NotConnected);

    graph.connect(right, concat, Some(InputPort::SECOND))?;
    let output = graph.node_output(concat)?;
    assert_eq!(output.to_string(), "(N, 8, L)");
    assert_eq!(output.order().map(|o| o.as_str()), Some("NCL"));
    Ok(())
}

#[test]
fn test_concat_axis_mismatch_invalidates_node() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let left = graph.add_node(series(3, Some(20)));
    let right = graph.add_node(series(3, Some(10)));
    let concat = graph.add_node(Concat::new(1));
    graph.connect(left, concat, None)?;
    graph.connect(right, concat, None)?;

    let node = graph.node(concat)?;
    assert_eq!(
        node.shape_error(),
        Some(&ShapeError::ConcatAxisMismatch {
            axis: 2,
            left: 20,
            right: 10
        })
    );
    assert_eq!(node.output(), &ShapeSlot::NotConnected);

    // 改为沿长度拼接后成立
    graph.update_node_params(concat, &json!({"dim": 2}))?;
    assert_eq!(graph.node_output(concat)?.to_string(), "(N, 3, 30)");
    Ok(())
}

#[test]
fn test_concat_symbol_then_mismatch_on_resolution() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let left = graph.add_node(series(3, Some(20)));
    let right = graph.add_node(series(3, None));
    let concat = graph.add_node(Concat::new(1));
    graph.connect(left, concat, None)?;
    graph.connect(right, concat, None)?;
    // 符号与确定值兼容
    assert_eq!(graph.node_output(concat)?.to_string(), "(N, 6, L)");

    // 符号被具体数值取代后报出不匹配
    graph.update_node_params(right, &json!({"sequence_length": 10}))?;
    assert!(matches!(
        graph.node(concat)?.shape_error(),
        Some(ShapeError::ConcatAxisMismatch { axis: 2, .. })
    ));
    Ok(())
}

#[test]
fn test_concat_rank_mismatch_and_axis_range() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let tabular = graph.add_node(TabularInput::default());
    let sequence = graph.add_node(series(3, None));
    let concat = graph.add_default_node(LayerKind::Concat);
    graph.connect(tabular, concat, None)?;
    let edge = graph.connect(sequence, concat, None)?;
    assert_eq!(
        graph.node(concat)?.shape_error(),
        Some(&ShapeError::ConcatRankMismatch { left: 2, right: 3 })
    );

    let other = graph.add_node(TabularInput::default());
    graph.disconnect(edge)?;
    graph.connect(other, concat, None)?;
    graph.update_node_params(concat, &json!({"dim": 5}))?;
    assert_eq!(
        graph.node(concat)?.shape_error(),
        Some(&ShapeError::AxisOutOfRange {
            layer: "Concatenate",
            axis: 5,
            rank: 2
        })
    );
    Ok(())
}

#[test]
fn test_concat_sum_overflow_invalidates_node() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let huge = usize::MAX / 2 + 1;
    let left = graph.add_node(TabularInput {
        batch_size: Some(1),
        num_features: Some(huge),
    });
    let right = graph.add_node(TabularInput {
        batch_size: Some(1),
        num_features: Some(huge),
    });
    let concat = graph.add_node(Concat::new(1));
    graph.connect(left, concat, None)?;
    graph.connect(right, concat, None)?;

    let node = graph.node(concat)?;
    assert_eq!(
        node.shape_error(),
        Some(&ShapeError::DimOverflow {
            layer: "Concatenate",
            axis: 1
        })
    );
    assert_eq!(node.output(), &ShapeSlot::NotConnected);
    Ok(())
}
