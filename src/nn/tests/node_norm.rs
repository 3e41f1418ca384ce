use crate::errors::ShapeError;
use crate::nn::{GraphError, GraphInner, LayerNorm, TabularInput, TimeseriesInput};
use approx::assert_relative_eq;
use serde_json::json;

#[test]
fn test_layer_norm_is_identity() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let series = graph.add_node(TimeseriesInput {
        num_features: Some(12),
        sequence_length: Some(40),
        ..TimeseriesInput::default()
    });
    let norm = graph.add_node(LayerNorm {
        normalized_from: 1,
        ..LayerNorm::default()
    });
    graph.connect(series, norm, None)?;
    assert_eq!(graph.node_output(norm)?.to_string(), "(32, 12, 40)");
    Ok(())
}

#[test]
fn test_layer_norm_axis_out_of_range() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let tabular = graph.add_node(TabularInput::default());
    let norm = graph.add_node(LayerNorm {
        normalized_from: 2,
        ..LayerNorm::default()
    });
    graph.connect(tabular, norm, None)?;
    assert_eq!(
        graph.node(norm)?.shape_error(),
        Some(&ShapeError::AxisOutOfRange {
            layer: "LayerNorm",
            axis: 2,
            rank: 2
        })
    );

    graph.update_node_params(norm, &json!({"normalized_from": 1}))?;
    assert!(graph.node(norm)?.shape_error().is_none());
    assert_eq!(graph.node_output(norm)?.to_string(), "(N, C)");
    Ok(())
}

#[test]
fn test_norm_eps_update() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let norm = graph.add_node(LayerNorm::default());
    graph.update_node_params(norm, &json!({"eps": 0.001}))?;
    let crate::nn::LayerParams::LayerNorm(params) = graph.node_params(norm)? else {
        panic!("层类型不应改变");
    };
    assert_relative_eq!(params.eps.unwrap_or_default(), 0.001);
    Ok(())
}
