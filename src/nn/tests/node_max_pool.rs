use crate::errors::{ComparisonOperator, ShapeError};
use crate::nn::{
    Conv2d, GraphError, GraphInner, ImageInput, LayerKind, MaxPool1d, MaxPool2d, TimeseriesInput,
};
use serde_json::json;

#[test]
fn test_max_pool2d_halves_spatial_axes() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(32, 3, 28, 28));
    let conv = graph.add_node(Conv2d::new(16, 3));
    let pool = graph.add_node(MaxPool2d::new(2, 2));
    graph.connect(image, conv, None)?;
    graph.connect(conv, pool, None)?;
    // 通道维不变
    assert_eq!(graph.node_output(pool)?.to_string(), "(32, 16, 13, 13)");
    Ok(())
}

#[test]
fn test_max_pool_default_stride_is_one() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(1, 3, 10, 10));
    let pool = graph.add_default_node(LayerKind::MaxPool2d);
    graph.connect(image, pool, None)?;
    assert_eq!(graph.node_output(pool)?.to_string(), "(1, 3, Hout, Wout)");

    graph.update_node_params(pool, &json!({"kernel_size": 3}))?;
    assert_eq!(graph.node_output(pool)?.to_string(), "(1, 3, 8, 8)");
    Ok(())
}

#[test]
fn test_max_pool1d_ceil_mode() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let series = graph.add_node(TimeseriesInput {
        batch_size: Some(4),
        num_features: Some(6),
        sequence_length: Some(5),
        channels_last: false,
    });
    let pool = graph.add_node(MaxPool1d::new(2, 2));
    graph.connect(series, pool, None)?;
    assert_eq!(graph.node_output(pool)?.to_string(), "(4, 6, 2)");

    graph.update_node_params(pool, &json!({"ceil_mode": true}))?;
    assert_eq!(graph.node_output(pool)?.to_string(), "(4, 6, 3)");
    Ok(())
}

#[test]
fn test_max_pool_padding_limited_to_half_kernel() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(1, 3, 10, 10));
    let pool = graph.add_node(MaxPool2d {
        padding: Some(2),
        ..MaxPool2d::new(3, 1)
    });
    graph.connect(image, pool, None)?;
    assert_eq!(
        graph.node(pool)?.shape_error(),
        Some(&ShapeError::ValueMustSatisfyComparison {
            value_name: "padding".to_string(),
            operator: ComparisonOperator::LessOrEqual,
            threshold: 1
        })
    );

    graph.update_node_params(pool, &json!({"padding": 1}))?;
    assert_eq!(graph.node_output(pool)?.to_string(), "(1, 3, 10, 10)");
    Ok(())
}
