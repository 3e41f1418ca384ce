use crate::nn::{
    ColorMode, GraphError, GraphInner, ImageInput, LayerKind, ResolveState, TabularInput,
    TimeseriesInput,
};
use serde_json::json;

#[test]
fn test_tabular_input() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let unset = graph.add_default_node(LayerKind::TabularInput);
    assert_eq!(graph.node_output(unset)?.to_string(), "(N, C)");
    assert_eq!(graph.node_state(unset)?, ResolveState::Partial);

    let set = graph.add_node(TabularInput {
        batch_size: Some(64),
        num_features: Some(13),
    });
    let output = graph.node_output(set)?;
    assert_eq!(output.to_string(), "(64, 13)");
    assert_eq!(output.order().map(|o| o.as_str()), Some("NC"));
    Ok(())
}

#[test]
fn test_timeseries_input_layouts() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let series = graph.add_node(TimeseriesInput {
        batch_size: Some(32),
        num_features: Some(8),
        sequence_length: Some(100),
        channels_last: false,
    });
    assert_eq!(graph.node_output(series)?.to_string(), "(32, 8, 100)");
    assert_eq!(graph.node_output(series)?.order().map(|o| o.as_str()), Some("NCL"));

    // 切换为通道在后
    graph.update_node_params(series, &json!({"channels_last": true}))?;
    assert_eq!(graph.node_output(series)?.to_string(), "(32, 100, 8)");
    assert_eq!(graph.node_output(series)?.order().map(|o| o.as_str()), Some("NLC"));
    Ok(())
}

#[test]
fn test_timeseries_default_batch() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let series = graph.add_default_node(LayerKind::TimeseriesInput);
    assert_eq!(graph.node_output(series)?.to_string(), "(32, C, L)");
    Ok(())
}

#[test]
fn test_image_input() -> Result<(), GraphError> {
    let mut graph = GraphInner::new();
    let image = graph.add_node(ImageInput::new(32, 3, 28, 28));
    let output = graph.node_output(image)?;
    assert_eq!(output.to_string(), "(32, 3, 28, 28)");
    assert_eq!(output.order().map(|o| o.as_str()), Some("NCHW"));

    let unset = graph.add_default_node(LayerKind::ImageInput);
    assert_eq!(graph.node_output(unset)?.to_string(), "(N, C, H, W)");

    // 只设置一部分时其余保持符号
    graph.update_node_params(unset, &json!({"height": 64, "width": 48}))?;
    assert_eq!(graph.node_output(unset)?.to_string(), "(N, C, 64, 48)");
    Ok(())
}

#[test]
fn test_image_color_mode() -> Result<(), GraphError> {
    let grayscale = ImageInput::new(16, 3, 28, 28).with_color_mode(ColorMode::Grayscale);
    assert_eq!(grayscale.num_channels, Some(1));
    assert_eq!(grayscale.color_mode(), Some(ColorMode::Grayscale));
    assert_eq!(ImageInput::new(1, 4, 8, 8).color_mode(), None);

    let mut graph = GraphInner::new();
    let image = graph.add_node(grayscale);
    assert_eq!(graph.node_output(image)?.to_string(), "(16, 1, 28, 28)");
    graph.set_node_params(image, ImageInput::new(16, 1, 28, 28).with_color_mode(ColorMode::Rgb))?;
    assert_eq!(graph.node_output(image)?.to_string(), "(16, 3, 28, 28)");
    Ok(())
}
