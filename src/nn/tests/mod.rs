mod graph_basic;
mod graph_edges;
mod node_concat;
mod node_input;
mod node_max_pool;
mod node_norm;
mod param_update;
