pub mod neural_graph;
