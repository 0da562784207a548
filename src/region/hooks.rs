//! Stock builder strategies.

use crate::graph::AdjacencyGraph;
use crate::model::{
    ColorHarisDistance, Matrix, MeansNode, Pixel, Rgb, ScalarHarisDistance, Symmetric, VoidWeight,
};
use crate::{Error, Result};

use super::RegionHooks;

/// Region graph with pixel counts on nodes and boundary lengths on edges.
pub type BoundaryGraph<F = VoidWeight> = AdjacencyGraph<u32, f32, u32, F, Symmetric>;

/// Region graph over gray-value means.
pub type GrayMeansGraph<F = ScalarHarisDistance> =
    AdjacencyGraph<MeansNode<f32>, f32, u32, F, Symmetric>;

/// Region graph over color means.
pub type ColorMeansGraph<F = ColorHarisDistance> =
    AdjacencyGraph<MeansNode<Rgb>, f32, u32, F, Symmetric>;

fn check_shape(what: &str, shape: (usize, usize), rows: usize, cols: usize) -> Result<()> {
    if shape == (rows, cols) {
        Ok(())
    } else {
        Err(Error::InternalDataCheck(format!(
            "{what} is {}x{}, labels are {rows}x{cols}",
            shape.0, shape.1
        )))
    }
}

/// Counts pixels per region and boundary pixel pairs per edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryCount;

impl RegionHooks for BoundaryCount {
    type Node = u32;
    type Edge = u32;

    fn consider_for_node_data(&mut self, _pixel: Pixel, _label: usize, node: &mut u32) {
        *node += 1;
    }

    fn consider_for_edge_data(&mut self, _from: Pixel, _to: Pixel, edge: &mut u32) {
        *edge += 1;
    }
}

/// Mean gray value per region, boundary length per edge.
#[derive(Debug, Clone)]
pub struct GrayMeans {
    channel: Matrix<f32>,
}

impl GrayMeans {
    pub fn new(channel: Matrix<f32>) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &Matrix<f32> {
        &self.channel
    }
}

impl RegionHooks for GrayMeans {
    type Node = MeansNode<f32>;
    type Edge = u32;

    fn check_internal_data(&self, rows: usize, cols: usize, _max_label: usize) -> Result<()> {
        check_shape("channel", self.channel.size(), rows, cols)
    }

    fn consider_for_node_data(&mut self, pixel: Pixel, _label: usize, node: &mut MeansNode<f32>) {
        node.consider(self.channel[pixel]);
    }

    fn consider_for_edge_data(&mut self, _from: Pixel, _to: Pixel, edge: &mut u32) {
        *edge += 1;
    }
}

/// Mean color per region, boundary length per edge.
#[derive(Debug, Clone)]
pub struct ColorMeans {
    image: Matrix<Rgb>,
}

impl ColorMeans {
    pub fn from_image(image: Matrix<Rgb>) -> Self {
        Self { image }
    }

    /// Combine three equally sized channels into one color image.
    pub fn from_channels(red: &Matrix<f32>, green: &Matrix<f32>, blue: &Matrix<f32>) -> Result<Self> {
        let (rows, cols) = red.size();
        check_shape("green channel", green.size(), rows, cols)?;
        check_shape("blue channel", blue.size(), rows, cols)?;
        let pixels = red
            .data()
            .iter()
            .zip(green.data())
            .zip(blue.data())
            .map(|((&r, &g), &b)| Rgb::new(r, g, b))
            .collect();
        Ok(Self::from_image(Matrix::from_vec(rows, cols, pixels)?))
    }

    pub fn image(&self) -> &Matrix<Rgb> {
        &self.image
    }
}

impl RegionHooks for ColorMeans {
    type Node = MeansNode<Rgb>;
    type Edge = u32;

    fn check_internal_data(&self, rows: usize, cols: usize, _max_label: usize) -> Result<()> {
        check_shape("image", self.image.size(), rows, cols)
    }

    fn consider_for_node_data(&mut self, pixel: Pixel, _label: usize, node: &mut MeansNode<Rgb>) {
        node.consider(self.image[pixel]);
    }

    fn consider_for_edge_data(&mut self, _from: Pixel, _to: Pixel, edge: &mut u32) {
        *edge += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorMeanDistance, NodeId, ScalarMeanDistance};
    use crate::region::RegionGraphBuilder;

    fn labels() -> Matrix<usize> {
        Matrix::from_rows(vec![vec![0, 0, 1], vec![0, 1, 1]]).unwrap()
    }

    #[test]
    fn test_gray_means_graph() {
        let channel = Matrix::from_rows(vec![vec![1.0, 3.0, 10.0], vec![2.0, 8.0, 9.0]]).unwrap();
        let mut builder = RegionGraphBuilder::new(GrayMeans::new(channel));
        let mut g = GrayMeansGraph::<ScalarMeanDistance>::new(ScalarMeanDistance);
        builder.generate(&labels(), 0, &mut g).unwrap();

        assert_eq!(g.node_data(NodeId(0)).map(|n| n.mean()), Some(2.0));
        assert_eq!(g.node_data(NodeId(1)).map(|n| n.mean()), Some(9.0));
        assert_eq!(g.edge_data(NodeId(1), NodeId(0)), Some(&3));
        assert_eq!(g.edge_weight(NodeId(0), NodeId(1)), Some(7.0));
    }

    #[test]
    fn test_gray_means_rejects_wrong_channel_size() {
        let channel = Matrix::new_fill(3, 2, 0.0f32);
        let mut builder = RegionGraphBuilder::new(GrayMeans::new(channel));
        let mut g: GrayMeansGraph = GrayMeansGraph::default();
        let err = builder.generate(&labels(), 0, &mut g).unwrap_err();
        assert!(matches!(err, Error::InternalDataCheck(_)));
        assert!(g.is_empty());
    }

    #[test]
    fn test_color_means_from_channels() {
        let r = Matrix::new_fill(2, 3, 0.0f32);
        let g = Matrix::from_rows(vec![vec![0.0, 0.0, 4.0], vec![0.0, 4.0, 4.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![0.0, 0.0, 3.0], vec![0.0, 3.0, 3.0]]).unwrap();
        let hooks = ColorMeans::from_channels(&r, &g, &b).unwrap();
        assert_eq!(hooks.image()[(1, 2)], Rgb::new(0.0, 4.0, 3.0));

        let mut builder = RegionGraphBuilder::new(hooks);
        let mut graph = ColorMeansGraph::<ColorMeanDistance>::new(ColorMeanDistance);
        builder.generate(&labels(), 0, &mut graph).unwrap();
        assert_eq!(graph.edge_weight(NodeId(1), NodeId(0)), Some(5.0));
    }

    #[test]
    fn test_color_channels_must_match() {
        let r = Matrix::new_fill(2, 3, 0.0f32);
        let g = Matrix::new_fill(3, 2, 0.0f32);
        assert!(ColorMeans::from_channels(&r, &g, &r).is_err());
    }
}
