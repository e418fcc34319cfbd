use crate::board::{BoardImage, CELL_SIZE};

/// Feature vector describing a rendered board.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.0
    }
}

pub trait BoardEncoder {
    fn encode(&self, board: &BoardImage) -> Embedding;
}

/// Averages the raster pixels of every tile into a normalised RGB triple.
///
/// Output layout is row-major, three values per tile.
#[derive(Debug, Default, Clone, Copy)]
pub struct TileMeanEncoder;

impl BoardEncoder for TileMeanEncoder {
    #[allow(clippy::cast_precision_loss)]
    fn encode(&self, board: &BoardImage) -> Embedding {
        let raster = board.pixels();
        let mut values = Vec::with_capacity(board.row_count() * board.word_length * 3);
        let cell_pixels = (CELL_SIZE * CELL_SIZE) as f32;

        for row in 0..board.row_count() {
            for col in 0..board.word_length {
                let mut sum = [0u32; 3];
                for y in row * CELL_SIZE..(row + 1) * CELL_SIZE {
                    for x in col * CELL_SIZE..(col + 1) * CELL_SIZE {
                        let px = raster.pixel(x, y);
                        for (acc, channel) in sum.iter_mut().zip(px) {
                            *acc += u32::from(channel);
                        }
                    }
                }
                values.extend(sum.iter().map(|s| *s as f32 / cell_pixels / 255.0));
            }
        }

        crate::debug_log!("encoded board into {} features", values.len());
        Embedding(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardRenderer, TileRenderer};

    #[test]
    fn test_embedding_dimension() {
        let board = TileRenderer.render(&["ap??E", "H???o"], 5);
        let embedding = TileMeanEncoder.encode(&board);
        assert_eq!(embedding.dimension(), 2 * 5 * 3);
        assert!(embedding.values().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_green_tile_dominates_green_channel() {
        let board = TileRenderer.render(&["A"], 1);
        let embedding = TileMeanEncoder.encode(&board);
        let [r, g, b] = [embedding.0[0], embedding.0[1], embedding.0[2]];
        assert!(g > r);
        assert!(g > b);
    }

    #[test]
    fn test_same_board_same_embedding() {
        let board = TileRenderer.render(&[], 6);
        assert_eq!(TileMeanEncoder.encode(&board), TileMeanEncoder.encode(&board));
    }
}
