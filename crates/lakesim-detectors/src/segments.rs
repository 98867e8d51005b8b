//! Connected-component labeling on boolean grid masks
//!
//! Components are grown by breadth-first search from each unvisited seed in
//! raster order, so labels are stable for identical input. Diagonal
//! neighbours count as connected (8-connectivity).

use std::collections::VecDeque;

/// The 8 neighbour offsets as (row, col) deltas
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Labeled components of a mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Row-major labels; 0 is background, components are numbered from 1
    pub labels: Vec<usize>,

    /// Cell count of each component, `sizes[k]` belongs to label `k + 1`
    pub sizes: Vec<usize>,
}

impl Segmentation {
    /// Number of components found
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Whether any component has a size within `[min, max]`
    pub fn any_sized_within(&self, min: usize, max: usize) -> bool {
        self.sizes.iter().any(|&size| size >= min && size <= max)
    }

    /// Largest component size, 0 when there are none
    pub fn largest(&self) -> usize {
        self.sizes.iter().copied().max().unwrap_or(0)
    }
}

/// Label 8-connected components of the `true` cells in a row-major mask
pub fn label_components(mask: &[bool], rows: usize, cols: usize) -> Segmentation {
    debug_assert_eq!(mask.len(), rows * cols);

    let mut labels = vec![0usize; mask.len()];
    let mut sizes = Vec::new();
    let mut queue = VecDeque::new();

    for seed in 0..mask.len() {
        if !mask[seed] || labels[seed] != 0 {
            continue;
        }

        let label = sizes.len() + 1;
        let mut size = 0;
        labels[seed] = label;
        queue.push_back(seed);

        while let Some(index) = queue.pop_front() {
            size += 1;
            let row = (index / cols) as isize;
            let col = (index % cols) as isize;

            for (dr, dc) in NEIGHBOURS {
                let nr = row + dr;
                let nc = col + dc;
                if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                    continue;
                }

                let neighbour = nr as usize * cols + nc as usize;
                if mask[neighbour] && labels[neighbour] == 0 {
                    labels[neighbour] = label;
                    queue.push_back(neighbour);
                }
            }
        }

        sizes.push(size);
    }

    Segmentation { labels, sizes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(rows: &[&str]) -> (Vec<bool>, usize, usize) {
        let cols = rows[0].len();
        let cells = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| c == '#'))
            .collect();
        (cells, rows.len(), cols)
    }

    #[test]
    fn test_diagonal_cells_connect() {
        let (cells, rows, cols) = mask(&["#..", ".#.", "..#"]);
        let seg = label_components(&cells, rows, cols);
        assert_eq!(seg.count(), 1);
        assert_eq!(seg.sizes, vec![3]);
    }

    #[test]
    fn test_separate_components() {
        let (cells, rows, cols) = mask(&["##...", "##...", ".....", "...##"]);
        let seg = label_components(&cells, rows, cols);
        assert_eq!(seg.sizes, vec![4, 2]);
        assert_eq!(seg.labels[0], 1);
        assert_eq!(seg.labels[18], 2);
        assert_eq!(seg.labels[2], 0);
        assert_eq!(seg.largest(), 4);
    }

    #[test]
    fn test_size_band() {
        let (cells, rows, cols) = mask(&["###.#"]);
        let seg = label_components(&cells, rows, cols);
        assert!(seg.any_sized_within(3, 3));
        assert!(seg.any_sized_within(1, 1));
        assert!(!seg.any_sized_within(2, 2));
    }

    #[test]
    fn test_empty_mask() {
        let seg = label_components(&[false; 6], 2, 3);
        assert_eq!(seg.count(), 0);
        assert_eq!(seg.largest(), 0);
        assert!(!seg.any_sized_within(0, 10));
    }

    #[test]
    fn test_u_shape_single_component() {
        let (cells, rows, cols) = mask(&["#.#", "#.#", "###"]);
        let seg = label_components(&cells, rows, cols);
        assert_eq!(seg.sizes, vec![7]);
    }
}
