//! Neighborhood shapes for window-based raster operations

/// Defines a neighborhood pattern around a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighborhood {
    /// Square neighborhood of given radius
    Square(usize),
    /// Plus-shaped neighborhood with arms of given radius
    Cross(usize),
    /// Circular neighborhood of given radius (in cells)
    Circle(usize),
}

impl Neighborhood {
    /// Get the radius of the neighborhood
    pub fn radius(&self) -> usize {
        match self {
            Neighborhood::Square(r) | Neighborhood::Cross(r) | Neighborhood::Circle(r) => *r,
        }
    }

    /// Check if a relative position is within this neighborhood
    pub fn contains(&self, dr: isize, dc: isize) -> bool {
        let r = self.radius() as isize;
        match self {
            Neighborhood::Square(_) => dr.abs() <= r && dc.abs() <= r,
            Neighborhood::Cross(_) => (dr.abs() <= r && dc == 0) || (dr == 0 && dc.abs() <= r),
            Neighborhood::Circle(_) => {
                let dist = ((dr * dr + dc * dc) as f64).sqrt();
                dist <= r as f64
            }
        }
    }

    /// Iterate over relative positions in this neighborhood
    pub fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius() as isize;
        let mut offsets = Vec::new();

        for dr in -r..=r {
            for dc in -r..=r {
                if self.contains(dr, dc) {
                    offsets.push((dr, dc));
                }
            }
        }

        offsets
    }
}
