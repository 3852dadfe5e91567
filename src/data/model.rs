// ---------------------------------------------------------------------------
// Table – the raw numeric matrix as loaded from disk
// ---------------------------------------------------------------------------

/// A rectangular numeric table. Every row has exactly `columns` cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: usize,
    pub rows: Vec<Vec<f64>>,
}

impl Table {
    pub fn new(columns: usize) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Build typed records from every row.
    pub fn records<R: TableRecord>(&self) -> Vec<R> {
        self.rows.iter().map(|row| R::from_row(row)).collect()
    }
}

/// A record type that occupies one table row.
pub trait TableRecord: Sized {
    /// Number of cells per row.
    const COLUMNS: usize;

    /// Build a record from a row of exactly [`Self::COLUMNS`] cells.
    fn from_row(row: &[f64]) -> Self;
}

/// Any non-zero cell is a set flag. NaN counts as set.
fn truthy(v: f64) -> bool {
    v != 0.0
}

// ---------------------------------------------------------------------------
// GroupRecord – one bin of a grouped spectral window
// ---------------------------------------------------------------------------

/// One row of a group table.
///
/// Frequencies are angular (rad/s) and magnitude is linear until the group
/// transform converts them to Hz and dB in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupRecord {
    pub natural_freq: f64,
    pub measured_freq: f64,
    pub magnitude: f64,
    /// Draw a vertical reference line at this row's natural frequency.
    pub has_vertical_marker: bool,
    /// Draw a point marker at this row.
    pub has_scatter_marker: bool,
}

impl TableRecord for GroupRecord {
    const COLUMNS: usize = 5;

    fn from_row(row: &[f64]) -> Self {
        GroupRecord {
            natural_freq: row[0],
            measured_freq: row[1],
            magnitude: row[2],
            has_vertical_marker: truthy(row[3]),
            has_scatter_marker: truthy(row[4]),
        }
    }
}

// ---------------------------------------------------------------------------
// SpectralPoint – one reassigned time/frequency sample
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralPoint {
    /// Seconds.
    pub time: f64,
    /// rad/s on load, Hz after the transform.
    pub freq: f64,
    /// Linear magnitude, non-negative.
    pub magnitude: f64,
}

impl TableRecord for SpectralPoint {
    const COLUMNS: usize = 3;

    fn from_row(row: &[f64]) -> Self {
        SpectralPoint {
            time: row[0],
            freq: row[1],
            magnitude: row[2],
        }
    }
}
