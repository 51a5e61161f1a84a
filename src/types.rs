use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// Width/height pair. Serialized as `[w, h]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Rect {
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }

    pub fn fits_in(&self, other: &Rect) -> bool {
        self.w <= other.w && self.h <= other.h
    }

    pub fn is_degenerate(&self) -> bool {
        self.w == 0 || self.h == 0
    }
}

impl From<[u32; 2]> for Rect {
    fn from([w, h]: [u32; 2]) -> Self {
        Self { w, h }
    }
}

impl From<Rect> for [u32; 2] {
    fn from(r: Rect) -> Self {
        [r.w, r.h]
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// Top-left corner of a placement, `x` along the sheet width. Serialized as `[x, y]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    pub const ORIGIN: Position = Position::new(0, 0);

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<[u32; 2]> for Position {
    fn from([x, y]: [u32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Position> for [u32; 2] {
    fn from(p: Position) -> Self {
        [p.x, p.y]
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDemand {
    pub size: Rect,
    pub quantity: u32,
}

impl ProductDemand {
    pub fn new(size: Rect, quantity: u32) -> Self {
        Self { size, quantity }
    }

    pub fn is_pending(&self) -> bool {
        self.quantity > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Free,
    /// Occupied by a piece of the product with this index.
    Filled(usize),
}

/// Wire form of a sheet: `grid[x][y]` holds `-1` for free cells and the
/// product index for filled ones. A missing grid means an empty sheet.
#[derive(Serialize, Deserialize)]
struct RawStock {
    size: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid: Option<Vec<Vec<i64>>>,
}

/// A stock sheet and its occupancy, stored column-major (`x * height + y`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawStock", into = "RawStock")]
pub struct StockSheet {
    size: Rect,
    cells: Vec<Cell>,
}

/// Largest sheet accepted from outside input, in cells.
pub const MAX_STOCK_CELLS: u64 = 1 << 24;

impl StockSheet {
    /// Empty sheet for sizes known to be small. Input from outside the
    /// process goes through [`StockSheet::try_new`].
    pub fn new(width: u32, height: u32) -> Self {
        let size = Rect::new(width, height);
        Self {
            size,
            cells: vec![Cell::Free; size.area() as usize],
        }
    }

    /// Empty sheet, rejecting sizes above [`MAX_STOCK_CELLS`] or that
    /// cannot be allocated.
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let size = Rect::new(width, height);
        if size.area() > MAX_STOCK_CELLS {
            return Err(PolicyError::MalformedStock(format!(
                "stock {size} exceeds {MAX_STOCK_CELLS} cells"
            )));
        }
        let len = usize::try_from(size.area())
            .map_err(|_| PolicyError::MalformedStock(format!("stock {size} is too large")))?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|e| PolicyError::MalformedStock(format!("cannot allocate stock {size}: {e}")))?;
        cells.resize(len, Cell::Free);
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> Rect {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.w
    }

    pub fn height(&self) -> u32 {
        self.size.h
    }

    fn index(&self, x: u32, y: u32) -> usize {
        x as usize * self.size.h as usize + y as usize
    }

    /// Cell at `(x, y)`, or `None` outside the sheet.
    pub fn cell(&self, x: u32, y: u32) -> Option<Cell> {
        if x >= self.size.w || y >= self.size.h {
            return None;
        }
        Some(self.cells[self.index(x, y)])
    }

    pub fn is_free(&self, x: u32, y: u32) -> bool {
        self.cell(x, y) == Some(Cell::Free)
    }

    pub fn filled_area(&self) -> u64 {
        self.cells.iter().filter(|c| **c != Cell::Free).count() as u64
    }

    pub fn is_untouched(&self) -> bool {
        self.cells.iter().all(|c| *c == Cell::Free)
    }

    /// Marks the footprint as filled by `product`. Bounds and overlap are
    /// the caller's responsibility; out-of-range cells are ignored.
    pub fn fill(&mut self, position: Position, size: Rect, product: usize) {
        let x_end = position.x.saturating_add(size.w).min(self.size.w);
        let y_end = position.y.saturating_add(size.h).min(self.size.h);
        for x in position.x..x_end {
            for y in position.y..y_end {
                let idx = self.index(x, y);
                self.cells[idx] = Cell::Filled(product);
            }
        }
    }
}

impl TryFrom<RawStock> for StockSheet {
    type Error = PolicyError;

    fn try_from(raw: RawStock) -> Result<Self> {
        let Some(grid) = raw.grid else {
            return StockSheet::try_new(raw.size.w, raw.size.h);
        };
        if grid.len() != raw.size.w as usize {
            return Err(PolicyError::MalformedStock(format!(
                "grid has {} columns, expected {}",
                grid.len(),
                raw.size.w
            )));
        }
        for (x, column) in grid.iter().enumerate() {
            if column.len() != raw.size.h as usize {
                return Err(PolicyError::MalformedStock(format!(
                    "grid column {} has {} cells, expected {}",
                    x,
                    column.len(),
                    raw.size.h
                )));
            }
        }

        let mut sheet = StockSheet::try_new(raw.size.w, raw.size.h)?;
        for (x, column) in grid.iter().enumerate() {
            for (y, &value) in column.iter().enumerate() {
                let cell = match value {
                    -1 => Cell::Free,
                    v if v >= 0 => Cell::Filled(v as usize),
                    v => {
                        return Err(PolicyError::MalformedStock(format!(
                            "cell ({x}, {y}) holds {v}, expected -1 or a product index"
                        )));
                    }
                };
                let idx = sheet.index(x as u32, y as u32);
                sheet.cells[idx] = cell;
            }
        }
        Ok(sheet)
    }
}

impl From<StockSheet> for RawStock {
    fn from(sheet: StockSheet) -> Self {
        let h = sheet.size.h as usize;
        let grid = if h == 0 {
            vec![Vec::new(); sheet.size.w as usize]
        } else {
            sheet
                .cells
                .chunks(h)
                .map(|column| {
                    column
                        .iter()
                        .map(|c| match c {
                            Cell::Free => -1,
                            Cell::Filled(p) => *p as i64,
                        })
                        .collect()
                })
                .collect()
        };
        RawStock {
            size: sheet.size,
            grid: Some(grid),
        }
    }
}

/// What the environment hands the policy on every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub products: Vec<ProductDemand>,
    pub stocks: Vec<StockSheet>,
}

impl Observation {
    pub fn new(products: Vec<ProductDemand>, stocks: Vec<StockSheet>) -> Self {
        Self { products, stocks }
    }

    /// Rejects zero-sized stocks and products. Empty lists are valid.
    pub fn validate(&self) -> Result<()> {
        if let Some(index) = self.stocks.iter().position(|s| s.size().is_degenerate()) {
            return Err(PolicyError::ZeroSizedStock { index });
        }
        if let Some(index) = self.products.iter().position(|p| p.size.is_degenerate()) {
            return Err(PolicyError::ZeroSizedProduct { index });
        }
        Ok(())
    }
}

/// One decision. `stock_idx == -1` means no placement this call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementAction {
    pub stock_idx: i64,
    pub size: Rect,
    pub position: Position,
}

impl PlacementAction {
    pub const NONE: PlacementAction = PlacementAction {
        stock_idx: -1,
        size: Rect::new(0, 0),
        position: Position::ORIGIN,
    };

    pub fn placed(stock_idx: usize, size: Rect, position: Position) -> Self {
        Self {
            stock_idx: stock_idx as i64,
            size,
            position,
        }
    }

    pub fn is_none(&self) -> bool {
        self.stock_idx < 0
    }

    pub fn stock(&self) -> Option<usize> {
        usize::try_from(self.stock_idx).ok()
    }
}

impl Default for PlacementAction {
    fn default() -> Self {
        Self::NONE
    }
}

impl std::fmt::Display for PlacementAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stock() {
            Some(idx) => write!(f, "{} @ {} on stock {}", self.size, self.position, idx),
            None => write!(f, "no placement"),
        }
    }
}
