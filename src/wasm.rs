use crate::bounds::BoundingBox;
use crate::cell::Cell;
use crate::voronoi::Voronoi;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

// --- Bounding Box ---

#[wasm_bindgen(typescript_custom_section)]
const TS_CONSTANTS_BOUNDS: &'static str = r#"
export const BOX_ID_LEFT = -1;
export const BOX_ID_RIGHT = -2;
export const BOX_ID_TOP = -3;
export const BOX_ID_BOTTOM = -4;
"#;

/// Axis-aligned bounding box; y grows downward, so `min_y` is the top side.
#[wasm_bindgen]
#[derive(Clone, Copy, Debug)]
pub struct BoundingBox2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

#[wasm_bindgen]
impl BoundingBox2D {
    #[wasm_bindgen(constructor)]
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> BoundingBox2D {
        BoundingBox2D { min_x, min_y, max_x, max_y }
    }
}

impl From<BoundingBox2D> for BoundingBox {
    fn from(b: BoundingBox2D) -> Self {
        Self::new([b.min_x, b.min_y], [b.max_x, b.max_y])
    }
}

// --- Cell Wrapper ---

#[wasm_bindgen(js_name = Cell2D)]
pub struct Cell2DWASM {
    inner: Cell,
}

#[wasm_bindgen(js_class = Cell2D)]
impl Cell2DWASM {
    #[wasm_bindgen(getter)]
    pub fn id(&self) -> usize { self.inner.id() }
    #[wasm_bindgen(getter)]
    pub fn site(&self) -> Vec<f64> { vec![self.inner.site().x, self.inner.site().y] }
    #[wasm_bindgen(getter)]
    pub fn vertices(&self) -> Vec<f64> { self.inner.vertices() }
    #[wasm_bindgen(getter)]
    pub fn edge_neighbors(&self) -> Vec<i32> { self.inner.edge_neighbors() }
    pub fn is_closed(&self) -> bool { self.inner.is_closed() }
    pub fn area(&self) -> f64 { self.inner.area() }
    pub fn centroid(&self) -> Vec<f64> { self.inner.centroid().to_vec() }
}

// --- Voronoi ---

#[wasm_bindgen(js_name = Voronoi2D)]
pub struct Voronoi2D {
    inner: Voronoi,
}

#[wasm_bindgen(js_class = Voronoi2D)]
impl Voronoi2D {
    #[wasm_bindgen(constructor)]
    pub fn new(bounds: BoundingBox2D) -> Voronoi2D {
        Voronoi2D { inner: Voronoi::new(bounds.into()) }
    }
    pub fn set_sites(&mut self, sites: &[f64]) { self.inner.set_sites_flat(sites); }
    pub fn set_site(&mut self, index: usize, x: f64, y: f64) { self.inner.set_site(index, x, y); }
    pub fn random_sites(&mut self, count: usize) { self.inner.random_sites(count, get_seed()); }

    pub fn calculate(&mut self) -> Result<(), JsError> {
        self.inner.calculate()?;
        Ok(())
    }

    /// One Lloyd step; returns the mean site displacement.
    pub fn relax(&mut self) -> Result<f64, JsError> {
        Ok(self.inner.relax()?)
    }

    #[wasm_bindgen(getter)]
    pub fn count_sites(&self) -> usize { self.inner.count_sites() }
    #[wasm_bindgen(getter)]
    pub fn count_cells(&self) -> usize { self.inner.count_cells() }
    /// Milliseconds spent in the last calculation.
    #[wasm_bindgen(getter)]
    pub fn exec_time(&self) -> f64 {
        self.inner.diagram().map_or(0.0, |d| d.exec_time().as_secs_f64() * 1000.0)
    }
    pub fn get_site(&self, index: usize) -> Option<Vec<f64>> {
        self.inner.get_site(index).map(|p| vec![p.x, p.y])
    }
    pub fn get_cell(&self, index: usize) -> Option<Cell2DWASM> {
        self.inner.get_cell(index).map(|c| Cell2DWASM { inner: c.clone() })
    }
    #[wasm_bindgen(getter)]
    pub fn sites(&self) -> Vec<f64> { self.inner.sites_flat() }
    #[wasm_bindgen(getter)]
    pub fn cells(&self) -> Vec<Cell2DWASM> {
        self.inner
            .diagram()
            .map(|d| d.cells().iter().map(|c| Cell2DWASM { inner: c.clone() }).collect())
            .unwrap_or_default()
    }
    /// All edges as a flat `[ax, ay, bx, by, ...]` array.
    #[wasm_bindgen(getter)]
    pub fn edges(&self) -> Vec<f64> {
        self.inner
            .diagram()
            .map(|d| d.edges().iter().flat_map(|e| [e.va().x, e.va().y, e.vb().x, e.vb().y]).collect())
            .unwrap_or_default()
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        123456789
    }
}
