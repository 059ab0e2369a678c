// crates/mh_io/src/grid.rs

//! 写出所需的网格几何
//!
//! 写出后端只需要节点坐标和单元连接关系，不关心网格的拓扑数据结构。

/// VTU 单元类型
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VtuCellType {
    /// 三角形
    Triangle = 5,
    /// 多边形
    Polygon = 7,
    /// 四边形
    Quad = 9,
}

impl VtuCellType {
    /// 由单元节点数推断
    pub fn from_node_count(n: usize) -> Self {
        match n {
            3 => Self::Triangle,
            4 => Self::Quad,
            _ => Self::Polygon,
        }
    }
}

/// VTU 网格 trait
pub trait VtkGrid: Send + Sync {
    /// 节点数量
    fn n_nodes(&self) -> usize;
    /// 单元数量
    fn n_cells(&self) -> usize;
    /// 节点位置 [x, y, z]
    fn node_position(&self, idx: usize) -> [f64; 3];
    /// 单元节点索引（逆时针）
    fn cell_nodes(&self, idx: usize) -> Vec<usize>;
}

/// 二维结构化矩形网格
///
/// 节点按行优先编号：`node = i + j * (nx + 1)`；单元 `cell = i + j * nx`。
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredGrid {
    nx: usize,
    ny: usize,
    origin: [f64; 2],
    spacing: [f64; 2],
}

impl StructuredGrid {
    /// 创建 `nx × ny` 个单元的网格
    pub fn new(nx: usize, ny: usize, origin: [f64; 2], spacing: [f64; 2]) -> Self {
        Self {
            nx,
            ny,
            origin,
            spacing,
        }
    }

    /// 覆盖给定矩形区域的网格
    pub fn with_extent(nx: usize, ny: usize, lower: [f64; 2], upper: [f64; 2]) -> Self {
        let dx = (upper[0] - lower[0]) / nx.max(1) as f64;
        let dy = (upper[1] - lower[1]) / ny.max(1) as f64;
        Self::new(nx, ny, lower, [dx, dy])
    }

    /// x 方向单元数
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// y 方向单元数
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// 节点编号
    #[inline]
    pub fn node_index(&self, i: usize, j: usize) -> usize {
        i + j * (self.nx + 1)
    }

    /// 单元编号
    #[inline]
    pub fn cell_index(&self, i: usize, j: usize) -> usize {
        i + j * self.nx
    }

    /// 单元中心
    pub fn cell_center(&self, idx: usize) -> [f64; 2] {
        let (i, j) = (idx % self.nx, idx / self.nx);
        [
            self.origin[0] + (i as f64 + 0.5) * self.spacing[0],
            self.origin[1] + (j as f64 + 0.5) * self.spacing[1],
        ]
    }

    /// 每个方向加密一倍，覆盖相同区域
    pub fn refined(&self) -> Self {
        Self::new(
            self.nx * 2,
            self.ny * 2,
            self.origin,
            [self.spacing[0] * 0.5, self.spacing[1] * 0.5],
        )
    }
}

impl VtkGrid for StructuredGrid {
    fn n_nodes(&self) -> usize {
        (self.nx + 1) * (self.ny + 1)
    }

    fn n_cells(&self) -> usize {
        self.nx * self.ny
    }

    fn node_position(&self, idx: usize) -> [f64; 3] {
        let (i, j) = (idx % (self.nx + 1), idx / (self.nx + 1));
        [
            self.origin[0] + i as f64 * self.spacing[0],
            self.origin[1] + j as f64 * self.spacing[1],
            0.0,
        ]
    }

    fn cell_nodes(&self, idx: usize) -> Vec<usize> {
        let (i, j) = (idx % self.nx, idx / self.nx);
        vec![
            self.node_index(i, j),
            self.node_index(i + 1, j),
            self.node_index(i + 1, j + 1),
            self.node_index(i, j + 1),
        ]
    }
}
