// crates/mh_io/src/exporters/multi_writer.rs

//! VTU 时间序列写出器
//!
//! 每个输出步（`begin_write` ... `end_write`）写出一个 `{prefix}-{NNNNN}.vtu`，
//! 并重写 `{prefix}.pvd` 集合文件，ParaView 打开 PVD 即可浏览整个序列。
//!
//! 相缓冲区按 `{name}_{phase}` 展开为标量场，
//! 相-组分缓冲区按 `{name}^{component}_{phase}` 展开。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use mh_config::{VtkDataFormat, VtkOutputParams};

use crate::error::{IoError, IoResult};
use crate::grid::{VtkGrid, VtuCellType};
use crate::vtu::{byte_order, write_data_array, xml_escape};
use crate::writer::{DofMapping, OutputWriter, VtkBufferSink};

/// PVD 集合条目
#[derive(Debug, Clone, PartialEq)]
pub struct PvdEntry {
    /// 时间 [s]
    pub time: f64,
    /// VTU 文件名（相对 PVD 所在目录）
    pub file: String,
}

/// 一个标量场
#[derive(Debug, Clone)]
struct ScalarField {
    name: String,
    values: Vec<f64>,
}

/// 正在进行的输出步
#[derive(Debug)]
struct PendingStep {
    time: f64,
    fields: Vec<ScalarField>,
}

/// VTU 时间序列写出器
pub struct VtkMultiWriter {
    grid: Box<dyn VtkGrid>,
    mapping: DofMapping,
    phase_names: Vec<String>,
    component_names: Vec<String>,
    directory: PathBuf,
    prefix: String,
    format: VtkDataFormat,
    pending: Option<PendingStep>,
    series: Vec<PvdEntry>,
}

impl VtkMultiWriter {
    /// 创建写出器
    pub fn new<G: VtkGrid + 'static>(
        grid: G,
        mapping: DofMapping,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            grid: Box::new(grid),
            mapping,
            phase_names: Vec::new(),
            component_names: Vec::new(),
            directory: directory.into(),
            prefix: prefix.into(),
            format: VtkDataFormat::Ascii,
            pending: None,
            series: Vec::new(),
        }
    }

    /// 按输出参数创建
    pub fn from_params<G: VtkGrid + 'static>(
        grid: G,
        mapping: DofMapping,
        params: &VtkOutputParams,
    ) -> Self {
        Self::new(grid, mapping, params.directory.clone(), params.prefix.clone())
            .with_format(params.format)
    }

    /// 设置数据编码
    pub fn with_format(mut self, format: VtkDataFormat) -> Self {
        self.format = format;
        self
    }

    /// 设置相名称（用于展开字段名）
    pub fn with_phase_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phase_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// 设置组分名称（用于展开字段名）
    pub fn with_component_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.component_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// 替换网格（网格加密后调用，必须在输出步之外）
    pub fn set_grid<G: VtkGrid + 'static>(&mut self, grid: G) {
        debug_assert!(self.pending.is_none(), "输出步进行中不能替换网格");
        self.grid = Box::new(grid);
    }

    /// 当前网格上的自由度数
    pub fn num_dof(&self) -> usize {
        match self.mapping {
            DofMapping::Vertex => self.grid.n_nodes(),
            DofMapping::Element => self.grid.n_cells(),
        }
    }

    /// 是否处于输出步中
    pub fn is_writing(&self) -> bool {
        self.pending.is_some()
    }

    /// 已写出的时间序列
    pub fn series(&self) -> &[PvdEntry] {
        &self.series
    }

    /// PVD 集合文件路径
    pub fn pvd_path(&self) -> PathBuf {
        self.directory.join(format!("{}.pvd", self.prefix))
    }

    /// 当前输出步中已提交的字段名
    pub fn pending_field_names(&self) -> Vec<String> {
        self.pending
            .as_ref()
            .map(|p| p.fields.iter().map(|f| f.name.clone()).collect())
            .unwrap_or_default()
    }

    fn phase_name(&self, phase_idx: usize) -> String {
        self.phase_names
            .get(phase_idx)
            .cloned()
            .unwrap_or_else(|| format!("phase{}", phase_idx))
    }

    fn component_name(&self, comp_idx: usize) -> String {
        self.component_names
            .get(comp_idx)
            .cloned()
            .unwrap_or_else(|| format!("comp{}", comp_idx))
    }

    /// 附加一个按自由度排列的标量场
    ///
    /// 必须在 `begin_write` 与 `end_write` 之间调用，否则数据被丢弃。
    pub fn attach_scalar_dof_data(&mut self, name: impl Into<String>, values: Vec<f64>) {
        let name = name.into();
        match self.pending.as_mut() {
            Some(step) => step.fields.push(ScalarField { name, values }),
            None => log::warn!("未处于输出步中，丢弃字段 {}", name),
        }
    }

    fn write_vtu(&self, path: &Path, step: &PendingStep) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut w = BufWriter::new(file);
        let format = self.format;
        let grid = self.grid.as_ref();

        writeln!(w, r#"<?xml version="1.0"?>"#)?;
        writeln!(
            w,
            r#"<VTKFile type="UnstructuredGrid" version="0.1" byte_order="{}">"#,
            byte_order()
        )?;
        writeln!(w, r#"  <UnstructuredGrid>"#)?;
        writeln!(w, r#"    <FieldData>"#)?;
        write_data_array(&mut w, 6, Some("TimeValue"), 1, &[step.time], VtkDataFormat::Ascii)?;
        writeln!(w, r#"    </FieldData>"#)?;
        writeln!(
            w,
            r#"    <Piece NumberOfPoints="{}" NumberOfCells="{}">"#,
            grid.n_nodes(),
            grid.n_cells()
        )?;

        // 节点
        writeln!(w, r#"      <Points>"#)?;
        let coords: Vec<f64> = (0..grid.n_nodes())
            .flat_map(|i| grid.node_position(i))
            .collect();
        write_data_array(&mut w, 8, None, 3, &coords, format)?;
        writeln!(w, r#"      </Points>"#)?;

        // 单元
        writeln!(w, r#"      <Cells>"#)?;
        let mut connectivity = Vec::new();
        let mut offsets = Vec::with_capacity(grid.n_cells());
        let mut types = Vec::with_capacity(grid.n_cells());
        for c in 0..grid.n_cells() {
            let nodes = grid.cell_nodes(c);
            types.push(VtuCellType::from_node_count(nodes.len()) as u8);
            connectivity.extend(nodes.iter().map(|&n| n as i32));
            offsets.push(connectivity.len() as i32);
        }
        write_data_array(&mut w, 8, Some("connectivity"), 1, &connectivity, format)?;
        write_data_array(&mut w, 8, Some("offsets"), 1, &offsets, format)?;
        write_data_array(&mut w, 8, Some("types"), 1, &types, format)?;
        writeln!(w, r#"      </Cells>"#)?;

        // 诊断字段
        let section = self.mapping.section_name();
        writeln!(w, r#"      <{}>"#, section)?;
        for field in &step.fields {
            write_data_array(&mut w, 8, Some(field.name.as_str()), 1, &field.values, format)?;
        }
        writeln!(w, r#"      </{}>"#, section)?;

        writeln!(w, r#"    </Piece>"#)?;
        writeln!(w, r#"  </UnstructuredGrid>"#)?;
        writeln!(w, r#"</VTKFile>"#)?;
        w.flush()?;
        Ok(())
    }

    fn write_pvd(&self) -> std::io::Result<()> {
        let file = File::create(self.pvd_path())?;
        let mut w = BufWriter::new(file);

        writeln!(w, r#"<?xml version="1.0"?>"#)?;
        writeln!(
            w,
            r#"<VTKFile type="Collection" version="0.1" byte_order="{}">"#,
            byte_order()
        )?;
        writeln!(w, r#"  <Collection>"#)?;
        for entry in &self.series {
            writeln!(
                w,
                r#"    <DataSet timestep="{}" group="" part="0" file="{}"/>"#,
                entry.time,
                xml_escape(&entry.file)
            )?;
        }
        writeln!(w, r#"  </Collection>"#)?;
        writeln!(w, r#"</VTKFile>"#)?;
        w.flush()?;
        Ok(())
    }
}

impl VtkBufferSink for VtkMultiWriter {
    fn commit_phase_buffer(&mut self, name: &str, buffer: Vec<Vec<f64>>) {
        for (phase_idx, values) in buffer.into_iter().enumerate() {
            let field = format!("{}_{}", name, self.phase_name(phase_idx));
            self.attach_scalar_dof_data(field, values);
        }
    }

    fn commit_phase_component_buffer(&mut self, name: &str, buffer: Vec<Vec<Vec<f64>>>) {
        for (phase_idx, per_comp) in buffer.into_iter().enumerate() {
            let phase = self.phase_name(phase_idx);
            for (comp_idx, values) in per_comp.into_iter().enumerate() {
                let field = format!("{}^{}_{}", name, self.component_name(comp_idx), phase);
                self.attach_scalar_dof_data(field, values);
            }
        }
    }
}

impl OutputWriter for VtkMultiWriter {
    fn format_name(&self) -> &'static str {
        "vtk"
    }

    fn begin_write(&mut self, time: f64) -> IoResult<()> {
        if self.pending.is_some() {
            return Err(IoError::InvalidState {
                operation: "begin_write",
                reason: "上一个输出步尚未结束".to_string(),
            });
        }
        self.pending = Some(PendingStep {
            time,
            fields: Vec::new(),
        });
        Ok(())
    }

    fn end_write(&mut self) -> IoResult<()> {
        let step = self.pending.take().ok_or_else(|| IoError::InvalidState {
            operation: "end_write",
            reason: "未调用 begin_write".to_string(),
        })?;

        let n_dof = self.num_dof();
        if let Some(bad) = step.fields.iter().find(|f| f.values.len() != n_dof) {
            return Err(IoError::FieldSizeMismatch {
                field: bad.name.clone(),
                expected: n_dof,
                actual: bad.values.len(),
            });
        }

        std::fs::create_dir_all(&self.directory)
            .map_err(|e| IoError::file(&self.directory, e))?;

        let file_name = format!("{}-{:05}.vtu", self.prefix, self.series.len());
        let path = self.directory.join(&file_name);
        self.write_vtu(&path, &step)
            .map_err(|e| IoError::file(&path, e))?;

        self.series.push(PvdEntry {
            time: step.time,
            file: file_name,
        });
        self.write_pvd()
            .map_err(|e| IoError::file(self.pvd_path(), e))?;

        log::info!(
            "已写出 {} (t = {}, {} 个字段)",
            path.display(),
            step.time,
            step.fields.len()
        );
        Ok(())
    }

    fn as_vtk_sink(&mut self) -> Option<&mut dyn VtkBufferSink> {
        Some(self)
    }
}
