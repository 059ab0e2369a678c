// crates/mh_diagnostics/tests/output_cycle.rs

//! 完整输出周期：管理器、并行遍历与 VTU 写出

mod common;

use common::*;
use mh_diagnostics::{OutputModule, OutputModuleManager, VtkDiffusionModule};
use mh_io::{DofMapping, StructuredGrid, VtkGrid, VtkMultiWriter};

/// 顶点中心离散：每个单元的四个节点都是它的自由度，相邻单元共享节点
fn elements(grid: &StructuredGrid) -> Vec<StubElement> {
    (0..grid.n_cells())
        .map(|cell| {
            let dofs = grid.cell_nodes(cell);
            let iqs = dofs
                .iter()
                .enumerate()
                .map(|(local, _)| ConstIq {
                    tortuosity: cell as f64 + 0.1 * local as f64,
                    diffusion: DIFFUSION * (cell + 1) as f64,
                    effective: EFFECTIVE * (local + 1) as f64,
                })
                .collect();
            StubElement { dofs, iqs }
        })
        .collect()
}

#[test]
fn test_parallel_matches_sequential() {
    let grid = StructuredGrid::new(12, 10, [0.0, 0.0], [1.0, 1.0]);
    let ctxs = elements(&grid);
    assert!(ctxs.len() >= 100);

    let mut parallel = module(true, true, true, true);
    let mut sequential = module(true, true, true, true);
    parallel.alloc(grid.n_nodes());
    sequential.alloc(grid.n_nodes());

    OutputModule::<StubElement>::process_elements(&mut parallel, &ctxs);
    for ctx in &ctxs {
        OutputModule::<StubElement>::process_element(&mut sequential, ctx);
    }

    assert_eq!(parallel.tortuosity(), sequential.tortuosity());
    assert_eq!(parallel.diffusion_coefficient(), sequential.diffusion_coefficient());
    assert_eq!(
        parallel.effective_diffusion_coefficient(),
        sequential.effective_diffusion_coefficient()
    );

    // 右上角节点只属于最后一个单元
    let last = grid.n_nodes() - 1;
    let tau = parallel.tortuosity().unwrap();
    assert_eq!(tau[0][last], (grid.n_cells() - 1) as f64 + 0.2);
}

#[test]
fn test_parallel_respects_gate() {
    let grid = StructuredGrid::new(10, 10, [0.0, 0.0], [1.0, 1.0]);
    let ctxs = elements(&grid);
    let mut m = module(true, false, false, false);
    m.alloc(grid.n_nodes());
    OutputModule::<StubElement>::process_elements(&mut m, &ctxs);
    assert!(m.tortuosity().unwrap().iter().flatten().all(|v| *v == 0.0));
}

#[test]
fn test_manager_drives_cycle() {
    let mut manager: OutputModuleManager<StubElement> =
        OutputModuleManager::new().with_module(module(true, false, true, true));
    assert_eq!(manager.module_names(), vec!["diffusion"]);

    let mut writer = RecordingWriter::default();
    let ctxs = vec![StubElement::uniform(&[0, 1], ConstIq::default())];
    manager.write_step(&mut writer, 0.5, 3, &ctxs).unwrap();

    assert_eq!(writer.steps, vec![0.5]);
    assert_eq!(manager.steps_written(), 1);
    assert_eq!(manager.num_dof(), 3);
    let names: Vec<&str> = writer.commits.iter().map(Commit::name).collect();
    assert_eq!(names, ["tortuosity", "effectiveDiffusionCoefficient"]);
    assert_eq!(
        writer.commits[0],
        Commit::Phase("tortuosity".into(), vec![vec![TORTUOSITY, TORTUOSITY, 0.0]; 2])
    );
}

#[test]
fn test_manager_with_non_capable_writer() {
    let mut manager: OutputModuleManager<StubElement> =
        OutputModuleManager::new().with_module(module(true, true, true, true));
    let mut writer = SummaryWriter::default();
    let ctxs = vec![StubElement::uniform(&[0], ConstIq::default())];
    manager.write_step(&mut writer, 0.0, 1, &ctxs).unwrap();
    assert_eq!(writer.steps, 1);
}

#[test]
fn test_vtu_series_with_refinement() {
    let dir = tempfile::tempdir().unwrap();
    let coarse = StructuredGrid::new(8, 8, [0.0, 0.0], [1.0, 1.0]);
    let fine = coarse.refined();

    let mut writer = VtkMultiWriter::new(coarse.clone(), DofMapping::Vertex, dir.path(), "diff")
        .with_phase_names(["liquid", "gas"])
        .with_component_names(["H2O", "Air"]);
    let mut manager: OutputModuleManager<StubElement> =
        OutputModuleManager::new().with_module(module(true, true, false, true));

    let n = writer.num_dof();
    manager
        .write_step(&mut writer, 0.0, n, &elements(&coarse))
        .unwrap();

    writer.set_grid(fine.clone());
    let n = writer.num_dof();
    assert_eq!(n, 17 * 17);
    manager
        .write_step(&mut writer, 3600.0, n, &elements(&fine))
        .unwrap();

    assert_eq!(writer.series().len(), 2);
    let vtu = std::fs::read_to_string(dir.path().join("diff-00001.vtu")).unwrap();
    assert!(vtu.contains(r#"NumberOfPoints="289""#));
    for field in [
        "tortuosity_liquid",
        "tortuosity_gas",
        "diffusionCoefficient^H2O_liquid",
        "diffusionCoefficient^Air_gas",
    ] {
        assert!(vtu.contains(&format!(r#"Name="{field}""#)), "missing {field}");
    }
    assert!(!vtu.contains("effectiveDiffusionCoefficient"));
}

/// 单精度强度量
struct F32Iq;

impl mh_diagnostics::DiffusionIntensiveQuantities for F32Iq {
    type Evaluation = f32;

    fn tortuosity(&self, _phase: mh_foundation::PhaseIndex) -> f32 {
        0.5
    }

    fn diffusion_coefficient(
        &self,
        _phase: mh_foundation::PhaseIndex,
        _comp: mh_foundation::ComponentIndex,
    ) -> f32 {
        0.0
    }

    fn effective_diffusion_coefficient(
        &self,
        _phase: mh_foundation::PhaseIndex,
        _comp: mh_foundation::ComponentIndex,
    ) -> f32 {
        0.0
    }
}

struct F32Element(F32Iq);

impl mh_diagnostics::ElementContext for F32Element {
    type IntensiveQuantities = F32Iq;

    fn num_primary_dof(&self, _time_idx: usize) -> usize {
        1
    }

    fn global_space_index(&self, _local_dof: usize, _time_idx: usize) -> mh_foundation::DofIndex {
        mh_foundation::DofIndex::new(0)
    }

    fn intensive_quantities(&self, _local_dof: usize, _time_idx: usize) -> &F32Iq {
        &self.0
    }
}

#[test]
fn test_f32_values_widen_to_output() {
    let mut m = VtkDiffusionModule::<f32>::new(LAYOUT, registry(true, false, false, true));
    m.alloc(1);
    OutputModule::<F32Element>::process_element(&mut m, &F32Element(F32Iq));
    let mut writer = RecordingWriter::default();
    OutputModule::<F32Element>::commit_buffers(&m, &mut writer);
    assert_eq!(writer.commits, vec![Commit::Phase("tortuosity".into(), vec![vec![0.5]; 2])]);
}
