// crates/mh_io/tests/vtk_series.rs

//! VTU 时间序列写出集成测试

use mh_config::VtkDataFormat;
use mh_io::{DofMapping, OutputWriter, StructuredGrid, VtkMultiWriter};

fn grid() -> StructuredGrid {
    StructuredGrid::new(2, 1, [0.0, 0.0], [1.0, 1.0])
}

#[test]
fn test_two_steps_produce_series() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = VtkMultiWriter::new(grid(), DofMapping::Vertex, dir.path(), "run")
        .with_phase_names(["liquid"]);
    assert_eq!(writer.num_dof(), 6);

    for (time, value) in [(0.0, 0.42), (86400.0, 0.84)] {
        writer.begin_write(time).unwrap();
        let sink = writer.as_vtk_sink().unwrap();
        sink.commit_phase_buffer("tortuosity", vec![vec![value; 6]]);
        writer.end_write().unwrap();
    }

    assert!(dir.path().join("run-00000.vtu").exists());
    assert!(dir.path().join("run-00001.vtu").exists());
    assert_eq!(writer.series().len(), 2);
    assert_eq!(writer.series()[1].time, 86400.0);

    let pvd = std::fs::read_to_string(writer.pvd_path()).unwrap();
    assert!(pvd.contains(r#"type="Collection""#));
    assert!(pvd.contains(r#"timestep="0" group="" part="0" file="run-00000.vtu""#));
    assert!(pvd.contains(r#"timestep="86400" group="" part="0" file="run-00001.vtu""#));

    let vtu = std::fs::read_to_string(dir.path().join("run-00001.vtu")).unwrap();
    assert!(vtu.contains(r#"<Piece NumberOfPoints="6" NumberOfCells="2">"#));
    assert!(vtu.contains("<PointData>"));
    assert!(vtu.contains(r#"Name="tortuosity_liquid""#));
    assert!(vtu.contains("8.4e-1"));
}

#[test]
fn test_cell_data_with_base64() {
    let dir = tempfile::tempdir().unwrap();
    let mut writer = VtkMultiWriter::new(grid(), DofMapping::Element, dir.path(), "cells")
        .with_format(VtkDataFormat::Base64);
    assert_eq!(writer.num_dof(), 2);

    writer.begin_write(0.0).unwrap();
    writer
        .as_vtk_sink()
        .unwrap()
        .commit_phase_component_buffer("diffusionCoefficient", vec![vec![vec![1.5e-9, 3.0e-10]]]);
    writer.end_write().unwrap();

    let vtu = std::fs::read_to_string(dir.path().join("cells-00000.vtu")).unwrap();
    assert!(vtu.contains("<CellData>"));
    assert!(!vtu.contains("<PointData>"));
    assert!(vtu.contains(r#"Name="diffusionCoefficient^comp0_phase0""#));
    assert!(vtu.contains(r#"format="binary""#));
}

#[test]
fn test_refined_grid_accepts_larger_buffers() {
    let dir = tempfile::tempdir().unwrap();
    let coarse = grid();
    let fine = coarse.refined();
    let mut writer = VtkMultiWriter::new(coarse, DofMapping::Vertex, dir.path(), "amr");

    writer.begin_write(0.0).unwrap();
    writer.attach_scalar_dof_data("p", vec![0.0; 6]);
    writer.end_write().unwrap();

    writer.set_grid(fine);
    assert_eq!(writer.num_dof(), 15);
    writer.begin_write(1.0).unwrap();
    writer.attach_scalar_dof_data("p", vec![0.0; 15]);
    writer.end_write().unwrap();
    assert_eq!(writer.series().len(), 2);
}
